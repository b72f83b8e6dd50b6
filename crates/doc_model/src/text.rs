//! Text objects

use crate::component::{parse_payload, transformed_rect_intersects};
use crate::{Component, ComponentBase, ComponentLocalization, ComponentRegistry, Result};
use geometry::{LineSegment2, Mat33, Point2, Rect2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

pub const TEXT_KIND: &str = "text";

/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH_RATIO: f64 = 0.6;
const LINE_HEIGHT_RATIO: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub size: f64,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            size: 12.0,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPayload {
    text: String,
    style: TextStyle,
    transform: Mat33,
}

/// A block of text placed by a transform.
///
/// Glyph metrics belong to the renderer, so the layout box is estimated from
/// the font size and the longest line.
#[derive(Debug, Clone)]
pub struct TextComponent {
    base: ComponentBase,
    text: String,
    style: TextStyle,
    transform: Mat33,
    bbox: Rect2,
}

impl TextComponent {
    pub fn new(
        registry: &ComponentRegistry,
        text: impl Into<String>,
        style: TextStyle,
        transform: Mat33,
    ) -> Result<Self> {
        let base = ComponentBase::new(registry, TEXT_KIND)?;
        let mut created = Self {
            base,
            text: text.into(),
            style,
            transform,
            bbox: Rect2::EMPTY,
        };
        created.bbox = created.layout_box().transformed_bounding_box(&created.transform);
        Ok(created)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn transform(&self) -> &Mat33 {
        &self.transform
    }

    /// Estimated extent of the text before the transform is applied
    fn layout_box(&self) -> Rect2 {
        let longest = self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let line_count = self.text.lines().count().max(1);
        Rect2::new(
            0.0,
            0.0,
            longest as f64 * self.style.size * GLYPH_WIDTH_RATIO,
            line_count as f64 * self.style.size * LINE_HEIGHT_RATIO,
        )
    }

    pub(crate) fn deserialize_payload(
        data: &Value,
        registry: &ComponentRegistry,
    ) -> Result<Box<dyn Component>> {
        let payload: TextPayload = parse_payload(TEXT_KIND, data)?;
        Ok(Box::new(TextComponent::new(
            registry,
            payload.text,
            payload.style,
            payload.transform,
        )?))
    }
}

impl Component for TextComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn content_bbox(&self) -> Rect2 {
        self.bbox
    }

    fn point_on_geometry(&self) -> Point2 {
        self.transform.transform_point(Point2::ZERO)
    }

    fn intersects(&self, segment: &LineSegment2) -> bool {
        transformed_rect_intersects(&self.layout_box(), &self.transform, segment)
    }

    fn apply_transformation(&mut self, transform: &Mat33) {
        self.transform = transform.right_mul(&self.transform);
        self.bbox = self.layout_box().transformed_bounding_box(&self.transform);
    }

    fn serialize_payload(&self) -> Option<Value> {
        serde_json::to_value(TextPayload {
            text: self.text.clone(),
            style: self.style.clone(),
            transform: self.transform,
        })
        .ok()
    }

    fn create_clone(&self, registry: &ComponentRegistry) -> Result<Box<dyn Component>> {
        Ok(Box::new(TextComponent::new(
            registry,
            self.text.clone(),
            self.style.clone(),
            self.transform,
        )?))
    }

    fn description(&self, localization: &dyn ComponentLocalization) -> String {
        localization.text(&self.text)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
