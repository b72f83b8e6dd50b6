//! Solid page backgrounds

use crate::component::{parse_payload, transformed_rect_intersects};
use crate::{Component, ComponentBase, ComponentLocalization, ComponentRegistry, Result};
use geometry::{LineSegment2, Mat33, Point2, Rect2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

pub const BACKGROUND_KIND: &str = "background";

#[derive(Debug, Serialize, Deserialize)]
struct BackgroundPayload {
    color: String,
    region: Rect2,
    transform: Mat33,
}

/// A filled region drawn behind every foreground component.
///
/// Backgrounds cannot be selected, so selection tools leave them alone.
#[derive(Debug, Clone)]
pub struct Background {
    base: ComponentBase,
    color: String,
    region: Rect2,
    transform: Mat33,
}

impl Background {
    pub fn new(
        registry: &ComponentRegistry,
        color: impl Into<String>,
        region: Rect2,
    ) -> Result<Self> {
        Ok(Self {
            base: ComponentBase::new(registry, BACKGROUND_KIND)?,
            color: color.into(),
            region,
            transform: Mat33::IDENTITY,
        })
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub(crate) fn deserialize_payload(
        data: &Value,
        registry: &ComponentRegistry,
    ) -> Result<Box<dyn Component>> {
        let payload: BackgroundPayload = parse_payload(BACKGROUND_KIND, data)?;
        let mut background = Background::new(registry, payload.color, payload.region)?;
        background.transform = payload.transform;
        Ok(Box::new(background))
    }
}

impl Component for Background {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn content_bbox(&self) -> Rect2 {
        self.region.transformed_bounding_box(&self.transform)
    }

    fn point_on_geometry(&self) -> Point2 {
        self.transform.transform_point(self.region.top_left())
    }

    fn intersects(&self, segment: &LineSegment2) -> bool {
        transformed_rect_intersects(&self.region, &self.transform, segment)
    }

    fn apply_transformation(&mut self, transform: &Mat33) {
        self.transform = transform.right_mul(&self.transform);
    }

    fn serialize_payload(&self) -> Option<Value> {
        serde_json::to_value(BackgroundPayload {
            color: self.color.clone(),
            region: self.region,
            transform: self.transform,
        })
        .ok()
    }

    fn create_clone(&self, registry: &ComponentRegistry) -> Result<Box<dyn Component>> {
        let mut clone = Background::new(registry, self.color.clone(), self.region)?;
        clone.transform = self.transform;
        Ok(Box::new(clone))
    }

    fn description(&self, localization: &dyn ComponentLocalization) -> String {
        localization.background(&self.color)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_selectable(&self) -> bool {
        false
    }

    fn is_background(&self) -> bool {
        true
    }
}
