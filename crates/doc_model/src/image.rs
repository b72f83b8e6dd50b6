//! Raster images placed in the document

use crate::component::{parse_payload, transformed_rect_intersects};
use crate::{Component, ComponentBase, ComponentLocalization, ComponentRegistry, Result};
use geometry::{LineSegment2, Mat33, Point2, Rect2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

pub const IMAGE_KIND: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
struct ImagePayload {
    src: String,
    #[serde(default)]
    label: Option<String>,
    width: f64,
    height: f64,
    transform: Mat33,
}

/// An image of `width` x `height` pixels, placed by `transform`.
///
/// The pixel data itself is referenced through `src` (usually a data URL) and
/// is never decoded here.
#[derive(Debug, Clone)]
pub struct ImageComponent {
    base: ComponentBase,
    src: String,
    label: Option<String>,
    width: f64,
    height: f64,
    transform: Mat33,
    bbox: Rect2,
}

impl ImageComponent {
    pub fn new(
        registry: &ComponentRegistry,
        src: impl Into<String>,
        width: f64,
        height: f64,
        transform: Mat33,
    ) -> Result<Self> {
        let base = ComponentBase::new(registry, IMAGE_KIND)?;
        let mut created = Self {
            base,
            src: src.into(),
            label: None,
            width: width.max(0.0),
            height: height.max(0.0),
            transform,
            bbox: Rect2::EMPTY,
        };
        created.bbox = created.local_rect().transformed_bounding_box(&created.transform);
        Ok(created)
    }

    /// Set the alt text
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn transform(&self) -> &Mat33 {
        &self.transform
    }

    fn local_rect(&self) -> Rect2 {
        Rect2::new(0.0, 0.0, self.width, self.height)
    }

    fn payload(&self) -> ImagePayload {
        ImagePayload {
            src: self.src.clone(),
            label: self.label.clone(),
            width: self.width,
            height: self.height,
            transform: self.transform,
        }
    }

    fn from_payload(registry: &ComponentRegistry, payload: ImagePayload) -> Result<Self> {
        let image = Self::new(
            registry,
            payload.src,
            payload.width,
            payload.height,
            payload.transform,
        )?;
        Ok(match payload.label {
            Some(label) => image.with_label(label),
            None => image,
        })
    }

    pub(crate) fn deserialize_payload(
        data: &Value,
        registry: &ComponentRegistry,
    ) -> Result<Box<dyn Component>> {
        let payload: ImagePayload = parse_payload(IMAGE_KIND, data)?;
        Ok(Box::new(Self::from_payload(registry, payload)?))
    }
}

impl Component for ImageComponent {
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
        transformed_rect_intersects(&self.local_rect(), &self.transform, segment)
    }

    fn apply_transformation(&mut self, transform: &Mat33) {
        self.transform = transform.right_mul(&self.transform);
        self.bbox = self.local_rect().transformed_bounding_box(&self.transform);
    }

    fn serialize_payload(&self) -> Option<Value> {
        serde_json::to_value(self.payload()).ok()
    }

    fn create_clone(&self, registry: &ComponentRegistry) -> Result<Box<dyn Component>> {
        Ok(Box::new(Self::from_payload(registry, self.payload())?))
    }

    fn description(&self, localization: &dyn ComponentLocalization) -> String {
        match &self.label {
            Some(label) => localization.image_node(label),
            None => localization.unlabeled_image_node(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
