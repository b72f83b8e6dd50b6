//! Geometric shapes (rectangles, ellipses and lines)
//!
//! A shape is defined by a transform that maps the unit square onto the
//! shape's frame. Rectangles fill that frame, ellipses are inscribed in it and
//! lines run from its top-left to its bottom-right corner.

use crate::component::{parse_payload, transformed_rect_intersects};
use crate::{Component, ComponentBase, ComponentLocalization, ComponentRegistry, Result};
use geometry::{LineSegment2, Mat33, Point2, Rect2, Vec2, EPSILON};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

pub const SHAPE_KIND: &str = "shape";

fn unit_square() -> Rect2 {
    Rect2::new(0.0, 0.0, 1.0, 1.0)
}

/// Which outline the shape draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
        }
    }
}

/// Outline and fill of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub stroke_color: String,
    pub stroke_width: f64,
    /// Fill color, or `None` for an outline-only shape
    #[serde(default)]
    pub fill: Option<String>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            stroke_width: 1.0,
            fill: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ShapePayload {
    shape: ShapeKind,
    transform: Mat33,
    style: ShapeStyle,
}

#[derive(Debug, Clone)]
pub struct Shape {
    base: ComponentBase,
    shape: ShapeKind,
    transform: Mat33,
    style: ShapeStyle,
    bbox: Rect2,
}

impl Shape {
    pub fn new(
        registry: &ComponentRegistry,
        shape: ShapeKind,
        transform: Mat33,
        style: ShapeStyle,
    ) -> Result<Self> {
        let base = ComponentBase::new(registry, SHAPE_KIND)?;
        let mut created = Self {
            base,
            shape,
            transform,
            style,
            bbox: Rect2::EMPTY,
        };
        created.bbox = created.compute_bbox();
        Ok(created)
    }

    /// A shape whose frame is `rect`
    pub fn from_rect(
        registry: &ComponentRegistry,
        shape: ShapeKind,
        rect: Rect2,
        style: ShapeStyle,
    ) -> Result<Self> {
        #[rustfmt::skip]
        let frame = Mat33::new(
            rect.width(), 0.0, rect.x(),
            0.0, rect.height(), rect.y(),
            0.0, 0.0, 1.0,
        );
        Self::new(registry, shape, frame, style)
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn transform(&self) -> &Mat33 {
        &self.transform
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn half_stroke(&self) -> f64 {
        self.style.stroke_width / 2.0
    }

    fn line(&self) -> LineSegment2 {
        LineSegment2::new(Point2::ZERO, Point2::ONE).transformed_by(&self.transform)
    }

    fn compute_bbox(&self) -> Rect2 {
        let outline = match self.shape {
            ShapeKind::Rectangle => unit_square().transformed_bounding_box(&self.transform),
            ShapeKind::Line => self.line().bbox(),
            ShapeKind::Ellipse => {
                let center = self.transform.transform_point(Point2::splat(0.5));
                let u = self.transform.transform_vec2(Vec2::X) * 0.5;
                let v = self.transform.transform_vec2(Vec2::Y) * 0.5;
                let extent = Vec2::new(u.x.hypot(v.x), u.y.hypot(v.y));
                Rect2::from_corners(center - extent, center + extent)
            }
        };
        outline.grown_by(self.half_stroke())
    }

    fn ellipse_intersects(&self, segment: &LineSegment2) -> bool {
        let axis_scale = self
            .transform
            .transform_vec2(Vec2::X)
            .length()
            .min(self.transform.transform_vec2(Vec2::Y).length());
        let inverse = match self.transform.inverse() {
            Ok(inverse) if axis_scale > EPSILON => inverse,
            // Flattened ellipse: fall back to its bounding box outline
            _ => return self.bbox.edges().iter().any(|edge| edge.intersects(segment)),
        };

        let local = segment.transformed_by(&inverse);
        let center = Point2::splat(0.5);
        let tolerance = self.half_stroke() / axis_scale;
        let nearest = local.distance(center);
        if self.style.fill.is_some() {
            return nearest <= 0.5 + tolerance;
        }
        let farthest = local.point1.distance(center).max(local.point2.distance(center));
        nearest <= 0.5 + tolerance && farthest >= 0.5 - tolerance
    }

    pub(crate) fn deserialize_payload(
        data: &Value,
        registry: &ComponentRegistry,
    ) -> Result<Box<dyn Component>> {
        let payload: ShapePayload = parse_payload(SHAPE_KIND, data)?;
        Ok(Box::new(Shape::new(registry, payload.shape, payload.transform, payload.style)?))
    }
}

impl Component for Shape {
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
        match self.shape {
            ShapeKind::Rectangle | ShapeKind::Line => self.transform.transform_point(Point2::ZERO),
            ShapeKind::Ellipse => self.transform.transform_point(Point2::new(1.0, 0.5)),
        }
    }

    fn intersects(&self, segment: &LineSegment2) -> bool {
        match self.shape {
            ShapeKind::Line => self.line().distance_to_segment(segment) <= self.half_stroke(),
            ShapeKind::Ellipse => self.ellipse_intersects(segment),
            ShapeKind::Rectangle => {
                if self.style.fill.is_some()
                    && transformed_rect_intersects(&unit_square(), &self.transform, segment)
                {
                    return true;
                }
                let [a, b, c, d] = unit_square()
                    .corners()
                    .map(|p| self.transform.transform_point(p));
                [(a, b), (b, c), (c, d), (d, a)]
                    .into_iter()
                    .map(|(p, q)| LineSegment2::new(p, q))
                    .any(|edge| edge.distance_to_segment(segment) <= self.half_stroke())
            }
        }
    }

    fn apply_transformation(&mut self, transform: &Mat33) {
        self.transform = transform.right_mul(&self.transform);
        self.bbox = self.compute_bbox();
    }

    fn serialize_payload(&self) -> Option<Value> {
        serde_json::to_value(ShapePayload {
            shape: self.shape,
            transform: self.transform,
            style: self.style.clone(),
        })
        .ok()
    }

    fn create_clone(&self, registry: &ComponentRegistry) -> Result<Box<dyn Component>> {
        Ok(Box::new(Shape::new(registry, self.shape, self.transform, self.style.clone())?))
    }

    fn description(&self, localization: &dyn ComponentLocalization) -> String {
        localization.shape(self.shape.as_str())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn shape(kind: ShapeKind, rect: Rect2, fill: Option<&str>) -> Shape {
        let registry = ComponentRegistry::with_builtin_components();
        let style = ShapeStyle {
            stroke_width: 0.0,
            fill: fill.map(str::to_string),
            ..Default::default()
        };
        Shape::from_rect(&registry, kind, rect, style).unwrap()
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment2 {
        LineSegment2::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn test_rectangle_bbox_follows_frame() {
        let r = shape(ShapeKind::Rectangle, Rect2::new(10.0, 20.0, 30.0, 40.0), None);
        assert!(r.bbox().eq_approx(&Rect2::new(10.0, 20.0, 30.0, 40.0), 1e-9));
    }

    #[test]
    fn test_filled_and_outlined_rectangles() {
        let inside = seg(15.0, 25.0, 16.0, 26.0);
        let outlined = shape(ShapeKind::Rectangle, Rect2::new(10.0, 20.0, 30.0, 40.0), None);
        let frame = Rect2::new(10.0, 20.0, 30.0, 40.0);
        let filled = shape(ShapeKind::Rectangle, frame, Some("#ff0000"));
        assert!(!outlined.intersects(&inside));
        assert!(filled.intersects(&inside));
        assert!(outlined.intersects(&seg(0.0, 30.0, 12.0, 30.0)));
    }

    #[test]
    fn test_ellipse_bbox_and_hits() {
        let circle = shape(ShapeKind::Ellipse, Rect2::new(0.0, 0.0, 10.0, 10.0), None);
        assert!(circle.bbox().eq_approx(&Rect2::new(0.0, 0.0, 10.0, 10.0), 1e-9));

        // Corner of the frame lies outside the circle
        assert!(!circle.intersects(&seg(0.0, 0.0, 1.0, 1.0)));
        // Crossing the outline
        assert!(circle.intersects(&seg(-1.0, 5.0, 1.0, 5.0)));
        // Fully inside an outline-only circle
        assert!(!circle.intersects(&seg(4.0, 4.0, 6.0, 6.0)));
    }

    #[test]
    fn test_rotated_ellipse_bbox() {
        let mut ellipse = shape(ShapeKind::Ellipse, Rect2::new(-2.0, -1.0, 4.0, 2.0), None);
        ellipse.apply_transformation(&Mat33::z_rotation(FRAC_PI_2, Point2::ZERO));
        assert!(ellipse.bbox().eq_approx(&Rect2::new(-1.0, -2.0, 2.0, 4.0), 1e-9));
    }

    #[test]
    fn test_line_hits() {
        let line = shape(ShapeKind::Line, Rect2::new(0.0, 0.0, 10.0, 10.0), None);
        assert!(line.intersects(&seg(0.0, 10.0, 10.0, 0.0)));
        assert!(!line.intersects(&seg(8.0, 0.0, 10.0, 2.0)));
    }
}
