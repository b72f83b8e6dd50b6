//! Freehand strokes

use crate::component::{parse_payload, subdivided_rect_intersects};
use crate::{Component, ComponentBase, ComponentLocalization, ComponentRegistry, Result};
use geometry::{LineSegment2, Mat33, Point2, Rect2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

pub const STROKE_KIND: &str = "stroke";

/// Pen settings for a stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// CSS-style color, e.g. "#1a1a1aff"
    pub color: String,
    /// Pen width in document units
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 2.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StrokePayload {
    points: Vec<Point2>,
    style: StrokeStyle,
}

/// A polyline drawn with a round pen
#[derive(Debug, Clone)]
pub struct Stroke {
    base: ComponentBase,
    points: Vec<Point2>,
    style: StrokeStyle,
    bbox: Rect2,
}

impl Stroke {
    pub fn new(
        registry: &ComponentRegistry,
        points: Vec<Point2>,
        style: StrokeStyle,
    ) -> Result<Self> {
        let base = ComponentBase::new(registry, STROKE_KIND)?;
        let bbox = Self::compute_bbox(&points, &style);
        Ok(Self { base, points, style, bbox })
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    fn compute_bbox(points: &[Point2], style: &StrokeStyle) -> Rect2 {
        Rect2::bbox_of_points(points.iter().copied()).grown_by(style.width / 2.0)
    }

    fn segments(&self) -> impl Iterator<Item = LineSegment2> + '_ {
        // A single point still forms a (degenerate) segment
        let tail = if self.points.len() == 1 { 0 } else { 1 };
        self.points
            .iter()
            .zip(self.points.iter().skip(tail))
            .map(|(a, b)| LineSegment2::new(*a, *b))
    }

    pub(crate) fn deserialize_payload(
        data: &Value,
        registry: &ComponentRegistry,
    ) -> Result<Box<dyn Component>> {
        let payload: StrokePayload = parse_payload(STROKE_KIND, data)?;
        Ok(Box::new(Stroke::new(registry, payload.points, payload.style)?))
    }
}

impl Component for Stroke {
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
        self.points.first().copied().unwrap_or_else(|| self.bbox.center())
    }

    fn intersects(&self, segment: &LineSegment2) -> bool {
        let reach = self.style.width / 2.0;
        self.segments()
            .any(|part| part.distance_to_segment(segment) <= reach)
    }

    fn intersects_rect(&self, rect: &Rect2) -> bool {
        // No points, nothing to hit
        !self.points.is_empty() && subdivided_rect_intersects(self, rect)
    }

    fn apply_transformation(&mut self, transform: &Mat33) {
        for point in &mut self.points {
            *point = transform.transform_point(*point);
        }
        self.bbox = Self::compute_bbox(&self.points, &self.style);
    }

    fn serialize_payload(&self) -> Option<Value> {
        serde_json::to_value(StrokePayload {
            points: self.points.clone(),
            style: self.style.clone(),
        })
        .ok()
    }

    fn create_clone(&self, registry: &ComponentRegistry) -> Result<Box<dyn Component>> {
        Ok(Box::new(Stroke::new(registry, self.points.clone(), self.style.clone())?))
    }

    fn description(&self, localization: &dyn ComponentLocalization) -> String {
        localization.stroke()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn proportional_rendering_time(&self) -> f64 {
        self.points.len().max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stroke(points: &[(f64, f64)], width: f64) -> Stroke {
        let registry = ComponentRegistry::with_builtin_components();
        let points = points.iter().map(|&(x, y)| Point2::new(x, y)).collect();
        let style = StrokeStyle { width, ..Default::default() };
        Stroke::new(&registry, points, style).unwrap()
    }

    #[test]
    fn test_bbox_includes_pen_width() {
        let s = stroke(&[(0.0, 0.0), (10.0, 0.0)], 4.0);
        assert_eq!(s.bbox(), Rect2::new(-2.0, -2.0, 14.0, 4.0));
    }

    #[test]
    fn test_intersects_respects_pen_width() {
        let s = stroke(&[(0.0, 0.0), (10.0, 0.0)], 4.0);
        let near = LineSegment2::new(Point2::new(0.0, 1.5), Point2::new(10.0, 1.5));
        let far = LineSegment2::new(Point2::new(0.0, 2.5), Point2::new(10.0, 2.5));
        assert!(s.intersects(&near));
        assert!(!s.intersects(&far));
    }

    #[test]
    fn test_single_point_stroke() {
        let s = stroke(&[(5.0, 5.0)], 2.0);
        assert!(s.intersects(&LineSegment2::new(Point2::new(0.0, 5.5), Point2::new(10.0, 5.5))));
        assert_eq!(s.proportional_rendering_time(), 1.0);
    }

    #[test]
    fn test_empty_stroke_is_never_hit() {
        let s = stroke(&[], 2.0);
        assert!(!s.intersects_rect(&Rect2::new(-5.0, -5.0, 10.0, 10.0)));
        assert!(!s.intersects(&LineSegment2::new(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0))));
    }

    #[test]
    fn test_transformation_updates_bbox() {
        let mut s = stroke(&[(0.0, 0.0), (10.0, 0.0)], 0.0);
        s.apply_transformation(&Mat33::translation(geometry::Vec2::new(5.0, 5.0)));
        assert_eq!(s.bbox(), Rect2::new(5.0, 5.0, 10.0, 0.0));
        assert_eq!(s.points()[0], Point2::new(5.0, 5.0));
    }

    proptest! {
        // Any rectangle that really overlaps a thin polyline must be reported
        #[test]
        fn prop_intersects_rect_has_no_false_negatives(
            x in -20.0f64..20.0,
            y in -20.0f64..20.0,
            w in 0.5f64..15.0,
            h in 0.5f64..15.0,
        ) {
            let s = stroke(&[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)], 0.0);
            let rect = Rect2::new(x, y, w, h);
            let truly_intersects = s.points().iter().any(|p| rect.contains_point(*p))
                || s.segments().any(|part| rect.edges().iter().any(|edge| edge.intersects(&part)));
            if truly_intersects {
                prop_assert!(s.intersects_rect(&rect));
            }
        }
    }
}
