//! Line segments and segment intersection

use crate::{Mat33, Point2, Rect2, Vec2, EPSILON};
use serde::{Deserialize, Serialize};

/// Where two segments meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionResult {
    /// The intersection point
    pub point: Point2,
    /// Parameter along `self` in `[0, 1]`
    pub t: f64,
}

/// A straight segment from `point1` to `point2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment2 {
    pub point1: Point2,
    pub point2: Point2,
}

impl LineSegment2 {
    pub fn new(point1: Point2, point2: Point2) -> Self {
        Self { point1, point2 }
    }

    pub fn direction(&self) -> Vec2 {
        self.point2 - self.point1
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Point at parameter `t` (0 is `point1`, 1 is `point2`)
    pub fn at(&self, t: f64) -> Point2 {
        self.point1 + self.direction() * t
    }

    pub fn bbox(&self) -> Rect2 {
        Rect2::from_corners(self.point1, self.point2)
    }

    pub fn transformed_by(&self, transform: &Mat33) -> LineSegment2 {
        LineSegment2::new(
            transform.transform_point(self.point1),
            transform.transform_point(self.point2),
        )
    }

    /// The point on this segment closest to `target`
    pub fn closest_point_to(&self, target: Point2) -> Point2 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq < EPSILON * EPSILON {
            return self.point1;
        }
        let t = ((target - self.point1).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.at(t)
    }

    pub fn distance(&self, target: Point2) -> f64 {
        self.closest_point_to(target).distance(target)
    }

    /// Finds a point shared by `self` and `other`.
    ///
    /// Degenerate (zero-length) segments behave as points. For overlapping
    /// collinear segments, the first shared point along `self` is returned.
    pub fn intersection(&self, other: &LineSegment2) -> Option<IntersectionResult> {
        let r = self.direction();
        let s = other.direction();
        let len_r = r.length();
        let len_s = s.length();

        if len_r < EPSILON {
            return (other.distance(self.point1) < EPSILON).then_some(IntersectionResult {
                point: self.point1,
                t: 0.0,
            });
        }
        if len_s < EPSILON {
            return (self.distance(other.point1) < EPSILON).then(|| IntersectionResult {
                point: other.point1,
                t: (other.point1 - self.point1).dot(r) / (len_r * len_r),
            });
        }

        let offset = other.point1 - self.point1;
        let denom = r.perp_dot(s);

        if denom.abs() < EPSILON * len_r * len_s {
            // Parallel: only collinear segments can share points
            if offset.perp_dot(r).abs() > EPSILON * len_r {
                return None;
            }
            let len_sq = len_r * len_r;
            let t0 = offset.dot(r) / len_sq;
            let t1 = (other.point2 - self.point1).dot(r) / len_sq;
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            if hi < -EPSILON || lo > 1.0 + EPSILON {
                return None;
            }
            let t = lo.max(0.0);
            return Some(IntersectionResult { point: self.at(t), t });
        }

        let t = offset.perp_dot(s) / denom;
        let u = offset.perp_dot(r) / denom;
        let in_range = |v: f64| (-EPSILON..=1.0 + EPSILON).contains(&v);
        if in_range(t) && in_range(u) {
            let t = t.clamp(0.0, 1.0);
            Some(IntersectionResult { point: self.at(t), t })
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &LineSegment2) -> bool {
        self.intersection(other).is_some()
    }

    /// Shortest distance between any point of `self` and any point of `other`
    pub fn distance_to_segment(&self, other: &LineSegment2) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        self.distance(other.point1)
            .min(self.distance(other.point2))
            .min(other.distance(self.point1))
            .min(other.distance(self.point2))
    }
}
