//! Axis-aligned rectangles

use crate::{GeometryError, LineSegment2, Mat33, Point2, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. Width and height are never negative.
///
/// Deserialized rectangles go through [`Rect2::new`], so a stored negative
/// size is flipped and non-finite values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectFields")]
pub struct Rect2 {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Deserialize)]
struct RectFields {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl TryFrom<RectFields> for Rect2 {
    type Error = GeometryError;

    fn try_from(fields: RectFields) -> Result<Self, Self::Error> {
        let RectFields { x, y, w, h } = fields;
        if [x, y, w, h].iter().all(|v| v.is_finite()) {
            Ok(Rect2::new(x, y, w, h))
        } else {
            Err(GeometryError::NonFinite)
        }
    }
}

impl Rect2 {
    /// The zero-sized rectangle at the origin
    pub const EMPTY: Rect2 = Rect2 { x: 0.0, y: 0.0, w: 0.0, h: 0.0 };

    /// Create a rectangle. A negative width or height flips the rectangle
    /// so that the stored size is non-negative.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
        Self { x, y, w, h }
    }

    pub fn from_corners(a: Point2, b: Point2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// The smallest rectangle containing every point, or [`Rect2::EMPTY`]
    pub fn bbox_of_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::EMPTY;
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Self::from_corners(min, max)
    }

    /// The smallest rectangle containing every rectangle, or [`Rect2::EMPTY`]
    pub fn union_all<I>(rects: I) -> Self
    where
        I: IntoIterator<Item = Rect2>,
    {
        rects
            .into_iter()
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or(Self::EMPTY)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.w
    }

    pub fn height(&self) -> f64 {
        self.h
    }

    pub fn top_left(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point2 {
        Point2::new(self.x + self.w, self.y + self.h)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Point2 {
        self.top_left() + self.size() * 0.5
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn max_dimension(&self) -> f64 {
        self.w.max(self.h)
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Point2; 4] {
        let (l, t) = (self.x, self.y);
        let (r, b) = (self.x + self.w, self.y + self.h);
        [
            Point2::new(l, t),
            Point2::new(r, t),
            Point2::new(r, b),
            Point2::new(l, b),
        ]
    }

    /// The four edges, walking the corners in order
    pub fn edges(&self) -> [LineSegment2; 4] {
        let [a, b, c, d] = self.corners();
        [
            LineSegment2::new(a, b),
            LineSegment2::new(b, c),
            LineSegment2::new(c, d),
            LineSegment2::new(d, a),
        ]
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.w && p.y <= self.y + self.h
    }

    /// True if `other` lies entirely inside this rectangle (edges may touch)
    pub fn contains_rect(&self, other: &Rect2) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.w <= self.x + self.w
            && other.y + other.h <= self.y + self.h
    }

    /// True if the rectangles share at least one point
    pub fn intersects(&self, other: &Rect2) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }

    pub fn intersection(&self, other: &Rect2) -> Option<Rect2> {
        if !self.intersects(other) {
            return None;
        }
        let min = self.top_left().max(other.top_left());
        let max = self.bottom_right().min(other.bottom_right());
        Some(Rect2::from_corners(min, max))
    }

    pub fn union(&self, other: &Rect2) -> Rect2 {
        Rect2::from_corners(
            self.top_left().min(other.top_left()),
            self.bottom_right().max(other.bottom_right()),
        )
    }

    /// Expand by `margin` on every side. Shrinking stops at zero size.
    pub fn grown_by(&self, margin: f64) -> Rect2 {
        let w = (self.w + 2.0 * margin).max(0.0);
        let h = (self.h + 2.0 * margin).max(0.0);
        let c = self.center();
        Rect2::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
    }

    pub fn translated_by(&self, amount: Vec2) -> Rect2 {
        Rect2::new(self.x + amount.x, self.y + amount.y, self.w, self.h)
    }

    /// Split into `columns` x `rows` equal cells, row by row from the top-left.
    /// Returns nothing if either count is zero.
    pub fn divide_into_grid(&self, columns: usize, rows: usize) -> Vec<Rect2> {
        if columns == 0 || rows == 0 {
            return Vec::new();
        }

        let cell_w = self.w / columns as f64;
        let cell_h = self.h / rows as f64;
        let mut cells = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for col in 0..columns {
                cells.push(Rect2::new(
                    self.x + col as f64 * cell_w,
                    self.y + row as f64 * cell_h,
                    cell_w,
                    cell_h,
                ));
            }
        }
        cells
    }

    /// Bounding box of this rectangle after applying `transform`
    pub fn transformed_bounding_box(&self, transform: &Mat33) -> Rect2 {
        Rect2::bbox_of_points(self.corners().map(|c| transform.transform_point(c)))
    }

    pub fn eq_approx(&self, other: &Rect2, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.w - other.w).abs() <= tolerance
            && (self.h - other.h).abs() <= tolerance
    }
}

impl Default for Rect2 {
    fn default() -> Self {
        Self::EMPTY
    }
}
