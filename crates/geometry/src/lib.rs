//! Geometry - Immutable value types shared by the document model
//!
//! Points and vectors are `glam::DVec2`. On top of that this crate provides an
//! axis-aligned rectangle, a line segment and a 3x3 affine transform, which is
//! everything the document model needs for bounding boxes, hit-testing and
//! reversible transformations.

mod error;
mod mat33;
mod rect;
mod segment;

pub use error::*;
pub use mat33::*;
pub use rect::*;
pub use segment::*;

pub use glam;

/// A position in document coordinates
pub type Point2 = glam::DVec2;

/// A displacement in document coordinates
pub type Vec2 = glam::DVec2;

/// Tolerance used by the approximate comparisons in this crate
pub const EPSILON: f64 = 1e-8;
