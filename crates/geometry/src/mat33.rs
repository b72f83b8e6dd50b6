//! 3x3 affine transformation matrix

use crate::{GeometryError, Point2, Result, Vec2, EPSILON};
use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Row-major array form of a [`Mat33`], as used in serialized envelopes
pub type Mat33Array = [f64; 9];

/// A 3x3 matrix representing an affine transformation of the plane.
///
/// Points are treated as column vectors `(x, y, 1)`, so `a.right_mul(&b)`
/// applies `b` first and then `a`. Serializes as a row-major array of nine
/// numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Mat33Array", into = "Mat33Array")]
pub struct Mat33(DMat3);

impl Mat33 {
    /// The neutral element of composition
    pub const IDENTITY: Mat33 = Mat33(DMat3::IDENTITY);

    /// Create a matrix from its entries, given row by row
    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub fn new(
        a1: f64, a2: f64, a3: f64,
        b1: f64, b2: f64, b3: f64,
        c1: f64, c2: f64, c3: f64,
    ) -> Self {
        Self(DMat3::from_cols(
            DVec3::new(a1, b1, c1),
            DVec3::new(a2, b2, c2),
            DVec3::new(a3, b3, c3),
        ))
    }

    /// Create a matrix from a row-major array
    pub fn from_array(values: Mat33Array) -> Self {
        let [a1, a2, a3, b1, b2, b3, c1, c2, c3] = values;
        Self::new(a1, a2, a3, b1, b2, b3, c1, c2, c3)
    }

    /// Row-major entries of this matrix
    pub fn to_array(&self) -> Mat33Array {
        let (r0, r1, r2) = (self.0.row(0), self.0.row(1), self.0.row(2));
        [r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z]
    }

    /// A transform that moves every point by `amount`
    pub fn translation(amount: Vec2) -> Self {
        Self(DMat3::from_translation(amount))
    }

    /// A uniform scale by `factor` about `center`
    pub fn scaling_2d(factor: f64, center: Point2) -> Self {
        Self::about(center, DMat3::from_scale(Vec2::splat(factor)))
    }

    /// A counter-clockwise rotation by `radians` about `center`
    pub fn z_rotation(radians: f64, center: Point2) -> Self {
        Self::about(center, DMat3::from_angle(radians))
    }

    fn about(center: Point2, inner: DMat3) -> Self {
        Self(DMat3::from_translation(center) * inner * DMat3::from_translation(-center))
    }

    /// Returns `self * other`: the transform that applies `other`, then `self`
    pub fn right_mul(&self, other: &Mat33) -> Mat33 {
        Mat33(self.0 * other.0)
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Returns the inverse transform, or an error if this matrix is singular
    pub fn inverse(&self) -> Result<Mat33> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return Err(GeometryError::NonInvertible(det));
        }
        Ok(Mat33(self.0.inverse()))
    }

    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() >= EPSILON
    }

    /// Apply this transform to a point (translation included)
    pub fn transform_point(&self, point: Point2) -> Point2 {
        self.0.transform_point2(point)
    }

    /// Apply this transform to a direction (translation ignored)
    pub fn transform_vec2(&self, vector: Vec2) -> Vec2 {
        self.0.transform_vector2(vector)
    }

    pub fn is_identity(&self) -> bool {
        self.eq_approx(&Mat33::IDENTITY, EPSILON)
    }

    /// Entry-wise comparison within `tolerance`
    pub fn eq_approx(&self, other: &Mat33, tolerance: f64) -> bool {
        self.0.abs_diff_eq(other.0, tolerance)
    }

    /// Rotation angle in radians extracted from the linear part
    pub fn rotation_angle(&self) -> f64 {
        let x_axis = self.transform_vec2(Vec2::X);
        x_axis.y.atan2(x_axis.x)
    }
}

impl Default for Mat33 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat33 {
    type Output = Mat33;

    fn mul(self, rhs: Mat33) -> Mat33 {
        self.right_mul(&rhs)
    }
}

impl From<Mat33Array> for Mat33 {
    fn from(values: Mat33Array) -> Self {
        Self::from_array(values)
    }
}

impl From<Mat33> for Mat33Array {
    fn from(mat: Mat33) -> Self {
        mat.to_array()
    }
}

impl std::fmt::Display for Mat33 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a1, a2, a3, b1, b2, b3, c1, c2, c3] = self.to_array();
        write!(f, "⎡{a1} {a2} {a3}⎤ ⎢{b1} {b2} {b3}⎥ ⎣{c1} {c2} {c3}⎦")
    }
}
