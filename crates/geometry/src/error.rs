//! Error types for geometry operations

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Matrix is not invertible (determinant {0})")]
    NonInvertible(f64),

    #[error("Rectangle has a non-finite coordinate")]
    NonFinite,
}

pub type Result<T> = std::result::Result<T, GeometryError>;
