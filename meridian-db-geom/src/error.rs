//! Error types for the geometry model.

use thiserror::Error;

/// Result type for geometry model operations.
pub type Result<T> = std::result::Result<T, GeomError>;

/// Geometry model errors.
#[derive(Error, Debug)]
pub enum GeomError {
    /// Ordinate storage length disagrees with the vertex count and
    /// dimensionality.
    #[error("point array length mismatch: expected {expected} ordinate slots, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A node's dimensionality disagrees with its container's.
    #[error("dimension mismatch in {0}")]
    DimensionMismatch(&'static str),
}
