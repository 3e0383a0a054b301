//! Error types for the blob codec.
//!
//! Recoverable conditions are not errors here: `peek_gbox` and friends
//! return `Option` when a shape is too complex to peek, and `get_gbox`
//! returns `None` for empty geometries.

use meridian_db_geom::GeomError;
use thiserror::Error;

/// Result type for blob codec operations.
pub type Result<T> = std::result::Result<T, BlobError>;

/// Blob codec errors. All variants are fatal for the current operation.
#[derive(Error, Debug)]
pub enum BlobError {
    /// A node's vertex dimensionality disagrees with its container's flags.
    #[error("dimension mismatch in {0}")]
    DimensionMismatch(&'static str),

    /// Type code outside the recognized set.
    #[error("unknown geometry type code: {0}")]
    UnknownType(u32),

    /// A collection carries a child the compatibility table forbids.
    #[error("invalid subtype ({child}) for collection type ({parent})")]
    InvalidSubtype {
        parent: &'static str,
        child: &'static str,
    },

    /// The encoder's post-write cursor disagrees with the size oracle.
    #[error("serialized size mismatch: wrote {written} bytes, expected {expected}")]
    SizeMismatch { expected: usize, written: usize },

    /// The geometry does not fit the 30-bit size field.
    #[error("serialized size {0} exceeds the format limit")]
    TooLarge(usize),

    /// A read ran off the end of the blob.
    #[error("truncated blob: need {need} bytes at offset {at}, have {have}")]
    Truncated {
        at: usize,
        need: usize,
        have: usize,
    },

    /// The buffer length disagrees with the stored size word.
    #[error("blob length {actual} disagrees with stored size {stored}")]
    BadLength { stored: usize, actual: usize },

    /// Geometry model error surfaced during encode or decode.
    #[error(transparent)]
    Geom(#[from] GeomError),
}
