use crate::models::GridPos;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SetVisionError>;

/// Failures of a single analysis run. None of them are retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetVisionError {
    /// Card blob count after size filtering differs from the expected layout
    #[error("detected {found} card blobs, expected {expected}")]
    DetectionCount {
        /// Blobs that survived the size filter
        found: usize,
        /// Cards the layout must contain
        expected: usize,
    },

    /// Twelve blobs were found but they do not form a 3x4 grid
    #[error("card blobs do not form a 3x4 grid: {reason}")]
    InconsistentGrid {
        /// Human readable cause
        reason: String,
    },

    /// A classifier saw a pattern outside its mapping
    #[error("{classifier} classifier is ambiguous at {pos}: {detail}")]
    ClassificationAmbiguity {
        /// Classifier name (`count`, `texture`, `color`, `shape`)
        classifier: &'static str,
        /// Grid cell of the offending card
        pos: GridPos,
        /// What was observed
        detail: String,
    },

    /// The raster is too small for a sampling window
    #[error("raster too small: {detail}")]
    InputShape {
        /// Which window left the raster
        detail: String,
    },

    /// Structuring elements must have an odd, non-zero side length
    #[error("structuring element side must be odd and non-zero, got {size}")]
    InvalidStructuringElement {
        /// Rejected side length
        size: usize,
    },

    /// Pixel buffer length does not match the stated dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Bytes implied by width, height and channel count
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },
}
