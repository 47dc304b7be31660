//! Error types for resampling.

use projection::TransformError;
use raster_common::RasterError;
use thiserror::Error;

/// Errors that can occur while setting up a resample.
///
/// Per-pixel transform failures are not errors: the affected pixels receive
/// the fill value and the pass continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResampleError {
    /// A raster argument is malformed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A transform needed during setup failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The border policy cannot be used with this construction.
    #[error("unsupported border policy: {0}")]
    UnsupportedBorder(String),

    /// The number of fill values does not match the band count.
    #[error("expected {expected} fill value(s), got {actual}")]
    FillValueCount { expected: usize, actual: usize },

    /// A kernel parameter is unusable.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),
}

impl ResampleError {
    /// Create an UnsupportedBorder error.
    pub fn unsupported_border(msg: impl Into<String>) -> Self {
        Self::UnsupportedBorder(msg.into())
    }

    /// Create an InvalidKernel error.
    pub fn invalid_kernel(msg: impl Into<String>) -> Self {
        Self::InvalidKernel(msg.into())
    }
}

/// Result type for resample operations.
pub type Result<T> = std::result::Result<T, ResampleError>;
