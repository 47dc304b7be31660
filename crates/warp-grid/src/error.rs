//! Error types for warp approximation.

use raster_common::RasterError;
use thiserror::Error;

/// Errors surfaced by the warp builder and cache.
///
/// Transforms that cannot be approximated do not produce errors: the builder
/// falls back to a pointwise approximation instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WarpError {
    /// The domain or a configuration value is malformed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// The tolerance is not a finite positive number.
    #[error("invalid tolerance: {0}")]
    InvalidTolerance(f64),
}

/// Result type for warp operations.
pub type Result<T> = std::result::Result<T, WarpError>;
