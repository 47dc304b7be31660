//! Error types shared by the raster crates.

use thiserror::Error;

use crate::PixelRect;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors raised when a raster argument is malformed.
///
/// These are caller errors: they are returned eagerly and are never
/// recovered internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RasterError {
    /// Non-positive, infinite or NaN bounds.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// A requested area is not contained in the raster bounds.
    #[error("area {area} is outside raster bounds {bounds}")]
    AreaOutsideBounds { area: PixelRect, bounds: PixelRect },

    /// Two collaborators disagree on the number of bands.
    #[error("band count mismatch: expected {expected}, got {actual}")]
    BandMismatch { expected: usize, actual: usize },

    /// A configuration or construction parameter is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RasterError {
    /// Create an InvalidDomain error.
    pub fn invalid_domain(msg: impl Into<String>) -> Self {
        Self::InvalidDomain(msg.into())
    }

    /// Create an AreaOutsideBounds error.
    pub fn out_of_bounds(area: PixelRect, bounds: PixelRect) -> Self {
        Self::AreaOutsideBounds { area, bounds }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
