//! Configuration for warp building and caching.

use raster_common::RasterError;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, WarpError};

/// Configuration for a [`WarpBuilder`](crate::WarpBuilder) and its cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarpConfig {
    /// Maximum deviation, in destination units, tolerated at the corners of
    /// each affine piece.
    pub tolerance: f64,

    /// Subdivision gives up (pointwise fallback) before producing cells
    /// narrower than this, in destination pixels.
    pub min_cell_size: f64,

    /// Affine coefficients within this distance of an integer are snapped.
    pub affine_rounding_epsilon: f64,

    /// Total cost of approximations kept in the hot cache tier.
    pub cache_cost_budget: usize,

    /// Number of approximations kept in the cold tier after demotion.
    pub cache_cold_capacity: usize,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.25,
            min_cell_size: 4.0,
            affine_rounding_epsilon: 1e-10,
            cache_cost_budget: 65536,
            cache_cold_capacity: 256,
        }
    }
}

impl WarpConfig {
    /// Configuration with the given tolerance and defaults elsewhere.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse("WARP_TOLERANCE") {
            config.tolerance = v;
        }
        if let Some(v) = env_parse("WARP_MIN_CELL_SIZE") {
            config.min_cell_size = v;
        }
        if let Some(v) = env_parse("WARP_AFFINE_EPSILON") {
            config.affine_rounding_epsilon = v;
        }
        if let Some(v) = env_parse("WARP_CACHE_COST_BUDGET") {
            config.cache_cost_budget = v;
        }
        if let Some(v) = env_parse("WARP_CACHE_COLD_CAPACITY") {
            config.cache_cold_capacity = v;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(WarpError::InvalidTolerance(self.tolerance));
        }

        if !(self.min_cell_size >= 1.0) || !self.min_cell_size.is_finite() {
            return Err(RasterError::invalid_config("min_cell_size must be >= 1").into());
        }

        if !(self.affine_rounding_epsilon >= 0.0) {
            return Err(RasterError::invalid_config("affine_rounding_epsilon must be >= 0").into());
        }

        if self.cache_cost_budget == 0 {
            return Err(RasterError::invalid_config("cache_cost_budget must be > 0").into());
        }

        if self.cache_cold_capacity == 0 {
            return Err(RasterError::invalid_config("cache_cold_capacity must be > 0").into());
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    let val = std::env::var(var).ok()?;
    match val.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var, value = %val, "Ignoring unparseable value");
            None
        }
    }
}
