//! Configuration for the resampler.

use crate::error::{ResampleError, Result};
use crate::interpolation::Kernel;
use crate::types::{BorderPolicy, InterpolationMethod};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for a resample pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Interpolation method.
    pub interpolation: InterpolationMethod,

    /// Lanczos window order (N). Only used with `InterpolationMethod::Lanczos`.
    pub lanczos_order: usize,

    /// Border handling.
    pub border: BorderPolicy,

    /// Value written for pixels that cannot be interpolated.
    /// Applied to every band.
    pub fill_value: f64,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::Bilinear,
            lanczos_order: 3,
            border: BorderPolicy::FillValue,
            fill_value: 0.0,
        }
    }
}

impl ResampleConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RESAMPLE_INTERPOLATION") {
            config.interpolation = InterpolationMethod::from_str(&val);
        }

        if let Ok(val) = std::env::var("RESAMPLE_LANCZOS_ORDER") {
            match val.parse() {
                Ok(order) => config.lanczos_order = order,
                Err(_) => warn!(var = "RESAMPLE_LANCZOS_ORDER", value = %val, "Ignoring unparseable value"),
            }
        }

        if let Ok(val) = std::env::var("RESAMPLE_BORDER") {
            config.border = BorderPolicy::from_str(&val);
        }

        if let Ok(val) = std::env::var("RESAMPLE_FILL_VALUE") {
            match val.parse() {
                Ok(fill) => config.fill_value = fill,
                Err(_) => warn!(var = "RESAMPLE_FILL_VALUE", value = %val, "Ignoring unparseable value"),
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.interpolation == InterpolationMethod::Lanczos && self.lanczos_order == 0 {
            return Err("lanczos_order must be > 0".to_string());
        }

        if self.lanczos_order > 16 {
            return Err("lanczos_order must be <= 16".to_string());
        }

        Ok(())
    }

    /// The kernel described by this configuration.
    pub fn kernel(&self) -> Result<Kernel> {
        self.validate().map_err(ResampleError::invalid_kernel)?;
        Ok(Kernel::from_method(self.interpolation, self.lanczos_order))
    }

    /// One fill value per band.
    pub fn fill_values(&self, bands: usize) -> Vec<f64> {
        vec![self.fill_value; bands]
    }
}
