//! Core types for resampling.

use serde::{Deserialize, Serialize};

/// Interpolation method, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Nearest neighbor (preserves exact values).
    Nearest,
    /// Bilinear interpolation (smooth, bounded by the four neighbors).
    #[default]
    Bilinear,
    /// Lagrange cubic through four samples.
    Bicubic,
    /// Catmull-Rom cubic convolution.
    Bicubic2,
    /// Windowed sinc.
    Lanczos,
}

impl InterpolationMethod {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" | "neighbor" => Self::Nearest,
            "cubic" | "bicubic" => Self::Bicubic,
            "bicubic2" | "catmull-rom" => Self::Bicubic2,
            "lanczos" => Self::Lanczos,
            _ => Self::Bilinear,
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
            Self::Bicubic => write!(f, "bicubic"),
            Self::Bicubic2 => write!(f, "bicubic2"),
            Self::Lanczos => write!(f, "lanczos"),
        }
    }
}

/// What to produce where the mapped source coordinate is outside, or near the
/// edge of, valid source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderPolicy {
    /// Always interpolate; the kernel window is shifted to stay in bounds.
    Extrapolation,
    /// Write the fill value outside the exact-fit region.
    #[default]
    #[serde(rename = "fill")]
    FillValue,
    /// Like `FillValue`, and shrink an auto-sized destination to the exact-fit
    /// region. Only valid when the destination is allocated by the resampler.
    Crop,
}

impl BorderPolicy {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "extrapolation" | "extrapolate" => Self::Extrapolation,
            "crop" => Self::Crop,
            _ => Self::FillValue,
        }
    }
}

impl std::fmt::Display for BorderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extrapolation => write!(f, "extrapolation"),
            Self::FillValue => write!(f, "fill"),
            Self::Crop => write!(f, "crop"),
        }
    }
}

/// Extreme values of one band and where they were first found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandExtrema {
    pub min: f64,
    pub min_x: i64,
    pub min_y: i64,
    pub max: f64,
    pub max_x: i64,
    pub max_y: i64,
}

/// Counters reported by a fill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResampleStats {
    /// Destination pixels visited.
    pub pixels: usize,
    /// Pixels written from the kernel.
    pub interpolated: usize,
    /// Pixels written with the fill value.
    pub filled: usize,
    /// Pixels whose transform evaluation failed (included in `filled`).
    pub transform_failures: usize,
}
