//! Raster resampling through arbitrary coordinate transforms.
//!
//! This crate provides:
//! - Interpolation kernels (neighbor, bilinear, two cubic variants, Lanczos)
//! - A separable engine applying a 1D kernel along rows then columns
//! - Border policies for coordinates near or beyond the source edge
//! - The [`Resample`] driver filling a pixel sink from a pixel source
//!
//! # Example
//!
//! ```ignore
//! use projection::AffineTransform;
//! use raster_common::{PixelRect, Raster};
//! use resample::{BorderPolicy, Kernel, Resample};
//!
//! let transform = AffineTransform::scale(0.5, 0.5);
//! let destination = Raster::<f32>::new(PixelRect::from_size(512, 512), 1)?;
//! let mut resample = Resample::new(
//!     &transform, &source, destination, None,
//!     Kernel::Bilinear, vec![f64::NAN], BorderPolicy::FillValue,
//! )?;
//! resample.fill_image();
//! ```

pub mod config;
pub mod error;
pub mod interpolation;
pub mod resample;
pub mod types;

pub use config::ResampleConfig;
pub use error::{ResampleError, Result};
pub use interpolation::{Interpolation, Kernel};
pub use resample::Resample;
pub use types::{BandExtrema, BorderPolicy, InterpolationMethod, ResampleStats};
