//! Common types shared by the resampling and warp crates.
//!
//! - [`PixelRect`]: integer pixel rectangles with exclusive upper bounds
//! - [`PixelSource`] / [`PixelSink`]: random-access sample contracts
//! - [`Raster`]: an in-memory, multi-band, typed implementation of both

pub mod error;
pub mod raster;
pub mod rect;

pub use error::{RasterError, RasterResult};
pub use raster::{PixelSink, PixelSource, Raster, Sample};
pub use rect::PixelRect;
