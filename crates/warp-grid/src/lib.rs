//! Tolerance-bounded approximations of coordinate transforms.
//!
//! Rasterizers map every destination pixel through a destination-to-source
//! transform. Evaluating an arbitrary transform per pixel is expensive, so
//! this crate replaces it with either a single affine map or a regular grid
//! of control points with bilinear interpolation between them, whichever
//! keeps the local error within a tolerance.
//!
//! - [`WarpBuilder`] runs the adaptive subdivision
//! - [`WarpApproximation`] is the result, and itself a [`projection::Transform`]
//! - [`ApproximationCache`] shares built approximations between callers
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warp_grid::{ApproximationCache, WarpConfig};
//!
//! let cache = ApproximationCache::new(WarpConfig::from_env())?;
//! let warp = cache.get_or_build(transform.clone(), tile_bounds)?;
//! let coords = warp.map_rect_batch(tile_bounds, 1, 1)?;
//! ```

pub mod approximation;
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;

pub use approximation::{WarpApproximation, WarpGrid};
pub use builder::WarpBuilder;
pub use cache::{ApproximationCache, CacheStats, WarpKey};
pub use config::WarpConfig;
pub use error::{Result, WarpError};
