//! Synthetic rasters for predictable, verifiable tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raster_common::{PixelRect, Raster};

use crate::fixtures::{domains, BUMP_VALUES};

/// The 3x3 single-band raster with a raised center pixel.
pub fn bump_raster() -> Raster<f64> {
    Raster::from_vec(domains::BUMP_SOURCE, 1, BUMP_VALUES.to_vec())
        .expect("bump fixture has a valid shape")
}

/// Creates a raster with predictable values.
///
/// Band `b` of pixel `(col, row)` holds `col * 1000 + row + b * 0.5`, so a
/// value identifies where it was read from.
pub fn create_test_raster(width: i64, height: i64, bands: usize) -> Raster<f64> {
    let mut data = Vec::with_capacity((width * height) as usize * bands);
    for row in 0..height {
        for col in 0..width {
            for b in 0..bands {
                data.push((col * 1000 + row) as f64 + b as f64 * 0.5);
            }
        }
    }
    Raster::from_vec(PixelRect::from_size(width, height), bands, data)
        .expect("generated raster has a valid shape")
}

/// Creates a smooth temperature-like field in Kelvin (250K to 310K).
pub fn create_temperature_raster(width: i64, height: i64) -> Raster<f32> {
    let mut data = Vec::with_capacity((width * height) as usize);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f32 / width.max(1) as f32;
            let y_factor = row as f32 / height.max(1) as f32;
            data.push(250.0 + x_factor * 30.0 + y_factor * 30.0);
        }
    }
    Raster::from_vec(PixelRect::from_size(width, height), 1, data)
        .expect("generated raster has a valid shape")
}

/// Creates a noisy multi-band raster with values in `[lo, hi)`.
///
/// Seeded, so every run sees the same data.
pub fn create_random_raster(
    bounds: PixelRect,
    bands: usize,
    lo: f64,
    hi: f64,
    seed: u64,
) -> Raster<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..bounds.area() * bands)
        .map(|_| rng.gen_range(lo..hi))
        .collect();
    Raster::from_vec(bounds, bands, data).expect("generated raster has a valid shape")
}

/// Seeded sample positions inside `[x0, x1) × [y0, y1)`.
pub fn sample_points(x0: f64, y0: f64, x1: f64, y1: f64, count: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.gen_range(x0..x1), rng.gen_range(y0..y1)))
        .collect()
}
