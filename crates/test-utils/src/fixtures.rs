//! Common test fixtures for resampling and warp tests.

/// Source/destination domains used across the test suite.
pub mod domains {
    use raster_common::PixelRect;

    /// The 3x3 source of the golden resample tests.
    pub const BUMP_SOURCE: PixelRect = PixelRect::new(0, 0, 3, 3);

    /// Its 3x upscaled destination.
    pub const BUMP_DESTINATION: PixelRect = PixelRect::new(0, 0, 9, 9);

    /// A typical rendering tile.
    pub const TILE: PixelRect = PixelRect::new(0, 0, 256, 256);

    /// A tile whose origin is not at zero.
    pub const OFFSET_TILE: PixelRect = PixelRect::new(-128, 64, 256, 128);
}

/// Source values of the golden resample tests: a single raised pixel.
pub const BUMP_VALUES: [f64; 9] = [
    1.0, 1.0, 1.0, //
    1.0, 2.0, 1.0, //
    1.0, 1.0, 1.0,
];

/// The bump resampled through a 3x upscale with nearest-neighbor
/// interpolation, fill value 0 outside the exact-fit region.
#[rustfmt::skip]
pub const BUMP_NEIGHBOR_3X: [f64; 81] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
    0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
    0.0, 1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 0.0,
    0.0, 1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 0.0,
    0.0, 1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 0.0,
    0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
    0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];

const B1: f64 = 1.0 + 1.0 / 9.0;
const B2: f64 = 1.0 + 2.0 / 9.0;
const B3: f64 = 1.0 + 1.0 / 3.0;
const B4: f64 = 1.0 + 4.0 / 9.0;
const B6: f64 = 1.0 + 2.0 / 3.0;

/// The bump resampled through a 3x upscale with bilinear interpolation.
#[rustfmt::skip]
pub const BUMP_BILINEAR_3X: [f64; 81] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
    0.0, 1.0, B1,  B2,  B3,  B2,  B1,  1.0, 0.0,
    0.0, 1.0, B2,  B4,  B6,  B4,  B2,  1.0, 0.0,
    0.0, 1.0, B3,  B6,  2.0, B6,  B3,  1.0, 0.0,
    0.0, 1.0, B2,  B4,  B6,  B4,  B2,  1.0, 0.0,
    0.0, 1.0, B1,  B2,  B3,  B2,  B1,  1.0, 0.0,
    0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];
