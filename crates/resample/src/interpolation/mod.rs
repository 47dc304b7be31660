//! Interpolation of source samples at non-integer coordinates.
//!
//! Coordinates are continuous: pixel `(i, j)` covers `[i, i+1) × [j, j+1)`
//! and its center is `(i + 0.5, j + 0.5)`. Every kernel returns the source
//! sample exactly at pixel centers.
//!
//! All kernels except [`Kernel::Neighbor`] are applied separably: each row
//! of the support window is reduced with the 1D kernel, then the resulting
//! column is reduced the same way.

pub mod bicubic;
pub mod bilinear;
pub mod lanczos;
pub mod neighbor;
pub mod separable;

use raster_common::{PixelRect, PixelSource, RasterError};

use crate::error::{ResampleError, Result};
use crate::types::{BandExtrema, BorderPolicy, InterpolationMethod};
use separable::SeparableState;

/// Largest accepted Lanczos order.
pub const MAX_LANCZOS_ORDER: usize = 16;

/// Interpolation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kernel {
    /// Value of the pixel containing the coordinate.
    Neighbor,
    /// Linear along each axis over a 2x2 window.
    #[default]
    Bilinear,
    /// Lagrange cubic over a 4x4 window.
    BiCubic,
    /// Catmull-Rom cubic over a 4x4 window.
    BiCubic2,
    /// Normalized windowed sinc over a 2N x 2N window.
    Lanczos { order: usize },
}

impl Kernel {
    /// Kernel for a configured method.
    pub fn from_method(method: InterpolationMethod, lanczos_order: usize) -> Self {
        match method {
            InterpolationMethod::Nearest => Self::Neighbor,
            InterpolationMethod::Bilinear => Self::Bilinear,
            InterpolationMethod::Bicubic => Self::BiCubic,
            InterpolationMethod::Bicubic2 => Self::BiCubic2,
            InterpolationMethod::Lanczos => Self::Lanczos { order: lanczos_order },
        }
    }

    /// Side of the square window the kernel reads.
    pub fn side(&self) -> usize {
        match self {
            Self::Neighbor => 0,
            Self::Bilinear => 2,
            Self::BiCubic | Self::BiCubic2 => 4,
            Self::Lanczos { order } => 2 * order,
        }
    }

    /// Highest-order kernel of the same family whose window fits in
    /// `extent` samples along one axis.
    ///
    /// Cubic kernels fall back to bilinear and Lanczos lowers its order.
    /// Any kernel falls back to neighbor on a single sample.
    pub fn fitted(self, extent: i64) -> Self {
        if extent < 2 {
            return Self::Neighbor;
        }
        match self {
            Self::BiCubic | Self::BiCubic2 if extent < 4 => Self::Bilinear,
            Self::Lanczos { order } => Self::Lanczos {
                order: order.min((extent / 2) as usize),
            },
            kernel => kernel,
        }
    }

    /// Whether results are clamped to the source band range.
    ///
    /// Cubic and sinc kernels overshoot near steep edges.
    pub fn clamps_to_range(&self) -> bool {
        matches!(self, Self::BiCubic | Self::BiCubic2 | Self::Lanczos { .. })
    }

    /// Reject unusable parameters.
    pub fn validate(&self) -> Result<()> {
        if let Self::Lanczos { order } = self {
            if *order == 0 || *order > MAX_LANCZOS_ORDER {
                return Err(ResampleError::invalid_kernel(format!(
                    "lanczos order {order} is outside 1..={MAX_LANCZOS_ORDER}"
                )));
            }
        }
        Ok(())
    }

    /// Apply the 1D kernel to `values`, the first of which sits at index
    /// `t0`, at index coordinate `t`.
    pub fn interpolate_1d(&self, t0: f64, t: f64, values: &[f64]) -> f64 {
        match self {
            Self::Neighbor => neighbor::interpolate_1d(t0, t, values),
            Self::Bilinear => bilinear::interpolate_1d(t0, t, values),
            Self::BiCubic => bicubic::lagrange_1d(t0, t, values),
            Self::BiCubic2 => bicubic::catmull_rom_1d(t0, t, values),
            Self::Lanczos { order } => lanczos::interpolate_1d(*order, t0, t, values),
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neighbor => write!(f, "neighbor"),
            Self::Bilinear => write!(f, "bilinear"),
            Self::BiCubic => write!(f, "bicubic"),
            Self::BiCubic2 => write!(f, "bicubic2"),
            Self::Lanczos { order } => write!(f, "lanczos{order}"),
        }
    }
}

/// A kernel bound to a pixel source.
///
/// Holds the band ranges read from the source at construction and the
/// scratch window, so a single instance must not be shared between threads.
/// Create one per concurrent reader instead.
pub struct Interpolation<'a, S: PixelSource + ?Sized> {
    source: &'a S,
    kernel: Kernel,
    border: BorderPolicy,
    bounds: PixelRect,
    ranges: Vec<(f64, f64)>,
    state: SeparableState,
}

impl<'a, S: PixelSource + ?Sized> Interpolation<'a, S> {
    /// Bind `kernel` to `source`.
    ///
    /// Fails if the source bounds are empty, the source has no bands, a
    /// band range is malformed or the kernel parameters are unusable.
    pub fn new(source: &'a S, kernel: Kernel, border: BorderPolicy) -> Result<Self> {
        kernel.validate()?;
        let bounds = source.bounds();
        bounds.validate()?;

        let bands = source.num_bands();
        if bands == 0 {
            return Err(RasterError::invalid_config("source has no bands").into());
        }

        let ranges: Vec<(f64, f64)> = (0..bands).map(|b| source.range(b)).collect();
        for (band, &(lo, hi)) in ranges.iter().enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(RasterError::invalid_config(format!(
                    "band {band} has malformed range [{lo}, {hi}]"
                ))
                .into());
            }
        }

        Ok(Self {
            source,
            kernel,
            border,
            bounds,
            ranges,
            state: SeparableState::new(kernel, &bounds),
        })
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn border(&self) -> BorderPolicy {
        self.border
    }

    /// Source bounds.
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    pub fn num_bands(&self) -> usize {
        self.ranges.len()
    }

    /// Declared range of `band`, as read at construction.
    pub fn range(&self, band: usize) -> (f64, f64) {
        self.ranges[band]
    }

    /// Whether `(x, y)` may be interpolated under the border policy.
    ///
    /// Always true for `Extrapolation`. Otherwise the coordinate must lie in
    /// `[min + 0.5, max - 0.5]` on both axes, where every kernel sees only
    /// real samples around the position.
    pub fn check_interpolate(&self, x: f64, y: f64) -> bool {
        match self.border {
            BorderPolicy::Extrapolation => true,
            BorderPolicy::FillValue | BorderPolicy::Crop => {
                x >= self.bounds.x as f64 + 0.5
                    && x <= self.bounds.max_x() as f64 - 0.5
                    && y >= self.bounds.y as f64 + 0.5
                    && y <= self.bounds.max_y() as f64 - 0.5
            }
        }
    }

    /// Interpolated value of `band` at `(x, y)`.
    ///
    /// # Panics
    /// If `band` is not a band of the source.
    pub fn interpolate(&mut self, x: f64, y: f64, band: usize) -> f64 {
        let range = self.ranges[band];
        if self.kernel == Kernel::Neighbor {
            let (px, py) = self.nearest(x, y);
            return self.source.sample(band, px, py);
        }

        let (u, v) = (x - 0.5, y - 0.5);
        self.state.place(&self.bounds, u, v);
        let value = self.state.reduce(self.source, band, u, v);
        self.clamp(value, range)
    }

    /// Interpolated values of every band at `(x, y)`.
    pub fn interpolate_all(&mut self, x: f64, y: f64) -> Vec<f64> {
        let mut out = vec![0.0; self.num_bands()];
        self.fill_bands(x, y, &mut out);
        out
    }

    /// Write the interpolated value of every band at `(x, y)` into `out`.
    ///
    /// `out` must hold exactly one slot per band.
    pub fn interpolate_into(&mut self, x: f64, y: f64, out: &mut [f64]) -> Result<()> {
        if out.len() != self.num_bands() {
            return Err(RasterError::BandMismatch {
                expected: self.num_bands(),
                actual: out.len(),
            }
            .into());
        }
        self.fill_bands(x, y, out);
        Ok(())
    }

    fn fill_bands(&mut self, x: f64, y: f64, out: &mut [f64]) {
        if self.kernel == Kernel::Neighbor {
            let (px, py) = self.nearest(x, y);
            for (band, slot) in out.iter_mut().enumerate() {
                *slot = self.source.sample(band, px, py);
            }
            return;
        }

        // Same window and reduction order as the single-band form.
        let (u, v) = (x - 0.5, y - 0.5);
        self.state.place(&self.bounds, u, v);
        for (band, slot) in out.iter_mut().enumerate() {
            let value = self.state.reduce(self.source, band, u, v);
            *slot = self.clamp(value, self.ranges[band]);
        }
    }

    fn nearest(&self, x: f64, y: f64) -> (i64, i64) {
        (
            neighbor::nearest_index(x, self.bounds.x, self.bounds.max_x()),
            neighbor::nearest_index(y, self.bounds.y, self.bounds.max_y()),
        )
    }

    fn clamp(&self, value: f64, (lo, hi): (f64, f64)) -> f64 {
        if !self.kernel.clamps_to_range() {
            return value;
        }
        if value < lo {
            lo
        } else if value > hi {
            hi
        } else {
            value
        }
    }

    /// Per-band extrema over `area`, or the whole source when `None`.
    ///
    /// Samples are scanned in row-major order and the first occurrence of
    /// each extreme wins. NaN samples are skipped; a band with no numeric
    /// sample reports NaN extrema at the area origin.
    pub fn min_max(&self, area: Option<PixelRect>) -> Result<Vec<BandExtrema>> {
        let area = match area {
            Some(area) => {
                area.validate()?;
                if !self.bounds.contains_rect(&area) {
                    return Err(RasterError::out_of_bounds(area, self.bounds).into());
                }
                area
            }
            None => self.bounds,
        };

        let mut extrema = vec![
            BandExtrema {
                min: f64::NAN,
                min_x: area.x,
                min_y: area.y,
                max: f64::NAN,
                max_x: area.x,
                max_y: area.y,
            };
            self.num_bands()
        ];

        for y in area.y..area.max_y() {
            for x in area.x..area.max_x() {
                for (band, e) in extrema.iter_mut().enumerate() {
                    let v = self.source.sample(band, x, y);
                    if v.is_nan() {
                        continue;
                    }
                    if e.min.is_nan() || v < e.min {
                        e.min = v;
                        e.min_x = x;
                        e.min_y = y;
                    }
                    if e.max.is_nan() || v > e.max {
                        e.max = v;
                        e.max_x = x;
                        e.max_y = y;
                    }
                }
            }
        }

        Ok(extrema)
    }
}
