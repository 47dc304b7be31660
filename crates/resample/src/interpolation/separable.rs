//! Window placement and the generic row-then-column reduction.

use raster_common::{PixelRect, PixelSource};

use super::Kernel;

/// First window index on one axis.
///
/// `u` is an index coordinate (`x - 0.5`). The window of `side` samples
/// starts at `floor(u) - (side/2 - 1)`, then shifts to stay inside
/// `[min, max)`. `side` must not exceed `max - min`.
pub fn window_origin(u: f64, side: usize, min: i64, max: i64) -> i64 {
    let side = side as i64;
    let upper = (max - side).max(min);
    let start = u.floor() - (side / 2 - 1) as f64;
    if !(start > min as f64) {
        min
    } else if start >= upper as f64 {
        upper
    } else {
        start as i64
    }
}

/// One axis of the window: the kernel fitted to the source extent and the
/// number of samples it reads.
#[derive(Debug, Clone, Copy)]
struct Axis {
    kernel: Kernel,
    side: usize,
}

impl Axis {
    fn new(kernel: Kernel, extent: i64) -> Self {
        let kernel = kernel.fitted(extent);
        Self {
            kernel,
            side: kernel.side().max(1),
        }
    }
}

/// Per-call window origin and scratch buffers sized to the kernel support.
///
/// On an axis where the source is narrower than the kernel window, the
/// window shrinks to the samples that exist and a lower-order kernel of the
/// same family is applied to them.
#[derive(Debug, Clone)]
pub struct SeparableState {
    x: Axis,
    y: Axis,
    min_x: i64,
    min_y: i64,
    row: Vec<f64>,
    column: Vec<f64>,
}

impl SeparableState {
    pub fn new(kernel: Kernel, bounds: &PixelRect) -> Self {
        let x = Axis::new(kernel, bounds.width);
        let y = Axis::new(kernel, bounds.height);
        Self {
            x,
            y,
            min_x: bounds.x,
            min_y: bounds.y,
            row: vec![0.0; x.side],
            column: vec![0.0; y.side],
        }
    }

    /// Kernels applied along rows and along columns.
    pub fn kernels(&self) -> (Kernel, Kernel) {
        (self.x.kernel, self.y.kernel)
    }

    /// Current window origin.
    pub fn origin(&self) -> (i64, i64) {
        (self.min_x, self.min_y)
    }

    /// Place the window for index coordinates `(u, v)`.
    pub fn place(&mut self, bounds: &PixelRect, u: f64, v: f64) {
        self.min_x = window_origin(u, self.x.side, bounds.x, bounds.max_x());
        self.min_y = window_origin(v, self.y.side, bounds.y, bounds.max_y());
    }

    /// Reduce each window row with the row kernel, then the column of row
    /// results with the column kernel. The window must have been placed for
    /// `(u, v)`.
    pub fn reduce<S: PixelSource + ?Sized>(&mut self, source: &S, band: usize, u: f64, v: f64) -> f64 {
        for r in 0..self.y.side {
            let sy = self.min_y + r as i64;
            for c in 0..self.x.side {
                self.row[c] = source.sample(band, self.min_x + c as i64, sy);
            }
            self.column[r] = self.x.kernel.interpolate_1d(self.min_x as f64, u, &self.row);
        }
        self.y.kernel.interpolate_1d(self.min_y as f64, v, &self.column)
    }
}
