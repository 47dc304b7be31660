//! Approximations of a destination-to-source transform.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Matrix2, Point2, Vector2};
use projection::{AffineTransform, Jacobian, Transform, TransformError, TransformResult};
use raster_common::{PixelRect, RasterError};

/// Fixed cost of any cached approximation.
pub const BASE_COST: usize = 4;

/// A regular lattice of control points with bilinear interpolation between
/// them.
///
/// Control points are the true transform evaluated at
/// `origin + (i·step_x, j·step_y)` for `i in 0..=cells_x`, `j in 0..=cells_y`,
/// stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpGrid {
    origin: Point2<f64>,
    step_x: f64,
    step_y: f64,
    cells_x: usize,
    cells_y: usize,
    control: Vec<Point2<f64>>,
}

impl WarpGrid {
    pub fn new(
        origin: Point2<f64>,
        step_x: f64,
        step_y: f64,
        cells_x: usize,
        cells_y: usize,
        control: Vec<Point2<f64>>,
    ) -> Result<Self, RasterError> {
        if cells_x == 0 || cells_y == 0 {
            return Err(RasterError::invalid_domain("grid needs at least one cell"));
        }
        if !(step_x > 0.0 && step_y > 0.0 && step_x.is_finite() && step_y.is_finite()) {
            return Err(RasterError::invalid_domain(format!(
                "grid steps ({step_x}, {step_y}) must be finite and positive"
            )));
        }
        let expected = (cells_x + 1) * (cells_y + 1);
        if control.len() != expected {
            return Err(RasterError::invalid_config(format!(
                "grid of {cells_x}x{cells_y} cells needs {expected} control points, got {}",
                control.len()
            )));
        }
        Ok(Self {
            origin,
            step_x,
            step_y,
            cells_x,
            cells_y,
            control,
        })
    }

    pub fn origin(&self) -> Point2<f64> {
        self.origin
    }

    pub fn step_x(&self) -> f64 {
        self.step_x
    }

    pub fn step_y(&self) -> f64 {
        self.step_y
    }

    pub fn cells_x(&self) -> usize {
        self.cells_x
    }

    pub fn cells_y(&self) -> usize {
        self.cells_y
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.cells_x * self.cells_y
    }

    /// Control points, row-major.
    pub fn control_points(&self) -> &[Point2<f64>] {
        &self.control
    }

    /// Source coordinate of lattice node `(i, j)`.
    pub fn control_point(&self, i: usize, j: usize) -> Point2<f64> {
        self.control[j * (self.cells_x + 1) + i]
    }

    /// Cell containing `p` (clamped to the lattice) and the fractional
    /// position inside it. Outside the lattice the fraction leaves `[0, 1]`
    /// and the edge cell extrapolates.
    fn locate(&self, p: Point2<f64>) -> (usize, usize, f64, f64) {
        let gx = (p.x - self.origin.x) / self.step_x;
        let gy = (p.y - self.origin.y) / self.step_y;
        let i = clamp_cell(gx, self.cells_x);
        let j = clamp_cell(gy, self.cells_y);
        (i, j, gx - i as f64, gy - j as f64)
    }

    /// Bilinear interpolation between the control points around `p`.
    pub fn map_point(&self, p: Point2<f64>) -> Point2<f64> {
        let (i, j, fx, fy) = self.locate(p);
        let p00 = self.control_point(i, j).coords;
        let p10 = self.control_point(i + 1, j).coords;
        let p01 = self.control_point(i, j + 1).coords;
        let p11 = self.control_point(i + 1, j + 1).coords;

        let top = p00 + (p10 - p00) * fx;
        let bottom = p01 + (p11 - p01) * fx;
        Point2::from(top + (bottom - top) * fy)
    }

    /// Jacobian of the bilinear patch at `p`.
    pub fn jacobian(&self, p: Point2<f64>) -> Jacobian {
        let (i, j, fx, fy) = self.locate(p);
        let p00 = self.control_point(i, j).coords;
        let p10 = self.control_point(i + 1, j).coords;
        let p01 = self.control_point(i, j + 1).coords;
        let p11 = self.control_point(i + 1, j + 1).coords;

        let dx: Vector2<f64> = ((p10 - p00) * (1.0 - fy) + (p11 - p01) * fy) / self.step_x;
        let dy: Vector2<f64> = ((p01 - p00) * (1.0 - fx) + (p11 - p10) * fx) / self.step_y;
        Matrix2::from_columns(&[dx, dy])
    }
}

fn clamp_cell(g: f64, cells: usize) -> usize {
    let last = cells - 1;
    let cell = g.floor();
    if !(cell > 0.0) {
        0
    } else if cell >= last as f64 {
        last
    } else {
        cell as usize
    }
}

/// A destination-to-source mapping ready for rasterization.
///
/// Once built an approximation is immutable, so it can be shared behind an
/// `Arc` by every caller of the cache.
#[derive(Clone)]
pub enum WarpApproximation {
    /// A single affine map over the whole domain.
    Affine(AffineTransform),
    /// Bilinear interpolation over a regular lattice of control points.
    Grid(WarpGrid),
    /// The original transform, called for every point.
    Pointwise(Arc<dyn Transform>),
}

impl WarpApproximation {
    /// Map one destination point to source space.
    pub fn map_point(&self, p: Point2<f64>) -> TransformResult<Point2<f64>> {
        match self {
            Self::Affine(affine) => Ok(affine.apply(p)),
            Self::Grid(grid) => Ok(grid.map_point(p)),
            Self::Pointwise(transform) => transform.evaluate(p),
        }
    }

    /// Source coordinates of the pixel centers of `rect`, sampled every
    /// `period_x` columns and `period_y` rows.
    ///
    /// Returns interleaved `[sx, sy, sx, sy, ...]`, row-major. Sample `(i, j)`
    /// maps destination point `(x + i·period_x + 0.5, y + j·period_y + 0.5)`.
    pub fn map_rect_batch(
        &self,
        rect: PixelRect,
        period_x: usize,
        period_y: usize,
    ) -> TransformResult<Vec<f64>> {
        if period_x == 0 || period_y == 0 {
            return Err(TransformError::Failed(
                "sampling period must be positive".to_string(),
            ));
        }
        rect.validate()
            .map_err(|e| TransformError::Failed(e.to_string()))?;

        let nx = (rect.width as usize).div_ceil(period_x);
        let ny = (rect.height as usize).div_ceil(period_y);
        let points: Vec<Point2<f64>> = (0..ny)
            .flat_map(|j| {
                let y = (rect.y + (j * period_y) as i64) as f64 + 0.5;
                (0..nx).map(move |i| Point2::new((rect.x + (i * period_x) as i64) as f64 + 0.5, y))
            })
            .collect();

        let mapped = match self {
            Self::Pointwise(transform) => transform.evaluate_batch(&points)?,
            _ => points
                .iter()
                .map(|&p| self.map_point(p))
                .collect::<TransformResult<Vec<_>>>()?,
        };

        Ok(mapped.iter().flat_map(|p| [p.x, p.y]).collect())
    }

    /// Cache cost: a base cost plus one per grid cell.
    pub fn cost(&self) -> usize {
        match self {
            Self::Grid(grid) => BASE_COST + grid.cells(),
            Self::Affine(_) | Self::Pointwise(_) => BASE_COST,
        }
    }

    pub fn is_affine(&self) -> bool {
        matches!(self, Self::Affine(_))
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, Self::Grid(_))
    }

    pub fn is_pointwise(&self) -> bool {
        matches!(self, Self::Pointwise(_))
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Affine(_) => "affine",
            Self::Grid(_) => "grid",
            Self::Pointwise(_) => "pointwise",
        }
    }
}

impl fmt::Debug for WarpApproximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affine(affine) => f.debug_tuple("Affine").field(affine).finish(),
            Self::Grid(grid) => f
                .debug_struct("Grid")
                .field("origin", &grid.origin)
                .field("step_x", &grid.step_x)
                .field("step_y", &grid.step_y)
                .field("cells_x", &grid.cells_x)
                .field("cells_y", &grid.cells_y)
                .finish(),
            Self::Pointwise(_) => f.write_str("Pointwise"),
        }
    }
}

impl Transform for WarpApproximation {
    fn evaluate(&self, point: Point2<f64>) -> TransformResult<Point2<f64>> {
        self.map_point(point)
    }

    fn derivative(&self, point: Point2<f64>) -> TransformResult<Jacobian> {
        match self {
            Self::Affine(affine) => Ok(affine.matrix()),
            Self::Grid(grid) => Ok(grid.jacobian(point)),
            Self::Pointwise(transform) => transform.derivative(point),
        }
    }

    fn inverse(&self) -> TransformResult<Arc<dyn Transform>> {
        match self {
            Self::Affine(affine) => Ok(Arc::new(affine.invert()?)),
            Self::Grid(_) => Err(TransformError::NonInvertible),
            Self::Pointwise(transform) => transform.inverse(),
        }
    }

    fn as_affine(&self) -> Option<AffineTransform> {
        match self {
            Self::Affine(affine) => Some(*affine),
            _ => None,
        }
    }
}
