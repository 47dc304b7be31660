//! Adaptive construction of warp approximations.
//!
//! The builder first tries the transform's own affine form. Otherwise it
//! samples the Jacobian at the corners and center of the domain and checks
//! how far an affine map anchored at the center drifts at each corner. For a
//! corner at offset `d` from the center that drift is estimated as
//! `½·|(J_corner − J_center)·d|`. Sub-domains failing the tolerance are split
//! along the axes whose share of the drift exceeds half the tolerance, and the
//! deepest split per axis decides the regular grid that is finally built.

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::{Matrix2, Point2, Vector2};
use projection::{AffineTransform, Jacobian, Transform};
use raster_common::PixelRect;
use tracing::debug;

use crate::approximation::{WarpApproximation, WarpGrid};
use crate::config::WarpConfig;
use crate::error::Result;

/// Why an affine or grid approximation could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    UnsupportedDerivative,
    NonConvergence,
    TransformFailure,
}

impl Fallback {
    fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedDerivative => "unsupported derivative",
            Self::NonConvergence => "non-convergence",
            Self::TransformFailure => "grid materialization failed",
        }
    }
}

type Attempt<T> = std::result::Result<T, Fallback>;

/// Number of halvings needed along each axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Depth {
    x: u32,
    y: u32,
}

/// Jacobians sampled so far, keyed by the exact bits of the point.
///
/// Sub-domain corners are midpoints of their parent's coordinates, so a point
/// shared by neighbouring cells always has the same bits and is sampled once.
struct Sampler<'t> {
    transform: &'t dyn Transform,
    jacobians: HashMap<(u64, u64), Jacobian>,
}

impl<'t> Sampler<'t> {
    fn new(transform: &'t dyn Transform) -> Self {
        Self {
            transform,
            jacobians: HashMap::new(),
        }
    }

    fn jacobian(&mut self, x: f64, y: f64) -> Attempt<Jacobian> {
        let key = (x.to_bits(), y.to_bits());
        if let Some(j) = self.jacobians.get(&key) {
            return Ok(*j);
        }
        let j = match self.transform.derivative(Point2::new(x, y)) {
            Ok(j) if j.iter().all(|v| v.is_finite()) => j,
            _ => return Err(Fallback::UnsupportedDerivative),
        };
        self.jacobians.insert(key, j);
        Ok(j)
    }
}

/// A sub-domain with its Jacobians sampled at the corners and center.
struct Cell {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// Top-left, top-right, bottom-left, bottom-right.
    corners: [Jacobian; 4],
    center: Jacobian,
}

impl Cell {
    fn sample(s: &mut Sampler<'_>, x0: f64, y0: f64, x1: f64, y1: f64) -> Attempt<Self> {
        Ok(Self {
            x0,
            y0,
            x1,
            y1,
            corners: [
                s.jacobian(x0, y0)?,
                s.jacobian(x1, y0)?,
                s.jacobian(x0, y1)?,
                s.jacobian(x1, y1)?,
            ],
            center: s.jacobian((x0 + x1) / 2.0, (y0 + y1) / 2.0)?,
        })
    }

    /// Children after halving the requested axes.
    fn split(&self, s: &mut Sampler<'_>, split_x: bool, split_y: bool) -> Attempt<Vec<Cell>> {
        let (x0, y0, x1, y1) = (self.x0, self.y0, self.x1, self.y1);
        let (xm, ym) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);

        match (split_x, split_y) {
            (true, true) => Ok(vec![
                Cell::sample(s, x0, y0, xm, ym)?,
                Cell::sample(s, xm, y0, x1, ym)?,
                Cell::sample(s, x0, ym, xm, y1)?,
                Cell::sample(s, xm, ym, x1, y1)?,
            ]),
            (true, false) => Ok(vec![
                Cell::sample(s, x0, y0, xm, y1)?,
                Cell::sample(s, xm, y0, x1, y1)?,
            ]),
            (false, true) => Ok(vec![
                Cell::sample(s, x0, y0, x1, ym)?,
                Cell::sample(s, x0, ym, x1, y1)?,
            ]),
            (false, false) => Ok(Vec::new()),
        }
    }
}

fn evaluate(t: &dyn Transform, x: f64, y: f64) -> Attempt<Vector2<f64>> {
    match t.evaluate(Point2::new(x, y)) {
        Ok(p) if p.x.is_finite() && p.y.is_finite() => Ok(p.coords),
        _ => Err(Fallback::TransformFailure),
    }
}

/// Builds tolerance-bounded approximations of transforms.
#[derive(Debug, Clone)]
pub struct WarpBuilder {
    config: WarpConfig,
}

impl WarpBuilder {
    /// Create a builder, rejecting an invalid configuration.
    pub fn new(config: WarpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// Approximate `transform` over `domain`.
    ///
    /// Only a malformed domain is an error. A transform without a usable
    /// derivative, one too curved to meet the tolerance above the minimum
    /// cell size, or one failing on a grid control point yields
    /// [`WarpApproximation::Pointwise`].
    pub fn build(
        &self,
        transform: Arc<dyn Transform>,
        domain: PixelRect,
    ) -> Result<WarpApproximation> {
        domain.validate()?;

        if let Some(affine) = transform.as_affine() {
            let affine = affine.round_near_integers(self.config.affine_rounding_epsilon);
            debug!(%domain, "Transform is affine");
            return Ok(WarpApproximation::Affine(affine));
        }

        match self.approximate(transform.as_ref(), domain) {
            Ok(approximation) => {
                let (cells_x, cells_y) = match &approximation {
                    WarpApproximation::Grid(grid) => (grid.cells_x(), grid.cells_y()),
                    _ => (1, 1),
                };
                debug!(
                    %domain,
                    kind = approximation.kind(),
                    cells_x,
                    cells_y,
                    tolerance = self.config.tolerance,
                    "Built warp approximation"
                );
                Ok(approximation)
            }
            Err(fallback) => {
                debug!(%domain, reason = fallback.reason(), "Falling back to pointwise warp");
                Ok(WarpApproximation::Pointwise(transform))
            }
        }
    }

    fn approximate(&self, t: &dyn Transform, domain: PixelRect) -> Attempt<WarpApproximation> {
        let (x0, y0) = (domain.x as f64, domain.y as f64);
        let (x1, y1) = (domain.max_x() as f64, domain.max_y() as f64);

        let mut sampler = Sampler::new(t);
        let root = Cell::sample(&mut sampler, x0, y0, x1, y1)?;
        let depth = self.subdivide(&mut sampler, &root)?;

        if depth == Depth::default() {
            self.fit_affine(t, x0, y0, x1, y1).map(WarpApproximation::Affine)
        } else {
            self.materialize(t, domain, depth).map(WarpApproximation::Grid)
        }
    }

    /// Halvings needed so that every piece of `cell` passes the tolerance.
    fn subdivide(&self, s: &mut Sampler<'_>, cell: &Cell) -> Attempt<Depth> {
        let tolerance = self.config.tolerance;
        let hx = (cell.x1 - cell.x0) / 2.0;
        let hy = (cell.y1 - cell.y0) / 2.0;
        let offsets = [(-hx, -hy), (hx, -hy), (-hx, hy), (hx, hy)];

        let (mut total, mut ex, mut ey) = (0.0f64, 0.0f64, 0.0f64);
        for (corner, (dx, dy)) in cell.corners.iter().zip(offsets) {
            let delta = corner - cell.center;
            let drift_x: Vector2<f64> = delta.column(0) * dx;
            let drift_y: Vector2<f64> = delta.column(1) * dy;
            total = total.max(0.5 * (drift_x + drift_y).norm());
            ex = ex.max(0.5 * drift_x.norm());
            ey = ey.max(0.5 * drift_y.norm());
        }

        if total <= tolerance {
            return Ok(Depth::default());
        }

        // total <= ex + ey, so at least one axis normally exceeds half the
        // tolerance. Round-off can defeat that; then the larger share (x on a
        // tie) is split.
        let mut split_x = ex > tolerance / 2.0;
        let mut split_y = ey > tolerance / 2.0;
        if !split_x && !split_y {
            split_x = ex >= ey;
            split_y = !split_x;
        }

        let min_cell = self.config.min_cell_size;
        if (split_x && hx < min_cell) || (split_y && hy < min_cell) {
            return Err(Fallback::NonConvergence);
        }

        let mut depth = Depth::default();
        for child in cell.split(s, split_x, split_y)? {
            let d = self.subdivide(s, &child)?;
            depth.x = depth.x.max(d.x);
            depth.y = depth.y.max(d.y);
        }
        depth.x += u32::from(split_x);
        depth.y += u32::from(split_y);
        Ok(depth)
    }

    /// Affine map from finite differences across the edge midpoints, exact
    /// at the center.
    fn fit_affine(&self, t: &dyn Transform, x0: f64, y0: f64, x1: f64, y1: f64) -> Attempt<AffineTransform> {
        let (xm, ym) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        let left = evaluate(t, x0, ym)?;
        let right = evaluate(t, x1, ym)?;
        let top = evaluate(t, xm, y0)?;
        let bottom = evaluate(t, xm, y1)?;
        let center = evaluate(t, xm, ym)?;

        let jx = (right - left) / (x1 - x0);
        let jy = (bottom - top) / (y1 - y0);
        let m = Matrix2::from_columns(&[jx, jy]);
        let translation = center - m * Vector2::new(xm, ym);

        Ok(AffineTransform::new([
            m[(0, 0)],
            m[(0, 1)],
            translation.x,
            m[(1, 0)],
            m[(1, 1)],
            translation.y,
        ]))
    }

    /// Regular lattice of `2^depth.x × 2^depth.y` cells over `domain`,
    /// evaluated in one batch.
    fn materialize(&self, t: &dyn Transform, domain: PixelRect, depth: Depth) -> Attempt<WarpGrid> {
        let cells_x = 1usize << depth.x;
        let cells_y = 1usize << depth.y;
        let step_x = domain.width as f64 / cells_x as f64;
        let step_y = domain.height as f64 / cells_y as f64;
        let origin = Point2::new(domain.x as f64, domain.y as f64);

        let mut lattice = Vec::with_capacity((cells_x + 1) * (cells_y + 1));
        for j in 0..=cells_y {
            for i in 0..=cells_x {
                lattice.push(Point2::new(
                    origin.x + i as f64 * step_x,
                    origin.y + j as f64 * step_y,
                ));
            }
        }

        let control = t
            .evaluate_batch(&lattice)
            .map_err(|_| Fallback::TransformFailure)?;
        if control.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(Fallback::TransformFailure);
        }

        WarpGrid::new(origin, step_x, step_y, cells_x, cells_y, control)
            .map_err(|_| Fallback::TransformFailure)
    }
}

impl Default for WarpBuilder {
    fn default() -> Self {
        Self {
            config: WarpConfig::default(),
        }
    }
}
