//! Synthetic transforms and instrumentation wrappers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use projection::{
    AffineTransform, Jacobian, Matrix2, Point2, PolynomialTransform, Transform, TransformError,
    TransformResult,
};

/// A gentle quadratic warp, the reference case for tolerance tests.
///
/// `x' = x + 1e-3·x² + 2e-4·x·y`, `y' = y + 5e-4·y²`
pub fn quadratic_warp() -> PolynomialTransform {
    PolynomialTransform::new(
        [0.0, 1.0, 0.0, 1e-3, 2e-4, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0, 5e-4],
    )
}

/// `x' = k·x³`, `y' = y`. Strongly non-linear near large `x`.
#[derive(Debug, Clone, Copy)]
pub struct CubicWarp {
    pub k: f64,
}

impl Transform for CubicWarp {
    fn evaluate(&self, p: Point2<f64>) -> TransformResult<Point2<f64>> {
        Ok(Point2::new(self.k * p.x * p.x * p.x, p.y))
    }

    fn derivative(&self, p: Point2<f64>) -> TransformResult<Jacobian> {
        Ok(Matrix2::new(3.0 * self.k * p.x * p.x, 0.0, 0.0, 1.0))
    }
}

/// Hides the derivative of the wrapped transform.
#[derive(Debug, Clone)]
pub struct NoDerivative<T>(pub T);

impl<T: Transform> Transform for NoDerivative<T> {
    fn evaluate(&self, p: Point2<f64>) -> TransformResult<Point2<f64>> {
        self.0.evaluate(p)
    }
}

/// Hides the affine form of the wrapped transform, forcing the general path.
#[derive(Debug, Clone)]
pub struct Opaque<T>(pub T);

impl<T: Transform> Transform for Opaque<T> {
    fn evaluate(&self, p: Point2<f64>) -> TransformResult<Point2<f64>> {
        self.0.evaluate(p)
    }

    fn derivative(&self, p: Point2<f64>) -> TransformResult<Jacobian> {
        self.0.derivative(p)
    }
}

/// Fails for every point with `x` in `[min_x, max_x)`.
#[derive(Debug, Clone)]
pub struct FailingBand<T> {
    pub inner: T,
    pub min_x: f64,
    pub max_x: f64,
}

impl<T: Transform> Transform for FailingBand<T> {
    fn evaluate(&self, p: Point2<f64>) -> TransformResult<Point2<f64>> {
        if p.x >= self.min_x && p.x < self.max_x {
            return Err(TransformError::PointOutsideDomain { x: p.x, y: p.y });
        }
        self.inner.evaluate(p)
    }

    fn derivative(&self, p: Point2<f64>) -> TransformResult<Jacobian> {
        self.inner.derivative(p)
    }
}

/// Counts calls into the wrapped transform.
#[derive(Debug, Default)]
pub struct CountingTransform<T> {
    pub inner: T,
    pub evaluations: AtomicUsize,
    pub derivatives: AtomicUsize,
}

impl<T> CountingTransform<T> {
    pub fn new(inner: T) -> Arc<Self> {
        Arc::new(Self {
            inner,
            evaluations: AtomicUsize::new(0),
            derivatives: AtomicUsize::new(0),
        })
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    pub fn derivatives(&self) -> usize {
        self.derivatives.load(Ordering::SeqCst)
    }
}

impl<T: Transform> Transform for CountingTransform<T> {
    fn evaluate(&self, p: Point2<f64>) -> TransformResult<Point2<f64>> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        self.inner.evaluate(p)
    }

    fn derivative(&self, p: Point2<f64>) -> TransformResult<Jacobian> {
        self.derivatives.fetch_add(1, Ordering::SeqCst);
        self.inner.derivative(p)
    }

    fn as_affine(&self) -> Option<AffineTransform> {
        self.inner.as_affine()
    }
}
