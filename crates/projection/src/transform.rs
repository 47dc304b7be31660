//! The transform contract.

use std::sync::Arc;

use nalgebra::{Matrix2, Point2};
use thiserror::Error;

use crate::AffineTransform;

/// 2x2 matrix of partial derivatives: `j[(r, c)] = ∂out_r / ∂in_c`.
pub type Jacobian = Matrix2<f64>;

/// Result type alias using TransformError.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors raised by a [`Transform`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    /// The transform cannot compute a Jacobian.
    #[error("transform does not provide a derivative")]
    UnsupportedDerivative,

    /// The transform has no inverse.
    #[error("transform is not invertible")]
    NonInvertible,

    /// The point has no image under the transform.
    #[error("point ({x}, {y}) is outside the transform domain")]
    PointOutsideDomain { x: f64, y: f64 },

    /// Any other failure.
    #[error("transform failed: {0}")]
    Failed(String),
}

/// A reentrant 2D coordinate transform.
///
/// Implementations hold no hidden mutable state: every method may be called
/// any number of times from any thread.
pub trait Transform: Send + Sync {
    /// Map a single point.
    fn evaluate(&self, point: Point2<f64>) -> TransformResult<Point2<f64>>;

    /// Jacobian at `point`.
    fn derivative(&self, _point: Point2<f64>) -> TransformResult<Jacobian> {
        Err(TransformError::UnsupportedDerivative)
    }

    /// The inverse transform, if one exists.
    fn inverse(&self) -> TransformResult<Arc<dyn Transform>> {
        Err(TransformError::NonInvertible)
    }

    /// The exact affine form of this transform, if it has one.
    fn as_affine(&self) -> Option<AffineTransform> {
        None
    }

    /// Map many points at once. Any single failure fails the whole batch.
    fn evaluate_batch(&self, points: &[Point2<f64>]) -> TransformResult<Vec<Point2<f64>>> {
        points.iter().map(|p| self.evaluate(*p)).collect()
    }
}

impl<T: Transform + ?Sized> Transform for Arc<T> {
    fn evaluate(&self, point: Point2<f64>) -> TransformResult<Point2<f64>> {
        (**self).evaluate(point)
    }

    fn derivative(&self, point: Point2<f64>) -> TransformResult<Jacobian> {
        (**self).derivative(point)
    }

    fn inverse(&self) -> TransformResult<Arc<dyn Transform>> {
        (**self).inverse()
    }

    fn as_affine(&self) -> Option<AffineTransform> {
        (**self).as_affine()
    }

    fn evaluate_batch(&self, points: &[Point2<f64>]) -> TransformResult<Vec<Point2<f64>>> {
        (**self).evaluate_batch(points)
    }
}

/// Reject points with a non-finite coordinate.
pub(crate) fn finite(point: Point2<f64>) -> TransformResult<Point2<f64>> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(point)
    } else {
        Err(TransformError::PointOutsideDomain {
            x: point.x,
            y: point.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shift;

    impl Transform for Shift {
        fn evaluate(&self, point: Point2<f64>) -> TransformResult<Point2<f64>> {
            if point.x < 0.0 {
                return Err(TransformError::PointOutsideDomain {
                    x: point.x,
                    y: point.y,
                });
            }
            Ok(Point2::new(point.x + 1.0, point.y))
        }
    }

    #[test]
    fn test_defaults() {
        let t = Shift;
        assert_eq!(
            t.derivative(Point2::origin()),
            Err(TransformError::UnsupportedDerivative)
        );
        assert!(t.inverse().is_err());
        assert!(t.as_affine().is_none());
    }

    #[test]
    fn test_batch_fails_on_any_point() {
        let t = Shift;
        let ok = t
            .evaluate_batch(&[Point2::new(0.0, 2.0), Point2::new(3.0, 4.0)])
            .unwrap();
        assert_eq!(ok, vec![Point2::new(1.0, 2.0), Point2::new(4.0, 4.0)]);
        assert!(t
            .evaluate_batch(&[Point2::new(0.0, 0.0), Point2::new(-1.0, 0.0)])
            .is_err());
    }

    #[test]
    fn test_arc_forwards() {
        let t: Arc<dyn Transform> = Arc::new(Shift);
        assert_eq!(t.evaluate(Point2::new(1.0, 1.0)).unwrap(), Point2::new(2.0, 1.0));
        assert!(finite(Point2::new(f64::NAN, 0.0)).is_err());
    }
}
