//! Second-order bivariate polynomial warps.
//!
//! Both output coordinates are polynomials over the monomials
//! `[1, x, y, x², x·y, y²]`, the usual model for ground-control-point warps.

use std::sync::Arc;

use nalgebra::{Matrix2, Point2};

use crate::transform::{finite, Jacobian, Transform, TransformResult};
use crate::AffineTransform;

/// A quadratic 2D warp with an analytic Jacobian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialTransform {
    /// Coefficients of `x'` over `[1, x, y, x², xy, y²]`.
    pub x_coeffs: [f64; 6],
    /// Coefficients of `y'` over `[1, x, y, x², xy, y²]`.
    pub y_coeffs: [f64; 6],
}

impl PolynomialTransform {
    /// Create a new polynomial warp.
    pub fn new(x_coeffs: [f64; 6], y_coeffs: [f64; 6]) -> Self {
        Self { x_coeffs, y_coeffs }
    }

    /// Lift an affine transform into polynomial form.
    pub fn from_affine(affine: &AffineTransform) -> Self {
        let [a, b, c, d, e, f] = affine.coefficients();
        Self::new([c, a, b, 0.0, 0.0, 0.0], [f, d, e, 0.0, 0.0, 0.0])
    }

    fn eval(c: &[f64; 6], x: f64, y: f64) -> f64 {
        c[0] + c[1] * x + c[2] * y + c[3] * x * x + c[4] * x * y + c[5] * y * y
    }

    fn gradient(c: &[f64; 6], x: f64, y: f64) -> (f64, f64) {
        (
            c[1] + 2.0 * c[3] * x + c[4] * y,
            c[2] + c[4] * x + 2.0 * c[5] * y,
        )
    }

    /// Whether every second-order coefficient is zero.
    pub fn is_affine(&self) -> bool {
        self.x_coeffs[3..].iter().all(|c| *c == 0.0) && self.y_coeffs[3..].iter().all(|c| *c == 0.0)
    }
}

impl Transform for PolynomialTransform {
    fn evaluate(&self, point: Point2<f64>) -> TransformResult<Point2<f64>> {
        finite(Point2::new(
            Self::eval(&self.x_coeffs, point.x, point.y),
            Self::eval(&self.y_coeffs, point.x, point.y),
        ))
    }

    fn derivative(&self, point: Point2<f64>) -> TransformResult<Jacobian> {
        let (xx, xy) = Self::gradient(&self.x_coeffs, point.x, point.y);
        let (yx, yy) = Self::gradient(&self.y_coeffs, point.x, point.y);
        Ok(Matrix2::new(xx, xy, yx, yy))
    }

    fn inverse(&self) -> TransformResult<Arc<dyn Transform>> {
        match self.as_affine() {
            Some(affine) => Ok(Arc::new(affine.invert()?)),
            None => Err(crate::TransformError::NonInvertible),
        }
    }

    fn as_affine(&self) -> Option<AffineTransform> {
        if !self.is_affine() {
            return None;
        }
        let (a, b) = (self.x_coeffs, self.y_coeffs);
        Some(AffineTransform::new([a[1], a[2], a[0], b[1], b[2], b[0]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_quadratic() {
        let poly = PolynomialTransform::new([1.0, 1.0, 0.0, 0.5, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
        let p = poly.evaluate(Point2::new(2.0, 3.0)).unwrap();
        assert_eq!(p, Point2::new(1.0 + 2.0 + 2.0, 3.0 + 12.0));
        assert!(poly.as_affine().is_none());
        assert!(poly.inverse().is_err());
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let poly = PolynomialTransform::new(
            [0.3, 1.1, -0.2, 1e-3, 4e-4, -2e-3],
            [-5.0, 0.1, 0.9, -7e-4, 2e-3, 5e-4],
        );
        let p = Point2::new(17.0, -9.5);
        let j = poly.derivative(p).unwrap();
        let h = 1e-4;
        for c in 0..2 {
            let mut dp = nalgebra::Vector2::zeros();
            dp[c] = h;
            let fwd = poly.evaluate(p + dp).unwrap();
            let bwd = poly.evaluate(p - dp).unwrap();
            let numeric = (fwd - bwd) / (2.0 * h);
            assert!((numeric.x - j[(0, c)]).abs() < 1e-8);
            assert!((numeric.y - j[(1, c)]).abs() < 1e-8);
        }
    }

    #[test]
    fn test_affine_round_trip() {
        let affine = AffineTransform::new([2.0, 0.5, -3.0, 0.25, 4.0, 7.0]);
        let poly = PolynomialTransform::from_affine(&affine);
        assert!(poly.is_affine());
        assert_eq!(poly.as_affine(), Some(affine));

        let inv = poly.inverse().unwrap();
        let p = Point2::new(3.0, 4.0);
        let back = inv.evaluate(poly.evaluate(p).unwrap()).unwrap();
        assert!((back - p).norm() < 1e-12);
    }
}
