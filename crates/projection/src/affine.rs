//! Affine transforms: `p' = M·p + t`.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Matrix2, Point2, Vector2};

use crate::transform::{finite, Jacobian, Transform, TransformError, TransformResult};

/// A 2D affine transform.
///
/// Coefficients follow the row-major 2x3 layout
/// `[m00, m01, m02, m10, m11, m12]`:
///
/// ```text
/// x' = m00·x + m01·y + m02
/// y' = m10·x + m11·y + m12
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix2<f64>,
    translation: Vector2<f64>,
}

impl AffineTransform {
    /// Build from the 2x3 coefficient layout.
    pub fn new(m: [f64; 6]) -> Self {
        Self {
            matrix: Matrix2::new(m[0], m[1], m[3], m[4]),
            translation: Vector2::new(m[2], m[5]),
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// Axis-aligned scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// The 2x3 coefficient layout.
    pub fn coefficients(&self) -> [f64; 6] {
        [
            self.matrix[(0, 0)],
            self.matrix[(0, 1)],
            self.translation.x,
            self.matrix[(1, 0)],
            self.matrix[(1, 1)],
            self.translation.y,
        ]
    }

    /// Linear part.
    pub fn matrix(&self) -> Matrix2<f64> {
        self.matrix
    }

    /// Map a point. Never fails.
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::from(self.matrix * p.coords + self.translation)
    }

    /// The inverse transform.
    pub fn invert(&self) -> TransformResult<Self> {
        let inv = self
            .matrix
            .try_inverse()
            .filter(|m| m.iter().all(|v| v.is_finite()))
            .ok_or(TransformError::NonInvertible)?;
        Ok(Self {
            matrix: inv,
            translation: -(inv * self.translation),
        })
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
            translation: next.matrix * self.translation + next.translation,
        }
    }

    /// Snap every coefficient within `epsilon` of an integer onto it.
    pub fn round_near_integers(&self, epsilon: f64) -> Self {
        let mut m = self.coefficients();
        for v in m.iter_mut() {
            let r = v.round();
            if (*v - r).abs() <= epsilon {
                *v = r;
            }
        }
        Self::new(m)
    }

    /// Whether the linear part is the identity.
    pub fn is_translation(&self) -> bool {
        self.matrix == Matrix2::identity()
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AffineTransform")
            .field(&self.coefficients())
            .finish()
    }
}

impl Transform for AffineTransform {
    fn evaluate(&self, point: Point2<f64>) -> TransformResult<Point2<f64>> {
        finite(self.apply(point))
    }

    fn derivative(&self, _point: Point2<f64>) -> TransformResult<Jacobian> {
        Ok(self.matrix)
    }

    fn inverse(&self) -> TransformResult<Arc<dyn Transform>> {
        Ok(Arc::new(self.invert()?))
    }

    fn as_affine(&self) -> Option<AffineTransform> {
        Some(*self)
    }
}
