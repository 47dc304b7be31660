//! Coordinate transforms between destination and source pixel grids.
//!
//! The engine never models coordinate reference systems itself; it consumes
//! any [`Transform`] that can map points and, ideally, report its Jacobian.

pub mod affine;
pub mod polynomial;
pub mod transform;

pub use affine::AffineTransform;
pub use polynomial::PolynomialTransform;
pub use transform::{Jacobian, Transform, TransformError, TransformResult};

pub use nalgebra::{Matrix2, Point2, Vector2};
