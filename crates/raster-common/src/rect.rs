//! Integer pixel rectangles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{RasterError, RasterResult};

/// A rectangle of whole pixels.
///
/// `x`/`y` are the first pixel column/row; `max_x()`/`max_y()` are exclusive.
/// Pixel `(i, j)` covers the continuous area `[i, i+1) × [j, j+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    /// Create a new rectangle. Use [`PixelRect::validate`] before relying on it.
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle anchored at the origin.
    pub const fn from_size(width: i64, height: i64) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Smallest rectangle enclosing the continuous envelope
    /// `[min_x, max_x] × [min_y, max_y]`.
    pub fn enclosing(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> RasterResult<Self> {
        for v in [min_x, min_y, max_x, max_y] {
            if !v.is_finite() {
                return Err(RasterError::invalid_domain(format!(
                    "envelope ({min_x}, {min_y}, {max_x}, {max_y}) is not finite"
                )));
            }
        }
        let x0 = min_x.floor();
        let y0 = min_y.floor();
        let x1 = max_x.ceil();
        let y1 = max_y.ceil();
        if x0 < i64::MIN as f64 || y0 < i64::MIN as f64 || x1 > i64::MAX as f64 || y1 > i64::MAX as f64 {
            return Err(RasterError::invalid_domain("envelope exceeds integer range"));
        }
        let rect = Self::new(x0 as i64, y0 as i64, (x1 - x0) as i64, (y1 - y0) as i64);
        rect.validate()?;
        Ok(rect)
    }

    /// Reject empty or overflowing rectangles.
    pub fn validate(&self) -> RasterResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(RasterError::invalid_domain(format!(
                "rectangle at ({}, {}) has a non-positive size {}x{}",
                self.x, self.y, self.width, self.height
            )));
        }
        if self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none() {
            return Err(RasterError::invalid_domain(format!(
                "rectangle at ({}, {}) of size {}x{} overflows the pixel grid",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Exclusive upper column bound.
    pub fn max_x(&self) -> i64 {
        self.x + self.width
    }

    /// Exclusive upper row bound.
    pub fn max_y(&self) -> i64 {
        self.y + self.height
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Continuous center of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Check if an integer pixel lies inside.
    pub fn contains_pixel(&self, x: i64, y: i64) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }

    /// Check if `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Check if this rectangle intersects another.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.max_x()
            && self.max_x() > other.x
            && self.y < other.max_y()
            && self.max_y() > other.y
    }

    /// Compute the intersection of two rectangles.
    pub fn intersection(&self, other: &PixelRect) -> Option<PixelRect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(PixelRect::new(
            x,
            y,
            self.max_x().min(other.max_x()) - x,
            self.max_y().min(other.max_y()) - y,
        ))
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.x,
            self.x.saturating_add(self.width),
            self.y,
            self.y.saturating_add(self.height)
        )
    }
}
