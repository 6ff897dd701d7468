//! Geometric primitives used by the nomograph pipeline.
//!
//! All coordinates are chart-space values. Screen placement is expressed as a
//! transform on the model (see [`crate::view::fit_transform`]), so the same
//! point type flows from sampling through to the draw callbacks.

use serde::{Deserialize, Serialize};

/// A point (or vector) in chart space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean length when the point is read as a vector.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction.
    ///
    /// Returns `None` for zero-length or non-finite vectors.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if !len.is_finite() || len == 0.0 {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len))
    }

    /// The vector rotated by +90 degrees.
    pub fn perp(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Offset this point along `direction` by `distance`.
    pub fn offset(&self, direction: Self, distance: f64) -> Self {
        Self::new(
            self.x + direction.x * distance,
            self.y + direction.y * distance,
        )
    }

    /// Distance to another point.
    pub fn distance(&self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_rejects_zero_vector() {
        assert!(Point::ORIGIN.normalized().is_none());
        assert!(Point::new(f64::NAN, 1.0).normalized().is_none());
        let unit = Point::new(3.0, 4.0).normalized().unwrap();
        assert!((unit.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perp_rotates_counter_clockwise() {
        let v = Point::new(1.0, 0.0).perp();
        assert_eq!(v, Point::new(-0.0, 1.0));
        let offset = Point::new(1.0, 1.0).offset(v, 2.0);
        assert!((offset.y - 3.0).abs() < 1e-12);
    }
}
