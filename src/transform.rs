//! Homogeneous 2D transforms.
//!
//! Points are row vectors `[x, y, 1]` multiplied on the left, so a chain of
//! transforms applies in the order it is composed: `p · A · B` applies `A`
//! first. Translations live in the bottom row and the perspective weights in
//! the right column.

use nalgebra::{Matrix3, RowVector3};

use crate::geom::Point;

const SINGULAR_EPSILON: f64 = 1e-12;

/// A 3×3 projective transform in row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    matrix: Matrix3<f64>,
}

impl TransformMatrix {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Wrap a raw matrix.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    /// Build from rows.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        let row = |r: [f64; 3]| RowVector3::new(r[0], r[1], r[2]);
        Self::from_matrix(Matrix3::from_rows(&[row(rows[0]), row(rows[1]), row(rows[2])]))
    }

    /// Axis-aligned scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::from_rows([[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Axis-aligned scale that keeps `(px, py)` fixed.
    pub fn scale_about(sx: f64, sy: f64, px: f64, py: f64) -> Self {
        Self::from_rows([
            [sx, 0.0, 0.0],
            [0.0, sy, 0.0],
            [(1.0 - sx) * px, (1.0 - sy) * py, 1.0],
        ])
    }

    /// Translation.
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [dx, dy, 1.0]])
    }

    /// Rotation about the origin by `theta` radians. Positive angles turn
    /// the x axis toward negative y, which reads as counter-clockwise once
    /// the chart is drawn with y pointing down.
    pub fn rotate(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::from_rows([[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Rotation in degrees.
    pub fn rotate_degrees(degrees: f64) -> Self {
        Self::rotate(degrees.to_radians())
    }

    /// Shear that tilts the x basis vector by `theta_x` and the y basis
    /// vector by `theta_y` (radians). `shear(0, 0)` is the identity.
    pub fn shear(theta_x: f64, theta_y: f64) -> Self {
        let (sin_x, cos_x) = theta_x.sin_cos();
        let (sin_y, cos_y) = theta_y.sin_cos();
        Self::from_rows([
            [cos_x, sin_x, 0.0],
            [sin_y, cos_y, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Swap the x and y axes.
    pub fn flip() -> Self {
        Self::from_rows([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Perspective projection with weight column `[xp, yp, zp]`.
    ///
    /// A point's new weight is `xp·x + yp·y + zp`, so the line
    /// `xp·x + yp·y + zp = 0` is sent to infinity and parallel scales
    /// converge toward a vanishing point. `project(0, 0, 1)` is the identity.
    pub fn project(xp: f64, yp: f64, zp: f64) -> Self {
        Self::from_rows([[1.0, 0.0, xp], [0.0, 1.0, yp], [0.0, 0.0, zp]])
    }

    /// `self` followed by `other`.
    pub fn compose(&self, other: &Self) -> Self {
        Self::from_matrix(self.matrix * other.matrix)
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[(row, col)]
    }

    /// Access the underlying matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Matrix determinant.
    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    /// Whether the transform collapses the plane.
    pub fn is_singular(&self) -> bool {
        let det = self.determinant();
        !det.is_finite() || det.abs() < SINGULAR_EPSILON
    }

    /// Whether this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    /// Inverse transform, if one exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from_matrix)
    }

    /// Map a point, dividing through by the resulting weight.
    ///
    /// Returns `None` when the weight is zero or the result is not finite.
    pub fn apply(&self, point: Point) -> Option<Point> {
        let row = RowVector3::new(point.x, point.y, 1.0) * self.matrix;
        let w = row[2];
        if w == 0.0 {
            return None;
        }
        let mapped = Point::new(row[0] / w, row[1] / w);
        mapped.is_finite().then_some(mapped)
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for TransformMatrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn translate_then_scale_applies_in_order() {
        let m = TransformMatrix::translate(1.0, 0.0).compose(&TransformMatrix::scale(2.0, 3.0));
        let p = m.apply(Point::new(1.0, 1.0)).unwrap();
        assert!(close(p, Point::new(4.0, 3.0)));
    }

    #[test]
    fn scale_about_keeps_pivot() {
        let m = TransformMatrix::scale_about(3.0, 0.5, 2.0, -1.0);
        assert!(close(m.apply(Point::new(2.0, -1.0)).unwrap(), Point::new(2.0, -1.0)));
        assert!(close(m.apply(Point::new(3.0, 0.0)).unwrap(), Point::new(5.0, -0.5)));
    }

    #[test]
    fn rotation_turns_x_axis_toward_negative_y() {
        let quarter = TransformMatrix::rotate_degrees(90.0);
        let p = quarter.apply(Point::new(1.0, 0.0)).unwrap();
        assert!(close(p, Point::new(0.0, -1.0)));
        let p = quarter.apply(Point::new(0.0, 1.0)).unwrap();
        assert!(close(p, Point::new(1.0, 0.0)));
    }

    #[test]
    fn flip_swaps_axes() {
        let p = TransformMatrix::flip().apply(Point::new(2.0, 5.0)).unwrap();
        assert_eq!(p, Point::new(5.0, 2.0));
    }

    #[test]
    fn shear_and_project_identities() {
        assert!(TransformMatrix::shear(0.0, 0.0).is_identity());
        assert!(TransformMatrix::project(0.0, 0.0, 1.0).is_identity());
    }

    #[test]
    fn projection_sends_line_to_infinity() {
        let m = TransformMatrix::project(1.0, 0.0, 1.0);
        assert!(m.apply(Point::new(-1.0, 3.0)).is_none());
        let p = m.apply(Point::new(1.0, 2.0)).unwrap();
        assert!(close(p, Point::new(0.5, 1.0)));
    }

    #[test]
    fn degenerate_scale_is_allowed() {
        let m = TransformMatrix::scale(0.0, 0.0);
        assert!(m.is_singular());
        assert!(m.inverse().is_none());
        assert_eq!(m.apply(Point::new(4.0, 4.0)), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn inverse_roundtrip() {
        let m = TransformMatrix::rotate(0.3) * TransformMatrix::translate(2.0, -1.0);
        let inv = m.inverse().unwrap();
        let p = Point::new(0.7, -2.2);
        let back = inv.apply(m.apply(p).unwrap()).unwrap();
        assert!(close(back, p));
    }
}
