//! Fundamental geometric types for connection layouts.
//!
//! All lengths are in millimetres. The global frame follows the host model:
//! X runs across the sheet width, Y along the sheet length and Z through the
//! thickness, with the top face of the near sheet at `z = 0`.

use nalgebra::{Point2, Point3, Unit, Vector3};
use serde::Serialize;

/// Position in three dimensional space measured in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    /// Distance along the global X (transverse) axis.
    pub x: f64,
    /// Distance along the global Y (longitudinal) axis.
    pub y: f64,
    /// Distance along the global Z (stack) axis.
    pub z: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Offset of the point from the global origin.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Point3<f64>> for Point {
    fn from(value: Point3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Point> for Point3<f64> {
    fn from(value: Point) -> Self {
        Point3::new(value.x, value.y, value.z)
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use screwlayout::point;
///
/// let origin = point(0.0, 0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// Point of a planar sketch, expressed as `(axial, radial)` for revolved profiles.
pub type SketchPoint = Point2<f64>;

/// Global axis normal to a partition plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Plane of constant X, cutting across the width.
    X,
    /// Plane of constant Y, cutting across the length.
    Y,
    /// Plane of constant Z.
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    #[must_use]
    pub fn unit(self) -> Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Axis-aligned cutting plane used to partition a sheet into hexahedral-meshable cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Plane {
    /// Axis normal to the plane.
    pub normal: Axis,
    /// Coordinate of the plane along its normal.
    pub offset: f64,
}

impl Plane {
    /// Plane of constant X.
    #[must_use]
    pub const fn at_x(offset: f64) -> Self {
        Self {
            normal: Axis::X,
            offset,
        }
    }

    /// Plane of constant Y.
    #[must_use]
    pub const fn at_y(offset: f64) -> Self {
        Self {
            normal: Axis::Y,
            offset,
        }
    }

    /// Three non-collinear points on the plane, in the form the host partition tool expects.
    #[must_use]
    pub fn three_points(&self) -> [Point; 3] {
        let d = self.offset;
        match self.normal {
            Axis::X => [point(d, 0.0, 0.0), point(d, 1.0, 0.0), point(d, 0.0, 1.0)],
            Axis::Y => [point(0.0, d, 0.0), point(1.0, d, 0.0), point(0.0, d, 1.0)],
            Axis::Z => [point(0.0, 0.0, d), point(1.0, 0.0, d), point(0.0, 1.0, d)],
        }
    }
}

/// Rectangular sheet outline in the XY plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rectangle {
    /// Corner with the smallest coordinates.
    pub min: Point,
    /// Corner with the largest coordinates.
    pub max: Point,
}

impl Rectangle {
    /// Extent along X.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether `p` lies inside or on the outline, ignoring Z.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_points_lie_on_the_plane() {
        let plane = Plane::at_y(19.2);
        for p in plane.three_points() {
            assert!((p.y - 19.2).abs() < f64::EPSILON);
        }
        let normal = Plane::at_x(-4.0).normal.unit();
        assert_eq!(normal.into_inner(), Vector3::x());
    }

    #[test]
    fn rectangle_extent_and_containment() {
        let outline = Rectangle {
            min: point(-25.0, -30.0, 0.0),
            max: point(25.0, 30.0, 0.0),
        };
        assert!((outline.width() - 50.0).abs() < f64::EPSILON);
        assert!((outline.length() - 60.0).abs() < f64::EPSILON);
        assert!(outline.contains(point(0.0, 0.0, -1.0)));
        assert!(!outline.contains(point(26.0, 0.0, 0.0)));
    }
}
