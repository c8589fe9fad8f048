//! Resolution of tile transforms into boundary points, centers and normals

use crate::io::configuration::{THICK_HALF_ANGLE_DEGREES, THIN_HALF_ANGLE_DEGREES};
use crate::spatial::tiles::{Shape, Tile};
use nalgebra::{Point2, Point3, Vector3};

/// A boundary corner in world space with its height
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryPoint {
    /// Planar position
    pub position: Point2<f64>,
    /// Height, integral at corners 0 and 2, possibly half-integral at 1 and 3
    pub height: f64,
}

impl BoundaryPoint {
    /// The point lifted to 3D with its height as z
    pub fn lifted(&self) -> Point3<f64> {
        Point3::new(self.position.x, self.position.y, self.height)
    }
}

// Cosine and sine of the template angle
fn template_angle(shape: Shape) -> (f64, f64) {
    let degrees = match shape {
        Shape::Thick => THICK_HALF_ANGLE_DEGREES,
        Shape::Thin => THIN_HALF_ANGLE_DEGREES,
    };
    let (sin, cos) = degrees.to_radians().sin_cos();
    (cos, sin)
}

/// Corners of the unit template in canonical boundary order
///
/// Thick: bottom, right, top, left. Thin: right, top, left, bottom.
pub fn template_corners(shape: Shape) -> [(f64, f64); 4] {
    let (c, s) = template_angle(shape);
    match shape {
        Shape::Thick => [(0.0, 0.0), (c, s), (0.0, 2.0 * s), (-c, s)],
        Shape::Thin => [(0.0, 0.0), (-c, s), (-2.0 * c, 0.0), (-c, -s)],
    }
}

impl Tile {
    /// Map a point of the unit template into world space
    pub fn get_point(&self, x: f64, y: f64) -> Point2<f64> {
        self.transform.apply(x, y)
    }

    /// World-space boundary corners in canonical order
    pub fn boundary_points(&self) -> [Point2<f64>; 4] {
        template_corners(self.shape).map(|(x, y)| self.get_point(x, y))
    }

    /// Boundary corners with heights (index, mid, opposite, mid)
    pub fn boundary_with_heights(&self) -> [BoundaryPoint; 4] {
        let [p0, p1, p2, p3] = self.boundary_points();
        let index = self.index.value() as f64;
        let opposite = self.index.opposite().value() as f64;
        let mid = self.index.midpoint();
        [
            BoundaryPoint {
                position: p0,
                height: index,
            },
            BoundaryPoint {
                position: p1,
                height: mid,
            },
            BoundaryPoint {
                position: p2,
                height: opposite,
            },
            BoundaryPoint {
                position: p3,
                height: mid,
            },
        ]
    }

    /// Midpoint of boundary corners 0 and 2
    pub fn center(&self) -> Point2<f64> {
        let [p0, _, p2, _] = self.boundary_points();
        nalgebra::center(&p0, &p2)
    }

    /// Unit normal of the lifted quad from the cross product of its diagonals
    ///
    /// Returns `None` when the diagonals are parallel or the tile has zero area.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let [p0, p1, p2, p3] = self.boundary_with_heights().map(|point| point.lifted());
        let d1 = p2 - p0;
        let d2 = p3 - p1;
        d1.cross(&d2).try_normalize(f64::EPSILON)
    }
}
