//! Fixed-size affine transforms for self-similar tile placement
//!
//! Every tile carries its own transform mapping the unit rhombus template into
//! world space. Children are placed by composing the parent transform with a
//! constant local transform from the substitution grammar, so the chain never
//! needs to be stored or shared.

use nalgebra::{Matrix3, Point2, Vector3};

/// Similarity transform (uniform scale, rotation, translation) in homogeneous form
///
/// ```text
/// [ s cos t   -s sin t   x ]
/// [ s sin t    s cos t   y ]
/// [    0          0      1 ]
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: Matrix3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Build a transform that scales, rotates by `degrees` and then translates to (x, y)
    pub fn new(x: f64, y: f64, degrees: f64, scale: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            matrix: Matrix3::new(
                scale * cos,
                -scale * sin,
                x,
                scale * sin,
                scale * cos,
                y,
                0.0,
                0.0,
                1.0,
            ),
        }
    }

    /// Wrap an existing homogeneous matrix
    pub const fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    /// Compose with a transform expressed in this transform's local frame
    ///
    /// The result maps a point first through `local`, then through `self`.
    #[must_use]
    pub fn compose(&self, local: &Self) -> Self {
        Self {
            matrix: self.matrix * local.matrix,
        }
    }

    /// Map a local point to world coordinates
    pub fn apply(&self, x: f64, y: f64) -> Point2<f64> {
        let mapped = self.matrix * Vector3::new(x, y, 1.0);
        Point2::new(mapped.x, mapped.y)
    }

    /// Uniform scale factor of the linear part
    pub fn scale_factor(&self) -> f64 {
        let m = &self.matrix;
        (m.m11 * m.m22 - m.m12 * m.m21).abs().sqrt()
    }

    /// Access the underlying homogeneous matrix
    pub const fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }
}
