//! Robinson triangle family subdivided in exact arithmetic
//!
//! Half-tiles of the Penrose rhombus and kite/dart tilings. Every new corner
//! is a golden-ratio section of an existing edge, computed in Q(√5) so that
//! shared corners of neighbouring triangles stay bit-for-bit identical at any
//! depth.

use crate::io::error::Result;
use crate::math::quadratic::GoldenField;
use nalgebra::Point2;
use num_traits::Zero;
use std::f64::consts::PI;
use std::ops::{Add, Sub};

/// Point with coordinates in Q(√5)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExactPoint {
    /// Horizontal coordinate
    pub x: GoldenField,
    /// Vertical coordinate
    pub y: GoldenField,
}

impl ExactPoint {
    /// Create a point from exact coordinates
    pub const fn new(x: GoldenField, y: GoldenField) -> Self {
        Self { x, y }
    }

    /// Point with integer coordinates
    pub fn from_integers(x: i64, y: i64) -> Self {
        Self::new(
            GoldenField::from_integers(x, 0),
            GoldenField::from_integers(y, 0),
        )
    }

    /// The origin
    pub fn origin() -> Self {
        Self::new(GoldenField::zero(), GoldenField::zero())
    }

    /// Unit vector at `radians`, rounded once to the nearest rationals
    ///
    /// # Errors
    ///
    /// Returns an error if the angle is not finite
    pub fn of_angle(radians: f64) -> Result<Self> {
        let (sin, cos) = radians.sin_cos();
        Ok(Self::new(
            GoldenField::from_f64(cos)?,
            GoldenField::from_f64(sin)?,
        ))
    }

    /// Multiply both coordinates by `factor`
    #[must_use]
    pub fn scale(&self, factor: &GoldenField) -> Self {
        Self::new(&self.x * factor, &self.y * factor)
    }

    /// Divide both coordinates by `divisor`
    ///
    /// # Errors
    ///
    /// Returns [`crate::AlgorithmError::DivisionByZero`] if `divisor` has zero norm
    pub fn checked_div(&self, divisor: &GoldenField) -> Result<Self> {
        Ok(Self::new(
            self.x.checked_div(divisor)?,
            self.y.checked_div(divisor)?,
        ))
    }

    /// Nearest floating point position
    pub fn to_f64(&self) -> Point2<f64> {
        Point2::new(self.x.to_f64(), self.y.to_f64())
    }
}

impl<'a, 'b> Add<&'b ExactPoint> for &'a ExactPoint {
    type Output = ExactPoint;

    fn add(self, rhs: &'b ExactPoint) -> ExactPoint {
        ExactPoint::new(&self.x + &rhs.x, &self.y + &rhs.y)
    }
}

impl<'a, 'b> Sub<&'b ExactPoint> for &'a ExactPoint {
    type Output = ExactPoint;

    fn sub(self, rhs: &'b ExactPoint) -> ExactPoint {
        ExactPoint::new(&self.x - &rhs.x, &self.y - &rhs.y)
    }
}

/// The two Robinson triangles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriangleKind {
    /// Sharp isosceles triangle (36 degree apex)
    Red,
    /// Obtuse isosceles triangle (108 degree apex)
    Blue,
}

/// Deflation rule for Robinson triangles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SplitRule {
    /// Halves of thick and thin rhombi
    #[default]
    HalfRhombus,
    /// Halves of kites and darts
    HalfKite,
}

/// Triangle with corners A (apex), B and C
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RobinsonTriangle {
    /// Corners A, B, C
    pub vertices: [ExactPoint; 3],
    /// Red or blue
    pub kind: TriangleKind,
}

impl RobinsonTriangle {
    /// Create a triangle from its corners in A, B, C order
    pub const fn new(a: ExactPoint, b: ExactPoint, c: ExactPoint, kind: TriangleKind) -> Self {
        Self {
            vertices: [a, b, c],
            kind,
        }
    }

    /// Apex
    pub const fn a(&self) -> &ExactPoint {
        &self.vertices[0]
    }

    /// Second corner
    pub const fn b(&self) -> &ExactPoint {
        &self.vertices[1]
    }

    /// Third corner
    pub const fn c(&self) -> &ExactPoint {
        &self.vertices[2]
    }

    /// Corners rounded to floats
    pub fn to_f64(&self) -> [Point2<f64>; 3] {
        [self.a().to_f64(), self.b().to_f64(), self.c().to_f64()]
    }
}

// Point on the segment from `from` towards `to` at 1/φ of its length
fn golden_section(from: &ExactPoint, to: &ExactPoint, phi: &GoldenField) -> Result<ExactPoint> {
    Ok(from + &(to - from).checked_div(phi)?)
}

/// Wheel of ten red triangles around `center`, every second one mirrored
///
/// Rim corners are computed once and shared by both neighbours.
///
/// # Errors
///
/// Returns an error if a corner cannot be represented exactly
pub fn starting_wheel(center: &ExactPoint, radius: &GoldenField) -> Result<Vec<RobinsonTriangle>> {
    let rim = (0..10_i32)
        .map(|k| Ok(ExactPoint::of_angle(f64::from(2 * k - 1) * PI / 10.0)?.scale(radius)))
        .collect::<Result<Vec<_>>>()?;

    Ok(rim
        .iter()
        .zip(rim.iter().cycle().skip(1))
        .enumerate()
        .map(|(i, (first, second))| {
            let (b, c) = if i % 2 == 0 {
                (center + second, center + first)
            } else {
                (center + first, center + second)
            };
            RobinsonTriangle::new(center.clone(), b, c, TriangleKind::Red)
        })
        .collect())
}

/// Replace one triangle by its deflated children
///
/// # Errors
///
/// Returns [`crate::AlgorithmError::DivisionByZero`] if exact division fails
pub fn subdivide_triangle(
    triangle: &RobinsonTriangle,
    rule: SplitRule,
) -> Result<Vec<RobinsonTriangle>> {
    use TriangleKind::{Blue, Red};

    let phi = GoldenField::golden_ratio();
    let (a, b, c) = (triangle.a(), triangle.b(), triangle.c());

    Ok(match (rule, triangle.kind) {
        (SplitRule::HalfRhombus, Red) => {
            let p = golden_section(a, b, &phi)?;
            vec![
                RobinsonTriangle::new(c.clone(), p.clone(), b.clone(), Red),
                RobinsonTriangle::new(p, c.clone(), a.clone(), Blue),
            ]
        }
        (SplitRule::HalfRhombus, Blue) => {
            let q = golden_section(b, a, &phi)?;
            let r = golden_section(b, c, &phi)?;
            vec![
                RobinsonTriangle::new(r.clone(), c.clone(), a.clone(), Blue),
                RobinsonTriangle::new(q.clone(), r.clone(), b.clone(), Blue),
                RobinsonTriangle::new(r, q, a.clone(), Red),
            ]
        }
        (SplitRule::HalfKite, Red) => {
            let q = golden_section(a, b, &phi)?;
            let r = golden_section(b, c, &phi)?;
            vec![
                RobinsonTriangle::new(r.clone(), q.clone(), b.clone(), Blue),
                RobinsonTriangle::new(q, a.clone(), r.clone(), Red),
                RobinsonTriangle::new(c.clone(), a.clone(), r, Red),
            ]
        }
        (SplitRule::HalfKite, Blue) => {
            let p = golden_section(c, a, &phi)?;
            vec![
                RobinsonTriangle::new(b.clone(), p.clone(), a.clone(), Blue),
                RobinsonTriangle::new(p, c.clone(), b.clone(), Red),
            ]
        }
    })
}

/// Apply `depth` deflation passes, keeping children in parent order
///
/// # Errors
///
/// Propagates exact arithmetic failures
pub fn subdivide_triangles(
    triangles: Vec<RobinsonTriangle>,
    rule: SplitRule,
    depth: usize,
) -> Result<Vec<RobinsonTriangle>> {
    let mut current = triangles;
    for pass in 0..depth {
        let mut next = Vec::with_capacity(current.len() * 3);
        for triangle in &current {
            next.extend(subdivide_triangle(triangle, rule)?);
        }
        log::debug!("triangle pass {}: {} triangles", pass + 1, next.len());
        current = next;
    }
    Ok(current)
}
