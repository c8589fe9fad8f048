//! Thickening of the labeled tiling into a 3D roof surface
//!
//! Each tile becomes a slab: the quad lifted to its boundary heights, and a
//! copy of it pushed out along the tile normal. Downstream tools take the
//! convex hull of the two quads.

use crate::algorithm::deduplication::PlanarGraph;
use crate::io::error::{AlgorithmError, Result, Stage, invalid_parameter};
use crate::spatial::tiles::{Shape, TileId};
use nalgebra::{Point3, Vector3};

/// One slab of the roof
#[derive(Clone, Debug, PartialEq)]
pub struct ExtrudedTile {
    /// Source tile
    pub tile: TileId,
    /// Material class
    pub shape: Shape,
    /// Boundary lifted to its heights
    pub inner: [Point3<f64>; 4],
    /// Boundary offset by the normal times the thickness
    pub outer: [Point3<f64>; 4],
    /// Unit normal of the lifted quad
    pub normal: Vector3<f64>,
}

/// Lift every tile and offset it along its normal, in tile order
///
/// # Errors
///
/// Returns an error if `thickness` is not finite or a tile is degenerate
pub fn extrude(graph: &PlanarGraph, thickness: f64) -> Result<Vec<ExtrudedTile>> {
    if !thickness.is_finite() {
        return Err(invalid_parameter(
            "thickness",
            &thickness,
            &"must be a finite number",
        ));
    }

    graph
        .tiles()
        .iter()
        .enumerate()
        .map(|(position, tile)| {
            let normal = tile.normal().ok_or(AlgorithmError::DegenerateGeometry {
                stage: Stage::Geometry,
                tile: position,
            })?;
            let inner = tile.boundary_with_heights().map(|point| point.lifted());
            let outer = inner.map(|point| point + normal * thickness);
            Ok(ExtrudedTile {
                tile: TileId(position),
                shape: tile.shape,
                inner,
                outer,
                normal,
            })
        })
        .collect()
}
