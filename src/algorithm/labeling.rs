//! Copying solved vertex heights back onto tiles

use crate::algorithm::constraints::{Variable, clause_holds};
use crate::algorithm::deduplication::PlanarGraph;
use crate::algorithm::solver::Assignment;
use crate::io::error::{AlgorithmError, Result, Stage};
use crate::spatial::tiles::{HeightIndex, Tile};

fn value_of(assignment: &Assignment, variable: Variable) -> Result<i64> {
    assignment
        .get(variable)
        .ok_or(AlgorithmError::UnknownVariable {
            variable: variable.index(),
            variable_count: assignment.len(),
        })
}

/// Solved heights of a tile's four boundary vertices, in boundary order
///
/// # Errors
///
/// Returns an error if the tile has no vertices or the assignment misses one
pub fn vertex_heights(tile: &Tile, position: usize, assignment: &Assignment) -> Result<[i64; 4]> {
    let [a, b, c, d] = tile.vertices(Stage::Labeling, position)?;
    Ok([
        value_of(assignment, a.into())?,
        value_of(assignment, b.into())?,
        value_of(assignment, c.into())?,
        value_of(assignment, d.into())?,
    ])
}

/// Set every tile's index to the solved height of its boundary vertex 0
///
/// # Errors
///
/// Returns [`AlgorithmError::InvalidHeight`] for a value outside [1, 4]
pub fn apply_assignment(graph: &mut PlanarGraph, assignment: &Assignment) -> Result<()> {
    for (position, tile) in graph.tiles_mut().iter_mut().enumerate() {
        let [first, ..] = tile.vertices(Stage::Labeling, position)?;
        tile.index = HeightIndex::try_from(value_of(assignment, first.into())?)?;
    }
    Ok(())
}

/// Re-check every tile clause against the assignment
///
/// # Errors
///
/// Returns [`AlgorithmError::ConstraintViolation`] for the first tile whose
/// clause does not hold
pub fn verify_assignment(graph: &PlanarGraph, assignment: &Assignment) -> Result<()> {
    for (position, tile) in graph.tiles().iter().enumerate() {
        let heights = vertex_heights(tile, position, assignment)?;
        if !clause_holds(tile.shape, heights) {
            return Err(AlgorithmError::ConstraintViolation {
                tile: position,
                heights,
            });
        }
    }
    Ok(())
}
