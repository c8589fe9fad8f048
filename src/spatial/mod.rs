//! Planar data structures of the tiling
//!
//! This module contains spatial-related functionality including:
//! - Rhombus tiles, height indices and arena handles
//! - Boundary geometry, centers and normals
//! - Tolerance-based point matching
//! - The exact Robinson triangle family

/// Boundary points, centers and normals of placed tiles
pub mod geometry;
/// Approximate point matching with linear and hashed lookups
pub mod grid;
/// Tile shapes, height indices and vertex/tile handles
pub mod tiles;
/// Robinson triangles subdivided in exact arithmetic
pub mod triangles;

pub use tiles::{HeightIndex, Shape, Tile, TileId, VertexId};
