//! Penrose rhombus tilings lifted into three dimensions
//!
//! A single thick rhombus is subdivided into a Penrose tiling, duplicate
//! tiles and corners are merged into a planar graph, and every vertex is
//! assigned an integer height so each tile becomes a tilted quad. The
//! labeled tiling is rendered to PNG and extruded into OpenSCAD slabs.

#![forbid(unsafe_code)]

/// Subdivision, deduplication, height constraints, solving and extrusion
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Exact golden-field arithmetic and affine transforms
pub mod math;
/// Tile types, geometry, point matching and Robinson triangles
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
