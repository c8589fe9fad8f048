//! Tile and vertex merging into a planar adjacency graph
//!
//! Subdivision emits overlapping copies of tiles shared between parents and
//! repeats every shared corner once per incident tile. Deduplication keeps
//! the first tile at each center, then assigns each boundary corner a vertex
//! handle, allocating a vertex the first time a position is seen.

use crate::io::error::{Result, computation_error};
use crate::spatial::grid::{MatchStrategy, validate_epsilon};
use crate::spatial::tiles::{Tile, TileId, VertexId};
use nalgebra::Point2;
use std::fmt;

/// A unique tiling vertex and the tiles meeting at it
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    /// Position of the first occurrence
    pub position: Point2<f64>,
    /// Incident tiles in discovery order
    pub tiles: Vec<TileId>,
}

impl Vertex {
    /// Number of incident tiles
    pub fn degree(&self) -> usize {
        self.tiles.len()
    }
}

/// Counters describing one deduplication run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Tiles handed to the deduplicator
    pub input_tiles: usize,
    /// Tiles dropped because an earlier tile had the same center
    pub duplicate_tiles: usize,
    /// Boundary corners visited, four per kept tile
    pub boundary_references: usize,
    /// Corners matched to an already known vertex
    pub merged_references: usize,
    /// Vertices allocated
    pub unique_vertices: usize,
}

impl DedupStats {
    /// Tiles kept
    pub const fn unique_tiles(&self) -> usize {
        self.input_tiles - self.duplicate_tiles
    }
}

impl fmt::Display for DedupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tiles -> {} unique ({} duplicates), {} corners -> {} vertices ({} merged)",
            self.input_tiles,
            self.unique_tiles(),
            self.duplicate_tiles,
            self.boundary_references,
            self.unique_vertices,
            self.merged_references
        )
    }
}

/// Deduplicated tiles with their shared vertex arena
#[derive(Clone, Debug)]
pub struct PlanarGraph {
    tiles: Vec<Tile>,
    vertices: Vec<Vertex>,
    epsilon: f64,
    strategy: MatchStrategy,
}

impl PlanarGraph {
    /// Unique tiles, each with its four vertex handles
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The vertex arena
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Look up a tile by handle
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Look up a vertex by handle
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Tolerance the graph was built with
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Matcher the graph was built with
    pub const fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Largest number of tiles meeting at a vertex
    pub fn max_degree(&self) -> usize {
        self.vertices.iter().map(Vertex::degree).max().unwrap_or(0)
    }

    /// Vertex count per degree, indexed by degree
    pub fn degree_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.max_degree() + 1];
        for vertex in &self.vertices {
            if let Some(slot) = histogram.get_mut(vertex.degree()) {
                *slot += 1;
            }
        }
        histogram
    }

    /// Run deduplication again over this graph's own tiles
    ///
    /// # Errors
    ///
    /// Propagates deduplication failures
    pub fn rebuild(&self) -> Result<(Self, DedupStats)> {
        Deduplicator::new(self.epsilon, self.strategy)?.build(self.tiles.clone())
    }

    /// Consume the graph, keeping only the tiles
    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}

/// Builds a [`PlanarGraph`] from raw subdivision output
#[derive(Clone, Copy, Debug)]
pub struct Deduplicator {
    epsilon: f64,
    strategy: MatchStrategy,
}

impl Deduplicator {
    /// Create a deduplicator merging points closer than `epsilon` (L1)
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is not finite and positive
    pub fn new(epsilon: f64, strategy: MatchStrategy) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
            strategy,
        })
    }

    /// Merge tiles by center, then corners into vertices
    ///
    /// # Errors
    ///
    /// Returns an error if a freshly allocated vertex cannot be found again
    pub fn build(&self, tiles: Vec<Tile>) -> Result<(PlanarGraph, DedupStats)> {
        let mut stats = DedupStats {
            input_tiles: tiles.len(),
            ..DedupStats::default()
        };

        let mut centers = self.strategy.matcher(self.epsilon)?;
        let mut unique: Vec<Tile> = Vec::with_capacity(tiles.len());
        for mut tile in tiles {
            let (_, inserted) = centers.find_or_insert(tile.center());
            if inserted {
                tile.point_indices = None;
                unique.push(tile);
            } else {
                stats.duplicate_tiles += 1;
            }
        }

        let mut corners = self.strategy.matcher(self.epsilon)?;
        let mut vertices: Vec<Vertex> = Vec::new();
        for (position, tile) in unique.iter_mut().enumerate() {
            let tile_id = TileId(position);
            let mut handles = [VertexId(0); 4];
            for (handle, point) in handles.iter_mut().zip(tile.boundary_points()) {
                stats.boundary_references += 1;
                let (id, inserted) = corners.find_or_insert(point);
                if inserted {
                    vertices.push(Vertex {
                        position: point,
                        tiles: Vec::new(),
                    });
                } else {
                    stats.merged_references += 1;
                }
                let arena_size = vertices.len();
                vertices
                    .get_mut(id)
                    .ok_or_else(|| {
                        computation_error(
                            "vertex allocation",
                            &format!("vertex {id} missing from arena of {arena_size}"),
                        )
                    })?
                    .tiles
                    .push(tile_id);
                *handle = VertexId(id);
            }
            tile.point_indices = Some(handles);
        }
        stats.unique_vertices = vertices.len();

        log::info!("deduplication: {stats}");
        if stats.unique_tiles() > 1 && stats.merged_references == 0 {
            log::warn!(
                "no corners were merged; epsilon {} is likely too small",
                self.epsilon
            );
        }
        if stats.unique_tiles() > 1 && stats.unique_vertices <= stats.unique_tiles() {
            log::warn!(
                "fewer vertices than tiles; epsilon {} is likely too large",
                self.epsilon
            );
        }

        Ok((
            PlanarGraph {
                tiles: unique,
                vertices,
                epsilon: self.epsilon,
                strategy: self.strategy,
            },
            stats,
        ))
    }
}
