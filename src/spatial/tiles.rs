//! Rhombus tiles, height indices and arena handles
//!
//! A tile is a shape, a height index and the transform placing the unit
//! template in the plane. Boundary vertices are attached by deduplication as
//! handles into the planar graph's vertex arena.

use crate::io::error::{AlgorithmError, Result, Stage};
use crate::math::transform::Transform;
use std::fmt;
use std::str::FromStr;

/// The two prototiles of the rhombic substitution grammar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// 72/108 degree rhombus, built at 54 degrees
    Thick,
    /// 36/144 degree rhombus, built at 72 degrees
    Thin,
}

impl Shape {
    /// Whether this is the thick rhombus
    pub const fn is_thick(self) -> bool {
        matches!(self, Self::Thick)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thick => f.write_str("thick"),
            Self::Thin => f.write_str("thin"),
        }
    }
}

impl FromStr for Shape {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "thick" => Ok(Self::Thick),
            "thin" => Ok(Self::Thin),
            other => Err(AlgorithmError::UnknownShape {
                value: other.to_string(),
            }),
        }
    }
}

/// Height index of a tile's primary corner
///
/// The boundary of every tile carries the index at corner 0 and its
/// opposite at corner 2; corners 1 and 3 sit halfway between.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeightIndex {
    /// Height 1
    One = 1,
    /// Height 2
    Two = 2,
    /// Height 3
    Three = 3,
    /// Height 4
    Four = 4,
}

impl HeightIndex {
    /// All indices in ascending order
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// Fixed-point-free involution pairing 1 with 3 and 2 with 4
    pub const fn opposite(self) -> Self {
        match self {
            Self::One => Self::Three,
            Self::Two => Self::Four,
            Self::Three => Self::One,
            Self::Four => Self::Two,
        }
    }

    /// Index given to the thin children of a thick tile
    pub const fn neighbor(self) -> Self {
        match self {
            Self::One | Self::Three => Self::Two,
            Self::Two | Self::Four => Self::Three,
        }
    }

    /// Integer height
    pub const fn value(self) -> i64 {
        self as i64
    }

    /// Height of the two side corners, halfway between index and opposite
    pub fn midpoint(self) -> f64 {
        (self.value() + self.opposite().value()) as f64 / 2.0
    }
}

impl TryFrom<i64> for HeightIndex {
    type Error = AlgorithmError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            _ => Err(AlgorithmError::InvalidHeight { value }),
        }
    }
}

impl fmt::Display for HeightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Handle of a vertex in the planar graph's arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl VertexId {
    /// Position in the vertex arena
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Handle of a tile in the planar graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

impl TileId {
    /// Position in the tile list
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// One rhombus of the tiling
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Prototile
    pub shape: Shape,
    /// Height at boundary corner 0
    pub index: HeightIndex,
    /// Placement of the unit template
    pub transform: Transform,
    /// Boundary vertices in canonical order, set by deduplication
    pub point_indices: Option<[VertexId; 4]>,
}

impl Tile {
    /// Create a tile not yet attached to any vertices
    pub const fn new(shape: Shape, index: HeightIndex, transform: Transform) -> Self {
        Self {
            shape,
            index,
            transform,
            point_indices: None,
        }
    }

    /// Thick tile with index 1, the usual starting point of a subdivision
    pub const fn seed(transform: Transform) -> Self {
        Self::new(Shape::Thick, HeightIndex::One, transform)
    }

    /// Boundary vertices, failing if deduplication has not attached them
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::MissingVertices`] if `point_indices` is unset
    pub fn vertices(&self, stage: Stage, tile: usize) -> Result<[VertexId; 4]> {
        self.point_indices
            .ok_or(AlgorithmError::MissingVertices { stage, tile })
    }
}
