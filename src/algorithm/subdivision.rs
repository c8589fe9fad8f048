//! Substitution grammar for thick and thin rhombi
//!
//! Each pass replaces a thick tile by three thick and two thin children and a
//! thin tile by two thick and two thin children, all contracted by
//! `1 / (2 sin 54°)`. Children are placed by composing the parent transform
//! with a fixed local transform, so a pass is a pure function of its input.

use crate::io::configuration::{MAX_DEPTH, THICK_HALF_ANGLE_DEGREES, THIN_HALF_ANGLE_DEGREES};
use crate::io::error::{Result, invalid_parameter};
use crate::math::transform::Transform;
use crate::spatial::tiles::{HeightIndex, Shape, Tile};
use rayon::prelude::*;
use std::sync::LazyLock;

/// How a child's height index derives from its parent's
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexRule {
    /// Parent index unchanged
    Same,
    /// [`HeightIndex::opposite`] of the parent index
    Opposite,
    /// [`HeightIndex::neighbor`] of the parent index
    Neighbor,
}

impl IndexRule {
    /// Child index for a parent with `index`
    pub const fn apply(self, index: HeightIndex) -> HeightIndex {
        match self {
            Self::Same => index,
            Self::Opposite => index.opposite(),
            Self::Neighbor => index.neighbor(),
        }
    }
}

/// One child of a substitution rule
#[derive(Clone, Copy, Debug)]
pub struct ChildRule {
    /// Prototile of the child
    pub shape: Shape,
    /// Index derivation
    pub index: IndexRule,
    /// Placement relative to the parent template
    pub local: Transform,
}

/// Linear contraction applied at every pass
pub fn contraction() -> f64 {
    1.0 / (2.0 * THICK_HALF_ANGLE_DEGREES.to_radians().sin())
}

fn child(shape: Shape, index: IndexRule, x: f64, y: f64, degrees: f64) -> ChildRule {
    ChildRule {
        shape,
        index,
        local: Transform::new(x, y, degrees, contraction()),
    }
}

static THICK_RULE: LazyLock<[ChildRule; 5]> = LazyLock::new(|| {
    let (s, c) = THICK_HALF_ANGLE_DEGREES.to_radians().sin_cos();
    [
        child(
            Shape::Thick,
            IndexRule::Opposite,
            0.0,
            2.0 * s - 1.0 / (2.0 * s),
            180.0,
        ),
        child(Shape::Thick, IndexRule::Opposite, 0.0, 2.0 * s, 180.0 - 36.0),
        child(Shape::Thick, IndexRule::Opposite, 0.0, 2.0 * s, 180.0 + 36.0),
        child(Shape::Thin, IndexRule::Neighbor, -c, s, 90.0 + 36.0),
        child(Shape::Thin, IndexRule::Neighbor, c, s, 90.0 - 36.0),
    ]
});

static THIN_RULE: LazyLock<[ChildRule; 4]> = LazyLock::new(|| {
    let c = THIN_HALF_ANGLE_DEGREES.to_radians().cos();
    [
        child(Shape::Thick, IndexRule::Same, 0.0, 0.0, 18.0),
        child(Shape::Thick, IndexRule::Same, 0.0, 0.0, 180.0 - 18.0),
        child(Shape::Thin, IndexRule::Opposite, -2.0 * c, 0.0, 270.0 - 18.0),
        child(Shape::Thin, IndexRule::Opposite, -2.0 * c, 0.0, 90.0 + 18.0),
    ]
});

/// Children produced for a shape, in output order
pub fn rule(shape: Shape) -> &'static [ChildRule] {
    match shape {
        Shape::Thick => THICK_RULE.as_slice(),
        Shape::Thin => THIN_RULE.as_slice(),
    }
}

/// Apply the grammar to one tile
pub fn subdivide(tile: &Tile) -> Vec<Tile> {
    rule(tile.shape)
        .iter()
        .map(|child| {
            Tile::new(
                child.shape,
                child.index.apply(tile.index),
                tile.transform.compose(&child.local),
            )
        })
        .collect()
}

/// Subdivide every tile, concatenating children in parent order
///
/// The parallel path produces exactly the sequential order.
pub fn subdivide_generation(tiles: &[Tile], parallel: bool) -> Vec<Tile> {
    if parallel {
        tiles.par_iter().flat_map_iter(subdivide).collect()
    } else {
        tiles.iter().flat_map(subdivide).collect()
    }
}

/// Apply `depth` passes to `seed`; depth 0 returns the seed unchanged
///
/// # Errors
///
/// Returns an error if `depth` exceeds [`MAX_DEPTH`]
pub fn subdivide_n(seed: Vec<Tile>, depth: usize, parallel: bool) -> Result<Vec<Tile>> {
    if depth > MAX_DEPTH {
        return Err(invalid_parameter(
            "depth",
            &depth,
            &format!("must not exceed {MAX_DEPTH}"),
        ));
    }

    let mut tiles = seed;
    for pass in 0..depth {
        tiles = subdivide_generation(&tiles, parallel);
        log::debug!("subdivision pass {}: {} tiles", pass + 1, tiles.len());
    }
    Ok(tiles)
}

/// Tile counts of a generation, before deduplication
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GenerationCounts {
    /// Thick tiles
    pub thick: usize,
    /// Thin tiles
    pub thin: usize,
}

impl GenerationCounts {
    /// Counts of an existing tile list
    pub fn of(tiles: &[Tile]) -> Self {
        let thick = tiles.iter().filter(|tile| tile.shape.is_thick()).count();
        Self {
            thick,
            thin: tiles.len() - thick,
        }
    }

    /// Counts after one more pass
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            thick: 3 * self.thick + 2 * self.thin,
            thin: 2 * self.thick + 2 * self.thin,
        }
    }

    /// All tiles
    pub const fn total(self) -> usize {
        self.thick + self.thin
    }
}

/// Counts predicted for `depth` passes from a single thick tile
pub fn generation_counts(depth: usize) -> GenerationCounts {
    (0..depth).fold(GenerationCounts { thick: 1, thin: 0 }, |counts, _| {
        counts.next()
    })
}
