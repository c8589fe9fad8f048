//! Height constraints over the vertices of a planar graph
//!
//! Every vertex gets one integer variable with domain [1, 4]. Each tile adds
//! an equality between its two side corners and a disjunction forcing its
//! other two corners to sit one step above and one step below them.

use crate::algorithm::deduplication::PlanarGraph;
use crate::algorithm::domain::HeightDomain;
use crate::io::configuration::{MAX_HEIGHT, MIN_HEIGHT};
use crate::io::error::{AlgorithmError, Result, Stage};
use crate::spatial::tiles::{Shape, TileId, VertexId};
use std::fmt;

/// Integer variable standing for the height of one vertex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub usize);

impl Variable {
    /// Position of the variable in the domain table
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<VertexId> for Variable {
    fn from(vertex: VertexId) -> Self {
        Self(vertex.index())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h_{}", self.0)
    }
}

/// Linear equality `left == right + offset`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Relation {
    /// Constrained variable
    pub left: Variable,
    /// Reference variable
    pub right: Variable,
    /// Difference `left - right`
    pub offset: i64,
}

impl Relation {
    /// Create `left == right + offset`
    pub const fn new(left: Variable, right: Variable, offset: i64) -> Self {
        Self {
            left,
            right,
            offset,
        }
    }

    /// Check the relation on concrete values
    pub const fn holds_for(&self, left: i64, right: i64) -> bool {
        left == right + self.offset
    }

    /// Check the relation against a total assignment
    pub fn holds(&self, values: &[i64]) -> bool {
        match (values.get(self.left.0), values.get(self.right.0)) {
            (Some(&left), Some(&right)) => self.holds_for(left, right),
            _ => false,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            0 => write!(f, "{} == {}", self.left, self.right),
            o if o > 0 => write!(f, "{} == {} + {o}", self.left, self.right),
            o => write!(f, "{} == {} - {}", self.left, self.right, -o),
        }
    }
}

/// Disjunction of conjunctions of relations, owned by one tile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disjunction {
    /// Alternatives, each a conjunction
    pub branches: Vec<Vec<Relation>>,
    /// Tile the clause was emitted for
    pub tile: TileId,
}

impl Disjunction {
    /// Check whether some branch holds entirely
    pub fn holds(&self, values: &[i64]) -> bool {
        self.branches
            .iter()
            .any(|branch| branch.iter().all(|relation| relation.holds(values)))
    }
}

/// Integer variables with explicit domains, equalities and disjunctions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintSystem {
    /// Domain per variable
    pub domains: Vec<HeightDomain>,
    /// Unconditional equalities
    pub equalities: Vec<Relation>,
    /// Per-tile disjunctions
    pub disjunctions: Vec<Disjunction>,
}

impl ConstraintSystem {
    /// System of `variable_count` unconstrained variables over `[lower, upper]`
    ///
    /// # Errors
    ///
    /// Returns an error if `lower > upper`
    pub fn new(variable_count: usize, lower: i64, upper: i64) -> Result<Self> {
        let domain = HeightDomain::range(lower, upper)?;
        Ok(Self {
            domains: vec![domain; variable_count],
            equalities: Vec::new(),
            disjunctions: Vec::new(),
        })
    }

    /// Number of variables
    pub fn variable_count(&self) -> usize {
        self.domains.len()
    }

    /// Number of equalities plus disjunctions
    pub fn constraint_count(&self) -> usize {
        self.equalities.len() + self.disjunctions.len()
    }

    fn check_variable(&self, variable: Variable) -> Result<()> {
        if variable.0 < self.domains.len() {
            Ok(())
        } else {
            Err(AlgorithmError::UnknownVariable {
                variable: variable.0,
                variable_count: self.domains.len(),
            })
        }
    }

    fn check_relation(&self, relation: &Relation) -> Result<()> {
        self.check_variable(relation.left)?;
        self.check_variable(relation.right)
    }

    /// Add an unconditional equality
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::UnknownVariable`] for undeclared variables
    pub fn add_equality(&mut self, relation: Relation) -> Result<()> {
        self.check_relation(&relation)?;
        self.equalities.push(relation);
        Ok(())
    }

    /// Add a disjunction
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::UnknownVariable`] for undeclared variables
    pub fn add_disjunction(&mut self, disjunction: Disjunction) -> Result<()> {
        for relation in disjunction.branches.iter().flatten() {
            self.check_relation(relation)?;
        }
        self.disjunctions.push(disjunction);
        Ok(())
    }

    /// Check that every constraint refers to a declared variable
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::UnknownVariable`] for the first offender
    pub fn validate(&self) -> Result<()> {
        for relation in self
            .equalities
            .iter()
            .chain(self.disjunctions.iter().flat_map(|d| d.branches.iter().flatten()))
        {
            self.check_relation(relation)?;
        }
        Ok(())
    }

    /// Check a total assignment against domains and every constraint
    pub fn is_satisfied_by(&self, values: &[i64]) -> bool {
        values.len() == self.domains.len()
            && self
                .domains
                .iter()
                .zip(values)
                .all(|(domain, &value)| domain.contains(value))
            && self.equalities.iter().all(|relation| relation.holds(values))
            && self
                .disjunctions
                .iter()
                .all(|disjunction| disjunction.holds(values))
    }
}

/// Clause for one tile whose boundary vertices are given in canonical order
///
/// Thick (bottom, right, top, left): `right == left` and top/bottom one step
/// above and below `right`, in either order. Thin (right, top, left, bottom):
/// `top == bottom` and right/left one step below and above `top`, in either
/// order.
pub fn tile_clause(shape: Shape, vertices: [VertexId; 4], tile: TileId) -> (Relation, Disjunction) {
    let [p0, p1, p2, p3] = vertices.map(Variable::from);
    let (equality, branches) = match shape {
        Shape::Thick => {
            let (bottom, right, top, left) = (p0, p1, p2, p3);
            (
                Relation::new(right, left, 0),
                vec![
                    vec![Relation::new(top, right, 1), Relation::new(bottom, right, -1)],
                    vec![Relation::new(top, right, -1), Relation::new(bottom, right, 1)],
                ],
            )
        }
        Shape::Thin => {
            let (right, top, left, bottom) = (p0, p1, p2, p3);
            (
                Relation::new(top, bottom, 0),
                vec![
                    vec![Relation::new(right, top, -1), Relation::new(left, top, 1)],
                    vec![Relation::new(left, top, -1), Relation::new(right, top, 1)],
                ],
            )
        }
    };
    (equality, Disjunction { branches, tile })
}

/// Check a tile's clause on concrete heights in canonical boundary order
pub fn clause_holds(shape: Shape, heights: [i64; 4]) -> bool {
    match shape {
        Shape::Thick => {
            let [bottom, right, top, left] = heights;
            right == left
                && ((top == right + 1 && bottom == right - 1)
                    || (top == right - 1 && bottom == right + 1))
        }
        Shape::Thin => {
            let [right, top, left, bottom] = heights;
            top == bottom
                && ((right == top - 1 && left == top + 1) || (left == top - 1 && right == top + 1))
        }
    }
}

/// Emit one variable per vertex and one clause per tile
///
/// # Errors
///
/// Returns [`AlgorithmError::MissingVertices`] for a tile that was not
/// attached to the vertex arena
pub fn encode(graph: &PlanarGraph) -> Result<ConstraintSystem> {
    let mut system = ConstraintSystem::new(graph.vertices().len(), MIN_HEIGHT, MAX_HEIGHT)?;
    for (position, tile) in graph.tiles().iter().enumerate() {
        let vertices = tile.vertices(Stage::Encoding, position)?;
        let (equality, disjunction) = tile_clause(tile.shape, vertices, TileId(position));
        system.add_equality(equality)?;
        system.add_disjunction(disjunction)?;
    }
    log::info!(
        "encoded {} variables, {} equalities, {} disjunctions",
        system.variable_count(),
        system.equalities.len(),
        system.disjunctions.len()
    );
    Ok(system)
}
