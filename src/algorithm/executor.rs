use crate::{
    algorithm::constraints::{ConstraintSystem, encode},
    algorithm::deduplication::{DedupStats, Deduplicator, PlanarGraph},
    algorithm::extrusion::{ExtrudedTile, extrude},
    algorithm::labeling::{apply_assignment, verify_assignment},
    algorithm::solver::{
        Assignment, PropagationSolver, Solver, SolverConfig, SolverStats, require_solution,
    },
    algorithm::subdivision::subdivide_generation,
    io::configuration::{
        DEFAULT_DEPTH, DEFAULT_EPSILON, DEFAULT_THICKNESS, MAX_DEPTH, SEED_OFFSET_X,
        SEED_OFFSET_Y, SEED_ROTATION_DEGREES, SEED_SCALE,
    },
    io::error::{Result, Stage, WithContext, invalid_parameter},
    math::transform::Transform,
    spatial::grid::{MatchStrategy, validate_epsilon},
    spatial::tiles::Tile,
};
use std::fmt;
use std::time::{Duration, Instant};

/// Pipeline parameters
#[derive(Clone, Copy, Debug)]
pub struct RoofConfig {
    /// Number of subdivision passes
    pub depth: usize,
    /// L1 merge tolerance for centers and corners
    pub epsilon: f64,
    /// Point matcher used by deduplication
    pub strategy: MatchStrategy,
    /// Extrusion distance along tile normals
    pub thickness: f64,
    /// Run subdivision passes on the rayon pool
    pub parallel: bool,
    /// Solver limits and value ordering
    pub solver: SolverConfig,
    /// Placement of the seed tile
    pub placement: Transform,
}

impl Default for RoofConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            epsilon: DEFAULT_EPSILON,
            strategy: MatchStrategy::default(),
            thickness: DEFAULT_THICKNESS,
            parallel: false,
            solver: SolverConfig::default(),
            placement: default_placement(),
        }
    }
}

/// Seed placement used for rendering on the reference canvas
pub fn default_placement() -> Transform {
    Transform::new(
        SEED_OFFSET_X,
        SEED_OFFSET_Y,
        SEED_ROTATION_DEGREES,
        SEED_SCALE,
    )
}

/// Wall time spent in one stage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageTiming {
    /// Stage measured
    pub stage: Stage,
    /// Time spent
    pub elapsed: Duration,
}

impl fmt::Display for StageTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.elapsed.as_secs_f64();
        if seconds >= 1.0 {
            write!(f, "{}: {seconds:.3} s", self.stage)
        } else if seconds >= 1e-3 {
            write!(f, "{}: {:.3} ms", self.stage, seconds * 1e3)
        } else {
            write!(f, "{}: {} µs", self.stage, self.elapsed.as_micros())
        }
    }
}

/// Everything a completed run produces
#[derive(Clone, Debug)]
pub struct Roof {
    /// Labeled tiles and their vertices
    pub graph: PlanarGraph,
    /// Tiles emitted by subdivision before merging
    pub raw_tiles: usize,
    /// Merge counters
    pub dedup: DedupStats,
    /// Solved vertex heights
    pub assignment: Assignment,
    /// Search counters
    pub solver: SolverStats,
    /// Slabs in tile order
    pub extruded: Vec<ExtrudedTile>,
    /// Per-stage wall times in execution order
    pub timings: Vec<StageTiming>,
}

/// Staged driver of subdivision, merging, solving, labeling and extrusion
///
/// Stages can be called one at a time, which lets callers report progress
/// between them, or all together through [`RoofGenerator::run`].
pub struct RoofGenerator {
    config: RoofConfig,
    timings: Vec<StageTiming>,
    solver_stats: SolverStats,
}

impl RoofGenerator {
    /// Validate the configuration and create a generator
    ///
    /// # Errors
    ///
    /// Returns an error if the depth exceeds the limit, epsilon is not
    /// positive and finite, or thickness is not finite
    pub fn new(config: RoofConfig) -> Result<Self> {
        if config.depth > MAX_DEPTH {
            return Err(invalid_parameter(
                "depth",
                &config.depth,
                &format!("must not exceed {MAX_DEPTH}"),
            ));
        }
        validate_epsilon(config.epsilon)?;
        if !config.thickness.is_finite() {
            return Err(invalid_parameter(
                "thickness",
                &config.thickness,
                &"must be a finite number",
            ));
        }
        Ok(Self {
            config,
            timings: Vec::new(),
            solver_stats: SolverStats::default(),
        })
    }

    /// Active configuration
    pub const fn config(&self) -> &RoofConfig {
        &self.config
    }

    /// Stage timings recorded so far
    pub fn timings(&self) -> &[StageTiming] {
        &self.timings
    }

    fn record(&mut self, stage: Stage, start: Instant) {
        let timing = StageTiming {
            stage,
            elapsed: start.elapsed(),
        };
        log::info!("{timing}");
        self.timings.push(timing);
    }

    /// The single thick tile every run starts from
    pub fn seed(&self) -> Vec<Tile> {
        vec![Tile::seed(self.config.placement)]
    }

    /// One subdivision pass, timed under the subdivision stage
    pub fn subdivide_once(&mut self, tiles: &[Tile]) -> Vec<Tile> {
        let start = Instant::now();
        let next = subdivide_generation(tiles, self.config.parallel);
        self.record(Stage::Subdivision, start);
        next
    }

    /// All configured subdivision passes from the seed
    pub fn subdivide(&mut self) -> Vec<Tile> {
        let mut tiles = self.seed();
        for _ in 0..self.config.depth {
            tiles = self.subdivide_once(&tiles);
        }
        log::info!("{} tiles after {} passes", tiles.len(), self.config.depth);
        tiles
    }

    /// Merge duplicate tiles and corners into a planar graph
    ///
    /// # Errors
    ///
    /// Propagates deduplication failures
    pub fn deduplicate(&mut self, tiles: Vec<Tile>) -> Result<(PlanarGraph, DedupStats)> {
        let start = Instant::now();
        let built = Deduplicator::new(self.config.epsilon, self.config.strategy)
            .and_then(|deduplicator| deduplicator.build(tiles))
            .with_stage(Stage::Deduplication)?;
        self.record(Stage::Deduplication, start);
        Ok(built)
    }

    /// Emit the height constraint system
    ///
    /// # Errors
    ///
    /// Returns an error if a tile lacks vertices
    pub fn encode(&mut self, graph: &PlanarGraph) -> Result<ConstraintSystem> {
        let start = Instant::now();
        let system = encode(graph).with_stage(Stage::Encoding)?;
        self.record(Stage::Encoding, start);
        Ok(system)
    }

    /// Solve with the bundled propagation solver
    ///
    /// # Errors
    ///
    /// Returns an error if the system is unsatisfiable or the solver times out
    pub fn solve(&mut self, system: &ConstraintSystem) -> Result<Assignment> {
        let mut solver = PropagationSolver::new(self.config.solver);
        let assignment = self.solve_with(&mut solver, system)?;
        self.solver_stats = *solver.stats();
        Ok(assignment)
    }

    /// Solve with any backend
    ///
    /// # Errors
    ///
    /// Returns an error if the system is unsatisfiable or the solver times out
    pub fn solve_with(
        &mut self,
        solver: &mut dyn Solver,
        system: &ConstraintSystem,
    ) -> Result<Assignment> {
        let start = Instant::now();
        let assignment = require_solution(solver, system).with_stage(Stage::Solving)?;
        self.record(Stage::Solving, start);
        Ok(assignment)
    }

    /// Copy heights onto tiles and re-check every clause
    ///
    /// # Errors
    ///
    /// Returns an error if a height is out of range or a clause is violated
    pub fn label(&mut self, graph: &mut PlanarGraph, assignment: &Assignment) -> Result<()> {
        let start = Instant::now();
        verify_assignment(graph, assignment).with_stage(Stage::Labeling)?;
        apply_assignment(graph, assignment).with_stage(Stage::Labeling)?;
        self.record(Stage::Labeling, start);
        Ok(())
    }

    /// Lift and thicken the labeled tiles
    ///
    /// # Errors
    ///
    /// Returns an error if a tile is degenerate
    pub fn extrude(&mut self, graph: &PlanarGraph) -> Result<Vec<ExtrudedTile>> {
        let start = Instant::now();
        let extruded = extrude(graph, self.config.thickness).with_stage(Stage::Geometry)?;
        self.record(Stage::Geometry, start);
        Ok(extruded)
    }

    /// Run every stage in order
    ///
    /// # Errors
    ///
    /// Returns the first stage error; no partial result is produced
    pub fn run(mut self) -> Result<Roof> {
        let tiles = self.subdivide();
        let raw_tiles = tiles.len();
        let (mut graph, dedup) = self.deduplicate(tiles)?;
        let system = self.encode(&graph)?;
        let assignment = self.solve(&system)?;
        self.label(&mut graph, &assignment)?;
        let extruded = self.extrude(&graph)?;
        Ok(Roof {
            graph,
            raw_tiles,
            dedup,
            assignment,
            solver: self.solver_stats,
            extruded,
            timings: self.timings,
        })
    }
}
