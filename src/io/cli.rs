//! Command-line interface driving the tiling pipeline end to end

use crate::algorithm::executor::{RoofConfig, RoofGenerator, default_placement};
use crate::algorithm::solver::{SolverConfig, ValueOrder};
use crate::io::configuration::{
    DEFAULT_CANVAS_SIZE, DEFAULT_DEPTH, DEFAULT_EPSILON, DEFAULT_OUTPUT_DIR, DEFAULT_SEED,
    DEFAULT_THICKNESS, MAX_DEPTH, SCAD_FILE_NAME, SCAD_MODULE_NAME, TILING_FILE_NAME, TRIANGLE_CANVAS_HEIGHT,
    TRIANGLE_CANVAS_WIDTH, TRIANGLE_MODEL_SIZE, TRIANGLES_FILE_NAME,
};
use crate::io::error::{Result, Stage, invalid_parameter};
use crate::io::image::{export_png, render_roof, render_triangles};
use crate::io::progress::StageProgress;
use crate::io::scad::export_scad;
use crate::math::quadratic::GoldenField;
use crate::spatial::grid::MatchStrategy;
use crate::spatial::triangles::{ExactPoint, SplitRule, starting_wheel, subdivide_triangles};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Tiling family to generate
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Family {
    /// Thick and thin rhombi, solved for heights and extruded
    Rhombus,
    /// Robinson triangles in exact arithmetic, rendered only
    Triangles,
}

/// Point matcher selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Bucketed spatial hash
    Hash,
    /// Naive linear scan
    Linear,
}

impl From<Strategy> for MatchStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Hash => Self::SpatialHash,
            Strategy::Linear => Self::LinearScan,
        }
    }
}

/// Deflation rule for the triangle family
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Split {
    /// Halves of rhombi
    Rhombus,
    /// Halves of kites and darts
    Kite,
}

impl From<Split> for SplitRule {
    fn from(split: Split) -> Self {
        match split {
            Split::Rhombus => Self::HalfRhombus,
            Split::Kite => Self::HalfKite,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "penroof")]
#[command(
    author,
    version,
    about = "Generate Penrose rhombus tilings, solve vertex heights and extrude them into a roof"
)]
/// Command-line arguments for the roof generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Tiling family
    #[arg(long, value_enum, default_value_t = Family::Rhombus)]
    pub family: Family,

    /// Number of subdivision passes
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Extrusion distance along tile normals
    #[arg(short, long, default_value_t = DEFAULT_THICKNESS, allow_negative_numbers = true)]
    pub thickness: f64,

    /// L1 tolerance for merging centers and corners
    #[arg(short, long, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Point matcher used by deduplication
    #[arg(long, value_enum, default_value_t = Strategy::Hash)]
    pub strategy: Strategy,

    /// Deflation rule for the triangle family
    #[arg(long, value_enum, default_value_t = Split::Rhombus)]
    pub split: Split,

    /// Seed for shuffled value ordering
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Try solver values in seeded random order instead of ascending
    #[arg(long)]
    pub shuffle: bool,

    /// Give up solving after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<f64>,

    /// Run subdivision passes in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Edge length of the rendered tiling in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE)]
    pub size: u32,

    /// Directory receiving the output files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Skip the PNG rendering
    #[arg(long)]
    pub no_png: bool,

    /// Skip the OpenSCAD export
    #[arg(long)]
    pub no_scad: bool,

    /// Suppress progress output and informational logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log detail (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write a debug log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Solver settings from the flags
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is negative or not finite
    pub fn solver_config(&self) -> Result<SolverConfig> {
        let timeout = self
            .timeout_secs
            .map(|seconds| {
                Duration::try_from_secs_f64(seconds).map_err(|e| {
                    invalid_parameter("timeout-secs", &seconds, &e)
                })
            })
            .transpose()?;
        let value_order = if self.shuffle {
            ValueOrder::Shuffled { seed: self.seed }
        } else {
            ValueOrder::Ascending
        };
        Ok(SolverConfig {
            timeout,
            value_order,
        })
    }

    /// Pipeline settings from the flags
    ///
    /// # Errors
    ///
    /// Returns an error if the solver settings are invalid
    pub fn roof_config(&self) -> Result<RoofConfig> {
        Ok(RoofConfig {
            depth: self.depth,
            epsilon: self.epsilon,
            strategy: self.strategy.into(),
            thickness: self.thickness,
            parallel: self.parallel,
            solver: self.solver_config()?,
            placement: default_placement(),
        })
    }
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tiles (or triangles) in the final tiling
    pub tiles: usize,
    /// Unique vertices, zero for the triangle family
    pub vertices: usize,
    /// Files written
    pub outputs: Vec<PathBuf>,
}

/// Runs the selected pipeline with progress reporting and file output
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for parsed arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parsed arguments
    pub const fn cli(&self) -> &Cli {
        &self.cli
    }

    /// Run the selected family
    ///
    /// # Errors
    ///
    /// Returns the first pipeline or output error
    pub fn run(&self) -> Result<RunSummary> {
        match self.cli.family {
            Family::Rhombus => self.run_rhombus(),
            Family::Triangles => self.run_triangles(),
        }
    }

    fn run_rhombus(&self) -> Result<RunSummary> {
        let config = self.cli.roof_config()?;
        let mut generator = RoofGenerator::new(config)?;

        let outputs = usize::from(!self.cli.no_png) + usize::from(!self.cli.no_scad);
        let progress = StageProgress::new(config.depth + 5 + outputs, self.cli.should_show_progress());

        let mut tiles = generator.seed();
        for pass in 0..config.depth {
            progress.start(
                Stage::Subdivision,
                &format!("pass {}/{}", pass + 1, config.depth),
            );
            tiles = generator.subdivide_once(&tiles);
            progress.advance();
        }

        progress.start(Stage::Deduplication, &format!("{} tiles", tiles.len()));
        let (mut graph, _) = generator.deduplicate(tiles)?;
        progress.advance();

        progress.start(
            Stage::Encoding,
            &format!("{} vertices", graph.vertices().len()),
        );
        let system = generator.encode(&graph)?;
        progress.advance();

        progress.start(
            Stage::Solving,
            &format!("{} constraints", system.constraint_count()),
        );
        let assignment = generator.solve(&system)?;
        progress.advance();

        progress.start(Stage::Labeling, "");
        generator.label(&mut graph, &assignment)?;
        progress.advance();

        progress.start(Stage::Geometry, "extruding");
        let extruded = generator.extrude(&graph)?;
        progress.advance();

        let mut written = Vec::new();
        if !self.cli.no_png {
            progress.start(Stage::Export, TILING_FILE_NAME);
            let path = self.cli.output_dir.join(TILING_FILE_NAME);
            export_png(&render_roof(&graph, config.depth, self.cli.size)?, &path)?;
            written.push(path);
            progress.advance();
        }
        if !self.cli.no_scad {
            progress.start(Stage::Export, SCAD_FILE_NAME);
            let path = self.cli.output_dir.join(SCAD_FILE_NAME);
            export_scad(&path, &extruded, SCAD_MODULE_NAME)?;
            written.push(path);
            progress.advance();
        }
        progress.finish("done");

        Ok(RunSummary {
            tiles: graph.tiles().len(),
            vertices: graph.vertices().len(),
            outputs: written,
        })
    }

    fn run_triangles(&self) -> Result<RunSummary> {
        if self.cli.depth > MAX_DEPTH {
            return Err(invalid_parameter(
                "depth",
                &self.cli.depth,
                &format!("must not exceed {MAX_DEPTH}"),
            ));
        }
        let progress = StageProgress::new(
            self.cli.depth + 1 + usize::from(!self.cli.no_png),
            self.cli.should_show_progress(),
        );

        let half = (TRIANGLE_MODEL_SIZE / 2.0) as i64;
        let center = ExactPoint::from_integers(half, half);
        let radius = GoldenField::from_integers(
            (TRIANGLE_MODEL_SIZE * std::f64::consts::SQRT_2 / 3.0).floor() as i64,
            0,
        );
        progress.start(Stage::Subdivision, "wheel");
        let mut triangles = starting_wheel(&center, &radius)?;
        progress.advance();

        for pass in 0..self.cli.depth {
            progress.start(
                Stage::Subdivision,
                &format!("pass {}/{}", pass + 1, self.cli.depth),
            );
            triangles = subdivide_triangles(triangles, self.cli.split.into(), 1)?;
            progress.advance();
        }
        log::info!("{} triangles after {} passes", triangles.len(), self.cli.depth);

        let mut written = Vec::new();
        if !self.cli.no_png {
            progress.start(Stage::Export, TRIANGLES_FILE_NAME);
            let path = self.cli.output_dir.join(TRIANGLES_FILE_NAME);
            let image = render_triangles(&triangles, TRIANGLE_CANVAS_WIDTH, TRIANGLE_CANVAS_HEIGHT)?;
            export_png(&image, &path)?;
            written.push(path);
            progress.advance();
        }
        progress.finish("done");

        Ok(RunSummary {
            tiles: triangles.len(),
            vertices: 0,
            outputs: written,
        })
    }
}
