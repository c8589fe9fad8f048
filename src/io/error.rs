//! Error types and context management for tiling pipeline operations

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Pipeline stage in which an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Recursive application of the substitution grammar
    Subdivision,
    /// Resolution of transforms into coordinates and normals
    Geometry,
    /// Tile and vertex merging into the planar graph
    Deduplication,
    /// Emission of height constraints from the planar graph
    Encoding,
    /// Constraint solving
    Solving,
    /// Copying the solved heights back onto tiles
    Labeling,
    /// Extrusion and file output
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Subdivision => "subdivision",
            Self::Geometry => "geometry",
            Self::Deduplication => "deduplication",
            Self::Encoding => "encoding",
            Self::Solving => "solving",
            Self::Labeling => "labeling",
            Self::Export => "export",
        };
        f.write_str(name)
    }
}

/// Main error type for all tiling operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Reciprocal or division by a zero element of the exact field
    DivisionByZero {
        /// Name of the operation that divided
        operation: &'static str,
    },

    /// Tile shape name not recognised by the substitution grammar
    UnknownShape {
        /// The unrecognised shape name
        value: String,
    },

    /// Height value outside the index range [1, 4]
    InvalidHeight {
        /// The offending value
        value: i64,
    },

    /// Algorithm parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Tile used before deduplication assigned its boundary vertices
    MissingVertices {
        /// Stage that needed the vertices
        stage: Stage,
        /// Index of the tile in the planar graph
        tile: usize,
    },

    /// Tile whose quad collapses so that no normal exists
    DegenerateGeometry {
        /// Stage that evaluated the geometry
        stage: Stage,
        /// Index of the tile in the planar graph
        tile: usize,
    },

    /// Constraint refers to a variable the system does not declare
    UnknownVariable {
        /// The undeclared variable
        variable: usize,
        /// Number of declared variables
        variable_count: usize,
    },

    /// The height constraints admit no solution
    Unsatisfiable {
        /// Number of variables in the system
        variables: usize,
        /// Number of constraints in the system
        constraints: usize,
    },

    /// The solver gave up before deciding satisfiability
    SolverTimeout {
        /// Time spent before giving up
        elapsed: Duration,
        /// Number of variables in the system
        variables: usize,
    },

    /// A solved assignment breaks a tile's height clause
    ConstraintViolation {
        /// Index of the tile in the planar graph
        tile: usize,
        /// Heights found at the tile's boundary, in boundary order
        heights: [i64; 4],
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Logger could not be installed
    Logging {
        /// Description of the failure
        reason: String,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero { operation } => {
                write!(f, "Division by zero in exact arithmetic during {operation}")
            }
            Self::UnknownShape { value } => {
                write!(
                    f,
                    "Unknown tile shape '{value}': the grammar only defines thick and thin"
                )
            }
            Self::InvalidHeight { value } => {
                write!(f, "Height {value} is outside the index range 1..=4")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MissingVertices { stage, tile } => {
                write!(
                    f,
                    "Tile {tile} has no boundary vertices during {stage} (deduplication not run?)"
                )
            }
            Self::DegenerateGeometry { stage, tile } => {
                write!(f, "Tile {tile} has degenerate geometry during {stage}")
            }
            Self::UnknownVariable {
                variable,
                variable_count,
            } => {
                write!(
                    f,
                    "Constraint refers to variable {variable} but only {variable_count} are declared"
                )
            }
            Self::Unsatisfiable {
                variables,
                constraints,
            } => {
                write!(
                    f,
                    "Height constraints are unsatisfiable ({variables} variables, {constraints} constraints)"
                )
            }
            Self::SolverTimeout { elapsed, variables } => {
                write!(
                    f,
                    "Solver timed out after {:.3}s on {variables} variables",
                    elapsed.as_secs_f64()
                )
            }
            Self::ConstraintViolation { tile, heights } => {
                write!(
                    f,
                    "Tile {tile} violates its height clause with heights {heights:?}"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Logging { reason } => {
                write!(f, "Failed to initialise logging: {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for algorithm results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Stage being executed
    pub stage: Option<Stage>,
    /// Tile being processed
    pub tile: Option<usize>,
}

/// Enriches error messages with pipeline state information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the stage context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the stage context applied
    fn with_stage(self, stage: Stage) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<AlgorithmError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only tile-scoped errors carry a stage and tile
            match &mut error {
                AlgorithmError::MissingVertices { stage, tile }
                | AlgorithmError::DegenerateGeometry { stage, tile } => {
                    if let Some(s) = context.stage {
                        *stage = s;
                    }
                    if let Some(t) = context.tile {
                        *tile = t;
                    }
                }
                AlgorithmError::ConstraintViolation { tile, .. } => {
                    if let Some(t) = context.tile {
                        *tile = t;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_stage(self, stage: Stage) -> Result<T> {
        self.with_context(ErrorContext {
            stage: Some(stage),
            ..Default::default()
        })
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
