/// Software canvas with path filling and stroking
pub mod canvas;
/// Command-line parsing and pipeline runner
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types and stage context
pub mod error;
/// Tiling rendering and PNG export
pub mod image;
/// Logger installation
pub mod logging;
/// Stage progress reporting
pub mod progress;
/// OpenSCAD export
pub mod scad;
