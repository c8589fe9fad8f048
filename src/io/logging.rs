//! Logger installation for the command-line binary

use crate::io::error::{AlgorithmError, Result};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::path::Path;

/// Terminal level for the given verbosity count
///
/// Quiet runs only show warnings; each `-v` adds one level of detail.
pub const fn terminal_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a terminal logger and, if requested, a debug-level file logger
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a logger is
/// already installed
pub fn init_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        terminal_level(verbosity, quiet),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = File::create(path).map_err(|e| AlgorithmError::FileSystem {
            path: path.to_path_buf(),
            operation: "create log file",
            source: e,
        })?;
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            file,
        ));
    }

    CombinedLogger::init(loggers).map_err(|e| AlgorithmError::Logging {
        reason: e.to_string(),
    })
}
