//! CLI entry point for the Penrose roof generator

use clap::Parser;
use penroof::io::cli::{Cli, Runner};
use penroof::io::logging::init_logging;

fn main() -> penroof::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    let summary = Runner::new(cli).run()?;
    log::info!(
        "{} tiles, {} vertices, {} files written",
        summary.tiles,
        summary.vertices,
        summary.outputs.len()
    );
    Ok(())
}
