//! OpenSCAD export of extruded tiles
//!
//! Every slab becomes the hull of two quads, coloured by material class so
//! the thick and thin tiles can be printed or rendered separately.

use crate::algorithm::extrusion::ExtrudedTile;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::tiles::Shape;
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// OpenSCAD colour module applied to a material class
pub const fn material(shape: Shape) -> &'static str {
    match shape {
        Shape::Thick => "green()",
        Shape::Thin => "blue()",
    }
}

fn write_quad<W: Write>(writer: &mut W, quad: &[Point3<f64>; 4]) -> std::io::Result<()> {
    let points = quad
        .iter()
        .map(|p| format!("[{}, {}, {}]", p.x, p.y, p.z))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(
        writer,
        "    polyhedron(points=[{points}], faces=[[0, 1, 2, 3]]);"
    )
}

fn fs_error<'a>(
    operation: &'static str,
    target: &'a Path,
) -> impl FnOnce(std::io::Error) -> AlgorithmError + 'a {
    move |source| AlgorithmError::FileSystem {
        path: target.to_path_buf(),
        operation,
        source,
    }
}

/// Write a module named `module` containing one hull per tile
///
/// # Errors
///
/// Propagates write failures
pub fn write_scad<W: Write>(
    writer: &mut W,
    tiles: &[ExtrudedTile],
    module: &str,
) -> std::io::Result<()> {
    writeln!(writer, "module {module}() {{")?;
    for tile in tiles {
        writeln!(writer, "  {} hull() {{", material(tile.shape))?;
        write_quad(writer, &tile.inner)?;
        write_quad(writer, &tile.outer)?;
        writeln!(writer, "  }}")?;
    }
    writeln!(writer, "}}")
}

/// Write the module to `path`, creating parent directories
///
/// # Errors
///
/// Returns [`AlgorithmError::FileSystem`] if the file cannot be created or written
pub fn export_scad(path: &Path, tiles: &[ExtrudedTile], module: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(fs_error("create directory", parent))?;
    }
    let file = File::create(path).map_err(fs_error("create file", path))?;
    let mut writer = BufWriter::new(file);
    write_scad(&mut writer, tiles, module).map_err(fs_error("write scad", path))?;
    writer.flush().map_err(fs_error("write scad", path))?;

    log::info!("wrote {} ({} tiles)", path.display(), tiles.len());
    Ok(())
}
