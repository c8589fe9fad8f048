//! Raster rendering of the rhombus and triangle tilings and PNG export

use crate::algorithm::deduplication::PlanarGraph;
use crate::io::canvas::{Canvas, FillStyle, RasterCanvas, Rgb, StrokeStyle};
use crate::io::configuration::{
    DARKENING, REFERENCE_CANVAS_SIZE, STROKE_WIDTH, THICK_COLOR, THIN_COLOR, TRIANGLE_MODEL_SIZE,
    VERTEX_MARKER_MAX_DEPTH, VERTEX_MARKER_RADII,
};
use crate::io::error::{AlgorithmError, Result};
use crate::math::transform::Transform;
use crate::spatial::tiles::{HeightIndex, Shape, Tile};
use crate::spatial::triangles::{RobinsonTriangle, TriangleKind};
use image::RgbaImage;
use std::path::Path;

const TRIANGLE_STROKE: Rgb = Rgb::new(0.2, 0.2, 0.2);

/// Base colour of a tile shape darkened for a height index
pub fn shade(shape: Shape, index: HeightIndex) -> Rgb {
    let base = match shape {
        Shape::Thick => THICK_COLOR,
        Shape::Thin => THIN_COLOR,
    };
    let factor = DARKENING
        .get(usize::from(index as u8) - 1)
        .copied()
        .unwrap_or(1.0);
    Rgb::from_hex(base).darkened(factor)
}

/// Gradient from boundary corner 0 to corner 2, shaded by index and opposite
pub fn tile_fill(tile: &Tile) -> FillStyle {
    let [start, _, end, _] = tile.boundary_points();
    FillStyle::LinearGradient {
        start,
        end,
        from: shade(tile.shape, tile.index),
        to: shade(tile.shape, tile.index.opposite()),
    }
}

/// Marker radius for a vertex where `degree` tiles meet
pub fn marker_radius(degree: usize) -> Option<f64> {
    degree
        .checked_sub(1)
        .and_then(|slot| VERTEX_MARKER_RADII.get(slot))
        .copied()
}

/// Map the reference layout, centred on the origin, onto a square canvas
pub fn roof_view(size: u32) -> Transform {
    let half = f64::from(size) / 2.0;
    Transform::new(half, half, 0.0, f64::from(size) / REFERENCE_CANVAS_SIZE)
}

/// Draw every tile, then vertex markers when the tiling is coarse enough
pub fn draw_roof(canvas: &mut dyn Canvas, graph: &PlanarGraph, depth: usize) {
    let outline = StrokeStyle {
        width: STROKE_WIDTH,
        color: Rgb::BLACK,
    };
    for tile in graph.tiles() {
        canvas.polygon(&tile.boundary_points());
        canvas.fill_preserve(&tile_fill(tile));
        canvas.stroke(&outline);
    }

    if depth < VERTEX_MARKER_MAX_DEPTH {
        for vertex in graph.vertices() {
            let Some(radius) = marker_radius(vertex.degree()) else {
                continue;
            };
            canvas.circle(vertex.position, radius);
            canvas.fill_preserve(&FillStyle::Solid(Rgb::WHITE));
            canvas.stroke(&outline);
        }
    }
}

/// Render a labeled tiling onto a square image of `size` pixels
///
/// # Errors
///
/// Returns an error if `size` is zero
pub fn render_roof(graph: &PlanarGraph, depth: usize, size: u32) -> Result<RgbaImage> {
    let mut canvas = RasterCanvas::new(size, size)?.with_transform(roof_view(size));
    draw_roof(&mut canvas, graph, depth);
    canvas.into_image()
}

/// Fill colour of a Robinson triangle
pub const fn triangle_color(kind: TriangleKind) -> Rgb {
    match kind {
        TriangleKind::Red => Rgb::new(1.0, 0.35, 0.35),
        TriangleKind::Blue => Rgb::new(0.4, 0.4, 1.0),
    }
}

/// Fill each triangle and stroke only its two legs C -> A -> B
pub fn draw_triangles(canvas: &mut dyn Canvas, triangles: &[RobinsonTriangle], stroke: f64) {
    let legs = StrokeStyle {
        width: stroke,
        color: TRIANGLE_STROKE,
    };
    for triangle in triangles {
        let [a, b, c] = triangle.to_f64();
        canvas.polygon(&[a, b, c]);
        canvas.fill(&FillStyle::Solid(triangle_color(triangle.kind)));

        canvas.move_to(c);
        canvas.line_to(a);
        canvas.line_to(b);
        canvas.stroke(&legs);
    }
}

/// Render triangles laid out in model space, scaled uniformly to fit
///
/// # Errors
///
/// Returns an error if either dimension is zero
pub fn render_triangles(
    triangles: &[RobinsonTriangle],
    width: u32,
    height: u32,
) -> Result<RgbaImage> {
    let scale = (f64::from(width) / TRIANGLE_MODEL_SIZE).min(f64::from(height) / TRIANGLE_MODEL_SIZE);
    let mut canvas =
        RasterCanvas::new(width, height)?.with_transform(Transform::new(0.0, 0.0, 0.0, scale));
    draw_triangles(&mut canvas, triangles, 1.0);
    canvas.into_image()
}

/// Save an image as PNG, creating parent directories
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn export_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image.save(path).map_err(|e| AlgorithmError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::info!("wrote {}", path.display());
    Ok(())
}
