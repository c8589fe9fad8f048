//! Pipeline constants and runtime configuration defaults

// Substitution grammar
/// Angle (degrees) at which the thick rhombus template is built
pub const THICK_HALF_ANGLE_DEGREES: f64 = 54.0;
/// Angle (degrees) at which the thin rhombus template is built
pub const THIN_HALF_ANGLE_DEGREES: f64 = 72.0;

// Safety limit, tile count grows roughly 4.5x per pass
/// Maximum subdivision depth accepted by the generator
pub const MAX_DEPTH: usize = 9;

/// Default number of subdivision passes
pub const DEFAULT_DEPTH: usize = 5;

// Seed placement in canvas coordinates, origin at the image centre
/// Horizontal offset of the seed tile
pub const SEED_OFFSET_X: f64 = 0.0;
/// Vertical offset of the seed tile
pub const SEED_OFFSET_Y: f64 = -400.0;
/// Rotation of the seed tile in degrees
pub const SEED_ROTATION_DEGREES: f64 = 0.0;
/// Scale of the seed tile
pub const SEED_SCALE: f64 = 430.0;

// Absolute tolerance; must stay well below the final edge length
// (seed scale * 0.618^depth) and well above accumulated float drift
/// L1 distance under which two points are merged
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Upper bound on the number of tiles meeting at one vertex in this family
pub const MAX_VERTEX_DEGREE: usize = 7;

/// Lowest height a vertex may take
pub const MIN_HEIGHT: i64 = 1;
/// Highest height a vertex may take
pub const MAX_HEIGHT: i64 = 4;

/// Default extrusion distance along each tile normal
pub const DEFAULT_THICKNESS: f64 = 1.0;

/// Fixed seed for reproducible shuffled value ordering
pub const DEFAULT_SEED: u64 = 42;

// Rendering
/// Edge length in pixels of the rendered image
pub const DEFAULT_CANVAS_SIZE: u32 = 1080;
/// Canvas size the seed placement was laid out for
pub const REFERENCE_CANVAS_SIZE: f64 = 1080.0;
/// Base colour of thick tiles
pub const THICK_COLOR: u32 = 0x0062_ae19;
/// Base colour of thin tiles
pub const THIN_COLOR: u32 = 0x0080_afe1;
/// Brightness factor for heights 1..=4
pub const DARKENING: [f64; 4] = [0.1, 0.4, 0.7, 1.0];
/// Width of tile outlines in pixels
pub const STROKE_WIDTH: f64 = 4.0;
/// Vertex markers are only drawn below this depth
pub const VERTEX_MARKER_MAX_DEPTH: usize = 5;
/// Marker radius for vertex degrees 1..=7
pub const VERTEX_MARKER_RADII: [f64; MAX_VERTEX_DEGREE] = [4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0];
/// Segments used to approximate circles on the canvas
pub const CIRCLE_SEGMENTS: usize = 32;

// Triangle family, laid out in a 300x300 model space
/// Model-space edge length of the triangle wheel's bounding square
pub const TRIANGLE_MODEL_SIZE: f64 = 300.0;
/// Output width for the triangle family
pub const TRIANGLE_CANVAS_WIDTH: u32 = 800;
/// Output height for the triangle family
pub const TRIANGLE_CANVAS_HEIGHT: u32 = 600;

// Output settings
/// File name of the rendered rhombus tiling
pub const TILING_FILE_NAME: &str = "tiling.png";
/// File name of the rendered triangle tiling
pub const TRIANGLES_FILE_NAME: &str = "triangles.png";
/// File name of the OpenSCAD export
pub const SCAD_FILE_NAME: &str = "autogen.scad";
/// Name of the OpenSCAD module wrapping all tiles
pub const SCAD_MODULE_NAME: &str = "autogen";
/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
