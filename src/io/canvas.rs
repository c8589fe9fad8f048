//! 2D drawing boundary and its tiny-skia raster backend
//!
//! Drawing code builds a path with `move_to`/`line_to`/`close_path` in user
//! coordinates and then fills or strokes it. [`RasterCanvas`] maps user
//! coordinates through a [`Transform`] into pixels of a tiny-skia pixmap,
//! fills with the even-odd rule and strokes with round joins and caps, all
//! anti-aliased.

use crate::io::configuration::CIRCLE_SEGMENTS;
use crate::io::error::{Result, computation_error, invalid_parameter};
use crate::math::transform::Transform;
use image::{Rgba, RgbaImage};
use nalgebra::Point2;
use std::f64::consts::TAU;
use tiny_skia::{
    Color, FillRule, GradientStop, LineCap, LineJoin, LinearGradient, Paint, PathBuilder, Pixmap,
    Shader, SpreadMode, Stroke,
};

/// Opaque colour with channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    /// Red channel
    pub red: f64,
    /// Green channel
    pub green: f64,
    /// Blue channel
    pub blue: f64,
}

impl Rgb {
    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a colour from channel values
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Decode `0xRRGGBB`
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| f64::from((hex >> shift) & 0xff) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Scale every channel by `factor`
    #[must_use]
    pub fn darkened(self, factor: f64) -> Self {
        Self::new(self.red * factor, self.green * factor, self.blue * factor)
    }

    /// Quantize to an opaque 8-bit pixel
    pub fn to_rgba(self) -> Rgba<u8> {
        let quantize = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([
            quantize(self.red),
            quantize(self.green),
            quantize(self.blue),
            255,
        ])
    }
}

/// Paint used by fills
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FillStyle {
    /// Uniform colour
    Solid(Rgb),
    /// Two-stop gradient along the segment `start -> end`, clamped beyond it
    LinearGradient {
        /// Where `from` applies
        start: Point2<f64>,
        /// Where `to` applies
        end: Point2<f64>,
        /// Colour at `start`
        from: Rgb,
        /// Colour at `end`
        to: Rgb,
    },
}

impl FillStyle {
    /// The same paint with its geometry mapped through `transform`
    #[must_use]
    pub fn mapped(&self, transform: &Transform) -> Self {
        match *self {
            Self::Solid(color) => Self::Solid(color),
            Self::LinearGradient {
                start,
                end,
                from,
                to,
            } => Self::LinearGradient {
                start: transform.apply(start.x, start.y),
                end: transform.apply(end.x, end.y),
                from,
                to,
            },
        }
    }
}

/// Pen used by strokes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Line width in user units
    pub width: f64,
    /// Line colour
    pub color: Rgb,
}

/// One recorded path command, in device coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    /// Start a new subpath
    MoveTo(Point2<f64>),
    /// Extend the current subpath
    LineTo(Point2<f64>),
    /// Close the current subpath back to its start
    Close,
}

/// Path-based 2D drawing surface
pub trait Canvas {
    /// Begin a new subpath at `point`
    fn move_to(&mut self, point: Point2<f64>);

    /// Add a straight segment to `point`
    fn line_to(&mut self, point: Point2<f64>);

    /// Close the current subpath
    fn close_path(&mut self);

    /// Discard the current path
    fn clear_path(&mut self);

    /// Fill the current path and keep it
    fn fill_preserve(&mut self, style: &FillStyle);

    /// Stroke the current path and keep it
    fn stroke_preserve(&mut self, style: &StrokeStyle);

    /// Fill the current path and discard it
    fn fill(&mut self, style: &FillStyle) {
        self.fill_preserve(style);
        self.clear_path();
    }

    /// Stroke the current path and discard it
    fn stroke(&mut self, style: &StrokeStyle) {
        self.stroke_preserve(style);
        self.clear_path();
    }

    /// Add a closed polygon through `points`
    fn polygon(&mut self, points: &[Point2<f64>]) {
        let mut corners = points.iter();
        if let Some(first) = corners.next() {
            self.move_to(*first);
            for corner in corners {
                self.line_to(*corner);
            }
            self.close_path();
        }
    }

    /// Add a closed circle approximated by a regular polygon
    fn circle(&mut self, center: Point2<f64>, radius: f64) {
        let points: Vec<Point2<f64>> = (0..CIRCLE_SEGMENTS)
            .map(|segment| {
                let angle = TAU * segment as f64 / CIRCLE_SEGMENTS as f64;
                let (sin, cos) = angle.sin_cos();
                Point2::new(radius.mul_add(cos, center.x), radius.mul_add(sin, center.y))
            })
            .collect();
        self.polygon(&points);
    }
}

/// Canvas rendering into a tiny-skia pixmap, transparent initially
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixmap: Pixmap,
    transform: Transform,
    path: Vec<PathOp>,
}

impl RasterCanvas {
    /// Transparent canvas with user coordinates equal to pixels
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or the pixmap is too large
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            invalid_parameter(
                "canvas size",
                &format!("{width}x{height}"),
                &"must be non-zero and fit in memory",
            )
        })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            path: Vec::new(),
        })
    }

    /// Use `transform` to map user coordinates into pixels
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Rendered pixels, premultiplied
    pub const fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Take the rendered pixels as a straight-alpha image
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel buffer does not match the dimensions
    pub fn into_image(self) -> Result<RgbaImage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| computation_error("image conversion", &"pixel buffer size mismatch"))
    }

    /// Current path in device coordinates
    pub fn path(&self) -> &[PathOp] {
        &self.path
    }

    // None when the path has no drawable segment
    fn build_path(&self) -> Option<tiny_skia::Path> {
        let mut builder = PathBuilder::new();
        for op in &self.path {
            match *op {
                PathOp::MoveTo(point) => builder.move_to(point.x as f32, point.y as f32),
                PathOp::LineTo(point) => builder.line_to(point.x as f32, point.y as f32),
                PathOp::Close => builder.close(),
            }
        }
        builder.finish()
    }
}

fn skia_color(color: Rgb) -> Color {
    let [red, green, blue, alpha] = color.to_rgba().0;
    Color::from_rgba8(red, green, blue, alpha)
}

fn skia_point(point: Point2<f64>) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x as f32, point.y as f32)
}

impl Canvas for RasterCanvas {
    fn move_to(&mut self, point: Point2<f64>) {
        self.path
            .push(PathOp::MoveTo(self.transform.apply(point.x, point.y)));
    }

    fn line_to(&mut self, point: Point2<f64>) {
        self.path
            .push(PathOp::LineTo(self.transform.apply(point.x, point.y)));
    }

    fn close_path(&mut self) {
        self.path.push(PathOp::Close);
    }

    fn clear_path(&mut self) {
        self.path.clear();
    }

    fn fill_preserve(&mut self, style: &FillStyle) {
        let Some(path) = self.build_path() else {
            return;
        };
        let shader = match style.mapped(&self.transform) {
            FillStyle::Solid(color) => Shader::SolidColor(skia_color(color)),
            FillStyle::LinearGradient {
                start,
                end,
                from,
                to,
            } => LinearGradient::new(
                skia_point(start),
                skia_point(end),
                vec![
                    GradientStop::new(0.0, skia_color(from)),
                    GradientStop::new(1.0, skia_color(to)),
                ],
                SpreadMode::Pad,
                tiny_skia::Transform::identity(),
            )
            // Degenerate gradients paint with their first colour
            .unwrap_or_else(|| Shader::SolidColor(skia_color(from))),
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::EvenOdd,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    fn stroke_preserve(&mut self, style: &StrokeStyle) {
        let Some(path) = self.build_path() else {
            return;
        };
        let paint = Paint {
            shader: Shader::SolidColor(skia_color(style.color)),
            anti_alias: true,
            ..Paint::default()
        };
        let stroke = Stroke {
            width: (style.width * self.transform.scale_factor()) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
    }
}
