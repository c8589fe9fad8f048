//! Tests for tiling rendering and PNG export

#[cfg(test)]
mod tests {
    use nalgebra::Point2;
    use penroof::algorithm::deduplication::PlanarGraph;
    use penroof::algorithm::executor::{RoofConfig, RoofGenerator};
    use penroof::io::canvas::{Canvas, FillStyle, Rgb, StrokeStyle};
    use penroof::io::configuration::{THICK_COLOR, THIN_COLOR};
    use penroof::io::image::{
        draw_roof, draw_triangles, export_png, marker_radius, render_roof, render_triangles, roof_view, shade,
        tile_fill, triangle_color,
    };
    use penroof::math::quadratic::GoldenField;
    use penroof::spatial::tiles::{HeightIndex, Shape};
    use penroof::spatial::triangles::{
        ExactPoint, SplitRule, TriangleKind, starting_wheel, subdivide_triangles,
    };

    #[derive(Default)]
    struct CountingCanvas {
        fills: usize,
        strokes: usize,
        segments: usize,
    }

    impl Canvas for CountingCanvas {
        fn move_to(&mut self, _point: Point2<f64>) {}

        fn line_to(&mut self, _point: Point2<f64>) {
            self.segments += 1;
        }

        fn close_path(&mut self) {}

        fn clear_path(&mut self) {}

        fn fill_preserve(&mut self, _style: &FillStyle) {
            self.fills += 1;
        }

        fn stroke_preserve(&mut self, _style: &StrokeStyle) {
            self.strokes += 1;
        }
    }

    fn labeled_graph(depth: usize) -> PlanarGraph {
        let config = RoofConfig {
            depth,
            ..RoofConfig::default()
        };
        RoofGenerator::new(config)
            .and_then(RoofGenerator::run)
            .expect("pipeline succeeds")
            .graph
    }

    fn alpha(image: &image::RgbaImage, x: u32, y: u32) -> u8 {
        image.get_pixel(x, y).0[3]
    }

    // Tests that shading keeps full colour at index four and darkens lower indices
    // Verified by indexing the darkening table from zero
    #[test]
    fn test_shade() {
        assert_eq!(shade(Shape::Thick, HeightIndex::Four), Rgb::from_hex(THICK_COLOR));
        assert_eq!(shade(Shape::Thin, HeightIndex::Four), Rgb::from_hex(THIN_COLOR));

        let dark = shade(Shape::Thin, HeightIndex::One);
        let light = shade(Shape::Thin, HeightIndex::Three);
        assert!(dark.blue < light.blue);
        assert_eq!(dark, Rgb::from_hex(THIN_COLOR).darkened(0.1));
    }

    // Tests that a tile's gradient runs from its index shade to its opposite's shade
    // Verified by using the neighbour index for the end colour
    #[test]
    fn test_tile_fill_gradient() {
        let graph = labeled_graph(0);
        let tile = graph.tiles().first().expect("seed tile");
        let [p0, _, p2, _] = tile.boundary_points();

        let FillStyle::LinearGradient {
            start,
            end,
            from,
            to,
        } = tile_fill(tile)
        else {
            unreachable!("Expected a gradient fill for a tile");
        };
        assert_eq!((start, end), (p0, p2));
        assert_eq!(from, shade(tile.shape, tile.index));
        assert_eq!(to, shade(tile.shape, tile.index.opposite()));
    }

    // Tests marker sizes per vertex degree
    // Verified by allowing degree zero
    #[test]
    fn test_marker_radius() {
        assert_eq!(marker_radius(1), Some(4.0));
        assert_eq!(marker_radius(4), Some(10.0));
        assert_eq!(marker_radius(7), Some(16.0));
        assert_eq!(marker_radius(0), None);
        assert_eq!(marker_radius(8), None);
    }

    // Tests that the view centres the reference layout on the canvas
    // Verified by translating by the full size
    #[test]
    fn test_roof_view() {
        let view = roof_view(540);
        let center = view.apply(0.0, 0.0);
        assert!((center.x - 270.0).abs() < 1e-9 && (center.y - 270.0).abs() < 1e-9);
        assert!((view.scale_factor() - 0.5).abs() < 1e-9);
    }

    // Tests that vertex markers are drawn only for shallow tilings
    // Verified by drawing markers at every depth
    #[test]
    fn test_draw_roof_markers_depend_on_depth() {
        let graph = labeled_graph(2);
        let (tiles, vertices) = (graph.tiles().len(), graph.vertices().len());
        assert_eq!((tiles, vertices), (18, 29));

        let mut shallow = CountingCanvas::default();
        draw_roof(&mut shallow, &graph, 2);
        assert_eq!(shallow.fills, tiles + vertices);
        assert_eq!(shallow.strokes, tiles + vertices);

        let mut deep = CountingCanvas::default();
        draw_roof(&mut deep, &graph, 5);
        assert_eq!(deep.fills, tiles);
        assert_eq!(deep.segments, tiles * 3);
    }

    // Tests that the seed tiling covers the canvas centre but not its corners
    // Verified by skipping the view transform
    #[test]
    fn test_render_roof_coverage() {
        let graph = labeled_graph(0);
        let image = render_roof(&graph, 0, 200).expect("render");
        assert_eq!(image.dimensions(), (200, 200));
        assert_eq!(alpha(&image, 100, 100), 255);
        assert_eq!(alpha(&image, 0, 0), 0);
        assert_eq!(alpha(&image, 199, 199), 0);
    }

    // Tests that rendering onto an empty image is an error
    // Verified by creating the canvas without checking its size
    #[test]
    fn test_render_zero_size() {
        let graph = labeled_graph(0);
        assert!(render_roof(&graph, 0, 0).is_err());
        assert!(render_triangles(&[], 0, 600).is_err());
    }

    // Tests that triangles are filled and only their legs stroked
    // Verified by stroking the closed triangle
    #[test]
    fn test_draw_triangles_counts() {
        let center = ExactPoint::from_integers(150, 150);
        let radius = GoldenField::from_integers(141, 0);
        let wheel = starting_wheel(&center, &radius).expect("wheel");
        let triangles = subdivide_triangles(wheel, SplitRule::HalfRhombus, 1).expect("subdivision");

        let mut canvas = CountingCanvas::default();
        draw_triangles(&mut canvas, &triangles, 1.0);
        assert_eq!(canvas.fills, triangles.len());
        assert_eq!(canvas.strokes, triangles.len());
        // Two polygon edges plus two legs per triangle
        assert_eq!(canvas.segments, triangles.len() * 4);

        assert_ne!(triangle_color(TriangleKind::Red), triangle_color(TriangleKind::Blue));
    }

    // Tests that the triangle rendering stays within the scaled model area
    // Verified by scaling to the canvas width only
    #[test]
    fn test_render_triangles_coverage() {
        let center = ExactPoint::from_integers(150, 150);
        let radius = GoldenField::from_integers(141, 0);
        let wheel = starting_wheel(&center, &radius).expect("wheel");
        let image = render_triangles(&wheel, 800, 600).expect("render");

        assert_eq!(image.dimensions(), (800, 600));
        assert_eq!(alpha(&image, 310, 300), 255);
        assert_eq!(alpha(&image, 790, 590), 0);
        assert_eq!(alpha(&image, 650, 100), 0);
    }

    // Tests PNG export into a directory that does not exist yet
    // Verified by removing directory creation
    #[test]
    fn test_export_png_creates_directories() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("a").join("b").join("tiling.png");
        let graph = labeled_graph(0);

        export_png(&render_roof(&graph, 0, 64).expect("render"), &path).expect("export succeeds");
        let decoded = image::open(&path).expect("valid PNG").to_rgba8();
        assert_eq!(decoded.dimensions(), (64, 64));
        assert_eq!(alpha(&decoded, 32, 32), 255);
    }

    // Tests that export fails when the parent is a file
    // Verified by ignoring directory creation errors
    #[test]
    fn test_export_png_parent_is_file() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").expect("write blocker");
        let graph = labeled_graph(0);

        let image = render_roof(&graph, 0, 16).expect("render");
        let result = export_png(&image, &blocker.join("tiling.png"));
        assert!(result.is_err());
    }
}
