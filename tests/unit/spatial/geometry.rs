//! Tests for boundary resolution, centers and normals

#[cfg(test)]
mod tests {
    use nalgebra::Point2;
    use penroof::math::transform::Transform;
    use penroof::spatial::geometry::template_corners;
    use penroof::spatial::tiles::{HeightIndex, Shape, Tile};

    fn edge_lengths(points: &[Point2<f64>; 4]) -> Vec<f64> {
        (0..4)
            .filter_map(|i| {
                let a = points.get(i)?;
                let b = points.get((i + 1) % 4)?;
                Some((b - a).norm())
            })
            .collect()
    }

    // Tests that both templates are unit rhombi
    // Verified by doubling the thin template's y coordinates
    #[test]
    fn test_templates_are_unit_rhombi() {
        for shape in [Shape::Thick, Shape::Thin] {
            let tile = Tile::new(shape, HeightIndex::One, Transform::identity());
            for length in edge_lengths(&tile.boundary_points()) {
                assert!((length - 1.0).abs() < 1e-12, "{shape} edge {length}");
            }
        }
    }

    // Tests the template angles at corner 0
    // Verified by building the thick template at 72 degrees
    #[test]
    fn test_corner_zero_angles() {
        let angle = |shape: Shape| {
            let [_, (x1, y1), _, (x3, y3)] = template_corners(shape);
            let a = nalgebra::Vector2::new(x1, y1);
            let b = nalgebra::Vector2::new(x3, y3);
            a.angle(&b).to_degrees()
        };
        assert!((angle(Shape::Thick) - 72.0).abs() < 1e-9);
        assert!((angle(Shape::Thin) - 144.0).abs() < 1e-9);
    }

    // Tests that placement scales and moves the boundary
    // Verified by ignoring the transform translation
    #[test]
    fn test_boundary_follows_transform() {
        let transform = Transform::new(10.0, -5.0, 0.0, 3.0);
        let tile = Tile::new(Shape::Thick, HeightIndex::Two, transform);
        let [p0, ..] = tile.boundary_points();
        assert!((p0.x - 10.0).abs() < 1e-12 && (p0.y + 5.0).abs() < 1e-12);
        for length in edge_lengths(&tile.boundary_points()) {
            assert!((length - 3.0).abs() < 1e-9);
        }
    }

    // Tests that the center is the midpoint of corners 0 and 2
    // Verified by averaging corners 1 and 3 of an asymmetric placement
    #[test]
    fn test_center() {
        let tile = Tile::new(Shape::Thin, HeightIndex::One, Transform::new(2.0, 1.0, 33.0, 5.0));
        let [p0, _, p2, _] = tile.boundary_points();
        let center = tile.center();
        assert!((center.x - (p0.x + p2.x) / 2.0).abs() < 1e-12);
        assert!((center.y - (p0.y + p2.y) / 2.0).abs() < 1e-12);
    }

    // Tests boundary heights in canonical order
    // Verified by placing the opposite at corner 1
    #[test]
    fn test_boundary_heights() {
        let heights = |index: HeightIndex| {
            Tile::new(Shape::Thick, index, Transform::identity())
                .boundary_with_heights()
                .map(|point| point.height)
        };
        assert_eq!(heights(HeightIndex::One), [1.0, 2.0, 3.0, 2.0]);
        assert_eq!(heights(HeightIndex::Four), [4.0, 3.0, 2.0, 3.0]);

        let [first, _, third, _] = Tile::new(Shape::Thin, HeightIndex::Two, Transform::identity())
            .boundary_with_heights()
            .map(|point| point.lifted());
        assert!((first.z - 2.0).abs() < f64::EPSILON);
        assert!((third.z - 4.0).abs() < f64::EPSILON);
    }

    // Tests that the normal is a unit vector orthogonal to both diagonals
    // Verified by normalising the cross product of two edges instead
    #[test]
    fn test_normal_is_orthogonal_to_diagonals() {
        for shape in [Shape::Thick, Shape::Thin] {
            for index in HeightIndex::ALL {
                let tile = Tile::new(shape, index, Transform::new(3.0, 4.0, 20.0, 7.0));
                let normal = tile.normal().expect("non-degenerate tile");
                let [p0, p1, p2, p3] = tile.boundary_with_heights().map(|point| point.lifted());
                assert!((normal.norm() - 1.0).abs() < 1e-12);
                assert!(normal.dot(&(p2 - p0)).abs() < 1e-9);
                assert!(normal.dot(&(p3 - p1)).abs() < 1e-9);
            }
        }
    }

    // Tests that a collapsed tile has no normal
    // Verified by normalising without a length check
    #[test]
    fn test_degenerate_tile_has_no_normal() {
        let collapsed = Tile::new(Shape::Thick, HeightIndex::One, Transform::new(1.0, 1.0, 0.0, 0.0));
        assert!(collapsed.normal().is_none());
    }
}
