//! Tests for OpenSCAD export

#[cfg(test)]
mod tests {
    use nalgebra::{Point3, Vector3};
    use penroof::algorithm::extrusion::ExtrudedTile;
    use penroof::io::scad::{export_scad, material, write_scad};
    use penroof::spatial::tiles::{Shape, TileId};

    fn slab(shape: Shape, base: f64) -> ExtrudedTile {
        let quad = |z: f64| {
            [
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 0.0, z),
                Point3::new(1.0, 1.0, z),
                Point3::new(0.0, 1.0, z),
            ]
        };
        ExtrudedTile {
            tile: TileId(0),
            shape,
            inner: quad(base),
            outer: quad(base + 0.5),
            normal: Vector3::z(),
        }
    }

    // Tests material colour per shape
    // Verified by colouring both shapes green
    #[test]
    fn test_material() {
        assert_eq!(material(Shape::Thick), "green()");
        assert_eq!(material(Shape::Thin), "blue()");
    }

    // Tests the exact module text for one slab
    // Verified by swapping inner and outer quads
    #[test]
    fn test_write_scad_text() {
        let mut buffer = Vec::new();
        write_scad(&mut buffer, &[slab(Shape::Thin, 1.0)], "roof").expect("write to memory");
        let text = String::from_utf8(buffer).expect("utf-8 output");

        let expected = "module roof() {\n  \
             blue() hull() {\n    \
             polyhedron(points=[[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]], faces=[[0, 1, 2, 3]]);\n    \
             polyhedron(points=[[0, 0, 1.5], [1, 0, 1.5], [1, 1, 1.5], [0, 1, 1.5]], faces=[[0, 1, 2, 3]]);\n  \
             }\n\
             }\n";
        assert_eq!(text, expected);
    }

    // Tests that an empty tiling still yields a valid module
    // Verified by omitting the closing brace
    #[test]
    fn test_write_scad_empty() {
        let mut buffer = Vec::new();
        write_scad(&mut buffer, &[], "autogen").expect("write to memory");
        assert_eq!(buffer, b"module autogen() {\n}\n");
    }

    // Tests export to a nested path with one hull per tile
    // Verified by writing only the first tile
    #[test]
    fn test_export_scad_file() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("out").join("autogen.scad");
        let tiles = [slab(Shape::Thick, 1.0), slab(Shape::Thin, 2.0)];

        export_scad(&path, &tiles, "autogen").expect("export succeeds");
        let text = std::fs::read_to_string(&path).expect("readable file");
        assert!(text.starts_with("module autogen() {"));
        assert_eq!(text.matches("hull()").count(), 2);
        assert_eq!(text.matches("polyhedron").count(), 4);
        assert!(text.contains("green() hull()"));
        assert!(text.contains("blue() hull()"));
    }

    // Tests that export reports a file system error when the parent is a file
    // Verified by ignoring directory creation errors
    #[test]
    fn test_export_scad_parent_is_file() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").expect("write blocker");

        let result = export_scad(&blocker.join("autogen.scad"), &[], "autogen");
        assert!(matches!(
            result,
            Err(penroof::AlgorithmError::FileSystem { .. })
        ));
    }
}
