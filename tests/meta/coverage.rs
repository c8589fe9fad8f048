//! Layout rules for the test suite: `tests/unit` mirrors `src` file for file,
//! every mirrored file is declared by its parent module, and every test file
//! documents itself and actually contains tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    const SOURCE_ROOT: &str = "src";
    const UNIT_ROOT: &str = "tests/unit";
    const TEST_ROOT: &str = "tests";

    // Crate roots and module lists, never mirrored themselves
    const STRUCTURAL: [&str; 3] = ["lib.rs", "main.rs", "mod.rs"];

    fn is_structural(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| STRUCTURAL.contains(&name))
    }

    // Rust files below `root`, relative to it
    fn rust_files(root: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs") {
                    let relative = path
                        .strip_prefix(root)
                        .map_err(|error| io::Error::other(error.to_string()))?;
                    found.insert(relative.to_path_buf());
                }
            }
        }
        Ok(found)
    }

    fn mirrored(root: &str) -> BTreeSet<PathBuf> {
        rust_files(Path::new(root))
            .expect("readable source tree")
            .into_iter()
            .filter(|path| !is_structural(path))
            .collect()
    }

    fn report(heading: &str, paths: &[String]) -> String {
        format!("{heading}:\n  - {}", paths.join("\n  - "))
    }

    // Tests that each source file has a unit test file at the same relative path
    // Verified by deleting tests/unit/io/scad.rs
    #[test]
    fn test_sources_have_unit_tests() {
        let tests = mirrored(UNIT_ROOT);
        let missing: Vec<String> = mirrored(SOURCE_ROOT)
            .difference(&tests)
            .map(|path| format!("src/{} -> {UNIT_ROOT}/{}", path.display(), path.display()))
            .collect();
        assert!(missing.is_empty(), "{}", report("Sources without unit tests", &missing));
    }

    // Tests that no unit test file outlives its source file
    // Verified by adding tests/unit/io/stale.rs
    #[test]
    fn test_unit_tests_have_sources() {
        let sources = mirrored(SOURCE_ROOT);
        let orphaned: Vec<String> = mirrored(UNIT_ROOT)
            .difference(&sources)
            .map(|path| format!("{UNIT_ROOT}/{}", path.display()))
            .collect();
        assert!(orphaned.is_empty(), "{}", report("Unit tests without sources", &orphaned));
    }

    // Tests that each unit test file is declared by its parent module and so compiled
    // Verified by removing `pub mod grid;` from tests/unit/spatial/mod.rs
    #[test]
    fn test_unit_tests_are_declared() {
        let root = Path::new(UNIT_ROOT);
        let undeclared: Vec<String> = mirrored(UNIT_ROOT)
            .into_iter()
            .filter(|path| {
                let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    return true;
                };
                let parent = path.parent().unwrap_or_else(|| Path::new(""));
                let modules = if parent.as_os_str().is_empty() {
                    root.join("main.rs")
                } else {
                    root.join(parent).join("mod.rs")
                };
                let declaration = format!("mod {stem};");
                !fs::read_to_string(&modules).is_ok_and(|content| content.contains(&declaration))
            })
            .map(|path| format!("{UNIT_ROOT}/{}", path.display()))
            .collect();
        assert!(
            undeclared.is_empty(),
            "{}",
            report("Unit tests not declared as modules", &undeclared)
        );
    }

    // Tests that test files carry a module doc and at least one test
    // Verified by removing the doc comment from tests/pipeline.rs
    #[test]
    fn test_test_files_are_documented_and_nonempty() {
        let root = Path::new(TEST_ROOT);
        let mut problems = Vec::new();
        for path in rust_files(root).expect("readable test tree") {
            if is_structural(&path) {
                continue;
            }
            let content = fs::read_to_string(root.join(&path)).expect("readable test file");
            if !content.starts_with("//!") {
                problems.push(format!("{TEST_ROOT}/{}: no module doc", path.display()));
            }
            if !content.contains("#[test]") {
                problems.push(format!("{TEST_ROOT}/{}: no #[test] functions", path.display()));
            }
        }
        assert!(problems.is_empty(), "{}", report("Malformed test files", &problems));
    }
}
