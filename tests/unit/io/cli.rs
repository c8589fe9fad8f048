//! Tests for command-line parsing and the pipeline runner

#[cfg(test)]
mod tests {
    use clap::Parser;
    use penroof::algorithm::solver::ValueOrder;
    use penroof::io::cli::{Cli, Family, Runner, Split, Strategy};
    use penroof::io::configuration::{
        DEFAULT_DEPTH, DEFAULT_EPSILON, DEFAULT_OUTPUT_DIR, DEFAULT_SEED, MAX_DEPTH, SCAD_FILE_NAME,
        TILING_FILE_NAME, TRIANGLES_FILE_NAME,
    };
    use penroof::io::error::AlgorithmError;
    use penroof::spatial::grid::MatchStrategy;
    use penroof::spatial::triangles::SplitRule;
    use std::path::PathBuf;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("penroof").chain(args.iter().copied()))
    }

    // Tests defaults when no arguments are given
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.family, Family::Rhombus);
        assert_eq!(cli.depth, DEFAULT_DEPTH);
        assert!((cli.epsilon - DEFAULT_EPSILON).abs() < f64::EPSILON);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(cli.verbose, 0);
        assert!(cli.timeout_secs.is_none());
        assert!(cli.should_show_progress());
    }

    // Tests parsing of every option
    // Verified by dropping the short flags
    #[test]
    fn test_cli_parse_all_args() {
        let cli = parse(&[
            "--family",
            "triangles",
            "-d",
            "3",
            "-t",
            "-2.5",
            "-e",
            "0.001",
            "--strategy",
            "linear",
            "--split",
            "kite",
            "-s",
            "9",
            "--shuffle",
            "--timeout-secs",
            "1.5",
            "-p",
            "--size",
            "256",
            "-o",
            "out",
            "--no-png",
            "--no-scad",
            "-q",
            "-vv",
            "--log-file",
            "run.log",
        ]);
        assert_eq!(cli.family, Family::Triangles);
        assert_eq!(cli.depth, 3);
        assert!((cli.thickness + 2.5).abs() < f64::EPSILON);
        assert_eq!(cli.strategy, Strategy::Linear);
        assert_eq!(cli.split, Split::Kite);
        assert_eq!(cli.seed, 9);
        assert!(cli.shuffle && cli.parallel && cli.no_png && cli.no_scad && cli.quiet);
        assert_eq!(cli.size, 256);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        assert!(!cli.should_show_progress());
    }

    // Tests conversion of flags into pipeline settings
    // Verified by ignoring --shuffle
    #[test]
    fn test_roof_config() {
        let cli = parse(&["-d", "4", "--strategy", "linear", "--shuffle", "-s", "5", "--timeout-secs", "2"]);
        let config = cli.roof_config().expect("valid flags");
        assert_eq!(config.depth, 4);
        assert_eq!(config.strategy, MatchStrategy::LinearScan);
        assert_eq!(config.solver.value_order, ValueOrder::Shuffled { seed: 5 });
        assert_eq!(config.solver.timeout, Some(Duration::from_secs(2)));

        assert_eq!(SplitRule::from(Split::Rhombus), SplitRule::HalfRhombus);
        assert_eq!(MatchStrategy::from(Strategy::Hash), MatchStrategy::SpatialHash);
    }

    // Tests rejection of invalid timeouts
    // Verified by saturating negative timeouts to zero
    #[test]
    fn test_invalid_timeout() {
        let mut cli = parse(&[]);
        cli.timeout_secs = Some(-1.0);
        assert!(cli.solver_config().is_err());
        cli.timeout_secs = Some(f64::NAN);
        assert!(cli.roof_config().is_err());
    }

    // Tests rejection of unknown enum values
    // Verified by adding a catch-all family
    #[test]
    fn test_unknown_family_is_rejected() {
        assert!(Cli::try_parse_from(["penroof", "--family", "kites"]).is_err());
    }

    // Tests a full rhombus run writing both outputs
    // Verified by skipping the SCAD export
    #[test]
    fn test_runner_rhombus_outputs() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let output = dir.path().join("nested");
        let output_arg = output.to_string_lossy().to_string();
        let cli = parse(&["-d", "2", "--size", "128", "-q", "-o", &output_arg]);
        let summary = Runner::new(cli).run().expect("run succeeds");

        assert_eq!((summary.tiles, summary.vertices), (18, 29));
        assert_eq!(
            summary.outputs,
            vec![output.join(TILING_FILE_NAME), output.join(SCAD_FILE_NAME)]
        );
        for path in &summary.outputs {
            assert!(path.exists(), "{} missing", path.display());
        }
        let decoded = image::open(output.join(TILING_FILE_NAME)).expect("valid PNG");
        assert_eq!((decoded.width(), decoded.height()), (128, 128));
    }

    // Tests a triangle run
    // Verified by using the kite rule regardless of --split
    #[test]
    fn test_runner_triangles() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let output_arg = dir.path().to_string_lossy().to_string();
        let cli = parse(&["--family", "triangles", "-d", "2", "-q", "-o", &output_arg]);
        let runner = Runner::new(cli);
        assert_eq!(runner.cli().family, Family::Triangles);
        let summary = runner.run().expect("run succeeds");

        assert_eq!(summary.tiles, 50);
        assert_eq!(summary.vertices, 0);
        assert_eq!(summary.outputs, vec![dir.path().join(TRIANGLES_FILE_NAME)]);
        assert!(dir.path().join(TRIANGLES_FILE_NAME).exists());
    }

    // Tests that the triangle family rejects depths beyond the maximum before subdividing
    // Verified by checking the depth only in the rhombus pipeline
    #[test]
    fn test_runner_triangles_rejects_excess_depth() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let output_arg = dir.path().join("unused").to_string_lossy().to_string();
        let depth = (MAX_DEPTH + 1).to_string();
        let cli = parse(&["--family", "triangles", "-d", &depth, "-q", "-o", &output_arg]);
        let result = Runner::new(cli).run();

        assert!(matches!(
            result,
            Err(AlgorithmError::InvalidParameter {
                parameter: "depth",
                ..
            })
        ));
        assert!(!dir.path().join("unused").exists());
    }

    // Tests that output flags suppress file writing
    // Verified by inverting the --no-png check
    #[test]
    fn test_runner_without_outputs() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let output_arg = dir.path().join("unused").to_string_lossy().to_string();
        let cli = parse(&["-d", "1", "--no-png", "--no-scad", "-q", "-o", &output_arg]);
        let summary = Runner::new(cli).run().expect("run succeeds");
        assert!(summary.outputs.is_empty());
        assert!(!dir.path().join("unused").exists());
    }

    // Tests that invalid settings fail before any work
    // Verified by clamping epsilon to a positive value
    #[test]
    fn test_runner_rejects_invalid_epsilon() {
        let cli = parse(&["-e", "0", "-q", "--no-png", "--no-scad"]);
        assert!(Runner::new(cli).run().is_err());
    }
}
