//! Tests for the propagation solver and its outcome handling

#[cfg(test)]
mod tests {
    use penroof::AlgorithmError;
    use penroof::algorithm::constraints::{
        ConstraintSystem, Disjunction, Relation, Variable, encode,
    };
    use penroof::algorithm::deduplication::Deduplicator;
    use penroof::algorithm::solver::{
        Assignment, PropagationSolver, SolveOutcome, Solver, SolverConfig, ValueOrder,
        require_solution,
    };
    use penroof::algorithm::subdivision::subdivide_n;
    use penroof::io::configuration::DEFAULT_EPSILON;
    use penroof::math::transform::Transform;
    use penroof::spatial::grid::MatchStrategy;
    use penroof::spatial::tiles::{Tile, TileId};
    use std::time::Duration;

    fn system(depth: usize) -> ConstraintSystem {
        let tiles = subdivide_n(vec![Tile::seed(Transform::identity())], depth, false)
            .expect("depth within limit");
        let (graph, _) = Deduplicator::new(DEFAULT_EPSILON, MatchStrategy::SpatialHash)
            .and_then(|deduplicator| deduplicator.build(tiles))
            .expect("deduplication succeeds");
        encode(&graph).expect("tiles are attached")
    }

    fn solve(system: &ConstraintSystem, config: SolverConfig) -> SolveOutcome {
        PropagationSolver::new(config)
            .solve(system)
            .expect("well-formed system")
    }

    // Tests the deterministic solution of a single tile
    // Verified by trying values in descending order
    #[test]
    fn test_single_tile_solution() {
        let outcome = solve(&system(0), SolverConfig::default());
        assert_eq!(
            outcome,
            SolveOutcome::Satisfied(Assignment::new(vec![1, 2, 3, 2]))
        );
    }

    // Tests that every generation has a valid height labeling
    // Verified by dropping the union of branch domains during propagation
    #[test]
    fn test_generations_are_satisfiable() {
        for depth in 1..=5 {
            let system = system(depth);
            match solve(&system, SolverConfig::default()) {
                SolveOutcome::Satisfied(assignment) => {
                    assert_eq!(assignment.len(), system.variable_count());
                    assert!(system.is_satisfied_by(assignment.values()), "depth {depth}");
                }
                other => unreachable!("depth {depth}: {other:?}"),
            }
        }
    }

    // Tests that shuffled ordering is reproducible and still correct
    // Verified by seeding the generator from the clock
    #[test]
    fn test_shuffled_order_is_reproducible() {
        let system = system(3);
        let config = SolverConfig {
            value_order: ValueOrder::Shuffled { seed: 11 },
            ..SolverConfig::default()
        };
        let first = solve(&system, config);
        let second = solve(&system, config);
        assert_eq!(first, second);
        let SolveOutcome::Satisfied(assignment) = first else {
            unreachable!("expected a solution, got {first:?}");
        };
        assert!(system.is_satisfied_by(assignment.values()));
    }

    // Tests detection of contradictory equalities
    // Verified by skipping the initial propagation
    #[test]
    fn test_unsatisfiable_system() {
        let mut system = ConstraintSystem::new(2, 1, 4).expect("valid domain");
        system
            .add_equality(Relation::new(Variable(0), Variable(1), 1))
            .expect("declared variables");
        system
            .add_equality(Relation::new(Variable(1), Variable(0), 1))
            .expect("declared variables");
        assert_eq!(solve(&system, SolverConfig::default()), SolveOutcome::Unsatisfiable);

        let error = require_solution(&mut PropagationSolver::default(), &system)
            .expect_err("no solution exists");
        assert!(matches!(
            error,
            AlgorithmError::Unsatisfiable {
                variables: 2,
                constraints: 2
            }
        ));
    }

    // Tests that a search needing decisions reports unsatisfiability after backtracking
    // Verified by accepting the last tried value without propagation
    #[test]
    fn test_backtracking_exhausts_search() {
        let mut system = ConstraintSystem::new(3, 1, 2).expect("valid domain");
        for (left, right) in [(0, 1), (1, 2), (2, 0)] {
            system
                .add_disjunction(Disjunction {
                    branches: vec![
                        vec![Relation::new(Variable(left), Variable(right), 1)],
                        vec![Relation::new(Variable(left), Variable(right), -1)],
                    ],
                    tile: TileId(left),
                })
                .expect("declared variables");
        }
        assert_eq!(solve(&system, SolverConfig::default()), SolveOutcome::Unsatisfiable);
    }

    // Tests the time limit
    // Verified by never consulting the timeout
    #[test]
    fn test_timeout() {
        let system = system(3);
        let config = SolverConfig {
            timeout: Some(Duration::ZERO),
            ..SolverConfig::default()
        };
        assert_eq!(solve(&system, config), SolveOutcome::TimedOut);

        let mut solver = PropagationSolver::new(config);
        let error = require_solution(&mut solver, &system).expect_err("time limit of zero");
        assert!(matches!(error, AlgorithmError::SolverTimeout { .. }));
    }

    // Tests search counters
    // Verified by resetting counters after every decision
    #[test]
    fn test_stats_are_recorded() {
        let system = system(3);
        let mut solver = PropagationSolver::default();
        let outcome = solver.solve(&system).expect("well-formed system");
        assert!(matches!(outcome, SolveOutcome::Satisfied(_)));
        let stats = *solver.stats();
        assert!(stats.decisions > 0);
        assert!(stats.revisions >= system.constraint_count());
    }

    // Tests rejection of malformed systems
    // Verified by skipping validation before search
    #[test]
    fn test_malformed_system_is_an_error() {
        let mut system = ConstraintSystem::new(1, 1, 4).expect("valid domain");
        system.equalities.push(Relation::new(Variable(0), Variable(3), 0));
        assert!(PropagationSolver::default().solve(&system).is_err());
    }

    // Tests assignment accessors
    // Verified by indexing values from one
    #[test]
    fn test_assignment_accessors() {
        let assignment = Assignment::new(vec![4, 1]);
        assert_eq!(assignment.get(Variable(0)), Some(4));
        assert_eq!(assignment.get(Variable(2)), None);
        assert!(!assignment.is_empty());
        assert!(Assignment::new(Vec::new()).is_empty());
    }
}
