//! Finite-domain solving of height constraint systems
//!
//! The pipeline only talks to the [`Solver`] trait. The bundled
//! [`PropagationSolver`] keeps one bitset domain per variable, prunes them to
//! a fixpoint (equalities by arc consistency, disjunctions by taking the union
//! of what each surviving branch allows), and searches depth first on the
//! smallest open domain when propagation alone does not decide every height.

use crate::algorithm::constraints::{ConstraintSystem, Relation, Variable};
use crate::algorithm::domain::HeightDomain;
use crate::io::error::{AlgorithmError, Result, computation_error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Order in which candidate values are tried at a decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ValueOrder {
    /// Smallest value first, fully deterministic
    #[default]
    Ascending,
    /// Random order from a seeded generator, reproducible per seed
    Shuffled {
        /// Generator seed
        seed: u64,
    },
}

/// Search limits and heuristics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SolverConfig {
    /// Give up after this long; `None` searches to completion
    pub timeout: Option<Duration>,
    /// Value ordering at decisions
    pub value_order: ValueOrder,
}

/// Total map from variables to values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    /// Wrap values indexed by variable
    pub const fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Value of one variable
    pub fn get(&self, variable: Variable) -> Option<i64> {
        self.values.get(variable.index()).copied()
    }

    /// All values indexed by variable
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of assigned variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variable is assigned
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of one solver call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A total assignment satisfying every constraint
    Satisfied(Assignment),
    /// The system has no solution
    Unsatisfiable,
    /// The time limit ran out first
    TimedOut,
}

/// Counters of the last solver call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Values tried at branching points
    pub decisions: usize,
    /// Decisions refuted by propagation
    pub conflicts: usize,
    /// Constraint revisions performed
    pub revisions: usize,
    /// Wall time of the call
    pub elapsed: Duration,
}

/// Narrow interface between the pipeline and a constraint backend
pub trait Solver {
    /// Decide the system, producing a total assignment when one exists
    ///
    /// # Errors
    ///
    /// Returns an error if the system is malformed
    fn solve(&mut self, system: &ConstraintSystem) -> Result<SolveOutcome>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConstraintRef {
    Equality(usize),
    Disjunction(usize),
}

// Variables whose domain shrank, or `None` on a wipe-out
type Revision = Option<Vec<Variable>>;

fn domain(domains: &[HeightDomain], variable: Variable) -> Option<&HeightDomain> {
    domains.get(variable.index())
}

// Prune both sides of `left == right + offset` against each other
fn revise_relation(domains: &mut [HeightDomain], relation: &Relation) -> Revision {
    let mut changed = Vec::new();

    let right = domain(domains, relation.right)?.clone();
    let left = domains.get_mut(relation.left.index())?;
    if left.retain(|value| right.contains(value - relation.offset)) {
        changed.push(relation.left);
    }
    if left.is_empty() {
        return None;
    }

    let left = left.clone();
    let right = domains.get_mut(relation.right.index())?;
    if right.retain(|value| left.contains(value + relation.offset)) {
        changed.push(relation.right);
    }
    if right.is_empty() {
        return None;
    }

    Some(changed)
}

// Set a queue flag; true if it changed
fn toggle(
    constraint: ConstraintRef,
    equalities: &mut [bool],
    disjunctions: &mut [bool],
    value: bool,
) -> bool {
    let slot = match constraint {
        ConstraintRef::Equality(id) => equalities.get_mut(id),
        ConstraintRef::Disjunction(id) => disjunctions.get_mut(id),
    };
    slot.is_some_and(|queued| std::mem::replace(queued, value) != value)
}

// Propagate one conjunction on private copies of its variables' domains
fn branch_domains(
    domains: &[HeightDomain],
    branch: &[Relation],
) -> Option<Vec<(Variable, HeightDomain)>> {
    let mut scope: Vec<Variable> = branch
        .iter()
        .flat_map(|relation| [relation.left, relation.right])
        .collect();
    scope.sort_unstable();
    scope.dedup();

    // Dense local table, indexed by position in `scope`
    let mut local: Vec<HeightDomain> = scope
        .iter()
        .map(|&variable| domain(domains, variable).cloned())
        .collect::<Option<_>>()?;
    let localize = |variable: Variable| scope.binary_search(&variable).ok().map(Variable);
    let local_relations: Vec<Relation> = branch
        .iter()
        .map(|relation| {
            Some(Relation::new(
                localize(relation.left)?,
                localize(relation.right)?,
                relation.offset,
            ))
        })
        .collect::<Option<_>>()?;

    loop {
        let mut changed = false;
        for relation in &local_relations {
            changed |= !revise_relation(&mut local, relation)?.is_empty();
        }
        if !changed {
            break;
        }
    }

    Some(scope.into_iter().zip(local).collect())
}

/// Arc consistency with constructive disjunction and depth-first search
#[derive(Debug)]
pub struct PropagationSolver {
    config: SolverConfig,
    stats: SolverStats,
}

struct Frame {
    snapshot: Vec<HeightDomain>,
    variable: Variable,
    values: Vec<i64>,
    next: usize,
}

impl Frame {
    fn next_value(&mut self) -> Option<i64> {
        let value = self.values.get(self.next).copied();
        self.next += 1;
        value
    }
}

impl PropagationSolver {
    /// Create a solver with the given limits
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SolverStats::default(),
        }
    }

    /// Counters of the most recent call
    pub const fn stats(&self) -> &SolverStats {
        &self.stats
    }

    fn watchers(system: &ConstraintSystem) -> Vec<Vec<ConstraintRef>> {
        let mut watchers = vec![Vec::new(); system.variable_count()];
        let mut watch = |variable: Variable, constraint: ConstraintRef| {
            if let Some(list) = watchers.get_mut(variable.index()) {
                if list.last() != Some(&constraint) {
                    list.push(constraint);
                }
            }
        };
        for (id, relation) in system.equalities.iter().enumerate() {
            watch(relation.left, ConstraintRef::Equality(id));
            watch(relation.right, ConstraintRef::Equality(id));
        }
        for (id, disjunction) in system.disjunctions.iter().enumerate() {
            for relation in disjunction.branches.iter().flatten() {
                watch(relation.left, ConstraintRef::Disjunction(id));
                watch(relation.right, ConstraintRef::Disjunction(id));
            }
        }
        for list in &mut watchers {
            list.sort_unstable_by_key(|constraint| match *constraint {
                ConstraintRef::Equality(id) => (0, id),
                ConstraintRef::Disjunction(id) => (1, id),
            });
            list.dedup();
        }
        watchers
    }

    fn revise(
        system: &ConstraintSystem,
        domains: &mut [HeightDomain],
        constraint: ConstraintRef,
    ) -> Revision {
        match constraint {
            ConstraintRef::Equality(id) => revise_relation(domains, system.equalities.get(id)?),
            ConstraintRef::Disjunction(id) => {
                let disjunction = system.disjunctions.get(id)?;
                let mut merged: Vec<(Variable, HeightDomain)> = Vec::new();
                let mut live = 0;
                for branch in &disjunction.branches {
                    let Some(narrowed) = branch_domains(domains, branch) else {
                        continue;
                    };
                    live += 1;
                    for (variable, values) in narrowed {
                        match merged.iter_mut().find(|(known, _)| *known == variable) {
                            Some((_, union)) => union.union_with(&values),
                            None => merged.push((variable, values)),
                        }
                    }
                }
                if live == 0 {
                    return None;
                }

                let mut changed = Vec::new();
                for (variable, union) in merged {
                    // A variable missing from some live branch keeps all its values there
                    let everywhere = disjunction.branches.iter().all(|branch| {
                        branch
                            .iter()
                            .any(|r| r.left == variable || r.right == variable)
                    });
                    if !everywhere {
                        continue;
                    }
                    let current = domains.get_mut(variable.index())?;
                    if current.intersect_with(&union) {
                        changed.push(variable);
                    }
                    if current.is_empty() {
                        return None;
                    }
                }
                Some(changed)
            }
        }
    }

    // Run revisions until no domain changes; false on a wipe-out
    fn propagate(
        &mut self,
        system: &ConstraintSystem,
        watchers: &[Vec<ConstraintRef>],
        domains: &mut [HeightDomain],
        initial: impl IntoIterator<Item = ConstraintRef>,
    ) -> bool {
        let mut queue: VecDeque<ConstraintRef> = VecDeque::new();
        let mut queued_equalities = vec![false; system.equalities.len()];
        let mut queued_disjunctions = vec![false; system.disjunctions.len()];
        for constraint in initial {
            if toggle(
                constraint,
                &mut queued_equalities,
                &mut queued_disjunctions,
                true,
            ) {
                queue.push_back(constraint);
            }
        }

        while let Some(constraint) = queue.pop_front() {
            toggle(
                constraint,
                &mut queued_equalities,
                &mut queued_disjunctions,
                false,
            );
            self.stats.revisions += 1;
            let Some(changed) = Self::revise(system, domains, constraint) else {
                return false;
            };
            for variable in changed {
                for &dependent in watchers.get(variable.index()).into_iter().flatten() {
                    if toggle(
                        dependent,
                        &mut queued_equalities,
                        &mut queued_disjunctions,
                        true,
                    ) {
                        queue.push_back(dependent);
                    }
                }
            }
        }
        true
    }

    fn choose_variable(domains: &[HeightDomain]) -> Option<Variable> {
        domains
            .iter()
            .enumerate()
            .filter(|(_, domain)| domain.size() > 1)
            .min_by_key(|(index, domain)| (domain.size(), *index))
            .map(|(index, _)| Variable(index))
    }

    fn timed_out(&self, start: Instant) -> bool {
        self.config
            .timeout
            .is_some_and(|limit| start.elapsed() > limit)
    }

    fn finish(&mut self, start: Instant, outcome: SolveOutcome) -> SolveOutcome {
        self.stats.elapsed = start.elapsed();
        log::debug!(
            "solver: {} decisions, {} conflicts, {} revisions in {:?}",
            self.stats.decisions,
            self.stats.conflicts,
            self.stats.revisions,
            self.stats.elapsed
        );
        outcome
    }
}

impl Default for PropagationSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Solver for PropagationSolver {
    fn solve(&mut self, system: &ConstraintSystem) -> Result<SolveOutcome> {
        system.validate()?;
        self.stats = SolverStats::default();
        let start = Instant::now();
        let mut rng = match self.config.value_order {
            ValueOrder::Shuffled { seed } => Some(StdRng::seed_from_u64(seed)),
            ValueOrder::Ascending => None,
        };

        let watchers = Self::watchers(system);
        let mut domains = system.domains.clone();
        if domains.iter().any(HeightDomain::is_empty) {
            return Ok(self.finish(start, SolveOutcome::Unsatisfiable));
        }

        let everything = (0..system.equalities.len())
            .map(ConstraintRef::Equality)
            .chain((0..system.disjunctions.len()).map(ConstraintRef::Disjunction));
        if !self.propagate(system, &watchers, &mut domains, everything) {
            return Ok(self.finish(start, SolveOutcome::Unsatisfiable));
        }

        let mut stack: Vec<Frame> = Vec::new();
        loop {
            if self.timed_out(start) {
                return Ok(self.finish(start, SolveOutcome::TimedOut));
            }

            let Some(variable) = Self::choose_variable(&domains) else {
                let values = domains
                    .iter()
                    .map(HeightDomain::value)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| computation_error("solver", &"open domain after search"))?;
                if !system.is_satisfied_by(&values) {
                    return Err(computation_error(
                        "solver",
                        &"propagation fixpoint does not satisfy the system",
                    ));
                }
                return Ok(self.finish(
                    start,
                    SolveOutcome::Satisfied(Assignment::new(values)),
                ));
            };

            let mut values = domain(&domains, variable)
                .map(HeightDomain::to_vec)
                .unwrap_or_default();
            if let Some(rng) = rng.as_mut() {
                values.shuffle(rng);
            }
            stack.push(Frame {
                snapshot: domains.clone(),
                variable,
                values,
                next: 0,
            });

            // Try the next value of the deepest open frame, backtracking on exhaustion
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(self.finish(start, SolveOutcome::Unsatisfiable));
                };
                let Some(value) = frame.next_value() else {
                    stack.pop();
                    continue;
                };
                let decided = frame.variable;
                domains.clone_from(&frame.snapshot);
                if let Some(slot) = domains.get_mut(decided.index()) {
                    slot.assign(value);
                }
                self.stats.decisions += 1;

                let dependents = watchers
                    .get(decided.index())
                    .cloned()
                    .unwrap_or_default();
                if self.propagate(system, &watchers, &mut domains, dependents) {
                    break;
                }
                self.stats.conflicts += 1;
                if self.timed_out(start) {
                    return Ok(self.finish(start, SolveOutcome::TimedOut));
                }
            }
        }
    }
}

/// Solve and turn unsatisfiability or a timeout into an error
///
/// # Errors
///
/// Returns [`AlgorithmError::Unsatisfiable`] or [`AlgorithmError::SolverTimeout`]
/// when no assignment was found, or any error raised by the solver
pub fn require_solution(
    solver: &mut dyn Solver,
    system: &ConstraintSystem,
) -> Result<Assignment> {
    let start = Instant::now();
    match solver.solve(system)? {
        SolveOutcome::Satisfied(assignment) => Ok(assignment),
        SolveOutcome::Unsatisfiable => Err(AlgorithmError::Unsatisfiable {
            variables: system.variable_count(),
            constraints: system.constraint_count(),
        }),
        SolveOutcome::TimedOut => Err(AlgorithmError::SolverTimeout {
            elapsed: start.elapsed(),
            variables: system.variable_count(),
        }),
    }
}
