//! Local search optimizer.
//!
//! Seeds from the caller's assignment (or the group distributor), then runs
//! single-guest changes and two-guest swaps under an acceptor until the
//! budget runs out. Returns the best assignment seen, never one that scores
//! below the seed.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use seatplan_config::{AcceptorConfig, EngineConfig, MoveThreadCount};
use seatplan_core::{
    validate_constraint, Assignment, Guest, GuestId, Relationship, SeatingConstraint,
    SeatingError, SeatingProblem, SeatingScore, Table,
};
use seatplan_scoring::{ScoreCalculator, SeatingDirector, Violation};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::budget::OptimizationBudget;
use crate::builder::AcceptorBuilder;
use crate::distributor::{distribute_tables, DistributionStrategy};
use crate::moves::{any_move_exists, MoveSelector};
use crate::scope::SolverScope;
use crate::stats::OptimizationStatistics;
use crate::termination::{Termination, TerminationReason};

// Incremental scores are rebuilt this often to shed floating point drift.
const RECOMPUTE_INTERVAL: u64 = 4096;

/// A new best assignment found during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolutionEvent {
    pub assignment: Assignment,
    pub score: SeatingScore,
    /// Iteration at which it was found; 0 for the seed.
    pub step: u64,
}

/// Outcome of an optimizer run.
///
/// Always carries an assignment, even when the run was cancelled or the
/// input was malformed. Recoverable problems met along the way are listed
/// in `diagnostics`.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub assignment: Assignment,
    pub score: SeatingScore,
    /// Constraints the returned assignment still violates.
    pub violations: Vec<Violation>,
    pub diagnostics: Vec<SeatingError>,
    pub statistics: OptimizationStatistics,
    /// Seed the run used.
    pub seed: u64,
}

impl OptimizationResult {
    fn empty(seed: u64, diagnostics: Vec<SeatingError>) -> Self {
        Self {
            assignment: Assignment::new(),
            score: SeatingScore::ZERO,
            violations: Vec::new(),
            diagnostics,
            statistics: OptimizationStatistics::empty(TerminationReason::Empty),
            seed,
        }
    }

    pub fn combined(&self) -> f64 {
        self.score.combined()
    }

    pub fn termination(&self) -> TerminationReason {
        self.statistics.termination
    }

    pub fn is_cancelled(&self) -> bool {
        self.termination() == TerminationReason::Cancelled
    }
}

/// Searches for a better-scoring assignment.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, ConstraintType, Priority, SeatingConstraint, SeatingProblem};
/// use seatplan_core::{Guest, Relationship, RelationshipType, Table};
/// use seatplan_solver::{OptimizationBudget, Optimizer};
///
/// let problem = SeatingProblem::new(
///     vec![
///         Guest::new("a", "Ann", "Lee"),
///         Guest::new("b", "Ben", "Lee"),
///         Guest::new("c", "Cal", "Ray"),
///     ],
///     vec![Table::new("t1", 2), Table::new("t2", 2)],
/// )
/// .with_relationships(vec![Relationship::new("a", "b", RelationshipType::Partner, 5)])
/// .with_constraints(vec![SeatingConstraint::new(
///     "apart",
///     ConstraintType::MustNotSitTogether,
///     ["a", "c"],
///     Priority::Required,
/// )]);
///
/// let result = Optimizer::new()
///     .with_budget(OptimizationBudget::unbounded().with_max_iterations(2_000))
///     .with_seed(7)
///     .optimize(&problem, &Assignment::new());
///
/// assert!(result.violations.is_empty());
/// assert_eq!(result.score.affinity, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer {
    calculator: ScoreCalculator,
    acceptor: AcceptorConfig,
    budget: OptimizationBudget,
    selector: MoveSelector,
    seed: u64,
    move_thread_count: MoveThreadCount,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            calculator: ScoreCalculator::from_config(config),
            acceptor: config.acceptor.clone(),
            budget: OptimizationBudget::from_config(&config.termination),
            selector: MoveSelector::default(),
            seed: config.seed(),
            move_thread_count: config.move_thread_count.clone(),
        }
    }

    pub fn with_budget(mut self, budget: OptimizationBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_calculator(mut self, calculator: ScoreCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.acceptor = acceptor;
        self
    }

    pub fn with_move_selector(mut self, selector: MoveSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    pub fn budget(&self) -> &OptimizationBudget {
        &self.budget
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    pub fn move_thread_count(&self) -> &MoveThreadCount {
        &self.move_thread_count
    }

    pub fn optimize(&self, problem: &SeatingProblem, initial: &Assignment) -> OptimizationResult {
        self.optimize_with_listener(problem, initial, None, None)
    }

    /// Runs until the budget is spent or `cancel` is raised.
    ///
    /// The flag is checked at the top of every iteration. A cancelled run
    /// returns its best assignment so far with an
    /// [`OptimizationCancelled`](SeatingError::OptimizationCancelled)
    /// diagnostic.
    pub fn optimize_with_cancel(
        &self,
        problem: &SeatingProblem,
        initial: &Assignment,
        cancel: Arc<AtomicBool>,
    ) -> OptimizationResult {
        self.optimize_with_listener(problem, initial, Some(cancel), None)
    }

    /// Like [`optimize_with_cancel`](Self::optimize_with_cancel), also
    /// streaming every new best assignment through `sender`.
    pub fn optimize_with_listener(
        &self,
        problem: &SeatingProblem,
        initial: &Assignment,
        cancel: Option<Arc<AtomicBool>>,
        sender: Option<mpsc::UnboundedSender<BestSolutionEvent>>,
    ) -> OptimizationResult {
        let seed = self.seed;
        info!(
            event = "solve_start",
            guest_count = problem.guests.len(),
            table_count = problem.tables.len(),
            relationship_count = problem.relationships.len(),
            constraint_count = problem.constraints.len(),
            seed = seed,
        );

        let mut diagnostics = Vec::new();
        let problem = screen_constraints(problem, &mut diagnostics);

        if problem.guests.is_empty() || problem.total_capacity() == 0 {
            let result = OptimizationResult::empty(seed, diagnostics);
            info!(
                event = "solve_end",
                score = %result.score,
                steps = 0u64,
                moves_evaluated = 0u64,
                termination = %result.termination(),
            );
            return result;
        }

        let (seed_assignment, seeded_from_scratch) =
            seed_assignment(&problem, initial, &mut diagnostics);
        let director = SeatingDirector::new(&problem, &seed_assignment, &self.calculator);
        let mut scope = SolverScope::with_seed(director, seed);
        let termination = self.budget.termination(cancel);
        let mut acceptor = AcceptorBuilder::build(&self.acceptor);

        scope.start_solving();
        let mut last_step_score = scope.director().score().combined();
        acceptor.phase_started(last_step_score);
        send_best(&sender, scope.best_assignment(), scope.best_score(), 0);

        let mut last_progress_time = Instant::now();
        let mut last_progress_moves: u64 = 0;

        let reason = loop {
            if let Some(reason) = termination.check(&scope) {
                break reason;
            }

            let selected = {
                let (director, rng) = scope.director_and_rng();
                self.selector.select(director, rng)
            };
            let Some(mv) = selected else {
                if !any_move_exists(scope.director()) {
                    break TerminationReason::NoMoves;
                }
                scope.increment_step_count();
                continue;
            };

            let delta = match mv.do_move(scope.director_mut()) {
                Ok(delta) => delta,
                Err(err) => {
                    debug!(event = "move_skipped", error = %err);
                    scope.increment_step_count();
                    continue;
                }
            };
            let move_score = last_step_score + delta;
            let accepted = {
                let (_, rng) = scope.director_and_rng();
                acceptor.is_accepted(last_step_score, move_score, rng)
            };
            scope.stats_mut().record_move(accepted);
            let step = scope.increment_step_count();

            trace!(
                event = "step",
                step = step,
                kind = mv.label(),
                score = move_score,
                accepted = accepted,
            );

            if accepted {
                last_step_score = scope.director().score().combined();
                if scope.update_best_solution() {
                    send_best(&sender, scope.best_assignment(), scope.best_score(), step);
                }
            } else if let Err(err) = mv.undo_move(scope.director_mut()) {
                warn!(event = "undo_failed", error = %err);
                break TerminationReason::NoMoves;
            }
            if step % RECOMPUTE_INTERVAL == 0 {
                scope.director_mut().recompute();
                last_step_score = scope.director().score().combined();
            }
            acceptor.step_ended(last_step_score);

            let now = Instant::now();
            if now.duration_since(last_progress_time).as_secs() >= 1 {
                let moves_evaluated = scope.stats().moves_evaluated;
                let moves_delta = moves_evaluated - last_progress_moves;
                let elapsed_secs = now.duration_since(last_progress_time).as_secs_f64();
                debug!(
                    event = "progress",
                    steps = step,
                    speed = (moves_delta as f64 / elapsed_secs) as u64,
                    score = %scope.best_score(),
                );
                last_progress_time = now;
                last_progress_moves = moves_evaluated;
            }
        };

        let steps = scope.total_step_count();
        let statistics = scope.stats().finish(steps, reason);
        let (best, _) = scope.take_best();

        // The caller's own starting point competes too: an empty seed, which
        // seats nobody, can beat a crowded distribution.
        let mut challengers = vec![seed_assignment];
        if seeded_from_scratch {
            challengers.push(Assignment::new());
        }
        let (mut score, mut violations) = self.grade(&problem, &best, &mut diagnostics);
        let mut assignment = best;
        let mut challenger_won = false;
        for challenger in challengers {
            let (challenger_score, challenger_violations) =
                self.grade(&problem, &challenger, &mut diagnostics);
            if challenger_score.combined() > score.combined() {
                assignment = challenger;
                score = challenger_score;
                violations = challenger_violations;
                challenger_won = true;
            }
        }
        if challenger_won {
            send_best(&sender, &assignment, score, steps);
        }

        if reason == TerminationReason::Cancelled {
            diagnostics.push(SeatingError::OptimizationCancelled);
        }

        info!(
            event = "solve_end",
            score = %score,
            steps = statistics.steps,
            moves_evaluated = statistics.moves_evaluated,
            improvements = statistics.improvements,
            duration_ms = statistics.elapsed.as_millis() as u64,
            termination = %reason,
        );

        OptimizationResult {
            assignment,
            score,
            violations,
            diagnostics,
            statistics,
            seed,
        }
    }

    // Exact score and violations of an assignment.
    fn grade(
        &self,
        problem: &SeatingProblem,
        assignment: &Assignment,
        diagnostics: &mut Vec<SeatingError>,
    ) -> (SeatingScore, Vec<Violation>) {
        match self.calculator.violations(problem, assignment) {
            Ok(violations) => {
                let score = self.calculator.score_with(problem, assignment, &violations);
                (score, violations)
            }
            Err(err) => {
                if !diagnostics.contains(&err) {
                    diagnostics.push(err);
                }
                let score = SeatingScore::of(
                    self.calculator
                        .affinity()
                        .score(assignment, &problem.relationships),
                    0.0,
                );
                (score, Vec::new())
            }
        }
    }
}

/// Optimizes with default settings and an explicit budget and seed.
///
/// `seed` defaults to [`DEFAULT_RANDOM_SEED`](seatplan_config::DEFAULT_RANDOM_SEED).
#[allow(clippy::too_many_arguments)]
pub fn optimize(
    guests: &[Guest],
    tables: &[Table],
    relationships: &[Relationship],
    constraints: &[SeatingConstraint],
    initial: &Assignment,
    budget: OptimizationBudget,
    seed: Option<u64>,
) -> OptimizationResult {
    let problem = SeatingProblem::new(guests.to_vec(), tables.to_vec())
        .with_relationships(relationships.to_vec())
        .with_constraints(constraints.to_vec());
    let mut optimizer = Optimizer::new().with_budget(budget);
    if let Some(seed) = seed {
        optimizer = optimizer.with_seed(seed);
    }
    optimizer.optimize(&problem, initial)
}

// Reports malformed constraints. Empty ones are dropped from the search;
// ones naming unknown guests stay in and count as unsatisfiable.
fn screen_constraints<'a>(
    problem: &'a SeatingProblem,
    diagnostics: &mut Vec<SeatingError>,
) -> Cow<'a, SeatingProblem> {
    let known: HashSet<&GuestId> = problem.guests.iter().map(|g| &g.id).collect();
    let mut has_empty = false;
    for constraint in &problem.constraints {
        if let Err(err) = validate_constraint(constraint, &known) {
            warn!(
                event = "constraint_rejected",
                constraint_id = %constraint.id,
                reason = %err,
            );
            has_empty |= constraint.guest_ids.is_empty();
            diagnostics.push(err);
        }
    }
    if !has_empty {
        return Cow::Borrowed(problem);
    }
    let mut screened = problem.clone();
    screened.constraints.retain(|c| !c.guest_ids.is_empty());
    Cow::Owned(screened)
}

// The caller's assignment if it fits the tables, else a group distribution.
// The flag is set when the caller supplied nothing usable to start from.
fn seed_assignment(
    problem: &SeatingProblem,
    initial: &Assignment,
    diagnostics: &mut Vec<SeatingError>,
) -> (Assignment, bool) {
    let known: HashSet<&GuestId> = problem.guests.iter().map(|g| &g.id).collect();
    let seed: Assignment = initial
        .iter()
        .filter(|(guest, _)| known.contains(guest))
        .map(|(guest, seat)| (guest.clone(), seat.clone()))
        .collect();
    if seed.len() < initial.len() {
        debug!(
            event = "seed_pruned",
            dropped = initial.len() - seed.len(),
        );
    }

    if !seed.is_empty() {
        match seed
            .check_capacity(&problem.tables)
            .and_then(|()| seed.check_seats(&problem.tables))
        {
            Ok(()) => return (seed, false),
            Err(err) => {
                warn!(event = "seed_discarded", reason = %err);
                diagnostics.push(err);
                let distributed =
                    distribute_tables(&problem.guests, &problem.tables, DistributionStrategy::Groups)
                        .to_assignment(&problem.tables);
                return (distributed, false);
            }
        }
    }
    let distributed =
        distribute_tables(&problem.guests, &problem.tables, DistributionStrategy::Groups)
            .to_assignment(&problem.tables);
    (distributed, true)
}

fn send_best(
    sender: &Option<mpsc::UnboundedSender<BestSolutionEvent>>,
    assignment: &Assignment,
    score: SeatingScore,
    step: u64,
) {
    if let Some(sender) = sender {
        let _ = sender.send(BestSolutionEvent {
            assignment: assignment.clone(),
            score,
            step,
        });
    }
}

#[cfg(test)]
mod tests;
