//! One-slot snapshot of the assignment taken before an optimizer run, and
//! the session type that ties it to optimizer runs.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use seatplan_core::{Assignment, Result, SeatingProblem, SeatingScore};
use seatplan_scoring::{ScoreExplanation, Violation, ViolationIndex};
use tracing::debug;

use crate::distributor::{distribute_tables, DistributionStrategy};
use crate::optimizer::{OptimizationResult, Optimizer};

/// Identifies one capture.
///
/// A handle is only good for the snapshot it came from: capturing again or
/// clearing the slot makes older handles stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotHandle {
    generation: u64,
}

impl SnapshotHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds at most one saved assignment.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, Seat};
/// use seatplan_solver::SnapshotManager;
///
/// let mut before = Assignment::new();
/// before.assign("a".into(), Seat::new("t1", 0));
///
/// let mut snapshots = SnapshotManager::new();
/// let handle = snapshots.capture(&before);
/// assert_eq!(snapshots.restore(handle), Some(before.clone()));
///
/// let newer = snapshots.capture(&Assignment::new());
/// assert_eq!(snapshots.restore(handle), None);
/// assert_eq!(snapshots.restore(newer), Some(Assignment::new()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotManager {
    slot: Option<(SnapshotHandle, Assignment)>,
    next_generation: u64,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a copy of `assignment`, replacing any earlier snapshot.
    pub fn capture(&mut self, assignment: &Assignment) -> SnapshotHandle {
        self.next_generation += 1;
        let handle = SnapshotHandle {
            generation: self.next_generation,
        };
        self.slot = Some((handle, assignment.clone()));
        handle
    }

    /// The saved assignment, if `handle` is the current snapshot.
    pub fn restore(&self, handle: SnapshotHandle) -> Option<Assignment> {
        match &self.slot {
            Some((current, assignment)) if *current == handle => Some(assignment.clone()),
            _ => None,
        }
    }

    /// Handle of the snapshot currently held.
    pub fn current(&self) -> Option<SnapshotHandle> {
        self.slot.as_ref().map(|(handle, _)| *handle)
    }

    pub fn peek(&self) -> Option<&Assignment> {
        self.slot.as_ref().map(|(_, assignment)| assignment)
    }

    pub fn has_snapshot(&self) -> bool {
        self.slot.is_some()
    }

    /// Drops the snapshot. Called when the assignment is edited outside the
    /// optimizer, since "Reset" would then discard that edit.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// One event's working state: the problem, the current assignment, and the
/// pre-optimization snapshot.
///
/// Sessions are not shared between events; each owns its snapshot slot.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Guest, SeatingProblem, Table};
/// use seatplan_solver::{OptimizationBudget, Optimizer, SeatingSession};
///
/// let problem = SeatingProblem::new(
///     vec![Guest::new("a", "Ann", "Lee"), Guest::new("b", "Ben", "Lee")],
///     vec![Table::new("t1", 1), Table::new("t2", 1)],
/// );
/// let optimizer =
///     Optimizer::new().with_budget(OptimizationBudget::unbounded().with_max_iterations(100));
///
/// let mut session = SeatingSession::new(problem, optimizer);
/// let before = session.assignment().clone();
/// session.optimize();
/// assert!(session.can_reset());
///
/// session.reset();
/// assert_eq!(session.assignment(), &before);
/// assert!(!session.can_reset());
/// ```
#[derive(Debug, Clone)]
pub struct SeatingSession {
    problem: SeatingProblem,
    assignment: Assignment,
    snapshots: SnapshotManager,
    optimizer: Optimizer,
}

impl SeatingSession {
    pub fn new(problem: SeatingProblem, optimizer: Optimizer) -> Self {
        Self::with_assignment(problem, Assignment::new(), optimizer)
    }

    pub fn with_assignment(
        problem: SeatingProblem,
        assignment: Assignment,
        optimizer: Optimizer,
    ) -> Self {
        Self {
            problem,
            assignment,
            snapshots: SnapshotManager::new(),
            optimizer,
        }
    }

    pub fn problem(&self) -> &SeatingProblem {
        &self.problem
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    /// Replaces the problem after an upstream edit.
    pub fn set_problem(&mut self, problem: SeatingProblem) {
        self.problem = problem;
        self.invalidate_snapshot();
    }

    /// Replaces the assignment after a manual edit.
    pub fn set_assignment(&mut self, assignment: Assignment) {
        self.assignment = assignment;
        self.invalidate_snapshot();
    }

    /// Seats everyone from scratch with the distributor.
    pub fn distribute(&mut self, strategy: DistributionStrategy) -> &Assignment {
        let distribution = distribute_tables(&self.problem.guests, &self.problem.tables, strategy);
        self.set_assignment(distribution.to_assignment(&self.problem.tables));
        &self.assignment
    }

    /// Snapshots the current assignment, optimizes, and adopts the result.
    pub fn optimize(&mut self) -> OptimizationResult {
        self.snapshots.capture(&self.assignment);
        let result = self.optimizer.optimize(&self.problem, &self.assignment);
        self.assignment = result.assignment.clone();
        result
    }

    /// Like [`optimize`](Self::optimize) with a cancellation flag. A
    /// cancelled run still replaces the assignment with its best so far.
    pub fn optimize_with_cancel(&mut self, cancel: Arc<AtomicBool>) -> OptimizationResult {
        self.snapshots.capture(&self.assignment);
        let result = self
            .optimizer
            .optimize_with_cancel(&self.problem, &self.assignment, cancel);
        self.assignment = result.assignment.clone();
        result
    }

    pub fn can_reset(&self) -> bool {
        self.snapshots.has_snapshot()
    }

    /// Restores the assignment from before the last optimizer run.
    ///
    /// Returns `false` when there is nothing to restore. The snapshot is
    /// used up.
    pub fn reset(&mut self) -> bool {
        let restored = self
            .snapshots
            .current()
            .and_then(|handle| self.snapshots.restore(handle));
        match restored {
            Some(assignment) => {
                self.assignment = assignment;
                self.snapshots.clear();
                debug!(event = "session_reset");
                true
            }
            None => false,
        }
    }

    pub fn invalidate_snapshot(&mut self) {
        self.snapshots.clear();
    }

    pub fn violations(&self) -> Result<Vec<Violation>> {
        self.optimizer
            .calculator()
            .violations(&self.problem, &self.assignment)
    }

    /// Violations grouped by guest and table, for badges.
    pub fn violation_index(&self) -> Result<ViolationIndex> {
        self.violations().map(ViolationIndex::new)
    }

    pub fn score(&self) -> Result<SeatingScore> {
        self.optimizer
            .calculator()
            .score_assignment(&self.problem, &self.assignment)
    }

    pub fn explain(&self) -> Result<ScoreExplanation> {
        self.optimizer
            .calculator()
            .explain(&self.problem, &self.assignment)
    }
}

#[cfg(test)]
mod tests {
    use seatplan_core::{ConstraintType, Priority};
    use seatplan_test::{assignment, constraint, guests, tables, wedding};

    use super::*;
    use crate::budget::OptimizationBudget;

    fn optimizer() -> Optimizer {
        Optimizer::new().with_budget(OptimizationBudget::unbounded().with_max_iterations(2_000))
    }

    #[test]
    fn test_capture_overwrites_previous() {
        let mut snapshots = SnapshotManager::new();
        let first = snapshots.capture(&assignment(&[("a", "t0")]));
        let second = snapshots.capture(&assignment(&[("b", "t0")]));

        assert_ne!(first, second);
        assert_eq!(snapshots.restore(first), None);
        assert_eq!(snapshots.restore(second), Some(assignment(&[("b", "t0")])));
        assert_eq!(snapshots.current(), Some(second));
    }

    #[test]
    fn test_restore_does_not_consume() {
        let mut snapshots = SnapshotManager::new();
        let handle = snapshots.capture(&assignment(&[("a", "t0")]));

        assert!(snapshots.restore(handle).is_some());
        assert!(snapshots.restore(handle).is_some());
        snapshots.clear();
        assert_eq!(snapshots.restore(handle), None);
        assert!(!snapshots.has_snapshot());
    }

    #[test]
    fn test_session_reset_restores_pre_optimize_state() {
        let problem = SeatingProblem::new(guests(4), tables(2, 2)).with_constraints(vec![
            constraint(
                "pair",
                ConstraintType::MustSitTogether,
                &["g0", "g1"],
                Priority::Required,
            ),
        ]);
        let start = assignment(&[("g0", "t0"), ("g2", "t0"), ("g1", "t1"), ("g3", "t1")]);
        let mut session = SeatingSession::with_assignment(problem, start.clone(), optimizer());

        let result = session.optimize();
        assert_eq!(session.assignment(), &result.assignment);
        assert_ne!(session.assignment(), &start);
        assert!(session.violations().unwrap().is_empty());

        assert!(session.reset());
        assert_eq!(session.assignment(), &start);
        assert_eq!(session.violations().unwrap().len(), 1);
        assert!(!session.reset());
    }

    #[test]
    fn test_manual_edit_clears_snapshot() {
        let mut session = SeatingSession::new(wedding(), optimizer());
        session.distribute(DistributionStrategy::Groups);
        session.optimize();
        assert!(session.can_reset());

        session.set_assignment(Assignment::new());
        assert!(!session.can_reset());

        session.optimize();
        session.set_problem(wedding());
        assert!(!session.can_reset());
    }

    #[test]
    fn test_cancelled_optimize_can_be_reset() {
        let mut session = SeatingSession::new(wedding(), optimizer());
        let seeded = session.distribute(DistributionStrategy::Even).clone();

        let result = session.optimize_with_cancel(Arc::new(AtomicBool::new(true)));
        assert!(result.is_cancelled());
        assert!(session.reset());
        assert_eq!(session.assignment(), &seeded);
    }

    #[test]
    fn test_session_scoring_views_agree() {
        let mut session = SeatingSession::new(wedding(), optimizer());
        session.distribute(DistributionStrategy::Groups);

        let score = session.score().unwrap();
        let explanation = session.explain().unwrap();
        let index = session.violation_index().unwrap();

        assert_eq!(explanation.score, score);
        assert_eq!(index.len(), session.violations().unwrap().len());
    }
}
