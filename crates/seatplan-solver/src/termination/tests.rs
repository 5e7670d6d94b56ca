use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use seatplan_core::Assignment;
use seatplan_scoring::{ScoreCalculator, SeatingDirector};
use seatplan_test::wedding;

use super::*;

fn scope() -> SolverScope {
    let director = SeatingDirector::new(&wedding(), &Assignment::new(), &ScoreCalculator::new());
    let mut scope = SolverScope::with_seed(director, 7);
    scope.start_solving();
    scope
}

#[test]
fn test_step_count() {
    let mut scope = scope();
    let termination = StepCountTermination::new(3);
    for _ in 0..2 {
        scope.increment_step_count();
    }
    assert!(!termination.is_terminated(&scope));
    scope.increment_step_count();
    assert_eq!(termination.check(&scope), Some(TerminationReason::StepLimit));
}

#[test]
fn test_time() {
    let scope = scope();
    assert_eq!(
        TimeTermination::new(Duration::ZERO).check(&scope),
        Some(TerminationReason::TimeLimit)
    );
    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
}

#[test]
fn test_unimproved_counts_from_last_best() {
    let mut scope = scope();
    let termination = UnimprovedStepCountTermination::new(2);
    scope.increment_step_count();
    assert!(!termination.is_terminated(&scope));
    scope.increment_step_count();
    assert_eq!(termination.check(&scope), Some(TerminationReason::Stagnation));
}

#[test]
fn test_external_flag() {
    let flag = Arc::new(AtomicBool::new(false));
    let termination = ExternalTermination::new(Arc::clone(&flag));
    let mut scope = scope();
    assert!(!termination.is_terminated(&scope));

    flag.store(true, Ordering::SeqCst);
    assert_eq!(termination.check(&scope), Some(TerminationReason::Cancelled));

    let other = Arc::new(AtomicBool::new(true));
    scope.set_terminate_early_flag(other);
    assert!(ExternalTermination::default().is_terminated(&scope));
}

#[test]
fn test_or_reports_first_reason() {
    let mut scope = scope();
    scope.increment_step_count();
    let termination = OrTermination::new()
        .with(StepCountTermination::new(1))
        .with(TimeTermination::new(Duration::ZERO));
    assert_eq!(termination.len(), 2);
    assert_eq!(termination.check(&scope), Some(TerminationReason::StepLimit));

    let empty = OrTermination::new();
    assert!(empty.is_empty());
    assert!(!empty.is_terminated(&scope));
}
