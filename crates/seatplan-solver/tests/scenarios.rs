//! End-to-end seating scenarios.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use seatplan_core::{
    Assignment, ConstraintType, Priority, SeatingError, SeatingProblem, SeatingScore,
};
use seatplan_scoring::violation::evaluate;
use seatplan_scoring::{AffinityScorer, AVOID_PENALTY_MULTIPLIER};
use seatplan_solver::{
    distribute, optimize, optimize_parallel, DistributionStrategy, OptimizationBudget, Optimizer,
    SeatingSession, SolverManager, TerminationReason,
};
use seatplan_test::{assignment, avoid, constraint, grouped, guest, guests, tables, wedding};

#[test]
fn split_pair_reports_one_violation() {
    let guests = guests(2);
    let tables = tables(2, 2);
    let constraints = vec![constraint(
        "pair",
        ConstraintType::MustSitTogether,
        &["g0", "g1"],
        Priority::Required,
    )];
    let seated = assignment(&[("g0", "t0"), ("g1", "t1")]);

    let violations = evaluate(&seated, &tables, &guests, &constraints).unwrap();

    assert_eq!(violations.len(), 1);
    let violation = &violations[0];
    assert_eq!(violation.kind, ConstraintType::MustSitTogether);
    assert_eq!(violation.priority, Priority::Required);
    assert_eq!(
        violation.affected_guest_ids,
        vec!["g0".into(), "g1".into()]
    );
}

#[test]
fn avoid_pair_at_one_table() {
    let seated = assignment(&[("g0", "t0"), ("g1", "t0")]);
    let score = AffinityScorer::new().score(&seated, &[avoid("g0", "g1", 5)]);

    assert_eq!(score, -5.0 * AVOID_PENALTY_MULTIPLIER);
    assert_eq!(score, -10.0);
}

#[test]
fn groups_distribution_keeps_group_together() {
    let guests = vec![
        guest("u0"),
        grouped("a0", "A"),
        guest("u1"),
        guest("u2"),
        grouped("a1", "A"),
        guest("u3"),
    ];

    let result = distribute(&guests, 2, 4, DistributionStrategy::Groups);

    assert!(result.unassigned.is_empty());
    assert_eq!(result.table_of(&"a0".into()), result.table_of(&"a1".into()));
}

#[test]
fn empty_input_returns_empty_assignment() {
    let result = optimize(
        &[],
        &[],
        &[],
        &[],
        &Assignment::new(),
        OptimizationBudget::default(),
        None,
    );

    assert!(result.assignment.is_empty());
    assert_eq!(result.score, SeatingScore::of(0.0, 0.0));
    assert_eq!(result.termination(), TerminationReason::Empty);
    assert_eq!(result.statistics.moves_evaluated, 0);
}

#[test]
fn guests_without_tables_stay_unassigned() {
    let guests = guests(5);
    let result = optimize(
        &guests,
        &[],
        &[],
        &[],
        &Assignment::new(),
        OptimizationBudget::default(),
        Some(3),
    );

    assert!(result.assignment.is_empty());
    assert_eq!(result.score, SeatingScore::ZERO);
}

#[test]
fn overfull_initial_assignment_is_reseeded() {
    let problem = SeatingProblem::new(guests(4), tables(2, 2));
    let crowded = assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t0"), ("g3", "t0")]);

    let result = Optimizer::new()
        .with_budget(OptimizationBudget::unbounded().with_max_iterations(500))
        .optimize(&problem, &crowded);

    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, SeatingError::CapacityExceededInput { .. })));
    assert_eq!(result.assignment.len(), 4);
    assert_eq!(result.assignment.seated_count(&"t0".into()), 2);
}

#[test]
fn reception_end_to_end() {
    let problem = wedding();
    let optimizer = Optimizer::new()
        .with_budget(OptimizationBudget::unbounded().with_max_iterations(10_000));
    let mut session = SeatingSession::new(problem, optimizer.clone());

    let preview = session.distribute(DistributionStrategy::Optimized).clone();
    assert_eq!(preview.len(), 18);

    let result = session.optimize();
    assert!(result.score.combined() >= session_score_of(&session, &preview));
    assert!(result
        .violations
        .iter()
        .all(|v| v.priority != Priority::Required));

    assert!(session.reset());
    assert_eq!(session.assignment(), &preview);

    let best_of_three =
        optimize_parallel(&optimizer, session.problem(), &preview, &[1, 2, 3]).unwrap();
    assert!(best_of_three.score.combined() >= session_score_of(&session, &preview));
}

fn session_score_of(session: &SeatingSession, assignment: &Assignment) -> f64 {
    session
        .optimizer()
        .calculator()
        .score_assignment(session.problem(), assignment)
        .unwrap()
        .combined()
}

#[test]
fn background_job_can_be_cancelled() {
    let manager = SolverManager::new(Optimizer::new().with_budget(OptimizationBudget::unbounded()));
    let handle = manager.solve("reception", wedding(), Assignment::new());
    handle.cancel();

    let result = handle.blocking_result().unwrap();
    assert!(result.is_cancelled());
    assert_eq!(result.assignment.len(), 18);
}

#[test]
fn cancellation_returns_best_so_far() {
    let cancel = Arc::new(AtomicBool::new(true));
    let result = Optimizer::new()
        .with_budget(OptimizationBudget::unbounded())
        .optimize_with_cancel(&wedding(), &Assignment::new(), cancel);

    assert!(result.is_cancelled());
    assert!(result.diagnostics.contains(&SeatingError::OptimizationCancelled));
    assert_eq!(result.assignment.len(), 18);
}
