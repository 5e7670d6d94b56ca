use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use seatplan_config::AcceptorConfig;
use seatplan_core::{
    Assignment, ConstraintType, Position, Priority, SeatingConstraint, SeatingError,
    SeatingProblem, SeatingScore, Table,
};
use seatplan_scoring::{ScoreCalculator, ViolationEvaluator};
use seatplan_test::{assignment, avoid, constraint, friend, guests, tables, wedding};
use tokio::sync::mpsc;

use super::*;

fn short() -> OptimizationBudget {
    OptimizationBudget::unbounded().with_max_iterations(5_000)
}

fn assert_fits(problem: &SeatingProblem, assignment: &Assignment) {
    assignment.check_capacity(&problem.tables).unwrap();
    assignment.check_seats(&problem.tables).unwrap();
}

fn wedding_calculator() -> ScoreCalculator {
    ScoreCalculator::new().with_evaluator(
        ViolationEvaluator::new()
            .with_front_anchor(Position::new(0.0, 0.0))
            .with_accessibility(|t: &Table| t.id.as_str() == "t0" || t.id.as_str() == "t1"),
    )
}

#[test]
fn test_empty_guest_list_returns_immediately() {
    let problem = SeatingProblem::new(Vec::new(), tables(2, 4));
    let result = Optimizer::new().optimize(&problem, &Assignment::new());

    assert!(result.assignment.is_empty());
    assert_eq!(result.score, SeatingScore::ZERO);
    assert_eq!(result.termination(), TerminationReason::Empty);
    assert_eq!(result.statistics.steps, 0);
}

#[test]
fn test_no_capacity_leaves_everyone_unassigned() {
    let problem = SeatingProblem::new(guests(3), Vec::new());
    let result = Optimizer::new().optimize(&problem, &Assignment::new());

    assert!(result.assignment.is_empty());
    assert_eq!(result.termination(), TerminationReason::Empty);
}

#[test]
fn test_split_pair_is_reunited() {
    let problem = SeatingProblem::new(guests(4), tables(2, 2)).with_constraints(vec![constraint(
        "pair",
        ConstraintType::MustSitTogether,
        &["g0", "g1"],
        Priority::Required,
    )]);
    let seed = assignment(&[("g0", "t0"), ("g2", "t0"), ("g1", "t1"), ("g3", "t1")]);

    let result = Optimizer::new()
        .with_budget(short())
        .with_seed(11)
        .optimize(&problem, &seed);

    assert!(result.violations.is_empty());
    assert_eq!(
        result.assignment.table_of(&"g0".into()),
        result.assignment.table_of(&"g1".into())
    );
    assert_fits(&problem, &result.assignment);
}

#[test]
fn test_avoid_pair_is_separated() {
    let problem = SeatingProblem::new(guests(4), tables(2, 2))
        .with_relationships(vec![avoid("g0", "g1", 5), friend("g2", "g3", 1)]);
    let seed = assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t1"), ("g3", "t1")]);

    let result = Optimizer::new()
        .with_budget(short())
        .with_seed(5)
        .optimize(&problem, &seed);

    assert_ne!(
        result.assignment.table_of(&"g0".into()),
        result.assignment.table_of(&"g1".into())
    );
    assert!(result.score.affinity >= 0.0);
}

#[test]
fn test_wedding_meets_required_rules() {
    let problem = wedding();
    let optimizer = Optimizer::new()
        .with_calculator(wedding_calculator())
        .with_budget(OptimizationBudget::unbounded().with_max_iterations(30_000))
        .with_seed(2024);

    let result = optimizer.optimize(&problem, &Assignment::new());

    assert_fits(&problem, &result.assignment);
    assert_eq!(result.assignment.len(), problem.guests.len());
    assert!(result
        .violations
        .iter()
        .all(|v| v.priority != Priority::Required));
    assert_eq!(result.termination(), TerminationReason::StepLimit);
}

#[test]
fn test_never_worse_than_seed() {
    let problem = wedding();
    let calculator = wedding_calculator();
    let seed = distribute_tables(&problem.guests, &problem.tables, DistributionStrategy::Groups)
        .to_assignment(&problem.tables);
    let seed_score = calculator.score_assignment(&problem, &seed).unwrap();

    for acceptor in [
        AcceptorConfig::HillClimbing,
        AcceptorConfig::default(),
        AcceptorConfig::LateAcceptance(Default::default()),
    ] {
        let result = Optimizer::new()
            .with_calculator(calculator.clone())
            .with_acceptor(acceptor)
            .with_budget(OptimizationBudget::unbounded().with_max_iterations(2_000))
            .optimize(&problem, &seed);
        assert!(result.score.combined() >= seed_score.combined());
    }
}

#[test]
fn test_same_seed_same_result() {
    let problem = wedding();
    let optimizer = Optimizer::new()
        .with_calculator(wedding_calculator())
        .with_budget(OptimizationBudget::unbounded().with_max_iterations(3_000))
        .with_seed(99);

    let first = optimizer.optimize(&problem, &Assignment::new());
    let second = optimizer.optimize(&problem, &Assignment::new());

    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.score, second.score);
    assert_eq!(first.statistics.moves_accepted, second.statistics.moves_accepted);
    assert_eq!(first.seed, 99);
}

#[test]
fn test_cancelled_run_returns_seed_with_diagnostic() {
    let problem = wedding();
    let seed = assignment(&[("ann", "t0"), ("bea", "t0")]);
    let cancel = Arc::new(AtomicBool::new(true));

    let result = Optimizer::new()
        .with_budget(OptimizationBudget::unbounded())
        .optimize_with_cancel(&problem, &seed, cancel);

    assert!(result.is_cancelled());
    assert_eq!(result.statistics.steps, 0);
    assert_eq!(result.assignment, seed);
    assert!(result
        .diagnostics
        .contains(&SeatingError::OptimizationCancelled));
}

#[test]
fn test_overfull_seed_is_replaced() {
    let problem = SeatingProblem::new(guests(3), tables(2, 2));
    let seed = assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t0")]);

    let result = Optimizer::new()
        .with_budget(short())
        .optimize(&problem, &seed);

    assert!(matches!(
        result.diagnostics.first(),
        Some(SeatingError::CapacityExceededInput { .. })
    ));
    assert_fits(&problem, &result.assignment);
    assert_eq!(result.assignment.len(), 3);
}

#[test]
fn test_unknown_guests_in_seed_are_dropped() {
    let problem = SeatingProblem::new(guests(2), tables(2, 2));
    let seed = assignment(&[("g0", "t0"), ("ghost", "t0")]);

    let result = Optimizer::new()
        .with_budget(short())
        .optimize(&problem, &seed);

    assert!(!result.assignment.is_assigned(&"ghost".into()));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_malformed_constraints_are_reported() {
    let problem = SeatingProblem::new(guests(4), tables(2, 2)).with_constraints(vec![
        SeatingConstraint::new(
            "empty",
            ConstraintType::MustSitTogether,
            Vec::<&str>::new(),
            Priority::Required,
        ),
        constraint(
            "ghost",
            ConstraintType::MustSitTogether,
            &["g0", "nobody"],
            Priority::Optional,
        ),
        constraint(
            "apart",
            ConstraintType::MustNotSitTogether,
            &["g0", "g1"],
            Priority::Required,
        ),
    ]);
    let seed = assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t1"), ("g3", "t1")]);

    let result = Optimizer::new()
        .with_budget(short())
        .optimize(&problem, &seed);

    let rejected: Vec<_> = result
        .diagnostics
        .iter()
        .filter_map(|d| match d {
            SeatingError::InvalidConstraint { constraint_id, .. } => Some(constraint_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(rejected, vec!["empty", "ghost"]);

    let remaining: Vec<_> = result
        .violations
        .iter()
        .map(|v| v.constraint_id.as_str())
        .collect();
    assert_eq!(remaining, vec!["ghost"]);
}

#[test]
fn test_listener_receives_improving_bests() {
    let problem = wedding();
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let result = Optimizer::new()
        .with_calculator(wedding_calculator())
        .with_budget(OptimizationBudget::unbounded().with_max_iterations(5_000))
        .optimize_with_listener(&problem, &Assignment::new(), None, Some(sender));

    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }

    assert_eq!(events.first().map(|e| e.step), Some(0));
    for pair in events.windows(2) {
        assert!(pair[1].score.combined() > pair[0].score.combined());
        assert!(pair[1].step >= pair[0].step);
    }
    let last = events.last().unwrap();
    assert!((last.score.combined() - result.score.combined()).abs() < 1e-6);
}

#[test]
fn test_winning_starting_point_is_reported_to_listener() {
    // Both guests must share the only table, and they avoid each other.
    let problem = SeatingProblem::new(guests(2), tables(1, 2))
        .with_relationships(vec![avoid("g0", "g1", 5)]);
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let result = Optimizer::new()
        .with_budget(short())
        .optimize_with_listener(&problem, &Assignment::new(), None, Some(sender));

    assert!(result.assignment.is_empty());
    assert_eq!(result.score.combined(), 0.0);

    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].score.affinity, -10.0);
    assert_eq!(events[1].assignment, result.assignment);
    assert_eq!(events[1].score, result.score);
}

#[test]
fn test_overflow_guest_displaces_seated_guest() {
    // Three guests, two seats: g1 has to give up the seat to reunite the pair.
    let problem = SeatingProblem::new(guests(3), tables(1, 2))
        .with_relationships(vec![friend("g0", "g2", 5)])
        .with_constraints(vec![constraint(
            "pair",
            ConstraintType::MustSitTogether,
            &["g0", "g2"],
            Priority::Required,
        )]);

    let result = Optimizer::new()
        .with_budget(short())
        .optimize(&problem, &Assignment::new());

    assert_fits(&problem, &result.assignment);
    assert_eq!(result.assignment.len(), 2);
    assert!(result.assignment.is_assigned(&"g0".into()));
    assert!(result.assignment.is_assigned(&"g2".into()));
    assert_eq!(result.score.affinity, 5.0);
    assert_eq!(result.score.penalty, 0.0);
    assert!(result.violations.is_empty());
    assert_ne!(result.termination(), TerminationReason::NoMoves);
}

#[test]
fn test_single_full_table_has_no_moves() {
    let problem = SeatingProblem::new(guests(2), tables(1, 2));
    let result = Optimizer::new()
        .with_budget(OptimizationBudget::unbounded())
        .optimize(&problem, &Assignment::new());

    assert_eq!(result.termination(), TerminationReason::NoMoves);
    assert_eq!(result.assignment.len(), 2);
}

#[test]
fn test_free_function_uses_default_seed() {
    let problem = SeatingProblem::new(guests(3), tables(2, 2))
        .with_relationships(vec![friend("g0", "g2", 4)]);

    let result = optimize(
        &problem.guests,
        &problem.tables,
        &problem.relationships,
        &problem.constraints,
        &Assignment::new(),
        short(),
        None,
    );

    assert_eq!(result.seed, seatplan_config::DEFAULT_RANDOM_SEED);
    assert_eq!(result.score.affinity, 4.0);
}
