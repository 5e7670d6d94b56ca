//! Properties every optimizer and distributor result must hold.

use seatplan_core::{Assignment, Position, RelationshipType, SeatingProblem, Table};
use seatplan_scoring::{ScoreCalculator, ViolationEvaluator};
use seatplan_solver::{
    distribute, distribute_tables, DistributionStrategy, OptimizationBudget, Optimizer,
};
use seatplan_test::{grouped, guest, guests, relationship, tables, wedding};

fn calculator() -> ScoreCalculator {
    ScoreCalculator::new().with_evaluator(
        ViolationEvaluator::new()
            .with_front_anchor(Position::new(0.0, 0.0))
            .with_accessibility(|t: &Table| t.id.as_str() == "t0"),
    )
}

fn optimizer(seed: u64) -> Optimizer {
    Optimizer::new()
        .with_calculator(calculator())
        .with_budget(OptimizationBudget::unbounded().with_max_iterations(4_000))
        .with_seed(seed)
}

fn within_capacity(assignment: &Assignment, tables: &[Table]) -> bool {
    assignment.check_capacity(tables).is_ok() && assignment.check_seats(tables).is_ok()
}

#[test]
fn capacity_invariant_for_distributor() {
    let problem = wedding();
    for capacity in [1, 2, 3, 5, 6] {
        let tables = tables(4, capacity);
        for strategy in [
            DistributionStrategy::Even,
            DistributionStrategy::Groups,
            DistributionStrategy::Skip,
            DistributionStrategy::Optimized,
        ] {
            let result = distribute_tables(&problem.guests, &tables, strategy);
            for (&table, seated) in &result.tables {
                assert!(seated.len() <= capacity as usize, "{strategy} overfilled t{table}");
            }
            if strategy != DistributionStrategy::Skip {
                assert_eq!(
                    result.placed_count() + result.unassigned.len(),
                    problem.guests.len()
                );
            }
            assert!(within_capacity(&result.to_assignment(&tables), &tables));
        }
    }
}

#[test]
fn capacity_invariant_for_optimizer() {
    for capacity in [2, 3, 4] {
        let problem = SeatingProblem {
            tables: tables(4, capacity),
            ..wedding()
        };
        let result = optimizer(1).optimize(&problem, &Assignment::new());
        assert!(within_capacity(&result.assignment, &problem.tables));
    }
}

#[test]
fn evaluation_is_idempotent() {
    let problem = wedding();
    let assignment = distribute_tables(&problem.guests, &problem.tables, DistributionStrategy::Even)
        .to_assignment(&problem.tables);
    let evaluator = calculator();

    let first = evaluator.violations(&problem, &assignment).unwrap();
    let second = evaluator.violations(&problem, &assignment).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn distributor_is_deterministic() {
    let guests = vec![
        grouped("a1", "A"),
        guest("u1"),
        grouped("b1", "B"),
        grouped("a2", "A"),
        guest("u2"),
        grouped("b2", "B"),
        grouped("a3", "A"),
        guest("u3"),
    ];

    let first = distribute(&guests, 3, 4, DistributionStrategy::Groups);
    for _ in 0..10 {
        assert_eq!(distribute(&guests, 3, 4, DistributionStrategy::Groups), first);
    }
}

#[test]
fn optimizer_never_returns_worse_than_initial() {
    let problem = wedding();
    let scorer = calculator();
    let initials = [
        Assignment::new(),
        distribute_tables(&problem.guests, &problem.tables, DistributionStrategy::Even)
            .to_assignment(&problem.tables),
        distribute_tables(&problem.guests, &problem.tables, DistributionStrategy::Groups)
            .to_assignment(&problem.tables),
    ];

    for initial in &initials {
        let before = scorer.score_assignment(&problem, initial).unwrap();
        for seed in [0, 1, 42] {
            let result = optimizer(seed).optimize(&problem, initial);
            assert!(
                result.score.affinity - result.score.penalty >= before.combined(),
                "seed {seed} scored {} below initial {}",
                result.score,
                before
            );
        }
    }
}

#[test]
fn relationships_are_symmetric() {
    let forward = SeatingProblem::new(guests(4), tables(2, 2)).with_relationships(vec![
        relationship("g0", "g1", RelationshipType::Friend, 3),
        relationship("g2", "g3", RelationshipType::Avoid, 2),
    ]);
    let backward = SeatingProblem::new(guests(4), tables(2, 2)).with_relationships(vec![
        relationship("g1", "g0", RelationshipType::Friend, 3),
        relationship("g3", "g2", RelationshipType::Avoid, 2),
    ]);
    let mut reordered = backward.clone();
    reordered.guests.reverse();

    let seated = seatplan_test::assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t1"), ("g3", "t1")]);
    let scorer = ScoreCalculator::new();
    let a = scorer.score_assignment(&forward, &seated).unwrap();
    let b = scorer.score_assignment(&backward, &seated).unwrap();
    let c = scorer.score_assignment(&reordered, &seated).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a.affinity, 3.0 - 4.0);

    let run_forward = optimizer(9).optimize(&forward, &seated);
    let run_backward = optimizer(9).optimize(&backward, &seated);
    assert_eq!(run_forward.score, run_backward.score);
    assert_eq!(run_forward.assignment, run_backward.assignment);
}
