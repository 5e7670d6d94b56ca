//! Full (non-incremental) score calculation.

use std::collections::BTreeMap;

use seatplan_config::EngineConfig;
use seatplan_core::{Assignment, SeatingProblem, SeatingScore, Result};

use crate::affinity::AffinityScorer;
use crate::analysis::{ConstraintPenalty, ScoreExplanation};
use crate::violation::{Violation, ViolationEvaluator};
use crate::weights::PenaltyWeights;

/// Grades assignments as `affinity - penalty`.
///
/// Bundles the three scoring parts so every caller (live badges, the
/// optimizer, the final result) agrees on one definition of the score.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, Guest, Relationship, RelationshipType, Seat, SeatingProblem, Table};
/// use seatplan_scoring::ScoreCalculator;
///
/// let problem = SeatingProblem::new(
///     vec![Guest::new("a", "Ann", "Lee"), Guest::new("b", "Ben", "Lee")],
///     vec![Table::new("t1", 2)],
/// )
/// .with_relationships(vec![Relationship::new("a", "b", RelationshipType::Friend, 3)]);
///
/// let mut assignment = Assignment::new();
/// assignment.assign("a".into(), Seat::new("t1", 0));
/// assignment.assign("b".into(), Seat::new("t1", 1));
///
/// let score = ScoreCalculator::new().score_assignment(&problem, &assignment).unwrap();
/// assert_eq!(score.affinity, 3.0);
/// assert_eq!(score.penalty, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    evaluator: ViolationEvaluator,
    weights: PenaltyWeights,
    affinity: AffinityScorer,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            evaluator: ViolationEvaluator::from_config(config),
            weights: PenaltyWeights::from_config(&config.weights),
            affinity: AffinityScorer::with_avoid_multiplier(config.weights.avoid_multiplier),
        }
    }

    pub fn with_evaluator(mut self, evaluator: ViolationEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_affinity(mut self, affinity: AffinityScorer) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn evaluator(&self) -> &ViolationEvaluator {
        &self.evaluator
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn affinity(&self) -> &AffinityScorer {
        &self.affinity
    }

    pub fn violations(
        &self,
        problem: &SeatingProblem,
        assignment: &Assignment,
    ) -> Result<Vec<Violation>> {
        self.evaluator.evaluate_problem(problem, assignment)
    }

    pub fn score_assignment(
        &self,
        problem: &SeatingProblem,
        assignment: &Assignment,
    ) -> Result<SeatingScore> {
        let violations = self.violations(problem, assignment)?;
        Ok(self.score_with(problem, assignment, &violations))
    }

    /// Scores an assignment whose violations are already known.
    pub fn score_with(
        &self,
        problem: &SeatingProblem,
        assignment: &Assignment,
        violations: &[Violation],
    ) -> SeatingScore {
        SeatingScore::of(
            self.affinity.score(assignment, &problem.relationships),
            self.weights.penalty(violations),
        )
    }

    /// Breaks the score down per constraint and per table.
    pub fn explain(
        &self,
        problem: &SeatingProblem,
        assignment: &Assignment,
    ) -> Result<ScoreExplanation> {
        let violations = self.violations(problem, assignment)?;
        let score = self.score_with(problem, assignment, &violations);

        let constraint_penalties = violations
            .iter()
            .map(|v| ConstraintPenalty {
                constraint_id: v.constraint_id.clone(),
                kind: v.kind,
                priority: v.priority,
                magnitude: v.magnitude,
                penalty: self.weights.penalty_of(v),
            })
            .collect();

        let mut table_affinity = BTreeMap::new();
        let graph = self.affinity.graph(&problem.relationships);
        for (a, b, weight) in graph.pairs() {
            let (Some(ta), Some(tb)) = (assignment.table_of(a), assignment.table_of(b)) else {
                continue;
            };
            if ta == tb {
                *table_affinity.entry(ta.clone()).or_insert(0.0) += weight;
            }
        }

        Ok(ScoreExplanation {
            score,
            constraint_penalties,
            table_affinity,
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_core::{ConstraintType, Priority, TableId};
    use seatplan_test::{assignment, avoid, constraint, friend, guests, tables};

    fn problem() -> SeatingProblem {
        SeatingProblem::new(guests(4), tables(2, 2))
            .with_relationships(vec![friend("g0", "g1", 4), avoid("g2", "g3", 2)])
            .with_constraints(vec![
                constraint("c1", ConstraintType::MustSitTogether, &["g0", "g2"], Priority::Required),
                constraint("c2", ConstraintType::DifferentTable, &["g2", "g3"], Priority::Optional),
            ])
    }

    #[test]
    fn test_combined_score() {
        let seated = assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t1"), ("g3", "t1")]);
        let score = ScoreCalculator::new()
            .score_assignment(&problem(), &seated)
            .unwrap();
        assert_eq!(score.affinity, 4.0 - 4.0);
        assert_eq!(score.penalty, 1000.0 + 10.0);
        assert_eq!(score.combined(), -1010.0);
    }

    #[test]
    fn test_explain_breaks_down_score() {
        let seated = assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t1"), ("g3", "t1")]);
        let explanation = ScoreCalculator::new().explain(&problem(), &seated).unwrap();

        assert_eq!(explanation.constraint_penalties.len(), 2);
        assert_eq!(explanation.constraint_penalties[0].penalty, 1000.0);
        assert_eq!(explanation.constraint_penalties[1].penalty, 10.0);
        assert_eq!(explanation.table_affinity[&TableId::from("t0")], 4.0);
        assert_eq!(explanation.table_affinity[&TableId::from("t1")], -4.0);
        assert_eq!(explanation.total_penalty(), explanation.score.penalty);
    }

    #[test]
    fn test_config_weights_flow_through() {
        let mut config = EngineConfig::default();
        config.weights.required = 5000.0;
        config.weights.avoid_multiplier = 3.0;
        let seated = assignment(&[("g0", "t0"), ("g1", "t0"), ("g2", "t1"), ("g3", "t1")]);

        let score = ScoreCalculator::from_config(&config)
            .score_assignment(&problem(), &seated)
            .unwrap();
        assert_eq!(score.affinity, 4.0 - 6.0);
        assert_eq!(score.penalty, 5000.0 + 10.0);
    }
}
