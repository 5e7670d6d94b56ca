//! Scoring for seatplan.
//!
//! This crate grades candidate assignments:
//! - [`ViolationEvaluator`]: which constraints an assignment breaks
//! - [`AffinityScorer`]: how well co-seated guests get along
//! - [`ScoreCalculator`]: both combined into a [`SeatingScore`](seatplan_core::SeatingScore)
//! - [`SeatingDirector`]: index-based working state with incremental deltas,
//!   used by the optimizer as its objective function
//! - [`ViolationIndex`] and [`ScoreExplanation`]: per-guest / per-table
//!   breakdowns for live badges
//!
//! Everything except the director is a pure function of its inputs and
//! safe to call from many threads at once.

pub mod affinity;
pub mod analysis;
pub mod calculator;
pub mod director;
mod rules;
pub mod violation;
pub mod weights;

pub use affinity::{relationship_contribution, AffinityGraph, AffinityScorer, AVOID_PENALTY_MULTIPLIER};
pub use analysis::{ConstraintPenalty, ScoreExplanation, ViolationIndex};
pub use calculator::ScoreCalculator;
pub use director::{Location, SeatingDirector};
pub use violation::{AccessibilityPredicate, Violation, ViolationEvaluator};
pub use weights::PenaltyWeights;
