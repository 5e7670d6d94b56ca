//! seatplan - seating-chart assignment engine
//!
//! Seats guests at tables so that related guests sit together, feuding
//! guests sit apart, and declared seating rules hold where possible.
//!
//! # Example
//!
//! ```rust
//! use seatplan::prelude::*;
//!
//! let problem = SeatingProblem::new(
//!     vec![
//!         Guest::new("ann", "Ann", "Lee").with_group("Family"),
//!         Guest::new("ben", "Ben", "Lee").with_group("Family"),
//!         Guest::new("cal", "Cal", "Ray"),
//!     ],
//!     vec![Table::new("t1", 2), Table::new("t2", 2)],
//! )
//! .with_relationships(vec![Relationship::new("ann", "ben", RelationshipType::Family, 4)]);
//!
//! let preview = distribute_tables(&problem.guests, &problem.tables, DistributionStrategy::Groups);
//! assert_eq!(preview.table_of(&"ann".into()), preview.table_of(&"ben".into()));
//!
//! let result = Optimizer::new()
//!     .with_budget(OptimizationBudget::unbounded().with_max_iterations(1_000))
//!     .optimize(&problem, &preview.to_assignment(&problem.tables));
//! assert_eq!(result.score, SeatingScore::of(4.0, 0.0));
//! ```

// Domain model
pub use seatplan_core::{
    validate_constraint, validate_problem, Assignment, ConstraintId, ConstraintType, Guest,
    GuestId, Position, Priority, Relationship, RelationshipType, Result, Seat, SeatingConstraint,
    SeatingError, SeatingProblem, SeatingScore, Table, TableId, TableShape,
};

// Configuration
pub use seatplan_config::{ConfigError, EngineConfig};

// Scoring
pub use seatplan_scoring::violation::evaluate;
pub use seatplan_scoring::{
    AffinityScorer, ScoreCalculator, ScoreExplanation, Violation, ViolationEvaluator,
    ViolationIndex, AVOID_PENALTY_MULTIPLIER,
};

// Solving
pub use seatplan_solver::{
    distribute, distribute_tables, optimize, optimize_parallel, BestSolutionEvent, Distribution,
    DistributionStrategy, OptimizationBudget, OptimizationHandle, OptimizationResult,
    OptimizationStatistics, Optimizer, SeatingSession, SnapshotHandle, SnapshotManager,
    SolverManager, SolverStatus, TerminationReason,
};

#[cfg(feature = "console")]
pub mod console;

/// Lower-level building blocks for custom search setups.
pub mod engine {
    pub use seatplan_scoring::{Location, PenaltyWeights, SeatingDirector};
    pub use seatplan_solver::{
        Acceptor, AcceptorBuilder, HillClimbingAcceptor, LateAcceptanceAcceptor, MoveSelector,
        SeatMove, SimulatedAnnealingAcceptor, SolverScope, Termination,
    };
}

pub mod prelude {
    pub use super::{
        Assignment, ConstraintType, Guest, Priority, Relationship, RelationshipType, Seat,
        SeatingConstraint, SeatingError, SeatingProblem, SeatingScore, Table,
    };
    pub use super::{distribute_tables, DistributionStrategy, OptimizationBudget, Optimizer};
    pub use super::{EngineConfig, ScoreCalculator, SeatingSession, ViolationEvaluator};
}
