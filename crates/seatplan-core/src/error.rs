//! Error types for seatplan

use thiserror::Error;

use crate::domain::{ConstraintId, TableId};

/// Errors and recoverable conditions reported by the seating engine.
///
/// None of these represent engine bugs. The optimizer collects the ones it
/// recovers from into its result instead of returning them as `Err`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeatingError {
    /// A constraint with an empty guest set, or one that references a guest
    /// or table that is not part of the supplied problem.
    #[error("Invalid constraint {constraint_id}: {reason}")]
    InvalidConstraint {
        constraint_id: ConstraintId,
        reason: String,
    },

    /// An assignment seats more guests at a table than it has room for.
    #[error("Table {table_id} seats {seated} guests but has capacity {capacity}")]
    CapacityExceededInput {
        table_id: TableId,
        seated: usize,
        capacity: u32,
    },

    /// The cooperative cancellation flag was observed during a search.
    #[error("Optimization was cancelled")]
    OptimizationCancelled,

    /// Malformed domain input (zero capacity, strength out of range, duplicate ids).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for seatplan operations
pub type Result<T> = std::result::Result<T, SeatingError>;
