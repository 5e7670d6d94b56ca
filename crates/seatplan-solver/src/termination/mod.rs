//! Termination conditions for the optimizer.

mod composite;
mod external;
mod step_count;
mod time;
mod unimproved;

use std::fmt::{self, Debug};

use crate::scope::SolverScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Why an optimizer run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The iteration budget was used up.
    StepLimit,
    /// The wall-clock budget was used up.
    TimeLimit,
    /// No new best within the stagnation window.
    Stagnation,
    /// The cancellation flag was raised.
    Cancelled,
    /// No legal move exists from the current state.
    NoMoves,
    /// Nothing to search: no guests or no seats.
    Empty,
}

impl TerminationReason {
    pub fn label(&self) -> &'static str {
        match self {
            TerminationReason::StepLimit => "step_limit",
            TerminationReason::TimeLimit => "time_limit",
            TerminationReason::Stagnation => "stagnation",
            TerminationReason::Cancelled => "cancelled",
            TerminationReason::NoMoves => "no_moves",
            TerminationReason::Empty => "empty",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trait for determining when to stop searching.
///
/// Checked at the top of every search iteration.
pub trait Termination: Send + Debug {
    /// Returns the reason to stop, or `None` to keep going.
    fn check(&self, solver_scope: &SolverScope) -> Option<TerminationReason>;

    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        self.check(solver_scope).is_some()
    }
}

#[cfg(test)]
mod tests;
