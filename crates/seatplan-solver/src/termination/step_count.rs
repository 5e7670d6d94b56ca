//! Step count termination.

use super::{Termination, TerminationReason};
use crate::scope::SolverScope;

/// Stops after a fixed number of search iterations.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn check(&self, solver_scope: &SolverScope) -> Option<TerminationReason> {
        (solver_scope.total_step_count() >= self.limit).then_some(TerminationReason::StepLimit)
    }
}
