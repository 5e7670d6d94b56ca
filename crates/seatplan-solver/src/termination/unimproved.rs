//! Stagnation cutoff.

use super::{Termination, TerminationReason};
use crate::scope::SolverScope;

/// Stops when `limit` iterations pass without a new best assignment.
#[derive(Debug, Clone)]
pub struct UnimprovedStepCountTermination {
    limit: u64,
}

impl UnimprovedStepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for UnimprovedStepCountTermination {
    fn check(&self, solver_scope: &SolverScope) -> Option<TerminationReason> {
        (solver_scope.steps_since_improvement() >= self.limit)
            .then_some(TerminationReason::Stagnation)
    }
}
