//! Composite termination.

use super::{Termination, TerminationReason};
use crate::scope::SolverScope;

/// Stops when any child stops; reports the first child's reason in order.
#[derive(Debug, Default)]
pub struct OrTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl OrTermination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Termination + 'static>(mut self, termination: T) -> Self {
        self.terminations.push(Box::new(termination));
        self
    }

    pub fn push(&mut self, termination: Box<dyn Termination>) {
        self.terminations.push(termination);
    }

    pub fn len(&self) -> usize {
        self.terminations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminations.is_empty()
    }
}

impl Termination for OrTermination {
    fn check(&self, solver_scope: &SolverScope) -> Option<TerminationReason> {
        self.terminations.iter().find_map(|t| t.check(solver_scope))
    }
}
