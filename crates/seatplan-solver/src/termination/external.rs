//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{Termination, TerminationReason};
use crate::scope::SolverScope;

/// Stops when a shared flag is raised, from any thread.
///
/// The scope's own terminate-early flag is honored as well, so a flag set
/// either way cancels the run.
#[derive(Debug, Clone, Default)]
pub struct ExternalTermination {
    flag: Arc<AtomicBool>,
}

impl ExternalTermination {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    pub fn terminate(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl Termination for ExternalTermination {
    fn check(&self, solver_scope: &SolverScope) -> Option<TerminationReason> {
        (self.flag.load(Ordering::SeqCst) || solver_scope.is_terminate_early())
            .then_some(TerminationReason::Cancelled)
    }
}
