//! Optimization budget: how long a run may search.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use seatplan_config::TerminationConfig;

use crate::termination::{
    ExternalTermination, OrTermination, StepCountTermination, TimeTermination,
    UnimprovedStepCountTermination,
};

/// Caller-supplied ceiling on an optimizer run.
///
/// Any limit may be unset. The default suits interactive use: a couple of
/// seconds at most, fewer when the search stagnates.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use seatplan_solver::OptimizationBudget;
///
/// let budget = OptimizationBudget::unbounded()
///     .with_max_iterations(10_000)
///     .with_time_limit(Duration::from_millis(500));
///
/// assert_eq!(budget.max_iterations, Some(10_000));
/// assert_eq!(budget.stagnation_window, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizationBudget {
    pub max_iterations: Option<u64>,
    pub time_limit: Option<Duration>,
    /// Stop after this many iterations without a new best.
    pub stagnation_window: Option<u64>,
}

impl OptimizationBudget {
    pub const DEFAULT_MAX_ITERATIONS: u64 = 200_000;
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(2);
    pub const DEFAULT_STAGNATION_WINDOW: u64 = 20_000;

    /// No limits at all: the run stops only on cancellation or when no move
    /// is possible.
    pub const fn unbounded() -> Self {
        Self {
            max_iterations: None,
            time_limit: None,
            stagnation_window: None,
        }
    }

    /// Reads the `[termination]` section; falls back to the defaults when it
    /// sets no limit.
    pub fn from_config(config: &TerminationConfig) -> Self {
        let budget = Self {
            max_iterations: config.step_count_limit,
            time_limit: config.time_limit(),
            stagnation_window: config.unimproved_step_count_limit,
        };
        if budget.is_unbounded() {
            Self::default()
        } else {
            budget
        }
    }

    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_stagnation_window(mut self, window: u64) -> Self {
        self.stagnation_window = Some(window);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_iterations.is_none() && self.time_limit.is_none() && self.stagnation_window.is_none()
    }

    /// Builds the termination for a run. Cancellation is checked first so it
    /// wins when several limits trip on the same iteration.
    pub fn termination(&self, cancel: Option<Arc<AtomicBool>>) -> OrTermination {
        let mut termination = OrTermination::new();
        if let Some(flag) = cancel {
            termination.push(Box::new(ExternalTermination::new(flag)));
        }
        if let Some(limit) = self.max_iterations {
            termination.push(Box::new(StepCountTermination::new(limit)));
        }
        if let Some(limit) = self.time_limit {
            termination.push(Box::new(TimeTermination::new(limit)));
        }
        if let Some(window) = self.stagnation_window {
            termination.push(Box::new(UnimprovedStepCountTermination::new(window)));
        }
        termination
    }
}

impl Default for OptimizationBudget {
    fn default() -> Self {
        Self {
            max_iterations: Some(Self::DEFAULT_MAX_ITERATIONS),
            time_limit: Some(Self::DEFAULT_TIME_LIMIT),
            stagnation_window: Some(Self::DEFAULT_STAGNATION_WINDOW),
        }
    }
}
