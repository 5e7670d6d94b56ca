//! Optimizer statistics.
//!
//! [`SolverStats`] counts while a run is in flight; [`OptimizationStatistics`]
//! is the frozen summary returned with the result.

use std::time::{Duration, Instant};

use crate::termination::TerminationReason;

/// Running counters for one optimizer run.
///
/// # Example
///
/// ```
/// use seatplan_solver::stats::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.start();
/// stats.record_move(true);
/// stats.record_move(false);
/// stats.record_improvement();
///
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.moves_accepted, 1);
/// assert_eq!(stats.improvements, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    start_time: Option<Instant>,
    /// Moves tried, accepted or not.
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    /// Times a new best assignment was found.
    pub improvements: u64,
}

impl SolverStats {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn record_improvement(&mut self) {
        self.improvements += 1;
    }

    pub fn moves_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.moves_evaluated as f64 / secs
        } else {
            0.0
        }
    }

    /// Freezes the counters into a summary.
    pub fn finish(&self, steps: u64, termination: TerminationReason) -> OptimizationStatistics {
        OptimizationStatistics {
            steps,
            moves_evaluated: self.moves_evaluated,
            moves_accepted: self.moves_accepted,
            improvements: self.improvements,
            elapsed: self.elapsed(),
            termination,
        }
    }
}

/// Summary of a finished optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationStatistics {
    /// Search iterations run.
    pub steps: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    pub improvements: u64,
    pub elapsed: Duration,
    pub termination: TerminationReason,
}

impl OptimizationStatistics {
    /// Statistics for a run that never searched.
    pub fn empty(termination: TerminationReason) -> Self {
        Self {
            steps: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
            improvements: 0,
            elapsed: Duration::ZERO,
            termination,
        }
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}
