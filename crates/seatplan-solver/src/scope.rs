//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use seatplan_core::{Assignment, SeatingScore};
use seatplan_scoring::SeatingDirector;

use crate::stats::SolverStats;

/// State of one optimizer run: working director, best assignment seen,
/// seeded random source and counters.
///
/// The random source is seeded explicitly, never from the OS, so a run is
/// reproducible from its seed.
pub struct SolverScope {
    director: SeatingDirector,
    best_assignment: Assignment,
    best_score: SeatingScore,
    rng: ChaCha8Rng,
    seed: u64,
    start_time: Option<Instant>,
    total_step_count: u64,
    last_improvement_step: u64,
    stats: SolverStats,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl SolverScope {
    /// Creates a scope whose best assignment is the director's current state.
    pub fn with_seed(director: SeatingDirector, seed: u64) -> Self {
        let best_assignment = director.to_assignment();
        let best_score = director.score();
        Self {
            director,
            best_assignment,
            best_score,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            start_time: None,
            total_step_count: 0,
            last_improvement_step: 0,
            stats: SolverStats::default(),
            terminate_early_flag: None,
        }
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
        self.last_improvement_step = 0;
        self.stats.start();
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn director(&self) -> &SeatingDirector {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut SeatingDirector {
        &mut self.director
    }

    /// Director and random source together, for move selection.
    pub fn director_and_rng(&mut self) -> (&mut SeatingDirector, &mut ChaCha8Rng) {
        (&mut self.director, &mut self.rng)
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SolverStats {
        &mut self.stats
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    pub fn steps_since_improvement(&self) -> u64 {
        self.total_step_count - self.last_improvement_step
    }

    pub fn best_score(&self) -> SeatingScore {
        self.best_score
    }

    pub fn best_assignment(&self) -> &Assignment {
        &self.best_assignment
    }

    /// Records the working state as the new best if it scores strictly higher.
    ///
    /// Returns `true` when the best changed.
    pub fn update_best_solution(&mut self) -> bool {
        let current = self.director.score();
        if current.combined() <= self.best_score.combined() {
            return false;
        }
        self.best_assignment = self.director.to_assignment();
        self.best_score = current;
        self.last_improvement_step = self.total_step_count;
        self.stats.record_improvement();
        true
    }

    pub fn take_best(self) -> (Assignment, SolverStats) {
        (self.best_assignment, self.stats)
    }
}
