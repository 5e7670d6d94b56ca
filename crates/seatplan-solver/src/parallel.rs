//! Independent optimizer runs fanned out over rayon.

use rayon::prelude::*;
use tracing::info;

use seatplan_core::{Assignment, SeatingProblem};

use crate::optimizer::{OptimizationResult, Optimizer};

/// Runs `optimizer` once per seed in parallel and keeps the best result.
///
/// Equal combined scores go to the lowest seed, so the outcome does not
/// depend on thread scheduling. Returns `None` only when
/// `seeds` is empty.
pub fn optimize_parallel(
    optimizer: &Optimizer,
    problem: &SeatingProblem,
    initial: &Assignment,
    seeds: &[u64],
) -> Option<OptimizationResult> {
    let results: Vec<OptimizationResult> = seeds
        .par_iter()
        .map(|&seed| optimizer.clone().with_seed(seed).optimize(problem, initial))
        .collect();

    let best = results.into_iter().reduce(|best, candidate| {
        let (c, b) = (candidate.score.combined(), best.score.combined());
        if c > b || (c == b && candidate.seed < best.seed) {
            candidate
        } else {
            best
        }
    })?;

    info!(
        event = "parallel_end",
        runs = seeds.len(),
        best_seed = best.seed,
        score = %best.score,
    );
    Some(best)
}

impl Optimizer {
    /// Runs as many independent seeds as `move_thread_count` resolves to.
    ///
    /// Seeds are consecutive from the configured seed. With a single run
    /// this is the same as [`optimize`](Self::optimize).
    pub fn optimize_multi(
        &self,
        problem: &SeatingProblem,
        initial: &Assignment,
    ) -> OptimizationResult {
        let runs = self
            .move_thread_count()
            .resolve(rayon::current_num_threads());
        if runs <= 1 {
            return self.optimize(problem, initial);
        }
        let seeds: Vec<u64> = (0..runs as u64)
            .map(|i| self.seed().wrapping_add(i))
            .collect();
        optimize_parallel(self, problem, initial, &seeds)
            .unwrap_or_else(|| self.optimize(problem, initial))
    }
}
