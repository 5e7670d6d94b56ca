//! Background optimizer jobs.
//!
//! [`SolverManager`] runs each job on its own thread and hands back an
//! [`OptimizationHandle`] for progress, cancellation and the final result.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use seatplan_core::{Assignment, Result, SeatingError, SeatingProblem};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::optimizer::{BestSolutionEvent, OptimizationResult, Optimizer};

/// Status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    NotSolving,
    Solving,
}

impl SolverStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::NotSolving => "NOT_SOLVING",
            SolverStatus::Solving => "SOLVING",
        }
    }
}

struct SolveJob {
    status: SolverStatus,
    terminate_flag: Arc<AtomicBool>,
    best: Option<BestSolutionEvent>,
}

type Jobs = Arc<Mutex<HashMap<String, SolveJob>>>;

fn lock(jobs: &Mutex<HashMap<String, SolveJob>>) -> MutexGuard<'_, HashMap<String, SolveJob>> {
    jobs.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs optimizer jobs off the caller's thread.
///
/// Each job gets its own cancellation flag, so cancelling one never stops
/// another.
///
/// # Examples
///
/// ```
/// use seatplan_core::{Assignment, Guest, SeatingProblem, Table};
/// use seatplan_solver::{OptimizationBudget, Optimizer, SolverManager};
///
/// let manager = SolverManager::new(
///     Optimizer::new().with_budget(OptimizationBudget::unbounded().with_max_iterations(500)),
/// );
/// let problem = SeatingProblem::new(
///     vec![Guest::new("a", "Ann", "Lee"), Guest::new("b", "Ben", "Lee")],
///     vec![Table::new("t1", 2)],
/// );
///
/// let handle = manager.solve("reception", problem, Assignment::new());
/// let result = handle.blocking_result().unwrap();
/// assert_eq!(result.assignment.len(), 2);
/// ```
pub struct SolverManager {
    optimizer: Optimizer,
    jobs: Jobs,
}

impl Default for SolverManager {
    fn default() -> Self {
        Self::new(Optimizer::new())
    }
}

impl SolverManager {
    pub fn new(optimizer: Optimizer) -> Self {
        Self {
            optimizer,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    /// Starts optimizing on a new thread.
    ///
    /// A job already running under `job_id` is cancelled and replaced.
    pub fn solve(
        &self,
        job_id: impl Into<String>,
        problem: SeatingProblem,
        initial: Assignment,
    ) -> OptimizationHandle {
        let job_id = job_id.into();
        let terminate_flag = Arc::new(AtomicBool::new(false));

        {
            let mut jobs = lock(&self.jobs);
            let previous = jobs.insert(
                job_id.clone(),
                SolveJob {
                    status: SolverStatus::Solving,
                    terminate_flag: terminate_flag.clone(),
                    best: None,
                },
            );
            if let Some(previous) = previous {
                previous.terminate_flag.store(true, Ordering::SeqCst);
                debug!(event = "job_replaced", job_id = %job_id);
            }
        }

        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();
        let (listener_tx, mut listener_rx) = mpsc::unbounded_channel::<BestSolutionEvent>();

        let optimizer = self.optimizer.clone();
        let jobs = Arc::clone(&self.jobs);
        let flag = terminate_flag.clone();
        let id = job_id.clone();

        info!(event = "job_start", job_id = %job_id);
        let thread = std::thread::spawn(move || {
            // Forward bests to the caller and remember the latest per job.
            let forward_jobs = Arc::clone(&jobs);
            let forward_id = id.clone();
            let forwarder = std::thread::spawn(move || {
                while let Some(event) = listener_rx.blocking_recv() {
                    if let Some(job) = lock(&forward_jobs).get_mut(&forward_id) {
                        job.best = Some(event.clone());
                    }
                    let _ = progress_tx.send(event);
                }
            });

            let result = optimizer.optimize_with_listener(
                &problem,
                &initial,
                Some(flag.clone()),
                Some(listener_tx),
            );
            let _ = forwarder.join();

            if let Some(job) = lock(&jobs).get_mut(&id) {
                if Arc::ptr_eq(&job.terminate_flag, &flag) {
                    job.status = SolverStatus::NotSolving;
                }
            }
            info!(
                event = "job_end",
                job_id = %id,
                score = %result.score,
                termination = %result.termination(),
            );
            let _ = result_tx.send(result);
        });

        OptimizationHandle {
            job_id,
            terminate_flag,
            progress: progress_rx,
            result: result_rx,
            thread: Some(thread),
        }
    }

    pub fn get_solver_status(&self, job_id: &str) -> SolverStatus {
        lock(&self.jobs)
            .get(job_id)
            .map(|job| job.status)
            .unwrap_or(SolverStatus::NotSolving)
    }

    /// Latest best assignment reported by a job.
    pub fn get_best(&self, job_id: &str) -> Option<BestSolutionEvent> {
        lock(&self.jobs).get(job_id).and_then(|job| job.best.clone())
    }

    /// Requests early termination of a job.
    ///
    /// Returns `true` if the job was found.
    pub fn terminate_early(&self, job_id: &str) -> bool {
        match lock(&self.jobs).get(job_id) {
            Some(job) => {
                job.terminate_flag.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Forgets a job, cancelling it if still running.
    pub fn remove_job(&self, job_id: &str) -> bool {
        match lock(&self.jobs).remove(job_id) {
            Some(job) => {
                job.terminate_flag.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    pub fn list_jobs(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.jobs).keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Caller's side of a running job.
///
/// Dropping the handle does not stop the job; call
/// [`cancel`](Self::cancel) for that.
#[derive(Debug)]
pub struct OptimizationHandle {
    job_id: String,
    terminate_flag: Arc<AtomicBool>,
    progress: mpsc::UnboundedReceiver<BestSolutionEvent>,
    result: oneshot::Receiver<OptimizationResult>,
    thread: Option<JoinHandle<()>>,
}

impl OptimizationHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Asks the job to stop at its next iteration.
    pub fn cancel(&self) {
        self.terminate_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.terminate_flag.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Next buffered best, without waiting.
    pub fn try_progress(&mut self) -> Option<BestSolutionEvent> {
        self.progress.try_recv().ok()
    }

    /// Waits for the next best; `None` once the job has finished and every
    /// event was read.
    pub async fn next_progress(&mut self) -> Option<BestSolutionEvent> {
        self.progress.recv().await
    }

    /// Blocks until the job finishes.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`result`](Self::result) there.
    pub fn blocking_result(mut self) -> Result<OptimizationResult> {
        let result = self
            .result
            .blocking_recv()
            .map_err(|_| SeatingError::OptimizationCancelled);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        result
    }

    /// Waits for the job to finish.
    pub async fn result(self) -> Result<OptimizationResult> {
        self.result
            .await
            .map_err(|_| SeatingError::OptimizationCancelled)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use seatplan_test::{avoid, guests, tables, wedding};

    use super::*;
    use crate::budget::OptimizationBudget;
    use crate::termination::TerminationReason;

    fn bounded() -> SolverManager {
        SolverManager::new(
            Optimizer::new().with_budget(OptimizationBudget::unbounded().with_max_iterations(3_000)),
        )
    }

    #[test]
    fn test_job_runs_to_completion() {
        let manager = bounded();
        let handle = manager.solve("w", wedding(), Assignment::new());
        assert_eq!(handle.job_id(), "w");

        let result = handle.blocking_result().unwrap();

        assert_eq!(result.termination(), TerminationReason::StepLimit);
        assert_eq!(manager.get_solver_status("w"), SolverStatus::NotSolving);
        let best = manager.get_best("w").unwrap();
        assert!((best.score.combined() - result.score.combined()).abs() < 1e-6);
    }

    #[test]
    fn test_best_matches_result_when_start_wins() {
        let problem = SeatingProblem::new(guests(2), tables(1, 2))
            .with_relationships(vec![avoid("g0", "g1", 5)]);
        let manager = bounded();
        let handle = manager.solve("feud", problem, Assignment::new());

        let result = handle.blocking_result().unwrap();

        assert!(result.assignment.is_empty());
        let best = manager.get_best("feud").unwrap();
        assert_eq!(best.assignment, result.assignment);
        assert_eq!(best.score, result.score);
    }

    #[test]
    fn test_cancel_stops_unbounded_job() {
        let manager = SolverManager::new(
            Optimizer::new().with_budget(OptimizationBudget::unbounded()),
        );
        let handle = manager.solve("forever", wedding(), Assignment::new());
        std::thread::sleep(Duration::from_millis(20));
        handle.cancel();

        let result = handle.blocking_result().unwrap();
        assert!(result.is_cancelled());
        assert!(result
            .diagnostics
            .contains(&SeatingError::OptimizationCancelled));
        assert_eq!(result.assignment.len(), 18);
    }

    #[test]
    fn test_terminate_early_by_id() {
        let manager = SolverManager::new(
            Optimizer::new().with_budget(OptimizationBudget::unbounded()),
        );
        let handle = manager.solve("a", wedding(), Assignment::new());

        assert!(manager.terminate_early("a"));
        assert!(!manager.terminate_early("missing"));
        assert!(handle.blocking_result().unwrap().is_cancelled());
    }

    #[test]
    fn test_jobs_are_listed_and_removed() {
        let manager = bounded();
        let a = manager.solve("a", wedding(), Assignment::new());
        let b = manager.solve("b", wedding(), Assignment::new());
        assert_eq!(manager.list_jobs(), vec!["a".to_string(), "b".to_string()]);

        a.blocking_result().unwrap();
        b.blocking_result().unwrap();
        assert!(manager.remove_job("a"));
        assert!(!manager.remove_job("a"));
        assert_eq!(manager.list_jobs(), vec!["b".to_string()]);
        assert_eq!(manager.get_solver_status("a"), SolverStatus::NotSolving);
    }

    #[test]
    fn test_progress_is_buffered_after_finish() {
        let manager = bounded();
        let mut handle = manager.solve("p", wedding(), Assignment::new());
        while !handle.is_finished() {
            std::thread::sleep(Duration::from_millis(5));
        }

        let first = handle.try_progress().unwrap();
        assert_eq!(first.step, 0);
        while let Some(next) = handle.try_progress() {
            assert!(next.score.combined() > first.score.combined());
        }
    }

    #[tokio::test]
    async fn test_async_result() {
        let manager = bounded();
        let mut handle = manager.solve("async", wedding(), Assignment::new());

        let first = handle.next_progress().await.unwrap();
        assert_eq!(first.step, 0);

        let result = handle.result().await.unwrap();
        assert!(result.score.combined() >= first.score.combined());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(SolverStatus::Solving.as_str(), "SOLVING");
        assert_eq!(SolverStatus::NotSolving.as_str(), "NOT_SOLVING");
    }
}
