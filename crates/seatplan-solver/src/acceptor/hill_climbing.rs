//! Hill climbing acceptor.

use rand_chacha::ChaCha8Rng;

use super::Acceptor;

/// Hill climbing acceptor - accepts only improving moves.
///
/// Gets stuck in local optima; useful as a fast polish or for tests.
///
/// # Example
///
/// ```
/// use seatplan_solver::acceptor::HillClimbingAcceptor;
///
/// let acceptor = HillClimbingAcceptor::new();
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Acceptor for HillClimbingAcceptor {
    fn is_accepted(&mut self, last_step_score: f64, move_score: f64, _rng: &mut ChaCha8Rng) -> bool {
        move_score > last_step_score
    }
}
