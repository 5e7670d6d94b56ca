//! Late acceptance acceptor.

use rand_chacha::ChaCha8Rng;

use super::Acceptor;

/// Late acceptance acceptor - accepts moves that improve on a historical score.
///
/// Keeps a circular buffer of recent step scores and accepts a move that is
/// at least as good as the score from `late_acceptance_size` steps ago.
#[derive(Debug, Clone)]
pub struct LateAcceptanceAcceptor {
    late_acceptance_size: usize,
    score_history: Vec<Option<f64>>,
    current_index: usize,
}

impl LateAcceptanceAcceptor {
    pub const DEFAULT_SIZE: usize = 400;

    /// A size of zero is treated as one.
    pub fn new(late_acceptance_size: usize) -> Self {
        let late_acceptance_size = late_acceptance_size.max(1);
        Self {
            late_acceptance_size,
            score_history: vec![None; late_acceptance_size],
            current_index: 0,
        }
    }
}

impl Default for LateAcceptanceAcceptor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Acceptor for LateAcceptanceAcceptor {
    fn is_accepted(&mut self, last_step_score: f64, move_score: f64, _rng: &mut ChaCha8Rng) -> bool {
        if move_score >= last_step_score {
            return true;
        }
        match self.score_history[self.current_index] {
            Some(late_score) => move_score >= late_score,
            None => false,
        }
    }

    fn phase_started(&mut self, initial_score: f64) {
        self.score_history = vec![Some(initial_score); self.late_acceptance_size];
        self.current_index = 0;
    }

    fn step_ended(&mut self, step_score: f64) {
        self.score_history[self.current_index] = Some(step_score);
        self.current_index = (self.current_index + 1) % self.late_acceptance_size;
    }
}
