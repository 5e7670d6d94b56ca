//! Simulated annealing acceptor.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::Acceptor;

/// Simulated annealing acceptor - accepts worse moves with a probability
/// that shrinks as the run cools.
///
/// A move that does not lose score is always accepted. A move that loses
/// `delta` is accepted with probability `exp(-delta / T)`, where the
/// temperature `T` starts at `starting_temperature` and is multiplied by
/// `decay_rate` after every iteration: permissive early, strict late.
///
/// # Example
///
/// ```
/// use seatplan_solver::acceptor::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(50.0, 0.9995);
/// assert_eq!(acceptor.temperature(), 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    current_temperature: f64,
    decay_rate: f64,
}

impl SimulatedAnnealingAcceptor {
    /// Starting temperature, in combined-score units.
    pub const DEFAULT_STARTING_TEMPERATURE: f64 = 50.0;
    /// Multiplicative decay per iteration.
    pub const DEFAULT_DECAY_RATE: f64 = 0.9995;

    /// # Arguments
    /// * `starting_temperature` - Initial temperature (higher = more exploration)
    /// * `decay_rate` - Multiplicative decay per iteration, in `(0, 1]`
    pub fn new(starting_temperature: f64, decay_rate: f64) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature,
            decay_rate,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current_temperature
    }
}

impl Default for SimulatedAnnealingAcceptor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STARTING_TEMPERATURE, Self::DEFAULT_DECAY_RATE)
    }
}

impl Acceptor for SimulatedAnnealingAcceptor {
    fn is_accepted(&mut self, last_step_score: f64, move_score: f64, rng: &mut ChaCha8Rng) -> bool {
        if move_score >= last_step_score {
            return true;
        }
        if self.current_temperature <= f64::MIN_POSITIVE {
            return false;
        }
        let probability = ((move_score - last_step_score) / self.current_temperature).exp();
        rng.random::<f64>() < probability
    }

    fn phase_started(&mut self, _initial_score: f64) {
        self.current_temperature = self.starting_temperature;
    }

    fn step_ended(&mut self, _step_score: f64) {
        self.current_temperature *= self.decay_rate;
    }
}
