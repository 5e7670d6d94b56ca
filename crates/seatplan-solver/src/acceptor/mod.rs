//! Acceptors for local search move acceptance.
//!
//! Acceptors decide whether a move should be kept by comparing the combined
//! score it produces with the score of the last accepted step.

mod hill_climbing;
mod late_acceptance;
mod simulated_annealing;

use std::fmt::Debug;

use rand_chacha::ChaCha8Rng;

pub use hill_climbing::HillClimbingAcceptor;
pub use late_acceptance::LateAcceptanceAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;

/// Trait for accepting or rejecting moves in local search.
///
/// Scores are combined fitness values (`affinity - penalty`); higher is
/// better. Randomized acceptors draw from the run's seeded generator so
/// acceptance stays reproducible.
pub trait Acceptor: Send + Debug {
    /// Returns true if a move resulting in `move_score` should be accepted,
    /// given the previous step's score.
    fn is_accepted(&mut self, last_step_score: f64, move_score: f64, rng: &mut ChaCha8Rng) -> bool;

    /// Called when a run starts.
    fn phase_started(&mut self, _initial_score: f64) {}

    /// Called after every iteration with the score of the current step.
    fn step_ended(&mut self, _step_score: f64) {}
}
