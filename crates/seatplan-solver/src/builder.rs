//! Builder module for constructing optimizer components from configuration.

use seatplan_config::AcceptorConfig;

use crate::acceptor::{
    Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor,
};

/// Builder for constructing acceptors from configuration.
pub struct AcceptorBuilder;

impl AcceptorBuilder {
    /// Builds an acceptor from configuration, filling unset values with defaults.
    pub fn build(config: &AcceptorConfig) -> Box<dyn Acceptor> {
        match config {
            AcceptorConfig::HillClimbing => Box::new(HillClimbingAcceptor::new()),

            AcceptorConfig::SimulatedAnnealing(sa_config) => {
                let starting_temp = sa_config
                    .starting_temperature
                    .unwrap_or(SimulatedAnnealingAcceptor::DEFAULT_STARTING_TEMPERATURE);
                let decay_rate = sa_config
                    .decay_rate
                    .unwrap_or(SimulatedAnnealingAcceptor::DEFAULT_DECAY_RATE);
                Box::new(SimulatedAnnealingAcceptor::new(starting_temp, decay_rate))
            }

            AcceptorConfig::LateAcceptance(la_config) => {
                let size = la_config
                    .late_acceptance_size
                    .unwrap_or(LateAcceptanceAcceptor::DEFAULT_SIZE);
                Box::new(LateAcceptanceAcceptor::new(size))
            }
        }
    }

    pub fn hill_climbing() -> HillClimbingAcceptor {
        HillClimbingAcceptor::new()
    }

    pub fn simulated_annealing(starting_temp: f64, decay_rate: f64) -> SimulatedAnnealingAcceptor {
        SimulatedAnnealingAcceptor::new(starting_temp, decay_rate)
    }

    pub fn late_acceptance(size: usize) -> LateAcceptanceAcceptor {
        LateAcceptanceAcceptor::new(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use seatplan_config::{LateAcceptanceConfig, SimulatedAnnealingConfig};

    #[test]
    fn test_acceptor_builder_hill_climbing() {
        let mut acceptor = AcceptorBuilder::build(&AcceptorConfig::HillClimbing);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(!acceptor.is_accepted(0.0, 0.0, &mut rng));
        assert!(format!("{acceptor:?}").contains("HillClimbing"));
    }

    #[test]
    fn test_acceptor_builder_simulated_annealing() {
        let config = AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
            starting_temperature: Some(1.5),
            decay_rate: None,
        });
        let acceptor = AcceptorBuilder::build(&config);
        let debug = format!("{acceptor:?}");
        assert!(debug.contains("1.5"));
        assert!(debug.contains("0.9995"));
    }

    #[test]
    fn test_acceptor_builder_late_acceptance() {
        let config = AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
            late_acceptance_size: Some(7),
        });
        let acceptor = AcceptorBuilder::build(&config);
        assert!(format!("{acceptor:?}").contains("late_acceptance_size: 7"));
    }

    #[test]
    fn test_default_config_builds_simulated_annealing() {
        let acceptor = AcceptorBuilder::build(&AcceptorConfig::default());
        assert!(format!("{acceptor:?}").contains("SimulatedAnnealing"));
    }
}
