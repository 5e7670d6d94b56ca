//! Configuration system for seatplan.
//!
//! Load engine configuration from TOML or YAML to control termination,
//! acceptance, penalty weights and the "near front" rule without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use seatplan_config::{AcceptorConfig, EngineConfig};
//! use std::time::Duration;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     millis_spent_limit = 1500
//!     unimproved_step_count_limit = 2000
//!
//!     [acceptor]
//!     type = "simulated_annealing"
//!     starting_temperature = 25.0
//!     decay_rate = 0.999
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
//! assert!(matches!(config.acceptor, AcceptorConfig::SimulatedAnnealing(_)));
//! ```
//!
//! Use default config when the file is missing:
//!
//! ```
//! use seatplan_config::EngineConfig;
//!
//! let config = EngineConfig::load("seatplan.toml").unwrap_or_default();
//! assert_eq!(config.seed(), seatplan_config::DEFAULT_RANDOM_SEED);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when neither the caller nor the configuration supplies one.
pub const DEFAULT_RANDOM_SEED: u64 = 0x5EA7_91A4;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Random seed for reproducible optimizer runs.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of independent seeds to run in parallel.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Termination configuration.
    #[serde(default)]
    pub termination: TerminationConfig,

    /// Move acceptance strategy.
    #[serde(default)]
    pub acceptor: AcceptorConfig,

    /// Penalty and affinity weights.
    #[serde(default)]
    pub weights: WeightsConfig,

    /// "Near front" constraint settings.
    #[serde(default)]
    pub near_front: NearFrontConfig,
}

impl EngineConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails [`EngineConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if let AcceptorConfig::SimulatedAnnealing(sa) = &self.acceptor {
            if let Some(decay) = sa.decay_rate {
                if !(decay > 0.0 && decay <= 1.0) {
                    return Err(ConfigError::Invalid(format!(
                        "decay_rate must be in (0, 1], got {decay}"
                    )));
                }
            }
            if let Some(temp) = sa.starting_temperature {
                if temp < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "starting_temperature must not be negative, got {temp}"
                    )));
                }
            }
        }
        if let AcceptorConfig::LateAcceptance(la) = &self.acceptor {
            if la.late_acceptance_size == Some(0) {
                return Err(ConfigError::Invalid(
                    "late_acceptance_size must be at least 1".to_string(),
                ));
            }
        }
        if let MoveThreadCount::Count(0) = self.move_thread_count {
            return Err(ConfigError::Invalid(
                "move_thread_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the termination time limit in milliseconds.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination.millis_spent_limit = Some(millis);
        self
    }

    /// Sets the step limit.
    pub fn with_step_count_limit(mut self, steps: u64) -> Self {
        self.termination.step_count_limit = Some(steps);
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the acceptor.
    pub fn with_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.acceptor = acceptor;
        self
    }

    /// Returns the configured seed or [`DEFAULT_RANDOM_SEED`].
    pub fn seed(&self) -> u64 {
        self.random_seed.unwrap_or(DEFAULT_RANDOM_SEED)
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.time_limit()
    }
}

/// How many independent optimizer runs to fan out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// One run per available core.
    Auto,

    /// A single run.
    #[default]
    None,

    /// Specific number of runs.
    Count(usize),
}

impl MoveThreadCount {
    /// Resolves to a concrete run count given the number of available cores.
    pub fn resolve(&self, available: usize) -> usize {
        match self {
            MoveThreadCount::Auto => available.max(1),
            MoveThreadCount::None => 1,
            MoveThreadCount::Count(n) => (*n).max(1),
        }
    }
}

/// Termination configuration.
///
/// Every limit is optional; the first one reached ends the run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend optimizing.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend optimizing (added to seconds).
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of search iterations.
    pub step_count_limit: Option<u64>,

    /// Iterations without a new best score before giving up.
    pub unimproved_step_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        // Saturates rather than overflowing on huge limits.
        let millis = self
            .seconds_spent_limit
            .unwrap_or(0)
            .saturating_mul(1000)
            .saturating_add(self.millis_spent_limit.unwrap_or(0));
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Acceptor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Only accept strictly improving moves.
    HillClimbing,

    /// Accept worsening moves with a probability that decays over the run.
    SimulatedAnnealing(SimulatedAnnealingConfig),

    /// Accept moves no worse than the score a fixed number of steps ago.
    LateAcceptance(LateAcceptanceConfig),
}

impl Default for AcceptorConfig {
    fn default() -> Self {
        AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig::default())
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    /// Starting temperature, in combined-score units.
    pub starting_temperature: Option<f64>,

    /// Multiplicative temperature decay per step.
    pub decay_rate: Option<f64>,
}

/// Late acceptance configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LateAcceptanceConfig {
    /// Size of late acceptance list.
    pub late_acceptance_size: Option<usize>,
}

/// Penalty weights per constraint priority, and the avoid multiplier.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WeightsConfig {
    pub required: f64,
    pub preferred: f64,
    pub optional: f64,
    pub avoid_multiplier: f64,
}

impl WeightsConfig {
    pub const DEFAULT_REQUIRED: f64 = 1000.0;
    pub const DEFAULT_PREFERRED: f64 = 100.0;
    pub const DEFAULT_OPTIONAL: f64 = 10.0;
    pub const DEFAULT_AVOID_MULTIPLIER: f64 = 2.0;

    /// Required must be at least ten times preferred, preferred must exceed
    /// optional, optional must be positive, and the avoid multiplier must be
    /// at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.optional <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "optional weight must be positive, got {}",
                self.optional
            )));
        }
        if self.preferred <= self.optional {
            return Err(ConfigError::Invalid(format!(
                "preferred weight {} must exceed optional weight {}",
                self.preferred, self.optional
            )));
        }
        if self.required < self.preferred * 10.0 {
            return Err(ConfigError::Invalid(format!(
                "required weight {} must be at least 10x preferred weight {}",
                self.required, self.preferred
            )));
        }
        if self.avoid_multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "avoid_multiplier must be at least 1, got {}",
                self.avoid_multiplier
            )));
        }
        Ok(())
    }
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            required: Self::DEFAULT_REQUIRED,
            preferred: Self::DEFAULT_PREFERRED,
            optional: Self::DEFAULT_OPTIONAL,
            avoid_multiplier: Self::DEFAULT_AVOID_MULTIPLIER,
        }
    }
}

/// Settings for the "near front" constraint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NearFrontConfig {
    /// How many tables closest to the front anchor count as "front".
    pub table_count: usize,
}

impl NearFrontConfig {
    pub const DEFAULT_TABLE_COUNT: usize = 2;
}

impl Default for NearFrontConfig {
    fn default() -> Self {
        Self {
            table_count: Self::DEFAULT_TABLE_COUNT,
        }
    }
}
