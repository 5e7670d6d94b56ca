// Penalty weights per constraint priority.

use seatplan_config::WeightsConfig;
use seatplan_core::Priority;

use crate::violation::Violation;

// Penalty charged per unit of violation magnitude, by priority.
//
// Required outweighs preferred by at least an order of magnitude, which in
// turn outweighs optional, so a search resolves hard rules first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyWeights {
    pub required: f64,
    pub preferred: f64,
    pub optional: f64,
}

impl PenaltyWeights {
    pub const fn new(required: f64, preferred: f64, optional: f64) -> Self {
        Self {
            required,
            preferred,
            optional,
        }
    }

    pub fn from_config(config: &WeightsConfig) -> Self {
        Self::new(config.required, config.preferred, config.optional)
    }

    pub fn weight(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Required => self.required,
            Priority::Preferred => self.preferred,
            Priority::Optional => self.optional,
        }
    }

    // Penalty of a single violation.
    pub fn penalty_of(&self, violation: &Violation) -> f64 {
        self.weight(violation.priority) * f64::from(violation.magnitude)
    }

    // Total penalty of a violation list.
    pub fn penalty(&self, violations: &[Violation]) -> f64 {
        violations.iter().map(|v| self.penalty_of(v)).sum()
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self::from_config(&WeightsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_ordered() {
        let weights = PenaltyWeights::default();
        assert!(weights.required >= weights.preferred * 10.0);
        assert!(weights.preferred > weights.optional);
        assert!(weights.optional > 0.0);
    }

    #[test]
    fn test_weight_by_priority() {
        let weights = PenaltyWeights::new(1000.0, 50.0, 5.0);
        assert_eq!(weights.weight(Priority::Required), 1000.0);
        assert_eq!(weights.weight(Priority::Preferred), 50.0);
        assert_eq!(weights.weight(Priority::Optional), 5.0);
    }
}
