//! The working behavior record a replay mutates.

use pizzapets_data::BehaviorConfig;
use serde::{Deserialize, Serialize};

/// Numeric behavior fields that stages and item effects may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorField {
    EvolutionRate,
    ExcrementRate,
    ExcrementWithin,
    HealthDeclineRate,
    HealthDecrementAmount,
    HealthDecrementInterval,
    HealthDecrementAt,
    DoomsdayDeviceResistant,
}

impl BehaviorField {
    pub const ALL: [BehaviorField; 8] = [
        BehaviorField::EvolutionRate,
        BehaviorField::ExcrementRate,
        BehaviorField::ExcrementWithin,
        BehaviorField::HealthDeclineRate,
        BehaviorField::HealthDecrementAmount,
        BehaviorField::HealthDecrementInterval,
        BehaviorField::HealthDecrementAt,
        BehaviorField::DoomsdayDeviceResistant,
    ];

    /// Exact (case-sensitive) lookup by document key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            BehaviorField::EvolutionRate => "evolution_rate",
            BehaviorField::ExcrementRate => "excrement_rate",
            BehaviorField::ExcrementWithin => "excrement_within",
            BehaviorField::HealthDeclineRate => "health_decline_rate",
            BehaviorField::HealthDecrementAmount => "health_decrement_amount",
            BehaviorField::HealthDecrementInterval => "health_decrement_interval",
            BehaviorField::HealthDecrementAt => "health_decrement_at",
            BehaviorField::DoomsdayDeviceResistant => "doomsday_device_resistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub evolution_rate: f64,
    pub excrement_rate: f64,
    pub excrement_within: f64,
    pub health_decline_rate: f64,
    pub health_decrement_amount: f64,
    pub health_decrement_interval: f64,
    pub health_decrement_at: f64,
    pub doomsday_device_resistant: f64,
    /// Raw per-stage countdown thresholds.
    pub evolution_at: Vec<f64>,
}

impl From<&BehaviorConfig> for Behavior {
    fn from(config: &BehaviorConfig) -> Self {
        Self {
            evolution_rate: config.evolution_rate,
            excrement_rate: config.excrement_rate,
            excrement_within: config.excrement_within,
            health_decline_rate: config.health_decline_rate,
            health_decrement_amount: config.health_decrement_amount,
            health_decrement_interval: config.health_decrement_interval,
            health_decrement_at: config.health_decrement_at,
            doomsday_device_resistant: config.doomsday_device_resistant,
            evolution_at: config.evolution_at.clone(),
        }
    }
}

impl Behavior {
    #[must_use]
    pub fn get(&self, field: BehaviorField) -> f64 {
        match field {
            BehaviorField::EvolutionRate => self.evolution_rate,
            BehaviorField::ExcrementRate => self.excrement_rate,
            BehaviorField::ExcrementWithin => self.excrement_within,
            BehaviorField::HealthDeclineRate => self.health_decline_rate,
            BehaviorField::HealthDecrementAmount => self.health_decrement_amount,
            BehaviorField::HealthDecrementInterval => self.health_decrement_interval,
            BehaviorField::HealthDecrementAt => self.health_decrement_at,
            BehaviorField::DoomsdayDeviceResistant => self.doomsday_device_resistant,
        }
    }

    pub fn set(&mut self, field: BehaviorField, value: f64) {
        let slot = match field {
            BehaviorField::EvolutionRate => &mut self.evolution_rate,
            BehaviorField::ExcrementRate => &mut self.excrement_rate,
            BehaviorField::ExcrementWithin => &mut self.excrement_within,
            BehaviorField::HealthDeclineRate => &mut self.health_decline_rate,
            BehaviorField::HealthDecrementAmount => &mut self.health_decrement_amount,
            BehaviorField::HealthDecrementInterval => &mut self.health_decrement_interval,
            BehaviorField::HealthDecrementAt => &mut self.health_decrement_at,
            BehaviorField::DoomsdayDeviceResistant => &mut self.doomsday_device_resistant,
        };
        *slot = value;
    }

    /// Countdown threshold of a stage; missing entries count as zero.
    #[must_use]
    pub fn evolution_at(&self, stage: usize) -> f64 {
        self.evolution_at.get(stage).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_doomsday_device_resistant(&self) -> bool {
        self.doomsday_device_resistant != 0.0 && !self.doomsday_device_resistant.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys_round_trip() {
        for field in BehaviorField::ALL {
            assert_eq!(BehaviorField::from_key(field.key()), Some(field));
        }
        assert_eq!(BehaviorField::from_key("Evolution_Rate"), None);
    }

    #[test]
    fn test_get_set() {
        let mut behavior = Behavior::from(&BehaviorConfig::default());
        behavior.set(BehaviorField::ExcrementRate, 2.5);
        assert_eq!(behavior.get(BehaviorField::ExcrementRate), 2.5);
        assert!(!behavior.is_doomsday_device_resistant());
        behavior.set(BehaviorField::DoomsdayDeviceResistant, 1.0);
        assert!(behavior.is_doomsday_device_resistant());
    }
}
