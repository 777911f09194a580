//! Closed set of item effects.
//!
//! Effect names in the rules document are free-form strings. They are
//! parsed once, when the rules are compiled, into [`Effect`]. Names the
//! engine does not know become [`Effect::Unknown`] and abort the run the
//! moment a feeding event actually applies them.

use crate::behavior::BehaviorField;
use pizzapets_data::OrderedMap;
use serde_json::Value;

/// Which one-shot flag an `immediate_*_percentage` effect latches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immediate {
    Excrement,
    Death,
    Evolve,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HealthIncrement {
    Max,
    Amount(f64),
    /// Neither numeric nor "max"; fatal when applied.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Overwrites (or, for buffs, multiplies into) a behavior field.
    Behavior { field: BehaviorField, value: f64 },
    /// Effects selected by the pet's current stage index.
    StateScoped(Vec<Vec<Effect>>),
    HealthIncrement(HealthIncrement),
    ExcrementablePercentage(f64),
    ClearExcrement(bool),
    ClearBuffs(bool),
    EvolutionOffset(i64),
    DeathIn(f64),
    DoomsdayDeviceResistanceFor(f64),
    RegenerateType(bool),
    Immediate { kind: Immediate, percentage: f64 },
    Unknown(String),
}

impl Effect {
    /// Parses one `name: value` pair of an item's `effects` object.
    #[must_use]
    pub fn parse(name: &str, value: &Value) -> Self {
        if let Some(field) = BehaviorField::from_key(name) {
            return Effect::Behavior {
                field,
                value: number(value),
            };
        }

        match name.to_lowercase().as_str() {
            "states" => Effect::StateScoped(parse_states(value)),
            "health_increment" => Effect::HealthIncrement(parse_health_increment(value)),
            "excrementable_percentage" => Effect::ExcrementablePercentage(number(value)),
            "clear_excrement" => Effect::ClearExcrement(truthy(value)),
            "clear_buffs" => Effect::ClearBuffs(truthy(value)),
            "evolution_offset" => Effect::EvolutionOffset(number(value) as i64),
            "death_in" => Effect::DeathIn(number(value)),
            "doomsday_device_resistance_for" => Effect::DoomsdayDeviceResistanceFor(number(value)),
            "regenerate_type" => Effect::RegenerateType(truthy(value)),
            "immediate_excrement_percentage" => Effect::Immediate {
                kind: Immediate::Excrement,
                percentage: number(value),
            },
            "immediate_death_percentage" => Effect::Immediate {
                kind: Immediate::Death,
                percentage: number(value),
            },
            "immediate_evolve_percentage" => Effect::Immediate {
                kind: Immediate::Evolve,
                percentage: number(value),
            },
            _ => Effect::Unknown(name.to_string()),
        }
    }

}

/// Parses an `effects` object, keeping document order.
#[must_use]
pub fn parse_effects(effects: &OrderedMap<Value>) -> Vec<Effect> {
    effects
        .iter()
        .map(|(name, value)| Effect::parse(name, value))
        .collect()
}

/// Per-stage effect lists. Each stage object runs in document order, which
/// relies on `serde_json` preserving key order.
fn parse_states(value: &Value) -> Vec<Vec<Effect>> {
    match value {
        Value::Array(stages) => stages
            .iter()
            .map(|stage| match stage {
                Value::Object(map) => map
                    .iter()
                    .map(|(name, value)| Effect::parse(name, value))
                    .collect(),
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_health_increment(value: &Value) -> HealthIncrement {
    if let Value::String(s) = value {
        if s.eq_ignore_ascii_case("max") {
            return HealthIncrement::Max;
        }
    }
    let amount = number(value);
    if amount.is_nan() {
        HealthIncrement::Invalid(value.to_string())
    } else {
        HealthIncrement::Amount(amount)
    }
}

/// Loose numeric reading of a document value: numbers as-is, booleans as
/// 0/1, numeric strings parsed, null and empty strings as 0, anything else
/// NaN.
#[must_use]
pub fn number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Whether a document value counts as "set".
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric value that is set, finite and non-zero.
#[must_use]
pub fn is_set(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_behavior_field_wins_over_kind() {
        assert_eq!(
            Effect::parse("excrement_rate", &json!(2)),
            Effect::Behavior {
                field: BehaviorField::ExcrementRate,
                value: 2.0
            }
        );
    }

    #[test]
    fn test_kind_match_is_case_insensitive() {
        assert_eq!(
            Effect::parse("Clear_Excrement", &json!(true)),
            Effect::ClearExcrement(true)
        );
    }

    #[test]
    fn test_unknown_effect_is_kept() {
        assert_eq!(
            Effect::parse("teleport", &json!(1)),
            Effect::Unknown("teleport".to_string())
        );
    }

    #[test]
    fn test_health_increment_values() {
        assert_eq!(
            Effect::parse("health_increment", &json!("MAX")),
            Effect::HealthIncrement(HealthIncrement::Max)
        );
        assert_eq!(
            Effect::parse("health_increment", &json!("1.5")),
            Effect::HealthIncrement(HealthIncrement::Amount(1.5))
        );
        assert!(matches!(
            Effect::parse("health_increment", &json!("lots")),
            Effect::HealthIncrement(HealthIncrement::Invalid(_))
        ));
    }

    #[test]
    fn test_states_are_parsed_per_stage() {
        let effect = Effect::parse(
            "states",
            &json!([{"health_increment": 1}, null, {"clear_excrement": true}]),
        );
        let Effect::StateScoped(stages) = effect else {
            panic!("expected state scoped effect");
        };
        assert_eq!(stages.len(), 3);
        assert!(stages[1].is_empty());
        assert_eq!(stages[2], vec![Effect::ClearExcrement(true)]);
    }

    #[test]
    fn test_stage_effects_keep_document_order() {
        let raw = r#"{"states": [{"health_increment": "max", "evolution_offset": 1}, {}, {}]}"#;
        let effects: OrderedMap<Value> = serde_json::from_str(raw).unwrap();
        let parsed = parse_effects(&effects);
        let [Effect::StateScoped(stages)] = parsed.as_slice() else {
            panic!("expected one state scoped effect");
        };
        assert_eq!(
            stages[0],
            vec![
                Effect::HealthIncrement(HealthIncrement::Max),
                Effect::EvolutionOffset(1)
            ]
        );
        assert!(stages[1].is_empty() && stages[2].is_empty());
    }

    #[test]
    fn test_number_and_truthy() {
        assert_eq!(number(&json!(null)), 0.0);
        assert_eq!(number(&json!(true)), 1.0);
        assert!(number(&json!("abc")).is_nan());
        assert!(!truthy(&json!(0)));
        assert!(truthy(&json!("x")));
        assert!(!is_set(f64::NAN));
    }
}
