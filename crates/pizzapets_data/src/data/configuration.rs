//! The rules document ("configuration") a pet is replayed against.
//!
//! This mirrors the JSON served by the data source. Field names follow the
//! document verbatim; the engine compiles it into its own lookup tables
//! before a run and never mutates it.

use super::ordered::OrderedMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Root of the rules document.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Configuration {
    /// Earliest block a pet may be born at; the per-pet offset is added to it.
    pub start: u64,
    /// Maximum health for each evolution stage.
    pub hearts: Vec<f64>,
    pub behavior: BehaviorConfig,
    /// Item catalog keyed by a fixed-width hexadecimal bitmask.
    #[serde(default)]
    pub items: OrderedMap<ItemConfig>,
    pub doomsday_devices: DoomsdayDevicesConfig,
    /// Visual type table; only the keys matter to the engine.
    #[serde(default)]
    pub types: OrderedMap<Value>,
    /// Named slices of the fingerprint used for trait derivation.
    #[serde(default)]
    pub locations: BTreeMap<String, Location>,
    #[serde(default)]
    pub traits: Vec<String>,
    /// Block intervals in which death detection is suppressed.
    #[serde(default)]
    pub deathfixup_blocks: Vec<BlockRange>,
    #[serde(default)]
    pub translations: Value,
    /// Suggested polling interval for observers, in milliseconds.
    #[serde(default)]
    pub poll_delay: Option<u64>,
}

/// Base behavior record. Every numeric field may be overridden by a stage
/// or by an item effect of the same name.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BehaviorConfig {
    pub evolution_rate: f64,
    pub excrement_rate: f64,
    #[serde(default)]
    pub excrement_within: f64,
    pub health_decline_rate: f64,
    pub health_decrement_amount: f64,
    pub health_decrement_interval: f64,
    pub health_decrement_at: f64,
    #[serde(default, deserialize_with = "flag_or_number")]
    pub doomsday_device_resistant: f64,
    pub evolution_at: Vec<f64>,
    pub evolution_states: Vec<EvolutionStateConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EvolutionStateConfig {
    pub name: String,
    /// Behavior overrides applied when the pet enters this stage.
    #[serde(default)]
    pub effects: OrderedMap<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ItemConfig {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub effects: OrderedMap<Value>,
    #[serde(default)]
    pub buff: bool,
    #[serde(default)]
    pub limit: Option<u32>,
    /// Hex mask of catalog bits this item cannot be combined with.
    #[serde(default)]
    pub rejects: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DoomsdayDevicesConfig {
    /// Modulus of the difficulty roll.
    pub difficulty: u64,
    /// Difficulty rolls at or below this value make the pet immune.
    pub limit: u64,
    /// Default trigger-to-explosion delay in blocks.
    #[serde(default)]
    pub delay: u64,
    #[serde(default)]
    pub mapping: OrderedMap<HazardConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct HazardConfig {
    pub name: String,
    #[serde(default)]
    pub cool_down_blocks: u64,
    /// Overrides the catalog-wide delay for this device.
    #[serde(default)]
    pub delay: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub index: usize,
    pub length: usize,
}

/// Inclusive block interval.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    #[must_use]
    pub fn contains(&self, block: u64) -> bool {
        block >= self.start && block <= self.end
    }
}

fn flag_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => f64::from(u8::from(b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    })
}
