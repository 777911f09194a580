//! Compiled rules document.
//!
//! [`Rules::compile`] validates a [`Configuration`] once and turns it into
//! the lookup tables a replay needs: parsed item effects with their
//! bitmasks, stage names and overrides, the hazard catalog and the sorted
//! type table. A compiled `Rules` is immutable and shared between runs.

use crate::behavior::{Behavior, BehaviorField};
use crate::derivation::{decimal_for_fragment, decimal_for_hash, decimal_for_prefix, parse_hex_prefix};
use crate::effect::{number, parse_effects, truthy, Effect};
use crate::error::{EngineError, Result};
use pizzapets_data::{BlockRange, Configuration, Location};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Birth blocks are spread over this many blocks after `configuration.start`.
pub const START_BLOCK_OFFSET_LIMIT: u64 = 10;

/// Widest catalog key a 64-bit mask can hold.
pub const MAX_KEY_WIDTH: usize = 16;

/// One evolution stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: String,
    /// Behavior fields overwritten when the pet enters this stage.
    pub overrides: Vec<(BehaviorField, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRule {
    /// Catalog key as written in the document.
    pub key: String,
    pub mask: u64,
    pub rejects: u64,
    pub description: String,
    pub emoji: String,
    pub buff: bool,
    pub limit: Option<u32>,
    /// Top-level `clear_buffs` flag; deferred until the event is applied.
    pub clear_buffs: bool,
    pub effects: Vec<Effect>,
}

impl ItemRule {
    /// Effects in force at `stage`: the stage's entry of a `states` effect
    /// when the item has one, otherwise the top-level effects.
    #[must_use]
    pub fn effects_at(&self, stage: usize) -> &[Effect] {
        for effect in &self.effects {
            if let Effect::StateScoped(stages) = effect {
                return stages.get(stage).map(Vec::as_slice).unwrap_or(&[]);
            }
        }
        &self.effects
    }

    /// Duration of the resistance this item grants at `stage`, if any.
    #[must_use]
    pub fn resistance_at(&self, stage: usize) -> Option<f64> {
        self.effects_at(stage).iter().find_map(|e| match e {
            Effect::DoomsdayDeviceResistanceFor(blocks) => Some(*blocks),
            _ => None,
        })
    }

    /// Value this item contributes to a behavior field at `stage`.
    #[must_use]
    pub fn behavior_value_at(&self, stage: usize, field: BehaviorField) -> Option<f64> {
        self.effects_at(stage).iter().find_map(|e| match e {
            Effect::Behavior { field: f, value } if *f == field => Some(*value),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardRule {
    pub id: String,
    pub name: String,
    pub cool_down_blocks: u64,
    /// Trigger-to-explosion delay, already resolved against the catalog default.
    pub delay: u64,
}

#[derive(Debug, Clone)]
pub struct Rules {
    pub start: u64,
    pub hearts: Vec<f64>,
    /// Base behavior before any stage or item has touched it.
    pub behavior: Behavior,
    pub stages: Vec<Stage>,
    pub items: Vec<ItemRule>,
    item_lookup: HashMap<String, usize>,
    pub key_width: usize,
    pub hazards: Vec<HazardRule>,
    hazard_lookup: HashMap<String, usize>,
    pub difficulty: u64,
    pub immunity_limit: u64,
    pub fixups: Vec<BlockRange>,
    /// Type names, sorted.
    pub types: Vec<String>,
    pub locations: BTreeMap<String, Location>,
    pub translations: Value,
    pub poll_delay: Option<u64>,
    fingerprint: String,
}

impl Rules {
    /// Validates and compiles a rules document.
    pub fn compile(configuration: &Configuration) -> Result<Self> {
        validate(configuration)
            .map_err(|e| EngineError::invalid_configuration(e.to_string()))?;

        let behavior_config = &configuration.behavior;
        let stages: Vec<Stage> = behavior_config
            .evolution_states
            .iter()
            .map(|state| Stage {
                name: state.name.clone(),
                overrides: state
                    .effects
                    .iter()
                    .filter_map(|(key, value)| match BehaviorField::from_key(key) {
                        Some(field) => Some((field, number(value))),
                        None => {
                            tracing::warn!(stage = %state.name, key = %key, "Ignoring non-behavior stage override");
                            None
                        }
                    })
                    .collect(),
            })
            .collect();
        let mut items = Vec::with_capacity(configuration.items.len());
        for (key, item) in configuration.items.iter() {
            let mask = parse_mask(key)?;
            let rejects = match item.rejects.as_deref() {
                None | Some("") => 0,
                Some(rejects) => parse_mask(rejects)?,
            };
            items.push(ItemRule {
                key: key.to_string(),
                mask,
                rejects,
                description: item.description.clone(),
                emoji: item.emoji.clone(),
                buff: item.buff,
                limit: item.limit.filter(|limit| *limit > 0),
                clear_buffs: item.effects.get("clear_buffs").is_some_and(truthy),
                effects: parse_effects(&item.effects),
            });
        }
        let key_width = items.iter().map(|i| i.key.chars().count()).max().unwrap_or(0);

        let devices = &configuration.doomsday_devices;
        let hazards: Vec<HazardRule> = devices
            .mapping
            .iter()
            .map(|(id, hazard)| HazardRule {
                id: id.to_string(),
                name: hazard.name.clone(),
                cool_down_blocks: hazard.cool_down_blocks,
                delay: hazard.delay.unwrap_or(devices.delay),
            })
            .collect();

        let mut types: Vec<String> = configuration.types.keys().map(str::to_string).collect();
        types.sort();

        let fingerprint = crate::fingerprint::hash_for(
            &serde_json::to_string(configuration)
                .map_err(|e| EngineError::invalid_configuration(e.to_string()))?,
        );

        Ok(Self {
            start: configuration.start,
            hearts: configuration.hearts.clone(),
            behavior: Behavior::from(behavior_config),
            stages,
            item_lookup: index_by(&items, |item| &item.key),
            items,
            key_width,
            hazard_lookup: index_by(&hazards, |hazard| &hazard.id),
            hazards,
            difficulty: devices.difficulty,
            immunity_limit: devices.limit,
            fixups: configuration.deathfixup_blocks.clone(),
            types,
            locations: configuration.locations.clone(),
            translations: configuration.translations.clone(),
            poll_delay: configuration.poll_delay,
            fingerprint,
        })
    }

    /// Digest of the document this was compiled from.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    #[must_use]
    pub fn final_stage(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    #[must_use]
    pub fn stage_name(&self, index: usize) -> &str {
        self.stages.get(index).map_or("???", |s| s.name.as_str())
    }

    #[must_use]
    pub fn hearts_for(&self, stage: usize) -> f64 {
        self.hearts.get(stage).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<&ItemRule> {
        self.item_lookup.get(key).and_then(|&index| self.items.get(index))
    }

    #[must_use]
    pub fn hazard(&self, id: &str) -> Option<&HazardRule> {
        self.hazard_lookup.get(id).and_then(|&index| self.hazards.get(index))
    }

    #[must_use]
    pub fn is_in_death_fixup_range(&self, block: u64) -> bool {
        self.fixups.iter().any(|range| range.contains(block))
    }

    /// Items a feeding event carries, in catalog order.
    ///
    /// An exact key match wins outright. Otherwise every item sharing a bit
    /// with the event's prefix is collected, and the whole event is vetoed
    /// as soon as an accumulated reject mask hits an accumulated match bit.
    #[must_use]
    pub fn items_for(&self, event_id: &str) -> Vec<&ItemRule> {
        let prefix: String = event_id.chars().take(self.key_width).collect();
        if let Some(item) = self.item(&prefix) {
            return vec![item];
        }

        let event_mask = parse_hex_prefix(&prefix);
        let mut matched = 0u64;
        let mut rejected = 0u64;
        let mut items = Vec::new();
        for item in &self.items {
            if event_mask & item.mask == 0 {
                continue;
            }
            matched |= item.mask;
            rejected |= item.rejects;
            if rejected & matched != 0 {
                return Vec::new();
            }
            items.push(item);
        }
        items
    }

    /// Birth block of the pet with this fingerprint.
    #[must_use]
    pub fn start_block_for(&self, fingerprint: &str) -> u64 {
        self.start + decimal_for_prefix(fingerprint) % START_BLOCK_OFFSET_LIMIT
    }

    /// The hazard the pet is weak to, or `None` when it rolled immunity.
    #[must_use]
    pub fn weakness_for(&self, fingerprint: &str) -> Option<&HazardRule> {
        let number = decimal_for_hash(fingerprint, 0);
        let roll = decimal_for_hash(fingerprint, 1).checked_rem(self.difficulty);
        if roll.is_some_and(|difficulty| difficulty <= self.immunity_limit) || self.hazards.is_empty() {
            return None;
        }
        self.hazards.get((number % self.hazards.len() as u64) as usize)
    }

    /// Decimal value of the fingerprint slice named `location`.
    pub fn decimal_for_location(&self, fingerprint: &str, location: &str) -> Result<u64> {
        let slice = self
            .locations
            .get(location)
            .ok_or_else(|| EngineError::MissingLocation(location.to_string()))?;
        Ok(decimal_for_fragment(fingerprint, slice.index, slice.length))
    }

    /// Initial type of the pet with this fingerprint.
    pub fn type_for(&self, fingerprint: &str) -> Result<String> {
        let number = self.decimal_for_location(fingerprint, "type")?;
        self.pick_type(number, None)
            .ok_or_else(|| EngineError::MissingType("type".to_string()))
    }

    /// Type at `number` in the sorted table, optionally leaving one out.
    #[must_use]
    pub fn pick_type(&self, number: u64, without: Option<&str>) -> Option<String> {
        let candidates: Vec<&String> = self
            .types
            .iter()
            .filter(|t| Some(t.as_str()) != without)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[(number % candidates.len() as u64) as usize].clone())
    }
}

fn index_by<T>(entries: &[T], key: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        index.entry(key(entry).clone()).or_insert(position);
    }
    index
}

fn parse_mask(hex: &str) -> Result<u64> {
    u64::from_str_radix(hex, 16).map_err(|_| EngineError::InvalidHex(hex.to_string()))
}

fn validate(configuration: &Configuration) -> anyhow::Result<()> {
    let behavior = &configuration.behavior;
    let stages = behavior.evolution_states.len();

    anyhow::ensure!(stages > 0, "At least one evolution state is required");
    anyhow::ensure!(
        configuration.hearts.len() >= stages,
        "Hearts must be configured for every evolution state"
    );
    anyhow::ensure!(
        behavior.evolution_at.len() >= stages,
        "Evolution thresholds must be configured for every evolution state"
    );
    anyhow::ensure!(
        configuration.hearts.iter().all(|h| h.is_finite() && *h >= 0.0),
        "Hearts must be non-negative"
    );
    anyhow::ensure!(
        behavior.evolution_rate >= 0.0,
        "Evolution rate must be non-negative"
    );
    anyhow::ensure!(
        behavior.excrement_rate >= 0.0,
        "Excrement rate must be non-negative"
    );
    anyhow::ensure!(
        behavior.health_decrement_amount >= 0.0,
        "Health decrement amount must be non-negative"
    );
    anyhow::ensure!(
        configuration
            .items
            .keys()
            .all(|key| !key.is_empty() && key.chars().count() <= MAX_KEY_WIDTH),
        "Item keys must be 1 to {} hex characters wide",
        MAX_KEY_WIDTH
    );
    for range in &configuration.deathfixup_blocks {
        anyhow::ensure!(
            range.start <= range.end,
            "Death fixup range {}..{} is inverted",
            range.start,
            range.end
        );
    }
    Ok(())
}
