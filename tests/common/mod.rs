pub mod macros;

use pizzapets_core::{Pet, ReplayInput, Rules};
use pizzapets_data::{BlockRange, Configuration, EventMap, FeedingEvent};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const INSCRIPTION: &str = "e1f2a3b4c5d6i0";

/// Rules documents for tests. The default pet has three stages with
/// three hearts each, loses one heart every five blocks from block ten
/// on and never evolves within the first hundred blocks.
#[allow(dead_code)]
pub struct ConfigBuilder {
    document: Value,
}

#[allow(dead_code)]
impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            document: json!({
                "start": 1000,
                "hearts": [3, 3, 3],
                "behavior": {
                    "evolution_rate": 1,
                    "excrement_rate": 1,
                    "excrement_within": 20,
                    "health_decline_rate": 1,
                    "health_decrement_amount": 1,
                    "health_decrement_interval": 5,
                    "health_decrement_at": 10,
                    "doomsday_device_resistant": false,
                    "evolution_at": [100, 100, 0],
                    "evolution_states": [{"name": "egg"}, {"name": "baby"}, {"name": "adult"}]
                },
                "items": {},
                "doomsday_devices": {"difficulty": 0, "limit": 0, "delay": 5, "mapping": {}},
                "types": {"cheese": [], "pepperoni": [], "veggie": []},
                "locations": {"type": {"index": 0, "length": 2}},
                "translations": {
                    "grave_messages": ["Rest in crust"],
                    "history": {
                        "start": {"description": "Hatched as %{type}", "emoji": "🥚"},
                        "evolution": {"description": "%{previous_state} grew into %{state}", "emoji": "⬆"},
                        "devolution": {"description": "%{previous_state} shrank into %{state}", "emoji": "⬇"},
                        "death": {"description": "Died", "emoji": "💀"}
                    }
                }
            }),
        }
    }

    pub fn with_hearts(mut self, hearts: &[f64]) -> Self {
        self.document["hearts"] = json!(hearts);
        self
    }

    pub fn with_evolution_at(mut self, evolution_at: &[f64]) -> Self {
        self.document["behavior"]["evolution_at"] = json!(evolution_at);
        self
    }

    pub fn with_stages(mut self, names: &[&str]) -> Self {
        let states: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
        self.document["behavior"]["evolution_states"] = Value::Array(states);
        self
    }

    /// Overrides one field of the base behavior record.
    pub fn with_behavior(mut self, field: &str, value: Value) -> Self {
        self.document["behavior"][field] = value;
        self
    }

    pub fn with_item(mut self, key: &str, item: Value) -> Self {
        self.document["items"][key] = item;
        self
    }

    /// Adds an item from raw JSON text, keeping its key order.
    pub fn with_item_json(self, key: &str, raw: &str) -> Self {
        let item: Value = serde_json::from_str(raw).expect("Invalid test item");
        self.with_item(key, item)
    }

    pub fn with_hazard(mut self, id: &str, name: &str, cool_down_blocks: u64) -> Self {
        self.document["doomsday_devices"]["mapping"][id] =
            json!({ "name": name, "cool_down_blocks": cool_down_blocks });
        self
    }

    pub fn with_hazard_delay(mut self, delay: u64) -> Self {
        self.document["doomsday_devices"]["delay"] = json!(delay);
        self
    }

    pub fn with_difficulty(mut self, difficulty: u64, limit: u64) -> Self {
        self.document["doomsday_devices"]["difficulty"] = json!(difficulty);
        self.document["doomsday_devices"]["limit"] = json!(limit);
        self
    }

    pub fn with_fixup(mut self, start: u64, end: u64) -> Self {
        let range = json!(BlockRange { start, end });
        if !self.document["deathfixup_blocks"].is_array() {
            self.document["deathfixup_blocks"] = json!([]);
        }
        if let Some(ranges) = self.document["deathfixup_blocks"].as_array_mut() {
            ranges.push(range);
        }
        self
    }

    pub fn build(self) -> Configuration {
        serde_json::from_value(self.document).expect("Invalid test configuration")
    }

    pub fn rules(self) -> Arc<Rules> {
        Arc::new(Rules::compile(&self.build()).expect("Failed to compile test rules"))
    }

    pub fn pet(self) -> Pet {
        Pet::bind(self.rules(), INSCRIPTION).expect("Failed to bind test pet")
    }
}

/// Height-indexed feeding events, in arrival order.
#[allow(dead_code)]
pub struct EventBuilder {
    events: EventMap,
    arrivals: usize,
}

#[allow(dead_code)]
impl EventBuilder {
    pub fn new() -> Self {
        Self {
            events: EventMap::new(),
            arrivals: 0,
        }
    }

    /// A feeding whose id starts with the item key `prefix`.
    pub fn feed(self, prefix: &str, height: u64) -> Self {
        let id = format!("{}{:x}i0", prefix, 0xabc000 + self.arrivals);
        self.feed_id(&id, height)
    }

    pub fn feed_id(mut self, id: &str, height: u64) -> Self {
        self.events.entry(height).or_default().push(FeedingEvent {
            id: id.to_string(),
            height,
            timestamp: 1_700_000_000 + height,
            index: self.arrivals,
        });
        self.arrivals += 1;
        self
    }

    pub fn build(self) -> EventMap {
        self.events
    }

    pub fn into_children(self) -> Vec<FeedingEvent> {
        self.events.into_values().flatten().collect()
    }
}

/// Replays `pet` to `start + elapsed` with the given feedings and hazard
/// feedings.
#[allow(dead_code)]
pub fn replay_to(
    pet: &mut Pet,
    elapsed: u64,
    feedings: &EventMap,
    hazards: &BTreeMap<String, EventMap>,
) {
    let input = ReplayInput::assemble(
        pet.rules(),
        pet.fingerprint(),
        pet.start_block() + elapsed,
        feedings,
        hazards,
    );
    pet.replay(&input).expect("Replay failed");
}

#[allow(dead_code)]
pub fn unfed(pet: &mut Pet, elapsed: u64) {
    replay_to(pet, elapsed, &EventMap::new(), &BTreeMap::new());
}
