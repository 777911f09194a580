//! Shared fixtures for unit tests.

use crate::fingerprint::hash_for;
use crate::input::Feeding;
use crate::pet::Pet;
use crate::rules::Rules;
use pizzapets_data::Configuration;
use serde_json::json;
use std::sync::Arc;

/// Three stages (egg, baby, adult) and one item per catalog bit.
pub(crate) fn configuration() -> Configuration {
    serde_json::from_value(json!({
        "start": 100,
        "hearts": [1, 3, 5],
        "behavior": {
            "evolution_rate": 1,
            "excrement_rate": 1,
            "excrement_within": 20,
            "health_decline_rate": 1,
            "health_decrement_amount": 0.5,
            "health_decrement_interval": 10,
            "health_decrement_at": 5,
            "doomsday_device_resistant": false,
            "evolution_at": [10, 20, 0],
            "evolution_states": [
                {"name": "egg"},
                {"name": "baby", "effects": {"excrement_rate": 2}},
                {"name": "adult"}
            ]
        },
        "items": {
            "001": {"description": "Pepperoni", "emoji": "P", "effects": {"health_increment": "max"}},
            "002": {"description": "Anchovy", "emoji": "A", "effects": {"clear_excrement": true}, "rejects": "001"},
            "004": {"description": "Basil", "emoji": "B", "buff": true, "effects": {"states": [
                {"doomsday_device_resistance_for": 5},
                {"doomsday_device_resistance_for": 5},
                {}
            ]}},
            "008": {"description": "Syrup", "emoji": "S", "buff": true, "effects": {"evolution_rate": 0.5}},
            "010": {"description": "Box", "emoji": "X", "effects": {"clear_buffs": true}},
            "020": {"description": "Honey", "emoji": "H", "buff": true, "effects": {"evolution_rate": 0.5}},
            "040": {"description": "Crust", "emoji": "C", "limit": 2, "effects": {"excrementable_percentage": 100}},
            "080": {"description": "Ghost Pepper", "emoji": "G", "effects": {"death_in": 20}},
            "100": {"description": "Rewind", "emoji": "R", "effects": {"evolution_offset": -1}},
            "200": {"description": "Remix", "emoji": "M", "effects": {"regenerate_type": true}},
            "400": {"description": "Hot Sauce", "emoji": "F", "effects": {"immediate_death_percentage": 100}}
        },
        "doomsday_devices": {
            "difficulty": 10,
            "limit": 2,
            "delay": 5,
            "mapping": {
                "dd1": {"name": "Oven", "cool_down_blocks": 20},
                "dd2": {"name": "Cutter", "cool_down_blocks": 10}
            }
        },
        "types": {"cheese": [], "pepperoni": [], "veggie": []},
        "locations": {"type": {"index": 0, "length": 2}},
        "translations": {
            "grave_messages": ["Rest in crust", "Gone to the big oven"],
            "history": {
                "start": {"description": "Hatched as %{type}", "emoji": "0"},
                "evolution": {"description": "%{previous_state} grew into %{state}", "emoji": "^"},
                "death": {"description": "Died", "emoji": "x"}
            }
        }
    }))
    .expect("fixture configuration")
}

pub(crate) fn bind(configuration: Configuration, inscription_id: &str) -> Pet {
    let rules = Rules::compile(&configuration).expect("fixture rules");
    Pet::bind(Arc::new(rules), inscription_id).expect("fixture pet")
}

/// A feeding whose digest is derived from its id alone.
pub(crate) fn feeding(id: &str, height: u64) -> Feeding {
    Feeding {
        id: id.to_string(),
        height,
        hashed_id: hash_for(id),
    }
}
