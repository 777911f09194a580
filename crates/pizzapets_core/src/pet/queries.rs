//! Read-only views derived from a finished replay.

use super::Pet;
use crate::derivation::random_number_for;
use crate::fingerprint::{hash_for, plain_number};
use pizzapets_data::PetSnapshot;
use serde_json::Value;

/// Blocks per tenth of a day.
const BLOCKS_PER_DAY: f64 = 144.0;

impl Pet {
    /// Maximum health at the current stage.
    #[must_use]
    pub fn hearts(&self) -> f64 {
        self.rules.hearts_for(self.state.stage_index)
    }

    /// Signed blocks since birth at the observed height.
    #[must_use]
    pub fn elapsed_blocks(&self) -> i64 {
        self.block_height as i64 - self.start_block as i64
    }

    #[must_use]
    pub fn has_game_started(&self) -> bool {
        self.elapsed_blocks() >= 0
    }

    /// Alive while still inside the grace period, or with health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        (self.elapsed_blocks() as f64) < self.behavior.health_decrement_at || self.state.health > 0.0
    }

    #[must_use]
    pub fn state_name(&self) -> Option<&str> {
        if !self.has_game_started() {
            return None;
        }
        Some(self.rules.stage_name(self.state.stage_index))
    }

    /// `"<state>.<type>.<alive|dead>"`; the state part is empty before birth.
    #[must_use]
    pub fn living_state(&self) -> String {
        let living = if self.is_alive() { "alive" } else { "dead" };
        format!(
            "{}.{}.{}",
            self.state_name().unwrap_or_default(),
            self.pet_type,
            living
        )
    }

    /// Name of the hazard the pet is weak to.
    #[must_use]
    pub fn weakness(&self) -> Option<&str> {
        self.weakness_id
            .as_deref()
            .and_then(|id| self.rules.hazard(id))
            .map(|hazard| hazard.name.as_str())
    }

    /// Days until the next stage at one decimal, or -1.
    #[must_use]
    pub fn days_until_next_state(&self) -> f64 {
        let blocks = self.blocks_until_next_state();
        if blocks == -1 {
            return -1.0;
        }
        ((blocks as f64 * 10.0) / BLOCKS_PER_DAY).ceil() / 10.0
    }

    #[must_use]
    pub fn grave_message(&self) -> Option<String> {
        let messages = self.rules.translations.get("grave_messages")?.as_array()?;
        let index = random_number_for(
            messages.len() as u64,
            &self.fingerprint,
            self.state.counter,
            true,
        );
        messages.get(index as usize)?.as_str().map(str::to_string)
    }

    /// Digest of everything the thumbnail renders from.
    #[must_use]
    pub fn thumbnail_hash(&self) -> String {
        let mut emojis: Vec<&str> = self.buffs.iter().map(|b| b.emoji.as_str()).collect();
        emojis.sort_unstable();
        let attributes = Value::Array(vec![
            Value::from(self.inscription_id.as_str()),
            Value::from(self.pet_type.as_str()),
            Value::from(self.state.stage_index),
            plain_number(self.hearts()),
            plain_number(self.state.health),
            Value::from(self.state.excrement),
            Value::from(emojis),
            plain_number(self.days_until_next_state()),
        ]);
        hash_for(&attributes.to_string())
    }

    #[must_use]
    pub fn snapshot(&self) -> PetSnapshot {
        PetSnapshot {
            inscription_id: self.inscription_id.clone(),
            fingerprint: self.fingerprint.clone(),
            block_height: self.block_height,
            start_block: self.start_block,
            stage_index: self.state.stage_index,
            state: self.state_name().map(str::to_string),
            pet_type: self.pet_type.clone(),
            health: self.state.health,
            hearts: self.hearts(),
            excrement: self.state.excrement,
            buffs: self.buffs.clone(),
            alive: self.is_alive(),
            weakness_id: self.weakness_id.clone(),
            weakness: self.weakness().map(str::to_string),
            resistance: self.state.resistance,
            blocks_until_next_state: self.blocks_until_next_state(),
            history: self.history.clone(),
        }
    }
}
