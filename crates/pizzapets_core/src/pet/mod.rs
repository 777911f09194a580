//! The run context of one pet.
//!
//! A [`Pet`] binds an identity to compiled [`Rules`] once (fingerprint,
//! birth block, weakness and initial type are derived here and never
//! again) and then replays its whole life from scratch on every call to
//! [`Pet::replay`]. Nothing survives between replays except the binding.

use crate::behavior::Behavior;
use crate::error::Result;
use crate::fingerprint::hash_for;
use crate::rules::Rules;
use crate::translate::history_line;
use pizzapets_data::{Buff, HistoryEvent, HistoryKind, PetState, TriggeredHazard};
use std::collections::HashMap;
use std::sync::Arc;

pub mod buffs;
pub mod effects;
pub mod evolution;
pub mod hazard;
pub mod queries;
pub mod replay;

#[derive(Debug, Clone)]
pub struct Pet {
    rules: Arc<Rules>,
    inscription_id: String,
    fingerprint: String,
    start_block: u64,
    weakness_id: Option<String>,
    initial_type: String,

    block_height: u64,
    /// Blocks since birth of the block being replayed.
    block_in_progress: u64,
    pet_type: String,
    state: PetState,
    behavior: Behavior,
    /// Raw blocks left in the current stage, before rate adjustment.
    countdown: f64,
    buffs: Vec<Buff>,
    history: Vec<HistoryEvent>,
    triggered: Vec<TriggeredHazard>,
    /// Item uses so far, keyed by item description.
    limits: HashMap<String, u32>,
}

impl Pet {
    /// Binds an inscription to a rule set.
    pub fn bind(rules: Arc<Rules>, inscription_id: impl Into<String>) -> Result<Self> {
        let inscription_id = inscription_id.into();
        let fingerprint = hash_for(&inscription_id);
        let start_block = rules.start_block_for(&fingerprint);
        let weakness_id = rules.weakness_for(&fingerprint).map(|h| h.id.clone());
        let initial_type = rules
            .type_for(&fingerprint)
            .map_err(|e| e.with_context(format!("binding {}", inscription_id)))?;
        let behavior = rules.behavior.clone();

        tracing::debug!(
            inscription_id = %inscription_id,
            start_block,
            weakness = ?weakness_id,
            pet_type = %initial_type,
            "Bound pet"
        );

        Ok(Self {
            rules,
            inscription_id,
            fingerprint,
            start_block,
            weakness_id,
            pet_type: initial_type.clone(),
            initial_type,
            block_height: 0,
            block_in_progress: 0,
            state: PetState::default(),
            behavior,
            countdown: 0.0,
            buffs: Vec::new(),
            history: Vec::new(),
            triggered: Vec::new(),
            limits: HashMap::new(),
        })
    }

    /// Clears everything a replay builds up.
    pub fn reset(&mut self) {
        self.block_in_progress = 0;
        self.pet_type = self.initial_type.clone();
        self.state = PetState::default();
        self.behavior = self.rules.behavior.clone();
        self.countdown = 0.0;
        self.buffs.clear();
        self.history.clear();
        self.triggered.clear();
        self.limits.clear();
    }

    #[must_use]
    pub fn rules(&self) -> &Arc<Rules> {
        &self.rules
    }

    #[must_use]
    pub fn inscription_id(&self) -> &str {
        &self.inscription_id
    }

    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    #[must_use]
    pub fn start_block(&self) -> u64 {
        self.start_block
    }

    #[must_use]
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Blocks walked by the last replay.
    #[must_use]
    pub fn blocks_replayed(&self) -> u64 {
        self.block_in_progress
    }

    #[must_use]
    pub fn weakness_id(&self) -> Option<&str> {
        self.weakness_id.as_deref()
    }

    #[must_use]
    pub fn pet_type(&self) -> &str {
        &self.pet_type
    }

    #[must_use]
    pub fn state(&self) -> &PetState {
        &self.state
    }

    #[must_use]
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    #[must_use]
    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    #[must_use]
    pub fn triggered_hazards(&self) -> &[TriggeredHazard] {
        &self.triggered
    }

    /// Absolute height of the block being replayed.
    fn absolute_block_in_progress(&self) -> u64 {
        self.start_block + self.block_in_progress
    }

    fn record(&mut self, height: u64, kind: HistoryKind, id: Option<&str>, data: &[(&str, &str)]) {
        let (description, emoji) = history_line(&self.rules.translations, kind, data);
        self.history.push(HistoryEvent {
            kind,
            height,
            id: id.map(str::to_string),
            description,
            emoji,
        });
    }

    fn clamp_health(&mut self) {
        let hearts = self.hearts();
        if self.state.health > hearts {
            self.state.health = hearts;
        }
        if self.state.health < 0.0 {
            self.state.health = 0.0;
        }
    }
}
