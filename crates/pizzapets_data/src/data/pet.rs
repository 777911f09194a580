use super::history::HistoryEvent;
use serde::{Deserialize, Serialize};

/// Inclusive block window during which the pet shrugs off doomsday devices.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResistanceWindow {
    pub from: u64,
    pub to: u64,
}

impl ResistanceWindow {
    #[must_use]
    pub fn contains(&self, block: u64) -> bool {
        block >= self.from && block <= self.to
    }
}

/// One-shot flags latched by `immediate_*_percentage` effects and consumed
/// by the replay loop within the same block.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImmediateEffects {
    pub excrement: bool,
    pub death: bool,
    pub evolve: bool,
}

/// An active temporary modifier installed by a buff item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Buff {
    /// Catalog key of the item that installed the buff.
    pub item_key: String,
    pub description: String,
    pub emoji: String,
    /// Block the buff was activated at.
    pub height: u64,
}

/// A doomsday device somewhere in its triggered, exploded, cooling-down cycle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TriggeredHazard {
    pub id: String,
    pub name: String,
    pub exploded_at: Option<u64>,
}

/// Mutable per-run state of a pet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PetState {
    pub stage_index: usize,
    pub health: f64,
    pub excrement: u32,
    /// Scheduled excretion heights, ascending.
    pub excrement_at: Vec<u64>,
    pub death_at: Option<u64>,
    pub immediate: ImmediateEffects,
    pub resistance: Option<ResistanceWindow>,
    /// Decay counter; zero means the pet was fed this block.
    pub counter: u64,
}

/// Health split the way hearts are drawn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HealthComponents {
    pub count: f64,
    pub whole: f64,
    pub fraction: f64,
    pub ceil: f64,
    pub decrement_amount: f64,
}

/// Read-only view of a pet after a replay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PetSnapshot {
    pub inscription_id: String,
    pub fingerprint: String,
    pub block_height: u64,
    pub start_block: u64,
    pub stage_index: usize,
    pub state: Option<String>,
    pub pet_type: String,
    pub health: f64,
    pub hearts: f64,
    pub excrement: u32,
    pub buffs: Vec<Buff>,
    pub alive: bool,
    pub weakness_id: Option<String>,
    pub weakness: Option<String>,
    pub resistance: Option<ResistanceWindow>,
    pub blocks_until_next_state: i64,
    pub history: Vec<HistoryEvent>,
}
