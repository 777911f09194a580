//! Assembled inputs of one replay.

use crate::fingerprint::hashed_event_id;
use crate::rules::Rules;
use pizzapets_data::EventMap;
use std::collections::BTreeMap;

/// A feeding event ready for replay, carrying the digest that seeds its
/// chance rolls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feeding {
    pub id: String,
    pub height: u64,
    pub hashed_id: String,
}

pub type FeedingMap = BTreeMap<u64, Vec<Feeding>>;

/// Block-indexed hazard timetable, folded from each hazard's own feeding
/// events before the replay starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardSchedule {
    pub triggered_at: BTreeMap<u64, Vec<String>>,
    pub explodes_at: BTreeMap<u64, Vec<String>>,
}

impl HazardSchedule {
    /// Walks hazards in catalog order and their trigger heights ascending.
    /// A trigger counts only once the hazard's previous explosion has
    /// cooled down.
    #[must_use]
    pub fn build(rules: &Rules, hazard_events: &BTreeMap<String, EventMap>) -> Self {
        let mut schedule = Self::default();
        for hazard in &rules.hazards {
            let Some(events) = hazard_events.get(&hazard.id) else {
                continue;
            };
            let mut triggerable_at = 0u64;
            for (&height, children) in events {
                if children.is_empty() || height < triggerable_at {
                    continue;
                }
                let explodes_at = height + hazard.delay;
                schedule
                    .triggered_at
                    .entry(height)
                    .or_default()
                    .push(hazard.id.clone());
                schedule
                    .explodes_at
                    .entry(explodes_at)
                    .or_default()
                    .push(hazard.id.clone());
                triggerable_at = explodes_at + hazard.cool_down_blocks;
            }
        }
        schedule
    }

    #[must_use]
    pub fn triggered_at(&self, block: u64) -> &[String] {
        self.triggered_at.get(&block).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn explodes_at(&self, block: u64) -> &[String] {
        self.explodes_at.get(&block).map_or(&[], Vec::as_slice)
    }
}

/// Everything a replay reads besides the rules and the pet identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayInput {
    pub block_height: u64,
    pub feedings: FeedingMap,
    pub hazards: HazardSchedule,
}

impl ReplayInput {
    /// Hashes the pet's children against its fingerprint and folds the
    /// hazard children into a schedule.
    #[must_use]
    pub fn assemble(
        rules: &Rules,
        pet_fingerprint: &str,
        block_height: u64,
        children: &EventMap,
        hazard_events: &BTreeMap<String, EventMap>,
    ) -> Self {
        let feedings = children
            .iter()
            .map(|(&height, events)| {
                let hashed = events
                    .iter()
                    .map(|event| Feeding {
                        id: event.id.clone(),
                        height: event.height,
                        hashed_id: hashed_event_id(&event.id, event.timestamp, pet_fingerprint),
                    })
                    .collect();
                (height, hashed)
            })
            .collect();

        Self {
            block_height,
            feedings,
            hazards: HazardSchedule::build(rules, hazard_events),
        }
    }

    #[must_use]
    pub fn feedings_at(&self, block: u64) -> &[Feeding] {
        self.feedings.get(&block).map_or(&[], Vec::as_slice)
    }
}
