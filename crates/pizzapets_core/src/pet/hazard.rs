//! Doomsday device lifecycle: cooldown, trigger, explosion.

use super::Pet;
use crate::input::HazardSchedule;
use pizzapets_data::{HistoryKind, TriggeredHazard};
use std::sync::Arc;

impl Pet {
    /// Forgets hazards whose post-explosion cooldown has run out.
    pub(crate) fn cool_down_hazards(&mut self, block: u64) {
        let rules = Arc::clone(&self.rules);
        self.triggered.retain(|hazard| match hazard.exploded_at {
            None => true,
            Some(exploded_at) => {
                let cool_down = rules.hazard(&hazard.id).map_or(0, |h| h.cool_down_blocks);
                block < exploded_at + cool_down
            }
        });
    }

    /// Records every trigger of this block. A device with no cooldown can
    /// be triggered again before its previous record is forgotten.
    pub(crate) fn trigger_hazards(&mut self, block: u64, schedule: &HazardSchedule) {
        let rules = Arc::clone(&self.rules);
        for id in schedule.triggered_at(block) {
            let Some(hazard) = rules.hazard(id) else {
                continue;
            };
            tracing::debug!(block, hazard = %hazard.id, "Doomsday device triggered");
            self.record(
                block,
                HistoryKind::DoomsdayDeviceTriggered,
                Some(hazard.id.as_str()),
                &[("id", hazard.id.as_str()), ("name", hazard.name.as_str())],
            );
            self.triggered.push(TriggeredHazard {
                id: hazard.id.clone(),
                name: hazard.name.clone(),
                exploded_at: None,
            });
        }
    }

    /// Marks this block's explosions against the oldest pending trigger of
    /// each device and reports whether one of them hit the pet.
    pub(crate) fn explode_hazards(&mut self, block: u64, schedule: &HazardSchedule) -> bool {
        let rules = Arc::clone(&self.rules);
        let mut affected = false;
        for id in schedule.explodes_at(block) {
            let Some(triggered) = self
                .triggered
                .iter_mut()
                .find(|t| &t.id == id && t.exploded_at.is_none())
            else {
                // Triggered before this pet was born.
                tracing::warn!(block, hazard = %id, "Explosion without a trigger record");
                continue;
            };
            triggered.exploded_at = Some(block);
            let name = rules.hazard(id).map_or("", |h| h.name.as_str());
            tracing::debug!(block, hazard = %id, "Doomsday device exploded");
            self.record(
                block,
                HistoryKind::DoomsdayDeviceExploded,
                Some(id.as_str()),
                &[("id", id.as_str()), ("name", name)],
            );
            if !affected {
                affected = self.is_affected_by(id, block);
            }
        }
        affected
    }

    /// Whether the pet shrugs off explosions at `block`.
    #[must_use]
    pub fn is_resistant_at(&self, block: u64) -> bool {
        self.is_final_stage()
            || self.behavior.is_doomsday_device_resistant()
            || self.state.resistance.is_some_and(|window| window.contains(block))
    }

    fn is_affected_by(&self, hazard_id: &str, block: u64) -> bool {
        self.weakness_id.as_deref() == Some(hazard_id) && !self.is_resistant_at(block)
    }
}
