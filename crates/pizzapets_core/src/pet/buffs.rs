//! Buff ledger.

use super::Pet;
use crate::behavior::BehaviorField;
use crate::rules::{ItemRule, Rules};
use pizzapets_data::Buff;
use std::sync::Arc;

impl Pet {
    /// Installs a buff, replacing any active buff with the same glyph.
    pub(crate) fn install_buff(&mut self, item: &ItemRule, height: u64) {
        self.buffs.retain(|buff| buff.emoji != item.emoji);
        self.buffs.push(Buff {
            item_key: item.key.clone(),
            description: item.description.clone(),
            emoji: item.emoji.clone(),
            height,
        });
    }

    /// Drops resistance buffs whose window ended before `block`.
    pub(crate) fn remove_expired_buffs(&mut self, block: u64) {
        let rules = Arc::clone(&self.rules);
        let stage = self.state.stage_index;
        self.buffs.retain(|buff| match resistance_of(&rules, buff, stage) {
            Some(duration) => block as f64 <= buff.height as f64 + duration,
            None => true,
        });
    }

    /// Drops every buff that does not grant resistance, restores the base
    /// rates and cancels any scheduled death.
    pub fn clear_buffs(&mut self) {
        let rules = Arc::clone(&self.rules);
        let stage = self.state.stage_index;
        self.buffs
            .retain(|buff| resistance_of(&rules, buff, stage).is_some());

        let base = &rules.behavior;
        self.behavior.evolution_rate = base.evolution_rate;
        self.behavior.excrement_rate = base.excrement_rate;
        self.behavior.health_decline_rate = base.health_decline_rate;
        self.state.death_at = None;
    }

    /// Product of a behavior field across all active buffs; buffs that do
    /// not touch the field contribute 1.
    #[must_use]
    pub fn buff_product(&self, field: BehaviorField) -> f64 {
        self.buffs
            .iter()
            .map(|buff| {
                self.rules
                    .item(&buff.item_key)
                    .and_then(|item| item.behavior_value_at(self.state.stage_index, field))
                    .unwrap_or(1.0)
            })
            .product()
    }
}

/// Duration of the resistance a buff grants at `stage`, if any.
fn resistance_of(rules: &Rules, buff: &Buff, stage: usize) -> Option<f64> {
    rules
        .item(&buff.item_key)
        .and_then(|item| item.resistance_at(stage))
}
