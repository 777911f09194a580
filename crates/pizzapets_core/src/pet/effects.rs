//! Effect resolution: turning one feeding event into state changes.

use super::Pet;
use crate::derivation::{chance_for, decimal_for_hash, random_number_for};
use crate::effect::{is_set, Effect, HealthIncrement, Immediate};
use crate::error::{EngineError, Result};
use crate::input::Feeding;
use crate::rules::ItemRule;
use pizzapets_data::{HistoryEvent, HistoryKind, ResistanceWindow};
use std::sync::Arc;

impl Pet {
    /// Applies every item a feeding event carries, in catalog order.
    ///
    /// Buff clears requested along the way run once, after the last item.
    pub fn process_feeding(&mut self, feeding: &Feeding) -> Result<()> {
        let rules = Arc::clone(&self.rules);
        let mut clear_buffs = false;
        for item in rules.items_for(&feeding.id) {
            if self.limit_reached(item) {
                tracing::debug!(item = %item.description, "Item limit reached");
                continue;
            }
            self.apply_item(item, feeding, &mut clear_buffs)?;
        }
        if clear_buffs {
            self.clear_buffs();
        }
        Ok(())
    }

    /// Counts an attempt and reports whether the item was already used up.
    fn limit_reached(&mut self, item: &ItemRule) -> bool {
        let Some(limit) = item.limit else {
            return false;
        };
        let used = self.limits.entry(item.description.clone()).or_insert(0);
        let previous = *used;
        *used += 1;
        previous >= limit
    }

    fn apply_item(&mut self, item: &ItemRule, feeding: &Feeding, clear_buffs: &mut bool) -> Result<()> {
        self.history.push(HistoryEvent {
            kind: HistoryKind::Item,
            height: feeding.height,
            id: Some(feeding.id.clone()),
            description: item.description.clone(),
            emoji: item.emoji.clone(),
        });

        if item.buff {
            self.install_buff(item, feeding.height);
        } else if item.clear_buffs {
            *clear_buffs = true;
        }

        self.apply_effects(item, &item.effects, feeding, clear_buffs)
    }

    fn apply_effects(
        &mut self,
        item: &ItemRule,
        effects: &[Effect],
        feeding: &Feeding,
        clear_buffs: &mut bool,
    ) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Behavior { field, value } => {
                    let value = if item.buff {
                        self.buff_product(*field)
                    } else {
                        *value
                    };
                    self.behavior.set(*field, value);
                }
                Effect::StateScoped(stages) => {
                    if let Some(scoped) = stages.get(self.state.stage_index) {
                        self.apply_effects(item, scoped, feeding, clear_buffs)?;
                    }
                }
                Effect::HealthIncrement(increment) => self.increment_health(increment)?,
                Effect::ExcrementablePercentage(percentage) => {
                    self.schedule_excrement(*percentage, feeding);
                }
                Effect::ClearExcrement(true) => self.state.excrement = 0,
                Effect::ClearExcrement(false) | Effect::ClearBuffs(_) => {}
                Effect::EvolutionOffset(offset) => {
                    if *offset != 0 {
                        self.offset_stage(*offset, clear_buffs);
                    }
                }
                Effect::DeathIn(blocks) => {
                    let at = feeding.height as f64 + blocks;
                    if at.fract() != 0.0 {
                        // A fractional death block is never reached.
                        tracing::warn!(item = %item.description, blocks, "Ignoring fractional death_in");
                    } else if at.is_finite() && at >= 0.0 {
                        let at = at as u64;
                        self.state.death_at = Some(self.state.death_at.map_or(at, |d| d.min(at)));
                    }
                }
                Effect::DoomsdayDeviceResistanceFor(blocks) => {
                    let to = feeding.height as f64 + blocks;
                    self.state.resistance = Some(ResistanceWindow {
                        from: feeding.height,
                        to: if to.is_finite() && to > 0.0 { to as u64 } else { 0 },
                    });
                }
                Effect::RegenerateType(true) => self.regenerate_type(feeding)?,
                Effect::RegenerateType(false) => {}
                Effect::Immediate { kind, percentage } => {
                    if is_set(*percentage) {
                        let number = decimal_for_hash(&feeding.hashed_id, self.state.counter);
                        let flag = match kind {
                            Immediate::Excrement => &mut self.state.immediate.excrement,
                            Immediate::Death => &mut self.state.immediate.death,
                            Immediate::Evolve => &mut self.state.immediate.evolve,
                        };
                        if !*flag {
                            *flag = chance_for(*percentage, number);
                        }
                    }
                }
                Effect::Unknown(name) => return Err(EngineError::UnknownEffect(name.clone())),
            }
        }
        Ok(())
    }

    fn increment_health(&mut self, increment: &HealthIncrement) -> Result<()> {
        match increment {
            HealthIncrement::Max => self.state.health = self.hearts(),
            HealthIncrement::Amount(amount) => {
                self.state.health += amount;
                self.clamp_health();
            }
            HealthIncrement::Invalid(raw) => {
                return Err(EngineError::InvalidHealthIncrement(raw.clone()));
            }
        }
        self.state.counter = 0;
        Ok(())
    }

    /// Rolls for a future excretion and, on success, queues it within
    /// `excrement_within` blocks scaled by the excrement rate.
    fn schedule_excrement(&mut self, percentage: f64, feeding: &Feeding) {
        let rate = self.behavior.excrement_rate;
        if !is_set(percentage) || !is_set(rate) {
            return;
        }
        let counter = self.state.counter;
        let number = decimal_for_hash(&feeding.hashed_id, counter);
        if !chance_for(percentage, number) {
            return;
        }
        let within = self.behavior.excrement_within.max(0.0) as u64;
        let blocks = random_number_for(within, &feeding.hashed_id, counter, false);
        let delay = (blocks as f64 / rate).floor().max(0.0) as u64;
        self.state.excrement_at.push(feeding.height + delay);
        self.state.excrement_at.sort_unstable();
    }

    fn offset_stage(&mut self, offset: i64, clear_buffs: &mut bool) {
        self.set_stage_index(self.state.stage_index as i64 + offset);
        if self.is_initial_stage() {
            self.behavior.health_decrement_at =
                self.block_in_progress as f64 + self.behavior.evolution_at(0);
            self.state.counter = 0;
            *clear_buffs = true;
        }
        self.clamp_health();
    }

    fn regenerate_type(&mut self, feeding: &Feeding) -> Result<()> {
        let number = decimal_for_hash(&feeding.hashed_id, self.state.counter);
        let previous = self.pet_type.clone();
        let next = self
            .rules
            .pick_type(number, Some(&previous))
            .ok_or_else(|| EngineError::MissingType(previous.clone()))?;
        self.pet_type = next.clone();
        self.record(
            feeding.height,
            HistoryKind::TypeChange,
            None,
            &[("previous_type", previous.as_str()), ("type", next.as_str())],
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EngineError;
    use crate::test_support::{bind, configuration, feeding};
    use pizzapets_data::{Configuration, HistoryKind};

    fn started(config: Configuration) -> crate::pet::Pet {
        let mut pet = bind(config, "pet");
        pet.set_stage_index(0);
        pet.state.health = pet.hearts();
        pet.state.counter = 1;
        pet
    }

    #[test]
    fn test_health_increment_max_resets_counter() {
        let mut pet = started(configuration());
        pet.set_stage_index(1);
        pet.state.health = 0.5;
        pet.process_feeding(&feeding("001aa", 10)).unwrap();
        assert_eq!(pet.state().health, 3.0);
        assert_eq!(pet.state().counter, 0);
        let last = pet.history().last().unwrap();
        assert_eq!(last.kind, HistoryKind::Item);
        assert_eq!(last.id.as_deref(), Some("001aa"));
    }

    #[test]
    fn test_rejected_event_records_nothing() {
        let mut pet = started(configuration());
        let before = pet.history().len();
        pet.process_feeding(&feeding("003aa", 10)).unwrap();
        assert_eq!(pet.history().len(), before);
    }

    #[test]
    fn test_limit_blocks_after_uses() {
        let mut pet = started(configuration());
        for height in [10, 11, 12] {
            pet.process_feeding(&feeding("040aa", height)).unwrap();
        }
        let uses = pet
            .history()
            .iter()
            .filter(|h| h.description == "Crust")
            .count();
        assert_eq!(uses, 2);
    }

    #[test]
    fn test_excrement_schedule_stays_sorted() {
        let mut pet = started(configuration());
        pet.process_feeding(&feeding("040aa", 50)).unwrap();
        pet.process_feeding(&feeding("040bb", 10)).unwrap();
        let queue = &pet.state().excrement_at;
        assert_eq!(queue.len(), 2);
        assert!(queue.windows(2).all(|w| w[0] <= w[1]));
        assert!(queue[0] >= 10);
    }

    #[test]
    fn test_unknown_effect_aborts() {
        let mut config = configuration();
        let mut item = config.items.get("001").unwrap().clone();
        item.effects.insert("teleport", serde_json::json!(1));
        config.items.insert("001", item);
        let mut pet = started(config);
        let err = pet.process_feeding(&feeding("001aa", 10)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownEffect(name) if name == "teleport"));
    }

    #[test]
    fn test_invalid_health_increment_aborts() {
        let mut config = configuration();
        let mut item = config.items.get("001").unwrap().clone();
        item.effects.insert("health_increment", serde_json::json!("lots"));
        config.items.insert("001", item);
        let mut pet = started(config);
        assert!(matches!(
            pet.process_feeding(&feeding("001aa", 10)),
            Err(EngineError::InvalidHealthIncrement(_))
        ));
    }

    #[test]
    fn test_death_in_keeps_earliest() {
        let mut pet = started(configuration());
        pet.process_feeding(&feeding("080aa", 10)).unwrap();
        assert_eq!(pet.state().death_at, Some(30));
        pet.process_feeding(&feeding("080bb", 5)).unwrap();
        assert_eq!(pet.state().death_at, Some(25));
        pet.process_feeding(&feeding("080cc", 40)).unwrap();
        assert_eq!(pet.state().death_at, Some(25));
    }

    #[test]
    fn test_fractional_death_in_is_never_scheduled() {
        let mut config = configuration();
        let mut item = config.items.get("080").unwrap().clone();
        item.effects.insert("death_in", serde_json::json!(2.5));
        config.items.insert("080", item);
        let mut pet = started(config);
        pet.process_feeding(&feeding("080aa", 10)).unwrap();
        assert_eq!(pet.state().death_at, None);
        assert_eq!(pet.history().last().unwrap().description, "Ghost Pepper");
    }

    #[test]
    fn test_deferred_clear_runs_after_item() {
        let mut pet = started(configuration());
        pet.process_feeding(&feeding("008aa", 3)).unwrap();
        assert_eq!(pet.buffs().len(), 1);
        assert_eq!(pet.behavior().evolution_rate, 0.5);
        pet.process_feeding(&feeding("010aa", 4)).unwrap();
        assert!(pet.buffs().is_empty());
        assert_eq!(pet.behavior().evolution_rate, 1.0);
    }

    #[test]
    fn test_evolution_offset_to_zero_reanchors_decay() {
        let mut pet = started(configuration());
        pet.set_stage_index(1);
        pet.block_in_progress = 40;
        pet.process_feeding(&feeding("008aa", 140)).unwrap();
        pet.process_feeding(&feeding("100aa", 140)).unwrap();
        assert_eq!(pet.state().stage_index, 0);
        assert_eq!(pet.behavior().health_decrement_at, 50.0);
        assert_eq!(pet.state().counter, 0);
        assert!(pet.buffs().is_empty());
        assert!(pet
            .history()
            .iter()
            .any(|h| h.kind == HistoryKind::Devolution));
    }

    #[test]
    fn test_resistance_window_opens_at_event() {
        let mut pet = started(configuration());
        pet.process_feeding(&feeding("004aa", 20)).unwrap();
        let window = pet.state().resistance.unwrap();
        assert_eq!((window.from, window.to), (20, 25));
    }

    #[test]
    fn test_regenerate_type_picks_another() {
        let mut pet = started(configuration());
        let before = pet.pet_type().to_string();
        pet.process_feeding(&feeding("200aa", 20)).unwrap();
        assert_ne!(pet.pet_type(), before);
        let change = pet
            .history()
            .iter()
            .find(|h| h.kind == HistoryKind::TypeChange)
            .unwrap();
        assert_eq!(change.height, 20);
    }

    #[test]
    fn test_immediate_flag_latches() {
        let mut pet = started(configuration());
        pet.process_feeding(&feeding("400aa", 20)).unwrap();
        assert!(pet.state().immediate.death);
    }
}
