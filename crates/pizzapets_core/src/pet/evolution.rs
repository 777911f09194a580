//! Stage transitions, the stage countdown and health decay.

use super::Pet;
use crate::effect::is_set;
use pizzapets_data::{HealthComponents, HistoryKind};

impl Pet {
    #[must_use]
    pub fn is_initial_stage(&self) -> bool {
        self.state.stage_index == 0
    }

    #[must_use]
    pub fn is_final_stage(&self) -> bool {
        self.state.stage_index == self.rules.final_stage()
    }

    /// Moves the pet to `value`, clamped to the configured stages.
    ///
    /// The first assignment of a run records START; later ones record
    /// EVOLUTION or DEVOLUTION when the index actually changes. Either way
    /// the countdown restarts from the stage's threshold and the stage's
    /// behavior overrides are merged in. Entering the final stage clears
    /// buffs.
    pub fn set_stage_index(&mut self, value: i64) {
        let max = self.rules.final_stage();
        let value = value.clamp(0, max as i64) as usize;
        let previous = self.state.stage_index;

        if value == 0 && self.history.is_empty() {
            let pet_type = self.pet_type.clone();
            self.record(self.start_block, HistoryKind::Start, None, &[("type", pet_type.as_str())]);
        } else if value != previous {
            let kind = if value > previous {
                HistoryKind::Evolution
            } else {
                HistoryKind::Devolution
            };
            let rules = self.rules.clone();
            let block = self.absolute_block_in_progress();
            self.record(
                block,
                kind,
                None,
                &[
                    ("previous_state", rules.stage_name(previous)),
                    ("state", rules.stage_name(value)),
                ],
            );
            tracing::debug!(block, from = previous, to = value, "Stage changed");
        }

        self.state.stage_index = value;
        self.countdown = self.behavior.evolution_at(value);

        let rules = self.rules.clone();
        if let Some(stage) = rules.stages.get(value) {
            for &(field, override_value) in &stage.overrides {
                self.behavior.set(field, override_value);
            }
        }

        if value == max {
            self.clear_buffs();
        }
        self.clamp_health();
    }

    pub(crate) fn decrement_countdown(&mut self) {
        self.countdown -= self.behavior.evolution_rate;
        if self.countdown < 0.0 {
            self.countdown = 0.0;
        }
    }

    /// Rate-adjusted blocks left in the current stage, or -1 when the pet
    /// will not evolve again.
    ///
    /// A zero evolution rate freezes every stage but the first; at stage 0
    /// it reads as rate 1. Before the game starts this counts down to the
    /// birth block instead.
    #[must_use]
    pub fn blocks_until_next_state(&self) -> i64 {
        let rate = self.behavior.evolution_rate;
        if (!is_set(rate) && !self.is_initial_stage()) || self.is_final_stage() || !self.is_alive() {
            return -1;
        }
        let blocks = if self.has_game_started() {
            self.countdown
        } else {
            self.start_block.saturating_sub(self.block_height) as f64
        };
        let rate = if is_set(rate) { rate } else { 1.0 };
        ((1.0 / rate) * blocks).ceil() as i64
    }

    /// Blocks between health decrements, shrinking by 1.5x per uncleaned
    /// excretion. `None` right after a feeding or when decay is off.
    #[must_use]
    pub fn blocks_for_health_decline(&self) -> Option<u64> {
        let rate = self.behavior.health_decline_rate;
        if self.state.counter == 0 || !is_set(rate) {
            return None;
        }
        let mut fraction = 1.0 / rate;
        for _ in 0..self.state.excrement {
            fraction /= 1.5;
        }
        let blocks = (self.behavior.health_decrement_interval * fraction).ceil();
        if !blocks.is_finite() || blocks < 1.0 {
            return None;
        }
        Some(blocks as u64)
    }

    pub(crate) fn should_decrement_health(&self) -> bool {
        if (self.block_in_progress as f64) < self.behavior.health_decrement_at || self.is_final_stage() {
            return false;
        }
        self.blocks_for_health_decline()
            .is_some_and(|blocks| self.state.counter % blocks == 0)
    }

    /// Subtracts one decrement and snaps the fractional part back onto the
    /// decrement grid.
    pub(crate) fn decrement_health(&mut self) {
        self.state.health -= self.behavior.health_decrement_amount;
        let components = self.health_components();
        self.state.health = components.whole + components.fraction;
    }

    #[must_use]
    pub fn health_components(&self) -> HealthComponents {
        let amount = self.behavior.health_decrement_amount;
        let health = self.state.health;
        let whole = health.floor();
        let raw_fraction = health - whole;
        let fraction = if is_set(amount) {
            (raw_fraction / amount).round() * amount
        } else {
            raw_fraction
        };
        HealthComponents {
            count: self.hearts(),
            whole,
            fraction,
            ceil: health.ceil(),
            decrement_amount: amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{bind, configuration};
    use pizzapets_data::HistoryKind;

    #[test]
    fn test_stage_index_is_clamped() {
        let mut pet = bind(configuration(), "pet");
        pet.set_stage_index(0);
        pet.set_stage_index(99);
        assert_eq!(pet.state().stage_index, 2);
        pet.set_stage_index(-5);
        assert_eq!(pet.state().stage_index, 0);
    }

    #[test]
    fn test_first_assignment_records_start() {
        let mut pet = bind(configuration(), "pet");
        pet.set_stage_index(0);
        pet.set_stage_index(1);
        pet.set_stage_index(0);
        let kinds: Vec<HistoryKind> = pet.history().iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![HistoryKind::Start, HistoryKind::Evolution, HistoryKind::Devolution]
        );
        assert_eq!(pet.history()[0].height, pet.start_block());
    }

    #[test]
    fn test_stage_overrides_are_merged() {
        let mut pet = bind(configuration(), "pet");
        pet.set_stage_index(0);
        assert_eq!(pet.behavior().excrement_rate, 1.0);
        pet.set_stage_index(1);
        assert_eq!(pet.behavior().excrement_rate, 2.0);
        pet.set_stage_index(0);
        // Overrides stick until another stage replaces them.
        assert_eq!(pet.behavior().excrement_rate, 2.0);
    }

    #[test]
    fn test_health_clamped_on_devolution() {
        let mut pet = bind(configuration(), "pet");
        pet.set_stage_index(0);
        pet.set_stage_index(1);
        pet.state.health = 3.0;
        pet.set_stage_index(0);
        assert_eq!(pet.state().health, 1.0);
    }

    #[test]
    fn test_decline_blocks_shrink_with_excrement() {
        let mut pet = bind(configuration(), "pet");
        pet.set_stage_index(0);
        pet.state.counter = 1;
        assert_eq!(pet.blocks_for_health_decline(), Some(10));
        pet.state.excrement = 1;
        assert_eq!(pet.blocks_for_health_decline(), Some(7));
        pet.state.excrement = 2;
        assert_eq!(pet.blocks_for_health_decline(), Some(5));
        pet.state.counter = 0;
        assert_eq!(pet.blocks_for_health_decline(), None);
    }

    #[test]
    fn test_decrement_snaps_fraction() {
        let mut pet = bind(configuration(), "pet");
        pet.set_stage_index(1);
        pet.state.health = 3.0;
        pet.decrement_health();
        assert_eq!(pet.state().health, 2.5);
        pet.state.health = 2.0 + 0.5000000001;
        pet.decrement_health();
        assert_eq!(pet.state().health, 2.0);
    }
}
