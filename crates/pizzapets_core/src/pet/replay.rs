//! The block-by-block replay loop.

use super::Pet;
use crate::error::Result;
use crate::input::ReplayInput;
use pizzapets_data::HistoryKind;

impl Pet {
    /// Replays the pet's whole life up to `input.block_height`.
    ///
    /// Each block runs, in order: stage countdown, buff expiry, feedings,
    /// hazard cooldown/trigger/explosion, death check, evolution,
    /// excretion, health decay, decay counter. Death checks are skipped
    /// inside death-fixup ranges.
    pub fn replay(&mut self, input: &ReplayInput) -> Result<()> {
        self.reset();
        self.block_height = input.block_height;
        self.set_stage_index(0);
        self.state.health = self.hearts();
        self.state.counter = 1;

        let elapsed = self.elapsed_blocks().max(0) as u64;
        let mut block = self.start_block;

        for i in 1..=elapsed {
            self.block_in_progress = i;
            block = self.absolute_block_in_progress();

            self.decrement_countdown();
            let countdown = self.blocks_until_next_state();

            self.remove_expired_buffs(block);
            if self.past_health_decrement_at(i) {
                for feeding in input.feedings_at(block) {
                    self.process_feeding(feeding)?;
                }
            }

            self.cool_down_hazards(block);
            self.trigger_hazards(block, &input.hazards);
            let affected = self.explode_hazards(block, &input.hazards);

            let in_fixup = self.rules.is_in_death_fixup_range(block);
            if !in_fixup
                && (self.state.immediate.death || self.state.death_at == Some(block) || affected)
            {
                tracing::debug!(
                    block,
                    immediate = self.state.immediate.death,
                    scheduled = self.state.death_at == Some(block),
                    hazard = affected,
                    "Pet died"
                );
                self.state.health = 0.0;
                break;
            }

            if !self.is_final_stage() && (self.state.immediate.evolve || countdown == 0) {
                self.state.immediate.evolve = false;
                self.set_stage_index(self.state.stage_index as i64 + 1);
            }

            if self.take_due_excrement(block) {
                self.state.excrement += 1;
                self.record(block, HistoryKind::Excrement, None, &[]);
                tracing::debug!(block, excrement = self.state.excrement, "Excreted");
            }

            if !in_fixup && self.should_decrement_health() {
                if self.state.counter != 0 {
                    self.decrement_health();
                }
                if self.state.health <= 0.0 {
                    self.state.health = 0.0;
                    break;
                }
            }

            if self.past_health_decrement_at(i) {
                self.state.counter += 1;
            }
        }

        if self.state.health == 0.0 && !self.rules.is_in_death_fixup_range(block) {
            self.record_death(block);
        }

        tracing::info!(
            inscription_id = %self.inscription_id,
            blocks = self.block_in_progress,
            stage = %self.rules.stage_name(self.state.stage_index),
            alive = self.is_alive(),
            "Replay finished"
        );
        Ok(())
    }

    fn past_health_decrement_at(&self, i: u64) -> bool {
        i as f64 >= self.behavior.health_decrement_at
    }

    /// Consumes the immediate-excretion flag or pops a due scheduled one.
    fn take_due_excrement(&mut self, block: u64) -> bool {
        if self.state.immediate.excrement {
            self.state.immediate.excrement = false;
            return true;
        }
        match self.state.excrement_at.first() {
            Some(&at) if at <= block => {
                self.state.excrement_at.remove(0);
                true
            }
            _ => false,
        }
    }

    /// Records the death, retracting an evolution into the final stage
    /// that happened on the same block.
    fn record_death(&mut self, block: u64) {
        let retract = self.history.last().is_some_and(|last| {
            last.height == block && last.kind == HistoryKind::Evolution && self.is_final_stage()
        });
        if retract {
            self.history.pop();
            self.record(block, HistoryKind::DeathDuringImmortalEvolution, None, &[]);
        } else {
            self.record(block, HistoryKind::Death, None, &[]);
        }
    }
}
