//! The runner: drives an observer, prints reports and appends history.

use anyhow::Result;
use pizzapets_core::{Observer, Pet, PetSource};
use pizzapets_data::PetSnapshot;
use pizzapets_io::HistoryWriter;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

use crate::settings::{OutputFormat, Settings};

/// Everything printed about a pet after one observation.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Report {
    #[serde(flatten)]
    pub snapshot: PetSnapshot,
    pub living_state: String,
    pub days_until_next_state: f64,
    pub grave_message: Option<String>,
    pub thumbnail_hash: String,
}

impl Report {
    #[must_use]
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            snapshot: pet.snapshot(),
            living_state: pet.living_state(),
            days_until_next_state: pet.days_until_next_state(),
            grave_message: if pet.is_alive() {
                None
            } else {
                pet.grave_message()
            },
            thumbnail_hash: pet.thumbnail_hash(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let s = &self.snapshot;
        let mut out = String::new();
        let _ = writeln!(out, "{} ({}) {}", s.inscription_id, s.pet_type, self.living_state);
        let _ = writeln!(out, "height: {} (born at {})", s.block_height, s.start_block);
        let _ = writeln!(
            out,
            "stage: {} | health: {}/{} | excrement: {}",
            s.state.as_deref().unwrap_or("unborn"),
            s.health,
            s.hearts,
            s.excrement
        );
        if s.blocks_until_next_state >= 0 {
            let _ = writeln!(
                out,
                "next stage in {} blocks ({} days)",
                s.blocks_until_next_state, self.days_until_next_state
            );
        }
        let _ = writeln!(out, "weakness: {}", s.weakness.as_deref().unwrap_or("none"));
        if let Some(window) = s.resistance {
            let _ = writeln!(out, "resistant: blocks {}..={}", window.from, window.to);
        }
        if !s.buffs.is_empty() {
            let buffs: Vec<String> = s
                .buffs
                .iter()
                .map(|b| format!("{} {}", b.emoji, b.description))
                .collect();
            let _ = writeln!(out, "buffs: {}", buffs.join(", "));
        }
        if let Some(message) = &self.grave_message {
            let _ = writeln!(out, "grave: {}", message);
        }
        let _ = writeln!(out, "history:");
        for event in &s.history {
            let _ = writeln!(out, "  #{} {} {}", event.height, event.emoji, event.description);
        }
        out
    }
}

pub struct Runner<S: PetSource> {
    observer: Observer<S>,
    settings: Settings,
    history: HistoryWriter,
}

impl<S: PetSource> Runner<S> {
    pub fn new(source: S, inscription_id: &str, settings: Settings) -> Result<Self> {
        let history = match &settings.history_out {
            Some(path) => HistoryWriter::open(path)?,
            None => HistoryWriter::new_dummy(),
        };
        Ok(Self {
            observer: Observer::new(source, inscription_id),
            settings,
            history,
        })
    }

    #[must_use]
    pub fn observer(&self) -> &Observer<S> {
        &self.observer
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Polling interval: the rules document's, else the settings'.
    #[must_use]
    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(
            self.observer
                .poll_delay()
                .unwrap_or(self.settings.poll_delay_ms),
        )
    }

    /// Runs one observation, at `height` when given. Returns a report only
    /// when the pet was replayed.
    pub async fn run_once(&mut self, height: Option<u64>) -> Result<Option<Report>> {
        let updated = match height {
            Some(height) => self.observer.update_at(height).await?,
            None => self.observer.update().await?,
        };
        if !updated {
            return Ok(None);
        }
        let Some(pet) = self.observer.pet() else {
            return Ok(None);
        };
        let written = self.history.append_new(pet.history())?;
        tracing::debug!(written, "History appended");
        Ok(Some(Report::from_pet(pet)))
    }

    /// Polls until Ctrl+C, or for `max_rounds` rounds when given, handing
    /// every fresh report to `on_report`. Failed rounds are logged and
    /// retried on the next tick.
    pub async fn watch<F>(&mut self, max_rounds: Option<u64>, mut on_report: F) -> Result<()>
    where
        F: FnMut(&Report),
    {
        let mut rounds = 0u64;
        loop {
            match self.run_once(None).await {
                Ok(Some(report)) => on_report(&report),
                Ok(None) => tracing::debug!("Clock unchanged"),
                Err(e) => tracing::warn!(error = %e, "Observation failed"),
            }
            rounds += 1;
            if max_rounds.is_some_and(|max| rounds >= max) {
                break;
            }
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, stopping watch");
                    break;
                }
                _ = tokio::time::sleep(self.poll_delay()) => {}
            }
        }
        Ok(())
    }
}
