//! Observation cycle: fetch inputs, replay, keep the result.

use crate::input::ReplayInput;
use crate::metrics::ReplayMetrics;
use crate::pet::Pet;
use crate::rules::Rules;
use crate::source::PetSource;
use anyhow::{Context, Result};
use pizzapets_data::EventMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Watches one pet through a [`PetSource`].
///
/// The rules document is fetched and compiled on the first update and
/// kept afterwards. Every later update re-runs the full replay, unless
/// the clock has not moved.
pub struct Observer<S: PetSource> {
    source: S,
    inscription_id: String,
    rules: Option<Arc<Rules>>,
    pet: Option<Pet>,
    block_height: Option<u64>,
    metrics: ReplayMetrics,
}

impl<S: PetSource> Observer<S> {
    pub fn new(source: S, inscription_id: impl Into<String>) -> Self {
        Self {
            source,
            inscription_id: inscription_id.into(),
            rules: None,
            pet: None,
            block_height: None,
            metrics: ReplayMetrics::new(),
        }
    }

    /// Creates an observer and runs its first update.
    pub async fn observe(source: S, inscription_id: impl Into<String>) -> Result<Self> {
        let mut observer = Self::new(source, inscription_id);
        observer.update().await?;
        Ok(observer)
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn inscription_id(&self) -> &str {
        &self.inscription_id
    }

    /// The pet as of the last successful update.
    #[must_use]
    pub fn pet(&self) -> Option<&Pet> {
        self.pet.as_ref()
    }

    #[must_use]
    pub fn metrics(&self) -> &ReplayMetrics {
        &self.metrics
    }

    /// Polling interval suggested by the rules document, once loaded.
    #[must_use]
    pub fn poll_delay(&self) -> Option<u64> {
        self.rules.as_ref().and_then(|rules| rules.poll_delay)
    }

    async fn rules(&mut self) -> Result<Arc<Rules>> {
        if let Some(rules) = &self.rules {
            return Ok(Arc::clone(rules));
        }
        let configuration = self
            .source
            .configuration()
            .await
            .context("fetching configuration")?;
        let rules = Arc::new(Rules::compile(&configuration)?);
        tracing::info!(fingerprint = %rules.fingerprint(), "Loaded rules");
        self.rules = Some(Arc::clone(&rules));
        Ok(rules)
    }

    /// Whether the source clock differs from the last observed height.
    pub async fn can_update(&self) -> Result<bool> {
        let height = self.source.block_height().await?;
        Ok(self.block_height != Some(height))
    }

    /// Replays at the source's current height. Returns `false` when the
    /// height has not changed since the last update.
    pub async fn update(&mut self) -> Result<bool> {
        let height = self.source.block_height().await?;
        self.update_at(height).await
    }

    /// Replays at an explicit height.
    pub async fn update_at(&mut self, block_height: u64) -> Result<bool> {
        if self.block_height == Some(block_height) {
            return Ok(false);
        }
        let rules = self.rules().await?;
        let mut pet = match self.pet.take() {
            Some(pet) if pet.inscription_id() == self.inscription_id => pet,
            _ => Pet::bind(Arc::clone(&rules), self.inscription_id.as_str())?,
        };

        let (children, hazard_events) = futures::try_join!(
            self.source.children(&self.inscription_id),
            hazard_children(&self.source, &rules),
        )?;
        let input = ReplayInput::assemble(
            &rules,
            pet.fingerprint(),
            block_height,
            &children,
            &hazard_events,
        );

        let started = Instant::now();
        pet.replay(&input)
            .with_context(|| format!("replaying {}", self.inscription_id))?;
        self.metrics.record_run(started.elapsed(), pet.blocks_replayed());

        self.pet = Some(pet);
        self.block_height = Some(block_height);
        Ok(true)
    }

    /// Switches to another pet; the next update re-runs from scratch.
    pub fn update_inscription_id(&mut self, inscription_id: impl Into<String>) {
        self.inscription_id = inscription_id.into();
        self.pet = None;
        self.block_height = None;
    }
}

/// Children of every hazard in the catalog, fetched concurrently.
async fn hazard_children<S: PetSource>(source: &S, rules: &Rules) -> Result<BTreeMap<String, EventMap>> {
    let fetches = rules.hazards.iter().map(|hazard| async move {
        let events = source.children(&hazard.id).await?;
        Ok::<_, anyhow::Error>((hazard.id.clone(), events))
    });
    Ok(futures::future::try_join_all(fetches)
        .await?
        .into_iter()
        .collect())
}
