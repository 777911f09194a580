//! The data-source boundary.
//!
//! Everything a replay needs from the outside world comes through
//! [`PetSource`]: the clock, the rules document and paginated children
//! listings. Network clients live outside this crate.

use anyhow::Result;
use async_trait::async_trait;
use pizzapets_data::{ChildrenPage, Configuration, EventMap, FeedingEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[async_trait]
pub trait PetSource: Send + Sync {
    /// Current chain height.
    async fn block_height(&self) -> Result<u64>;

    /// The rules document pets are replayed against.
    async fn configuration(&self) -> Result<Configuration>;

    /// One page of the children of an inscription.
    async fn children_page(&self, inscription_id: &str, page: u32) -> Result<ChildrenPage>;

    /// All children of an inscription, indexed by height, fetched page by
    /// page until the source reports no more.
    async fn children(&self, inscription_id: &str) -> Result<EventMap> {
        let mut mapping = EventMap::new();
        let mut page = 0;
        loop {
            let response = self.children_page(inscription_id, page).await?;
            let more = response.more;
            response.index_into(&mut mapping);
            if !more {
                break;
            }
            page += 1;
        }
        tracing::debug!(inscription_id, pages = page + 1, "Fetched children");
        Ok(mapping)
    }
}

/// A source held entirely in memory, paginating children like a real one.
pub struct InMemorySource {
    block_height: AtomicU64,
    configuration: Configuration,
    children: HashMap<String, Vec<FeedingEvent>>,
    page_size: usize,
}

impl InMemorySource {
    #[must_use]
    pub fn new(configuration: Configuration, block_height: u64) -> Self {
        Self {
            block_height: AtomicU64::new(block_height),
            configuration,
            children: HashMap::new(),
            page_size: 100,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Adds a child inscription; arrival order is insertion order.
    pub fn add_child(&mut self, parent: &str, id: &str, height: u64, timestamp: u64) {
        let children = self.children.entry(parent.to_string()).or_default();
        children.push(FeedingEvent {
            id: id.to_string(),
            height,
            timestamp,
            index: children.len(),
        });
    }

    pub fn set_block_height(&self, block_height: u64) {
        self.block_height.store(block_height, Ordering::Relaxed);
    }
}

#[async_trait]
impl PetSource for InMemorySource {
    async fn block_height(&self) -> Result<u64> {
        Ok(self.block_height.load(Ordering::Relaxed))
    }

    async fn configuration(&self) -> Result<Configuration> {
        Ok(self.configuration.clone())
    }

    async fn children_page(&self, inscription_id: &str, page: u32) -> Result<ChildrenPage> {
        let all = self
            .children
            .get(inscription_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let offset = page as usize * self.page_size;
        let children: Vec<FeedingEvent> = all.iter().skip(offset).take(self.page_size).cloned().collect();
        Ok(ChildrenPage {
            more: offset + children.len() < all.len(),
            children,
        })
    }
}
