//! Fixture files as a pet data source.
//!
//! A fixture is one JSON document holding everything a replay needs:
//!
//! ```json
//! {
//!   "block_height": 812345,
//!   "configuration": { "start": 812000, "hearts": [1, 3, 5], "...": "..." },
//!   "children": { "<inscription id>": [{ "id": "...", "height": 812010 }] }
//! }
//! ```
//!
//! Children of doomsday devices are listed under the device id like any
//! other inscription. A file-backed source reloads the document whenever
//! the clock is read, so editing `block_height` on disk drives watch mode.

use crate::error::{IoError, Result};
use crate::serialization::read_json_file;
use async_trait::async_trait;
use pizzapets_core::source::PetSource;
use pizzapets_data::{ChildrenPage, Configuration, FeedingEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Fixture {
    pub block_height: u64,
    pub configuration: Configuration,
    #[serde(default)]
    pub children: BTreeMap<String, Vec<FeedingEvent>>,
}

impl Fixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut fixture: Fixture = read_json_file(path)?;
        fixture.number_children();
        Ok(fixture)
    }

    /// Fills in arrival order for children listed without an `index`,
    /// keeping file order.
    fn number_children(&mut self) {
        for events in self.children.values_mut() {
            if events.iter().all(|event| event.index == 0) {
                for (index, event) in events.iter_mut().enumerate() {
                    event.index = index;
                }
            }
        }
    }
}

pub struct FixtureSource {
    path: Option<PathBuf>,
    fixture: RwLock<Fixture>,
}

impl FixtureSource {
    /// Opens a fixture file and keeps its path for reloads.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let fixture = Fixture::load(&path)?;
        tracing::info!(path = ?path, block_height = fixture.block_height, "Opened fixture");
        Ok(Self {
            path: Some(path),
            fixture: RwLock::new(fixture),
        })
    }

    /// A source over an in-memory fixture; the clock never moves on its own.
    #[must_use]
    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            path: None,
            fixture: RwLock::new(fixture),
        }
    }

    /// Re-reads the backing file, if any.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let fixture = Fixture::load(path)?;
        let mut current = self
            .fixture
            .write()
            .map_err(|_| IoError::fixture("lock poisoned"))?;
        *current = fixture;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Fixture) -> T) -> Result<T> {
        let fixture = self
            .fixture
            .read()
            .map_err(|_| IoError::fixture("lock poisoned"))?;
        Ok(f(&fixture))
    }
}

#[async_trait]
impl PetSource for FixtureSource {
    async fn block_height(&self) -> anyhow::Result<u64> {
        self.reload()?;
        Ok(self.read(|fixture| fixture.block_height)?)
    }

    async fn configuration(&self) -> anyhow::Result<Configuration> {
        Ok(self.read(|fixture| fixture.configuration.clone())?)
    }

    async fn children_page(&self, inscription_id: &str, _page: u32) -> anyhow::Result<ChildrenPage> {
        let children = self.read(|fixture| {
            fixture
                .children
                .get(inscription_id)
                .cloned()
                .unwrap_or_default()
        })?;
        Ok(ChildrenPage {
            children,
            more: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::write_json_file;

    fn fixture() -> Fixture {
        serde_json::from_value(serde_json::json!({
            "block_height": 150,
            "configuration": {
                "start": 100,
                "hearts": [1, 3],
                "behavior": {
                    "evolution_rate": 1,
                    "excrement_rate": 1,
                    "health_decline_rate": 1,
                    "health_decrement_amount": 0.5,
                    "health_decrement_interval": 10,
                    "health_decrement_at": 5,
                    "evolution_at": [10, 0],
                    "evolution_states": [{"name": "egg"}, {"name": "adult"}]
                },
                "doomsday_devices": {"difficulty": 0, "limit": 0, "mapping": {}}
            },
            "children": {
                "pet": [
                    {"id": "b", "height": 120},
                    {"id": "a", "height": 120},
                    {"id": "c", "height": 130}
                ]
            }
        }))
        .unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pizzapets_{}_{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_children_keep_file_order() {
        let mut fixture = fixture();
        fixture.number_children();
        let source = FixtureSource::from_fixture(fixture);
        let mapping = source.children("pet").await.unwrap();
        let ids: Vec<&str> = mapping[&120].iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(source.children("dd1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_source_reloads_clock() {
        let path = temp_path("reload");
        let mut fixture = fixture();
        write_json_file(&fixture, &path).unwrap();

        let source = FixtureSource::open(&path).unwrap();
        assert_eq!(source.block_height().await.unwrap(), 150);
        assert_eq!(source.configuration().await.unwrap().start, 100);

        fixture.block_height = 175;
        write_json_file(&fixture, &path).unwrap();
        assert_eq!(source.block_height().await.unwrap(), 175);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(FixtureSource::open(temp_path("missing")).is_err());
    }
}
