use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How a replay result is printed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Runner settings, read from `pizzapets.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    /// Fixture file used as the data source.
    pub fixture: String,
    pub inscription_id: Option<String>,
    /// Watch-mode polling interval when the rules document names none.
    pub poll_delay_ms: u64,
    pub format: OutputFormat,
    /// JSON-lines file history entries are appended to.
    pub history_out: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fixture: "fixture.json".to_string(),
            inscription_id: None,
            poll_delay_ms: 10_000,
            format: OutputFormat::Text,
            history_out: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            matches!(
                self.log_level.to_lowercase().as_str(),
                "trace" | "debug" | "info" | "warn" | "error" | "off"
            ),
            "Unknown log level {:?}",
            self.log_level
        );
        anyhow::ensure!(!self.fixture.is_empty(), "Fixture path must not be empty");
        anyhow::ensure!(
            self.poll_delay_ms >= 100,
            "Poll delay too short (min 100ms)"
        );
        if let Some(id) = &self.inscription_id {
            anyhow::ensure!(!id.is_empty(), "Inscription id must not be empty");
        }
        Ok(())
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let settings = toml::from_str::<Self>(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from `path`; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("reading settings from {:?}", path.as_ref()))),
        }
    }
}
