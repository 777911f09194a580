//! Replay metrics and logging setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Counters over every replay an observer has run.
pub struct ReplayMetrics {
    runs: AtomicU64,
    blocks: AtomicU64,
    last_duration_us: AtomicU64,
    start_time: Instant,
}

impl Default for ReplayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            blocks: AtomicU64::new(0),
            last_duration_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed replay.
    pub fn record_run(&self, duration: Duration, blocks: u64) {
        let runs = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        self.blocks.fetch_add(blocks, Ordering::Relaxed);
        self.last_duration_us
            .store(duration.as_micros() as u64, Ordering::Relaxed);

        tracing::debug!(
            runs,
            blocks,
            duration_us = duration.as_micros() as u64,
            "Replay timed"
        );
    }

    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Blocks walked across all runs.
    #[must_use]
    pub fn blocks(&self) -> u64 {
        self.blocks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_duration(&self) -> Duration {
        Duration::from_micros(self.last_duration_us.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over `level`
/// when set. Calling it twice is harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
