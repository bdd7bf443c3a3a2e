//! Run configuration.
//!
//! Everything the engine needs is passed in explicitly at construction;
//! there is no ambient environment lookup inside the engine, so two runs
//! against disjoint scopes can coexist in one process.

use std::path::PathBuf;
use std::time::Duration;

/// Database settings handed to the storage layer.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Path of the SQLite database file.
    pub path: PathBuf,
    /// Busy timeout applied to every pooled connection. A table
    /// transaction that exceeds it surfaces as a retryable timeout.
    pub busy_timeout: Duration,
}

impl DatabaseSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_millis(5_000),
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

/// Configuration for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Root of the snapshot tree deposited by the upstream fetcher.
    pub data_root: PathBuf,
    /// Season folder name under the data root, e.g. `2025-2026`.
    pub season: String,
    pub database: DatabaseSettings,
    /// How many recorded errors per table the summary prints. The full
    /// list is always kept on the report.
    pub display_error_limit: usize,
}

impl IngestionConfig {
    pub fn new(
        data_root: impl Into<PathBuf>,
        season: impl Into<String>,
        database: DatabaseSettings,
    ) -> Self {
        Self {
            data_root: data_root.into(),
            season: season.into(),
            database,
            display_error_limit: 5,
        }
    }
}
