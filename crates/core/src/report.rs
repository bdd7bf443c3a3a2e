//! Per-table outcomes aggregated into a run summary.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::coerce::RowCoercionError;

/// Terminal status of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every table loaded; row-level skips are still allowed.
    Success,
    /// At least one table loaded and at least one failed entirely.
    Partial,
    /// Nothing loaded.
    Failed,
}

impl RunStatus {
    /// Process exit code for the scheduling layer: non-zero whenever the
    /// run was not a full success, with PARTIAL distinguishable.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Partial => 2,
            Self::Failed => 1,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Success => "SUCCESS",
            Self::Partial => "PARTIAL",
            Self::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

/// Outcome of one table in one run.
#[derive(Debug, Clone, Serialize)]
pub struct LoadResult {
    pub table: &'static str,
    pub scope: String,
    /// Data rows read from the snapshot.
    pub attempted: usize,
    /// Rows committed by the table's transaction.
    pub loaded: usize,
    /// Rows excluded by row-level coercion failures.
    pub skipped: usize,
    /// Snapshot-only columns dropped during reconciliation.
    pub dropped_columns: Vec<String>,
    /// Every recorded row-level failure; display is bounded, this is not.
    pub row_errors: Vec<RowCoercionError>,
    /// Table-level failure, when the whole table rolled back.
    pub error: Option<String>,
}

impl LoadResult {
    pub fn new(table: &'static str, scope: impl Into<String>) -> Self {
        Self {
            table,
            scope: scope.into(),
            attempted: 0,
            loaded: 0,
            skipped: 0,
            dropped_columns: Vec::new(),
            row_errors: Vec::new(),
            error: None,
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregated result of one ingestion run.
#[derive(Debug, Serialize)]
pub struct IngestionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub tables: Vec<LoadResult>,
    #[serde(skip)]
    display_error_limit: usize,
}

impl IngestionReport {
    pub fn begin(display_error_limit: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            tables: Vec::new(),
            display_error_limit,
        }
    }

    pub fn record(&mut self, result: LoadResult) {
        self.tables.push(result);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn status(&self) -> RunStatus {
        let failed = self.tables.iter().filter(|t| t.failed()).count();
        let loaded = self.tables.len() - failed;
        if failed == 0 && loaded > 0 {
            RunStatus::Success
        } else if failed > 0 && loaded > 0 {
            RunStatus::Partial
        } else {
            RunStatus::Failed
        }
    }

    pub fn rows_attempted(&self) -> usize {
        self.tables.iter().map(|t| t.attempted).sum()
    }

    pub fn rows_loaded(&self) -> usize {
        self.tables.iter().map(|t| t.loaded).sum()
    }

    pub fn rows_skipped(&self) -> usize {
        self.tables.iter().map(|t| t.skipped).sum()
    }

    /// Emit the per-table summary to the log sink, errors bounded to the
    /// configured display limit per table.
    pub fn log_summary(&self) {
        info!("=== ingestion summary (run {}) ===", self.run_id);
        for table in &self.tables {
            if let Some(error) = &table.error {
                error!(
                    "{} [{}]: FAILED after {} row(s) read: {error}",
                    table.table, table.scope, table.attempted
                );
            } else {
                info!(
                    "{} [{}]: {}/{} loaded, {} skipped",
                    table.table, table.scope, table.loaded, table.attempted, table.skipped
                );
            }
            for row_error in table.row_errors.iter().take(self.display_error_limit) {
                warn!("{} [{}]: {row_error}", table.table, table.scope);
            }
            let hidden = table.row_errors.len().saturating_sub(self.display_error_limit);
            if hidden > 0 {
                warn!(
                    "{} [{}]: {hidden} further row error(s) not shown",
                    table.table, table.scope
                );
            }
        }
        let status = self.status();
        if status == RunStatus::Success {
            info!(
                "run {}: {} — {} rows loaded, {} skipped",
                self.run_id,
                status,
                self.rows_loaded(),
                self.rows_skipped()
            );
        } else {
            error!(
                "run {}: {} — {} rows loaded, {} skipped",
                self.run_id,
                status,
                self.rows_loaded(),
                self.rows_skipped()
            );
        }
    }
}
