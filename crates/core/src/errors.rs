//! Error types for the ingestion engine.

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while locating snapshots and loading tables.
///
/// Only [`Error::DatasetNotFound`] and [`Error::Connection`] abort a run;
/// they can occur before any table is touched. Table-scoped errors are
/// caught by the engine and folded into the run report.
#[derive(Debug, Error)]
pub enum Error {
    /// No snapshot satisfied the locator's completeness predicate.
    #[error("dataset not found: {0}")]
    DatasetNotFound(String),

    /// The database was unreachable before the run started.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A column required by the table's key constraint is missing from
    /// the snapshot header. Scoped to one table.
    #[error("schema incompatible for table '{table}': key column '{column}' missing from snapshot")]
    SchemaIncompatible { table: String, column: String },

    /// The table's delete-then-insert transaction failed and was rolled
    /// back. Scoped to one table.
    #[error("load failed for table '{table}': {message}")]
    TableLoad { table: String, message: String },

    /// The table's transaction timed out waiting on the database. Rolled
    /// back, retryable on a later run.
    #[error("load timed out for table '{table}': {message}")]
    TableLoadTimeout { table: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a dataset-not-found error.
    pub fn dataset_not_found(message: impl Into<String>) -> Self {
        Self::DatasetNotFound(message.into())
    }

    /// Create a pre-run connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a table-scoped load error.
    pub fn table_load(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TableLoad {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a table-scoped timeout error.
    pub fn table_load_timeout(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TableLoadTimeout {
            table: table.into(),
            message: message.into(),
        }
    }

    /// True for errors that abort the whole run rather than one table.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DatasetNotFound(_) | Self::Connection(_))
    }

    /// True for table errors worth retrying on a later run.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TableLoadTimeout { .. })
    }
}
