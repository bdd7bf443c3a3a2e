//! Storage-layer error types and their mapping onto the engine taxonomy.

use thiserror::Error;

/// Errors produced inside the SQLite storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not obtain a pooled connection.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Query or transaction failure reported by diesel.
    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("migration error: {0}")]
    Migration(String),

    /// The loader was handed a scope the table cannot be bounded by.
    #[error("table '{table}' cannot be loaded with scope '{scope}'")]
    Scope { table: &'static str, scope: String },

    #[error("unsupported destination table '{0}'")]
    UnsupportedTable(String),
}

impl StorageError {
    /// True when SQLite reported lock contention, i.e. the busy timeout
    /// elapsed while another writer held the database.
    pub fn is_lock_contention(&self) -> bool {
        match self {
            Self::Query(diesel::result::Error::DatabaseError(_, info)) => {
                let message = info.message();
                message.contains("database is locked")
                    || message.contains("database table is locked")
            }
            _ => false,
        }
    }

    /// Fold into the engine's table-scoped taxonomy: lock contention is
    /// a retryable timeout, everything else a plain table failure.
    pub fn into_table_error(self, table: &str) -> fplsync_core::Error {
        let message = self.to_string();
        if self.is_lock_contention() {
            fplsync_core::Error::table_load_timeout(table, message)
        } else {
            fplsync_core::Error::table_load(table, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    fn locked() -> StorageError {
        StorageError::Query(DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("database is locked".to_string()),
        ))
    }

    #[test]
    fn lock_contention_maps_to_retryable_timeout() {
        let err = locked().into_table_error("matches");
        assert!(err.is_retryable());
    }

    #[test]
    fn constraint_violations_map_to_table_load() {
        let err = StorageError::Query(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: players.player_code".to_string()),
        ))
        .into_table_error("players");
        assert!(!err.is_retryable());
        assert!(matches!(err, fplsync_core::Error::TableLoad { .. }));
    }
}
