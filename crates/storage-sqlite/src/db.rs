//! Connection pool and migration management.

use std::sync::Arc;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::debug;

use fplsync_core::config::DatabaseSettings;

use crate::errors::StorageError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Applied to every connection the pool hands out. The busy timeout is
/// what turns writer contention into a bounded, retryable failure
/// instead of an indefinite wait.
#[derive(Debug)]
struct ConnectionSettings {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionSettings {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(settings: &DatabaseSettings) -> Result<Arc<DbPool>, StorageError> {
    let manager =
        ConnectionManager::<SqliteConnection>::new(settings.path.to_string_lossy().as_ref());
    let pool = Pool::builder()
        .max_size(4)
        .connection_customizer(Box::new(ConnectionSettings {
            busy_timeout: settings.busy_timeout,
        }))
        .build(manager)?;
    debug!("opened sqlite pool at {}", settings.path.display());
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection, StorageError> {
    pool.get().map_err(StorageError::from)
}

/// Apply any pending embedded migrations. Idempotent; production
/// databases that already carry the fixed schema are left untouched.
pub fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    let mut conn = get_connection(pool)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    for version in applied {
        debug!("applied migration {version}");
    }
    Ok(())
}
