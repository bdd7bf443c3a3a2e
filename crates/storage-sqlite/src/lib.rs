//! SQLite storage implementation for the ingestion engine.
//!
//! Owns the connection pool, the embedded destination DDL, the diesel
//! schema and row models, and the [`loader::SqliteTableLoader`] that
//! performs scoped delete-then-insert loading behind the core crate's
//! `TableLoader` seam.

pub mod db;
pub mod errors;
pub mod loader;
pub mod models;
pub mod schema;

pub use db::{create_pool, get_connection, run_migrations, DbPool};
pub use errors::StorageError;
pub use loader::SqliteTableLoader;

#[cfg(test)]
mod tests;
