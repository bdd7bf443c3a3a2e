//! Ingestion engine for football-statistics snapshots.
//!
//! Resolves the latest complete snapshot for each logical input,
//! reconciles snapshot columns against the destination schema, coerces
//! raw text into typed values under an explicit null/default policy, and
//! hands each table to a [`ingest::TableLoader`] for scoped idempotent
//! replacement. Storage backends implement the loader trait; this crate
//! never talks to a database directly.

pub mod coerce;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod ingest;
pub mod reconcile;
pub mod report;
pub mod tables;

pub use errors::{Error, Result};
