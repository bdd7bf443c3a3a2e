//! Command-line entry point: one synchronous ingestion run.
//!
//! Exit codes for the scheduling layer: 0 on SUCCESS, 2 on PARTIAL,
//! 1 on FAILED (fatal pre-table error).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use log::error;

use fplsync_core::config::{DatabaseSettings, IngestionConfig};
use fplsync_core::ingest::Ingester;
use fplsync_core::report::IngestionReport;
use fplsync_storage_sqlite::{create_pool, run_migrations, SqliteTableLoader};

#[derive(Debug, Parser)]
#[command(
    name = "fplsync",
    version,
    about = "Ingest the latest statistics snapshots into the local database"
)]
struct Cli {
    /// Root of the snapshot tree maintained by the upstream fetcher.
    #[arg(long, value_name = "DIR")]
    data_root: PathBuf,

    /// Season folder under the data root.
    #[arg(long, default_value = "2025-2026")]
    season: String,

    /// SQLite database file.
    #[arg(long, value_name = "FILE", env = "FPLSYNC_DATABASE")]
    database: PathBuf,

    /// Busy timeout in milliseconds for database connections.
    #[arg(long, default_value_t = 5_000)]
    busy_timeout_ms: u64,

    /// How many recorded errors to print per failing table.
    #[arg(long, default_value_t = 5)]
    error_limit: usize,

    /// Print the full run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(err) => error!("failed to serialize report: {err}"),
                }
            }
            ExitCode::from(report.status().exit_code() as u8)
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<IngestionReport> {
    let database = DatabaseSettings::new(&cli.database)
        .with_busy_timeout(Duration::from_millis(cli.busy_timeout_ms));

    let mut config = IngestionConfig::new(&cli.data_root, &cli.season, database.clone());
    config.display_error_limit = cli.error_limit;

    let pool = create_pool(&database).context("opening database")?;
    run_migrations(&pool).context("preparing database schema")?;

    let loader = SqliteTableLoader::new(pool);
    Ingester::new(config, loader).run().map_err(Into::into)
}
