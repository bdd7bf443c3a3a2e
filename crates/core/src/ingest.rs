//! Run orchestration: locate once, then reconcile, coerce, and load each
//! destination table in declared order.
//!
//! Only locating and the pre-run connection probe can abort a run. Once
//! table processing begins, an error affects that table alone: its
//! transaction rolls back, the failure is folded into the report, and
//! the next table proceeds.

use std::path::Path;

use csv::StringRecord;
use log::{error, info, warn};

use crate::coerce::{self, CoercedRow, RowCoercionError};
use crate::config::IngestionConfig;
use crate::dataset::{DatasetLocator, LeagueInfo, Scope};
use crate::errors::Result;
use crate::reconcile;
use crate::report::{IngestionReport, LoadResult};
use crate::tables::{self, TableSpec};

/// Storage seam: scoped idempotent replacement for one table.
pub trait TableLoader {
    /// Probe the destination before any table is touched. An error here
    /// is fatal to the run.
    fn check_connection(&self) -> Result<()>;

    /// Delete every row matching `scope`, bulk-insert `rows`, commit —
    /// all inside one transaction. Returns the number of rows inserted.
    fn replace_scope(
        &self,
        table: &'static TableSpec,
        scope: &Scope,
        rows: &[CoercedRow],
    ) -> Result<usize>;
}

/// The ingestion engine. One instance performs one synchronous run.
pub struct Ingester<L> {
    config: IngestionConfig,
    loader: L,
}

impl<L: TableLoader> Ingester<L> {
    pub fn new(config: IngestionConfig, loader: L) -> Self {
        Self { config, loader }
    }

    /// Execute one run.
    ///
    /// Returns `Err` only for fatal pre-table failures (dataset not
    /// found, connection). Every other outcome is in the report.
    pub fn run(&self) -> Result<IngestionReport> {
        let mut report = IngestionReport::begin(self.config.display_error_limit);
        info!("run {}: starting ingestion", report.run_id);

        self.loader.check_connection()?;

        let locator = DatasetLocator::new(&self.config.data_root, &self.config.season);
        let dataset = locator.resolve()?;

        if let Some(reference) = &dataset.reference {
            report.record(self.ingest_csv(&tables::TEAMS, &Scope::Reference, &reference.teams));
            report.record(self.ingest_csv(&tables::PLAYERS, &Scope::Reference, &reference.players));
        }

        if let Some(gameweek) = &dataset.gameweek {
            let scope = Scope::Gameweek(gameweek.gameweek);
            report.record(self.ingest_csv(&tables::MATCHES, &scope, &gameweek.matches));
            report.record(self.ingest_csv(
                &tables::PLAYER_MATCH_STATS,
                &scope,
                &gameweek.player_stats,
            ));
        }

        if let Some(draft) = &dataset.draft {
            let scope = Scope::League(draft.league.league_id);
            report.record(self.ingest_league(&draft.league, &scope));
            report.record(self.ingest_csv(&tables::DRAFT_MANAGERS, &scope, &draft.managers));
            report.record(self.ingest_csv(&tables::DRAFT_PICKS, &scope, &draft.picks));
            report.record(self.ingest_csv(&tables::DRAFT_STANDINGS, &scope, &draft.standings));
        }

        report.finish();
        report.log_summary();
        Ok(report)
    }

    /// Reconcile, coerce, and load one snapshot CSV.
    fn ingest_csv(&self, table: &'static TableSpec, scope: &Scope, path: &Path) -> LoadResult {
        let mut result = LoadResult::new(table.name, scope.to_string());
        info!("{} [{scope}]: reading {}", table.name, path.display());

        let rows = match self.collect_rows(table, scope, path, &mut result) {
            Ok(rows) => rows,
            Err(err) => {
                error!("{} [{scope}]: {err}", table.name);
                result.error = Some(err.to_string());
                return result;
            }
        };

        self.load(table, scope, rows, result)
    }

    /// The single non-CSV input: one row built from the league metadata
    /// record captured next to the draft files.
    fn ingest_league(&self, league: &LeagueInfo, scope: &Scope) -> LoadResult {
        let table = &tables::DRAFT_LEAGUES;
        let mut result = LoadResult::new(table.name, scope.to_string());
        result.attempted = 1;

        let headers = StringRecord::from(vec![
            "league_name",
            "draft_status",
            "draft_dt",
            "start_event",
            "stop_event",
            "total_managers",
        ]);
        let record = StringRecord::from(vec![
            league.league_name.clone(),
            league.draft_status.clone(),
            league.draft_dt.clone().unwrap_or_default(),
            league.start_event.map(|n| n.to_string()).unwrap_or_default(),
            league.stop_event.map(|n| n.to_string()).unwrap_or_default(),
            league.total_managers.to_string(),
        ]);

        let mapping = match reconcile::reconcile(table, &headers) {
            Ok(mapping) => mapping,
            Err(err) => {
                result.error = Some(err.to_string());
                return result;
            }
        };

        let mut rows = Vec::with_capacity(1);
        match coerce::coerce_record(table, &mapping, &record, scope, 1) {
            Ok(row) => rows.push(row),
            Err(row_error) => self.record_skip(&mut result, row_error),
        }

        self.load(table, scope, rows, result)
    }

    fn collect_rows(
        &self,
        table: &'static TableSpec,
        scope: &Scope,
        path: &Path,
        result: &mut LoadResult,
    ) -> Result<Vec<CoercedRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;
        let headers = reader.headers()?.clone();

        let mapping = reconcile::reconcile(table, &headers)?;
        result.dropped_columns = mapping.dropped.clone();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let row_number = index + 1;
            result.attempted += 1;

            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    self.record_skip(
                        result,
                        RowCoercionError {
                            row: row_number,
                            column: "-".to_string(),
                            raw: String::new(),
                            message: format!("malformed CSV record: {err}"),
                        },
                    );
                    continue;
                }
            };

            match coerce::coerce_record(table, &mapping, &record, scope, row_number) {
                Ok(row) => rows.push(row),
                Err(row_error) => self.record_skip(result, row_error),
            }
        }
        Ok(rows)
    }

    /// Hand surviving rows to the storage layer; an empty set still runs
    /// the scoped delete so replacement semantics hold.
    fn load(
        &self,
        table: &'static TableSpec,
        scope: &Scope,
        rows: Vec<CoercedRow>,
        mut result: LoadResult,
    ) -> LoadResult {
        match self.loader.replace_scope(table, scope, &rows) {
            Ok(loaded) => result.loaded = loaded,
            Err(err) => {
                error!("{} [{scope}]: {err}", table.name);
                result.error = Some(err.to_string());
            }
        }
        result
    }

    fn record_skip(&self, result: &mut LoadResult, row_error: RowCoercionError) {
        warn!("{} [{}]: skipping {row_error}", result.table, result.scope);
        result.skipped += 1;
        result.row_errors.push(row_error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseSettings;
    use crate::errors::Error;
    use crate::report::RunStatus;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;

    const SEASON: &str = "2025-2026";

    #[derive(Default)]
    struct RecordingLoader {
        fail_tables: HashSet<&'static str>,
        refuse_connection: bool,
        calls: RefCell<Vec<(String, String, usize)>>,
    }

    impl TableLoader for RecordingLoader {
        fn check_connection(&self) -> Result<()> {
            if self.refuse_connection {
                return Err(Error::connection("refused"));
            }
            Ok(())
        }

        fn replace_scope(
            &self,
            table: &'static TableSpec,
            scope: &Scope,
            rows: &[CoercedRow],
        ) -> Result<usize> {
            if self.fail_tables.contains(table.name) {
                return Err(Error::table_load(table.name, "unique constraint failed"));
            }
            self.calls
                .borrow_mut()
                .push((table.name.to_string(), scope.to_string(), rows.len()));
            Ok(rows.len())
        }
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn write_reference(root: &Path) {
        write(
            root,
            &format!("{SEASON}/teams.csv"),
            "code,id,name,short_name,elo\n3,1,Arsenal,ARS,1850.5\n8,2,Chelsea,CHE,1790.25\n",
        );
        write(
            root,
            &format!("{SEASON}/players.csv"),
            "player_code,player_id,first_name,second_name,web_name,team_code,position\n\
             223094,1,Bukayo,Saka,Saka,3,MID\n",
        );
    }

    fn write_draft(root: &Path, league_id: i64) {
        let dir = "draft_league/archive/2025-08-01";
        write(
            root,
            &format!("{dir}/league_info_20250801_090000.json"),
            &format!(
                r#"{{"league_id":{league_id},"league_name":"Office League","draft_status":"post","draft_dt":"2025-08-01T18:00:00Z","start_event":1,"stop_event":38,"total_managers":8}}"#
            ),
        );
        write(
            root,
            &format!("{dir}/managers_20250801_090000.csv"),
            "entry_id,entry_name,id,joined_time,player_first_name,player_last_name,short_name,waiver_pick\n\
             501,Team A,11,2025-07-01T10:00:00Z,Alex,One,TA,1\n\
             502,Team B,12,,Billie,Two,TB,2\n",
        );
        write(
            root,
            &format!("{dir}/picks_20250801_090000.csv"),
            "element,in_accepted_trade,owner,status\n100,False,3.0,o\n101,False,,a\n",
        );
        write(
            root,
            &format!("{dir}/standings_20250801_090000.csv"),
            "last_rank,league_entry,rank,rank_sort,total\n1,501,1,1,20\n2,502,2,2,12\n",
        );
    }

    fn config(root: &Path) -> IngestionConfig {
        IngestionConfig::new(root, SEASON, DatabaseSettings::new("unused.db"))
    }

    #[test]
    fn connection_failure_aborts_before_any_table() {
        let root = tempfile::tempdir().unwrap();
        write_reference(root.path());

        let loader = RecordingLoader {
            refuse_connection: true,
            ..Default::default()
        };
        let err = Ingester::new(config(root.path()), loader).run().unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[test]
    fn missing_dataset_aborts_before_any_table() {
        let root = tempfile::tempdir().unwrap();
        let loader = RecordingLoader::default();
        let err = Ingester::new(config(root.path()), loader).run().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn table_failure_is_isolated_and_run_is_partial() {
        let root = tempfile::tempdir().unwrap();
        write_reference(root.path());

        let mut loader = RecordingLoader::default();
        loader.fail_tables.insert("players");
        let report = Ingester::new(config(root.path()), loader).run().unwrap();

        assert_eq!(report.status(), RunStatus::Partial);
        let teams = report.tables.iter().find(|t| t.table == "teams").unwrap();
        assert_eq!(teams.loaded, 2);
        let players = report.tables.iter().find(|t| t.table == "players").unwrap();
        assert!(players.failed());
    }

    #[test]
    fn draft_tables_share_the_league_scope() {
        let root = tempfile::tempdir().unwrap();
        write_draft(root.path(), 25029);

        let loader = RecordingLoader::default();
        let report = Ingester::new(config(root.path()), loader).run().unwrap();
        assert_eq!(report.status(), RunStatus::Success);

        let tables: Vec<_> = report
            .tables
            .iter()
            .map(|t| (t.table, t.scope.as_str(), t.loaded))
            .collect();
        assert_eq!(
            tables,
            vec![
                ("draft_leagues", "league 25029", 1),
                ("draft_managers", "league 25029", 2),
                ("draft_picks", "league 25029", 2),
                ("draft_standings", "league 25029", 2),
            ]
        );
    }

    #[test]
    fn unparseable_boolean_drops_row_and_continues() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            &format!("{SEASON}/By Gameweek/GW1/matches.csv"),
            "match_id,gameweek,kickoff_time,home_team,away_team,finished\n\
             m1,1,2025-08-16T11:30:00Z,ARS,CHE,true\n\
             m2,1,2025-08-16T14:00:00Z,LIV,MUN,maybe\n",
        );
        write(
            root.path(),
            &format!("{SEASON}/By Gameweek/GW1/playermatchstats.csv"),
            "player_id,match_id,goals\n10,m1,1\n",
        );

        let loader = RecordingLoader::default();
        let report = Ingester::new(config(root.path()), loader).run().unwrap();

        // The bad row is excluded and recorded; the file and run go on.
        assert_eq!(report.status(), RunStatus::Success);
        let matches = report.tables.iter().find(|t| t.table == "matches").unwrap();
        assert_eq!(matches.attempted, 2);
        assert_eq!(matches.loaded, 1);
        assert_eq!(matches.skipped, 1);
        assert_eq!(matches.row_errors[0].column, "finished");
        assert_eq!(matches.row_errors[0].raw, "maybe");
    }
}
