//! End-to-end ingestion tests over a temporary database and a fixture
//! snapshot tree.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::dsl::count_star;
use diesel::prelude::*;

use fplsync_core::config::{DatabaseSettings, IngestionConfig};
use fplsync_core::ingest::Ingester;
use fplsync_core::report::{IngestionReport, RunStatus};

use crate::db::{create_pool, get_connection, run_migrations, DbPool};
use crate::loader::SqliteTableLoader;
use crate::schema::{draft_managers, draft_picks, matches, players, playermatchstats, teams};

const SEASON: &str = "2025-2026";

fn setup_db() -> (Arc<DbPool>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = DatabaseSettings::new(dir.path().join("fplsync.db"));
    let pool = create_pool(&settings).expect("create pool");
    run_migrations(&pool).expect("migrate db");
    (pool, dir)
}

fn run_ingestion(data_root: &Path, pool: &Arc<DbPool>) -> IngestionReport {
    let config = IngestionConfig::new(
        data_root,
        SEASON,
        DatabaseSettings::new(data_root.join("unused.db")),
    );
    Ingester::new(config, SqliteTableLoader::new(pool.clone()))
        .run()
        .expect("ingestion run")
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn write_teams(root: &Path, count: usize) {
    let mut contents = String::from("code,id,name,short_name,elo\n");
    for i in 1..=count {
        contents.push_str(&format!("{},{i},Team {i},T{i:02},{}.5\n", i * 10, 1500 + i));
    }
    write(root, &format!("{SEASON}/teams.csv"), &contents);
}

fn write_players(root: &Path, rows: &str) {
    write(
        root,
        &format!("{SEASON}/players.csv"),
        &format!(
            "player_code,player_id,first_name,second_name,web_name,team_code,position\n{rows}"
        ),
    );
}

fn write_gameweek(root: &Path, n: i32) {
    write(
        root,
        &format!("{SEASON}/By Gameweek/GW{n}/matches.csv"),
        "match_id,gameweek,kickoff_time,home_team,away_team,finished,home_possession,away_possession,home_expected_goals_xg,away_expected_goals_xg\n\
         m1,1,2025-08-16T11:30:00Z,ARS,CHE,true,57,43,1.84,0.62\n",
    );
    write(
        root,
        &format!("{SEASON}/By Gameweek/GW{n}/playermatchstats.csv"),
        "player_id,match_id,minutes_played,goals,assists,xg,accurate_passes_percent\n\
         10,m1,90,1,0,0.84,87.4\n\
         11,m1,78,0,1,,91\n",
    );
}

fn write_draft(root: &Path, date: &str, stamp: &str, league_id: i64, manager_ids: &[i64]) {
    let dir = format!("draft_league/archive/{date}");
    write(
        root,
        &format!("{dir}/league_info_{stamp}.json"),
        &format!(
            r#"{{"league_id":{league_id},"league_name":"Office League","draft_status":"post","draft_dt":"2025-08-01T18:00:00Z","start_event":1,"stop_event":38,"total_managers":{}}}"#,
            manager_ids.len()
        ),
    );

    let mut managers = String::from(
        "entry_id,entry_name,id,joined_time,player_first_name,player_last_name,short_name,waiver_pick\n",
    );
    for id in manager_ids {
        managers.push_str(&format!(
            "{},Squad {id},{id},2025-07-01T10:00:00Z,First{id},Last{id},S{id},{id}\n",
            500 + id
        ));
    }
    write(root, &format!("{dir}/managers_{stamp}.csv"), &managers);

    write(
        root,
        &format!("{dir}/picks_{stamp}.csv"),
        "element,in_accepted_trade,owner,status\n100,False,3.0,o\n101,False,,a\n",
    );
    write(
        root,
        &format!("{dir}/standings_{stamp}.csv"),
        "last_rank,league_entry,rank,rank_sort,total\n1,501,1,1,20\n",
    );
}

fn count(conn: &mut crate::db::DbConnection, table: &str) -> i64 {
    match table {
        "teams" => teams::table.select(count_star()).first(conn).unwrap(),
        "players" => players::table.select(count_star()).first(conn).unwrap(),
        "matches" => matches::table.select(count_star()).first(conn).unwrap(),
        "playermatchstats" => playermatchstats::table
            .select(count_star())
            .first(conn)
            .unwrap(),
        "draft_managers" => draft_managers::table
            .select(count_star())
            .first(conn)
            .unwrap(),
        "draft_picks" => draft_picks::table.select(count_star()).first(conn).unwrap(),
        other => panic!("uncounted table {other}"),
    }
}

#[test]
fn reference_load_ignores_referential_mismatches() {
    let (pool, _db) = setup_db();
    let data = tempfile::tempdir().unwrap();
    write_teams(data.path(), 20);
    // One player referencing a team code that does not exist.
    write_players(data.path(), "900001,1,Sam,Orphan,Orphan,9999,FWD\n");

    let report = run_ingestion(data.path(), &pool);
    assert_eq!(report.status(), RunStatus::Success);

    let mut conn = get_connection(&pool).unwrap();
    assert_eq!(count(&mut conn, "teams"), 20);
    assert_eq!(count(&mut conn, "players"), 1);
    assert_eq!(report.rows_loaded(), 21);
}

#[test]
fn owner_coercion_handles_decimal_and_empty() {
    let (pool, _db) = setup_db();
    let data = tempfile::tempdir().unwrap();
    write_draft(data.path(), "2025-08-01", "20250801_090000", 25029, &[1, 2]);

    let report = run_ingestion(data.path(), &pool);
    assert_eq!(report.status(), RunStatus::Success);

    let mut conn = get_connection(&pool).unwrap();
    let owners: Vec<Option<i64>> = draft_picks::table
        .order(draft_picks::element_id.asc())
        .select(draft_picks::owner)
        .load(&mut conn)
        .unwrap();
    assert_eq!(owners, vec![Some(3), None]);
}

#[test]
fn reingest_replaces_league_scope_without_residue() {
    let (pool, _db) = setup_db();
    let data = tempfile::tempdir().unwrap();
    write_draft(
        data.path(),
        "2025-08-01",
        "20250801_090000",
        25029,
        &[1, 2, 3, 4, 5, 6, 7, 8],
    );
    run_ingestion(data.path(), &pool);

    // A newer capture with an entirely different manager set.
    write_draft(
        data.path(),
        "2025-08-02",
        "20250802_090000",
        25029,
        &[11, 12, 13, 14, 15, 16, 17, 18, 19, 20],
    );
    run_ingestion(data.path(), &pool);

    let mut conn = get_connection(&pool).unwrap();
    assert_eq!(count(&mut conn, "draft_managers"), 10);
    let residue: i64 = draft_managers::table
        .filter(draft_managers::id.eq(1))
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    assert_eq!(residue, 0);
}

#[test]
fn rerunning_an_unchanged_snapshot_is_idempotent() {
    let (pool, _db) = setup_db();
    let data = tempfile::tempdir().unwrap();
    write_teams(data.path(), 4);
    write_players(data.path(), "223094,1,Bukayo,Saka,Saka,10,MID\n");
    write_gameweek(data.path(), 1);
    write_draft(data.path(), "2025-08-01", "20250801_090000", 25029, &[1, 2]);

    let first = run_ingestion(data.path(), &pool);
    assert_eq!(first.status(), RunStatus::Success);
    let second = run_ingestion(data.path(), &pool);
    assert_eq!(second.status(), RunStatus::Success);

    let mut conn = get_connection(&pool).unwrap();
    for table in [
        "teams",
        "players",
        "matches",
        "playermatchstats",
        "draft_managers",
        "draft_picks",
    ] {
        let expected = first
            .tables
            .iter()
            .find(|t| t.table == table)
            .unwrap()
            .loaded as i64;
        assert_eq!(count(&mut conn, table), expected, "table {table}");
    }
}

#[test]
fn failing_table_rolls_back_alone_and_run_is_partial() {
    let (pool, _db) = setup_db();
    let data = tempfile::tempdir().unwrap();
    write_teams(data.path(), 2);
    // Duplicate natural key: the insert violates the primary key and the
    // players transaction rolls back.
    write_players(
        data.path(),
        "100,1,Dup,One,One,10,MID\n100,2,Dup,Two,Two,10,MID\n",
    );

    let report = run_ingestion(data.path(), &pool);
    assert_eq!(report.status(), RunStatus::Partial);

    let mut conn = get_connection(&pool).unwrap();
    assert_eq!(count(&mut conn, "teams"), 2);
    assert_eq!(count(&mut conn, "players"), 0);

    let players_result = report.tables.iter().find(|t| t.table == "players").unwrap();
    assert!(players_result.failed());
    assert!(players_result
        .error
        .as_deref()
        .unwrap()
        .contains("players"));
}

#[test]
fn disjoint_league_scopes_do_not_interfere() {
    let (pool, _db) = setup_db();
    let first = tempfile::tempdir().unwrap();
    write_draft(first.path(), "2025-08-01", "20250801_090000", 111, &[1, 2]);
    run_ingestion(first.path(), &pool);

    let second = tempfile::tempdir().unwrap();
    write_draft(second.path(), "2025-08-01", "20250801_090000", 222, &[5, 6, 7]);
    run_ingestion(second.path(), &pool);

    let mut conn = get_connection(&pool).unwrap();
    let league_111: i64 = draft_managers::table
        .filter(draft_managers::league_id.eq(111))
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    let league_222: i64 = draft_managers::table
        .filter(draft_managers::league_id.eq(222))
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    assert_eq!((league_111, league_222), (2, 3));
}

#[test]
fn gameweek_stats_coerce_percent_and_decimal_columns() {
    let (pool, _db) = setup_db();
    let data = tempfile::tempdir().unwrap();
    write_gameweek(data.path(), 1);

    let report = run_ingestion(data.path(), &pool);
    assert_eq!(report.status(), RunStatus::Success);

    let mut conn = get_connection(&pool).unwrap();
    let rows: Vec<(i64, f64, i32, i32)> = playermatchstats::table
        .order(playermatchstats::player_id.asc())
        .select((
            playermatchstats::player_id,
            playermatchstats::xg,
            playermatchstats::accurate_passes_percent,
            playermatchstats::gameweek,
        ))
        .load(&mut conn)
        .unwrap();

    // Empty xg in a non-nullable decimal column lands as 0, with the row
    // retained; the scope column is injected from the run scope.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], (10, 0.84, 87, 1));
    assert_eq!(rows[1].1, 0.0);
    assert_eq!(rows[1].2, 91);
}
