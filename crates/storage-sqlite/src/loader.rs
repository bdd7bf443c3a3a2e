//! Scoped delete-then-insert loading, one transaction per table.

use std::sync::Arc;

use diesel::prelude::*;
use log::debug;

use fplsync_core::coerce::CoercedRow;
use fplsync_core::dataset::Scope;
use fplsync_core::ingest::TableLoader;
use fplsync_core::tables::TableSpec;
use fplsync_core::{Error, Result};

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::models::{
    DraftLeagueDB, DraftManagerDB, DraftPickDB, DraftStandingDB, MatchDB, PlayerDB,
    PlayerMatchStatDB, TeamDB,
};
use crate::schema::{
    draft_leagues, draft_managers, draft_picks, draft_standings, matches, players,
    playermatchstats, teams,
};

/// Rows per INSERT statement, well under SQLite's bind-variable cap for
/// the widest table.
const INSERT_CHUNK: usize = 100;

/// Diesel-backed [`TableLoader`].
pub struct SqliteTableLoader {
    pool: Arc<DbPool>,
}

impl SqliteTableLoader {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl TableLoader for SqliteTableLoader {
    fn check_connection(&self) -> Result<()> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| Error::connection(e.to_string()))?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .map_err(|e| Error::connection(e.to_string()))?;
        Ok(())
    }

    fn replace_scope(
        &self,
        table: &'static TableSpec,
        scope: &Scope,
        rows: &[CoercedRow],
    ) -> Result<usize> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| e.into_table_error(table.name))?;

        let inserted = conn
            .immediate_transaction::<usize, StorageError, _>(|tx| match table.name {
                "teams" => replace_teams(tx, rows),
                "players" => replace_players(tx, rows),
                "matches" => replace_matches(tx, scope, rows),
                "playermatchstats" => replace_player_stats(tx, scope, rows),
                "draft_leagues" => replace_draft_leagues(tx, scope, rows),
                "draft_managers" => replace_draft_managers(tx, scope, rows),
                "draft_picks" => replace_draft_picks(tx, scope, rows),
                "draft_standings" => replace_draft_standings(tx, scope, rows),
                other => Err(StorageError::UnsupportedTable(other.to_string())),
            })
            .map_err(|e| e.into_table_error(table.name))?;

        debug!("{} [{scope}]: replaced with {inserted} row(s)", table.name);
        Ok(inserted)
    }
}

fn gameweek_scope(table: &'static str, scope: &Scope) -> std::result::Result<i32, StorageError> {
    scope.gameweek().ok_or_else(|| StorageError::Scope {
        table,
        scope: scope.to_string(),
    })
}

fn league_scope(table: &'static str, scope: &Scope) -> std::result::Result<i64, StorageError> {
    scope.league_id().ok_or_else(|| StorageError::Scope {
        table,
        scope: scope.to_string(),
    })
}

fn replace_teams(
    conn: &mut SqliteConnection,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    diesel::delete(teams::table).execute(conn)?;
    let models: Vec<TeamDB> = rows.iter().map(TeamDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(teams::table).values(chunk).execute(conn)?;
    }
    Ok(inserted)
}

fn replace_players(
    conn: &mut SqliteConnection,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    diesel::delete(players::table).execute(conn)?;
    let models: Vec<PlayerDB> = rows.iter().map(PlayerDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(players::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(inserted)
}

fn replace_matches(
    conn: &mut SqliteConnection,
    scope: &Scope,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    let gameweek = gameweek_scope("matches", scope)?;
    diesel::delete(matches::table.filter(matches::gameweek.eq(gameweek))).execute(conn)?;
    let models: Vec<MatchDB> = rows.iter().map(MatchDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(matches::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(inserted)
}

fn replace_player_stats(
    conn: &mut SqliteConnection,
    scope: &Scope,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    let gameweek = gameweek_scope("playermatchstats", scope)?;
    diesel::delete(playermatchstats::table.filter(playermatchstats::gameweek.eq(gameweek)))
        .execute(conn)?;
    let models: Vec<PlayerMatchStatDB> = rows.iter().map(PlayerMatchStatDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(playermatchstats::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(inserted)
}

fn replace_draft_leagues(
    conn: &mut SqliteConnection,
    scope: &Scope,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    let league_id = league_scope("draft_leagues", scope)?;
    diesel::delete(draft_leagues::table.filter(draft_leagues::league_id.eq(league_id)))
        .execute(conn)?;
    let models: Vec<DraftLeagueDB> = rows.iter().map(DraftLeagueDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(draft_leagues::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(inserted)
}

fn replace_draft_managers(
    conn: &mut SqliteConnection,
    scope: &Scope,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    let league_id = league_scope("draft_managers", scope)?;
    diesel::delete(draft_managers::table.filter(draft_managers::league_id.eq(league_id)))
        .execute(conn)?;
    let models: Vec<DraftManagerDB> = rows.iter().map(DraftManagerDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(draft_managers::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(inserted)
}

fn replace_draft_picks(
    conn: &mut SqliteConnection,
    scope: &Scope,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    let league_id = league_scope("draft_picks", scope)?;
    diesel::delete(draft_picks::table.filter(draft_picks::league_id.eq(league_id)))
        .execute(conn)?;
    let models: Vec<DraftPickDB> = rows.iter().map(DraftPickDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(draft_picks::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(inserted)
}

fn replace_draft_standings(
    conn: &mut SqliteConnection,
    scope: &Scope,
    rows: &[CoercedRow],
) -> std::result::Result<usize, StorageError> {
    let league_id = league_scope("draft_standings", scope)?;
    diesel::delete(draft_standings::table.filter(draft_standings::league_id.eq(league_id)))
        .execute(conn)?;
    let models: Vec<DraftStandingDB> = rows.iter().map(DraftStandingDB::from_row).collect();
    let mut inserted = 0;
    for chunk in models.chunks(INSERT_CHUNK) {
        inserted += diesel::insert_into(draft_standings::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(inserted)
}
