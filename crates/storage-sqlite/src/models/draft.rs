//! Row models for the draft-league tables.

use diesel::prelude::*;

use fplsync_core::coerce::CoercedRow;

use super::{flag_opt, int, int32, int32_opt, int_opt, stamp_opt, text, text_opt};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::draft_leagues)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DraftLeagueDB {
    pub league_id: i64,
    pub name: String,
    pub draft_status: String,
    pub draft_dt: Option<String>,
    pub start_event: Option<i32>,
    pub stop_event: Option<i32>,
    pub total_managers: i32,
}

impl DraftLeagueDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            league_id: int(row, "league_id"),
            name: text(row, "name"),
            draft_status: text(row, "draft_status"),
            draft_dt: stamp_opt(row, "draft_dt"),
            start_event: int32_opt(row, "start_event"),
            stop_event: int32_opt(row, "stop_event"),
            total_managers: int32(row, "total_managers"),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::draft_managers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DraftManagerDB {
    pub league_id: i64,
    pub id: i64,
    pub entry_id: Option<i64>,
    pub entry_name: Option<String>,
    pub player_first_name: Option<String>,
    pub player_last_name: Option<String>,
    pub short_name: Option<String>,
    pub waiver_pick: Option<i32>,
    pub joined_time: Option<String>,
}

impl DraftManagerDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            league_id: int(row, "league_id"),
            id: int(row, "id"),
            entry_id: int_opt(row, "entry_id"),
            entry_name: text_opt(row, "entry_name"),
            player_first_name: text_opt(row, "player_first_name"),
            player_last_name: text_opt(row, "player_last_name"),
            short_name: text_opt(row, "short_name"),
            waiver_pick: int32_opt(row, "waiver_pick"),
            joined_time: stamp_opt(row, "joined_time"),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::draft_picks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DraftPickDB {
    pub league_id: i64,
    pub element_id: i64,
    pub owner: Option<i64>,
    pub status: Option<String>,
    pub in_accepted_trade: Option<i32>,
}

impl DraftPickDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            league_id: int(row, "league_id"),
            element_id: int(row, "element_id"),
            owner: int_opt(row, "owner"),
            status: text_opt(row, "status"),
            in_accepted_trade: flag_opt(row, "in_accepted_trade"),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::draft_standings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DraftStandingDB {
    pub league_id: i64,
    pub entry_id: i64,
    pub rank: Option<i32>,
    pub last_rank: Option<i32>,
    pub rank_sort: Option<i32>,
    pub total: Option<i32>,
    pub event_total: Option<i32>,
    pub matches_won: Option<i32>,
    pub matches_drawn: Option<i32>,
    pub matches_lost: Option<i32>,
    pub points_for: Option<i32>,
    pub points_against: Option<i32>,
}

impl DraftStandingDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            league_id: int(row, "league_id"),
            entry_id: int(row, "entry_id"),
            rank: int32_opt(row, "rank"),
            last_rank: int32_opt(row, "last_rank"),
            rank_sort: int32_opt(row, "rank_sort"),
            total: int32_opt(row, "total"),
            event_total: int32_opt(row, "event_total"),
            matches_won: int32_opt(row, "matches_won"),
            matches_drawn: int32_opt(row, "matches_drawn"),
            matches_lost: int32_opt(row, "matches_lost"),
            points_for: int32_opt(row, "points_for"),
            points_against: int32_opt(row, "points_against"),
        }
    }
}
