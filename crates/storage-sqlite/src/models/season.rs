//! Row models for the reference and gameweek tables.

use diesel::prelude::*;

use fplsync_core::coerce::CoercedRow;

use super::{flag, int, int32, int32_opt, int_opt, real, real_opt, stamp_opt, text, text_opt};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TeamDB {
    pub code: i64,
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub strength: Option<i32>,
    pub strength_overall_home: Option<i32>,
    pub strength_overall_away: Option<i32>,
    pub strength_attack_home: Option<i32>,
    pub strength_attack_away: Option<i32>,
    pub strength_defence_home: Option<i32>,
    pub strength_defence_away: Option<i32>,
    pub pulse_id: Option<i64>,
    pub elo: Option<f64>,
}

impl TeamDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            code: int(row, "code"),
            id: int(row, "id"),
            name: text(row, "name"),
            short_name: text(row, "short_name"),
            strength: int32_opt(row, "strength"),
            strength_overall_home: int32_opt(row, "strength_overall_home"),
            strength_overall_away: int32_opt(row, "strength_overall_away"),
            strength_attack_home: int32_opt(row, "strength_attack_home"),
            strength_attack_away: int32_opt(row, "strength_attack_away"),
            strength_defence_home: int32_opt(row, "strength_defence_home"),
            strength_defence_away: int32_opt(row, "strength_defence_away"),
            pulse_id: int_opt(row, "pulse_id"),
            elo: real_opt(row, "elo"),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::players)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlayerDB {
    pub player_code: i64,
    pub player_id: i64,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub web_name: String,
    pub team_code: i64,
    pub position: Option<String>,
}

impl PlayerDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            player_code: int(row, "player_code"),
            player_id: int(row, "player_id"),
            first_name: text_opt(row, "first_name"),
            second_name: text_opt(row, "second_name"),
            web_name: text(row, "web_name"),
            team_code: int(row, "team_code"),
            position: text_opt(row, "position"),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MatchDB {
    pub match_id: String,
    pub gameweek: i32,
    pub kickoff_time: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_team_elo: Option<f64>,
    pub away_team_elo: Option<f64>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub finished: i32,
    pub home_possession: i32,
    pub away_possession: i32,
    pub home_expected_goals_xg: f64,
    pub away_expected_goals_xg: f64,
    pub home_total_shots: i32,
    pub away_total_shots: i32,
    pub home_shots_on_target: i32,
    pub away_shots_on_target: i32,
    pub home_accurate_passes: i32,
    pub away_accurate_passes: i32,
    pub home_accurate_passes_pct: i32,
    pub away_accurate_passes_pct: i32,
    pub home_corners: i32,
    pub away_corners: i32,
    pub home_yellow_cards: i32,
    pub away_yellow_cards: i32,
    pub home_red_cards: i32,
    pub away_red_cards: i32,
}

impl MatchDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            match_id: text(row, "match_id"),
            gameweek: int32(row, "gameweek"),
            kickoff_time: stamp_opt(row, "kickoff_time"),
            home_team: text(row, "home_team"),
            away_team: text(row, "away_team"),
            home_team_elo: real_opt(row, "home_team_elo"),
            away_team_elo: real_opt(row, "away_team_elo"),
            home_score: int32_opt(row, "home_score"),
            away_score: int32_opt(row, "away_score"),
            finished: flag(row, "finished"),
            home_possession: int32(row, "home_possession"),
            away_possession: int32(row, "away_possession"),
            home_expected_goals_xg: real(row, "home_expected_goals_xg"),
            away_expected_goals_xg: real(row, "away_expected_goals_xg"),
            home_total_shots: int32(row, "home_total_shots"),
            away_total_shots: int32(row, "away_total_shots"),
            home_shots_on_target: int32(row, "home_shots_on_target"),
            away_shots_on_target: int32(row, "away_shots_on_target"),
            home_accurate_passes: int32(row, "home_accurate_passes"),
            away_accurate_passes: int32(row, "away_accurate_passes"),
            home_accurate_passes_pct: int32(row, "home_accurate_passes_pct"),
            away_accurate_passes_pct: int32(row, "away_accurate_passes_pct"),
            home_corners: int32(row, "home_corners"),
            away_corners: int32(row, "away_corners"),
            home_yellow_cards: int32(row, "home_yellow_cards"),
            away_yellow_cards: int32(row, "away_yellow_cards"),
            home_red_cards: int32(row, "home_red_cards"),
            away_red_cards: int32(row, "away_red_cards"),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::playermatchstats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlayerMatchStatDB {
    pub player_id: i64,
    pub match_id: String,
    pub gameweek: i32,
    pub minutes_played: i32,
    pub goals: i32,
    pub assists: i32,
    pub total_shots: i32,
    pub shots_on_target: i32,
    pub xg: f64,
    pub xa: f64,
    pub xgot: f64,
    pub xgot_faced: f64,
    pub goals_prevented: f64,
    pub accurate_passes: i32,
    pub accurate_passes_percent: i32,
    pub chances_created: i32,
    pub accurate_crosses: i32,
    pub accurate_crosses_percent: i32,
    pub tackles_won: i32,
    pub tackles_won_percent: i32,
    pub interceptions: i32,
    pub duels_won: i32,
    pub duels_lost: i32,
    pub fouls_committed: i32,
    pub saves: i32,
    pub goals_conceded: i32,
    pub start_min: i32,
    pub finish_min: i32,
}

impl PlayerMatchStatDB {
    pub fn from_row(row: &CoercedRow) -> Self {
        Self {
            player_id: int(row, "player_id"),
            match_id: text(row, "match_id"),
            gameweek: int32(row, "gameweek"),
            minutes_played: int32(row, "minutes_played"),
            goals: int32(row, "goals"),
            assists: int32(row, "assists"),
            total_shots: int32(row, "total_shots"),
            shots_on_target: int32(row, "shots_on_target"),
            xg: real(row, "xg"),
            xa: real(row, "xa"),
            xgot: real(row, "xgot"),
            xgot_faced: real(row, "xgot_faced"),
            goals_prevented: real(row, "goals_prevented"),
            accurate_passes: int32(row, "accurate_passes"),
            accurate_passes_percent: int32(row, "accurate_passes_percent"),
            chances_created: int32(row, "chances_created"),
            accurate_crosses: int32(row, "accurate_crosses"),
            accurate_crosses_percent: int32(row, "accurate_crosses_percent"),
            tackles_won: int32(row, "tackles_won"),
            tackles_won_percent: int32(row, "tackles_won_percent"),
            interceptions: int32(row, "interceptions"),
            duels_won: int32(row, "duels_won"),
            duels_lost: int32(row, "duels_lost"),
            fouls_committed: int32(row, "fouls_committed"),
            saves: int32(row, "saves"),
            goals_conceded: int32(row, "goals_conceded"),
            start_min: int32(row, "start_min"),
            finish_min: int32(row, "finish_min"),
        }
    }
}
