//! Declarative catalog of the destination tables.
//!
//! Each table declares its column set, natural key, and (for scoped
//! tables) the column bound to the run scope. The reconciler and coercer
//! are driven entirely by this catalog; the storage layer maps catalog
//! names onto its diesel schema.

/// Type class driving coercion for one destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Passthrough text; empty normalized per nullability.
    Text,
    /// Whole number; accepts decimal-formatted integers ("3.0" -> 3).
    Integer,
    /// Integer bounded and rounded into [0, 100].
    Percent,
    /// Fixed-precision decimal (2 dp).
    Decimal,
    /// Fixed truthy/falsy token set.
    Boolean,
    /// ISO-8601 timestamp.
    Timestamp,
}

impl TypeClass {
    /// Numeric classes recover from bad input (0 when non-nullable)
    /// instead of dropping the row.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Percent | Self::Decimal)
    }
}

/// One declared destination column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Snapshot header name when it differs from the destination name.
    pub source: Option<&'static str>,
    pub ty: TypeClass,
    pub nullable: bool,
    /// Raw default applied when the snapshot lacks the column; runs
    /// through the coercer like any other cell.
    pub default: Option<&'static str>,
}

impl ColumnSpec {
    /// Header name this column matches in the snapshot.
    pub fn source_name(&self) -> &'static str {
        self.source.unwrap_or(self.name)
    }
}

const fn required(name: &'static str, ty: TypeClass) -> ColumnSpec {
    ColumnSpec {
        name,
        source: None,
        ty,
        nullable: false,
        default: None,
    }
}

const fn nullable(name: &'static str, ty: TypeClass) -> ColumnSpec {
    ColumnSpec {
        name,
        source: None,
        ty,
        nullable: true,
        default: None,
    }
}

const fn defaulted(name: &'static str, ty: TypeClass, default: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        source: None,
        ty,
        nullable: false,
        default: Some(default),
    }
}

const fn aliased(name: &'static str, source: &'static str, ty: TypeClass) -> ColumnSpec {
    ColumnSpec {
        name,
        source: Some(source),
        ty,
        nullable: false,
        default: None,
    }
}

/// A destination table: columns, natural key, scope binding.
#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    /// Natural key, unique within the table's scope.
    pub key: &'static [&'static str],
    /// Column filled from the run scope instead of the snapshot.
    pub scope_column: Option<&'static str>,
}

impl TableSpec {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Key columns that must come from the snapshot (everything in the
    /// key except the scope-injected column).
    pub fn required_source_columns(&self) -> impl Iterator<Item = &ColumnSpec> + '_ {
        self.key
            .iter()
            .filter(move |k| self.scope_column != Some(**k))
            .filter_map(move |k| self.column(k))
    }
}

use TypeClass::{Boolean, Decimal, Integer, Percent, Text, Timestamp};

pub static TEAMS: TableSpec = TableSpec {
    name: "teams",
    columns: &[
        required("code", Integer),
        required("id", Integer),
        required("name", Text),
        required("short_name", Text),
        nullable("strength", Integer),
        nullable("strength_overall_home", Integer),
        nullable("strength_overall_away", Integer),
        nullable("strength_attack_home", Integer),
        nullable("strength_attack_away", Integer),
        nullable("strength_defence_home", Integer),
        nullable("strength_defence_away", Integer),
        nullable("pulse_id", Integer),
        nullable("elo", Decimal),
    ],
    key: &["code"],
    scope_column: None,
};

pub static PLAYERS: TableSpec = TableSpec {
    name: "players",
    columns: &[
        required("player_code", Integer),
        required("player_id", Integer),
        nullable("first_name", Text),
        nullable("second_name", Text),
        required("web_name", Text),
        required("team_code", Integer),
        nullable("position", Text),
    ],
    key: &["player_code"],
    scope_column: None,
};

pub static MATCHES: TableSpec = TableSpec {
    name: "matches",
    columns: &[
        required("match_id", Text),
        required("gameweek", Integer),
        nullable("kickoff_time", Timestamp),
        required("home_team", Text),
        required("away_team", Text),
        nullable("home_team_elo", Decimal),
        nullable("away_team_elo", Decimal),
        nullable("home_score", Integer),
        nullable("away_score", Integer),
        defaulted("finished", Boolean, "false"),
        defaulted("home_possession", Percent, "0"),
        defaulted("away_possession", Percent, "0"),
        defaulted("home_expected_goals_xg", Decimal, "0"),
        defaulted("away_expected_goals_xg", Decimal, "0"),
        defaulted("home_total_shots", Integer, "0"),
        defaulted("away_total_shots", Integer, "0"),
        defaulted("home_shots_on_target", Integer, "0"),
        defaulted("away_shots_on_target", Integer, "0"),
        defaulted("home_accurate_passes", Integer, "0"),
        defaulted("away_accurate_passes", Integer, "0"),
        defaulted("home_accurate_passes_pct", Percent, "0"),
        defaulted("away_accurate_passes_pct", Percent, "0"),
        defaulted("home_corners", Integer, "0"),
        defaulted("away_corners", Integer, "0"),
        defaulted("home_yellow_cards", Integer, "0"),
        defaulted("away_yellow_cards", Integer, "0"),
        defaulted("home_red_cards", Integer, "0"),
        defaulted("away_red_cards", Integer, "0"),
    ],
    key: &["match_id"],
    scope_column: Some("gameweek"),
};

pub static PLAYER_MATCH_STATS: TableSpec = TableSpec {
    name: "playermatchstats",
    columns: &[
        required("player_id", Integer),
        required("match_id", Text),
        required("gameweek", Integer),
        defaulted("minutes_played", Integer, "0"),
        defaulted("goals", Integer, "0"),
        defaulted("assists", Integer, "0"),
        defaulted("total_shots", Integer, "0"),
        defaulted("shots_on_target", Integer, "0"),
        defaulted("xg", Decimal, "0"),
        defaulted("xa", Decimal, "0"),
        defaulted("xgot", Decimal, "0"),
        defaulted("xgot_faced", Decimal, "0"),
        defaulted("goals_prevented", Decimal, "0"),
        defaulted("accurate_passes", Integer, "0"),
        defaulted("accurate_passes_percent", Percent, "0"),
        defaulted("chances_created", Integer, "0"),
        defaulted("accurate_crosses", Integer, "0"),
        defaulted("accurate_crosses_percent", Percent, "0"),
        defaulted("tackles_won", Integer, "0"),
        defaulted("tackles_won_percent", Percent, "0"),
        defaulted("interceptions", Integer, "0"),
        defaulted("duels_won", Integer, "0"),
        defaulted("duels_lost", Integer, "0"),
        defaulted("fouls_committed", Integer, "0"),
        defaulted("saves", Integer, "0"),
        defaulted("goals_conceded", Integer, "0"),
        defaulted("start_min", Integer, "0"),
        defaulted("finish_min", Integer, "0"),
    ],
    key: &["player_id", "match_id"],
    scope_column: Some("gameweek"),
};

pub static DRAFT_LEAGUES: TableSpec = TableSpec {
    name: "draft_leagues",
    columns: &[
        required("league_id", Integer),
        aliased("name", "league_name", Text),
        required("draft_status", Text),
        nullable("draft_dt", Timestamp),
        nullable("start_event", Integer),
        nullable("stop_event", Integer),
        defaulted("total_managers", Integer, "0"),
    ],
    key: &["league_id"],
    scope_column: Some("league_id"),
};

pub static DRAFT_MANAGERS: TableSpec = TableSpec {
    name: "draft_managers",
    columns: &[
        required("league_id", Integer),
        required("id", Integer),
        nullable("entry_id", Integer),
        nullable("entry_name", Text),
        nullable("player_first_name", Text),
        nullable("player_last_name", Text),
        nullable("short_name", Text),
        nullable("waiver_pick", Integer),
        nullable("joined_time", Timestamp),
    ],
    key: &["league_id", "id"],
    scope_column: Some("league_id"),
};

pub static DRAFT_PICKS: TableSpec = TableSpec {
    name: "draft_picks",
    columns: &[
        required("league_id", Integer),
        aliased("element_id", "element", Integer),
        nullable("owner", Integer),
        nullable("status", Text),
        nullable("in_accepted_trade", Boolean),
    ],
    key: &["league_id", "element_id"],
    scope_column: Some("league_id"),
};

pub static DRAFT_STANDINGS: TableSpec = TableSpec {
    name: "draft_standings",
    columns: &[
        required("league_id", Integer),
        aliased("entry_id", "league_entry", Integer),
        nullable("rank", Integer),
        nullable("last_rank", Integer),
        nullable("rank_sort", Integer),
        nullable("total", Integer),
        nullable("event_total", Integer),
        nullable("matches_won", Integer),
        nullable("matches_drawn", Integer),
        nullable("matches_lost", Integer),
        nullable("points_for", Integer),
        nullable("points_against", Integer),
    ],
    key: &["league_id", "entry_id"],
    scope_column: Some("league_id"),
};

/// Fixed, deterministic processing order for one run.
pub fn destination_tables() -> [&'static TableSpec; 8] {
    [
        &TEAMS,
        &PLAYERS,
        &MATCHES,
        &PLAYER_MATCH_STATS,
        &DRAFT_LEAGUES,
        &DRAFT_MANAGERS,
        &DRAFT_PICKS,
        &DRAFT_STANDINGS,
    ]
}
