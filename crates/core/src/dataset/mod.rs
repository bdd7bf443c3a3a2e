//! Resolved snapshot inputs for one run.

mod locator;

pub use locator::DatasetLocator;

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Partition key bounding a scoped replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Season reference data; replacement covers the whole table.
    Reference,
    /// One gameweek's match data.
    Gameweek(i32),
    /// One draft league.
    League(i64),
}

impl Scope {
    pub fn gameweek(&self) -> Option<i32> {
        match self {
            Self::Gameweek(n) => Some(*n),
            _ => None,
        }
    }

    pub fn league_id(&self) -> Option<i64> {
        match self {
            Self::League(id) => Some(*id),
            _ => None,
        }
    }

    /// Value injected into a table's scope column.
    pub fn injected_value(&self) -> Option<i64> {
        match self {
            Self::Reference => None,
            Self::Gameweek(n) => Some(i64::from(*n)),
            Self::League(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Gameweek(n) => write!(f, "gameweek {n}"),
            Self::League(id) => write!(f, "league {id}"),
        }
    }
}

/// League metadata record captured alongside the draft CSVs.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueInfo {
    pub league_id: i64,
    pub league_name: String,
    pub draft_status: String,
    pub draft_dt: Option<String>,
    pub start_event: Option<i32>,
    pub stop_event: Option<i32>,
    pub total_managers: i64,
}

/// The canonical season reference file pair.
#[derive(Debug, Clone)]
pub struct ReferenceSnapshot {
    pub teams: PathBuf,
    pub players: PathBuf,
}

/// The newest complete gameweek folder.
#[derive(Debug, Clone)]
pub struct GameweekSnapshot {
    pub gameweek: i32,
    pub matches: PathBuf,
    pub player_stats: PathBuf,
}

/// The newest complete draft-league capture.
#[derive(Debug, Clone)]
pub struct DraftSnapshot {
    /// `<date dir>/<stamp>`, e.g. `2025-08-02/20250802_153000`.
    pub capture_id: String,
    pub league: LeagueInfo,
    pub managers: PathBuf,
    pub picks: PathBuf,
    pub standings: PathBuf,
}

/// Everything the locator resolved for one run. Read-only afterwards.
///
/// Each input is independently optional; a run with nothing resolved is
/// rejected by the locator before this is returned.
#[derive(Debug, Clone)]
pub struct SourceDataset {
    pub reference: Option<ReferenceSnapshot>,
    pub gameweek: Option<GameweekSnapshot>,
    pub draft: Option<DraftSnapshot>,
}
