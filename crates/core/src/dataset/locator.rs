//! Snapshot discovery.
//!
//! Resolves the three run inputs from the on-disk layout the upstream
//! fetcher maintains: the season reference pair, the highest-numbered
//! complete gameweek folder, and the newest complete draft-league
//! capture. A candidate only qualifies when every required file exists,
//! is non-empty, and has a parseable header carrying the destination
//! table's key columns.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{debug, info, warn};

use crate::errors::{Error, Result};
use crate::tables::{self, TableSpec};

use super::{DraftSnapshot, GameweekSnapshot, LeagueInfo, ReferenceSnapshot, SourceDataset};

const TEAMS_FILE: &str = "teams.csv";
const PLAYERS_FILE: &str = "players.csv";
const GAMEWEEK_DIR: &str = "By Gameweek";
const GAMEWEEK_PREFIX: &str = "GW";
const MATCHES_FILE: &str = "matches.csv";
const PLAYER_STATS_FILE: &str = "playermatchstats.csv";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Draft capture members, as `<base>_<stamp>.<ext>` under a date folder.
const CAPTURE_MEMBERS: [(&str, &str); 4] = [
    ("league_info", "json"),
    ("managers", "csv"),
    ("picks", "csv"),
    ("standings", "csv"),
];

#[derive(Debug, Default)]
struct CaptureFiles {
    league_info: Option<PathBuf>,
    managers: Option<PathBuf>,
    picks: Option<PathBuf>,
    standings: Option<PathBuf>,
}

/// Finds the most recent complete snapshot for each logical input.
pub struct DatasetLocator {
    data_root: PathBuf,
    season: String,
}

impl DatasetLocator {
    pub fn new(data_root: impl Into<PathBuf>, season: impl Into<String>) -> Self {
        Self {
            data_root: data_root.into(),
            season: season.into(),
        }
    }

    /// Resolve all inputs for one run.
    ///
    /// Each input is independently optional, but a run where nothing at
    /// all qualifies is aborted with [`Error::DatasetNotFound`].
    pub fn resolve(&self) -> Result<SourceDataset> {
        let reference = self.reference_snapshot();
        let gameweek = self.latest_gameweek();
        let draft = self.latest_draft_capture();

        if reference.is_none() && gameweek.is_none() && draft.is_none() {
            return Err(Error::dataset_not_found(format!(
                "no complete snapshot under {}",
                self.data_root.display()
            )));
        }

        Ok(SourceDataset {
            reference,
            gameweek,
            draft,
        })
    }

    /// The canonical reference pair; always "the current one".
    fn reference_snapshot(&self) -> Option<ReferenceSnapshot> {
        let season_dir = self.data_root.join(&self.season);
        let teams = season_dir.join(TEAMS_FILE);
        let players = season_dir.join(PLAYERS_FILE);

        if !csv_complete(&teams, &tables::TEAMS) || !csv_complete(&players, &tables::PLAYERS) {
            debug!("no complete reference snapshot in {}", season_dir.display());
            return None;
        }
        Some(ReferenceSnapshot { teams, players })
    }

    /// Highest-numbered gameweek folder whose files all qualify.
    fn latest_gameweek(&self) -> Option<GameweekSnapshot> {
        let gw_root = self.data_root.join(&self.season).join(GAMEWEEK_DIR);
        let entries = match fs::read_dir(&gw_root) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("no gameweek folders at {}: {err}", gw_root.display());
                return None;
            }
        };

        let mut folders: Vec<(i32, PathBuf)> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let number = name.strip_prefix(GAMEWEEK_PREFIX)?.parse::<i32>().ok()?;
                Some((number, e.path()))
            })
            .collect();
        folders.sort_by(|a, b| b.0.cmp(&a.0));

        for (number, path) in folders {
            let matches = path.join(MATCHES_FILE);
            let player_stats = path.join(PLAYER_STATS_FILE);
            if csv_complete(&matches, &tables::MATCHES)
                && csv_complete(&player_stats, &tables::PLAYER_MATCH_STATS)
            {
                info!("resolved gameweek snapshot: GW{number}");
                return Some(GameweekSnapshot {
                    gameweek: number,
                    matches,
                    player_stats,
                });
            }
            warn!(
                "skipping incomplete gameweek folder {}",
                path.display()
            );
        }
        None
    }

    /// Newest complete draft capture, resolved by explicit timestamp
    /// comparison over the archive rather than any filesystem link.
    fn latest_draft_capture(&self) -> Option<DraftSnapshot> {
        let archive = self.data_root.join("draft_league").join("archive");
        let date_dirs = match fs::read_dir(&archive) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("no draft archive at {}: {err}", archive.display());
                return None;
            }
        };

        // Keyed by (timestamp, capture id) so iteration order is oldest
        // to newest with the lexicographic tie-break built in.
        let mut captures: BTreeMap<(NaiveDateTime, String), CaptureFiles> = BTreeMap::new();
        for date_entry in date_dirs.flatten().filter(|e| e.path().is_dir()) {
            let date_name = date_entry.file_name().to_string_lossy().into_owned();
            let files = match fs::read_dir(date_entry.path()) {
                Ok(files) => files,
                Err(_) => continue,
            };
            for file in files.flatten() {
                let file_name = file.file_name().to_string_lossy().into_owned();
                for (base, ext) in CAPTURE_MEMBERS {
                    let Some(stamp) = file_name
                        .strip_prefix(base)
                        .and_then(|rest| rest.strip_prefix('_'))
                        .and_then(|rest| rest.strip_suffix(ext))
                        .and_then(|rest| rest.strip_suffix('.'))
                    else {
                        continue;
                    };
                    let Ok(at) = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT) else {
                        debug!("ignoring unparseable capture stamp '{stamp}'");
                        continue;
                    };
                    let capture_id = format!("{date_name}/{stamp}");
                    let entry = captures.entry((at, capture_id)).or_default();
                    match base {
                        "league_info" => entry.league_info = Some(file.path()),
                        "managers" => entry.managers = Some(file.path()),
                        "picks" => entry.picks = Some(file.path()),
                        "standings" => entry.standings = Some(file.path()),
                        _ => unreachable!(),
                    }
                }
            }
        }

        let mut ordered = captures.iter().rev().peekable();
        while let Some(((at, capture_id), files)) = ordered.next() {
            if let Some(((next_at, _), _)) = ordered.peek() {
                if next_at == at {
                    // The lexicographically greater capture id is examined first.
                    warn!("duplicate capture timestamp {at}; preferring lexicographically greatest identifier");
                }
            }

            if let Some(snapshot) = complete_capture(capture_id, files) {
                info!("resolved draft capture {capture_id}");
                return Some(snapshot);
            }
            warn!("skipping incomplete draft capture {capture_id}");
        }
        None
    }
}

fn complete_capture(capture_id: &str, files: &CaptureFiles) -> Option<DraftSnapshot> {
    let league_info = files.league_info.as_ref()?;
    let managers = files.managers.as_ref()?;
    let picks = files.picks.as_ref()?;
    let standings = files.standings.as_ref()?;

    if !csv_complete(managers, &tables::DRAFT_MANAGERS)
        || !csv_complete(picks, &tables::DRAFT_PICKS)
        || !csv_complete(standings, &tables::DRAFT_STANDINGS)
    {
        return None;
    }

    let league: LeagueInfo = match fs::read_to_string(league_info)
        .map_err(Error::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(Error::from))
    {
        Ok(league) => league,
        Err(err) => {
            debug!("capture {capture_id} has unreadable league metadata: {err}");
            return None;
        }
    };

    Some(DraftSnapshot {
        capture_id: capture_id.to_string(),
        league,
        managers: managers.clone(),
        picks: picks.clone(),
        standings: standings.clone(),
    })
}

/// Completeness predicate for one snapshot CSV: present, non-empty,
/// parseable header containing the destination table's key columns.
fn csv_complete(path: &Path, table: &TableSpec) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {}
        Ok(_) => {
            debug!("{} is empty", path.display());
            return false;
        }
        Err(err) => {
            debug!("{} is missing: {err}", path.display());
            return false;
        }
    }

    let mut reader = match csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(err) => {
            debug!("{} is unreadable: {err}", path.display());
            return false;
        }
    };
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            debug!("{} has an unparseable header: {err}", path.display());
            return false;
        }
    };

    for column in table.required_source_columns() {
        if !headers.iter().any(|h| h == column.source_name()) {
            debug!(
                "{} lacks key column '{}' for table {}",
                path.display(),
                column.source_name(),
                table.name
            );
            return false;
        }
    }
    true
}
