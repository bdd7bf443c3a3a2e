//! Insertable row models built from coerced engine rows.
//!
//! Coercion already enforced nullability and type class per column, so
//! the builders here only narrow types for the sqlite backend.

mod draft;
mod season;

pub use draft::{DraftLeagueDB, DraftManagerDB, DraftPickDB, DraftStandingDB};
pub use season::{MatchDB, PlayerDB, PlayerMatchStatDB, TeamDB};

use fplsync_core::coerce::CoercedRow;
use num_traits::ToPrimitive;

pub(crate) fn int(row: &CoercedRow, name: &str) -> i64 {
    row.integer(name).unwrap_or_default()
}

pub(crate) fn int_opt(row: &CoercedRow, name: &str) -> Option<i64> {
    row.integer(name)
}

pub(crate) fn int32(row: &CoercedRow, name: &str) -> i32 {
    row.integer(name).unwrap_or_default() as i32
}

pub(crate) fn int32_opt(row: &CoercedRow, name: &str) -> Option<i32> {
    row.integer(name).map(|n| n as i32)
}

pub(crate) fn text(row: &CoercedRow, name: &str) -> String {
    row.text(name).unwrap_or_default()
}

pub(crate) fn text_opt(row: &CoercedRow, name: &str) -> Option<String> {
    row.text(name)
}

pub(crate) fn real(row: &CoercedRow, name: &str) -> f64 {
    row.decimal(name).and_then(|d| d.to_f64()).unwrap_or_default()
}

pub(crate) fn real_opt(row: &CoercedRow, name: &str) -> Option<f64> {
    row.decimal(name).and_then(|d| d.to_f64())
}

pub(crate) fn flag(row: &CoercedRow, name: &str) -> i32 {
    row.boolean(name).map(i32::from).unwrap_or_default()
}

pub(crate) fn flag_opt(row: &CoercedRow, name: &str) -> Option<i32> {
    row.boolean(name).map(i32::from)
}

pub(crate) fn stamp_opt(row: &CoercedRow, name: &str) -> Option<String> {
    row.timestamp(name).map(|at| at.to_rfc3339())
}
