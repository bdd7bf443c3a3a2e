//! Typed value coercion under the per-column null/default policy.
//!
//! Numeric columns always recover from bad input (0 when non-nullable,
//! NULL when nullable) so a sparse statistics file never loses rows.
//! Non-numeric non-nullable columns are the only place a row can be
//! dropped, and a drop is recorded with its source row index and raw
//! value rather than failing the file.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use csv::StringRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::dataset::Scope;
use crate::reconcile::{ColumnMapping, ColumnSource};
use crate::tables::{ColumnSpec, TableSpec, TypeClass};

/// Fixed precision for decimal columns.
pub const DECIMAL_SCALE: u32 = 2;

const TRUTHY: [&str; 5] = ["true", "t", "1", "yes", "y"];
const FALSY: [&str; 5] = ["false", "f", "0", "no", "n"];

/// A coerced destination value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Why one source row was excluded from the load.
#[derive(Debug, Clone, Serialize)]
pub struct RowCoercionError {
    /// 1-based data row index within the snapshot file.
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub message: String,
}

impl std::fmt::Display for RowCoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}: column '{}' value '{}': {}",
            self.row, self.column, self.raw, self.message
        )
    }
}

/// One fully coerced row, aligned with its table's declared columns.
#[derive(Debug, Clone)]
pub struct CoercedRow {
    pub table: &'static TableSpec,
    pub values: Vec<Value>,
}

impl CoercedRow {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.table
            .column_index(name)
            .and_then(|i| self.values.get(i))
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        match self.value(name)? {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.value(name)? {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

/// Coerce one snapshot record into a destination row.
///
/// `row` is the 1-based data row index used in error records.
pub fn coerce_record(
    table: &'static TableSpec,
    mapping: &ColumnMapping,
    record: &StringRecord,
    scope: &Scope,
    row: usize,
) -> Result<CoercedRow, RowCoercionError> {
    debug_assert_eq!(mapping.sources.len(), table.columns.len());

    let mut values = Vec::with_capacity(table.columns.len());
    for (column, source) in table.columns.iter().zip(&mapping.sources) {
        let value = match source {
            ColumnSource::Snapshot(index) => {
                coerce_cell(column, record.get(*index).unwrap_or(""), row)?
            }
            ColumnSource::Default => coerce_cell(column, column.default.unwrap_or(""), row)?,
            ColumnSource::Null => missing_column_value(column, row)?,
            ColumnSource::Scope => match scope.injected_value() {
                Some(id) => Value::Integer(id),
                None => {
                    return Err(failure(column, row, "", "no scope value for scope column"));
                }
            },
        };
        values.push(value);
    }

    Ok(CoercedRow { table, values })
}

/// Coerce one raw cell per its column's declared type class.
pub fn coerce_cell(
    column: &ColumnSpec,
    raw: &str,
    row: usize,
) -> Result<Value, RowCoercionError> {
    let raw = raw.trim();
    match column.ty {
        TypeClass::Text => Ok(coerce_text(column, raw)),
        TypeClass::Integer => Ok(coerce_integer(column, raw, i64::MIN, i64::MAX)),
        TypeClass::Percent => Ok(coerce_integer(column, raw, 0, 100)),
        TypeClass::Decimal => Ok(coerce_decimal(column, raw)),
        TypeClass::Boolean => coerce_boolean(column, raw, row),
        TypeClass::Timestamp => coerce_timestamp(column, raw, row),
    }
}

fn coerce_text(column: &ColumnSpec, raw: &str) -> Value {
    if raw.is_empty() {
        if column.nullable {
            Value::Null
        } else {
            Value::Text(String::new())
        }
    } else {
        Value::Text(raw.to_string())
    }
}

fn coerce_integer(column: &ColumnSpec, raw: &str, min: i64, max: i64) -> Value {
    let parsed = raw
        .parse::<i64>()
        .ok()
        .or_else(|| {
            // Accept decimal-formatted integers such as "3.0".
            raw.parse::<Decimal>()
                .ok()?
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        });
    match parsed {
        Some(n) => Value::Integer(n.clamp(min, max)),
        None => recover_numeric(column),
    }
}

fn coerce_decimal(column: &ColumnSpec, raw: &str) -> Value {
    match raw.parse::<Decimal>() {
        Ok(d) => Value::Decimal(
            d.round_dp_with_strategy(DECIMAL_SCALE, RoundingStrategy::MidpointAwayFromZero),
        ),
        Err(_) => recover_numeric(column),
    }
}

/// Empty or unparseable numeric input: 0 when non-nullable, NULL when
/// nullable. Never a row-level failure.
fn recover_numeric(column: &ColumnSpec) -> Value {
    if column.nullable {
        Value::Null
    } else if column.ty == TypeClass::Decimal {
        Value::Decimal(Decimal::ZERO)
    } else {
        Value::Integer(0)
    }
}

fn coerce_boolean(
    column: &ColumnSpec,
    raw: &str,
    row: usize,
) -> Result<Value, RowCoercionError> {
    let token = raw.to_ascii_lowercase();
    if TRUTHY.contains(&token.as_str()) {
        return Ok(Value::Boolean(true));
    }
    if FALSY.contains(&token.as_str()) {
        return Ok(Value::Boolean(false));
    }
    if column.nullable {
        return Ok(Value::Null);
    }
    Err(failure(column, row, raw, "not a recognized boolean token"))
}

fn coerce_timestamp(
    column: &ColumnSpec,
    raw: &str,
    row: usize,
) -> Result<Value, RowCoercionError> {
    if raw.is_empty() {
        if column.nullable {
            return Ok(Value::Null);
        }
        return Err(failure(column, row, raw, "empty timestamp"));
    }
    if let Some(at) = parse_timestamp(raw) {
        return Ok(Value::Timestamp(at));
    }
    if column.nullable {
        return Ok(Value::Null);
    }
    Err(failure(column, row, raw, "not an ISO-8601 timestamp"))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    // Upstream occasionally omits the zone designator; treat as UTC.
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Value for a destination-only column with no default: the missing
/// column behaves like an empty cell in every row.
fn missing_column_value(column: &ColumnSpec, row: usize) -> Result<Value, RowCoercionError> {
    if column.nullable {
        return Ok(Value::Null);
    }
    if column.ty.is_numeric() {
        return Ok(recover_numeric(column));
    }
    Err(failure(column, row, "", "required column absent from snapshot"))
}

fn failure(column: &ColumnSpec, row: usize, raw: &str, message: &str) -> RowCoercionError {
    RowCoercionError {
        row,
        column: column.name.to_string(),
        raw: raw.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::tables;
    use rust_decimal_macros::dec;

    fn column<'a>(table: &'a TableSpec, name: &str) -> &'a ColumnSpec {
        table.column(name).unwrap()
    }

    #[test]
    fn decimal_formatted_integers_parse() {
        let owner = column(&tables::DRAFT_PICKS, "owner");
        assert_eq!(coerce_cell(owner, "3.0", 1).unwrap(), Value::Integer(3));
        assert_eq!(coerce_cell(owner, "3.6", 1).unwrap(), Value::Integer(4));
    }

    #[test]
    fn empty_nullable_integer_is_null() {
        let owner = column(&tables::DRAFT_PICKS, "owner");
        assert_eq!(coerce_cell(owner, "", 1).unwrap(), Value::Null);
    }

    #[test]
    fn empty_non_nullable_numeric_is_zero() {
        let goals = column(&tables::PLAYER_MATCH_STATS, "goals");
        assert_eq!(coerce_cell(goals, "", 1).unwrap(), Value::Integer(0));

        let xg = column(&tables::PLAYER_MATCH_STATS, "xg");
        assert_eq!(
            coerce_cell(xg, "", 1).unwrap(),
            Value::Decimal(Decimal::ZERO)
        );
        assert_eq!(
            coerce_cell(xg, "n/a", 1).unwrap(),
            Value::Decimal(Decimal::ZERO)
        );
    }

    #[test]
    fn decimals_round_to_fixed_precision() {
        let xg = column(&tables::PLAYER_MATCH_STATS, "xg");
        assert_eq!(
            coerce_cell(xg, "0.847", 1).unwrap(),
            Value::Decimal(dec!(0.85))
        );
    }

    #[test]
    fn percent_columns_are_bounded_and_rounded() {
        let pct = column(&tables::PLAYER_MATCH_STATS, "accurate_passes_percent");
        assert_eq!(coerce_cell(pct, "87.4", 1).unwrap(), Value::Integer(87));
        assert_eq!(coerce_cell(pct, "104.2", 1).unwrap(), Value::Integer(100));
        assert_eq!(coerce_cell(pct, "-3", 1).unwrap(), Value::Integer(0));
    }

    #[test]
    fn boolean_tokens() {
        let finished = column(&tables::MATCHES, "finished");
        for raw in ["true", "True", "1", "yes"] {
            assert_eq!(coerce_cell(finished, raw, 1).unwrap(), Value::Boolean(true));
        }
        for raw in ["false", "F", "0", "no"] {
            assert_eq!(
                coerce_cell(finished, raw, 1).unwrap(),
                Value::Boolean(false)
            );
        }
        let err = coerce_cell(finished, "maybe", 7).unwrap_err();
        assert_eq!(err.row, 7);
        assert_eq!(err.raw, "maybe");
    }

    #[test]
    fn nullable_boolean_recovers_to_null() {
        let trade = column(&tables::DRAFT_PICKS, "in_accepted_trade");
        assert_eq!(coerce_cell(trade, "maybe", 1).unwrap(), Value::Null);
        assert_eq!(coerce_cell(trade, "", 1).unwrap(), Value::Null);
    }

    #[test]
    fn timestamps_parse_and_empty_is_null() {
        let kickoff = column(&tables::MATCHES, "kickoff_time");
        let at = coerce_cell(kickoff, "2025-08-16T11:30:00Z", 1).unwrap();
        match at {
            Value::Timestamp(at) => assert_eq!(at.to_rfc3339(), "2025-08-16T11:30:00+00:00"),
            other => panic!("unexpected value: {other:?}"),
        }
        assert_eq!(coerce_cell(kickoff, "", 1).unwrap(), Value::Null);
        assert!(matches!(
            coerce_cell(kickoff, "2025-08-16 11:30:00", 1).unwrap(),
            Value::Timestamp(_)
        ));
    }

    #[test]
    fn empty_text_normalizes_per_nullability() {
        let position = column(&tables::PLAYERS, "position");
        assert_eq!(coerce_cell(position, "", 1).unwrap(), Value::Null);

        let web_name = column(&tables::PLAYERS, "web_name");
        assert_eq!(
            coerce_cell(web_name, "", 1).unwrap(),
            Value::Text(String::new())
        );
    }

    #[test]
    fn scope_value_is_injected_into_full_rows() {
        let headers = StringRecord::from(vec!["element", "owner", "status"]);
        let mapping = reconcile(&tables::DRAFT_PICKS, &headers).unwrap();
        let record = StringRecord::from(vec!["100", "3.0", "o"]);

        let row = coerce_record(
            &tables::DRAFT_PICKS,
            &mapping,
            &record,
            &Scope::League(25029),
            1,
        )
        .unwrap();

        assert_eq!(row.integer("league_id"), Some(25029));
        assert_eq!(row.integer("element_id"), Some(100));
        assert_eq!(row.integer("owner"), Some(3));
        assert_eq!(row.text("status"), Some("o".to_string()));
    }

    #[test]
    fn missing_text_key_column_is_schema_incompatible() {
        let headers = StringRecord::from(vec!["player_id", "goals"]);
        let err = reconcile(&tables::PLAYER_MATCH_STATS, &headers).unwrap_err();
        assert!(matches!(err, crate::errors::Error::SchemaIncompatible { .. }));
    }
}
