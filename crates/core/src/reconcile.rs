//! Column reconciliation between a snapshot header and a destination
//! table's declared column set.

use csv::StringRecord;
use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::tables::TableSpec;

/// Where each destination column's value comes from for this file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// Matched snapshot column, by header index.
    Snapshot(usize),
    /// Destination-only column filled from its declared default.
    Default,
    /// Destination-only nullable column, left NULL.
    Null,
    /// Filled from the run scope, never from the snapshot.
    Scope,
}

/// Three-way reconciliation result for one table in one run.
#[derive(Debug)]
pub struct ColumnMapping {
    /// One source per destination column, aligned with the declared columns.
    pub sources: Vec<ColumnSource>,
    /// Snapshot columns with no destination counterpart; dropped.
    pub dropped: Vec<String>,
}

/// Map the snapshot header onto the table's declared columns.
///
/// Scope columns are always scope-injected, even when the snapshot
/// carries a column of the same name, so a mislabeled row can never
/// escape its replacement scope. Fails (table scope only) when a key
/// column has no snapshot counterpart.
pub fn reconcile(table: &TableSpec, headers: &StringRecord) -> Result<ColumnMapping> {
    let mut sources = Vec::with_capacity(table.columns.len());
    let mut matched = vec![false; headers.len()];

    for column in table.columns {
        if table.scope_column == Some(column.name) {
            if let Some(index) = header_index(headers, column.source_name()) {
                matched[index] = true;
            }
            sources.push(ColumnSource::Scope);
            continue;
        }

        match header_index(headers, column.source_name()) {
            Some(index) => {
                matched[index] = true;
                sources.push(ColumnSource::Snapshot(index));
            }
            None if table.key.contains(&column.name) => {
                return Err(Error::SchemaIncompatible {
                    table: table.name.to_string(),
                    column: column.source_name().to_string(),
                });
            }
            None if column.default.is_some() => sources.push(ColumnSource::Default),
            None => {
                if !column.nullable {
                    // No declared default to fall back on; every row will
                    // fail coercion for this column and be skipped.
                    warn!(
                        "table {}: non-nullable column '{}' absent from snapshot and has no default",
                        table.name, column.name
                    );
                }
                sources.push(ColumnSource::Null);
            }
        }
    }

    let dropped: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !matched[*i])
        .map(|(_, h)| h.to_string())
        .collect();
    if !dropped.is_empty() {
        debug!(
            "table {}: dropping {} snapshot-only column(s): {}",
            table.name,
            dropped.len(),
            dropped.join(", ")
        );
    }

    Ok(ColumnMapping { sources, dropped })
}

fn header_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables;

    fn headers(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn matched_columns_pass_through_by_index() {
        let mapping = reconcile(
            &tables::PLAYERS,
            &headers(&[
                "player_code",
                "player_id",
                "first_name",
                "second_name",
                "web_name",
                "team_code",
                "position",
            ]),
        )
        .unwrap();

        assert_eq!(mapping.sources[0], ColumnSource::Snapshot(0));
        assert_eq!(mapping.sources[4], ColumnSource::Snapshot(4));
        assert!(mapping.dropped.is_empty());
    }

    #[test]
    fn snapshot_only_columns_are_dropped_not_fatal() {
        let mapping = reconcile(
            &tables::PLAYERS,
            &headers(&[
                "player_code",
                "player_id",
                "web_name",
                "team_code",
                "new_telemetry_field",
            ]),
        )
        .unwrap();

        assert_eq!(mapping.dropped, vec!["new_telemetry_field".to_string()]);
    }

    #[test]
    fn destination_only_columns_default_or_null() {
        let mapping = reconcile(
            &tables::PLAYER_MATCH_STATS,
            &headers(&["player_id", "match_id", "goals"]),
        )
        .unwrap();

        let xg = tables::PLAYER_MATCH_STATS.column_index("xg").unwrap();
        assert_eq!(mapping.sources[xg], ColumnSource::Default);

        let gameweek = tables::PLAYER_MATCH_STATS
            .column_index("gameweek")
            .unwrap();
        assert_eq!(mapping.sources[gameweek], ColumnSource::Scope);
    }

    #[test]
    fn missing_key_column_is_schema_incompatible() {
        let err = reconcile(
            &tables::DRAFT_PICKS,
            &headers(&["owner", "status", "in_accepted_trade"]),
        )
        .unwrap_err();

        match err {
            Error::SchemaIncompatible { table, column } => {
                assert_eq!(table, "draft_picks");
                assert_eq!(column, "element");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scope_column_ignores_snapshot_value() {
        let mapping = reconcile(
            &tables::MATCHES,
            &headers(&["match_id", "gameweek", "home_team", "away_team"]),
        )
        .unwrap();

        let gameweek = tables::MATCHES.column_index("gameweek").unwrap();
        assert_eq!(mapping.sources[gameweek], ColumnSource::Scope);
        // The snapshot's own gameweek column is treated as consumed, not
        // reported as a dropped column.
        assert!(mapping.dropped.is_empty());
    }
}
