use anyhow::Result;

use crate::db::models::MetricName;
use crate::db::Catalog;
use crate::error::EvalError;

use super::scope::TableScope;

/// Resolve a (metric, scope) descriptor to exactly one catalog identifier.
///
/// The expected name is built from the typed descriptor and matched against
/// the live catalog listing case-insensitively. Zero matches is a lookup
/// error carrying the descriptor; more than one match is never taken
/// silently.
pub fn resolve(catalog: &Catalog, metric: MetricName, scope: TableScope) -> Result<String> {
    let expected = scope.table_name(metric);
    let tables = catalog.list_tables()?;
    Ok(match_identifier(&tables, &expected)?)
}

fn match_identifier(tables: &[String], expected: &str) -> Result<String, EvalError> {
    let mut matches: Vec<String> = tables
        .iter()
        .filter(|name| name.eq_ignore_ascii_case(expected))
        .cloned()
        .collect();
    match matches.len() {
        0 => Err(EvalError::NoSuchTable {
            name: expected.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(EvalError::AmbiguousTable {
            name: expected.to_string(),
            matches,
        }),
    }
}
