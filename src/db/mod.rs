use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

pub mod models;
use models::{MetricName, PlayerKey, RankingRow, RankingTable};

use crate::error::EvalError;

/// Handle to the store holding the upstream ranking tables.
///
/// One catalog is opened per experiment run and passed down explicitly; every
/// statement issued through it is a read-only query.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open the SQLite database at the given path.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("opening ranking store at {path}"))?;
        Ok(Catalog { conn })
    }

    /// Wrap an existing connection (tests use an in-memory store).
    pub fn from_connection(conn: Connection) -> Self {
        Catalog { conn }
    }

    /// List every table currently present in the store.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Fetch a resolved ranking table: player identity plus the metric pair.
    ///
    /// A missing metric column means the upstream schema no longer matches
    /// this pipeline's assumptions and is fatal for the combination.
    pub fn fetch_ranking(&self, table: &str, metric: MetricName) -> Result<RankingTable> {
        let traditional = metric.traditional_column();
        let weighted = metric.weighted_column();
        for column in [traditional, weighted.as_str()] {
            if !self.has_column(table, column)? {
                return Err(EvalError::ColumnMismatch {
                    table: table.to_string(),
                    column: column.to_string(),
                }
                .into());
            }
        }

        let sql = format!(
            "SELECT PlayerId, PlayerName, Position, \"{traditional}\", \"{weighted}\" \
             FROM \"{table}\""
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .with_context(|| format!("reading ranking table '{table}'"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RankingRow {
                    key: PlayerKey {
                        player_id: row.get(0)?,
                        player_name: row.get(1)?,
                        position: row.get(2)?,
                    },
                    traditional: row.get(3)?,
                    weighted: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("reading ranking table '{table}'"))?;

        debug!(table, rows = rows.len(), "fetched ranking table");
        Ok(RankingTable { metric, rows })
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info(\"{table}\")"))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names.iter().any(|c| c.eq_ignore_ascii_case(column)))
    }
}
