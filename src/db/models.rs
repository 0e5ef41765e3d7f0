use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// The five box-score metrics that have a GPIV-weighted counterpart.
///
/// Each variant maps deterministically to one traditional column and one
/// weighted column in the upstream ranking tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
pub enum MetricName {
    Goals,
    Assists,
    #[serde(rename = "First_Assists")]
    FirstAssists,
    PlusMinus,
    Points,
}

impl MetricName {
    pub const ALL: [MetricName; 5] = [
        MetricName::Goals,
        MetricName::Assists,
        MetricName::FirstAssists,
        MetricName::PlusMinus,
        MetricName::Points,
    ];

    /// Column name of the traditional metric, spelled as produced upstream.
    pub fn traditional_column(self) -> &'static str {
        match self {
            MetricName::Goals => "Goals",
            MetricName::Assists => "Assists",
            MetricName::FirstAssists => "First_Assists",
            MetricName::PlusMinus => "PlusMinus",
            MetricName::Points => "Points",
        }
    }

    /// Column name of the GPIV-weighted counterpart.
    pub fn weighted_column(self) -> String {
        format!("Weighted{}", self.traditional_column())
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the CLI value names so clap defaults round-trip.
        let s = match self {
            MetricName::Goals => "goals",
            MetricName::Assists => "assists",
            MetricName::FirstAssists => "first-assists",
            MetricName::PlusMinus => "plus-minus",
            MetricName::Points => "points",
        };
        f.write_str(s)
    }
}

/// Identity triple the upstream tables are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerKey {
    pub player_id: i64,
    pub player_name: String,
    pub position: String,
}

/// One player's metric pair within a single table scope.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub key: PlayerKey,
    pub traditional: f64,
    pub weighted: f64,
}

/// A fetched ranking table: read-only input materialized upstream.
#[derive(Debug, Clone)]
pub struct RankingTable {
    pub metric: MetricName,
    pub rows: Vec<RankingRow>,
}

impl RankingTable {
    /// Traditional-metric column, in row order.
    pub fn traditional_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.traditional).collect()
    }

    /// Weighted-metric column, in row order.
    pub fn weighted_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.weighted).collect()
    }
}
