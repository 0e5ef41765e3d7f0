use crate::db::models::MetricName;
use crate::error::EvalError;

/// Which slice of play-by-play aggregation a ranking table covers.
///
/// A closed descriptor type instead of string-assembled table names; the
/// naming convention in [`TableScope::table_name`] is the fixed contract with
/// the upstream weighting jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableScope {
    /// One full regular season.
    FullSeason { season: u16 },
    /// The playoffs of one season.
    Playoffs { season: u16 },
    /// Several pooled training seasons, tagged with the season they are
    /// evaluated against.
    MultiSeason { eval_season: u16 },
    /// Partition `part` of `partitions` contiguous slices of one season.
    Partition {
        season: u16,
        partitions: u32,
        part: u32,
    },
}

impl TableScope {
    /// Partition scope with index validation; `part` is 1-based.
    pub fn partition(season: u16, partitions: u32, part: u32) -> Result<Self, EvalError> {
        if partitions < 2 {
            return Err(EvalError::TooFewPartitions { partitions });
        }
        if part < 1 || part > partitions {
            return Err(EvalError::PartitionOutOfRange { part, partitions });
        }
        Ok(TableScope::Partition {
            season,
            partitions,
            part,
        })
    }

    /// The season this scope is reported under.
    pub fn season(self) -> u16 {
        match self {
            TableScope::FullSeason { season }
            | TableScope::Playoffs { season }
            | TableScope::Partition { season, .. } => season,
            TableScope::MultiSeason { eval_season } => eval_season,
        }
    }

    /// Upstream table identifier for this scope and metric.
    pub fn table_name(self, metric: MetricName) -> String {
        let metric = metric.traditional_column();
        match self {
            TableScope::FullSeason { season } => {
                format!("weighted_{metric}_ranked{season}")
            }
            TableScope::Playoffs { season } => {
                format!("weighted_{metric}_ranked{season}_playoffs")
            }
            TableScope::MultiSeason { eval_season } => {
                format!("weighted_{metric}_ranked{eval_season}_multiple")
            }
            TableScope::Partition {
                season,
                partitions,
                part,
            } => {
                format!("weighted_{metric}_ranked{season}_{partitions}partitions_part{part}")
            }
        }
    }
}
