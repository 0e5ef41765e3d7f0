use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::db::models::MetricName;
use crate::db::Catalog;
use crate::error::EvalError;

use super::dependence;
use super::locator;
use super::merge;
use super::scope::TableScope;

/// The experiment modes the pipeline knows how to run.
///
/// A closed enum instead of independent boolean flags: combinations that made
/// no sense under a flag scheme (pooled seasons plus partitioning) are not
/// representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentKind {
    /// Traditional metric against its weighted counterpart, same scope.
    TraditionalVsWeighted,
    /// Same pairing, playoffs only.
    Playoffs,
    /// Pooled training seasons evaluated against a single evaluation season.
    MultipleSeasons,
    /// Full-season traditional vs n x partition traditional.
    GeneralizeTraditional,
    /// Full-season weighted vs n x partition weighted.
    GeneralizeWeighted,
    /// Full-season weighted vs n x partition traditional.
    GeneralizeMixedWeightedTrad,
    /// Full-season traditional vs n x partition weighted.
    GeneralizeMixedTradWeighted,
}

impl ExperimentKind {
    pub const ALL: [ExperimentKind; 7] = [
        ExperimentKind::TraditionalVsWeighted,
        ExperimentKind::Playoffs,
        ExperimentKind::MultipleSeasons,
        ExperimentKind::GeneralizeTraditional,
        ExperimentKind::GeneralizeWeighted,
        ExperimentKind::GeneralizeMixedWeightedTrad,
        ExperimentKind::GeneralizeMixedTradWeighted,
    ];

    /// Stem of the result file this experiment writes.
    pub fn file_stem(self) -> &'static str {
        match self {
            ExperimentKind::TraditionalVsWeighted => "trad_gpiv",
            ExperimentKind::Playoffs => "playoffs",
            ExperimentKind::MultipleSeasons => "multiple_seasons",
            ExperimentKind::GeneralizeTraditional => "generalize_trad",
            ExperimentKind::GeneralizeWeighted => "generalize_gpiv",
            ExperimentKind::GeneralizeMixedWeightedTrad => "generalize_gpiv_trad",
            ExperimentKind::GeneralizeMixedTradWeighted => "generalize_trad_gpiv",
        }
    }
}

/// One evaluated combination, in output-column order.
#[derive(Debug, Clone, Serialize)]
pub struct MicResult {
    #[serde(rename = "MetricName")]
    pub metric: MetricName,
    #[serde(rename = "Season")]
    pub season: u16,
    #[serde(rename = "PartitionSize")]
    pub partition_size: u32,
    #[serde(rename = "PartitionIndex")]
    pub partition_index: u32,
    #[serde(rename = "DependenceScore")]
    pub mic: f64,
    #[serde(rename = "Pearson")]
    pub pearson: f64,
    #[serde(rename = "Spearman")]
    pub spearman: f64,
}

/// Full cross-product of one experiment kind over metrics, seasons and
/// partition sizes.
#[derive(Debug, Clone)]
pub struct ExperimentPlan {
    pub kind: ExperimentKind,
    pub metrics: Vec<MetricName>,
    pub seasons: Vec<u16>,
    pub max_partitions: u32,
}

impl ExperimentPlan {
    /// Reject illegal mode/partition combinations before any store access.
    pub fn validate(&self) -> Result<(), EvalError> {
        match self.kind {
            ExperimentKind::MultipleSeasons if self.max_partitions > 1 => {
                Err(EvalError::MultipleWithPartitions)
            }
            ExperimentKind::Playoffs if self.max_partitions > 1 => {
                Err(EvalError::PlayoffsWithPartitions)
            }
            _ => Ok(()),
        }
    }

    /// Run the plan: for every metric, season, partition size 1..=max and
    /// partition index 1..=size, locate, fetch, (merge,) score. One result
    /// row per combination; any failure aborts the run with the combination
    /// attached.
    pub fn run(&self, catalog: &Catalog) -> Result<Vec<MicResult>> {
        self.validate()?;
        let mut results = Vec::new();
        for &metric in &self.metrics {
            for &season in &self.seasons {
                for size in 1..=self.max_partitions {
                    for part in 1..=size {
                        let row = evaluate_combination(
                            catalog, self.kind, metric, season, size, part,
                        )
                        .with_context(|| {
                            format!(
                                "{:?}: metric {metric}, season {season}, \
                                 partition {part} of {size}",
                                self.kind
                            )
                        })?;
                        results.push(row);
                    }
                }
            }
        }
        info!(kind = ?self.kind, rows = results.len(), "experiment complete");
        Ok(results)
    }
}

fn evaluate_combination(
    catalog: &Catalog,
    kind: ExperimentKind,
    metric: MetricName,
    season: u16,
    size: u32,
    part: u32,
) -> Result<MicResult> {
    let scope = subject_scope(kind, season, size, part)?;
    let table_name = locator::resolve(catalog, metric, scope)?;
    let table = catalog.fetch_ranking(&table_name, metric)?;

    let (xs, ys) = match kind {
        ExperimentKind::TraditionalVsWeighted
        | ExperimentKind::Playoffs
        | ExperimentKind::MultipleSeasons => {
            (table.traditional_values(), table.weighted_values())
        }
        _ => {
            // Generalization: compare the full season against the rescaled
            // partition via an outer merge on player identity.
            let full_scope = TableScope::FullSeason { season };
            let full_name = locator::resolve(catalog, metric, full_scope)?;
            let full = catalog.fetch_ranking(&full_name, metric)?;
            let merged = merge::outer_merge(&full, &table, &full_name, &table_name)?;
            match kind {
                ExperimentKind::GeneralizeTraditional => (
                    merged.full_traditional(),
                    merged.scaled_subset_traditional(size),
                ),
                ExperimentKind::GeneralizeWeighted => (
                    merged.full_weighted(),
                    merged.scaled_subset_weighted(size),
                ),
                ExperimentKind::GeneralizeMixedWeightedTrad => (
                    merged.full_weighted(),
                    merged.scaled_subset_traditional(size),
                ),
                _ => (
                    merged.full_traditional(),
                    merged.scaled_subset_weighted(size),
                ),
            }
        }
    };

    let mic = dependence::mic(&xs, &ys)?;
    let pearson = dependence::pearson(&xs, &ys)?;
    let spearman = dependence::spearman(&xs, &ys)?;
    debug!(table = %table_name, mic, pearson, "combination evaluated");

    Ok(MicResult {
        metric,
        season: scope.season(),
        partition_size: size,
        partition_index: part,
        mic,
        pearson,
        spearman,
    })
}

/// Scope of the table under evaluation for one combination.
fn subject_scope(
    kind: ExperimentKind,
    season: u16,
    size: u32,
    part: u32,
) -> Result<TableScope, EvalError> {
    match kind {
        ExperimentKind::Playoffs => Ok(TableScope::Playoffs { season }),
        ExperimentKind::MultipleSeasons => Ok(TableScope::MultiSeason { eval_season: season }),
        _ if size == 1 => Ok(TableScope::FullSeason { season }),
        _ => TableScope::partition(season, size, part),
    }
}
