use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;

mod config;
mod db;
mod error;
mod eval;
mod report;

use config::Config;
use db::Catalog;
use eval::{ExperimentKind, ExperimentPlan};

fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let catalog = Catalog::open(&config.database_path)?;
    info!("Ranking store opened: {}", config.database_path);
    info!(
        "Evaluating {} metric(s), seasons {}-{}, up to {} partitions",
        config.metrics.len(),
        config.first_season,
        config.last_season,
        config.max_partitions
    );

    let output_dir = Path::new(&config.output_dir);
    for kind in ExperimentKind::ALL {
        let plan = ExperimentPlan {
            kind,
            metrics: config.metrics.clone(),
            seasons: match kind {
                // The pooled table already spans the earlier seasons; it is
                // evaluated against (and tagged with) the final season.
                ExperimentKind::MultipleSeasons => vec![config.last_season],
                _ => config.seasons(),
            },
            max_partitions: match kind {
                ExperimentKind::Playoffs | ExperimentKind::MultipleSeasons => 1,
                _ => config.max_partitions,
            },
        };
        let results = plan.run(&catalog)?;
        let path = output_dir.join(format!("mic_{}.csv", kind.file_stem()));
        report::write_results(&path, &results)?;
    }

    info!("All experiments complete");
    Ok(())
}
