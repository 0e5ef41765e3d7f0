use clap::Parser;

use crate::db::models::MetricName;

/// GPIV evaluation pipeline over pre-aggregated ranking tables
#[derive(Parser, Debug, Clone)]
#[command(name = "gpiv-eval", version, about)]
pub struct Config {
    /// SQLite database holding the upstream ranking tables
    #[arg(long, env = "DATABASE_PATH", default_value = "hockey.db")]
    pub database_path: String,

    /// Directory the result files are written to
    #[arg(long, env = "OUTPUT_DIR", default_value = "results")]
    pub output_dir: String,

    /// First season to evaluate (inclusive)
    #[arg(long, env = "FIRST_SEASON", default_value = "2007")]
    pub first_season: u16,

    /// Last season to evaluate (inclusive); also the evaluation season for
    /// the pooled multi-season experiment
    #[arg(long, env = "LAST_SEASON", default_value = "2013")]
    pub last_season: u16,

    /// Largest partition count to evaluate (sizes 1..=N run each time)
    #[arg(long, env = "MAX_PARTITIONS", default_value = "10")]
    pub max_partitions: u32,

    /// Metrics to evaluate
    #[arg(
        long,
        env = "METRICS",
        value_enum,
        value_delimiter = ',',
        default_values_t = MetricName::ALL
    )]
    pub metrics: Vec<MetricName>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1900..=2100).contains(&self.first_season)
            || !(1900..=2100).contains(&self.last_season)
        {
            anyhow::bail!("seasons must be four-digit years");
        }
        if self.first_season > self.last_season {
            anyhow::bail!("first_season must not be after last_season");
        }
        if self.max_partitions < 1 {
            anyhow::bail!("max_partitions must be at least 1");
        }
        if self.metrics.is_empty() {
            anyhow::bail!("at least one metric is required");
        }
        Ok(())
    }

    /// Every season in the configured range, in order.
    pub fn seasons(&self) -> Vec<u16> {
        (self.first_season..=self.last_season).collect()
    }
}
