use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::eval::MicResult;

/// Write one experiment's result rows as CSV, truncating any previous file so
/// a rerun over identical inputs reproduces the file exactly.
pub fn write_results(path: &Path, results: &[MicResult]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating result file {}", path.display()))?;
    render(file, results).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), rows = results.len(), "results written");
    Ok(())
}

fn render<W: Write>(writer: W, results: &[MicResult]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in results {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::MetricName;

    fn sample() -> MicResult {
        MicResult {
            metric: MetricName::FirstAssists,
            season: 2011,
            partition_size: 5,
            partition_index: 3,
            mic: 0.87,
            pearson: 0.91,
            spearman: 0.89,
        }
    }

    #[test]
    fn test_header_and_row() {
        let mut buf = Vec::new();
        render(&mut buf, &[sample()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "MetricName,Season,PartitionSize,PartitionIndex,DependenceScore,Pearson,Spearman"
        );
        assert_eq!(lines.next().unwrap(), "First_Assists,2011,5,3,0.87,0.91,0.89");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_results_still_emit_header() {
        // csv only writes the header once a record's shape is known, so an
        // empty run produces an empty file.
        let mut buf = Vec::new();
        render(&mut buf, &[]).unwrap();
        assert!(buf.is_empty());
    }
}
