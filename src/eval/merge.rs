use std::collections::{BTreeMap, HashSet};

use crate::db::models::{PlayerKey, RankingTable};
use crate::error::EvalError;

/// One player's metric pair under both scopes of a merge.
///
/// A player missing from one side scored zero of the metric in that window,
/// so the fill value is 0.0 rather than a sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub key: PlayerKey,
    pub full_traditional: f64,
    pub full_weighted: f64,
    pub subset_traditional: f64,
    pub subset_weighted: f64,
}

/// Outer join of a full-scope and a subset-scope ranking table.
#[derive(Debug, Clone)]
pub struct MergedTable {
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn full_traditional(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.full_traditional).collect()
    }

    pub fn full_weighted(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.full_weighted).collect()
    }

    /// Subset traditional column scaled by the partition count, rebuilt from
    /// the raw stored values on every call so repeated invocations never
    /// compound the multiplier.
    pub fn scaled_subset_traditional(&self, n: u32) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| f64::from(n) * r.subset_traditional)
            .collect()
    }

    /// Subset weighted column scaled by the partition count; same
    /// construction rule as [`MergedTable::scaled_subset_traditional`].
    pub fn scaled_subset_weighted(&self, n: u32) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| f64::from(n) * r.subset_weighted)
            .collect()
    }
}

/// Outer-merge a full-scope table with a subset-scope table on the player
/// identity triple, zero-filling whichever side is absent.
///
/// The key triple must be a de facto primary key of each input; duplicates
/// are rejected rather than merged arbitrarily.
pub fn outer_merge(
    full: &RankingTable,
    subset: &RankingTable,
    full_name: &str,
    subset_name: &str,
) -> Result<MergedTable, EvalError> {
    ensure_unique_keys(full, full_name)?;
    ensure_unique_keys(subset, subset_name)?;

    let mut rows: BTreeMap<PlayerKey, MergedRow> = BTreeMap::new();
    for row in &full.rows {
        rows.insert(
            row.key.clone(),
            MergedRow {
                key: row.key.clone(),
                full_traditional: row.traditional,
                full_weighted: row.weighted,
                subset_traditional: 0.0,
                subset_weighted: 0.0,
            },
        );
    }
    for row in &subset.rows {
        let entry = rows.entry(row.key.clone()).or_insert_with(|| MergedRow {
            key: row.key.clone(),
            full_traditional: 0.0,
            full_weighted: 0.0,
            subset_traditional: 0.0,
            subset_weighted: 0.0,
        });
        entry.subset_traditional = row.traditional;
        entry.subset_weighted = row.weighted;
    }

    Ok(MergedTable {
        rows: rows.into_values().collect(),
    })
}

fn ensure_unique_keys(table: &RankingTable, name: &str) -> Result<(), EvalError> {
    let mut seen = HashSet::with_capacity(table.rows.len());
    for row in &table.rows {
        if !seen.insert(&row.key) {
            return Err(EvalError::DuplicatePlayer {
                table: name.to_string(),
                player_id: row.key.player_id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{MetricName, RankingRow};
    use approx::assert_relative_eq;

    fn table(rows: &[(i64, f64, f64)]) -> RankingTable {
        RankingTable {
            metric: MetricName::Goals,
            rows: rows
                .iter()
                .map(|&(id, t, w)| RankingRow {
                    key: PlayerKey {
                        player_id: id,
                        player_name: format!("P{id}"),
                        position: "C".into(),
                    },
                    traditional: t,
                    weighted: w,
                })
                .collect(),
        }
    }

    #[test]
    fn test_row_count_is_key_union() {
        // Keys {1,2,3} and {2,3,4} -> union of 4.
        let full = table(&[(1, 10.0, 8.0), (2, 20.0, 15.0), (3, 5.0, 6.0)]);
        let subset = table(&[(2, 4.0, 3.0), (3, 1.0, 1.5), (4, 7.0, 5.0)]);
        let merged = outer_merge(&full, &subset, "full", "subset").unwrap();
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_zero_fill_both_sides() {
        let full = table(&[(1, 10.0, 8.0)]);
        let subset = table(&[(2, 4.0, 3.0)]);
        let merged = outer_merge(&full, &subset, "full", "subset").unwrap();

        let only_full = merged.rows.iter().find(|r| r.key.player_id == 1).unwrap();
        assert_eq!(only_full.full_traditional, 10.0);
        assert_eq!(only_full.subset_traditional, 0.0);
        assert_eq!(only_full.subset_weighted, 0.0);

        let only_subset = merged.rows.iter().find(|r| r.key.player_id == 2).unwrap();
        assert_eq!(only_subset.full_traditional, 0.0);
        assert_eq!(only_subset.full_weighted, 0.0);
        assert_eq!(only_subset.subset_weighted, 3.0);
    }

    #[test]
    fn test_overlapping_key_carries_both_sides() {
        let full = table(&[(1, 10.0, 8.0)]);
        let subset = table(&[(1, 4.0, 3.0)]);
        let merged = outer_merge(&full, &subset, "full", "subset").unwrap();
        assert_eq!(merged.len(), 1);
        let row = &merged.rows[0];
        assert_eq!(row.full_traditional, 10.0);
        assert_eq!(row.full_weighted, 8.0);
        assert_eq!(row.subset_traditional, 4.0);
        assert_eq!(row.subset_weighted, 3.0);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let full = table(&[(1, 10.0, 8.0), (1, 11.0, 9.0)]);
        let subset = table(&[(2, 4.0, 3.0)]);
        match outer_merge(&full, &subset, "full", "subset") {
            Err(EvalError::DuplicatePlayer { table, player_id }) => {
                assert_eq!(table, "full");
                assert_eq!(player_id, 1);
            }
            other => panic!("expected DuplicatePlayer, got {other:?}"),
        }
    }

    #[test]
    fn test_same_id_different_position_is_distinct_key() {
        // The key is the full triple, not the id alone.
        let mut full = table(&[(1, 10.0, 8.0)]);
        full.rows.push(RankingRow {
            key: PlayerKey {
                player_id: 1,
                player_name: "P1".into(),
                position: "D".into(),
            },
            traditional: 2.0,
            weighted: 1.0,
        });
        let subset = table(&[]);
        let merged = outer_merge(&full, &subset, "full", "subset").unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_scaling_is_rebuilt_per_call() {
        let full = table(&[(1, 10.0, 8.0)]);
        let subset = table(&[(1, 4.0, 3.0)]);
        let merged = outer_merge(&full, &subset, "full", "subset").unwrap();

        let first = merged.scaled_subset_traditional(5);
        let second = merged.scaled_subset_traditional(5);
        assert_relative_eq!(first[0], 20.0, epsilon = 1e-12);
        assert_relative_eq!(second[0], 20.0, epsilon = 1e-12);

        let weighted = merged.scaled_subset_weighted(2);
        assert_relative_eq!(weighted[0], 6.0, epsilon = 1e-12);
    }
}
