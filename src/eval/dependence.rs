//! Dependence statistics over aligned numeric columns.
//!
//! Callers guarantee alignment by drawing both columns from a single table or
//! merge; nothing here re-keys the data. The MIC uses the standard
//! equal-frequency grid approximation: over every grid resolution (kx, ky)
//! with kx * ky <= n^0.6, take the largest mutual information normalized by
//! log2(min(kx, ky)). The normalization bounds the score to [0, 1].

use std::cmp::Ordering;

use crate::error::EvalError;

/// Maximal Information Coefficient of two aligned columns.
///
/// Fewer than four samples cannot fill a 2x2 grid and score 0.
pub fn mic(x: &[f64], y: &[f64]) -> Result<f64, EvalError> {
    check_lengths(x, y)?;
    let n = x.len();
    if n < 4 {
        return Ok(0.0);
    }

    let budget = (n as f64).powf(0.6).max(4.0) as usize;
    let x_pos = sort_positions(x);
    let y_pos = sort_positions(y);

    let mut best = 0.0_f64;
    for kx in 2..=budget / 2 {
        let ky_max = budget / kx;
        if ky_max < 2 {
            break;
        }
        for ky in 2..=ky_max {
            let mi = grid_mutual_information(&x_pos, &y_pos, kx, ky);
            let score = mi / (kx.min(ky) as f64).log2();
            if score > best {
                best = score;
            }
        }
    }
    Ok(best.clamp(0.0, 1.0))
}

/// Pearson product-moment correlation; 0 when either column is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, EvalError> {
    check_lengths(x, y)?;
    let n = x.len() as f64;
    if x.is_empty() {
        return Ok(0.0);
    }
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|a| a * a).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();
    if denominator == 0.0 {
        Ok(0.0)
    } else {
        Ok(numerator / denominator)
    }
}

/// Spearman rank correlation: Pearson over tie-averaged ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64, EvalError> {
    check_lengths(x, y)?;
    pearson(&average_ranks(x), &average_ranks(y))
}

fn check_lengths(x: &[f64], y: &[f64]) -> Result<(), EvalError> {
    if x.len() != y.len() {
        return Err(EvalError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    Ok(())
}

/// Position of each element in the sorted order of the column.
///
/// Tied values all take the position of their group start, so a tie group
/// (e.g. the zero-filled block after a merge) always lands in one bin instead
/// of being split by row order.
fn sort_positions(values: &[f64]) -> Vec<usize> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    let mut positions = vec![0usize; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        for &idx in &order[i..=j] {
            positions[idx] = i;
        }
        i = j + 1;
    }
    positions
}

/// Mutual information (bits) on a kx-by-ky equal-frequency grid.
fn grid_mutual_information(x_pos: &[usize], y_pos: &[usize], kx: usize, ky: usize) -> f64 {
    let n = x_pos.len();
    let mut joint = vec![0usize; kx * ky];
    let mut x_marginal = vec![0usize; kx];
    let mut y_marginal = vec![0usize; ky];
    for i in 0..n {
        let bx = x_pos[i] * kx / n;
        let by = y_pos[i] * ky / n;
        joint[bx * ky + by] += 1;
        x_marginal[bx] += 1;
        y_marginal[by] += 1;
    }

    let total = n as f64;
    let mut mi = 0.0;
    for bx in 0..kx {
        for by in 0..ky {
            let count = joint[bx * ky + by];
            if count == 0 {
                continue;
            }
            let p_xy = count as f64 / total;
            let p_x = x_marginal[bx] as f64 / total;
            let p_y = y_marginal[by] as f64 / total;
            mi += p_xy * (p_xy / (p_x * p_y)).log2();
        }
    }
    mi.max(0.0)
}

/// 1-based ranks with ties sharing their average rank.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j hold equal values; share the mean rank.
        let mean_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = mean_rank;
        }
        i = j + 1;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_mic_perfect_linear() {
        let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let y = x.clone();
        assert_relative_eq!(mic(&x, &y).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mic_perfect_monotone_nonlinear() {
        // MIC captures any functional relationship, not just linear ones.
        let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v.powi(3)).collect();
        assert_relative_eq!(mic(&x, &y).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mic_bounded_on_noise() {
        let mut rng = StdRng::seed_from_u64(42);
        let x: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..100.0)).collect();
        let y: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..100.0)).collect();
        let score = mic(&x, &y).unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert!(score < 0.5, "independent noise scored {score}");
    }

    #[test]
    fn test_mic_length_mismatch() {
        let err = mic(&[1.0, 2.0], &[1.0]).unwrap_err();
        match err {
            EvalError::LengthMismatch { left: 2, right: 1 } => {}
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_mic_too_few_samples() {
        assert_relative_eq!(mic(&[1.0, 2.0], &[2.0, 1.0]).unwrap(), 0.0);
        assert_relative_eq!(mic(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_mic_constant_column_carries_no_information() {
        let x = vec![3.0; 50];
        let y: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert_relative_eq!(mic(&x, &y).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| -v).collect();
        assert_relative_eq!(pearson(&x, &y).unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pearson_constant_column() {
        let x = vec![5.0; 10];
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert_relative_eq!(pearson(&x, &y).unwrap(), 0.0);
    }

    #[test]
    fn test_spearman_monotone_nonlinear() {
        // Rank correlation sees through the cube.
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v.powi(3)).collect();
        assert_relative_eq!(spearman(&x, &y).unwrap(), 1.0, epsilon = 1e-9);
        assert!(pearson(&x, &y).unwrap() < 1.0);
    }

    #[test]
    fn test_spearman_tie_handling() {
        let ranks = average_ranks(&[10.0, 20.0, 20.0, 30.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn test_spearman_length_mismatch() {
        assert!(spearman(&[1.0], &[1.0, 2.0]).is_err());
    }
}
