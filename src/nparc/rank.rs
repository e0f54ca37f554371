//! One-sided Mann-Whitney U test
//!
//! Small tie-free samples use the exact null distribution of U; everything
//! else uses the normal approximation with tie and continuity corrections.

use statrs::distribution::{ContinuousCDF, Normal};
use std::cmp::Ordering;

/// Largest sample size (per group) for which the exact distribution is used
const EXACT_MAX_SIZE: usize = 8;

/// Outcome of a rank-sum test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitney {
    /// U statistic of the first sample
    pub u: f64,
    /// One-sided p-value, `None` when the test is degenerate
    pub p_value: Option<f64>,
}

/// Test whether `x` is stochastically smaller than `y`
///
/// Returns `None` if either sample is empty or holds non-finite values.
pub fn mann_whitney_less(x: &[f64], y: &[f64]) -> Option<MannWhitney> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 || x.iter().chain(y).any(|v| !v.is_finite()) {
        return None;
    }

    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let (ranks, tie_sizes) = average_ranks(&pooled);

    let r1: f64 = ranks[..n1].iter().sum();
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let u = r1 - n1f * (n1f + 1.0) / 2.0;

    let has_ties = tie_sizes.iter().any(|&t| t > 1);
    let p_value = if n1 <= EXACT_MAX_SIZE && n2 <= EXACT_MAX_SIZE && !has_ties {
        Some(exact_cdf(u.round() as usize, n1, n2))
    } else {
        asymptotic_less(u, n1f, n2f, &tie_sizes)
    };

    Some(MannWhitney { u, p_value })
}

/// Average (mid) ranks of `values` (1-based) and the sizes of the tie groups
fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].partial_cmp(&values[j]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_sizes = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share the ranks start+1..=end
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        tie_sizes.push(end - start);
        start = end;
    }
    (ranks, tie_sizes)
}

/// P(U <= u) under the null hypothesis for sample sizes `n1`, `n2`
fn exact_cdf(u: usize, n1: usize, n2: usize) -> f64 {
    let max_u = n1 * n2;
    // counts[i][j][k]: arrangements of i and j observations with U = k
    let mut counts = vec![vec![vec![0.0_f64; max_u + 1]; n2 + 1]; n1 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            if i == 0 || j == 0 {
                counts[i][j][0] = 1.0;
                continue;
            }
            for k in 0..=i * j {
                // largest observation from the second sample adds nothing,
                // from the first sample it exceeds all j of the second
                let from_second = counts[i][j - 1][k];
                let from_first = if k >= j { counts[i - 1][j][k - j] } else { 0.0 };
                counts[i][j][k] = from_first + from_second;
            }
        }
    }
    let dist = &counts[n1][n2];
    let total: f64 = dist.iter().sum();
    let below: f64 = dist.iter().take(u.min(max_u) + 1).sum();
    (below / total).clamp(0.0, 1.0)
}

/// Normal approximation with tie and continuity corrections
fn asymptotic_less(u: f64, n1: f64, n2: f64, tie_sizes: &[usize]) -> Option<f64> {
    let n = n1 + n2;
    let mu = n1 * n2 / 2.0;
    let tie_term: f64 = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if !(variance > 0.0) {
        return None;
    }
    let z = (u - mu + 0.5) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).ok()?;
    Some(normal.cdf(z).clamp(0.0, 1.0))
}
