//! Benjamini-Hochberg false discovery rate correction

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::types::{ConditionSummary, ValueType};

/// Benjamini-Hochberg adjusted p-values
///
/// Undefined p-values stay undefined and are left out of the number of
/// tests and the ranking. Ties keep their input order. Adjusted values are
/// capped at 1.
pub fn benjamini_hochberg(p_values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut order: Vec<usize> = p_values
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_some_and(f64::is_finite))
        .map(|(i, _)| i)
        .collect();
    let m = order.len();
    let mut adjusted = vec![None; p_values.len()];
    if m == 0 {
        return adjusted;
    }

    let p = |i: usize| p_values[i].unwrap_or(f64::NAN);
    order.sort_by(|&i, &j| p(i).partial_cmp(&p(j)).unwrap_or(Ordering::Equal));

    let mut running_min = f64::INFINITY;
    for (rank0, &idx) in order.iter().enumerate().rev() {
        let rank = (rank0 + 1) as f64;
        running_min = running_min.min(p(idx) * m as f64 / rank);
        adjusted[idx] = Some(running_min.min(1.0));
    }
    adjusted
}

/// Fill `p_adj_bh` of every summary, correcting each value type separately
///
/// Summaries keep their order.
pub fn correct(mut summaries: Vec<ConditionSummary>) -> Vec<ConditionSummary> {
    let mut groups: BTreeMap<ValueType, Vec<usize>> = BTreeMap::new();
    for (i, summary) in summaries.iter().enumerate() {
        groups.entry(summary.value_type).or_default().push(i);
    }

    for indices in groups.values() {
        let p_values: Vec<Option<f64>> = indices.iter().map(|&i| summaries[i].p_value).collect();
        for (&i, q) in indices.iter().zip(benjamini_hochberg(&p_values)) {
            summaries[i].p_adj_bh = q;
        }
    }
    summaries
}
