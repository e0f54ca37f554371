//! Per-condition NPARC analysis of one plate matrix

use rayon::prelude::*;

use super::models::{median, DoseResponseModel};
use super::rank::mann_whitney_less;
use super::types::{ConditionSummary, NparcOptions, NparcResult, PerTemperatureFit, ValueType};
use super::NparcError;
use crate::plate::{celsius_axis, PlateMap, PlateMatrix, WellId};

/// Run NPARC on every eligible condition of a plate
///
/// For each condition with enough distinct concentrations, a constant (null)
/// and a four-parameter log-logistic (alternative) model are fitted to the
/// concentration-signal pairs at every temperature. When enough temperatures
/// yield both fits, a one-sided Mann-Whitney test asks whether the
/// alternative RSS values are smaller than the null ones.
///
/// Temperatures are reported in degrees Celsius. `p_adj_bh` is left unset;
/// see [`super::correct`].
pub fn run_nparc(
    matrix: &PlateMatrix,
    platemap: &PlateMap,
    value_type: ValueType,
    options: &NparcOptions,
) -> Result<NparcResult, NparcError> {
    options.validate()?;

    let temperatures = celsius_axis(matrix.temperatures());
    let measured = matrix.measured_wells();
    let groups: Vec<(String, Vec<WellId>)> = platemap
        .condition_groups()
        .into_iter()
        .map(|(condition, wells)| {
            let wells = wells.into_iter().filter(|w| measured.contains(w)).collect();
            (condition.to_string(), wells)
        })
        .collect();

    let per_condition: Vec<(Vec<PerTemperatureFit>, Option<ConditionSummary>)> = groups
        .par_iter()
        .map(|(condition, wells)| {
            analyze_condition(
                condition,
                wells,
                matrix,
                platemap,
                &temperatures,
                value_type,
                options,
            )
        })
        .collect();

    let mut result = NparcResult::default();
    for (fits, summary) in per_condition {
        result.fits.extend(fits);
        result.summaries.extend(summary);
    }
    Ok(result)
}

fn analyze_condition(
    condition: &str,
    wells: &[WellId],
    matrix: &PlateMatrix,
    platemap: &PlateMap,
    temperatures: &[f64],
    value_type: ValueType,
    options: &NparcOptions,
) -> (Vec<PerTemperatureFit>, Option<ConditionSummary>) {
    let concentrations: Vec<Option<f64>> = wells.iter().map(|&w| platemap.concentration(w)).collect();
    let n_conc = distinct_count(
        concentrations.iter().flatten().copied(),
        options.rounding_decimals,
    );
    if n_conc < options.min_concentrations {
        tracing::debug!(
            condition,
            n_conc,
            "skipping condition with too few distinct concentrations"
        );
        return (Vec::new(), None);
    }

    let mut fits = Vec::new();
    let mut failed = 0usize;
    for (t, &temperature) in temperatures.iter().enumerate() {
        let (x, y): (Vec<f64>, Vec<f64>) = wells
            .iter()
            .zip(&concentrations)
            .filter_map(|(&well, conc)| {
                let c = (*conc)?;
                let v = matrix.value(t, well)?;
                (c.is_finite() && v.is_finite()).then_some((c, v))
            })
            .unzip();

        if x.len() < options.min_points
            || distinct_count(x.iter().copied(), options.rounding_decimals)
                < options.min_distinct_per_temperature
        {
            continue;
        }

        let rss_null = DoseResponseModel::Constant
            .fit(&x, &y, &options.fit)
            .map(|m| m.rss(&x, &y));
        let rss_alt = DoseResponseModel::LogLogistic4
            .fit(&x, &y, &options.fit)
            .map(|m| m.rss(&x, &y));

        match (rss_null, rss_alt) {
            (Some(rss_null), Some(rss_alt)) if rss_null.is_finite() && rss_alt.is_finite() => {
                fits.push(PerTemperatureFit {
                    condition: condition.to_string(),
                    temperature,
                    rss_null,
                    rss_alt,
                    n_points: y.len(),
                    value_type,
                })
            }
            _ => failed += 1,
        }
    }
    if failed > 0 {
        tracing::warn!(
            condition,
            %value_type,
            failed,
            "dose-response fit failed at some temperatures"
        );
    }

    let summary = summarize(condition, &fits, value_type, options);
    (fits, summary)
}

/// Condition-level verdict from the per-temperature fits
fn summarize(
    condition: &str,
    fits: &[PerTemperatureFit],
    value_type: ValueType,
    options: &NparcOptions,
) -> Option<ConditionSummary> {
    if fits.len() < options.min_temperatures {
        tracing::debug!(
            condition,
            n_temperatures = fits.len(),
            "too few temperatures for a rank test"
        );
        return None;
    }

    let mut rss_null: Vec<f64> = fits.iter().map(|f| f.rss_null).collect();
    let mut rss_alt: Vec<f64> = fits.iter().map(|f| f.rss_alt).collect();
    let n_better = fits.iter().filter(|f| f.rss_alt < f.rss_null).count();

    let test = mann_whitney_less(&rss_alt, &rss_null);

    Some(ConditionSummary {
        condition: condition.to_string(),
        n_temperatures: fits.len(),
        u_stat: test.map(|t| t.u),
        p_value: test.and_then(|t| t.p_value),
        median_rss_null: median(&mut rss_null),
        median_rss_alt: median(&mut rss_alt),
        frac_alt_better: n_better as f64 / fits.len() as f64,
        value_type,
        p_adj_bh: None,
    })
}

/// Number of distinct values after rounding to `decimals` places
fn distinct_count(values: impl Iterator<Item = f64>, decimals: i32) -> usize {
    let scale = 10f64.powi(decimals);
    let mut rounded: Vec<f64> = values.map(|v| (v * scale).round() / scale).collect();
    rounded.sort_by(f64::total_cmp);
    rounded.dedup();
    rounded.len()
}
