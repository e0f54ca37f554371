//! End-to-end analysis of one plate
//!
//! Melting-curve fitting and baseline removal happen outside this crate. A
//! [`ThermalFitEngine`] receives the raw matrix and hands back the raw and
//! baseline-corrected signals; both are then run through NPARC and corrected
//! for multiple testing per value type.

use tracing::debug;

use crate::error::MeltError;
use crate::nparc::{correct, run_nparc, NparcError, NparcOptions, NparcResult, ValueType};
use crate::plate::{PlateMap, PlateMatrix};

/// Signals returned by a thermal fit engine
#[derive(Debug, Clone)]
pub struct ThermalFit {
    pub raw: PlateMatrix,
    pub baseline_corrected: PlateMatrix,
}

/// Melting-curve fitting and baseline correction for a whole plate
pub trait ThermalFitEngine {
    fn fit(&self, matrix: &PlateMatrix, platemap: &PlateMap) -> Result<ThermalFit, MeltError>;
}

/// Run the thermal fit engine, then NPARC on both of its signals
pub fn analyze<E>(
    engine: &E,
    matrix: &PlateMatrix,
    platemap: &PlateMap,
    options: &NparcOptions,
) -> Result<NparcResult, MeltError>
where
    E: ThermalFitEngine + ?Sized,
{
    let ThermalFit {
        raw,
        baseline_corrected,
    } = engine.fit(matrix, platemap)?;
    Ok(run_nparc_both(&raw, &baseline_corrected, platemap, options)?)
}

/// NPARC on the baseline-corrected and raw signals with BH adjustment
///
/// Baseline-corrected records come first. Adjusted p-values are computed
/// separately within each value type.
pub fn run_nparc_both(
    raw: &PlateMatrix,
    baseline_corrected: &PlateMatrix,
    platemap: &PlateMap,
    options: &NparcOptions,
) -> Result<NparcResult, NparcError> {
    let corrected = run_nparc(baseline_corrected, platemap, ValueType::BaselineCorrected, options)?;
    let raw = run_nparc(raw, platemap, ValueType::Raw, options)?;
    let mut result = corrected.merge(raw);
    result.summaries = correct(result.summaries);
    debug!(
        fits = result.fits.len(),
        summaries = result.summaries.len(),
        "NPARC finished on both signals"
    );
    Ok(result)
}
