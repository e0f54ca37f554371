//! NPARC types: options, per-temperature fits and per-condition summaries

use serde::{Deserialize, Serialize};
use std::fmt;

use super::NparcError;

// ============================================================================
// Configuration Types
// ============================================================================

/// Which signal a result was computed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueType {
    /// Signal as measured
    Raw,
    /// Signal after the thermal fit engine removed the baselines
    BaselineCorrected,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Raw => write!(f, "Raw"),
            ValueType::BaselineCorrected => write!(f, "BaselineCorrected"),
        }
    }
}

/// Nonlinear fit settings for the dose-response model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSettings {
    /// Maximum simplex iterations before the fit counts as not converged (default: 5000)
    pub max_iters: u64,
    /// Convergence tolerance on the simplex cost spread, relative to the
    /// total sum of squares (default: 1e-8)
    pub tolerance: f64,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            max_iters: 5000,
            tolerance: 1e-8,
        }
    }
}

/// Complete NPARC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NparcOptions {
    /// Distinct concentrations a condition needs to be analyzed (default: 3)
    pub min_concentrations: usize,
    /// Paired observations needed at one temperature (default: 3)
    pub min_points: usize,
    /// Distinct concentrations needed at one temperature (default: 2)
    pub min_distinct_per_temperature: usize,
    /// Temperatures with both fits needed for the rank test (default: 5)
    pub min_temperatures: usize,
    /// Decimals concentrations are rounded to before counting distinct values (default: 12)
    pub rounding_decimals: i32,
    /// Dose-response fit settings
    pub fit: FitSettings,
}

impl Default for NparcOptions {
    fn default() -> Self {
        Self {
            min_concentrations: 3,
            min_points: 3,
            min_distinct_per_temperature: 2,
            min_temperatures: 5,
            rounding_decimals: 12,
            fit: FitSettings::default(),
        }
    }
}

impl NparcOptions {
    pub fn with_min_concentrations(mut self, n: usize) -> Self {
        self.min_concentrations = n;
        self
    }

    pub fn with_min_temperatures(mut self, n: usize) -> Self {
        self.min_temperatures = n;
        self
    }

    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.fit.max_iters = max_iters;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.fit.tolerance = tolerance;
        self
    }

    /// Check that the options describe a well-posed analysis
    pub fn validate(&self) -> Result<(), NparcError> {
        let invalid = |option: &str, value: String| {
            Err(NparcError::InvalidOption {
                option: option.to_string(),
                value,
            })
        };
        if self.min_points < 1 {
            return invalid("min_points", self.min_points.to_string());
        }
        if self.min_distinct_per_temperature < 1 {
            return invalid(
                "min_distinct_per_temperature",
                self.min_distinct_per_temperature.to_string(),
            );
        }
        if self.min_temperatures < 1 {
            return invalid("min_temperatures", self.min_temperatures.to_string());
        }
        if !(0..=15).contains(&self.rounding_decimals) {
            return invalid("rounding_decimals", self.rounding_decimals.to_string());
        }
        if self.fit.max_iters == 0 {
            return invalid("fit.max_iters", self.fit.max_iters.to_string());
        }
        if !(self.fit.tolerance.is_finite() && self.fit.tolerance > 0.0) {
            return invalid("fit.tolerance", self.fit.tolerance.to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Null and alternative model fit of one condition at one temperature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerTemperatureFit {
    pub condition: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    pub rss_null: f64,
    pub rss_alt: f64,
    pub n_points: usize,
    pub value_type: ValueType,
}

/// Rank-test verdict for one condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition: String,
    pub n_temperatures: usize,
    /// Mann-Whitney U of the alternative-model RSS sample
    pub u_stat: Option<f64>,
    pub p_value: Option<f64>,
    pub median_rss_null: f64,
    pub median_rss_alt: f64,
    /// Fraction of temperatures where the dose-response model fits better
    pub frac_alt_better: f64,
    pub value_type: ValueType,
    /// Benjamini-Hochberg adjusted p-value within the value type
    pub p_adj_bh: Option<f64>,
}

/// Output of an NPARC run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NparcResult {
    pub fits: Vec<PerTemperatureFit>,
    pub summaries: Vec<ConditionSummary>,
}

impl NparcResult {
    /// Append the records of another run
    pub fn merge(mut self, other: NparcResult) -> Self {
        self.fits.extend(other.fits);
        self.summaries.extend(other.summaries);
        self
    }

    /// Summary of a condition for a value type, if one was produced
    pub fn summary(&self, condition: &str, value_type: ValueType) -> Option<&ConditionSummary> {
        self.summaries
            .iter()
            .find(|s| s.condition == condition && s.value_type == value_type)
    }

    /// Per-temperature fits of a condition for a value type
    pub fn fits_for<'a>(
        &'a self,
        condition: &'a str,
        value_type: ValueType,
    ) -> impl Iterator<Item = &'a PerTemperatureFit> + 'a {
        self.fits
            .iter()
            .filter(move |f| f.condition == condition && f.value_type == value_type)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
