//! Nonparametric analysis of response curves (NPARC) for dose-response melt screens
//!
//! For every condition on the plate, NPARC asks whether the signal depends on
//! concentration consistently across the temperature range:
//!
//! 1. At each temperature, a constant (null) model and a four-parameter
//!    log-logistic (alternative) model are fitted to the concentration-signal
//!    pairs of the condition's wells.
//! 2. The residual sums of squares of both models are collected over all
//!    temperatures.
//! 3. A one-sided Mann-Whitney U test checks whether the alternative RSS
//!    values are stochastically smaller than the null ones.
//! 4. P-values are corrected with Benjamini-Hochberg within each value type.
//!
//! # Usage
//!
//! ```rust,ignore
//! use meltplate::nparc::*;
//!
//! let options = NparcOptions::default();
//! let corrected = run_nparc(&corrected_matrix, &platemap, ValueType::BaselineCorrected, &options)?;
//! let raw = run_nparc(&raw_matrix, &platemap, ValueType::Raw, &options)?;
//! let mut result = corrected.merge(raw);
//! result.summaries = correct(result.summaries);
//!
//! for s in &result.summaries {
//!     println!("{} [{}]: p = {:?}, q = {:?}", s.condition, s.value_type, s.p_value, s.p_adj_bh);
//! }
//! ```

mod engine;
mod error;
mod fdr;
pub mod models;
pub mod rank;
mod types;


pub use engine::run_nparc;
pub use error::NparcError;
pub use fdr::{benjamini_hochberg, correct};
pub use models::{DoseResponseModel, FittedModel};
pub use rank::{mann_whitney_less, MannWhitney};
pub use types::{
    ConditionSummary, FitSettings, NparcOptions, NparcResult, PerTemperatureFit, ValueType,
};
