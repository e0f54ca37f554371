//! NPARC error types

use thiserror::Error;

/// Errors that abort an NPARC run
///
/// Per-temperature fit failures are not errors; they leave the record out.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NparcError {
    /// Invalid option value
    #[error("Invalid NPARC option: {option} = {value}")]
    InvalidOption { option: String, value: String },
}
