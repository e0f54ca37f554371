//! Plate construction error types

use thiserror::Error;

/// Structural errors raised while building plate matrices and platemaps
///
/// These are fatal for the current input: they carry the diagnostic
/// context needed to fix the file rather than guessing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlateError {
    /// Coordinate outside the 16 x 24 plate
    #[error("Well coordinate out of range: row {row} (1-16), column {col} (1-24)")]
    OutOfRange { row: i64, col: i64 },

    /// Text that does not name a 384-well position
    #[error("Invalid well identifier: {0:?}")]
    InvalidWell(String),

    /// No header window scored high enough
    #[error("Plate layout not detected: best score {best_score} is below threshold {threshold}")]
    LayoutNotDetected { best_score: usize, threshold: usize },

    /// Too few measurement points to build a temperature axis
    #[error("At least 2 measurement points are required, found {found}")]
    InsufficientPoints { found: usize },

    /// Declared point count differs from the measurement rows in the block
    #[error("Declared {declared} measurement points but the data block has {found}")]
    PointCountMismatch { declared: usize, found: usize },

    /// Temperature bounds are not finite or not ordered
    #[error("Invalid temperature range: min {t_min}, max {t_max}")]
    InvalidTemperatureRange { t_min: f64, t_max: f64 },

    /// Invalid layout option value
    #[error("Invalid layout option: {option} = {value}")]
    InvalidOption { option: String, value: String },

    /// Long-form plate table without measurement columns
    #[error("Expected at least 3 columns (row, column, measurements), found {found}")]
    InvalidLongForm { found: usize },
}
