//! 384-well plate structures
//!
//! This module turns raw spreadsheet grids into analysis-ready structures:
//!
//! - [`WellId`]: canonical well identifiers (`A1`..`P24`)
//! - [`detect_layout`]: locate the header window of a plate-reader export
//! - [`PlateMatrix`]: temperature x well signal matrix over all 384 wells
//! - [`PlateMap`]: per-well condition and concentration annotations
//!
//! # Usage
//!
//! ```rust,ignore
//! use meltplate::plate::*;
//!
//! let (matrix, debug) = load_plate(&grid, &LayoutOptions::default(), TemperatureRange::default())?;
//! println!("layout found at row {} col {} (score {})", debug.header_row, debug.start_col, debug.score);
//! let platemap = PlateMap::resolve(&conditions, Some(&concentrations));
//! ```

mod error;
pub mod grid;
pub mod layout;
pub mod matrix;
pub mod platemap;
pub mod well;

pub use error::PlateError;
pub use grid::{Cell, Grid};
pub use layout::{detect_layout, DetectedLayout, LayoutDebug, LayoutOptions};
pub use matrix::{
    celsius_axis, temperature_grid, DataBlock, LongRecord, PlateMatrix, TemperatureRange,
};
pub use platemap::{PlateMap, WellAnnotation};
pub use well::{all_wells, normalize, WellId, N_COLS, N_ROWS, N_WELLS};

/// Detect the layout of a plate export and build its matrix
///
/// The number of measurement rows found below the header window becomes the
/// number of temperature points.
pub fn load_plate(
    grid: &Grid,
    options: &LayoutOptions,
    range: TemperatureRange,
) -> Result<(PlateMatrix, LayoutDebug), PlateError> {
    let DetectedLayout { block, debug } = detect_layout(grid, options)?;
    let matrix = PlateMatrix::from_block(block, range)?;
    Ok((matrix, debug))
}
