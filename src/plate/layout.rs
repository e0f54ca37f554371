//! Automatic detection of the 384-well layout in plate-reader exports
//!
//! Exports place a pair of header rows somewhere near the top left of the
//! sheet: the first encodes the plate row number (1-16) of each column, the
//! second the plate column number (1-24). Measurements follow below, one row
//! per temperature. The detector scans a bounded set of candidate windows,
//! scores each by the number of valid header positions and slices the
//! measurement block out of the winner.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::matrix::DataBlock;
use super::well::{WellId, N_COLS, N_ROWS, N_WELLS};
use super::PlateError;

/// Search bounds and acceptance threshold for layout detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Number of leading column offsets tried as window start (default: 20)
    pub max_start_col: usize,
    /// Header rows are searched as adjacent pairs within this many leading rows (default: 4)
    pub max_header_rows: usize,
    /// Minimum number of valid header positions to accept a window (default: 300)
    pub min_score: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_start_col: 20,
            max_header_rows: 4,
            min_score: 300,
        }
    }
}

impl LayoutOptions {
    pub fn with_max_start_col(mut self, max_start_col: usize) -> Self {
        self.max_start_col = max_start_col;
        self
    }

    pub fn with_max_header_rows(mut self, max_header_rows: usize) -> Self {
        self.max_header_rows = max_header_rows;
        self
    }

    pub fn with_min_score(mut self, min_score: usize) -> Self {
        self.min_score = min_score;
        self
    }

    /// Check that at least one window can be scored and accepted
    pub fn validate(&self) -> Result<(), PlateError> {
        let invalid = |option: &str, value: usize| {
            Err(PlateError::InvalidOption {
                option: option.to_string(),
                value: value.to_string(),
            })
        };
        if self.max_start_col < 1 {
            return invalid("max_start_col", self.max_start_col);
        }
        // a header pair needs two rows
        if self.max_header_rows < 2 {
            return invalid("max_header_rows", self.max_header_rows);
        }
        if !(1..=N_WELLS).contains(&self.min_score) {
            return invalid("min_score", self.min_score);
        }
        Ok(())
    }
}

/// Where the layout was found, reported alongside the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDebug {
    /// Grid row holding plate row numbers
    pub header_row: usize,
    /// Grid row holding plate column numbers
    pub column_row: usize,
    /// First grid column of the window
    pub start_col: usize,
    /// One past the last grid column of the window
    pub end_col: usize,
    /// Number of valid header positions in the window
    pub score: usize,
}

/// Result of a successful detection
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLayout {
    pub block: DataBlock,
    pub debug: LayoutDebug,
}

#[derive(Debug, Clone, Copy)]
struct WindowScore {
    header_row: usize,
    start_col: usize,
    score: usize,
    row_shift: i64,
    col_shift: i64,
}

/// Locate the 384-well header window and extract the measurement block
///
/// Ties between equally scoring windows keep the first candidate in
/// enumeration order (lowest header row, then lowest start column).
pub fn detect_layout(grid: &Grid, options: &LayoutOptions) -> Result<DetectedLayout, PlateError> {
    options.validate()?;

    let header_rows = options.max_header_rows.min(grid.n_rows()).saturating_sub(1);
    let start_cols = options
        .max_start_col
        .min((grid.n_cols() + 1).saturating_sub(N_WELLS));

    let candidates: Vec<(usize, usize)> = (0..header_rows)
        .flat_map(|r| (0..start_cols).map(move |c| (r, c)))
        .collect();

    let scores: Vec<WindowScore> = candidates
        .par_iter()
        .map(|&(r, c)| score_window(grid, r, c))
        .collect();

    let best = scores
        .into_iter()
        .fold(None::<WindowScore>, |best, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        });

    let best_score = best.map_or(0, |b| b.score);
    let best = match best {
        Some(b) if b.score >= options.min_score => b,
        _ => {
            tracing::warn!(
                best_score,
                threshold = options.min_score,
                "no 384-well header window found"
            );
            return Err(PlateError::LayoutNotDetected {
                best_score,
                threshold: options.min_score,
            });
        }
    };

    let found = LayoutDebug {
        header_row: best.header_row,
        column_row: best.header_row + 1,
        start_col: best.start_col,
        end_col: best.start_col + N_WELLS,
        score: best.score,
    };
    tracing::debug!(?found, "detected 384-well layout");

    Ok(DetectedLayout {
        block: extract_block(grid, &best),
        debug: found,
    })
}

fn score_window(grid: &Grid, header_row: usize, start_col: usize) -> WindowScore {
    let window = start_col..start_col + N_WELLS;
    let rows: Vec<Option<i64>> = window
        .clone()
        .map(|c| grid.get(header_row, c).as_integer())
        .collect();
    let cols: Vec<Option<i64>> = window
        .map(|c| grid.get(header_row + 1, c).as_integer())
        .collect();

    let row_shift = zero_based_shift(&rows);
    let col_shift = zero_based_shift(&cols);

    let score = rows
        .iter()
        .zip(&cols)
        .filter(|(r, c)| match (r, c) {
            (Some(r), Some(c)) => {
                r.checked_add(row_shift)
                    .is_some_and(|r| (1..=N_ROWS as i64).contains(&r))
                    && c.checked_add(col_shift)
                        .is_some_and(|c| (1..=N_COLS as i64).contains(&c))
            }
            _ => false,
        })
        .count();

    WindowScore {
        header_row,
        start_col,
        score,
        row_shift,
        col_shift,
    }
}

/// Shift a header axis to 1-based when its smallest observed value is 0
fn zero_based_shift(values: &[Option<i64>]) -> i64 {
    match values.iter().flatten().min() {
        Some(0) => 1,
        _ => 0,
    }
}

fn extract_block(grid: &Grid, window: &WindowScore) -> DataBlock {
    let column_row = window.header_row + 1;
    let columns = window.start_col..window.start_col + N_WELLS;

    let first = column_row + 1;
    let last = (first..grid.n_rows())
        .rev()
        .find(|&r| columns.clone().any(|c| !grid.get(r, c).is_empty()))
        .map_or(first, |r| r + 1);
    let n_points = last - first;

    let labelled = columns.filter_map(|c| {
        let row = grid
            .get(window.header_row, c)
            .as_integer()?
            .checked_add(window.row_shift)?;
        let col = grid
            .get(column_row, c)
            .as_integer()?
            .checked_add(window.col_shift)?;
        let well = WellId::encode(row, col).ok()?;
        Some((
            well,
            (first..last).map(|r| grid.get(r, c).as_f64()).collect(),
        ))
    });

    DataBlock::from_columns(n_points, labelled)
}
