//! Raw rectangular cell grids as exported from plate readers

use serde::{Deserialize, Serialize};

/// A single raw spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Interpret a raw text field, preferring a numeric reading
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric value of the cell, coercing numeric text
    ///
    /// Non-finite numbers are treated as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty => return None,
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Integer value of the cell if it holds a whole number
    pub fn as_integer(&self) -> Option<i64> {
        let value = self.as_f64()?;
        if value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(value as i64)
    }

    /// Text rendering of the cell, `None` when empty or blank
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(v) if v.fract() == 0.0 && v.is_finite() => Some(format!("{}", *v as i64)),
            Cell::Number(v) => Some(v.to_string()),
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// A rectangular sheet of raw cells
///
/// Rows shorter than the widest row are padded with [`Cell::Empty`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    n_cols: usize,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(n_cols, Cell::Empty);
                row
            })
            .collect();
        Self { rows, n_cols }
    }

    /// Build a grid from raw text fields
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|s| Cell::parse(s.as_ref())).collect())
                .collect(),
        )
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Cell at (`row`, `col`), [`Cell::Empty`] outside the grid
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
