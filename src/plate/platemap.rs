//! Per-well condition and concentration annotations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::grid::{Cell, Grid};
use super::well::{all_wells, WellId, N_ROWS, N_WELLS};

/// Annotation of a single well; both fields may be missing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WellAnnotation {
    pub condition: Option<String>,
    pub concentration: Option<f64>,
}

/// Condition and concentration for every well of the 384-well universe
#[derive(Debug, Clone, PartialEq)]
pub struct PlateMap {
    entries: Vec<WellAnnotation>,
}

impl Default for PlateMap {
    fn default() -> Self {
        Self {
            entries: vec![WellAnnotation::default(); N_WELLS],
        }
    }
}

impl PlateMap {
    /// Resolve a platemap from 16 x 24 annotation grids
    ///
    /// Each grid has a header row of column numbers (1-24) and one row per
    /// plate row, whose first cell is the row number (1-16, or the row letter).
    /// Conditions and concentrations are joined by well; wells absent from
    /// both grids stay unannotated. Without a concentration grid every
    /// concentration is missing.
    pub fn resolve(condition_grid: &Grid, concentration_grid: Option<&Grid>) -> Self {
        let mut map = Self::default();
        for (well, cell) in grid_cells(condition_grid) {
            let entry = &mut map.entries[well.index()];
            if entry.condition.is_none() {
                entry.condition = cell.as_label();
            }
        }
        if let Some(grid) = concentration_grid {
            for (well, cell) in grid_cells(grid) {
                let entry = &mut map.entries[well.index()];
                if entry.concentration.is_none() {
                    entry.concentration = cell.as_f64().filter(|c| *c >= 0.0);
                }
            }
        }
        map
    }

    /// Build a platemap from explicit annotations; later entries overwrite earlier ones
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (WellId, WellAnnotation)>,
    {
        let mut map = Self::default();
        for (well, mut annotation) in entries {
            annotation.condition = annotation
                .condition
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());
            annotation.concentration = annotation
                .concentration
                .filter(|c| c.is_finite() && *c >= 0.0);
            map.entries[well.index()] = annotation;
        }
        map
    }

    pub fn get(&self, well: WellId) -> &WellAnnotation {
        &self.entries[well.index()]
    }

    pub fn condition(&self, well: WellId) -> Option<&str> {
        self.get(well).condition.as_deref()
    }

    pub fn concentration(&self, well: WellId) -> Option<f64> {
        self.get(well).concentration
    }

    /// All wells with their annotations in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (WellId, &WellAnnotation)> {
        all_wells().zip(self.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct condition labels, sorted
    pub fn conditions(&self) -> Vec<&str> {
        self.condition_groups().into_keys().collect()
    }

    /// Wells grouped by condition label, wells in canonical order
    pub fn condition_groups(&self) -> BTreeMap<&str, Vec<WellId>> {
        let mut groups: BTreeMap<&str, Vec<WellId>> = BTreeMap::new();
        for (well, annotation) in self.iter() {
            if let Some(condition) = annotation.condition.as_deref() {
                groups.entry(condition).or_default().push(well);
            }
        }
        groups
    }
}

/// Flatten an annotation grid into (well, cell) pairs
fn grid_cells(grid: &Grid) -> Vec<(WellId, &Cell)> {
    let Some(header) = grid.row(0) else {
        return Vec::new();
    };
    let col_numbers: Vec<Option<i64>> = header.iter().map(Cell::as_integer).collect();

    let mut cells = Vec::new();
    for row in grid.rows().skip(1) {
        let Some(row_no) = row.first().and_then(row_number) else {
            continue;
        };
        for (cell, col_no) in row.iter().zip(&col_numbers).skip(1) {
            let Some(col_no) = col_no else {
                continue;
            };
            if let Ok(well) = WellId::encode(row_no, *col_no) {
                cells.push((well, cell));
            }
        }
    }
    cells
}

fn row_number(cell: &Cell) -> Option<i64> {
    if let Some(n) = cell.as_integer() {
        return Some(n);
    }
    let label = cell.as_label()?;
    let mut chars = label.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    let n = (letter as u8 - b'A') as i64 + 1;
    (n <= N_ROWS as i64).then_some(n)
}
