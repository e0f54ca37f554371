//! Temperature-indexed plate matrices
//!
//! A [`PlateMatrix`] always spans the full 384-well universe: columns are the
//! canonical wells in row-major order and rows are temperatures. Wells that
//! were not measured hold `None`.

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::platemap::PlateMap;
use super::well::{all_wells, WellId, N_WELLS};
use super::PlateError;

/// Above this mean an axis is taken to be in Kelvin
const KELVIN_MEAN_THRESHOLD: f64 = 150.0;
const KELVIN_OFFSET: f64 = 273.15;

/// Declared temperature range of a melt scan (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub t_min: f64,
    pub t_max: f64,
}

impl TemperatureRange {
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    fn validate(&self) -> Result<(), PlateError> {
        if !self.t_min.is_finite() || !self.t_max.is_finite() || self.t_min > self.t_max {
            return Err(PlateError::InvalidTemperatureRange {
                t_min: self.t_min,
                t_max: self.t_max,
            });
        }
        Ok(())
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            t_min: 37.0,
            t_max: 90.0,
        }
    }
}

/// Evenly spaced temperatures from `t_min` to `t_max` inclusive
pub fn temperature_grid(n_points: usize, t_min: f64, t_max: f64) -> Vec<f64> {
    match n_points {
        0 => Vec::new(),
        1 => vec![t_min],
        n => {
            let step = (t_max - t_min) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { t_max } else { t_min + step * i as f64 })
                .collect()
        }
    }
}

/// Convert an axis to degrees Celsius if it looks like Kelvin
pub fn celsius_axis(temperatures: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = temperatures.iter().copied().filter(|t| t.is_finite()).collect();
    let mean = finite.iter().sum::<f64>() / finite.len().max(1) as f64;
    if mean > KELVIN_MEAN_THRESHOLD {
        temperatures.iter().map(|t| t - KELVIN_OFFSET).collect()
    } else {
        temperatures.to_vec()
    }
}

/// Measurement rows for all 384 wells, before a temperature axis is attached
#[derive(Debug, Clone, PartialEq)]
pub struct DataBlock {
    values: Array2<Option<f64>>,
}

impl DataBlock {
    /// Reindex labelled measurement columns onto the canonical well universe
    ///
    /// Every column must hold `n_points` values. When a well appears more than
    /// once, the first column wins.
    pub fn from_columns<I>(n_points: usize, columns: I) -> Self
    where
        I: IntoIterator<Item = (WellId, Vec<Option<f64>>)>,
    {
        let mut values = Array2::from_elem((n_points, N_WELLS), None);
        let mut seen = [false; N_WELLS];
        for (well, column) in columns {
            let idx = well.index();
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            for (t, value) in column.into_iter().take(n_points).enumerate() {
                values[[t, idx]] = value;
            }
        }
        Self { values }
    }

    /// Parse a long-form plate table
    ///
    /// One row per well: the first two columns hold the 1-based row and column
    /// numbers, every further column is one measurement point. Rows whose
    /// coordinates do not resolve to a well (such as a header) are skipped.
    pub fn from_long_form(grid: &Grid) -> Result<Self, PlateError> {
        if grid.n_cols() < 3 {
            return Err(PlateError::InvalidLongForm {
                found: grid.n_cols(),
            });
        }
        let n_points = grid.n_cols() - 2;
        let columns = grid.rows().filter_map(|row| {
            let well = WellId::encode(row[0].as_integer()?, row[1].as_integer()?).ok()?;
            Some((well, row[2..].iter().map(|c| c.as_f64()).collect()))
        });
        Ok(Self::from_columns(n_points, columns))
    }

    /// Number of measurement rows
    pub fn n_points(&self) -> usize {
        self.values.nrows()
    }

    pub fn value(&self, point: usize, well: WellId) -> Option<f64> {
        self.values.get([point, well.index()]).copied().flatten()
    }

    /// Wells with at least one measured value
    pub fn measured_wells(&self) -> Vec<WellId> {
        all_wells()
            .filter(|w| self.values.column(w.index()).iter().any(Option::is_some))
            .collect()
    }
}

/// A temperature x well matrix of melt-curve signal
#[derive(Debug, Clone, PartialEq)]
pub struct PlateMatrix {
    temperatures: Vec<f64>,
    values: Array2<Option<f64>>,
}

impl PlateMatrix {
    /// Attach an evenly spaced temperature axis to a data block
    pub fn build(
        block: DataBlock,
        n_points: usize,
        t_min: f64,
        t_max: f64,
    ) -> Result<Self, PlateError> {
        if n_points < 2 {
            return Err(PlateError::InsufficientPoints { found: n_points });
        }
        if n_points != block.n_points() {
            return Err(PlateError::PointCountMismatch {
                declared: n_points,
                found: block.n_points(),
            });
        }
        TemperatureRange::new(t_min, t_max).validate()?;
        Ok(Self {
            temperatures: temperature_grid(n_points, t_min, t_max),
            values: block.values,
        })
    }

    /// Build with the point count taken from the block itself
    pub fn from_block(block: DataBlock, range: TemperatureRange) -> Result<Self, PlateError> {
        let n_points = block.n_points();
        Self::build(block, n_points, range.t_min, range.t_max)
    }

    /// Build from explicit temperatures and per-well rows
    ///
    /// `values` holds one row per temperature, columns in canonical well order.
    pub fn from_values(
        temperatures: Vec<f64>,
        values: Array2<Option<f64>>,
    ) -> Result<Self, PlateError> {
        if temperatures.len() < 2 {
            return Err(PlateError::InsufficientPoints {
                found: temperatures.len(),
            });
        }
        if values.nrows() != temperatures.len() || values.ncols() != N_WELLS {
            return Err(PlateError::PointCountMismatch {
                declared: temperatures.len(),
                found: values.nrows(),
            });
        }
        Ok(Self {
            temperatures,
            values,
        })
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn n_points(&self) -> usize {
        self.temperatures.len()
    }

    /// The well axis; always the full canonical universe
    pub fn wells(&self) -> Vec<WellId> {
        all_wells().collect()
    }

    pub fn value(&self, point: usize, well: WellId) -> Option<f64> {
        self.values.get([point, well.index()]).copied().flatten()
    }

    /// Melt curve of a single well
    pub fn column(&self, well: WellId) -> ArrayView1<'_, Option<f64>> {
        self.values.column(well.index())
    }

    /// Signal of every well at one temperature
    pub fn row(&self, point: usize) -> ArrayView1<'_, Option<f64>> {
        self.values.row(point)
    }

    pub fn values(&self) -> &Array2<Option<f64>> {
        &self.values
    }

    /// Derive a new matrix by transforming every measured value
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            temperatures: self.temperatures.clone(),
            values: self.values.mapv(|v| v.map(&f)),
        }
    }

    /// Derive a new matrix with a replaced temperature axis
    pub fn with_temperatures(&self, temperatures: Vec<f64>) -> Result<Self, PlateError> {
        Self::from_values(temperatures, self.values.clone())
    }

    /// Wells with at least one measured value
    pub fn measured_wells(&self) -> Vec<WellId> {
        all_wells()
            .filter(|w| {
                self.values
                    .index_axis(Axis(1), w.index())
                    .iter()
                    .any(Option::is_some)
            })
            .collect()
    }

    /// Melt the matrix into long format joined with well annotations
    ///
    /// Records are ordered well by well, each well listing all temperatures.
    pub fn to_long(&self, platemap: &PlateMap) -> Vec<LongRecord> {
        all_wells()
            .flat_map(|well| {
                let annotation = platemap.get(well);
                self.temperatures
                    .iter()
                    .enumerate()
                    .map(move |(t, &temperature)| LongRecord {
                        temperature,
                        well,
                        value: self.value(t, well),
                        condition: annotation.condition.clone(),
                        concentration: annotation.concentration,
                    })
            })
            .collect()
    }
}

/// One (temperature, well) observation with its annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub temperature: f64,
    pub well: WellId,
    pub value: Option<f64>,
    pub condition: Option<String>,
    pub concentration: Option<f64>,
}
