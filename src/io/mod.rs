//! Delimited-text input and output
//!
//! Plate-reader exports and annotation sheets arrive as CSV/TSV dumps of a
//! spreadsheet; they are read without header semantics into a [`Grid`] so
//! that layout detection can find the headers itself. Result tables are
//! written back as CSV with one serialized record per row, leaving undefined
//! values empty.

use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::nparc::{ConditionSummary, PerTemperatureFit};
use crate::plate::{Cell, Grid, LongRecord};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IoError {
    /// Error encountered when reading or writing CSV data
    #[error("CSV error: {0}")]
    CSVError(String),
    /// Error while serializing a record
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

/// Read a delimited text file into a raw grid
///
/// Every line becomes a grid row; ragged lines are padded.
pub fn read_grid(path: impl AsRef<Path>, delimiter: u8) -> Result<Grid, IoError> {
    let file =
        std::fs::File::open(path.as_ref()).map_err(|e| IoError::CSVError(e.to_string()))?;
    grid_from_reader(file, delimiter)
}

/// Read delimited text from any reader into a raw grid
pub fn grid_from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Grid, IoError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::CSVError(e.to_string()))?;
        rows.push(record.iter().map(Cell::parse).collect());
    }
    Ok(Grid::new(rows))
}

/// Write per-temperature fits as CSV
pub fn write_fits<W: Write>(writer: W, fits: &[PerTemperatureFit]) -> Result<(), IoError> {
    write_records(writer, fits)
}

/// Write condition summaries as CSV
pub fn write_summaries<W: Write>(
    writer: W,
    summaries: &[ConditionSummary],
) -> Result<(), IoError> {
    write_records(writer, summaries)
}

/// Write a long-format plate table as CSV
pub fn write_long<W: Write>(writer: W, records: &[LongRecord]) -> Result<(), IoError> {
    write_records(writer, records)
}

fn write_records<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<(), IoError> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| IoError::SerdeError(e.to_string()))?;
    }
    writer.flush().map_err(|e| IoError::CSVError(e.to_string()))
}
