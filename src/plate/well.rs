//! Well identifiers for 384-well plates
//!
//! A well is addressed by a row letter (`A`..`P`) followed by a column number
//! (`1`..`24`) without leading zeros, e.g. `A1`, `P24`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::PlateError;

/// Number of rows on a 384-well plate
pub const N_ROWS: usize = 16;
/// Number of columns on a 384-well plate
pub const N_COLS: usize = 24;
/// Number of wells on a 384-well plate
pub const N_WELLS: usize = N_ROWS * N_COLS;

const ROW_LETTERS: &[u8; N_ROWS] = b"ABCDEFGHIJKLMNOP";

/// A canonical well position on a 384-well plate (1-based row and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WellId {
    row: u8,
    col: u8,
}

impl WellId {
    /// Encode a 1-based (row, column) coordinate
    ///
    /// Fails with [`PlateError::OutOfRange`] if `row` is outside `1..=16`
    /// or `col` is outside `1..=24`.
    pub fn encode(row: i64, col: i64) -> Result<Self, PlateError> {
        if !(1..=N_ROWS as i64).contains(&row) || !(1..=N_COLS as i64).contains(&col) {
            return Err(PlateError::OutOfRange { row, col });
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Strict parse of a well identifier, tolerant of case and zero padding
    pub fn parse(text: &str) -> Option<Self> {
        let (letter, digits) = split_well(text)?;
        let row = ROW_LETTERS.iter().position(|&l| l == letter)? as i64 + 1;
        let col: i64 = digits.parse().ok()?;
        Self::encode(row, col).ok()
    }

    /// Build a well from its row-major position in the canonical universe
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= N_WELLS {
            return None;
        }
        Some(Self {
            row: (index / N_COLS) as u8 + 1,
            col: (index % N_COLS) as u8 + 1,
        })
    }

    /// 1-based row number
    pub fn row(&self) -> usize {
        self.row as usize
    }

    /// 1-based column number
    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Row letter (`A`..`P`)
    pub fn row_letter(&self) -> char {
        ROW_LETTERS[self.row as usize - 1] as char
    }

    /// Row-major position in the canonical universe (`0..384`)
    pub fn index(&self) -> usize {
        (self.row as usize - 1) * N_COLS + (self.col as usize - 1)
    }
}

/// All 384 wells in canonical row-major order (`A1`, `A2`, ..., `P24`)
pub fn all_wells() -> impl Iterator<Item = WellId> {
    (0..N_WELLS).filter_map(WellId::from_index)
}

/// Normalize a textual well identifier to its canonical form
///
/// Accepts lowercase letters and zero-padded columns (`"a01"` becomes `"A1"`).
/// Input that cannot be interpreted as a 384-well position is returned
/// unchanged so callers can detect the mismatch.
pub fn normalize(text: &str) -> String {
    match WellId::parse(text) {
        Some(well) => well.to_string(),
        None => text.to_string(),
    }
}

fn split_well(text: &str) -> Option<(u8, &str)> {
    let trimmed = text.trim();
    let first = trimmed.chars().next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let digits = &trimmed[first.len_utf8()..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((first.to_ascii_uppercase() as u8, digits))
}

impl fmt::Display for WellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.col)
    }
}

impl FromStr for WellId {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PlateError::InvalidWell(s.to_string()))
    }
}

impl Serialize for WellId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WellId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WellVisitor;

        impl Visitor<'_> for WellVisitor {
            type Value = WellId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a well identifier such as \"A1\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<WellId, E> {
                WellId::parse(value)
                    .ok_or_else(|| E::custom(format!("invalid well identifier: {value}")))
            }
        }

        deserializer.deserialize_str(WellVisitor)
    }
}
