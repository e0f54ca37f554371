use thiserror::Error;

use crate::io::IoError;
use crate::nparc::NparcError;
use crate::plate::PlateError;

#[derive(Error, Debug)]
pub enum MeltError {
    #[error("Plate error: {0}")]
    PlateError(#[from] PlateError),
    #[error("NPARC error: {0}")]
    NparcError(#[from] NparcError),
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
    /// Failure reported by the external thermal fit engine
    #[error("Thermal fit failed: {0}")]
    ThermalFitError(String),
}
