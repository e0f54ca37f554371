pub mod analysis;
pub mod error;
pub mod io;
pub mod nparc;
pub mod plate;

pub use crate::analysis::{analyze, run_nparc_both, ThermalFit, ThermalFitEngine};
pub use crate::nparc::{run_nparc, NparcOptions, NparcResult, ValueType};
pub use crate::plate::{load_plate, PlateMap, PlateMatrix, WellId};
pub use error::MeltError;

pub mod prelude {
    pub mod plate {
        pub use crate::plate::{
            detect_layout, load_plate, Cell, DataBlock, Grid, LayoutDebug, LayoutOptions,
            PlateMap, PlateMatrix, TemperatureRange, WellAnnotation, WellId,
        };
    }
    pub mod nparc {
        pub use crate::nparc::{
            benjamini_hochberg, correct, run_nparc, ConditionSummary, FitSettings, NparcOptions,
            NparcResult, PerTemperatureFit, ValueType,
        };
    }
    pub mod io {
        pub use crate::io::{grid_from_reader, read_grid, write_fits, write_long, write_summaries};
    }

    pub use crate::analysis::{analyze, run_nparc_both, ThermalFit, ThermalFitEngine};
    pub use crate::MeltError;
}
