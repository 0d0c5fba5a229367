//! `sensorcheck-recon`: sensor configuration reconciliation engine.
//!
//! Pure engine crate: receives the configuration text and a tabular
//! requirement source, returns classified results. No CLI or file IO.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod requirements;

pub use config::CheckConfig;
pub use engine::{run, run_with_source, ReconInput};
pub use error::ReconError;
pub use extract::{extract_configured_sensors, ConfiguredSensorExtractor};
pub use model::{
    Classification, ConfiguredSensorEntry, ConfiguredTable, ReconReport, ReconciliationResult,
    RequirementEntry,
};
pub use normalize::normalize_sensor_name;
pub use requirements::{Cell, SheetTable, TabularSource, DEFAULT_SHEET};
