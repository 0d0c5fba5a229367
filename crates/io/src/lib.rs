// File I/O operations

pub mod csv;
pub mod text;
pub mod xlsx;

use std::path::Path;

use sensorcheck_recon::requirements::TabularSource;
use sensorcheck_recon::ReconError;

pub use text::read_configuration;

/// Open a requirement document by extension: `.csv`/`.tsv` as a single
/// delimited sheet, anything else as a workbook.
pub fn open_requirements(path: &Path) -> Result<Box<dyn TabularSource>, ReconError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" => Ok(Box::new(csv::CsvSource::open(path)?)),
        _ => Ok(Box::new(xlsx::WorkbookSource::open(path)?)),
    }
}
