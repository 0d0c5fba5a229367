// Excel requirement sheets (xlsx, xlsm, xls, xlsb, ods)
//
// Read-only. One sheet is materialized at a time into the engine's
// SheetTable; the first row of the used range is the header row.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use sensorcheck_recon::requirements::{Cell, SheetTable, TabularSource};
use sensorcheck_recon::ReconError;

/// Maximum rows read from one sheet (prevents runaway reads of huge files)
const MAX_ROWS: usize = 1_048_576;

pub struct WorkbookSource {
    workbook: Sheets<Cursor<Vec<u8>>>,
    sheet_names: Vec<String>,
}

impl WorkbookSource {
    /// Open a workbook file. The format is detected from content, not extension.
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    /// Open an in-memory workbook (e.g. an uploaded file body).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ReconError> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
            ReconError::MalformedTabularDocument(format!("cannot open workbook: {e}"))
        })?;
        let sheet_names = workbook.sheet_names().to_vec();
        Ok(Self { workbook, sheet_names })
    }
}

impl TabularSource for WorkbookSource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheet_names.clone()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, ReconError> {
        if !self.sheet_names.iter().any(|s| s == name) {
            return Err(ReconError::SheetNotFound {
                sheet: name.into(),
                available: self.sheet_names.clone(),
            });
        }

        let range = self.workbook.worksheet_range(name).map_err(|e| {
            ReconError::MalformedTabularDocument(format!("cannot read sheet '{name}': {e}"))
        })?;

        let (height, width) = range.get_size();
        log::debug!("sheet '{name}': {height} row(s) x {width} column(s)");
        if height > MAX_ROWS {
            log::warn!("sheet '{name}': reading first {MAX_ROWS} of {height} rows");
        }

        let grid: Vec<Vec<Cell>> = range
            .rows()
            .take(MAX_ROWS)
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        // rows() begins at the first used row, not necessarily row 1.
        let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
        Ok(SheetTable::from_grid(name, grid).starting_at(header_row))
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}
