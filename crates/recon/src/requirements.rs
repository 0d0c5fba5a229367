//! Requirement-sheet loading.
//!
//! The engine does not read files. Callers hand it a [`TabularSource`]
//! (workbook, CSV, in-memory table) and a sheet name; the schema is
//! checked once up front, then rows are projected onto the two contract
//! columns.

use crate::error::ReconError;
use crate::model::RequirementEntry;

/// Sheet name used when the caller does not pick one.
pub const DEFAULT_SHEET: &str = "Settings_SensorInfo";

/// Contract column holding the sensor name.
pub const SENSOR_NAME_COLUMN: &str = "SensorName";

/// Contract column holding the boolean relevance flag.
pub const RELEVANCE_COLUMN: &str = "CREISrelevant";

// ---------------------------------------------------------------------------
// Tabular seam
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form, text kept verbatim. Integral numbers drop the fractional part.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        }
    }
}

/// One sheet, header row split out.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// 1-based sheet row of the header; data rows follow it directly.
    pub header_row: usize,
}

impl SheetTable {
    /// Build from a dense grid whose first row is the header row.
    pub fn from_grid(name: impl Into<String>, mut grid: Vec<Vec<Cell>>) -> Self {
        let name = name.into();
        if grid.is_empty() {
            return Self { name, headers: Vec::new(), rows: Vec::new(), header_row: 1 };
        }
        let headers = grid.remove(0).iter().map(Cell::as_text).collect();
        Self { name, headers, rows: grid, header_row: 1 }
    }

    /// Place the header at `header_row` (1-based) when the grid does not
    /// start at the top of the sheet.
    pub fn starting_at(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    /// Sheet row number of data row `index`.
    pub fn row_number(&self, index: usize) -> usize {
        self.header_row + 1 + index
    }

    /// Headers match byte for byte.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Anything that can hand out named sheets.
pub trait TabularSource {
    fn sheet_names(&self) -> Vec<String>;

    /// Read one sheet. Unknown names are `ReconError::SheetNotFound`.
    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, ReconError>;
}

/// In-memory source, used by tests and by callers that already hold rows.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: Vec<SheetTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: SheetTable) -> Self {
        self.sheets.push(sheet);
        self
    }
}

impl TabularSource for MemorySource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, ReconError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| ReconError::SheetNotFound {
                sheet: name.into(),
                available: self.sheet_names(),
            })
    }
}

// ---------------------------------------------------------------------------
// Schema + projection
// ---------------------------------------------------------------------------

/// Column positions of the two contract columns, resolved once per sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementSchema {
    pub sensor_name: usize,
    pub relevance: usize,
}

impl RequirementSchema {
    pub fn resolve(sheet: &SheetTable) -> Result<Self, ReconError> {
        let idx = |column: &str| -> Result<usize, ReconError> {
            sheet.column(column).ok_or_else(|| ReconError::ColumnNotFound {
                sheet: sheet.name.clone(),
                column: column.into(),
            })
        };

        let schema = Self {
            sensor_name: idx(SENSOR_NAME_COLUMN)?,
            relevance: idx(RELEVANCE_COLUMN)?,
        };
        log::debug!(
            "sheet '{}': {} at column {}, {} at column {}",
            sheet.name,
            SENSOR_NAME_COLUMN,
            schema.sensor_name,
            RELEVANCE_COLUMN,
            schema.relevance,
        );
        Ok(schema)
    }
}

/// Read `sheet` from `source` and project it onto requirement entries.
pub fn load_requirements(
    source: &mut dyn TabularSource,
    sheet: &str,
) -> Result<Vec<RequirementEntry>, ReconError> {
    let table = source.read_sheet(sheet)?;
    extract_requirements(&table)
}

/// Project an already-loaded sheet. Rows with an empty sensor name are skipped.
pub fn extract_requirements(table: &SheetTable) -> Result<Vec<RequirementEntry>, ReconError> {
    let schema = RequirementSchema::resolve(table)?;
    let mut entries = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let row_number = table.row_number(i);
        let name_cell = row.get(schema.sensor_name).unwrap_or(&Cell::Empty);
        if name_cell.is_empty() {
            continue;
        }

        let relevance_cell = row.get(schema.relevance).unwrap_or(&Cell::Empty);
        let is_required = parse_relevance(relevance_cell).ok_or_else(|| {
            ReconError::MalformedTabularDocument(format!(
                "sheet '{}', row {row_number}: cannot read {RELEVANCE_COLUMN} value '{}' as boolean",
                table.name,
                relevance_cell.as_text(),
            ))
        })?;

        entries.push(RequirementEntry {
            sensor_name: name_cell.as_text(),
            is_required,
            row: row_number,
        });
    }

    log::debug!("sheet '{}': {} requirement row(s)", table.name, entries.len());
    Ok(entries)
}

/// Interpret a relevance cell. A blank cell counts as required.
pub fn parse_relevance(cell: &Cell) -> Option<bool> {
    match cell {
        Cell::Empty => Some(true),
        Cell::Bool(b) => Some(*b),
        Cell::Number(n) => Some(*n != 0.0),
        Cell::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "false" | "no" | "0" => Some(false),
            "" | "true" | "yes" | "1" => Some(true),
            _ => None,
        },
    }
}
