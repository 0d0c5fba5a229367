// CSV/TSV requirement sheets
//
// A delimited file is a single sheet named after the file stem.

use std::path::Path;

use sensorcheck_recon::requirements::{Cell, SheetTable, TabularSource};
use sensorcheck_recon::ReconError;

use crate::text::decode_text;

pub struct CsvSource {
    sheet_name: String,
    content: String,
    delimiter: u8,
}

impl CsvSource {
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        let content = decode_text(bytes);

        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
        let delimiter = if is_tsv { b'\t' } else { sniff_delimiter(&content) };

        let sheet_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();

        Ok(Self::from_string(sheet_name, content, delimiter))
    }

    pub fn from_string(sheet_name: impl Into<String>, content: impl Into<String>, delimiter: u8) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            content: content.into(),
            delimiter,
        }
    }
}

impl TabularSource for CsvSource {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet_name.clone()]
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, ReconError> {
        if name != self.sheet_name {
            return Err(ReconError::SheetNotFound {
                sheet: name.into(),
                available: self.sheet_names(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(self.content.as_bytes());

        let mut grid = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                ReconError::MalformedTabularDocument(format!("row {}: {e}", row_idx + 1))
            })?;
            grid.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(SheetTable::from_grid(name, grid))
    }
}

/// Pick the delimiter (comma, semicolon, tab) that splits the header line
/// into the most fields. Falls back to comma.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, n)| n > 0)
        .max_by_key(|&(_, n)| n)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}
