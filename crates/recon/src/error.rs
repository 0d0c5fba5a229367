use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Requested sheet is not in the document.
    SheetNotFound { sheet: String, available: Vec<String> },
    /// Sheet exists but lacks a required column.
    ColumnNotFound { sheet: String, column: String },
    /// Document (or one of its rows) cannot be read as tabular data.
    MalformedTabularDocument(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Run config validation error (empty name, empty path).
    ConfigValidation(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl ReconError {
    /// Sheet or column lookup failed. Both abort the run before classification.
    pub fn is_sheet_or_column_not_found(&self) -> bool {
        matches!(self, Self::SheetNotFound { .. } | Self::ColumnNotFound { .. })
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SheetNotFound { sheet, available } => {
                if available.is_empty() {
                    write!(f, "sheet '{sheet}' not found (document has no sheets)")
                } else {
                    write!(f, "sheet '{sheet}' not found (available: {})", available.join(", "))
                }
            }
            Self::ColumnNotFound { sheet, column } => {
                write!(f, "sheet '{sheet}': missing column '{column}'")
            }
            Self::MalformedTabularDocument(msg) => write!(f, "malformed tabular document: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
