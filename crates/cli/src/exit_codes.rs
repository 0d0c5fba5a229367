//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success, every requirement consistent            |
//! | 1    | Discrepancies found (missing or mismatched)      |
//! | 2    | CLI usage error (bad args)                       |
//! | 3    | Requirement sheet or contract column not found   |
//! | 4    | Requirement document is not readable as a table  |
//! | 5    | Invalid `.check.toml` run config                 |
//! | 6    | I/O error (unreadable input, unwritable output)  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `recon_exit_code` or the command's error handling

use sensorcheck_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed, nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Check (1, 3-6)
// =============================================================================

/// At least one requirement is missing from or mismatched with the configuration.
/// Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_CHECK_DISCREPANCY: u8 = 1;

/// Requested sheet or a contract column (`SensorName`, `CREISrelevant`) is absent.
pub const EXIT_CHECK_SHEET_OR_COLUMN: u8 = 3;

/// Requirement document cannot be parsed as tabular data.
pub const EXIT_CHECK_MALFORMED: u8 = 4;

/// Run config failed to parse or validate.
pub const EXIT_CHECK_INVALID_CONFIG: u8 = 5;

/// File could not be read or written.
pub const EXIT_CHECK_IO: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::SheetNotFound { .. } | ReconError::ColumnNotFound { .. } => {
            EXIT_CHECK_SHEET_OR_COLUMN
        }
        ReconError::MalformedTabularDocument(_) => EXIT_CHECK_MALFORMED,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CHECK_INVALID_CONFIG,
        ReconError::Io(_) => EXIT_CHECK_IO,
    }
}
