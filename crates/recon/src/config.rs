use serde::Deserialize;

use crate::error::ReconError;
use crate::requirements::DEFAULT_SHEET;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One saved input pair (`*.check.toml`).
///
/// File paths are stored as written; callers resolve them against the
/// config file's directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    pub name: String,
    pub configuration: ConfigurationSource,
    pub requirements: RequirementSource,
}

/// The `.pm` configuration text.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationSource {
    pub file: String,
}

/// The requirement workbook and the sheet to read.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementSource {
    pub file: String,
    #[serde(default = "default_sheet")]
    pub sheet: String,
}

fn default_sheet() -> String {
    DEFAULT_SHEET.into()
}

impl CheckConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CheckConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        if self.configuration.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "configuration.file must not be empty".into(),
            ));
        }
        if self.requirements.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "requirements.file must not be empty".into(),
            ));
        }
        if self.requirements.sheet.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "requirements.sheet must not be empty".into(),
            ));
        }
        Ok(())
    }
}
