use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One `module => { "sensor" => { configured => "state"` block found in the
/// configuration text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfiguredSensorEntry {
    pub module: String,
    pub sensor_name: String,
    /// Raw state token, case preserved. Compared case-insensitively.
    pub configured_state: String,
}

/// One requirement row projected onto `SensorName` / `CREISrelevant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementEntry {
    pub sensor_name: String,
    pub is_required: bool,
    /// 1-based row number in the source sheet (header is row 1).
    pub row: usize,
}

impl RequirementEntry {
    pub fn new(sensor_name: impl Into<String>, is_required: bool) -> Self {
        Self {
            sensor_name: sensor_name.into(),
            is_required,
            row: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Configured table
// ---------------------------------------------------------------------------

/// Raw configured sensor name → configured state.
///
/// Keys are the names exactly as extracted; lookups use the normalized
/// requirement name. The two key spaces differ on purpose (see
/// `classify::classify_entry`).
#[derive(Debug, Clone, Default)]
pub struct ConfiguredTable {
    states: HashMap<String, String>,
    duplicates: usize,
}

impl ConfiguredTable {
    /// Insert every entry in order. Later entries overwrite earlier ones.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a ConfiguredSensorEntry>,
    {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    pub fn insert(&mut self, entry: &ConfiguredSensorEntry) {
        let previous = self
            .states
            .insert(entry.sensor_name.clone(), entry.configured_state.clone());
        if let Some(previous) = previous {
            self.duplicates += 1;
            log::debug!(
                "configured sensor '{}' listed again ({} -> {}), keeping last",
                entry.sensor_name,
                previous,
                entry.configured_state,
            );
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.states.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of inserts that replaced an existing key.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// No configured entry under the lookup key.
    Missing,
    /// Configured state disagrees with the required relevance.
    Mismatched,
    Consistent,
}

impl Classification {
    pub fn is_discrepancy(&self) -> bool {
        !matches!(self, Self::Consistent)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Mismatched => write!(f, "mismatched"),
            Self::Consistent => write!(f, "consistent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub sensor_name: String,
    pub is_required: bool,
    /// Normalized name used to probe the configured table.
    pub lookup_key: String,
    pub classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_configured_state: Option<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconWarning {
    /// The configuration text produced no configured sensors.
    ExtractionEmpty,
}

impl std::fmt::Display for ReconWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtractionEmpty => write!(f, "no configured sensors found in configuration text"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total: usize,
    pub missing: usize,
    pub mismatched: usize,
    pub consistent: usize,
    /// `missing + mismatched`
    pub discrepancies: usize,
    pub configured_entries: usize,
    pub unmatched_regions: usize,
    pub warnings: Vec<ReconWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub check_name: String,
    pub sheet: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub results: Vec<ReconciliationResult>,
}

impl ReconReport {
    pub fn has_discrepancies(&self) -> bool {
        self.summary.discrepancies > 0
    }
}
