//! Configured-sensor extraction from `.pm` configuration text.
//!
//! Best-effort: the scanner only recognizes one nesting shape,
//!
//! ```text
//! Module => { "Sensor" => {configured => "true"
//! ```
//!
//! and silently skips anything else. Keywords match case-insensitively;
//! captured identifiers keep their original case.

use std::sync::OnceLock;

use regex::{CaptureMatches, Regex};

use crate::model::ConfiguredSensorEntry;

fn block_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(\w+)\s*=>\s*\{\s*"(\w+)"\s*=>\s*\{configured\s*=>\s*"(\w+)""#).unwrap()
    })
}

fn keyword_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bconfigured\s*=>").unwrap())
}

/// Scanner over one configuration document.
///
/// Cheap to construct; every call to [`iter`](Self::iter) restarts the scan
/// from the beginning of the text.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredSensorExtractor<'t> {
    text: &'t str,
}

impl<'t> ConfiguredSensorExtractor<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text }
    }

    /// Lazy, left-to-right, non-overlapping scan.
    pub fn iter(&self) -> ConfiguredSensors<'t> {
        ConfiguredSensors {
            captures: block_pattern().captures_iter(self.text),
        }
    }

    /// Count `configured =>` keywords that sit outside every full match,
    /// i.e. blocks the scanner had to skip.
    pub fn unmatched_regions(&self) -> usize {
        let spans: Vec<(usize, usize)> = block_pattern()
            .find_iter(self.text)
            .map(|m| (m.start(), m.end()))
            .collect();

        keyword_pattern()
            .find_iter(self.text)
            .filter(|kw| !spans.iter().any(|&(start, end)| kw.start() >= start && kw.end() <= end))
            .count()
    }

    /// Collect every entry plus the skipped-region count.
    pub fn extract(&self) -> Extraction {
        let entries: Vec<ConfiguredSensorEntry> = self.iter().collect();
        let unmatched_regions = self.unmatched_regions();
        log::debug!(
            "extracted {} configured sensor(s), {} unmatched region(s)",
            entries.len(),
            unmatched_regions,
        );
        Extraction {
            entries,
            unmatched_regions,
        }
    }
}

impl<'t> IntoIterator for &ConfiguredSensorExtractor<'t> {
    type Item = ConfiguredSensorEntry;
    type IntoIter = ConfiguredSensors<'t>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ConfiguredSensors<'t> {
    captures: CaptureMatches<'static, 't>,
}

impl Iterator for ConfiguredSensors<'_> {
    type Item = ConfiguredSensorEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.captures.next()?;
        Some(ConfiguredSensorEntry {
            module: caps[1].to_string(),
            sensor_name: caps[2].to_string(),
            configured_state: caps[3].to_string(),
        })
    }
}

/// Materialized extraction result.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub entries: Vec<ConfiguredSensorEntry>,
    pub unmatched_regions: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convenience: scan `text` and collect all entries.
pub fn extract_configured_sensors(text: &str) -> Vec<ConfiguredSensorEntry> {
    ConfiguredSensorExtractor::new(text).iter().collect()
}
