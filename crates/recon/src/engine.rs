use crate::classify::reconcile;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::extract::ConfiguredSensorExtractor;
use crate::model::{ConfiguredTable, ReconMeta, ReconReport, ReconWarning, RequirementEntry};
use crate::requirements::{load_requirements, TabularSource};

/// Both documents of one run, already loaded.
#[derive(Debug, Clone, Copy)]
pub struct ReconInput<'a> {
    /// Label echoed into the report (config name or file name).
    pub check_name: &'a str,
    /// Sheet the requirements came from.
    pub sheet: &'a str,
    pub configuration_text: &'a str,
    pub requirements: &'a [RequirementEntry],
}

/// Extract, build the configured table, classify, summarize.
///
/// Never fails: text extraction is best-effort and an empty extraction only
/// adds a warning.
pub fn run(input: &ReconInput<'_>) -> ReconReport {
    let extraction = ConfiguredSensorExtractor::new(input.configuration_text).extract();
    let table = ConfiguredTable::from_entries(&extraction.entries);

    let results = reconcile(input.requirements, &table);

    let mut summary = compute_summary(&results);
    summary.configured_entries = extraction.entries.len();
    summary.unmatched_regions = extraction.unmatched_regions;
    if extraction.is_empty() {
        log::warn!("'{}': configuration text has no configured sensors", input.check_name);
        summary.warnings.push(ReconWarning::ExtractionEmpty);
    }

    ReconReport {
        meta: ReconMeta {
            check_name: input.check_name.to_string(),
            sheet: input.sheet.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        results,
    }
}

/// Load requirements from `source`, then [`run`].
///
/// Sheet, column, and parse failures abort before any classification.
pub fn run_with_source(
    check_name: &str,
    configuration_text: &str,
    source: &mut dyn TabularSource,
    sheet: &str,
) -> Result<ReconReport, ReconError> {
    let requirements = load_requirements(source, sheet)?;
    Ok(run(&ReconInput {
        check_name,
        sheet,
        configuration_text,
        requirements: &requirements,
    }))
}
