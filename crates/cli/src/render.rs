//! Human-readable rendering of check results.
//!
//! Missing sensors are highlighted blue, mismatched ones red, consistent
//! ones printed plainly. Without colour a bracketed tag carries the same
//! information.

use std::io::{self, Write};

use owo_colors::OwoColorize;
use sensorcheck_config::ColorMode;
use sensorcheck_recon::model::{ConfiguredSensorEntry, ReconSummary};
use sensorcheck_recon::{Classification, ReconciliationResult};

/// Resolve `auto` against whether stdout is a terminal.
pub fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => atty::is(atty::Stream::Stdout),
    }
}

fn python_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

pub fn result_line(r: &ReconciliationResult, color: bool) -> String {
    let body = format!("Sensor: {}, CREISrelevant: {}", r.sensor_name, python_bool(r.is_required));
    match r.classification {
        Classification::Missing => {
            let line = format!("[missing]    {body}");
            if color { line.blue().bold().to_string() } else { line }
        }
        Classification::Mismatched => {
            let state = r.matched_configured_state.as_deref().unwrap_or("");
            let line = format!("[mismatched] {body} (configured: {state})");
            if color { line.red().bold().to_string() } else { line }
        }
        Classification::Consistent => format!("             {body}"),
    }
}

pub fn write_results(
    out: &mut dyn Write,
    results: &[ReconciliationResult],
    only_discrepancies: bool,
    color: bool,
) -> io::Result<()> {
    for r in results {
        if only_discrepancies && !r.classification.is_discrepancy() {
            continue;
        }
        writeln!(out, "{}", result_line(r, color))?;
    }
    Ok(())
}

pub fn summary_line(s: &ReconSummary) -> String {
    format!(
        "{} requirement(s): {} consistent, {} mismatched, {} missing ({} configured sensor(s), {} skipped block(s))",
        s.total, s.consistent, s.mismatched, s.missing, s.configured_entries, s.unmatched_regions,
    )
}

pub fn write_configured(out: &mut dyn Write, entries: &[ConfiguredSensorEntry]) -> io::Result<()> {
    let module_width = entries.iter().map(|e| e.module.len()).max().unwrap_or(0).max("MODULE".len());
    let sensor_width = entries.iter().map(|e| e.sensor_name.len()).max().unwrap_or(0).max("SENSOR".len());

    writeln!(out, "{:<module_width$}  {:<sensor_width$}  CONFIGURED", "MODULE", "SENSOR")?;
    for e in entries {
        writeln!(
            out,
            "{:<module_width$}  {:<sensor_width$}  {}",
            e.module, e.sensor_name, e.configured_state,
        )?;
    }
    Ok(())
}
