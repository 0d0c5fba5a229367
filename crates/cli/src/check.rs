//! `sensorcheck check`, `run` and `validate`: configuration vs requirement reconciliation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sensorcheck_config::{ColorMode, Settings};
use sensorcheck_recon::{CheckConfig, ReconError, ReconReport};

use crate::exit_codes::{recon_exit_code, EXIT_CHECK_DISCREPANCY};
use crate::render;
use crate::CliError;

/// Output flags shared by `check` and `run`.
pub struct OutputOptions {
    pub json: bool,
    pub output: Option<PathBuf>,
    pub only_discrepancies: bool,
    pub color: ColorMode,
}

fn check_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::SheetNotFound { .. } => {
            Some("pick a sheet with --sheet; `sensorcheck sheets <FILE>` lists them".to_string())
        }
        ReconError::ColumnNotFound { .. } => {
            Some("the sheet needs a header row with SensorName and CREISrelevant".to_string())
        }
        _ => None,
    };
    CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
}

/// Check one `.pm` file against one requirement workbook.
pub fn cmd_check(
    configuration: PathBuf,
    requirements: PathBuf,
    sheet: Option<String>,
    opts: OutputOptions,
    settings: &Settings,
) -> Result<(), CliError> {
    let sheet = sheet.unwrap_or_else(|| settings.default_sheet.clone());
    if sheet.trim().is_empty() {
        return Err(CliError::args("--sheet must not be empty"));
    }
    let check_name = configuration
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| configuration.display().to_string());

    let report = run_pair(&check_name, &configuration, &requirements, &sheet)?;
    emit(&report, &opts, settings)
}

/// Run the input pair named by a `.check.toml`.
pub fn cmd_run(config_path: PathBuf, opts: OutputOptions, settings: &Settings) -> Result<(), CliError> {
    let config = load_check_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let configuration = base_dir.join(&config.configuration.file);
    let requirements = base_dir.join(&config.requirements.file);

    let report = run_pair(&config.name, &configuration, &requirements, &config.requirements.sheet)?;
    emit(&report, &opts, settings)
}

/// Parse and validate a `.check.toml` without running it.
pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_check_config(&config_path)?;
    eprintln!(
        "valid: check '{}' ({} against sheet '{}' of {})",
        config.name, config.configuration.file, config.requirements.sheet, config.requirements.file,
    );
    Ok(())
}

fn load_check_config(config_path: &Path) -> Result<CheckConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", config_path.display())))?;
    CheckConfig::from_toml(&config_str).map_err(check_err)
}

/// Load both documents and run the engine. Requirement errors abort the run.
fn run_pair(
    check_name: &str,
    configuration: &Path,
    requirements: &Path,
    sheet: &str,
) -> Result<ReconReport, CliError> {
    let text = sensorcheck_io::read_configuration(configuration).map_err(check_err)?;
    let mut source = sensorcheck_io::open_requirements(requirements).map_err(check_err)?;
    log::debug!("checking {} against {} [{}]", configuration.display(), requirements.display(), sheet);

    sensorcheck_recon::run_with_source(check_name, &text, source.as_mut(), sheet).map_err(check_err)
}

fn emit(report: &ReconReport, opts: &OutputOptions, settings: &Settings) -> Result<(), CliError> {
    let needs_json = opts.json || opts.output.is_some();
    let json_str = if needs_json {
        Some(
            serde_json::to_string_pretty(report)
                .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?,
        )
    } else {
        None
    };

    if let (Some(path), Some(json_str)) = (&opts.output, &json_str) {
        std::fs::write(path, json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if opts.json {
        if let Some(json_str) = &json_str {
            println!("{json_str}");
        }
    } else {
        let only_discrepancies = opts.only_discrepancies || !settings.show_consistent;
        let color = render::use_color(opts.color);
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        render::write_results(&mut handle, &report.results, only_discrepancies, color)
            .and_then(|_| handle.flush())
            .map_err(|e| CliError::io(e.to_string()))?;
    }

    // Human summary to stderr
    for warning in &report.summary.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!("{}", render::summary_line(&report.summary));

    if report.has_discrepancies() {
        return Err(CliError {
            code: EXIT_CHECK_DISCREPANCY,
            message: format!("{} discrepancy(ies) found", report.summary.discrepancies),
            hint: None,
        });
    }
    Ok(())
}

/// List the sensors the extractor finds in a `.pm` file.
pub fn cmd_configured(configuration: PathBuf, json: bool) -> Result<(), CliError> {
    let text = sensorcheck_io::read_configuration(&configuration).map_err(check_err)?;
    let extraction = sensorcheck_recon::ConfiguredSensorExtractor::new(&text).extract();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        let json_str = serde_json::to_string_pretty(&extraction.entries)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        writeln!(handle, "{json_str}").map_err(|e| CliError::io(e.to_string()))?;
    } else {
        render::write_configured(&mut handle, &extraction.entries).map_err(|e| CliError::io(e.to_string()))?;
    }

    eprintln!(
        "{} configured sensor(s), {} skipped block(s)",
        extraction.entries.len(),
        extraction.unmatched_regions,
    );
    Ok(())
}

/// List sheet names of a requirement document.
pub fn cmd_sheets(requirements: PathBuf, json: bool) -> Result<(), CliError> {
    let source = sensorcheck_io::open_requirements(&requirements).map_err(check_err)?;
    let names = source.sheet_names();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        let json_str = serde_json::to_string(&names)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        writeln!(handle, "{json_str}").map_err(|e| CliError::io(e.to_string()))?;
    } else {
        for name in &names {
            writeln!(handle, "{name}").map_err(|e| CliError::io(e.to_string()))?;
        }
    }
    Ok(())
}
