// sensorcheck CLI - verify sensor configuration against the requirement sheet

mod check;
mod exit_codes;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use sensorcheck_config::{ColorMode, Settings};

use check::OutputOptions;
use exit_codes::{EXIT_CHECK_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sensorcheck")]
#[command(about = "Verify sensor configuration (.pm) against required sensor relevance (spreadsheet)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a configuration file against a requirement workbook
    #[command(after_help = "\
Examples:
  sensorcheck check sysc.pm sensors.xlsx
  sensorcheck check sysc.pm sensors.xlsx --sheet SensorInfo_B
  sensorcheck check sysc.pm sensors.xlsx --only-discrepancies
  sensorcheck check sysc.pm sensors.csv --json > result.json

Missing sensors are shown in blue, wrong configuration in red.
Exit code 1 means at least one sensor is missing or mismatched.")]
    Check {
        /// Configuration file (.pm)
        configuration: PathBuf,

        /// Requirement document (.xlsx, .xls, .xlsb, .ods, .csv, .tsv)
        requirements: PathBuf,

        /// Sheet to read (default: settings, then "Settings_SensorInfo")
        #[arg(long, short = 's')]
        sheet: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run the input pair named in a .check.toml file
    #[command(after_help = "\
Examples:
  sensorcheck run bench-a.check.toml
  sensorcheck run bench-a.check.toml --json --output result.json")]
    Run {
        /// Path to the .check.toml file
        config: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Validate a .check.toml file without running it
    Validate {
        /// Path to the .check.toml file
        config: PathBuf,
    },

    /// List the configured sensors found in a configuration file
    Configured {
        /// Configuration file (.pm)
        configuration: PathBuf,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// List the sheets of a requirement document
    Sheets {
        /// Requirement document
        requirements: PathBuf,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output JSON to stdout instead of the sensor list
    #[arg(long)]
    json: bool,

    /// Write JSON output to file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print only missing and mismatched sensors
    #[arg(long)]
    only_discrepancies: bool,

    /// Colour the sensor list
    #[arg(long, value_enum)]
    color: Option<ColorArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

impl OutputArgs {
    fn into_options(self, settings: &Settings) -> OutputOptions {
        OutputOptions {
            json: self.json,
            output: self.output,
            only_discrepancies: self.only_discrepancies,
            color: self.color.map(ColorMode::from).unwrap_or(settings.color),
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  sensorcheck-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Log to stderr. `SENSORCHECK_LOG` takes env-filter syntax (default `warn`).
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SENSORCHECK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let settings = Settings::load();

    let result = match cli.command {
        Commands::Check { configuration, requirements, sheet, output } => {
            let opts = output.into_options(&settings);
            check::cmd_check(configuration, requirements, sheet, opts, &settings)
        }
        Commands::Run { config, output } => {
            let opts = output.into_options(&settings);
            check::cmd_run(config, opts, &settings)
        }
        Commands::Validate { config } => check::cmd_validate(config),
        Commands::Configured { configuration, json } => check::cmd_configured(configuration, json),
        Commands::Sheets { requirements, json } => check::cmd_sheets(requirements, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CHECK_IO, message: msg.into(), hint: None }
    }
}
