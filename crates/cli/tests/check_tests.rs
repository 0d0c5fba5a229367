// End-to-end tests for `sensorcheck check`, `run`, `validate`, `configured` and `sheets`.
//
// Every test runs the real binary against files written into a temp dir.
// HOME and XDG_CONFIG_HOME point into that dir so user settings never leak in.
//
// Run with: cargo test -p sensorcheck-cli --test check_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const SYSC_PM: &str = r#"package SYSC_SensorInfo;

our %SensorConfig = (
    Inertial => { "AccelX" => {configured => "true", range_g => 16 } },
    Inertial => { "Accel" => {configured => "True", range_g => 16 } },
    Inertial => { "Gyro" => {configured => "false", range_dps => 250 } },
    Chassis => { "WheelSpeed" => {configured => "TRUE" } },
    Chassis => { "Steering" => {configured => "disabled" } },
    Ambient => { "Baro" => { configured => "true" } },
    Ambient => { "Temp" => {configured => "false" } },
);

1;
"#;

const CONSISTENT_CSV: &str = "\
No,SensorName,CREISrelevant
1,Accel_X,TRUE
2,Wheel_Speed,TRUE
3,Temp,FALSE
";

const DISCREPANT_CSV: &str = "\
No,SensorName,CREISrelevant
1,Accel_X,TRUE
2,Gyro,TRUE
3,Baro,TRUE
4,Temp,FALSE
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn sensorcheck(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sensorcheck"));
        cmd.current_dir(self.dir.path())
            .env("HOME", self.path("home"))
            .env("XDG_CONFIG_HOME", self.path("home/.config"))
            .env_remove("SENSORCHECK_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.sensorcheck().args(args).output().expect("run sensorcheck")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output),
    );
}

fn write_workbook(path: &Path, sheet: &str, rows: &[(&str, bool)]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(sheet).unwrap();
    ws.write_string(0, 0, "SensorName").unwrap();
    ws.write_string(0, 1, "CREISrelevant").unwrap();
    for (i, (name, relevant)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_string(row, 0, *name).unwrap();
        ws.write_boolean(row, 1, *relevant).unwrap();
    }
    workbook.save(path).unwrap();
}

// ===========================================================================
// sensorcheck check
// ===========================================================================

#[test]
fn consistent_pair_exits_zero() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", CONSISTENT_CSV);

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv"]);
    assert_code(&output, 0);

    let out = stdout(&output);
    assert_eq!(out.lines().count(), 3);
    assert!(out.contains("Sensor: Accel_X, CREISrelevant: True"));
    assert!(out.contains("Sensor: Temp, CREISrelevant: False"));
    assert!(!out.contains("[missing]"));
    assert!(stderr(&output).contains("3 requirement(s): 3 consistent, 0 mismatched, 0 missing"));
}

#[test]
fn discrepancies_exit_one_in_sheet_order() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", DISCREPANT_CSV);

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "--color", "never"]);
    assert_code(&output, 1);

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "             Sensor: Accel_X, CREISrelevant: True",
            "[mismatched] Sensor: Gyro, CREISrelevant: True (configured: false)",
            "[missing]    Sensor: Baro, CREISrelevant: True",
            "             Sensor: Temp, CREISrelevant: False",
        ]
    );

    let err = stderr(&output);
    assert!(err.contains("4 requirement(s): 2 consistent, 1 mismatched, 1 missing"), "{err}");
    assert!(err.contains("1 skipped block(s)"), "{err}");
    assert!(err.contains("error: 2 discrepancy(ies) found"), "{err}");
}

#[test]
fn only_discrepancies_hides_consistent_rows() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", DISCREPANT_CSV);

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "--only-discrepancies"]);
    assert_code(&output, 1);

    let out = stdout(&output);
    assert_eq!(out.lines().count(), 2);
    assert!(out.lines().all(|l| l.starts_with('[')));
}

#[test]
fn color_always_marks_discrepancies() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", DISCREPANT_CSV);

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "--color", "always"]);
    assert_code(&output, 1);

    let out = stdout(&output);
    for line in out.lines() {
        let colored = line.contains("\x1b[");
        let discrepancy = line.contains("Gyro") || line.contains("Baro");
        assert_eq!(colored, discrepancy, "line: {line:?}");
    }
}

#[test]
fn xlsx_requirements_are_read_from_named_sheet() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    write_workbook(
        &ws.path("sensors.xlsx"),
        "Settings_SensorInfo",
        &[("Accel_Y", true), ("Steering", true), ("Temp", false)],
    );

    let output = ws.run(&["check", "sysc.pm", "sensors.xlsx", "--color", "never"]);
    assert_code(&output, 1);

    // Accel_Y probes "Accel"; "disabled" is neither true nor false.
    let out = stdout(&output);
    assert!(out.contains("             Sensor: Accel_Y, CREISrelevant: True"), "{out}");
    assert!(out.contains("[mismatched] Sensor: Steering, CREISrelevant: True (configured: disabled)"), "{out}");
}

#[test]
fn blank_relevance_cell_is_required() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", "SensorName,CREISrelevant\nTemp,\nGyro\n");

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "--color", "never"]);
    assert_code(&output, 1);
    assert_eq!(
        stdout(&output).lines().collect::<Vec<_>>(),
        vec![
            "[mismatched] Sensor: Temp, CREISrelevant: True (configured: false)",
            "[mismatched] Sensor: Gyro, CREISrelevant: True (configured: false)",
        ]
    );
}

#[test]
fn padded_header_is_column_not_found() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", " SensorName ,CREISrelevant\nTemp,FALSE\n");

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv"]);
    assert_code(&output, 3);
    assert!(stderr(&output).contains("missing column 'SensorName'"));
}

#[test]
fn explicit_sheet_overrides_default() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    write_workbook(&ws.path("sensors.xlsx"), "SensorInfo_B", &[("Temp", false)]);

    let output = ws.run(&["check", "sysc.pm", "sensors.xlsx", "--sheet", "SensorInfo_B"]);
    assert_code(&output, 0);
}

#[test]
fn empty_sheet_flag_is_usage_error() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", CONSISTENT_CSV);

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "--sheet", ""]);
    assert_code(&output, 2);
}

// ===========================================================================
// Error exit codes
// ===========================================================================

#[test]
fn missing_sheet_exits_three_with_hint() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    write_workbook(&ws.path("sensors.xlsx"), "Other", &[("Temp", false)]);

    let output = ws.run(&["check", "sysc.pm", "sensors.xlsx"]);
    assert_code(&output, 3);

    let err = stderr(&output);
    assert!(err.contains("error: sheet 'Settings_SensorInfo' not found (available: Other)"), "{err}");
    assert!(err.contains("hint:"), "{err}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn missing_column_exits_three() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", "No,SensorName,Relevant\n1,Temp,FALSE\n");

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv"]);
    assert_code(&output, 3);
    assert!(stderr(&output).contains("missing column 'CREISrelevant'"));
}

#[test]
fn unreadable_relevance_exits_four() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", "SensorName,CREISrelevant\nTemp,maybe\n");

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv"]);
    assert_code(&output, 4);
    assert!(stderr(&output).contains("row 2"));
}

#[test]
fn corrupt_workbook_exits_four() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("sensors.xlsx", "this is not a zip archive");

    let output = ws.run(&["check", "sysc.pm", "sensors.xlsx"]);
    assert_code(&output, 4);
}

#[test]
fn missing_configuration_file_exits_six() {
    let ws = Workspace::new();
    ws.write("Settings_SensorInfo.csv", CONSISTENT_CSV);

    let output = ws.run(&["check", "nope.pm", "Settings_SensorInfo.csv"]);
    assert_code(&output, 6);
}

#[test]
fn configuration_without_blocks_reports_everything_missing() {
    let ws = Workspace::new();
    ws.write("empty.pm", "package Empty;\n1;\n");
    ws.write("Settings_SensorInfo.csv", CONSISTENT_CSV);

    let output = ws.run(&["check", "empty.pm", "Settings_SensorInfo.csv", "--color", "never"]);
    assert_code(&output, 1);
    assert!(stdout(&output).lines().all(|l| l.starts_with("[missing]")));
    assert!(stderr(&output).contains("warning: no configured sensors found"));
}

// ===========================================================================
// --json contract
// ===========================================================================

#[test]
fn json_stdout_is_single_report() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", DISCREPANT_CSV);

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "--json"]);
    assert_code(&output, 1);

    let val: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("valid JSON");
    assert_eq!(val["meta"]["check_name"], "sysc.pm");
    assert_eq!(val["meta"]["sheet"], "Settings_SensorInfo");
    assert_eq!(val["summary"]["total"], 4);
    assert_eq!(val["summary"]["missing"], 1);
    assert_eq!(val["summary"]["mismatched"], 1);
    assert_eq!(val["summary"]["discrepancies"], 2);
    assert_eq!(val["summary"]["configured_entries"], 6);

    let results = val["results"].as_array().unwrap();
    assert_eq!(results[0]["lookup_key"], "Accel");
    assert_eq!(results[0]["classification"], "consistent");
    assert_eq!(results[1]["matched_configured_state"], "false");
    assert_eq!(results[2]["classification"], "missing");
    assert!(results[2].get("matched_configured_state").is_none());
}

#[test]
fn output_flag_writes_json_file() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("Settings_SensorInfo.csv", CONSISTENT_CSV);

    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "-o", "out/result.json"]);
    // Parent directory does not exist.
    assert_code(&output, 6);

    std::fs::create_dir_all(ws.path("out")).unwrap();
    let output = ws.run(&["check", "sysc.pm", "Settings_SensorInfo.csv", "-o", "out/result.json"]);
    assert_code(&output, 0);

    let written = std::fs::read_to_string(ws.path("out/result.json")).unwrap();
    let val: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(val["summary"]["consistent"], 3);
    // Without --json the sensor list still goes to stdout.
    assert_eq!(stdout(&output).lines().count(), 3);
}

// ===========================================================================
// sensorcheck run / validate
// ===========================================================================

#[test]
fn run_resolves_paths_relative_to_config() {
    let ws = Workspace::new();
    ws.write("bench/inputs/sysc.pm", SYSC_PM);
    ws.write("bench/inputs/SensorInfo_B.csv", DISCREPANT_CSV);
    ws.write(
        "bench/bench-b.check.toml",
        r#"
name = "bench-b"

[configuration]
file = "inputs/sysc.pm"

[requirements]
file = "inputs/SensorInfo_B.csv"
sheet = "SensorInfo_B"
"#,
    );

    let output = ws.run(&["run", "bench/bench-b.check.toml", "--json"]);
    assert_code(&output, 1);

    let val: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(val["meta"]["check_name"], "bench-b");
    assert_eq!(val["meta"]["sheet"], "SensorInfo_B");
}

#[test]
fn invalid_check_config_exits_five() {
    let ws = Workspace::new();
    ws.write("broken.check.toml", "name = \"x\"\n[configuration]\nfile = \"a.pm\"\n");
    ws.write("unknown.check.toml", "name = \"x\"\ncolour = true\n[configuration]\nfile = \"a.pm\"\n[requirements]\nfile = \"b.xlsx\"\n");

    assert_code(&ws.run(&["run", "broken.check.toml"]), 5);
    assert_code(&ws.run(&["validate", "unknown.check.toml"]), 5);
}

#[test]
fn validate_accepts_minimal_config() {
    let ws = Workspace::new();
    ws.write(
        "ok.check.toml",
        "name = \"bench-a\"\n[configuration]\nfile = \"sysc.pm\"\n[requirements]\nfile = \"sensors.xlsx\"\n",
    );

    let output = ws.run(&["validate", "ok.check.toml"]);
    assert_code(&output, 0);
    assert!(stderr(&output).contains("valid: check 'bench-a'"));
    assert!(stderr(&output).contains("Settings_SensorInfo"));
}

// ===========================================================================
// sensorcheck configured / sheets
// ===========================================================================

#[test]
fn configured_lists_blocks_in_file_order() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);

    let output = ws.run(&["configured", "sysc.pm", "--json"]);
    assert_code(&output, 0);

    let val: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    let names: Vec<&str> = val
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["sensor_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["AccelX", "Accel", "Gyro", "WheelSpeed", "Steering", "Temp"]);
    assert!(stderr(&output).contains("6 configured sensor(s), 1 skipped block(s)"));
}

#[test]
fn sheets_lists_workbook_sheets() {
    let ws = Workspace::new();
    write_workbook(&ws.path("sensors.xlsx"), "Settings_SensorInfo", &[("Temp", false)]);

    let output = ws.run(&["sheets", "sensors.xlsx", "--json"]);
    assert_code(&output, 0);
    let val: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(val, serde_json::json!(["Settings_SensorInfo"]));
}

// ===========================================================================
// User settings
// ===========================================================================

#[cfg(target_os = "linux")]
#[test]
fn settings_default_sheet_and_show_consistent() {
    let ws = Workspace::new();
    ws.write("sysc.pm", SYSC_PM);
    ws.write("bench.csv", DISCREPANT_CSV);
    ws.write(
        "home/.config/sensorcheck/settings.json",
        r#"{
    // bench workbooks export one sheet per rig
    "requirements.defaultSheet": "bench",
    "output.showConsistent": false
}"#,
    );

    let output = ws.run(&["check", "sysc.pm", "bench.csv"]);
    assert_code(&output, 1);
    assert_eq!(stdout(&output).lines().count(), 2);
}
