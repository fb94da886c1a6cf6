// Shared test helpers for integration tests
#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// A driver that exits with status 3 when its input contains `FAIL`.
pub const FAIL_ON_MARKER_DRIVER: &str = "sh -c 'if grep -q FAIL; then exit 3; fi'";

/// Creates a scratch working directory with a `test_cases/` folder holding
/// the given `(file name, content)` pairs.
pub fn setup_work_dir(cases: &[(&str, &str)]) -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let cases_dir = temp_dir.path().join("test_cases");
    fs::create_dir_all(&cases_dir).expect("Failed to create test_cases directory");

    for (name, content) in cases {
        fs::write(cases_dir.join(name), content).expect("Failed to write test case");
    }

    temp_dir
}

/// Writes `BenchConfig.toml` into `dir`.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("BenchConfig.toml");
    fs::write(&config_path, content).expect("Failed to write BenchConfig.toml");
    config_path
}

/// The binary under test, pinned to English output and run inside `work_dir`.
pub fn bench_cmd(work_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("solver-bench").unwrap();
    cmd.current_dir(work_dir).arg("--lang").arg("en");
    cmd
}

/// Reads the result log and returns its lines.
pub fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read result log")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Splits a data row into its case name and parsed seconds.
pub fn parse_row(row: &str) -> (String, f64) {
    let (name, seconds) = row.rsplit_once(',').expect("row has two columns");
    let seconds: f64 = seconds.parse().expect("seconds column is numeric");
    (name.to_string(), seconds)
}
