//! CLI argument validation tests.
//!
//! These tests verify that the CLI properly validates arguments and provides
//! helpful error messages.

use predicates::prelude::*;

use super::helpers::oni_cmd;

#[test]
fn test_help_output() {
    oni_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("oni"))
        .stdout(predicate::str::contains("curve"))
        .stdout(predicate::str::contains("curve-table"))
        .stdout(predicate::str::contains("simulate"));
}

#[test]
fn test_curve_help_output() {
    oni_cmd()
        .args(["curve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--u-optimal"))
        .stdout(predicate::str::contains("--r-slope2"))
        .stdout(predicate::str::contains("UTILIZATION"));
}

#[test]
fn test_invalid_command() {
    oni_cmd()
        .arg("invalid_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_curve_missing_utilization() {
    oni_cmd()
        .arg("curve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_simulate_missing_scenario() {
    oni_cmd()
        .arg("simulate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_utilization_value() {
    oni_cmd()
        .args(["curve", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_output_format() {
    oni_cmd()
        .args(["curve", "50", "--format", "invalid_format"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_config_file() {
    oni_cmd()
        .args(["--config", "missing-config.json", "curve", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}
