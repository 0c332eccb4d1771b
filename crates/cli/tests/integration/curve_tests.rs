//! Integration tests for the curve commands.

use predicates::prelude::*;

use super::helpers::{fixture_path, json_output, oni_cmd};

#[test]
fn test_curve_at_kink() {
    oni_cmd()
        .args(["curve", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("60.00%"))
        .stdout(predicate::str::contains("2.50%"))
        .stdout(predicate::str::contains("steep"));
}

#[test]
fn test_curve_below_kink() {
    oni_cmd()
        .args(["curve", "30"])
        .assert()
        .success()
        // 1.5% + 30/60 * 1%
        .stdout(predicate::str::contains("2.00%"))
        .stdout(predicate::str::contains("base"));
}

#[test]
fn test_curve_full_utilization() {
    oni_cmd()
        .args(["curve", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("82.50%"));
}

#[test]
fn test_curve_flag_overrides() {
    oni_cmd()
        .args([
            "curve",
            "80",
            "--u-optimal",
            "80",
            "--borrow-base",
            "2",
            "--r-slope1",
            "0.05",
            "--r-slope2",
            "75",
        ])
        .assert()
        .success()
        // At the kink: 2% + 0.05%
        .stdout(predicate::str::contains("2.05%"));
}

#[test]
fn test_curve_config_file() {
    oni_cmd()
        .args(["--config", &fixture_path("steep_curve_config"), "curve", "75"])
        .assert()
        .success()
        // 25% past a 50% kink on a 100% slope
        .stdout(predicate::str::contains("50.00%"));
}

#[test]
fn test_curve_config_from_env() {
    oni_cmd()
        .env("ONI_CONFIG", fixture_path("steep_curve_config"))
        .args(["curve", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50.00%"));
}

#[test]
fn test_curve_json_output() {
    let json = json_output(oni_cmd().args(["curve", "60", "--format", "json"]));

    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["aboveKink"], serde_json::Value::Bool(true));
    assert!(json["params"]["uOptimal"].is_string());
}

#[test]
fn test_curve_table_rows() {
    let json = json_output(oni_cmd().args(["curve-table", "--step", "25", "--format", "json"]));

    // 0, 25, 50, 75, 100
    assert_eq!(json["points"].as_array().unwrap().len(), 5);
}

#[test]
fn test_curve_table_output() {
    oni_cmd()
        .args(["curve-table", "--step", "20", "--max", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Utilization"))
        .stdout(predicate::str::contains("Borrow APY"))
        .stdout(predicate::str::contains("1.50%"))
        .stdout(predicate::str::contains("2.50%"));
}

#[test]
fn test_curve_table_rejects_zero_step() {
    oni_cmd()
        .args(["curve-table", "--step", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--step must be positive"));
}

#[test]
fn test_curve_rejects_invalid_params() {
    oni_cmd()
        .args(["curve", "50", "--u-optimal", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameters"));
}
