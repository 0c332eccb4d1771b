//! Integration tests for the simulate command.

use predicates::prelude::*;

use super::helpers::{fixture_path, json_output, oni_cmd};

#[test]
fn test_simulate_borrow_scenario_table() {
    oni_cmd()
        .args(["simulate", &fixture_path("borrow_scenario")])
        .assert()
        .success()
        .stdout(predicate::str::contains("received 985 BEAN"))
        .stdout(predicate::str::contains("rejected: Insufficient collateral"))
        .stdout(predicate::str::contains("borrower"))
        .stdout(predicate::str::contains("rolled back"));
}

#[test]
fn test_simulate_borrow_scenario_json() {
    let json = json_output(oni_cmd().args([
        "simulate",
        &fixture_path("borrow_scenario"),
        "--format",
        "json",
    ]));

    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[1]["detail"], "received 985 BEAN");
    assert_eq!(steps[2]["action"], "helper-borrow");
    assert_eq!(steps[2]["ok"], true);
    assert_eq!(steps[3]["ok"], false);
    assert_eq!(steps[5]["timestamp"], 86_400);

    let accounts = json["accounts"].as_array().unwrap();
    let treasury = accounts.iter().find(|a| a["name"] == "treasury").unwrap();
    assert_ne!(treasury["baseBalance"], "0");
    assert_eq!(json["baseSymbol"], "BEAN");
}

#[test]
fn test_simulate_utilization_scenario() {
    let json = json_output(oni_cmd().args([
        "simulate",
        &fixture_path("utilization_scenario"),
        "--format",
        "json",
    ]));

    let steps = json["steps"].as_array().unwrap();
    // Pool borrow before permission is granted
    assert_eq!(steps[1]["ok"], false);
    assert!(steps[1]["detail"].as_str().unwrap().contains("Unauthorized"));
    assert_eq!(steps[3]["ok"], true);

    assert_eq!(json["pool"]["utilization"], "50.00%");
    assert_eq!(json["pool"]["totalDebts"], "450");
    assert_eq!(json["pool"]["borrowRate"], "2.03%");
}

#[test]
fn test_simulate_unknown_account_fails() {
    oni_cmd()
        .args(["simulate", &fixture_path("bad_account_scenario")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown account 'mallory'"));
}

#[test]
fn test_simulate_missing_file() {
    oni_cmd()
        .args(["simulate", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read scenario"));
}
