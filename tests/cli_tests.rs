//! End-to-end tests for the apexline binary
//!
//! Each test writes a synthetic session JSON (see `utils`) and runs one
//! subcommand against it.

#![allow(deprecated)]

mod utils;

use assert_cmd::Command;
use predicates::prelude::*;

fn apexline() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("apexline")
}

#[test]
fn test_race_text_report() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .args(["race", "--drivers", "VER,HAM"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("RACE WINNER: Max Verstappen"))
        .stdout(predicate::str::contains("VER SOFTs degraded heavily (+0.10s/lap)."))
        .stdout(predicate::str::contains("VER HARDs held steady."))
        .stdout(predicate::str::contains("HAM got faster on MEDIUMs (-0.03s/lap)."))
        .stdout(predicate::str::contains("track 35.1°C"));
}

#[test]
fn test_race_json_report() {
    let session = utils::write_session(&utils::race_session());

    let output = apexline()
        .arg(session.path())
        .args(["--format", "json", "race", "--drivers", "VER,HAM"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["laps"].as_array().unwrap().len(), 40);
    assert_eq!(json["headline"]["label"], "RACE WINNER");

    let ver_stints = json["stints"][0]["stints"].as_array().unwrap();
    assert_eq!(ver_stints.len(), 2);
    assert_eq!(ver_stints[0]["compound"], "SOFT");
    assert_eq!(ver_stints[0]["end"], 10);
    assert_eq!(ver_stints[1]["start"], 11);
    assert_eq!(json["insights"].as_array().unwrap().len(), 3);
}

#[test]
fn test_race_unknown_driver_only() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .args(["race", "--drivers", "LEC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid lap data"));
}

#[test]
fn test_telemetry_fastest_laps_json() {
    let session = utils::write_session(&utils::race_session());

    let output = apexline()
        .arg(session.path())
        .args([
            "--format",
            "json",
            "telemetry",
            "--drivers",
            "VER,HAM",
            "--resolution",
            "1000",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // HAM lap 20 is the fastest lap with telemetry
    assert_eq!(json["reference"]["driver"], "HAM");
    assert_eq!(json["reference"]["lap_number"], 20);
    assert_eq!(json["track_length"], utils::TRACK_M);

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        let telemetry = &entry["frame"]["telemetry"];
        assert_eq!(telemetry["distance"].as_array().unwrap().len(), 1000);
        // 0-1 brake fractions come out as percentages
        let max_brake = telemetry["brake"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_f64())
            .fold(0.0, f64::max);
        assert!((max_brake - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_telemetry_specific_laps_parallel() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .args(["telemetry", "--lap", "VER:11", "--lap", "HAM:20", "--parallel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference: HAM lap 20"))
        .stdout(predicate::str::contains("VER (L11)"))
        .stdout(predicate::str::contains("HAM (L20)"));
}

#[test]
fn test_telemetry_requires_selection() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .arg("telemetry")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--drivers"));
}

#[test]
fn test_telemetry_rejects_bad_lap_value() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .args(["telemetry", "--lap", "VER-11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected DRIVER:LAP"));
}

#[test]
fn test_compare_fastest_laps() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .args(["compare", "VER", "HAM"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            " 1. Lap time: HAM is faster by 0.100s.",
        ))
        .stdout(predicate::str::contains("HAM carries +5 km/h minimum speed."))
        .stdout(predicate::str::contains(
            "Top speed: VER is faster by 3 km/h on the main straight.",
        ));
}

#[test]
fn test_compare_json() {
    let session = utils::write_session(&utils::race_session());

    let output = apexline()
        .arg(session.path())
        .args(["--format", "json", "compare", "VER:1", "HAM:20"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let categories: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["category"].as_str())
        .collect();
    assert_eq!(categories, vec!["lap_time", "minimum_speed", "top_speed"]);
    assert_eq!(json[1]["turn"], 1);
    assert_eq!(json[1]["favoured"], "HAM");
}

#[test]
fn test_compare_respects_config_cap() {
    let session = utils::write_session(&utils::race_session());
    let config = utils::write_text("[comparison]\nmax_insights = 1\n");

    apexline()
        .arg(session.path())
        .arg("--config")
        .arg(config.path())
        .args(["compare", "VER", "HAM"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1. Lap time:"))
        .stdout(predicate::str::contains(" 2.").not());
}

#[test]
fn test_compare_missing_lap_telemetry_fails() {
    let session = utils::write_session(&utils::race_session());

    // VER lap 5 has no telemetry and nothing else was requested
    apexline()
        .arg(session.path())
        .args(["compare", "VER:5", "LEC:5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No telemetry data"));
}

#[test]
fn test_compare_driver_without_laps() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .args(["compare", "VER", "LEC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No timed lap found for LEC"));
}

#[test]
fn test_missing_session_file() {
    apexline()
        .args(["/nonexistent/session.json", "race", "--drivers", "VER"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_malformed_session_file() {
    let session = utils::write_text("{\"drivers\": [");

    apexline()
        .arg(session.path())
        .args(["race", "--drivers", "VER"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse session JSON"));
}

#[test]
fn test_invalid_config_rejected() {
    let session = utils::write_session(&utils::race_session());
    let config = utils::write_text("[resample]\nresolution = 1\n");

    apexline()
        .arg(session.path())
        .arg("--config")
        .arg(config.path())
        .args(["race", "--drivers", "VER"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("resolution"));
}

#[test]
fn test_debug_flag_traces_to_stderr() {
    let session = utils::write_session(&utils::race_session());

    apexline()
        .arg(session.path())
        .args(["--debug", "race", "--drivers", "VER"])
        .assert()
        .success()
        .stderr(predicate::str::contains("race summary"));
}
