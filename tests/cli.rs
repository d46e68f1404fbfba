//! Integration tests for the `smart-downsample` binary.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smart-downsample"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Ten entries: five all-zero fingerprints, five all-one fingerprints
fn halves_manifest(dir: &TempDir) -> String {
    let manifest = dir.child("hashes.tsv");
    let mut text = String::from("# path\thash\n");
    for i in 0..5 {
        text.push_str(&format!("dark/IMG_{i}.jpg\t0000\n"));
    }
    for i in 0..5 {
        text.push_str(&format!("bright/IMG_{i}.jpg\tffff\n"));
    }
    manifest.write_str(&text).unwrap();
    manifest.path().to_string_lossy().into_owned()
}

#[test]
fn minimal_output_lists_one_path_per_cluster() {
    let dir = TempDir::new().unwrap();
    let manifest = halves_manifest(&dir);

    let output = run(&[
        "select", &manifest, "--target", "2", "--mode", "exact", "--output", "minimal",
    ]);

    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines.iter().filter(|l| l.starts_with("dark/")).count(), 1);
    assert_eq!(lines.iter().filter(|l| l.starts_with("bright/")).count(), 1);
}

#[test]
fn json_output_reports_stats() {
    let dir = TempDir::new().unwrap();
    let manifest = halves_manifest(&dir);

    let output = run(&[
        "select", &manifest, "-n", "4", "--mode", "rolling_window", "--window", "2",
        "--output", "json",
    ]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["selected"].as_array().unwrap().len(), 4);
    assert_eq!(json["stats"]["considered"], 10);
    assert_eq!(json["stats"]["excluded"], 6);
    assert_eq!(json["stats"]["mode"]["window_size"], 2);
}

#[test]
fn same_seed_gives_same_output() {
    let dir = TempDir::new().unwrap();
    let manifest = halves_manifest(&dir);
    let args: [&str; 8] = [
        "select", &manifest, "-n", "3", "--seed", "7", "--output", "minimal",
    ];

    assert_eq!(stdout(&run(&args)), stdout(&run(&args)));
}

#[test]
fn unknown_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    let manifest = halves_manifest(&dir);

    let output = run(&["select", &manifest, "-n", "2", "--mode", "fastest"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("fastest").eval(&stderr));
}

#[test]
fn zero_target_is_rejected_before_reading_manifest() {
    let output = run(&["select", "/nonexistent/hashes.tsv", "-n", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("InvalidTargetCount").eval(&stderr));
}

#[test]
fn invalid_entries_are_skipped() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.child("hashes.tsv");
    manifest
        .write_str("good_1.jpg\t00ff\nbad.jpg\txyz\ngood_2.jpg\tff00\n")
        .unwrap();

    let output = run(&[
        "select",
        &manifest.path().to_string_lossy(),
        "-n",
        "5",
        "--output",
        "json",
    ]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["selected"], serde_json::json!(["good_1.jpg", "good_2.jpg"]));
    assert_eq!(json["skipped"].as_array().unwrap().len(), 1);
    assert_eq!(json["stats"]["shortfall"], 3);
}

#[test]
fn bucketed_output_includes_bucket_stats() {
    let dir = TempDir::new().unwrap();
    let manifest = halves_manifest(&dir);

    let output = run(&[
        "select", &manifest, "-n", "4", "--bucket-bits", "1", "--output", "json",
    ]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let buckets = json["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["kept"], 2);
    assert_eq!(buckets[1]["kept"], 2);
}

#[test]
fn pretty_output_prints_summary_and_paths() {
    let dir = TempDir::new().unwrap();
    let manifest = halves_manifest(&dir);

    let output = run(&["select", &manifest, "-n", "2", "--mode", "exact"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("images selected").eval(&stderr));
    assert_eq!(stdout(&output).lines().count(), 2);
}
