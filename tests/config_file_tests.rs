//! Integration tests for --config TOML files

use e2ml::config::{EvalConfig, ExactPolicy};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("e2ml.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "significance_level = 0.01\nexact_threshold = 12\nexact_policy = \"approximate\"\n",
    );

    let config = EvalConfig::from_file(&path).unwrap();
    assert_eq!(config.significance_level, 0.01);
    assert_eq!(config.exact_threshold, 12);
    assert_eq!(config.exact_policy, ExactPolicy::Approximate);
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let result = EvalConfig::from_file(dir.path().join("missing.toml"));
    assert!(result.is_err());
}

#[test]
fn test_cli_significance_level_from_config() {
    // Exact p = 1/32 is significant at 0.05 but not at 0.01
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "significance_level = 0.01\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("e2ml");
    cmd.arg("--config")
        .arg(&path)
        .args(["wilcoxon", "--sample1", "1,2,3,4,5", "--test-type", "right-tail"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("p-value:    0.031250"))
        .stdout(predicate::str::contains("retain H0 at alpha = 0.01"));
}

#[test]
fn test_cli_approximate_policy_from_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "exact_policy = \"approximate\"\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("e2ml");
    cmd.arg("--config")
        .arg(&path)
        .args(["wilcoxon", "--sample1", "1,2,3,4,5", "--test-type", "right-tail"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Statistic:  15.000000"))
        .stdout(predicate::str::contains("p-value:    0.031250").not());
}

#[test]
fn test_cli_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "significance_level = 1.5\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("e2ml");
    cmd.arg("--config")
        .arg(&path)
        .args(["t-test", "--sample", "1,2,3"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
