//! End-to-end CLI tests for the tubewatch binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test that `--help` shows the description and the config argument.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Download YouTube videos as soon as their links are copied",
        ))
        .stdout(predicate::str::contains("[CONFIG]"));
}

/// Test that `--help` documents process exit codes.
#[test]
fn test_binary_help_displays_exit_codes() {
    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"));
}

/// Test that `--help` names yt-dlp as the only supported download tool.
#[test]
fn test_binary_help_names_required_download_tool() {
    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("youtube-dl is not supported"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tubewatch"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ==================== Startup preconditions ====================

/// Without yt-dlp on PATH the process exits with code 1.
#[cfg(unix)]
#[test]
fn test_binary_missing_download_tool_exits_with_one() {
    let temp = TempDir::new().unwrap();
    let download_dir = temp.path().join("videos");
    let config_path = temp.path().join("config.json");
    let config = serde_json::json!({
        "download_path": download_dir,
        "enable_notifications": false,
    });
    std::fs::write(&config_path, config.to_string()).unwrap();

    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg(&config_path)
        .env("PATH", "")
        .env_remove("RUST_LOG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("yt-dlp"));

    assert!(download_dir.is_dir(), "download directory is created first");
    let logs: Vec<_> = std::fs::read_dir(download_dir.join("logs"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].starts_with("tubewatch_") && logs[0].ends_with(".log"));
}

/// A missing config file is written with defaults before anything else.
#[cfg(unix)]
#[test]
fn test_binary_creates_default_config_when_missing() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.json");

    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg(&config_path)
        .env("HOME", temp.path())
        .env("PATH", "")
        .env_remove("RUST_LOG")
        .assert()
        .code(1);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(written["enable_notifications"], true);
    assert_eq!(written["check_interval"], 1.0);
    assert_eq!(written["merge_output_format"], "mp4");
    assert!(temp.path().join("Downloads").join("YouTube").is_dir());
}

/// A malformed config file is left untouched and defaults are used.
#[cfg(unix)]
#[test]
fn test_binary_malformed_config_is_reported_not_overwritten() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.json");
    std::fs::write(&config_path, "{ broken").unwrap();

    let mut cmd = Command::cargo_bin("tubewatch").unwrap();
    cmd.arg(&config_path)
        .env("HOME", temp.path())
        .env("PATH", "")
        .env_remove("RUST_LOG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error loading config"));

    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "{ broken");
}
