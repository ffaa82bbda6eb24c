//! CLI integration tests.
//!
//! Runs the `sprout-build` binary. Only invocations that launch no external
//! tool are exercised for real; everything else goes through `--dry-run` or
//! targets an executable that was never built.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn sprout_build(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sprout-build"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute sprout-build")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// Usage and argument errors
// ============================================================================

#[test]
fn test_no_arguments_prints_usage() {
    let temp = TempDir::new().unwrap();
    let output = sprout_build(temp.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Usage:"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_unknown_command_exits_2() {
    let temp = TempDir::new().unwrap();
    let output = sprout_build(temp.path(), &["foo", "debug"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid command: 'foo'"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_too_many_arguments_exits_2() {
    let temp = TempDir::new().unwrap();
    let output = sprout_build(temp.path(), &["build", "debug", "extra"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn test_invalid_config_exits_1() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("sprout.toml"), "[build]\njobs = 0\n").unwrap();

    let output = sprout_build(temp.path(), &["--dry-run", "debug"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("jobs"));
}

#[test]
fn test_fatal_failure_reported_without_progress() {
    let temp = TempDir::new().unwrap();
    let output = sprout_build(temp.path(), &["--progress", "off", "run", "debug"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert_eq!(err.matches("run failed").count(), 1, "stderr: {}", err);
    assert!(err.contains("sprout_debug"));
}

#[test]
fn test_fatal_failure_reported_once_with_console_progress() {
    let temp = TempDir::new().unwrap();
    let output = sprout_build(temp.path(), &["run", "debug"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert_eq!(err.matches("run failed").count(), 1, "stderr: {}", err);
    assert!(err.contains("FAILED"));
}

// ============================================================================
// Dry run
// ============================================================================

#[test]
fn test_dry_run_prints_pipeline_commands() {
    let temp = TempDir::new().unwrap();
    let shaders = temp.path().join("sprout_editor/assets/shaders");
    fs::create_dir_all(&shaders).unwrap();
    fs::write(shaders.join("triangle.vert"), "#version 450\n").unwrap();

    let output = sprout_build(temp.path(), &["--dry-run", "--progress", "off", "-j", "3", "debug"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("glslc"));
    assert!(out.contains("triangle.vert.spv"));
    assert!(out.contains("cppcheck"));
    assert!(out.contains("premake5"));
    assert!(out.contains("sprout_debug"));
    assert!(out.contains("would copy"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_dry_run_single_command() {
    let temp = TempDir::new().unwrap();
    let output = sprout_build(temp.path(), &["--dry-run", "--progress", "off", "lint", "release"]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("cppcheck"));
    assert!(!out.contains("premake5"));
    assert!(!out.contains("sprout_release"));
}

#[test]
fn test_project_name_from_config() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("sprout.toml"), "[project]\nname = \"magnolia\"\n").unwrap();

    let output = sprout_build(temp.path(), &["--dry-run", "--progress", "off", "run", "release"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("magnolia_release"));
}

#[test]
fn test_json_progress() {
    let temp = TempDir::new().unwrap();
    let output = sprout_build(temp.path(), &["--dry-run", "--progress", "json", "clean", "debug"]);

    assert_eq!(output.status.code(), Some(0));
    let events: Vec<serde_json::Value> = stderr(&output)
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(events.len() >= 4);
    assert_eq!(events.last().unwrap()["success"], true);
}
