//! Focused CLI argument parsing tests.
//!
//! Tests that verify command-line arguments are accepted or rejected
//! before any state is touched.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmlre(project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cmlre").unwrap();
    cmd.arg("--project").arg(project.path()).arg("--no-color");
    cmd
}

// ============================================================================
// Commands That Need No State
// ============================================================================

#[test]
fn version_command_succeeds() {
    Command::cargo_bin("cmlre")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmlre"));
}

#[test]
fn version_flag_shows_version() {
    Command::cargo_bin("cmlre")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_flag_shows_usage() {
    Command::cargo_bin("cmlre")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("access control"));
}

#[test]
fn version_does_not_create_state_dir() {
    let temp = TempDir::new().unwrap();
    cmlre(&temp).arg("version").assert().success();
    assert!(!temp.path().join(".cmlre").exists());
}

// ============================================================================
// Invalid Arguments
// ============================================================================

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("cmlre")
        .unwrap()
        .arg("teleport")
        .assert()
        .failure();
}

#[test]
fn login_requires_password() {
    let temp = TempDir::new().unwrap();
    cmlre(&temp)
        .args(["login", "yash@cmlre.gov.in"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password"));
}

#[test]
fn check_requires_permission_name() {
    let temp = TempDir::new().unwrap();
    cmlre(&temp).arg("check").assert().failure();
}

#[test]
fn invalid_output_format_rejected() {
    let temp = TempDir::new().unwrap();
    cmlre(&temp)
        .args(["whoami", "--format", "yaml"])
        .assert()
        .failure();
}

#[test]
fn unknown_role_rejected() {
    let temp = TempDir::new().unwrap();
    cmlre(&temp)
        .args(["permissions", "--role", "captain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown role: 'captain'"));
}

#[test]
fn invalid_clearance_rejected() {
    let temp = TempDir::new().unwrap();
    cmlre(&temp)
        .args(["login", "aman.antil@cmlre.gov.in", "--password", "demo123"])
        .assert()
        .success();

    cmlre(&temp)
        .args(["check", "canViewData", "--clearance", "top-secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --clearance"));
}
