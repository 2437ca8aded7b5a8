//! CLI tests for rustible-molecule
//!
//! This test suite runs the binary with assert_cmd and covers:
//! - Argument parsing and help output
//! - The prepare pipeline end to end
//! - Printing the inventory, config and environment
//! - Exit codes and diagnostics on failure

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const SCENARIO: &str = r#"
platforms:
  - name: instance-1
    groups: [foo]
provisioner:
  name: ansible
  env:
    FOO: bar
"#;

// Helper to get a command for testing
fn molecule_cmd() -> Command {
    let mut cmd = Command::cargo_bin("rustible-molecule").unwrap();
    cmd.env_remove("MOLECULE_FILE")
        .env_remove("MOLECULE_EPHEMERAL_DIRECTORY")
        .env_remove("RUST_LOG");
    cmd
}

// Helper to create a scenario file
fn create_scenario(content: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("molecule.yml"), content).unwrap();
    dir
}

fn scenario_args(dir: &Path) -> Vec<String> {
    vec![
        "-c".to_string(),
        dir.join("molecule.yml").display().to_string(),
        "--ephemeral-directory".to_string(),
        dir.join("eph").display().to_string(),
    ]
}

// ============================================================================
// Help and Parsing Tests
// ============================================================================

#[test]
fn test_help() {
    molecule_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("--config-option"));
}

#[test]
fn test_missing_subcommand_fails() {
    molecule_cmd().assert().failure();
}

// ============================================================================
// Subcommand Tests
// ============================================================================

#[test]
fn test_prepare_writes_artifacts() {
    let dir = create_scenario(SCENARIO);

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .arg("prepare")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prepared scenario"));

    assert!(dir.path().join("eph").join("ansible.cfg").is_file());
    assert!(dir.path().join("eph").join("ansible_inventory.yml").is_file());
}

#[test]
fn test_inventory_prints_yaml() {
    let dir = create_scenario(SCENARIO);

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .arg("inventory")
        .assert()
        .success()
        .stdout(predicate::str::contains("instance-1-default"))
        .stdout(predicate::str::contains("ansible_connection: docker"));
}

#[test]
fn test_config_applies_overrides() {
    let dir = create_scenario(SCENARIO);

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .args(["--config-option", "defaults.forks=42", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"))
        .stdout(predicate::str::contains("forks = 42"));
}

#[test]
fn test_env_prints_bindings() {
    let dir = create_scenario(SCENARIO);
    let expected = format!(
        "ANSIBLE_CONFIG={}",
        dir.path().join("eph").join("ansible.cfg").display()
    );

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected))
        .stdout(predicate::str::contains("FOO=bar"));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_missing_instances_exit_code() {
    let dir = create_scenario("platforms: []\n");

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .arg("prepare")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Instances missing from the platform section of the scenario configuration.",
        ));

    assert!(!dir.path().join("eph").exists());
}

#[test]
fn test_verify_missing_instances() {
    let dir = create_scenario("platforms: []\n");

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .arg("verify")
        .assert()
        .code(1);
}

#[test]
fn test_missing_scenario_file() {
    let dir = tempdir().unwrap();

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .arg("prepare")
        .assert()
        .code(74)
        .stderr(predicate::str::contains("failed to load scenario"));
}

#[test]
fn test_malformed_config_option() {
    let dir = create_scenario(SCENARIO);

    molecule_cmd()
        .args(scenario_args(dir.path()))
        .args(["--config-option", "forks", "config"])
        .assert()
        .code(2);
}
