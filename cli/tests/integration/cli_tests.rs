//! CLI structure, help, version, and JSON error output.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `svc` isolated from the caller's environment and config files.
pub fn svc(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("svc"));
    cmd.env("NO_COLOR", "1")
        .env("SVC_CONFIG", home.path().join("absent.yaml"))
        .env_remove("SVC_COMPOSE_FILE")
        .env_remove("SVC_PROJECT")
        .env_remove("RUST_LOG")
        .current_dir(home.path());
    cmd
}

pub fn home() -> TempDir {
    TempDir::new().expect("tempdir")
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let home = home();
    svc(&home)
        .env_remove("NO_COLOR")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Profile-aware lifecycle control for a docker compose stack",
        ));
}

#[test]
fn test_cli_no_args_with_no_color_still_asks_for_a_subcommand() {
    // An env-provided flag counts as an argument, so clap reports the
    // missing subcommand instead of printing the full help.
    let home = home();
    svc(&home)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("subcommand"))
        .stderr(predicate::str::contains("services"));
}

#[test]
fn test_no_color_accepts_conventional_values() {
    let home = home();
    for value in ["1", "true", "yes", "0", ""] {
        svc(&home)
            .env("NO_COLOR", value)
            .arg("services")
            .assert()
            .success()
            .stdout(predicate::str::contains("analyzer"));
    }
}

#[test]
fn test_no_color_one_disables_ansi_output() {
    let home = home();
    svc(&home)
        .env("NO_COLOR", "1")
        .arg("services")
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_cli_help_lists_commands() {
    let home = home();
    svc(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("unpause"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let home = home();
    svc(&home).arg("launch").assert().code(2);
}

#[test]
fn test_version_flag_shows_version() {
    let home = home();
    svc(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("svc ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_version_command_shows_version() {
    let home = home();
    svc(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("svc v", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let home = home();
    let output = svc(&home)
        .args(["--json", "version"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_services_lists_registry() {
    let home = home();
    svc(&home)
        .arg("services")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyzer"))
        .stdout(predicate::str::contains("schedule"))
        .stdout(predicate::str::contains("browserless"));
}

#[test]
fn test_services_json_marks_analyzer_as_profiled() {
    let home = home();
    let output = svc(&home)
        .args(["services", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let services = v["services"].as_array().expect("array");
    assert_eq!(services.len(), 4);
    let analyzer = services
        .iter()
        .find(|s| s["name"] == "analyzer")
        .expect("analyzer listed");
    assert_eq!(analyzer["profile"], "schedule");
    assert_eq!(analyzer["default_enabled"], false);
}

#[test]
fn test_profile_error_exits_one_with_hint() {
    let home = home();
    svc(&home)
        .args(["--dry-run", "up", "analyzer"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "svc up --profile schedule analyzer",
        ));
}

#[test]
fn test_json_error_object_carries_code() {
    let home = home();
    let output = svc(&home)
        .args(["--json", "--dry-run", "up", "analyzer"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "PROFILE_INACTIVE");
}

#[test]
fn test_unknown_service_exits_one() {
    let home = home();
    svc(&home)
        .args(["--dry-run", "stop", "web"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown service 'web'"));
}

#[test]
fn test_invalid_since_fails_before_invoking() {
    let home = home();
    svc(&home)
        .args(["--dry-run", "logs", "--since", "yesterday"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid --since"));
}

#[test]
fn test_invalid_grep_pattern_fails_before_invoking() {
    let home = home();
    svc(&home)
        .args(["--dry-run", "logs", "--grep", "(unclosed"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid log pattern"));
}

#[test]
fn test_exec_requires_a_command() {
    let home = home();
    svc(&home).args(["exec", "server"]).assert().code(2);
}
