//! Argument parsing, configuration and the checks that run before any API call.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Closed local port; a request sent here fails fast.
const NO_API: &str = "http://127.0.0.1:9";

/// `jiffyi` with a hermetic environment and the given config file content.
fn jiffyi(config: &str) -> (Command, TempDir) {
    let home = TempDir::new().expect("temp home");
    let config_path: PathBuf = home.path().join(".jiffyirc");
    std::fs::write(&config_path, config).expect("write config");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jiffyi"));
    cmd.env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env("JIFFY_CONFIG", &config_path)
        .env("JIFFY_SELECTED", home.path().join("selected"))
        .env_remove("JIFFY_APITOKEN")
        .env_remove("JIFFY_API_URL")
        .env_remove("JIFFY_LOG")
        .env_remove("CI")
        .env_remove("JIFFY_YES");
    (cmd, home)
}

const PROTECTING_42: &str = "default:\n  apitoken: secret-token\n  protected_ids: [42]\n";

// --- Help and version ---

#[test]
fn no_args_shows_help_and_exits_two() {
    let (mut cmd, _home) = jiffyi("");
    cmd.assert().code(2).stderr(predicate::str::contains(
        "Create, provision and tear down JiffyBox cloud servers",
    ));
}

#[test]
fn help_lists_every_action() {
    let (mut cmd, _home) = jiffyi("");
    let mut assert = cmd.arg("--help").assert().success();
    for action in [
        "list", "show", "create", "start", "stop", "freeze", "thaw", "delete", "select",
        "install", "teardown",
    ] {
        assert = assert.stdout(predicate::str::contains(action));
    }
}

#[test]
fn version_flag_names_the_binary() {
    let (mut cmd, _home) = jiffyi("");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jiffyi"));
}

#[test]
fn no_color_accepts_conventional_values() {
    for value in ["1", "true", "yes", "0", ""] {
        let (mut cmd, _home) = jiffyi("");
        cmd.env("NO_COLOR", value).arg("--help").assert().success();
    }
}

// --- Argument validation ---

#[test]
fn non_numeric_id_is_a_usage_error() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["show", "-i", "web1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ID must be numeric!"));
}

#[test]
fn actions_need_exactly_one_target() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["delete"]).assert().code(2);

    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["delete", "-i", "7", "-f"]).assert().code(2);
}

#[test]
fn stop_only_accepts_now() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["stop", "-i", "7", "later"]).assert().code(2);
}

#[test]
fn create_without_plan_or_distribution_fails_before_calling_the_api() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["--api-url", NO_API, "create", "-n", "web1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("plan (-p)"))
        .stderr(predicate::str::contains("distribution (-d)"))
        .stderr(predicate::str::contains("cannot reach").not());
}

// --- Configuration ---

#[test]
fn missing_token_is_reported() {
    let (mut cmd, _home) = jiffyi("");
    cmd.args(["--api-url", NO_API, "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no API token"));
}

#[test]
fn unknown_profile_is_reported() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["--profile", "prod", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("profile 'prod' not found"));
}

#[test]
fn token_from_environment_is_used_and_never_printed() {
    let (mut cmd, _home) = jiffyi("");
    cmd.env("JIFFY_APITOKEN", "env-token")
        .args(["--api-url", NO_API, "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot reach the JiffyBox API"))
        .stderr(predicate::str::contains("env-token").not());
}

// --- Protected ids ---

#[test]
fn protected_box_cannot_be_deleted() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["--api-url", NO_API, "delete", "-i", "42"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JiffyBox 42 is protected. Aborting"));
}

#[test]
fn protected_box_cannot_be_torn_down() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    cmd.args(["--api-url", NO_API, "teardown", "-i", "42", "now"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JiffyBox 42 is protected. Aborting"));
}

#[test]
fn protected_box_cannot_be_stopped_or_frozen() {
    for action in ["stop", "freeze", "start"] {
        let (mut cmd, _home) = jiffyi(PROTECTING_42);
        cmd.args(["--api-url", NO_API, action, "-i", "42"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("is protected"));
    }
}

#[test]
fn json_mode_prints_an_error_object() {
    let (mut cmd, _home) = jiffyi(PROTECTING_42);
    let output = cmd
        .args(["--json", "--api-url", NO_API, "delete", "-i", "42"])
        .output()
        .expect("run jiffyi");

    assert_eq!(output.status.code(), Some(1));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(doc["error"], true);
    assert_eq!(doc["code"], "protected-resource");
    assert_eq!(doc["message"], "JiffyBox 42 is protected. Aborting");
}
