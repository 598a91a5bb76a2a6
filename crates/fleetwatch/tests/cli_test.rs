#![allow(clippy::unwrap_used)]
// End-to-end tests for the fleetwatch binary.
//
// Each test runs with a scrubbed environment and a throwaway HOME so the
// real config file and token stores are never touched.

use assert_cmd::Command;
use predicates::prelude::*;

fn fleetwatch(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fleetwatch").unwrap();
    cmd.env_clear()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("XDG_DATA_HOME", home.path().join(".local/share"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("agents"))
        .stdout(predicate::str::contains("reports"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn version_flag() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_server_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch(&home)
        .args(["agents", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("server"));
}

#[test]
fn unauthenticated_command_exits_with_auth_code() {
    let home = tempfile::tempdir().unwrap();
    // Port 1 is never reachable, but the command must fail on the missing
    // session before any connection attempt.
    fleetwatch(&home)
        .args(["agents", "list", "--server", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn unreachable_server_exits_with_connection_code() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch(&home)
        .args([
            "login",
            "--username",
            "admin",
            "--password",
            "test-password",
            "--server",
            "http://127.0.0.1:1",
        ])
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("Could not reach"));
}

#[test]
fn scan_requires_target() {
    let home = tempfile::tempdir().unwrap();
    fleetwatch(&home)
        .args(["scan", "--server", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn config_file_supplies_server() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config/fleetwatch");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "server = \"http://127.0.0.1:1\"\n",
    )
    .unwrap();

    // Server resolves from the file, so the failure is the missing session
    // rather than missing configuration.
    fleetwatch(&home)
        .args(["agents", "list"])
        .assert()
        .failure()
        .code(3);
}
