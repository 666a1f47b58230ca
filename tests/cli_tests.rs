//! Command-line surface tests for the `interval-timer` binary.
//!
//! Only flags that exit before the event loop starts are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;

fn interval_timer() -> Command {
    Command::cargo_bin("interval-timer").unwrap()
}

#[test]
fn test_help_lists_options() {
    interval_timer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_version() {
    interval_timer()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_argument_fails() {
    interval_timer()
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_empty_config_path_fails() {
    interval_timer()
        .args(["--config", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("設定ファイルのパス"));
}
