//! Binary surface smoke tests.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_relay() {
    Command::cargo_bin("shopdesk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Merchant customer-service relay console",
        ))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn missing_config_file_is_a_startup_error() {
    Command::cargo_bin("shopdesk")
        .unwrap()
        .args(["--config", "/nonexistent/shopdesk.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn invalid_config_values_are_reported_by_name() {
    let mut file = tempfile::NamedTempFile::new().expect("temp config");
    writeln!(file, "[platform]\nping_interval_secs = 0").expect("write temp config");

    Command::cargo_bin("shopdesk")
        .unwrap()
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ping_interval_secs"));
}
