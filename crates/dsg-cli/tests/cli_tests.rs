//! End-to-end tests for the `dsg` binary.
//!
//! Interactive runs need a terminal, so these cover everything that happens
//! before and around the first prompt.

use std::fs;
use std::time::Duration;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn dsg(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("dsg");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn help_describes_the_generator() {
    let dir = TempDir::new().unwrap();
    dsg(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Django Starter Generator"))
        .stdout(predicate::str::contains("DSG_WORKSPACE__ROOT"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    dsg(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_argument_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    dsg(&dir).arg("--name").arg("shop").assert().code(2);
}

#[test]
fn quiet_conflicts_with_verbose() {
    let dir = TempDir::new().unwrap();
    dsg(&dir).args(["-q", "-v"]).assert().code(2);
}

#[test]
fn no_color_accepts_the_usual_values() {
    let dir = TempDir::new().unwrap();
    for value in ["1", "true", "yes", "", "0"] {
        dsg(&dir)
            .env("NO_COLOR", value)
            .args(["--config", "absent.toml"])
            .assert()
            .code(4)
            .stderr(predicate::str::contains("Configuration error"))
            .stderr(predicate::str::contains("invalid value").not());
    }
}

#[test]
fn no_color_flag_and_variable_together() {
    let dir = TempDir::new().unwrap();
    dsg(&dir)
        .env("NO_COLOR", "1")
        .args(["--no-color", "--config", "absent.toml"])
        .assert()
        .code(4);
}

#[test]
fn missing_config_file_exits_with_configuration_code() {
    let dir = TempDir::new().unwrap();
    dsg(&dir)
        .args(["--config", "absent.toml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn invalid_config_value_exits_with_configuration_code() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("dsg.toml"),
        "[workspace]\nscript_flavor = \"fish\"\n",
    )
    .unwrap();

    dsg(&dir).args(["--config", "dsg.toml"]).assert().code(4);
}

#[test]
fn missing_archive_is_reported_before_any_prompt() {
    let dir = TempDir::new().unwrap();
    dsg(&dir)
        .arg("--quiet")
        .env("DSG_WORKSPACE__ARCHIVE", "nowhere.tar.gz")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nowhere.tar.gz"))
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn non_interactive_run_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let tool = dir.path().join("tool");
    fs::create_dir(&tool).unwrap();
    fs::write(tool.join("sources.tar.gz"), b"").unwrap();

    dsg(&dir)
        .current_dir(&tool)
        .arg("--quiet")
        .write_stdin("shop\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a terminal"));

    assert!(!dir.path().join("src").exists());
}
