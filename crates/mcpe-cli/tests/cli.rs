#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn mcpetool() -> Command {
    Command::new(cargo_bin("mcpetool"))
}

fn world() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("w")).unwrap();
    temp
}

#[test]
fn put_get_keys_delete() {
    let temp = world();
    let w = temp.path().join("w");

    mcpetool()
        .arg("put")
        .arg(&w)
        .arg("0a0b")
        .write_stdin("aGVsbG8=\n")
        .assert()
        .success();

    mcpetool()
        .arg("get")
        .arg(&w)
        .arg("0a0b")
        .assert()
        .success()
        .stdout("aGVsbG8=\n");

    mcpetool()
        .args(["get", "--dump"])
        .arg(&w)
        .arg("0a0b")
        .assert()
        .success()
        .stdout(predicate::str::contains("|hello|"));

    mcpetool()
        .arg("keys")
        .arg(&w)
        .assert()
        .success()
        .stdout("0a0b\n");

    mcpetool().arg("delete").arg(&w).arg("0a0b").assert().success();

    mcpetool()
        .arg("get")
        .arg(&w)
        .arg("0a0b")
        .assert()
        .failure()
        .stderr(predicate::str::contains("key not found"));

    mcpetool().arg("keys").arg(&w).assert().success().stdout("");
}

#[test]
fn malformed_key_fails_without_touching_world() {
    let temp = world();
    let w = temp.path().join("w");

    mcpetool()
        .arg("put")
        .arg(&w)
        .arg("not-hex")
        .write_stdin("aGk=")
        .assert()
        .failure()
        .stderr(predicate::str::contains("decoding key"));

    assert!(!w.join("db").exists());
}

#[test]
fn missing_world_fails() {
    let temp = TempDir::new().unwrap();
    mcpetool()
        .arg("keys")
        .arg(temp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("opening world"));
}

#[test]
fn develop_prints_store_path() {
    let temp = world();
    let w = temp.path().join("w");
    mcpetool()
        .arg("dev")
        .arg(&w)
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keys: 0"));
}
