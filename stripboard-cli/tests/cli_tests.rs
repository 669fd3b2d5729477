//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the stripboard-cli binary (finds it in target/debug when run via cargo test).
fn stripboard_cli() -> Command {
    cargo_bin_cmd!("stripboard-cli")
}

/// Path to stripboard library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("stripboard")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = stripboard_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Fritzing"));
}

#[test]
fn test_cli_version() {
    let mut cmd = stripboard_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_build_archive() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("simple.fzpz");
    let mut cmd = stripboard_cli();

    cmd.arg("build")
        .arg(fixtures_dir().join("simple_run.yaml"))
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("part.simple-run.fzp"))
        .stdout(predicate::str::contains("svg.breadboard.simple-run.svg"));
    assert!(output.exists());
}

#[test]
fn test_cli_build_dir() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("loose");
    let mut cmd = stripboard_cli();

    cmd.arg("build")
        .arg(fixtures_dir().join("simple_run.yaml"))
        .arg(&output)
        .arg("--dir");

    cmd.assert().success();

    let fzp = std::fs::read_to_string(output.join("part.simple-run.fzp")).unwrap();
    assert!(fzp.contains(r#"<module moduleId="simple-run">"#));
    let svg = std::fs::read_to_string(output.join("svg.breadboard.simple-run.svg")).unwrap();
    assert!(svg.contains(r#"<circle id="r1-0""#));
}

#[test]
fn test_cli_build_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("full.fzpz");
    let mut cmd = stripboard_cli();

    cmd.arg("build")
        .arg(fixtures_dir().join("full_board.yaml"))
        .arg(&output)
        .arg("--format")
        .arg("json");

    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["board"], "full-board");
    assert_eq!(report["stats"]["connectors"], 192);
    assert_eq!(report["stats"]["buses"], 14);
}

#[test]
fn test_cli_inspect_human() {
    let mut cmd = stripboard_cli();

    cmd.arg("inspect").arg(fixtures_dir().join("full_board.yaml"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gnd (33 members)"))
        .stdout(predicate::str::contains("exactly one bus"));
}

#[test]
fn test_cli_inspect_json() {
    let mut cmd = stripboard_cli();

    cmd.arg("inspect")
        .arg(fixtures_dir().join("simple_run.yaml"))
        .arg("-f")
        .arg("json");

    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(report["consistent"], true);
    assert_eq!(report["buses"][0]["id"], "r1");
    assert_eq!(report["buses"][0]["members"][2], "r1-2");
}

#[test]
fn test_cli_cell() {
    let mut cmd = stripboard_cli();

    cmd.arg("cell")
        .arg("C0")
        .arg("AA3")
        .arg("--pitch")
        .arg("2")
        .arg("--origin")
        .arg("10,0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("C0\tcol=2 row=0\tx=15 y=1"))
        .stdout(predicate::str::contains("AA3\tcol=0 row=3\tx=11 y=7"));
}

#[test]
fn test_cli_cell_malformed() {
    let mut cmd = stripboard_cli();

    cmd.arg("cell").arg("a0");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_nonexistent_file() {
    let mut cmd = stripboard_cli();

    cmd.arg("inspect").arg("/nonexistent/board.yaml");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_diagonal_run_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("diag.fzpz");
    let mut cmd = stripboard_cli();

    cmd.arg("build")
        .arg(fixtures_dir().join("diagonal_run.yaml"))
        .arg(&output);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("crooked"));
    assert!(!output.exists());
}

#[test]
fn test_cli_unknown_component_fails() {
    let mut cmd = stripboard_cli();

    cmd.arg("inspect")
        .arg(fixtures_dir().join("unknown_component.yaml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("jumper"));
}

#[test]
fn test_cli_cell_rejects_bad_pitch() {
    for pitch in ["NaN", "0", "-2.54", "inf"] {
        let mut cmd = stripboard_cli();

        cmd.arg("cell").arg("A0").arg(format!("--pitch={}", pitch));

        cmd.assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("pitch must be positive"));
    }
}

#[test]
fn test_cli_colliding_ids_fail_build() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("collide.fzpz");
    let mut cmd = stripboard_cli();

    cmd.arg("build")
        .arg(fixtures_dir().join("colliding_ids.yaml"))
        .arg(&output);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"s-0\""));
    assert!(!output.exists());
}
