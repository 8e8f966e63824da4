// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Runs the `p2f` binary against temporary workspaces.

use assert_cmd::assert::OutputAssertExt;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn p2f(home: &Path) -> Command {
    let bin = option_env!("CARGO_BIN_EXE_p2f").unwrap_or("target/debug/p2f");
    let mut cmd = Command::new(bin);
    cmd.env("P2F_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8_lossy(&output).into_owned()
}

fn stderr_of_failure(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().stderr.clone();
    String::from_utf8_lossy(&output).into_owned()
}

/// Temp dir holding `book.pdf`, plus the flags describing a ready config
fn ready_workspace() -> (TempDir, Vec<String>) {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("book.pdf");
    std::fs::write(&pdf, b"%PDF-1.7").unwrap();
    let args = vec![
        "--pdf".to_string(),
        pdf.display().to_string(),
        "--mod-id".into(),
        "my-book".into(),
        "--mod-title".into(),
        "My Book".into(),
        "--out-dir".into(),
        dir.path().join("dist").display().to_string(),
    ];
    (dir, args)
}

#[test]
fn schema_is_printed_as_json() {
    let home = TempDir::new().unwrap();
    let text = stdout_of(p2f(home.path()).arg("schema"));
    let schema: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(schema["required"], serde_json::json!(["core"]));
    assert_eq!(
        schema["properties"]["core"]["required"].as_array().map(Vec::len),
        Some(4)
    );
}

#[test]
fn schema_can_be_written_to_a_file_and_used_for_checks() {
    let home = TempDir::new().unwrap();
    let schema_path = home.path().join("schema.json");
    p2f(home.path())
        .args(["schema", "--output"])
        .arg(&schema_path)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&schema_path).unwrap().contains("\"$schema\""));

    let doc = home.path().join("doc.json");
    std::fs::write(&doc, r#"{"core": {"pdf": "a.pdf", "mod_id": "a", "mod_title": "A", "out_dir": "dist"}}"#)
        .unwrap();
    let out = stdout_of(p2f(home.path()).arg("check").arg(&doc));
    assert!(out.contains(": ok"));

    std::fs::write(&doc, r#"{"core": {"mod_id": "Not A Slug"}, "extra": 1}"#).unwrap();
    let err = stderr_of_failure(p2f(home.path()).arg("check").arg(&doc));
    assert!(err.contains("/core/mod_id"), "{err}");
}

#[test]
fn validate_reports_every_violation() {
    let home = TempDir::new().unwrap();
    let err = stderr_of_failure(p2f(home.path()).args([
        "validate",
        "--picture-descriptions",
        "on",
        "--workers",
        "0",
    ]));
    for field in [
        "core.pdf",
        "core.mod_id",
        "core.mod_title",
        "conversion.vlm_repo_id",
        "performance.workers",
    ] {
        assert!(err.contains(field), "missing {field} in:\n{err}");
    }
}

#[test]
fn validate_json_lists_codes() {
    let home = TempDir::new().unwrap();
    let output = p2f(home.path())
        .args(["validate", "--json", "--mod-id", "My Book"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let violations: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let codes: Vec<&str> = violations
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v["field"] == "core.mod_id")
        .filter_map(|v| v["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["invalid_format"]);
}

#[test]
fn command_prints_transcript_for_ready_config() {
    let home = TempDir::new().unwrap();
    let (_work, args) = ready_workspace();

    let out = stdout_of(p2f(home.path()).arg("validate").args(&args));
    assert!(out.contains("ready for conversion"));

    let transcript = stdout_of(p2f(home.path()).arg("command").args(&args));
    assert!(transcript.starts_with("pdf2foundry convert "));
    assert!(transcript.contains("--mod-id my-book --mod-title 'My Book'"));
    assert!(transcript.contains("--pack-name my-book-journals"));

    let json = stdout_of(p2f(home.path()).args(["command", "--json"]).args(&args));
    let argv: Vec<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(argv[..2], ["pdf2foundry", "convert"]);
    assert_eq!(argv.last().map(String::as_str), Some("--no-compile-pack"));
}

#[test]
fn validate_notes_worker_counts_above_the_machine_hint() {
    let home = TempDir::new().unwrap();
    let (_work, args) = ready_workspace();

    let output = p2f(home.path())
        .arg("validate")
        .args(&args)
        .args(["--workers", "1000"])
        .assert()
        .success()
        .get_output()
        .clone();
    assert!(String::from_utf8_lossy(&output.stdout).contains("ready for conversion"));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("1000 workers is above the suggested limit"), "{err}");

    let output = p2f(home.path()).arg("validate").args(&args).assert().success().get_output().clone();
    assert!(!String::from_utf8_lossy(&output.stderr).contains("suggested limit"));

    let help = stdout_of(p2f(home.path()).args(["validate", "--help"]));
    assert!(help.contains("suggested at most"), "{help}");
}

#[test]
fn command_is_refused_for_invalid_config() {
    let home = TempDir::new().unwrap();
    let (_work, mut args) = ready_workspace();
    args.extend(["--pages".to_string(), "1,,5".to_string()]);

    let output = p2f(home.path()).arg("command").args(&args).assert().failure().get_output().clone();
    assert!(output.stdout.is_empty());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("refusing to build the convert command"));
    assert!(err.contains("performance.pages"));
}

#[test]
fn preset_lifecycle() {
    let home = TempDir::new().unwrap();
    let (_work, args) = ready_workspace();

    let out = stdout_of(p2f(home.path()).args(["preset", "save", "Weekly Run"]).args(&args));
    assert!(out.contains("Saved preset 'Weekly Run'"));
    assert!(home.path().join("presets").join("weekly-run.json").is_file());

    let err = stderr_of_failure(p2f(home.path()).args(["preset", "save", "Weekly Run"]));
    assert!(err.contains("already exists"));

    assert_eq!(stdout_of(p2f(home.path()).args(["preset", "list"])), "weekly-run\n");

    let text = stdout_of(p2f(home.path()).args(["preset", "load", "weekly run"]));
    let loaded: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded["core"]["mod_id"], "my-book");

    let shown = stdout_of(p2f(home.path()).args([
        "show",
        "--preset",
        "weekly-run",
        "--tables",
        "structured",
    ]));
    let shown: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(shown["core"]["mod_title"], "My Book");
    assert_eq!(shown["conversion"]["tables"], "structured");

    stdout_of(p2f(home.path()).args(["preset", "delete", "Weekly Run"]));
    assert_eq!(stdout_of(p2f(home.path()).args(["preset", "list"])), "");
    let err = stderr_of_failure(p2f(home.path()).args(["preset", "load", "weekly-run"]));
    assert!(err.contains("not found"));
}

#[test]
fn show_reads_config_files() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("config.json");
    std::fs::write(&file, r#"{"core": {"mod_id": "from-file"}, "performance": {"workers": 2}}"#)
        .unwrap();

    let text = stdout_of(p2f(home.path()).arg("show").arg("--config").arg(&file).args(["--workers", "6"]));
    let shown: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(shown["core"]["mod_id"], "from-file");
    assert_eq!(shown["performance"]["workers"], 6);
    assert_eq!(shown["core"]["out_dir"], "dist");
}
