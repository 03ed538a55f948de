//! Runs the `elemental` binary against files in a temporary directory

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const CONTENT: &str = r#"{
    "version": "2022-01-01",
    "elements": [
        {
            "type": "channel",
            "channel": "email",
            "raw": { "subject": "Weekly digest" },
            "elements": [
                { "type": "text", "content": "Hello", "text_style": "h1" },
                { "type": "text", "elements": [
                    { "type": "string", "content": "AB", "bold": true },
                    { "type": "string", "content": "C" }
                ] },
                { "type": "divider" }
            ]
        },
        {
            "type": "channel",
            "channel": "sms",
            "elements": [{ "type": "text", "content": "Hi" }]
        }
    ]
}"#;

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("content.json"), CONTENT).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_elemental"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_to_tree_then_back_is_stable() {
    let dir = workspace();

    let output = run(dir.path(), &["to-tree", "content.json", "-o", "state.json"]);
    assert!(output.status.success());

    let state = read_json(&dir.path().join("state.json"));
    assert_eq!(state["channel"], "email");
    assert_eq!(state["document"]["type"], "doc");
    assert_eq!(state["document"]["content"][0]["type"], "heading");

    let output = run(
        dir.path(),
        &["to-elemental", "state.json", "--content", "content.json"],
    );
    let content = stdout_json(&output);
    let original: Value = serde_json::from_str(CONTENT).unwrap();
    assert_eq!(content, original);
}

#[test]
fn test_to_tree_missing_channel() {
    let dir = workspace();

    let output = run(dir.path(), &["to-tree", "content.json", "-c", "push"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no push channel"));

    let output = run(
        dir.path(),
        &["to-tree", "content.json", "-c", "push", "--bootstrap"],
    );
    let state = stdout_json(&output);
    assert_eq!(state["title"]["location"], "structured_title");
}

#[test]
fn test_config_default_channel() {
    let dir = workspace();
    fs::write(
        dir.path().join("elemental.config.json"),
        r#"{ "defaultChannel": "sms" }"#,
    )
    .unwrap();

    let state = stdout_json(&run(dir.path(), &["to-tree", "content.json"]));
    assert_eq!(state["channel"], "sms");
}

#[test]
fn test_check_passes() {
    let dir = workspace();
    let output = run(dir.path(), &["check", "content.json"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stdout)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Channels checked: 2"));
}

#[test]
fn test_check_fails_on_diagnostics_when_configured() {
    let dir = workspace();
    fs::write(
        dir.path().join("odd.json"),
        r#"{
            "version": "2022-01-01",
            "elements": [{
                "type": "channel",
                "channel": "sms",
                "elements": [{ "type": "carousel" }, { "type": "text", "content": "Hi" }]
            }]
        }"#,
    )
    .unwrap();

    assert!(run(dir.path(), &["check", "odd.json"]).status.success());
    assert!(!run(dir.path(), &["check", "odd.json", "--fail-on-diagnostics"])
        .status
        .success());
}

#[test]
fn test_defaults_for_one_channel() {
    let dir = workspace();

    let content = stdout_json(&run(dir.path(), &["defaults", "inbox"]));
    assert_eq!(content["version"], "2022-01-01");
    assert_eq!(content["elements"][0]["channel"], "inbox");

    let nodes = stdout_json(&run(dir.path(), &["defaults", "push", "--nodes"]));
    assert_eq!(nodes[0]["type"], "meta");
    assert_eq!(nodes[1]["type"], "text");
}

#[test]
fn test_remove_channel_in_place() {
    let dir = workspace();

    let output = run(dir.path(), &["remove-channel", "content.json", "sms", "--in-place"]);
    assert!(output.status.success());

    let content = read_json(&dir.path().join("content.json"));
    assert_eq!(content["elements"].as_array().unwrap().len(), 1);
    assert_eq!(content["elements"][0]["channel"], "email");

    let output = run(dir.path(), &["remove-channel", "content.json", "sms"]);
    assert!(!output.status.success());
}

#[test]
fn test_edit_applies_mutations() {
    let dir = workspace();

    let state = stdout_json(&run(dir.path(), &["to-tree", "content.json", "-c", "sms"]));
    let block_id = state["document"]["content"][0]["id"].clone();

    let mutations = json!([
        { "InsertText": { "block_id": block_id, "offset": 2, "text": " there" } },
        { "ApplyMark": { "block_id": block_id, "start": 0, "end": 2, "mark": { "type": "bold" } } }
    ]);
    fs::write(dir.path().join("mutations.json"), mutations.to_string()).unwrap();

    let content = stdout_json(&run(
        dir.path(),
        &["edit", "content.json", "-c", "sms", "-m", "mutations.json"],
    ));
    let sms = &content["elements"][1];
    assert_eq!(sms["channel"], "sms");
    assert_eq!(sms["elements"][0]["elements"][0]["content"], "Hi");
    assert_eq!(sms["elements"][0]["elements"][0]["bold"], true);
    assert_eq!(sms["elements"][0]["elements"][1]["content"], " there");

    // Other channels untouched
    assert_eq!(content["elements"][0]["raw"]["subject"], "Weekly digest");
}

#[test]
fn test_edit_reports_failing_mutation() {
    let dir = workspace();
    fs::write(
        dir.path().join("mutations.json"),
        r#"[{ "RemoveBlock": { "block_id": "ghost" } }]"#,
    )
    .unwrap();

    let output = run(dir.path(), &["edit", "content.json", "-m", "mutations.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("remove_block"));
}

#[test]
fn test_logs_go_to_stderr() {
    let dir = workspace();

    let output = Command::new(env!("CARGO_BIN_EXE_elemental"))
        .args(["to-tree", "content.json", "--channel", "sms"])
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "debug")
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Wrote editing tree"), "stderr: {}", stderr);
    assert!(stderr.contains("No config file, using defaults"), "stderr: {}", stderr);

    let tree = stdout_json(&output);
    assert_eq!(tree["channel"], "sms");
}
