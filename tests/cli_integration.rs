//! Integration tests for the jit-patch command line

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const TREE: &str = r#"{
  "kind": "file",
  "children": [
    { "kind": "open", "body": "<?php\n" },
    { "kind": "comment", "body": "// __DIR__\n" },
    { "kind": "code", "body": "require __DIR__ . '/boot.src';\n" },
    { "kind": "code", "body": "echo __FILE__;\n", "processable": false }
  ]
}"#;

fn jit_patch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jit-patch"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_patch_help() {
    let output = jit_patch(&["patch", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--tree"));
    assert!(stdout.contains("--path"));
}

#[test]
fn test_patch_renders_source() {
    let dir = TempDir::new().unwrap();
    let tree = write(dir.path(), "tree.json", TREE);

    let output = jit_patch(&["patch", "--tree", &tree, "--path", "/srv/app/index.src"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<?php\n// __DIR__\nrequire '/srv/app' . '/boot.src';\necho __FILE__;\n"
    );
}

#[test]
fn test_patch_json_output() {
    let dir = TempDir::new().unwrap();
    let tree = write(dir.path(), "tree.json", TREE);

    let output = jit_patch(&["patch", "--tree", &tree, "--path", "/srv/app/index.src", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["children"][2]["body"],
        "require '/srv/app' . '/boot.src';\n"
    );
    assert_eq!(value["children"][3]["processable"], false);
}

#[test]
fn test_patch_diff_output() {
    let dir = TempDir::new().unwrap();
    let tree = write(dir.path(), "tree.json", TREE);

    let output = jit_patch(&["patch", "--tree", &tree, "--path", "/srv/app/index.src", "--diff"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-require __DIR__ . '/boot.src';"));
    assert!(stdout.contains("+require '/srv/app' . '/boot.src';"));
}

#[test]
fn test_patch_malformed_tree_fails() {
    let dir = TempDir::new().unwrap();
    let tree = write(dir.path(), "tree.json", "{\"kind\": 3}");

    let output = jit_patch(&["patch", "--tree", &tree, "--path", "/srv/a.src"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed node tree"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let tree = write(dir.path(), "tree.json", TREE);
    let config = write(dir.path(), "pipeline.toml", "patchers = []\n");

    let output = jit_patch(&["--config", &config, "patch", "--tree", &tree, "--path", "/srv/a.src"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("lists no patchers"));
}

#[test]
fn test_locate_is_identity_for_rebase() {
    let output = jit_patch(&["locate", "--class", "App\\Widget", "--file", "/srv/app/Widget.src"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "/srv/app/Widget.src");
}

#[test]
fn test_report_exit_code_follows_outcomes() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "pipeline.toml", "[reporter]\nwidth = 10\ncolors = false\n");
    let passing = write(
        dir.path(),
        "pass.json",
        r#"[{"outcome":"pass","description":"a"},{"outcome":"skip","description":"b"}]"#,
    );
    let failing = write(
        dir.path(),
        "fail.json",
        r#"[{"outcome":"fail","description":"rebases","message":"boom"}]"#,
    );

    let output = jit_patch(&["--config", &config, "report", "--input", &passing]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(".S         100%"));
    assert!(stdout.contains("Passed 1 of 1 PASS, 1 skipped"));

    let output = jit_patch(&["--config", &config, "report", "--input", &failing]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[FAILURE] rebases"));
    assert!(stdout.contains("    boom"));
}
