//! Pipeline configuration loaded from disk

use jit_rebase::config::{load_from_path, ConfigError, PatcherKind};
use jit_rebase::{Node, Pipeline};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn configured_pipeline_rebases() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("pipeline.toml");
    fs::write(
        &config_path,
        r#"
[[patchers]]
name = "paths"
kind = "rebase"

[reporter]
width = 60
"#,
    )
    .unwrap();

    let config = load_from_path(&config_path).unwrap();
    assert_eq!(config.patchers[0].kind, PatcherKind::Rebase);
    assert_eq!(config.reporter.width, 60);
    assert!(config.reporter.colors);

    let pipeline = Pipeline::from_config(&config);
    assert_eq!(pipeline.names().collect::<Vec<_>>(), vec!["paths"]);

    let mut tree = Node::code("include __DIR__ . '/b.src';");
    pipeline.process(&mut tree, Path::new("/srv/a.src"));
    assert_eq!(tree.body, "include '/srv' . '/b.src';");
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = load_from_path(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn invalid_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("dup.toml");
    fs::write(
        &config_path,
        "[[patchers]]\nname = \"r\"\nkind = \"rebase\"\n\n[[patchers]]\nname = \"r\"\nkind = \"rebase\"\n",
    )
    .unwrap();

    let err = load_from_path(&config_path).unwrap_err();
    match &err {
        ConfigError::Validation { path, source } => {
            assert_eq!(path.as_deref(), Some(config_path.as_path()));
            assert_eq!(source.issues.len(), 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("dup.toml"));
}

#[test]
fn malformed_toml_reports_path() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("broken.toml");
    fs::write(&config_path, "[[patchers]\n").unwrap();

    let err = load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { path: Some(_), .. }));
}
