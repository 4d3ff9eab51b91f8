//! End-to-end configuration builds
//!
//! Schema defaults, document files, overrides, derived fields, freeze and
//! snapshot, driven through the public API.

use chrono::NaiveDate;
use flagtree::{
    build_config, default_schema, parse_document, BuildOptions, ConfigError, DocumentFormat,
    DraftConfig, FixedClock, TypedValue,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 7, 0)
            .unwrap(),
    )
}

fn tokens(s: &str) -> Vec<String> {
    s.split_whitespace().map(|t| t.to_string()).collect()
}

// =============================================================================
// Full build
// =============================================================================

#[test]
fn test_yaml_document_overrides_and_snapshot() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("m40.yaml");
    fs::write(
        &config,
        "SOLVER:\n  gpu: [0, 1]\n  alias: Res_Time\n  lr: 0.05\nLOSS:\n  num_class: 10\n",
    )
    .unwrap();

    let base = temp.path().join("logs").to_string_lossy().to_string();
    let mut overrides = vec!["SOLVER.logdir".to_string(), base.clone()];
    overrides.extend(tokens("LOSS.num_class 40 SOLVER.lr=0.2 DATA.train.distort=True"));

    let options = BuildOptions {
        config: Some(config),
        overrides: overrides.clone(),
        invocation: overrides,
        ..BuildOptions::default()
    };
    let outcome = build_config(default_schema().unwrap(), &options, &clock()).unwrap();
    let frozen = &outcome.config;

    assert_eq!(frozen.int_tuple("SOLVER.gpu").unwrap(), &[0, 1]);
    assert_eq!(frozen.int("LOSS.num_class").unwrap(), 40);
    assert_eq!(frozen.float("SOLVER.lr").unwrap(), 0.2);
    assert!(frozen.bool("DATA.train.distort").unwrap());
    assert!(!frozen.bool("DATA.test.distort").unwrap());

    let logdir = format!("{}_res_03150907", base);
    assert_eq!(frozen.str("SOLVER.logdir").unwrap(), logdir);

    let snapshot = outcome.snapshot.unwrap();
    assert_eq!(snapshot.dir, PathBuf::from(&logdir));
    assert!(snapshot.dir.join("m40.yaml").exists());

    let dump = fs::read_to_string(&snapshot.dump_path).unwrap();
    let value = parse_document(&dump, DocumentFormat::Toml).unwrap();
    assert_eq!(value["LOSS"]["num_class"], 40);
    assert_eq!(value["SOLVER"]["logdir"], logdir.as_str());
}

#[test]
fn test_no_backup_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("logs").to_string_lossy().to_string();
    let options = BuildOptions {
        overrides: vec![format!("SOLVER.logdir={}", base)],
        backup: false,
        ..BuildOptions::default()
    };
    let outcome = build_config(default_schema().unwrap(), &options, &clock()).unwrap();

    assert!(outcome.snapshot.is_none());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

// =============================================================================
// Closed world and fail-fast
// =============================================================================

#[test]
fn test_override_errors_carry_codes() {
    let cases = [
        ("SOLVER.epochs 3", "UNKNOWN_PATH"),
        ("SOLVER 3", "UNKNOWN_PATH"),
        ("SOLVER.max_epoch abc", "COERCION_ERROR"),
        ("SOLVER.gpu 0.5", "COERCION_ERROR"),
        ("SOLVER.lr", "MISSING_OVERRIDE_VALUE"),
    ];
    for (line, code) in cases {
        let options = BuildOptions {
            overrides: tokens(line),
            backup: false,
            ..BuildOptions::default()
        };
        let err = build_config(default_schema().unwrap(), &options, &clock()).unwrap_err();
        assert_eq!(err.code(), code, "override {:?}", line);
    }
}

#[test]
fn test_document_kind_mismatch_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("bad.json");
    fs::write(&config, r#"{"SOLVER": {"max_epoch": 1.5}}"#).unwrap();

    let options = BuildOptions {
        config: Some(config),
        backup: false,
        ..BuildOptions::default()
    };
    let err = build_config(default_schema().unwrap(), &options, &clock()).unwrap_err();
    match err {
        ConfigError::KindMismatch { path, .. } => assert_eq!(path, "SOLVER.max_epoch"),
        other => panic!("expected KindMismatch, got {:?}", other),
    }
}

#[test]
fn test_last_override_wins() {
    let options = BuildOptions {
        overrides: tokens("SOLVER.max_epoch 1 SOLVER.max_epoch=2 SOLVER.max_epoch 3"),
        backup: false,
        ..BuildOptions::default()
    };
    let outcome = build_config(default_schema().unwrap(), &options, &clock()).unwrap();
    assert_eq!(outcome.config.int("SOLVER.max_epoch").unwrap(), 3);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_frozen_copy_is_independent() {
    let frozen = DraftConfig::new(default_schema().unwrap()).freeze();

    let mut draft = frozen.to_draft();
    draft.set("DATA.test.batch_size", TypedValue::Int(1)).unwrap();
    draft.apply_overrides(&["DATA.train.batch_size=2"]).unwrap();

    assert_eq!(frozen.int("DATA.test.batch_size").unwrap(), 32);
    assert_eq!(frozen.int("DATA.train.batch_size").unwrap(), 32);
    assert_eq!(draft.root().int("DATA.train.batch_size").unwrap(), 2);
}

#[test]
fn test_frozen_tree_rejects_writes() {
    let frozen = DraftConfig::new(default_schema().unwrap()).freeze();
    let mut root = frozen.root().clone();
    assert!(!root.is_frozen());

    root.freeze();
    let err = root.set_leaf("SOLVER.lr", TypedValue::Float(0.5)).unwrap_err();
    assert_eq!(err.code(), "FROZEN_TREE");
}
