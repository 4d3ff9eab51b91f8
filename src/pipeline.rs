//! Configuration build pipeline
//!
//! Layers, in precedence order:
//! 1. Schema defaults
//! 2. Document file (`--config`)
//! 3. Command-line overrides
//!
//! followed by the derived-field pass, the freeze and an optional snapshot.
//! The outcome carries the provenance of every contributing layer.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::derived::{Clock, DerivedFields};
use crate::error::{ConfigError, Result};
use crate::lifecycle::{DraftConfig, FrozenConfig};
use crate::snapshot::{SnapshotReport, SnapshotWriter};
use crate::tree::ConfigNode;

/// Origin of a configuration layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Schema,
    File,
    Overrides,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (document layer only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of the raw file bytes (document layer only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Leaves written by this layer
    pub leaves: usize,
}

/// Inputs of one configuration build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Document merged over the schema defaults.
    pub config: Option<PathBuf>,
    /// Override tokens, `PATH VALUE` pairs or `PATH=VALUE`.
    pub overrides: Vec<String>,
    /// Full process invocation, recorded in the commands leaf.
    pub invocation: Vec<String>,
    /// Write a snapshot into the resolved log directory.
    pub backup: bool,
    pub derived: DerivedFields,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            config: None,
            overrides: Vec::new(),
            invocation: Vec::new(),
            backup: true,
            derived: DerivedFields::default(),
        }
    }
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildOutcome {
    pub config: FrozenConfig,
    /// Build time read from the injected clock
    pub created_at: NaiveDateTime,
    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
    pub snapshot: Option<SnapshotReport>,
    /// Snapshot failure. The configuration is still usable.
    pub snapshot_error: Option<ConfigError>,
}

/// Build the frozen configuration for one process.
///
/// Fails fast on the first merge error. A snapshot failure does not fail
/// the build; it is logged and reported in the outcome.
pub fn build_config(
    schema: ConfigNode,
    options: &BuildOptions,
    clock: &dyn Clock,
) -> Result<BuildOutcome> {
    let mut sources = Vec::new();
    let mut draft = DraftConfig::new(schema);

    sources.push(ConfigSource {
        origin: ConfigOrigin::Schema,
        path: None,
        digest: None,
        leaves: draft.root().leaves().count(),
    });

    if let Some(document) = draft.merge_file(options.config.as_deref())? {
        sources.push(ConfigSource {
            origin: ConfigOrigin::File,
            path: Some(document.path.to_string_lossy().to_string()),
            digest: Some(document.digest.clone()),
            leaves: count_document_leaves(&document.value),
        });
    }

    if !options.overrides.is_empty() {
        let applied = draft.apply_overrides(&options.overrides)?;
        sources.push(ConfigSource {
            origin: ConfigOrigin::Overrides,
            path: None,
            digest: None,
            leaves: applied,
        });
    }

    let logdir = draft.resolve_derived(&options.derived, &options.invocation, clock)?;
    let config = draft.freeze();

    let (snapshot, snapshot_error) = if options.backup {
        match SnapshotWriter::new(&logdir).write(&config, options.config.as_deref()) {
            Ok(report) => (Some(report), None),
            Err(e) => {
                warn!(
                    event = "config.snapshot_failed",
                    dir = %logdir,
                    error = %e
                );
                (None, Some(e))
            }
        }
    } else {
        (None, None)
    };

    info!(
        event = "config.build_completed",
        logdir = %logdir,
        sources = sources.len(),
        snapshot = snapshot.is_some()
    );

    Ok(BuildOutcome {
        config,
        created_at: clock.now(),
        sources,
        snapshot,
        snapshot_error,
    })
}

fn count_document_leaves(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Object(map) => map.values().map(count_document_leaves).sum(),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::{Clock, FixedClock};
    use crate::schema::default_schema;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 7, 0)
                .unwrap(),
        )
    }

    fn options_in(temp: &TempDir) -> BuildOptions {
        let logdir = temp.path().join("logs");
        BuildOptions {
            overrides: vec![
                "SOLVER.logdir".to_string(),
                logdir.to_string_lossy().to_string(),
            ],
            invocation: vec!["train".to_string(), "--config".to_string()],
            ..BuildOptions::default()
        }
    }

    #[test]
    fn test_defaults_only_without_backup() {
        let options = BuildOptions {
            backup: false,
            ..BuildOptions::default()
        };
        let outcome = build_config(default_schema().unwrap(), &options, &clock()).unwrap();

        assert!(outcome.config.is_frozen());
        assert_eq!(outcome.created_at, clock().now());
        assert_eq!(outcome.sources.len(), 1);
        assert_eq!(outcome.sources[0].origin, ConfigOrigin::Schema);
        assert_eq!(outcome.config.str("SOLVER.logdir").unwrap(), "logs_03150907");
        assert!(outcome.snapshot.is_none());
        assert!(outcome.snapshot_error.is_none());
    }

    #[test]
    fn test_file_then_overrides_with_snapshot() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("run.toml");
        fs::write(
            &config,
            "[SOLVER]\nmax_epoch = 10\nlr = 1\n\n[DATA.train]\nbatch_size = 8\n",
        )
        .unwrap();

        let mut options = options_in(&temp);
        options.config = Some(config.clone());
        options.overrides.extend(["SOLVER.max_epoch=20".to_string()]);

        let outcome = build_config(default_schema().unwrap(), &options, &clock()).unwrap();
        let frozen = &outcome.config;

        assert_eq!(frozen.int("SOLVER.max_epoch").unwrap(), 20);
        assert_eq!(frozen.float("SOLVER.lr").unwrap(), 1.0);
        assert_eq!(frozen.int("DATA.train.batch_size").unwrap(), 8);
        assert_eq!(frozen.int("DATA.test.batch_size").unwrap(), 32);
        assert_eq!(frozen.str("SYS.cmds").unwrap(), "train --config");

        let origins: Vec<_> = outcome.sources.iter().map(|s| s.origin).collect();
        assert_eq!(
            origins,
            vec![ConfigOrigin::Schema, ConfigOrigin::File, ConfigOrigin::Overrides]
        );
        assert_eq!(outcome.sources[1].leaves, 3);
        assert_eq!(outcome.sources[1].digest.as_ref().map(|d| d.len()), Some(64));
        assert_eq!(outcome.sources[2].leaves, 2);

        let snapshot = outcome.snapshot.unwrap();
        assert_eq!(
            snapshot.dir,
            PathBuf::from(frozen.str("SOLVER.logdir").unwrap())
        );
        assert!(snapshot.dump_path.exists());
        assert_eq!(snapshot.copied_source, Some(snapshot.dir.join("run.toml")));
    }

    #[test]
    fn test_unknown_document_key_fails_fast() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("bad.yaml");
        fs::write(&config, "SOLVER:\n  epochs: 3\n").unwrap();

        let mut options = options_in(&temp);
        options.config = Some(config);

        let err = build_config(default_schema().unwrap(), &options, &clock()).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_KEY");
        assert!(!temp.path().join("logs_03150907").exists());
    }

    #[test]
    fn test_missing_config_file_is_persistence_error() {
        let options = BuildOptions {
            config: Some(PathBuf::from("/nonexistent/flagtree.toml")),
            backup: false,
            ..BuildOptions::default()
        };
        let err = build_config(default_schema().unwrap(), &options, &clock()).unwrap_err();
        assert_eq!(err.code(), "PERSISTENCE_ERROR");
    }

    #[test]
    fn test_snapshot_failure_is_reported_not_fatal() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let options = BuildOptions {
            overrides: vec![format!("SOLVER.logdir={}", blocker.join("logs").display())],
            ..BuildOptions::default()
        };
        let outcome = build_config(default_schema().unwrap(), &options, &clock()).unwrap();

        assert!(outcome.snapshot.is_none());
        assert_eq!(
            outcome.snapshot_error.map(|e| e.code()),
            Some("PERSISTENCE_ERROR")
        );
    }

    #[test]
    fn test_source_serializes_without_empty_fields() {
        let source = ConfigSource {
            origin: ConfigOrigin::Overrides,
            path: None,
            digest: None,
            leaves: 2,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json, serde_json::json!({"origin": "overrides", "leaves": 2}));
    }
}
