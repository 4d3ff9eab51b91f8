//! Configuration snapshots
//!
//! Persists a frozen configuration next to the run's outputs: a full dump
//! of the tree plus a verbatim copy of the source document, if any.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::DocumentFormat;
use crate::error::{ConfigError, Result};
use crate::lifecycle::FrozenConfig;

/// File name of the full configuration dump.
pub const DUMP_FILE_NAME: &str = "all_configs.toml";

/// Path of the leaf naming the output directory.
pub const LOGDIR_PATH: &str = "SOLVER.logdir";

/// What a snapshot wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReport {
    pub dir: PathBuf,
    pub dump_path: PathBuf,
    pub copied_source: Option<PathBuf>,
}

/// Writes configuration snapshots into one directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writer targeting the configuration's own resolved log directory.
    pub fn for_config(config: &FrozenConfig) -> Result<Self> {
        Ok(Self::new(config.str(LOGDIR_PATH)?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory, copy `source` into it and dump the tree.
    ///
    /// Failures are returned, never retried.
    pub fn write(&self, config: &FrozenConfig, source: Option<&Path>) -> Result<SnapshotReport> {
        fs::create_dir_all(&self.dir).map_err(|e| ConfigError::persistence(&self.dir, e))?;

        let copied_source = match source {
            Some(source) => Some(self.copy_source(source)?),
            None => None,
        };

        let dump_path = self.dir.join(DUMP_FILE_NAME);
        let text = config.render(DocumentFormat::Toml)?;
        fs::write(&dump_path, text).map_err(|e| ConfigError::persistence(&dump_path, e))?;

        info!(
            event = "config.snapshot_written",
            dir = %self.dir.display(),
            copied_source = copied_source.is_some()
        );

        Ok(SnapshotReport {
            dir: self.dir.clone(),
            dump_path,
            copied_source,
        })
    }

    fn copy_source(&self, source: &Path) -> Result<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| {
            ConfigError::persistence(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name"),
            )
        })?;
        let target = self.dir.join(file_name);
        fs::copy(source, &target).map_err(|e| ConfigError::persistence(source, e))?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;
    use crate::lifecycle::DraftConfig;
    use crate::schema::default_schema;
    use tempfile::TempDir;

    fn frozen() -> FrozenConfig {
        let mut draft = DraftConfig::new(default_schema().unwrap());
        draft.apply_overrides(&["SOLVER.gpu", "(0, 1)"]).unwrap();
        draft.freeze()
    }

    #[test]
    fn test_write_dump_only() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs_nested").join("run");
        let report = SnapshotWriter::new(&dir).write(&frozen(), None).unwrap();

        assert_eq!(report.dump_path, dir.join(DUMP_FILE_NAME));
        assert!(report.copied_source.is_none());

        let text = fs::read_to_string(&report.dump_path).unwrap();
        let value = parse_document(&text, DocumentFormat::Toml).unwrap();
        assert_eq!(value["SOLVER"]["gpu"], serde_json::json!([0, 1]));
    }

    #[test]
    fn test_write_copies_source_verbatim() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("m40.yaml");
        fs::write(&source, "SOLVER:\n  lr: 0.05  # keep me\n").unwrap();

        let dir = temp.path().join("out");
        let report = SnapshotWriter::new(&dir).write(&frozen(), Some(&source)).unwrap();

        let copied = report.copied_source.unwrap();
        assert_eq!(copied, dir.join("m40.yaml"));
        assert_eq!(
            fs::read_to_string(copied).unwrap(),
            "SOLVER:\n  lr: 0.05  # keep me\n"
        );
    }

    #[test]
    fn test_uncreatable_directory_is_persistence_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = SnapshotWriter::new(blocker.join("sub"))
            .write(&frozen(), None)
            .unwrap_err();
        assert_eq!(err.code(), "PERSISTENCE_ERROR");
    }

    #[test]
    fn test_missing_source_is_persistence_error() {
        let temp = TempDir::new().unwrap();
        let err = SnapshotWriter::new(temp.path().join("out"))
            .write(&frozen(), Some(&temp.path().join("absent.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::PersistenceError { .. }));
    }

    #[test]
    fn test_for_config_uses_logdir() {
        let writer = SnapshotWriter::for_config(&frozen()).unwrap();
        assert_eq!(writer.dir(), Path::new("logs"));
    }
}
