//! Error types for building and persisting configuration trees.

use flagtree_value::{Kind, LiteralError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything that can go wrong while building, merging, freezing or
/// persisting a configuration tree.
///
/// Every variant names the dotted path (or file path) it is about, so a
/// misconfigured override can be found without a debugger.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown path '{path}'")]
    UnknownPath { path: String },

    #[error("unknown key '{path}': not present in the schema")]
    UnknownKey { path: String },

    #[error("shape mismatch at '{path}': expected {expected}, got {got}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("kind mismatch at '{path}': expected {expected}, got {got}")]
    KindMismatch {
        path: String,
        expected: Kind,
        got: String,
    },

    #[error("cannot coerce override for '{path}': {source}")]
    CoercionError {
        path: String,
        #[source]
        source: LiteralError,
    },

    #[error("configuration is frozen: cannot set '{path}'")]
    FrozenTree { path: String },

    #[error("cannot persist {}: {source}", .path.display())]
    PersistenceError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {format} document {}: {message}", .path.display())]
    DocumentParse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("cannot render {format} document: {message}")]
    DocumentRender {
        format: &'static str,
        message: String,
    },

    #[error("override '{path}' has no value")]
    MissingOverrideValue { path: String },

    #[error("duplicate key '{path}' in schema")]
    DuplicateKey { path: String },
}

impl ConfigError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownPath { .. } => "UNKNOWN_PATH",
            Self::UnknownKey { .. } => "UNKNOWN_KEY",
            Self::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            Self::KindMismatch { .. } => "KIND_MISMATCH",
            Self::CoercionError { .. } => "COERCION_ERROR",
            Self::FrozenTree { .. } => "FROZEN_TREE",
            Self::PersistenceError { .. } => "PERSISTENCE_ERROR",
            Self::DocumentParse { .. } => "DOCUMENT_PARSE",
            Self::DocumentRender { .. } => "DOCUMENT_RENDER",
            Self::MissingOverrideValue { .. } => "MISSING_OVERRIDE_VALUE",
            Self::DuplicateKey { .. } => "DUPLICATE_KEY",
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::PersistenceError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn kind_mismatch(path: &str, expected: Kind, got: impl Into<String>) -> Self {
        Self::KindMismatch {
            path: path.to_string(),
            expected,
            got: got.into(),
        }
    }
}
