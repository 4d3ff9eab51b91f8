//! Command-line overrides.

use flagtree_value::coerce_literal;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::tree::{Child, ConfigNode};

/// One `path` / raw value pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub path: String,
    pub raw: String,
}

impl Override {
    pub fn new(path: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw: raw.into(),
        }
    }
}

/// Parse override tokens into `(path, raw)` pairs.
///
/// Accepts both `PATH VALUE` pairs and single `PATH=VALUE` tokens, mixed
/// freely. A token in path position is split on its first `=`; a token in
/// value position is taken verbatim, so values may contain `=`.
pub fn parse_overrides<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Override>> {
    let mut overrides = Vec::new();
    let mut tokens = tokens.iter().map(|t| AsRef::<str>::as_ref(t));

    while let Some(token) = tokens.next() {
        if let Some((path, raw)) = token.split_once('=') {
            overrides.push(Override::new(path, raw));
            continue;
        }
        match tokens.next() {
            Some(raw) => overrides.push(Override::new(token, raw)),
            None => {
                return Err(ConfigError::MissingOverrideValue {
                    path: token.to_string(),
                })
            }
        }
    }

    Ok(overrides)
}

/// Apply overrides in order, returning how many were applied.
///
/// Each override must address an existing leaf; its raw value is coerced to
/// that leaf's kind. Later overrides of the same path win. The first failure
/// aborts the whole pass.
pub fn apply_overrides(root: &mut ConfigNode, overrides: &[Override]) -> Result<usize> {
    for item in overrides {
        let kind = match root.get(&item.path) {
            Ok(Child::Leaf(leaf)) => leaf.kind(),
            Ok(Child::Node(_)) | Err(_) => {
                return Err(ConfigError::UnknownPath {
                    path: item.path.clone(),
                })
            }
        };

        let value = coerce_literal(kind, &item.raw).map_err(|source| ConfigError::CoercionError {
            path: item.path.clone(),
            source,
        })?;

        debug!(event = "config.override_applied", path = %item.path, value = %value);
        root.set_leaf(&item.path, value)?;
    }

    info!(event = "config.overrides_applied", count = overrides.len());
    Ok(overrides.len())
}
