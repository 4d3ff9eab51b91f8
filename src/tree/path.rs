//! Dotted path helpers.

use crate::error::{ConfigError, Result};

/// Split a dotted path into its segments.
///
/// Empty paths and empty segments (`a..b`, `.a`, `a.`) never address
/// anything and are reported as unknown.
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::UnknownPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// Join a parent path and a key.
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(split_path("DATA.train.depth").unwrap(), vec!["DATA", "train", "depth"]);
        assert_eq!(split_path("SYS").unwrap(), vec!["SYS"]);
    }

    #[test]
    fn test_split_rejects_empty_segments() {
        assert!(split_path("").is_err());
        assert!(split_path("DATA..depth").is_err());
        assert!(split_path(".DATA").is_err());
        assert!(split_path("DATA.").is_err());
    }

    #[test]
    fn test_join() {
        assert_eq!(join_path("", "SOLVER"), "SOLVER");
        assert_eq!(join_path("DATA.train", "depth"), "DATA.train.depth");
    }
}
