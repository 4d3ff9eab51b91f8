//! Derived fields
//!
//! Fields computed after both merges and before freezing, from other
//! merged fields plus runtime context (wall clock, invocation argv).
//!
//! Resolution is not idempotent: running it twice appends the alias to the
//! log directory twice, and a different clock reading gives a different
//! suffix. It is meant to run exactly once per build.

use chrono::{Local, NaiveDateTime};
use flagtree_value::TypedValue;
use tracing::info;

use crate::error::Result;
use crate::tree::ConfigNode;

/// Timestamp layout substituted for the alias placeholder: month, day,
/// hour, minute.
pub const TIMESTAMP_FORMAT: &str = "%m%d%H%M";

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Paths of the fields the resolver reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    /// Experiment alias (string leaf).
    pub alias: String,
    /// Output directory the resolved alias is appended to (string leaf).
    pub logdir: String,
    /// Free-text field receiving the space-joined invocation (string leaf).
    pub cmds: String,
    /// Token in the alias replaced by the timestamp.
    pub placeholder: String,
}

impl Default for DerivedFields {
    fn default() -> Self {
        Self {
            alias: "SOLVER.alias".to_string(),
            logdir: "SOLVER.logdir".to_string(),
            cmds: "SYS.cmds".to_string(),
            placeholder: "time".to_string(),
        }
    }
}

/// Lower-case `alias` and replace every placeholder occurrence with the
/// formatted clock reading.
pub fn expand_alias(alias: &str, placeholder: &str, now: NaiveDateTime) -> String {
    let alias = alias.to_lowercase();
    if placeholder.is_empty() || !alias.contains(placeholder) {
        return alias;
    }
    alias.replace(placeholder, &now.format(TIMESTAMP_FORMAT).to_string())
}

impl DerivedFields {
    /// Compute the derived fields in place and return the resolved log
    /// directory.
    ///
    /// `cmds` receives `invocation` joined by spaces; `logdir` becomes
    /// `logdir + "_" + expand_alias(alias)`.
    pub fn resolve(
        &self,
        root: &mut ConfigNode,
        invocation: &[String],
        clock: &dyn Clock,
    ) -> Result<String> {
        root.set_leaf(&self.cmds, TypedValue::Str(invocation.join(" ")))?;

        let alias = expand_alias(root.str(&self.alias)?, &self.placeholder, clock.now());
        let logdir = format!("{}_{}", root.str(&self.logdir)?, alias);
        root.set_leaf(&self.logdir, TypedValue::Str(logdir.clone()))?;

        info!(event = "config.derived_resolved", alias = %alias, logdir = %logdir);
        Ok(logdir)
    }
}
