//! Configuration lifecycle
//!
//! Two states: MUTABLE → FROZEN.
//!
//! A [`DraftConfig`] owns a mutable tree and exposes the merge phase. Its
//! only way out is [`DraftConfig::freeze`], which yields a [`FrozenConfig`]
//! that hands out shared references only. Consumers receive the frozen
//! value; nothing reachable from it can be mutated.

use std::fmt;
use std::ops::Deref;
use std::path::Path;

use flagtree_value::TypedValue;
use serde_json::Value;
use tracing::info;

use crate::derived::{Clock, DerivedFields};
use crate::document::{load_document, render_document, DocumentFormat, LoadedDocument};
use crate::error::Result;
use crate::merge::{apply_overrides, merge_document, parse_overrides};
use crate::tree::ConfigNode;

/// Lifecycle state of a configuration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Merges and derived-field resolution are allowed.
    Mutable,
    /// Read-only for the rest of the process.
    Frozen,
}

impl LifecycleState {
    /// Check if transition from this state to target is valid
    pub fn can_transition_to(&self, target: LifecycleState) -> bool {
        matches!((self, target), (LifecycleState::Mutable, LifecycleState::Frozen))
    }
}

/// A configuration tree in its merge phase.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    root: ConfigNode,
}

impl DraftConfig {
    /// Start a draft from a schema. A frozen schema is reopened.
    pub fn new(mut schema: ConfigNode) -> Self {
        schema.defrost();
        Self { root: schema }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::Mutable
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// Merge an already-parsed document.
    pub fn merge_document(&mut self, document: &Value) -> Result<usize> {
        merge_document(&mut self.root, document)
    }

    /// Load and merge a document file. `None` is a no-op.
    pub fn merge_file(&mut self, path: Option<&Path>) -> Result<Option<LoadedDocument>> {
        let Some(path) = path else {
            return Ok(None);
        };
        let document = load_document(path)?;
        info!(
            event = "config.document_loaded",
            path = %document.path.display(),
            format = %document.format,
            digest = %document.digest
        );
        self.merge_document(&document.value)?;
        Ok(Some(document))
    }

    /// Parse and apply command-line override tokens.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<usize> {
        let overrides = parse_overrides(tokens)?;
        apply_overrides(&mut self.root, &overrides)
    }

    /// Set a single leaf directly.
    pub fn set(&mut self, path: &str, value: TypedValue) -> Result<()> {
        self.root.set_leaf(path, value)
    }

    /// Run the derived-field pass. Returns the resolved log directory.
    pub fn resolve_derived(
        &mut self,
        fields: &DerivedFields,
        invocation: &[String],
        clock: &dyn Clock,
    ) -> Result<String> {
        fields.resolve(&mut self.root, invocation, clock)
    }

    /// MUTABLE → FROZEN.
    pub fn freeze(mut self) -> FrozenConfig {
        debug_assert!(self.state().can_transition_to(LifecycleState::Frozen));
        self.root.freeze();
        info!(event = "config.frozen", leaves = self.root.leaves().count());
        FrozenConfig { root: self.root }
    }
}

/// A configuration tree after the merge phase. Read-only.
#[derive(Debug, PartialEq)]
pub struct FrozenConfig {
    root: ConfigNode,
}

/// A copy of a frozen configuration is frozen too.
impl Clone for FrozenConfig {
    fn clone(&self) -> Self {
        let mut root = self.root.clone();
        root.freeze();
        Self { root }
    }
}

impl FrozenConfig {
    pub fn state(&self) -> LifecycleState {
        LifecycleState::Frozen
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// Render the configuration as document text.
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        render_document(&self.root, format)
    }

    /// Fresh, independent draft copied from this configuration.
    pub fn to_draft(&self) -> DraftConfig {
        DraftConfig::new(self.root.clone())
    }

    /// Reopen this tree for another merge cycle.
    #[cfg(test)]
    pub(crate) fn thaw(mut self) -> DraftConfig {
        self.root.defrost();
        DraftConfig { root: self.root }
    }
}

impl Deref for FrozenConfig {
    type Target = ConfigNode;

    fn deref(&self) -> &ConfigNode {
        &self.root
    }
}

impl fmt::Display for FrozenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render(DocumentFormat::Toml).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
