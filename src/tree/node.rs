//! Tree nodes and leaf access.

use flagtree_value::{Kind, TypedValue};
use tracing::debug;

use super::path::{join_path, split_path};
use super::walk::{Leaves, Walk};
use crate::error::{ConfigError, Result};

/// A child of a [`ConfigNode`]: either a nested node or a typed leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(ConfigNode),
    Leaf(TypedValue),
}

impl Child {
    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&TypedValue> {
        match self {
            Child::Leaf(value) => Some(value),
            Child::Node(_) => None,
        }
    }

    /// Shape name used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Child::Node(_) => "node",
            Child::Leaf(_) => "leaf",
        }
    }
}

/// Ordered mapping from key to [`Child`].
///
/// Only the root's `frozen` flag is consulted: every mutation goes through
/// [`ConfigNode::set_leaf`] on the root, and nested nodes are never handed
/// out mutably.
#[derive(Debug, Default)]
pub struct ConfigNode {
    children: Vec<(String, Child)>,
    frozen: bool,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn entries(&self) -> &[(String, Child)] {
        &self.children
    }

    /// Direct child by key.
    pub fn child(&self, key: &str) -> Option<&Child> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, child)| child)
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut Child> {
        self.children
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, child)| child)
    }

    /// Keys of the direct children, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child. Builder-only: the schema decides the shape of the tree.
    pub(crate) fn insert(&mut self, key: &str, child: Child) -> Result<()> {
        if key.is_empty() || key.contains('.') || self.child(key).is_some() {
            return Err(ConfigError::DuplicateKey {
                path: key.to_string(),
            });
        }
        self.children.push((key.to_string(), child));
        Ok(())
    }

    /// Resolve a dotted path to a child.
    pub fn get(&self, path: &str) -> Result<&Child> {
        let segments = split_path(path)?;
        let unknown = || ConfigError::UnknownPath {
            path: path.to_string(),
        };

        let (last, parents) = segments.split_last().ok_or_else(unknown)?;
        let mut node = self;
        for segment in parents {
            node = node.child(segment).and_then(Child::as_node).ok_or_else(unknown)?;
        }
        node.child(last).ok_or_else(unknown)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Resolve a dotted path to a nested node.
    pub fn get_node(&self, path: &str) -> Result<&ConfigNode> {
        match self.get(path)? {
            Child::Node(node) => Ok(node),
            Child::Leaf(_) => Err(ConfigError::ShapeMismatch {
                path: path.to_string(),
                expected: "node",
                got: "leaf",
            }),
        }
    }

    /// Resolve a dotted path to a leaf value.
    pub fn get_leaf(&self, path: &str) -> Result<&TypedValue> {
        match self.get(path)? {
            Child::Leaf(value) => Ok(value),
            Child::Node(_) => Err(ConfigError::ShapeMismatch {
                path: path.to_string(),
                expected: "leaf",
                got: "node",
            }),
        }
    }

    /// Replace the value of an existing leaf.
    ///
    /// Fails with `FrozenTree` on a frozen tree, `UnknownPath` unless `path`
    /// names an existing leaf, and `KindMismatch` if `value` has a different
    /// kind than the current value. Tuple length may change freely.
    pub fn set_leaf(&mut self, path: &str, value: TypedValue) -> Result<()> {
        if self.frozen {
            return Err(ConfigError::FrozenTree {
                path: path.to_string(),
            });
        }

        let segments = split_path(path)?;
        let unknown = || ConfigError::UnknownPath {
            path: path.to_string(),
        };

        let (last, parents) = segments.split_last().ok_or_else(unknown)?;
        let mut node = self;
        for segment in parents {
            node = match node.child_mut(segment) {
                Some(Child::Node(inner)) => inner,
                _ => return Err(unknown()),
            };
        }
        let current = match node.child_mut(last) {
            Some(Child::Leaf(current)) => current,
            _ => return Err(unknown()),
        };

        if current.kind() != value.kind() {
            return Err(ConfigError::kind_mismatch(path, current.kind(), value.kind().name()));
        }

        debug!(event = "config.leaf_set", path = path, value = %value);
        *current = value;
        Ok(())
    }

    /// Lazy pre-order walk over every `(path, child)` pair.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self)
    }

    /// Lazy walk over leaves only.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(self)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Lock the tree. Every later `set_leaf` on this root fails.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Reopen a frozen tree for another merge cycle.
    pub(crate) fn defrost(&mut self) {
        self.frozen = false;
    }

    fn typed<'a, T>(
        &'a self,
        path: &str,
        expected: Kind,
        read: impl FnOnce(&'a TypedValue) -> Option<T>,
    ) -> Result<T> {
        let leaf = self.get_leaf(path)?;
        read(leaf).ok_or_else(|| ConfigError::kind_mismatch(path, expected, leaf.kind().name()))
    }

    pub fn int(&self, path: &str) -> Result<i64> {
        self.typed(path, Kind::Int, TypedValue::as_int)
    }

    pub fn float(&self, path: &str) -> Result<f64> {
        self.typed(path, Kind::Float, TypedValue::as_float)
    }

    pub fn bool(&self, path: &str) -> Result<bool> {
        self.typed(path, Kind::Bool, TypedValue::as_bool)
    }

    pub fn str(&self, path: &str) -> Result<&str> {
        self.typed(path, Kind::Str, TypedValue::as_str)
    }

    pub fn int_tuple(&self, path: &str) -> Result<&[i64]> {
        self.typed(path, Kind::IntTuple, TypedValue::as_int_tuple)
    }

    pub fn float_tuple(&self, path: &str) -> Result<&[f64]> {
        self.typed(path, Kind::FloatTuple, TypedValue::as_float_tuple)
    }

    pub fn str_tuple(&self, path: &str) -> Result<&[String]> {
        self.typed(path, Kind::StrTuple, TypedValue::as_str_tuple)
    }

    /// Flat `path = value` listing, one leaf per line.
    pub fn to_flat_string(&self) -> String {
        self.leaves()
            .map(|(path, value)| format!("{} = {}\n", path, value))
            .collect()
    }

    /// Paths of every leaf under `prefix` (or the whole tree for `""`).
    pub fn leaf_paths(&self, prefix: &str) -> Vec<String> {
        self.leaves()
            .map(|(path, _)| path)
            .filter(|path| prefix.is_empty() || path.starts_with(&join_path(prefix, "")))
            .collect()
    }
}

/// Deep copy. The copy is a fresh draft: its frozen flag is always false.
impl Clone for ConfigNode {
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
            frozen: false,
        }
    }
}

/// Structural equality: keys, order, shapes and values. The frozen flag is
/// lifecycle state, not content.
impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
    }
}
