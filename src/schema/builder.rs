//! Typed schema builder.

use flagtree_value::TypedValue;

use crate::error::{ConfigError, Result};
use crate::tree::{join_path, Child, ConfigNode};

/// Builds a default [`ConfigNode`] by composition.
///
/// Errors (duplicate or malformed keys) are collected and reported once by
/// [`SchemaBuilder::build`], so definitions can be chained.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    prefix: String,
    node: ConfigNode,
    error: Option<ConfigError>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn scoped(prefix: String) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    fn push(mut self, key: &str, child: Child) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.node.insert(key, child).is_err() {
            self.error = Some(ConfigError::DuplicateKey {
                path: join_path(&self.prefix, key),
            });
        }
        self
    }

    pub fn leaf(self, key: &str, value: TypedValue) -> Self {
        self.push(key, Child::Leaf(value))
    }

    pub fn int(self, key: &str, value: i64) -> Self {
        self.leaf(key, TypedValue::Int(value))
    }

    pub fn float(self, key: &str, value: f64) -> Self {
        self.leaf(key, TypedValue::Float(value))
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.leaf(key, TypedValue::Bool(value))
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        self.leaf(key, TypedValue::Str(value.to_string()))
    }

    pub fn int_tuple(self, key: &str, values: &[i64]) -> Self {
        self.leaf(key, TypedValue::IntTuple(values.to_vec()))
    }

    pub fn float_tuple(self, key: &str, values: &[f64]) -> Self {
        self.leaf(key, TypedValue::FloatTuple(values.to_vec()))
    }

    pub fn str_tuple(self, key: &str, values: &[&str]) -> Self {
        self.leaf(
            key,
            TypedValue::StrTuple(values.iter().map(|v| v.to_string()).collect()),
        )
    }

    /// Nested node defined in place.
    pub fn node(mut self, key: &str, define: impl FnOnce(SchemaBuilder) -> SchemaBuilder) -> Self {
        if self.error.is_some() {
            return self;
        }
        match define(Self::scoped(join_path(&self.prefix, key))).build() {
            Ok(node) => self.push(key, Child::Node(node)),
            Err(e) => {
                self.error = Some(e);
                self
            }
        }
    }

    /// Nested node taken from an existing tree, e.g. a cloned variant.
    pub fn subtree(self, key: &str, node: ConfigNode) -> Self {
        self.push(key, Child::Node(node))
    }

    pub fn build(self) -> Result<ConfigNode> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.node),
        }
    }
}
