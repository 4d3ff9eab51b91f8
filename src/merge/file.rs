//! Document merge.

use flagtree_value::{Kind, TypedValue};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::tree::{join_path, Child, ConfigNode};

/// Short type name of a document value, for error messages.
fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Merge a parsed document into `root`, returning the number of leaves set.
///
/// Coercion matrix: exact kind matches, plus integer -> float widening
/// (scalars and tuple elements). Sequences only fill tuple leaves. Every
/// other pairing is a `KindMismatch`.
pub fn merge_document(root: &mut ConfigNode, document: &Value) -> Result<usize> {
    if root.is_frozen() {
        return Err(ConfigError::FrozenTree {
            path: String::new(),
        });
    }
    let map = document.as_object().ok_or(ConfigError::ShapeMismatch {
        path: String::new(),
        expected: "mapping",
        got: describe(document),
    })?;

    let mut applied = 0;
    merge_mapping(root, "", map, &mut applied)?;
    info!(event = "config.document_merged", leaves = applied);
    Ok(applied)
}

fn merge_mapping(
    root: &mut ConfigNode,
    prefix: &str,
    map: &Map<String, Value>,
    applied: &mut usize,
) -> Result<()> {
    for (key, value) in map {
        let path = join_path(prefix, key);
        if key.is_empty() || key.contains('.') {
            return Err(ConfigError::UnknownKey { path });
        }

        let leaf_kind = match root.get(&path) {
            Ok(Child::Node(_)) => None,
            Ok(Child::Leaf(leaf)) => Some(leaf.kind()),
            Err(_) => return Err(ConfigError::UnknownKey { path }),
        };

        match (leaf_kind, value) {
            (None, Value::Object(inner)) => merge_mapping(root, &path, inner, applied)?,
            (None, other) => {
                return Err(ConfigError::ShapeMismatch {
                    path,
                    expected: "mapping",
                    got: describe(other),
                })
            }
            (Some(_), Value::Object(_)) => {
                return Err(ConfigError::ShapeMismatch {
                    path,
                    expected: "scalar or sequence",
                    got: "mapping",
                })
            }
            (Some(kind), other) => {
                let typed = coerce_document_value(&path, kind, other)?;
                debug!(event = "config.document_leaf", path = %path, value = %typed);
                root.set_leaf(&path, typed)?;
                *applied += 1;
            }
        }
    }
    Ok(())
}

fn coerce_scalar(path: &str, kind: Kind, value: &Value) -> Result<TypedValue> {
    let mismatch = || ConfigError::kind_mismatch(path, kind, describe(value));
    match (kind, value) {
        (Kind::Int, Value::Number(n)) => n.as_i64().map(TypedValue::Int).ok_or_else(mismatch),
        (Kind::Float, Value::Number(n)) => n.as_f64().map(TypedValue::Float).ok_or_else(mismatch),
        (Kind::Bool, Value::Bool(b)) => Ok(TypedValue::Bool(*b)),
        (Kind::Str, Value::String(s)) => Ok(TypedValue::Str(s.clone())),
        _ => Err(mismatch()),
    }
}

/// Coerce one document value to the kind of the leaf it lands on.
fn coerce_document_value(path: &str, kind: Kind, value: &Value) -> Result<TypedValue> {
    if !kind.is_tuple() {
        return coerce_scalar(path, kind, value);
    }

    let items = value
        .as_array()
        .ok_or_else(|| ConfigError::kind_mismatch(path, kind, describe(value)))?;

    let element_kind = kind.element_kind();
    let elements = items
        .iter()
        .enumerate()
        .map(|(i, item)| coerce_scalar(&format!("{}[{}]", path, i), element_kind, item))
        .collect::<Result<Vec<_>>>()?;

    Ok(match kind {
        Kind::IntTuple => TypedValue::IntTuple(elements.iter().filter_map(TypedValue::as_int).collect()),
        Kind::FloatTuple => {
            TypedValue::FloatTuple(elements.iter().filter_map(TypedValue::as_float).collect())
        }
        _ => TypedValue::StrTuple(
            elements
                .iter()
                .filter_map(|e| e.as_str().map(str::to_string))
                .collect(),
        ),
    })
}
