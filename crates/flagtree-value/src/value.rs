//! Tagged leaf values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kind::Kind;

/// A leaf value whose kind never changes after the schema is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    IntTuple(Vec<i64>),
    FloatTuple(Vec<f64>),
    StrTuple(Vec<String>),
}

impl TypedValue {
    pub fn kind(&self) -> Kind {
        match self {
            TypedValue::Int(_) => Kind::Int,
            TypedValue::Float(_) => Kind::Float,
            TypedValue::Bool(_) => Kind::Bool,
            TypedValue::Str(_) => Kind::Str,
            TypedValue::IntTuple(_) => Kind::IntTuple,
            TypedValue::FloatTuple(_) => Kind::FloatTuple,
            TypedValue::StrTuple(_) => Kind::StrTuple,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_tuple(&self) -> Option<&[i64]> {
        match self {
            TypedValue::IntTuple(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_tuple(&self) -> Option<&[f64]> {
        match self {
            TypedValue::FloatTuple(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str_tuple(&self) -> Option<&[String]> {
        match self {
            TypedValue::StrTuple(v) => Some(v),
            _ => None,
        }
    }

    /// Number of elements for tuple kinds, `None` for scalars.
    pub fn arity(&self) -> Option<usize> {
        match self {
            TypedValue::IntTuple(v) => Some(v.len()),
            TypedValue::FloatTuple(v) => Some(v.len()),
            TypedValue::StrTuple(v) => Some(v.len()),
            _ => None,
        }
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Int(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Float(v)
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        TypedValue::Bool(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::Str(v.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::Str(v)
    }
}

/// Write a tuple as `(a, b)`, or `(a,)` for a single element.
fn write_tuple<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    if items.len() == 1 {
        f.write_str(",")?;
    }
    f.write_str(")")
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(v) => write!(f, "{}", v),
            // Debug keeps the trailing `.0` on integral floats.
            TypedValue::Float(v) => write!(f, "{:?}", v),
            TypedValue::Bool(v) => write!(f, "{}", v),
            TypedValue::Str(v) => f.write_str(v),
            TypedValue::IntTuple(items) => write_tuple(f, items, |f, v| write!(f, "{}", v)),
            TypedValue::FloatTuple(items) => write_tuple(f, items, |f, v| write!(f, "{:?}", v)),
            TypedValue::StrTuple(items) => write_tuple(f, items, |f, v| write!(f, "'{}'", v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_each_variant() {
        assert_eq!(TypedValue::Int(1).kind(), Kind::Int);
        assert_eq!(TypedValue::Float(1.0).kind(), Kind::Float);
        assert_eq!(TypedValue::Bool(true).kind(), Kind::Bool);
        assert_eq!(TypedValue::from("x").kind(), Kind::Str);
        assert_eq!(TypedValue::IntTuple(vec![]).kind(), Kind::IntTuple);
        assert_eq!(TypedValue::FloatTuple(vec![0.5]).kind(), Kind::FloatTuple);
        assert_eq!(TypedValue::StrTuple(vec![]).kind(), Kind::StrTuple);
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let value = TypedValue::Int(7);
        assert_eq!(value.as_int(), Some(7));
        assert_eq!(value.as_float(), None);
        assert_eq!(value.as_str(), None);
        assert_eq!(value.arity(), None);
    }

    #[test]
    fn test_display_tuples() {
        assert_eq!(TypedValue::IntTuple(vec![120, 60]).to_string(), "(120, 60)");
        assert_eq!(TypedValue::IntTuple(vec![10]).to_string(), "(10,)");
        assert_eq!(TypedValue::FloatTuple(vec![]).to_string(), "()");
        assert_eq!(TypedValue::FloatTuple(vec![1.0, 0.5]).to_string(), "(1.0, 0.5)");
        assert_eq!(
            TypedValue::StrTuple(vec!["a".into(), "b".into()]).to_string(),
            "('a', 'b')"
        );
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(TypedValue::Float(0.1).to_string(), "0.1");
        assert_eq!(TypedValue::Float(0.0).to_string(), "0.0");
        assert_eq!(TypedValue::Bool(false).to_string(), "false");
        assert_eq!(TypedValue::from("logs").to_string(), "logs");
    }

    #[test]
    fn test_serialization_is_tagged() {
        let json = serde_json::to_string(&TypedValue::IntTuple(vec![1, 2])).unwrap();
        assert_eq!(json, r#"{"kind":"int_tuple","value":[1,2]}"#);
        let parsed: TypedValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TypedValue::IntTuple(vec![1, 2]));
    }
}
