//! Leaf kind tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed scalar/sequence type of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Int,
    Float,
    Bool,
    Str,
    IntTuple,
    FloatTuple,
    StrTuple,
}

impl Kind {
    /// Whether this kind is a homogeneous tuple.
    pub fn is_tuple(&self) -> bool {
        matches!(self, Kind::IntTuple | Kind::FloatTuple | Kind::StrTuple)
    }

    /// Element kind of a tuple kind. Scalars are their own element kind.
    pub fn element_kind(&self) -> Kind {
        match self {
            Kind::IntTuple => Kind::Int,
            Kind::FloatTuple => Kind::Float,
            Kind::StrTuple => Kind::Str,
            scalar => *scalar,
        }
    }

    /// Tuple kind holding elements of this scalar kind.
    pub fn tuple_of(&self) -> Option<Kind> {
        match self {
            Kind::Int => Some(Kind::IntTuple),
            Kind::Float => Some(Kind::FloatTuple),
            Kind::Str => Some(Kind::StrTuple),
            _ => None,
        }
    }

    /// Stable lowercase name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Str => "str",
            Kind::IntTuple => "tuple<int>",
            Kind::FloatTuple => "tuple<float>",
            Kind::StrTuple => "tuple<str>",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind() {
        assert_eq!(Kind::IntTuple.element_kind(), Kind::Int);
        assert_eq!(Kind::FloatTuple.element_kind(), Kind::Float);
        assert_eq!(Kind::StrTuple.element_kind(), Kind::Str);
        assert_eq!(Kind::Bool.element_kind(), Kind::Bool);
    }

    #[test]
    fn test_tuple_of() {
        assert_eq!(Kind::Int.tuple_of(), Some(Kind::IntTuple));
        assert_eq!(Kind::Bool.tuple_of(), None);
        assert_eq!(Kind::IntTuple.tuple_of(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Kind::Float.to_string(), "float");
        assert_eq!(Kind::StrTuple.to_string(), "tuple<str>");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Kind::FloatTuple).unwrap();
        assert_eq!(json, "\"float_tuple\"");
    }
}
