//! Typed leaf values for flagtree configuration trees.
//!
//! Every leaf of a configuration tree carries a [`TypedValue`] whose [`Kind`]
//! is fixed by the default schema. Raw override strings are turned into
//! values of a known kind by [`coerce_literal`].

mod kind;
mod literal;
mod value;

pub use kind::Kind;
pub use literal::{coerce_literal, LiteralError};
pub use value::TypedValue;
