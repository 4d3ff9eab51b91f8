//! Default schema
//!
//! The schema is the default configuration tree. It fixes the set of keys,
//! the shape of every path and the kind of every leaf; merges may only
//! change leaf values.

mod builder;
mod defaults;

pub use builder::SchemaBuilder;
pub use defaults::default_schema;
