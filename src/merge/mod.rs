//! Merge engine
//!
//! Two override sources are merged onto a schema-shaped tree:
//! 1. A structured document ([`merge_document`]): mappings recurse into
//!    nodes, scalars and sequences fill leaves of a compatible kind.
//! 2. Command-line tokens ([`parse_overrides`] + [`apply_overrides`]): raw
//!    strings coerced to the kind of the leaf they address.
//!
//! Both are closed-world (no new keys), preserve every leaf's kind, and stop
//! at the first error.

mod file;
mod overrides;

pub use file::merge_document;
pub use overrides::{apply_overrides, parse_overrides, Override};
