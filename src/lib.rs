//! flagtree - typed hierarchical configuration
//!
//! A closed-world configuration tree for experiment drivers. A schema fixes
//! every path and leaf kind; a document file and command-line overrides are
//! merged over it, derived fields are resolved, and the tree is frozen
//! before anything reads it.

pub mod derived;
pub mod document;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod schema;
pub mod snapshot;
pub mod tree;

pub use derived::{Clock, DerivedFields, FixedClock, SystemClock};
pub use document::{load_document, parse_document, render_document, DocumentFormat, LoadedDocument};
pub use error::{ConfigError, Result};
pub use flagtree_value::{coerce_literal, Kind, LiteralError, TypedValue};
pub use lifecycle::{DraftConfig, FrozenConfig, LifecycleState};
pub use merge::{apply_overrides, merge_document, parse_overrides, Override};
pub use pipeline::{build_config, BuildOptions, BuildOutcome, ConfigOrigin, ConfigSource};
pub use schema::{default_schema, SchemaBuilder};
pub use snapshot::{SnapshotReport, SnapshotWriter};
pub use tree::{Child, ConfigNode};
