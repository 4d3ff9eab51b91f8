//! Configuration tree
//!
//! A [`ConfigNode`] is an ordered mapping from key to either a nested node
//! or a typed leaf. Nodes are addressed by dotted paths from the root
//! (`DATA.train.batch_size`). Mutation always goes through the root so the
//! root's frozen flag covers the whole tree.

mod node;
mod path;
mod walk;

pub use node::{Child, ConfigNode};
pub use path::{join_path, split_path};
pub use walk::{Leaves, Walk};
