//! Lazy pre-order traversal.

use std::slice;

use flagtree_value::TypedValue;

use super::node::{Child, ConfigNode};
use super::path::join_path;

/// Pre-order, insertion-ordered iterator over `(path, child)` pairs.
///
/// Nodes are yielded before their children.
pub struct Walk<'a> {
    stack: Vec<(String, slice::Iter<'a, (String, Child)>)>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(root: &'a ConfigNode) -> Self {
        Self {
            stack: vec![(String::new(), root.entries().iter())],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a Child);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, entries) = self.stack.last_mut()?;
            match entries.next() {
                Some((key, child)) => {
                    let path = join_path(prefix, key);
                    if let Child::Node(node) = child {
                        self.stack.push((path.clone(), node.entries().iter()));
                    }
                    return Some((path, child));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Leaves only, in the same order as [`Walk`].
pub struct Leaves<'a> {
    walk: Walk<'a>,
}

impl<'a> Leaves<'a> {
    pub(crate) fn new(root: &'a ConfigNode) -> Self {
        Self {
            walk: Walk::new(root),
        }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (String, &'a TypedValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.by_ref().find_map(|(path, child)| match child {
            Child::Leaf(value) => Some((path, value)),
            Child::Node(_) => None,
        })
    }
}
