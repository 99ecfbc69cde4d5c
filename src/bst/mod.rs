//! Unbalanced binary search tree with parent-linked nodes, and the shared
//! tree core that the AVL tree builds on.

mod map;
pub(crate) mod node;
pub(crate) mod tree;

pub use self::map::{BstMap, BstMapIntoIter, BstMapIter};
