//! Self-balancing binary search tree that maintains the invariant that the
//! heights of the two child subtrees of any node differ by at most one. Each
//! node carries its balance factor, and edits repair the invariant with at
//! most a constant number of rotations per level on the path to the root.

mod map;
mod set;
mod tree;

pub use self::map::{AvlMap, AvlMapIntoIter, AvlMapIter};
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter};
