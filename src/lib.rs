//! Ordered map and set collections implemented with binary search trees.
//!
//! The crate provides two tree-backed maps over a shared node arena: an
//! unbalanced binary search tree in [`bst`] and a self-balancing AVL tree in
//! [`avl_tree`]. Nodes carry parent links, so iteration walks the tree
//! in-order without an auxiliary stack.

#[macro_use]
extern crate serde_derive;

mod entry;

pub mod arena;
pub mod avl_tree;
pub mod bst;
