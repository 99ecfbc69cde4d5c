use crate::arena::Handle;
use crate::bst::tree::{Insertion, Tree};
use crate::entry::Entry;

// Rotations only rewire links; the resulting balance factors depend on
// whether the caller is fixing up an insertion or a removal, so the caller
// sets them afterwards.

/// Rotates the subtree rooted at `curr` to the left. `curr` must have a
/// right child, which takes its place under its former parent (or as the
/// root) while `curr` becomes that child's left child.
pub fn rotate_left<T, U>(tree: &mut Tree<T, U>, curr: Handle) {
    let parent = tree.arena[curr].parent;
    let child = match tree.arena[curr].right {
        Some(child) => child,
        None => unreachable!(),
    };

    tree.arena[child].parent = parent;
    match parent {
        None => tree.root = Some(child),
        Some(parent) => {
            if tree.arena[parent].left == Some(curr) {
                tree.arena[parent].left = Some(child);
            } else {
                tree.arena[parent].right = Some(child);
            }
        }
    }

    let grandchild = tree.arena[child].left;
    tree.arena[child].left = Some(curr);
    tree.arena[curr].parent = Some(child);
    tree.arena[curr].right = grandchild;
    if let Some(grandchild) = grandchild {
        tree.arena[grandchild].parent = Some(curr);
    }
}

/// Rotates the subtree rooted at `curr` to the right. Mirror image of
/// [`rotate_left`].
pub fn rotate_right<T, U>(tree: &mut Tree<T, U>, curr: Handle) {
    let parent = tree.arena[curr].parent;
    let child = match tree.arena[curr].left {
        Some(child) => child,
        None => unreachable!(),
    };

    tree.arena[child].parent = parent;
    match parent {
        None => tree.root = Some(child),
        Some(parent) => {
            if tree.arena[parent].right == Some(curr) {
                tree.arena[parent].right = Some(child);
            } else {
                tree.arena[parent].left = Some(child);
            }
        }
    }

    let grandchild = tree.arena[child].right;
    tree.arena[child].right = Some(curr);
    tree.arena[curr].parent = Some(child);
    tree.arena[curr].left = grandchild;
    if let Some(grandchild) = grandchild {
        tree.arena[grandchild].parent = Some(curr);
    }
}

pub fn insert<T, U>(tree: &mut Tree<T, U>, key: T, value: U) -> Option<Entry<T, U>>
where
    T: Ord,
{
    let leaf = match tree.insert_leaf(key, value) {
        Insertion::Replaced(entry) => return Some(entry),
        Insertion::Added(leaf) => leaf,
    };
    let parent = match tree.arena[leaf].parent {
        Some(parent) => parent,
        None => return None,
    };
    if tree.arena[parent].balance == 0 {
        // the parent was a leaf or gains a second level; its subtree grew
        tree.arena[parent].balance = if tree.arena[parent].left == Some(leaf) {
            -1
        } else {
            1
        };
        insert_fix(tree, parent, leaf);
    } else {
        // the new leaf filled the parent's previously empty side
        tree.arena[parent].balance = 0;
    }
    None
}

// Walks upward one grandparent level at a time after an insertion grew the
// subtree under `parent` by one. A rotation always restores the subtree to
// its pre-insert height, so it terminates the walk.
fn insert_fix<T, U>(tree: &mut Tree<T, U>, parent: Handle, child: Handle) {
    let grand = match tree.arena[parent].parent {
        Some(grand) => grand,
        None => return,
    };

    if tree.arena[grand].left == Some(parent) {
        tree.arena[grand].balance -= 1;
        match tree.arena[grand].balance {
            0 => {}
            -1 => insert_fix(tree, grand, parent),
            _ => {
                if tree.arena[parent].balance == -1 {
                    // zig-zig
                    rotate_right(tree, grand);
                    tree.arena[grand].balance = 0;
                    tree.arena[parent].balance = 0;
                } else {
                    // zig-zag; the displaced grandchild's balance decides how
                    // the height splits between the two rotated ancestors
                    rotate_left(tree, parent);
                    rotate_right(tree, grand);
                    match tree.arena[child].balance {
                        -1 => {
                            tree.arena[grand].balance = 1;
                            tree.arena[parent].balance = 0;
                        }
                        1 => {
                            tree.arena[grand].balance = 0;
                            tree.arena[parent].balance = -1;
                        }
                        _ => {
                            tree.arena[grand].balance = 0;
                            tree.arena[parent].balance = 0;
                        }
                    }
                    tree.arena[child].balance = 0;
                }
            }
        }
    } else {
        tree.arena[grand].balance += 1;
        match tree.arena[grand].balance {
            0 => {}
            1 => insert_fix(tree, grand, parent),
            _ => {
                if tree.arena[parent].balance == 1 {
                    // zig-zig
                    rotate_left(tree, grand);
                    tree.arena[grand].balance = 0;
                    tree.arena[parent].balance = 0;
                } else {
                    // zig-zag
                    rotate_right(tree, parent);
                    rotate_left(tree, grand);
                    match tree.arena[child].balance {
                        -1 => {
                            tree.arena[grand].balance = 0;
                            tree.arena[parent].balance = 1;
                        }
                        1 => {
                            tree.arena[grand].balance = -1;
                            tree.arena[parent].balance = 0;
                        }
                        _ => {
                            tree.arena[grand].balance = 0;
                            tree.arena[parent].balance = 0;
                        }
                    }
                    tree.arena[child].balance = 0;
                }
            }
        }
    }
}

pub fn remove<T, U>(tree: &mut Tree<T, U>, key: &T) -> Option<Entry<T, U>>
where
    T: Ord,
{
    let curr = tree.find_node(key)?;
    if tree.arena[curr].left.is_some() && tree.arena[curr].right.is_some() {
        // swapping with the in-order predecessor leaves a node with at most
        // one child to splice out
        let pred = match tree.predecessor(curr) {
            Some(pred) => pred,
            None => unreachable!(),
        };
        tree.swap_positions(curr, pred);
    }
    let (entry, parent, diff) = tree.splice_out(curr);
    remove_fix(tree, parent, diff);
    Some(entry)
}

// Walks upward after a removal shrank one side of `curr` by one; `diff` is
// +1 if the left subtree shrank and -1 if the right subtree shrank.
fn remove_fix<T, U>(tree: &mut Tree<T, U>, curr: Option<Handle>, diff: i8) {
    let curr = match curr {
        Some(curr) => curr,
        None => return,
    };
    let parent = tree.arena[curr].parent;
    let ndiff = match parent {
        Some(parent) if tree.arena[parent].left == Some(curr) => 1,
        Some(_) => -1,
        None => 0,
    };

    match tree.arena[curr].balance + diff {
        -2 => {
            let child = match tree.arena[curr].left {
                Some(child) => child,
                None => unreachable!(),
            };
            match tree.arena[child].balance {
                0 => {
                    // single rotation that preserves the subtree height, so
                    // the walk stops here
                    rotate_right(tree, curr);
                    tree.arena[child].balance = 1;
                    tree.arena[curr].balance = -1;
                }
                -1 => {
                    // zig-zig
                    rotate_right(tree, curr);
                    tree.arena[child].balance = 0;
                    tree.arena[curr].balance = 0;
                    remove_fix(tree, parent, ndiff);
                }
                _ => {
                    // zig-zag
                    let grand = match tree.arena[child].right {
                        Some(grand) => grand,
                        None => unreachable!(),
                    };
                    rotate_left(tree, child);
                    rotate_right(tree, curr);
                    match tree.arena[grand].balance {
                        -1 => {
                            tree.arena[curr].balance = 1;
                            tree.arena[child].balance = 0;
                        }
                        1 => {
                            tree.arena[curr].balance = 0;
                            tree.arena[child].balance = -1;
                        }
                        _ => {
                            tree.arena[curr].balance = 0;
                            tree.arena[child].balance = 0;
                        }
                    }
                    tree.arena[grand].balance = 0;
                    remove_fix(tree, parent, ndiff);
                }
            }
        }
        2 => {
            let child = match tree.arena[curr].right {
                Some(child) => child,
                None => unreachable!(),
            };
            match tree.arena[child].balance {
                0 => {
                    rotate_left(tree, curr);
                    tree.arena[child].balance = -1;
                    tree.arena[curr].balance = 1;
                }
                1 => {
                    // zig-zig
                    rotate_left(tree, curr);
                    tree.arena[child].balance = 0;
                    tree.arena[curr].balance = 0;
                    remove_fix(tree, parent, ndiff);
                }
                _ => {
                    // zig-zag
                    let grand = match tree.arena[child].left {
                        Some(grand) => grand,
                        None => unreachable!(),
                    };
                    rotate_right(tree, child);
                    rotate_left(tree, curr);
                    match tree.arena[grand].balance {
                        -1 => {
                            tree.arena[curr].balance = 0;
                            tree.arena[child].balance = 1;
                        }
                        1 => {
                            tree.arena[curr].balance = -1;
                            tree.arena[child].balance = 0;
                        }
                        _ => {
                            tree.arena[curr].balance = 0;
                            tree.arena[child].balance = 0;
                        }
                    }
                    tree.arena[grand].balance = 0;
                    remove_fix(tree, parent, ndiff);
                }
            }
        }
        -1 => tree.arena[curr].balance = -1,
        1 => tree.arena[curr].balance = 1,
        _ => {
            // the subtree shrank by one; the change is visible further up
            tree.arena[curr].balance = 0;
            remove_fix(tree, parent, ndiff);
        }
    }
}
