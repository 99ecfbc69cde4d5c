use crate::arena::{Arena, Handle};
use crate::bst::node::Node;
use crate::entry::Entry;
use std::cmp;
use std::cmp::Ordering;
use std::mem;

/// The outcome of a leaf insertion: either a fresh leaf was attached, or the
/// key already existed and its entry was overwritten in place.
pub enum Insertion<T, U> {
    Added(Handle),
    Replaced(Entry<T, U>),
}

/// The rotation-free core shared by the unbalanced and AVL maps: an arena of
/// parent-linked nodes plus a root handle.
///
/// Everything here preserves the binary search tree order invariant and never
/// touches balance factors, except for `swap_positions` which exchanges them
/// along with the link structure.
pub struct Tree<T, U> {
    pub arena: Arena<Node<T, U>>,
    pub root: Option<Handle>,
}

impl<T, U> Tree<T, U> {
    pub fn new() -> Self {
        Tree {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn min_node(&self) -> Option<Handle> {
        let mut curr = self.root?;
        while let Some(left) = self.arena[curr].left {
            curr = left;
        }
        Some(curr)
    }

    pub fn max_node(&self) -> Option<Handle> {
        let mut curr = self.root?;
        while let Some(right) = self.arena[curr].right {
            curr = right;
        }
        Some(curr)
    }

    /// Returns the in-order successor of a node: the leftmost node of its
    /// right subtree, or the nearest ancestor of which the node lies in the
    /// left subtree.
    pub fn successor(&self, curr: Handle) -> Option<Handle> {
        if let Some(mut next) = self.arena[curr].right {
            while let Some(left) = self.arena[next].left {
                next = left;
            }
            return Some(next);
        }
        let mut child = curr;
        let mut parent = self.arena[child].parent;
        while let Some(ancestor) = parent {
            if self.arena[ancestor].left == Some(child) {
                return Some(ancestor);
            }
            child = ancestor;
            parent = self.arena[ancestor].parent;
        }
        None
    }

    /// Returns the in-order predecessor of a node: the rightmost node of its
    /// left subtree, or the nearest ancestor of which the node lies in the
    /// right subtree.
    pub fn predecessor(&self, curr: Handle) -> Option<Handle> {
        if let Some(mut next) = self.arena[curr].left {
            while let Some(right) = self.arena[next].right {
                next = right;
            }
            return Some(next);
        }
        let mut child = curr;
        let mut parent = self.arena[child].parent;
        while let Some(ancestor) = parent {
            if self.arena[ancestor].right == Some(child) {
                return Some(ancestor);
            }
            child = ancestor;
            parent = self.arena[ancestor].parent;
        }
        None
    }

    /// Detaches a node that has at most one child, reattaching the child (if
    /// any) in its place, and frees the node. Returns the removed entry, the
    /// former parent, and +1 if the node was its parent's left child, -1 if
    /// it was the right child, and 0 if it was the root.
    pub fn splice_out(&mut self, curr: Handle) -> (Entry<T, U>, Option<Handle>, i8) {
        let parent = self.arena[curr].parent;
        let child = self.arena[curr].left.or(self.arena[curr].right);
        let diff = match parent {
            Some(parent) => {
                if self.arena[parent].left == Some(curr) {
                    self.arena[parent].left = child;
                    1
                } else {
                    self.arena[parent].right = child;
                    -1
                }
            }
            None => {
                self.root = child;
                0
            }
        };
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        let node = self.arena.free(curr);
        (node.entry, parent, diff)
    }

    /// Exchanges the tree positions of two nodes: their parent/left/right
    /// links, the corresponding links of their neighbours, and the root if
    /// either node was the root. Entries stay with their node, while balance
    /// factors describe a position and travel with it.
    pub fn swap_positions(&mut self, n1: Handle, n2: Handle) {
        if n1 == n2 {
            return;
        }
        let n1_parent = self.arena[n1].parent;
        let n1_left = self.arena[n1].left;
        let n1_right = self.arena[n1].right;
        let n1_is_left = match n1_parent {
            Some(parent) => self.arena[parent].left == Some(n1),
            None => false,
        };
        let n2_parent = self.arena[n2].parent;
        let n2_left = self.arena[n2].left;
        let n2_right = self.arena[n2].right;
        let n2_is_left = match n2_parent {
            Some(parent) => self.arena[parent].left == Some(n2),
            None => false,
        };

        self.arena[n1].parent = n2_parent;
        self.arena[n2].parent = n1_parent;
        self.arena[n1].left = n2_left;
        self.arena[n2].left = n1_left;
        self.arena[n1].right = n2_right;
        self.arena[n2].right = n1_right;

        let balance = self.arena[n1].balance;
        self.arena[n1].balance = self.arena[n2].balance;
        self.arena[n2].balance = balance;

        // when the nodes are adjacent, the blind swap above leaves one of
        // them pointing at itself
        if n1_right == Some(n2) {
            self.arena[n2].right = Some(n1);
            self.arena[n1].parent = Some(n2);
        } else if n2_right == Some(n1) {
            self.arena[n1].right = Some(n2);
            self.arena[n2].parent = Some(n1);
        } else if n1_left == Some(n2) {
            self.arena[n2].left = Some(n1);
            self.arena[n1].parent = Some(n2);
        } else if n2_left == Some(n1) {
            self.arena[n1].left = Some(n2);
            self.arena[n2].parent = Some(n1);
        }

        if let Some(parent) = n1_parent {
            if parent != n2 {
                if n1_is_left {
                    self.arena[parent].left = Some(n2);
                } else {
                    self.arena[parent].right = Some(n2);
                }
            }
        }
        if let Some(right) = n1_right {
            if right != n2 {
                self.arena[right].parent = Some(n2);
            }
        }
        if let Some(left) = n1_left {
            if left != n2 {
                self.arena[left].parent = Some(n2);
            }
        }

        if let Some(parent) = n2_parent {
            if parent != n1 {
                if n2_is_left {
                    self.arena[parent].left = Some(n1);
                } else {
                    self.arena[parent].right = Some(n1);
                }
            }
        }
        if let Some(right) = n2_right {
            if right != n1 {
                self.arena[right].parent = Some(n1);
            }
        }
        if let Some(left) = n2_left {
            if left != n1 {
                self.arena[left].parent = Some(n1);
            }
        }

        if self.root == Some(n1) {
            self.root = Some(n2);
        } else if self.root == Some(n2) {
            self.root = Some(n1);
        }
    }

    /// Checks that every node satisfies the height-balance invariant, by
    /// recomputing subtree heights from scratch rather than trusting the
    /// stored balance factors.
    pub fn is_balanced(&self) -> bool {
        self.balanced_in(self.root)
    }

    fn balanced_in(&self, tree: Option<Handle>) -> bool {
        let curr = match tree {
            Some(curr) => curr,
            None => return true,
        };
        let node = &self.arena[curr];
        let balance = self.height_of(node.right) - self.height_of(node.left);
        balance.abs() <= 1 && self.balanced_in(node.left) && self.balanced_in(node.right)
    }

    fn height_of(&self, tree: Option<Handle>) -> isize {
        match tree {
            None => -1,
            Some(curr) => {
                let node = &self.arena[curr];
                cmp::max(self.height_of(node.left), self.height_of(node.right)) + 1
            }
        }
    }

    /// Checks that every root-to-leaf path has the same length. Trivially
    /// true for the empty tree.
    pub fn equal_paths(&self) -> bool {
        let mut leaf_depth = None;
        self.equal_paths_in(self.root, 0, &mut leaf_depth)
    }

    fn equal_paths_in(
        &self,
        tree: Option<Handle>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> bool {
        let curr = match tree {
            Some(curr) => curr,
            None => return true,
        };
        let node = &self.arena[curr];
        if node.left.is_none() && node.right.is_none() {
            match *leaf_depth {
                None => {
                    *leaf_depth = Some(depth);
                    true
                }
                Some(expected) => expected == depth,
            }
        } else {
            self.equal_paths_in(node.left, depth + 1, leaf_depth)
                && self.equal_paths_in(node.right, depth + 1, leaf_depth)
        }
    }
}

impl<T, U> Tree<T, U>
where
    T: Ord,
{
    pub fn find_node(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match key.cmp(&node.entry.key) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => curr = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    /// Descends from the root and either attaches a fresh leaf or overwrites
    /// the entry of an existing node with an equal key. No rebalancing.
    pub fn insert_leaf(&mut self, key: T, value: U) -> Insertion<T, U> {
        let mut curr = match self.root {
            Some(curr) => curr,
            None => {
                let leaf = self.arena.allocate(Node::new(key, value, None));
                self.root = Some(leaf);
                return Insertion::Added(leaf);
            }
        };
        loop {
            match key.cmp(&self.arena[curr].entry.key) {
                Ordering::Less => match self.arena[curr].left {
                    Some(next) => curr = next,
                    None => {
                        let leaf = self.arena.allocate(Node::new(key, value, Some(curr)));
                        self.arena[curr].left = Some(leaf);
                        return Insertion::Added(leaf);
                    }
                },
                Ordering::Greater => match self.arena[curr].right {
                    Some(next) => curr = next,
                    None => {
                        let leaf = self.arena.allocate(Node::new(key, value, Some(curr)));
                        self.arena[curr].right = Some(leaf);
                        return Insertion::Added(leaf);
                    }
                },
                Ordering::Equal => {
                    let old = mem::replace(&mut self.arena[curr].entry, Entry { key, value });
                    return Insertion::Replaced(old);
                }
            }
        }
    }

    pub fn ceil_node(&self, key: &T) -> Option<Handle> {
        self.ceil_in(self.root, key)
    }

    fn ceil_in(&self, tree: Option<Handle>, key: &T) -> Option<Handle> {
        let curr = tree?;
        let node = &self.arena[curr];
        match key.cmp(&node.entry.key) {
            Ordering::Greater => self.ceil_in(node.right, key),
            Ordering::Less => self.ceil_in(node.left, key).or(Some(curr)),
            Ordering::Equal => Some(curr),
        }
    }

    pub fn floor_node(&self, key: &T) -> Option<Handle> {
        self.floor_in(self.root, key)
    }

    fn floor_in(&self, tree: Option<Handle>, key: &T) -> Option<Handle> {
        let curr = tree?;
        let node = &self.arena[curr];
        match key.cmp(&node.entry.key) {
            Ordering::Less => self.floor_in(node.left, key),
            Ordering::Greater => self.floor_in(node.right, key).or(Some(curr)),
            Ordering::Equal => Some(curr),
        }
    }
}

impl<T, U> Default for Tree<T, U> {
    fn default() -> Self {
        Self::new()
    }
}
