use crate::arena::Handle;
use crate::entry::Entry;

/// A struct representing an internal node of a binary search tree.
///
/// Child links are owning in the sense that the tree reaches every node
/// through them; parent links are non-owning back-references. The balance
/// factor is height(right) - height(left) and is only maintained by the AVL
/// tree layer: the unbalanced tree leaves it at zero.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub balance: i8,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U, parent: Option<Handle>) -> Self {
        Node {
            entry: Entry { key, value },
            balance: 0,
            parent,
            left: None,
            right: None,
        }
    }
}
