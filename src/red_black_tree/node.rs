use crate::arena::Handle;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// A struct representing an internal node of a red black tree.
///
/// `left` and `right` are the owning edges. `parent` only mirrors them so the fix-up walks can
/// climb towards the root; it is `None` exactly for the root.
pub struct Node<T> {
    pub key: T,
    pub color: Color,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
    pub parent: Option<Handle>,
}

impl<T> Node<T> {
    pub fn new(key: T, parent: Option<Handle>) -> Self {
        Node {
            key,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }
}
