use crate::arena::{Handle, TypedArena};
use crate::red_black_tree::node::{Color, Node};
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::vec;

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered multiset implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black
/// and keeps the following properties after every insertion and removal:
///
/// 1. The root is black.
/// 2. A red node never has a red child.
/// 3. Every path from a node down to an empty subtree passes through the same number of black
///    nodes.
///
/// Together these bound the height by `2 * log2(n + 1)`.
///
/// Nodes live in a `TypedArena` and refer to their children and parent through handles, so
/// rotations can rewrite parent back-references without shared ownership.
///
/// Unlike `AvlTree`, inserting a key equal to an existing one stores another copy: the new node
/// descends to the right of every equal key it meets. `count` reports the multiplicity and
/// `remove` takes out one copy at a time.
///
/// # Examples
///
/// ```
/// use balanced_trees::red_black_tree::{Color, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(10);
/// tree.insert(20);
/// tree.insert(30);
/// tree.insert(20);
///
/// assert_eq!(tree.root(), Some(&20));
/// assert_eq!(tree.root_color(), Some(Color::Black));
/// assert_eq!(tree.count(&20), 2);
/// assert_eq!(tree.in_order_traversal(), vec![&10, &20, &20, &30]);
///
/// assert_eq!(tree.remove(&20), Some(20));
/// assert_eq!(tree.count(&20), 1);
/// ```
pub struct RedBlackTree<T> {
    arena: TypedArena<Node<T>>,
    root: Option<Handle>,
}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackTree<T>` whose node arena grows `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::with_chunk_size(64);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackTree {
            arena: TypedArena::new(chunk_size),
            root: None,
        }
    }

    /// Returns the number of keys in the tree, duplicates included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Removes every key from the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree: RedBlackTree<u32> = (0..4).collect();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Returns the key stored at the root, or `None` if the tree is empty.
    pub fn root(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[root].key)
    }

    /// Returns the color of the root, or `None` if the tree is empty. A non-empty tree always
    /// reports `Color::Black`.
    pub fn root_color(&self) -> Option<Color> {
        self.root.map(|root| self.arena[root].color)
    }

    /// Returns the minimum key of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = vec![3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.min(), Some(&1));
    /// assert_eq!(tree.max(), Some(&3));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.leftmost(root)].key)
    }

    /// Returns the maximum key of the tree. Returns `None` if the tree is empty.
    pub fn max(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.rightmost(root)].key)
    }

    /// Returns an iterator over the tree. The iterator yields keys in ascending order using
    /// in-order traversal, equal keys in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(3);
    /// tree.insert(1);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackTreeIter<'_, T> {
        RedBlackTreeIter {
            tree: self,
            next: self.root.map(|root| self.leftmost(root)),
            remaining: self.len(),
        }
    }

    /// Collects the keys of the tree in ascending order.
    pub fn in_order_traversal(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn is_red(&self, link: Option<Handle>) -> bool {
        match link {
            Some(handle) => self.arena[handle].color == Color::Red,
            None => false,
        }
    }

    fn paint(&mut self, link: Option<Handle>, color: Color) {
        if let Some(handle) = link {
            self.arena[handle].color = color;
        }
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.arena[handle].left {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.arena[handle].right {
            handle = right;
        }
        handle
    }

    fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.arena[handle].right {
            return Some(self.leftmost(right));
        }

        let mut child = handle;
        let mut parent = self.arena[handle].parent;
        while let Some(curr) = parent {
            if self.arena[curr].right != Some(child) {
                break;
            }
            child = curr;
            parent = self.arena[curr].parent;
        }
        parent
    }

    // Points the slot that held `old` at `new`: a child slot of `parent`, or the root.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.arena[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    fn rotate_left(&mut self, handle: Handle) {
        let child = self.arena[handle]
            .right
            .expect("Expected right child node to be `Some`.");
        let inner = self.arena[child].left;

        self.arena[handle].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(handle);
        }

        let parent = self.arena[handle].parent;
        self.arena[child].parent = parent;
        self.replace_child(parent, handle, Some(child));

        self.arena[child].left = Some(handle);
        self.arena[handle].parent = Some(child);
    }

    fn rotate_right(&mut self, handle: Handle) {
        let child = self.arena[handle]
            .left
            .expect("Expected left child node to be `Some`.");
        let inner = self.arena[child].right;

        self.arena[handle].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(handle);
        }

        let parent = self.arena[handle].parent;
        self.arena[child].parent = parent;
        self.replace_child(parent, handle, Some(child));

        self.arena[child].right = Some(handle);
        self.arena[handle].parent = Some(child);
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.arena[node].parent {
            if self.arena[parent].color != Color::Red {
                break;
            }
            // a red node is never the root, so it has a parent
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected a red node to have a parent.");

            if self.arena[grandparent].left == Some(parent) {
                let uncle = self.arena[grandparent].right;
                match uncle {
                    Some(uncle) if self.arena[uncle].color == Color::Red => {
                        self.arena[parent].color = Color::Black;
                        self.arena[uncle].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        node = grandparent;
                    },
                    _ => {
                        if self.arena[parent].right == Some(node) {
                            node = parent;
                            self.rotate_left(node);
                        }
                        let parent = self.arena[node].parent.expect("Expected a parent node.");
                        let grandparent = self.arena[parent]
                            .parent
                            .expect("Expected a grandparent node.");
                        self.arena[parent].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        self.rotate_right(grandparent);
                    },
                }
            } else {
                let uncle = self.arena[grandparent].left;
                match uncle {
                    Some(uncle) if self.arena[uncle].color == Color::Red => {
                        self.arena[parent].color = Color::Black;
                        self.arena[uncle].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        node = grandparent;
                    },
                    _ => {
                        if self.arena[parent].left == Some(node) {
                            node = parent;
                            self.rotate_right(node);
                        }
                        let parent = self.arena[node].parent.expect("Expected a parent node.");
                        let grandparent = self.arena[parent]
                            .parent
                            .expect("Expected a grandparent node.");
                        self.arena[parent].color = Color::Black;
                        self.arena[grandparent].color = Color::Red;
                        self.rotate_left(grandparent);
                    },
                }
            }
        }

        let root = self.root;
        self.paint(root, Color::Black);
    }

    // Replaces the subtree rooted at `old` with the subtree rooted at `new` in `old`'s parent.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.arena[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.arena[new].parent = parent;
        }
    }

    fn remove_node(&mut self, handle: Handle) -> T {
        let left = self.arena[handle].left;
        let right = self.arena[handle].right;
        let color = self.arena[handle].color;

        // `child` is the node that moves into the vacated position (possibly empty) and
        // `child_parent` its parent afterwards, needed when `child` is empty.
        let (removed_color, child, child_parent) = match (left, right) {
            (None, _) => {
                let parent = self.arena[handle].parent;
                self.transplant(handle, right);
                (color, right, parent)
            },
            (_, None) => {
                let parent = self.arena[handle].parent;
                self.transplant(handle, left);
                (color, left, parent)
            },
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                let successor_color = self.arena[successor].color;
                let child = self.arena[successor].right;

                let child_parent = if successor == right {
                    Some(successor)
                } else {
                    let parent = self.arena[successor].parent;
                    self.transplant(successor, child);
                    self.arena[successor].right = Some(right);
                    self.arena[right].parent = Some(successor);
                    parent
                };

                self.transplant(handle, Some(successor));
                self.arena[successor].left = Some(left);
                self.arena[left].parent = Some(successor);
                self.arena[successor].color = color;
                (successor_color, child, child_parent)
            },
        };

        if removed_color == Color::Black {
            self.remove_fixup(child, child_parent);
        }

        self.arena.free(&handle).key
    }

    // `node` carries an extra black. A double black node always has a sibling because the
    // sibling subtree must make up the missing black height.
    fn remove_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && !self.is_red(node) {
            let curr_parent = match parent {
                Some(parent) => parent,
                None => break,
            };

            if self.arena[curr_parent].left == node {
                let mut sibling = self.arena[curr_parent]
                    .right
                    .expect("Expected a double black node to have a sibling.");
                if self.arena[sibling].color == Color::Red {
                    self.arena[sibling].color = Color::Black;
                    self.arena[curr_parent].color = Color::Red;
                    self.rotate_left(curr_parent);
                    sibling = self.arena[curr_parent]
                        .right
                        .expect("Expected a double black node to have a sibling.");
                }

                let near = self.arena[sibling].left;
                let far = self.arena[sibling].right;
                if !self.is_red(near) && !self.is_red(far) {
                    self.arena[sibling].color = Color::Red;
                    node = Some(curr_parent);
                    parent = self.arena[curr_parent].parent;
                } else {
                    if !self.is_red(far) {
                        self.paint(near, Color::Black);
                        self.arena[sibling].color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = self.arena[curr_parent]
                            .right
                            .expect("Expected a double black node to have a sibling.");
                    }
                    let parent_color = self.arena[curr_parent].color;
                    self.arena[sibling].color = parent_color;
                    self.arena[curr_parent].color = Color::Black;
                    let far = self.arena[sibling].right;
                    self.paint(far, Color::Black);
                    self.rotate_left(curr_parent);
                    node = self.root;
                    parent = None;
                }
            } else {
                let mut sibling = self.arena[curr_parent]
                    .left
                    .expect("Expected a double black node to have a sibling.");
                if self.arena[sibling].color == Color::Red {
                    self.arena[sibling].color = Color::Black;
                    self.arena[curr_parent].color = Color::Red;
                    self.rotate_right(curr_parent);
                    sibling = self.arena[curr_parent]
                        .left
                        .expect("Expected a double black node to have a sibling.");
                }

                let near = self.arena[sibling].right;
                let far = self.arena[sibling].left;
                if !self.is_red(near) && !self.is_red(far) {
                    self.arena[sibling].color = Color::Red;
                    node = Some(curr_parent);
                    parent = self.arena[curr_parent].parent;
                } else {
                    if !self.is_red(far) {
                        self.paint(near, Color::Black);
                        self.arena[sibling].color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = self.arena[curr_parent]
                            .left
                            .expect("Expected a double black node to have a sibling.");
                    }
                    let parent_color = self.arena[curr_parent].color;
                    self.arena[sibling].color = parent_color;
                    self.arena[curr_parent].color = Color::Black;
                    let far = self.arena[sibling].left;
                    self.paint(far, Color::Black);
                    self.rotate_right(curr_parent);
                    node = self.root;
                    parent = None;
                }
            }
        }

        self.paint(node, Color::Black);
    }
}

impl<T> RedBlackTree<T>
where
    T: Ord,
{
    /// Inserts a key into the tree and restores the red black properties. Keys equal to an
    /// existing key are kept as additional copies.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, key: T) {
        let mut parent = None;
        let mut go_left = false;
        let mut curr = self.root;
        while let Some(handle) = curr {
            parent = Some(handle);
            let node = &self.arena[handle];
            go_left = key < node.key;
            curr = if go_left { node.left } else { node.right };
        }

        let handle = self.arena.allocate(Node::new(key, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) if go_left => self.arena[parent].left = Some(handle),
            Some(parent) => self.arena[parent].right = Some(handle),
        }

        self.insert_fixup(handle);
    }

    /// Removes one copy of `key` from the tree and returns it. Returns `None` if the key is not
    /// in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<T> {
        let handle = self.find(key)?;
        Some(self.remove_node(handle))
    }

    /// Checks if a key exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    /// Returns the number of copies of `key` stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = vec![2, 1, 2, 2].into_iter().collect();
    /// assert_eq!(tree.count(&2), 3);
    /// assert_eq!(tree.count(&3), 0);
    /// ```
    pub fn count(&self, key: &T) -> usize {
        self.count_in(self.root, key)
    }

    fn find(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match key.cmp(&node.key) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => curr = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    // Rotations can move equal keys to either side of each other, so both subtrees of an equal
    // node are searched.
    fn count_in(&self, link: Option<Handle>, key: &T) -> usize {
        let node = match link {
            Some(handle) => &self.arena[handle],
            None => return 0,
        };
        match key.cmp(&node.key) {
            Ordering::Less => self.count_in(node.left, key),
            Ordering::Greater => self.count_in(node.right, key),
            Ordering::Equal => 1 + self.count_in(node.left, key) + self.count_in(node.right, key),
        }
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> FromIterator<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> IntoIterator for RedBlackTree<T> {
    type IntoIter = RedBlackTreeIntoIter<T>;
    type Item = T;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut handles = Vec::with_capacity(self.len());
        let mut next = self.root.map(|root| self.leftmost(root));
        while let Some(handle) = next {
            next = self.successor(handle);
            handles.push(handle);
        }

        let keys = handles
            .iter()
            .map(|handle| self.arena.free(handle).key)
            .collect::<Vec<T>>();
        RedBlackTreeIntoIter {
            keys: keys.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T>
where
    T: 'a,
{
    type IntoIter = RedBlackTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the keys of the tree in-order and yields owned keys.
pub struct RedBlackTreeIntoIter<T> {
    keys: vec::IntoIter<T>,
}

impl<T> Iterator for RedBlackTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

/// An iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the keys of the tree in-order by following parent links, so it needs
/// no auxiliary stack, and yields immutable references.
pub struct RedBlackTreeIter<'a, T> {
    tree: &'a RedBlackTree<T>,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for RedBlackTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        let tree = self.tree;
        self.next = tree.successor(handle);
        self.remaining -= 1;
        Some(&tree.arena[handle].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
