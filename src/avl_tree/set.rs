use crate::avl_tree::node::Node;
use crate::avl_tree::tree;
use std::fmt;
use std::iter::FromIterator;

/// An ordered set of distinct keys implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one, which bounds the height
/// of a tree with `n` keys by roughly `1.44 * log2(n + 2)`.
///
/// Inserting a key that is already present leaves the tree untouched: there is no multiplicity
/// tracking, so `count` is always 0 or 1. This differs from `RedBlackTree`, which keeps every
/// duplicate.
///
/// # Examples
///
/// ```
/// use balanced_trees::avl_tree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(5);
/// tree.insert(3);
/// tree.insert(8);
/// assert!(!tree.insert(3));
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.root(), Some(&5));
/// assert_eq!(tree.in_order_traversal(), vec![&3, &5, &8]);
/// ```
pub struct AvlTree<T> {
    tree: tree::Tree<T>,
    len: usize,
}

impl<T> AvlTree<T> {
    /// Constructs a new, empty `AvlTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// ```
    pub fn new() -> Self {
        AvlTree { tree: None, len: 0 }
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the height of the tree. An empty tree has height 0 and a single key has height 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = (1..=7).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.tree)
    }

    /// Returns the key stored at the root, or `None` if the tree is empty.
    ///
    /// Rebalancing may promote a different node after any insert, so this is only meaningful
    /// until the next mutation.
    pub fn root(&self) -> Option<&T> {
        self.tree.as_ref().map(|node| &node.key)
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        self.tree = None;
        self.len = 0;
    }

    /// Returns the minimum key of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = vec![3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.min(), Some(&1));
    /// assert_eq!(tree.max(), Some(&3));
    /// ```
    pub fn min(&self) -> Option<&T> {
        tree::min(&self.tree)
    }

    /// Returns the maximum key of the tree. Returns `None` if the tree is empty.
    pub fn max(&self) -> Option<&T> {
        tree::max(&self.tree)
    }

    /// Returns an iterator over the tree. The iterator yields keys in ascending order using
    /// in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(3);
    /// tree.insert(1);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlTreeIter<'_, T> {
        let mut iter = AvlTreeIter { stack: Vec::new() };
        iter.push_left_spine(&self.tree);
        iter
    }

    /// Collects the keys of the tree in ascending order.
    pub fn in_order_traversal(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> AvlTree<T>
where
    T: Ord,
{
    /// Inserts a key into the tree and rebalances. Returns `false`, leaving the tree unchanged,
    /// if an equal key is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        let (root, inserted) = tree::insert(self.tree.take(), key);
        self.tree = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Checks if a key exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains(&self, key: &T) -> bool {
        tree::get(&self.tree, key).is_some()
    }

    /// Returns how many times `key` occurs in the tree, which is either 0 or 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(4);
    /// tree.insert(4);
    /// assert_eq!(tree.count(&4), 1);
    /// assert_eq!(tree.count(&5), 0);
    /// ```
    pub fn count(&self, key: &T) -> usize {
        if self.contains(key) {
            1
        } else {
            0
        }
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AvlTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for AvlTree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> FromIterator<T> for AvlTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> IntoIterator for AvlTree<T> {
    type IntoIter = AvlTreeIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        let mut iter = AvlTreeIntoIter { stack: Vec::new() };
        iter.push_left_spine(self.tree);
        iter
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T>
where
    T: 'a,
{
    type IntoIter = AvlTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlTree<T>`.
///
/// This iterator traverses the keys of the tree in-order and yields owned keys.
pub struct AvlTreeIntoIter<T> {
    stack: Vec<Box<Node<T>>>,
}

impl<T> AvlTreeIntoIter<T> {
    fn push_left_spine(&mut self, mut tree: tree::Tree<T>) {
        while let Some(mut node) = tree {
            tree = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Iterator for AvlTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            let Node { key, right, .. } = *node;
            self.push_left_spine(right);
            key
        })
    }
}

/// An iterator for `AvlTree<T>`.
///
/// This iterator traverses the keys of the tree in-order and yields immutable references.
pub struct AvlTreeIter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> AvlTreeIter<'a, T> {
    fn push_left_spine(&mut self, mut tree: &'a tree::Tree<T>) {
        while let Some(node) = tree {
            self.stack.push(node);
            tree = &node.left;
        }
    }
}

impl<'a, T> Iterator for AvlTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        Some(&node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::AvlTree;
    use crate::avl_tree::tree::tests::validate;

    #[test]
    fn test_len_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_is_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut tree = AvlTree::new();
        assert!(tree.insert(1));
        assert!(tree.contains(&1));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_duplicate_is_idempotent() {
        let mut tree = AvlTree::new();
        for key in vec![5, 3, 8, 1] {
            tree.insert(key);
        }
        let before = tree.iter().cloned().collect::<Vec<u32>>();
        let height = tree.height();

        assert!(!tree.insert(3));
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), before);
        assert_eq!(tree.height(), height);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_scenario_mixed_keys() {
        let mut tree = AvlTree::new();
        for key in vec![5, 3, 8, 1, 4, 7, 9] {
            tree.insert(key);
        }
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(tree.height(), 3);
        validate(&tree.tree, None, None);
    }

    #[test]
    fn test_scenario_sequential_keys() {
        let mut tree = AvlTree::new();
        for key in 1..=7 {
            tree.insert(key);
            validate(&tree.tree, None, None);
            assert!(tree.height() <= 3);
        }
        assert_eq!(tree.root(), Some(&4));
    }

    #[test]
    fn test_count() {
        let mut tree = AvlTree::new();
        tree.insert(2);
        tree.insert(2);
        assert_eq!(tree.count(&2), 1);
        assert_eq!(tree.count(&3), 0);
    }

    #[test]
    fn test_min_max() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        tree.insert(3);
        tree.insert(5);

        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&5));
    }

    #[test]
    fn test_clear() {
        let mut tree: AvlTree<u32> = (0..10).collect();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn test_into_iter() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        tree.insert(5);
        tree.insert(3);

        assert_eq!(tree.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut tree = AvlTree::new();
        tree.insert(1);
        tree.insert(5);
        tree.insert(3);

        assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
        // restartable
        assert_eq!((&tree).into_iter().count(), 3);
    }

    #[test]
    fn test_debug() {
        let tree: AvlTree<u32> = vec![2, 1].into_iter().collect();
        assert_eq!(format!("{:?}", tree), "{1, 2}");
    }
}
