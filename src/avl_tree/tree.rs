use crate::avl_tree::node::Node;
use std::cmp::Ordering;

pub type Tree<T> = Option<Box<Node<T>>>;

pub fn height<T>(tree: &Tree<T>) -> usize {
    match tree {
        None => 0,
        Some(ref node) => node.height,
    }
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = node
        .right
        .take()
        .expect("Expected right child node to be `Some`.");
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = node
        .left
        .take()
        .expect("Expected left child node to be `Some`.");
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

// `outer` is true when the inserted key went to the outer grandchild of the heavy side
// (left of the left child, or right of the right child).
fn balance<T>(mut node: Box<Node<T>>, outer: bool) -> Box<Node<T>> {
    if node.balance() > 1 {
        if !outer {
            let child = node.left.take().expect("Expected a left-heavy node to have a left child.");
            node.left = Some(rotate_left(child));
        }
        rotate_right(node)
    } else if node.balance() < -1 {
        if !outer {
            let child = node.right.take().expect("Expected a right-heavy node to have a right child.");
            node.right = Some(rotate_right(child));
        }
        rotate_left(node)
    } else {
        node
    }
}

/// Inserts `key` into the subtree rooted at `tree` and returns the root of the rebalanced
/// subtree, which the caller must store in place of `tree`. The flag is `false` when `key` was
/// already present, in which case the subtree is returned untouched.
pub fn insert<T>(tree: Tree<T>, key: T) -> (Box<Node<T>>, bool)
where
    T: Ord,
{
    let mut node = match tree {
        Some(node) => node,
        None => return (Box::new(Node::new(key)), true),
    };

    // The child is only replaced when a rotation happens below it, and then the subtree does not
    // grow, so comparing against the child before recursing matches comparing after.
    let (inserted, outer) = match key.cmp(&node.key) {
        Ordering::Less => {
            let outer = node.left.as_ref().map_or(false, |child| key < child.key);
            let (child, inserted) = insert(node.left.take(), key);
            node.left = Some(child);
            (inserted, outer)
        },
        Ordering::Greater => {
            let outer = node.right.as_ref().map_or(false, |child| key > child.key);
            let (child, inserted) = insert(node.right.take(), key);
            node.right = Some(child);
            (inserted, outer)
        },
        Ordering::Equal => return (node, false),
    };

    node.update();
    (balance(node, outer), inserted)
}

pub fn get<'a, T>(tree: &'a Tree<T>, key: &T) -> Option<&'a T>
where
    T: Ord,
{
    let mut curr = tree;
    while let Some(node) = curr {
        match key.cmp(&node.key) {
            Ordering::Less => curr = &node.left,
            Ordering::Greater => curr = &node.right,
            Ordering::Equal => return Some(&node.key),
        }
    }
    None
}

pub fn min<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        &curr.key
    })
}

pub fn max<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        &curr.key
    })
}

#[cfg(test)]
pub mod tests {
    use super::{height, insert, Tree};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn insert_into<T: Ord>(tree: &mut Tree<T>, key: T) -> bool {
        let (root, inserted) = insert(tree.take(), key);
        *tree = Some(root);
        inserted
    }

    /// Checks cached heights, balance factors and key order. Returns the subtree height.
    pub fn validate<T: Ord>(tree: &Tree<T>, lower: Option<&T>, upper: Option<&T>) -> usize {
        let node = match tree {
            Some(node) => node,
            None => return 0,
        };
        if let Some(lower) = lower {
            assert!(lower < &node.key, "key order violated on the left");
        }
        if let Some(upper) = upper {
            assert!(&node.key < upper, "key order violated on the right");
        }
        let left = validate(&node.left, lower, Some(&node.key));
        let right = validate(&node.right, Some(&node.key), upper);
        assert_eq!(node.height, 1 + left.max(right), "stale height");
        assert!((left as i64 - right as i64).abs() <= 1, "unbalanced node");
        node.height
    }

    fn keys<T: Clone>(tree: &Tree<T>, out: &mut Vec<T>) {
        if let Some(node) = tree {
            keys(&node.left, out);
            out.push(node.key.clone());
            keys(&node.right, out);
        }
    }

    #[test]
    fn test_single_node() {
        let (root, inserted) = insert(None, 1);
        assert!(inserted);
        assert_eq!(root.key, 1);
        assert_eq!(root.height, 1);
    }

    #[test]
    fn test_rotate_right_left_left() {
        let mut tree = None;
        for key in vec![3, 2, 1] {
            insert_into(&mut tree, key);
        }
        let root = tree.as_ref().unwrap();
        assert_eq!(root.key, 2);
        assert_eq!(root.left.as_ref().unwrap().key, 1);
        assert_eq!(root.right.as_ref().unwrap().key, 3);
        assert_eq!(root.height, 2);
    }

    #[test]
    fn test_rotate_left_right_right() {
        let mut tree = None;
        for key in vec![1, 2, 3] {
            insert_into(&mut tree, key);
        }
        assert_eq!(tree.as_ref().unwrap().key, 2);
        validate(&tree, None, None);
    }

    #[test]
    fn test_double_rotation_left_right() {
        let mut tree = None;
        for key in vec![3, 1, 2] {
            insert_into(&mut tree, key);
        }
        let root = tree.as_ref().unwrap();
        assert_eq!(root.key, 2);
        assert_eq!(root.left.as_ref().unwrap().key, 1);
        assert_eq!(root.right.as_ref().unwrap().key, 3);
    }

    #[test]
    fn test_double_rotation_right_left() {
        let mut tree = None;
        for key in vec![1, 3, 2] {
            insert_into(&mut tree, key);
        }
        let root = tree.as_ref().unwrap();
        assert_eq!(root.key, 2);
        assert_eq!(root.left.as_ref().unwrap().key, 1);
        assert_eq!(root.right.as_ref().unwrap().key, 3);
    }

    #[test]
    fn test_duplicate_returns_same_subtree() {
        let mut tree = None;
        for key in vec![2, 1, 3] {
            insert_into(&mut tree, key);
        }
        assert!(!insert_into(&mut tree, 1));
        assert_eq!(height(&tree), 2);
        validate(&tree, None, None);
    }

    #[test]
    fn test_sequential_inserts_stay_balanced() {
        let mut tree = None;
        for key in 1..=7 {
            insert_into(&mut tree, key);
            validate(&tree, None, None);
            assert!(height(&tree) <= 3);
        }
        assert_eq!(height(&tree), 3);
        assert_eq!(tree.as_ref().unwrap().key, 4);
    }

    proptest! {
        #[test]
        fn prop_insert_keeps_invariants(values in prop::collection::vec(-500i32..500, 0..400)) {
            let mut tree = None;
            let mut expected = BTreeSet::new();
            for value in values {
                prop_assert_eq!(insert_into(&mut tree, value), expected.insert(value));
                validate(&tree, None, None);
            }

            let mut actual = Vec::new();
            keys(&tree, &mut actual);
            prop_assert_eq!(actual, expected.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn prop_height_bound(values in prop::collection::hash_set(any::<u32>(), 1..3000)) {
            let mut tree = None;
            for value in &values {
                insert_into(&mut tree, *value);
            }
            let n = values.len() as f64;
            let bound = 1.44 * (n + 2.0).log2() - 0.328;
            prop_assert!(height(&tree) as f64 <= bound);
        }
    }
}
