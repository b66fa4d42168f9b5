//! Self-balancing binary search tree that uses a color bit per node to keep the tree
//! approximately balanced during insertions and removals.

mod node;
mod tree;

pub use self::node::Color;
pub use self::tree::{RedBlackTree, RedBlackTreeIntoIter, RedBlackTreeIter};
