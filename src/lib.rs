//! Two self-balancing binary search trees, AVL and red black, each supporting insertion and an
//! in-order traversal that yields keys in sorted order.
//!
//! The avl tree stores distinct keys and silently ignores duplicates. The red black tree keeps
//! every inserted key, duplicates included, and also supports removal.

#[macro_use]
extern crate serde_derive;

pub mod arena;
pub mod avl_tree;
pub mod red_black_tree;
pub mod workload;
