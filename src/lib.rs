//! An ordered set of unique keys implemented with a self-balancing binary search tree.

pub mod avl_tree;
