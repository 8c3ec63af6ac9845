//! This crate exposes a linked Binary Search Tree (BST) with parent
//! pointers, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! sometimes has child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The benefits of these invariants are many. For instance, searching for
//! keys in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support
//! sorted iteration by visiting the left subtree, then the subtree root, then
//! the right subtree.
//!
//! The tree in this crate additionally keeps a *parent* pointer in every
//! `Node`. Parent pointers make in-order neighbor queries (the predecessor
//! and successor of a key) cheap: when a node has no subtree on the relevant
//! side, the neighbor is found by walking *up* the tree instead of restarting
//! from the root.
//!
//! Nothing here rebalances. The height of the tree is whatever the insertion
//! order produces, so every `O(height)` bound degrades to `O(n)` for
//! pathological insertion orders. All traversals are therefore iterative with
//! explicit stacks rather than recursive.

#![deny(missing_docs)]

pub mod error;
pub mod linked;

pub use error::Error;
