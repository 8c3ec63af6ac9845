//! Errors surfaced by tree operations.
//!
//! Absent results are not errors: a missed find or a predecessor/successor
//! query at the smallest/largest key returns `None`. The variants here cover
//! the cases where an operation was *rejected* or a structural check failed.

use thiserror::Error;

/// Errors returned by tree operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An attach operation was handed an empty link where a node was
    /// required.
    #[error("a node reference is required")]
    InvalidArgument,

    /// `insert` was called with a key that is already in the tree. The tree
    /// is left exactly as it was before the call.
    #[error("key is already present in the tree")]
    DuplicateKey,

    /// The structural check found a tree that is not a valid BST. The
    /// message names the first violation encountered.
    #[error("structural invariant violated: {0}")]
    InvariantViolation(&'static str),
}
