//! An unsafe linked BST with parent pointers. Nodes are individually
//! heap-allocated like the standard library's `LinkedList`, and every node
//! keeps a non-owning pointer back to its parent so that in-order neighbors
//! can be found by walking up the tree.
//!
//! # Examples
//!
//! ```
//! use ordered_bst::linked::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! tree.insert(1).unwrap();
//! assert!(tree.contains(&1));
//!
//! // Keys are unique. Inserting an existing key is rejected.
//! assert!(tree.insert(1).is_err());
//!
//! // Removing a key returns ownership of it.
//! assert_eq!(tree.remove(&1), Some(1));
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::fmt::Write as _;
use std::ptr::NonNull;

use crate::error::Error;

/// An ordered set backed by a plain (unbalanced) Binary Search Tree. This can
/// be used for inserting, finding, and deleting keys, and for the ordered
/// queries a sorted structure supports: min/max, predecessor/successor, and
/// in-order traversal.
pub struct Tree<K> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that the tree can
    // be moved around without the children's parent pointers breaking.
    root: Link<K>,
    size: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        // Explicit stack instead of recursing through child drops; an
        // unbalanced tree can be deep enough to overflow the call stack.
        let mut stack = Vec::new();
        if let Some(root) = self.root.0.take() {
            stack.push(root);
        }
        while let Some(node) = stack.pop() {
            // SAFETY: Every node reachable from `root` was allocated with
            // `Box::new` (in `Node::new_boxed`) and is owned by exactly one
            // parent link, so each is freed exactly once here.
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            if let Some(left) = node.left.0 {
                stack.push(left);
            }
            if let Some(right) = node.right.0 {
                stack.push(right);
            }
        }
    }
}

impl<K> Clone for Tree<K>
where
    K: Ord + Clone,
{
    /// Clones by re-inserting the keys in pre-order. Inserting a parent
    /// before either of its children reproduces the exact shape of the
    /// original tree, so no pointer surgery is needed.
    fn clone(&self) -> Self {
        let mut tree = Self::new();
        for key in self.pre_order_keys() {
            tree.insert(key.clone())
                .expect("source tree holds unique keys");
        }
        tree
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("size", &self.size)
            .field("keys", &self.in_order_keys())
            .finish()
    }
}

impl<K> Tree<K> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            size: 0,
        }
    }

    /// The number of keys currently in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if the given key is in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search_node(key).is_some()
    }

    /// Potentially finds the stored key equal to the given key. If no node
    /// has the corresponding key, `None` is returned.
    ///
    /// This is only distinguishable from [`contains`][Self::contains] for key
    /// types whose equality ignores some of their data.
    pub fn get(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        let node = self.search_node(key)?;
        // SAFETY: `node` is live (it was just found by descending from the
        // root) and the returned borrow is tied to `&self`, so no mutation
        // can free it while the reference is out.
        Some(unsafe { &node.as_ref().key })
    }

    /// Inserts the given key into the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key is already present. The
    /// tree is left exactly as it was before the call.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_bst::linked::Tree;
    /// use ordered_bst::Error;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(1), Ok(()));
    /// assert_eq!(tree.insert(1), Err(Error::DuplicateKey));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> Result<(), Error>
    where
        K: Ord,
    {
        // Descend exactly as a search would, remembering the last node
        // visited. That node becomes the new leaf's parent.
        let mut parent = None;
        let mut went_left = false;
        let mut current = self.root.0;
        while let Some(node) = current {
            // SAFETY: `node` is a live node of this tree; the reference is
            // dropped before any pointer is rewritten.
            let n = unsafe { node.as_ref() };
            parent = Some(node);
            match key.cmp(&n.key) {
                Ordering::Less => {
                    went_left = true;
                    current = n.left.0;
                }
                Ordering::Equal => return Err(Error::DuplicateKey),
                Ordering::Greater => {
                    went_left = false;
                    current = n.right.0;
                }
            }
        }

        let new = Link(Some(NonNull::from(Box::leak(Node::new_boxed(key)))));
        match parent {
            None => self.root = new,
            // SAFETY: `p` is live and `new` was just allocated, so attaching
            // cannot alias an existing borrow.
            Some(mut p) => unsafe {
                if went_left {
                    p.as_mut().attach_left(new)?;
                } else {
                    p.as_mut().attach_right(new)?;
                }
            },
        }
        self.size += 1;
        Ok(())
    }

    /// Removes the given key from the tree, returning ownership of the
    /// stored key. If the tree does not contain the key, nothing happens and
    /// `None` is returned.
    ///
    /// Removal is the classic three-case transplant: a node missing a child
    /// is replaced by its other subtree, and a node with two children is
    /// replaced by its in-order successor (the minimum of its right subtree),
    /// which by definition has no left child of its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<K>
    where
        K: Ord,
    {
        let node = self.search_node(key)?;
        // SAFETY: `node` and every pointer rewired below belong to this tree,
        // and `&mut self` guarantees no outstanding borrows of any of them.
        // `node` itself is unlinked from the structure by the time it is
        // reclaimed with `Box::from_raw`, so it is freed exactly once.
        unsafe {
            let (left, right) = {
                let n = node.as_ref();
                (n.left, n.right)
            };
            match (left.0, right.0) {
                (None, _) => self.transplant(right, node),
                (_, None) => self.transplant(left, node),
                (Some(mut left_child), Some(mut right_child)) => {
                    let mut succ = Self::min_from(Link(Some(right_child)))
                        .0
                        .expect("a nonempty subtree has a minimum");
                    if succ.as_ref().parent.0 != Some(node) {
                        // The successor sits deeper in the right subtree.
                        // Lift its own right subtree into its place first,
                        // then put the whole right subtree under it.
                        let succ_right = succ.as_ref().right;
                        self.transplant(succ_right, succ);
                        succ.as_mut().right = Link(Some(right_child));
                        right_child.as_mut().parent = Link(Some(succ));
                    }
                    self.transplant(Link(Some(succ)), node);
                    succ.as_mut().left = Link(Some(left_child));
                    left_child.as_mut().parent = Link(Some(succ));
                }
            }

            self.size -= 1;
            let node = Box::from_raw(node.as_ptr());
            Some(node.key)
        }
    }

    /// The smallest key in the tree, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.min(), None);
    ///
    /// tree.insert(2).unwrap();
    /// tree.insert(1).unwrap();
    /// tree.insert(3).unwrap();
    ///
    /// assert_eq!(tree.min(), Some(&1));
    /// assert_eq!(tree.max(), Some(&3));
    /// ```
    pub fn min(&self) -> Option<&K> {
        let node = Self::min_from(self.root).0?;
        // SAFETY: The node is live and the borrow is tied to `&self`.
        Some(unsafe { &(*node.as_ptr()).key })
    }

    /// The largest key in the tree, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&K> {
        let node = Self::max_from(self.root).0?;
        // SAFETY: The node is live and the borrow is tied to `&self`.
        Some(unsafe { &(*node.as_ptr()).key })
    }

    /// The largest key strictly smaller than the given key, or `None` if the
    /// key is not in the tree or is already the smallest.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 1, 3] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// assert_eq!(tree.predecessor(&2), Some(&1));
    /// assert_eq!(tree.predecessor(&1), None);
    /// // The key itself must be present.
    /// assert_eq!(tree.predecessor(&4), None);
    /// ```
    pub fn predecessor(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        let node = self.search_node(key)?;
        // SAFETY: `node` came from `search_node` and the walk only follows
        // live links of this tree. The borrow is tied to `&self`.
        let pred = unsafe { Self::predecessor_node(node) }.0?;
        Some(unsafe { &(*pred.as_ptr()).key })
    }

    /// The smallest key strictly larger than the given key, or `None` if the
    /// key is not in the tree or is already the largest.
    pub fn successor(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        let node = self.search_node(key)?;
        // SAFETY: As in `predecessor`.
        let succ = unsafe { Self::successor_node(node) }.0?;
        Some(unsafe { &(*succ.as_ptr()).key })
    }

    /// Verifies the structural invariant of the whole tree: every reachable
    /// node is reachable through exactly one link, every left child's key is
    /// strictly below its parent's, every right child's key is strictly
    /// above, parent pointers agree with the child pointers, and the number
    /// of reachable nodes matches [`len`][Self::len].
    ///
    /// This walks the entire tree, so it is `O(n)` and meant for tests and
    /// debugging rather than hot paths. The mutating operations preserve the
    /// invariant, so a violation means memory was corrupted or the internals
    /// were rewired by hand.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] naming the first violation
    /// found.
    pub fn check_invariant(&self) -> Result<(), Error>
    where
        K: Ord,
    {
        let mut seen = HashSet::new();
        let mut stack = Vec::new();
        if let Some(root) = self.root.0 {
            // SAFETY: `root` is live; only shared reads happen below.
            if unsafe { root.as_ref() }.parent.0.is_some() {
                return Err(Error::InvariantViolation("the root has a parent link"));
            }
            stack.push(root);
        }
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                return Err(Error::InvariantViolation(
                    "a node is reachable through two different links",
                ));
            }
            // SAFETY: Every pushed pointer is a child link of a live node.
            let n = unsafe { node.as_ref() };
            if n.is_leaf() {
                continue;
            }
            if let Some(left) = n.left.0 {
                let l = unsafe { left.as_ref() };
                if l.key >= n.key {
                    return Err(Error::InvariantViolation(
                        "a left child's key is not less than its parent's key",
                    ));
                }
                if l.parent.0 != Some(node) {
                    return Err(Error::InvariantViolation(
                        "a child's parent link does not point back at its parent",
                    ));
                }
                stack.push(left);
            }
            if let Some(right) = n.right.0 {
                let r = unsafe { right.as_ref() };
                if r.key <= n.key {
                    return Err(Error::InvariantViolation(
                        "a right child's key is not greater than its parent's key",
                    ));
                }
                if r.parent.0 != Some(node) {
                    return Err(Error::InvariantViolation(
                        "a child's parent link does not point back at its parent",
                    ));
                }
                stack.push(right);
            }
        }
        if seen.len() != self.size {
            return Err(Error::InvariantViolation(
                "the reachable node count does not match the recorded size",
            ));
        }
        Ok(())
    }

    /// The keys of the tree in ascending order.
    ///
    /// This materializes the whole sequence at once; it is not a resumable
    /// iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 3, 1] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// assert_eq!(tree.in_order_keys(), [&1, &2, &3]);
    /// ```
    pub fn in_order_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.size);
        let mut stack = Vec::new();
        let mut current = self.root.0;
        loop {
            while let Some(node) = current {
                stack.push(node);
                // SAFETY: Only live child links of this tree are followed.
                current = unsafe { node.as_ref() }.left.0;
            }
            let node = match stack.pop() {
                Some(node) => node,
                None => break,
            };
            // SAFETY: As above; the borrows are tied to `&self`.
            let n = unsafe { node.as_ref() };
            keys.push(&n.key);
            current = n.right.0;
        }
        keys
    }

    /// The keys of the tree in pre-order: each node before its left subtree,
    /// and the left subtree before the right.
    ///
    /// Feeding this sequence back into [`insert`][Self::insert] on an empty
    /// tree reproduces the exact shape of this one.
    pub fn pre_order_keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.size);
        let mut stack = Vec::new();
        if let Some(root) = self.root.0 {
            stack.push(root);
        }
        while let Some(node) = stack.pop() {
            // SAFETY: Only live child links of this tree are followed and the
            // borrows are tied to `&self`.
            let n = unsafe { node.as_ref() };
            keys.push(&n.key);
            // Right first so the left subtree is popped first.
            if let Some(right) = n.right.0 {
                stack.push(right);
            }
            if let Some(left) = n.left.0 {
                stack.push(left);
            }
        }
        keys
    }

    /// Renders the tree as an indented textual dump, one key per line with
    /// children indented under their parent (left before right). This is a
    /// debugging aid, not a serialization format.
    pub fn render(&self) -> String
    where
        K: fmt::Debug,
    {
        let mut out = String::new();
        let mut stack = Vec::new();
        if let Some(root) = self.root.0 {
            stack.push((root, 0usize));
        }
        while let Some((node, depth)) = stack.pop() {
            // SAFETY: Only live child links of this tree are followed.
            let n = unsafe { node.as_ref() };
            let _ = writeln!(out, "{:indent$}{:?}", "", n.key, indent = depth * 2);
            if let Some(right) = n.right.0 {
                stack.push((right, depth + 1));
            }
            if let Some(left) = n.left.0 {
                stack.push((left, depth + 1));
            }
        }
        out
    }

    /// Iterative descent from the root to the node holding `key`.
    fn search_node(&self, key: &K) -> Option<NonNull<Node<K>>>
    where
        K: Ord,
    {
        let mut current = self.root.0;
        while let Some(node) = current {
            // SAFETY: `node` is a live node of this tree and only shared
            // reads happen while the reference is held.
            let n = unsafe { node.as_ref() };
            match key.cmp(&n.key) {
                Ordering::Less => current = n.left.0,
                Ordering::Equal => return Some(node),
                Ordering::Greater => current = n.right.0,
            }
        }
        None
    }

    /// Replaces the subtree rooted at `to` with the subtree rooted at `from`
    /// by rewriting the child pointer of `to`'s parent (or the root when `to`
    /// is the root) and fixing `from`'s parent link. `to`'s own child
    /// pointers are left untouched; the caller decides what happens to them.
    ///
    /// # Safety
    ///
    /// `to` must be a live node of this tree and `from` must be empty or a
    /// live node of this tree, with no outstanding borrows of either.
    unsafe fn transplant(&mut self, from: Link<K>, to: NonNull<Node<K>>) {
        let parent = to.as_ref().parent;
        match parent.0 {
            None => self.root = from,
            Some(mut p) => {
                if p.as_ref().left.0 == Some(to) {
                    p.as_mut().left = from;
                } else {
                    p.as_mut().right = from;
                }
            }
        }
        if let Some(mut moved) = from.0 {
            moved.as_mut().parent = parent;
        }
    }

    /// The leftmost node of the subtree behind `link`, or an empty link.
    fn min_from(mut link: Link<K>) -> Link<K> {
        while let Some(node) = link.0 {
            // SAFETY: Only live child links are followed.
            let left = unsafe { node.as_ref() }.left;
            if left.0.is_none() {
                break;
            }
            link = left;
        }
        link
    }

    /// The rightmost node of the subtree behind `link`, or an empty link.
    fn max_from(mut link: Link<K>) -> Link<K> {
        while let Some(node) = link.0 {
            // SAFETY: Only live child links are followed.
            let right = unsafe { node.as_ref() }.right;
            if right.0.is_none() {
                break;
            }
            link = right;
        }
        link
    }

    /// The in-order predecessor of `node`: the maximum of its left subtree,
    /// or otherwise the first ancestor of which `node` sits in the *right*
    /// subtree.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of a tree with consistent parent links.
    unsafe fn predecessor_node(node: NonNull<Node<K>>) -> Link<K> {
        if node.as_ref().left.0.is_some() {
            return Self::max_from(node.as_ref().left);
        }
        let mut current = node;
        let mut parent = node.as_ref().parent;
        while let Some(p) = parent.0 {
            if p.as_ref().left.0 == Some(current) {
                current = p;
                parent = p.as_ref().parent;
            } else {
                break;
            }
        }
        parent
    }

    /// The in-order successor of `node`; the mirror image of
    /// [`predecessor_node`][Self::predecessor_node].
    ///
    /// # Safety
    ///
    /// `node` must be a live node of a tree with consistent parent links.
    unsafe fn successor_node(node: NonNull<Node<K>>) -> Link<K> {
        if node.as_ref().right.0.is_some() {
            return Self::min_from(node.as_ref().right);
        }
        let mut current = node;
        let mut parent = node.as_ref().parent;
        while let Some(p) = parent.0 {
            if p.as_ref().right.0 == Some(current) {
                current = p;
                parent = p.as_ref().parent;
            } else {
                break;
            }
        }
        parent
    }
}

/// A possibly-empty edge to a node. `left`/`right` links own the node they
/// point at; `parent` links never do.
struct Link<K>(Option<NonNull<Node<K>>>);

impl<K> Clone for Link<K> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<K> Copy for Link<K> {}

struct Node<K> {
    key: K,
    parent: Link<K>,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            parent: Link(None),
            left: Link(None),
            right: Link(None),
        })
    }

    /// True iff the node has no children.
    fn is_leaf(&self) -> bool {
        self.left.0.is_none() && self.right.0.is_none()
    }

    /// Makes `child` the left child of `self` and points `child`'s parent
    /// link back at `self`. Any previous left child is silently unlinked;
    /// the caller must not orphan a subtree it still needs.
    fn attach_left(&mut self, child: Link<K>) -> Result<(), Error> {
        let mut node = child.0.ok_or(Error::InvalidArgument)?;
        // SAFETY: `child` is a live node and distinct from `self` (a node is
        // never its own child), so writing its parent link cannot alias the
        // `&mut self` borrow.
        unsafe { node.as_mut().parent = Link(Some(NonNull::from(&mut *self))) };
        self.left = child;
        Ok(())
    }

    /// Symmetric to [`attach_left`][Self::attach_left].
    fn attach_right(&mut self, child: Link<K>) -> Result<(), Error> {
        let mut node = child.0.ok_or(Error::InvalidArgument)?;
        // SAFETY: As in `attach_left`.
        unsafe { node.as_mut().parent = Link(Some(NonNull::from(&mut *self))) };
        self.right = child;
        Ok(())
    }
}
