//! The [`BalancedTree`] container.

use std::borrow::Borrow;
use std::fmt;
use std::mem;

use super::node::{Direction, Link, Node, further_update, height};
use super::traversal::{InOrder, NodeRef, PreOrder};

// =============================================================================
// BalancedTree Definition
// =============================================================================

/// A mutable ordered map based on an AVL tree.
///
/// Keys must implement `Ord`. Each key is stored at most once; inserting an
/// existing key replaces its value and leaves the tree shape untouched.
///
/// Every insert and erase rebalances the nodes on its path, so the height
/// stays logarithmic in the number of entries no matter the insertion order.
///
/// # Time Complexity
///
/// | Operation        | Complexity   |
/// |------------------|--------------|
/// | `new`            | O(1)         |
/// | `find`           | O(log N)     |
/// | `insert`         | O(log N)     |
/// | `erase`          | O(log N)     |
/// | `len` / `size`   | O(1)         |
/// | `in_order`       | O(N) total   |
/// | `validate`       | O(N)         |
///
/// # Examples
///
/// ```rust
/// use balanced_tree::tree::BalancedTree;
///
/// let mut tree = BalancedTree::new();
/// tree.insert(1, "one");
/// tree.insert(2, "two");
/// tree.insert(3, "three");
///
/// // Ascending inserts rotate at the root.
/// let root = tree.root().unwrap();
/// assert_eq!(root.key(), &2);
/// assert_eq!(root.height(), 2);
///
/// assert_eq!(tree.insert(2, "TWO"), Some("two"));
/// assert_eq!(tree.size(), 3);
/// ```
#[derive(Clone)]
pub struct BalancedTree<K, V> {
    /// Root node of the tree
    pub(super) root: Link<K, V>,
    /// Number of entries
    pub(super) length: usize,
}

impl<K, V> BalancedTree<K, V> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let tree: BalancedTree<i32, String> = BalancedTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.height(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns the number of entries in the tree. Same as [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single entry.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(height(&self.root))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        tree_event!(debug, length = self.length, "clear");
        self.root = None;
        self.length = 0;
    }

    /// Returns a read-only view of the root node, or `None` when empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// for key in [3, 1, 2] {
    ///     tree.insert(key, ());
    /// }
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.key(), &2);
    /// assert_eq!(root.left().map(|node| *node.key()), Some(1));
    /// assert_eq!(root.right().map(|node| *node.key()), Some(3));
    /// ```
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.as_deref().map(NodeRef::new)
    }

    /// Returns a lazy iterator over the entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// for key in [5, 3, 8] {
    ///     tree.insert(key, key.to_string());
    /// }
    ///
    /// let keys: Vec<&i32> = tree.in_order().map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&3, &5, &8]);
    /// ```
    #[must_use]
    pub fn in_order(&self) -> InOrder<'_, K, V> {
        InOrder::new(self.root.as_deref(), self.length)
    }

    /// Returns a lazy iterator over the entries root first, then the left
    /// subtree, then the right subtree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// for key in [1, 2, 3] {
    ///     tree.insert(key, ());
    /// }
    ///
    /// let keys: Vec<&i32> = tree.pre_order().map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&2, &1, &3]);
    /// ```
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        PreOrder::new(self.root.as_deref(), self.length)
    }

    /// Returns an iterator over the entries in ascending key order.
    /// Same as [`in_order`](Self::in_order).
    #[must_use]
    pub fn iter(&self) -> InOrder<'_, K, V> {
        self.in_order()
    }
}

impl<K: Ord, V> BalancedTree<K, V> {
    /// Returns a reference to the value stored under `key`.
    ///
    /// The key may be any borrowed form of the tree's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// tree.insert("hello".to_string(), 42);
    ///
    /// assert_eq!(tree.find("hello"), Some(&42));
    /// assert_eq!(tree.find("world"), None);
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match Direction::of_ordering(key.cmp(node.key.borrow())) {
                Some(direction) => current = node.child(direction).as_deref(),
                None => return Some(&node.value),
            }
        }
        None
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// tree.insert(1, 10);
    /// if let Some(value) = tree.find_mut(&1) {
    ///     *value += 5;
    /// }
    /// assert_eq!(tree.find(&1), Some(&15));
    /// ```
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match Direction::of_ordering(key.cmp(node.key.borrow())) {
                Some(direction) => current = node.child_mut(direction).as_deref_mut(),
                None => return Some(&mut node.value),
            }
        }
        None
    }

    /// Returns `true` if the tree holds a value for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is replaced in place and the
    /// previous value is returned; the tree structure does not change.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "ONE"), Some("one"));
    /// assert_eq!(tree.find(&1), Some(&"ONE"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut previous = None;
        let (root, _) = Self::insert_into_node(self.root.take(), key, value, &mut previous);
        self.root = Some(root);
        if previous.is_none() {
            self.length += 1;
        }
        previous
    }

    /// Recursive helper for insert.
    ///
    /// Returns the new subtree root and whether its height changed. Once a
    /// subtree reports no change, no ancestor can need rebalancing, so the
    /// callers above it skip their own update.
    fn insert_into_node(
        link: Link<K, V>,
        key: K,
        value: V,
        previous: &mut Option<V>,
    ) -> (Box<Node<K, V>>, bool) {
        let Some(mut node) = link else {
            return (Box::new(Node::leaf(key, value)), true);
        };

        let Some(direction) = Direction::of_ordering(key.cmp(&node.key)) else {
            *previous = Some(mem::replace(&mut node.value, value));
            return (node, false);
        };

        let (child, child_changed) =
            Self::insert_into_node(node.take_child(direction), key, value, previous);
        *node.child_mut(direction) = Some(child);

        if child_changed {
            further_update(node)
        } else {
            (node, false)
        }
    }

    /// Removes `key` from the tree, returning its value.
    ///
    /// Erasing an absent key returns `None` and leaves the tree untouched.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// tree.insert(1, "one");
    /// tree.insert(2, "two");
    ///
    /// assert_eq!(tree.erase(&1), Some("one"));
    /// assert_eq!(tree.erase(&1), None);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root.take()?;
        let (root, removed) = Self::erase_from_node(root, key);
        self.root = root;
        if removed.is_some() {
            self.length -= 1;
        }
        removed
    }

    /// Recursive helper for erase.
    ///
    /// Every ancestor of a removed node is recomputed and rebalanced, even
    /// when a lower subtree kept its height: a splice can leave an imbalance
    /// several levels above it.
    fn erase_from_node<Q>(mut node: Box<Node<K, V>>, key: &Q) -> (Link<K, V>, Option<V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(direction) = Direction::of_ordering(key.cmp(node.key.borrow())) else {
            let Node {
                value, left, right, ..
            } = *node;
            return (Self::splice(left, right), Some(value));
        };

        let Some(child) = node.take_child(direction) else {
            return (Some(node), None);
        };
        let (child, removed) = Self::erase_from_node(child, key);
        *node.child_mut(direction) = child;

        if removed.is_none() {
            return (Some(node), None);
        }
        let (node, _) = further_update(node);
        (Some(node), removed)
    }
}

impl<K, V> BalancedTree<K, V> {
    /// Joins the two subtrees of an erased node into one.
    fn splice(left: Link<K, V>, right: Link<K, V>) -> Link<K, V> {
        match (left, right) {
            (left, None) => {
                tree_event!(trace, case = "no right child", "splice");
                left
            }
            (None, right) => {
                tree_event!(trace, case = "no left child", "splice");
                right
            }
            (Some(mut left), Some(right)) if left.right.is_none() => {
                tree_event!(trace, case = "left child is predecessor", "splice");
                left.right = Some(right);
                Some(further_update(left).0)
            }
            (Some(left), Some(right)) => {
                tree_event!(trace, case = "detach predecessor", "splice");
                let (remaining, mut predecessor) = Self::detach_rightmost(left);
                predecessor.left = remaining;
                predecessor.right = Some(right);
                Some(further_update(predecessor).0)
            }
        }
    }

    /// Unlinks the rightmost node of a subtree.
    ///
    /// Returns the rebalanced remainder and the detached node, whose former
    /// left child has taken its place and which has no children left.
    fn detach_rightmost(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
        match node.take_child(Direction::Right) {
            None => (node.take_child(Direction::Left), node),
            Some(right) => {
                let (remaining, rightmost) = Self::detach_rightmost(right);
                node.right = remaining;
                (Some(further_update(node).0), rightmost)
            }
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for BalancedTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a BalancedTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = InOrder<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BalancedTree<K, V> {
    /// Trees are equal when they hold the same entries, whatever their shape.
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.in_order().eq(other.in_order())
    }
}

impl<K: Eq, V: Eq> Eq for BalancedTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BalancedTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.in_order()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for BalancedTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(BalancedTree<i32, String>: Send, Sync, Clone, Default);
static_assertions::assert_not_impl_any!(BalancedTree<i32, std::rc::Rc<i32>>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tree_of(keys: &[i32]) -> BalancedTree<i32, i32> {
        let mut tree = BalancedTree::new();
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    fn shape(link: &Link<i32, i32>) -> String {
        link.as_ref().map_or_else(
            || ".".to_string(),
            |node| {
                if node.left.is_none() && node.right.is_none() {
                    node.key.to_string()
                } else {
                    format!("({} {} {})", shape(&node.left), node.key, shape(&node.right))
                }
            },
        )
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_tree() {
        let tree: BalancedTree<i32, String> = BalancedTree::new();
        assert_eq!(format!("{tree}"), "{}");
    }

    #[rstest]
    fn test_display_is_sorted() {
        let mut tree = BalancedTree::new();
        tree.insert(3, "three");
        tree.insert(1, "one");
        tree.insert(2, "two");
        assert_eq!(format!("{tree}"), "{1: one, 2: two, 3: three}");
    }

    #[rstest]
    fn test_debug_is_map_style() {
        let tree = tree_of(&[2, 1]);
        assert_eq!(format!("{tree:?}"), "{1: 10, 2: 20}");
    }

    // =========================================================================
    // Insert Tests
    // =========================================================================

    #[rstest]
    #[case(&[1, 2, 3], "(1 2 3)")]
    #[case(&[3, 2, 1], "(1 2 3)")]
    #[case(&[1, 3, 2], "(1 2 3)")]
    #[case(&[3, 1, 2], "(1 2 3)")]
    #[case(&[5, 3, 8, 1, 4, 7, 9], "((1 3 4) 5 (7 8 9))")]
    #[case(&[1, 2, 3, 4, 5, 6, 7], "((1 2 3) 4 (5 6 7))")]
    fn test_insert_shapes(#[case] keys: &[i32], #[case] expected: &str) {
        let tree = tree_of(keys);
        assert_eq!(shape(&tree.root), expected);
    }

    #[rstest]
    fn test_insert_existing_key_keeps_shape() {
        let mut tree = tree_of(&[4, 2, 6, 1]);
        let before = shape(&tree.root);
        assert_eq!(tree.insert(1, 0), Some(10));
        assert_eq!(shape(&tree.root), before);
        assert_eq!(tree.len(), 4);
    }

    // =========================================================================
    // Erase Tests
    // =========================================================================

    #[rstest]
    fn test_erase_leaf_rebalances_parent() {
        // (1 2 (. 3 4)) -> erasing 1 leaves 2 right-heavy by two
        let mut tree = tree_of(&[2, 1, 3, 4]);
        assert_eq!(tree.erase(&1), Some(10));
        assert_eq!(shape(&tree.root), "(2 3 4)");
    }

    #[rstest]
    fn test_erase_node_without_right_child() {
        let mut tree = tree_of(&[3, 2, 4, 1]);
        tree.erase(&2);
        assert_eq!(shape(&tree.root), "(1 3 4)");
    }

    #[rstest]
    fn test_erase_node_without_left_child() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        tree.erase(&3);
        assert_eq!(shape(&tree.root), "(1 2 4)");
    }

    #[rstest]
    fn test_erase_root_when_left_child_has_no_right_child() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.erase(&2);
        assert_eq!(shape(&tree.root), "(. 1 3)");
    }

    #[rstest]
    fn test_erase_root_uses_in_order_predecessor() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        tree.erase(&4);
        assert_eq!(shape(&tree.root), "((1 2 .) 3 (5 6 7))");
    }

    #[rstest]
    fn test_erase_predecessor_with_left_child() {
        // Predecessor 4 of root 6 has a left child 3 that takes its place.
        let mut tree = tree_of(&[6, 2, 8, 1, 4, 7, 9, 3]);
        assert_eq!(shape(&tree.root), "((1 2 (3 4 .)) 6 (7 8 9))");
        tree.erase(&6);
        assert_eq!(shape(&tree.root), "((1 2 3) 4 (7 8 9))");
    }

    #[rstest]
    fn test_erase_rebalances_above_splice_point() {
        // Fibonacci-shaped tree: removing from the short side forces
        // rotations at more than one ancestor.
        let mut tree = tree_of(&[5, 3, 8, 2, 4, 7, 10, 1, 6, 9, 11, 12]);
        tree.erase(&4);
        assert!(tree.validate().is_ok());
        let keys: Vec<i32> = tree.in_order().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[rstest]
    fn test_erase_absent_key_keeps_shape() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3]);
        let before = shape(&tree.root);
        assert_eq!(tree.erase(&5), None);
        assert_eq!(shape(&tree.root), before);
        assert_eq!(tree.len(), 5);
    }

    #[rstest]
    fn test_erase_on_empty_tree() {
        let mut tree: BalancedTree<i32, i32> = BalancedTree::new();
        assert_eq!(tree.erase(&1), None);
        assert!(tree.is_empty());
    }

    #[rstest]
    fn test_erase_with_borrowed_key() {
        let mut tree = BalancedTree::new();
        tree.insert("alpha".to_string(), 1);
        tree.insert("beta".to_string(), 2);
        assert_eq!(tree.erase("alpha"), Some(1));
        assert!(!tree.contains_key("alpha"));
    }

    // =========================================================================
    // Housekeeping Tests
    // =========================================================================

    #[rstest]
    fn test_clear_empties_tree() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.find(&1), None);
    }

    #[rstest]
    fn test_equality_ignores_shape() {
        let ascending = tree_of(&[1, 2, 3, 4]);
        let mut erased = tree_of(&[1, 2, 3, 4, 5]);
        erased.erase(&5);
        assert_eq!(ascending, erased);
        erased.insert(4, 0);
        assert_ne!(ascending, erased);
    }

    #[rstest]
    fn test_clone_is_independent() {
        let original = tree_of(&[1, 2, 3]);
        let mut copy = original.clone();
        copy.erase(&2);
        assert_eq!(original.len(), 3);
        assert_eq!(copy.len(), 2);
        assert_eq!(original.find(&2), Some(&20));
    }
}
