//! Depth-first traversals and the read-only node view.

use std::fmt;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::node::Node;

/// Traversal stacks never hold more nodes than the tree is tall; trees of
/// up to a few million entries fit inline.
const INLINE_DEPTH: usize = 32;

type NodeStack<'a, K, V> = SmallVec<[&'a Node<K, V>; INLINE_DEPTH]>;

// =============================================================================
// InOrder
// =============================================================================

/// Iterator over the entries of a [`BalancedTree`] in ascending key order.
///
/// Created by [`BalancedTree::in_order`]. Nodes are visited lazily with an
/// explicit stack. A clone continues from the same position independently.
///
/// [`BalancedTree`]: super::BalancedTree
/// [`BalancedTree::in_order`]: super::BalancedTree::in_order
pub struct InOrder<'a, K, V> {
    stack: NodeStack<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> InOrder<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for InOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for InOrder<'_, K, V> {}

impl<K, V> Clone for InOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// PreOrder
// =============================================================================

/// Iterator over the entries of a [`BalancedTree`], each node before its
/// left subtree and its left subtree before its right subtree.
///
/// Created by [`BalancedTree::pre_order`]. Mostly useful for looking at the
/// shape of a tree: the first entry is always the root.
///
/// [`BalancedTree`]: super::BalancedTree
/// [`BalancedTree::pre_order`]: super::BalancedTree::pre_order
pub struct PreOrder<'a, K, V> {
    stack: NodeStack<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> PreOrder<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, length: usize) -> Self {
        Self {
            stack: root.into_iter().collect(),
            remaining: length,
        }
    }
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PreOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

impl<K, V> Clone for PreOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// NodeRef
// =============================================================================

/// A read-only view of one node of a [`BalancedTree`].
///
/// Obtained from [`BalancedTree::root`] and walked with [`left`](Self::left)
/// and [`right`](Self::right).
///
/// [`BalancedTree`]: super::BalancedTree
/// [`BalancedTree::root`]: super::BalancedTree::root
pub struct NodeRef<'a, K, V> {
    node: &'a Node<K, V>,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) const fn new(node: &'a Node<K, V>) -> Self {
        Self { node }
    }

    /// The key stored in this node.
    #[must_use]
    pub const fn key(&self) -> &'a K {
        &self.node.key
    }

    /// The value stored in this node.
    #[must_use]
    pub const fn value(&self) -> &'a V {
        &self.node.value
    }

    /// The cached height of the subtree rooted here; 1 for a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.node.height)
    }

    /// Right subtree height minus left subtree height, from cached heights.
    #[must_use]
    pub fn balance_factor(&self) -> i16 {
        self.node.balance()
    }

    /// The left child, if any.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.node.left.as_deref().map(Self::new)
    }

    /// The right child, if any.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.node.right.as_deref().map(Self::new)
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("key", &self.node.key)
            .field("value", &self.node.value)
            .field("height", &self.node.height)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::BalancedTree;
    use rstest::rstest;

    fn tree_of(keys: &[i32]) -> BalancedTree<i32, i32> {
        let mut tree = BalancedTree::new();
        for &key in keys {
            tree.insert(key, -key);
        }
        tree
    }

    #[rstest]
    fn test_in_order_on_empty_tree() {
        let tree: BalancedTree<i32, i32> = BalancedTree::new();
        assert_eq!(tree.in_order().next(), None);
        assert_eq!(tree.pre_order().next(), None);
    }

    #[rstest]
    fn test_in_order_is_ascending() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let keys: Vec<i32> = tree.in_order().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[rstest]
    fn test_pre_order_is_root_first() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let keys: Vec<i32> = tree.pre_order().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![5, 3, 1, 4, 8, 7, 9]);
    }

    #[rstest]
    fn test_traversals_yield_values() {
        let tree = tree_of(&[2, 1]);
        let entries: Vec<(i32, i32)> = tree.in_order().map(|(key, value)| (*key, *value)).collect();
        assert_eq!(entries, vec![(1, -1), (2, -2)]);
    }

    #[rstest]
    fn test_exact_size_counts_down() {
        let tree = tree_of(&[1, 2, 3, 4]);
        let mut iterator = tree.in_order();
        assert_eq!(iterator.len(), 4);
        iterator.next();
        assert_eq!(iterator.len(), 3);
        assert_eq!(tree.pre_order().len(), 4);
    }

    #[rstest]
    fn test_clone_forks_traversal() {
        let tree = tree_of(&[1, 2, 3]);
        let mut iterator = tree.in_order();
        iterator.next();
        let forked: Vec<i32> = iterator.clone().map(|(key, _)| *key).collect();
        let rest: Vec<i32> = iterator.map(|(key, _)| *key).collect();
        assert_eq!(forked, rest);
        assert_eq!(rest, vec![2, 3]);
    }

    #[rstest]
    fn test_traversal_is_restartable() {
        let tree = tree_of(&[3, 1, 2]);
        let first: Vec<i32> = tree.in_order().map(|(key, _)| *key).collect();
        let second: Vec<i32> = tree.in_order().map(|(key, _)| *key).collect();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_iterators_are_fused() {
        let tree = tree_of(&[1]);
        let mut iterator = tree.pre_order();
        assert!(iterator.next().is_some());
        assert!(iterator.next().is_none());
        assert!(iterator.next().is_none());
    }

    #[rstest]
    fn test_node_ref_walks_children() {
        let tree = tree_of(&[1, 2, 3]);
        let root = tree.root().expect("non-empty tree has a root");
        assert_eq!(root.key(), &2);
        assert_eq!(root.value(), &-2);
        assert_eq!(root.height(), 2);
        assert_eq!(root.balance_factor(), 0);

        let left = root.left().expect("left child");
        assert_eq!((left.key(), left.height()), (&1, 1));
        assert!(left.left().is_none() && left.right().is_none());
        let right = root.right().expect("right child");
        assert_eq!((right.key(), right.height()), (&3, 1));
    }

    #[rstest]
    fn test_node_ref_debug() {
        let tree = tree_of(&[7]);
        let root = tree.root().expect("root");
        assert_eq!(
            format!("{root:?}"),
            "NodeRef { key: 7, value: -7, height: 1 }"
        );
    }
}
