//! Full-tree consistency check.

use super::error::InvariantViolation;
use super::map::BalancedTree;
use super::traversal::NodeRef;

impl<K: Ord, V> BalancedTree<K, V> {
    /// Walks the whole tree and checks every structural invariant.
    ///
    /// Checks, in this order: every cached height equals one more than the
    /// taller child's height, every balance factor lies in `-1..=1`, keys
    /// ascend strictly in order, and the recorded length matches the node
    /// count. Returns the first violation found.
    ///
    /// The public API never produces an invalid tree; this exists for tests
    /// and debugging.
    ///
    /// # Errors
    ///
    /// Returns the [`InvariantViolation`] describing the first broken
    /// invariant.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedTree;
    ///
    /// let mut tree = BalancedTree::new();
    /// for key in 0..100 {
    ///     tree.insert(key, ());
    /// }
    /// for key in (0..100).step_by(3) {
    ///     tree.erase(&key);
    /// }
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let (_, counted) = self
            .root()
            .map_or(Ok((0, 0)), |root| check_subtree(root, 0))?;

        let mut keys = self.in_order().map(|(key, _)| key).enumerate();
        if let Some((_, first)) = keys.next() {
            let mut previous = first;
            for (position, key) in keys {
                if key <= previous {
                    return Err(InvariantViolation::KeysOutOfOrder { position });
                }
                previous = key;
            }
        }

        if counted != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.len(),
                counted,
            });
        }
        Ok(())
    }
}

/// Returns the actual height and node count of the subtree under `node`.
fn check_subtree<K, V>(
    node: NodeRef<'_, K, V>,
    depth: usize,
) -> Result<(usize, usize), InvariantViolation> {
    let (left_height, left_count) = node
        .left()
        .map_or(Ok((0, 0)), |child| check_subtree(child, depth + 1))?;
    let (right_height, right_count) = node
        .right()
        .map_or(Ok((0, 0)), |child| check_subtree(child, depth + 1))?;

    let actual = 1 + left_height.max(right_height);
    if node.height() != actual {
        return Err(InvariantViolation::StaleHeight {
            depth,
            cached: node.height(),
            actual,
        });
    }

    // Children's cached heights are verified above, so this is exact.
    let balance = node.balance_factor();
    if !(-1..=1).contains(&balance) {
        return Err(InvariantViolation::Unbalanced { depth, balance });
    }

    Ok((actual, 1 + left_count + right_count))
}
