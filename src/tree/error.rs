//! Error type reported by the full-tree consistency check.

/// A broken structural invariant found by [`BalancedTree::validate`].
///
/// None of these can occur through the public API; seeing one means the
/// balancing logic has a bug. Depths count from the root at depth 0, and
/// positions count entries in key order from 0.
///
/// [`BalancedTree::validate`]: super::BalancedTree::validate
///
/// # Examples
///
/// ```rust
/// use balanced_tree::tree::InvariantViolation;
///
/// let violation = InvariantViolation::Unbalanced { depth: 2, balance: -2 };
/// assert_eq!(
///     format!("{violation}"),
///     "node at depth 2 has balance factor -2, expected -1, 0 or 1"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A node's cached height disagrees with the height of its subtree.
    StaleHeight {
        /// Depth of the offending node.
        depth: usize,
        /// The height stored in the node.
        cached: usize,
        /// One more than the taller child's height.
        actual: usize,
    },
    /// A node's subtrees differ in height by more than one.
    Unbalanced {
        /// Depth of the offending node.
        depth: usize,
        /// Right subtree height minus left subtree height.
        balance: i16,
    },
    /// In-order traversal produced a key not greater than its predecessor.
    KeysOutOfOrder {
        /// Position of the first key that is not strictly ascending.
        position: usize,
    },
    /// The recorded element count disagrees with the number of nodes.
    LengthMismatch {
        /// The count maintained by insert and erase.
        recorded: usize,
        /// The number of nodes reachable from the root.
        counted: usize,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleHeight {
                depth,
                cached,
                actual,
            } => write!(
                formatter,
                "node at depth {depth} caches height {cached}, actual height is {actual}"
            ),
            Self::Unbalanced { depth, balance } => write!(
                formatter,
                "node at depth {depth} has balance factor {balance}, expected -1, 0 or 1"
            ),
            Self::KeysOutOfOrder { position } => write!(
                formatter,
                "key at in-order position {position} is not greater than its predecessor"
            ),
            Self::LengthMismatch { recorded, counted } => write!(
                formatter,
                "tree records {recorded} entries but holds {counted} nodes"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
