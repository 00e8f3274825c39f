//! Height-balanced (AVL) ordered map.
//!
//! This module provides [`BalancedTree`], a mutable ordered map backed by an
//! AVL tree whose nodes own their children directly:
//!
//! - [`BalancedTree`]: the container (insert, erase, find)
//! - [`InOrder`] / [`PreOrder`]: lazy depth-first traversals
//! - [`NodeRef`]: read-only view of a node, for inspecting tree shape
//! - [`InvariantViolation`]: returned by [`BalancedTree::validate`]
//!
//! # Balancing
//!
//! Every node caches the height of its subtree. After each structural
//! mutation, the nodes on the path back to the root recompute their height
//! and compare the heights of their two subtrees. A node whose subtrees
//! differ by more than one level is restored with a single or double
//! rotation, so the tree height stays within `1.44 * log2(n + 2)`.
//!
//! # Examples
//!
//! ```rust
//! use balanced_tree::tree::BalancedTree;
//!
//! let mut tree = BalancedTree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key, key * 10);
//! }
//!
//! assert_eq!(tree.find(&4), Some(&40));
//! assert_eq!(tree.erase(&5), Some(50));
//!
//! let keys: Vec<i32> = tree.in_order().map(|(key, _)| *key).collect();
//! assert_eq!(keys, vec![1, 3, 4, 7, 8, 9]);
//! assert!(tree.validate().is_ok());
//! ```

/// Emits a `tracing` event when the `tracing` feature is enabled.
///
/// Expands to nothing otherwise, so call sites need no `cfg` of their own.
macro_rules! tree_event {
    ($level:ident, $($argument:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::$level!(target: "balanced_tree", $($argument)*);
    };
}

mod error;
mod map;
mod node;
mod traversal;
mod validate;

pub use error::InvariantViolation;
pub use map::BalancedTree;
pub use traversal::InOrder;
pub use traversal::NodeRef;
pub use traversal::PreOrder;
