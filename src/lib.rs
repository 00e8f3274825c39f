//! # balanced-tree
//!
//! An ordered map backed by a height-balanced (AVL) binary search tree.
//!
//! ## Overview
//!
//! [`BalancedTree`](tree::BalancedTree) stores unique, totally ordered keys
//! with their values. Insert, erase, and lookup run in O(log N) worst case:
//! every node caches its subtree height, and each mutation rotates the nodes
//! on its path back into balance before returning.
//!
//! - **Ownership**: each node owns its two children; there are no parent
//!   pointers and no shared nodes, so the tree is plain safe Rust.
//! - **Traversal**: lazy in-order and pre-order iterators.
//! - **Diagnostics**: [`BalancedTree::validate`](tree::BalancedTree::validate)
//!   and [`NodeRef`](tree::NodeRef) expose the structure for tests.
//!
//! ## Feature Flags
//!
//! - `tracing` (default): emit `tracing` events for rotations, erase
//!   splices, and `clear`
//!
//! ## Example
//!
//! ```rust
//! use balanced_tree::prelude::*;
//!
//! let mut tree = BalancedTree::new();
//! for key in 1..=7 {
//!     tree.insert(key, key * key);
//! }
//!
//! assert_eq!(tree.find(&3), Some(&9));
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.erase(&4), Some(16));
//! assert_eq!(tree.size(), 6);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the public types of [`tree`].
///
/// # Usage
///
/// ```rust
/// use balanced_tree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::tree::*;
}

pub mod tree;
