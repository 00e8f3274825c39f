//! Node storage and the rebalancing primitives shared by insert and erase.

use std::cmp::Ordering;

// =============================================================================
// Node Definition
// =============================================================================

/// An owned, possibly empty, subtree.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A tree node owning both of its children.
///
/// `height` caches the height of the subtree rooted here: a leaf has height 1
/// and an absent child counts as 0. An AVL tree of height `h` holds at least
/// `Fib(h + 2) - 1` nodes, so no addressable tree comes close to `u8::MAX`.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) height: u8,
}

/// Which child of a node, or which way a rotation turns.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    /// The other side.
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The child a search for a key ordered `ordering` relative to the node
    /// key descends into. `None` on a match.
    pub(crate) const fn of_ordering(ordering: Ordering) -> Option<Self> {
        match ordering {
            Ordering::Less => Some(Self::Left),
            Ordering::Greater => Some(Self::Right),
            Ordering::Equal => None,
        }
    }
}

/// Height of a subtree; 0 when absent.
pub(crate) fn height<K, V>(link: &Link<K, V>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

impl<K, V> Node<K, V> {
    /// Creates a leaf of height 1.
    pub(crate) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    pub(crate) const fn child(&self, direction: Direction) -> &Link<K, V> {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    pub(crate) const fn child_mut(&mut self, direction: Direction) -> &mut Link<K, V> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Detaches and returns one child, leaving the slot empty.
    pub(crate) const fn take_child(&mut self, direction: Direction) -> Link<K, V> {
        self.child_mut(direction).take()
    }

    /// The height this node should have given its children's cached heights.
    pub(crate) fn computed_height(&self) -> u8 {
        1 + height(&self.left).max(height(&self.right))
    }

    /// Refreshes the cached height. Returns `true` if it changed.
    pub(crate) fn update_height(&mut self) -> bool {
        let new_height = self.computed_height();
        let changed = new_height != self.height;
        self.height = new_height;
        changed
    }

    /// Right subtree height minus left subtree height.
    pub(crate) fn balance(&self) -> i16 {
        i16::from(height(&self.right)) - i16::from(height(&self.left))
    }
}

// =============================================================================
// Rotation and Rebalancing
// =============================================================================

/// Rotates the subtree rooted at `root` toward `direction`.
///
/// The child on the opposite side (the pivot) becomes the new root, the
/// pivot's inner child is re-parented under the old root, and the old root
/// becomes the pivot's `direction` child. Heights are refreshed old root
/// first, since the new root's height depends on it.
///
/// A rotation toward `Left` is the classic left rotation used on a
/// right-heavy node, and vice versa.
pub(crate) fn rotate<K, V>(mut root: Box<Node<K, V>>, direction: Direction) -> Box<Node<K, V>> {
    let heavy = direction.opposite();
    let Some(mut pivot) = root.take_child(heavy) else {
        return root;
    };
    tree_event!(trace, direction = ?direction, "rotate");

    *root.child_mut(heavy) = pivot.take_child(direction);
    root.update_height();
    *pivot.child_mut(direction) = Some(root);
    pivot.update_height();
    pivot
}

/// Restores the balance bound at `node`, whose children are already valid
/// AVL trees differing in height by at most two.
///
/// Rotates once when the heavy child leans the same way (or not at all),
/// twice when it leans inward. Without a violation, only the cached height
/// is refreshed.
pub(crate) fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let balance = node.balance();
    let heavy = if balance > 1 {
        Direction::Right
    } else if balance < -1 {
        Direction::Left
    } else {
        node.update_height();
        return node;
    };

    if let Some(child) = node.take_child(heavy) {
        let leans_inward = match heavy {
            Direction::Right => child.balance() < 0,
            Direction::Left => child.balance() > 0,
        };
        *node.child_mut(heavy) = Some(if leans_inward {
            rotate(child, heavy)
        } else {
            child
        });
    }
    rotate(node, heavy.opposite())
}

/// Recomputes `node` after one of its subtrees changed and rebalances it.
///
/// Returns the new subtree root together with the height-changed signal:
/// `true` when the subtree's height differs from what `node` had cached
/// before the step, meaning the parent must run this step too.
pub(crate) fn further_update<K, V>(node: Box<Node<K, V>>) -> (Box<Node<K, V>>, bool) {
    let previous_height = node.height;
    let node = rebalance(node);

    debug_assert_eq!(node.height, node.computed_height());
    debug_assert!((-1..=1).contains(&node.balance()));

    let changed = node.height != previous_height;
    (node, changed)
}

// =============================================================================
// Tests
// =============================================================================
