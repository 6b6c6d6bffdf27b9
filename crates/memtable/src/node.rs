//! AVL node and the recursive insert/delete/rebalance primitives.
//!
//! Every mutating function takes ownership of a subtree and hands back its
//! (possibly new) root; the caller reattaches it. Nodes own their children
//! outright and carry no parent pointers.

use std::cmp::Ordering;
use std::mem;

pub(crate) type Link = Option<Box<Node>>;

/// A single key/value node of the AVL tree.
#[derive(Debug, Clone)]
pub struct Node {
    key: i64,
    value: Vec<u8>,
    /// Height of the subtree rooted here; a leaf has height 1.
    height: u32,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    fn leaf(key: i64, value: Vec<u8>) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[must_use]
    pub fn key(&self) -> i64 {
        self.key
    }

    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    #[must_use]
    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// `height(left) - height(right)`.
    #[must_use]
    pub fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

pub(crate) fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

fn balance_of(link: &Link) -> i64 {
    link.as_ref().map_or(0, |n| n.balance_factor())
}

/// Lifts the right child above `node`. The pivot's left subtree moves over
/// to become `node`'s right subtree.
fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Mirror of [`rotate_left`].
fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// Recomputes `node`'s height and restores the AVL property with at most two
/// rotations. Children must already be balanced.
fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // LR: straighten the left child first
        if balance_of(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // RL
        if balance_of(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Inserts `(key, value)` under `link`. Returns the new subtree root and the
/// previous value if `key` was already present (overwritten in place).
pub(crate) fn insert(link: Link, key: i64, value: Vec<u8>) -> (Box<Node>, Option<Vec<u8>>) {
    let Some(mut node) = link else {
        return (Node::leaf(key, value), None);
    };

    let previous = match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, previous) = insert(node.left.take(), key, value);
            node.left = Some(child);
            previous
        }
        Ordering::Greater => {
            let (child, previous) = insert(node.right.take(), key, value);
            node.right = Some(child);
            previous
        }
        Ordering::Equal => {
            let previous = mem::replace(&mut node.value, value);
            return (node, Some(previous));
        }
    };

    (rebalance(node), previous)
}

/// Removes `key` from under `link`. Returns the new subtree root and the
/// removed value, or `None` if the key was absent.
pub(crate) fn delete(link: Link, key: i64) -> (Link, Option<Vec<u8>>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, removed) = delete(node.left.take(), key);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = delete(node.right.take(), key);
            node.right = child;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => return (None, Some(mem::take(&mut node.value))),
            (Some(child), None) | (None, Some(child)) => {
                return (Some(child), Some(mem::take(&mut node.value)));
            }
            (Some(left), Some(right)) => {
                // Two children: adopt the in-order successor's entry and
                // remove the successor from the right subtree.
                let (right, successor) = take_min(right);
                node.left = Some(left);
                node.right = right;
                node.key = successor.key;
                Some(mem::replace(&mut node.value, successor.value))
            }
        },
    };

    (Some(rebalance(node)), removed)
}

/// Detaches the minimum node of the subtree, rebalancing the path back up.
/// Returns the remaining subtree and the detached node.
fn take_min(mut node: Box<Node>) -> (Link, Box<Node>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        }
        Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            (Some(rebalance(node)), min)
        }
    }
}
