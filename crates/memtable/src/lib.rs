//! # Memtable
//!
//! The sorted in-memory tier of RiptideKV: an AVL tree mapping `i64` keys to
//! byte values. Every insert and delete rebalances the path it touched, so
//! the tree height stays within `1.44 * log2(n + 2)`.
//!
//! ```rust
//! use memtable::Memtable;
//!
//! let mut m = Memtable::new();
//! m.insert(2, b"two".to_vec());
//! m.insert(1, b"one".to_vec());
//! assert_eq!(m.get(1), Some(b"one".as_slice()));
//! assert_eq!(m.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![1, 2]);
//! ```
mod iter;
mod node;
mod shared;

pub use iter::{Iter, Range};
pub use node::Node;
pub use shared::SharedMemtable;

use node::Link;
use std::fmt;
use std::ops::RangeBounds;

/// Approximate per-key overhead counted by [`Memtable::approx_size`].
const KEY_BYTES: usize = std::mem::size_of::<i64>();

/// Order in which [`Memtable::traverse`] visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// left, node, right (ascending keys)
    #[default]
    Inorder,
    /// node, left, right
    Preorder,
    /// left, right, node
    Postorder,
}

/// Self-balancing ordered index of `key -> value`.
#[derive(Default, Clone)]
pub struct Memtable {
    root: Link,
    len: usize,
    approx_size: usize,
}

impl Memtable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`. Returns the previous value if the key was
    /// already present; an overwrite leaves the tree shape untouched.
    pub fn insert(&mut self, key: i64, value: Vec<u8>) -> Option<Vec<u8>> {
        let added = value.len();
        let (root, previous) = node::insert(self.root.take(), key, value);
        self.root = Some(root);

        match &previous {
            Some(old) => {
                self.approx_size = self.approx_size.saturating_sub(old.len()) + added;
            }
            None => {
                self.len += 1;
                self.approx_size += KEY_BYTES + added;
            }
        }
        previous
    }

    /// Returns the node holding `key`, if any.
    #[must_use]
    pub fn search(&self, key: i64) -> Option<&Node> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.key()) {
                std::cmp::Ordering::Less => node.left(),
                std::cmp::Ordering::Greater => node.right(),
                std::cmp::Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&[u8]> {
        self.search(key).map(Node::value)
    }

    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.search(key).is_some()
    }

    /// Removes `key`, returning its value. Deleting an absent key is a no-op.
    pub fn delete(&mut self, key: i64) -> Option<Vec<u8>> {
        let (root, removed) = node::delete(self.root.take(), key);
        self.root = root;

        if let Some(ref value) = removed {
            self.len -= 1;
            self.approx_size = self.approx_size.saturating_sub(KEY_BYTES + value.len());
        }
        removed
    }

    /// Ascending `(key, value)` iterator. Each call starts a new pass.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Ascending `(key, value)` pairs whose keys fall within `range`. Seeks
    /// the start bound without visiting smaller keys.
    pub fn range<R: RangeBounds<i64>>(&self, range: R) -> Range<'_> {
        Range::new(
            self.root.as_deref(),
            range.start_bound().cloned(),
            range.end_bound().cloned(),
        )
    }

    /// Keys in the requested visiting order. Debugging aid.
    #[must_use]
    pub fn traverse(&self, order: TraversalOrder) -> Vec<i64> {
        fn walk(link: Option<&Node>, order: TraversalOrder, out: &mut Vec<i64>) {
            let Some(node) = link else { return };
            if order == TraversalOrder::Preorder {
                out.push(node.key());
            }
            walk(node.left(), order, out);
            if order == TraversalOrder::Inorder {
                out.push(node.key());
            }
            walk(node.right(), order, out);
            if order == TraversalOrder::Postorder {
                out.push(node.key());
            }
        }

        let mut out = Vec::with_capacity(self.len);
        walk(self.root.as_deref(), order, &mut out);
        out
    }

    /// Root node, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Height of the tree (0 when empty).
    #[must_use]
    pub fn height(&self) -> u32 {
        node::height(&self.root)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Approximate memory footprint: 8 bytes per key plus value bytes.
    pub fn approx_size(&self) -> usize {
        self.approx_size
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.approx_size = 0;
    }
}

impl<'a> IntoIterator for &'a Memtable {
    type Item = (i64, &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Memtable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memtable")
            .field("len", &self.len)
            .field("height", &self.height())
            .field("approx_size", &self.approx_size)
            .finish()
    }
}

/// Space-separated in-order keys, e.g. `1 2 5`.
impl fmt::Display for Memtable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, _)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
