use crate::node::Node;
use std::ops::Bound;

/// Lazy in-order iterator over a [`Memtable`](crate::Memtable), yielding
/// `(key, value)` pairs in ascending key order.
///
/// Holds at most `height` node references at a time. Calling
/// [`Memtable::iter`](crate::Memtable::iter) again starts a fresh pass.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(root: Option<&'a Node>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i64, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl std::iter::FusedIterator for Iter<'_> {}

/// Lazy in-order iterator over the keys of a [`Memtable`](crate::Memtable)
/// that fall within a range.
///
/// Construction seeks the start bound in `O(height)`; iteration stops at the
/// first key past the end bound.
pub struct Range<'a> {
    stack: Vec<&'a Node>,
    end: Bound<i64>,
}

impl<'a> Range<'a> {
    pub(crate) fn new(root: Option<&'a Node>, start: Bound<i64>, end: Bound<i64>) -> Self {
        let mut stack = Vec::new();
        let mut link = root;
        // keep only nodes at or after the start; they are the left spines of
        // every subtree still to be visited
        while let Some(node) = link {
            let after_start = match start {
                Bound::Included(s) => node.key() >= s,
                Bound::Excluded(s) => node.key() > s,
                Bound::Unbounded => true,
            };
            if after_start {
                stack.push(node);
                link = node.left();
            } else {
                link = node.right();
            }
        }
        Self { stack, end }
    }

    fn before_end(&self, key: i64) -> bool {
        match self.end {
            Bound::Included(e) => key <= e,
            Bound::Excluded(e) => key < e,
            Bound::Unbounded => true,
        }
    }
}

impl<'a> Iterator for Range<'a> {
    type Item = (i64, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if !self.before_end(node.key()) {
            self.stack.clear();
            return None;
        }
        let mut link = node.right();
        while let Some(n) = link {
            self.stack.push(n);
            link = n.left();
        }
        Some((node.key(), node.value()))
    }
}

impl std::iter::FusedIterator for Range<'_> {}
