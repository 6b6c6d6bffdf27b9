use crate::SSTEntry;

/// An immutable, named run of entries.
///
/// Entries keep the order they were handed in. Runs that arrive sorted by key
/// are searched with a binary search; unsorted runs fall back to a linear
/// scan. Either way the first entry for a key in file order is the one found.
#[derive(Debug, Clone)]
pub struct SSTable {
    name: String,
    /// Position in the manager's recency order; higher is newer.
    seq: u64,
    entries: Vec<SSTEntry>,
    sorted: bool,
}

impl SSTable {
    pub(crate) fn new(name: String, seq: u64, entries: Vec<SSTEntry>) -> Self {
        let sorted = entries.windows(2).all(|w| w[0].key <= w[1].key);
        Self {
            name,
            seq,
            entries,
            sorted,
        }
    }

    /// First entry for `key` in file order (live or tombstone).
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&SSTEntry> {
        if self.sorted {
            let idx = self.entries.partition_point(|e| e.key.as_str() < key);
            self.entries.get(idx).filter(|e| e.key == key)
        } else {
            self.entries.iter().find(|e| e.key == key)
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn entries(&self) -> &[SSTEntry] {
        &self.entries
    }

    /// Returns `true` if the entries are in non-decreasing key order.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tombstones in the run.
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        self.entries.iter().filter(|e| e.deleted).count()
    }
}
