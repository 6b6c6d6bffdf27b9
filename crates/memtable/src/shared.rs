use parking_lot::RwLock;
use std::sync::Arc;

use crate::Memtable;

/// A [`Memtable`] shared across threads.
///
/// Writers (`insert`, `delete`, `clear`) take the exclusive lock, readers take
/// the shared lock. Reads return owned data so no guard outlives the call.
#[derive(Debug, Clone, Default)]
pub struct SharedMemtable {
    inner: Arc<RwLock<Memtable>>,
}

impl SharedMemtable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: i64, value: Vec<u8>) -> Option<Vec<u8>> {
        self.inner.write().insert(key, value)
    }

    pub fn delete(&self, key: i64) -> Option<Vec<u8>> {
        self.inner.write().delete(key)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn get(&self, key: i64) -> Option<Vec<u8>> {
        self.inner.read().get(key).map(<[u8]>::to_vec)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copies out every entry in ascending key order under one read lock.
    pub fn snapshot(&self) -> Vec<(i64, Vec<u8>)> {
        self.inner
            .read()
            .iter()
            .map(|(k, v)| (k, v.to_vec()))
            .collect()
    }

    /// Runs `f` with shared access to the whole table.
    pub fn with_read<R>(&self, f: impl FnOnce(&Memtable) -> R) -> R {
        f(&self.inner.read())
    }

    /// Swaps in an empty table and returns the old contents, e.g. to seal
    /// it for a flush.
    pub fn take(&self) -> Memtable {
        std::mem::take(&mut *self.inner.write())
    }
}
