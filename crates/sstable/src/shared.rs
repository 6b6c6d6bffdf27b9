use parking_lot::RwLock;
use std::sync::Arc;

use crate::{SSTEntry, SSTableManager};

/// An [`SSTableManager`] shared across threads.
///
/// One lock guards the run list and the bloom filter together, so a reader
/// never sees a file whose keys are missing from the filter (or the reverse).
/// `add_file` holds the write lock for its whole duration, `get` the read lock.
#[derive(Debug, Clone)]
pub struct SharedSSTableManager {
    inner: Arc<RwLock<SSTableManager>>,
}

impl SharedSSTableManager {
    pub fn new(manager: SSTableManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    pub fn add_file(&self, name: impl Into<String>, entries: Vec<SSTEntry>) {
        self.inner.write().add_file(name, entries);
    }

    /// Returns an owned copy of the live value for `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.read().get(key).map(<[u8]>::to_vec)
    }

    pub fn file_count(&self) -> usize {
        self.inner.read().file_count()
    }

    /// Runs `f` with shared access to the manager.
    pub fn with_read<R>(&self, f: impl FnOnce(&SSTableManager) -> R) -> R {
        f(&self.inner.read())
    }
}

impl From<SSTableManager> for SharedSSTableManager {
    fn from(manager: SSTableManager) -> Self {
        Self::new(manager)
    }
}
