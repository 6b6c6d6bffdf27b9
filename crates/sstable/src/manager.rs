use anyhow::{Context, Result};
use bloom::BloomFilter;
use config::StoreConfig;
use memtable::Memtable;
use tracing::{debug, trace};

use crate::{entries_from_memtable, SSTEntry, SSTable, DEFAULT_BLOOM_FPR};

/// Owns a set of SSTable runs and one cumulative bloom filter over all of
/// their keys.
///
/// # Read Path
///
/// 1. Ask the bloom filter. "Definitely absent" returns immediately without
///    touching any run.
/// 2. Otherwise check runs from newest to oldest.
/// 3. The first entry for the key wins; a tombstone hides every older value.
///
/// The filter only ever grows: keys of replaced runs and tombstoned keys stay
/// "possibly present" for the life of the manager.
pub struct SSTableManager {
    bloom: BloomFilter,
    /// Ordered oldest -> newest.
    files: Vec<SSTable>,
    /// Sequence number handed to the next added file.
    next_seq: u64,
}

impl SSTableManager {
    /// Creates an empty manager whose bloom filter is sized for
    /// `bloom_capacity` keys at [`DEFAULT_BLOOM_FPR`].
    ///
    /// # Errors
    ///
    /// Returns an error if `bloom_capacity` is 0.
    pub fn new(bloom_capacity: usize) -> Result<Self> {
        let bloom = BloomFilter::new(bloom_capacity, DEFAULT_BLOOM_FPR)
            .with_context(|| format!("sizing bloom filter for {} keys", bloom_capacity))?;
        Ok(Self::with_bloom(bloom))
    }

    /// Creates an empty manager with bloom sizing from `cfg`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured sizing is degenerate.
    pub fn from_config(cfg: &StoreConfig) -> Result<Self> {
        let bloom = BloomFilter::new(cfg.bloom_capacity, cfg.bloom_false_positive_rate)
            .with_context(|| {
                format!(
                    "sizing bloom filter (capacity={}, fpr={})",
                    cfg.bloom_capacity, cfg.bloom_false_positive_rate
                )
            })?;
        Ok(Self::with_bloom(bloom))
    }

    /// Creates an empty manager around an existing filter.
    pub fn with_bloom(bloom: BloomFilter) -> Self {
        Self {
            bloom,
            files: Vec::new(),
            next_seq: 0,
        }
    }

    /// Adds the run `name`, making it the newest. A run already registered
    /// under `name` is dropped first (no merge). Every entry's key, tombstones
    /// included, goes into the bloom filter.
    pub fn add_file(&mut self, name: impl Into<String>, entries: Vec<SSTEntry>) {
        let name = name.into();
        let before = self.files.len();
        self.files.retain(|f| f.name() != name);
        let replaced = self.files.len() != before;

        for entry in &entries {
            self.bloom.add(entry.key.as_str());
        }

        let table = SSTable::new(name, self.next_seq, entries);
        self.next_seq += 1;
        debug!(
            file = table.name(),
            seq = table.seq(),
            entries = table.len(),
            tombstones = table.tombstone_count(),
            sorted = table.is_sorted(),
            replaced,
            "sstable file added"
        );
        self.files.push(table);
    }

    /// Seals `mem` into a new run named `name`. `encode_key` turns each
    /// memtable key into the run's string key; it should preserve ordering
    /// if the run is to be searched by binary search.
    pub fn flush_memtable<F>(&mut self, name: impl Into<String>, mem: &Memtable, encode_key: F)
    where
        F: FnMut(i64) -> String,
    {
        self.add_file(name, entries_from_memtable(mem, encode_key));
    }

    /// Returns the live value for `key`, or `None` if it was never written,
    /// is shadowed by a newer tombstone, or the filter rules it out.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.get_entry(key).and_then(SSTEntry::live_value)
    }

    /// Returns the winning entry for `key` (newest run first), tombstones
    /// included.
    #[must_use]
    pub fn get_entry(&self, key: &str) -> Option<&SSTEntry> {
        if !self.bloom.exists(key) {
            trace!(key, "bloom filter rejected key");
            return None;
        }

        let entry = self.files.iter().rev().find_map(|f| f.find(key))?;
        if entry.deleted {
            trace!(key, "key resolved to tombstone");
        }
        Some(entry)
    }

    /// Returns `true` if a run named `name` is registered.
    #[must_use]
    pub fn contains_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name() == name)
    }

    /// Looks up a run by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&SSTable> {
        self.files.iter().find(|f| f.name() == name)
    }

    /// Names of all runs, newest first.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().rev().map(SSTable::name)
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn bloom(&self) -> &BloomFilter {
        &self.bloom
    }
}

impl std::fmt::Debug for SSTableManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SSTableManager")
            .field("file_count", &self.files.len())
            .field("next_seq", &self.next_seq)
            .field("bloom", &self.bloom)
            .finish()
    }
}
