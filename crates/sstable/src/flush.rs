use memtable::Memtable;

use crate::SSTEntry;

/// Converts a sealed [`Memtable`] into SSTable entries in ascending memtable
/// key order.
///
/// The memtable holds no tombstones, so every entry is live. How integer keys
/// become string keys is up to `encode_key`; an order-preserving encoding
/// (e.g. fixed-width, sign-adjusted) keeps the resulting run sorted.
pub fn entries_from_memtable<F>(mem: &Memtable, mut encode_key: F) -> Vec<SSTEntry>
where
    F: FnMut(i64) -> String,
{
    mem.iter()
        .map(|(key, value)| SSTEntry::put(encode_key(key), value))
        .collect()
}
