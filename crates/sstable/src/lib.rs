//! # SSTable - Sorted String Table runs
//!
//! Immutable runs of key/value entries for the RiptideKV storage engine, and
//! the [`SSTableManager`] that answers point lookups across them.
//!
//! When the in-memory [`memtable::Memtable`] is sealed, its contents become a
//! new run. Runs are *write-once, read-many*: once added they are never
//! modified, only replaced wholesale under the same name.
//!
//! ## Lookup layering
//!
//! ```text
//! get(key)
//!   |
//!   v
//! ┌───────────────────────────────┐
//! │ bloom filter (all runs' keys) │ -- "definitely absent" --> None
//! └──────────────┬────────────────┘
//!                │ "maybe present"
//!                v
//! ┌───────────────────────────────┐  ← newest, checked first
//! │ run N                         │
//! ├───────────────────────────────┤
//! │ ...                           │
//! ├───────────────────────────────┤
//! │ run 0                         │  ← oldest
//! └───────────────────────────────┘
//!   first entry found wins; a tombstone hides older values
//! ```
//!
//! Entries live in memory only; turning a run into bytes on disk is left to
//! the surrounding system.

mod entry;
mod flush;
mod manager;
mod shared;
mod table;

pub use entry::SSTEntry;
pub use flush::entries_from_memtable;
pub use manager::SSTableManager;
pub use shared::SharedSSTableManager;
pub use table::SSTable;

/// Default bloom filter false positive rate (1%) used by
/// [`SSTableManager::new`].
pub const DEFAULT_BLOOM_FPR: f64 = config::DEFAULT_BLOOM_FPR;
