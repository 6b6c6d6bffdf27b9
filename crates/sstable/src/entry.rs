/// One record of an SSTable run.
///
/// `deleted == true` marks a tombstone: the key was deleted and any older
/// value for it must stay hidden. A tombstone's `value` is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SSTEntry {
    pub key: String,
    pub value: Vec<u8>,
    pub deleted: bool,
}

impl SSTEntry {
    /// A live `key -> value` record.
    pub fn put(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            deleted: false,
        }
    }

    /// A delete marker for `key`.
    pub fn tombstone(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Vec::new(),
            deleted: true,
        }
    }

    /// The value, or `None` for a tombstone.
    #[must_use]
    pub fn live_value(&self) -> Option<&[u8]> {
        (!self.deleted).then_some(self.value.as_slice())
    }
}
