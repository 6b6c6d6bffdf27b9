//! Fixed-size packed bit vector.
//!
//! Bit `i` lives in byte `i / 8` at offset `i % 8` (LSB first). The vector is
//! sized once at construction and never grows.

/// A fixed-size array of bits backed by `ceil(len / 8)` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct BitVector {
    bytes: Vec<u8>,
    len: u64,
}

impl BitVector {
    /// Creates a vector of `len` bits, all cleared.
    ///
    /// A zero-length vector is valid; every bit access on it panics.
    pub fn new(len: u64) -> Self {
        let byte_len = len.div_ceil(8) as usize;
        Self {
            bytes: vec![0u8; byte_len],
            len,
        }
    }

    /// Sets bit `idx` to 1.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len`.
    pub fn set(&mut self, idx: u64) {
        let (byte, mask) = self.locate(idx);
        self.bytes[byte] |= mask;
    }

    /// Sets bit `idx` to 0.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len`.
    pub fn clear(&mut self, idx: u64) {
        let (byte, mask) = self.locate(idx);
        self.bytes[byte] &= !mask;
    }

    /// Returns the current value of bit `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len`.
    #[must_use]
    pub fn is_set(&self, idx: u64) -> bool {
        let (byte, mask) = self.locate(idx);
        self.bytes[byte] & mask != 0
    }

    /// Number of addressable bits.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bits currently set.
    #[must_use]
    pub fn count_ones(&self) -> u64 {
        self.bytes.iter().map(|b| u64::from(b.count_ones())).sum()
    }

    /// Size of the backing storage in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    fn locate(&self, idx: u64) -> (usize, u8) {
        assert!(
            idx < self.len,
            "bit index {} out of range for BitVector of length {}",
            idx,
            self.len
        );
        ((idx / 8) as usize, 1u8 << (idx % 8))
    }
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("ones", &self.count_ones())
            .finish()
    }
}
