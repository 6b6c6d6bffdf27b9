//! # Bloom Filter
//!
//! A space-efficient probabilistic data structure for set membership testing.
//!
//! A bloom filter can tell you with certainty that a key is **not** in the set
//! (no false negatives), but may occasionally report that a key **is** in the
//! set when it isn't (false positives). The false positive rate depends on the
//! number of bits and hash functions used.
//!
//! ## Usage in RiptideKV
//!
//! The SSTable manager keeps one cumulative bloom filter over the keys of all
//! its files. Point lookups check the filter first -- if it says "not
//! present", no file is scanned at all.
//!
//! ## Example
//!
//! ```rust
//! use bloom::BloomFilter;
//!
//! let mut bf = BloomFilter::new(1000, 0.01).unwrap();
//! bf.add("hello");
//! assert!(bf.exists("hello"));
//! ```
mod bitvec;
mod error;
mod hash;

pub use bitvec::BitVector;
pub use error::BloomError;

use tracing::debug;

/// Largest bit array a filter may allocate (1 GiB of bits).
pub const MAX_BLOOM_BITS: u64 = 8 * (1 << 30);

/// Computes the optimal `(num_bits, num_hashes)` for `capacity` items at the
/// target `false_positive_rate`.
///
/// ```text
/// m = ceil(-n * ln(p) / ln(2)^2)
/// k = round((m / n) * ln(2))
/// ```
///
/// # Errors
///
/// Fails if `capacity` is 0, if `false_positive_rate` is not in `(0, 1)`, if
/// the derived `m` exceeds [`MAX_BLOOM_BITS`], or if the derived `k` rounds
/// down to 0.
pub fn optimal_params(capacity: usize, false_positive_rate: f64) -> Result<(u64, u32), BloomError> {
    if capacity == 0 {
        return Err(BloomError::ZeroCapacity);
    }
    if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
        return Err(BloomError::InvalidFalsePositiveRate(false_positive_rate));
    }

    let n = capacity as f64;
    let ln2 = std::f64::consts::LN_2;
    let bits = (-n * false_positive_rate.ln() / ln2.powi(2)).ceil();
    if !(bits <= MAX_BLOOM_BITS as f64) {
        return Err(BloomError::TooLarge {
            capacity,
            false_positive_rate,
            num_bits: bits,
            max_bits: MAX_BLOOM_BITS,
        });
    }
    let m = bits as u64;
    let k = ((m as f64 / n) * ln2).round() as u32;

    if k == 0 {
        return Err(BloomError::NoHashFunctions {
            capacity,
            false_positive_rate,
        });
    }
    Ok((m, k))
}

/// A bloom filter backed by a [`BitVector`] with `k` derived hash functions.
///
/// Hash function `i` (numbered `1..=k`) maps an element to
/// `(i * h1 + i^2 * h2) mod m`, where `h1` is seeded xxHash64 and `h2` is
/// FNV-1a. Numbering starts at 1 because `i = 0` would map every element to
/// bit 0. Sizing is fixed at construction; only [`clear_all`](Self::clear_all)
/// resets the bits.
#[derive(Clone)]
pub struct BloomFilter {
    bits: BitVector,
    /// Number of bits in the filter (m).
    num_bits: u64,
    /// Number of hash functions (k).
    num_hashes: u32,
    /// Per-instance seed for the first base hash.
    seed: u64,
}

impl BloomFilter {
    /// Creates a new bloom filter sized for `capacity` expected items with
    /// the given target `false_positive_rate`, using a random seed.
    ///
    /// # Errors
    ///
    /// See [`optimal_params`].
    pub fn new(capacity: usize, false_positive_rate: f64) -> Result<Self, BloomError> {
        Self::with_seed(capacity, false_positive_rate, rand::random())
    }

    /// Like [`new`](Self::new) but with an explicit seed, so that two filters
    /// built with the same arguments set identical bits.
    pub fn with_seed(
        capacity: usize,
        false_positive_rate: f64,
        seed: u64,
    ) -> Result<Self, BloomError> {
        let (num_bits, num_hashes) = optimal_params(capacity, false_positive_rate)?;
        debug!(
            capacity,
            false_positive_rate, num_bits, num_hashes, "bloom filter sized"
        );

        Ok(Self {
            bits: BitVector::new(num_bits),
            num_bits,
            num_hashes,
            seed,
        })
    }

    /// Adds an element. Re-adding is a no-op on the bit pattern.
    pub fn add<T: AsRef<[u8]> + ?Sized>(&mut self, element: &T) {
        let (h1, h2) = hash::hash_pair(element.as_ref(), self.seed);
        for i in 1..=u64::from(self.num_hashes) {
            self.bits.set(hash::bit_index(h1, h2, i, self.num_bits));
        }
    }

    /// Returns `true` if the element **might** be in the set, `false` if it
    /// is **definitely not** in the set.
    #[must_use]
    pub fn exists<T: AsRef<[u8]> + ?Sized>(&self, element: &T) -> bool {
        let (h1, h2) = hash::hash_pair(element.as_ref(), self.seed);
        (1..=u64::from(self.num_hashes))
            .all(|i| self.bits.is_set(hash::bit_index(h1, h2, i, self.num_bits)))
    }

    /// Forgets every element. Sizing and seed are kept.
    pub fn clear_all(&mut self) {
        self.bits = BitVector::new(self.num_bits);
        debug!(num_bits = self.num_bits, "bloom filter cleared");
    }

    /// Returns the number of bits in the filter.
    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions.
    #[must_use]
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of bits currently set.
    #[must_use]
    pub fn count_ones(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Estimates the current false positive rate from the fill ratio:
    /// `(ones / m)^k`.
    #[must_use]
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill = self.count_ones() as f64 / self.num_bits as f64;
        fill.powi(self.num_hashes as i32)
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.num_bits)
            .field("num_hashes", &self.num_hashes)
            .field("bytes", &self.bits.byte_len())
            .finish()
    }
}
