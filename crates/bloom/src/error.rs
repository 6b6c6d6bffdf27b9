use thiserror::Error;

/// Errors raised while sizing a [`BloomFilter`](crate::BloomFilter).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BloomError {
    #[error("bloom filter capacity must be > 0")]
    ZeroCapacity,

    #[error("false positive rate must be in (0, 1), got {0}")]
    InvalidFalsePositiveRate(f64),

    #[error(
        "capacity {capacity} with false positive rate {false_positive_rate} derives zero hash functions"
    )]
    NoHashFunctions {
        capacity: usize,
        false_positive_rate: f64,
    },

    #[error(
        "capacity {capacity} with false positive rate {false_positive_rate} needs {num_bits} bits, over the {max_bits} bit limit"
    )]
    TooLarge {
        capacity: usize,
        false_positive_rate: f64,
        num_bits: f64,
        max_bits: u64,
    },
}
