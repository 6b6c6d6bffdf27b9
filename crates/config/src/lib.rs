//! Shared configuration for the RiptideKV storage core.
//!
//! Settings can be overridden through environment variables:
//!
//! ```text
//! RIPTIDE_BLOOM_CAPACITY  expected keys per bloom filter    (default: 1000)
//! RIPTIDE_BLOOM_FPR       target false positive rate        (default: 0.01)
//! ```

use std::str::FromStr;
use tracing::warn;

/// Default number of keys the SSTable bloom filter is sized for.
pub const DEFAULT_BLOOM_CAPACITY: usize = 1000;

/// Default bloom filter false positive rate (1%).
pub const DEFAULT_BLOOM_FPR: f64 = 0.01;

pub const ENV_BLOOM_CAPACITY: &str = "RIPTIDE_BLOOM_CAPACITY";
pub const ENV_BLOOM_FPR: &str = "RIPTIDE_BLOOM_FPR";

/// Bloom sizing used when building an SSTable manager.
///
/// Values are not validated here; the bloom filter rejects degenerate sizing
/// when it is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub bloom_capacity: usize,
    pub bloom_false_positive_rate: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            bloom_capacity: DEFAULT_BLOOM_CAPACITY,
            bloom_false_positive_rate: DEFAULT_BLOOM_FPR,
        }
    }
}

impl StoreConfig {
    /// Reads overrides from the process environment, falling back to the
    /// defaults for unset or unparsable variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through
    /// `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bloom_capacity: parse_or(&lookup, ENV_BLOOM_CAPACITY, defaults.bloom_capacity),
            bloom_false_positive_rate: parse_or(
                &lookup,
                ENV_BLOOM_FPR,
                defaults.bloom_false_positive_rate,
            ),
        }
    }

    pub fn with_bloom_capacity(mut self, capacity: usize) -> Self {
        self.bloom_capacity = capacity;
        self
    }

    pub fn with_bloom_false_positive_rate(mut self, rate: f64) -> Self {
        self.bloom_false_positive_rate = rate;
        self
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, fallback = %default, "ignoring unparsable config value");
            default
        }),
    }
}
