//! Base hashes and bit index derivation for the bloom filter.
//!
//! Two unrelated 64-bit hashes are computed per element in one shot each:
//! xxHash64 keyed with the filter's seed, and unseeded FNV-1a. No hasher
//! state survives between calls.

use std::hash::Hasher;
use twox_hash::XxHash64;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Computes `(h1, h2)` for `data`.
///
/// `h1` is xxHash64 with `seed`; `h2` is FNV-1a 64.
pub(crate) fn hash_pair(data: &[u8], seed: u64) -> (u64, u64) {
    let mut xx = XxHash64::with_seed(seed);
    xx.write(data);
    (xx.finish(), fnv1a_64(data))
}

/// Bit index for the hash function numbered `i`:
/// `(i * h1 mod m + i^2 * h2 mod m) mod m`. Callers number from 1; `i = 0`
/// always gives bit 0.
///
/// Arithmetic runs in `u128` so the products never wrap.
pub(crate) fn bit_index(h1: u64, h2: u64, i: u64, num_bits: u64) -> u64 {
    let m = u128::from(num_bits);
    let i = u128::from(i);
    let a = (i % m) * (u128::from(h1) % m) % m;
    let b = (i * i % m) * (u128::from(h2) % m) % m;
    ((a + b) % m) as u64
}

/// FNV-1a 64-bit hash.
fn fnv1a_64(data: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
