#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::hash::BuildHasher;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Keyed string hash used for both bucketing (seed 0) and displacement (seed > 0).
///
/// Implementations must be deterministic, and distinct seeds should behave as
/// independent hash functions. Cryptographic strength is not needed.
pub trait KeyHasher: Send + Sync {
    fn hash(&self, key: &[u8], seed: u64) -> u64;
}

/// XXH3-64 with the seed passed straight through. The default hasher.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Xxh3Hasher;

impl KeyHasher for Xxh3Hasher {
    #[inline]
    fn hash(&self, key: &[u8], seed: u64) -> u64 {
        xxh3_64_with_seed(key, seed)
    }
}

/// wyhash (final v3 variant from the `wyhash` crate).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WyHasher;

impl KeyHasher for WyHasher {
    #[inline]
    fn hash(&self, key: &[u8], seed: u64) -> u64 {
        wyhash::wyhash(key, seed)
    }
}

/// aHash keyed by the seed through fixed-key `RandomState`s.
///
/// aHash output may change between crate versions and target features, so
/// tables built with it should not be persisted across builds of a binary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AHasher;

impl KeyHasher for AHasher {
    #[inline]
    fn hash(&self, key: &[u8], seed: u64) -> u64 {
        let state = ahash::RandomState::with_seeds(
            seed,
            0x9E37_79B9_7F4A_7C15,
            0xA24B_1F6F_D6E8_FD9B,
            0x853C_49E6_0A6C_9D39,
        );
        BuildHasher::hash_one(&state, key)
    }
}

impl<F> KeyHasher for F
where
    F: Fn(&[u8], u64) -> u64 + Send + Sync,
{
    #[inline]
    fn hash(&self, key: &[u8], seed: u64) -> u64 {
        self(key, seed)
    }
}
