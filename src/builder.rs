use crate::bucket::bucketize;
use crate::hash::{KeyHasher, Xxh3Hasher};
use crate::leftover::assign_leftovers;
use crate::solver::{Assignment, SeedSolver};
use crate::table::{MAX_SEED, Table};
use crate::util::table_size;
use std::time::Instant;
use thiserror::Error;

/// Largest supported key count; indices must fit a signed 32-bit integer.
pub const MAX_KEYS: usize = i32::MAX as usize;

/// Build parameters.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Highest displacement seed tried for a bucket before the build fails.
    /// Clamped to [`MAX_SEED`].
    pub max_seed: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { max_seed: MAX_SEED }
    }
}

#[derive(Debug, Error)]
pub enum MphError {
    #[error("empty key set is not supported")]
    EmptyKeySet,
    #[error("{0} keys exceed the supported maximum of {max}", max = MAX_KEYS)]
    TooManyKeys(usize),
    #[error("no collision-free seed for bucket {bucket} ({keys} keys) within {max_seed} seeds")]
    SeedsExhausted {
        bucket: usize,
        keys: usize,
        max_seed: u32,
    },
    #[error("invalid table: {0}")]
    InvalidTable(&'static str),
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serde(#[from] Box<bincode::ErrorKind>),
}

pub struct Builder<H = Xxh3Hasher> {
    cfg: BuildConfig,
    hasher: H,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            cfg: BuildConfig::default(),
            hasher: Xxh3Hasher,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: KeyHasher> Builder<H> {
    pub fn with_config(mut self, cfg: BuildConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Swap the key hasher. The built table keeps it for queries.
    pub fn with_hasher<H2: KeyHasher>(self, hasher: H2) -> Builder<H2> {
        Builder {
            cfg: self.cfg,
            hasher,
        }
    }

    /// Build the table. Keys must be unique; each resolves to its position in `keys`.
    pub fn build<K>(self, keys: &[K]) -> Result<Table<H>, MphError>
    where
        K: AsRef<[u8]> + Sync,
    {
        let n = keys.len();
        if n == 0 {
            return Err(MphError::EmptyKeySet);
        }
        if n > MAX_KEYS {
            return Err(MphError::TooManyKeys(n));
        }
        let started = Instant::now();
        let size = table_size(n);
        let max_seed = self.cfg.max_seed.min(MAX_SEED);

        // 1) Bucket by seed-0 hash, largest buckets first.
        let buckets = bucketize(keys, &self.hasher, size);

        // 2) Displace multi-key buckets.
        let mut state = Assignment::new(size);
        let solved = SeedSolver::new(keys, &self.hasher, size, max_seed).solve(&buckets, &mut state)?;

        // 3) Single-key buckets take the remaining slots directly.
        let leftovers = assign_leftovers(&buckets[solved..], &mut state);
        debug_assert_eq!(state.occupied.count_ones(), n);

        log::debug!(
            "built table: n={n} size={size} displaced_buckets={solved} direct={leftovers} in {:?}",
            started.elapsed()
        );
        Ok(Table::from_assignment(state, n as u32, self.hasher))
    }
}
