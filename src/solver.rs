use crate::MphError;
use crate::bucket::Bucket;
use crate::hash::KeyHasher;
use crate::table::Slot;
use crate::util::BitSet;
use hashbrown::HashMap;

/// Mutable table state while a build is in progress.
///
/// Occupancy lives in `occupied`, so `values` always holds real key indices
/// and index 0 needs no special treatment.
#[derive(Debug)]
pub(crate) struct Assignment {
    pub values: Vec<u32>,
    pub seeds: Vec<Slot>,
    pub occupied: BitSet,
}

impl Assignment {
    pub fn new(size: usize) -> Self {
        Self {
            values: vec![0; size],
            seeds: vec![Slot::default(); size],
            occupied: BitSet::new(size),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn claim(&mut self, slot: usize, index: u32) {
        debug_assert!(!self.occupied.test(slot), "slot {slot} claimed twice");
        self.occupied.set(slot);
        self.values[slot] = index;
    }
}

/// Hash-and-displace search over the multi-key buckets.
pub(crate) struct SeedSolver<'a, K, H> {
    keys: &'a [K],
    hasher: &'a H,
    mask: u64,
    max_seed: u32,
    /// Slots tentatively taken by the current attempt, mapped to key index.
    claims: HashMap<usize, u32>,
}

impl<'a, K, H> SeedSolver<'a, K, H>
where
    K: AsRef<[u8]>,
    H: KeyHasher,
{
    pub fn new(keys: &'a [K], hasher: &'a H, size: usize, max_seed: u32) -> Self {
        debug_assert!(size.is_power_of_two());
        Self {
            keys,
            hasher,
            mask: (size - 1) as u64,
            max_seed,
            claims: HashMap::new(),
        }
    }

    /// Place every bucket with two or more keys, in the given (largest-first)
    /// order. Returns how many leading buckets were solved; the rest hold at
    /// most one key each and are left for the leftover pass.
    pub fn solve(&mut self, buckets: &[Bucket], state: &mut Assignment) -> Result<usize, MphError> {
        let solved = buckets
            .iter()
            .position(|b| b.len() < 2)
            .unwrap_or(buckets.len());

        for bucket in &buckets[..solved] {
            debug_assert!(bucket.entries.iter().all(|e| (e.hash & self.mask) as usize == bucket.slot));
            let seed = self.find_seed(bucket, &state.occupied)?;
            for (&slot, &index) in &self.claims {
                state.claim(slot, index);
            }
            // All entries share the bucket's natural slot, so one write covers them.
            state.seeds[bucket.slot] = Slot::Displace(seed);
            log::trace!(
                "bucket {} ({} keys) placed with seed {seed}",
                bucket.slot,
                bucket.len()
            );
        }
        self.claims.clear();
        Ok(solved)
    }

    /// First seed in `1..=max_seed` that sends every entry of `bucket` to a
    /// distinct slot not yet occupied. On success `claims` holds the placement.
    fn find_seed(&mut self, bucket: &Bucket, occupied: &BitSet) -> Result<u32, MphError> {
        'seeds: for seed in 1..=self.max_seed {
            self.claims.clear();
            for e in &bucket.entries {
                let key = self.keys[e.index as usize].as_ref();
                let slot = (self.hasher.hash(key, seed as u64) & self.mask) as usize;
                if occupied.test(slot) || self.claims.insert(slot, e.index).is_some() {
                    continue 'seeds;
                }
            }
            return Ok(seed);
        }

        self.claims.clear();
        log::error!(
            "no viable seed for bucket {} ({} keys) after {} attempts",
            bucket.slot,
            bucket.len(),
            self.max_seed
        );
        Err(MphError::SeedsExhausted {
            bucket: bucket.slot,
            keys: bucket.len(),
            max_seed: self.max_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::bucketize;
    use crate::hash::Xxh3Hasher;

    const FRUIT: [&str; 8] = [
        "Apple", "Banana", "Cherry", "Date", "Elderberry", "Fig", "Grape", "Honeydew",
    ];

    #[test]
    fn test_solved_buckets_get_distinct_free_slots() {
        let size = 8;
        let buckets = bucketize(&FRUIT, &Xxh3Hasher, size);
        let mut state = Assignment::new(size);
        let mut solver = SeedSolver::new(&FRUIT, &Xxh3Hasher, size, u32::MAX >> 1);
        let solved = solver.solve(&buckets, &mut state).unwrap();

        assert!(buckets[..solved].iter().all(|b| b.len() >= 2));
        assert!(buckets[solved..].iter().all(|b| b.len() <= 1));

        let placed: usize = buckets[..solved].iter().map(Bucket::len).sum();
        assert_eq!(state.occupied.count_ones(), placed);

        for b in &buckets[..solved] {
            let Slot::Displace(seed) = state.seeds[b.slot] else {
                panic!("bucket {} should carry a displacement seed", b.slot);
            };
            assert!(seed >= 1);
            for e in &b.entries {
                let slot = (Xxh3Hasher.hash(FRUIT[e.index as usize].as_bytes(), seed as u64) & 7) as usize;
                assert!(state.occupied.test(slot));
                assert_eq!(state.values[slot], e.index);
            }
        }
    }

    #[test]
    fn test_seed_search_skips_collisions() {
        // Seed 1 collides inside the bucket, seed 2 hits a taken slot, seed 3 works.
        let h = |key: &[u8], seed: u64| -> u64 {
            match (seed, key) {
                (0, _) => 0,
                (1, _) => 1,
                (2, b"a") => 0,
                (2, _) => 1,
                (_, b"a") => 2,
                (_, _) => 3,
            }
        };
        let keys = ["a", "b"];
        let buckets = bucketize(&keys, &h, 4);
        let mut state = Assignment::new(4);
        state.claim(0, 9);

        let mut solver = SeedSolver::new(&keys, &h, 4, 100);
        assert_eq!(solver.solve(&buckets, &mut state).unwrap(), 1);
        assert_eq!(state.seeds[0], Slot::Displace(3));
        assert_eq!(state.values[2], 0);
        assert_eq!(state.values[3], 1);
        assert!(state.occupied.test(2) && state.occupied.test(3));
    }

    #[test]
    fn test_exhausted_seed_range_is_an_error() {
        let h = |_key: &[u8], _seed: u64| -> u64 { 5 };
        let keys = ["x", "y"];
        let buckets = bucketize(&keys, &h, 2);
        let mut state = Assignment::new(2);
        let mut solver = SeedSolver::new(&keys, &h, 2, 16);
        match solver.solve(&buckets, &mut state) {
            Err(MphError::SeedsExhausted { bucket, keys, max_seed }) => {
                assert_eq!((bucket, keys, max_seed), (1, 2, 16));
            }
            other => panic!("expected SeedsExhausted, got {other:?}"),
        }
        assert_eq!(state.occupied.count_ones(), 0);
    }
}
