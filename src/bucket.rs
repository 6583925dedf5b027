use crate::hash::KeyHasher;

/// A key waiting to be placed: its position in the input and its seed-0 hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub index: u32,
    pub hash: u64,
}

/// All keys whose seed-0 hash lands on `slot`.
#[derive(Clone, Debug)]
pub(crate) struct Bucket {
    pub slot: usize,
    pub entries: Vec<Entry>,
}

impl Bucket {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Partition keys by `hash(key, 0) & (size - 1)` and order the non-empty
/// buckets largest first. Equal-size buckets keep ascending slot order, and
/// entries inside a bucket keep input order.
pub(crate) fn bucketize<K, H>(keys: &[K], hasher: &H, size: usize) -> Vec<Bucket>
where
    K: AsRef<[u8]> + Sync,
    H: KeyHasher,
{
    debug_assert!(size.is_power_of_two());
    let mask = (size - 1) as u64;
    let hashes = natural_hashes(keys, hasher);

    let mut slots: Vec<Vec<Entry>> = vec![Vec::new(); size];
    for (index, hash) in hashes.into_iter().enumerate() {
        slots[(hash & mask) as usize].push(Entry {
            index: index as u32,
            hash,
        });
    }

    let mut buckets: Vec<Bucket> = slots
        .into_iter()
        .enumerate()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(slot, entries)| Bucket { slot, entries })
        .collect();
    // Stable sort: ties stay in slot order, so the result only depends on the input.
    buckets.sort_by(|a, b| b.len().cmp(&a.len()));
    buckets
}

/// Seed-0 hash of every key, in input order.
fn natural_hashes<K, H>(keys: &[K], hasher: &H) -> Vec<u64>
where
    K: AsRef<[u8]> + Sync,
    H: KeyHasher,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        keys.par_iter().map(|k| hasher.hash(k.as_ref(), 0)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        keys.iter().map(|k| hasher.hash(k.as_ref(), 0)).collect()
    }
}
