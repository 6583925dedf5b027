use crate::MphError;
use crate::hash::{KeyHasher, Xxh3Hasher};
use crate::solver::Assignment;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Largest displacement seed a table may carry (it must fit the signed encoding).
pub const MAX_SEED: u32 = i32::MAX as u32;

/// Per-bucket resolution rule.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Rehash the key with this seed; the masked hash is the value slot.
    /// Seed 0 reuses the natural hash.
    Displace(u32),
    /// The value lives at this slot; no second hash.
    Direct(u32),
}

impl Default for Slot {
    fn default() -> Self {
        Slot::Displace(0)
    }
}

impl Slot {
    /// Signed form: a seed is stored as itself, a direct slot `d` as `-(d + 1)`.
    #[inline]
    pub fn to_raw(self) -> i32 {
        match self {
            Slot::Displace(seed) => seed as i32,
            Slot::Direct(slot) => -(slot as i32) - 1,
        }
    }

    #[inline]
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Slot::Direct((-(raw as i64) - 1) as u32)
        } else {
            Slot::Displace(raw as u32)
        }
    }
}

/// Immutable minimal perfect hash table.
///
/// `values` and `seeds` both have length `size()`, a power of two. Only `len()`
/// slots of `values` are reachable from valid keys; the rest are padding.
/// Every way of obtaining a `Table` outside a build goes through validation.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "TableParts<H>")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<H = Xxh3Hasher> {
    n: u32,
    values: Vec<u32>,
    seeds: Vec<Slot>,
    hasher: H,
}

/// Unchecked decoded form of a [`Table`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TableParts<H> {
    n: u32,
    values: Vec<u32>,
    seeds: Vec<Slot>,
    hasher: H,
}

#[cfg(feature = "serde")]
impl<H> TryFrom<TableParts<H>> for Table<H> {
    type Error = MphError;

    fn try_from(parts: TableParts<H>) -> Result<Self, MphError> {
        let table = Self {
            n: parts.n,
            values: parts.values,
            seeds: parts.seeds,
            hasher: parts.hasher,
        };
        table.validate()?;
        Ok(table)
    }
}

impl<H> Table<H> {
    /// Checks everything `index` relies on for its unchecked slot reads.
    fn validate(&self) -> Result<(), MphError> {
        let size = self.values.len();
        if self.seeds.len() != size {
            return Err(MphError::InvalidTable("values and seeds differ in length"));
        }
        if !size.is_power_of_two() {
            return Err(MphError::InvalidTable("table size is not a power of two"));
        }
        if self.n == 0 || self.n as usize > size {
            return Err(MphError::InvalidTable("key count out of range for table size"));
        }
        if self.values.iter().any(|&v| v >= self.n) {
            return Err(MphError::InvalidTable("value out of key index range"));
        }
        for s in &self.seeds {
            match *s {
                Slot::Direct(slot) if slot as usize >= size => {
                    return Err(MphError::InvalidTable("direct slot out of range"));
                }
                Slot::Displace(seed) if seed > MAX_SEED => {
                    return Err(MphError::InvalidTable("displacement seed out of range"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl<H: KeyHasher> Table<H> {
    pub(crate) fn from_assignment(state: Assignment, n: u32, hasher: H) -> Self {
        Self {
            n,
            values: state.values,
            seeds: state.seeds,
            hasher,
        }
    }

    /// Reassemble a table from previously built parts without rerunning construction.
    pub fn from_parts(values: Vec<u32>, seeds: Vec<Slot>, n: u32, hasher: H) -> Result<Self, MphError> {
        let table = Self {
            n,
            values,
            seeds,
            hasher,
        };
        table.validate()?;
        Ok(table)
    }

    /// Like [`Table::from_parts`], with seeds in the signed encoding of [`Slot::to_raw`].
    pub fn from_raw_parts(values: Vec<u32>, raw_seeds: &[i32], n: u32, hasher: H) -> Result<Self, MphError> {
        let seeds = raw_seeds.iter().map(|&s| Slot::from_raw(s)).collect();
        Self::from_parts(values, seeds, n, hasher)
    }

    /// O(1) lookup of a key's original index.
    ///
    /// Keys outside the build set get some index in `[0, len())`, never an error.
    #[inline]
    pub fn index(&self, key: &[u8]) -> u32 {
        let mask = (self.values.len() - 1) as u64;
        let b = (self.hasher.hash(key, 0) & mask) as usize;
        // SAFETY: b <= mask < seeds.len()
        let slot = match unsafe { *self.seeds.get_unchecked(b) } {
            Slot::Direct(slot) => slot as usize,
            Slot::Displace(seed) => (self.hasher.hash(key, seed as u64) & mask) as usize,
        };
        // SAFETY: direct slots are < size (built, or checked by validate), hashed slots are masked
        unsafe { *self.values.get_unchecked(slot) }
    }

    #[inline]
    pub fn index_str(&self, s: &str) -> u32 {
        self.index(s.as_bytes())
    }

    /// Number of keys the table was built from.
    #[inline]
    pub fn len(&self) -> usize {
        self.n as usize
    }

    /// Always false: tables are never built from an empty key set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Slot count, the smallest power of two `>= len()`.
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn seeds(&self) -> &[Slot] {
        &self.seeds
    }

    pub fn raw_seeds(&self) -> Vec<i32> {
        self.seeds.iter().map(|s| s.to_raw()).collect()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

#[cfg(feature = "serde")]
impl<H: KeyHasher + Serialize + DeserializeOwned> Table<H> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, MphError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a table written by [`Table::to_bytes`]. Inconsistent parts are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MphError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
