//! displace_mph — hash-and-displace minimal perfect hashing.
//!
//! - Build once on a set of **unique** keys (bytes/str); each key maps to its input position.
//! - Table size is the next power of two, so slots come from masking instead of `%`.
//! - Buckets with several keys get a displacement seed; single-key buckets point straight at a slot.
//! - O(1) lookups with at most two hashes. Absent keys still get an in-range index.

mod bucket;
mod builder;
mod hash;
mod leftover;
mod solver;
mod table;
mod util;

pub use builder::{BuildConfig, Builder, MAX_KEYS, MphError};
pub use hash::{AHasher, KeyHasher, WyHasher, Xxh3Hasher};
pub use table::{MAX_SEED, Slot, Table};
pub use util::table_size;

#[cfg(test)]
mod proptests;
