use super::*;

use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

fn unique_keys() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::btree_set(prop::collection::vec(any::<u8>(), 0..24), 1..300)
        .prop_map(|set: BTreeSet<Vec<u8>>| set.into_iter().collect())
        .prop_shuffle()
}

/// Slot reached by `key` through the two-step lookup.
fn resolved_slot<H: KeyHasher>(table: &Table<H>, key: &[u8]) -> usize {
    let mask = (table.size() - 1) as u64;
    let b = (table.hasher().hash(key, 0) & mask) as usize;
    match table.seeds()[b] {
        Slot::Direct(slot) => slot as usize,
        Slot::Displace(seed) => (table.hasher().hash(key, seed as u64) & mask) as usize,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_every_key_maps_to_its_position(keys in unique_keys()) {
        let table = Builder::new().build(&keys).unwrap();
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(table.index(k), i as u32);
        }
    }

    #[test]
    fn prop_table_size_is_next_power_of_two(keys in unique_keys()) {
        let table = Builder::new().build(&keys).unwrap();
        prop_assert_eq!(table.size(), keys.len().next_power_of_two());
        prop_assert_eq!(table.values().len(), table.seeds().len());
        prop_assert_eq!(table.len(), keys.len());
    }

    #[test]
    fn prop_resolved_slots_are_disjoint(keys in unique_keys()) {
        let table = Builder::new().with_hasher(WyHasher).build(&keys).unwrap();
        let mut seen = HashSet::new();
        for k in &keys {
            prop_assert!(seen.insert(resolved_slot(&table, k)));
        }
    }

    #[test]
    fn prop_builds_are_deterministic(keys in unique_keys()) {
        let a = Builder::new().build(&keys).unwrap();
        let b = Builder::new().build(&keys).unwrap();
        prop_assert_eq!(&a, &b);
    }

    #[test]
    fn prop_subsets_keep_round_trip(
        keys in unique_keys(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..64),
    ) {
        let subset: Vec<&Vec<u8>> = picks
            .iter()
            .map(|ix| ix.get(&keys))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let table = Builder::new().with_hasher(AHasher).build(&subset).unwrap();
        for (i, k) in subset.iter().enumerate() {
            prop_assert_eq!(table.index(k), i as u32);
        }
    }

    #[test]
    fn prop_absent_keys_stay_in_range(keys in unique_keys(), probe in prop::collection::vec(any::<u8>(), 24..32)) {
        // Probes are longer than any generated key, so never members.
        let table = Builder::new().build(&keys).unwrap();
        prop_assert!((table.index(&probe) as usize) < keys.len());
    }

    #[test]
    fn prop_raw_parts_rebuild_an_equal_table(keys in unique_keys()) {
        let table = Builder::new().build(&keys).unwrap();
        let rebuilt = Table::from_raw_parts(
            table.values().to_vec(),
            &table.raw_seeds(),
            table.len() as u32,
            Xxh3Hasher,
        ).unwrap();
        prop_assert_eq!(&rebuilt, &table);
    }
}
