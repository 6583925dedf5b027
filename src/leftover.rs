use crate::bucket::Bucket;
use crate::solver::Assignment;
use crate::table::Slot;

/// Place the keys of single-key buckets straight into the free slots.
///
/// Free slots are filled in ascending order, taking pending keys in bucket
/// order. Each placed key's natural bucket records a `Direct` pointer to the
/// slot it received. Returns the number of keys placed.
pub(crate) fn assign_leftovers(buckets: &[Bucket], state: &mut Assignment) -> usize {
    let mut pending = buckets
        .iter()
        .filter_map(|b| b.entries.first().map(|e| (b.slot, e.index)));
    let mut placed = 0;

    for slot in 0..state.size() {
        if state.occupied.test(slot) {
            continue;
        }
        let Some((natural, index)) = pending.next() else {
            break;
        };
        state.claim(slot, index);
        state.seeds[natural] = Slot::Direct(slot as u32);
        placed += 1;
    }

    // Slots outnumber keys, so nothing can be left over here.
    debug_assert!(pending.next().is_none(), "leftover keys without a free slot");
    placed
}
