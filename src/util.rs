/// Fixed-size bitset used to track which table slots are claimed during a build.
#[derive(Debug)]
pub struct BitSet {
    bits: Vec<u64>,
    n: usize,
}

impl BitSet {
    pub fn new(n: usize) -> Self {
        let words = n.div_ceil(64);
        Self { bits: vec![0; words], n }
    }

    #[inline]
    pub fn test(&self, idx: usize) -> bool {
        debug_assert!(idx < self.n);
        let (w, b) = (idx / 64, idx % 64);
        (self.bits[w] >> b) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, idx: usize) {
        debug_assert!(idx < self.n);
        let (w, b) = (idx / 64, idx % 64);
        self.bits[w] |= 1u64 << b;
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Table size for `n` keys: the smallest power of two `>= n` (1 for `n <= 1`).
#[inline]
pub fn table_size(n: usize) -> usize {
    n.max(1).next_power_of_two()
}
