//! Bit set with constant-time rank queries.
//!
//! Rank tables are prefix-sum checkpoints, one per word, refined inside the
//! word with a population count. Mutations invalidate the table until the
//! next [`RankedBitSet::finalize`]; debug builds assert on stale queries.

use std::ops::Deref;

use super::bitset::{BitSet, WORD_BITS};

/// [`BitSet`] plus a per-word prefix-count table.
#[derive(Clone, PartialEq, Eq)]
pub struct RankedBitSet {
    bits: BitSet,
    /// `checkpoints[w]` = members stored in words `[0, w)`.
    checkpoints: Vec<u64>,
    dirty: bool,
}

impl RankedBitSet {
    /// Empty, finalized set of capacity `size`.
    pub fn new(size: usize) -> Self {
        Self::from_bitset(BitSet::new(size))
    }

    /// Finalized set containing `[0, size)`.
    pub fn full(size: usize) -> Self {
        Self::from_bitset(BitSet::full(size))
    }

    /// Wrap an existing bit set and build its rank table.
    pub fn from_bitset(bits: BitSet) -> Self {
        Self::from_parts(bits, Vec::new())
    }

    /// Wrap `bits`, reusing `checkpoints` as storage for the rank table.
    pub fn from_parts(bits: BitSet, checkpoints: Vec<u64>) -> Self {
        let mut set = Self {
            bits,
            checkpoints,
            dirty: true,
        };
        set.finalize();
        set
    }

    /// Release the word buffer and the rank-table buffer.
    pub fn into_parts(self) -> (Vec<u64>, Vec<u64>) {
        (self.bits.into_words(), self.checkpoints)
    }

    /// Underlying bit set.
    #[inline]
    pub fn as_bitset(&self) -> &BitSet {
        &self.bits
    }

    /// Rebuild the rank table after mutations.
    pub fn finalize(&mut self) {
        let words = self.bits.words();
        self.checkpoints.clear();
        self.checkpoints.reserve(words.len() + 1);
        let mut total = 0u64;
        self.checkpoints.push(0);
        for word in words {
            total += u64::from(word.count_ones());
            self.checkpoints.push(total);
        }
        self.dirty = false;
    }

    /// Whether a mutation happened since the last [`finalize`](Self::finalize).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of members strictly below `index`.
    #[inline]
    pub fn rank(&self, index: usize) -> usize {
        debug_assert!(!self.dirty, "rank queried on a set that was not finalized");
        debug_assert!(index <= self.bits.size());
        let word = index / WORD_BITS;
        let offset = index % WORD_BITS;
        let base = self.checkpoints[word] as usize;
        if offset == 0 {
            return base;
        }
        let mask = (1u64 << offset) - 1;
        base + (self.bits.words()[word] & mask).count_ones() as usize
    }

    /// Number of members.
    #[inline]
    pub fn count(&self) -> usize {
        debug_assert!(!self.dirty, "count queried on a set that was not finalized");
        self.checkpoints.last().copied().unwrap_or(0) as usize
    }

    /// Insert `index`.
    pub fn set(&mut self, index: usize) {
        self.bits.set(index);
        self.dirty = true;
    }

    /// Remove `index`.
    pub fn clear(&mut self, index: usize) {
        self.bits.clear(index);
        self.dirty = true;
    }

    /// Toggle `index`.
    pub fn flip(&mut self, index: usize) {
        self.bits.flip(index);
        self.dirty = true;
    }

    /// Remove every member.
    pub fn blank(&mut self) {
        self.bits.blank();
        self.dirty = true;
    }

    /// Complement within the capacity.
    pub fn invert(&mut self) {
        self.bits.invert();
        self.dirty = true;
    }

    /// In-place symmetric difference.
    pub fn xor_with(&mut self, other: &BitSet) {
        self.bits.xor_with(other);
        self.dirty = true;
    }

    /// In-place union.
    pub fn or_with(&mut self, other: &BitSet) {
        self.bits.or_with(other);
        self.dirty = true;
    }
}

impl Deref for RankedBitSet {
    type Target = BitSet;

    fn deref(&self) -> &BitSet {
        &self.bits
    }
}

impl std::fmt::Debug for RankedBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.bits, f)
    }
}

impl From<BitSet> for RankedBitSet {
    fn from(bits: BitSet) -> Self {
        Self::from_bitset(bits)
    }
}
