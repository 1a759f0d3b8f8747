//! Enumeration of group-respecting bipartitions
//!
//! Groups are numbered by their smallest member, so group 0 always holds
//! the lowest leaf and stays on the right side. With `g` groups, counter
//! value `m` in `1..2^(g-1)` places group `k >= 1` on the left iff bit
//! `k - 1` of `m` is set, giving each unordered split exactly once.
//!
//! Grouping always succeeds; only walking the splits needs the counter,
//! so more than [`MAX_GROUPS`] groups surface through
//! [`BipartitionEnumerator::ensure_countable`].

use crate::bits::RankedBitSet;
use crate::sets::UnionFind;
use crate::TerraceError;

/// Groups beyond this cannot be indexed by a 64-bit counter.
pub const MAX_GROUPS: usize = 64;

/// Iterator-like cursor over the bipartitions of a leaf set.
#[derive(Debug)]
pub struct BipartitionEnumerator<'a> {
    leaves: &'a RankedBitSet,
    /// Canonical group of each leaf, indexed by leaf rank.
    groups: Vec<usize>,
    num_groups: usize,
    current: RankedBitSet,
    bip: u64,
    end: u64,
}

impl<'a> BipartitionEnumerator<'a> {
    /// Start enumerating the splits of `leaves` that keep every group of
    /// `sets` (over leaf ranks) together. Fails with
    /// [`TerraceError::TreeCountOverflow`] past [`MAX_GROUPS`] groups.
    pub fn new(leaves: &'a RankedBitSet, sets: &mut UnionFind) -> Result<Self, TerraceError> {
        let enumerator = Self::with_buffer(leaves, sets, RankedBitSet::new(leaves.size()));
        enumerator.ensure_countable()?;
        Ok(enumerator)
    }

    /// Group the leaves, using `buffer` as storage for the current set.
    ///
    /// Past [`MAX_GROUPS`] groups the cursor starts exhausted and
    /// [`num_bip`](Self::num_bip) saturates; callers that walk the splits
    /// check [`ensure_countable`](Self::ensure_countable) first.
    pub fn with_buffer(
        leaves: &'a RankedBitSet,
        sets: &mut UnionFind,
        buffer: RankedBitSet,
    ) -> Self {
        let count = leaves.count();
        debug_assert_eq!(sets.len(), count, "union-find must cover the leaf ranks");
        debug_assert_eq!(buffer.size(), leaves.size());

        let mut canonical = vec![usize::MAX; count];
        let mut groups = Vec::with_capacity(count);
        let mut num_groups = 0;
        for rank in 0..count {
            let rep = sets.find(rank);
            if canonical[rep] == usize::MAX {
                canonical[rep] = num_groups;
                num_groups += 1;
            }
            groups.push(canonical[rep]);
        }
        let countable = num_groups <= MAX_GROUPS;
        let end = match num_groups {
            0 => 1,
            _ if countable => 1u64 << (num_groups - 1),
            _ => u64::MAX,
        };
        let mut enumerator = Self {
            leaves,
            groups,
            num_groups,
            current: buffer,
            bip: 0,
            end,
        };
        if countable {
            enumerator.increase();
        } else {
            enumerator.bip = end;
        }
        enumerator
    }

    /// Whether the splits fit the 64-bit counter.
    pub fn is_countable(&self) -> bool {
        self.num_groups <= MAX_GROUPS
    }

    /// [`TerraceError::TreeCountOverflow`] unless the splits can be walked.
    pub fn ensure_countable(&self) -> Result<(), TerraceError> {
        if self.is_countable() {
            Ok(())
        } else {
            Err(TerraceError::TreeCountOverflow {
                groups: self.num_groups,
            })
        }
    }

    /// Leaf set being split.
    pub fn leaves(&self) -> &'a RankedBitSet {
        self.leaves
    }

    /// Number of groups the leaves fall into.
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Total number of bipartitions, `2^(g-1) - 1`, saturating at
    /// `u64::MAX - 1` past [`MAX_GROUPS`] groups.
    pub fn num_bip(&self) -> u64 {
        self.end - 1
    }

    /// Counter value of the current bipartition.
    pub fn cur_bip(&self) -> u64 {
        self.bip
    }

    /// First counter value past the last bipartition.
    pub fn end_bip(&self) -> u64 {
        self.end
    }

    /// Whether the counter still denotes a bipartition.
    pub fn is_valid(&self) -> bool {
        self.bip < self.end
    }

    fn in_left_partition(&self, group: usize) -> bool {
        group > 0 && self.bip & (1 << (group - 1)) != 0
    }

    /// Advance to the next bipartition and materialize its left side.
    pub fn increase(&mut self) {
        self.bip = self.bip.saturating_add(1);
        if !self.is_valid() {
            return;
        }
        self.current.blank();
        for (rank, leaf) in self.leaves.iter().enumerate() {
            if self.in_left_partition(self.groups[rank]) {
                self.current.set(leaf);
            }
        }
        self.current.finalize();
    }

    /// Current side of the split.
    pub fn current_set(&self) -> &RankedBitSet {
        debug_assert!(self.is_valid(), "bipartition enumerator used past its end");
        &self.current
    }

    /// Swap to the other side of the current split.
    pub fn flip_sets(&mut self) {
        self.current.xor_with(self.leaves.as_bitset());
        self.current.finalize();
    }

    /// Hand back the storage of the current set.
    pub fn into_buffer(self) -> RankedBitSet {
        self.current
    }
}
