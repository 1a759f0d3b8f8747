//! Scratch buffers and space tracking for the recursion

use super::SpaceProfile;
use crate::bits::{words_for, BitSet, RankedBitSet};

/// Tracks scratch words and recursion depth during one enumeration
#[derive(Debug)]
pub struct SpaceTracker {
    /// Scratch words currently handed out
    current: usize,

    /// Maximum seen
    max: usize,

    /// Current recursion depth
    stack_depth: usize,

    /// Profile data (if enabled)
    profile: Option<SpaceProfile>,
}

impl SpaceTracker {
    /// Create new tracker
    pub fn new(profile_enabled: bool) -> Self {
        Self {
            current: 0,
            max: 0,
            stack_depth: 0,
            profile: profile_enabled.then(SpaceProfile::default),
        }
    }

    /// Account for a scratch buffer of `words` words
    pub fn allocate_words(&mut self, words: usize) {
        self.current += words;
        self.max = self.max.max(self.current);
        if let Some(ref mut p) = self.profile {
            p.max_scratch_words = self.max;
        }
    }

    /// Return a scratch buffer of `words` words
    pub fn free_words(&mut self, words: usize) {
        self.current = self.current.saturating_sub(words);
    }

    /// Enter one recursion level
    pub fn push_stack_frame(&mut self) {
        self.stack_depth += 1;
        if let Some(ref mut p) = self.profile {
            p.max_depth = p.max_depth.max(self.stack_depth);
            p.calls += 1;
        }
    }

    /// Leave one recursion level
    pub fn pop_stack_frame(&mut self) {
        self.stack_depth = self.stack_depth.saturating_sub(1);
    }

    /// Record how a scratch request was served
    pub fn record_request(&mut self, reused: bool) {
        if let Some(ref mut p) = self.profile {
            if reused {
                p.reused_buffers += 1;
            } else {
                p.fresh_buffers += 1;
            }
        }
    }

    /// Get maximum scratch words in use at once
    pub fn max_space_used(&self) -> usize {
        self.max
    }

    /// Current recursion depth
    pub fn depth(&self) -> usize {
        self.stack_depth
    }

    /// Snapshot of the profile, if profiling is enabled
    pub fn profile(&self) -> Option<&SpaceProfile> {
        self.profile.as_ref()
    }

    /// Take profile
    pub fn take_profile(&mut self) -> Option<SpaceProfile> {
        self.profile.take()
    }
}

/// Free list of word buffers backing the per-frame leaf and constraint sets.
///
/// A pool belongs to exactly one enumerator; parallel workers each get their
/// own pool seeded with the same size hint.
#[derive(Debug)]
pub struct ScratchPool {
    free: Vec<Vec<u64>>,
    hint_words: usize,
    tracker: SpaceTracker,
}

impl ScratchPool {
    /// Pool whose fresh buffers reserve at least `hint_words` words.
    pub fn with_hint(hint_words: usize, profile_enabled: bool) -> Self {
        Self {
            free: Vec::new(),
            hint_words,
            tracker: SpaceTracker::new(profile_enabled),
        }
    }

    /// Pool sized for leaf sets over `num_leaves` and constraint sets over
    /// `num_constraints`.
    pub fn for_query(num_leaves: usize, num_constraints: usize, profile_enabled: bool) -> Self {
        let hint = words_for(num_leaves).max(words_for(num_constraints)) + 1;
        Self::with_hint(hint, profile_enabled)
    }

    /// Size hint handed to fresh buffers.
    pub fn hint(&self) -> usize {
        self.hint_words
    }

    /// Number of idle buffers.
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Space accounting for this pool.
    pub fn tracker(&self) -> &SpaceTracker {
        &self.tracker
    }

    /// Mutable space accounting for this pool.
    pub fn tracker_mut(&mut self) -> &mut SpaceTracker {
        &mut self.tracker
    }

    fn take(&mut self, words: usize) -> Vec<u64> {
        self.tracker.allocate_words(words);
        match self.free.pop() {
            Some(buffer) => {
                self.tracker.record_request(true);
                buffer
            }
            None => {
                self.tracker.record_request(false);
                Vec::with_capacity(words.max(self.hint_words))
            }
        }
    }

    fn give(&mut self, mut buffer: Vec<u64>, words: usize) {
        self.tracker.free_words(words);
        buffer.clear();
        self.free.push(buffer);
    }

    /// Empty bit set of capacity `size`.
    pub fn bitset(&mut self, size: usize) -> BitSet {
        let buffer = self.take(words_for(size));
        BitSet::with_buffer(size, buffer)
    }

    /// Empty, finalized ranked set of capacity `size`.
    pub fn ranked(&mut self, size: usize) -> RankedBitSet {
        let words = self.take(words_for(size));
        let checkpoints = self.take(words_for(size) + 1);
        RankedBitSet::from_parts(BitSet::with_buffer(size, words), checkpoints)
    }

    /// Return a set obtained from [`bitset`](Self::bitset).
    pub fn recycle(&mut self, set: BitSet) {
        let words = words_for(set.size());
        self.give(set.into_words(), words);
    }

    /// Return a set obtained from [`ranked`](Self::ranked).
    pub fn recycle_ranked(&mut self, set: RankedBitSet) {
        let words = words_for(set.size());
        let (bits, checkpoints) = set.into_parts();
        self.give(bits, words);
        self.give(checkpoints, words + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_reused() {
        let mut pool = ScratchPool::with_hint(2, true);
        let set = pool.bitset(100);
        pool.recycle(set);
        assert_eq!(pool.idle(), 1);
        let again = pool.bitset(70);
        assert!(again.is_clear());
        assert_eq!(pool.idle(), 0);
        pool.recycle(again);

        let profile = pool.tracker().profile().unwrap();
        assert_eq!(profile.fresh_buffers, 1);
        assert_eq!(profile.reused_buffers, 1);
    }

    #[test]
    fn tracker_records_peak_words_and_depth() {
        let mut pool = ScratchPool::with_hint(1, true);
        pool.tracker_mut().push_stack_frame();
        let a = pool.ranked(128);
        pool.tracker_mut().push_stack_frame();
        let b = pool.bitset(64);
        assert_eq!(pool.tracker().max_space_used(), 2 + 3 + 1);
        pool.recycle(b);
        pool.tracker_mut().pop_stack_frame();
        pool.recycle_ranked(a);
        pool.tracker_mut().pop_stack_frame();

        assert_eq!(pool.tracker().depth(), 0);
        let profile = pool.tracker_mut().take_profile().unwrap();
        assert_eq!(profile.max_depth, 2);
        assert_eq!(profile.max_scratch_words, 6);
    }

    #[test]
    fn ranked_sets_from_pool_are_finalized() {
        let mut pool = ScratchPool::for_query(10, 3, false);
        let set = pool.ranked(10);
        assert!(!set.is_dirty());
        assert_eq!(set.count(), 0);
        assert!(pool.tracker().profile().is_none());
    }
}
