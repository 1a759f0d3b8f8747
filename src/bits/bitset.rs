//! Fixed-capacity bit set over 64-bit words.

use std::fmt;

/// Number of bits stored per word.
pub const WORD_BITS: usize = 64;

/// Number of words needed to store `size` bits.
#[inline]
pub fn words_for(size: usize) -> usize {
    (size + WORD_BITS - 1) / WORD_BITS
}

/// Fixed-capacity set of indices in `[0, size)`.
///
/// Bits past `size` in the last word are always kept clear, so whole-word
/// operations (`count`, comparisons, hashing) never see padding.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitSet {
    words: Vec<u64>,
    size: usize,
}

impl BitSet {
    /// Create an empty set with capacity `size`.
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; words_for(size)],
            size,
        }
    }

    /// Create a set containing every index in `[0, size)`.
    pub fn full(size: usize) -> Self {
        let mut set = Self::new(size);
        set.fill();
        set
    }

    /// Create a set of capacity `size`, reusing `buffer` for storage.
    pub fn with_buffer(size: usize, mut buffer: Vec<u64>) -> Self {
        buffer.clear();
        buffer.resize(words_for(size), 0);
        Self {
            words: buffer,
            size,
        }
    }

    /// Create a set from an iterator of members.
    pub fn from_indices<I: IntoIterator<Item = usize>>(size: usize, indices: I) -> Self {
        let mut set = Self::new(size);
        for index in indices {
            set.set(index);
        }
        set
    }

    /// Release the underlying word buffer.
    pub fn into_words(self) -> Vec<u64> {
        self.words
    }

    /// Capacity of the set.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw words, least significant bit first.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Membership test.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.size, "index {index} out of range {}", self.size);
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Insert `index`.
    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.size, "index {index} out of range {}", self.size);
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
    }

    /// Remove `index`.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < self.size, "index {index} out of range {}", self.size);
        self.words[index / WORD_BITS] &= !(1 << (index % WORD_BITS));
    }

    /// Toggle `index`.
    #[inline]
    pub fn flip(&mut self, index: usize) {
        debug_assert!(index < self.size, "index {index} out of range {}", self.size);
        self.words[index / WORD_BITS] ^= 1 << (index % WORD_BITS);
    }

    /// Remove every member.
    pub fn blank(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    /// Insert every index in `[0, size)`.
    pub fn fill(&mut self) {
        self.words.iter_mut().for_each(|word| *word = u64::MAX);
        self.clear_padding();
    }

    /// Complement within the capacity.
    pub fn invert(&mut self) {
        self.words.iter_mut().for_each(|word| *word = !*word);
        self.clear_padding();
    }

    /// In-place union.
    pub fn or_with(&mut self, other: &BitSet) {
        debug_assert_eq!(self.size, other.size);
        for (word, &other) in self.words.iter_mut().zip(&other.words) {
            *word |= other;
        }
    }

    /// In-place intersection.
    pub fn and_with(&mut self, other: &BitSet) {
        debug_assert_eq!(self.size, other.size);
        for (word, &other) in self.words.iter_mut().zip(&other.words) {
            *word &= other;
        }
    }

    /// In-place symmetric difference.
    pub fn xor_with(&mut self, other: &BitSet) {
        debug_assert_eq!(self.size, other.size);
        for (word, &other) in self.words.iter_mut().zip(&other.words) {
            *word ^= other;
        }
    }

    /// Number of members.
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Whether the set has no members.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Whether every member of `self` is also in `other`.
    pub fn is_subset_of(&self, other: &BitSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(&word, &other)| word & !other == 0)
    }

    /// Smallest member.
    pub fn first_set(&self) -> Option<usize> {
        self.next_set(0)
    }

    /// Smallest member that is `>= from`.
    pub fn next_set(&self, from: usize) -> Option<usize> {
        if from >= self.size {
            return None;
        }
        let mut word_index = from / WORD_BITS;
        let mut word = self.words[word_index] & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                return Some(word_index * WORD_BITS + word.trailing_zeros() as usize);
            }
            word_index += 1;
            if word_index >= self.words.len() {
                return None;
            }
            word = self.words[word_index];
        }
    }

    /// Iterate over members in increasing order.
    pub fn iter(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn clear_padding(&mut self) {
        let tail = self.size % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Ones<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of a [`BitSet`].
#[derive(Debug, Clone)]
pub struct Ones<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_index += 1;
            if self.word_index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.word_index];
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.word_index * WORD_BITS + bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clear_flip() {
        let mut set = BitSet::new(130);
        set.set(0);
        set.set(64);
        set.set(129);
        assert!(set.get(0) && set.get(64) && set.get(129));
        assert_eq!(set.count(), 3);

        set.clear(64);
        set.flip(1);
        set.flip(0);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 129]);
    }

    #[test]
    fn invert_respects_capacity() {
        let mut set = BitSet::new(70);
        set.set(3);
        set.invert();
        assert_eq!(set.count(), 69);
        assert!(!set.get(3));
        assert_eq!(set, {
            let mut expected = BitSet::full(70);
            expected.clear(3);
            expected
        });
    }

    #[test]
    fn next_set_crosses_words() {
        let set = BitSet::from_indices(200, [5, 70, 199]);
        assert_eq!(set.first_set(), Some(5));
        assert_eq!(set.next_set(6), Some(70));
        assert_eq!(set.next_set(71), Some(199));
        assert_eq!(set.next_set(200), None);
    }

    #[test]
    fn empty_capacity_is_legal() {
        let set = BitSet::new(0);
        assert_eq!(set.count(), 0);
        assert!(set.is_clear());
        assert_eq!(set.first_set(), None);
        assert_eq!(set.iter().count(), 0);
        assert!(BitSet::full(0).is_clear());
    }

    #[test]
    fn xor_yields_complement_within_superset() {
        let all = BitSet::from_indices(10, [1, 2, 4, 8]);
        let mut part = BitSet::from_indices(10, [2, 8]);
        part.xor_with(&all);
        assert_eq!(part.iter().collect::<Vec<_>>(), vec![1, 4]);
        assert!(part.is_subset_of(&all));
    }

    #[test]
    fn buffer_reuse_clears_previous_content() {
        let buffer = BitSet::full(128).into_words();
        let set = BitSet::with_buffer(65, buffer);
        assert!(set.is_clear());
        assert_eq!(set.words().len(), 2);
    }
}
