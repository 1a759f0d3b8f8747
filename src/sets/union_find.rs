//! Disjoint sets over a dense index range.
//!
//! Union by rank with path compression. Representatives depend on merge
//! order, so callers compare groups through [`UnionFind::find`] only.

/// Union-find over `[0, len)`.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// `len` singleton groups.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the structure has no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the group containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the groups of `x` and `y`. Returns `false` if they were already
    /// in the same group.
    pub fn merge(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
        true
    }

    /// Point every element directly at its representative.
    pub fn compress(&mut self) {
        for x in 0..self.parent.len() {
            self.find(x);
        }
    }

    /// Number of distinct groups.
    pub fn groups(&self) -> usize {
        self.parent
            .iter()
            .enumerate()
            .filter(|&(x, &parent)| x == parent)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_until_merged() {
        let mut sets = UnionFind::new(5);
        assert_eq!(sets.groups(), 5);
        for x in 0..5 {
            assert_eq!(sets.find(x), x);
        }
    }

    #[test]
    fn merge_is_transitive() {
        let mut sets = UnionFind::new(6);
        assert!(sets.merge(0, 1));
        assert!(sets.merge(2, 3));
        assert!(sets.merge(1, 3));
        assert!(!sets.merge(0, 2));
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(4));
        assert_eq!(sets.groups(), 3);
    }

    #[test]
    fn find_is_idempotent_after_compress() {
        let mut sets = UnionFind::new(8);
        for x in 1..8 {
            sets.merge(x - 1, x);
        }
        sets.compress();
        let rep = sets.find(7);
        for x in 0..8 {
            let found = sets.find(x);
            assert_eq!(found, rep);
            assert_eq!(sets.find(found), rep);
        }
        assert_eq!(sets.groups(), 1);
    }

    #[test]
    fn empty_structure() {
        let sets = UnionFind::new(0);
        assert!(sets.is_empty());
        assert_eq!(sets.groups(), 0);
    }
}
