//! Multitree construction.

use super::Strategy;
use crate::bits::{BitSet, RankedBitSet};
use crate::constraints::Constraint;
use crate::multitree::{Multitree, MultitreeArena, NodeId};
use crate::sets::BipartitionEnumerator;

/// Builds the multitree of the terrace in an arena; every value is the id of
/// the node describing the current leaf set.
#[derive(Debug, Clone, Default)]
pub struct MultitreeStrategy {
    arena: MultitreeArena,
}

impl MultitreeStrategy {
    /// Strategy with an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes allocated so far.
    pub fn arena(&self) -> &MultitreeArena {
        &self.arena
    }

    /// Finish with `root` as the multitree root.
    pub fn into_multitree(self, root: NodeId) -> Multitree {
        Multitree::new(self.arena, root)
    }
}

impl Strategy for MultitreeStrategy {
    type Output = NodeId;

    fn base_one_leaf(&mut self, leaf: usize) -> NodeId {
        self.arena.single_leaf(leaf)
    }

    fn base_two_leaves(&mut self, first: usize, second: usize) -> NodeId {
        self.arena.two_leaves(first, second)
    }

    fn base_unconstrained(&mut self, leaves: &RankedBitSet) -> NodeId {
        self.arena.unconstrained(leaves.iter())
    }

    fn begin_iteration(
        &mut self,
        bips: &BipartitionEnumerator<'_>,
        _active: &BitSet,
        _constraints: &[Constraint],
    ) -> NodeId {
        // capacity is only a hint; huge bipartition counts are never filled
        let capacity = usize::try_from(bips.num_bip()).unwrap_or(usize::MAX);
        self.arena
            .alternatives(capacity.min(1 << 16), bips.leaves().count())
    }

    fn combine(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.arena.inner(left, right)
    }

    fn accumulate(&mut self, acc: NodeId, value: NodeId) -> NodeId {
        self.arena.push_alternative(acc, value);
        acc
    }

    fn fork(&self) -> Self {
        Self::new()
    }

    fn absorb(&mut self, worker: Self, left: NodeId, right: NodeId) -> (NodeId, NodeId) {
        let relocation = self.arena.absorb(worker.arena);
        (relocation.apply(left), relocation.apply(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn absorbed_worker_results_stay_valid() {
        let mut main = MultitreeStrategy::new();
        main.base_one_leaf(9);

        let mut worker = main.fork();
        let leaves = RankedBitSet::full(3);
        let left = worker.base_unconstrained(&leaves);
        let right = worker.base_two_leaves(3, 4);

        let (left, right) = main.absorb(worker, left, right);
        let joined = main.combine(left, right);
        let multitree = main.into_multitree(joined);
        assert_eq!(multitree.num_leaves(), 5);
        assert_eq!(multitree.num_trees(), BigUint::from(3u32));
    }
}
