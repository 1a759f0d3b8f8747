//! Recursive divide-and-conquer over leaf sets
//!
//! [`TreeEnumerator`] splits a leaf set along every bipartition that keeps
//! the groups induced by the active constraints together, recurses into
//! both halves and lets a [`Strategy`] decide what the halves add up to.
//!
//! ## Recursion
//!
//! ```text
//! run(leaves, active):
//!     1 leaf, 2 leaves         -> base case
//!     no constraint applies    -> unconstrained base case
//!     otherwise for each bipartition (L, R):
//!         acc += combine(run(L), run(R))
//! ```
//!
//! Scratch sets come from a per-enumerator [`ScratchPool`]; its tracker
//! records recursion depth and peak scratch words.

#[cfg(feature = "parallel")]
mod parallel;

use tracing::debug;

use crate::bits::{BitSet, RankedBitSet};
use crate::constraints::{apply_constraints, filter_constraints_into, validate_query, Constraint};
use crate::sets::{BipartitionEnumerator, UnionFind};
use crate::space::{ScratchPool, SpaceProfile};
use crate::strategy::Strategy;
use crate::{TerraceConfig, TerraceError};

/// Drives a [`Strategy`] over the tree space described by a set of
/// constraints.
#[derive(Debug)]
pub struct TreeEnumerator<S: Strategy> {
    strategy: S,
    config: TerraceConfig,
    pool: ScratchPool,
}

impl<S: Strategy> TreeEnumerator<S> {
    /// Enumerator with the default configuration.
    pub fn new(strategy: S) -> Self {
        Self::with_config(strategy, TerraceConfig::default())
    }

    /// Enumerator with an explicit configuration.
    pub fn with_config(strategy: S, config: TerraceConfig) -> Self {
        let pool = ScratchPool::with_hint(1, config.profile_space);
        Self {
            strategy,
            config,
            pool,
        }
    }

    /// Access configuration.
    pub fn config(&self) -> &TerraceConfig {
        &self.config
    }

    /// The strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Mutable access to the strategy.
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Give up the enumerator, keeping the strategy and whatever it built.
    pub fn into_strategy(self) -> S {
        self.strategy
    }

    /// Space profile of the last query, if profiling is enabled.
    pub fn space_profile(&self) -> Option<&SpaceProfile> {
        self.pool.tracker().profile()
    }

    /// Peak scratch words of the last query.
    pub fn max_scratch_words(&self) -> usize {
        self.pool.tracker().max_space_used()
    }

    fn reset_pool(&mut self, num_leaves: usize, num_constraints: usize) {
        self.pool = ScratchPool::for_query(num_leaves, num_constraints, self.config.profile_space);
    }

    /// Enumerate rooted trees on `num_leaves` leaves satisfying
    /// `constraints`.
    pub fn run_rooted(
        &mut self,
        num_leaves: usize,
        constraints: &[Constraint],
    ) -> Result<S::Output, TerraceError> {
        validate_query(num_leaves, constraints, None)?;
        self.reset_pool(num_leaves, constraints.len());
        debug!(
            leaves = num_leaves,
            constraints = constraints.len(),
            "enumerating rooted trees"
        );

        let leaves = RankedBitSet::full(num_leaves);
        let active = BitSet::full(constraints.len());
        self.run(&leaves, &active, constraints)
    }

    /// Enumerate the trees whose top-level split separates `root_leaf` from
    /// every other leaf, i.e. the unrooted trees on `num_leaves` leaves.
    pub fn run_rooted_at(
        &mut self,
        num_leaves: usize,
        constraints: &[Constraint],
        root_leaf: usize,
    ) -> Result<S::Output, TerraceError> {
        validate_query(num_leaves, constraints, Some(root_leaf))?;
        self.reset_pool(num_leaves, constraints.len());
        debug!(
            leaves = num_leaves,
            constraints = constraints.len(),
            root = root_leaf,
            "enumerating trees rooted at a leaf"
        );

        let leaves = RankedBitSet::full(num_leaves);
        let active = BitSet::full(constraints.len());
        if num_leaves <= 2 {
            return self.run(&leaves, &active, constraints);
        }

        self.strategy.enter(&leaves);
        self.pool.tracker_mut().push_stack_frame();
        let representative = if root_leaf == 0 { 1 } else { 0 };
        let mut sets = UnionFind::new(num_leaves);
        for leaf in (0..num_leaves).filter(|&leaf| leaf != root_leaf) {
            sets.merge(representative, leaf);
        }
        let result = self.iterate(&leaves, &active, constraints, &mut sets);
        self.pool.tracker_mut().pop_stack_frame();
        Ok(self.strategy.exit(result?))
    }

    /// One recursive call on `leaves`, with `active` selecting the
    /// constraints that may still apply.
    pub fn run(
        &mut self,
        leaves: &RankedBitSet,
        active: &BitSet,
        constraints: &[Constraint],
    ) -> Result<S::Output, TerraceError> {
        self.strategy.enter(leaves);
        self.pool.tracker_mut().push_stack_frame();
        let result = self.solve(leaves, active, constraints);
        self.pool.tracker_mut().pop_stack_frame();
        Ok(self.strategy.exit(result?))
    }

    fn solve(
        &mut self,
        leaves: &RankedBitSet,
        active: &BitSet,
        constraints: &[Constraint],
    ) -> Result<S::Output, TerraceError> {
        let mut members = leaves.iter();
        match (members.next(), members.next(), members.next()) {
            (None, _, _) => Err(TerraceError::bad_input("cannot split an empty leaf set")),
            (Some(leaf), None, _) => Ok(self.strategy.base_one_leaf(leaf)),
            (Some(first), Some(second), None) => Ok(self.strategy.base_two_leaves(first, second)),
            _ => {
                let mut applicable = self.pool.bitset(active.size());
                filter_constraints_into(leaves, active, constraints, &mut applicable);
                let result = if applicable.is_clear() {
                    Ok(self.strategy.base_unconstrained(leaves))
                } else {
                    let mut sets = apply_constraints(leaves, &applicable, constraints);
                    self.iterate(leaves, &applicable, constraints, &mut sets)
                };
                self.pool.recycle(applicable);
                result
            }
        }
    }

    fn iterate(
        &mut self,
        leaves: &RankedBitSet,
        active: &BitSet,
        constraints: &[Constraint],
        sets: &mut UnionFind,
    ) -> Result<S::Output, TerraceError> {
        let buffer = self.pool.ranked(leaves.size());
        let mut bips = BipartitionEnumerator::with_buffer(leaves, sets, buffer);

        let result = if let Some(value) = self.strategy.fast_return(&bips) {
            Ok(value)
        } else if let Err(err) = bips.ensure_countable() {
            Err(err)
        } else if self.should_parallelize(&bips) {
            self.iterate_parallel(&mut bips, active, constraints)
        } else {
            self.iterate_sequential(&mut bips, active, constraints)
        };
        self.pool.recycle_ranked(bips.into_buffer());
        result
    }

    fn iterate_sequential(
        &mut self,
        bips: &mut BipartitionEnumerator<'_>,
        active: &BitSet,
        constraints: &[Constraint],
    ) -> Result<S::Output, TerraceError> {
        let mut acc = self.strategy.begin_iteration(bips, active, constraints);
        while bips.is_valid() && self.strategy.continue_iteration(&acc) {
            self.strategy.step_iteration(bips);

            self.strategy.left_subcall();
            let left = self.run(bips.current_set(), active, constraints)?;
            bips.flip_sets();
            self.strategy.right_subcall();
            let right = self.run(bips.current_set(), active, constraints)?;

            let value = self.strategy.combine(left, right);
            acc = self.strategy.accumulate(acc, value);
            bips.increase();
        }
        self.strategy.finish_iteration();
        Ok(acc)
    }

    #[cfg(feature = "parallel")]
    fn should_parallelize(&self, bips: &BipartitionEnumerator<'_>) -> bool {
        self.config.parallel
            && bips.leaves().count() > self.config.parallel_min_leaves
            && bips.num_bip() > rayon::current_num_threads() as u64
    }

    #[cfg(not(feature = "parallel"))]
    fn should_parallelize(&self, _bips: &BipartitionEnumerator<'_>) -> bool {
        false
    }

    #[cfg(feature = "parallel")]
    fn iterate_parallel(
        &mut self,
        bips: &mut BipartitionEnumerator<'_>,
        active: &BitSet,
        constraints: &[Constraint],
    ) -> Result<S::Output, TerraceError> {
        parallel::iterate(self, bips, active, constraints)
    }

    #[cfg(not(feature = "parallel"))]
    fn iterate_parallel(
        &mut self,
        bips: &mut BipartitionEnumerator<'_>,
        active: &BitSet,
        constraints: &[Constraint],
    ) -> Result<S::Output, TerraceError> {
        self.iterate_sequential(bips, active, constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{CheckStrategy, ClampedU64, CountStrategy, MultitreeStrategy};
    use num_bigint::BigUint;

    fn count(num_leaves: usize, constraints: &[Constraint]) -> u64 {
        TreeEnumerator::new(CountStrategy::<ClampedU64>::new())
            .run_rooted(num_leaves, constraints)
            .unwrap()
            .value()
    }

    fn check(num_leaves: usize, constraints: &[Constraint]) -> bool {
        TreeEnumerator::new(CheckStrategy)
            .run_rooted(num_leaves, constraints)
            .unwrap()
            > 1
    }

    fn two_constraints() -> Vec<Constraint> {
        vec![Constraint::new(0, 1, 2), Constraint::new(4, 3, 1)]
    }

    #[test]
    fn unconstrained_rooted_counts() {
        assert_eq!(count(1, &[]), 1);
        assert_eq!(count(2, &[]), 1);
        assert_eq!(count(3, &[]), 3);
        assert_eq!(count(7, &[]), 10395);
    }

    #[test]
    fn constrained_rooted_counts() {
        assert_eq!(count(3, &[Constraint::new(1, 0, 2)]), 1);
        assert_eq!(count(5, &two_constraints()), 9);
    }

    #[test]
    fn check_agrees_with_counts() {
        assert!(!check(2, &[]));
        assert!(check(3, &[]));
        assert!(!check(3, &[Constraint::new(1, 0, 2)]));
        assert!(check(5, &two_constraints()));
    }

    #[test]
    fn rooting_at_a_leaf_counts_unrooted_trees() {
        let expected = [1u64, 1, 1, 3, 15, 105];
        for (n, &trees) in (1..).zip(expected.iter()) {
            let counted = TreeEnumerator::new(CountStrategy::<ClampedU64>::new())
                .run_rooted_at(n, &[], 0)
                .unwrap();
            assert_eq!(counted.value(), trees, "{n} leaves");
        }
    }

    #[test]
    fn root_choice_does_not_change_unconstrained_counts() {
        for root in 0..6 {
            let counted = TreeEnumerator::new(CountStrategy::<ClampedU64>::new())
                .run_rooted_at(6, &[], root)
                .unwrap();
            assert_eq!(counted.value(), 105);
        }
    }

    #[test]
    fn multitree_matches_bigint_count() {
        let constraints = two_constraints();
        let exact = TreeEnumerator::new(CountStrategy::<BigUint>::new())
            .run_rooted(5, &constraints)
            .unwrap();

        let mut enumerator = TreeEnumerator::new(MultitreeStrategy::new());
        let root = enumerator.run_rooted(5, &constraints).unwrap();
        let multitree = enumerator.into_strategy().into_multitree(root);
        assert_eq!(multitree.num_trees(), exact);
        assert_eq!(multitree.num_leaves(), 5);
        assert_eq!(multitree.topologies(usize::MAX).len(), 9);
    }

    #[test]
    fn invalid_queries_are_rejected() {
        let mut enumerator = TreeEnumerator::new(CountStrategy::<ClampedU64>::new());
        assert!(matches!(
            enumerator.run_rooted(0, &[]),
            Err(TerraceError::BadInput(_))
        ));
        assert!(enumerator.run_rooted_at(3, &[], 3).is_err());
        assert!(enumerator
            .run_rooted(3, &[Constraint::new(0, 1, 3)])
            .is_err());
    }

    #[test]
    fn profile_tracks_recursion() {
        let config = TerraceConfig::default().with_space_profiling(true);
        let mut enumerator =
            TreeEnumerator::with_config(CountStrategy::<ClampedU64>::new(), config);
        enumerator.run_rooted(5, &two_constraints()).unwrap();
        let profile = enumerator.space_profile().unwrap();
        assert!(profile.max_depth >= 2);
        assert!(profile.calls > 1);
        assert!(enumerator.max_scratch_words() > 0);
    }

    #[test]
    fn contradictory_constraints_are_rejected() {
        let constraints = [Constraint::new(0, 1, 2), Constraint::new(0, 2, 1)];
        assert!(matches!(
            TreeEnumerator::new(CheckStrategy).run_rooted(5, &constraints),
            Err(TerraceError::BadInput(_))
        ));
        assert!(matches!(
            TreeEnumerator::new(CountStrategy::<BigUint>::new()).run_rooted(5, &constraints),
            Err(TerraceError::BadInput(_))
        ));
    }

    #[test]
    fn check_answers_beyond_the_split_counter() {
        let constraints = [Constraint::new(1, 2, 3)];
        let on_terrace = TreeEnumerator::new(CheckStrategy)
            .run_rooted_at(70, &constraints, 0)
            .unwrap();
        assert_eq!(on_terrace, 2);

        let overflow = TreeEnumerator::new(CountStrategy::<BigUint>::new())
            .run_rooted_at(70, &constraints, 0);
        assert!(matches!(
            overflow,
            Err(TerraceError::TreeCountOverflow { groups: 68 })
        ));
    }
}
