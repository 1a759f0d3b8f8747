//! Tracing decorator around any strategy.

use std::fmt::Debug;

use tracing::trace;

use super::Strategy;
use crate::bits::{BitSet, RankedBitSet};
use crate::constraints::Constraint;
use crate::sets::BipartitionEnumerator;

/// Forwards every callback to `inner` and emits a `trace` event for it,
/// indented by recursion depth.
#[derive(Debug, Clone)]
pub struct LoggingStrategy<S> {
    inner: S,
    depth: usize,
}

impl<S> LoggingStrategy<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner, depth: 0 }
    }

    /// Unwrap.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Wrapped strategy.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S> Strategy for LoggingStrategy<S>
where
    S: Strategy,
    S::Output: Debug,
{
    type Output = S::Output;

    fn enter(&mut self, leaves: &RankedBitSet) {
        trace!(depth = self.depth, ?leaves, "enter");
        self.depth += 1;
        self.inner.enter(leaves);
    }

    fn exit(&mut self, value: S::Output) -> S::Output {
        self.depth = self.depth.saturating_sub(1);
        let value = self.inner.exit(value);
        trace!(depth = self.depth, ?value, "exit");
        value
    }

    fn base_one_leaf(&mut self, leaf: usize) -> S::Output {
        trace!(depth = self.depth, leaf, "base case: one leaf");
        self.inner.base_one_leaf(leaf)
    }

    fn base_two_leaves(&mut self, first: usize, second: usize) -> S::Output {
        trace!(depth = self.depth, first, second, "base case: two leaves");
        self.inner.base_two_leaves(first, second)
    }

    fn base_unconstrained(&mut self, leaves: &RankedBitSet) -> S::Output {
        trace!(depth = self.depth, ?leaves, "base case: unconstrained");
        self.inner.base_unconstrained(leaves)
    }

    fn fast_return(&mut self, bips: &BipartitionEnumerator<'_>) -> Option<S::Output> {
        let value = self.inner.fast_return(bips);
        if value.is_some() {
            trace!(depth = self.depth, bipartitions = bips.num_bip(), "fast return");
        }
        value
    }

    fn begin_iteration(
        &mut self,
        bips: &BipartitionEnumerator<'_>,
        active: &BitSet,
        constraints: &[Constraint],
    ) -> S::Output {
        let active_constraints: Vec<String> = active
            .iter()
            .map(|index| constraints[index].to_string())
            .collect();
        trace!(
            depth = self.depth,
            bipartitions = bips.num_bip(),
            groups = bips.num_groups(),
            ?active_constraints,
            "begin iteration"
        );
        self.inner.begin_iteration(bips, active, constraints)
    }

    fn continue_iteration(&self, acc: &S::Output) -> bool {
        self.inner.continue_iteration(acc)
    }

    fn step_iteration(&mut self, bips: &BipartitionEnumerator<'_>) {
        trace!(
            depth = self.depth,
            bipartition = bips.cur_bip(),
            left = ?bips.current_set(),
            "bipartition"
        );
        self.inner.step_iteration(bips);
    }

    fn finish_iteration(&mut self) {
        trace!(depth = self.depth, "finish iteration");
        self.inner.finish_iteration();
    }

    fn left_subcall(&mut self) {
        self.inner.left_subcall();
    }

    fn right_subcall(&mut self) {
        self.inner.right_subcall();
    }

    fn combine(&mut self, left: S::Output, right: S::Output) -> S::Output {
        self.inner.combine(left, right)
    }

    fn accumulate(&mut self, acc: S::Output, value: S::Output) -> S::Output {
        self.inner.accumulate(acc, value)
    }

    fn fork(&self) -> Self {
        Self {
            inner: self.inner.fork(),
            depth: self.depth,
        }
    }

    fn absorb(
        &mut self,
        worker: Self,
        left: S::Output,
        right: S::Output,
    ) -> (S::Output, S::Output) {
        self.inner.absorb(worker.inner, left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::CheckStrategy;

    #[test]
    fn forwards_to_the_inner_strategy() {
        let mut logged = LoggingStrategy::new(CheckStrategy);
        assert_eq!(logged.base_one_leaf(0), 1);
        assert_eq!(logged.combine(1, 2), 2);
        assert!(!logged.continue_iteration(&2));

        let leaves = RankedBitSet::full(3);
        logged.enter(&leaves);
        assert_eq!(logged.depth, 1);
        logged.exit(1);
        assert_eq!(logged.depth, 0);
    }
}
