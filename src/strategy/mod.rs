//! Result strategies for the enumeration driver
//!
//! The driver in [`crate::engine`] only knows how to split leaf sets; what a
//! split *means* is decided by a [`Strategy`]: base cases produce values,
//! `combine` joins the two halves of one bipartition and `accumulate` sums
//! over bipartitions.

mod check;
mod count;
mod logging;
mod multitree;

pub use check::CheckStrategy;
pub use count::{count_unrooted_trees, ClampedU64, CountStrategy, TreeCount};
pub use logging::LoggingStrategy;
pub use multitree::MultitreeStrategy;

use crate::bits::{BitSet, RankedBitSet};
use crate::constraints::Constraint;
use crate::sets::BipartitionEnumerator;

/// Callbacks driven by [`TreeEnumerator`](crate::engine::TreeEnumerator).
///
/// Every hook except the base cases, `combine` and `accumulate` has a no-op
/// default.
pub trait Strategy: Send + Sized {
    /// Value computed for a leaf set.
    type Output: Clone + Send;

    /// Called when a (sub)call begins.
    fn enter(&mut self, _leaves: &RankedBitSet) {}

    /// Called when a (sub)call finishes.
    fn exit(&mut self, value: Self::Output) -> Self::Output {
        value
    }

    /// Value for a single leaf.
    fn base_one_leaf(&mut self, leaf: usize) -> Self::Output;

    /// Value for exactly two leaves.
    fn base_two_leaves(&mut self, first: usize, second: usize) -> Self::Output;

    /// Value for three or more leaves without any applicable constraint.
    fn base_unconstrained(&mut self, leaves: &RankedBitSet) -> Self::Output;

    /// Short-circuit value, if the answer is known without descending.
    fn fast_return(&mut self, _bips: &BipartitionEnumerator<'_>) -> Option<Self::Output> {
        None
    }

    /// Empty accumulator for the bipartitions of one leaf set.
    fn begin_iteration(
        &mut self,
        bips: &BipartitionEnumerator<'_>,
        active: &BitSet,
        constraints: &[Constraint],
    ) -> Self::Output;

    /// Whether to keep iterating given the running total.
    fn continue_iteration(&self, _acc: &Self::Output) -> bool {
        true
    }

    /// Called at the start of every bipartition.
    fn step_iteration(&mut self, _bips: &BipartitionEnumerator<'_>) {}

    /// Called once the bipartition loop is done.
    fn finish_iteration(&mut self) {}

    /// Called before descending into the left half.
    fn left_subcall(&mut self) {}

    /// Called before descending into the right half.
    fn right_subcall(&mut self) {}

    /// Join the values of the two halves of one bipartition.
    fn combine(&mut self, left: Self::Output, right: Self::Output) -> Self::Output;

    /// Add the value of one bipartition to the running total.
    fn accumulate(&mut self, acc: Self::Output, value: Self::Output) -> Self::Output;

    /// Independent instance for a parallel worker.
    fn fork(&self) -> Self;

    /// Take over a finished worker, translating its two results into values
    /// valid for `self`.
    fn absorb(
        &mut self,
        _worker: Self,
        left: Self::Output,
        right: Self::Output,
    ) -> (Self::Output, Self::Output) {
        (left, right)
    }
}
