//! Terrace existence check.

use super::Strategy;
use crate::bits::{BitSet, RankedBitSet};
use crate::constraints::Constraint;
use crate::sets::BipartitionEnumerator;

/// Counts trees, saturating at 2, and stops as soon as 2 is reached.
///
/// A result greater than 1 means the tree lies on a terrace.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckStrategy;

const ENOUGH: u8 = 2;

impl Strategy for CheckStrategy {
    type Output = u8;

    fn base_one_leaf(&mut self, _leaf: usize) -> u8 {
        1
    }

    fn base_two_leaves(&mut self, _first: usize, _second: usize) -> u8 {
        1
    }

    fn base_unconstrained(&mut self, _leaves: &RankedBitSet) -> u8 {
        // three or more free leaves always admit several topologies
        ENOUGH
    }

    fn fast_return(&mut self, bips: &BipartitionEnumerator<'_>) -> Option<u8> {
        // three groups split at least three ways; each half admits a tree
        (bips.num_groups() > 2).then_some(ENOUGH)
    }

    fn begin_iteration(
        &mut self,
        _bips: &BipartitionEnumerator<'_>,
        _active: &BitSet,
        _constraints: &[Constraint],
    ) -> u8 {
        0
    }

    fn continue_iteration(&self, acc: &u8) -> bool {
        *acc < ENOUGH
    }

    fn combine(&mut self, left: u8, right: u8) -> u8 {
        left.saturating_mul(right).min(ENOUGH)
    }

    fn accumulate(&mut self, acc: u8, value: u8) -> u8 {
        acc.saturating_add(value).min(ENOUGH)
    }

    fn fork(&self) -> Self {
        *self
    }
}
