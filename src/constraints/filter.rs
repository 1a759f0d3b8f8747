//! Restricting constraints to a leaf subset.

use super::Constraint;
use crate::bits::{BitSet, RankedBitSet};
use crate::sets::UnionFind;

/// Active constraints whose three leaves all lie in `leaves`.
pub fn filter_constraints(
    leaves: &RankedBitSet,
    active: &BitSet,
    constraints: &[Constraint],
) -> BitSet {
    let mut result = BitSet::new(active.size());
    filter_constraints_into(leaves, active, constraints, &mut result);
    result
}

/// [`filter_constraints`] writing into a caller-provided set.
pub fn filter_constraints_into(
    leaves: &RankedBitSet,
    active: &BitSet,
    constraints: &[Constraint],
    result: &mut BitSet,
) {
    debug_assert_eq!(result.size(), active.size());
    result.blank();
    for index in active.iter() {
        let constraint = &constraints[index];
        if constraint.leaves().iter().all(|&leaf| leaves.get(leaf)) {
            result.set(index);
        }
    }
}

/// Union-find over the ranks of `leaves`, merging `shared` with `left` for
/// every active constraint.
pub fn apply_constraints(
    leaves: &RankedBitSet,
    active: &BitSet,
    constraints: &[Constraint],
) -> UnionFind {
    let mut sets = UnionFind::new(leaves.count());
    for index in active.iter() {
        let constraint = &constraints[index];
        sets.merge(leaves.rank(constraint.shared), leaves.rank(constraint.left));
    }
    sets
}

/// Express every constraint in the rank space of `leaves`.
pub fn map_constraints(leaves: &RankedBitSet, constraints: &[Constraint]) -> Vec<Constraint> {
    constraints
        .iter()
        .map(|c| {
            debug_assert!(c.leaves().iter().all(|&leaf| leaves.get(leaf)));
            Constraint::new(leaves.rank(c.shared), leaves.rank(c.left), leaves.rank(c.right))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(size: usize, members: &[usize]) -> RankedBitSet {
        RankedBitSet::from_bitset(BitSet::from_indices(size, members.iter().copied()))
    }

    fn sample() -> Vec<Constraint> {
        vec![
            Constraint::new(0, 1, 2),
            Constraint::new(3, 4, 0),
            Constraint::new(1, 4, 5),
        ]
    }

    #[test]
    fn keeps_only_contained_constraints() {
        let constraints = sample();
        let subset = leaves(6, &[0, 1, 2, 4, 5]);
        let active = BitSet::full(3);
        let kept = filter_constraints(&subset, &active, &constraints);
        assert_eq!(kept.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn inactive_constraints_stay_out() {
        let constraints = sample();
        let all = leaves(6, &[0, 1, 2, 3, 4, 5]);
        let active = BitSet::from_indices(3, [1]);
        let kept = filter_constraints(&all, &active, &constraints);
        assert_eq!(kept.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn union_find_merges_shared_and_left_ranks() {
        let constraints = sample();
        let subset = leaves(6, &[0, 1, 2, 4, 5]);
        let active = filter_constraints(&subset, &BitSet::full(3), &constraints);
        let mut sets = apply_constraints(&subset, &active, &constraints);
        // ranks: 0->0, 1->1, 2->2, 4->3, 5->4
        assert_eq!(sets.find(0), sets.find(1));
        assert_eq!(sets.find(1), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
        assert_ne!(sets.find(0), sets.find(4));
        assert_eq!(sets.groups(), 3);
    }

    #[test]
    fn mapping_compacts_indices() {
        let subset = leaves(10, &[2, 5, 9]);
        let mapped = map_constraints(&subset, &[Constraint::new(9, 2, 5)]);
        assert_eq!(mapped, vec![Constraint::new(2, 0, 1)]);
    }
}
