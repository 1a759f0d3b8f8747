//! Satisfiability of a constraint set.
//!
//! Top-down grouping: on a leaf set, merge `shared` with `left` for every
//! constraint inside it. A set that collapses into one group has no valid
//! top split, so no tree satisfies the constraints. Otherwise each group
//! is checked again with the constraints that lie entirely inside it.

use super::Constraint;
use crate::sets::UnionFind;
use crate::TerraceError;

/// Reject constraint sets that no rooted tree on `num_leaves` leaves
/// satisfies. Indices must already be in range.
pub fn check_consistency(
    num_leaves: usize,
    constraints: &[Constraint],
) -> Result<(), TerraceError> {
    let mut slot = vec![usize::MAX; num_leaves];
    let mut pending = vec![(
        (0..num_leaves).collect::<Vec<_>>(),
        (0..constraints.len()).collect::<Vec<_>>(),
    )];

    while let Some((leaves, active)) = pending.pop() {
        if active.is_empty() {
            continue;
        }
        for (local, &leaf) in leaves.iter().enumerate() {
            slot[leaf] = local;
        }
        let mut sets = UnionFind::new(leaves.len());
        for &index in &active {
            let constraint = constraints[index];
            sets.merge(slot[constraint.shared], slot[constraint.left]);
        }
        if sets.groups() == 1 {
            return Err(TerraceError::bad_input(format!(
                "constraints admit no tree: {} cannot hold together with the \
                 other constraints on {} leaves",
                constraints[active[0]],
                leaves.len()
            )));
        }

        // group index per representative, in order of first member
        let mut part_of = vec![usize::MAX; leaves.len()];
        let mut parts: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
        for (local, &leaf) in leaves.iter().enumerate() {
            let rep = sets.find(local);
            if part_of[rep] == usize::MAX {
                part_of[rep] = parts.len();
                parts.push((Vec::new(), Vec::new()));
            }
            parts[part_of[rep]].0.push(leaf);
        }
        for &index in &active {
            let constraint = constraints[index];
            let part = part_of[sets.find(slot[constraint.shared])];
            if part_of[sets.find(slot[constraint.right])] == part {
                parts[part].1.push(index);
            }
        }
        pending.extend(parts.into_iter().filter(|(_, active)| !active.is_empty()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_orders_contradict() {
        let constraints = [Constraint::new(0, 1, 2), Constraint::new(0, 2, 1)];
        assert!(matches!(
            check_consistency(3, &constraints),
            Err(TerraceError::BadInput(_))
        ));
    }

    #[test]
    fn contradiction_below_the_top_split() {
        // 3 is kept apart at the top, then 0,1,2 form a cycle
        let constraints = [
            Constraint::new(0, 1, 3),
            Constraint::new(0, 1, 2),
            Constraint::new(1, 2, 0),
            Constraint::new(2, 0, 1),
        ];
        assert!(check_consistency(4, &constraints).is_err());
        assert!(check_consistency(4, &constraints[..2]).is_ok());
    }

    #[test]
    fn caterpillar_is_consistent() {
        let constraints: Vec<_> = (0..8).map(|i| Constraint::new(i, i + 1, i + 2)).collect();
        assert!(check_consistency(10, &constraints).is_ok());
        assert!(check_consistency(5, &[]).is_ok());
    }
}
