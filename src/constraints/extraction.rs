//! Constraint extraction from per-partition induced subtrees.

use tracing::debug;

use super::{map_constraints, Constraint, SupertreeData};
use crate::bits::{BitMatrix, RankedBitSet};
use crate::tree::{foreach_postorder, foreach_preorder, Tree, NONE};
use crate::TerraceError;

/// Subtree of the input tree induced by the species of one partition.
///
/// Node indices are those of the input tree; nodes that are not part of the
/// induced subtree stay detached.
#[derive(Debug, Clone)]
pub struct InducedSubtree {
    /// Node links, same length as the input tree.
    pub tree: Tree,
    /// Root of the induced subtree, [`NONE`] if the partition covers fewer
    /// than two leaves.
    pub root: usize,
}

/// Leaves of `tree`, as a finalized set over node indices.
pub fn leaf_occurrence(tree: &Tree) -> RankedBitSet {
    let mut leaves = RankedBitSet::new(tree.len());
    for leaf in tree.leaves() {
        leaves.set(leaf);
    }
    leaves.finalize();
    leaves
}

/// One induced subtree per column of `occurrence`.
///
/// Inner nodes are present if both of their children have data below them;
/// present nodes attach to the nearest present ancestor.
pub fn induced_subtrees(
    tree: &Tree,
    occurrence: &BitMatrix,
) -> Result<Vec<InducedSubtree>, TerraceError> {
    if occurrence.rows() != tree.len() {
        return Err(TerraceError::bad_input(format!(
            "occurrence matrix has {} rows for a tree of {} nodes",
            occurrence.rows(),
            tree.len()
        )));
    }
    let sites = occurrence.cols();

    let mut node_occ = occurrence.clone();
    foreach_postorder(tree, 0, |i| {
        let node = tree[i];
        if !node.is_leaf() {
            node_occ.row_or(node.left, node.right, i);
        }
    });

    let mut subtrees: Vec<InducedSubtree> = (0..sites)
        .map(|_| InducedSubtree {
            tree: Tree::detached(tree.len()),
            root: NONE,
        })
        .collect();
    // nearest present ancestors still missing a child, per site
    let mut boundaries: Vec<Vec<usize>> = vec![Vec::new(); sites];

    foreach_preorder(tree, 0, |i| {
        let node = tree[i];
        for (site, subtree) in subtrees.iter_mut().enumerate() {
            let leaf_present = node.is_leaf() && node_occ.get(i, site);
            let inner_present = !node.is_leaf()
                && node_occ.get(node.left, site)
                && node_occ.get(node.right, site);
            let boundary = &mut boundaries[site];

            if leaf_present || inner_present {
                match boundary.last().copied() {
                    Some(parent) => {
                        let out = &mut subtree.tree;
                        out[i].parent = parent;
                        if out[parent].left == NONE {
                            out[parent].left = i;
                        } else {
                            out[parent].right = i;
                            boundary.pop();
                        }
                    }
                    None if inner_present => subtree.root = i,
                    None => {}
                }
            }
            if inner_present {
                boundary.push(i);
            }
        }
    });

    Ok(subtrees)
}

/// Read the constraints off every induced subtree.
///
/// For an inner node `v` with children `l` and `r`, an inner `l` yields
/// `lca(leftmost(v), rightmost(l)) < lca(leftmost(v), rightmost(v))` and an
/// inner `r` yields `lca(rightmost(v), leftmost(r)) < lca(rightmost(v),
/// leftmost(v))`.
pub fn compute_constraints(subtrees: &[InducedSubtree]) -> Vec<Constraint> {
    let mut result = Vec::new();
    let Some(first) = subtrees.first() else {
        return result;
    };
    let mut outermost = vec![(NONE, NONE); first.tree.len()];

    for subtree in subtrees.iter().filter(|s| s.root != NONE) {
        let t = &subtree.tree;
        foreach_postorder(t, subtree.root, |i| {
            let node = t[i];
            outermost[i] = if node.is_leaf() {
                (i, i)
            } else {
                (outermost[node.left].0, outermost[node.right].1)
            };
        });

        foreach_preorder(t, subtree.root, |i| {
            let node = t[i];
            if node.is_leaf() {
                return;
            }
            let leftmost = outermost[i].0;
            let rightmost = outermost[i].1;
            if !t.is_leaf(node.left) {
                result.push(Constraint::new(
                    leftmost,
                    outermost[node.left].1,
                    rightmost,
                ));
            }
            if !t.is_leaf(node.right) {
                result.push(Constraint::new(
                    rightmost,
                    outermost[node.right].0,
                    leftmost,
                ));
            }
        });
    }
    result
}

/// Normalize, sort and deduplicate in place. Returns how many duplicates
/// were removed.
pub fn deduplicate_constraints(constraints: &mut Vec<Constraint>) -> usize {
    let before = constraints.len();
    for constraint in constraints.iter_mut() {
        *constraint = constraint.normalized();
    }
    constraints.sort_unstable();
    constraints.dedup();
    before - constraints.len()
}

/// Move node-indexed constraints and the root into dense leaf-rank space.
pub fn remap_to_leaves(
    tree: &Tree,
    constraints: &[Constraint],
    root_node: usize,
) -> Result<SupertreeData, TerraceError> {
    if root_node >= tree.len() || !tree.is_leaf(root_node) {
        return Err(TerraceError::bad_input(format!(
            "root node {root_node} is not a leaf of the tree"
        )));
    }
    let leaves = leaf_occurrence(tree);
    let data = SupertreeData::new(
        leaves.count(),
        map_constraints(&leaves, constraints),
        leaves.rank(root_node),
    );
    debug!(
        leaves = data.num_leaves,
        constraints = data.constraints.len(),
        root = data.root_leaf,
        "remapped constraints to leaf ranks"
    );
    Ok(data)
}
