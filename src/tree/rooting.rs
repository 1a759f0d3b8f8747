//! In-place rerooting at a leaf
//!
//! The root node keeps index 0 and afterwards has the chosen leaf as its
//! right child. Every node on the path from the leaf's parent up to the
//! old child of the root swaps parent and child roles; the old root's
//! other subtree hangs below the last node on that path.

use super::{Tree, NONE};
use crate::TerraceError;

/// Reroot `tree` so that `leaf` becomes a child of the root.
///
/// A leaf that already is a child of the root leaves the tree untouched.
/// Any index that is not a leaf of `tree` is rejected with
/// [`TerraceError::InvalidArgument`].
pub fn reroot_inplace(tree: &mut Tree, leaf: usize) -> Result<(), TerraceError> {
    if leaf >= tree.len() {
        return Err(TerraceError::InvalidArgument(format!(
            "node {leaf} is outside a tree of {} nodes",
            tree.len()
        )));
    }
    if tree.len() == 1 {
        return Ok(());
    }
    if !tree.is_leaf(leaf) {
        return Err(TerraceError::InvalidArgument(format!(
            "node {leaf} is not a leaf"
        )));
    }

    let parent = tree[leaf].parent;
    if parent == 0 {
        return Ok(());
    }

    // parent(leaf), ..., c where c is a child of the root
    let mut path = vec![parent];
    let mut current = parent;
    while tree[current].parent != 0 {
        current = tree[current].parent;
        if current == NONE || path.len() > tree.len() {
            return Err(TerraceError::bad_input(format!(
                "node {leaf} is not connected to the root"
            )));
        }
        path.push(current);
    }
    let root_child = current;
    let root = tree[0];
    let sibling = if root.left == root_child {
        root.right
    } else {
        root.left
    };

    for (step, &node) in path.iter().enumerate() {
        let below = if step == 0 { leaf } else { path[step - 1] };
        let above = path.get(step + 1).copied().unwrap_or(sibling);
        tree[node].replace_child(below, above);
        tree[node].parent = if step == 0 { 0 } else { path[step - 1] };
    }
    tree[sibling].parent = root_child;
    tree[leaf].parent = 0;
    tree[0].left = parent;
    tree[0].right = leaf;
    Ok(())
}
