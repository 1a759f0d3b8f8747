//! Stack-based tree traversals
//!
//! Both visitors run with an explicit stack, so deep caterpillar trees do
//! not exhaust the call stack.

use super::Tree;

/// Visit every node below `root`, parents before children, left before
/// right.
pub fn foreach_preorder<F: FnMut(usize)>(tree: &Tree, root: usize, mut visit: F) {
    if root >= tree.len() {
        return;
    }
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        visit(i);
        let node = tree[i];
        if !node.is_leaf() {
            stack.push(node.right);
            stack.push(node.left);
        }
    }
}

/// Visit every node below `root`, children before parents, left before
/// right.
pub fn foreach_postorder<F: FnMut(usize)>(tree: &Tree, root: usize, mut visit: F) {
    if root >= tree.len() {
        return;
    }
    // (node, children already pushed)
    let mut stack = vec![(root, false)];
    while let Some((i, expanded)) = stack.pop() {
        let node = tree[i];
        if expanded || node.is_leaf() {
            visit(i);
        } else {
            stack.push((i, true));
            stack.push((node.right, false));
            stack.push((node.left, false));
        }
    }
}

/// Preorder node sequence from the root.
pub fn preorder(tree: &Tree) -> Vec<usize> {
    let mut order = Vec::with_capacity(tree.len());
    foreach_preorder(tree, 0, |i| order.push(i));
    order
}

/// Postorder node sequence from the root.
pub fn postorder(tree: &Tree) -> Vec<usize> {
    let mut order = Vec::with_capacity(tree.len());
    foreach_postorder(tree, 0, |i| order.push(i));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NONE};

    // ((3,4)2,1)0
    fn sample() -> Tree {
        Tree::from_nodes(vec![
            Node::new(NONE, 2, 1),
            Node::leaf(0),
            Node::new(0, 3, 4),
            Node::leaf(2),
            Node::leaf(2),
        ])
    }

    #[test]
    fn preorder_visits_parents_first() {
        assert_eq!(preorder(&sample()), vec![0, 2, 3, 4, 1]);
    }

    #[test]
    fn postorder_visits_children_first() {
        assert_eq!(postorder(&sample()), vec![3, 4, 2, 1, 0]);
    }

    #[test]
    fn subtree_traversal() {
        let tree = sample();
        let mut seen = Vec::new();
        foreach_postorder(&tree, 2, |i| seen.push(i));
        assert_eq!(seen, vec![3, 4, 2]);
    }

    #[test]
    fn out_of_range_root_visits_nothing() {
        let mut visits = 0;
        foreach_preorder(&Tree::default(), 0, |_| visits += 1);
        assert_eq!(visits, 0);
    }
}
