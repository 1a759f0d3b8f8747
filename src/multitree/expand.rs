//! Expansion of a multitree into concrete trees.

use super::{MultitreeArena, MultitreeNode, NodeId};
use crate::tree::{Node, Tree, TreeSet, NONE};

/// Owned rooted binary topology over leaf indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topology {
    /// A leaf.
    Leaf(usize),
    /// An inner node with its two subtrees.
    Pair(Box<Topology>, Box<Topology>),
}

impl Topology {
    /// Join two subtrees under a new root.
    pub fn pair(left: Topology, right: Topology) -> Self {
        Topology::Pair(Box::new(left), Box::new(right))
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        match self {
            Topology::Leaf(_) => 1,
            Topology::Pair(left, right) => left.num_leaves() + right.num_leaves(),
        }
    }

    /// Every way to attach `leaf` to an edge of `self` or above its root.
    fn insertions(&self, leaf: usize) -> Vec<Topology> {
        let mut result = vec![Topology::pair(self.clone(), Topology::Leaf(leaf))];
        if let Topology::Pair(left, right) = self {
            for l in left.insertions(leaf) {
                result.push(Topology::pair(l, (**right).clone()));
            }
            for r in right.insertions(leaf) {
                result.push(Topology::pair((**left).clone(), r));
            }
        }
        result
    }

    /// Preorder node array with the root at index 0, leaves named from
    /// `names` (falling back to the leaf index).
    pub fn to_tree_set(&self, names: &[String]) -> TreeSet {
        let mut nodes = Vec::with_capacity(2 * self.num_leaves() - 1);
        let mut node_names = Vec::with_capacity(nodes.capacity());
        self.build(NONE, &mut nodes, &mut node_names, names);
        TreeSet::new(Tree::from_nodes(nodes), node_names)
    }

    fn build(
        &self,
        parent: usize,
        nodes: &mut Vec<Node>,
        node_names: &mut Vec<String>,
        names: &[String],
    ) -> usize {
        let index = nodes.len();
        nodes.push(Node::leaf(parent));
        node_names.push(String::new());
        match self {
            Topology::Leaf(leaf) => {
                node_names[index] = names
                    .get(*leaf)
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .unwrap_or_else(|| leaf.to_string());
            }
            Topology::Pair(left, right) => {
                let l = left.build(index, nodes, node_names, names);
                let r = right.build(index, nodes, node_names, names);
                nodes[index].left = l;
                nodes[index].right = r;
            }
        }
        index
    }
}

/// All rooted binary topologies on `leaves` (stepwise insertion), at most
/// `limit` of them.
pub fn all_topologies(leaves: &[usize], limit: usize) -> Vec<Topology> {
    let Some((&first, rest)) = leaves.split_first() else {
        return Vec::new();
    };
    let mut trees = vec![Topology::Leaf(first)];
    for &leaf in rest {
        // distinct partial trees have disjoint completions, so capping early
        // still yields distinct results
        trees = trees
            .iter()
            .flat_map(|tree| tree.insertions(leaf))
            .take(limit)
            .collect();
    }
    trees.truncate(limit);
    trees
}

pub(super) fn expand_node(arena: &MultitreeArena, id: NodeId, limit: usize) -> Vec<Topology> {
    if limit == 0 {
        return Vec::new();
    }
    match &arena.get(id).node {
        MultitreeNode::SingleLeaf(leaf) => vec![Topology::Leaf(*leaf)],
        MultitreeNode::TwoLeaves(first, second) => vec![Topology::pair(
            Topology::Leaf(*first),
            Topology::Leaf(*second),
        )],
        MultitreeNode::Unconstrained(range) => all_topologies(arena.block(range), limit),
        MultitreeNode::Inner { left, right } => {
            let lefts = expand_node(arena, *left, limit);
            let rights = expand_node(arena, *right, limit);
            let mut result = Vec::new();
            'outer: for l in &lefts {
                for r in &rights {
                    if result.len() == limit {
                        break 'outer;
                    }
                    result.push(Topology::pair(l.clone(), r.clone()));
                }
            }
            result
        }
        MultitreeNode::Alternatives(choices) => {
            let mut result = Vec::new();
            for &choice in choices {
                let remaining = limit - result.len();
                if remaining == 0 {
                    break;
                }
                result.extend(expand_node(arena, choice, remaining));
            }
            result
        }
    }
}
