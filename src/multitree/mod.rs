//! Compact representation of every tree on a terrace
//!
//! A multitree is a DAG of [`MultitreeNode`]s stored in one arena. Inner
//! nodes pair a left and a right sub-multitree, alternative nodes list
//! mutually exclusive choices, and unconstrained nodes stand for every
//! rooted binary tree on a block of leaves. Each entry caches its leaf count
//! and the exact number of trees it represents.

mod expand;
mod newick;

pub use expand::Topology;
pub use newick::MultitreeNewick;

use std::ops::Range;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::strategy::count_unrooted_trees;
use crate::tree::TreeSet;

/// Index of a node in a [`MultitreeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of a multitree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultitreeNode {
    /// A single leaf.
    SingleLeaf(usize),
    /// A cherry of two leaves.
    TwoLeaves(usize, usize),
    /// Any rooted binary tree on the leaves in this range of the leaf pool.
    Unconstrained(Range<usize>),
    /// Left and right subtree of a fixed split.
    Inner {
        /// Left sub-multitree.
        left: NodeId,
        /// Right sub-multitree.
        right: NodeId,
    },
    /// Mutually exclusive choices for the same leaf set.
    Alternatives(Vec<NodeId>),
}

/// Node plus the statistics cached for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultitreeEntry {
    /// Structure.
    pub node: MultitreeNode,
    /// Number of leaves below this node.
    pub num_leaves: usize,
    /// Number of trees represented.
    pub num_trees: BigUint,
}

/// Offsets that move ids from one arena into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    nodes: usize,
    leaves: usize,
}

impl Relocation {
    /// Translate an id of the absorbed arena.
    pub fn apply(&self, id: NodeId) -> NodeId {
        NodeId(id.0 + self.nodes)
    }

    fn range(&self, range: &Range<usize>) -> Range<usize> {
        range.start + self.leaves..range.end + self.leaves
    }
}

/// Append-only storage for multitree nodes of one query.
#[derive(Debug, Clone, Default)]
pub struct MultitreeArena {
    entries: Vec<MultitreeEntry>,
    leaves: Vec<usize>,
}

impl MultitreeArena {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no node was allocated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry of `id`.
    pub fn get(&self, id: NodeId) -> &MultitreeEntry {
        &self.entries[id.0]
    }

    /// Leaves stored for an unconstrained block.
    pub fn block(&self, range: &Range<usize>) -> &[usize] {
        &self.leaves[range.clone()]
    }

    fn push(&mut self, node: MultitreeNode, num_leaves: usize, num_trees: BigUint) -> NodeId {
        let id = NodeId(self.entries.len());
        self.entries.push(MultitreeEntry {
            node,
            num_leaves,
            num_trees,
        });
        id
    }

    /// Allocate a leaf.
    pub fn single_leaf(&mut self, leaf: usize) -> NodeId {
        self.push(MultitreeNode::SingleLeaf(leaf), 1, BigUint::one())
    }

    /// Allocate a cherry.
    pub fn two_leaves(&mut self, first: usize, second: usize) -> NodeId {
        self.push(MultitreeNode::TwoLeaves(first, second), 2, BigUint::one())
    }

    /// Allocate an unconstrained block over `leaves`.
    pub fn unconstrained<I>(&mut self, leaves: I) -> NodeId
    where
        I: IntoIterator<Item = usize>,
    {
        let start = self.leaves.len();
        self.leaves.extend(leaves);
        let end = self.leaves.len();
        let count = end - start;
        self.push(
            MultitreeNode::Unconstrained(start..end),
            count,
            count_unrooted_trees(count),
        )
    }

    /// Allocate a fixed split of `left` and `right`.
    pub fn inner(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let num_leaves = self.get(left).num_leaves + self.get(right).num_leaves;
        let num_trees = &self.get(left).num_trees * &self.get(right).num_trees;
        self.push(MultitreeNode::Inner { left, right }, num_leaves, num_trees)
    }

    /// Allocate an empty alternative node with room for `capacity` choices.
    pub fn alternatives(&mut self, capacity: usize, num_leaves: usize) -> NodeId {
        self.push(
            MultitreeNode::Alternatives(Vec::with_capacity(capacity)),
            num_leaves,
            BigUint::zero(),
        )
    }

    /// Add `choice` to the alternative node `alternatives`.
    pub fn push_alternative(&mut self, alternatives: NodeId, choice: NodeId) {
        let (choice_leaves, choice_trees) = {
            let entry = self.get(choice);
            (entry.num_leaves, entry.num_trees.clone())
        };
        let entry = &mut self.entries[alternatives.0];
        debug_assert_eq!(entry.num_leaves, choice_leaves);
        match &mut entry.node {
            MultitreeNode::Alternatives(choices) => {
                choices.push(choice);
                entry.num_trees += choice_trees;
            }
            other => debug_assert!(false, "not an alternative node: {other:?}"),
        }
    }

    /// Move every node of `other` into this arena.
    pub fn absorb(&mut self, other: MultitreeArena) -> Relocation {
        let relocation = Relocation {
            nodes: self.entries.len(),
            leaves: self.leaves.len(),
        };
        self.leaves.extend(other.leaves);
        self.entries
            .extend(other.entries.into_iter().map(|mut entry| {
                entry.node = match entry.node {
                    MultitreeNode::Unconstrained(range) => {
                        MultitreeNode::Unconstrained(relocation.range(&range))
                    }
                    MultitreeNode::Inner { left, right } => MultitreeNode::Inner {
                        left: relocation.apply(left),
                        right: relocation.apply(right),
                    },
                    MultitreeNode::Alternatives(choices) => MultitreeNode::Alternatives(
                        choices.into_iter().map(|c| relocation.apply(c)).collect(),
                    ),
                    leafy => leafy,
                };
                entry
            }));
        relocation
    }
}

/// Multitree rooted at one arena node.
#[derive(Debug, Clone)]
pub struct Multitree {
    arena: MultitreeArena,
    root: NodeId,
}

impl Multitree {
    /// Wrap `arena` with `root` as its entry point.
    pub fn new(arena: MultitreeArena, root: NodeId) -> Self {
        Self { arena, root }
    }

    /// Backing arena.
    pub fn arena(&self) -> &MultitreeArena {
        &self.arena
    }

    /// Root id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Root entry.
    pub fn root_node(&self) -> &MultitreeEntry {
        self.arena.get(self.root)
    }

    /// Leaves covered by every represented tree.
    pub fn num_leaves(&self) -> usize {
        self.root_node().num_leaves
    }

    /// Exact number of represented trees.
    pub fn num_trees(&self) -> BigUint {
        self.root_node().num_trees.clone()
    }

    /// Extended Newick rendering using `names` (indexed by leaf).
    pub fn newick<'a>(&'a self, names: &'a [String]) -> MultitreeNewick<'a> {
        MultitreeNewick::new(self, names)
    }

    /// Concrete topologies, at most `limit` of them.
    pub fn topologies(&self, limit: usize) -> Vec<Topology> {
        expand::expand_node(&self.arena, self.root, limit)
    }

    /// Concrete named trees, at most `limit` of them.
    pub fn expand(&self, names: &[String], limit: usize) -> Vec<TreeSet> {
        self.topologies(limit)
            .iter()
            .map(|topology| topology.to_tree_set(names))
            .collect()
    }
}
