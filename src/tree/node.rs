//! Array-of-nodes rooted binary tree
//!
//! Node = (parent, left child, right child), with [`NONE`] marking an
//! absent link. Node 0 is the root.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::TerraceError;

/// Sentinel for an absent parent or child.
pub const NONE: usize = usize::MAX;

/// Tree node (three links, no payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    /// Parent index, or [`NONE`] at the root.
    pub parent: usize,
    /// Left child index, or [`NONE`] at a leaf.
    pub left: usize,
    /// Right child index, or [`NONE`] at a leaf.
    pub right: usize,
}

impl Node {
    /// Node with the given links.
    pub const fn new(parent: usize, left: usize, right: usize) -> Self {
        Self {
            parent,
            left,
            right,
        }
    }

    /// Leaf hanging below `parent`.
    pub const fn leaf(parent: usize) -> Self {
        Self::new(parent, NONE, NONE)
    }

    /// Node with every link absent.
    pub const fn detached() -> Self {
        Self::new(NONE, NONE, NONE)
    }

    /// Check if leaf (no children)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == NONE && self.right == NONE
    }

    /// Check if root (no parent)
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent == NONE
    }

    /// Replace the child link pointing at `old` with `new`.
    pub fn replace_child(&mut self, old: usize, new: usize) {
        if self.left == old {
            self.left = new;
        } else {
            debug_assert_eq!(self.right, old, "{old} is not a child");
            self.right = new;
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |i: usize| {
            if i == NONE {
                "-".to_string()
            } else {
                i.to_string()
            }
        };
        write!(
            f,
            "({}, {}, {})",
            show(self.parent),
            show(self.left),
            show(self.right)
        )
    }
}

/// Rooted binary tree stored as a flat node array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Wrap a node array. No validation is performed.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Tree of `len` detached nodes.
    pub fn detached(len: usize) -> Self {
        Self {
            nodes: vec![Node::detached(); len],
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node slice.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether node `i` is a leaf.
    #[inline]
    pub fn is_leaf(&self, i: usize) -> bool {
        self.nodes[i].is_leaf()
    }

    /// Whether node `i` is the root.
    #[inline]
    pub fn is_root(&self, i: usize) -> bool {
        self.nodes[i].is_root()
    }

    /// Leaf indices in increasing order.
    pub fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(move |&i| self.is_leaf(i))
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Verify the tree is rooted at 0, strictly binary, link-symmetric and
    /// connected.
    pub fn validate(&self) -> Result<(), TerraceError> {
        let len = self.nodes.len();
        if len == 0 {
            return Err(TerraceError::bad_input("tree has no nodes"));
        }
        if len % 2 == 0 {
            return Err(TerraceError::bad_input(format!(
                "a rooted binary tree has an odd number of nodes, found {len}"
            )));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if (i == 0) != node.is_root() {
                return Err(TerraceError::bad_input(format!(
                    "node {i} has parent link {node}, but only node 0 may be the root"
                )));
            }
            if node.parent != NONE && node.parent >= len {
                return Err(TerraceError::bad_input(format!(
                    "node {i} points to parent {} outside the tree",
                    node.parent
                )));
            }
            if (node.left == NONE) != (node.right == NONE) {
                return Err(TerraceError::bad_input(format!(
                    "node {i} has exactly one child, tree is not binary"
                )));
            }
            for child in [node.left, node.right] {
                if child == NONE {
                    continue;
                }
                if child >= len || self.nodes[child].parent != i {
                    return Err(TerraceError::bad_input(format!(
                        "link {i} -> {child} has no matching parent link"
                    )));
                }
            }
        }
        let mut reached = 0;
        super::foreach_preorder(self, 0, |_| reached += 1);
        if reached != len {
            return Err(TerraceError::bad_input(format!(
                "only {reached} of {len} nodes are reachable from the root"
            )));
        }
        Ok(())
    }

    /// Names of the leaves, ordered by leaf rank (increasing node index).
    pub fn leaf_names(&self, names: &[String]) -> Vec<String> {
        self.leaves()
            .map(|i| names.get(i).cloned().unwrap_or_else(|| i.to_string()))
            .collect()
    }
}

impl Index<usize> for Tree {
    type Output = Node;

    fn index(&self, i: usize) -> &Node {
        &self.nodes[i]
    }
}

impl IndexMut<usize> for Tree {
    fn index_mut(&mut self, i: usize) -> &mut Node {
        &mut self.nodes[i]
    }
}

impl From<Vec<Node>> for Tree {
    fn from(nodes: Vec<Node>) -> Self {
        Self::from_nodes(nodes)
    }
}
