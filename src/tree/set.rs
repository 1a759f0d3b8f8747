//! Tree bundled with its name table.

use std::collections::HashMap;

use super::Tree;

/// Node names, indexed by node. Inner nodes usually carry an empty name.
pub type NameMap = Vec<String>;

/// Leaf name to node index.
pub type IndexMap = HashMap<String, usize>;

/// A tree together with the names of its nodes.
#[derive(Debug, Clone, Default)]
pub struct TreeSet {
    /// Tree topology.
    pub tree: Tree,
    /// Name of each node.
    pub names: NameMap,
    /// Node index of each named leaf.
    pub indices: IndexMap,
}

impl TreeSet {
    /// Bundle `tree` with `names` and index its named leaves.
    pub fn new(tree: Tree, names: NameMap) -> Self {
        let indices = tree
            .leaves()
            .filter_map(|i| {
                names
                    .get(i)
                    .filter(|name| !name.is_empty())
                    .map(|name| (name.clone(), i))
            })
            .collect();
        Self {
            tree,
            names,
            indices,
        }
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }
}
