//! Unrooted tree comparison by splits.
//!
//! Two trees are isomorphic as unrooted trees iff they have the same leaf
//! names and induce the same set of non-trivial bipartitions of them.

use std::collections::HashMap;

use crate::bits::BitSet;
use crate::tree::{foreach_postorder, TreeSet};

fn sorted_leaf_names(set: &TreeSet) -> Vec<&str> {
    let mut names: Vec<&str> = set
        .tree
        .leaves()
        .map(|leaf| set.names.get(leaf).map_or("", String::as_str))
        .collect();
    names.sort_unstable();
    names
}

/// Non-trivial splits of `set`, with leaves numbered by `order`. Each split
/// is stored as the side that does not contain leaf 0; the result is sorted.
fn splits(set: &TreeSet, order: &HashMap<&str, usize>) -> Vec<BitSet> {
    let n = order.len();
    let tree = &set.tree;
    let mut below: Vec<BitSet> = vec![BitSet::new(n); tree.len()];
    foreach_postorder(tree, 0, |i| {
        let node = tree[i];
        if node.is_leaf() {
            let name = set.names.get(i).map_or("", String::as_str);
            if let Some(&rank) = order.get(name) {
                below[i].set(rank);
            }
        } else {
            let mut union = below[node.left].clone();
            union.or_with(&below[node.right]);
            below[i] = union;
        }
    });

    let mut result: Vec<BitSet> = below
        .into_iter()
        .enumerate()
        .filter(|&(i, _)| i != 0)
        .map(|(_, mut side)| {
            if side.get(0) {
                side.invert();
            }
            side
        })
        .filter(|side| {
            let size = side.count();
            size > 1 && size + 1 < n
        })
        .collect();
    result.sort_unstable();
    result.dedup();
    result
}

/// Whether `first` and `second` are the same unrooted tree over the same
/// leaf names.
pub fn is_isomorphic(first: &TreeSet, second: &TreeSet) -> bool {
    let names = sorted_leaf_names(first);
    if names != sorted_leaf_names(second) {
        return false;
    }
    let order: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(rank, &name)| (name, rank))
        .collect();
    if order.len() != names.len() {
        return false;
    }
    splits(first, &order) == splits(second, &order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_newick;
    use crate::tree::reroot_inplace;

    fn tree(text: &str) -> TreeSet {
        parse_newick(text).unwrap()
    }

    #[test]
    fn rerooting_preserves_the_unrooted_tree() {
        let mut first = tree("(1,(2,3));");
        let mut second = tree("(2,(1,3));");
        let leaf = first.indices["1"];
        reroot_inplace(&mut first.tree, leaf).unwrap();
        let leaf = second.indices["3"];
        reroot_inplace(&mut second.tree, leaf).unwrap();
        assert!(is_isomorphic(&first, &second));
    }

    #[test]
    fn different_splits_are_detected() {
        let first = tree("(1,(2,(3,(4,5))));");
        let second = tree("(2,((1,4),(3,5)));");
        assert!(!is_isomorphic(&first, &second));
    }

    #[test]
    fn root_position_is_irrelevant() {
        let first = tree("((a,b),(c,(d,e)));");
        let second = tree("(e,(d,(c,(a,b))));");
        assert!(is_isomorphic(&first, &second));
        let mut moved = first.clone();
        let leaf = moved.indices["c"];
        reroot_inplace(&mut moved.tree, leaf).unwrap();
        assert!(is_isomorphic(&first, &moved));
    }

    #[test]
    fn leaf_sets_must_match() {
        assert!(!is_isomorphic(&tree("(a,(b,c));"), &tree("(a,(b,d));")));
        assert!(!is_isomorphic(&tree("(a,(b,c));"), &tree("((a,b),(c,d));")));
    }
}
