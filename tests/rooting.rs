mod common;

use common::rooting_tree;
use terraces::io::{parse_newick, write_newick};
use terraces::tree::NONE;
use terraces::validation::is_isomorphic;
use terraces::{reroot_inplace, TerraceError, TreeSet};
use test_case::test_case;

fn named(tree: terraces::Tree) -> TreeSet {
    let names = (0..tree.len())
        .map(|i| if tree.is_leaf(i) { format!("n{i}") } else { String::new() })
        .collect();
    TreeSet::new(tree, names)
}

#[test_case(1)]
#[test_case(4)]
#[test_case(5)]
#[test_case(7)]
#[test_case(8)]
fn rerooting_at_any_leaf_keeps_the_unrooted_tree(leaf: usize) {
    let original = named(rooting_tree());
    let mut rerooted = original.clone();
    reroot_inplace(&mut rerooted.tree, leaf).unwrap();

    rerooted.tree.validate().unwrap();
    let root = rerooted.tree[0];
    assert!(root.left == leaf || root.right == leaf);
    assert_eq!(rerooted.tree[leaf].parent, 0);
    assert_eq!(rerooted.tree[0].parent, NONE);
    assert!(is_isomorphic(&original, &rerooted));
}

#[test_case(2)]
#[test_case(3)]
#[test_case(6)]
fn rerooting_at_inner_nodes_fails(node: usize) {
    let mut tree = rooting_tree();
    assert!(matches!(
        reroot_inplace(&mut tree, node),
        Err(TerraceError::InvalidArgument(_))
    ));
    assert_eq!(tree, rooting_tree());
}

#[test]
fn rerooting_next_to_the_root_is_a_no_op() {
    let mut tree = rooting_tree();
    reroot_inplace(&mut tree, 1).unwrap();
    assert_eq!(tree, rooting_tree());
    assert!(reroot_inplace(&mut tree, 42).is_err());
}

#[test]
fn double_reroot_round_trips_through_newick() {
    let original = parse_newick("((a,(b,c)),((d,e),f));").unwrap();
    let mut set = original.clone();
    for name in ["c", "e", "a"] {
        let leaf = set.indices[name];
        reroot_inplace(&mut set.tree, leaf).unwrap();
        assert!(is_isomorphic(&original, &set), "after rerooting at {name}");
        let text = write_newick(&set.tree, &set.names);
        assert!(text.ends_with(&format!(",{name});")), "{text}");
        let reparsed = parse_newick(&text).unwrap();
        assert!(is_isomorphic(&original, &reparsed));
    }
}
