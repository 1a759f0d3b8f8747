#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use terraces::tree::NONE;
use terraces::{BitMatrix, Node, Tree};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("TERRACES_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set TERRACES_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// `((5,6)3,(7,8)4)1` and leaf 2 below the root.
pub fn nine_node_tree() -> Tree {
    Tree::from_nodes(vec![
        Node::new(NONE, 1, 2),
        Node::new(0, 3, 4),
        Node::leaf(0),
        Node::new(1, 5, 6),
        Node::new(1, 7, 8),
        Node::leaf(3),
        Node::leaf(3),
        Node::leaf(4),
        Node::leaf(4),
    ])
}

/// Two partitions sharing only leaf 2: `{2, 7, 8}` and `{2, 5, 6}`.
pub fn nine_node_occurrence() -> BitMatrix {
    let mut occ = BitMatrix::new(9, 2);
    for (row, col) in [(2, 0), (2, 1), (5, 1), (6, 1), (7, 0), (8, 0)] {
        occ.set(row, col, true);
    }
    occ
}

/// Every leaf of the nine-node tree in both partitions.
pub fn nine_node_full_occurrence() -> BitMatrix {
    let mut occ = BitMatrix::new(9, 2);
    for row in [2, 5, 6, 7, 8] {
        occ.set(row, 0, true);
        occ.set(row, 1, true);
    }
    occ
}

/// Tree whose leaves are 1, 4, 5, 7 and 8; nodes 2, 3 and 6 are inner.
pub fn rooting_tree() -> Tree {
    Tree::from_nodes(vec![
        Node::new(NONE, 1, 2),
        Node::leaf(0),
        Node::new(0, 3, 4),
        Node::new(2, 5, 6),
        Node::leaf(2),
        Node::leaf(3),
        Node::new(3, 7, 8),
        Node::leaf(6),
        Node::leaf(6),
    ])
}

pub const FIVE_LEAF_TREE: &str = "(((s5,s6),(s7,s8)),s2);";

pub const FIVE_LEAF_MATRIX: &str = "\
5 2
1 1 s2
0 1 s5
0 1 s6
1 0 s7
1 0 s8
";

/// Leaf names `t0`, `t1`, ...
pub fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("t{i}")).collect()
}
