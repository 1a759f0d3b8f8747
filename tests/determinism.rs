mod common;

use std::collections::HashSet;

use blake3::hash;
use common::names;
use terraces::{Constraint, SupertreeData, TerraceConfig, Terraces};

fn query() -> SupertreeData {
    SupertreeData::new(
        10,
        vec![
            Constraint::new(1, 2, 3),
            Constraint::new(4, 5, 1),
            Constraint::new(6, 7, 8),
            Constraint::new(8, 9, 2),
        ],
        0,
    )
}

fn fingerprint(config: TerraceConfig) -> blake3::Hash {
    let mut terraces = Terraces::new(config);
    let multitree = terraces.enumerate(&query()).expect("enumeration succeeds");
    let names = names(10);
    let mut rendered = multitree.newick(&names).to_string();
    rendered.push('\n');
    rendered.push_str(&multitree.num_trees().to_string());
    hash(rendered.as_bytes())
}

#[test]
fn multitree_output_is_deterministic() {
    let fingerprints: HashSet<_> = (0..5)
        .map(|_| fingerprint(TerraceConfig::default()))
        .collect();
    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn parallel_dispatch_preserves_output() {
    let sequential = fingerprint(TerraceConfig::default());
    let parallel = fingerprint(
        TerraceConfig::default()
            .with_parallel(true)
            .with_parallel_min_leaves(2),
    );
    assert_eq!(sequential, parallel);
}
