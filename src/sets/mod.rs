//! Leaf grouping and splitting

mod bipartitions;
mod union_find;

pub use bipartitions::{BipartitionEnumerator, MAX_GROUPS};
pub use union_find::UnionFind;
