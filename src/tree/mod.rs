//! Rooted binary trees
//!
//! Index-addressed node arrays: relationships are plain indices into one
//! flat vector, so there are no reference cycles and rerooting is a handful
//! of link rewrites.

mod node;
mod rooting;
mod set;
mod traversal;

pub use node::{Node, Tree, NONE};
pub use rooting::reroot_inplace;
pub use set::{IndexMap, NameMap, TreeSet};
pub use traversal::{foreach_postorder, foreach_preorder, postorder, preorder};
