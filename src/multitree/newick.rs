//! Extended Newick output for multitrees.
//!
//! `(a,b)` is a fixed split, `{a,b,c}` an unconstrained block and `x|y`
//! separates alternatives.

use std::fmt;

use super::{Multitree, MultitreeNode, NodeId};

/// Display adaptor returned by [`Multitree::newick`].
#[derive(Debug, Clone, Copy)]
pub struct MultitreeNewick<'a> {
    multitree: &'a Multitree,
    names: &'a [String],
}

impl<'a> MultitreeNewick<'a> {
    /// Render `multitree` with leaf `i` named `names[i]`.
    pub fn new(multitree: &'a Multitree, names: &'a [String]) -> Self {
        Self { multitree, names }
    }

    fn leaf(&self, f: &mut fmt::Formatter<'_>, leaf: usize) -> fmt::Result {
        match self.names.get(leaf).filter(|name| !name.is_empty()) {
            Some(name) => f.write_str(name),
            None => write!(f, "{leaf}"),
        }
    }

    fn node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let arena = self.multitree.arena();
        match &arena.get(id).node {
            MultitreeNode::SingleLeaf(leaf) => self.leaf(f, *leaf),
            MultitreeNode::TwoLeaves(first, second) => {
                f.write_str("(")?;
                self.leaf(f, *first)?;
                f.write_str(",")?;
                self.leaf(f, *second)?;
                f.write_str(")")
            }
            MultitreeNode::Unconstrained(range) => {
                f.write_str("{")?;
                for (i, &leaf) in arena.block(range).iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    self.leaf(f, leaf)?;
                }
                f.write_str("}")
            }
            MultitreeNode::Inner { left, right } => {
                f.write_str("(")?;
                self.node(f, *left)?;
                f.write_str(",")?;
                self.node(f, *right)?;
                f.write_str(")")
            }
            MultitreeNode::Alternatives(choices) => {
                for (i, &choice) in choices.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    self.node(f, choice)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for MultitreeNewick<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node(f, self.multitree.root())?;
        f.write_str(";")
    }
}
