//! Ordering constraints
//!
//! A [`Constraint`] `(shared, left, right)` states that the lowest common
//! ancestor of `shared` and `left` lies strictly below the lowest common
//! ancestor of `shared` and `right`. Constraints are read off the
//! per-partition induced subtrees of the input tree and drive the
//! enumeration.

mod consistency;
mod extraction;
mod filter;

use std::fmt;

pub use consistency::check_consistency;
pub use extraction::{
    compute_constraints, deduplicate_constraints, induced_subtrees, leaf_occurrence,
    remap_to_leaves,
};
pub use filter::{apply_constraints, filter_constraints, filter_constraints_into, map_constraints};

use crate::TerraceError;

/// `lca(shared, left) < lca(shared, right)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Leaf that takes part in both ancestor relations.
    pub shared: usize,
    /// Leaf closer to `shared`.
    pub left: usize,
    /// Leaf further from `shared`.
    pub right: usize,
}

impl Constraint {
    /// Constraint `lca(shared, left) < lca(shared, right)`.
    pub const fn new(shared: usize, left: usize, right: usize) -> Self {
        Self {
            shared,
            left,
            right,
        }
    }

    /// The three leaves involved.
    pub fn leaves(&self) -> [usize; 3] {
        [self.shared, self.left, self.right]
    }

    /// Same constraint with `shared` and `left` ordered, since the two are
    /// interchangeable.
    pub fn normalized(&self) -> Self {
        Self {
            shared: self.shared.min(self.left),
            left: self.shared.max(self.left),
            right: self.right,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lca({},{}) < lca({},{})",
            self.left, self.shared, self.shared, self.right
        )
    }
}

/// Everything the enumeration needs about one query: the dense leaf
/// universe, the deduplicated constraints over leaf ranks, and the leaf
/// the tree is rooted at.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupertreeData {
    /// Number of leaves.
    pub num_leaves: usize,
    /// Constraints over leaf ranks.
    pub constraints: Vec<Constraint>,
    /// Leaf rank of the root species.
    pub root_leaf: usize,
}

impl SupertreeData {
    /// Bundle query data without checking it.
    pub fn new(num_leaves: usize, constraints: Vec<Constraint>, root_leaf: usize) -> Self {
        Self {
            num_leaves,
            constraints,
            root_leaf,
        }
    }

    /// Reject empty leaf sets, an out-of-range root, constraints that
    /// mention unknown or repeated leaves, and constraint sets no tree
    /// rooted at `root_leaf` satisfies.
    pub fn validate(&self) -> Result<(), TerraceError> {
        validate_query(self.num_leaves, &self.constraints, Some(self.root_leaf))
    }
}

/// Input check shared by every entry point into the enumeration.
pub fn validate_query(
    num_leaves: usize,
    constraints: &[Constraint],
    root_leaf: Option<usize>,
) -> Result<(), TerraceError> {
    if num_leaves == 0 {
        return Err(TerraceError::bad_input("leaf set is empty"));
    }
    if let Some(root) = root_leaf {
        if root >= num_leaves {
            return Err(TerraceError::bad_input(format!(
                "root leaf {root} is outside {num_leaves} leaves"
            )));
        }
    }
    for constraint in constraints {
        let [shared, left, right] = constraint.leaves();
        if constraint.leaves().iter().any(|&leaf| leaf >= num_leaves) {
            return Err(TerraceError::bad_input(format!(
                "constraint {constraint} references a leaf outside {num_leaves} leaves"
            )));
        }
        if shared == left || shared == right || left == right {
            return Err(TerraceError::bad_input(format!(
                "constraint {constraint} repeats a leaf"
            )));
        }
        // the root leaf hangs off the top split, so it is never the close pair
        if root_leaf.is_some_and(|root| root == shared || root == left) {
            return Err(TerraceError::bad_input(format!(
                "constraint {constraint} places the root leaf below another leaf"
            )));
        }
    }
    check_consistency(num_leaves, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_as_lca_relation() {
        let c = Constraint::new(1, 2, 3);
        assert_eq!(c.to_string(), "lca(2,1) < lca(1,3)");
    }

    #[test]
    fn normalization_orders_the_close_pair() {
        assert_eq!(Constraint::new(4, 2, 0).normalized(), Constraint::new(2, 4, 0));
        assert_eq!(Constraint::new(2, 4, 0).normalized(), Constraint::new(2, 4, 0));
    }

    #[test]
    fn validation_catches_bad_queries() {
        assert!(validate_query(0, &[], None).is_err());
        assert!(validate_query(3, &[], Some(3)).is_err());
        assert!(validate_query(3, &[Constraint::new(0, 1, 5)], None).is_err());
        assert!(validate_query(3, &[Constraint::new(0, 0, 2)], None).is_err());
        assert!(validate_query(3, &[Constraint::new(0, 1, 2)], Some(2)).is_ok());
    }

    #[test]
    fn validation_catches_unsatisfiable_constraints() {
        let opposite = [Constraint::new(4, 2, 3), Constraint::new(4, 3, 2)];
        assert!(matches!(
            validate_query(5, &opposite, None),
            Err(TerraceError::BadInput(_))
        ));
        assert!(validate_query(5, &[Constraint::new(0, 1, 2)], Some(0)).is_err());
        assert!(validate_query(5, &[Constraint::new(1, 0, 2)], Some(0)).is_err());
        assert!(validate_query(5, &[Constraint::new(1, 2, 0)], Some(0)).is_ok());
    }
}
