//! # Phylogenetic terraces from missing data
//!
//! A rooted binary tree together with a species-by-partition occurrence
//! matrix defines a *terrace*: the set of trees whose restrictions to every
//! partition agree with those of the input tree. This crate decides whether
//! that set has more than one member, counts it, and enumerates it as a
//! compact multitree.
//!
//! ## Pipeline
//!
//! 1. **Rerooting**: move the root next to a species present in every
//!    partition ([`tree::reroot_inplace`])
//! 2. **Extraction**: read lca ordering constraints off the per-partition
//!    induced subtrees ([`constraints`])
//! 3. **Enumeration**: split leaf sets along every bipartition compatible
//!    with the constraints ([`engine::TreeEnumerator`])
//! 4. **Strategy**: check, count or build a multitree ([`strategy`])
//!
//! ## Usage Example
//!
//! ```ignore
//! use terraces::{io, Terraces};
//!
//! let tree = io::parse_newick("((a,b),(c,d));")?;
//! let data = io::parse_occurrence(matrix_text, &tree.indices, tree.tree.len())?;
//! let mut tree = tree;
//! let supertree = terraces::prepare_supertree(&mut tree.tree, &data.matrix, data.comprehensive)?;
//! let count = Terraces::default().count_exact(&supertree)?;
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod bits; // Bit sets with rank, occurrence matrix
pub mod constraints; // Constraint extraction and filtering
pub mod engine; // Recursive enumeration driver
pub mod io; // Newick and occurrence file formats
pub mod multitree; // Compact terrace representation
pub mod sets; // Union-find and bipartitions
pub mod space; // Scratch buffers and space accounting
pub mod strategy; // Check, count and multitree strategies
pub mod tree; // Array-of-nodes trees and rerooting
pub mod validation; // Tree isomorphism

pub use bits::{BitMatrix, BitSet, RankedBitSet};
pub use constraints::{Constraint, SupertreeData};
pub use engine::TreeEnumerator;
pub use multitree::Multitree;
pub use space::SpaceProfile;
pub use strategy::{
    CheckStrategy, ClampedU64, CountStrategy, LoggingStrategy, MultitreeStrategy, Strategy,
    TreeCount,
};
pub use tree::{reroot_inplace, Node, Tree, TreeSet};

use num_bigint::BigUint;
use thiserror::Error;
use tracing::{debug, info_span, warn, Level};

use crate::constraints::{compute_constraints, deduplicate_constraints, induced_subtrees, remap_to_leaves};

/// Errors that can occur while preparing or enumerating a terrace
#[derive(Error, Debug)]
pub enum TerraceError {
    /// Structurally invalid tree, matrix or constraint set
    #[error("bad input: {0}")]
    BadInput(String),

    /// Argument outside the accepted domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No species occurs in every partition
    #[error("no species occurs in every partition, the tree cannot be rooted for the query")]
    NoUsableRoot,

    /// Too many leaf groups to index bipartitions with a machine word
    #[error("{groups} leaf groups exceed the bipartition counter")]
    TreeCountOverflow {
        /// Number of groups encountered
        groups: usize,
    },

    /// Malformed input text
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Reading input failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TerraceError {
    /// Helper for constructing [`TerraceError::BadInput`].
    pub fn bad_input(msg: impl Into<String>) -> Self {
        TerraceError::BadInput(msg.into())
    }

    /// Helper for constructing [`TerraceError::Parse`].
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        TerraceError::Parse {
            line,
            message: msg.into(),
        }
    }
}

/// Configuration parameters for terrace queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraceConfig {
    /// Dispatch bipartitions to worker threads (needs the `parallel` feature)
    pub parallel: bool,

    /// Only levels with more leaves than this are dispatched
    pub parallel_min_leaves: usize,

    /// Enable space profiling
    pub profile_space: bool,
}

impl Default for TerraceConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_min_leaves: 8,
            profile_space: false,
        }
    }
}

impl TerraceConfig {
    /// Enable parallel dispatch.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        if enabled && !cfg!(feature = "parallel") {
            warn!("parallel enumeration requested but the `parallel` feature is disabled");
        }
        self.parallel = enabled;
        self
    }

    /// Set the leaf threshold for parallel dispatch.
    pub fn with_parallel_min_leaves(mut self, leaves: usize) -> Self {
        self.parallel_min_leaves = leaves;
        self
    }

    /// Enable space profiling.
    pub fn with_space_profiling(mut self, enabled: bool) -> Self {
        self.profile_space = enabled;
        self
    }
}

/// Fixed-width tree count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TerraceCount {
    /// Number of trees, `u64::MAX` when clamped
    pub value: u64,
    /// Whether `value` is the true count rather than a lower bound
    pub exact: bool,
}

impl TerraceCount {
    /// Whether the count overflowed and `value` is only a lower bound.
    pub fn is_clamped(&self) -> bool {
        !self.exact
    }
}

impl From<ClampedU64> for TerraceCount {
    fn from(count: ClampedU64) -> Self {
        Self {
            value: count.value(),
            exact: !count.is_clamped(),
        }
    }
}

impl std::fmt::Display for TerraceCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.exact {
            write!(f, "{}", self.value)
        } else {
            write!(f, ">= {}", self.value)
        }
    }
}

/// First leaf (by node index) that has data in every partition.
pub fn comprehensive_leaf(tree: &Tree, occurrence: &BitMatrix) -> Option<usize> {
    tree.leaves()
        .find(|&leaf| leaf < occurrence.rows() && occurrence.row_full(leaf))
}

/// Extract, deduplicate and remap the constraints of `tree` under
/// `occurrence`, rooting the query at the leaf `root_node`.
pub fn prepare_constraints(
    tree: &Tree,
    occurrence: &BitMatrix,
    root_node: usize,
) -> Result<SupertreeData, TerraceError> {
    tree.validate()?;
    let subtrees = induced_subtrees(tree, occurrence)?;
    let mut constraints = compute_constraints(&subtrees);
    let extracted = constraints.len();
    let removed = deduplicate_constraints(&mut constraints);
    debug!(
        partitions = occurrence.cols(),
        extracted,
        removed,
        "extracted constraints"
    );
    remap_to_leaves(tree, &constraints, root_node)
}

/// Reroot `tree` at a comprehensive species and prepare its constraints.
///
/// With `root_node` unset the first comprehensive leaf is used, and
/// [`TerraceError::NoUsableRoot`] reports that there is none. A given leaf
/// must itself occur in every partition, else the call fails with
/// [`TerraceError::InvalidArgument`].
pub fn prepare_supertree(
    tree: &mut Tree,
    occurrence: &BitMatrix,
    root_node: Option<usize>,
) -> Result<SupertreeData, TerraceError> {
    if occurrence.rows() != tree.len() {
        return Err(TerraceError::bad_input(format!(
            "occurrence matrix has {} rows for a tree of {} nodes",
            occurrence.rows(),
            tree.len()
        )));
    }
    let root = match root_node {
        Some(leaf) if leaf >= tree.len() || !tree.is_leaf(leaf) => {
            return Err(TerraceError::InvalidArgument(format!(
                "root node {leaf} is not a leaf of the tree"
            )))
        }
        Some(leaf) if !occurrence.row_full(leaf) => {
            return Err(TerraceError::InvalidArgument(format!(
                "root leaf {leaf} lacks data in some partition"
            )))
        }
        Some(leaf) => leaf,
        None => comprehensive_leaf(tree, occurrence).ok_or(TerraceError::NoUsableRoot)?,
    };
    reroot_inplace(tree, root)?;
    prepare_constraints(tree, occurrence, root)
}

/// Whether more than one tree lies on the terrace.
pub fn check_terrace(data: &SupertreeData) -> Result<bool, TerraceError> {
    Terraces::default().check(data)
}

/// Number of trees on the terrace, clamped to `u64`.
pub fn count_terrace(data: &SupertreeData) -> Result<TerraceCount, TerraceError> {
    Terraces::default().count(data)
}

/// Exact number of trees on the terrace.
pub fn count_terrace_bigint(data: &SupertreeData) -> Result<BigUint, TerraceError> {
    Terraces::default().count_exact(data)
}

/// Multitree of every tree on the terrace.
pub fn enumerate_terrace(data: &SupertreeData) -> Result<Multitree, TerraceError> {
    Terraces::default().enumerate(data)
}

/// Query front end carrying a [`TerraceConfig`]
#[derive(Debug, Default)]
pub struct Terraces {
    config: TerraceConfig,
    last_profile: Option<SpaceProfile>,
}

impl Terraces {
    /// Create with configuration.
    pub fn new(config: TerraceConfig) -> Self {
        Self {
            config,
            last_profile: None,
        }
    }

    /// Access configuration.
    pub fn config(&self) -> &TerraceConfig {
        &self.config
    }

    /// Space profile of the last query, if profiling is enabled.
    pub fn last_profile(&self) -> Option<&SpaceProfile> {
        self.last_profile.as_ref()
    }

    fn run<S>(&mut self, strategy: S, data: &SupertreeData) -> Result<(S, S::Output), TerraceError>
    where
        S: Strategy,
        S::Output: std::fmt::Debug,
    {
        if tracing::enabled!(Level::TRACE) {
            let (logged, output) = self.run_with(LoggingStrategy::new(strategy), data)?;
            return Ok((logged.into_inner(), output));
        }
        self.run_with(strategy, data)
    }

    fn run_with<S: Strategy>(
        &mut self,
        strategy: S,
        data: &SupertreeData,
    ) -> Result<(S, S::Output), TerraceError> {
        let mut enumerator = TreeEnumerator::with_config(strategy, self.config.clone());
        let output = enumerator.run_rooted_at(data.num_leaves, &data.constraints, data.root_leaf)?;
        self.last_profile = enumerator.space_profile().cloned();
        Ok((enumerator.into_strategy(), output))
    }

    /// Whether more than one tree lies on the terrace.
    pub fn check(&mut self, data: &SupertreeData) -> Result<bool, TerraceError> {
        let _span = info_span!("check_terrace", leaves = data.num_leaves).entered();
        let (_, trees) = self.run(CheckStrategy, data)?;
        Ok(trees > 1)
    }

    /// Number of trees, clamped to `u64`.
    pub fn count(&mut self, data: &SupertreeData) -> Result<TerraceCount, TerraceError> {
        let _span = info_span!("count_terrace", leaves = data.num_leaves).entered();
        let (_, trees) = self.run(CountStrategy::<ClampedU64>::new(), data)?;
        Ok(trees.into())
    }

    /// Exact number of trees.
    pub fn count_exact(&mut self, data: &SupertreeData) -> Result<BigUint, TerraceError> {
        let _span = info_span!("count_terrace_bigint", leaves = data.num_leaves).entered();
        let (_, trees) = self.run(CountStrategy::<BigUint>::new(), data)?;
        Ok(trees)
    }

    /// Multitree of every tree on the terrace.
    pub fn enumerate(&mut self, data: &SupertreeData) -> Result<Multitree, TerraceError> {
        let _span = info_span!("enumerate_terrace", leaves = data.num_leaves).entered();
        let (strategy, root) = self.run(MultitreeStrategy::new(), data)?;
        let multitree = strategy.into_multitree(root);
        debug!(
            nodes = multitree.arena().len(),
            trees = %multitree.num_trees(),
            "built multitree"
        );
        Ok(multitree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builders() {
        let config = TerraceConfig::default()
            .with_parallel_min_leaves(16)
            .with_space_profiling(true);
        assert_eq!(config.parallel_min_leaves, 16);
        assert!(config.profile_space);
        assert!(!config.parallel);
    }

    #[test]
    fn clamped_counts_render_as_lower_bounds() {
        let count = TerraceCount {
            value: u64::MAX,
            exact: false,
        };
        assert!(count.is_clamped());
        assert!(count.to_string().starts_with(">= "));
    }

    #[test]
    fn facade_records_profiles() {
        let data = SupertreeData::new(6, vec![Constraint::new(1, 2, 3)], 0);
        let mut terraces = Terraces::new(TerraceConfig::default().with_space_profiling(true));
        let count = terraces.count(&data).unwrap();
        assert!(count.exact);
        assert!(terraces.last_profile().is_some());
        assert_eq!(
            BigUint::from(count.value),
            terraces.count_exact(&data).unwrap()
        );
    }
}
