//! Input and output formats
//!
//! Newick trees in and out, and the species-by-partition occurrence matrix
//! that accompanies them.

mod matrix;
mod newick;

pub use matrix::{parse_occurrence, OccurrenceData};
pub use newick::{parse_newick, write_newick};

use std::path::Path;

use crate::TerraceError;

/// Whole file as text.
pub fn read_input(path: impl AsRef<Path>) -> Result<String, TerraceError> {
    Ok(std::fs::read_to_string(path)?)
}
