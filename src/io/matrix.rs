//! Occurrence matrix reader.
//!
//! ```text
//! <species> <partitions>
//! 1 0 1 ... name
//! ```
//!
//! One row per species: a `0`/`1` entry per partition followed by the
//! species name. Rows of the result are indexed by tree node.

use std::collections::HashSet;

use tracing::debug;

use crate::bits::BitMatrix;
use crate::tree::IndexMap;
use crate::TerraceError;

/// Parsed occurrence matrix.
#[derive(Debug, Clone)]
pub struct OccurrenceData {
    /// Node-by-partition occurrence, uninformative partitions removed.
    pub matrix: BitMatrix,
    /// First species in file order with data in every partition.
    pub comprehensive: Option<usize>,
    /// Partitions (input column indices) covering at most one species.
    pub dropped_partitions: Vec<usize>,
}

fn parse_header(line: usize, text: &str) -> Result<(usize, usize), TerraceError> {
    let mut fields = text.split_whitespace().map(|field| {
        field
            .parse::<usize>()
            .map_err(|_| TerraceError::parse(line, format!("expected a count, found {field:?}")))
    });
    match (fields.next(), fields.next(), fields.next()) {
        (Some(rows), Some(cols), None) => Ok((rows?, cols?)),
        _ => Err(TerraceError::parse(
            line,
            "header must be '<species> <partitions>'",
        )),
    }
}

/// Read an occurrence matrix for a tree of `tree_size` nodes whose leaves
/// are named by `indices`.
pub fn parse_occurrence(
    input: &str,
    indices: &IndexMap,
    tree_size: usize,
) -> Result<OccurrenceData, TerraceError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| TerraceError::parse(1, "empty occurrence matrix"))?;
    let (rows, cols) = parse_header(header_line, header)?;
    if rows == 0 || 2 * rows - 1 != tree_size {
        return Err(TerraceError::bad_input(format!(
            "matrix lists {rows} species for a tree of {tree_size} nodes"
        )));
    }

    let mut matrix = BitMatrix::new(tree_size, cols);
    let mut per_partition = vec![0usize; cols];
    let mut seen = HashSet::new();
    let mut has_data = HashSet::new();
    let mut comprehensive = None;

    for (line, text) in lines {
        let fields: Vec<&str> = text.split_whitespace().collect();
        let Some((name, entries)) = fields.split_last() else {
            continue;
        };
        if entries.len() != cols {
            return Err(TerraceError::parse(
                line,
                format!(
                    "expected {cols} entries before the species name, found {}",
                    entries.len()
                ),
            ));
        }
        let species = *indices
            .get(*name)
            .ok_or_else(|| TerraceError::parse(line, format!("unknown species {name}")))?;
        if !seen.insert(species) {
            return Err(TerraceError::parse(line, format!("duplicate species {name}")));
        }

        let mut complete = true;
        for (col, entry) in entries.iter().enumerate() {
            match *entry {
                "1" => {
                    matrix.set(species, col, true);
                    per_partition[col] += 1;
                    has_data.insert(species);
                }
                "0" => complete = false,
                other => {
                    return Err(TerraceError::parse(
                        line,
                        format!("entry {other:?} is neither 0 nor 1"),
                    ))
                }
            }
        }
        if complete && comprehensive.is_none() {
            comprehensive = Some(species);
        }
    }

    let mut missing: Vec<&str> = indices
        .iter()
        .filter(|(_, species)| !has_data.contains(*species))
        .map(|(name, _)| name.as_str())
        .collect();
    missing.sort_unstable();
    if let Some(name) = missing.first() {
        return Err(TerraceError::bad_input(format!("missing species {name}")));
    }

    let (kept, dropped_partitions): (Vec<usize>, Vec<usize>) =
        (0..cols).partition(|&col| per_partition[col] > 1);
    debug!(
        species = rows,
        partitions = cols,
        dropped = dropped_partitions.len(),
        "read occurrence matrix"
    );
    Ok(OccurrenceData {
        matrix: matrix.select_columns(&kept),
        comprehensive,
        dropped_partitions,
    })
}
