//! Bit-level containers
//!
//! - [`BitSet`]: fixed-capacity leaf or constraint set
//! - [`RankedBitSet`]: bit set with O(1) rank after `finalize`
//! - [`BitMatrix`]: node × partition occurrence data

mod bitset;
mod matrix;
mod ranked;

pub use bitset::{words_for, BitSet, Ones, WORD_BITS};
pub use matrix::BitMatrix;
pub use ranked::RankedBitSet;
