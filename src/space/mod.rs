//! Space accounting and profiling
//!
//! Tracks scratch buffers and recursion depth of the enumeration

mod allocator;

pub use allocator::{ScratchPool, SpaceTracker};

/// Detailed space profile (if enabled)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpaceProfile {
    /// Maximum scratch words in use at once
    pub max_scratch_words: usize,
    /// Maximum recursion depth reached
    pub max_depth: usize,
    /// Number of recursive calls
    pub calls: usize,
    /// Scratch requests served by a new allocation
    pub fresh_buffers: usize,
    /// Scratch requests served from the free list
    pub reused_buffers: usize,
}

impl SpaceProfile {
    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Max scratch: {} words\nMax depth: {}\nCalls: {}\nBuffers: {} fresh, {} reused",
            self.max_scratch_words,
            self.max_depth,
            self.calls,
            self.fresh_buffers,
            self.reused_buffers
        )
    }
}
