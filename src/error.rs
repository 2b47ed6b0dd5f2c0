//! Error surface for tree mutation, growth and (de)serialization.

use crate::geometry::Vec3;

/// Errors that can be signalled by a [`crate::Tree`] operation.
///
/// Internal invariant violations (e.g. dereferencing a handle that was never
/// allocated) are programmer errors, not represented here; the arena panics
/// on them unconditionally rather than returning a `TreeError`, since no
/// correct caller can trigger one.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// `add_point` gave up after 20 root-growth attempts still failed to
    /// enclose the point. The root has already been grown by whatever
    /// partial attempts occurred before the cap was hit; that expansion is
    /// not rolled back.
    #[error("growth limit exceeded trying to enclose {point:?}")]
    GrowthLimitExceeded { point: Vec3 },

    /// `from_bitstream` ran out of bits mid-descriptor. The partial tree
    /// built so far is discarded; the caller receives only the error.
    #[error("bitstream truncated or malformed at bit offset {bit_offset}")]
    CorruptBitstream { bit_offset: usize },

    /// The Arena could not grow its backing storage for a new node or child
    /// group.
    #[error("arena allocator exhausted")]
    AllocatorExhausted,
}
