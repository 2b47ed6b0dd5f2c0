//! The probabilistic occupancy tree: a cubic root volume subdivided into
//! octants on demand, with dynamic root growth, homogeneous-subtree
//! pruning, ray queries and a bit-packed topology/occupancy codec.

mod codec;
mod mutate;
mod query;

use crate::arena::{Arena, Node, NodeHandle, Occupancy};
use crate::geometry::Vec3;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Center and extent of a single `Occupied` leaf, as returned by
/// [`Tree::leaves`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LeafDescriptor {
    pub center: Vec3,
    pub extent: f32,
}

/// A sparse octree over a cubic root volume, storing ternary occupancy at
/// its leaves.
///
/// The tree is strictly top-down: no node stores a parent pointer. Every
/// descent carries the current node's center and extent through the call
/// stack instead, which is also why the tree is `Send` but not required to
/// be `Sync` — there's no interior mutability to protect.
pub struct Tree {
    pub(crate) arena: Arena,
    pub(crate) root_handle: NodeHandle,
    pub(crate) root_center: Vec3,
    pub(crate) root_extent: f32,
    pub(crate) min_leaf_extent: f32,
}

/// Growth is capped well beyond any practical input: each doubling covers
/// a 2x larger span, so 20 doublings cover a roughly million-times span.
/// Anything that needs more indicates a numeric pathology upstream, not a
/// legitimate point.
pub(crate) const MAX_GROWTH_ITERATIONS: u32 = 20;

impl Tree {
    /// Creates a new tree with a single `Unknown` leaf as its root.
    pub fn new(root_center: Vec3, root_extent: f32, min_leaf_extent: f32) -> Tree {
        let mut arena = Arena::new();
        let root_handle = arena
            .new_node()
            .expect("allocating the first node of a fresh arena cannot fail");
        Tree {
            arena,
            root_handle,
            root_center,
            root_extent,
            min_leaf_extent,
        }
    }

    pub fn root_center(&self) -> Vec3 {
        self.root_center
    }

    pub fn root_extent(&self) -> f32 {
        self.root_extent
    }

    pub fn min_leaf_extent(&self) -> f32 {
        self.min_leaf_extent
    }

    /// Closed-interval containment test for the current root cube.
    pub(crate) fn root_contains(&self, p: Vec3) -> bool {
        let half = self.root_extent / 2.0;
        (p.x - self.root_center.x).abs() <= half
            && (p.y - self.root_center.y).abs() <= half
            && (p.z - self.root_center.z).abs() <= half
    }

    pub(crate) fn node(&self, handle: NodeHandle) -> &Node {
        self.arena.get_node(handle)
    }
}
