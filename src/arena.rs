//! Flat, handle-addressed storage for octree nodes and child-group arrays.
//!
//! Handles are issued from two independent monotonically-increasing
//! counters (nodes, child groups) so their namespaces can diverge without
//! interference. Unlike the object-pool this crate's ancestor uses, freed
//! slots are never recycled: the spec explicitly doesn't require it, and in
//! return the bookkeeping collapses to a plain append-only buffer.

use crate::error::TreeError;

/// Opaque handle to a node. Stable for the node's lifetime.
pub type NodeHandle = u32;
/// Opaque handle to an 8-element child-group array.
pub type ChildGroupHandle = u32;

/// Ternary occupancy state. Represented internally close to `{-1, 0, +1}`
/// so a single additive update could later implement log-odds fusion;
/// nothing in this crate performs that update today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupancy {
    Free,
    #[default]
    Unknown,
    Occupied,
}

impl Occupancy {
    /// One-way numeric projection, kept available for future log-odds work.
    pub fn to_i8(self) -> i8 {
        match self {
            Occupancy::Free => -1,
            Occupancy::Unknown => 0,
            Occupancy::Occupied => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    pub(crate) children: Option<ChildGroupHandle>,
    pub(crate) occupancy: Occupancy,
}

impl Node {
    fn leaf(occupancy: Occupancy) -> Self {
        Self {
            children: None,
            occupancy,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

pub(crate) type ChildGroup = [NodeHandle; 8];

#[derive(Default)]
pub(crate) struct Arena {
    nodes: Vec<Option<Node>>,
    child_groups: Vec<Option<ChildGroup>>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates a leaf node with `Unknown` occupancy.
    pub(crate) fn new_node(&mut self) -> Result<NodeHandle, TreeError> {
        self.nodes
            .try_reserve(1)
            .map_err(|_| TreeError::AllocatorExhausted)?;
        let handle = self.nodes.len() as NodeHandle;
        self.nodes.push(Some(Node::leaf(Occupancy::Unknown)));
        Ok(handle)
    }

    /// Registers an 8-element child-group array.
    pub(crate) fn new_child_group(
        &mut self,
        handles: ChildGroup,
    ) -> Result<ChildGroupHandle, TreeError> {
        self.child_groups
            .try_reserve(1)
            .map_err(|_| TreeError::AllocatorExhausted)?;
        let handle = self.child_groups.len() as ChildGroupHandle;
        self.child_groups.push(Some(handles));
        Ok(handle)
    }

    pub(crate) fn get_node(&self, handle: NodeHandle) -> &Node {
        self.nodes[handle as usize]
            .as_ref()
            .expect("dereferenced a removed or unallocated node handle")
    }

    pub(crate) fn get_node_mut(&mut self, handle: NodeHandle) -> &mut Node {
        self.nodes[handle as usize]
            .as_mut()
            .expect("dereferenced a removed or unallocated node handle")
    }

    pub(crate) fn set_node(&mut self, handle: NodeHandle, node: Node) {
        self.nodes[handle as usize] = Some(node);
    }

    pub(crate) fn get_children(&self, handle: ChildGroupHandle) -> &ChildGroup {
        self.child_groups[handle as usize]
            .as_ref()
            .expect("dereferenced a removed or unallocated child-group handle")
    }

    pub(crate) fn remove_node(&mut self, handle: NodeHandle) {
        self.nodes[handle as usize] = None;
    }

    pub(crate) fn remove_child_group(&mut self, handle: ChildGroupHandle) {
        self.child_groups[handle as usize] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_unknown_leaf() {
        let mut arena = Arena::new();
        let h = arena.new_node().unwrap();
        let node = arena.get_node(h);
        assert!(node.is_leaf());
        assert_eq!(node.occupancy, Occupancy::Unknown);
    }

    #[test]
    fn handles_are_monotonic_and_not_recycled() {
        let mut arena = Arena::new();
        let a = arena.new_node().unwrap();
        let b = arena.new_node().unwrap();
        assert!(b > a);
        arena.remove_node(a);
        let c = arena.new_node().unwrap();
        assert!(c > b, "a freed handle must not be reused");
    }

    #[test]
    fn child_group_round_trip() {
        let mut arena = Arena::new();
        let leaves: ChildGroup = std::array::from_fn(|_| arena.new_node().unwrap());
        let group = arena.new_child_group(leaves).unwrap();
        assert_eq!(*arena.get_children(group), leaves);
    }

    #[test]
    fn occupancy_numeric_projection() {
        assert_eq!(Occupancy::Free.to_i8(), -1);
        assert_eq!(Occupancy::Unknown.to_i8(), 0);
        assert_eq!(Occupancy::Occupied.to_i8(), 1);
    }
}
