//! Mutating operations that preserve the tree's invariants: `add_point`,
//! `add_ray`, root growth, and the prune pass that follows insertion.

use super::{Tree, MAX_GROWTH_ITERATIONS};
use crate::arena::{ChildGroup, Node, NodeHandle, Occupancy};
use crate::error::TreeError;
use crate::geometry::{best_fit_child_index, child_center, root_pos_index, sign, Cube, Ray, Vec3};

impl Tree {
    /// Marks the leaf containing `p` as `Occupied`, growing the root first
    /// if necessary. Calling this twice with the same point is idempotent:
    /// the second call finds the leaf already `Occupied` and returns without
    /// further structural change.
    pub fn add_point(&mut self, p: Vec3) -> Result<(), TreeError> {
        tracing::debug!(point = ?p, "add_point");
        let mut growth_iterations = 0;
        while !self.root_contains(p) {
            if growth_iterations >= MAX_GROWTH_ITERATIONS {
                return Err(TreeError::GrowthLimitExceeded { point: p });
            }
            self.grow_root(p - self.root_center)?;
            growth_iterations += 1;
        }

        let root_handle = self.root_handle;
        let root_center = self.root_center;
        let root_extent = self.root_extent;
        self.insert(p, root_extent, root_center, root_handle)?;
        Ok(())
    }

    fn insert(
        &mut self,
        p: Vec3,
        node_extent: f32,
        node_center: Vec3,
        handle: NodeHandle,
    ) -> Result<(), TreeError> {
        if node_extent < self.min_leaf_extent {
            self.arena.get_node_mut(handle).occupancy = Occupancy::Occupied;
            return Ok(());
        }
        if !Cube::new(node_center, node_extent).contains_point(p) {
            return Ok(());
        }

        let group_handle = match self.arena.get_node(handle).children {
            Some(g) => g,
            None => self.make_unknown_children()?,
        };
        self.arena.get_node_mut(handle).children = Some(group_handle);

        let slot = best_fit_child_index(p, node_center);
        let child_extent = node_extent / 2.0;
        let child_c = child_center(slot, child_extent, node_center);
        let child_handle = self.arena.get_children(group_handle)[slot as usize];
        self.insert(p, child_extent, child_c, child_handle)?;

        self.try_prune(handle);
        Ok(())
    }

    /// Marks every leaf intersected by the open ray from `origin` toward
    /// `hit`, except the leaf whose center equals `hit` exactly, as `Free`.
    /// Performs no pruning — a subsequent `add_point` call will prune.
    ///
    /// The public signature carries no `Result`: allocator exhaustion here is
    /// as unlikely as anywhere else in the arena, but there's no slot to
    /// surface it in without changing the documented API, so it's dropped
    /// rather than silently left half-applied.
    pub fn add_ray(&mut self, origin: Vec3, hit: Vec3) {
        let direction = (hit - origin).normalized();
        let ray = Ray::new(origin, direction);
        let root_handle = self.root_handle;
        let root_center = self.root_center;
        let root_extent = self.root_extent;
        let _ = self.free_ray(&ray, hit, root_extent, root_center, root_handle);
    }

    fn free_ray(
        &mut self,
        ray: &Ray,
        hit: Vec3,
        node_extent: f32,
        node_center: Vec3,
        handle: NodeHandle,
    ) -> Result<(), TreeError> {
        if node_extent < self.min_leaf_extent {
            if node_center == hit {
                return Ok(());
            }
            self.arena.get_node_mut(handle).occupancy = Occupancy::Free;
            return Ok(());
        }

        let group_handle = match self.arena.get_node(handle).children {
            Some(g) => g,
            None => self.make_unknown_children()?,
        };
        self.arena.get_node_mut(handle).children = Some(group_handle);

        let child_extent = node_extent / 2.0;
        for slot in 0..8u8 {
            let child_c = child_center(slot, child_extent, node_center);
            if Cube::new(child_c, child_extent).intersects_ray(ray) {
                let child_handle = self.arena.get_children(group_handle)[slot as usize];
                self.free_ray(ray, hit, child_extent, child_c, child_handle)?;
            }
        }
        Ok(())
    }

    /// Doubles the root extent, growing toward `direction`. The old root is
    /// re-parented into whichever slot of the new root its center now falls
    /// in; the other seven slots are filled with fresh `Unknown` leaves.
    pub(crate) fn grow_root(&mut self, direction: Vec3) -> Result<(), TreeError> {
        tracing::debug!(direction = ?direction, "grow_root");
        let sx = sign(direction.x);
        let sy = sign(direction.y);
        let sz = sign(direction.z);
        let half = self.root_extent / 2.0;

        let new_center = self.root_center + Vec3::new(sx * half, sy * half, sz * half);
        let new_extent = self.root_extent * 2.0;
        let old_root_slot = root_pos_index(sx, sy, sz);

        let mut children: ChildGroup = [0; 8];
        for slot in 0..8u8 {
            children[slot as usize] = if slot == old_root_slot {
                self.root_handle
            } else {
                self.arena.new_node()?
            };
        }
        let group_handle = self.arena.new_child_group(children)?;
        let new_root_handle = self.arena.new_node()?;
        self.arena.set_node(
            new_root_handle,
            Node {
                children: Some(group_handle),
                occupancy: Occupancy::Unknown,
            },
        );

        self.root_handle = new_root_handle;
        self.root_center = new_center;
        self.root_extent = new_extent;
        Ok(())
    }

    fn make_unknown_children(&mut self) -> Result<crate::arena::ChildGroupHandle, TreeError> {
        let children: ChildGroup = [
            self.arena.new_node()?,
            self.arena.new_node()?,
            self.arena.new_node()?,
            self.arena.new_node()?,
            self.arena.new_node()?,
            self.arena.new_node()?,
            self.arena.new_node()?,
            self.arena.new_node()?,
        ];
        self.arena.new_child_group(children)
    }

    /// If every child of `handle` is a leaf sharing the same `Free` or
    /// `Occupied` state, collapses them into a single leaf at `handle` with
    /// that state. `Unknown` never prunes — it's the default state of a
    /// freshly-generated leaf, so pruning it would immediately undo the
    /// generation that made the child group.
    fn try_prune(&mut self, handle: NodeHandle) -> bool {
        let Some(group_handle) = self.arena.get_node(handle).children else {
            return false;
        };
        let group = *self.arena.get_children(group_handle);

        let mut common: Option<Occupancy> = None;
        for child in group {
            let child_node = self.arena.get_node(child);
            if !child_node.is_leaf() {
                return false;
            }
            match (child_node.occupancy, common) {
                (Occupancy::Unknown, _) => return false,
                (occ, None) => common = Some(occ),
                (occ, Some(c)) if occ == c => {}
                _ => return false,
            }
        }
        let occupancy = common.expect("a child group always has eight children");

        for child in group {
            self.arena.remove_node(child);
        }
        self.arena.remove_child_group(group_handle);

        let node = self.arena.get_node_mut(handle);
        node.children = None;
        node.occupancy = occupancy;
        tracing::trace!(?handle, ?occupancy, "pruned homogeneous subtree");
        true
    }
}
