//! Read-only operations: ray intersection against the occupied set, and
//! enumeration of every occupied leaf. Both are pure functions of tree
//! state — no allocation on the hot path of [`Tree::ray_intersect`], and no
//! logging, since this path is expected to run at interactive rates.

use super::{LeafDescriptor, Tree};
use crate::arena::{NodeHandle, Occupancy};
use crate::geometry::{child_center, Cube, Ray, Vec3};

impl Tree {
    /// Depth-first descent in child-slot order (0..7), returning the center
    /// of the first `Occupied` leaf the ray's bounding cubes are hit in.
    /// This is the *smallest node the traversal order encounters*, not
    /// necessarily the nearest occupied leaf along the ray parameter `t`.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<Vec3> {
        self.ray_intersect_node(ray, self.root_handle, self.root_center, self.root_extent)
    }

    fn ray_intersect_node(
        &self,
        ray: &Ray,
        handle: NodeHandle,
        node_center: Vec3,
        node_extent: f32,
    ) -> Option<Vec3> {
        if !Cube::new(node_center, node_extent).intersects_ray(ray) {
            return None;
        }

        let node = self.node(handle);
        match node.children {
            None => {
                if node.occupancy == Occupancy::Occupied {
                    Some(node_center)
                } else {
                    None
                }
            }
            Some(group_handle) => {
                let group = *self.arena.get_children(group_handle);
                let child_extent = node_extent / 2.0;
                for slot in 0..8u8 {
                    let child_c = child_center(slot, child_extent, node_center);
                    if let Some(hit) =
                        self.ray_intersect_node(ray, group[slot as usize], child_c, child_extent)
                    {
                        return Some(hit);
                    }
                }
                None
            }
        }
    }

    /// Collects `{center, extent}` for every `Occupied` leaf, in the same
    /// slot-order depth-first traversal the codec uses.
    pub fn leaves(&self) -> Vec<LeafDescriptor> {
        let mut out = Vec::new();
        self.collect_leaves(self.root_handle, self.root_center, self.root_extent, &mut out);
        out
    }

    fn collect_leaves(
        &self,
        handle: NodeHandle,
        node_center: Vec3,
        node_extent: f32,
        out: &mut Vec<LeafDescriptor>,
    ) {
        let node = self.node(handle);
        match node.children {
            None => {
                if node.occupancy == Occupancy::Occupied {
                    out.push(LeafDescriptor {
                        center: node_center,
                        extent: node_extent,
                    });
                }
            }
            Some(group_handle) => {
                let group = *self.arena.get_children(group_handle);
                let child_extent = node_extent / 2.0;
                for slot in 0..8u8 {
                    let child_c = child_center(slot, child_extent, node_center);
                    self.collect_leaves(group[slot as usize], child_c, child_extent, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_intersect_finds_occupied_leaf() {
        let mut tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        tree.add_point(Vec3::new(0.1, 0.1, 0.1)).unwrap();
        let ray = Ray::new(Vec3::new(-10.0, 0.1, 0.1), Vec3::new(1.0, 0.0, 0.0));
        let hit = tree.ray_intersect(&ray);
        assert!(hit.is_some());
        let leaf = tree.leaves()[0];
        assert_eq!(hit.unwrap(), leaf.center);
    }

    #[test]
    fn ray_intersect_is_pure() {
        let mut tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        tree.add_point(Vec3::new(0.1, 0.1, 0.1)).unwrap();
        let ray = Ray::new(Vec3::new(-10.0, 0.1, 0.1), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tree.ray_intersect(&ray), tree.ray_intersect(&ray));
    }

    #[test]
    fn ray_intersect_finds_nothing_when_only_free_leaves_exist() {
        let mut tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        tree.add_ray(Vec3::splat(0.0), Vec3::new(4.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(tree.ray_intersect(&ray).is_none());
    }

    #[test]
    fn leaves_only_reports_occupied() {
        let mut tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        tree.add_ray(Vec3::splat(0.0), Vec3::new(4.0, 0.0, 0.0));
        assert!(tree.leaves().is_empty());
    }
}
