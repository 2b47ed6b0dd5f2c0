//! Bit-packed topology/occupancy codec: a pre-order depth-first walk of the
//! tree, two bits per child slot. `11` means "inner, recurse"; `10`/`01`/`00`
//! are the three leaf occupancy states. The root itself is never prefixed by
//! its own two-bit descriptor — it is always treated as internal, so an
//! empty bitstream decodes to a tree whose root is a single `Unknown` leaf.

use super::Tree;
use crate::arena::{Arena, ChildGroup, Node, Occupancy};
use crate::bitstream::{BitReader, BitWriter};
use crate::error::TreeError;
use crate::geometry::Vec3;

const DESCRIPTOR_INNER: u8 = 0b11;
const DESCRIPTOR_FREE: u8 = 0b10;
const DESCRIPTOR_OCCUPIED: u8 = 0b01;
const DESCRIPTOR_UNKNOWN: u8 = 0b00;

fn descriptor_for(node: &Node) -> u8 {
    if node.children.is_some() {
        return DESCRIPTOR_INNER;
    }
    match node.occupancy {
        Occupancy::Free => DESCRIPTOR_FREE,
        Occupancy::Occupied => DESCRIPTOR_OCCUPIED,
        Occupancy::Unknown => DESCRIPTOR_UNKNOWN,
    }
}

impl Tree {
    /// Encodes topology and occupancy as a pre-order, slot-ordered bitstream.
    /// A tree whose root is already a leaf (never subdivided) encodes to an
    /// empty byte vector.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = BitWriter::with_capacity_bits(0);
        let root = self.node(self.root_handle);
        if let Some(group_handle) = root.children {
            self.encode_children(group_handle, &mut writer);
        }
        writer.into_bytes()
    }

    fn encode_children(&self, group_handle: crate::arena::ChildGroupHandle, writer: &mut BitWriter) {
        let group = *self.arena.get_children(group_handle);
        for &child in &group {
            let node = self.node(child);
            let descriptor = descriptor_for(node);
            writer.write_bit(descriptor & 0b10 != 0);
            writer.write_bit(descriptor & 0b01 != 0);
        }
        for &child in &group {
            let node = self.node(child);
            if let Some(child_group) = node.children {
                self.encode_children(child_group, writer);
            }
        }
    }

    /// Reconstructs a tree from a bitstream produced by [`Tree::encode`].
    /// Growth never runs during decode — the geometry is fixed entirely by
    /// the parameters given.
    pub fn from_bitstream(
        root_center: Vec3,
        root_extent: f32,
        min_leaf_extent: f32,
        bytes: &[u8],
    ) -> Result<Tree, TreeError> {
        let mut arena = Arena::new();
        let root_handle = arena
            .new_node()
            .expect("allocating the first node of a fresh arena cannot fail");

        if !bytes.is_empty() {
            let mut reader = BitReader::new(bytes);
            let group_handle = Self::decode_children(&mut arena, &mut reader)?;
            arena.set_node(
                root_handle,
                Node {
                    children: Some(group_handle),
                    occupancy: Occupancy::Unknown,
                },
            );
        }

        Ok(Tree {
            arena,
            root_handle,
            root_center,
            root_extent,
            min_leaf_extent,
        })
    }

    fn decode_children(
        arena: &mut Arena,
        reader: &mut BitReader,
    ) -> Result<crate::arena::ChildGroupHandle, TreeError> {
        let mut descriptors = [0u8; 8];
        for slot in descriptors.iter_mut() {
            let hi = reader
                .read_bit()
                .ok_or(TreeError::CorruptBitstream {
                    bit_offset: reader.bit_offset(),
                })?;
            let lo = reader
                .read_bit()
                .ok_or(TreeError::CorruptBitstream {
                    bit_offset: reader.bit_offset(),
                })?;
            *slot = ((hi as u8) << 1) | (lo as u8);
        }

        let mut children: ChildGroup = [0; 8];
        for (slot, &descriptor) in descriptors.iter().enumerate() {
            let handle = arena
                .new_node()
                .map_err(|_| TreeError::AllocatorExhausted)?;
            children[slot] = handle;
            match descriptor {
                DESCRIPTOR_FREE => arena.set_node(
                    handle,
                    Node {
                        children: None,
                        occupancy: Occupancy::Free,
                    },
                ),
                DESCRIPTOR_OCCUPIED => arena.set_node(
                    handle,
                    Node {
                        children: None,
                        occupancy: Occupancy::Occupied,
                    },
                ),
                DESCRIPTOR_UNKNOWN => arena.set_node(
                    handle,
                    Node {
                        children: None,
                        occupancy: Occupancy::Unknown,
                    },
                ),
                _ => {}
            }
        }

        for (slot, &descriptor) in descriptors.iter().enumerate() {
            if descriptor == DESCRIPTOR_INNER {
                let child_group_handle = Self::decode_children(arena, reader)?;
                arena.set_node(
                    children[slot],
                    Node {
                        children: Some(child_group_handle),
                        occupancy: Occupancy::Unknown,
                    },
                );
            }
        }

        arena
            .new_child_group(children)
            .map_err(|_| TreeError::AllocatorExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Ray;

    #[test]
    fn leaf_root_encodes_to_empty_stream() {
        let tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        assert!(tree.encode().is_empty());
    }

    #[test]
    fn round_trip_preserves_occupied_leaves() {
        let mut tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        tree.add_point(Vec3::new(0.1, 0.1, 0.1)).unwrap();
        tree.add_point(Vec3::new(-3.0, -3.0, -3.0)).unwrap();
        let mut expected = tree.leaves();
        expected.sort_by(|a, b| a.center.x.partial_cmp(&b.center.x).unwrap());

        let bytes = tree.encode();
        let decoded =
            Tree::from_bitstream(tree.root_center(), tree.root_extent(), tree.min_leaf_extent(), &bytes)
                .unwrap();
        let mut actual = decoded.leaves();
        actual.sort_by(|a, b| a.center.x.partial_cmp(&b.center.x).unwrap());

        assert_eq!(expected, actual);
    }

    #[test]
    fn round_trip_preserves_ray_intersect_results() {
        let mut tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        tree.add_point(Vec3::new(0.1, 0.1, 0.1)).unwrap();
        let bytes = tree.encode();
        let decoded =
            Tree::from_bitstream(tree.root_center(), tree.root_extent(), tree.min_leaf_extent(), &bytes)
                .unwrap();

        let ray = Ray::new(Vec3::new(-10.0, 0.1, 0.1), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tree.ray_intersect(&ray), decoded.ray_intersect(&ray));
    }

    #[test]
    fn truncated_stream_reports_corrupt_bitstream() {
        let mut tree = Tree::new(Vec3::splat(0.0), 8.0, 1.0);
        tree.add_point(Vec3::new(0.1, 0.1, 0.1)).unwrap();
        let mut bytes = tree.encode();
        bytes.truncate(bytes.len() / 2);
        let err = Tree::from_bitstream(tree.root_center(), tree.root_extent(), tree.min_leaf_extent(), &bytes)
            .unwrap_err();
        assert!(matches!(err, TreeError::CorruptBitstream { .. }));
    }

    #[test]
    fn empty_stream_decodes_to_unknown_leaf_root() {
        let decoded = Tree::from_bitstream(Vec3::splat(0.0), 8.0, 1.0, &[]).unwrap();
        assert!(decoded.leaves().is_empty());
        let root = decoded.node(decoded.root_handle);
        assert!(root.is_leaf());
        assert_eq!(root.occupancy, Occupancy::Unknown);
    }
}
