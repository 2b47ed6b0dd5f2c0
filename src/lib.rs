//! A probabilistic 3D occupancy map backed by a sparse octree.
//!
//! A [`Tree`] starts as a single `Unknown` leaf over a cubic root volume and
//! grows on demand: [`Tree::add_point`] marks the leaf containing a point
//! `Occupied`, doubling the root toward the point first if it falls outside
//! the current bounds; [`Tree::add_ray`] marks every leaf an open ray passes
//! through `Free`. [`Tree::ray_intersect`] answers "what is the first
//! occupied leaf this ray encounters", and [`Tree::encode`] /
//! [`Tree::from_bitstream`] round-trip the tree through a compact bit-packed
//! stream.
//!
//! Homogeneous subtrees collapse automatically after insertion: eight
//! sibling leaves sharing the same `Free` or `Occupied` state merge into
//! their parent, keeping the tree as small as the data it represents.

pub mod arena;
pub mod bitstream;
pub mod error;
pub mod geometry;
pub mod tree;

pub use arena::Occupancy;
pub use error::TreeError;
pub use geometry::{Cube, Ray, Vec3};
pub use tree::{LeafDescriptor, Tree};
