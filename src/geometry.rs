//! Vector, ray and axis-aligned-cube primitives, plus the child-slot
//! arithmetic shared by insertion, ray descent, growth and the codec.
//!
//! The bit-to-axis mapping here MUST stay in lockstep across
//! [`best_fit_child_index`], [`child_center`] and [`root_pos_index`] — a
//! divergence between any two of them silently corrupts both growth and the
//! bit-packed codec. See the module-level tests for the round-trip check
//! that guards this.

use std::ops::{Add, Mul, Sub};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A point or direction in 3-space. Mirrors the componentwise vector type
/// every octree in this lineage carries as a baseline (add/sub/scalar-mul/eq).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        Vec3::new(self.x / len, self.y / len, self.z / len)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, scalar: f32) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// A half-line: `origin + t * direction` for `t >= 0`. `direction` is
/// expected to be pre-normalized by the caller.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let ray = Self { origin, direction };
        debug_assert!(
            (1.0 - ray.direction.length()).abs() < 1e-4,
            "Ray::direction must be normalized"
        );
        ray
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// An axis-aligned cube described by its center and edge length.
#[derive(Debug, Clone, Copy)]
pub struct Cube {
    pub center: Vec3,
    pub extent: f32,
}

impl Cube {
    pub fn new(center: Vec3, extent: f32) -> Self {
        Self { center, extent }
    }

    /// Closed-interval containment test on every axis.
    pub fn contains_point(&self, p: Vec3) -> bool {
        let half = self.extent / 2.0;
        (p.x - self.center.x).abs() <= half
            && (p.y - self.center.y).abs() <= half
            && (p.z - self.center.z).abs() <= half
    }

    /// Slab-method intersection test against the ray's forward half-line
    /// (`t >= 0`). Returns whether any point of the cube lies on the ray.
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let half = self.extent / 2.0;
        let min = Vec3::new(
            self.center.x - half,
            self.center.y - half,
            self.center.z - half,
        );
        let max = Vec3::new(
            self.center.x + half,
            self.center.y + half,
            self.center.z + half,
        );

        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for (origin, dir, lo, hi) in [
            (ray.origin.x, ray.direction.x, min.x, max.x),
            (ray.origin.y, ray.direction.y, min.y, max.y),
            (ray.origin.z, ray.direction.z, min.z, max.z),
        ] {
            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let inv_dir = 1.0 / dir;
            let mut t0 = (lo - origin) * inv_dir;
            let mut t1 = (hi - origin) * inv_dir;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// `sign(0) = +1`, per the documented growth-direction convention.
pub fn sign(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Child-slot bit layout (ties fall to the `0` side of each bit):
/// - bit 0 (value 1): `+x` half, else `-x`
/// - bit 1 (value 2): `+z` half, else `-z`
/// - bit 2 (value 4): `-y` half, else `+y`
pub fn best_fit_child_index(p: Vec3, parent_center: Vec3) -> u8 {
    let mut slot = 0u8;
    if p.x >= parent_center.x {
        slot |= 1;
    }
    if p.z >= parent_center.z {
        slot |= 2;
    }
    if p.y < parent_center.y {
        slot |= 4;
    }
    slot
}

/// Offsets `parent_center` by `±child_extent/2` on each axis according to
/// `slot`'s bit decomposition (see [`best_fit_child_index`] for the mapping).
pub fn child_center(slot: u8, child_extent: f32, parent_center: Vec3) -> Vec3 {
    let h = child_extent / 2.0;
    let sx = if slot & 1 != 0 { 1.0 } else { -1.0 };
    let sz = if slot & 2 != 0 { 1.0 } else { -1.0 };
    let sy = if slot & 4 != 0 { -1.0 } else { 1.0 };
    Vec3::new(
        parent_center.x + sx * h,
        parent_center.y + sy * h,
        parent_center.z + sz * h,
    )
}

/// The slot in the freshly-grown root whose quadrant contains the old root's
/// center, given the growth direction's per-axis signs. Must be the inverse
/// of [`child_center`] applied from the new root: the old root always ends
/// up on the side opposite the growth direction.
pub fn root_pos_index(sx: f32, sy: f32, sz: f32) -> u8 {
    let mut slot = 0u8;
    if sx < 0.0 {
        slot |= 1;
    }
    if sz < 0.0 {
        slot |= 2;
    }
    if sy > 0.0 {
        slot |= 4;
    }
    slot
}
