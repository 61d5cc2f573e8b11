//! Collision Primitives
//!
//! The three convex primitives the engine understands — spheres, oriented
//! boxes and capsules — plus the axis-aligned bounding box used by the
//! broadphase.
//!
//! Primitives are stored in body-local space. World-space values only exist
//! transiently: [`Sphere::transformed`] and friends map a local primitive
//! through a body pose, and the `aabb` methods derive a world bound from an
//! already-transformed primitive.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::math::{Mat3, Unit, Vec3};
use crate::store::ByteRecord;

// ============================================================================
// Primitive Records
// ============================================================================

/// Sphere: center and radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sphere {
    /// Center position.
    pub center: Vec3,
    /// Radius.
    pub radius: Unit,
}

impl Sphere {
    /// Create a new sphere.
    #[inline]
    pub const fn new(center: Vec3, radius: Unit) -> Self {
        Self { center, radius }
    }

    /// Map through a body pose: `center` moves, `radius` is unchanged.
    #[inline]
    pub fn transformed(&self, origin: Vec3, rotation: Mat3) -> Self {
        Self {
            center: origin + rotation.mul_vec(self.center),
            radius: self.radius,
        }
    }

    /// Enclosing axis-aligned bounds.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.center - self.radius,
            max: self.center + self.radius,
        }
    }
}

/// Oriented box: center, half-extents along its local axes, and a rotation
/// into the surrounding frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Obb {
    /// Center position.
    pub center: Vec3,
    /// Half-size along each local axis.
    pub half_extents: Vec3,
    /// Local-to-parent rotation.
    pub rotation: Mat3,
}

impl Obb {
    /// Create a new oriented box.
    #[inline]
    pub const fn new(center: Vec3, half_extents: Vec3, rotation: Mat3) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// Map through a body pose: the center moves as a point, the rotation
    /// composes, half-extents are unchanged.
    #[inline]
    pub fn transformed(&self, origin: Vec3, rotation: Mat3) -> Self {
        Self {
            center: origin + rotation.mul_vec(self.center),
            half_extents: self.half_extents,
            rotation: rotation * self.rotation,
        }
    }

    /// Enclosing axis-aligned bounds.
    ///
    /// The extent on each world axis is the sum over the box columns of
    /// `|column component| * matching half-extent`.
    pub fn aabb(&self) -> Aabb {
        let c = &self.rotation.cols;
        let h = self.half_extents;
        let extent = Vec3::new(
            c[0].x.abs() * h.x + c[1].x.abs() * h.y + c[2].x.abs() * h.z,
            c[0].y.abs() * h.x + c[1].y.abs() * h.y + c[2].y.abs() * h.z,
            c[0].z.abs() * h.x + c[1].z.abs() * h.y + c[2].z.abs() * h.z,
        );
        Aabb {
            min: self.center - extent,
            max: self.center + extent,
        }
    }
}

impl Default for Obb {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            half_extents: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
        }
    }
}

/// Capsule: a segment from `start` to `end` swept by a sphere of `radius`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capsule {
    /// Segment start.
    pub start: Vec3,
    /// Segment end.
    pub end: Vec3,
    /// Sweep radius.
    pub radius: Unit,
}

impl Capsule {
    /// Create a new capsule.
    #[inline]
    pub const fn new(start: Vec3, end: Vec3, radius: Unit) -> Self {
        Self { start, end, radius }
    }

    /// Map through a body pose: both endpoints move as points, the radius is
    /// unchanged.
    #[inline]
    pub fn transformed(&self, origin: Vec3, rotation: Mat3) -> Self {
        Self {
            start: origin + rotation.mul_vec(self.start),
            end: origin + rotation.mul_vec(self.end),
            radius: self.radius,
        }
    }

    /// Enclosing axis-aligned bounds: componentwise min/max of the two
    /// endpoints, expanded by the radius.
    pub fn aabb(&self) -> Aabb {
        let min = Vec3::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.z.min(self.end.z),
        );
        let max = Vec3::new(
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
            self.start.z.max(self.end.z),
        );
        Aabb {
            min: min - self.radius,
            max: max + self.radius,
        }
    }
}

// ============================================================================
// Aabb
// ============================================================================

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aabb {
    /// Componentwise minimum corner.
    pub min: Vec3,
    /// Componentwise maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create from corners.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inclusive interval intersection on all three axes.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.max.x < other.min.x || other.max.x < self.min.x {
            return false;
        }
        if self.max.y < other.min.y || other.max.y < self.min.y {
            return false;
        }
        if self.max.z < other.min.z || other.max.z < self.min.z {
            return false;
        }
        true
    }

    /// Smallest box containing both.
    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Whether `other` lies entirely inside `self` (inclusive).
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }
}

// ============================================================================
// Snapshot Encodings
// ============================================================================

impl ByteRecord for Sphere {
    const SIZE: usize = Vec3::SIZE + Unit::SIZE;

    fn encode(&self, out: &mut Vec<u8>) {
        self.center.encode(out);
        self.radius.encode(out);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            center: Vec3::decode(&buf[0..12]),
            radius: Unit::decode(&buf[12..16]),
        }
    }
}

impl ByteRecord for Obb {
    const SIZE: usize = Vec3::SIZE * 2 + Mat3::SIZE;

    fn encode(&self, out: &mut Vec<u8>) {
        self.center.encode(out);
        self.half_extents.encode(out);
        self.rotation.encode(out);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            center: Vec3::decode(&buf[0..12]),
            half_extents: Vec3::decode(&buf[12..24]),
            rotation: Mat3::decode(&buf[24..60]),
        }
    }
}

impl ByteRecord for Capsule {
    const SIZE: usize = Vec3::SIZE * 2 + Unit::SIZE;

    fn encode(&self, out: &mut Vec<u8>) {
        self.start.encode(out);
        self.end.encode(out);
        self.radius.encode(out);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            start: Vec3::decode(&buf[0..12]),
            end: Vec3::decode(&buf[12..24]),
            radius: Unit::decode(&buf[24..28]),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
