//! Debug Visualization Boundary
//!
//! The one place floats exist: a renderer implements [`DebugDraw`] and the
//! world replays its current state through it as lossy `f32` views
//! ([`Vec3F`](crate::math::Vec3F) / [`Mat3F`](crate::math::Mat3F)). Nothing
//! ever flows back from here into the simulation.
//!
//! The sink's [`DebugDraw::flags`] bitmask selects which categories are
//! replayed; see [`flags`] for the bits.

use crate::math::{Mat3F, Vec3F};

/// Bits for [`DebugDraw::flags`].
pub mod flags {
    /// Replay every live shape in world space.
    pub const SHAPES: u32 = 1 << 0;
    /// Replay each shape group's world AABB.
    pub const AABBS: u32 = 1 << 1;
    /// Replay each contact as a point plus a normal line.
    pub const CONTACTS: u32 = 1 << 2;
    /// Replay each active body's local axes.
    pub const BODY_AXES: u32 = 1 << 3;
    /// Replay each active body's origin.
    pub const BODY_ORIGINS: u32 = 1 << 4;
    /// Everything.
    pub const ALL: u32 = u32::MAX;
}

/// Visualization sink.
///
/// The world holds an implementation only by exclusive borrow, for the
/// duration of a single [`World::draw_debug`](crate::world::World::draw_debug)
/// call; a sink must not retain identifiers past removal of the entities
/// they name.
pub trait DebugDraw {
    /// Which categories to replay. Defaults to everything.
    fn flags(&self) -> u32 {
        flags::ALL
    }

    /// A sphere in world space.
    fn draw_sphere(&mut self, center: Vec3F, radius: f32);

    /// An oriented box in world space.
    fn draw_box(&mut self, center: Vec3F, half_extents: Vec3F, rotation: Mat3F);

    /// A capsule in world space.
    fn draw_capsule(&mut self, start: Vec3F, end: Vec3F, radius: f32);

    /// An axis-aligned box.
    fn draw_aabb(&mut self, min: Vec3F, max: Vec3F);

    /// A line segment.
    fn draw_line(&mut self, from: Vec3F, to: Vec3F);

    /// A point marker.
    fn draw_point(&mut self, position: Vec3F, size: f32);

    /// A body origin marker.
    fn draw_body_origin(&mut self, position: Vec3F);

    /// A body's local coordinate frame.
    fn draw_body_axes(&mut self, position: Vec3F, rotation: Mat3F);
}
