//! quartz-physics: Deterministic Q16.16 Collision Detection
//!
//! A 3D rigid-body collision *detection* engine built entirely on fixed-point
//! arithmetic. Bodies carry up to eight shape groups of up to eight convex
//! primitives each (spheres, oriented boxes, capsules); every tick integrates
//! body state and reports each colliding primitive pair as a contact. The
//! engine never resolves contacts or applies impulses — that is the caller's
//! job.
//!
//! # Features
//!
//! - **Deterministic**: bit-exact results across platforms (no floating
//!   point anywhere in the simulation; `f32` exists only as a debug-draw
//!   view)
//! - **Q16.16 fixed-point**: 32-bit scalars with exact degree trigonometry
//!   at the cardinal angles
//! - **Sparse-set storage**: O(1) insert/remove/enable/disable with dense
//!   iteration and LIFO id reuse
//! - **Snapshot support**: byte-reproducible save/load of the whole scene
//!   for rollback and lockstep netcode
//!
//! # Example
//!
//! ```rust
//! use quartz_physics::{ShapeKind, Unit, Vec3, World};
//!
//! let mut world = World::new();
//!
//! // Two bodies, one sphere each, on mutually visible layers
//! let mut ids = Vec::new();
//! for x in [0, 3] {
//!     let body = world.create_body();
//!     world.body_mut(body).unwrap().position = Vec3::from_int(x, 0, 0);
//!     let group = world.add_shape_group(body);
//!     let g = world.shape_group_mut(group).unwrap();
//!     g.layer = 1;
//!     g.mask = 1;
//!     let shape = world.add_shape(group, ShapeKind::Sphere);
//!     let sphere = world.shape(shape).unwrap().shape_type_id;
//!     world.sphere_mut(sphere).unwrap().radius = Unit::from_int(2);
//!     ids.push(body);
//! }
//!
//! world.update();
//! assert_eq!(world.contacts().len(), 1);
//! assert_eq!(world.contacts()[0].depth, Unit::from_int(1));
//! ```
//!
//! # Modules
//!
//! - [`math`]: Q16.16 scalar, vector and matrix algebra, degree trig
//! - [`store`]: sparse-set containers, link records, snapshot streams
//! - [`shapes`]: collision primitives and AABB derivation
//! - [`collide`]: closest-point helpers and the six pairwise colliders
//! - [`world`]: scene lifecycle, tick pipeline, contacts, snapshots
//! - [`debug_draw`]: the float-view visualization boundary
//! - [`error`]: the unified error type
//!
//! # Determinism
//!
//! Identical mutation sequences on two worlds produce bit-identical
//! snapshots and contact lists, because:
//!
//! 1. All arithmetic is integer fixed-point with specified truncation
//! 2. Iteration orders are store-index driven, never hashed
//! 3. Serialization is explicit little-endian byte I/O
//!
//! This makes the engine suitable for lockstep multiplayer, rollback
//! netcode, and replay systems.

#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod collide;
pub mod debug_draw;
pub mod error;
pub mod math;
pub mod shapes;
pub mod store;
pub mod world;

// Re-export commonly used types
pub use collide::{
    closest_point_on_obb, closest_point_on_segment, closest_points_between_segments,
    collide_capsule_obb, collide_capsules, collide_obbs, collide_shapes, collide_sphere_capsule,
    collide_sphere_obb, collide_spheres, CollisionResult, WorldShape,
};
pub use debug_draw::DebugDraw;
pub use error::PhysicsError;
pub use math::{cosdeg, sindeg, Mat3, Mat3F, Unit, Vec3, Vec3F};
pub use shapes::{Aabb, Capsule, Obb, Sphere};
pub use store::{ByteRecord, ByteStream, Identifier, Link, SparseSet, INVALID_ID, LINK_FANOUT};
pub use world::{Body, ContactPair, Shape, ShapeGroup, ShapeKind, TickStats, World};
