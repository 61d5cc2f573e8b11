//! Scene World
//!
//! Owns every entity store, advances the simulation one tick at a time, and
//! emits the per-tick contact list.
//!
//! # Tick pipeline
//!
//! 1. Integrate every active non-static body (`v += a·dt`, `p += v·dt`;
//!    rotation is not integrated — there is no angular velocity).
//! 2. Clear the contact list and the per-tick group AABB cache.
//! 3. For every active shape group, union its shapes' world-space AABBs into
//!    one bound and append it to the cache.
//! 4. Sweep all cache pairs `(i, j)` with `i < j`: reject same-body,
//!    filtered, static/static and disjoint pairs, then dispatch every shape
//!    pair of the survivors through the colliders and append hits.
//!
//! Identical mutation sequences on two worlds produce bit-identical
//! snapshots and contact lists.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::collide::{collide_shapes, WorldShape};
use crate::error::PhysicsError;
use crate::math::{Mat3, Unit, Vec3};
use crate::shapes::{Aabb, Capsule, Obb, Sphere};
use crate::store::{ByteRecord, ByteStream, Identifier, Link, SparseSet, INVALID_ID};

// ============================================================================
// Records
// ============================================================================

/// Rigid body: pose, kinematic state, and the link to its shape groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Body {
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation.
    pub rotation: Mat3,
    /// Linear velocity.
    pub velocity: Vec3,
    /// Linear acceleration.
    pub acceleration: Vec3,
    /// Link whose children are this body's shape groups, or [`INVALID_ID`].
    pub link_shape_groups: Identifier,
    /// Static bodies are never integrated and never collide with each other.
    pub is_static: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            link_shape_groups: INVALID_ID,
            is_static: false,
        }
    }
}

impl ByteRecord for Body {
    const SIZE: usize = Vec3::SIZE * 3 + Mat3::SIZE + 2 + 1;

    fn encode(&self, out: &mut Vec<u8>) {
        self.position.encode(out);
        self.rotation.encode(out);
        self.velocity.encode(out);
        self.acceleration.encode(out);
        self.link_shape_groups.encode(out);
        out.push(self.is_static as u8);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            position: Vec3::decode(&buf[0..12]),
            rotation: Mat3::decode(&buf[12..48]),
            velocity: Vec3::decode(&buf[48..60]),
            acceleration: Vec3::decode(&buf[60..72]),
            link_shape_groups: Identifier::decode(&buf[72..74]),
            is_static: buf[74] != 0,
        }
    }
}

/// A set of shapes under one body, with one collision filter.
///
/// `owner_body` is a back-reference used for lookups and filtering only; it
/// is never walked during removal, so the ownership graph stays acyclic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeGroup {
    /// The body this group belongs to.
    pub owner_body: Identifier,
    /// Link whose children are this group's shapes, or [`INVALID_ID`].
    pub link_shapes: Identifier,
    /// Which layers this group occupies.
    pub layer: u32,
    /// Which layers this group collides with.
    pub mask: u32,
}

impl Default for ShapeGroup {
    fn default() -> Self {
        Self {
            owner_body: INVALID_ID,
            link_shapes: INVALID_ID,
            layer: 0,
            mask: 0,
        }
    }
}

impl ShapeGroup {
    /// Bidirectional filter test: both directions must agree.
    #[inline]
    pub fn can_collide(a: &Self, b: &Self) -> bool {
        (a.layer & b.mask) != 0 && (b.layer & a.mask) != 0
    }
}

impl ByteRecord for ShapeGroup {
    const SIZE: usize = 2 + 2 + 4 + 4;

    fn encode(&self, out: &mut Vec<u8>) {
        self.owner_body.encode(out);
        self.link_shapes.encode(out);
        out.extend_from_slice(&self.layer.to_le_bytes());
        out.extend_from_slice(&self.mask.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            owner_body: Identifier::decode(&buf[0..2]),
            link_shapes: Identifier::decode(&buf[2..4]),
            layer: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            mask: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
        }
    }
}

/// Discriminant for the primitive a [`Shape`] references.
///
/// The discriminant order doubles as the canonical collider ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ShapeKind {
    /// No primitive attached.
    #[default]
    None = 0,
    /// Oriented box in the OBB store.
    Obb = 1,
    /// Sphere in the sphere store.
    Sphere = 2,
    /// Capsule in the capsule store.
    Capsule = 3,
}

impl ShapeKind {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Obb,
            2 => Self::Sphere,
            3 => Self::Capsule,
            _ => Self::None,
        }
    }
}

/// A discriminated reference into one of the primitive stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    /// Index into the store selected by `kind`.
    pub shape_type_id: Identifier,
    /// Which primitive store `shape_type_id` indexes.
    pub kind: ShapeKind,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            shape_type_id: INVALID_ID,
            kind: ShapeKind::None,
        }
    }
}

impl ByteRecord for Shape {
    const SIZE: usize = 2 + 1;

    fn encode(&self, out: &mut Vec<u8>) {
        self.shape_type_id.encode(out);
        out.push(self.kind as u8);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            shape_type_id: Identifier::decode(&buf[0..2]),
            kind: ShapeKind::from_u8(buf[2]),
        }
    }
}

/// One colliding primitive pair reported by a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactPair {
    /// Body owning `shape_a`.
    pub body_a: Identifier,
    /// Body owning `shape_b`.
    pub body_b: Identifier,
    /// Shape from the first-swept group.
    pub shape_a: Identifier,
    /// Shape from the second-swept group.
    pub shape_b: Identifier,
    /// Direction from `shape_a` toward `shape_b`.
    pub normal: Vec3,
    /// Penetration depth along `normal`.
    pub depth: Unit,
    /// Representative contact point.
    pub point: Vec3,
}

/// Per-tick pipeline counters. Reset at the start of every tick; purely
/// informational and never read by the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Non-static active bodies integrated.
    pub integrated_bodies: u32,
    /// Group pairs examined by the broadphase.
    pub broad_pairs: u32,
    /// Group pairs the broadphase rejected.
    pub broad_rejects: u32,
    /// Primitive pairs dispatched to a collider.
    pub narrow_tests: u32,
    /// Contacts appended.
    pub contacts: u32,
}

/// Per-group entry of the tick's broadphase cache.
#[derive(Clone, Copy, Debug)]
struct GroupBounds {
    group: Identifier,
    owner: Identifier,
    is_static: bool,
    layer: u32,
    mask: u32,
    aabb: Aabb,
}

// ============================================================================
// World
// ============================================================================

/// The default updates-per-second rate.
const DEFAULT_UPDATE_RATE: Unit = Unit::from_int(60);

/// The collision scene: bodies, shape groups, shapes, primitives, and the
/// contact list produced by the latest tick.
#[derive(Clone, Debug)]
pub struct World {
    links: SparseSet<Link>,

    bodies: SparseSet<Body>,
    shape_groups: SparseSet<ShapeGroup>,
    shapes: SparseSet<Shape>,

    spheres: SparseSet<Sphere>,
    capsules: SparseSet<Capsule>,
    obbs: SparseSet<Obb>,

    origin: Vec3,
    up: Vec3,
    update_rate: Unit,

    contacts: Vec<ContactPair>,
    group_bounds: Vec<GroupBounds>,
    stats: TickStats,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world (update rate 60).
    pub fn new() -> Self {
        Self {
            links: SparseSet::new(),
            bodies: SparseSet::new(),
            shape_groups: SparseSet::new(),
            shapes: SparseSet::new(),
            spheres: SparseSet::new(),
            capsules: SparseSet::new(),
            obbs: SparseSet::new(),
            origin: Vec3::ZERO,
            up: Vec3::ZERO,
            update_rate: DEFAULT_UPDATE_RATE,
            contacts: Vec::new(),
            group_bounds: Vec::new(),
            stats: TickStats::default(),
        }
    }

    // ------------------------------------------------------------------
    // Scene metadata
    // ------------------------------------------------------------------

    /// Store the world up vector. Snapshotted; not consumed by the tick.
    pub fn set_orientation(&mut self, up: Vec3) {
        self.up = up;
    }

    /// Store the world origin. Snapshotted; not consumed by the tick.
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Set the expected number of ticks per second. The implicit timestep is
    /// `1 / rate`.
    pub fn set_update_rate(&mut self, rate: Unit) {
        self.update_rate = rate;
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a zeroed body: identity rotation, zero vectors, non-static.
    pub fn create_body(&mut self) -> Identifier {
        self.bodies.insert(Body::default())
    }

    /// Add a shape group to a body.
    ///
    /// Returns [`INVALID_ID`] when the body is unknown or its link is full
    /// (at most [`LINK_FANOUT`](crate::store::LINK_FANOUT) groups per body).
    /// The body's link is created lazily on the first call.
    pub fn add_shape_group(&mut self, body_id: Identifier) -> Identifier {
        let existing = match self.bodies.get(body_id) {
            Ok(body) => body.link_shape_groups,
            Err(_) => return INVALID_ID,
        };

        let link_id = if existing != INVALID_ID {
            existing
        } else {
            let link_id = self.links.insert(Link::new());
            if link_id == INVALID_ID {
                return INVALID_ID;
            }
            if let Ok(body) = self.bodies.get_mut(body_id) {
                body.link_shape_groups = link_id;
            }
            link_id
        };

        let slot = match self.links.get(link_id).ok().and_then(Link::first_free) {
            Some(slot) => slot,
            None => return INVALID_ID,
        };

        let group_id = self.shape_groups.insert(ShapeGroup {
            owner_body: body_id,
            ..ShapeGroup::default()
        });
        if group_id == INVALID_ID {
            return INVALID_ID;
        }

        if let Ok(link) = self.links.get_mut(link_id) {
            link.children[slot] = group_id;
        }
        group_id
    }

    /// Add a shape of `kind` to a shape group, allocating a primitive in the
    /// matching store.
    ///
    /// Returns [`INVALID_ID`] when `kind` is [`ShapeKind::None`], the group
    /// is unknown, or the group's link is full. The group's link is created
    /// lazily on the first call.
    pub fn add_shape(&mut self, group_id: Identifier, kind: ShapeKind) -> Identifier {
        if kind == ShapeKind::None {
            return INVALID_ID;
        }

        let existing = match self.shape_groups.get(group_id) {
            Ok(group) => group.link_shapes,
            Err(_) => return INVALID_ID,
        };

        let link_id = if existing != INVALID_ID {
            existing
        } else {
            let link_id = self.links.insert(Link::new());
            if link_id == INVALID_ID {
                return INVALID_ID;
            }
            if let Ok(group) = self.shape_groups.get_mut(group_id) {
                group.link_shapes = link_id;
            }
            link_id
        };

        let slot = match self.links.get(link_id).ok().and_then(Link::first_free) {
            Some(slot) => slot,
            None => return INVALID_ID,
        };

        let shape_type_id = match kind {
            ShapeKind::Sphere => self.spheres.insert(Sphere::default()),
            ShapeKind::Obb => self.obbs.insert(Obb::default()),
            ShapeKind::Capsule => self.capsules.insert(Capsule::default()),
            ShapeKind::None => return INVALID_ID,
        };
        if shape_type_id == INVALID_ID {
            return INVALID_ID;
        }

        let shape_id = self.shapes.insert(Shape {
            shape_type_id,
            kind,
        });
        if shape_id == INVALID_ID {
            return INVALID_ID;
        }

        if let Ok(link) = self.links.get_mut(link_id) {
            link.children[slot] = shape_id;
        }
        shape_id
    }

    /// Remove a body and cascade: its link, every group it owns, those
    /// groups' links, every shape in those groups, and every primitive those
    /// shapes reference. Unknown ids are ignored.
    pub fn remove_body(&mut self, body_id: Identifier) {
        let link_id = match self.bodies.get(body_id) {
            Ok(body) => body.link_shape_groups,
            Err(_) => return,
        };

        if link_id != INVALID_ID {
            let children = match self.links.get(link_id) {
                Ok(link) => link.children,
                Err(_) => [INVALID_ID; crate::store::LINK_FANOUT],
            };
            for group_id in children {
                if group_id != INVALID_ID {
                    self.destroy_group(group_id);
                }
            }
            self.links.remove(link_id);
        }

        self.bodies.remove(body_id);
    }

    /// Remove a shape group from the body that owns it.
    ///
    /// The group must appear in `body_id`'s link: removing a group through
    /// the wrong body is rejected as a no-op rather than silently repaired.
    pub fn remove_shape_group(&mut self, body_id: Identifier, group_id: Identifier) {
        let link_id = match self.bodies.get(body_id) {
            Ok(body) => body.link_shape_groups,
            Err(_) => return,
        };
        if link_id == INVALID_ID {
            return;
        }

        let slot = match self.links.get(link_id).ok().and_then(|l| l.slot_of(group_id)) {
            Some(slot) => slot,
            None => return,
        };

        self.destroy_group(group_id);
        if let Ok(link) = self.links.get_mut(link_id) {
            link.children[slot] = INVALID_ID;
        }
    }

    /// Remove a shape from the group that owns it, releasing its primitive.
    ///
    /// The shape must appear in `group_id`'s link; wrong-group removals are
    /// rejected as no-ops.
    pub fn remove_shape(&mut self, group_id: Identifier, shape_id: Identifier) {
        let link_id = match self.shape_groups.get(group_id) {
            Ok(group) => group.link_shapes,
            Err(_) => return,
        };
        if link_id == INVALID_ID {
            return;
        }

        let slot = match self.links.get(link_id).ok().and_then(|l| l.slot_of(shape_id)) {
            Some(slot) => slot,
            None => return,
        };

        self.destroy_shape(shape_id);
        if let Ok(link) = self.links.get_mut(link_id) {
            link.children[slot] = INVALID_ID;
        }
    }

    /// Release a group, its link, and every shape it holds. Does not touch
    /// the owning body's link.
    fn destroy_group(&mut self, group_id: Identifier) {
        let link_id = match self.shape_groups.get(group_id) {
            Ok(group) => group.link_shapes,
            Err(_) => return,
        };

        if link_id != INVALID_ID {
            let children = match self.links.get(link_id) {
                Ok(link) => link.children,
                Err(_) => [INVALID_ID; crate::store::LINK_FANOUT],
            };
            for shape_id in children {
                if shape_id != INVALID_ID {
                    self.destroy_shape(shape_id);
                }
            }
            self.links.remove(link_id);
        }

        self.shape_groups.remove(group_id);
    }

    /// Release a shape and its primitive record.
    fn destroy_shape(&mut self, shape_id: Identifier) {
        let shape = match self.shapes.get(shape_id) {
            Ok(shape) => *shape,
            Err(_) => return,
        };
        match shape.kind {
            ShapeKind::Sphere => self.spheres.remove(shape.shape_type_id),
            ShapeKind::Obb => self.obbs.remove(shape.shape_type_id),
            ShapeKind::Capsule => self.capsules.remove(shape.shape_type_id),
            ShapeKind::None => {}
        }
        self.shapes.remove(shape_id);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Look up a body.
    pub fn body(&self, id: Identifier) -> Result<&Body, PhysicsError> {
        self.bodies.get(id)
    }

    /// Look up a body mutably.
    pub fn body_mut(&mut self, id: Identifier) -> Result<&mut Body, PhysicsError> {
        self.bodies.get_mut(id)
    }

    /// Look up a shape group.
    pub fn shape_group(&self, id: Identifier) -> Result<&ShapeGroup, PhysicsError> {
        self.shape_groups.get(id)
    }

    /// Look up a shape group mutably.
    pub fn shape_group_mut(&mut self, id: Identifier) -> Result<&mut ShapeGroup, PhysicsError> {
        self.shape_groups.get_mut(id)
    }

    /// Look up a shape.
    pub fn shape(&self, id: Identifier) -> Result<&Shape, PhysicsError> {
        self.shapes.get(id)
    }

    /// Look up a sphere primitive.
    pub fn sphere(&self, id: Identifier) -> Result<&Sphere, PhysicsError> {
        self.spheres.get(id)
    }

    /// Look up a sphere primitive mutably.
    pub fn sphere_mut(&mut self, id: Identifier) -> Result<&mut Sphere, PhysicsError> {
        self.spheres.get_mut(id)
    }

    /// Look up an OBB primitive.
    pub fn obb(&self, id: Identifier) -> Result<&Obb, PhysicsError> {
        self.obbs.get(id)
    }

    /// Look up an OBB primitive mutably.
    pub fn obb_mut(&mut self, id: Identifier) -> Result<&mut Obb, PhysicsError> {
        self.obbs.get_mut(id)
    }

    /// Look up a capsule primitive.
    pub fn capsule(&self, id: Identifier) -> Result<&Capsule, PhysicsError> {
        self.capsules.get(id)
    }

    /// Look up a capsule primitive mutably.
    pub fn capsule_mut(&mut self, id: Identifier) -> Result<&mut Capsule, PhysicsError> {
        self.capsules.get_mut(id)
    }

    /// Contacts produced by the latest tick, in broadphase enumeration
    /// order. The same physical contact appears once per penetrating
    /// primitive pair.
    pub fn contacts(&self) -> &[ContactPair] {
        &self.contacts
    }

    /// Pipeline counters for the latest tick.
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Run one tick: integrate, rebuild bounds, detect collisions.
    pub fn update(&mut self) {
        self.stats = TickStats::default();
        let dt = Unit::ONE / self.update_rate;

        for body in self.bodies.active_mut() {
            if body.is_static {
                continue;
            }
            let acceleration = body.acceleration;
            body.velocity += acceleration * dt;
            let velocity = body.velocity;
            body.position += velocity * dt;
            self.stats.integrated_bodies += 1;
        }

        self.check_collisions();
    }

    /// Stages 2-4 of the tick: bounds cache, broadphase sweep, narrowphase.
    fn check_collisions(&mut self) {
        let mut contacts = core::mem::take(&mut self.contacts);
        let mut bounds = core::mem::take(&mut self.group_bounds);
        contacts.clear();
        bounds.clear();

        for &group_id in self.shape_groups.active_entities() {
            if let Some(entry) = self.group_bounds_entry(group_id) {
                bounds.push(entry);
            }
        }

        for i in 0..bounds.len() {
            for j in (i + 1)..bounds.len() {
                let a = &bounds[i];
                let b = &bounds[j];
                self.stats.broad_pairs += 1;

                let filtered = a.owner == b.owner
                    || (a.layer & b.mask) == 0
                    || (b.layer & a.mask) == 0
                    || (a.is_static && b.is_static)
                    || !a.aabb.overlaps(&b.aabb);
                if filtered {
                    self.stats.broad_rejects += 1;
                    continue;
                }

                self.narrowphase(a.group, a.owner, b.group, b.owner, &mut contacts);
            }
        }

        self.stats.contacts = contacts.len() as u32;
        self.contacts = contacts;
        self.group_bounds = bounds;
    }

    /// Build the broadphase cache entry for one group: the union of its
    /// shapes' world AABBs plus the owner's filter data. Groups with no live
    /// shapes produce no entry.
    fn group_bounds_entry(&self, group_id: Identifier) -> Option<GroupBounds> {
        let group = self.shape_groups.get(group_id).ok()?;
        let body = self.bodies.get(group.owner_body).ok()?;
        let link = self.links.get(group.link_shapes).ok()?;

        let mut aabb: Option<Aabb> = None;
        for shape_id in link.iter_live() {
            let shape_aabb = match self.world_shape(shape_id, body) {
                Some(world) => world.aabb(),
                None => continue,
            };
            aabb = Some(match aabb {
                Some(total) => total.union(&shape_aabb),
                None => shape_aabb,
            });
        }

        Some(GroupBounds {
            group: group_id,
            owner: group.owner_body,
            is_static: body.is_static,
            layer: group.layer,
            mask: group.mask,
            aabb: aabb?,
        })
    }

    /// Dispatch every live shape of group A against every live shape of
    /// group B, in link-slot order, appending hits.
    fn narrowphase(
        &mut self,
        group_a: Identifier,
        owner_a: Identifier,
        group_b: Identifier,
        owner_b: Identifier,
        contacts: &mut Vec<ContactPair>,
    ) {
        let (link_a, link_b) = match (
            self.shape_groups.get(group_a).and_then(|g| self.links.get(g.link_shapes)),
            self.shape_groups.get(group_b).and_then(|g| self.links.get(g.link_shapes)),
        ) {
            (Ok(a), Ok(b)) => (*a, *b),
            _ => return,
        };
        let (body_a, body_b) = match (self.bodies.get(owner_a), self.bodies.get(owner_b)) {
            (Ok(a), Ok(b)) => (*a, *b),
            _ => return,
        };

        for shape_a_id in link_a.iter_live() {
            let world_a = match self.world_shape(shape_a_id, &body_a) {
                Some(world) => world,
                None => continue,
            };

            for shape_b_id in link_b.iter_live() {
                let world_b = match self.world_shape(shape_b_id, &body_b) {
                    Some(world) => world,
                    None => continue,
                };

                self.stats.narrow_tests += 1;
                let result = collide_shapes(&world_a, &world_b);
                if result.hit {
                    contacts.push(ContactPair {
                        body_a: owner_a,
                        body_b: owner_b,
                        shape_a: shape_a_id,
                        shape_b: shape_b_id,
                        normal: result.normal,
                        depth: result.depth,
                        point: result.point,
                    });
                }
            }
        }
    }

    /// Materialize a shape's primitive in world space through a body pose.
    fn world_shape(&self, shape_id: Identifier, body: &Body) -> Option<WorldShape> {
        let shape = self.shapes.get(shape_id).ok()?;
        match shape.kind {
            ShapeKind::Sphere => {
                let sphere = self.spheres.get(shape.shape_type_id).ok()?;
                Some(WorldShape::Sphere(
                    sphere.transformed(body.position, body.rotation),
                ))
            }
            ShapeKind::Obb => {
                let obb = self.obbs.get(shape.shape_type_id).ok()?;
                Some(WorldShape::Obb(
                    obb.transformed(body.position, body.rotation),
                ))
            }
            ShapeKind::Capsule => {
                let capsule = self.capsules.get(shape.shape_type_id).ok()?;
                Some(WorldShape::Capsule(
                    capsule.transformed(body.position, body.rotation),
                ))
            }
            ShapeKind::None => None,
        }
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    /// Write the full world state as length-prefixed chunks.
    ///
    /// Order: bodies, shape groups, shapes, links, OBBs, spheres, capsules,
    /// then origin, up, update rate. Contacts are per-tick output and are
    /// not part of the snapshot.
    pub fn save(&self, stream: &mut ByteStream) {
        self.bodies.save(stream);
        self.shape_groups.save(stream);
        self.shapes.save(stream);
        self.links.save(stream);
        self.obbs.save(stream);
        self.spheres.save(stream);
        self.capsules.save(stream);

        let mut tail = Vec::with_capacity(Vec3::SIZE);
        self.origin.encode(&mut tail);
        stream.write_chunk(&tail);
        tail.clear();
        self.up.encode(&mut tail);
        stream.write_chunk(&tail);
        tail.clear();
        self.update_rate.encode(&mut tail);
        stream.write_chunk(&tail);
    }

    /// Restore the full world state written by [`World::save`]. The contact
    /// list is cleared; on error the world should be discarded.
    pub fn load(&mut self, stream: &mut ByteStream) -> Result<(), PhysicsError> {
        self.bodies.load(stream)?;
        self.shape_groups.load(stream)?;
        self.shapes.load(stream)?;
        self.links.load(stream)?;
        self.obbs.load(stream)?;
        self.spheres.load(stream)?;
        self.capsules.load(stream)?;

        let chunk = stream.read_chunk().ok_or(PhysicsError::DeserializationFailed)?;
        if chunk.len() != Vec3::SIZE {
            return Err(PhysicsError::DeserializationFailed);
        }
        self.origin = Vec3::decode(chunk);

        let chunk = stream.read_chunk().ok_or(PhysicsError::DeserializationFailed)?;
        if chunk.len() != Vec3::SIZE {
            return Err(PhysicsError::DeserializationFailed);
        }
        self.up = Vec3::decode(chunk);

        let chunk = stream.read_chunk().ok_or(PhysicsError::DeserializationFailed)?;
        if chunk.len() != Unit::SIZE {
            return Err(PhysicsError::DeserializationFailed);
        }
        self.update_rate = Unit::decode(chunk);

        self.contacts.clear();
        self.group_bounds.clear();
        self.stats = TickStats::default();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Debug replay
    // ------------------------------------------------------------------

    /// Replay the current state through a visualization sink.
    ///
    /// Which categories go out is controlled by the sink's
    /// [`flags`](crate::debug_draw::DebugDraw::flags) bitmask. Everything
    /// crosses the boundary as lossy `f32` views; group AABBs are recomputed
    /// here so the replay also works before the first tick. The sink is
    /// borrowed only for the duration of this call.
    pub fn draw_debug(&self, sink: &mut dyn crate::debug_draw::DebugDraw) {
        use crate::debug_draw::flags;

        let mask = sink.flags();

        if mask & (flags::SHAPES | flags::AABBS) != 0 {
            for &group_id in self.shape_groups.active_entities() {
                let (body, link_id) = match self
                    .shape_groups
                    .get(group_id)
                    .and_then(|g| self.bodies.get(g.owner_body).map(|b| (*b, g.link_shapes)))
                {
                    Ok(found) => found,
                    Err(_) => continue,
                };
                let link = match self.links.get(link_id) {
                    Ok(link) => *link,
                    Err(_) => continue,
                };

                let mut group_aabb: Option<Aabb> = None;
                for shape_id in link.iter_live() {
                    let world = match self.world_shape(shape_id, &body) {
                        Some(world) => world,
                        None => continue,
                    };

                    if mask & flags::SHAPES != 0 {
                        match world {
                            WorldShape::Sphere(s) => {
                                sink.draw_sphere(s.center.to_float(), s.radius.to_f32());
                            }
                            WorldShape::Obb(o) => sink.draw_box(
                                o.center.to_float(),
                                o.half_extents.to_float(),
                                o.rotation.to_float(),
                            ),
                            WorldShape::Capsule(c) => sink.draw_capsule(
                                c.start.to_float(),
                                c.end.to_float(),
                                c.radius.to_f32(),
                            ),
                        }
                    }

                    if mask & flags::AABBS != 0 {
                        let shape_aabb = world.aabb();
                        group_aabb = Some(match group_aabb {
                            Some(total) => total.union(&shape_aabb),
                            None => shape_aabb,
                        });
                    }
                }

                if let Some(aabb) = group_aabb {
                    sink.draw_aabb(aabb.min.to_float(), aabb.max.to_float());
                }
            }
        }

        if mask & flags::CONTACTS != 0 {
            let point_size = Unit::from_ratio(1, 10).to_f32();
            for contact in &self.contacts {
                sink.draw_point(contact.point.to_float(), point_size);
                let tip = contact.point + contact.normal * contact.depth;
                sink.draw_line(contact.point.to_float(), tip.to_float());
            }
        }

        if mask & (flags::BODY_AXES | flags::BODY_ORIGINS) != 0 {
            for body in self.bodies.active() {
                if mask & flags::BODY_ORIGINS != 0 {
                    sink.draw_body_origin(body.position.to_float());
                }
                if mask & flags::BODY_AXES != 0 {
                    sink.draw_body_axes(body.position.to_float(), body.rotation.to_float());
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
