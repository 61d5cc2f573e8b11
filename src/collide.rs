//! Pairwise Collision Tests
//!
//! Closest-point helpers and the six primitive colliders over
//! {Sphere, Obb, Capsule}, all pure functions over world-space inputs.
//!
//! Every test returns a [`CollisionResult`] whose `normal` points from the
//! first argument toward the second and whose `depth` is the penetration
//! (non-negative whenever `hit` is set). When the direction is geometrically
//! indeterminate — concentric centers, exact grazing through a point — the
//! canonical fallback normal is world up `(0, 1, 0)`.
//!
//! [`collide_shapes`] is the normalized dispatch used by the world: it
//! canonicalizes the primitive ordering so only these six tests exist, and
//! flips the normal when the caller's argument order was swapped.

use crate::math::{Unit, Vec3};
use crate::shapes::{Capsule, Obb, Sphere};

/// Outcome of a primitive collision test.
///
/// When `hit` is false the remaining fields are meaningless and must be
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionResult {
    /// Whether the primitives penetrate (touching counts).
    pub hit: bool,
    /// Direction from the first primitive toward the second.
    pub normal: Vec3,
    /// Penetration depth along `normal`.
    pub depth: Unit,
    /// Representative contact point.
    pub point: Vec3,
}

impl CollisionResult {
    /// The no-collision result.
    pub const MISS: Self = Self {
        hit: false,
        normal: Vec3::ZERO,
        depth: Unit::ZERO,
        point: Vec3::ZERO,
    };
}

/// Fallback normal for indeterminate directions.
const UP: Vec3 = Vec3::UNIT_Y;

// ============================================================================
// Closest-Point Helpers
// ============================================================================

/// Closest point to `point` on the segment `[seg_start, seg_end]`.
///
/// A zero-length segment yields its start point.
pub fn closest_point_on_segment(point: Vec3, seg_start: Vec3, seg_end: Vec3) -> Vec3 {
    let ab = seg_end - seg_start;
    let ab_len_sq = ab.dot(ab);
    if ab_len_sq.is_zero() {
        return seg_start;
    }

    let t = (point - seg_start).dot(ab) / ab_len_sq;
    let t = t.clamp(Unit::ZERO, Unit::ONE);
    seg_start + ab * t
}

/// Closest pair of points between two segments.
///
/// The standard clamped-parameter algorithm: handle both segments
/// degenerating, one degenerating, then the general case where the interior
/// solution is clamped back into the unit square one parameter at a time.
pub fn closest_points_between_segments(
    s1_start: Vec3,
    s1_end: Vec3,
    s2_start: Vec3,
    s2_end: Vec3,
) -> (Vec3, Vec3) {
    let d1 = s1_end - s1_start;
    let d2 = s2_end - s2_start;
    let r = s1_start - s2_start;

    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    if a.is_zero() && e.is_zero() {
        return (s1_start, s2_start);
    }

    let s;
    let mut t;

    if a.is_zero() {
        s = Unit::ZERO;
        t = (f / e).clamp(Unit::ZERO, Unit::ONE);
    } else {
        let c = d1.dot(r);
        if e.is_zero() {
            t = Unit::ZERO;
            s = (-c / a).clamp(Unit::ZERO, Unit::ONE);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;

            let mut s_inner = if !denom.is_zero() {
                ((b * f - c * e) / denom).clamp(Unit::ZERO, Unit::ONE)
            } else {
                Unit::ZERO
            };

            t = (b * s_inner + f) / e;

            if t < Unit::ZERO {
                t = Unit::ZERO;
                s_inner = (-c / a).clamp(Unit::ZERO, Unit::ONE);
            } else if t > Unit::ONE {
                t = Unit::ONE;
                s_inner = ((b - c) / a).clamp(Unit::ZERO, Unit::ONE);
            }
            s = s_inner;
        }
    }

    (s1_start + d1 * s, s2_start + d2 * t)
}

/// Closest point to `point` on (or in) an oriented box.
///
/// Expresses the offset in the box frame by dotting against each rotation
/// column, clamps each coordinate to its half-extent, and sums back. A point
/// inside the box maps to itself.
pub fn closest_point_on_obb(point: Vec3, obb: &Obb) -> Vec3 {
    let d = point - obb.center;
    let mut result = obb.center;

    for i in 0..3 {
        let half = match i {
            0 => obb.half_extents.x,
            1 => obb.half_extents.y,
            _ => obb.half_extents.z,
        };
        let dist = d.dot(obb.rotation.cols[i]).clamp(-half, half);
        result += obb.rotation.cols[i] * dist;
    }

    result
}

// ============================================================================
// Colliders
// ============================================================================

/// Sphere vs sphere.
pub fn collide_spheres(a: &Sphere, b: &Sphere) -> CollisionResult {
    let ab = b.center - a.center;
    let dist = ab.length();
    let sum_radii = a.radius + b.radius;

    let depth = sum_radii - dist;
    if depth < Unit::ZERO {
        return CollisionResult::MISS;
    }

    let normal = if dist.is_zero() { UP } else { ab.normalize() };
    CollisionResult {
        hit: true,
        normal,
        depth,
        point: a.center + normal * (a.radius - depth / Unit::from_int(2)),
    }
}

/// Sphere vs capsule: reduce the capsule to a sphere at the closest point on
/// its segment.
pub fn collide_sphere_capsule(a: &Sphere, b: &Capsule) -> CollisionResult {
    let closest = closest_point_on_segment(a.center, b.start, b.end);
    collide_spheres(a, &Sphere::new(closest, b.radius))
}

/// Capsule vs capsule: reduce both to spheres at the segment-segment closest
/// pair.
pub fn collide_capsules(a: &Capsule, b: &Capsule) -> CollisionResult {
    let (closest_a, closest_b) = closest_points_between_segments(a.start, a.end, b.start, b.end);
    collide_spheres(
        &Sphere::new(closest_a, a.radius),
        &Sphere::new(closest_b, b.radius),
    )
}

/// Sphere vs oriented box.
///
/// A center strictly inside the box emits the minimum-penetration face
/// normal (oriented from the sphere into the box) with the sphere radius
/// added to the depth; otherwise this is the classic sphere-vs-closest-point
/// test.
pub fn collide_sphere_obb(a: &Sphere, b: &Obb) -> CollisionResult {
    let closest = closest_point_on_obb(a.center, b);
    let diff = closest - a.center;
    let dist_sq = diff.dot(diff);
    let radius_sq = a.radius * a.radius;

    let local = a.center - b.center;
    let lx = local.dot(b.rotation.cols[0]).abs();
    let ly = local.dot(b.rotation.cols[1]).abs();
    let lz = local.dot(b.rotation.cols[2]).abs();
    let inside = lx <= b.half_extents.x && ly <= b.half_extents.y && lz <= b.half_extents.z;

    if inside {
        let pen_x = b.half_extents.x - lx;
        let pen_y = b.half_extents.y - ly;
        let pen_z = b.half_extents.z - lz;

        let mut min_pen = pen_x;
        let mut min_axis = 0;
        if pen_y < min_pen {
            min_pen = pen_y;
            min_axis = 1;
        }
        if pen_z < min_pen {
            min_pen = pen_z;
            min_axis = 2;
        }

        let sign = if local.dot(b.rotation.cols[min_axis]) < Unit::ZERO {
            Unit::NEG_ONE
        } else {
            Unit::ONE
        };
        return CollisionResult {
            hit: true,
            normal: b.rotation.cols[min_axis] * -sign,
            depth: min_pen + a.radius,
            point: a.center,
        };
    }

    if dist_sq > radius_sq {
        return CollisionResult::MISS;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist.is_zero() { UP } else { diff.normalize() };
    CollisionResult {
        hit: true,
        normal,
        depth: a.radius - dist,
        point: closest,
    }
}

/// Capsule vs oriented box.
///
/// Seeds the closest point on the capsule segment with the box center, does
/// one refinement round trip (closest on box, then closest on segment), and
/// reduces to [`collide_sphere_obb`].
pub fn collide_capsule_obb(a: &Capsule, b: &Obb) -> CollisionResult {
    let closest_on_seg = closest_point_on_segment(b.center, a.start, a.end);
    let closest_on_obb = closest_point_on_obb(closest_on_seg, b);
    let closest_on_seg = closest_point_on_segment(closest_on_obb, a.start, a.end);

    collide_sphere_obb(&Sphere::new(closest_on_seg, a.radius), b)
}

/// Oriented box vs oriented box: the 15-axis separating-axis test.
///
/// Axes shorter than 10⁻³ (degenerate cross products) are skipped. The
/// minimum positive overlap across the surviving axes becomes the depth; the
/// matching axis, signed to point from `a` toward `b`, becomes the normal.
pub fn collide_obbs(a: &Obb, b: &Obb) -> CollisionResult {
    let axes_a = a.rotation.cols;
    let axes_b = b.rotation.cols;
    let d = b.center - a.center;

    let epsilon = Unit::ONE / Unit::from_int(1000);
    let mut min_overlap = Unit::from_int(32000);
    let mut min_axis = Vec3::ZERO;

    // Returns false when the axis separates the boxes.
    let mut test_axis = |axis: Vec3| -> bool {
        let axis_len = axis.length();
        if axis_len < epsilon {
            return true;
        }

        let n = axis / axis_len;

        let proj_a = axes_a[0].dot(n).abs() * a.half_extents.x
            + axes_a[1].dot(n).abs() * a.half_extents.y
            + axes_a[2].dot(n).abs() * a.half_extents.z;

        let proj_b = axes_b[0].dot(n).abs() * b.half_extents.x
            + axes_b[1].dot(n).abs() * b.half_extents.y
            + axes_b[2].dot(n).abs() * b.half_extents.z;

        let distance = d.dot(n).abs();
        let overlap = proj_a + proj_b - distance;

        if overlap < Unit::ZERO {
            return false;
        }

        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = if d.dot(n) < Unit::ZERO { -n } else { n };
        }
        true
    };

    for axis in axes_a {
        if !test_axis(axis) {
            return CollisionResult::MISS;
        }
    }
    for axis in axes_b {
        if !test_axis(axis) {
            return CollisionResult::MISS;
        }
    }
    for axis_a in axes_a {
        for axis_b in axes_b {
            if !test_axis(axis_a.cross(axis_b)) {
                return CollisionResult::MISS;
            }
        }
    }

    CollisionResult {
        hit: true,
        normal: min_axis,
        depth: min_overlap,
        point: a.center + d / Unit::from_int(2),
    }
}

// ============================================================================
// Normalized Dispatch
// ============================================================================

/// A primitive already mapped into world space, ready for dispatch.
#[derive(Clone, Copy, Debug)]
pub enum WorldShape {
    /// Sphere primitive.
    Sphere(Sphere),
    /// Oriented box primitive.
    Obb(Obb),
    /// Capsule primitive.
    Capsule(Capsule),
}

impl WorldShape {
    /// Enclosing axis-aligned bounds.
    pub fn aabb(&self) -> crate::shapes::Aabb {
        match self {
            Self::Sphere(s) => s.aabb(),
            Self::Obb(o) => o.aabb(),
            Self::Capsule(c) => c.aabb(),
        }
    }
}

/// Collide two world-space shapes.
///
/// Only six colliders exist (canonical primitive ordering Obb < Sphere <
/// Capsule); when the caller's order disagrees with a collider's stored
/// signature the normal is negated, so the result's `normal` always points
/// from `a` toward `b` regardless of the primitive kinds.
pub fn collide_shapes(a: &WorldShape, b: &WorldShape) -> CollisionResult {
    match (a, b) {
        (WorldShape::Sphere(x), WorldShape::Sphere(y)) => collide_spheres(x, y),
        (WorldShape::Obb(x), WorldShape::Obb(y)) => collide_obbs(x, y),
        (WorldShape::Capsule(x), WorldShape::Capsule(y)) => collide_capsules(x, y),

        (WorldShape::Sphere(s), WorldShape::Obb(o)) => collide_sphere_obb(s, o),
        (WorldShape::Obb(o), WorldShape::Sphere(s)) => flip(collide_sphere_obb(s, o)),

        (WorldShape::Sphere(s), WorldShape::Capsule(c)) => collide_sphere_capsule(s, c),
        (WorldShape::Capsule(c), WorldShape::Sphere(s)) => flip(collide_sphere_capsule(s, c)),

        (WorldShape::Capsule(c), WorldShape::Obb(o)) => collide_capsule_obb(c, o),
        (WorldShape::Obb(o), WorldShape::Capsule(c)) => flip(collide_capsule_obb(c, o)),
    }
}

/// Reverse the reported direction without touching depth or point.
fn flip(mut result: CollisionResult) -> CollisionResult {
    if result.hit {
        result.normal = -result.normal;
    }
    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat3;

    fn sphere(x: i32, y: i32, z: i32, r: i32) -> Sphere {
        Sphere::new(Vec3::from_int(x, y, z), Unit::from_int(r))
    }

    // ------------------------------------------------------------------
    // Closest points
    // ------------------------------------------------------------------

    #[test]
    fn test_closest_point_on_segment_interior() {
        let p = closest_point_on_segment(
            Vec3::from_int(1, 5, 0),
            Vec3::from_int(-2, 0, 0),
            Vec3::from_int(2, 0, 0),
        );
        assert_eq!(p, Vec3::from_int(1, 0, 0));
    }

    #[test]
    fn test_closest_point_on_segment_clamps_to_ends() {
        let start = Vec3::from_int(-2, 0, 0);
        let end = Vec3::from_int(2, 0, 0);
        assert_eq!(
            closest_point_on_segment(Vec3::from_int(10, 1, 0), start, end),
            end
        );
        assert_eq!(
            closest_point_on_segment(Vec3::from_int(-10, 1, 0), start, end),
            start
        );
    }

    #[test]
    fn test_closest_point_on_degenerate_segment() {
        let p = Vec3::from_int(3, 3, 3);
        let s = Vec3::from_int(1, 1, 1);
        assert_eq!(closest_point_on_segment(p, s, s), s);
    }

    #[test]
    fn test_segment_segment_parallel() {
        let (p1, p2) = closest_points_between_segments(
            Vec3::from_int(-1, 0, 0),
            Vec3::from_int(1, 0, 0),
            Vec3::from_int(-1, 2, 0),
            Vec3::from_int(1, 2, 0),
        );
        assert_eq!((p2 - p1).length(), Unit::from_int(2));
    }

    #[test]
    fn test_segment_segment_crossing() {
        let (p1, p2) = closest_points_between_segments(
            Vec3::from_int(-1, 0, 0),
            Vec3::from_int(1, 0, 0),
            Vec3::from_int(0, -1, 1),
            Vec3::from_int(0, 1, 1),
        );
        assert_eq!(p1, Vec3::from_int(0, 0, 0));
        assert_eq!(p2, Vec3::from_int(0, 0, 1));
    }

    #[test]
    fn test_segment_segment_both_degenerate() {
        let a = Vec3::from_int(0, 0, 0);
        let b = Vec3::from_int(5, 0, 0);
        let (p1, p2) = closest_points_between_segments(a, a, b, b);
        assert_eq!(p1, a);
        assert_eq!(p2, b);
    }

    #[test]
    fn test_segment_segment_one_degenerate() {
        let point = Vec3::from_int(0, 3, 0);
        let (p1, p2) = closest_points_between_segments(
            point,
            point,
            Vec3::from_int(-2, 0, 0),
            Vec3::from_int(2, 0, 0),
        );
        assert_eq!(p1, point);
        assert_eq!(p2, Vec3::from_int(0, 0, 0));
    }

    #[test]
    fn test_segment_segment_clamped_parameters() {
        // Segments offset so the interior solution leaves the unit square
        let (p1, p2) = closest_points_between_segments(
            Vec3::from_int(0, 0, 0),
            Vec3::from_int(1, 0, 0),
            Vec3::from_int(5, 1, 0),
            Vec3::from_int(9, 1, 0),
        );
        assert_eq!(p1, Vec3::from_int(1, 0, 0));
        assert_eq!(p2, Vec3::from_int(5, 1, 0));
    }

    #[test]
    fn test_closest_point_on_obb_outside() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(1, 1, 1), Mat3::IDENTITY);
        let p = closest_point_on_obb(Vec3::from_int(5, 0, 0), &obb);
        assert_eq!(p, Vec3::from_int(1, 0, 0));

        let corner = closest_point_on_obb(Vec3::from_int(5, 5, 5), &obb);
        assert_eq!(corner, Vec3::from_int(1, 1, 1));
    }

    #[test]
    fn test_closest_point_on_obb_inside_is_identity() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let inner = Vec3::from_int(1, 0, -1);
        assert_eq!(closest_point_on_obb(inner, &obb), inner);
    }

    #[test]
    fn test_closest_point_on_rotated_obb() {
        // 90° about Z: local X half-extent of 3 lies along world Y
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(3, 1, 1), Mat3::rotate_z(90));
        let p = closest_point_on_obb(Vec3::from_int(0, 10, 0), &obb);
        assert_eq!(p, Vec3::from_int(0, 3, 0));
    }

    // ------------------------------------------------------------------
    // Sphere vs sphere
    // ------------------------------------------------------------------

    #[test]
    fn test_spheres_separated() {
        let r = collide_spheres(&sphere(0, 0, 0, 1), &sphere(5, 0, 0, 1));
        assert!(!r.hit);
    }

    #[test]
    fn test_spheres_touching() {
        let r = collide_spheres(&sphere(0, 0, 0, 1), &sphere(2, 0, 0, 1));
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ZERO);
        assert_eq!(r.normal, Vec3::UNIT_X);
        assert_eq!(r.point, Vec3::from_int(1, 0, 0));
    }

    #[test]
    fn test_spheres_overlapping() {
        let r = collide_spheres(&sphere(0, 0, 0, 2), &sphere(3, 0, 0, 2));
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
        assert_eq!(r.normal, Vec3::UNIT_X);
        // Midline of the overlap interval [1, 2]
        assert_eq!(r.point, Vec3::new(Unit::from_ratio(3, 2), Unit::ZERO, Unit::ZERO));
    }

    #[test]
    fn test_spheres_concentric_fallback_normal() {
        let r = collide_spheres(&sphere(0, 0, 0, 1), &sphere(0, 0, 0, 2));
        assert!(r.hit);
        assert_eq!(r.depth, Unit::from_int(3));
        assert_eq!(r.normal, Vec3::UNIT_Y);
    }

    #[test]
    fn test_spheres_along_y() {
        let r = collide_spheres(&sphere(0, 0, 0, 2), &sphere(0, 3, 0, 2));
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
        assert_eq!(r.normal, Vec3::UNIT_Y);
    }

    #[test]
    fn test_spheres_fractional_radii() {
        let a = Sphere::new(Vec3::ZERO, Unit::from_ratio(3, 2));
        let b = Sphere::new(Vec3::from_int(2, 0, 0), Unit::from_ratio(3, 2));
        let r = collide_spheres(&a, &b);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
    }

    // ------------------------------------------------------------------
    // Sphere vs capsule, capsule vs capsule
    // ------------------------------------------------------------------

    #[test]
    fn test_sphere_capsule_hit() {
        let cap = Capsule::new(Vec3::from_int(-2, 0, 0), Vec3::from_int(2, 0, 0), Unit::ONE);
        let r = collide_sphere_capsule(&sphere(0, 1, 0, 1), &cap);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
        // From the sphere down toward the capsule axis
        assert_eq!(r.normal, -Vec3::UNIT_Y);
    }

    #[test]
    fn test_sphere_capsule_miss() {
        let cap = Capsule::new(Vec3::from_int(-2, 0, 0), Vec3::from_int(2, 0, 0), Unit::ONE);
        let r = collide_sphere_capsule(&sphere(0, 5, 0, 1), &cap);
        assert!(!r.hit);
    }

    #[test]
    fn test_sphere_capsule_beyond_endpoint() {
        // Closest feature is the end cap, not the cylinder wall
        let cap = Capsule::new(Vec3::from_int(-2, 0, 0), Vec3::from_int(2, 0, 0), Unit::ONE);
        let r = collide_sphere_capsule(&sphere(4, 0, 0, 1), &cap);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ZERO);
        assert_eq!(r.normal, -Vec3::UNIT_X);
    }

    #[test]
    fn test_capsules_parallel_overlap() {
        let a = Capsule::new(Vec3::from_int(-2, 0, 0), Vec3::from_int(2, 0, 0), Unit::ONE);
        let b = Capsule::new(Vec3::from_int(-2, 1, 0), Vec3::from_int(2, 1, 0), Unit::ONE);
        let r = collide_capsules(&a, &b);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
        assert_eq!(r.normal, Vec3::UNIT_Y);
    }

    #[test]
    fn test_capsules_crossed() {
        let a = Capsule::new(Vec3::from_int(-2, 0, 0), Vec3::from_int(2, 0, 0), Unit::ONE);
        let b = Capsule::new(Vec3::from_int(0, -2, 1), Vec3::from_int(0, 2, 1), Unit::ONE);
        let r = collide_capsules(&a, &b);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
        assert_eq!(r.normal, Vec3::UNIT_Z);
    }

    #[test]
    fn test_capsules_separated() {
        let a = Capsule::new(Vec3::from_int(-2, 0, 0), Vec3::from_int(2, 0, 0), Unit::ONE);
        let b = Capsule::new(Vec3::from_int(-2, 5, 0), Vec3::from_int(2, 5, 0), Unit::ONE);
        assert!(!collide_capsules(&a, &b).hit);
    }

    // ------------------------------------------------------------------
    // Sphere vs OBB
    // ------------------------------------------------------------------

    #[test]
    fn test_sphere_obb_grazing() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let r = collide_sphere_obb(&sphere(3, 0, 0, 1), &obb);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ZERO);
        // From the sphere toward the box face
        assert_eq!(r.normal, -Vec3::UNIT_X);
        assert_eq!(r.point, Vec3::from_int(2, 0, 0));
    }

    #[test]
    fn test_sphere_obb_separated() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        assert!(!collide_sphere_obb(&sphere(5, 0, 0, 1), &obb).hit);
    }

    #[test]
    fn test_sphere_obb_center_inside() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(4, 2, 4), Mat3::IDENTITY);
        // Center at (0, 1, 0): the Y face is nearest (pen 1 vs 4 on X/Z)
        let r = collide_sphere_obb(&sphere(0, 1, 0, 1), &obb);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::from_int(2)); // face pen 1 + radius 1
        assert_eq!(r.normal, -Vec3::UNIT_Y);
        assert_eq!(r.point, Vec3::from_int(0, 1, 0));
    }

    #[test]
    fn test_sphere_obb_inside_negative_side() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(4, 2, 4), Mat3::IDENTITY);
        let r = collide_sphere_obb(&sphere(0, -1, 0, 1), &obb);
        assert!(r.hit);
        // Sign flips with the side of the box
        assert_eq!(r.normal, Vec3::UNIT_Y);
    }

    #[test]
    fn test_sphere_obb_rotated() {
        // Box rotated 90° about Y: local X half-extent 3 projects onto world Z
        let obb = Obb::new(Vec3::from_int(2, 0, 0), Vec3::from_int(3, 1, 1), Mat3::rotate_y(90));
        let r = collide_sphere_obb(&sphere(0, 0, 0, 2), &obb);
        assert!(r.hit);
        // Closest point on the rotated box is (1, 0, 0): depth = 2 - 1
        assert_eq!(r.depth, Unit::ONE);
        assert_eq!(r.normal, Vec3::UNIT_X);
    }

    // ------------------------------------------------------------------
    // Capsule vs OBB
    // ------------------------------------------------------------------

    #[test]
    fn test_capsule_obb_side_hit() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let cap = Capsule::new(Vec3::from_int(-4, 3, 0), Vec3::from_int(4, 3, 0), Unit::ONE);
        let r = collide_capsule_obb(&cap, &obb);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ZERO);
        assert_eq!(r.normal, -Vec3::UNIT_Y);
    }

    #[test]
    fn test_capsule_obb_miss() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let cap = Capsule::new(Vec3::from_int(-4, 6, 0), Vec3::from_int(4, 6, 0), Unit::ONE);
        assert!(!collide_capsule_obb(&cap, &obb).hit);
    }

    #[test]
    fn test_capsule_obb_endpoint_hit() {
        let obb = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let cap = Capsule::new(Vec3::from_int(3, 0, 0), Vec3::from_int(8, 0, 0), Unit::from_int(2));
        let r = collide_capsule_obb(&cap, &obb);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
        assert_eq!(r.normal, -Vec3::UNIT_X);
    }

    // ------------------------------------------------------------------
    // OBB vs OBB
    // ------------------------------------------------------------------

    #[test]
    fn test_obbs_separated() {
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(1, 1, 1), Mat3::IDENTITY);
        let b = Obb::new(Vec3::from_int(5, 0, 0), Vec3::from_int(1, 1, 1), Mat3::IDENTITY);
        assert!(!collide_obbs(&a, &b).hit);
    }

    #[test]
    fn test_obbs_overlapping_axis_aligned() {
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let b = Obb::new(Vec3::from_int(3, 0, 0), Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let r = collide_obbs(&a, &b);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ONE);
        assert_eq!(r.normal, Vec3::UNIT_X);
        // Midpoint of the two centers
        assert_eq!(r.point, Vec3::new(Unit::from_ratio(3, 2), Unit::ZERO, Unit::ZERO));
    }

    #[test]
    fn test_obbs_touching() {
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(1, 1, 1), Mat3::IDENTITY);
        let b = Obb::new(Vec3::from_int(2, 0, 0), Vec3::from_int(1, 1, 1), Mat3::IDENTITY);
        let r = collide_obbs(&a, &b);
        assert!(r.hit);
        assert_eq!(r.depth, Unit::ZERO);
    }

    #[test]
    fn test_obbs_normal_points_a_to_b() {
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let b = Obb::new(Vec3::from_int(-3, 0, 0), Vec3::from_int(2, 2, 2), Mat3::IDENTITY);
        let r = collide_obbs(&a, &b);
        assert!(r.hit);
        assert_eq!(r.normal, -Vec3::UNIT_X);
    }

    #[test]
    fn test_obbs_swap_symmetry() {
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(2, 1, 1), Mat3::rotate_z(45));
        let b = Obb::new(Vec3::from_int(2, 1, 0), Vec3::from_int(1, 2, 1), Mat3::rotate_y(30));
        let r_ab = collide_obbs(&a, &b);
        let r_ba = collide_obbs(&b, &a);

        assert_eq!(r_ab.hit, r_ba.hit);
        if r_ab.hit {
            assert_eq!(r_ab.depth, r_ba.depth);
            assert_eq!(r_ab.normal, -r_ba.normal);
        }
    }

    #[test]
    fn test_obbs_rotated_45_near_miss() {
        // A 45°-rotated unit box reaches sqrt(2) along the diagonal; the SAT
        // cross-product axes must still separate these
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(1, 1, 1), Mat3::IDENTITY);
        let b = Obb::new(Vec3::from_int(3, 0, 0), Vec3::from_int(1, 1, 1), Mat3::rotate_z(45));
        assert!(!collide_obbs(&a, &b).hit);
    }

    #[test]
    fn test_obbs_rotated_45_hit() {
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(1, 1, 1), Mat3::IDENTITY);
        let b = Obb::new(Vec3::from_int(2, 0, 0), Vec3::from_int(1, 1, 1), Mat3::rotate_z(45));
        let r = collide_obbs(&a, &b);
        assert!(r.hit);
        assert!(r.depth >= Unit::ZERO);
    }

    #[test]
    fn test_obbs_degenerate_cross_axes_skipped() {
        // Identical orientation makes all nine cross products zero-length;
        // they must be skipped rather than treated as separating
        let a = Obb::new(Vec3::ZERO, Vec3::from_int(1, 1, 1), Mat3::rotate_z(30));
        let b = Obb::new(
            Vec3::new(Unit::from_ratio(1, 2), Unit::ZERO, Unit::ZERO),
            Vec3::from_int(1, 1, 1),
            Mat3::rotate_z(30),
        );
        assert!(collide_obbs(&a, &b).hit);
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    #[test]
    fn test_dispatch_normal_direction_is_caller_relative() {
        let s = WorldShape::Sphere(sphere(3, 0, 0, 1));
        let o = WorldShape::Obb(Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY));

        let r_so = collide_shapes(&s, &o);
        let r_os = collide_shapes(&o, &s);

        assert!(r_so.hit && r_os.hit);
        assert_eq!(r_so.depth, r_os.depth);
        // Sphere-first: toward the box (-X). Box-first: toward the sphere (+X).
        assert_eq!(r_so.normal, -Vec3::UNIT_X);
        assert_eq!(r_os.normal, Vec3::UNIT_X);
        assert_eq!(r_so.point, r_os.point);
    }

    #[test]
    fn test_dispatch_capsule_pairs() {
        let c = WorldShape::Capsule(Capsule::new(
            Vec3::from_int(-2, 2, 0),
            Vec3::from_int(2, 2, 0),
            Unit::ONE,
        ));
        let s = WorldShape::Sphere(sphere(0, 0, 0, 1));

        let r_sc = collide_shapes(&s, &c);
        let r_cs = collide_shapes(&c, &s);
        assert!(r_sc.hit && r_cs.hit);
        assert_eq!(r_sc.normal, Vec3::UNIT_Y);
        assert_eq!(r_cs.normal, -Vec3::UNIT_Y);
    }

    #[test]
    fn test_dispatch_all_same_kind_pairs() {
        let a = WorldShape::Sphere(sphere(0, 0, 0, 2));
        let b = WorldShape::Sphere(sphere(3, 0, 0, 2));
        let r = collide_shapes(&a, &b);
        assert!(r.hit);
        assert_eq!(r.normal, Vec3::UNIT_X);

        let oa = WorldShape::Obb(Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::IDENTITY));
        let ob = WorldShape::Obb(Obb::new(
            Vec3::from_int(3, 0, 0),
            Vec3::from_int(2, 2, 2),
            Mat3::IDENTITY,
        ));
        assert!(collide_shapes(&oa, &ob).hit);
    }

    #[test]
    fn test_hit_depth_never_negative() {
        let cases = [
            collide_spheres(&sphere(0, 0, 0, 1), &sphere(1, 1, 1, 1)),
            collide_sphere_obb(
                &sphere(1, 1, 0, 1),
                &Obb::new(Vec3::ZERO, Vec3::from_int(2, 2, 2), Mat3::rotate_z(10)),
            ),
            collide_capsules(
                &Capsule::new(Vec3::from_int(-1, 0, 0), Vec3::from_int(1, 0, 0), Unit::ONE),
                &Capsule::new(Vec3::from_int(0, -1, 0), Vec3::from_int(0, 1, 0), Unit::ONE),
            ),
        ];
        for r in cases {
            if r.hit {
                assert!(r.depth >= Unit::ZERO);
            }
        }
    }
}
