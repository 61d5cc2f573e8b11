#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use quartz_physics::{
    collide_shapes, Capsule, Mat3, Obb, Sphere, Unit, Vec3, WorldShape,
};

#[derive(Debug, Arbitrary)]
struct ShapeInput {
    kind: u8,
    x: i8,
    y: i8,
    z: i8,
    // Second point / half extents
    x2: i8,
    y2: i8,
    z2: i8,
    radius: u8,
    rot_deg: i16,
}

fn build(input: &ShapeInput) -> WorldShape {
    let center = Vec3::from_int(input.x as i32, input.y as i32, input.z as i32);
    let other = Vec3::from_int(input.x2 as i32, input.y2 as i32, input.z2 as i32);
    let radius = Unit::from_int((input.radius % 16) as i32);
    match input.kind % 3 {
        0 => WorldShape::Sphere(Sphere::new(center, radius)),
        1 => WorldShape::Obb(Obb::new(
            center,
            Vec3::from_int(
                (input.x2 as i32).rem_euclid(8),
                (input.y2 as i32).rem_euclid(8),
                (input.z2 as i32).rem_euclid(8),
            ),
            Mat3::rotate_z(input.rot_deg as i32),
        )),
        _ => WorldShape::Capsule(Capsule::new(center, other, radius)),
    }
}

// Any pair of well-formed primitives must collide without panicking, and a
// reported hit must carry a non-negative depth.
fuzz_target!(|pair: (ShapeInput, ShapeInput)| {
    let a = build(&pair.0);
    let b = build(&pair.1);

    let r_ab = collide_shapes(&a, &b);
    if r_ab.hit {
        assert!(r_ab.depth >= Unit::ZERO);
    }

    // The swapped call must be equally panic-free
    let r_ba = collide_shapes(&b, &a);
    if r_ba.hit {
        assert!(r_ba.depth >= Unit::ZERO);
    }
});
