#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use quartz_physics::{ByteStream, Identifier, ShapeKind, Unit, Vec3, World};

#[derive(Debug, Arbitrary)]
enum Op {
    CreateBody,
    AddGroup { body: i16 },
    AddShape { group: i16, kind: u8 },
    RemoveBody { body: i16 },
    RemoveGroup { body: i16, group: i16 },
    RemoveShape { group: i16, shape: i16 },
    SetPosition { body: i16, x: i8, y: i8, z: i8 },
    SetVelocity { body: i16, x: i8, y: i8, z: i8 },
    SetStatic { body: i16 },
    SetFilter { group: i16, layer: u8, mask: u8 },
    SetRadius { shape: i16, r: u8 },
    Tick,
    SaveLoad,
}

fn kind_of(v: u8) -> ShapeKind {
    match v % 4 {
        1 => ShapeKind::Obb,
        2 => ShapeKind::Sphere,
        3 => ShapeKind::Capsule,
        _ => ShapeKind::None,
    }
}

// Random mutation sequences plus ticks and snapshot round trips must never
// panic, whatever the id soup looks like.
fuzz_target!(|ops: Vec<Op>| {
    let mut world = World::new();

    for op in ops.iter().take(256) {
        match *op {
            Op::CreateBody => {
                world.create_body();
            }
            Op::AddGroup { body } => {
                world.add_shape_group(body);
            }
            Op::AddShape { group, kind } => {
                world.add_shape(group, kind_of(kind));
            }
            Op::RemoveBody { body } => world.remove_body(body),
            Op::RemoveGroup { body, group } => world.remove_shape_group(body, group),
            Op::RemoveShape { group, shape } => world.remove_shape(group, shape),
            Op::SetPosition { body, x, y, z } => {
                if let Ok(b) = world.body_mut(body) {
                    b.position = Vec3::from_int(x as i32, y as i32, z as i32);
                }
            }
            Op::SetVelocity { body, x, y, z } => {
                if let Ok(b) = world.body_mut(body) {
                    b.velocity = Vec3::from_int(x as i32, y as i32, z as i32);
                }
            }
            Op::SetStatic { body } => {
                if let Ok(b) = world.body_mut(body) {
                    b.is_static = true;
                }
            }
            Op::SetFilter { group, layer, mask } => {
                if let Ok(g) = world.shape_group_mut(group) {
                    g.layer = layer as u32;
                    g.mask = mask as u32;
                }
            }
            Op::SetRadius { shape, r } => {
                let sphere_id: Option<Identifier> = world
                    .shape(shape)
                    .ok()
                    .filter(|s| s.kind == ShapeKind::Sphere)
                    .map(|s| s.shape_type_id);
                if let Some(id) = sphere_id {
                    if let Ok(s) = world.sphere_mut(id) {
                        s.radius = Unit::from_int(r as i32 % 8);
                    }
                }
            }
            Op::Tick => {
                world.update();
                for contact in world.contacts() {
                    assert_ne!(contact.body_a, contact.body_b);
                    assert!(contact.depth >= Unit::ZERO);
                }
            }
            Op::SaveLoad => {
                let mut stream = ByteStream::new();
                world.save(&mut stream);
                stream.rewind();

                let mut restored = World::new();
                restored.load(&mut stream).expect("own snapshot must load");

                let mut stream2 = ByteStream::new();
                restored.save(&mut stream2);
                assert_eq!(stream.as_bytes(), stream2.as_bytes());
                world = restored;
            }
        }
    }
});
