//! Pairwise collision scan.
//!
//! [`detect_collisions`] visits every ordered pair `(a, b)` of distinct
//! tracked entities. Both `(a, b)` and `(b, a)` are visited, so a single
//! physical overlap between two entities that both carry a
//! [`Collides`] capability resolves twice per scan, once from each side.
//!
//! For each pair the zones of `a` are tested against the zones of `b` in
//! order and the first overlapping zone pair is resolved; the rest of the
//! zone pairs are skipped.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::collision::{Collides, Contact};
use crate::components::collisionzone::{CollisionZones, find_zones};
use crate::components::position::Position;
use crate::resources::collisiondetector::CollisionDetector;

/// First overlapping zone pair of `a` against `b`, read from the world.
///
/// Returns `None` when either entity has no position or no zones.
pub fn find_contact(world: &World, a: Entity, b: Entity) -> Option<Contact> {
    let position_a = world.get::<Position>(a)?;
    let zones_a = world.get::<CollisionZones>(a)?;
    let position_b = world.get::<Position>(b)?;
    let zones_b = world.get::<CollisionZones>(b)?;
    let (zone, other_zone) = find_zones(
        position_a.pos,
        zones_a.as_slice(),
        position_b.pos,
        zones_b.as_slice(),
    )?;
    Some(Contact {
        entity: a,
        other: b,
        zone,
        other_zone,
    })
}

/// Scan all tracked pairs and run the resolution callback of the first
/// entity of each overlapping pair. Returns the number of callbacks run.
///
/// Callbacks run immediately, so positions, zones and despawns they cause
/// are visible to later pairs of the same scan.
pub fn detect_collisions(world: &mut World) -> usize {
    let Some(detector) = world.get_resource::<CollisionDetector>() else {
        return 0;
    };
    let tracked = detector.tracked().to_vec();

    let mut resolved = 0;
    for &a in &tracked {
        for &b in &tracked {
            if a == b {
                continue;
            }
            let Some(callback) = world.get::<Collides>(a).map(|c| c.callback) else {
                continue;
            };
            if let Some(contact) = find_contact(world, a, b) {
                trace!("Collision {a} -> {b}");
                callback(world, contact);
                resolved += 1;
            }
        }
    }
    resolved
}
