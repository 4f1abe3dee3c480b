use bevy_ecs::prelude::*;

use crate::components::collisionzone::CollisionZone;

/// A detected overlap, seen from the entity whose callback is invoked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The entity resolving the collision.
    pub entity: Entity,
    /// The entity it collided with.
    pub other: Entity,
    /// The zone of `entity` that matched.
    pub zone: CollisionZone,
    /// The zone of `other` that matched.
    pub other_zone: CollisionZone,
}

/// Callback signature for collision resolution.
///
/// Runs immediately during the scan with full world access, so whatever it
/// changes (health, positions, despawns) is visible to the rest of the scan.
pub type CollisionCallback = fn(world: &mut World, contact: Contact);

/// Collision-resolution capability. Entities without it never resolve
/// collisions, even when their zones overlap.
#[derive(Component, Clone, Copy)]
pub struct Collides {
    pub callback: CollisionCallback,
}

impl Collides {
    pub fn new(callback: CollisionCallback) -> Self {
        Self { callback }
    }
}

impl std::fmt::Debug for Collides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collides").finish_non_exhaustive()
    }
}
