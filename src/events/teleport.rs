//! Teleport phase notifications.

use bevy_ecs::prelude::*;
use glam::Vec3;

/// Triggered when a teleport begins. `position` is where the entity still is.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TeleportStartEvent {
    pub entity: Entity,
    pub position: Vec3,
}

/// Triggered once the entity has been moved to its destination.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TeleportEndEvent {
    pub entity: Entity,
    pub position: Vec3,
}
