//! Health change notifications.
//!
//! Triggered by every function in [`crate::systems::health`]. The level
//! watches it for the controlled entity reaching zero, the HUD mirrors it in
//! the health meter.

use bevy_ecs::prelude::*;

/// Event triggered after an entity's health changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChangedEvent {
    /// The entity whose health changed.
    pub entity: Entity,
    /// The new health fraction in `[0, 1]`.
    pub fraction: f32,
}
