//! Health operations.
//!
//! Every operation clamps to `[0, 1]` and triggers a
//! [`HealthChangedEvent`], even when the value did not change, so observers
//! always see the latest fraction.

use bevy_ecs::prelude::*;

use crate::components::health::Health;
use crate::error::SimError;
use crate::events::health::HealthChangedEvent;

/// Set the health fraction of `entity`. Returns the stored fraction.
pub fn set_health(world: &mut World, entity: Entity, fraction: f32) -> Result<f32, SimError> {
    let mut health = world
        .get_mut::<Health>(entity)
        .ok_or_else(|| SimError::missing_component(entity, "Health"))?;
    let fraction = health.set(fraction);
    world.trigger(HealthChangedEvent { entity, fraction });
    Ok(fraction)
}

pub fn damage(world: &mut World, entity: Entity, amount: f32) -> Result<f32, SimError> {
    let current = current_fraction(world, entity)?;
    set_health(world, entity, current - amount)
}

pub fn heal(world: &mut World, entity: Entity, amount: f32) -> Result<f32, SimError> {
    let current = current_fraction(world, entity)?;
    set_health(world, entity, current + amount)
}

/// Force health to zero.
pub fn kill(world: &mut World, entity: Entity) -> Result<f32, SimError> {
    set_health(world, entity, 0.0)
}

/// Refill health completely.
pub fn restore(world: &mut World, entity: Entity) -> Result<f32, SimError> {
    set_health(world, entity, 1.0)
}

fn current_fraction(world: &World, entity: Entity) -> Result<f32, SimError> {
    world
        .get::<Health>(entity)
        .map(Health::fraction)
        .ok_or_else(|| SimError::missing_component(entity, "Health"))
}
