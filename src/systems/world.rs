//! Session setup and the per-tick world step.
//!
//! A simulation session is a [`World`] holding the core resources. Objects
//! that take part in collisions are spawned through [`add_object`] so the
//! [`CollisionDetector`] knows about them.

use bevy_ecs::bundle::Bundle;
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::collisionzone::CollisionZones;
use crate::error::SimError;
use crate::resources::collisiondetector::CollisionDetector;
use crate::resources::hud::Hud;
use crate::resources::level::Level;
use crate::resources::simconfig::SimConfig;
use crate::resources::timerbus::{BindingId, Tick, TickGroup, TimerBus};
use crate::systems::collision::detect_collisions;
use crate::systems::movement::movement;
use crate::systems::teleport::cancel_teleport;

/// Build a world with the core resources configured from `config`.
pub fn new_simulation(config: SimConfig) -> World {
    let mut world = World::new();

    let mut level = Level::new();
    level.reset_delay = config.reset_delay;
    level.ready_blink_time = config.ready_blink_time;
    level.player.lives = config.lives;
    level.player.checkpoint_offset = config.checkpoint_offset;

    world.insert_resource(TimerBus::new());
    world.insert_resource(CollisionDetector::new());
    world.insert_resource(level);
    world.insert_resource(Hud::new(config.fill_speed));
    world.insert_resource(config);
    info!("Simulation session created");
    world
}

/// Spawn an object. Objects carrying [`CollisionZones`] are registered with
/// the collision detector.
pub fn add_object(world: &mut World, bundle: impl Bundle) -> Entity {
    let entity = world.spawn(bundle).id();
    if world.get::<CollisionZones>(entity).is_some() {
        world
            .get_resource_or_insert_with(CollisionDetector::new)
            .register(entity);
    }
    debug!("Added object {entity}");
    entity
}

/// Remove an object: unregister it, cancel its teleport and despawn it.
/// Returns `false` if the entity did not exist.
pub fn remove_object(world: &mut World, entity: Entity) -> bool {
    if let Some(mut detector) = world.get_resource_mut::<CollisionDetector>() {
        detector.unregister(entity);
    }
    if world.get_entity(entity).is_err() {
        return false;
    }
    cancel_teleport(world, entity);
    world.despawn(entity);
    debug!("Removed object {entity}");
    true
}

/// World tick callback: integrate motion, then resolve collisions.
pub fn world_step(world: &mut World, tick: Tick) -> Result<(), SimError> {
    movement(world, tick.dt);
    detect_collisions(world);
    Ok(())
}

/// Bind [`world_step`] to world ticks.
pub fn attach_world_step(world: &mut World) -> Result<BindingId, SimError> {
    let mut bus = world
        .get_resource_mut::<TimerBus>()
        .ok_or(SimError::MissingResource("TimerBus"))?;
    Ok(bus.bind(TickGroup::World, world_step))
}
