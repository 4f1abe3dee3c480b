//! Level lifecycle systems.
//!
//! [`attach_level`] wires the [`Level`] resource into the world:
//!
//! - an observer on [`HealthChangedEvent`] counts the controlled entity's
//!   death and emits [`PlayerDeathEvent`]
//! - a world tick callback ([`level_tick`]) fires the delayed transition
//!   once the reset delay has elapsed on the world clock
//! - an observer on [`TeleportEndEvent`] finishes a respawn and emits
//!   [`PlayerResetEvent`]
//!
//! Because the delay is measured on the world clock, time spent with world
//! ticks paused (e.g. while a HUD meter fills) does not count.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::health::Health;
use crate::components::rigidbody::RigidBody;
use crate::components::teleport::Teleport;
use crate::error::SimError;
use crate::events::health::HealthChangedEvent;
use crate::events::level::{LevelEndEvent, PlayerDeathEvent, PlayerResetEvent};
use crate::events::teleport::TeleportEndEvent;
use crate::resources::level::{Level, LevelState, LevelTransition};
use crate::resources::timerbus::{Tick, TickGroup, TimerBus};
use crate::systems::health::restore;
use crate::systems::teleport::start_teleport;

/// Install the level observers and bind [`level_tick`] to world ticks.
///
/// Attaching an already attached level is a no-op.
pub fn attach_level(world: &mut World) -> Result<(), SimError> {
    match world.get_resource::<Level>() {
        None => return Err(SimError::MissingResource("Level")),
        Some(level) if level.binding.is_some() => {
            warn!("Level already attached");
            return Ok(());
        }
        Some(_) => {}
    }
    let binding = world
        .get_resource_mut::<TimerBus>()
        .ok_or(SimError::MissingResource("TimerBus"))?
        .bind(TickGroup::World, level_tick);
    let observers = vec![
        world.add_observer(observe_player_health).id(),
        world.add_observer(observe_player_teleport_end).id(),
    ];
    let mut level = world.resource_mut::<Level>();
    level.binding = Some(binding);
    level.observers = observers;
    info!("Level attached");
    Ok(())
}

/// Undo [`attach_level`]. The level keeps its state.
pub fn detach_level(world: &mut World) {
    let Some(mut level) = world.get_resource_mut::<Level>() else {
        return;
    };
    let binding = level.binding.take();
    let observers = std::mem::take(&mut level.observers);
    if let (Some(binding), Some(mut bus)) = (binding, world.get_resource_mut::<TimerBus>()) {
        bus.unbind(binding);
    }
    for observer in observers {
        world.despawn(observer);
    }
    info!("Level detached");
}

/// World tick callback: run the delayed death transition when it is due.
pub fn level_tick(world: &mut World, _tick: Tick) -> Result<(), SimError> {
    let now = world
        .get_resource::<TimerBus>()
        .map(|bus| bus.elapsed(TickGroup::World))
        .unwrap_or_default();
    let transition = world
        .get_resource_mut::<Level>()
        .ok_or(SimError::MissingResource("Level"))?
        .poll(now);
    match transition {
        Some(LevelTransition::ResetPlayer) => reset_player(world),
        Some(LevelTransition::End) => {
            world.trigger(LevelEndEvent { elapsed: now });
            Ok(())
        }
        None => Ok(()),
    }
}

/// Respawn the controlled entity at the active checkpoint.
///
/// Allowed while `PlayerDead` or `Resetting` (restarts the sequence). From
/// `Active` or `Ended` it fails with [`SimError::InvalidState`] and changes
/// nothing. With no checkpoints it fails with [`SimError::Configuration`].
///
/// On success the entity's health is refilled and its velocity cleared, the
/// level enters `Resetting` and a teleport towards checkpoint + offset
/// starts; the level returns to `Active` when the teleport ends.
pub fn reset_player(world: &mut World) -> Result<(), SimError> {
    let (entity, target, blink_time) = {
        let level = world
            .get_resource::<Level>()
            .ok_or(SimError::MissingResource("Level"))?;
        if let Err(e) = level.check_can_reset() {
            warn!("{e}");
            return Err(e);
        }
        let target = level.check_point_target()?;
        let entity = level.player.character.ok_or_else(|| {
            SimError::Configuration("level has no controlled entity to reset".into())
        })?;
        (entity, target, level.ready_blink_time)
    };
    if world.get::<Teleport>(entity).is_none() {
        return Err(SimError::missing_component(entity, "Teleport"));
    }

    if let Some(mut level) = world.get_resource_mut::<Level>() {
        level.set_state(LevelState::Resetting);
    }
    if world.get::<Health>(entity).is_some() {
        restore(world, entity)?;
    }
    if let Some(mut rigidbody) = world.get_mut::<RigidBody>(entity) {
        rigidbody.set_velocity(glam::Vec3::ZERO);
    }
    info!("Resetting player {entity} to {target}");
    start_teleport(world, entity, target, blink_time)
}

/// Observer counting the controlled entity's death.
pub fn observe_player_health(
    trigger: On<HealthChangedEvent>,
    mut level: ResMut<Level>,
    bus: Option<Res<TimerBus>>,
    healths: Query<&Health>,
    mut commands: Commands,
) {
    let event = trigger.event();
    if level.player.character != Some(event.entity) {
        return;
    }
    if !healths.get(event.entity).is_ok_and(Health::is_depleted) {
        return;
    }
    let now = bus
        .map(|bus| bus.elapsed(TickGroup::World))
        .unwrap_or_default();
    if let Some(lives) = level.register_death(now) {
        commands.trigger(PlayerDeathEvent {
            entity: event.entity,
            lives,
        });
    }
}

/// Observer finishing a respawn when the controlled entity lands.
pub fn observe_player_teleport_end(
    trigger: On<TeleportEndEvent>,
    mut level: ResMut<Level>,
    mut commands: Commands,
) {
    let entity = trigger.event().entity;
    if level.player.character != Some(entity) || level.state() != LevelState::Resetting {
        return;
    }
    level.set_state(LevelState::Active);
    info!("Player {entity} is back in play");
    commands.trigger(PlayerResetEvent { entity });
}
