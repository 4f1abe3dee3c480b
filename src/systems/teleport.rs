//! Two-phase teleport sequence driven by world ticks.
//!
//! [`start_teleport`] triggers the start event right away and binds a world
//! tick callback that accumulates the blink delay. On the tick where the
//! delay is reached the entity is moved, its integrator is reset and the end
//! event fires. Starting a new teleport while one is in flight replaces it.
//! [`cancel_teleport`] leaves the entity wherever it is.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::debug;

use crate::components::position::Position;
use crate::components::teleport::{Teleport, TeleportState};
use crate::error::SimError;
use crate::events::teleport::{TeleportEndEvent, TeleportStartEvent};
use crate::resources::timerbus::{BindingId, Tick, TickGroup, TimerBus};
use crate::systems::movement::set_position;

enum BlinkOutcome {
    Waiting,
    Arrived(Vec3),
    Stale,
}

/// Begin teleporting `entity` to `destination` after `blink_time` seconds
/// of world time.
pub fn start_teleport(
    world: &mut World,
    entity: Entity,
    destination: Vec3,
    blink_time: f32,
) -> Result<(), SimError> {
    let previous = world
        .get::<Teleport>(entity)
        .ok_or_else(|| SimError::missing_component(entity, "Teleport"))?
        .binding();
    let position = world
        .get::<Position>(entity)
        .ok_or_else(|| SimError::missing_component(entity, "Position"))?
        .pos;

    let binding = {
        let mut bus = world
            .get_resource_mut::<TimerBus>()
            .ok_or(SimError::MissingResource("TimerBus"))?;
        if let Some(previous) = previous {
            bus.unbind(previous);
        }
        bus.bind(TickGroup::World, move |world, tick| blink_step(world, tick, entity))
    };

    if let Some(mut teleport) = world.get_mut::<Teleport>(entity) {
        teleport.state = TeleportState::Blinking {
            destination,
            blink_time,
            elapsed: 0.0,
            binding,
        };
    }
    debug!("Teleport of {entity} started at {position} towards {destination}");
    world.trigger(TeleportStartEvent { entity, position });
    Ok(())
}

/// Abort an in-flight teleport. The entity keeps its current position.
/// Returns `false` if nothing was in flight.
pub fn cancel_teleport(world: &mut World, entity: Entity) -> bool {
    let Some(mut teleport) = world.get_mut::<Teleport>(entity) else {
        return false;
    };
    let Some(binding) = teleport.binding() else {
        return false;
    };
    teleport.state = TeleportState::Idle;
    unbind(world, binding);
    debug!("Teleport of {entity} cancelled");
    true
}

fn blink_step(world: &mut World, tick: Tick, entity: Entity) -> Result<(), SimError> {
    let outcome = match world.get_mut::<Teleport>(entity) {
        Some(mut teleport) => {
            let outcome = match &mut teleport.state {
                TeleportState::Blinking {
                    destination,
                    blink_time,
                    elapsed,
                    binding,
                } if *binding == tick.id => {
                    *elapsed += tick.dt;
                    if *elapsed >= *blink_time {
                        BlinkOutcome::Arrived(*destination)
                    } else {
                        BlinkOutcome::Waiting
                    }
                }
                _ => BlinkOutcome::Stale,
            };
            if matches!(outcome, BlinkOutcome::Arrived(_)) {
                teleport.state = TeleportState::Idle;
            }
            outcome
        }
        None => BlinkOutcome::Stale,
    };

    match outcome {
        BlinkOutcome::Waiting => {}
        BlinkOutcome::Stale => unbind(world, tick.id),
        BlinkOutcome::Arrived(destination) => {
            unbind(world, tick.id);
            set_position(world, entity, destination);
            debug!("Teleport of {entity} arrived at {destination}");
            world.trigger(TeleportEndEvent {
                entity,
                position: destination,
            });
        }
    }
    Ok(())
}

fn unbind(world: &mut World, binding: BindingId) {
    if let Some(mut bus) = world.get_resource_mut::<TimerBus>() {
        bus.unbind(binding);
    }
}
