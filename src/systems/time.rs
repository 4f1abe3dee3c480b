//! Time advance and tick dispatch.
//!
//! [`update_time`] is the single entry point an outer loop calls once per
//! frame. It advances the [`TimerBus`] clock and invokes the subscribers of
//! every unpaused [`TickGroup`] in order, world simulation first.

use bevy_ecs::prelude::*;
use log::{error, warn};

use crate::error::SimError;
use crate::resources::timerbus::{Tick, TickGroup, TimerBus};

/// Advance simulation time by `dt` seconds and notify subscribers.
///
/// Every subscriber of a group sees the same `dt`, in binding order. Only
/// callbacks bound before this call are dispatched; one bound by a callback,
/// in either group, first runs on the next call. A subscriber returning an
/// error does not stop the others; the failure is logged and returned as a
/// [`SimError::CallbackFault`].
///
/// Calling this from inside a tick callback is rejected with
/// [`SimError::InvalidState`] and does not advance the clock.
pub fn update_time(world: &mut World, dt: f32) -> Vec<SimError> {
    {
        let Some(mut bus) = world.get_resource_mut::<TimerBus>() else {
            warn!("update_time called without a TimerBus resource");
            return vec![SimError::MissingResource("TimerBus")];
        };
        if bus.is_dispatching() {
            warn!("update_time called re-entrantly from a tick callback; ignored");
            return vec![SimError::InvalidState(
                "update_time called while a tick is being dispatched".into(),
            )];
        }
        bus.advance(dt);
    }

    let mut faults = Vec::new();
    for group in TickGroup::ALL {
        let Some(mut snapshot) = world
            .get_resource_mut::<TimerBus>()
            .and_then(|mut bus| bus.begin_dispatch(group, dt))
        else {
            continue;
        };

        for subscriber in snapshot.iter_mut() {
            let tick = Tick {
                id: subscriber.id,
                group,
                dt,
            };
            if let Err(e) = (subscriber.callback)(world, tick) {
                error!("Tick callback {} in {:?} failed: {}", subscriber.id, group, e);
                faults.push(SimError::CallbackFault {
                    binding: subscriber.id,
                    message: e.to_string(),
                });
            }
        }

        match world.get_resource_mut::<TimerBus>() {
            Some(mut bus) => bus.end_dispatch(group, snapshot),
            None => warn!("TimerBus removed during dispatch; {group:?} subscribers dropped"),
        }
    }
    faults
}
