//! Tick dispatch integration tests: snapshot semantics, pause, faults.

use bevy_ecs::prelude::*;

use blinkstep::error::SimError;
use blinkstep::resources::timerbus::{BindingId, Tick, TickGroup, TimerBus};
use blinkstep::systems::time::update_time;

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Names of the callbacks in invocation order.
#[derive(Resource, Debug, Default)]
struct Calls(Vec<&'static str>);

#[derive(Resource, Debug, Default)]
struct Handles {
    late: Option<BindingId>,
    victim: Option<BindingId>,
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(TimerBus::new());
    world.init_resource::<Calls>();
    world.init_resource::<Handles>();
    world
}

fn record(name: &'static str) -> impl FnMut(&mut World, Tick) -> Result<(), SimError> + Send + Sync {
    move |world, _| {
        world.resource_mut::<Calls>().0.push(name);
        Ok(())
    }
}

fn bind(world: &mut World, group: TickGroup, name: &'static str) -> BindingId {
    world.resource_mut::<TimerBus>().bind(group, record(name))
}

fn calls(world: &mut World) -> Vec<&'static str> {
    std::mem::take(&mut world.resource_mut::<Calls>().0)
}

#[test]
fn subscribers_run_in_binding_order_with_same_dt() {
    let mut world = make_world();
    world
        .resource_mut::<TimerBus>()
        .bind(TickGroup::World, |world, tick| {
            assert!(approx_eq(tick.dt, 0.25));
            world.resource_mut::<Calls>().0.push("a");
            Ok(())
        });
    bind(&mut world, TickGroup::World, "b");
    bind(&mut world, TickGroup::Interface, "ui");

    let faults = update_time(&mut world, 0.25);

    assert!(faults.is_empty());
    assert_eq!(calls(&mut world), vec!["a", "b", "ui"]);
    let bus = world.resource::<TimerBus>();
    assert!(approx_eq(bus.total_elapsed(), 0.25));
    assert!(approx_eq(bus.delta(TickGroup::World), 0.25));
}

#[test]
fn callback_bound_during_dispatch_runs_next_tick() {
    let mut world = make_world();
    world
        .resource_mut::<TimerBus>()
        .bind(TickGroup::World, |world, _| {
            world.resource_mut::<Calls>().0.push("binder");
            if world.resource::<Handles>().late.is_none() {
                let id = world
                    .resource_mut::<TimerBus>()
                    .bind(TickGroup::World, record("late"));
                world.resource_mut::<Handles>().late = Some(id);
            }
            Ok(())
        });

    update_time(&mut world, 0.1);
    assert_eq!(calls(&mut world), vec!["binder"]);

    update_time(&mut world, 0.1);
    assert_eq!(calls(&mut world), vec!["binder", "late"]);
}

#[test]
fn callback_bound_from_world_tick_skips_this_interface_tick() {
    let mut world = make_world();
    world
        .resource_mut::<TimerBus>()
        .bind(TickGroup::World, |world, _| {
            world.resource_mut::<Calls>().0.push("binder");
            if world.resource::<Handles>().late.is_none() {
                let id = world
                    .resource_mut::<TimerBus>()
                    .bind(TickGroup::Interface, record("late"));
                world.resource_mut::<Handles>().late = Some(id);
            }
            Ok(())
        });
    bind(&mut world, TickGroup::Interface, "ui");

    update_time(&mut world, 0.1);
    assert_eq!(calls(&mut world), vec!["binder", "ui"]);
    assert_eq!(world.resource::<TimerBus>().len(TickGroup::Interface), 2);

    update_time(&mut world, 0.1);
    assert_eq!(calls(&mut world), vec!["binder", "ui", "late"]);
}

#[test]
fn callback_unbound_during_dispatch_still_runs_this_tick() {
    let mut world = make_world();
    world
        .resource_mut::<TimerBus>()
        .bind(TickGroup::World, |world, _| {
            world.resource_mut::<Calls>().0.push("killer");
            if let Some(victim) = world.resource_mut::<Handles>().victim.take() {
                assert!(world.resource_mut::<TimerBus>().unbind(victim));
            }
            Ok(())
        });
    let victim = bind(&mut world, TickGroup::World, "victim");
    world.resource_mut::<Handles>().victim = Some(victim);

    update_time(&mut world, 0.1);
    assert_eq!(calls(&mut world), vec!["killer", "victim"]);
    assert!(!world.resource::<TimerBus>().is_bound(victim));

    update_time(&mut world, 0.1);
    assert_eq!(calls(&mut world), vec!["killer"]);
}

#[test]
fn self_unbind_stops_after_current_tick() {
    let mut world = make_world();
    world
        .resource_mut::<TimerBus>()
        .bind(TickGroup::Interface, |world, tick| {
            world.resource_mut::<Calls>().0.push("once");
            world.resource_mut::<TimerBus>().unbind(tick.id);
            Ok(())
        });

    update_time(&mut world, 0.1);
    update_time(&mut world, 0.1);

    assert_eq!(calls(&mut world), vec!["once"]);
    assert!(world.resource::<TimerBus>().is_empty(TickGroup::Interface));
}

#[test]
fn failing_callback_does_not_stop_the_others() {
    let mut world = make_world();
    let failing = world
        .resource_mut::<TimerBus>()
        .bind(TickGroup::World, |_, _| {
            Err(SimError::Configuration("boom".into()))
        });
    bind(&mut world, TickGroup::World, "after");

    let faults = update_time(&mut world, 0.1);

    assert_eq!(faults.len(), 1);
    match &faults[0] {
        SimError::CallbackFault { binding, message } => {
            assert_eq!(*binding, failing);
            assert!(message.contains("boom"));
        }
        other => panic!("unexpected fault {other:?}"),
    }
    assert_eq!(calls(&mut world), vec!["after"]);
    // Still bound.
    assert!(world.resource::<TimerBus>().is_bound(failing));
}

#[test]
fn paused_group_skips_ticks_and_keeps_its_clock() {
    let mut world = make_world();
    bind(&mut world, TickGroup::World, "world");
    bind(&mut world, TickGroup::Interface, "ui");

    world.resource_mut::<TimerBus>().pause(TickGroup::World);
    update_time(&mut world, 0.5);
    assert_eq!(calls(&mut world), vec!["ui"]);

    world.resource_mut::<TimerBus>().resume(TickGroup::World);
    update_time(&mut world, 0.25);
    assert_eq!(calls(&mut world), vec!["world", "ui"]);

    let bus = world.resource::<TimerBus>();
    assert!(approx_eq(bus.total_elapsed(), 0.75));
    assert!(approx_eq(bus.elapsed(TickGroup::World), 0.25));
    assert!(approx_eq(bus.elapsed(TickGroup::Interface), 0.75));
}

#[test]
fn reentrant_update_is_rejected() {
    let mut world = make_world();
    world
        .resource_mut::<TimerBus>()
        .bind(TickGroup::World, |world, _| {
            let nested = update_time(world, 1.0);
            assert!(matches!(nested.as_slice(), [SimError::InvalidState(_)]));
            world.resource_mut::<Calls>().0.push("outer");
            Ok(())
        });

    let faults = update_time(&mut world, 0.1);

    assert!(faults.is_empty());
    assert_eq!(calls(&mut world), vec!["outer"]);
    assert!(approx_eq(world.resource::<TimerBus>().total_elapsed(), 0.1));
}

#[test]
fn update_without_bus_reports_missing_resource() {
    let mut world = World::new();
    let faults = update_time(&mut world, 0.1);
    assert_eq!(faults, vec![SimError::MissingResource("TimerBus")]);
}
