//! HUD meter animation and the observers feeding it.
//!
//! Raising a visible meter is animated: world ticks are paused and an
//! interface tick callback fills the meter at its fill speed until the
//! target is reached, then unbinds itself. Every other change (lower target,
//! hidden HUD) is applied at once and cancels a running animation.
//!
//! Meters share one world pause: it is released when the last running
//! animation finishes or is cancelled.
//!
//! [`attach_hud`] hooks the meters to the tracked entity's events:
//!
//! | event                  | effect                                  |
//! |------------------------|-----------------------------------------|
//! | [`HealthChangedEvent`] | animate the health meter                |
//! | [`AmmoChangedEvent`]   | animate the ammo meter                  |
//! | [`WeaponEquipEvent`]   | set the ammo meter at once              |
//! | [`PlayerDeathEvent`]   | hide the HUD                            |
//! | [`PlayerResetEvent`]   | show the HUD                            |

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::error::SimError;
use crate::events::health::HealthChangedEvent;
use crate::events::level::{PlayerDeathEvent, PlayerResetEvent};
use crate::events::weapon::{AmmoChangedEvent, WeaponEquipEvent};
use crate::resources::hud::{Hud, MeterKind};
use crate::resources::timerbus::{Tick, TickGroup, TimerBus};

/// Move a meter towards `fraction`, animating increases of a visible meter.
///
/// A new, higher target while an animation runs only retargets it.
pub fn set_meter_target(hud: &mut Hud, bus: &mut TimerBus, kind: MeterKind, fraction: f32) {
    let fraction = fraction.clamp(0.0, 1.0);
    let meter = hud.meter_mut(kind);
    if !meter.visible || fraction <= meter.displayed() {
        set_meter_value(hud, bus, kind, fraction);
        return;
    }

    meter.target = fraction;
    if meter.is_animating() {
        debug!("{kind:?} meter retargeted to {fraction}");
        return;
    }
    bus.pause(TickGroup::World);
    let binding = bus.bind(TickGroup::Interface, move |world, tick| {
        fill_step(world, tick, kind)
    });
    meter.animation = Some(binding);
    debug!("{kind:?} meter filling to {fraction}");
}

/// Set a meter to `fraction` immediately, cancelling a running animation.
pub fn set_meter_value(hud: &mut Hud, bus: &mut TimerBus, kind: MeterKind, fraction: f32) {
    let fraction = fraction.clamp(0.0, 1.0);
    if let Some(binding) = hud.meter_mut(kind).animation.take() {
        bus.unbind(binding);
        release_world(hud, bus);
        debug!("{kind:?} meter animation cancelled");
    }
    let meter = hud.meter_mut(kind);
    meter.target = fraction;
    meter.display(fraction);
}

/// World-level [`set_meter_target`].
pub fn set_target(world: &mut World, kind: MeterKind, fraction: f32) -> Result<(), SimError> {
    if !world.contains_resource::<Hud>() {
        return Err(SimError::MissingResource("Hud"));
    }
    world.resource_scope(|world, mut hud: Mut<Hud>| {
        let mut bus = world
            .get_resource_mut::<TimerBus>()
            .ok_or(SimError::MissingResource("TimerBus"))?;
        set_meter_target(&mut hud, &mut bus, kind, fraction);
        Ok(())
    })
}

fn fill_step(world: &mut World, tick: Tick, kind: MeterKind) -> Result<(), SimError> {
    if !world.contains_resource::<Hud>() {
        finish_fill(world, tick);
        return Err(SimError::MissingResource("Hud"));
    }
    let (current, done) = {
        let mut hud = world.resource_mut::<Hud>();
        let meter = hud.meter_mut(kind);
        if meter.animation != Some(tick.id) {
            (false, true)
        } else if meter.advance(tick.dt) {
            meter.animation = None;
            debug!("{kind:?} meter reached {}", meter.displayed());
            (true, true)
        } else {
            (true, false)
        }
    };
    match (current, done) {
        (true, true) => finish_fill(world, tick),
        // Superseded: the newer animation owns the world pause.
        (false, _) => {
            if let Some(mut bus) = world.get_resource_mut::<TimerBus>() {
                bus.unbind(tick.id);
            }
        }
        (true, false) => {}
    }
    Ok(())
}

fn finish_fill(world: &mut World, tick: Tick) {
    let others_running = world.get_resource::<Hud>().is_some_and(Hud::is_animating);
    if let Some(mut bus) = world.get_resource_mut::<TimerBus>() {
        bus.unbind(tick.id);
        if !others_running {
            bus.resume(TickGroup::World);
        }
    }
}

fn release_world(hud: &Hud, bus: &mut TimerBus) {
    if !hud.is_animating() {
        bus.resume(TickGroup::World);
    }
}

/// Mirror `player` on the HUD. Inserts a default [`Hud`] if there is none.
pub fn attach_hud(world: &mut World, player: Entity) {
    world.init_resource::<Hud>();
    if !world.resource::<Hud>().observers.is_empty() {
        detach_hud(world);
    }
    let observers = vec![
        world.add_observer(observe_health_meter).id(),
        world.add_observer(observe_ammo_meter).id(),
        world.add_observer(observe_weapon_equip).id(),
        world.add_observer(observe_hud_on_death).id(),
        world.add_observer(observe_hud_on_reset).id(),
    ];
    let mut hud = world.resource_mut::<Hud>();
    hud.track(Some(player));
    hud.observers = observers;
    info!("HUD tracking {player}");
}

/// Stop mirroring, hide the HUD and drop any running animation.
pub fn detach_hud(world: &mut World) {
    if !world.contains_resource::<Hud>() {
        return;
    }
    let observers = world.resource_scope(|world, mut hud: Mut<Hud>| {
        if let Some(mut bus) = world.get_resource_mut::<TimerBus>() {
            for kind in MeterKind::ALL {
                let value = hud.meter(kind).target();
                set_meter_value(&mut hud, &mut bus, kind, value);
            }
        }
        hud.hide();
        hud.track(None);
        std::mem::take(&mut hud.observers)
    });
    for observer in observers {
        world.despawn(observer);
    }
}

fn apply_tracked(
    hud: &mut Hud,
    bus: Option<&mut TimerBus>,
    kind: MeterKind,
    fraction: f32,
    animate: bool,
) {
    let Some(bus) = bus else {
        warn!("No TimerBus; {kind:?} meter set without animation");
        let meter = hud.meter_mut(kind);
        meter.target = fraction.clamp(0.0, 1.0);
        meter.display(meter.target);
        return;
    };
    if animate {
        set_meter_target(hud, bus, kind, fraction);
    } else {
        set_meter_value(hud, bus, kind, fraction);
    }
}

pub fn observe_health_meter(
    trigger: On<HealthChangedEvent>,
    mut hud: ResMut<Hud>,
    mut bus: Option<ResMut<TimerBus>>,
) {
    let event = trigger.event();
    if hud.tracked() != Some(event.entity) {
        return;
    }
    apply_tracked(
        &mut hud,
        bus.as_deref_mut(),
        MeterKind::Health,
        event.fraction,
        true,
    );
}

pub fn observe_ammo_meter(
    trigger: On<AmmoChangedEvent>,
    mut hud: ResMut<Hud>,
    mut bus: Option<ResMut<TimerBus>>,
) {
    let event = trigger.event();
    if hud.tracked() != Some(event.entity) {
        return;
    }
    apply_tracked(&mut hud, bus.as_deref_mut(), MeterKind::Ammo, event.ammo, true);
}

pub fn observe_weapon_equip(
    trigger: On<WeaponEquipEvent>,
    mut hud: ResMut<Hud>,
    mut bus: Option<ResMut<TimerBus>>,
) {
    let event = trigger.event();
    if hud.tracked() != Some(event.entity) {
        return;
    }
    hud.set_current_weapon(event.code.clone());
    apply_tracked(&mut hud, bus.as_deref_mut(), MeterKind::Ammo, event.ammo, false);
}

pub fn observe_hud_on_death(trigger: On<PlayerDeathEvent>, mut hud: ResMut<Hud>) {
    if hud.tracked() == Some(trigger.event().entity) {
        hud.hide();
    }
}

pub fn observe_hud_on_reset(trigger: On<PlayerResetEvent>, mut hud: ResMut<Hud>) {
    if hud.tracked() == Some(trigger.event().entity) {
        hud.show();
    }
}
