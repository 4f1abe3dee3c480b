//! Logical clock and tick subscriber registry.
//!
//! The [`TimerBus`] resource accumulates simulation time and keeps two
//! ordered subscriber lists, one per [`TickGroup`]:
//!
//! - [`TickGroup::World`] – world simulation (movement, collisions, level,
//!   teleports)
//! - [`TickGroup::Interface`] – interface animation (HUD meters)
//!
//! Each group can be paused independently. A paused group receives no ticks
//! and its own clock stands still, while the total clock and the other group
//! keep running. Pausing is cooperative: exactly one owner toggles it per
//! pause cycle and nested pauses are not counted.
//!
//! Dispatch itself lives in [`crate::systems::time::update_time`], which
//! needs `&mut World` to hand to the callbacks. While a group is being
//! dispatched its subscriber list is detached into a snapshot:
//!
//! - callbacks bound at any point during a tick, from either group, land in
//!   the live list and are first invoked on the next tick
//! - callbacks unbound during dispatch are recorded and dropped when the
//!   snapshot is merged back, so they still run for the current tick
//!
//! # Example
//!
//! ```ignore
//! let id = world.resource_mut::<TimerBus>().bind(TickGroup::Interface, |world, tick| {
//!     // ... animate ...
//!     world.resource_mut::<TimerBus>().unbind(tick.id);
//!     Ok(())
//! });
//! update_time(&mut world, 1.0 / 60.0);
//! ```

use std::fmt;

use bevy_ecs::prelude::{Resource, World};
use log::debug;
use rustc_hash::FxHashSet;

use crate::error::SimError;

/// Consumer groups of the clock, dispatched in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickGroup {
    World,
    Interface,
}

impl TickGroup {
    pub const ALL: [TickGroup; 2] = [TickGroup::World, TickGroup::Interface];

    fn index(self) -> usize {
        match self {
            TickGroup::World => 0,
            TickGroup::Interface => 1,
        }
    }
}

/// Handle returned by [`TimerBus::bind`], used to unbind the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-call data handed to a tick callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Binding of the callback being invoked; lets it unbind itself.
    pub id: BindingId,
    /// Group being dispatched.
    pub group: TickGroup,
    /// Simulation seconds advanced by this tick.
    pub dt: f32,
}

/// Boxed tick callback. Errors are reported by the dispatcher, they do not
/// stop the remaining subscribers.
pub type TickCallback = Box<dyn FnMut(&mut World, Tick) -> Result<(), SimError> + Send + Sync>;

pub(crate) struct Subscriber {
    pub(crate) id: BindingId,
    pub(crate) callback: TickCallback,
}

#[derive(Default)]
struct GroupSlot {
    subscribers: Vec<Subscriber>,
    paused: bool,
    elapsed: f32,
    delta: f32,
    /// Ids of the snapshot currently being dispatched.
    in_flight: Vec<BindingId>,
    /// Snapshot ids unbound while dispatching.
    pending_unbind: FxHashSet<BindingId>,
}

/// Simulation clock plus tick subscribers. See the module docs.
#[derive(Resource, Default)]
pub struct TimerBus {
    total: f32,
    groups: [GroupSlot; 2],
    next_id: u64,
    /// First id bound after the current tick started; later ids wait a tick.
    tick_start_id: u64,
    dispatching: Option<TickGroup>,
}

impl TimerBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a callback to a group. Bound during dispatch, it first runs on
    /// the next tick.
    pub fn bind<F>(&mut self, group: TickGroup, callback: F) -> BindingId
    where
        F: FnMut(&mut World, Tick) -> Result<(), SimError> + Send + Sync + 'static,
    {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.slot_mut(group).subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        debug!("Bound tick callback {id} to {group:?}");
        id
    }

    /// Unbind a callback. Returns `false` if it was not bound, so unbinding
    /// twice is harmless. Unbinding a callback of the snapshot being
    /// dispatched takes effect after the current tick.
    pub fn unbind(&mut self, id: BindingId) -> bool {
        for slot in self.groups.iter_mut() {
            if let Some(index) = slot.subscribers.iter().position(|s| s.id == id) {
                slot.subscribers.remove(index);
                debug!("Unbound tick callback {id}");
                return true;
            }
            if slot.in_flight.contains(&id) {
                let newly_pending = slot.pending_unbind.insert(id);
                if newly_pending {
                    debug!("Unbound tick callback {id} (after current tick)");
                }
                return newly_pending;
            }
        }
        false
    }

    pub fn is_bound(&self, id: BindingId) -> bool {
        self.groups.iter().any(|slot| {
            slot.subscribers.iter().any(|s| s.id == id)
                || (slot.in_flight.contains(&id) && !slot.pending_unbind.contains(&id))
        })
    }

    /// Number of callbacks bound to a group, including an in-flight snapshot.
    pub fn len(&self, group: TickGroup) -> usize {
        let slot = self.slot(group);
        slot.subscribers.len() + slot.in_flight.len() - slot.pending_unbind.len()
    }

    pub fn is_empty(&self, group: TickGroup) -> bool {
        self.len(group) == 0
    }

    /// Stop delivering ticks to a group. Its clock stands still until resumed.
    pub fn pause(&mut self, group: TickGroup) {
        debug!("Pausing {group:?} ticks");
        self.slot_mut(group).paused = true;
    }

    pub fn resume(&mut self, group: TickGroup) {
        debug!("Resuming {group:?} ticks");
        self.slot_mut(group).paused = false;
    }

    pub fn is_paused(&self, group: TickGroup) -> bool {
        self.slot(group).paused
    }

    /// Total simulation time advanced, regardless of pauses.
    pub fn total_elapsed(&self) -> f32 {
        self.total
    }

    /// Time advanced while the group was not paused.
    pub fn elapsed(&self, group: TickGroup) -> f32 {
        self.slot(group).elapsed
    }

    /// Delta of the last tick delivered to the group.
    pub fn delta(&self, group: TickGroup) -> f32 {
        self.slot(group).delta
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatching.is_some()
    }

    /// Start a tick: advance the total clock and close the set of callbacks
    /// eligible for it.
    pub(crate) fn advance(&mut self, dt: f32) {
        self.total += dt;
        self.tick_start_id = self.next_id;
    }

    /// Detach the subscriber snapshot of a group for dispatch, advancing its
    /// clock. Only callbacks bound before the tick started are included.
    /// Returns `None` when the group is paused.
    pub(crate) fn begin_dispatch(&mut self, group: TickGroup, dt: f32) -> Option<Vec<Subscriber>> {
        let tick_start = BindingId(self.tick_start_id);
        let slot = self.slot_mut(group);
        if slot.paused {
            return None;
        }
        slot.elapsed += dt;
        slot.delta = dt;
        // Subscribers are kept in id order.
        let split = slot.subscribers.partition_point(|s| s.id < tick_start);
        let newer = slot.subscribers.split_off(split);
        let snapshot = std::mem::replace(&mut slot.subscribers, newer);
        slot.in_flight = snapshot.iter().map(|s| s.id).collect();
        self.dispatching = Some(group);
        Some(snapshot)
    }

    /// Merge a dispatched snapshot back, dropping callbacks unbound during
    /// dispatch and keeping newer callbacks after the snapshot.
    pub(crate) fn end_dispatch(&mut self, group: TickGroup, snapshot: Vec<Subscriber>) {
        let slot = self.slot_mut(group);
        let newer = std::mem::take(&mut slot.subscribers);
        let unbound = std::mem::take(&mut slot.pending_unbind);
        slot.in_flight.clear();
        slot.subscribers = snapshot
            .into_iter()
            .filter(|s| !unbound.contains(&s.id))
            .chain(newer)
            .collect();
        self.dispatching = None;
    }

    fn slot(&self, group: TickGroup) -> &GroupSlot {
        &self.groups[group.index()]
    }

    fn slot_mut(&mut self, group: TickGroup) -> &mut GroupSlot {
        &mut self.groups[group.index()]
    }
}

impl fmt::Debug for TimerBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerBus")
            .field("total", &self.total)
            .field("world", &self.len(TickGroup::World))
            .field("interface", &self.len(TickGroup::Interface))
            .field("world_paused", &self.is_paused(TickGroup::World))
            .field("interface_paused", &self.is_paused(TickGroup::Interface))
            .finish()
    }
}
