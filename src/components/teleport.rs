//! Teleport capability.
//!
//! A teleport runs in two phases. Phase one starts immediately: a
//! [`TeleportStartEvent`](crate::events::teleport::TeleportStartEvent) is
//! triggered while the entity stays where it is. Phase two runs on the world
//! tick where the accumulated blink time is reached: the entity is moved to
//! the destination, its integrator is reset and a
//! [`TeleportEndEvent`](crate::events::teleport::TeleportEndEvent) fires.
//!
//! See [`crate::systems::teleport`] for the driving functions.

use bevy_ecs::prelude::Component;
use glam::Vec3;

use crate::resources::timerbus::BindingId;

/// Progress of a teleport sequence.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TeleportState {
    #[default]
    Idle,
    /// Waiting for the blink delay to elapse.
    Blinking {
        destination: Vec3,
        blink_time: f32,
        elapsed: f32,
        binding: BindingId,
    },
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct Teleport {
    pub state: TeleportState,
}

impl Teleport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TeleportState::Blinking { .. })
    }

    /// Binding driving the in-flight sequence, if any.
    pub fn binding(&self) -> Option<BindingId> {
        match self.state {
            TeleportState::Blinking { binding, .. } => Some(binding),
            TeleportState::Idle => None,
        }
    }
}
