//! Level lifecycle notifications.
//!
//! Emitted by the level state machine in [`crate::systems::level`]:
//!
//! - [`PlayerDeathEvent`] – the controlled entity ran out of health
//! - [`PlayerResetEvent`] – the respawn teleport finished, play resumes
//! - [`LevelEndEvent`] – no lives left, the level is over
//!
//! The HUD hides itself on death and shows itself on reset.

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerDeathEvent {
    pub entity: Entity,
    /// Lives remaining after the death was counted.
    pub lives: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerResetEvent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LevelEndEvent {
    /// World clock at which the level ended.
    pub elapsed: f32,
}
