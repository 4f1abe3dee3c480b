//! Level state: player lifecycle, lives and checkpoints.
//!
//! The [`Level`] resource is a small state machine:
//!
//! ```text
//! Active ──death──▶ PlayerDead ──delay, lives > 0──▶ Resetting ──teleport end──▶ Active
//!                        │
//!                        └──delay, lives == 0──▶ Ended
//! ```
//!
//! This module only holds the data and the pure transitions. The parts that
//! need world access (observers, the tick callback, the respawn teleport)
//! live in [`crate::systems::level`].

use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec3;
use log::{debug, info};
use serde::Serialize;

use crate::error::SimError;
use crate::resources::timerbus::BindingId;

/// Default simulated seconds between death and respawn/end.
pub const DEFAULT_RESET_DELAY: f32 = 4.0;
/// Default blink delay of the respawn teleport.
pub const DEFAULT_READY_BLINK_TIME: f32 = 0.5;
pub const DEFAULT_LIVES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LevelState {
    #[default]
    Active,
    PlayerDead,
    Resetting,
    /// Terminal.
    Ended,
}

/// Fixed respawn anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckPoint {
    pub position: Vec3,
}

/// Lives, controlled entity and respawn settings of the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub lives: u32,
    pub character: Option<Entity>,
    checkpoint_index: usize,
    pub checkpoint_offset: Vec3,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            lives: DEFAULT_LIVES,
            character: None,
            checkpoint_index: 0,
            checkpoint_offset: Vec3::ZERO,
        }
    }
}

impl PlayerState {
    pub fn checkpoint_index(&self) -> usize {
        self.checkpoint_index
    }
}

/// What a tick of the level asks the world to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTransition {
    ResetPlayer,
    End,
}

#[derive(Resource, Debug, Clone)]
pub struct Level {
    state: LevelState,
    pub player: PlayerState,
    checkpoints: Vec<CheckPoint>,
    death_time: Option<f32>,
    /// Seconds of world time between death and the follow-up transition.
    pub reset_delay: f32,
    /// Blink delay of the respawn teleport.
    pub ready_blink_time: f32,
    pub(crate) binding: Option<BindingId>,
    pub(crate) observers: Vec<Entity>,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    pub fn new() -> Self {
        Self {
            state: LevelState::Active,
            player: PlayerState::default(),
            checkpoints: Vec::new(),
            death_time: None,
            reset_delay: DEFAULT_RESET_DELAY,
            ready_blink_time: DEFAULT_READY_BLINK_TIME,
            binding: None,
            observers: Vec::new(),
        }
    }

    /// Level controlling `character`.
    pub fn with_character(character: Entity) -> Self {
        let mut level = Self::new();
        level.player.character = Some(character);
        level
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: LevelState) {
        if self.state != state {
            debug!("Level state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// World time at which the pending death transition is due.
    pub fn death_time(&self) -> Option<f32> {
        self.death_time
    }

    pub fn add_check_point(&mut self, x: f32, y: f32, z: f32) {
        self.checkpoints.push(CheckPoint {
            position: Vec3::new(x, y, z),
        });
    }

    pub fn check_points(&self) -> &[CheckPoint] {
        &self.checkpoints
    }

    /// Select the active checkpoint, clamped to the last one.
    pub fn set_check_point_index(&mut self, index: usize) {
        let clamped = index.min(self.checkpoints.len().saturating_sub(1));
        self.player.checkpoint_index = clamped;
    }

    pub fn check_point_index(&self) -> usize {
        self.player.checkpoint_index
    }

    pub fn set_check_point_offset(&mut self, x: f32, y: f32, z: f32) {
        self.player.checkpoint_offset = Vec3::new(x, y, z);
    }

    /// Respawn target: active checkpoint plus the checkpoint offset.
    pub fn check_point_target(&self) -> Result<Vec3, SimError> {
        if self.checkpoints.is_empty() {
            return Err(SimError::Configuration(
                "level has no checkpoints to reset the player to".into(),
            ));
        }
        let index = self.player.checkpoint_index.min(self.checkpoints.len() - 1);
        Ok(self.checkpoints[index].position + self.player.checkpoint_offset)
    }

    /// Count a death of the controlled entity at world time `now`.
    ///
    /// Only honored while `Active`; returns the remaining lives if counted.
    pub fn register_death(&mut self, now: f32) -> Option<u32> {
        if self.state != LevelState::Active {
            debug!("Ignoring player death while {:?}", self.state);
            return None;
        }
        self.player.lives = self.player.lives.saturating_sub(1);
        self.death_time = Some(now);
        self.set_state(LevelState::PlayerDead);
        info!("Player died at {now:.3}, {} lives left", self.player.lives);
        Some(self.player.lives)
    }

    /// Check whether the death delay elapsed at world time `now`.
    ///
    /// The pending transition is consumed when reported. Running out of
    /// lives moves the level to `Ended` right here.
    pub fn poll(&mut self, now: f32) -> Option<LevelTransition> {
        if self.state != LevelState::PlayerDead {
            return None;
        }
        let death_time = self.death_time?;
        if now < death_time + self.reset_delay {
            return None;
        }
        self.death_time = None;
        if self.player.lives > 0 {
            Some(LevelTransition::ResetPlayer)
        } else {
            self.set_state(LevelState::Ended);
            info!("Level ended at {now:.3}");
            Some(LevelTransition::End)
        }
    }

    /// Reject a reset from states that do not permit it.
    pub(crate) fn check_can_reset(&self) -> Result<(), SimError> {
        match self.state {
            LevelState::PlayerDead | LevelState::Resetting => Ok(()),
            state => Err(SimError::InvalidState(format!(
                "cannot reset the player while the level is {state:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_point_target_adds_offset() {
        let mut level = Level::new();
        level.set_check_point_offset(0.0, 200.0, 0.0);
        level.add_check_point(135.0, 345.0, 0.0);
        level.add_check_point(1243.0, 1211.0, 0.0);
        level.add_check_point(7465.0, 2345.0, 0.0);

        level.set_check_point_index(0);
        assert_eq!(level.check_point_target(), Ok(Vec3::new(135.0, 545.0, 0.0)));
        level.set_check_point_index(2);
        assert_eq!(level.check_point_target(), Ok(Vec3::new(7465.0, 2545.0, 0.0)));
        level.set_check_point_index(1);
        assert_eq!(level.check_point_target(), Ok(Vec3::new(1243.0, 1411.0, 0.0)));
    }

    #[test]
    fn test_check_point_index_is_clamped() {
        let mut level = Level::new();
        level.add_check_point(1.0, 2.0, 3.0);
        level.add_check_point(4.0, 5.0, 6.0);
        level.set_check_point_index(17);
        assert_eq!(level.check_point_index(), 1);
    }

    #[test]
    fn test_no_checkpoints_is_configuration_error() {
        let level = Level::new();
        assert!(matches!(
            level.check_point_target(),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn test_death_decrements_lives_with_floor() {
        let mut level = Level::new();
        level.player.lives = 0;
        assert_eq!(level.register_death(1.0), Some(0));
        assert_eq!(level.state(), LevelState::PlayerDead);
        // Second death while dead is ignored.
        assert_eq!(level.register_death(2.0), None);
        assert_eq!(level.death_time(), Some(1.0));
    }

    #[test]
    fn test_poll_boundary() {
        let mut level = Level::new();
        level.player.lives = 2;
        level.register_death(0.0);
        assert_eq!(level.poll(3.999), None);
        assert_eq!(level.poll(4.0), Some(LevelTransition::ResetPlayer));
        // Consumed.
        assert_eq!(level.poll(5.0), None);
        assert_eq!(level.state(), LevelState::PlayerDead);
    }

    #[test]
    fn test_poll_ends_without_lives() {
        let mut level = Level::new();
        level.player.lives = 1;
        level.register_death(1.0);
        assert_eq!(level.poll(4.5), None);
        assert_eq!(level.poll(5.0), Some(LevelTransition::End));
        assert_eq!(level.state(), LevelState::Ended);
        assert_eq!(level.register_death(6.0), None);
    }

    #[test]
    fn test_reset_rejected_while_active_or_ended() {
        let mut level = Level::new();
        assert!(matches!(
            level.check_can_reset(),
            Err(SimError::InvalidState(_))
        ));
        level.set_state(LevelState::Ended);
        assert!(level.check_can_reset().is_err());
        level.set_state(LevelState::PlayerDead);
        assert!(level.check_can_reset().is_ok());
    }
}
