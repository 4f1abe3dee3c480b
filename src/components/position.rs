//! World-space position of an entity.

use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub pos: Vec3,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
        }
    }

    pub fn from_vec(pos: Vec3) -> Self {
        Self { pos }
    }
}
