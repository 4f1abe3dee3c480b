//! Weapon capability: a code identifying the weapon and its ammo fraction.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Weapon {
    pub code: String,
    ammo: f32,
}

impl Weapon {
    pub fn new(code: impl Into<String>, ammo: f32) -> Self {
        Self {
            code: code.into(),
            ammo: ammo.clamp(0.0, 1.0),
        }
    }

    pub fn ammo(&self) -> f32 {
        self.ammo
    }

    /// Set the ammo fraction, clamped to `[0, 1]`. Returns the stored value.
    pub fn set_ammo(&mut self, fraction: f32) -> f32 {
        self.ammo = fraction.clamp(0.0, 1.0);
        self.ammo
    }
}
