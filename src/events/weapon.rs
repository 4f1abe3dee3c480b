//! Weapon notifications consumed by the HUD ammo meter.

use bevy_ecs::prelude::*;

/// Event triggered when an entity equips a weapon.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponEquipEvent {
    pub entity: Entity,
    /// Code of the newly equipped weapon.
    pub code: String,
    /// Ammo fraction of the newly equipped weapon.
    pub ammo: f32,
}

/// Event triggered after the equipped weapon's ammo changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AmmoChangedEvent {
    pub entity: Entity,
    pub ammo: f32,
}
