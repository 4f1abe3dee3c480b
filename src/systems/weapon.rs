//! Weapon operations feeding the HUD ammo meter.

use bevy_ecs::prelude::*;

use crate::components::weapon::Weapon;
use crate::error::SimError;
use crate::events::weapon::{AmmoChangedEvent, WeaponEquipEvent};

/// Equip `weapon` on `entity`, replacing any previous one.
pub fn equip_weapon(world: &mut World, entity: Entity, weapon: Weapon) -> Result<(), SimError> {
    let event = WeaponEquipEvent {
        entity,
        code: weapon.code.clone(),
        ammo: weapon.ammo(),
    };
    world
        .get_entity_mut(entity)
        .map_err(|_| SimError::NoSuchEntity(entity))?
        .insert(weapon);
    world.trigger(event);
    Ok(())
}

/// Set the ammo fraction of the equipped weapon. Returns the stored value.
pub fn set_ammo(world: &mut World, entity: Entity, fraction: f32) -> Result<f32, SimError> {
    let mut weapon = world
        .get_mut::<Weapon>(entity)
        .ok_or_else(|| SimError::missing_component(entity, "Weapon"))?;
    let ammo = weapon.set_ammo(fraction);
    world.trigger(AmmoChangedEvent { entity, ammo });
    Ok(ammo)
}
