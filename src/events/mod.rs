//! Event types exchanged between the simulation components.
//!
//! Events are triggered synchronously with `World::trigger`, so observers run
//! before the triggering call returns and their effects are visible to the
//! rest of the tick.
//!
//! Submodules:
//! - [`health`] – health changed notifications
//! - [`level`] – player death, player reset and level end
//! - [`teleport`] – teleport start/end
//! - [`weapon`] – weapon equip and ammo changes
pub mod health;
pub mod level;
pub mod teleport;
pub mod weapon;
