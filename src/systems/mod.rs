//! Simulation systems.
//!
//! Free functions taking `&mut World`, plus the observers they install.
//!
//! Submodules overview
//! - [`collision`] – pairwise zone scan and resolution callbacks
//! - [`health`] – damage, heal, kill and restore
//! - [`hud`] – meter fill animation and HUD observers
//! - [`level`] – death detection, delayed respawn and level end
//! - [`movement`] – integrate positions from rigid body velocities
//! - [`teleport`] – two-phase teleport driven by world ticks
//! - [`time`] – advance the clock and dispatch tick groups
//! - [`weapon`] – weapon equip and ammo changes
//! - [`world`] – session setup, object add/remove and the world step

pub mod collision;
pub mod health;
pub mod hud;
pub mod level;
pub mod movement;
pub mod teleport;
pub mod time;
pub mod weapon;
pub mod world;
