//! Blinkstep simulation core.
//!
//! A deterministic, tick-driven core for a side-scrolling action game:
//! circular collision zones, trapezoidal motion integration, a grouped timer
//! bus with per-group pause, the player lifecycle (death, delayed respawn at
//! checkpoints, level end) and animated HUD meters.
//!
//! A session is a `bevy_ecs::World` built with
//! [`systems::world::new_simulation`] and driven by calling
//! [`systems::time::update_time`] once per frame.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
