//! ECS components for simulated entities.
//!
//! Entities are plain bevy entities; their capabilities are optional
//! components queried by presence.
//!
//! Submodules overview:
//! - [`collision`] – collision-resolution capability and contact data
//! - [`collisionzone`] – circular collision zones and the zone-pair scan
//! - [`health`] – health fraction
//! - [`integrator`] – trapezoidal velocity integrator and its axis set
//! - [`position`] – world-space position
//! - [`rigidbody`] – velocity and frozen flag
//! - [`teleport`] – two-phase teleport state
//! - [`weapon`] – equipped weapon code and ammo fraction

pub mod collision;
pub mod collisionzone;
pub mod health;
pub mod integrator;
pub mod position;
pub mod rigidbody;
pub mod teleport;
pub mod weapon;
