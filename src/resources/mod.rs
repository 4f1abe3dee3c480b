//! ECS resources of a simulation session.
//!
//! Every long-lived piece of shared state lives in the session's `World`:
//!
//! Overview
//! - `collisiondetector` – entities taking part in the pairwise scan
//! - `hud` – meter values, visibility and running fill animations
//! - `level` – player lifecycle state machine, lives and checkpoints
//! - `simconfig` – INI-backed settings
//! - `timerbus` – simulation clock and tick subscribers per group
pub mod collisiondetector;
pub mod hud;
pub mod level;
pub mod simconfig;
pub mod timerbus;
