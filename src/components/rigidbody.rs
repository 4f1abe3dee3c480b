//! Kinematic body component.
//!
//! The [`RigidBody`] component stores the current velocity of an entity. The
//! velocity is consumed each world tick by the
//! [`movement`](crate::systems::movement::movement) system, which feeds it to
//! the entity's [`MotionIntegrator`](super::integrator::MotionIntegrator).
//!
//! The `frozen` flag allows temporarily disabling movement, useful when an
//! entity's position is controlled externally (e.g., while blinking during a
//! teleport).

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Kinematic body storing velocity in world units per second.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::with_velocity(Vec3::new(120.0, 0.0, 0.0));
/// rb.set_velocity(Vec3::new(0.0, -30.0, 0.0));
///
/// // Stop integrating while something else owns the position
/// rb.freeze();
/// ```
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vec3,
    /// When true, the movement system skips this entity.
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a RigidBody at rest.
    pub fn new() -> Self {
        Self {
            velocity: Vec3::ZERO,
            frozen: false,
        }
    }

    /// Create a RigidBody moving with the given velocity.
    pub fn with_velocity(velocity: Vec3) -> Self {
        Self {
            velocity,
            frozen: false,
        }
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Freeze the body, preventing the movement system from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unfreeze the body, allowing the movement system to update it.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
