//! Trapezoidal velocity integrator.
//!
//! [`MotionIntegrator`] turns a velocity sample into a position change by
//! averaging it with the sample from the previous tick:
//!
//! ```text
//! position[axis] += 0.5 * (previous[axis] + velocity[axis]) * dt
//! previous[axis]  = velocity[axis]
//! ```
//!
//! Compared to forward Euler this smooths out abrupt velocity changes under a
//! variable timestep. The stored sample must be cleared with
//! [`MotionIntegrator::reset`] whenever the position jumps (teleport),
//! otherwise the next step blends a stale velocity across the jump.

use bevy_ecs::prelude::Component;
use bitflags::bitflags;
use glam::Vec3;

bitflags! {
    /// Set of axes an integrator writes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Axes: u8 {
        const X = 0b001;
        const Y = 0b010;
        const Z = 0b100;
    }
}

impl Default for Axes {
    fn default() -> Self {
        Axes::all()
    }
}

const AXIS_INDEX: [(Axes, usize); 3] = [(Axes::X, 0), (Axes::Y, 1), (Axes::Z, 2)];

/// Per-entity integrator state: previous velocity sample and active axes.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct MotionIntegrator {
    previous: Vec3,
    axes: Axes,
}

impl MotionIntegrator {
    /// Integrator over all three axes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrator restricted to the given axes.
    pub fn with_axes(axes: Axes) -> Self {
        Self {
            previous: Vec3::ZERO,
            axes,
        }
    }

    pub fn axes(&self) -> Axes {
        self.axes
    }

    /// Velocity sample stored by the last [`integrate`](Self::integrate) call.
    pub fn previous_velocity(&self) -> Vec3 {
        self.previous
    }

    /// Advance `position` in place along every active axis.
    pub fn integrate(&mut self, position: &mut Vec3, velocity: Vec3, dt: f32) {
        for (axis, i) in AXIS_INDEX {
            if !self.axes.contains(axis) {
                continue;
            }
            position[i] += (self.previous[i] + velocity[i]) * 0.5 * dt;
            self.previous[i] = velocity[i];
        }
    }

    /// Forget the stored velocity sample.
    pub fn reset(&mut self) {
        self.previous = Vec3::ZERO;
    }
}
