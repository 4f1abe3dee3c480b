//! Health capability.
//!
//! Health is stored as a fraction in `[0, 1]`. Changes go through the
//! functions in [`crate::systems::health`], which clamp the value and trigger
//! a [`HealthChangedEvent`](crate::events::health::HealthChangedEvent) so the
//! level and the HUD can react.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Health {
    fraction: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::full()
    }
}

impl Health {
    pub fn full() -> Self {
        Self { fraction: 1.0 }
    }

    pub fn with_fraction(fraction: f32) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn is_depleted(&self) -> bool {
        self.fraction <= 0.0
    }

    /// Set the fraction, clamped to `[0, 1]`. Returns the stored value.
    pub fn set(&mut self, fraction: f32) -> f32 {
        self.fraction = fraction.clamp(0.0, 1.0);
        self.fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_clamps() {
        let mut health = Health::full();
        assert_eq!(health.set(1.5), 1.0);
        assert_eq!(health.set(-0.2), 0.0);
        assert!(health.is_depleted());
        assert_eq!(Health::with_fraction(2.0).fraction(), 1.0);
    }
}
