//! Circular collision zones attached to an entity.
//!
//! A [`CollisionZone`] is a planar circle placed at a local `(x, y)` offset
//! from the owning entity's [`Position`](super::position::Position). An
//! entity may carry several zones (e.g. a body and a hitbox) through the
//! [`CollisionZones`] component; an entity with no zones never collides.
//!
//! The zone center used by the detector folds the radius into the offset:
//!
//! ```text
//! center = position.xy + offset + radius
//! ```
//!
//! Two zones overlap when the distance between their centers is strictly
//! less than the sum of their radii.

use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::error::SimError;

/// A circle at a local offset. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionZone {
    offset: Vec2,
    radius: f32,
}

impl CollisionZone {
    /// Build a zone, rejecting non-positive (or NaN) radii.
    pub fn new(x: f32, y: f32, radius: f32) -> Result<Self, SimError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(SimError::Configuration(format!(
                "collision zone radius must be positive, got {radius}"
            )));
        }
        Ok(Self {
            offset: Vec2::new(x, y),
            radius,
        })
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Zone center for an owner at `position`.
    pub fn center(&self, position: Vec3) -> Vec2 {
        position.truncate() + self.offset + Vec2::splat(self.radius)
    }

    /// Overlap test against another zone owned by an entity at `other_position`.
    pub fn overlaps(&self, position: Vec3, other: &Self, other_position: Vec3) -> bool {
        let distance = self.center(position).distance(other.center(other_position));
        distance < self.radius + other.radius
    }
}

/// Ordered zone list of an entity.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct CollisionZones(SmallVec<[CollisionZone; 2]>);

impl CollisionZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone (builder pattern).
    pub fn with(mut self, zone: CollisionZone) -> Self {
        self.0.push(zone);
        self
    }

    pub fn push(&mut self, zone: CollisionZone) {
        self.0.push(zone);
    }

    pub fn as_slice(&self) -> &[CollisionZone] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CollisionZone> for CollisionZones {
    fn from_iter<I: IntoIterator<Item = CollisionZone>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// First overlapping zone pair between two zone lists, scanning `zones_a`
/// in order against `zones_b` in order.
pub fn find_zones(
    position_a: Vec3,
    zones_a: &[CollisionZone],
    position_b: Vec3,
    zones_b: &[CollisionZone],
) -> Option<(CollisionZone, CollisionZone)> {
    for zone_a in zones_a {
        for zone_b in zones_b {
            if zone_a.overlaps(position_a, zone_b, position_b) {
                return Some((*zone_a, *zone_b));
            }
        }
    }
    None
}
