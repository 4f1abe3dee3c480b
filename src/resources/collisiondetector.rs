//! Registry of entities taking part in collision detection.
//!
//! The detector is a plain pairwise scan meant for small object counts; see
//! [`crate::systems::collision::detect_collisions`]. Registration order is
//! the scan order.

use bevy_ecs::prelude::{Entity, Resource};
use log::debug;

#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionDetector {
    tracked: Vec<Entity>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an entity. Registering twice keeps a single entry.
    pub fn register(&mut self, entity: Entity) {
        if self.tracked.contains(&entity) {
            return;
        }
        debug!("Collision detector tracking {entity}");
        self.tracked.push(entity);
    }

    /// Stop tracking an entity. Unknown entities are ignored.
    pub fn unregister(&mut self, entity: Entity) {
        if let Some(index) = self.tracked.iter().position(|e| *e == entity) {
            debug!("Collision detector dropping {entity}");
            self.tracked.remove(index);
        }
    }

    pub fn is_tracked(&self, entity: Entity) -> bool {
        self.tracked.contains(&entity)
    }

    pub fn tracked(&self) -> &[Entity] {
        &self.tracked
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::World;

    #[test]
    fn test_register_is_idempotent() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut detector = CollisionDetector::new();
        detector.register(e);
        detector.register(e);
        assert_eq!(detector.len(), 1);
        assert!(detector.is_tracked(e));
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut detector = CollisionDetector::new();
        detector.register(a);
        detector.unregister(b);
        detector.unregister(a);
        detector.unregister(a);
        assert!(detector.is_empty());
    }
}
