//! Velocity integration for every moving entity.

use bevy_ecs::prelude::*;

use crate::components::integrator::MotionIntegrator;
use crate::components::position::Position;
use crate::components::rigidbody::RigidBody;

/// Integrate positions from rigid body velocities over `dt` seconds.
///
/// Frozen bodies are skipped; their integrator keeps its previous sample.
pub fn movement(world: &mut World, dt: f32) {
    let mut query = world.query::<(&mut Position, &RigidBody, &mut MotionIntegrator)>();
    for (mut position, rigidbody, mut integrator) in query.iter_mut(world) {
        if rigidbody.frozen {
            continue;
        }
        let velocity = rigidbody.velocity;
        integrator.integrate(&mut position.pos, velocity, dt);
    }
}

/// Move an entity discontinuously and clear its integrator sample.
///
/// Returns `false` if the entity has no [`Position`].
pub fn set_position(world: &mut World, entity: Entity, pos: glam::Vec3) -> bool {
    let Some(mut position) = world.get_mut::<Position>(entity) else {
        return false;
    };
    position.pos = pos;
    if let Some(mut integrator) = world.get_mut::<MotionIntegrator>(entity) {
        integrator.reset();
    }
    true
}
