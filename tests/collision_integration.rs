//! Collision scan and object registry integration tests.

use bevy_ecs::prelude::*;
use glam::Vec3;

use blinkstep::components::collision::{Collides, Contact};
use blinkstep::components::collisionzone::{CollisionZone, CollisionZones};
use blinkstep::components::integrator::MotionIntegrator;
use blinkstep::components::position::Position;
use blinkstep::components::rigidbody::RigidBody;
use blinkstep::resources::collisiondetector::CollisionDetector;
use blinkstep::resources::simconfig::SimConfig;
use blinkstep::resources::timerbus::{TickGroup, TimerBus};
use blinkstep::systems::collision::detect_collisions;
use blinkstep::systems::movement::movement;
use blinkstep::systems::time::update_time;
use blinkstep::systems::world::{add_object, attach_world_step, new_simulation, remove_object};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Resource, Debug, Default)]
struct Hits(Vec<Contact>);

fn make_world() -> World {
    let mut world = new_simulation(SimConfig::new());
    world.init_resource::<Hits>();
    world
}

fn record_hit(world: &mut World, contact: Contact) {
    world.resource_mut::<Hits>().0.push(contact);
}

fn zone(x: f32, y: f32, radius: f32) -> CollisionZone {
    CollisionZone::new(x, y, radius).unwrap()
}

fn hits(world: &World) -> &[Contact] {
    &world.resource::<Hits>().0
}

#[test]
fn overlap_resolves_from_both_sides() {
    let mut world = make_world();
    let a = add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 10.0)),
            Collides::new(record_hit),
        ),
    );
    let b = add_object(
        &mut world,
        (
            Position::new(5.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 10.0)),
            Collides::new(record_hit),
        ),
    );

    assert_eq!(detect_collisions(&mut world), 2);

    let pairs: Vec<_> = hits(&world).iter().map(|c| (c.entity, c.other)).collect();
    assert_eq!(pairs, vec![(a, b), (b, a)]);
}

#[test]
fn entity_without_capability_never_resolves() {
    let mut world = make_world();
    let resolver = add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 10.0)),
            Collides::new(record_hit),
        ),
    );
    let passive = add_object(
        &mut world,
        (
            Position::new(5.0, 5.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 10.0)),
        ),
    );

    assert_eq!(detect_collisions(&mut world), 1);
    assert_eq!(hits(&world)[0].entity, resolver);
    assert_eq!(hits(&world)[0].other, passive);
}

#[test]
fn first_overlapping_zone_pair_wins() {
    let mut world = make_world();
    let first = zone(0.0, 0.0, 10.0);
    let second = zone(2.0, 0.0, 10.0);
    add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(first).with(second),
            Collides::new(record_hit),
        ),
    );
    let target = zone(0.0, 0.0, 4.0);
    add_object(
        &mut world,
        (Position::new(6.0, 6.0, 0.0), CollisionZones::new().with(target)),
    );

    assert_eq!(detect_collisions(&mut world), 1);
    assert_eq!(hits(&world)[0].zone, first);
    assert_eq!(hits(&world)[0].other_zone, target);
}

#[test]
fn touching_zones_do_not_overlap() {
    let mut world = make_world();
    add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 1.0)),
            Collides::new(record_hit),
        ),
    );
    // Centers (1, 1) and (3, 1): distance equals the radius sum.
    add_object(
        &mut world,
        (
            Position::new(2.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 1.0)),
        ),
    );

    assert_eq!(detect_collisions(&mut world), 0);
}

#[test]
fn entity_with_empty_zone_list_never_collides() {
    let mut world = make_world();
    add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new(),
            Collides::new(record_hit),
        ),
    );
    add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 50.0)),
            Collides::new(record_hit),
        ),
    );

    assert_eq!(detect_collisions(&mut world), 0);
}

#[test]
fn non_positive_radius_is_rejected() {
    assert!(CollisionZone::new(0.0, 0.0, 0.0).is_err());
    assert!(CollisionZone::new(0.0, 0.0, -1.0).is_err());
    assert!(CollisionZone::new(0.0, 0.0, f32::NAN).is_err());
}

#[test]
fn register_and_unregister_are_idempotent() {
    let mut world = make_world();
    let entity = add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 1.0)),
        ),
    );
    let mut detector = world.resource_mut::<CollisionDetector>();
    detector.register(entity);
    assert_eq!(detector.len(), 1);
    detector.unregister(entity);
    detector.unregister(entity);
    assert!(detector.is_empty());
}

#[test]
fn removed_and_despawned_objects_are_skipped() {
    let mut world = make_world();
    let a = add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 10.0)),
            Collides::new(record_hit),
        ),
    );
    let b = add_object(
        &mut world,
        (
            Position::new(1.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 10.0)),
            Collides::new(record_hit),
        ),
    );

    assert!(remove_object(&mut world, a));
    assert!(!world.resource::<CollisionDetector>().is_tracked(a));
    assert!(!remove_object(&mut world, a));

    // Despawned behind the detector's back.
    world.despawn(b);
    assert_eq!(detect_collisions(&mut world), 0);
}

#[test]
fn objects_without_zones_are_not_tracked() {
    let mut world = make_world();
    let entity = add_object(&mut world, Position::new(0.0, 0.0, 0.0));
    assert!(!world.resource::<CollisionDetector>().is_tracked(entity));
}

#[test]
fn movement_uses_trapezoidal_rule() {
    let mut world = make_world();
    let entity = world
        .spawn((
            Position::new(0.0, 0.0, 0.0),
            RigidBody::with_velocity(Vec3::new(10.0, 0.0, 0.0)),
            MotionIntegrator::new(),
        ))
        .id();

    movement(&mut world, 0.5);
    assert!(approx_eq(world.get::<Position>(entity).unwrap().pos.x, 2.5));
    movement(&mut world, 0.5);
    assert!(approx_eq(world.get::<Position>(entity).unwrap().pos.x, 7.5));
}

#[test]
fn frozen_body_does_not_move() {
    let mut world = make_world();
    let mut body = RigidBody::with_velocity(Vec3::new(10.0, 0.0, 0.0));
    body.freeze();
    let entity = world
        .spawn((Position::new(1.0, 2.0, 3.0), body, MotionIntegrator::new()))
        .id();

    movement(&mut world, 1.0);

    assert_eq!(world.get::<Position>(entity).unwrap().pos, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn world_step_moves_then_collides() {
    let mut world = make_world();
    attach_world_step(&mut world).unwrap();
    let mover = add_object(
        &mut world,
        (
            Position::new(-30.0, 0.0, 0.0),
            RigidBody::with_velocity(Vec3::new(20.0, 0.0, 0.0)),
            MotionIntegrator::new(),
            CollisionZones::new().with(zone(0.0, 0.0, 5.0)),
            Collides::new(record_hit),
        ),
    );
    add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            CollisionZones::new().with(zone(0.0, 0.0, 5.0)),
        ),
    );

    // First step covers half the distance (previous sample is zero).
    update_time(&mut world, 1.0);
    assert!(approx_eq(world.get::<Position>(mover).unwrap().pos.x, -20.0));
    assert!(hits(&world).is_empty());

    update_time(&mut world, 1.0);
    assert!(approx_eq(world.get::<Position>(mover).unwrap().pos.x, 0.0));
    assert_eq!(hits(&world).len(), 1);

    // Paused world: no movement, no collisions.
    world.resource_mut::<TimerBus>().pause(TickGroup::World);
    update_time(&mut world, 1.0);
    assert!(approx_eq(world.get::<Position>(mover).unwrap().pos.x, 0.0));
    assert_eq!(hits(&world).len(), 1);
}
