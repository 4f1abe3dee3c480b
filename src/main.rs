//! Blinkstep headless runner.
//!
//! Runs a small scripted scenario on the simulation core and prints a
//! summary:
//!
//! - a player walks right through a hazard that drains its health
//! - two checkpoints; the second one becomes active once the player passes it
//! - the player picks up ammo at start, so the HUD ammo meter fills while
//!   world ticks are paused
//! - after every respawn the player starts walking again, until the lives
//!   run out and the level ends
//!
//! The timestep is jittered with a seeded RNG, so a given seed always
//! produces the same run.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --ticks 2000 --seed 7 --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec3;
use log::{error, info, warn};
use serde::Serialize;

use blinkstep::components::collision::{Collides, Contact};
use blinkstep::components::collisionzone::{CollisionZone, CollisionZones};
use blinkstep::components::health::Health;
use blinkstep::components::integrator::MotionIntegrator;
use blinkstep::components::position::Position;
use blinkstep::components::rigidbody::RigidBody;
use blinkstep::components::teleport::Teleport;
use blinkstep::components::weapon::Weapon;
use blinkstep::error::SimError;
use blinkstep::events::level::{LevelEndEvent, PlayerDeathEvent, PlayerResetEvent};
use blinkstep::resources::hud::{Hud, MeterKind};
use blinkstep::resources::level::{Level, LevelState};
use blinkstep::resources::simconfig::SimConfig;
use blinkstep::resources::timerbus::{Tick, TickGroup, TimerBus};
use blinkstep::systems::health::damage;
use blinkstep::systems::hud::attach_hud;
use blinkstep::systems::level::attach_level;
use blinkstep::systems::time::update_time;
use blinkstep::systems::weapon::{equip_weapon, set_ammo};
use blinkstep::systems::world::{add_object, attach_world_step, new_simulation};

const RUN_SPEED: f32 = 60.0;
const HAZARD_DAMAGE: f32 = 0.02;
const SECOND_CHECKPOINT_X: f32 = 200.0;

#[derive(Parser)]
#[command(version, about = "Headless runner for the blinkstep simulation core")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of steps to run.
    #[arg(long, default_value_t = 3000)]
    ticks: u32,

    /// Nominal timestep in seconds, overrides the config file.
    #[arg(long)]
    dt: Option<f32>,

    /// Seed of the timestep jitter.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Starting lives, overrides the config file.
    #[arg(long)]
    lives: Option<u32>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

/// Counters filled by observers during the run.
#[derive(Resource, Debug, Default)]
struct RunLog {
    deaths: u32,
    resets: u32,
    ended_at: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Summary {
    steps: u32,
    total_time: f32,
    world_time: f32,
    state: LevelState,
    lives: u32,
    deaths: u32,
    resets: u32,
    ended_at: Option<f32>,
    player_position: [f32; 3],
    health: f32,
    hud_health_percent: f32,
    hud_ammo_percent: f32,
    faults: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, config) {
        Ok(summary) => {
            print_summary(&summary, cli.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<SimConfig, SimError> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = SimConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => SimConfig::new(),
    };
    if let Some(dt) = cli.dt {
        config.dt = dt;
        config.dt_jitter = config.dt_jitter.min(dt * 0.5);
    }
    if let Some(lives) = cli.lives {
        config.lives = lives;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, config: SimConfig) -> Result<Summary, SimError> {
    let (dt, jitter) = (config.dt, config.dt_jitter);
    let mut world = new_simulation(config);
    world.init_resource::<RunLog>();

    let player = add_object(
        &mut world,
        (
            Position::new(0.0, 0.0, 0.0),
            RigidBody::with_velocity(Vec3::new(RUN_SPEED, 0.0, 0.0)),
            MotionIntegrator::new(),
            CollisionZones::new().with(CollisionZone::new(0.0, 0.0, 16.0)?),
            Health::full(),
            Teleport::new(),
        ),
    );
    add_object(
        &mut world,
        (
            Position::new(300.0, 0.0, 0.0),
            CollisionZones::new().with(CollisionZone::new(0.0, 0.0, 24.0)?),
            Collides::new(hazard_touch),
        ),
    );

    {
        let mut level = world.resource_mut::<Level>();
        level.player.character = Some(player);
        level.add_check_point(0.0, 0.0, 0.0);
        level.add_check_point(SECOND_CHECKPOINT_X, 0.0, 0.0);
        level.set_check_point_index(0);
    }

    attach_world_step(&mut world)?;
    attach_level(&mut world)?;
    attach_hud(&mut world, player);
    world.resource_mut::<Hud>().show();
    world.resource_mut::<TimerBus>().bind(TickGroup::World, move |world, tick| {
        checkpoint_watch(world, tick, player)
    });

    world.add_observer(log_death);
    world.add_observer(log_reset);
    world.add_observer(log_level_end);
    world.add_observer(|trigger: On<PlayerResetEvent>, mut bodies: Query<&mut RigidBody>| {
        if let Ok(mut body) = bodies.get_mut(trigger.event().entity) {
            body.set_velocity(Vec3::new(RUN_SPEED, 0.0, 0.0));
        }
    });

    equip_weapon(&mut world, player, Weapon::new("blaster", 0.25))?;
    set_ammo(&mut world, player, 1.0)?;

    let mut rng = fastrand::Rng::with_seed(cli.seed);
    let mut faults = 0;
    let mut steps = 0;
    for _ in 0..cli.ticks {
        let step = dt + (rng.f32() * 2.0 - 1.0) * jitter;
        faults += update_time(&mut world, step).len();
        steps += 1;
        if world.resource::<Level>().state() == LevelState::Ended {
            break;
        }
    }
    if faults > 0 {
        warn!("{faults} tick callback faults during the run");
    }

    let bus = world.resource::<TimerBus>();
    let level = world.resource::<Level>();
    let hud = world.resource::<Hud>();
    let log = world.resource::<RunLog>();
    let position = world
        .get::<Position>(player)
        .map(|p| p.pos)
        .unwrap_or_default();
    let health = world
        .get::<Health>(player)
        .map(|h| h.fraction())
        .unwrap_or_default();
    Ok(Summary {
        steps,
        total_time: bus.total_elapsed(),
        world_time: bus.elapsed(TickGroup::World),
        state: level.state(),
        lives: level.player.lives,
        deaths: log.deaths,
        resets: log.resets,
        ended_at: log.ended_at,
        player_position: position.to_array(),
        health,
        hud_health_percent: hud.meter(MeterKind::Health).fill_percent(),
        hud_ammo_percent: hud.meter(MeterKind::Ammo).fill_percent(),
        faults,
    })
}

/// Hazard resolution: drain the health of whatever touches it.
fn hazard_touch(world: &mut World, contact: Contact) {
    if world.get::<Health>(contact.other).is_none() {
        return;
    }
    if let Err(e) = damage(world, contact.other, HAZARD_DAMAGE) {
        warn!("Hazard could not damage {}: {e}", contact.other);
    }
}

/// Activate the second checkpoint once the player walks past it.
fn checkpoint_watch(world: &mut World, _tick: Tick, player: Entity) -> Result<(), SimError> {
    let x = world
        .get::<Position>(player)
        .ok_or(SimError::NoSuchEntity(player))?
        .pos
        .x;
    let mut level = world
        .get_resource_mut::<Level>()
        .ok_or(SimError::MissingResource("Level"))?;
    if x >= SECOND_CHECKPOINT_X && level.check_point_index() == 0 {
        level.set_check_point_index(1);
        info!("Checkpoint 1 reached");
    }
    Ok(())
}

fn log_death(trigger: On<PlayerDeathEvent>, mut log: ResMut<RunLog>) {
    log.deaths += 1;
    info!("Player down, {} lives left", trigger.event().lives);
}

fn log_reset(_trigger: On<PlayerResetEvent>, mut log: ResMut<RunLog>) {
    log.resets += 1;
}

fn log_level_end(trigger: On<LevelEndEvent>, mut log: ResMut<RunLog>) {
    log.ended_at = Some(trigger.event().elapsed);
    info!("Level over after {:.2}s of world time", trigger.event().elapsed);
}

fn print_summary(summary: &Summary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{text}"),
            Err(e) => error!("Failed to serialize summary: {e}"),
        }
        return;
    }
    println!("steps:        {}", summary.steps);
    println!(
        "time:         {:.3}s total, {:.3}s world",
        summary.total_time, summary.world_time
    );
    println!("level:        {:?}", summary.state);
    println!(
        "lives:        {} ({} deaths, {} resets)",
        summary.lives, summary.deaths, summary.resets
    );
    let [x, y, z] = summary.player_position;
    println!("player:       ({x:.1}, {y:.1}, {z:.1}), health {:.2}", summary.health);
    println!(
        "hud:          health {:.1}%, ammo {:.1}%",
        summary.hud_health_percent, summary.hud_ammo_percent
    );
    if summary.faults > 0 {
        println!("faults:       {}", summary.faults);
    }
}
