//! Simulation configuration resource.
//!
//! Settings loaded from an INI file. Every key is optional; missing keys keep
//! their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [level]
//! reset_delay = 4.0
//! ready_blink_time = 0.5
//! lives = 3
//! checkpoint_offset_x = 0.0
//! checkpoint_offset_y = 200.0
//! checkpoint_offset_z = 0.0
//!
//! [hud]
//! fill_speed = 1.0
//!
//! [simulation]
//! dt = 0.016
//! dt_jitter = 0.004
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec3;
use log::info;

use crate::error::SimError;
use crate::resources::hud::DEFAULT_FILL_SPEED;
use crate::resources::level::{DEFAULT_LIVES, DEFAULT_READY_BLINK_TIME, DEFAULT_RESET_DELAY};

const DEFAULT_DT: f32 = 1.0 / 60.0;
const DEFAULT_DT_JITTER: f32 = 0.002;
const DEFAULT_CONFIG_PATH: &str = "./blinkstep.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Seconds of world time between a death and the respawn.
    pub reset_delay: f32,
    /// Blink delay of the respawn teleport.
    pub ready_blink_time: f32,
    pub lives: u32,
    /// Added to the checkpoint position when respawning.
    pub checkpoint_offset: Vec3,
    /// HUD meter fill speed, fraction per second.
    pub fill_speed: f32,
    /// Nominal timestep of the runner.
    pub dt: f32,
    /// Maximum random deviation from `dt` per step.
    pub dt_jitter: f32,
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
            ready_blink_time: DEFAULT_READY_BLINK_TIME,
            lives: DEFAULT_LIVES,
            checkpoint_offset: Vec3::ZERO,
            fill_speed: DEFAULT_FILL_SPEED,
            dt: DEFAULT_DT,
            dt_jitter: DEFAULT_DT_JITTER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from the INI file at `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), SimError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| SimError::ConfigFile(format!("Failed to load config file: {}", e)))?;
        self.apply(&config)?;
        info!("Loaded config from {:?}", self.config_path);
        Ok(())
    }

    /// Load values from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), SimError> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| SimError::ConfigFile(format!("Failed to parse config: {}", e)))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), SimError> {
        let float = |section: &str, key: &str| -> Result<Option<f32>, SimError> {
            config
                .getfloat(section, key)
                .map(|v| v.map(|v| v as f32))
                .map_err(|e| SimError::ConfigFile(format!("[{section}] {key}: {e}")))
        };

        // [level] section
        if let Some(delay) = float("level", "reset_delay")? {
            self.reset_delay = delay;
        }
        if let Some(blink) = float("level", "ready_blink_time")? {
            self.ready_blink_time = blink;
        }
        if let Some(lives) = config
            .getuint("level", "lives")
            .map_err(|e| SimError::ConfigFile(format!("[level] lives: {e}")))?
        {
            self.lives = u32::try_from(lives)
                .map_err(|_| SimError::ConfigFile(format!("[level] lives out of range: {lives}")))?;
        }
        if let Some(x) = float("level", "checkpoint_offset_x")? {
            self.checkpoint_offset.x = x;
        }
        if let Some(y) = float("level", "checkpoint_offset_y")? {
            self.checkpoint_offset.y = y;
        }
        if let Some(z) = float("level", "checkpoint_offset_z")? {
            self.checkpoint_offset.z = z;
        }

        // [hud] section
        if let Some(speed) = float("hud", "fill_speed")? {
            self.fill_speed = speed;
        }

        // [simulation] section
        if let Some(dt) = float("simulation", "dt")? {
            self.dt = dt;
        }
        if let Some(jitter) = float("simulation", "dt_jitter")? {
            self.dt_jitter = jitter;
        }

        self.validate()
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::Configuration(format!("dt must be positive, got {}", self.dt)));
        }
        if self.dt_jitter < 0.0 || self.dt_jitter >= self.dt {
            return Err(SimError::Configuration(format!(
                "dt_jitter must be in [0, dt), got {}",
                self.dt_jitter
            )));
        }
        if self.reset_delay < 0.0 || self.ready_blink_time < 0.0 {
            return Err(SimError::Configuration("delays must not be negative".into()));
        }
        if self.fill_speed <= 0.0 {
            return Err(SimError::Configuration(format!(
                "fill_speed must be positive, got {}",
                self.fill_speed
            )));
        }
        Ok(())
    }

    /// Save configuration to the INI file at `config_path`.
    pub fn save_to_file(&self) -> Result<(), SimError> {
        let mut config = Ini::new();

        // [level] section
        config.set("level", "reset_delay", Some(self.reset_delay.to_string()));
        config.set("level", "ready_blink_time", Some(self.ready_blink_time.to_string()));
        config.set("level", "lives", Some(self.lives.to_string()));
        config.set("level", "checkpoint_offset_x", Some(self.checkpoint_offset.x.to_string()));
        config.set("level", "checkpoint_offset_y", Some(self.checkpoint_offset.y.to_string()));
        config.set("level", "checkpoint_offset_z", Some(self.checkpoint_offset.z.to_string()));

        // [hud] section
        config.set("hud", "fill_speed", Some(self.fill_speed.to_string()));

        // [simulation] section
        config.set("simulation", "dt", Some(self.dt.to_string()));
        config.set("simulation", "dt_jitter", Some(self.dt_jitter.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| SimError::ConfigFile(format!("Failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }
}
