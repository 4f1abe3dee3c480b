//! Error taxonomy for the simulation core.
//!
//! Every fallible operation returns [`SimError`]. Setup mistakes surface as
//! [`SimError::Configuration`], illegal lifecycle requests as
//! [`SimError::InvalidState`], and failures raised inside timer subscribers
//! are wrapped into [`SimError::CallbackFault`] by the dispatcher so the rest
//! of the tick can still run.

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::resources::timerbus::BindingId;

/// Errors produced by the simulation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid setup: missing checkpoints, non-positive zone radius, ...
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A transition was requested from a state that does not permit it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A timer subscriber failed during dispatch.
    #[error("Callback {binding} failed: {message}")]
    CallbackFault { binding: BindingId, message: String },

    /// A resource the operation depends on is not present in the world.
    #[error("Missing resource: {0}")]
    MissingResource(&'static str),

    /// The entity does not exist (or was despawned).
    #[error("Entity {0} does not exist")]
    NoSuchEntity(Entity),

    /// An entity lacks a component the operation depends on.
    #[error("Entity {entity} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// The INI configuration file could not be read or written.
    #[error("Config file error: {0}")]
    ConfigFile(String),
}

impl SimError {
    pub(crate) fn missing_component(entity: Entity, component: &'static str) -> Self {
        SimError::MissingComponent { entity, component }
    }
}
