//! Error types for entity operations.

use bevy::ecs::entity::Entity;
use thiserror::Error;

/// Errors raised when mutating entities through the [`EntityManager`](super::EntityManager).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EntityError {
    /// The entity was destroyed (or never existed in this registry).
    #[error("Invalid entity operation: {0:?} does not exist")]
    Missing(Entity),
    /// Every entity keeps its `Transform` and `Tag` until it is destroyed.
    #[error("Invalid entity operation: {1} cannot be removed from {0:?}")]
    Required(Entity, &'static str),
}
