//! ECS module - entity registry and the component data every system runs on.
//!
//! Entities and component storage come from `bevy_ecs`; the [`EntityManager`]
//! wraps a standalone `World` so gameplay code can be driven (and tested)
//! without an `App`.

mod components;
mod error;
mod manager;

pub use components::*;
pub use error::EntityError;
pub use manager::EntityManager;
