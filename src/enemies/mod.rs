//! Enemies module - enemy definitions, AI, and spawning.

pub mod ai;
pub mod data;
mod manager;
mod spawning;

pub use data::{EnemyDefinition, EnemyRegistry};
pub use manager::EnemyManager;
pub use spawning::spawn_enemy;
