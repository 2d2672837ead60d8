//! Player module - avatar spawning, movement, and firing.

mod components;
mod movement;

pub use components::PlayerConfig;
pub use movement::{spawn_player, update_player};
