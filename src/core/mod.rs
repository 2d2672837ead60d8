//! Core game module - game loop, states, events, and configuration.
//!
//! Everything here except [`CorePlugin`] runs without a bevy `App`.

mod config;
mod events;
mod game;
mod input;
mod plugin;
mod states;

pub use config::{ConfigError, GameConfig, WindowSettings};
pub use events::*;
pub use game::{GameContext, HUD_HEALTH, HUD_KILLS, HUD_ZONE};
pub use input::InputSnapshot;
pub use plugin::{capture_input, CoreSet, CorePlugin, Game};
pub use states::*;
