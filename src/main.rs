//! Zone Runner - Entry Point
//!
//! Controls:
//! - WASD / Arrows: Move
//! - Space: Fire
//! - Enter: Start
//! - Escape: Pause/Unpause
//! - Q: Quit to menu (while paused)

use bevy::prelude::*;
use zone_runner::core::GameConfig;

fn main() {
    // Logging starts with DefaultPlugins; the game reloads and reports the config at startup
    let window = GameConfig::read().map(|config| config.window).unwrap_or_default();

    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title,
                resolution: (window.width, window.height).into(),
                ..default()
            }),
            ..default()
        }))
        // Our game plugin
        .add_plugins(zone_runner::ZoneRunnerPlugin)
        .run();
}
