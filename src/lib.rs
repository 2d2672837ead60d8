//! Zone Runner - a top-down 2D bullet hell in Bevy.
//!
//! The player fights through zones that stream in around the camera. Zones
//! are assembled from RON templates grouped by biome and zone type.
//!
//! # Architecture
//!
//! The simulation is a plain library object ([`core::GameContext`]) built on
//! a standalone ECS world. Bevy plugins wrap it to get a window:
//!
//! - **ECS**: Entity manager and gameplay components
//! - **Assets**: Asset manifest and key resolution
//! - **World**: Zone templates, zone building, chunk streaming, camera
//! - **Player**: Movement and firing
//! - **Enemies**: Definitions, AI, spawning
//! - **Combat**: Bullets and hit resolution
//! - **Core**: Game loop, states, events, config, and the bevy shell
//! - **Rendering**: Render snapshot and sprite drawing
//! - **UI**: Menus and HUD

pub mod assets;
pub mod combat;
pub mod core;
pub mod ecs;
pub mod enemies;
pub mod player;
pub mod rendering;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct ZoneRunnerPlugin;

impl Plugin for ZoneRunnerPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            // Rendering systems
            .add_plugins(rendering::RenderingPlugin)
            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
