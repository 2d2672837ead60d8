//! Read-only view of one frame, handed to whatever draws it.

use bevy::ecs::entity::Entity;
use bevy::math::{Rect, Vec2};

use crate::assets::AssetHandle;
use crate::core::GameState;

/// A tile placed on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDraw {
    pub image: AssetHandle,
    /// Screen-space rectangle, origin top-left
    pub rect: Rect,
}

/// An entity sprite placed on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub entity: Entity,
    pub image_key: String,
    pub rect: Rect,
    pub layer: i32,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLine {
    pub label: String,
    pub text: String,
}

/// Everything visible this frame, in screen coordinates.
///
/// Tiles come first in zone order; sprites are sorted by layer then entity so
/// the draw order is stable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderSnapshot {
    pub state: GameState,
    /// World position of the screen's top-left corner
    pub camera_offset: Vec2,
    pub viewport: Vec2,
    pub tiles: Vec<TileDraw>,
    pub sprites: Vec<SpriteDraw>,
    pub hud: Vec<HudLine>,
}

impl RenderSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.sprites.is_empty() && self.hud.is_empty()
    }

    /// HUD text for `label`, if shown.
    pub fn hud_text(&self, label: &str) -> Option<&str> {
        self.hud.iter().find(|line| line.label == label).map(|line| line.text.as_str())
    }
}
