//! Gameplay events produced by a frame of simulation.
//!
//! The core returns these from [`GameContext::tick`](super::GameContext::tick) in a
//! [`FrameReport`]; the bevy shell forwards them as regular bevy events so
//! other plugins can react without touching the core.

use bevy::ecs::entity::Entity;
use bevy::math::Vec2;
use bevy::prelude::Event;

use super::states::Transition;
use crate::ecs::Rarity;
use crate::world::{ChunkCoord, StreamReport};

/// How a hit was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    /// A bullet overlapped an opposing target
    Bullet,
    /// An enemy body touched the player
    Contact,
}

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HitEvent {
    /// Bullet or enemy that caused the hit
    pub source: Entity,
    /// Entity receiving damage
    pub target: Entity,
    /// Damage actually removed (0 while invincible)
    pub damage: f32,
    pub kind: HitKind,
}

/// Sent when an enemy is removed after its health reached zero.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DeathEvent {
    pub entity: Entity,
    /// Enemy kind, e.g. `grunt`
    pub kind: String,
    /// Where it died, for effects or drops
    pub position: Vec2,
}

/// Sent when the player walks over a loot item and collects it.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PickupEvent {
    /// The loot entity, already destroyed
    pub loot: Entity,
    /// Loot kind, e.g. `potion`
    pub kind: String,
    pub rarity: Rarity,
    /// Health actually restored
    pub healed: f32,
}

/// Sent when streaming installs or removes a chunk.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkEvent {
    Loaded(ChunkCoord),
    Unloaded(ChunkCoord),
    /// Build failed and the empty zone was installed
    Failed(ChunkCoord),
}

/// Everything notable that happened during one tick.
#[derive(Debug, Default)]
pub struct FrameReport {
    pub transitions: Vec<Transition>,
    pub hits: Vec<HitEvent>,
    pub deaths: Vec<DeathEvent>,
    pub pickups: Vec<PickupEvent>,
    pub streaming: StreamReport,
    pub bullets_fired: usize,
    pub bullets_expired: usize,
    /// The player died and the run restarted this frame
    pub player_died: bool,
}

impl FrameReport {
    /// Streaming changes flattened into chunk events.
    pub fn chunk_events(&self) -> Vec<ChunkEvent> {
        let mut events: Vec<ChunkEvent> = self
            .streaming
            .deactivated
            .iter()
            .map(|&c| ChunkEvent::Unloaded(c))
            .collect();
        events.extend(self.streaming.activated.iter().map(|&c| ChunkEvent::Loaded(c)));
        events.extend(self.streaming.failed.iter().map(|(c, _)| ChunkEvent::Failed(*c)));
        events
    }
}
