//! World module - zone templates, zone building, and chunk streaming.

mod builder;
mod camera;
mod chunk;
mod data;
mod error;
mod loader;
mod manager;
mod spawning;

pub use builder::{Tile, Zone, ZoneBuilder};
pub use camera::Camera;
pub use chunk::{ChunkCoord, ChunkManager};
pub use data::{DecorationSpawn, EnemySpawn, LootSpawn, TileDescriptor, ZoneTemplate, ZoneTemplateRaw};
pub use error::ZoneError;
pub use loader::ZoneTemplateLoader;
pub use manager::{StreamReport, WorldManager, WorldSettings, START_ZONE_TYPE};
pub use spawning::{despawn_zone_entities, spawn_zone_entities, ZoneMember};
