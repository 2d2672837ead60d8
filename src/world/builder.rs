//! Zone construction from templates.

use bevy::ecs::entity::Entity;
use bevy::log::debug;
use bevy::math::{Rect, UVec2, Vec2};
use std::sync::Arc;

use super::chunk::ChunkCoord;
use super::data::ZoneTemplate;
use super::error::ZoneError;
use crate::assets::{AssetHandle, AssetResolver};

/// One placed tile. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    image: AssetHandle,
    rect: Rect,
    grid: UVec2,
}

impl Tile {
    pub fn image(&self) -> &AssetHandle {
        &self.image
    }

    /// World-space rectangle covered by the tile.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Cell inside the zone's grid.
    pub fn grid(&self) -> UVec2 {
        self.grid
    }
}

/// A template instantiated for one chunk.
#[derive(Debug)]
pub struct Zone {
    coord: ChunkCoord,
    bounds: Rect,
    template: Arc<ZoneTemplate>,
    tiles: Vec<Tile>,
    entities: Vec<Entity>,
    fallback: bool,
}

impl Zone {
    /// Zone with no content, used when a chunk's real zone fails to build.
    pub fn empty(coord: ChunkCoord, bounds: Rect) -> Self {
        Self {
            coord,
            bounds,
            template: Arc::new(ZoneTemplate::empty()),
            tiles: Vec::new(),
            entities: Vec::new(),
            fallback: true,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World-space area of the chunk this zone occupies.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn template(&self) -> &Arc<ZoneTemplate> {
        &self.template
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Entities spawned for this zone; they are despawned when it unloads.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub(crate) fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub(crate) fn take_entities(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.entities)
    }
}

/// Turns templates into zones at chunk positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBuilder {
    tile_size: f32,
    chunk_tiles: UVec2,
}

impl Default for ZoneBuilder {
    fn default() -> Self {
        Self::new(32.0, UVec2::splat(10))
    }
}

impl ZoneBuilder {
    pub fn new(tile_size: f32, chunk_tiles: UVec2) -> Self {
        Self {
            tile_size,
            chunk_tiles,
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Chunk size in pixels.
    pub fn chunk_size(&self) -> Vec2 {
        self.chunk_tiles.as_vec2() * self.tile_size
    }

    /// World position of a chunk's top-left corner.
    pub fn origin(&self, coord: ChunkCoord) -> Vec2 {
        Vec2::new(coord.x as f32, coord.y as f32) * self.chunk_size()
    }

    pub fn bounds(&self, coord: ChunkCoord) -> Rect {
        let origin = self.origin(coord);
        Rect::from_corners(origin, origin + self.chunk_size())
    }

    pub fn empty_zone(&self, coord: ChunkCoord) -> Zone {
        Zone::empty(coord, self.bounds(coord))
    }

    /// Build a zone's tiles. Fails as a whole if any tile image is unresolved.
    ///
    /// Entities are not spawned here; see [`spawn_zone_entities`](super::spawn_zone_entities).
    pub fn build_zone(
        &self,
        template: &Arc<ZoneTemplate>,
        coord: ChunkCoord,
        assets: &dyn AssetResolver,
    ) -> Result<Zone, ZoneError> {
        if template.width > self.chunk_tiles.x || template.height > self.chunk_tiles.y {
            return Err(ZoneError::Malformed {
                name: template.name.clone(),
                reason: format!(
                    "{}x{} tiles does not fit a {}x{} chunk",
                    template.width, template.height, self.chunk_tiles.x, self.chunk_tiles.y
                ),
            });
        }

        let origin = self.origin(coord);
        let size = Vec2::splat(self.tile_size);
        let tiles = template
            .tiles
            .iter()
            .map(|descriptor| -> Result<Tile, ZoneError> {
                let key = format!("tile.{}", descriptor.tile_type);
                let image = assets.resolve(&key).ok_or_else(|| ZoneError::AssetResolution {
                    key: key.clone(),
                    zone: template.name.clone(),
                    x: descriptor.x,
                    y: descriptor.y,
                })?;
                let min = origin + Vec2::new(descriptor.x as f32, descriptor.y as f32) * self.tile_size;
                Ok(Tile {
                    image,
                    rect: Rect::from_corners(min, min + size),
                    grid: UVec2::new(descriptor.x, descriptor.y),
                })
            })
            .collect::<Result<Vec<_>, ZoneError>>()?;

        debug!(
            "Built zone '{}' at chunk ({}, {}) with {} tiles",
            template.name,
            coord.x,
            coord.y,
            tiles.len()
        );

        Ok(Zone {
            coord,
            bounds: self.bounds(coord),
            template: Arc::clone(template),
            tiles,
            entities: Vec::new(),
            fallback: false,
        })
    }
}
