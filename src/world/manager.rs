//! Camera-driven zone streaming.

use bevy::log::{error, info};
use bevy::math::{UVec2, Vec2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use super::builder::{Zone, ZoneBuilder};
use super::chunk::{ChunkCoord, ChunkManager};
use super::error::ZoneError;
use super::loader::ZoneTemplateLoader;
use super::spawning::{despawn_zone_entities, spawn_zone_entities};
use crate::assets::AssetCatalog;
use crate::ecs::EntityManager;
use crate::enemies::EnemyRegistry;

/// Zone type reserved for the starting chunk; never picked at random.
pub const START_ZONE_TYPE: &str = "start";

/// World generation settings, part of the game config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub seed: u64,
    /// Template used for chunk (0, 0)
    pub start_template: String,
    /// Chunks kept active around the camera, in rings
    pub load_radius: u32,
    pub tile_size: f32,
    /// Chunk size in tiles
    pub chunk_tiles: (u32, u32),
    /// Root of the `<biome>/<zone_type>/<name>.zone.ron` tree
    pub zones_dir: String,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            start_template: "starting_zone".to_string(),
            load_radius: 1,
            tile_size: 32.0,
            chunk_tiles: (10, 10),
            zones_dir: "assets/data/zones".to_string(),
        }
    }
}

/// What one streaming pass changed.
#[derive(Debug, Default, PartialEq)]
pub struct StreamReport {
    /// Chunks that received their real zone
    pub activated: Vec<ChunkCoord>,
    pub deactivated: Vec<ChunkCoord>,
    /// Chunks whose build failed; each now holds the empty zone
    pub failed: Vec<(ChunkCoord, ZoneError)>,
}

impl StreamReport {
    pub fn is_empty(&self) -> bool {
        self.activated.is_empty() && self.deactivated.is_empty() && self.failed.is_empty()
    }
}

/// Keeps the chunks around the camera populated with zones.
pub struct WorldManager {
    loader: ZoneTemplateLoader,
    builder: ZoneBuilder,
    chunks: ChunkManager,
    catalog: AssetCatalog,
    seed: u64,
    start_template: String,
}

impl WorldManager {
    pub fn new(loader: ZoneTemplateLoader, catalog: AssetCatalog, settings: &WorldSettings) -> Self {
        let builder = ZoneBuilder::new(
            settings.tile_size,
            UVec2::new(settings.chunk_tiles.0, settings.chunk_tiles.1),
        );
        Self {
            chunks: ChunkManager::new(builder.chunk_size(), settings.load_radius),
            loader,
            builder,
            catalog,
            seed: settings.seed,
            start_template: settings.start_template.clone(),
        }
    }

    /// Scan `settings.zones_dir` and build a manager over the result.
    pub fn load(catalog: AssetCatalog, settings: &WorldSettings) -> Self {
        let mut loader = ZoneTemplateLoader::new();
        loader.scan(&settings.zones_dir);
        if !loader.contains(&settings.start_template) {
            error!("Start template '{}' is not among the loaded zones", settings.start_template);
        }
        Self::new(loader, catalog, settings)
    }

    /// Unload chunks that left the load radius, then activate the missing ones nearest-first.
    pub fn update(&mut self, camera: Vec2, entities: &mut EntityManager, registry: &EnemyRegistry) -> StreamReport {
        let mut report = StreamReport::default();
        let required = self.chunks.required_chunks(camera);

        for coord in self.chunks.stale_chunks(&required) {
            if let Some(mut zone) = self.chunks.deactivate(coord) {
                despawn_zone_entities(&mut zone, entities);
                report.deactivated.push(coord);
            }
        }

        for coord in required {
            match self.activate_chunk(coord, entities, registry) {
                Ok(true) => report.activated.push(coord),
                Ok(false) => {}
                Err(e) => report.failed.push((coord, e)),
            }
        }

        if !report.is_empty() {
            info!(
                "Streaming: {} loaded, {} unloaded, {} failed, {} active",
                report.activated.len(),
                report.deactivated.len(),
                report.failed.len(),
                self.chunks.len()
            );
        }
        report
    }

    /// Activate one chunk.
    ///
    /// `Ok(true)` when a zone was built, `Ok(false)` when the chunk was already
    /// active. On `Err` the chunk is active with the empty zone.
    pub fn activate_chunk(
        &mut self,
        coord: ChunkCoord,
        entities: &mut EntityManager,
        registry: &EnemyRegistry,
    ) -> Result<bool, ZoneError> {
        let Self {
            loader,
            builder,
            chunks,
            catalog,
            seed,
            start_template,
        } = self;

        let built = chunks.ensure_active(coord, |coord| -> Result<Zone, ZoneError> {
            let name = select_template(loader, *seed, start_template.as_str(), coord)?;
            let template = loader.load_template(&name)?;
            let mut zone = builder.build_zone(&template, coord, &*catalog)?;
            spawn_zone_entities(&mut zone, entities, registry);
            Ok(zone)
        });

        if let Err(e) = &built {
            error!("Chunk ({}, {}) failed to build, using empty zone: {}", coord.x, coord.y, e);
            chunks.install_fallback(coord, builder.empty_zone(coord));
        }
        built
    }

    /// Zone under a world position, if its chunk is active.
    pub fn zone_at(&self, position: Vec2) -> Option<&Zone> {
        self.chunks.get(self.chunks.coord_for(position))
    }

    pub fn active_zones(&self) -> impl Iterator<Item = &Zone> {
        self.chunks.active_zones()
    }

    pub fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    pub fn loader(&self) -> &ZoneTemplateLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut ZoneTemplateLoader {
        &mut self.loader
    }

    pub fn builder(&self) -> &ZoneBuilder {
        &self.builder
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Unload every chunk and despawn its entities.
    pub fn clear(&mut self, entities: &mut EntityManager) {
        for mut zone in self.chunks.clear() {
            despawn_zone_entities(&mut zone, entities);
        }
    }
}

/// Per-chunk RNG: the same seed and coord always pick the same template.
fn chunk_rng(seed: u64, coord: ChunkCoord) -> StdRng {
    let x = (coord.x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let y = (coord.y as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    StdRng::seed_from_u64(seed ^ x ^ y.rotate_left(31))
}

fn select_template(
    loader: &ZoneTemplateLoader,
    seed: u64,
    start_template: &str,
    coord: ChunkCoord,
) -> Result<String, ZoneError> {
    if coord == ChunkCoord::ORIGIN {
        return Ok(start_template.to_string());
    }

    let mut rng = chunk_rng(seed, coord);
    let biomes = loader.biomes();
    let Some(biome) = biomes.choose(&mut rng) else {
        return Err(ZoneError::TemplateNotFound("<no biomes indexed>".to_string()));
    };
    let zone_type = if coord.ring() <= 1 { "early" } else { "challenge" };

    loader
        .random_template(biome, zone_type, &mut rng)
        .or_else(|| loader.random_in_biome(biome, &mut rng, Some(START_ZONE_TYPE)))
        .map(str::to_string)
        .ok_or_else(|| ZoneError::TemplateNotFound(format!("{biome}/{zone_type}")))
}
