//! Zone template data structures and RON parsing.

use serde::Deserialize;
use std::collections::HashMap;

use super::error::ZoneError;
use crate::ecs::Rarity;

/// Enemy placed by a template, in pixels relative to the zone origin.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnemySpawn {
    pub kind: String,
    pub x: f32,
    pub y: f32,
    /// Overrides the definition's max health
    #[serde(default)]
    pub health: Option<f32>,
}

/// Pickup placed by a template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LootSpawn {
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rarity: Rarity,
}

/// Purely visual prop placed by a template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecorationSpawn {
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

/// Raw template as written in a `.zone.ron` file, before palette resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneTemplateRaw {
    /// Maps tile characters to tile type ids
    #[serde(default)]
    pub palette: HashMap<char, String>,
    /// One string per row; `.` and space are empty cells
    pub tiles: Vec<String>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub loot: Vec<LootSpawn>,
    #[serde(default)]
    pub decorations: Vec<DecorationSpawn>,
}

/// A non-empty grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDescriptor {
    pub x: u32,
    pub y: u32,
    pub tile_type: String,
}

/// Immutable, palette-resolved template. Shared between every zone built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTemplate {
    pub name: String,
    pub biome: String,
    pub zone_type: String,
    /// Grid size in tiles
    pub width: u32,
    pub height: u32,
    /// Non-empty cells in row-major order
    pub tiles: Vec<TileDescriptor>,
    pub enemies: Vec<EnemySpawn>,
    pub loot: Vec<LootSpawn>,
    pub decorations: Vec<DecorationSpawn>,
}

impl ZoneTemplate {
    /// Resolve a raw template's palette into tile descriptors.
    pub fn from_raw(
        name: &str,
        biome: &str,
        zone_type: &str,
        raw: ZoneTemplateRaw,
    ) -> Result<Self, ZoneError> {
        let Some(first) = raw.tiles.first() else {
            return Err(ZoneError::Malformed {
                name: name.to_string(),
                reason: "tile grid has no rows".to_string(),
            });
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(ZoneError::Malformed {
                name: name.to_string(),
                reason: "tile grid has empty rows".to_string(),
            });
        }

        let mut tiles = Vec::new();
        for (y, row) in raw.tiles.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(ZoneError::GridMismatch {
                    name: name.to_string(),
                    row: y,
                    expected: width,
                    actual,
                });
            }

            for (x, c) in row.chars().enumerate() {
                if c == '.' || c == ' ' {
                    continue;
                }
                let Some(tile_type) = raw.palette.get(&c) else {
                    return Err(ZoneError::UnknownPaletteEntry {
                        name: name.to_string(),
                        character: c,
                        x,
                        y,
                    });
                };
                tiles.push(TileDescriptor {
                    x: x as u32,
                    y: y as u32,
                    tile_type: tile_type.clone(),
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            biome: biome.to_string(),
            zone_type: zone_type.to_string(),
            width: width as u32,
            height: raw.tiles.len() as u32,
            tiles,
            enemies: raw.enemies,
            loot: raw.loot,
            decorations: raw.decorations,
        })
    }

    /// Parse RON text and resolve it.
    pub fn parse(
        name: &str,
        biome: &str,
        zone_type: &str,
        source_path: &str,
        text: &str,
    ) -> Result<Self, ZoneError> {
        let raw = ron::from_str::<ZoneTemplateRaw>(text).map_err(|e| ZoneError::ParseError {
            path: source_path.to_string(),
            details: e.to_string(),
        })?;
        Self::from_raw(name, biome, zone_type, raw)
    }

    /// Template with no tiles and no spawns, installed when a chunk fails to build.
    pub fn empty() -> Self {
        Self {
            name: "empty".to_string(),
            biome: String::new(),
            zone_type: String::new(),
            width: 0,
            height: 0,
            tiles: Vec::new(),
            enemies: Vec::new(),
            loot: Vec::new(),
            decorations: Vec::new(),
        }
    }
}
