//! Asset manifest loaded from `assets/data/assets.ron`.

use bevy::log::{error, info, warn};
use bevy::prelude::Resource;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

/// Resolved reference to an asset. Cheap to clone; shared by every tile using it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    key: Arc<str>,
}

impl AssetHandle {
    pub fn new(key: &str) -> Self {
        Self { key: Arc::from(key) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Looks up logical asset keys (e.g. `tile.ground`).
pub trait AssetResolver {
    /// Returns `None` when the key is unknown.
    fn resolve(&self, key: &str) -> Option<AssetHandle>;
}

fn default_color() -> (f32, f32, f32) {
    (1.0, 0.0, 1.0)
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetEntry {
    /// Image path relative to `assets/`; without one the renderer draws a colored quad
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_color")]
    pub color: (f32, f32, f32),
}

impl AssetEntry {
    pub fn color(r: f32, g: f32, b: f32) -> Self {
        Self {
            path: None,
            color: (r, g, b),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetManifestFile {
    entries: HashMap<String, AssetEntry>,
}

/// Every known asset key and how to draw it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    entries: HashMap<String, AssetEntry>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        let builtin = [
            ("tile.ground", AssetEntry::color(0.22, 0.30, 0.18)),
            ("tile.grass", AssetEntry::color(0.25, 0.45, 0.20)),
            ("tile.stone", AssetEntry::color(0.40, 0.40, 0.42)),
            ("tile.sand", AssetEntry::color(0.76, 0.70, 0.50)),
            ("tile.water", AssetEntry::color(0.15, 0.30, 0.60)),
            ("tile.lava", AssetEntry::color(0.80, 0.25, 0.05)),
            ("player", AssetEntry::color(0.30, 0.80, 1.00)),
            ("enemy.grunt", AssetEntry::color(0.85, 0.30, 0.30)),
            ("enemy.flyer", AssetEntry::color(0.95, 0.60, 0.20)),
            ("enemy.tank", AssetEntry::color(0.55, 0.15, 0.15)),
            ("enemy.boss", AssetEntry::color(0.60, 0.10, 0.70)),
            ("bullet.player", AssetEntry::color(1.00, 1.00, 0.60)),
            ("bullet.enemy", AssetEntry::color(1.00, 0.40, 0.80)),
            ("loot.scrap", AssetEntry::color(0.80, 0.80, 0.80)),
            ("loot.gem", AssetEntry::color(0.30, 1.00, 0.60)),
            ("loot.potion", AssetEntry::color(0.90, 0.20, 0.35)),
            ("decoration.tree", AssetEntry::color(0.10, 0.35, 0.12)),
            ("decoration.rock", AssetEntry::color(0.35, 0.33, 0.30)),
        ];
        Self {
            entries: builtin
                .into_iter()
                .map(|(key, entry)| (key.to_string(), entry))
                .collect(),
        }
    }
}

impl AssetCatalog {
    /// Catalog with no entries; every lookup fails.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Built-in entries overlaid with `assets/data/assets.ron`.
    pub fn load() -> Self {
        let path = "assets/data/assets.ron";
        let mut catalog = Self::default();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(loaded) => {
                    info!("Loaded {} asset entries from {}", loaded.len(), path);
                    catalog.entries.extend(loaded.entries);
                }
                Err(e) => {
                    error!("Failed to parse {}: {}. Using built-in assets.", path, e);
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}. Using built-in assets.", path, e);
            }
        }
        catalog
    }

    /// Parse a manifest. Only the entries in `text` are included.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        let file: AssetManifestFile = ron::from_str(text)?;
        Ok(Self {
            entries: file.entries,
        })
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: AssetEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&AssetEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetResolver for AssetCatalog {
    fn resolve(&self, key: &str) -> Option<AssetHandle> {
        self.entries.get_key_value(key).map(|(k, _)| AssetHandle::new(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_entries_default_their_color() {
        let catalog = AssetCatalog::from_ron(
            r#"(entries: {
                "tile.ground": (path: Some("textures/ground.png")),
                "tile.ice": (color: (0.8, 0.9, 1.0)),
            })"#,
        )
        .unwrap();

        let ground = catalog.get("tile.ground").unwrap();
        assert_eq!(ground.path.as_deref(), Some("textures/ground.png"));
        assert_eq!(ground.color, default_color());
        assert_eq!(catalog.get("tile.ice").unwrap().color, (0.8, 0.9, 1.0));
    }

    #[test]
    fn resolver_only_knows_catalog_keys() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.resolve("tile.ground").map(|h| h.key().to_string()), Some("tile.ground".into()));
        assert!(catalog.resolve("tile.missing").is_none());
        assert!(AssetCatalog::empty().resolve("tile.ground").is_none());
    }

    #[test]
    fn builtin_catalog_draws_every_loot_kind() {
        let catalog = AssetCatalog::default();
        for key in ["loot.scrap", "loot.gem", "loot.potion"] {
            assert!(catalog.get(key).is_some(), "{key}");
        }
    }
}
