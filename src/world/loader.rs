//! Zone template discovery, parsing and caching.
//!
//! Templates live on disk as `<root>/<biome>/<zone_type>/<name>.zone.ron`. The
//! loader indexes them by biome and zone type up front but only parses a
//! template the first time it is requested.

use bevy::log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::data::ZoneTemplate;
use super::error::ZoneError;

const TEMPLATE_SUFFIX: &str = ".zone.ron";

#[derive(Debug, Clone)]
enum TemplateSource {
    File(PathBuf),
    Inline(String),
}

#[derive(Debug, Clone)]
struct TemplateEntry {
    biome: String,
    zone_type: String,
    source: TemplateSource,
}

/// Index of every known template plus a cache of the ones already parsed.
#[derive(Debug, Default)]
pub struct ZoneTemplateLoader {
    /// biome -> zone type -> template names (sorted)
    index: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    sources: HashMap<String, TemplateEntry>,
    cache: HashMap<String, Arc<ZoneTemplate>>,
}

impl ZoneTemplateLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every template file under `root`. Returns how many were found.
    pub fn scan(&mut self, root: impl AsRef<Path>) -> usize {
        let root = root.as_ref();
        if !root.exists() {
            warn!("Zone template directory not found: {:?}", root);
            return 0;
        }

        let mut found = 0;
        for biome_dir in sorted_subdirs(root) {
            let Some(biome) = dir_name(&biome_dir) else {
                continue;
            };
            for type_dir in sorted_subdirs(&biome_dir) {
                let Some(zone_type) = dir_name(&type_dir) else {
                    continue;
                };
                for path in sorted_files(&type_dir) {
                    let Some(name) = path
                        .file_name()
                        .and_then(|s| s.to_str())
                        .and_then(|s| s.strip_suffix(TEMPLATE_SUFFIX))
                    else {
                        continue;
                    };
                    let name = name.to_string();
                    self.insert_source(&biome, &zone_type, &name, TemplateSource::File(path));
                    found += 1;
                }
            }
        }

        info!("Indexed {} zone template(s) in {} biome(s) from {:?}", found, self.index.len(), root);
        found
    }

    /// Register a template from RON text. Replaces any template with the same name.
    pub fn register(&mut self, biome: &str, zone_type: &str, name: &str, ron_text: impl Into<String>) {
        self.insert_source(biome, zone_type, name, TemplateSource::Inline(ron_text.into()));
    }

    fn insert_source(&mut self, biome: &str, zone_type: &str, name: &str, source: TemplateSource) {
        if let Some(previous) = self.sources.remove(name) {
            warn!("Zone template '{}' registered twice, keeping the latest", name);
            if let Some(names) = self
                .index
                .get_mut(&previous.biome)
                .and_then(|types| types.get_mut(&previous.zone_type))
            {
                names.retain(|n| n != name);
            }
        }
        self.cache.remove(name);

        let names = self
            .index
            .entry(biome.to_string())
            .or_default()
            .entry(zone_type.to_string())
            .or_default();
        if let Err(pos) = names.binary_search_by(|n| n.as_str().cmp(name)) {
            names.insert(pos, name.to_string());
        }
        self.sources.insert(
            name.to_string(),
            TemplateEntry {
                biome: biome.to_string(),
                zone_type: zone_type.to_string(),
                source,
            },
        );
    }

    /// Fetch a template, parsing it on first use.
    pub fn load_template(&mut self, name: &str) -> Result<Arc<ZoneTemplate>, ZoneError> {
        if let Some(template) = self.cache.get(name) {
            return Ok(Arc::clone(template));
        }

        let entry = self
            .sources
            .get(name)
            .ok_or_else(|| ZoneError::TemplateNotFound(name.to_string()))?;

        let template = match &entry.source {
            TemplateSource::File(path) => {
                let display = path.display().to_string();
                let text = fs::read_to_string(path).map_err(|e| ZoneError::ReadError {
                    path: display.clone(),
                    details: e.to_string(),
                })?;
                ZoneTemplate::parse(name, &entry.biome, &entry.zone_type, &display, &text)?
            }
            TemplateSource::Inline(text) => {
                ZoneTemplate::parse(name, &entry.biome, &entry.zone_type, name, text)?
            }
        };

        info!(
            "Loaded zone template: {} ({}/{}, {}x{})",
            name, template.biome, template.zone_type, template.width, template.height
        );
        let template = Arc::new(template);
        self.cache.insert(name.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Pick a random template name of the given biome and zone type.
    pub fn random_template<R: Rng + ?Sized>(&self, biome: &str, zone_type: &str, rng: &mut R) -> Option<&str> {
        self.index
            .get(biome)?
            .get(zone_type)?
            .choose(rng)
            .map(String::as_str)
    }

    /// Pick a random template anywhere in a biome, optionally skipping one zone type.
    pub fn random_in_biome<R: Rng + ?Sized>(
        &self,
        biome: &str,
        rng: &mut R,
        exclude_type: Option<&str>,
    ) -> Option<&str> {
        let candidates: Vec<&str> = self
            .index
            .get(biome)?
            .iter()
            .filter(|(zone_type, _)| Some(zone_type.as_str()) != exclude_type)
            .flat_map(|(_, names)| names.iter().map(String::as_str))
            .collect();
        candidates.choose(rng).copied()
    }

    pub fn biomes(&self) -> Vec<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    pub fn zone_types(&self, biome: &str) -> Vec<&str> {
        self.index
            .get(biome)
            .map(|types| types.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn templates(&self, biome: &str, zone_type: &str) -> &[String] {
        self.index
            .get(biome)
            .and_then(|types| types.get(zone_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Number of indexed templates.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Drop every parsed template so the next load re-reads its source.
    pub fn reload(&mut self) {
        debug!("Dropping {} cached zone template(s)", self.cache.len());
        self.cache.clear();
    }
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|s| s.to_str()).map(str::to_string)
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        warn!("Failed to read zone directory {:?}", dir);
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();
    paths
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    sorted_entries(dir).into_iter().filter(|p| p.is_dir()).collect()
}

fn sorted_files(dir: &Path) -> Vec<PathBuf> {
    sorted_entries(dir).into_iter().filter(|p| p.is_file()).collect()
}
