//! Enemy data loading from RON files.

use bevy::log::{error, info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::ecs::{Behavior, Enemy};

fn default_size() -> f32 {
    32.0
}

fn default_bullet_speed() -> f32 {
    420.0
}

fn default_bullet_damage() -> f32 {
    5.0
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: f32,
    /// Damage dealt by touching the player
    pub contact_damage: f32,
    pub move_speed: f32,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default)]
    pub behavior: Behavior,
    /// Seconds between shots; enemies without one never fire
    #[serde(default)]
    pub fire_cooldown: Option<f32>,
    #[serde(default = "default_bullet_speed")]
    pub bullet_speed: f32,
    #[serde(default = "default_bullet_damage")]
    pub bullet_damage: f32,
}

impl EnemyDefinition {
    /// Convert to the Enemy component.
    pub fn to_enemy(&self, kind: &str) -> Enemy {
        Enemy {
            kind: kind.to_string(),
            move_speed: self.move_speed,
            contact_damage: self.contact_damage,
            fire_cooldown: self.fire_cooldown,
            // first shot comes one full cooldown after spawning
            fire_timer: self.fire_cooldown.unwrap_or(0.0),
            bullet_speed: self.bullet_speed,
            bullet_damage: self.bullet_damage,
        }
    }
}

/// All known enemy definitions, keyed by kind (the RON file stem).
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// The four kinds every build knows about.
    pub fn builtin() -> Self {
        let definitions = [
            ("grunt", "Grunt", 50.0, 10.0, 80.0, 32.0, Behavior::Patrol, Some(1.5)),
            ("flyer", "Flyer", 30.0, 8.0, 140.0, 24.0, Behavior::Zigzag, Some(2.0)),
            ("tank", "Tank", 150.0, 20.0, 40.0, 48.0, Behavior::Patrol, Some(2.5)),
            ("boss", "Boss", 500.0, 30.0, 0.0, 64.0, Behavior::Stationary, Some(0.6)),
        ];
        Self {
            definitions: definitions
                .into_iter()
                .map(|(kind, name, max_health, contact_damage, move_speed, size, behavior, fire_cooldown)| {
                    (
                        kind.to_string(),
                        EnemyDefinition {
                            name: name.to_string(),
                            max_health,
                            contact_damage,
                            move_speed,
                            size,
                            behavior,
                            fire_cooldown,
                            bullet_speed: default_bullet_speed(),
                            bullet_damage: default_bullet_damage(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Built-in kinds overlaid with `assets/data/enemies/`.
    pub fn load() -> Self {
        let mut registry = Self::builtin();
        registry.load_dir("assets/data/enemies");
        registry
    }

    /// Add or replace definitions from every `.ron` file in `dir`. Returns how many loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> usize {
        let enemies_dir = dir.as_ref();

        if !enemies_dir.exists() {
            warn!("Enemy definitions directory not found: {:?}", enemies_dir);
            return 0;
        }

        let Ok(entries) = fs::read_dir(enemies_dir) else {
            warn!("Failed to read enemy definitions directory");
            return 0;
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "ron") {
                let Some(enemy_type) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                    continue;
                };

                match fs::read_to_string(&path) {
                    Ok(contents) => match ron::from_str::<EnemyDefinition>(&contents) {
                        Ok(definition) => {
                            info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                            self.definitions.insert(enemy_type, definition);
                            loaded += 1;
                        }
                        Err(e) => {
                            error!("Failed to parse enemy definition {:?}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        error!("Failed to read enemy definition {:?}: {}", path, e);
                    }
                }
            }
        }

        info!("Loaded {} enemy definitions", self.definitions.len());
        loaded
    }

    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    pub fn insert(&mut self, enemy_type: impl Into<String>, definition: EnemyDefinition) {
        self.definitions.insert(enemy_type.into(), definition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_kinds_are_present() {
        let registry = EnemyRegistry::builtin();
        assert_eq!(registry.get("grunt").map(|d| d.max_health), Some(50.0));
        assert_eq!(registry.get("tank").map(|d| d.size), Some(48.0));
        assert_eq!(registry.get("boss").map(|d| d.behavior), Some(Behavior::Stationary));
        assert!(registry.get("dragon").is_none());
    }

    #[test]
    fn definition_defaults_optional_fields() {
        let definition: EnemyDefinition = ron::from_str(
            r#"(name: "Drone", max_health: 20.0, contact_damage: 4.0, move_speed: 90.0, behavior: Zigzag)"#,
        )
        .unwrap();
        assert_eq!(definition.size, 32.0);
        assert_eq!(definition.fire_cooldown, None);
        assert_eq!(definition.behavior, Behavior::Zigzag);

        let enemy = definition.to_enemy("drone");
        assert_eq!(enemy.kind, "drone");
        assert_eq!(enemy.fire_timer, 0.0);
    }
}
