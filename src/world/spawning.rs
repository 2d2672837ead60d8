//! Entity spawning for zone content.

use bevy::ecs::component::Component;
use bevy::ecs::entity::Entity;
use bevy::log::{debug, warn};
use bevy::math::Vec2;

use super::builder::Zone;
use super::chunk::ChunkCoord;
use crate::ecs::{EntityKind, EntityManager, Loot, Sprite, Transform};
use crate::enemies::{spawn_enemy, EnemyRegistry};

const LOOT_SIZE: f32 = 16.0;
const DECORATION_SIZE: f32 = 32.0;

/// Marks an entity as owned by the zone in the given chunk.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneMember(pub ChunkCoord);

/// Spawn a zone's template enemies, loot and decorations, recording them on the zone.
///
/// Spawn coordinates are pixels relative to the zone's origin. Unknown enemy
/// kinds are skipped with a warning.
pub fn spawn_zone_entities(zone: &mut Zone, entities: &mut EntityManager, registry: &EnemyRegistry) {
    let origin = zone.bounds().min;
    let coord = zone.coord();
    let template = zone.template().clone();

    for spawn in &template.enemies {
        let Some(definition) = registry.get(&spawn.kind) else {
            warn!("Unknown enemy type '{}' in zone '{}'", spawn.kind, template.name);
            continue;
        };
        let position = origin + Vec2::new(spawn.x, spawn.y);
        let entity = spawn_enemy(entities, &spawn.kind, definition, position, spawn.health);
        track(zone, entities, entity, coord);
    }

    for loot in &template.loot {
        let position = origin + Vec2::new(loot.x, loot.y);
        let entity = entities.spawn_at(EntityKind::Loot, loot.kind.clone(), Transform::from_position(position));
        let attached = entities
            .attach(
                entity,
                Loot {
                    kind: loot.kind.clone(),
                    rarity: loot.rarity,
                },
            )
            .and_then(|_| {
                entities.attach(
                    entity,
                    Sprite::new(format!("loot.{}", loot.kind), Vec2::splat(LOOT_SIZE), Sprite::LOOT_LAYER),
                )
            });
        if let Err(e) = attached {
            warn!("Loot setup failed in zone '{}': {}", template.name, e);
        }
        track(zone, entities, entity, coord);
    }

    for decoration in &template.decorations {
        let position = origin + Vec2::new(decoration.x, decoration.y);
        let entity =
            entities.spawn_at(EntityKind::Decoration, decoration.kind.clone(), Transform::from_position(position));
        let sprite = Sprite::new(
            format!("decoration.{}", decoration.kind),
            Vec2::splat(DECORATION_SIZE),
            Sprite::DECORATION_LAYER,
        );
        if let Err(e) = entities.attach(entity, sprite) {
            warn!("Decoration setup failed in zone '{}': {}", template.name, e);
        }
        track(zone, entities, entity, coord);
    }

    debug!(
        "Zone '{}' at ({}, {}) spawned {} entities",
        template.name,
        coord.x,
        coord.y,
        zone.entities().len()
    );
}

fn track(zone: &mut Zone, entities: &mut EntityManager, entity: Entity, coord: ChunkCoord) {
    if let Err(e) = entities.attach(entity, ZoneMember(coord)) {
        warn!("Could not tag zone entity: {}", e);
        return;
    }
    zone.add_entity(entity);
}

/// Destroy every entity a zone spawned. Entities already gone (e.g. killed enemies) are skipped.
pub fn despawn_zone_entities(zone: &mut Zone, entities: &mut EntityManager) -> usize {
    zone.take_entities()
        .into_iter()
        .filter(|&entity| entities.destroy(entity))
        .count()
}
