//! Enemy entity creation.

use bevy::ecs::entity::Entity;
use bevy::log::{info, warn};
use bevy::math::Vec2;

use super::data::EnemyDefinition;
use crate::ecs::{
    Collision, EntityError, EntityKind, EntityManager, Faction, Health, Sprite, StateMachine, Transform, Velocity,
};

/// Spawn an enemy of `kind` at `position`. `health` overrides the definition's max health.
pub fn spawn_enemy(
    entities: &mut EntityManager,
    kind: &str,
    definition: &EnemyDefinition,
    position: Vec2,
    health: Option<f32>,
) -> Entity {
    let entity = entities.spawn_at(EntityKind::Enemy, kind, Transform::from_position(position));
    if let Err(e) = attach_enemy(entities, entity, kind, definition, health) {
        warn!("Enemy setup failed for {}: {}", kind, e);
    }
    info!("Spawned {} at ({:.0}, {:.0})", definition.name, position.x, position.y);
    entity
}

fn attach_enemy(
    entities: &mut EntityManager,
    entity: Entity,
    kind: &str,
    definition: &EnemyDefinition,
    health: Option<f32>,
) -> Result<(), EntityError> {
    let size = Vec2::splat(definition.size);
    entities.attach(entity, definition.to_enemy(kind))?;
    entities.attach(entity, Health::new(health.unwrap_or(definition.max_health)))?;
    entities.attach(entity, Velocity::default())?;
    entities.attach(entity, StateMachine::new(definition.behavior))?;
    entities.attach(entity, Collision::new(size, Faction::Enemy))?;
    entities.attach(entity, Sprite::new(format!("enemy.{kind}"), size, Sprite::ENEMY_LAYER))
}
