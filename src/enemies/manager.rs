//! Per-frame enemy movement, firing and removal.

use bevy::ecs::entity::Entity;
use bevy::log::info;
use bevy::math::Vec2;

use super::ai;
use crate::combat::{BulletManager, BulletSpec};
use crate::core::DeathEvent;
use crate::ecs::{Enemy, EntityManager, Faction, Health, StateMachine, Transform, Velocity};

/// Seconds an enemy bullet lives.
const ENEMY_BULLET_LIFETIME: f32 = 3.0;
const ENEMY_BULLET_SIZE: f32 = 10.0;

/// Drives every entity carrying an [`Enemy`] component.
#[derive(Debug, Default)]
pub struct EnemyManager {
    kills: u32,
}

impl EnemyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Think, steer, move and fire. Returns the number of bullets fired.
    ///
    /// `target` is the player's position; without one enemies keep to their
    /// spawn behavior and hold fire.
    pub fn update(
        &mut self,
        entities: &mut EntityManager,
        bullets: &mut BulletManager,
        target: Option<Vec2>,
        dt: f32,
    ) -> usize {
        let mut shots = Vec::new();

        let world = entities.world_mut();
        let mut query = world.query::<(&mut Transform, &mut Velocity, &mut StateMachine, &mut Enemy)>();
        for (mut transform, mut velocity, mut state, mut enemy) in query.iter_mut(world) {
            ai::think(&mut state, transform.position, target);
            velocity.0 = ai::steer(&state, enemy.move_speed, target.map(|t| t - transform.position));
            transform.position += velocity.0 * dt;
            state.tick(dt);

            let Some(cooldown) = enemy.fire_cooldown else {
                continue;
            };
            enemy.fire_timer -= dt;
            if enemy.fire_timer > 0.0 {
                continue;
            }
            let Some(direction) = target.and_then(|t| ai::aim(transform.position, t)) else {
                continue;
            };
            enemy.fire_timer = cooldown;
            shots.push(BulletSpec {
                faction: Faction::Enemy,
                position: transform.position,
                direction,
                speed: enemy.bullet_speed,
                damage: enemy.bullet_damage,
                lifetime: ENEMY_BULLET_LIFETIME,
                size: ENEMY_BULLET_SIZE,
            });
        }

        let fired = shots.len();
        for spec in shots {
            bullets.spawn(entities, spec);
        }
        fired
    }

    /// Remove enemies whose health reached zero.
    pub fn reap(&mut self, entities: &mut EntityManager) -> Vec<DeathEvent> {
        let world = entities.world_mut();
        let deaths: Vec<DeathEvent> = world
            .query::<(Entity, &Enemy, &Health, &Transform)>()
            .iter(world)
            .filter(|(_, _, health, _)| health.is_dead())
            .map(|(entity, enemy, _, transform)| DeathEvent {
                entity,
                kind: enemy.kind.clone(),
                position: transform.position,
            })
            .collect();

        for death in &deaths {
            entities.destroy(death.entity);
            info!("{} destroyed at ({:.0}, {:.0})", death.kind, death.position.x, death.position.y);
        }
        self.kills += deaths.len() as u32;
        deaths
    }

    /// Enemies killed this run.
    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn reset(&mut self) {
        self.kills = 0;
    }
}
