//! Projectile spawning, movement and expiry.

use bevy::ecs::entity::Entity;
use bevy::log::warn;
use bevy::math::Vec2;

use crate::ecs::{
    Bullet, Collision, EntityError, EntityKind, EntityManager, Faction, Sprite, Transform, Velocity,
};

/// Everything needed to fire one bullet.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletSpec {
    pub faction: Faction,
    pub position: Vec2,
    /// Normalized before use; zero fires a stationary bullet
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
    /// Seconds before expiry
    pub lifetime: f32,
    pub size: f32,
}

impl BulletSpec {
    fn sprite_key(&self) -> &'static str {
        match self.faction {
            Faction::Player => "bullet.player",
            Faction::Enemy => "bullet.enemy",
        }
    }
}

fn attach_bullet(entities: &mut EntityManager, entity: Entity, spec: &BulletSpec) -> Result<(), EntityError> {
    let size = Vec2::splat(spec.size);
    entities.attach(entity, Velocity(spec.direction.normalize_or_zero() * spec.speed))?;
    entities.attach(
        entity,
        Bullet {
            damage: spec.damage,
            faction: spec.faction,
            lifetime: spec.lifetime,
            age: 0.0,
        },
    )?;
    entities.attach(entity, Collision::new(size, spec.faction))?;
    entities.attach(entity, Sprite::new(spec.sprite_key(), size, Sprite::BULLET_LAYER))
}

/// Owns bullet lifecycle and keeps running totals.
#[derive(Debug, Default)]
pub struct BulletManager {
    fired: u64,
    expired: u64,
}

impl BulletManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entities: &mut EntityManager, spec: BulletSpec) -> Entity {
        let entity = entities.spawn_at(EntityKind::Bullet, "bullet", Transform::from_position(spec.position));
        if let Err(e) = attach_bullet(entities, entity, &spec) {
            warn!("Bullet setup failed: {}", e);
        }
        self.fired += 1;
        entity
    }

    /// Move and age every bullet, destroying the expired ones. Returns how many expired.
    pub fn update(&mut self, entities: &mut EntityManager, dt: f32) -> usize {
        let world = entities.world_mut();
        let mut query = world.query::<(Entity, &mut Transform, &Velocity, &mut Bullet)>();
        let mut expired = Vec::new();
        for (entity, mut transform, velocity, mut bullet) in query.iter_mut(world) {
            transform.position += velocity.0 * dt;
            if bullet.tick(dt) {
                expired.push(entity);
            }
        }

        for &entity in &expired {
            entities.destroy(entity);
        }
        self.expired += expired.len() as u64;
        expired.len()
    }

    /// Bullets fired since creation.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn expired(&self) -> u64 {
        self.expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::query::With;

    fn spec(direction: Vec2) -> BulletSpec {
        BulletSpec {
            faction: Faction::Player,
            position: Vec2::new(10.0, 10.0),
            direction,
            speed: 100.0,
            damage: 5.0,
            lifetime: 2.0,
            size: 8.0,
        }
    }

    #[test]
    fn direction_is_normalized_before_scaling() {
        let mut entities = EntityManager::new();
        let mut bullets = BulletManager::new();
        let fast = bullets.spawn(&mut entities, spec(Vec2::new(3.0, 4.0)));
        let still = bullets.spawn(&mut entities, spec(Vec2::ZERO));

        let v = entities.get::<Velocity>(fast).unwrap().0;
        assert!((v - Vec2::new(60.0, 80.0)).length() < 1e-3);
        assert_eq!(entities.get::<Velocity>(still).unwrap().0, Vec2::ZERO);
        assert_eq!(entities.get::<Sprite>(fast).unwrap().image_key, "bullet.player");
    }

    #[test]
    fn bullets_move_and_expire() {
        let mut entities = EntityManager::new();
        let mut bullets = BulletManager::new();
        let shot = bullets.spawn(&mut entities, spec(Vec2::X));

        assert_eq!(bullets.update(&mut entities, 1.0), 0);
        assert_eq!(entities.get::<Transform>(shot).unwrap().position, Vec2::new(110.0, 10.0));
        assert_eq!(bullets.update(&mut entities, 0.6), 0);
        assert_eq!(bullets.update(&mut entities, 0.5), 1);
        assert!(entities.query::<With<Bullet>>().is_empty());
        assert!(!entities.contains(shot));
        assert_eq!((bullets.fired(), bullets.expired()), (1, 1));
    }
}
