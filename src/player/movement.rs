//! Top-down player movement and firing.

use bevy::ecs::entity::Entity;
use bevy::log::{info, warn};
use bevy::math::Vec2;

use super::components::PlayerConfig;
use crate::combat::{BulletManager, BulletSpec};
use crate::core::InputSnapshot;
use crate::ecs::{
    Collision, EntityError, EntityKind, EntityManager, Faction, Health, Physics, Player, Sprite, Transform, Velocity,
};

/// Player bullets travel up the screen.
const FIRE_DIRECTION: Vec2 = Vec2::new(0.0, -1.0);

/// Spawn the player avatar at `position`.
pub fn spawn_player(entities: &mut EntityManager, config: &PlayerConfig, position: Vec2) -> Entity {
    let entity = entities.spawn_at(EntityKind::Player, "player", Transform::from_position(position));
    if let Err(e) = attach_player(entities, entity, config) {
        warn!("Player setup failed: {}", e);
    }
    info!("Player spawned at ({:.0}, {:.0})", position.x, position.y);
    entity
}

fn attach_player(entities: &mut EntityManager, entity: Entity, config: &PlayerConfig) -> Result<(), EntityError> {
    let size = Vec2::splat(config.size);
    entities.attach(entity, Player::default())?;
    entities.attach(entity, Velocity::default())?;
    entities.attach(
        entity,
        Physics {
            acceleration: config.acceleration,
            friction: config.friction,
            max_speed: config.move_speed,
        },
    )?;
    entities.attach(entity, Health::new(config.max_health))?;
    entities.attach(entity, Collision::new(size, Faction::Player))?;
    entities.attach(entity, Sprite::new("player", size, Sprite::PLAYER_LAYER))
}

/// Apply one frame of input to the player. Returns true if a bullet was fired.
pub fn update_player(
    entities: &mut EntityManager,
    bullets: &mut BulletManager,
    player: Entity,
    input: &InputSnapshot,
    config: &PlayerConfig,
    dt: f32,
) -> bool {
    let Some(physics) = entities.get::<Physics>(player).copied() else {
        return false;
    };

    let velocity = match entities.get_mut::<Velocity>(player) {
        Some(mut velocity) => {
            velocity.0 = physics.steer(velocity.0, input.movement, dt);
            velocity.0
        }
        None => return false,
    };

    let Some(mut transform) = entities.get_mut::<Transform>(player) else {
        return false;
    };
    transform.position += velocity * dt;
    let muzzle = transform.position;

    let Some(mut state) = entities.get_mut::<Player>(player) else {
        return false;
    };
    state.fire_timer = (state.fire_timer - dt).max(0.0);
    if !input.fire || state.fire_timer > 0.0 {
        return false;
    }
    state.fire_timer = config.fire_cooldown;

    bullets.spawn(
        entities,
        BulletSpec {
            faction: Faction::Player,
            position: muzzle,
            direction: FIRE_DIRECTION,
            speed: config.bullet_speed,
            damage: config.bullet_damage,
            lifetime: config.bullet_lifetime,
            size: config.bullet_size,
        },
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Bullet;

    fn setup() -> (EntityManager, BulletManager, Entity, PlayerConfig) {
        let mut entities = EntityManager::new();
        let config = PlayerConfig::default();
        let player = spawn_player(&mut entities, &config, Vec2::new(100.0, 100.0));
        (entities, BulletManager::new(), player, config)
    }

    #[test]
    fn movement_accelerates_and_caps_speed() {
        let (mut entities, mut bullets, player, config) = setup();
        let input = InputSnapshot {
            movement: Vec2::X,
            ..Default::default()
        };
        for _ in 0..60 {
            update_player(&mut entities, &mut bullets, player, &input, &config, 1.0 / 60.0);
        }
        let velocity = entities.get::<Velocity>(player).unwrap().0;
        assert!((velocity.x - config.move_speed).abs() < 1e-2);
        assert!(entities.get::<Transform>(player).unwrap().position.x > 100.0);
    }

    #[test]
    fn firing_respects_cooldown() {
        let (mut entities, mut bullets, player, config) = setup();
        let input = InputSnapshot {
            fire: true,
            ..Default::default()
        };
        // cooldown is 0.33s
        assert!(update_player(&mut entities, &mut bullets, player, &input, &config, 0.2));
        assert!(!update_player(&mut entities, &mut bullets, player, &input, &config, 0.2));
        assert!(update_player(&mut entities, &mut bullets, player, &input, &config, 0.2));

        let shots = entities.of_kind(EntityKind::Bullet);
        assert_eq!(shots.len(), 2);
        let bullet = entities.get::<Bullet>(shots[0]).unwrap();
        assert_eq!(bullet.faction, Faction::Player);
        assert_eq!(entities.get::<Velocity>(shots[0]).unwrap().0, Vec2::new(0.0, -600.0));
    }

    #[test]
    fn missing_player_is_ignored() {
        let (mut entities, mut bullets, player, config) = setup();
        entities.destroy(player);
        let input = InputSnapshot {
            fire: true,
            ..Default::default()
        };
        assert!(!update_player(&mut entities, &mut bullets, player, &input, &config, 0.1));
        assert!(entities.is_empty());
    }
}
