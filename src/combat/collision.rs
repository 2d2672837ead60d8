//! Rectangle-overlap hit detection between bullets, enemies and the player.

use bevy::ecs::entity::Entity;
use bevy::ecs::query::{With, Without};
use bevy::log::debug;
use bevy::math::Rect;

use crate::core::{HitEvent, HitKind};
use crate::ecs::{Bullet, Collision, Enemy, EntityManager, Faction, Health, Player, Transform};

/// Strict overlap; rectangles that only share an edge do not collide.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

struct Target {
    entity: Entity,
    rect: Rect,
    faction: Faction,
}

/// Resolve every hit for this frame.
///
/// Bullets damage the first living target of the opposing faction they overlap
/// and are destroyed. Enemies touching the player deal contact damage, after
/// which the player is invincible for `contact_invincibility` seconds.
pub fn resolve(entities: &mut EntityManager, contact_invincibility: f32) -> Vec<HitEvent> {
    let world = entities.world_mut();

    let mut bullets: Vec<(Entity, Rect, Faction, f32)> = world
        .query::<(Entity, &Transform, &Collision, &Bullet)>()
        .iter(world)
        .map(|(entity, transform, collision, bullet)| (entity, collision.rect(transform), bullet.faction, bullet.damage))
        .collect();
    bullets.sort_by_key(|(entity, ..)| *entity);

    let mut targets: Vec<Target> = world
        .query_filtered::<(Entity, &Transform, &Collision, &Health), Without<Bullet>>()
        .iter(world)
        .filter(|(.., health)| !health.is_dead())
        .map(|(entity, transform, collision, _)| Target {
            entity,
            rect: collision.rect(transform),
            faction: collision.faction,
        })
        .collect();
    targets.sort_by_key(|t| t.entity);

    let mut hits = Vec::new();
    let mut spent = Vec::new();

    for (bullet, rect, faction, damage) in bullets {
        for target in targets.iter().filter(|t| t.faction != faction) {
            if !overlaps(rect, target.rect) {
                continue;
            }
            let Some(mut health) = entities.get_mut::<Health>(target.entity) else {
                continue;
            };
            if health.is_dead() {
                continue;
            }
            let dealt = health.take_damage(damage);
            hits.push(HitEvent {
                source: bullet,
                target: target.entity,
                damage: dealt,
                kind: HitKind::Bullet,
            });
            spent.push(bullet);
            break;
        }
    }

    for bullet in spent {
        entities.destroy(bullet);
    }

    hits.extend(resolve_contact(entities, contact_invincibility));
    if !hits.is_empty() {
        debug!("Resolved {} hit(s)", hits.len());
    }
    hits
}

fn resolve_contact(entities: &mut EntityManager, contact_invincibility: f32) -> Vec<HitEvent> {
    let world = entities.world_mut();
    let Some((player, player_rect)) = world
        .query_filtered::<(Entity, &Transform, &Collision), With<Player>>()
        .iter(world)
        .next()
        .map(|(entity, transform, collision)| (entity, collision.rect(transform)))
    else {
        return Vec::new();
    };

    let mut touching: Vec<(Entity, f32)> = world
        .query::<(Entity, &Transform, &Collision, &Enemy, &Health)>()
        .iter(world)
        .filter(|(.., health)| !health.is_dead())
        .filter(|(_, transform, collision, ..)| overlaps(collision.rect(transform), player_rect))
        .map(|(entity, _, _, enemy, _)| (entity, enemy.contact_damage))
        .collect();
    touching.sort_by_key(|(entity, _)| *entity);

    let mut hits = Vec::new();
    let Some(mut health) = entities.get_mut::<Health>(player) else {
        return hits;
    };
    for (enemy, damage) in touching {
        if health.is_invincible() || health.is_dead() {
            break;
        }
        let dealt = health.take_damage(damage);
        health.set_invincible(contact_invincibility);
        hits.push(HitEvent {
            source: enemy,
            target: player,
            damage: dealt,
            kind: HitKind::Contact,
        });
    }
    hits
}

/// Count down invincibility windows.
pub fn tick_health(entities: &mut EntityManager, dt: f32) {
    let world = entities.world_mut();
    let mut query = world.query::<&mut Health>();
    for mut health in query.iter_mut(world) {
        if health.is_invincible() {
            health.tick(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{BulletManager, BulletSpec};
    use crate::ecs::EntityKind;
    use bevy::math::Vec2;

    fn enemy(entities: &mut EntityManager, at: Vec2, health: f32) -> Entity {
        let e = entities.spawn_at(EntityKind::Enemy, "grunt", Transform::from_position(at));
        entities.attach(e, Health::new(health)).unwrap();
        entities.attach(e, Collision::new(Vec2::splat(32.0), Faction::Enemy)).unwrap();
        entities
            .attach(
                e,
                Enemy {
                    kind: "grunt".to_string(),
                    move_speed: 0.0,
                    contact_damage: 10.0,
                    fire_cooldown: None,
                    fire_timer: 0.0,
                    bullet_speed: 0.0,
                    bullet_damage: 0.0,
                },
            )
            .unwrap();
        e
    }

    fn player(entities: &mut EntityManager, at: Vec2) -> Entity {
        let e = entities.spawn_at(EntityKind::Player, "player", Transform::from_position(at));
        entities.attach(e, Health::new(100.0)).unwrap();
        entities.attach(e, Collision::new(Vec2::splat(32.0), Faction::Player)).unwrap();
        entities.attach(e, Player::default()).unwrap();
        e
    }

    fn shoot(entities: &mut EntityManager, faction: Faction, at: Vec2, damage: f32) -> Entity {
        BulletManager::new().spawn(
            entities,
            BulletSpec {
                faction,
                position: at,
                direction: Vec2::ZERO,
                speed: 0.0,
                damage,
                lifetime: 1.0,
                size: 8.0,
            },
        )
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(a, Rect::new(9.0, 9.0, 20.0, 20.0)));
        assert!(!overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn player_bullet_damages_enemy_and_is_consumed() {
        let mut entities = EntityManager::new();
        let grunt = enemy(&mut entities, Vec2::new(100.0, 100.0), 50.0);
        let bullet = shoot(&mut entities, Faction::Player, Vec2::new(105.0, 100.0), 10.0);

        let hits = resolve(&mut entities, 1.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, grunt);
        assert_eq!(hits[0].kind, HitKind::Bullet);
        assert_eq!(entities.get::<Health>(grunt).unwrap().current, 40.0);
        assert!(!entities.contains(bullet));
    }

    #[test]
    fn bullets_ignore_their_own_faction() {
        let mut entities = EntityManager::new();
        let grunt = enemy(&mut entities, Vec2::ZERO, 50.0);
        let bullet = shoot(&mut entities, Faction::Enemy, Vec2::ZERO, 10.0);

        assert!(resolve(&mut entities, 1.0).is_empty());
        assert_eq!(entities.get::<Health>(grunt).unwrap().current, 50.0);
        assert!(entities.contains(bullet));
    }

    #[test]
    fn enemy_bullet_hits_player() {
        let mut entities = EntityManager::new();
        let hero = player(&mut entities, Vec2::new(50.0, 50.0));
        shoot(&mut entities, Faction::Enemy, Vec2::new(50.0, 60.0), 5.0);

        let hits = resolve(&mut entities, 1.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, hero);
        assert_eq!(entities.get::<Health>(hero).unwrap().current, 95.0);
    }

    #[test]
    fn contact_damage_grants_invincibility() {
        let mut entities = EntityManager::new();
        let hero = player(&mut entities, Vec2::ZERO);
        enemy(&mut entities, Vec2::new(10.0, 0.0), 50.0);
        enemy(&mut entities, Vec2::new(-10.0, 0.0), 50.0);

        let hits = resolve(&mut entities, 1.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, HitKind::Contact);
        assert_eq!(entities.get::<Health>(hero).unwrap().current, 90.0);

        assert!(resolve(&mut entities, 1.0).is_empty());
        tick_health(&mut entities, 1.0);
        assert_eq!(resolve(&mut entities, 1.0).len(), 1);
        assert_eq!(entities.get::<Health>(hero).unwrap().current, 80.0);
    }

    #[test]
    fn dead_targets_absorb_no_bullets() {
        let mut entities = EntityManager::new();
        let grunt = enemy(&mut entities, Vec2::ZERO, 10.0);
        let first = shoot(&mut entities, Faction::Player, Vec2::ZERO, 10.0);
        let second = shoot(&mut entities, Faction::Player, Vec2::ZERO, 10.0);

        let hits = resolve(&mut entities, 1.0);
        assert_eq!(hits.len(), 1);
        assert!(entities.get::<Health>(grunt).unwrap().is_dead());
        assert!(!entities.contains(first));
        assert!(entities.contains(second));
    }
}
