//! Loot pickup by rectangle overlap with the player.

use bevy::ecs::entity::Entity;
use bevy::ecs::query::With;
use bevy::log::info;
use bevy::math::Rect;

use super::collision::overlaps;
use crate::core::PickupEvent;
use crate::ecs::{Collision, EntityManager, Health, Loot, Player, Sprite, Transform};

/// Collect every loot item the living player overlaps.
///
/// Collected loot is destroyed and its effect applied; potions heal up to the
/// player's maximum health. A loot item's hit box is its sprite.
pub fn collect_loot(entities: &mut EntityManager) -> Vec<PickupEvent> {
    let world = entities.world_mut();
    let Some((player, player_rect)) = world
        .query_filtered::<(Entity, &Transform, &Collision, &Health), With<Player>>()
        .iter(world)
        .find(|(.., health)| !health.is_dead())
        .map(|(entity, transform, collision, _)| (entity, collision.rect(transform)))
    else {
        return Vec::new();
    };

    let mut touched: Vec<(Entity, Loot)> = world
        .query::<(Entity, &Transform, &Sprite, &Loot)>()
        .iter(world)
        .filter(|(_, transform, sprite, _)| {
            let rect = Rect::from_center_size(transform.position, sprite.size * transform.scale);
            overlaps(rect, player_rect)
        })
        .map(|(entity, _, _, loot)| (entity, loot.clone()))
        .collect();
    touched.sort_by_key(|(entity, _)| *entity);

    let mut pickups = Vec::with_capacity(touched.len());
    for (entity, loot) in touched {
        let healing = loot.healing();
        let healed = match entities.get_mut::<Health>(player) {
            Some(mut health) if healing > 0.0 => health.heal(healing),
            _ => 0.0,
        };
        entities.destroy(entity);
        info!("Picked up {} ({:?}), healed {:.0}", loot.kind, loot.rarity, healed);
        pickups.push(PickupEvent {
            loot: entity,
            kind: loot.kind,
            rarity: loot.rarity,
            healed,
        });
    }
    pickups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{EntityKind, Faction, Rarity};
    use bevy::math::Vec2;

    fn player(entities: &mut EntityManager, at: Vec2, health: f32) -> Entity {
        let e = entities.spawn_at(EntityKind::Player, "player", Transform::from_position(at));
        let mut pool = Health::new(100.0);
        pool.current = health;
        entities.attach(e, pool).unwrap();
        entities.attach(e, Collision::new(Vec2::splat(32.0), Faction::Player)).unwrap();
        entities.attach(e, Player::default()).unwrap();
        e
    }

    fn loot(entities: &mut EntityManager, kind: &str, at: Vec2) -> Entity {
        let e = entities.spawn_at(EntityKind::Loot, kind, Transform::from_position(at));
        entities
            .attach(
                e,
                Loot {
                    kind: kind.to_string(),
                    rarity: Rarity::Common,
                },
            )
            .unwrap();
        entities
            .attach(e, Sprite::new(format!("loot.{kind}"), Vec2::splat(16.0), Sprite::LOOT_LAYER))
            .unwrap();
        e
    }

    #[test]
    fn potion_heals_and_disappears() {
        let mut entities = EntityManager::new();
        let hero = player(&mut entities, Vec2::ZERO, 60.0);
        let potion = loot(&mut entities, "potion", Vec2::new(20.0, 0.0));

        let pickups = collect_loot(&mut entities);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].loot, potion);
        assert_eq!(pickups[0].kind, "potion");
        assert_eq!(pickups[0].healed, Loot::POTION_HEALING);
        assert_eq!(entities.get::<Health>(hero).unwrap().current, 85.0);
        assert!(!entities.contains(potion));
    }

    #[test]
    fn healing_stops_at_maximum() {
        let mut entities = EntityManager::new();
        let hero = player(&mut entities, Vec2::ZERO, 90.0);
        loot(&mut entities, "potion", Vec2::ZERO);

        let pickups = collect_loot(&mut entities);
        assert_eq!(pickups[0].healed, 10.0);
        assert_eq!(entities.get::<Health>(hero).unwrap().current, 100.0);
    }

    #[test]
    fn distant_loot_stays_and_plain_loot_does_not_heal() {
        let mut entities = EntityManager::new();
        let hero = player(&mut entities, Vec2::ZERO, 50.0);
        let far = loot(&mut entities, "potion", Vec2::new(24.0, 0.0));
        let scrap = loot(&mut entities, "scrap", Vec2::new(0.0, 10.0));

        let pickups = collect_loot(&mut entities);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].loot, scrap);
        assert_eq!(pickups[0].healed, 0.0);
        assert_eq!(entities.get::<Health>(hero).unwrap().current, 50.0);
        assert!(entities.contains(far));
        assert!(!entities.contains(scrap));
    }

    #[test]
    fn dead_player_collects_nothing() {
        let mut entities = EntityManager::new();
        player(&mut entities, Vec2::ZERO, 0.0);
        let potion = loot(&mut entities, "potion", Vec2::ZERO);

        assert!(collect_loot(&mut entities).is_empty());
        assert!(entities.contains(potion));
    }
}
