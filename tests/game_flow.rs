use bevy::ecs::query::With;
use bevy::math::Vec2;
use zone_runner::combat::{BulletManager, BulletSpec};
use zone_runner::core::{GameContext, GameState, GameStateManager, InputSnapshot, StateAction, HUD_ZONE};
use zone_runner::ecs::{Bullet, EntityError, EntityKind, EntityManager, Faction, Transform, Velocity};

#[test]
fn start_pause_resume_records_three_transitions() {
    let mut states = GameStateManager::new();
    states.apply(StateAction::Start).unwrap();
    states.apply(StateAction::Pause).unwrap();
    states.apply(StateAction::Resume).unwrap();

    assert_eq!(states.current(), GameState::Playing);
    let history = states.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].to, GameState::Playing);
    assert_eq!(history[1].to, GameState::Paused);
    assert_eq!(history[0].from, GameState::Menu);
}

#[test]
fn bullet_expires_on_the_step_crossing_its_lifetime() {
    let mut entities = EntityManager::new();
    let mut bullets = BulletManager::new();
    bullets.spawn(
        &mut entities,
        BulletSpec {
            faction: Faction::Enemy,
            position: Vec2::ZERO,
            direction: Vec2::Y,
            speed: 100.0,
            damage: 1.0,
            lifetime: 2.0,
            size: 4.0,
        },
    );

    for _ in 0..3 {
        bullets.update(&mut entities, 0.6);
        assert_eq!(entities.query::<With<Bullet>>().len(), 1);
    }
    bullets.update(&mut entities, 0.3);
    assert!(entities.query::<With<Bullet>>().is_empty());
}

#[test]
fn destroyed_entities_stay_gone() {
    let mut entities = EntityManager::new();
    let keep = entities.create_entity(EntityKind::Decoration, "rock");
    let gone = entities.create_entity(EntityKind::Decoration, "tree");

    assert!(entities.destroy(gone));
    assert!(!entities.destroy(gone));
    assert_eq!(entities.attach(gone, Velocity::default()), Err(EntityError::Missing(gone)));

    let with_transform = entities.query::<With<Transform>>();
    assert_eq!(with_transform, vec![keep]);
    assert_eq!(with_transform.len(), entities.len());
}

#[test]
fn every_live_entity_keeps_its_transform() {
    let mut entities = EntityManager::new();
    let rock = entities.spawn_at(EntityKind::Decoration, "rock", Transform::from_xy(8.0, 8.0));

    assert!(matches!(entities.detach::<Transform>(rock), Err(EntityError::Required(..))));
    assert_eq!(entities.query::<With<Transform>>(), vec![rock]);
    assert_eq!(entities.len(), 1);
}

#[test]
fn a_run_streams_the_shipped_world() {
    let mut game = GameContext::load();
    assert_eq!(game.state(), GameState::Menu);

    let start = InputSnapshot {
        start: true,
        ..Default::default()
    };
    let report = game.tick(1.0 / 60.0, &start);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(report.streaming.activated.len(), 9);
    assert!(report.streaming.failed.is_empty());

    let snapshot = game.snapshot();
    assert!(!snapshot.tiles.is_empty());
    assert!(snapshot.sprites.iter().any(|s| s.image_key == "player"));
    assert_eq!(snapshot.hud_text(HUD_ZONE), Some("starting_zone"));

    let pause = InputSnapshot {
        pause: true,
        resume: true,
        ..Default::default()
    };
    game.tick(1.0 / 60.0, &pause);
    assert_eq!(game.state(), GameState::Paused);
    game.tick(1.0 / 60.0, &pause);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.states().history().len(), 3);
}
