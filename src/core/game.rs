//! Top-level game loop: owns every manager and runs one frame at a time.

use bevy::ecs::entity::Entity;
use bevy::log::{debug, info, warn};
use bevy::math::{Rect, Vec2};

use super::config::GameConfig;
use super::events::FrameReport;
use super::input::InputSnapshot;
use super::states::{GameState, GameStateManager, StateAction, StateError, Transition};
use crate::assets::AssetCatalog;
use crate::combat::{self, overlaps, BulletManager};
use crate::ecs::{EntityKind, EntityManager, Health, Sprite, Transform, UiElement};
use crate::enemies::{EnemyManager, EnemyRegistry};
use crate::player::{spawn_player, update_player};
use crate::rendering::{HudLine, RenderSnapshot, SpriteDraw, TileDraw};
use crate::world::{Camera, WorldManager};

pub const HUD_HEALTH: &str = "health";
pub const HUD_KILLS: &str = "kills";
pub const HUD_ZONE: &str = "zone";

/// Actions in the order they are tried; at most one applies per frame.
const ACTION_ORDER: [StateAction; 4] = [
    StateAction::Start,
    StateAction::Pause,
    StateAction::Resume,
    StateAction::QuitToMenu,
];

/// The whole game, independent of any window or renderer.
pub struct GameContext {
    config: GameConfig,
    entities: EntityManager,
    world: WorldManager,
    bullets: BulletManager,
    enemies: EnemyManager,
    registry: EnemyRegistry,
    states: GameStateManager,
    camera: Camera,
    player: Option<Entity>,
    hud: Vec<Entity>,
    runs: u32,
}

impl GameContext {
    pub fn new(config: GameConfig, world: WorldManager, registry: EnemyRegistry) -> Self {
        let camera = Camera::new(
            Vec2::new(config.window.width, config.window.height),
            config.camera_follow_speed,
        );
        Self {
            config,
            entities: EntityManager::new(),
            world,
            bullets: BulletManager::new(),
            enemies: EnemyManager::new(),
            registry,
            states: GameStateManager::new(),
            camera,
            player: None,
            hud: Vec::new(),
            runs: 0,
        }
    }

    /// Load config, asset manifest, enemy definitions and zone templates from `assets/data`.
    pub fn load() -> Self {
        let config = GameConfig::load();
        let catalog = AssetCatalog::load();
        let registry = EnemyRegistry::load();
        let world = WorldManager::load(catalog, &config.world);
        Self::new(config, world, registry)
    }

    /// Advance one frame.
    ///
    /// Input is mapped to at most one state action, then the active state
    /// runs. Only `Playing` simulates; `Menu` and `Paused` leave the world as is.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) -> FrameReport {
        let mut report = FrameReport::default();

        if let Some(transition) = self.handle_input(input) {
            report.transitions.push(transition);
        }

        match self.states.current() {
            GameState::Playing => self.update_playing(dt, input, &mut report),
            GameState::Menu | GameState::Paused => {}
        }
        report
    }

    /// Apply a state action directly, running its enter/exit work.
    pub fn apply(&mut self, action: StateAction) -> Result<Transition, StateError> {
        let transition = self.states.apply(action)?;
        self.on_transition(transition);
        Ok(transition)
    }

    fn handle_input(&mut self, input: &InputSnapshot) -> Option<Transition> {
        let action = ACTION_ORDER
            .into_iter()
            .filter(|action| requested(input, *action))
            .find(|action| self.states.target(*action).is_some())?;
        self.apply(action).ok()
    }

    fn on_transition(&mut self, transition: Transition) {
        match transition.action {
            StateAction::Start => self.begin_run(),
            StateAction::QuitToMenu => self.end_run(),
            StateAction::Pause | StateAction::Resume => {}
        }
    }

    /// Spawn the player and HUD. Chunks stream in on the first playing update.
    fn begin_run(&mut self) {
        let start = Vec2::new(self.config.player_start.0, self.config.player_start.1);
        self.player = Some(spawn_player(&mut self.entities, &self.config.player, start));
        self.camera.snap_to(start);
        self.hud = [HUD_HEALTH, HUD_KILLS, HUD_ZONE]
            .into_iter()
            .map(|label| self.spawn_hud_element(label))
            .collect();
        self.runs += 1;
        info!("Run {} started", self.runs);
    }

    fn spawn_hud_element(&mut self, label: &str) -> Entity {
        let entity = self.entities.create_entity(EntityKind::Ui, label);
        if let Err(e) = self.entities.attach(entity, UiElement::new(label)) {
            warn!("HUD setup failed: {}", e);
        }
        entity
    }

    fn end_run(&mut self) {
        self.world.clear(&mut self.entities);
        self.entities.clear();
        self.bullets = BulletManager::new();
        self.enemies.reset();
        self.player = None;
        self.hud.clear();
        info!("Run ended");
    }

    fn update_playing(&mut self, dt: f32, input: &InputSnapshot, report: &mut FrameReport) {
        let Some(player) = self.player else {
            warn!("Playing without a player, starting a new run");
            self.begin_run();
            return;
        };

        if update_player(&mut self.entities, &mut self.bullets, player, input, &self.config.player, dt) {
            report.bullets_fired += 1;
        }

        let target = self.player_position();
        report.bullets_fired += self.enemies.update(&mut self.entities, &mut self.bullets, target, dt);
        report.bullets_expired = self.bullets.update(&mut self.entities, dt);

        combat::tick_health(&mut self.entities, dt);
        report.hits = combat::resolve(&mut self.entities, self.config.player.invincibility);
        report.deaths = self.enemies.reap(&mut self.entities);
        report.pickups = combat::collect_loot(&mut self.entities);

        let alive = self
            .entities
            .get::<Health>(player)
            .is_some_and(|health| !health.is_dead());
        if !alive {
            info!("Player died after {} kills, restarting", self.enemies.kills());
            report.player_died = true;
            self.end_run();
            self.begin_run();
        }

        if let Some(position) = self.player_position() {
            self.camera.follow(position, dt);
        }
        report.streaming = self.world.update(self.camera.position, &mut self.entities, &self.registry);

        self.refresh_hud();
        debug!("Frame: {} entities, {} hits", self.entities.len(), report.hits.len());
    }

    fn refresh_hud(&mut self) {
        let health = self
            .player
            .and_then(|p| self.entities.get::<Health>(p))
            .map(|h| format!("HP {:.0}/{:.0}", h.current.max(0.0), h.maximum))
            .unwrap_or_default();
        let kills = format!("Kills {}", self.enemies.kills());
        let zone = self
            .player_position()
            .and_then(|p| self.world.zone_at(p))
            .map(|zone| zone.name().to_string())
            .unwrap_or_default();

        for &entity in &self.hud {
            let Some(mut element) = self.entities.get_mut::<UiElement>(entity) else {
                continue;
            };
            let text = match element.label.as_str() {
                HUD_HEALTH => health.clone(),
                HUD_KILLS => kills.clone(),
                HUD_ZONE => zone.clone(),
                _ => continue,
            };
            element.text = text;
        }
    }

    /// Render hook: what is on screen right now.
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let view = self.camera.view_rect();
        let offset = self.camera.offset();
        let to_screen = |rect: Rect| Rect::from_corners(rect.min - offset, rect.max - offset);

        let tiles = self
            .world
            .active_zones()
            .flat_map(|zone| zone.tiles())
            .filter(|tile| overlaps(tile.rect(), view))
            .map(|tile| TileDraw {
                image: tile.image().clone(),
                rect: to_screen(tile.rect()),
            })
            .collect();

        let world = self.entities.world_mut();
        let mut sprites: Vec<SpriteDraw> = world
            .query::<(Entity, &Transform, &Sprite)>()
            .iter(world)
            .map(|(entity, transform, sprite)| {
                let rect = Rect::from_center_size(transform.position, sprite.size * transform.scale);
                (entity, transform, sprite, rect)
            })
            .filter(|(.., rect)| overlaps(*rect, view))
            .map(|(entity, transform, sprite, rect)| SpriteDraw {
                entity,
                image_key: sprite.image_key.clone(),
                rect: to_screen(rect),
                layer: sprite.layer,
                rotation: transform.rotation,
            })
            .collect();
        sprites.sort_by_key(|s| (s.layer, s.entity));

        let mut hud: Vec<(Entity, HudLine)> = world
            .query::<(Entity, &UiElement)>()
            .iter(world)
            .filter(|(_, element)| element.visible)
            .map(|(entity, element)| {
                (
                    entity,
                    HudLine {
                        label: element.label.clone(),
                        text: element.text.clone(),
                    },
                )
            })
            .collect();
        hud.sort_by_key(|(entity, _)| *entity);

        RenderSnapshot {
            state: self.states.current(),
            camera_offset: offset,
            viewport: self.camera.viewport,
            tiles,
            sprites,
            hud: hud.into_iter().map(|(_, line)| line).collect(),
        }
    }

    pub fn state(&self) -> GameState {
        self.states.current()
    }

    pub fn states(&self) -> &GameStateManager {
        &self.states
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player
            .and_then(|p| self.entities.get::<Transform>(p))
            .map(|t| t.position)
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn world(&self) -> &WorldManager {
        &self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn kills(&self) -> u32 {
        self.enemies.kills()
    }

    /// Runs started since launch, counting restarts after death.
    pub fn runs(&self) -> u32 {
        self.runs
    }
}

fn requested(input: &InputSnapshot, action: StateAction) -> bool {
    match action {
        StateAction::Start => input.start,
        StateAction::Pause => input.pause,
        StateAction::Resume => input.resume,
        StateAction::QuitToMenu => input.quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Bullet, Enemy, Loot, Rarity};
    use crate::world::{WorldSettings, ZoneTemplateLoader};
    use bevy::ecs::query::With;

    const START: &str = r#"(
        palette: {'G': "ground"},
        tiles: ["GGGGGGGGGG", "GGGGGGGGGG"],
        enemies: [(kind: "grunt", x: 160.0, y: 300.0)],
    )"#;
    const FIELD: &str = r#"(palette: {'G': "grass"}, tiles: ["G"])"#;

    fn game() -> GameContext {
        let mut loader = ZoneTemplateLoader::new();
        loader.register("forest", "start", "starting_zone", START);
        loader.register("forest", "early", "field", FIELD);
        let config = GameConfig {
            world: WorldSettings {
                load_radius: 0,
                ..WorldSettings::default()
            },
            ..GameConfig::default()
        };
        let world = WorldManager::new(loader, AssetCatalog::default(), &config.world);
        GameContext::new(config, world, EnemyRegistry::builtin())
    }

    fn press(f: impl FnOnce(&mut InputSnapshot)) -> InputSnapshot {
        let mut input = InputSnapshot::default();
        f(&mut input);
        input
    }

    #[test]
    fn menu_does_not_simulate() {
        let mut game = game();
        let report = game.tick(0.016, &InputSnapshot::default());
        assert_eq!(game.state(), GameState::Menu);
        assert!(report.transitions.is_empty());
        assert!(game.entities().is_empty());
        assert!(game.snapshot().is_empty());
    }

    #[test]
    fn start_spawns_player_and_streams_origin() {
        let mut game = game();
        let report = game.tick(0.016, &press(|i| i.start = true));

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(report.transitions.len(), 1);
        assert!(game.player().is_some());
        assert_eq!(report.streaming.activated.len(), 1);
        assert_eq!(game.entities_mut().query::<With<Enemy>>().len(), 1);

        let snapshot = game.snapshot();
        assert_eq!(snapshot.tiles.len(), 20);
        assert_eq!(snapshot.hud_text(HUD_ZONE), Some("starting_zone"));
        assert_eq!(snapshot.hud_text(HUD_HEALTH), Some("HP 100/100"));
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut game = game();
        game.tick(0.016, &press(|i| i.start = true));
        game.tick(0.016, &press(|i| i.pause = true));
        assert_eq!(game.state(), GameState::Paused);

        let before = game.player_position();
        let moving = press(|i| i.movement = Vec2::X);
        game.tick(0.5, &moving);
        assert_eq!(game.player_position(), before);

        // escape sends both flags; only one action applies per frame
        game.tick(0.016, &press(|i| {
            i.pause = true;
            i.resume = true;
        }));
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn quit_clears_the_run() {
        let mut game = game();
        game.tick(0.016, &press(|i| i.start = true));
        game.tick(0.016, &press(|i| i.pause = true));
        game.tick(0.016, &press(|i| i.quit = true));

        assert_eq!(game.state(), GameState::Menu);
        assert!(game.player().is_none());
        assert!(game.entities().is_empty());
        assert!(game.world().chunks().is_empty());
    }

    #[test]
    fn player_bullets_kill_enemies() {
        let mut game = game();
        game.tick(0.016, &press(|i| i.start = true));
        let player = game.player_position().unwrap();

        // park a grunt right above the player
        let entities = game.entities_mut();
        let grunt = entities.query::<With<Enemy>>()[0];
        entities.get_mut::<Transform>(grunt).unwrap().position = player - Vec2::new(0.0, 60.0);
        entities.get_mut::<Health>(grunt).unwrap().current = 5.0;

        let fire = press(|i| i.fire = true);
        let mut deaths = 0;
        for _ in 0..10 {
            deaths += game.tick(0.016, &fire).deaths.len();
        }
        assert_eq!(deaths, 1);
        assert_eq!(game.kills(), 1);
        assert_eq!(game.snapshot().hud_text(HUD_KILLS), Some("Kills 1"));
    }

    #[test]
    fn walking_over_a_potion_heals_the_player() {
        let mut game = game();
        game.tick(0.016, &press(|i| i.start = true));
        let player = game.player().unwrap();
        let position = game.player_position().unwrap();

        let entities = game.entities_mut();
        entities.get_mut::<Health>(player).unwrap().current = 50.0;
        let grunt = entities.query::<With<Enemy>>()[0];
        entities.destroy(grunt);
        let potion = entities.spawn_at(EntityKind::Loot, "potion", Transform::from_position(position));
        let loot = Loot {
            kind: "potion".to_string(),
            rarity: Rarity::Common,
        };
        entities.attach(potion, loot).unwrap();
        entities.attach(potion, Sprite::new("loot.potion", Vec2::splat(16.0), Sprite::LOOT_LAYER)).unwrap();

        let report = game.tick(0.016, &InputSnapshot::default());
        assert_eq!(report.pickups.len(), 1);
        assert_eq!(report.pickups[0].loot, potion);
        assert_eq!(report.pickups[0].healed, Loot::POTION_HEALING);
        assert!(!game.entities().contains(potion));
        assert_eq!(game.snapshot().hud_text(HUD_HEALTH), Some("HP 75/100"));
    }

    #[test]
    fn player_death_restarts_the_run() {
        let mut game = game();
        game.tick(0.016, &press(|i| i.start = true));
        let first = game.player().unwrap();
        game.entities_mut().get_mut::<Health>(first).unwrap().take_damage(1000.0);

        let report = game.tick(0.016, &InputSnapshot::default());
        assert!(report.player_died);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.runs(), 2);
        assert!(!game.entities().contains(first));
        assert!(game.player().is_some());
        assert!(game.entities_mut().query::<With<Bullet>>().is_empty());
    }
}
