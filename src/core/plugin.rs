//! Bevy shell around the core: input capture, ticking and event forwarding.

use bevy::prelude::*;

use super::events::{ChunkEvent, DeathEvent, HitEvent, PickupEvent};
use super::game::GameContext;
use super::input::InputSnapshot;
use super::states::GameState;

/// Longest frame the simulation will take in one step.
const MAX_FRAME_SECONDS: f32 = 0.1;

/// The running game, owned by the bevy app.
#[derive(Resource, Deref, DerefMut)]
pub struct Game(pub GameContext);

/// Ordering for the per-frame core work.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoreSet {
    /// Build this frame's [`InputSnapshot`]
    Input,
    /// Advance the game and publish its events
    Tick,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - The game state (mirrored from the core's state machine)
/// - Gameplay events (HitEvent, DeathEvent, PickupEvent, ChunkEvent)
/// - Loading the game and ticking it once per frame
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<InputSnapshot>()
            .add_event::<HitEvent>()
            .add_event::<DeathEvent>()
            .add_event::<PickupEvent>()
            .add_event::<ChunkEvent>()
            .configure_sets(Update, (CoreSet::Input, CoreSet::Tick).chain())
            .add_systems(Startup, load_game)
            .add_systems(Update, capture_input.in_set(CoreSet::Input))
            .add_systems(Update, (tick_game, log_frame_events).chain().in_set(CoreSet::Tick));
    }
}

fn load_game(mut commands: Commands) {
    commands.insert_resource(Game(GameContext::load()));
}

/// Keyboard to [`InputSnapshot`]. UI buttons may add flags afterwards in [`CoreSet::Input`].
pub fn capture_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<InputSnapshot>) {
    let mut movement = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        movement.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        movement.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        movement.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        movement.x += 1.0;
    }

    // Escape toggles; the core applies whichever of pause/resume is valid
    let escape = keyboard.just_pressed(KeyCode::Escape);
    *input = InputSnapshot {
        movement,
        fire: keyboard.pressed(KeyCode::Space),
        pause: escape,
        resume: escape,
        start: keyboard.just_pressed(KeyCode::Enter),
        quit: keyboard.just_pressed(KeyCode::KeyQ),
    };
}

fn tick_game(
    time: Res<Time>,
    input: Res<InputSnapshot>,
    mut game: ResMut<Game>,
    mut next_state: ResMut<NextState<GameState>>,
    mut hits: EventWriter<HitEvent>,
    mut deaths: EventWriter<DeathEvent>,
    mut pickups: EventWriter<PickupEvent>,
    mut chunks: EventWriter<ChunkEvent>,
) {
    let dt = time.delta_secs().min(MAX_FRAME_SECONDS);
    let report = game.tick(dt, &input);

    if let Some(transition) = report.transitions.last() {
        next_state.set(transition.to);
    }
    chunks.send_batch(report.chunk_events());
    hits.send_batch(report.hits);
    deaths.send_batch(report.deaths);
    pickups.send_batch(report.pickups);
}

fn log_frame_events(
    mut deaths: EventReader<DeathEvent>,
    mut pickups: EventReader<PickupEvent>,
    mut chunks: EventReader<ChunkEvent>,
) {
    for death in deaths.read() {
        debug!("Enemy {} died at {:?}", death.kind, death.position);
    }
    for pickup in pickups.read() {
        debug!("Collected {} ({:?})", pickup.kind, pickup.rarity);
    }
    for event in chunks.read() {
        if let ChunkEvent::Failed(coord) = event {
            warn!("Chunk ({}, {}) is showing the empty zone", coord.x, coord.y);
        }
    }
}
