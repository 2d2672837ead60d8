//! Rendering plugin - draws the core's [`RenderSnapshot`] with bevy sprites.
//!
//! The snapshot is in screen space (origin top-left, +y down). Bevy's 2D
//! camera sits at the origin with +y up, so every rect is flipped on the way in.

use bevy::prelude::*;

use super::snapshot::RenderSnapshot;
use crate::core::{CoreSet, Game};

const TILE_Z: f32 = 0.0;
const CLEAR_COLOR: Color = Color::srgb(0.06, 0.06, 0.08);

/// Rendering plugin - owns the 2D camera and mirrors the snapshot into sprites.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(CLEAR_COLOR))
            .init_resource::<FrameSnapshot>()
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, (capture_snapshot, draw_snapshot).chain().after(CoreSet::Tick));
    }
}

/// The snapshot taken this frame, shared with the UI.
#[derive(Resource, Default, Deref)]
pub struct FrameSnapshot(pub RenderSnapshot);

/// Marker for sprites rebuilt every frame.
#[derive(Component)]
struct Drawn;

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn capture_snapshot(mut game: ResMut<Game>, mut frame: ResMut<FrameSnapshot>) {
    frame.0 = game.snapshot();
}

fn draw_snapshot(
    mut commands: Commands,
    game: Res<Game>,
    frame: Res<FrameSnapshot>,
    asset_server: Res<AssetServer>,
    drawn: Query<Entity, With<Drawn>>,
) {
    for entity in drawn.iter() {
        commands.entity(entity).despawn();
    }

    let catalog = game.world().catalog();
    let viewport = frame.viewport;
    let mut draw = |key: &str, rect: Rect, z: f32, rotation: f32| {
        let size = rect.size();
        let sprite = match catalog.get(key) {
            Some(entry) => match &entry.path {
                Some(path) => Sprite {
                    image: asset_server.load(path.clone()),
                    custom_size: Some(size),
                    ..default()
                },
                None => Sprite::from_color(Color::srgb(entry.color.0, entry.color.1, entry.color.2), size),
            },
            None => Sprite::from_color(Color::srgb(1.0, 0.0, 1.0), size),
        };
        let center = rect.center();
        let position = Vec3::new(center.x - viewport.x / 2.0, viewport.y / 2.0 - center.y, z);
        commands.spawn((
            sprite,
            Transform::from_translation(position).with_rotation(Quat::from_rotation_z(-rotation)),
            Drawn,
        ));
    };

    for tile in &frame.tiles {
        draw(tile.image.key(), tile.rect, TILE_Z, 0.0);
    }
    for sprite in &frame.sprites {
        draw(&sprite.image_key, sprite.rect, sprite.layer as f32, sprite.rotation);
    }
}
