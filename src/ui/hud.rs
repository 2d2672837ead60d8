//! In-game HUD - health bar and the core's HUD labels.

use bevy::prelude::*;

use crate::core::{Game, GameState};
use crate::ecs::Health;
use crate::rendering::FrameSnapshot;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for the label text block.
#[derive(Component)]
pub struct HudText;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::Playing), spawn_hud)
        .add_systems(OnExit(GameState::Playing), cleanup_hud)
        .add_systems(
            Update,
            (update_health_bar, update_hud_text)
                .after(crate::core::CoreSet::Tick)
                .run_if(in_state(GameState::Playing)),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // HUD root container (top-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Start,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                HudText,
            ));
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(8.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Update health bar based on player health.
fn update_health_bar(game: Res<Game>, mut bar_query: Query<&mut Node, With<HealthBar>>) {
    let Some(health) = game.player().and_then(|p| game.entities().get::<Health>(p)) else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(health.percentage().clamp(0.0, 1.0) * 100.0);
}

/// One line per HUD label, in spawn order.
fn update_hud_text(frame: Res<FrameSnapshot>, mut text_query: Query<&mut Text, With<HudText>>) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    let lines: Vec<&str> = frame
        .hud
        .iter()
        .filter(|line| !line.text.is_empty())
        .map(|line| line.text.as_str())
        .collect();
    text.0 = lines.join("\n");
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
