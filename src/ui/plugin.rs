//! UI plugin - menus, HUD, and interface elements.
//!
//! Buttons never change state directly; they raise the same input flags as
//! the keyboard so the core's state machine stays the single authority.

use bevy::prelude::*;

use super::hud;
use crate::core::{capture_input, CoreSet, GameState, InputSnapshot};

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app
            // Main menu
            .add_systems(OnEnter(GameState::Menu), setup_main_menu)
            .add_systems(OnExit(GameState::Menu), cleanup::<MainMenuUi>)
            // Pause menu
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(OnExit(GameState::Paused), cleanup::<PauseMenuUi>)
            .add_systems(Update, menu_buttons.in_set(CoreSet::Input).after(capture_input));
    }
}

/// Marker for main menu UI entities.
#[derive(Component)]
struct MainMenuUi;

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

/// Marker for menu buttons.
#[derive(Component, Clone, Copy)]
enum MenuButton {
    Start,
    Exit,
    Resume,
    MainMenu,
}

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVER: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

fn overlay<M: Component>(commands: &mut Commands, background: Color, marker: M) -> Entity {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(background),
            marker,
        ))
        .id()
}

fn spawn_title(parent: &mut ChildBuilder, text: &str, size: f32, color: Color, margin: f32) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(margin)),
            ..default()
        },
    ));
}

/// Set up the main menu.
fn setup_main_menu(mut commands: Commands) {
    let root = overlay(&mut commands, Color::srgb(0.05, 0.05, 0.08), MainMenuUi);
    commands.entity(root).with_children(|parent| {
        spawn_title(parent, "ZONE RUNNER", 80.0, Color::srgb(0.8, 0.7, 0.6), 30.0);
        spawn_title(parent, "Enter to start, Space to fire", 20.0, Color::srgb(0.5, 0.5, 0.55), 50.0);
        spawn_menu_button(parent, "Start", MenuButton::Start);
        spawn_menu_button(parent, "Quit", MenuButton::Exit);
    });
}

/// Set up the pause menu.
fn setup_pause_menu(mut commands: Commands) {
    let root = overlay(&mut commands, Color::srgba(0.0, 0.0, 0.0, 0.7), PauseMenuUi);
    commands.entity(root).with_children(|parent| {
        spawn_title(parent, "PAUSED", 48.0, Color::srgb(0.8, 0.8, 0.85), 40.0);
        spawn_menu_button(parent, "Resume", MenuButton::Resume);
        spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
    });
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

/// Turn button presses into input flags for this frame.
fn menu_buttons(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut input: ResMut<InputSnapshot>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button {
                    MenuButton::Start => input.start = true,
                    MenuButton::Resume => input.resume = true,
                    MenuButton::MainMenu => input.quit = true,
                    MenuButton::Exit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVER.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }
}

/// Despawn every entity carrying marker `M`.
fn cleanup<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
