//! Game state machine that controls the overall flow of the game.
//!
//! Only the active state is ticked: the world simulates in `Playing`, is
//! frozen but visible in `Paused`, and is empty in `Menu`.

use bevy::log::{info, warn};
use bevy::prelude::States;
use thiserror::Error;

/// Main game states.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Title screen, no run in progress
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay frozen (overlay on the world)
    Paused,
}

/// Player-requested state changes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StateAction {
    Start,
    Pause,
    Resume,
    QuitToMenu,
}

/// One applied state change.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Transition {
    pub from: GameState,
    pub to: GameState,
    pub action: StateAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{action:?} is not valid in the {state:?} state")]
    InvalidTransition { state: GameState, action: StateAction },
}

/// Finite state machine over [`GameState`], recording every applied transition.
#[derive(Debug, Default)]
pub struct GameStateManager {
    current: GameState,
    history: Vec<Transition>,
}

impl GameStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    /// Transitions applied so far, oldest first.
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Target state for `action` from the current state, if the move is allowed.
    pub fn target(&self, action: StateAction) -> Option<GameState> {
        match (self.current, action) {
            (GameState::Menu, StateAction::Start) => Some(GameState::Playing),
            (GameState::Playing, StateAction::Pause) => Some(GameState::Paused),
            (GameState::Paused, StateAction::Resume) => Some(GameState::Playing),
            (GameState::Paused, StateAction::QuitToMenu) => Some(GameState::Menu),
            _ => None,
        }
    }

    /// Apply an action. Invalid actions leave the state unchanged.
    pub fn apply(&mut self, action: StateAction) -> Result<Transition, StateError> {
        let Some(to) = self.target(action) else {
            warn!("Ignoring {:?} in {:?}", action, self.current);
            return Err(StateError::InvalidTransition {
                state: self.current,
                action,
            });
        };

        let transition = Transition {
            from: self.current,
            to,
            action,
        };
        info!("State {:?} -> {:?} ({:?})", transition.from, transition.to, action);
        self.current = to;
        self.history.push(transition);
        Ok(transition)
    }
}
