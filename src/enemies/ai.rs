//! Enemy steering and aiming.

use bevy::math::Vec2;

use crate::ecs::{Behavior, StateMachine};

/// Seconds a patrol sweeps in one direction before turning around.
pub const PATROL_PERIOD: f32 = 2.0;
/// Seconds per vertical leg of a zigzag.
pub const ZIGZAG_PERIOD: f32 = 0.75;
/// Enemies only shoot at targets closer than this.
pub const FIRE_RANGE: f32 = 600.0;
/// A roaming enemy starts chasing a target this close.
pub const DETECTION_RANGE: f32 = 250.0;
/// A chasing enemy gives up once the target is this far away.
pub const LOSE_RANGE: f32 = DETECTION_RANGE * 1.5;

/// +1 for the first half of every `period * 2` window, -1 for the second.
fn alternate(elapsed: f32, period: f32) -> f32 {
    if (elapsed / period) as u32 % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Switch between the spawn behavior and [`Behavior::Chase`] based on how far
/// the target is.
///
/// Stationary enemies never leave their post. A chase ends when the target is
/// gone or beyond [`LOSE_RANGE`], and the enemy returns to what it was doing.
pub fn think(state: &mut StateMachine, position: Vec2, target: Option<Vec2>) {
    let distance = target.map(|t| t.distance(position));
    match state.current {
        Behavior::Stationary => {}
        Behavior::Chase => {
            if distance.map_or(true, |d| d > LOSE_RANGE) {
                let home = state.previous.unwrap_or_default();
                state.change(home);
            }
        }
        _ => {
            if distance.is_some_and(|d| d <= DETECTION_RANGE) {
                state.change(Behavior::Chase);
            }
        }
    }
}

/// Velocity an enemy wants this frame given its behavior and time in it.
///
/// Patrol sweeps left and right. Zigzag traces a diamond: horizontal direction
/// flips every two vertical legs, so the path closes on itself. Chase heads for
/// `to_target`, the offset from the enemy to the player.
pub fn steer(state: &StateMachine, move_speed: f32, to_target: Option<Vec2>) -> Vec2 {
    match state.current {
        Behavior::Patrol => Vec2::new(alternate(state.elapsed, PATROL_PERIOD) * move_speed, 0.0),
        Behavior::Zigzag => {
            let direction = Vec2::new(
                alternate(state.elapsed, ZIGZAG_PERIOD * 2.0),
                alternate(state.elapsed, ZIGZAG_PERIOD),
            );
            direction.normalize() * move_speed
        }
        Behavior::Stationary => Vec2::ZERO,
        Behavior::Chase => to_target.map_or(Vec2::ZERO, |offset| offset.normalize_or_zero() * move_speed),
    }
}

/// Direction to shoot at `target`, if it is in range.
pub fn aim(from: Vec2, target: Vec2) -> Option<Vec2> {
    let offset = target - from;
    let distance = offset.length();
    if distance > FIRE_RANGE || distance < f32::EPSILON {
        return None;
    }
    Some(offset / distance)
}
