//! Per-frame input, captured by the shell and consumed by the core.

use bevy::math::Vec2;
use bevy::prelude::Resource;

/// Input state for one frame. The core never polls hardware.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Desired movement direction, +y down; need not be normalized
    pub movement: Vec2,
    /// Fire held
    pub fire: bool,
    pub pause: bool,
    pub start: bool,
    pub resume: bool,
    pub quit: bool,
}
