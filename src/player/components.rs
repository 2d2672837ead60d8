//! Player tuning.

use serde::Deserialize;

/// Configuration for the player avatar, loaded as part of the game config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Top speed in pixels per second
    pub move_speed: f32,
    pub acceleration: f32,
    /// Velocity damping per second when no movement is held
    pub friction: f32,
    pub max_health: f32,
    /// Hitbox and sprite size in pixels
    pub size: f32,
    /// Seconds between shots while fire is held
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_size: f32,
    pub bullet_lifetime: f32,
    /// Seconds of invincibility after a contact hit
    pub invincibility: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 300.0,
            acceleration: 2400.0,
            friction: 8.0,
            max_health: 100.0,
            size: 32.0,
            fire_cooldown: 0.33,
            bullet_speed: 600.0,
            bullet_damage: 10.0,
            bullet_size: 8.0,
            bullet_lifetime: 2.0,
            invincibility: 1.0,
        }
    }
}
