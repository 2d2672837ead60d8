//! Component data shared by every gameplay system.
//!
//! Components are plain data. Behavior lives in the managers that query them
//! (bullets, enemies, collision, player control).

use bevy::ecs::component::Component;
use bevy::math::{Rect, Vec2};
use serde::Deserialize;

/// Broad category of an entity, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet,
    Loot,
    Decoration,
    Effect,
    Ui,
}

/// Identity attached to every entity by the entity manager.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tag {
    pub kind: EntityKind,
    pub name: String,
}

/// World-space placement. Positions use screen orientation (+y is down).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }
}

/// Linear velocity in pixels per second.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// Visual reference resolved by the renderer through the asset catalog.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Logical asset key, e.g. `enemy.grunt`
    pub image_key: String,
    /// Drawn size in pixels
    pub size: Vec2,
    /// Draw order (higher draws on top)
    pub layer: i32,
}

impl Sprite {
    pub const DECORATION_LAYER: i32 = 1;
    pub const LOOT_LAYER: i32 = 2;
    pub const ENEMY_LAYER: i32 = 3;
    pub const BULLET_LAYER: i32 = 4;
    pub const PLAYER_LAYER: i32 = 5;

    pub fn new(image_key: impl Into<String>, size: Vec2, layer: i32) -> Self {
        Self {
            image_key: image_key.into(),
            size,
            layer,
        }
    }
}

/// Movement tuning for entities steered by acceleration instead of raw velocity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    /// Acceleration applied along the steering direction (px/s²)
    pub acceleration: f32,
    /// Velocity damping per second (0 = none)
    pub friction: f32,
    pub max_speed: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            acceleration: 2400.0,
            friction: 8.0,
            max_speed: 300.0,
        }
    }
}

impl Physics {
    /// Advance `velocity` one step toward `direction` (not necessarily normalized).
    pub fn steer(&self, velocity: Vec2, direction: Vec2, dt: f32) -> Vec2 {
        let mut next = velocity + direction.normalize_or_zero() * self.acceleration * dt;
        if direction == Vec2::ZERO {
            next *= (1.0 - self.friction * dt).max(0.0);
        }
        next.clamp_length_max(self.max_speed)
    }
}

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
    /// Seconds of remaining invincibility
    pub invincible_for: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
            invincible_for: 0.0,
        }
    }

    /// Apply damage unless invincible. Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if self.is_invincible() {
            return 0.0;
        }
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    pub fn set_invincible(&mut self, duration: f32) {
        self.invincible_for = self.invincible_for.max(duration);
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_for > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        self.invincible_for = (self.invincible_for - dt).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

/// Which side fired a bullet / which side a collider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

/// Axis-aligned hitbox centered on the entity's position plus `offset`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub size: Vec2,
    pub offset: Vec2,
    pub faction: Faction,
}

impl Collision {
    pub fn new(size: Vec2, faction: Faction) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
            faction,
        }
    }

    pub fn rect(&self, transform: &Transform) -> Rect {
        Rect::from_center_size(transform.position + self.offset, self.size * transform.scale)
    }
}

/// Steering behavior driven by the enemy AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Behavior {
    /// Sweep left and right
    #[default]
    Patrol,
    /// Diagonal sweeps that alternate vertical direction
    Zigzag,
    /// Hold position and shoot
    Stationary,
    /// Head straight for the player
    Chase,
}

/// Per-entity state machine: current behavior plus time spent in it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct StateMachine {
    pub current: Behavior,
    pub previous: Option<Behavior>,
    /// Seconds since the last change
    pub elapsed: f32,
}

impl StateMachine {
    pub fn new(initial: Behavior) -> Self {
        Self {
            current: initial,
            previous: None,
            elapsed: 0.0,
        }
    }

    pub fn change(&mut self, next: Behavior) {
        if next == self.current {
            return;
        }
        self.previous = Some(self.current);
        self.current = next;
        self.elapsed = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}

/// Projectile payload and lifetime.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Bullet {
    pub damage: f32,
    pub faction: Faction,
    /// Seconds before the bullet expires
    pub lifetime: f32,
    pub age: f32,
}

impl Bullet {
    /// Age the bullet. Returns true once its lifetime is used up.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Enemy stats, copied from its definition at spawn time.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: String,
    pub move_speed: f32,
    pub contact_damage: f32,
    /// Seconds between shots; `None` never fires
    pub fire_cooldown: Option<f32>,
    pub fire_timer: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
}

/// Marker plus fire cooldown for the player avatar.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub fire_timer: f32,
}

/// Loot rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
}

/// A pickup placed by a zone template.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Loot {
    pub kind: String,
    pub rarity: Rarity,
}

impl Loot {
    /// Health restored by a potion pickup.
    pub const POTION_HEALING: f32 = 25.0;

    /// Health this pickup restores. Only potions heal; everything else is just collected.
    pub fn healing(&self) -> f32 {
        match self.kind.as_str() {
            "potion" => Self::POTION_HEALING,
            _ => 0.0,
        }
    }
}

/// A HUD label; the renderer shows visible labels in order.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct UiElement {
    pub label: String,
    pub text: String,
    pub visible: bool,
}

impl UiElement {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: String::new(),
            visible: true,
        }
    }
}
