//! Combat module - bullets, hit detection, damage and loot pickup.

mod bullets;
pub mod collision;
mod pickup;

pub use bullets::{BulletManager, BulletSpec};
pub use collision::{overlaps, resolve, tick_health};
pub use pickup::collect_loot;
