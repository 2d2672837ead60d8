//! 2D camera: smoothed follow and world/screen conversion.

use bevy::math::{Rect, Vec2};

/// Center-anchored view into the world. Screen space has its origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position at the center of the screen
    pub position: Vec2,
    pub viewport: Vec2,
    /// Interpolation speed multiplier (higher = faster)
    pub follow_speed: f32,
}

impl Camera {
    pub fn new(viewport: Vec2, follow_speed: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
            follow_speed,
        }
    }

    /// Move part of the way toward `target`.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let t = (self.follow_speed * dt).min(1.0);
        self.position = self.position.lerp(target, t);
    }

    pub fn snap_to(&mut self, target: Vec2) {
        self.position = target;
    }

    /// World position of the screen's top-left corner.
    pub fn offset(&self) -> Vec2 {
        self.position - self.viewport / 2.0
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset()
    }

    /// World-space rectangle currently on screen.
    pub fn view_rect(&self) -> Rect {
        Rect::from_center_size(self.position, self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_are_inverse() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0), 5.0);
        camera.snap_to(Vec2::new(1000.0, -200.0));
        let world = Vec2::new(1010.0, -190.0);
        let screen = camera.world_to_screen(world);
        assert_eq!(screen, Vec2::new(410.0, 310.0));
        assert_eq!(camera.screen_to_world(screen), world);
        assert_eq!(camera.view_rect().min, Vec2::new(600.0, -500.0));
    }

    #[test]
    fn follow_closes_distance_without_overshoot() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0), 5.0);
        camera.follow(Vec2::new(100.0, 0.0), 0.1);
        assert_eq!(camera.position, Vec2::new(50.0, 0.0));
        camera.follow(Vec2::new(100.0, 0.0), 1.0);
        assert_eq!(camera.position, Vec2::new(100.0, 0.0));
    }
}
