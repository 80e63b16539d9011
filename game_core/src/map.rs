use glam::Vec2;

use crate::components::Side;
use crate::config::Config;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// The rectangular table
#[derive(Debug, Clone, Copy)]
pub struct GameMap {
    pub width: f32,
    pub height: f32,
}

impl GameMap {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.arena_width, config.arena_height)
    }

    /// Ball serve position (table centre)
    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Paddle start position for a side
    pub fn paddle_spawn(&self, side: Side, config: &Config) -> Vec2 {
        Vec2::new(config.paddle_x(side), self.height / 2.0)
    }

    /// Clamp a centre y so a body of `half_extent` stays on the table
    pub fn clamp_y(&self, y: f32, half_extent: f32) -> f32 {
        let half_extent = half_extent.min(self.height / 2.0);
        y.clamp(half_extent, self.height - half_extent)
    }

    /// Bounding box of a paddle centred at `y`
    pub fn paddle_bounds(&self, side: Side, y: f32, height: f32, config: &Config) -> Aabb {
        Aabb::from_center_size(
            Vec2::new(config.paddle_x(side), y),
            Vec2::new(config.paddle_width, height),
        )
    }
}

impl Default for GameMap {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::from_center_size(Vec2::new(10.0, 10.0), Vec2::new(4.0, 4.0));
        let b = Aabb::from_center_size(Vec2::new(13.0, 10.0), Vec2::new(4.0, 4.0));
        let c = Aabb::from_center_size(Vec2::new(14.0, 10.0), Vec2::new(4.0, 4.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c), "Touching boxes do not overlap");
    }

    #[test]
    fn test_map_spawns() {
        let config = Config::default();
        let map = GameMap::from_config(&config);
        assert_eq!(map.ball_spawn(), Vec2::new(480.0, 270.0));
        assert_eq!(map.paddle_spawn(Side::Left, &config), Vec2::new(34.5, 270.0));
    }

    #[test]
    fn test_clamp_y_handles_oversized_body() {
        let map = GameMap::new(100.0, 50.0);
        assert_eq!(map.clamp_y(-10.0, 5.0), 5.0);
        assert_eq!(map.clamp_y(80.0, 5.0), 45.0);
        assert_eq!(map.clamp_y(10.0, 40.0), 25.0);
    }
}
