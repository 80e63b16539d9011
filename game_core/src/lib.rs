pub mod ai;
pub mod components;
pub mod config;
pub mod deception;
pub mod map;
pub mod match_loop;
pub mod params;
pub mod resources;
pub mod snapshot;
pub mod streak;
pub mod systems;

pub use ai::*;
pub use components::*;
pub use config::*;
pub use deception::*;
pub use map::*;
pub use match_loop::*;
pub use params::*;
pub use resources::*;
pub use snapshot::*;
pub use streak::*;
pub use systems::TickInput;

use hecs::World;

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, y: f32, height: f32) -> hecs::Entity {
    world.spawn((Paddle::new(side, y, height), PaddleIntent::new()))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: glam::Vec2, vel: glam::Vec2, size: f32) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel, size),))
}
