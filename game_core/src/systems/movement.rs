use crate::{Ball, Config, GameMap, Paddle, PaddleIntent};
use hecs::World;

/// Apply paddle movement based on intents
///
/// Every paddle is clamped every tick, moving or not, because its height
/// can change under it.
pub fn move_paddles(world: &mut World, map: &GameMap, config: &Config) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        if intent.dir != 0 {
            paddle.y += intent.dir as f32 * config.paddle_speed;
        }
        paddle.y = map.clamp_y(paddle.y, paddle.height / 2.0);
    }
}

/// Move ball based on velocity (pixels per tick)
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos += ball.vel;
    }
}
