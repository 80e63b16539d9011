use crate::{Aabb, Ball, Config, Events, GameMap, Paddle, Side};
use glam::Vec2;
use hecs::World;

/// Check ball collisions with walls and paddles
pub fn check_collisions(world: &mut World, map: &GameMap, config: &Config, events: &mut Events) {
    // Collect paddle data first so the ball can be borrowed mutably
    let paddles: Vec<(Side, f32, f32)> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, p)| (p.side, p.y, p.height))
        .collect();

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if bounce_off_walls(ball, map) {
            events.ball_hit_wall = true;
        }

        for &(side, paddle_y, paddle_height) in &paddles {
            if bounce_off_paddle(ball, side, paddle_y, paddle_height, map, config) {
                events.ball_hit_paddle = true;
                break;
            }
        }

        ball.clamp_speed(config.ball_speed_max);
    }
}

/// Reflect off the top or bottom edge, clamping the ball back inside
pub fn bounce_off_walls(ball: &mut Ball, map: &GameMap) -> bool {
    let half = ball.half_size();
    if ball.pos.y - half <= 0.0 {
        ball.pos.y = half;
        ball.vel.y = ball.vel.y.abs();
        true
    } else if ball.pos.y + half >= map.height {
        ball.pos.y = map.height - half;
        ball.vel.y = -ball.vel.y.abs();
        true
    } else {
        false
    }
}

/// Bounce the ball off one paddle when they overlap
///
/// The ball leaves away from the paddle, slightly faster, with a vertical
/// speed set by where it struck relative to the paddle centre.
fn bounce_off_paddle(
    ball: &mut Ball,
    side: Side,
    paddle_y: f32,
    paddle_height: f32,
    map: &GameMap,
    config: &Config,
) -> bool {
    let paddle_box = map.paddle_bounds(side, paddle_y, paddle_height, config);
    let ball_box = Aabb::from_center_size(ball.pos, Vec2::splat(ball.size));
    if !paddle_box.intersects(&ball_box) {
        return false;
    }

    let speed_x = (ball.vel.x.abs() * config.ball_speed_increase).min(config.ball_speed_max);
    ball.vel.x = side.outward() * speed_x;

    let half_height = (paddle_height / 2.0).max(f32::EPSILON);
    let offset = ((ball.pos.y - paddle_y) / half_height).clamp(-1.0, 1.0);
    ball.vel.y = offset * config.ball_speed_y;

    let paddle_x = config.paddle_x(side);
    let reach = config.paddle_width / 2.0 + ball.half_size();
    ball.pos.x = paddle_x + side.outward() * reach;
    true
}
