use crate::{Ball, Config, GameMap, GameRng};
use glam::Vec2;
use hecs::World;
use rand::Rng;

const HAZARD_CHANCE: f64 = 0.003;
const SPEED_BURST: f32 = 1.5;

/// Rare ball tricks played by the strongest AI
///
/// With a small chance per tick the ball either bursts to 1.5x speed or,
/// while it travels toward the AI, jumps back to just in front of the human
/// paddle.
pub fn apply_expert_hazards(
    world: &mut World,
    map: &GameMap,
    config: &Config,
    rng: &mut GameRng,
) {
    if !rng.0.gen_bool(HAZARD_CHANCE) {
        return;
    }
    let burst = rng.0.gen_bool(0.5);

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if burst {
            ball.vel *= SPEED_BURST;
            ball.clamp_speed(config.ball_speed_max);
            log::debug!("hazard: speed burst");
        } else if ball.vel.x > 0.0 {
            teleport_near_human(ball, map, config, rng);
            log::debug!("hazard: teleport to ({:.0}, {:.0})", ball.pos.x, ball.pos.y);
        }
    }
}

fn teleport_near_human(ball: &mut Ball, map: &GameMap, config: &Config, rng: &mut GameRng) {
    let x = config.paddle_inset_left + 3.0 * config.paddle_width;
    let low = config.paddle_height.min(map.height / 2.0);
    let high = (map.height - config.paddle_height).max(low);
    let y = if high > low {
        rng.0.gen_range(low..high)
    } else {
        low
    };

    let half = ball.half_size();
    ball.pos = Vec2::new(x.clamp(half, map.width - half), map.clamp_y(y, half));
}
