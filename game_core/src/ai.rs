//! Computer opponents for the right paddle.
//!
//! Every controller reads the ball and its own paddle, returns a vertical
//! step in pixels and never touches the human paddle. Speeds are multiples
//! of the configured paddle speed.

use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::components::{Ball, Paddle, Side};
use crate::config::Config;
use crate::deception::Effect;
use crate::map::GameMap;
use crate::resources::{Difficulty, GameRng, MatchMode};

/// Which heuristic drives the AI paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiController {
    /// "New Born": inattentive and slow, sometimes moves the wrong way
    Novice,
    /// "Normie": follows the ball with a small dead zone
    Standard,
    /// "Knight of Hell": predicts wall bounces and aims trick shots
    Expert,
    /// Adapts to the active deception effect
    Deceiver,
}

/// What a controller can see on a tick
#[derive(Debug, Clone, Copy)]
pub struct AiView {
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub paddle_x: f32,
    pub paddle_y: f32,
    pub paddle_height: f32,
    pub arena_height: f32,
    pub paddle_speed: f32,
}

impl AiView {
    fn approaching(&self) -> bool {
        self.ball_vel.x > 0.0
    }

    fn predicted_y(&self) -> f32 {
        predict_intercept_y(self.ball_pos, self.ball_vel, self.paddle_x, self.arena_height)
    }

    /// Step toward the vertical centre once displaced by more than 20% of the paddle
    fn drift_to_center(&self, speed: f32) -> f32 {
        let center = self.arena_height / 2.0;
        if (self.paddle_y - center).abs() > self.paddle_height * 0.2 {
            if self.paddle_y > center {
                -speed
            } else {
                speed
            }
        } else {
            0.0
        }
    }
}

impl AiController {
    /// Controller for the right paddle, `None` when a human holds it
    pub fn for_mode(mode: MatchMode) -> Option<Self> {
        match mode {
            MatchMode::PlayerVsComputer(Difficulty::Novice) => Some(AiController::Novice),
            MatchMode::PlayerVsComputer(Difficulty::Standard) => Some(AiController::Standard),
            MatchMode::PlayerVsComputer(Difficulty::Expert) => Some(AiController::Expert),
            MatchMode::Deception => Some(AiController::Deceiver),
            MatchMode::PlayerVsPlayer => None,
        }
    }

    /// Move the right paddle for one tick
    pub fn drive(
        self,
        world: &mut World,
        map: &GameMap,
        config: &Config,
        effect: Option<Effect>,
        rng: &mut GameRng,
    ) {
        let ball = world
            .query::<&Ball>()
            .iter()
            .map(|(_e, b)| (b.pos, b.vel))
            .next();
        let Some((ball_pos, ball_vel)) = ball else {
            return;
        };

        for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
            if paddle.side != Side::Right {
                continue;
            }
            let view = AiView {
                ball_pos,
                ball_vel,
                paddle_x: config.paddle_x(Side::Right),
                paddle_y: paddle.y,
                paddle_height: paddle.height,
                arena_height: map.height,
                paddle_speed: config.paddle_speed,
            };
            paddle.y += self.steer(&view, effect, rng);
            paddle.y = map.clamp_y(paddle.y, paddle.height / 2.0);
        }
    }

    /// Vertical step for this tick
    pub fn steer(self, view: &AiView, effect: Option<Effect>, rng: &mut GameRng) -> f32 {
        match self {
            AiController::Novice => novice(view, rng),
            AiController::Standard => chase(view.ball_pos.y, view.paddle_y, 10.0, view.paddle_speed * 0.85),
            AiController::Expert => expert(view, rng),
            AiController::Deceiver => deceiver(view, effect, rng),
        }
    }
}

fn novice(view: &AiView, rng: &mut GameRng) -> f32 {
    if rng.0.gen_bool(0.4) {
        return 0.0;
    }
    if rng.0.gen_bool(0.3) {
        -chase(view.ball_pos.y, view.paddle_y, 0.0, view.paddle_speed * 0.5)
    } else {
        chase(view.ball_pos.y, view.paddle_y, 0.0, view.paddle_speed * 0.6)
    }
}

fn expert(view: &AiView, rng: &mut GameRng) -> f32 {
    if !view.approaching() {
        return view.drift_to_center(view.paddle_speed * 0.7);
    }

    let mut target = view.predicted_y();
    if rng.0.gen_bool(0.3) {
        // Trick shot: meet the ball with an edge for a sharper angle
        let offset = view.paddle_height * 0.4;
        if rng.0.gen_bool(0.5) {
            target -= offset;
        } else {
            target += offset;
        }
    }
    chase(target, view.paddle_y, 5.0, view.paddle_speed * 1.2)
}

fn deceiver(view: &AiView, effect: Option<Effect>, rng: &mut GameRng) -> f32 {
    let speed = view.paddle_speed;
    match effect {
        Some(Effect::ReverseControls) => {
            if rng.0.gen_bool(0.3) {
                -chase(view.ball_pos.y, view.paddle_y, 0.0, speed * 1.2)
            } else if view.approaching() {
                let noise = rng.0.gen_range(-20..=20) as f32;
                let multiplier = rng.0.gen_range(1.0..=1.3);
                chase(view.predicted_y() + noise, view.paddle_y, 5.0, speed * multiplier)
            } else {
                view.drift_to_center(speed * 0.7)
            }
        }
        Some(Effect::InvisibleEnemy) | Some(Effect::InvisibleBall) => {
            tracked_intercept(view, 5.0, speed * 1.4)
        }
        Some(Effect::BallMultiply) => tracked_intercept(view, 3.0, speed * 1.2),
        Some(Effect::ShrinkingPaddles) => tracked_intercept(view, 2.0, speed * 1.3),
        _ => {
            if rng.0.gen_bool(0.9) {
                let multiplier = rng.0.gen_range(0.9..=1.1);
                chase(view.ball_pos.y, view.paddle_y, 0.0, speed * multiplier)
            } else {
                -chase(view.ball_pos.y, view.paddle_y, 0.0, speed * 0.8)
            }
        }
    }
}

/// Chase the predicted intercept while the ball approaches, idle otherwise
fn tracked_intercept(view: &AiView, dead_zone: f32, speed: f32) -> f32 {
    if view.approaching() {
        chase(view.predicted_y(), view.paddle_y, dead_zone, speed)
    } else {
        0.0
    }
}

/// Step of `speed` toward `target` once it is more than `dead_zone` away
fn chase(target: f32, current: f32, dead_zone: f32, speed: f32) -> f32 {
    if target > current + dead_zone {
        speed
    } else if target < current - dead_zone {
        -speed
    } else {
        0.0
    }
}

/// Predict where the ball crosses `paddle_x`, folding wall bounces into `[0, height]`
///
/// A ball with no horizontal speed is taken to be there already. Non-finite
/// results fall back to the vertical centre.
pub fn predict_intercept_y(ball_pos: Vec2, ball_vel: Vec2, paddle_x: f32, height: f32) -> f32 {
    let t = if ball_vel.x == 0.0 {
        0.0
    } else {
        (paddle_x - ball_pos.x) / ball_vel.x
    };
    reflect_into(ball_pos.y + ball_vel.y * t, height)
}

/// Mirror `y` off `0` and `height` until it lands inside the table
fn reflect_into(y: f32, height: f32) -> f32 {
    if !y.is_finite() || !height.is_finite() || height <= 0.0 {
        return height.max(0.0) / 2.0;
    }
    let period = 2.0 * height;
    let folded = y.rem_euclid(period);
    if folded > height {
        period - folded
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle};

    fn view(ball_y: f32, ball_vx: f32, paddle_y: f32) -> AiView {
        AiView {
            ball_pos: Vec2::new(500.0, ball_y),
            ball_vel: Vec2::new(ball_vx, 0.0),
            paddle_x: 924.5,
            paddle_y,
            paddle_height: 81.0,
            arena_height: 540.0,
            paddle_speed: 5.0,
        }
    }

    #[test]
    fn test_prediction_reflects_off_bottom() {
        let y = predict_intercept_y(Vec2::new(500.0, 210.0), Vec2::new(5.0, 3.0), 900.0, 400.0);
        assert!((y - 350.0).abs() < 1e-3, "Expected 350, got {}", y);
    }

    #[test]
    fn test_prediction_reflects_off_top() {
        assert!((reflect_into(-30.0, 400.0) - 30.0).abs() < 1e-4);
        assert!((reflect_into(1230.0, 400.0) - 370.0).abs() < 1e-3);
    }

    #[test]
    fn test_prediction_with_zero_dx_and_bad_input() {
        let y = predict_intercept_y(Vec2::new(500.0, 123.0), Vec2::new(0.0, 7.0), 900.0, 400.0);
        assert_eq!(y, 123.0);
        let y = predict_intercept_y(Vec2::new(500.0, f32::NAN), Vec2::new(1.0, 1.0), 900.0, 400.0);
        assert_eq!(y, 200.0);
    }

    #[test]
    fn test_standard_dead_zone() {
        let mut rng = GameRng::new(1);
        let ai = AiController::Standard;
        assert_eq!(ai.steer(&view(305.0, 4.0, 300.0), None, &mut rng), 0.0);
        assert!((ai.steer(&view(320.0, 4.0, 300.0), None, &mut rng) - 4.25).abs() < 1e-4);
        assert!((ai.steer(&view(280.0, 4.0, 300.0), None, &mut rng) + 4.25).abs() < 1e-4);
    }

    #[test]
    fn test_novice_step_sizes() {
        let mut rng = GameRng::new(2);
        let mut idle = 0;
        for _ in 0..1000 {
            let step = AiController::Novice.steer(&view(400.0, 4.0, 200.0), None, &mut rng);
            let known = [0.0, 3.0, -2.5].iter().any(|s| (step - s).abs() < 1e-4);
            assert!(known, "Unexpected novice step {}", step);
            if step == 0.0 {
                idle += 1;
            }
        }
        assert!(idle > 300 && idle < 500, "Novice should idle about 40% of ticks");
    }

    #[test]
    fn test_expert_drifts_home_when_ball_recedes() {
        let mut rng = GameRng::new(3);
        let step = AiController::Expert.steer(&view(100.0, -4.0, 100.0), None, &mut rng);
        assert!((step - 3.5).abs() < 1e-4, "Should drift down toward the centre");
        let step = AiController::Expert.steer(&view(100.0, -4.0, 275.0), None, &mut rng);
        assert_eq!(step, 0.0, "Already near the centre");
    }

    #[test]
    fn test_deceiver_idles_when_ball_recedes_under_multiply() {
        let mut rng = GameRng::new(4);
        let step = AiController::Deceiver.steer(
            &view(100.0, -4.0, 400.0),
            Some(Effect::BallMultiply),
            &mut rng,
        );
        assert_eq!(step, 0.0);
    }

    /// Run `steer` many times and hand each step to `check`
    fn sample_steps(
        ai: AiController,
        view: &AiView,
        effect: Option<Effect>,
        seed: u64,
        mut check: impl FnMut(f32),
    ) {
        let mut rng = GameRng::new(seed);
        for _ in 0..1000 {
            check(ai.steer(view, effect, &mut rng));
        }
    }

    fn near(step: f32, expected: f32) -> bool {
        (step - expected).abs() < 1e-4
    }

    #[test]
    fn test_expert_trick_shot_offsets() {
        // Paddle already on the intercept: only a trick shot moves it
        let (mut still, mut up, mut down) = (0, 0, 0);
        sample_steps(AiController::Expert, &view(400.0, 4.0, 400.0), None, 6, |step| {
            if step == 0.0 {
                still += 1;
            } else if near(step, -6.0) {
                up += 1;
            } else if near(step, 6.0) {
                down += 1;
            } else {
                panic!("Unexpected expert step {}", step);
            }
        });
        assert!((230..=370).contains(&(up + down)), "trick shots: {}", up + down);
        assert!(up > 80 && down > 80, "Both edges are used: {} / {}", up, down);
        assert_eq!(still + up + down, 1000);
    }

    #[test]
    fn test_deceiver_reverse_controls_branch() {
        let effect = Some(Effect::ReverseControls);

        let mut opposite = 0;
        sample_steps(AiController::Deceiver, &view(400.0, 4.0, 200.0), effect, 7, |step| {
            if near(step, -6.0) {
                opposite += 1;
            } else {
                // Noisy intercept chase at 100-130% speed
                assert!((5.0 - 1e-4..=6.5 + 1e-4).contains(&step), "step {}", step);
            }
        });
        assert!((230..=370).contains(&opposite), "opposite moves: {}", opposite);

        // Receding ball: either the wrong-way move or a drift home at 70%
        let mut drifts = 0;
        sample_steps(AiController::Deceiver, &view(400.0, -4.0, 100.0), effect, 8, |step| {
            if near(step, 3.5) {
                drifts += 1;
            } else {
                assert!(near(step, -6.0), "step {}", step);
            }
        });
        assert!((630..=770).contains(&drifts), "drifts: {}", drifts);
    }

    #[test]
    fn test_deceiver_rushes_when_unseen() {
        for effect in [Effect::InvisibleEnemy, Effect::InvisibleBall] {
            sample_steps(AiController::Deceiver, &view(400.0, 4.0, 200.0), Some(effect), 9, |step| {
                assert!(near(step, 7.0), "{:?} step {}", effect, step);
            });
            sample_steps(AiController::Deceiver, &view(400.0, -4.0, 200.0), Some(effect), 9, |step| {
                assert_eq!(step, 0.0, "{:?} idles on a receding ball", effect);
            });
        }
    }

    #[test]
    fn test_deceiver_default_tracking() {
        for effect in [None, Some(Effect::GravityShift), Some(Effect::ColorChaos)] {
            let mut wrong = 0;
            sample_steps(AiController::Deceiver, &view(400.0, -4.0, 200.0), effect, 10, |step| {
                if near(step, -4.0) {
                    wrong += 1;
                } else {
                    assert!((4.5 - 1e-4..=5.5 + 1e-4).contains(&step), "step {}", step);
                }
            });
            assert!((60..=140).contains(&wrong), "{:?} wrong moves: {}", effect, wrong);
        }
    }

    #[test]
    fn test_drive_moves_only_right_paddle() {
        let config = Config::new();
        let map = GameMap::from_config(&config);
        let mut world = World::new();
        let left = create_paddle(&mut world, Side::Left, 270.0, config.paddle_height);
        let right = create_paddle(&mut world, Side::Right, 270.0, config.paddle_height);
        create_ball(&mut world, Vec2::new(480.0, 500.0), Vec2::new(4.0, 0.0), config.ball_size);
        let mut rng = GameRng::new(5);

        for _ in 0..200 {
            AiController::Standard.drive(&mut world, &map, &config, None, &mut rng);
        }

        let left_y = world.get::<&Paddle>(left).map(|p| p.y).unwrap();
        let right = world.get::<&Paddle>(right).map(|p| *p).unwrap();
        assert_eq!(left_y, 270.0, "Human paddle is read-only for the AI");
        assert!(right.y > 400.0, "AI should have followed the ball down");
        assert!(right.bottom() <= map.height, "AI paddle stays on the table");
    }
}
