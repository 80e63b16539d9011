//! Deception mode: a rotating modifier that bends physics, visibility and
//! controls for a fixed time before being replaced by a different one.

use glam::Vec2;
use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{clamp_velocity, Ball, DecoyBall, Paddle, Side};
use crate::config::Config;
use crate::map::{Aabb, GameMap};
use crate::resources::GameRng;

const GRAVITY: f32 = 0.15;
const DRIFT_CHANCE: f64 = 0.05;
const TELEPORT_CHANCE: f64 = 0.02;
const SPEED_CHANGE_CHANCE: f64 = 0.03;
const SHRINK_FACTOR: f32 = 0.9996;
const SHRINK_FLOOR: f32 = 0.25;
const DECOY_JITTER_CHANCE: f64 = 0.02;
const DECOY_PADDLE_BOUNCE_CHANCE: f64 = 0.7;

/// One deception modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    InvisibleEnemy,
    InvisiblePlayer,
    BallMultiply,
    InvisibleBall,
    ReverseControls,
    ShrinkingPaddles,
    TeleportingBall,
    SpeedChanges,
    GravityShift,
    ColorChaos,
}

impl Effect {
    pub const ALL: [Effect; 10] = [
        Effect::InvisibleEnemy,
        Effect::InvisiblePlayer,
        Effect::BallMultiply,
        Effect::InvisibleBall,
        Effect::ReverseControls,
        Effect::ShrinkingPaddles,
        Effect::TeleportingBall,
        Effect::SpeedChanges,
        Effect::GravityShift,
        Effect::ColorChaos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Effect::InvisibleEnemy => "Invisible Enemy",
            Effect::InvisiblePlayer => "Invisible Player",
            Effect::BallMultiply => "Ball Multiply",
            Effect::InvisibleBall => "Invisible Ball",
            Effect::ReverseControls => "Reverse Controls",
            Effect::ShrinkingPaddles => "Shrinking Paddles",
            Effect::TeleportingBall => "Teleporting Ball",
            Effect::SpeedChanges => "Speed Changes",
            Effect::GravityShift => "Gravity Shift",
            Effect::ColorChaos => "Color Chaos",
        }
    }

    /// Whether the paddle on `side` should be drawn
    pub fn paddle_visible(self, side: Side) -> bool {
        !matches!(
            (self, side),
            (Effect::InvisiblePlayer, Side::Left) | (Effect::InvisibleEnemy, Side::Right)
        )
    }

    pub fn ball_visible(self) -> bool {
        self != Effect::InvisibleBall
    }
}

/// Owns the active effect, its timer and the decoy arena
pub struct DeceptionEngine {
    active: Effect,
    started_at: f32,
    duration: f32,
    reverse_controls: bool,
    nominal_paddle_height: f32,
    decoys: World,
}

impl DeceptionEngine {
    /// Pick a first effect at random and activate it
    pub fn start(
        map: &GameMap,
        config: &Config,
        now: f32,
        rng: &mut GameRng,
    ) -> Self {
        let first = Effect::ALL
            .choose(&mut rng.0)
            .copied()
            .unwrap_or(Effect::GravityShift);

        let mut engine = Self {
            active: first,
            started_at: now,
            duration: config.effect_duration,
            reverse_controls: false,
            nominal_paddle_height: config.paddle_height,
            decoys: World::new(),
        };
        engine.activate(first, map, config, now, rng);
        engine
    }

    pub fn active(&self) -> Effect {
        self.active
    }

    /// Seconds until the next rotation
    pub fn remaining(&self, now: f32) -> f32 {
        (self.duration - (now - self.started_at)).max(0.0)
    }

    pub fn reverse_controls(&self) -> bool {
        self.reverse_controls
    }

    pub fn decoy_count(&self) -> usize {
        self.decoys.len() as usize
    }

    /// Visit every live decoy
    pub fn for_each_decoy(&self, mut f: impl FnMut(&DecoyBall)) {
        for (_entity, decoy) in self.decoys.query::<&DecoyBall>().iter() {
            f(decoy);
        }
    }

    /// Rotate when the timer expires, then apply the active effect for one tick
    ///
    /// Returns the new effect when a rotation happened this tick.
    pub fn update(
        &mut self,
        world: &mut World,
        map: &GameMap,
        config: &Config,
        now: f32,
        rng: &mut GameRng,
    ) -> Option<Effect> {
        let rotated = if now - self.started_at >= self.duration {
            Some(self.rotate(world, map, config, now, rng))
        } else {
            None
        };
        self.apply(world, map, config, rng);
        rotated
    }

    /// Undo the active effect without picking another one
    pub fn shutdown(&mut self, world: &mut World, map: &GameMap) {
        self.teardown(world, map);
    }

    fn rotate(
        &mut self,
        world: &mut World,
        map: &GameMap,
        config: &Config,
        now: f32,
        rng: &mut GameRng,
    ) -> Effect {
        let previous = self.active;
        self.teardown(world, map);

        let candidates: Vec<Effect> = Effect::ALL
            .iter()
            .copied()
            .filter(|effect| *effect != previous)
            .collect();
        let next = candidates.choose(&mut rng.0).copied().unwrap_or(previous);

        self.activate(next, map, config, now, rng);
        log::info!("deception effect: {} -> {}", previous.name(), next.name());
        next
    }

    fn activate(
        &mut self,
        effect: Effect,
        map: &GameMap,
        config: &Config,
        now: f32,
        rng: &mut GameRng,
    ) {
        self.active = effect;
        self.started_at = now;
        self.duration = config.effect_duration;

        match effect {
            Effect::BallMultiply => {
                let count = rng.0.gen_range(3..=4);
                for _ in 0..count {
                    self.decoys.spawn((spawn_decoy(map, config, rng),));
                }
            }
            Effect::ShrinkingPaddles => self.nominal_paddle_height = config.paddle_height,
            Effect::ReverseControls => self.reverse_controls = true,
            _ => {}
        }
    }

    fn teardown(&mut self, world: &mut World, map: &GameMap) {
        match self.active {
            Effect::BallMultiply => self.decoys.clear(),
            Effect::ShrinkingPaddles => {
                for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
                    paddle.height = self.nominal_paddle_height;
                    paddle.y = map.clamp_y(paddle.y, paddle.height / 2.0);
                }
            }
            Effect::ReverseControls => self.reverse_controls = false,
            _ => {}
        }
    }

    fn apply(&mut self, world: &mut World, map: &GameMap, config: &Config, rng: &mut GameRng) {
        let max = config.ball_speed_max;
        match self.active {
            Effect::GravityShift => {
                for (_entity, ball) in world.query_mut::<&mut Ball>() {
                    ball.vel.y += GRAVITY;
                    if rng.0.gen_bool(DRIFT_CHANCE) {
                        ball.vel.x += rng.0.gen_range(-0.1..=0.1);
                    }
                    ball.clamp_speed(max);
                }
            }
            Effect::TeleportingBall => {
                if rng.0.gen_bool(TELEPORT_CHANCE) {
                    for (_entity, ball) in world.query_mut::<&mut Ball>() {
                        let margin = map.width / 5.0;
                        let x = rng.0.gen_range(margin..=map.width - margin);
                        let y_low = ball.size.min(map.height / 2.0);
                        let y = rng.0.gen_range(y_low..=map.height - y_low);
                        ball.pos = Vec2::new(x, y);
                        log::debug!("ball teleported to ({:.0}, {:.0})", x, y);
                    }
                }
            }
            Effect::SpeedChanges => {
                if rng.0.gen_bool(SPEED_CHANGE_CHANCE) {
                    let factor = rng.0.gen_range(0.7..=1.6);
                    for (_entity, ball) in world.query_mut::<&mut Ball>() {
                        ball.vel *= factor;
                        ball.clamp_speed(max);
                    }
                }
            }
            Effect::ShrinkingPaddles => {
                let floor = self.nominal_paddle_height * SHRINK_FLOOR;
                for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
                    paddle.height = (paddle.height * SHRINK_FACTOR).max(floor);
                    paddle.y = map.clamp_y(paddle.y, paddle.height / 2.0);
                }
            }
            Effect::BallMultiply => self.update_decoys(world, map, config, rng),
            Effect::ReverseControls
            | Effect::InvisibleEnemy
            | Effect::InvisiblePlayer
            | Effect::InvisibleBall
            | Effect::ColorChaos => {}
        }
    }

    fn update_decoys(&mut self, world: &World, map: &GameMap, config: &Config, rng: &mut GameRng) {
        let paddles: Vec<(Side, Aabb)> = world
            .query::<&Paddle>()
            .iter()
            .map(|(_e, p)| (p.side, map.paddle_bounds(p.side, p.y, p.height, config)))
            .collect();

        let mut exited = Vec::new();
        for (entity, decoy) in self.decoys.query_mut::<&mut DecoyBall>() {
            decoy.pos += decoy.vel;

            if rng.0.gen_bool(DECOY_JITTER_CHANCE) {
                decoy.vel.x *= rng.0.gen_range(0.9..=1.1);
                decoy.vel.y *= rng.0.gen_range(0.9..=1.1);
            }

            let half = decoy.half_size();
            if decoy.pos.y - half <= 0.0 {
                decoy.pos.y = half;
                decoy.vel.y = decoy.vel.y.abs();
            } else if decoy.pos.y + half >= map.height {
                decoy.pos.y = map.height - half;
                decoy.vel.y = -decoy.vel.y.abs();
            }

            let bounds = Aabb::from_center_size(decoy.pos, Vec2::splat(decoy.size));
            for (side, paddle) in &paddles {
                if paddle.intersects(&bounds) && rng.0.gen_bool(DECOY_PADDLE_BOUNCE_CHANCE) {
                    decoy.vel.x = side.outward() * decoy.vel.x.abs() * rng.0.gen_range(1.0..=1.1);
                }
            }
            decoy.vel = clamp_velocity(decoy.vel, config.ball_speed_max);

            if decoy.pos.x + half < 0.0 || decoy.pos.x - half > map.width {
                exited.push(entity);
            }
        }

        for entity in exited {
            let _ = self.decoys.despawn(entity);
            if rng.0.gen_bool(config.decoy_respawn_chance) {
                self.decoys.spawn((spawn_decoy(map, config, rng),));
            }
        }
    }
}

/// A fresh decoy at the table centre with a randomised serve
fn spawn_decoy(map: &GameMap, config: &Config, rng: &mut GameRng) -> DecoyBall {
    let sign = |rng: &mut GameRng| if rng.0.gen_bool(0.5) { 1.0_f32 } else { -1.0 };
    let dx = sign(rng) * config.ball_speed_x * rng.0.gen_range(0.8..=1.2);
    let dy = sign(rng) * config.ball_speed_y * rng.0.gen_range(0.8..=1.2);
    let size = (config.ball_size * rng.0.gen_range(0.8..=1.2)).floor().max(1.0);

    DecoyBall {
        pos: map.ball_spawn(),
        vel: clamp_velocity(Vec2::new(dx, dy), config.ball_speed_max),
        size,
        color: [
            rng.0.gen_range(200..=255),
            rng.0.gen_range(200..=255),
            rng.0.gen_range(200..=255),
        ],
        alpha: rng.0.gen_range(180..=255),
    }
}
