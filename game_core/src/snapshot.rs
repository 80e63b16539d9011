use glam::Vec2;

use crate::components::{DecoyBall, Side};
use crate::deception::Effect;
use crate::resources::{MatchMode, Score};

/// Read-only copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub mode: MatchMode,
    pub arena: Vec2,
    pub ball: Option<BallView>,
    pub paddles: Vec<PaddleView>,
    pub decoys: Vec<DecoyBall>,
    pub score: Score,
    pub players: [String; 2],
    pub effect: Option<EffectView>,
    pub reverse_controls: bool,
    pub streak: u32,
    pub paused_for_quote: bool,
    pub game_over: bool,
    pub winner_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub pos: Vec2,
    pub size: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleView {
    pub side: Side,
    /// Centre of the paddle
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectView {
    pub effect: Effect,
    pub name: &'static str,
    pub remaining: f32,
}

impl Snapshot {
    pub fn paddle(&self, side: Side) -> Option<&PaddleView> {
        self.paddles.iter().find(|p| p.side == side)
    }

    pub fn color_chaos(&self) -> bool {
        self.active_effect() == Some(Effect::ColorChaos)
    }

    pub fn active_effect(&self) -> Option<Effect> {
        self.effect.map(|view| view.effect)
    }
}
