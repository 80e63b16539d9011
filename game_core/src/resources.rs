use serde::{Deserialize, Serialize};

use crate::components::Side;
use crate::deception::Effect;
use crate::streak::StreakQuote;

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Delta time for this step
    pub now: f32, // Accumulated tick time
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }

    pub fn advance(&mut self) {
        self.now += self.dt;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            dt: crate::params::Params::FIXED_DT,
            now: 0.0,
        }
    }
}

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn has_winner(&self, win_score: u32) -> Option<Side> {
        if self.left >= win_score {
            Some(Side::Left)
        } else if self.right >= win_score {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_entropy())
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// AI opponent strength in player-vs-computer matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Novice,
    Standard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Novice, Difficulty::Standard, Difficulty::Expert];

    pub fn display_name(self) -> &'static str {
        match self {
            Difficulty::Novice => "New Born",
            Difficulty::Standard => "Normie",
            Difficulty::Expert => "Knight of Hell",
        }
    }
}

/// Who controls the right paddle and which rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    PlayerVsComputer(Difficulty),
    PlayerVsPlayer,
    Deception,
}

impl MatchMode {
    pub fn right_is_human(self) -> bool {
        matches!(self, MatchMode::PlayerVsPlayer)
    }

    pub fn is_expert(self) -> bool {
        matches!(self, MatchMode::PlayerVsComputer(Difficulty::Expert))
    }
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events {
    pub left_scored: bool,
    pub right_scored: bool,
    pub ball_hit_paddle: bool,
    pub ball_hit_wall: bool,
    pub effect_changed: Option<Effect>,
    pub quote: Option<StreakQuote>,
    pub game_over: Option<Side>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.left_scored = false;
        self.right_scored = false;
        self.ball_hit_paddle = false;
        self.ball_hit_wall = false;
        self.effect_changed = None;
        self.quote = None;
        self.game_over = None;
    }

    /// Side that scored this tick, if any
    pub fn scorer(&self) -> Option<Side> {
        if self.left_scored {
            Some(Side::Left)
        } else if self.right_scored {
            Some(Side::Right)
        } else {
            None
        }
    }
}
