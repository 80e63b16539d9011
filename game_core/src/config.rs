use serde::{Deserialize, Serialize};

use crate::components::Side;
use crate::params::Params;
use crate::resources::{Difficulty, MatchMode};

/// Game configuration
///
/// Every field falls back to its `Params` default when missing from a
/// settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_inset_left: f32,
    pub paddle_inset_right: f32,
    pub ball_size: f32,
    pub ball_speed_x: f32,
    pub ball_speed_y: f32,
    pub ball_speed_max: f32,
    pub ball_speed_increase: f32,
    pub relaunch_min_dy: f32,
    pub win_scores: WinScores,
    pub effect_duration: f32,
    pub decoy_respawn_chance: f64,
}

/// Points needed to win, per match mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinScores {
    pub novice: u32,
    pub standard: u32,
    pub expert: u32,
    pub versus: u32,
    pub deception: u32,
}

impl Default for WinScores {
    fn default() -> Self {
        Self {
            novice: Params::WIN_SCORE_NOVICE,
            standard: Params::WIN_SCORE_STANDARD,
            expert: Params::WIN_SCORE_EXPERT,
            versus: Params::WIN_SCORE_VERSUS,
            deception: Params::WIN_SCORE_DECEPTION,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            paddle_inset_left: Params::PADDLE_INSET_LEFT,
            paddle_inset_right: Params::PADDLE_INSET_RIGHT,
            ball_size: Params::BALL_SIZE,
            ball_speed_x: Params::BALL_SPEED_X,
            ball_speed_y: Params::BALL_SPEED_Y,
            ball_speed_max: Params::BALL_SPEED_MAX,
            ball_speed_increase: Params::BALL_SPEED_INCREASE,
            relaunch_min_dy: Params::RELAUNCH_MIN_DY,
            win_scores: WinScores::default(),
            effect_duration: Params::EFFECT_DURATION,
            decoy_respawn_chance: Params::DECOY_RESPAWN_CHANCE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get X position of the paddle centre for a side
    pub fn paddle_x(&self, side: Side) -> f32 {
        let half_width = self.paddle_width / 2.0;
        match side {
            Side::Left => self.paddle_inset_left + half_width,
            Side::Right => self.arena_width - self.paddle_inset_right + half_width,
        }
    }

    /// Clamp a paddle centre so the whole paddle stays inside the arena
    pub fn clamp_paddle_y(&self, y: f32, height: f32) -> f32 {
        let half_height = (height / 2.0).min(self.arena_height / 2.0);
        y.clamp(half_height, self.arena_height - half_height)
    }

    /// Score that ends a match in the given mode
    pub fn win_score(&self, mode: MatchMode) -> u32 {
        match mode {
            MatchMode::PlayerVsComputer(Difficulty::Novice) => self.win_scores.novice,
            MatchMode::PlayerVsComputer(Difficulty::Standard) => self.win_scores.standard,
            MatchMode::PlayerVsComputer(Difficulty::Expert) => self.win_scores.expert,
            MatchMode::PlayerVsPlayer => self.win_scores.versus,
            MatchMode::Deception => self.win_scores.deception,
        }
    }

    /// Replace nonsensical values (non-positive sizes, inverted limits) with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        self.arena_width = positive(self.arena_width, defaults.arena_width);
        self.arena_height = positive(self.arena_height, defaults.arena_height);
        self.paddle_width = positive(self.paddle_width, defaults.paddle_width);
        self.paddle_height = positive(self.paddle_height, defaults.paddle_height)
            .min(self.arena_height);
        self.paddle_speed = positive(self.paddle_speed, defaults.paddle_speed);
        self.ball_size = positive(self.ball_size, defaults.ball_size);
        self.ball_speed_x = positive(self.ball_speed_x, defaults.ball_speed_x);
        self.ball_speed_y = positive(self.ball_speed_y, defaults.ball_speed_y);
        self.ball_speed_max = positive(self.ball_speed_max, defaults.ball_speed_max)
            .max(self.ball_speed_x)
            .max(self.ball_speed_y);
        self.ball_speed_increase = positive(self.ball_speed_increase, defaults.ball_speed_increase);
        self.effect_duration = positive(self.effect_duration, defaults.effect_duration);
        self.relaunch_min_dy = self.relaunch_min_dy.clamp(0.0, 1.0);
        self.decoy_respawn_chance = self.decoy_respawn_chance.clamp(0.0, 1.0);

        // Both paddles must sit fully inside the arena
        let max_left = self.arena_width - self.paddle_width;
        let inset = |value: f32, fallback: f32, max: f32| {
            if value.is_finite() && (0.0..=max).contains(&value) {
                value
            } else if (0.0..=max).contains(&fallback) {
                fallback
            } else {
                0.0
            }
        };
        self.paddle_inset_left = inset(self.paddle_inset_left, defaults.paddle_inset_left, max_left);
        self.paddle_inset_right = inset(
            self.paddle_inset_right,
            defaults.paddle_inset_right,
            self.arena_width,
        )
        .max(self.paddle_width.min(self.arena_width));

        self.win_scores = self.win_scores.sanitized();
        self
    }
}

impl WinScores {
    /// A zero win score would end a match before the first serve
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let at_least_one = |value: u32, fallback: u32| if value == 0 { fallback } else { value };
        Self {
            novice: at_least_one(self.novice, defaults.novice),
            standard: at_least_one(self.standard, defaults.standard),
            expert: at_least_one(self.expert, defaults.expert),
            versus: at_least_one(self.versus, defaults.versus),
            deception: at_least_one(self.deception, defaults.deception),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paddle_x() {
        let config = Config::new();
        assert_eq!(config.paddle_x(Side::Left), 34.5, "Left paddle X position");
        assert_eq!(config.paddle_x(Side::Right), 924.5, "Right paddle X position");
    }

    #[test]
    fn test_config_clamp_paddle_y() {
        let config = Config::new();
        let height = config.paddle_height;
        let half_height = height / 2.0;
        assert_eq!(config.clamp_paddle_y(0.0, height), half_height);
        assert_eq!(
            config.clamp_paddle_y(1000.0, height),
            config.arena_height - half_height
        );
        let valid_y = 200.0;
        assert_eq!(config.clamp_paddle_y(valid_y, height), valid_y);
    }

    #[test]
    fn test_win_score_per_mode() {
        let config = Config::new();
        assert_eq!(config.win_score(MatchMode::PlayerVsComputer(Difficulty::Novice)), 10);
        assert_eq!(config.win_score(MatchMode::PlayerVsComputer(Difficulty::Standard)), 20);
        assert_eq!(config.win_score(MatchMode::PlayerVsComputer(Difficulty::Expert)), 50);
        assert_eq!(config.win_score(MatchMode::PlayerVsPlayer), 5);
        assert_eq!(config.win_score(MatchMode::Deception), 5);
    }

    #[test]
    fn test_sanitized_replaces_bad_values() {
        let config = Config {
            arena_height: -1.0,
            ball_speed_max: 1.0,
            decoy_respawn_chance: 3.0,
            ..Config::default()
        }
        .sanitized();

        assert_eq!(config.arena_height, Params::ARENA_HEIGHT);
        assert!(config.ball_speed_max >= config.ball_speed_y);
        assert_eq!(config.decoy_respawn_chance, 1.0);
    }

    #[test]
    fn test_sanitized_restores_zero_win_scores() {
        let config = Config {
            win_scores: WinScores {
                novice: 0,
                expert: 0,
                versus: 3,
                ..WinScores::default()
            },
            ..Config::default()
        }
        .sanitized();

        assert_eq!(config.win_scores.novice, Params::WIN_SCORE_NOVICE);
        assert_eq!(config.win_scores.expert, Params::WIN_SCORE_EXPERT);
        assert_eq!(config.win_scores.versus, 3);
        let modes = [
            MatchMode::PlayerVsComputer(Difficulty::Novice),
            MatchMode::PlayerVsComputer(Difficulty::Standard),
            MatchMode::PlayerVsComputer(Difficulty::Expert),
            MatchMode::PlayerVsPlayer,
            MatchMode::Deception,
        ];
        assert!(modes.iter().all(|&mode| config.win_score(mode) >= 1));
    }

    #[test]
    fn test_sanitized_keeps_paddles_inside_arena() {
        let config = Config {
            paddle_inset_left: -15.0,
            paddle_inset_right: 5000.0,
            ..Config::default()
        }
        .sanitized();
        assert_eq!(config.paddle_inset_left, Params::PADDLE_INSET_LEFT);
        assert_eq!(config.paddle_inset_right, Params::PADDLE_INSET_RIGHT);

        let config = Config {
            paddle_inset_left: f32::NAN,
            paddle_inset_right: 1.0,
            ..Config::default()
        }
        .sanitized();
        assert_eq!(config.paddle_inset_left, Params::PADDLE_INSET_LEFT);
        // Right paddle is pushed back so its right edge stays on screen
        assert_eq!(config.paddle_inset_right, config.paddle_width);

        for side in [Side::Left, Side::Right] {
            let half = config.paddle_width / 2.0;
            let x = config.paddle_x(side);
            assert!(x - half >= 0.0 && x + half <= config.arena_width, "{:?} at {}", side, x);
        }
    }
}
