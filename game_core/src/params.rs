/// Game tuning parameters for Pong
///
/// Distances are pixels and speeds are pixels per tick on a 960x540 table.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 540.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 9.0;
    pub const PADDLE_HEIGHT: f32 = 81.0;
    pub const PADDLE_SPEED: f32 = 5.0;
    pub const PADDLE_INSET_LEFT: f32 = 30.0; // left edge of the left paddle
    pub const PADDLE_INSET_RIGHT: f32 = 40.0; // right paddle's left edge is width - 40

    // Ball
    pub const BALL_SIZE: f32 = 13.0;
    pub const BALL_SPEED_X: f32 = 4.0;
    pub const BALL_SPEED_Y: f32 = 5.0;
    pub const BALL_SPEED_MAX: f32 = 10.0;
    pub const BALL_SPEED_INCREASE: f32 = 1.05; // Multiply |dx| on paddle hit
    pub const RELAUNCH_MIN_DY: f32 = 0.3; // Fraction of BALL_SPEED_Y

    // Score
    pub const WIN_SCORE_NOVICE: u32 = 10;
    pub const WIN_SCORE_STANDARD: u32 = 20;
    pub const WIN_SCORE_EXPERT: u32 = 50;
    pub const WIN_SCORE_VERSUS: u32 = 5;
    pub const WIN_SCORE_DECEPTION: u32 = 5;

    // Deception
    pub const EFFECT_DURATION: f32 = 10.0; // seconds
    pub const DECOY_RESPAWN_CHANCE: f64 = 0.7;

    // Physics
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    pub const MAX_TICKS_PER_FRAME: u32 = 5;
}
