use hecs::World;

use crate::components::*;

/// Up/down intent for both paddles for one tick
///
/// `-1` is up, `0` is stop and `1` is down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: i8,
    pub right: i8,
}

impl TickInput {
    pub fn new(left: i8, right: i8) -> Self {
        Self {
            left: left.signum(),
            right: right.signum(),
        }
    }
}

/// Turn this tick's input into paddle intents
///
/// The right paddle only listens to input when a second human holds it,
/// otherwise its intent is cleared and the AI steers it directly. Reversed
/// controls flip the left (human) paddle only.
pub fn ingest_inputs(
    world: &mut World,
    input: TickInput,
    right_is_human: bool,
    reverse_controls: bool,
) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
        intent.dir = match paddle.side {
            Side::Left if reverse_controls => -input.left.signum(),
            Side::Left => input.left.signum(),
            Side::Right if right_is_human => input.right.signum(),
            Side::Right => 0,
        };
    }
}
