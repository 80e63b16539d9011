//! Keyboard input handling

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use game_core::TickInput;

/// How long a press keeps a paddle moving when the terminal sends no release events
pub const HOLD_WINDOW: Duration = Duration::from_millis(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleKey {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

impl PaddleKey {
    fn index(self) -> usize {
        self as usize
    }

    /// The key that moves the same paddle the other way
    fn opposite(self) -> PaddleKey {
        match self {
            PaddleKey::LeftUp => PaddleKey::LeftDown,
            PaddleKey::LeftDown => PaddleKey::LeftUp,
            PaddleKey::RightUp => PaddleKey::RightDown,
            PaddleKey::RightDown => PaddleKey::RightUp,
        }
    }
}

/// Map a key to a paddle direction key
pub fn paddle_key(code: KeyCode) -> Option<PaddleKey> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(PaddleKey::LeftUp),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(PaddleKey::LeftDown),
        KeyCode::Up => Some(PaddleKey::RightUp),
        KeyCode::Down => Some(PaddleKey::RightDown),
        _ => None,
    }
}

/// Non-movement keys during a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCommand {
    Pause,
    Leave,
}

pub fn match_command(code: KeyCode) -> Option<MatchCommand> {
    match code {
        KeyCode::Char('p') | KeyCode::Char('P') => Some(MatchCommand::Pause),
        KeyCode::Esc => Some(MatchCommand::Leave),
        _ => None,
    }
}

/// Tracks which paddle keys are held
///
/// Terminals without the keyboard enhancement protocol only report presses
/// and auto-repeats, so a key counts as held for `HOLD_WINDOW` after its
/// last press. With release events a key is held until it is released.
#[derive(Debug)]
pub struct KeyTracker {
    pressed_at: [Option<Instant>; 4],
    release_events: bool,
}

impl KeyTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            pressed_at: [None; 4],
            release_events,
        }
    }

    /// Feed one key event; returns whether it was a paddle key
    pub fn handle(&mut self, event: KeyEvent, now: Instant) -> bool {
        let Some(key) = paddle_key(event.code) else {
            return false;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(key, now),
            KeyEventKind::Release => self.release(key),
        }
        true
    }

    pub fn press(&mut self, key: PaddleKey, now: Instant) {
        self.pressed_at[key.opposite().index()] = None;
        self.pressed_at[key.index()] = Some(now);
    }

    pub fn release(&mut self, key: PaddleKey) {
        self.pressed_at[key.index()] = None;
    }

    pub fn clear(&mut self) {
        self.pressed_at = [None; 4];
    }

    fn is_held(&self, key: PaddleKey, now: Instant) -> bool {
        match self.pressed_at[key.index()] {
            Some(_) if self.release_events => true,
            Some(at) => now.saturating_duration_since(at) <= HOLD_WINDOW,
            None => false,
        }
    }

    /// Current paddle directions
    pub fn tick_input(&self, now: Instant) -> TickInput {
        let dir = |up: PaddleKey, down: PaddleKey| -> i8 {
            match (self.is_held(up, now), self.is_held(down, now)) {
                (true, false) => -1,
                (false, true) => 1,
                _ => 0,
            }
        };
        TickInput::new(
            dir(PaddleKey::LeftUp, PaddleKey::LeftDown),
            dir(PaddleKey::RightUp, PaddleKey::RightDown),
        )
    }
}
