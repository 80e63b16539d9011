//! Screen State Machine
//!
//! Drives which screen the front end shows and which moves between them are legal.

/// Screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    ModeSelect,
    DifficultySelect,
    Playing,
    GameOver,
    Leaderboard,
}

/// Actions that trigger screen changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    LoggedIn,
    LogOut,
    ChooseComputer,
    ChooseVersus,
    ChooseDeception,
    ShowLeaderboard,
    DifficultyChosen,
    MatchOver,
    Restart,
    ChangeDifficulty,
    Back,
}

/// Result of a screen change
#[derive(Debug, Clone)]
pub struct TransitionResult {
    success: bool,
    from_screen: Screen,
    to_screen: Screen,
    action: ScreenAction,
}

impl TransitionResult {
    pub fn success(&self) -> bool {
        self.success
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_screen(&self) -> Screen {
        self.from_screen
    }

    pub fn to_screen(&self) -> Screen {
        self.to_screen
    }

    pub fn action(&self) -> ScreenAction {
        self.action
    }
}

/// Screen Finite State Machine
#[derive(Debug)]
pub struct ScreenFsm {
    screen: Screen,
}

impl ScreenFsm {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
        }
    }

    /// Get current screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: ScreenAction) -> bool {
        self.next_screen(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: ScreenAction) -> TransitionResult {
        let from_screen = self.screen;

        match self.next_screen(action) {
            Some(next) => {
                log::debug!("screen {:?} -> {:?} on {:?}", from_screen, next, action);
                self.screen = next;
                TransitionResult {
                    success: true,
                    from_screen,
                    to_screen: next,
                    action,
                }
            }
            None => {
                log::warn!("ignored {:?} on screen {:?}", action, from_screen);
                TransitionResult {
                    success: false,
                    from_screen,
                    to_screen: from_screen,
                    action,
                }
            }
        }
    }

    fn next_screen(&self, action: ScreenAction) -> Option<Screen> {
        match (self.screen, action) {
            // From Login
            (Screen::Login, ScreenAction::LoggedIn) => Some(Screen::ModeSelect),

            // From ModeSelect
            (Screen::ModeSelect, ScreenAction::ChooseComputer) => Some(Screen::DifficultySelect),
            (Screen::ModeSelect, ScreenAction::ChooseVersus) => Some(Screen::Playing),
            (Screen::ModeSelect, ScreenAction::ChooseDeception) => Some(Screen::Playing),
            (Screen::ModeSelect, ScreenAction::ShowLeaderboard) => Some(Screen::Leaderboard),
            (Screen::ModeSelect, ScreenAction::LogOut) => Some(Screen::Login),

            // From DifficultySelect
            (Screen::DifficultySelect, ScreenAction::DifficultyChosen) => Some(Screen::Playing),
            (Screen::DifficultySelect, ScreenAction::Back) => Some(Screen::ModeSelect),

            // From Playing
            (Screen::Playing, ScreenAction::MatchOver) => Some(Screen::GameOver),
            (Screen::Playing, ScreenAction::Back) => Some(Screen::ModeSelect),

            // From GameOver
            (Screen::GameOver, ScreenAction::Restart) => Some(Screen::Playing),
            (Screen::GameOver, ScreenAction::ChangeDifficulty) => Some(Screen::DifficultySelect),
            (Screen::GameOver, ScreenAction::Back) => Some(Screen::ModeSelect),

            // From Leaderboard
            (Screen::Leaderboard, ScreenAction::Back) => Some(Screen::ModeSelect),

            // Invalid transition
            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing
    }
}

impl Default for ScreenFsm {
    fn default() -> Self {
        Self::new()
    }
}
