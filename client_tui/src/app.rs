use std::time::{Duration, Instant};

use accounts::UserStore;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use game_core::{Config, Difficulty, GameRng, Match, MatchMode, Snapshot, StreakQuote};
use ratatui::{DefaultTerminal, Frame};

use crate::fsm::{Screen, ScreenAction, ScreenFsm};
use crate::input::{self, KeyTracker, MatchCommand};
use crate::login::LoginForm;
use crate::render::{self, RenderStatus};
use crate::session::{Session, StoreRecorder};

const MODE_OPTIONS: [&str; 5] = [
    "Player vs Computer",
    "Player vs Player",
    "Deception Mode",
    "Leaderboard",
    "Log out",
];

const LEADERBOARD_SIZE: usize = 10;
const QUOTE_AUTO_DISMISS: Duration = Duration::from_secs(5);

/// How a quote modal was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteOutcome {
    Continue,
    LeaveMatch,
    ExitGame,
}

pub struct App {
    exit: bool,
    fsm: ScreenFsm,
    store: UserStore,
    config: Config,
    seed: Option<u64>,
    matches_started: u64,
    login: LoginForm,
    user: Option<String>,
    mode_selected: usize,
    difficulty_selected: usize,
    session: Option<Session>,
    keys: KeyTracker,
}

fn draw_frame(terminal: &mut DefaultTerminal, draw: impl FnOnce(&mut Frame)) {
    if let Err(e) = terminal.draw(draw) {
        log::warn!("Frame draw failed: {}", e);
    }
}

fn draw_match_or_fallback(frame: &mut Frame, snapshot: &Snapshot, win_score: u32, paused: bool) {
    if render::draw_match(frame, snapshot, win_score, paused) == RenderStatus::TooSmall {
        render::draw_minimal(frame, snapshot);
    }
}

/// Next menu index, wrapping at both ends
fn step_selection(selected: usize, len: usize, code: KeyCode) -> usize {
    match code {
        KeyCode::Up => (selected + len - 1) % len,
        KeyCode::Down => (selected + 1) % len,
        _ => selected,
    }
}

/// Read one key press, waiting at most `timeout`
fn next_press(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

impl App {
    pub fn new(store: UserStore, config: Config, seed: Option<u64>, release_events: bool) -> Self {
        Self {
            exit: false,
            fsm: ScreenFsm::new(),
            store,
            config,
            seed,
            matches_started: 0,
            login: LoginForm::new(),
            user: None,
            mode_selected: 0,
            difficulty_selected: 0,
            session: None,
            keys: KeyTracker::new(release_events),
        }
    }

    pub fn run(&mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        while !self.exit {
            match self.fsm.screen() {
                Screen::Login => {
                    self.handle_login_events()?;
                    draw_frame(&mut terminal, |frame| render::draw_login(frame, &self.login));
                }
                Screen::ModeSelect => {
                    self.handle_mode_events()?;
                    let options: Vec<String> = MODE_OPTIONS.iter().map(|o| o.to_string()).collect();
                    let heading = format!("Welcome, {}", self.player_name());
                    draw_frame(&mut terminal, |frame| {
                        render::draw_menu(
                            frame,
                            &heading,
                            &options,
                            self.mode_selected,
                            "[Up/Down] Select  [Enter] Confirm  [Esc] Log out  [Q] Quit",
                        )
                    });
                }
                Screen::DifficultySelect => {
                    self.handle_difficulty_events()?;
                    let options: Vec<String> = Difficulty::ALL
                        .iter()
                        .map(|d| {
                            let target = self.config.win_score(MatchMode::PlayerVsComputer(*d));
                            format!("{} (first to {})", d.display_name(), target)
                        })
                        .collect();
                    draw_frame(&mut terminal, |frame| {
                        render::draw_menu(
                            frame,
                            "Choose your opponent",
                            &options,
                            self.difficulty_selected,
                            "[Up/Down] Select  [Enter] Play  [Esc] Back",
                        )
                    });
                }
                Screen::Playing => self.play_frame(&mut terminal)?,
                Screen::GameOver => {
                    self.handle_game_over_events()?;
                    if let Some(session) = self.session.as_ref() {
                        let snapshot = session.game.snapshot();
                        draw_frame(&mut terminal, |frame| render::draw_game_over(frame, &snapshot));
                    }
                }
                Screen::Leaderboard => {
                    self.handle_leaderboard_events()?;
                    let rows = self.store.top_scores(LEADERBOARD_SIZE);
                    let user = self.user.as_deref();
                    draw_frame(&mut terminal, |frame| render::draw_leaderboard(frame, &rows, user));
                }
            }
        }
        Ok(())
    }

    fn player_name(&self) -> &str {
        self.user.as_deref().unwrap_or("Player 1")
    }

    fn start_match(&mut self, mode: MatchMode) {
        let rng = match self.seed {
            Some(seed) => GameRng::new(seed.wrapping_add(self.matches_started)),
            None => GameRng::from_entropy(),
        };
        self.matches_started += 1;
        let game = Match::new(mode, self.config.clone(), self.player_name(), None, rng);
        self.session = Some(Session::new(game));
        self.keys.clear();
    }

    fn leave_match(&mut self) {
        log::info!("left match");
        self.session = None;
        self.keys.clear();
        self.fsm.transition(ScreenAction::Back);
    }

    fn handle_login_events(&mut self) -> anyhow::Result<()> {
        let Some(key) = next_press(Duration::from_millis(10))? else {
            return Ok(());
        };
        let logged_in = match key.code {
            KeyCode::Esc => {
                self.exit = true;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.login.switch_field();
                None
            }
            KeyCode::Enter => self.login.log_in(&mut self.store),
            KeyCode::F(2) => self.login.register(&mut self.store),
            KeyCode::Backspace => {
                self.login.backspace();
                None
            }
            KeyCode::Char(c) => {
                self.login.push(c);
                None
            }
            _ => None,
        };

        if let Some(username) = logged_in {
            self.user = Some(username);
            self.mode_selected = 0;
            self.fsm.transition(ScreenAction::LoggedIn);
        }
        Ok(())
    }

    fn handle_mode_events(&mut self) -> anyhow::Result<()> {
        let Some(key) = next_press(Duration::from_millis(10))? else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.mode_selected = step_selection(self.mode_selected, MODE_OPTIONS.len(), key.code);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit = true,
            KeyCode::Esc => self.log_out(),
            KeyCode::Enter => match self.mode_selected {
                0 => {
                    self.fsm.transition(ScreenAction::ChooseComputer);
                }
                1 => {
                    self.start_match(MatchMode::PlayerVsPlayer);
                    self.fsm.transition(ScreenAction::ChooseVersus);
                }
                2 => {
                    self.start_match(MatchMode::Deception);
                    self.fsm.transition(ScreenAction::ChooseDeception);
                }
                3 => {
                    self.fsm.transition(ScreenAction::ShowLeaderboard);
                }
                _ => self.log_out(),
            },
            _ => {}
        }
        Ok(())
    }

    fn log_out(&mut self) {
        if let Some(user) = self.user.take() {
            log::info!("{} logged out", user);
        }
        self.login.clear();
        self.login.message = Some("Logged out".to_string());
        self.fsm.transition(ScreenAction::LogOut);
    }

    fn handle_difficulty_events(&mut self) -> anyhow::Result<()> {
        let Some(key) = next_press(Duration::from_millis(10))? else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.difficulty_selected =
                    step_selection(self.difficulty_selected, Difficulty::ALL.len(), key.code);
            }
            KeyCode::Esc => {
                self.fsm.transition(ScreenAction::Back);
            }
            KeyCode::Enter => {
                let difficulty = Difficulty::ALL[self.difficulty_selected];
                self.start_match(MatchMode::PlayerVsComputer(difficulty));
                self.fsm.transition(ScreenAction::DifficultyChosen);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_game_over_events(&mut self) -> anyhow::Result<()> {
        let Some(key) = next_press(Duration::from_millis(10))? else {
            return Ok(());
        };
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let mode = self.session.as_ref().map(Session::mode);
                match mode {
                    Some(MatchMode::PlayerVsComputer(_)) | None => {
                        self.session = None;
                        self.fsm.transition(ScreenAction::ChangeDifficulty);
                    }
                    Some(_) => {
                        if let Some(session) = self.session.as_mut() {
                            session.game.reset();
                            session.resync();
                        }
                        self.keys.clear();
                        self.fsm.transition(ScreenAction::Restart);
                    }
                }
            }
            KeyCode::Esc => {
                self.session = None;
                self.fsm.transition(ScreenAction::Back);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_leaderboard_events(&mut self) -> anyhow::Result<()> {
        if let Some(key) = next_press(Duration::from_millis(10))? {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.fsm.transition(ScreenAction::Back);
            }
        }
        Ok(())
    }

    fn handle_play_events(&mut self, now: Instant) -> anyhow::Result<()> {
        // Drain everything pending so held keys stay responsive
        while event::poll(Duration::from_millis(5))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if self.keys.handle(key, now) || key.kind != KeyEventKind::Press {
                continue;
            }
            match input::match_command(key.code) {
                Some(MatchCommand::Pause) => {
                    if let Some(session) = self.session.as_mut() {
                        session.toggle_pause();
                    }
                    self.keys.clear();
                }
                Some(MatchCommand::Leave) => {
                    self.leave_match();
                    return Ok(());
                }
                None => {}
            }
        }
        Ok(())
    }

    /// One frame of play: input, due ticks, draw, then any quote or game over
    fn play_frame(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        let now = Instant::now();
        self.handle_play_events(now)?;
        if !self.fsm.is_playing() {
            return Ok(());
        }

        let input = self.keys.tick_input(now);
        let Some(session) = self.session.as_mut() else {
            self.fsm.transition(ScreenAction::Back);
            return Ok(());
        };
        let mut recorder = StoreRecorder::new(&mut self.store);
        let report = session.update(now, input, &mut recorder);

        let snapshot = session.game.snapshot();
        let win_score = session.game.win_score();
        let paused = session.is_paused();
        draw_frame(terminal, |frame| draw_match_or_fallback(frame, &snapshot, win_score, paused));

        if report.game_over {
            self.keys.clear();
            self.fsm.transition(ScreenAction::MatchOver);
            return Ok(());
        }

        if let Some(quote) = report.quote {
            match self.run_quote_modal(terminal, &quote, &snapshot, win_score)? {
                QuoteOutcome::Continue => {
                    if let Some(session) = self.session.as_mut() {
                        session.dismiss_quote();
                    }
                    self.keys.clear();
                }
                QuoteOutcome::LeaveMatch => self.leave_match(),
                QuoteOutcome::ExitGame => {
                    log::info!("streak of {} ended the session", quote.streak);
                    self.exit = true;
                }
            }
        }
        Ok(())
    }

    /// Nested loop that blocks the frozen match until the quote is closed
    fn run_quote_modal(
        &mut self,
        terminal: &mut DefaultTerminal,
        quote: &StreakQuote,
        snapshot: &Snapshot,
        win_score: u32,
    ) -> anyhow::Result<QuoteOutcome> {
        log::info!("showing quote for streak {}", quote.streak);
        let shown = Instant::now();

        loop {
            let seconds_left = if quote.force_exit {
                None
            } else {
                let elapsed = shown.elapsed();
                if elapsed >= QUOTE_AUTO_DISMISS {
                    return Ok(QuoteOutcome::Continue);
                }
                Some((QUOTE_AUTO_DISMISS - elapsed).as_secs_f32().ceil() as u64)
            };

            draw_frame(terminal, |frame| {
                draw_match_or_fallback(frame, snapshot, win_score, false);
                render::draw_quote(frame, quote, seconds_left);
            });

            let Some(key) = next_press(Duration::from_millis(50))? else {
                continue;
            };
            match (quote.force_exit, key.code) {
                (true, KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Esc) => {
                    return Ok(QuoteOutcome::ExitGame);
                }
                (false, KeyCode::Char(' ')) => return Ok(QuoteOutcome::Continue),
                (false, KeyCode::Esc) => return Ok(QuoteOutcome::LeaveMatch),
                _ => {}
            }
        }
    }
}
