//! Fixed-tick driver for one match

use std::time::Instant;

use accounts::UserStore;
use game_core::{Match, MatchMode, Params, ResultRecorder, StreakQuote, TickInput};

/// Turns wall-clock frame time into whole simulation ticks
///
/// Catch-up is capped at `max_ticks` per frame; any backlog beyond that is
/// dropped so a stalled terminal does not fast-forward the match.
#[derive(Debug)]
pub struct FixedStep {
    dt: f32,
    max_ticks: u32,
    accumulator: f32,
    last: Option<Instant>,
}

impl FixedStep {
    pub fn new(dt: f32, max_ticks: u32) -> Self {
        Self {
            dt,
            max_ticks,
            accumulator: 0.0,
            last: None,
        }
    }

    /// Ticks due since the previous call
    pub fn ticks_due(&mut self, now: Instant) -> u32 {
        let elapsed = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        self.accumulate(elapsed)
    }

    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);
        let due = (self.accumulator / self.dt).floor() as u32;
        if due > self.max_ticks {
            self.accumulator = 0.0;
            return self.max_ticks;
        }
        self.accumulator -= due as f32 * self.dt;
        due
    }

    /// Forget elapsed time, e.g. after a pause or a modal
    pub fn restart(&mut self) {
        self.accumulator = 0.0;
        self.last = None;
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(Params::FIXED_DT, Params::MAX_TICKS_PER_FRAME)
    }
}

/// Records finished matches in the user store
///
/// Store failures are logged; the match result is not retried.
pub struct StoreRecorder<'a> {
    store: &'a mut UserStore,
}

impl<'a> StoreRecorder<'a> {
    pub fn new(store: &'a mut UserStore) -> Self {
        Self { store }
    }
}

impl ResultRecorder for StoreRecorder<'_> {
    fn record_result(&mut self, username: &str, won: bool) {
        match self.store.record_result(username, won) {
            Ok(()) => log::info!("recorded {} for {}", if won { "win" } else { "loss" }, username),
            Err(e) => log::warn!("Could not record result for {}: {}", username, e),
        }
    }
}

/// What happened during one frame of play
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameReport {
    pub ticks: u32,
    pub quote: Option<StreakQuote>,
    pub game_over: bool,
}

/// A running match plus its frame pacing
pub struct Session {
    pub game: Match,
    step: FixedStep,
    paused: bool,
}

impl Session {
    pub fn new(game: Match) -> Self {
        Self {
            game,
            step: FixedStep::default(),
            paused: false,
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.game.mode()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.step.restart();
        log::debug!("paused: {}", self.paused);
    }

    /// Drop time spent outside the play loop
    pub fn resync(&mut self) {
        self.step.restart();
    }

    /// Run the ticks due at `now`, stopping early when the match freezes
    pub fn update(
        &mut self,
        now: Instant,
        input: TickInput,
        recorder: &mut dyn ResultRecorder,
    ) -> FrameReport {
        let due = self.step.ticks_due(now);
        if self.paused {
            return FrameReport::default();
        }
        self.run_ticks(due, input, recorder)
    }

    pub fn run_ticks(
        &mut self,
        count: u32,
        input: TickInput,
        recorder: &mut dyn ResultRecorder,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        for _ in 0..count {
            let events = self.game.tick(input, recorder);
            report.ticks += 1;
            if let Some(quote) = events.quote.clone() {
                report.quote = Some(quote);
            }
            if self.game.is_game_over() {
                report.game_over = true;
                break;
            }
            if report.quote.is_some() {
                break;
            }
        }
        report
    }

    /// Resume after a quote was dismissed
    pub fn dismiss_quote(&mut self) {
        self.game.dismiss_quote();
        self.step.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Ball, Config, Difficulty, GameRng, NoopRecorder};
    use glam::Vec2;
    use tempfile::TempDir;

    #[test]
    fn test_fixed_step_accumulates() {
        let mut step = FixedStep::new(0.01, 5);
        assert_eq!(step.accumulate(0.005), 0);
        assert_eq!(step.accumulate(0.006), 1);
        assert_eq!(step.accumulate(0.025), 2);
    }

    #[test]
    fn test_fixed_step_caps_catch_up() {
        let mut step = FixedStep::new(0.01, 5);
        assert_eq!(step.accumulate(1.0), 5);
        // Backlog was dropped
        assert_eq!(step.accumulate(0.0), 0);
    }

    #[test]
    fn test_first_frame_runs_nothing() {
        let mut step = FixedStep::default();
        assert_eq!(step.ticks_due(Instant::now()), 0);
    }

    #[test]
    fn test_store_recorder_counts_and_swallows_unknown_user() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = UserStore::open(dir.path().join("users.json"));
        store.register("alice", "hunter2").expect("register");

        {
            let mut recorder = StoreRecorder::new(&mut store);
            recorder.record_result("alice", true);
            recorder.record_result("ghost", false);
        }
        let stats = store.stats("alice").expect("stats");
        assert_eq!((stats.wins, stats.games), (1, 1));
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn test_run_ticks_stops_on_quote() {
        let mode = MatchMode::PlayerVsComputer(Difficulty::Expert);
        let game = Match::new(mode, Config::new(), "alice", None, GameRng::new(9));
        let mut session = Session::new(game);
        let mut recorder = NoopRecorder;

        let mut quote = None;
        for _ in 0..2000 {
            for (_e, ball) in session.game.world_mut().query_mut::<&mut Ball>() {
                ball.pos = Vec2::new(-20.0, 270.0);
                ball.vel = Vec2::new(-5.0, 0.0);
            }
            let report = session.run_ticks(3, TickInput::default(), &mut recorder);
            if report.quote.is_some() {
                quote = report.quote;
                break;
            }
        }

        let quote = quote.expect("quote after five AI points");
        assert_eq!(quote.threshold, 5);
        assert_eq!(session.game.score().right, 5);

        session.dismiss_quote();
        let report = session.run_ticks(1, TickInput::default(), &mut recorder);
        assert_eq!(report.ticks, 1);
    }

    #[test]
    fn test_paused_session_does_not_tick() {
        let game = Match::new(MatchMode::PlayerVsPlayer, Config::new(), "a", None, GameRng::new(1));
        let mut session = Session::new(game);
        session.toggle_pause();
        let start = Instant::now();
        session.update(start, TickInput::default(), &mut NoopRecorder);
        let report = session.update(
            start + std::time::Duration::from_secs(1),
            TickInput::default(),
            &mut NoopRecorder,
        );
        assert_eq!(report.ticks, 0);
        assert_eq!(session.game.ticks(), 0);
        assert!(session.is_paused());
    }
}
