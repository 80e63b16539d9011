//! One match: the owned simulation context and its fixed-tick update.

use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::ai::AiController;
use crate::components::{Ball, DecoyBall, Paddle, Side};
use crate::config::Config;
use crate::deception::DeceptionEngine;
use crate::map::GameMap;
use crate::resources::{Events, GameRng, MatchMode, Score, Time};
use crate::snapshot::{BallView, EffectView, PaddleView, Snapshot};
use crate::streak::{StreakGate, StreakQuote};
use crate::systems::*;
use crate::{create_ball, create_paddle};

/// Events produced by one tick
pub type TickReport = Events;

/// Receives the final result of a match
pub trait ResultRecorder {
    fn record_result(&mut self, username: &str, won: bool);
}

/// Recorder that drops results
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl ResultRecorder for NoopRecorder {
    fn record_result(&mut self, _username: &str, _won: bool) {}
}

/// Where the match is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPhase {
    Playing,
    /// Paused until the quote is dismissed
    AwaitingQuote(StreakQuote),
    /// Terminal: the player has to leave
    MustExit(StreakQuote),
    GameOver,
}

pub struct Match {
    world: World,
    time: Time,
    map: GameMap,
    config: Config,
    mode: MatchMode,
    players: [String; 2],
    score: Score,
    events: Events,
    rng: GameRng,
    opponent: Option<AiController>,
    deception: Option<DeceptionEngine>,
    streak: StreakGate,
    phase: MatchPhase,
    winner: Option<Side>,
    ticks: u64,
}

impl Match {
    /// Set up a match; `opponent_name` names the second human in two-player matches
    pub fn new(
        mode: MatchMode,
        config: Config,
        player: impl Into<String>,
        opponent_name: Option<String>,
        rng: GameRng,
    ) -> Self {
        let opponent_label = match mode {
            MatchMode::PlayerVsComputer(difficulty) => format!("{} AI", difficulty.display_name()),
            MatchMode::Deception => "DECEPTION AI".to_string(),
            MatchMode::PlayerVsPlayer => opponent_name.unwrap_or_else(|| "Player 2".to_string()),
        };

        let mut game = Self {
            world: World::new(),
            time: Time::default(),
            map: GameMap::from_config(&config),
            config,
            mode,
            players: [player.into(), opponent_label],
            score: Score::new(),
            events: Events::new(),
            rng,
            opponent: AiController::for_mode(mode),
            deception: None,
            streak: StreakGate::new(),
            phase: MatchPhase::Playing,
            winner: None,
            ticks: 0,
        };
        game.reset();
        game
    }

    /// Put paddles, ball and scores back to kickoff; deception picks a fresh effect
    pub fn reset(&mut self) {
        if let Some(engine) = self.deception.as_mut() {
            engine.shutdown(&mut self.world, &self.map);
        }
        self.world.clear();

        for side in [Side::Left, Side::Right] {
            let spawn = self.map.paddle_spawn(side, &self.config);
            create_paddle(&mut self.world, side, spawn.y, self.config.paddle_height);
        }

        let dir_x = if self.rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
        let mut ball = Ball::new(
            self.map.ball_spawn(),
            Vec2::new(dir_x, 0.0),
            self.config.ball_size,
        );
        ball.relaunch(
            self.map.ball_spawn(),
            self.config.ball_speed_x,
            self.config.ball_speed_y,
            self.config.relaunch_min_dy,
            &mut self.rng,
        );
        create_ball(&mut self.world, ball.pos, ball.vel, ball.size);

        self.time = Time::default();
        self.score = Score::new();
        self.events.clear();
        self.streak.reset();
        self.phase = MatchPhase::Playing;
        self.winner = None;
        self.ticks = 0;

        self.deception = match self.mode {
            MatchMode::Deception => Some(DeceptionEngine::start(
                &self.map,
                &self.config,
                self.time.now,
                &mut self.rng,
            )),
            _ => None,
        };

        log::info!(
            "match start: {:?}, {} vs {}, first to {}",
            self.mode,
            self.players[0],
            self.players[1],
            self.config.win_score(self.mode)
        );
    }

    /// Advance the match by one fixed tick
    ///
    /// Does nothing unless the match is in play: a pending quote, a forced
    /// exit or a finished match all freeze the simulation.
    pub fn tick(&mut self, input: TickInput, recorder: &mut dyn ResultRecorder) -> &TickReport {
        self.events.clear();
        if self.phase != MatchPhase::Playing {
            return &self.events;
        }

        // 1. Paddles: human intents, then the AI
        let reverse = self
            .deception
            .as_ref()
            .map(DeceptionEngine::reverse_controls)
            .unwrap_or(false);
        ingest_inputs(&mut self.world, input, self.mode.right_is_human(), reverse);
        move_paddles(&mut self.world, &self.map, &self.config);
        if let Some(ai) = self.opponent {
            let effect = self.deception.as_ref().map(DeceptionEngine::active);
            ai.drive(&mut self.world, &self.map, &self.config, effect, &mut self.rng);
        }

        // 2. Ball
        move_ball(&mut self.world);

        // 3. Effects
        if let Some(engine) = self.deception.as_mut() {
            self.events.effect_changed = engine.update(
                &mut self.world,
                &self.map,
                &self.config,
                self.time.now,
                &mut self.rng,
            );
        }
        if self.mode.is_expert() {
            apply_expert_hazards(&mut self.world, &self.map, &self.config, &mut self.rng);
        }

        // 4-5. Walls and paddles
        check_collisions(&mut self.world, &self.map, &self.config, &mut self.events);

        // 6. Scoring
        let scorer = check_scoring(
            &mut self.world,
            &self.map,
            &mut self.score,
            &mut self.events,
            &mut self.rng,
            &self.config,
        );
        match scorer {
            Some(Side::Left) => self.streak.reset(),
            Some(Side::Right) if self.mode.is_expert() => {
                self.events.quote = self.streak.record_ai_score();
            }
            _ => {}
        }

        // 7. Win
        if let Some(winner) = self.score.has_winner(self.config.win_score(self.mode)) {
            self.finish(winner, recorder);
        } else if let Some(quote) = self.events.quote.clone() {
            self.phase = if quote.force_exit {
                MatchPhase::MustExit(quote)
            } else {
                MatchPhase::AwaitingQuote(quote)
            };
        }

        self.time.advance();
        self.ticks += 1;
        &self.events
    }

    fn finish(&mut self, winner: Side, recorder: &mut dyn ResultRecorder) {
        self.winner = Some(winner);
        self.phase = MatchPhase::GameOver;
        self.events.game_over = Some(winner);

        let human_won = winner == Side::Left;
        if human_won {
            self.streak.reset();
        }
        recorder.record_result(&self.players[0], human_won);
        log::info!(
            "match over: {} wins {}-{}",
            self.players[winner_index(winner)],
            self.score.left,
            self.score.right
        );
    }

    /// Resume after a dismissible quote; returns whether anything changed
    pub fn dismiss_quote(&mut self) -> bool {
        if matches!(self.phase, MatchPhase::AwaitingQuote(_)) {
            self.phase = MatchPhase::Playing;
            true
        } else {
            false
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    pub fn players(&self) -> &[String; 2] {
        &self.players
    }

    pub fn streak(&self) -> &StreakGate {
        &self.streak
    }

    pub fn deception(&self) -> Option<&DeceptionEngine> {
        self.deception.as_ref()
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for scenario setup in tests and tools
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn win_score(&self) -> u32 {
        self.config.win_score(self.mode)
    }

    /// Name of the winning side, once there is one
    pub fn winner_label(&self) -> Option<&str> {
        self.winner
            .map(|side| self.players[winner_index(side)].as_str())
    }

    pub fn snapshot(&self) -> Snapshot {
        let effect = if self.is_game_over() {
            None
        } else {
            self.deception.as_ref().map(|engine| EffectView {
                effect: engine.active(),
                name: engine.active().name(),
                remaining: engine.remaining(self.time.now),
            })
        };
        let active = effect.map(|view| view.effect);

        let ball = self
            .world
            .query::<&Ball>()
            .iter()
            .map(|(_e, ball)| BallView {
                pos: ball.pos,
                size: ball.size,
                visible: active.map_or(true, |e| e.ball_visible()),
            })
            .next();

        let mut paddles: Vec<PaddleView> = self
            .world
            .query::<&Paddle>()
            .iter()
            .map(|(_e, paddle)| PaddleView {
                side: paddle.side,
                pos: Vec2::new(self.config.paddle_x(paddle.side), paddle.y),
                width: self.config.paddle_width,
                height: paddle.height,
                visible: active.map_or(true, |e| e.paddle_visible(paddle.side)),
            })
            .collect();
        paddles.sort_by_key(|p| winner_index(p.side));

        let mut decoys: Vec<DecoyBall> = Vec::new();
        if effect.is_some() {
            if let Some(engine) = self.deception.as_ref() {
                engine.for_each_decoy(|decoy| decoys.push(*decoy));
            }
        }

        Snapshot {
            mode: self.mode,
            arena: Vec2::new(self.map.width, self.map.height),
            ball,
            paddles,
            decoys,
            score: self.score,
            players: self.players.clone(),
            effect,
            reverse_controls: effect.is_some()
                && self.deception.as_ref().is_some_and(DeceptionEngine::reverse_controls),
            streak: self.streak.streak(),
            paused_for_quote: matches!(self.phase, MatchPhase::AwaitingQuote(_)),
            game_over: self.is_game_over(),
            winner_label: self.winner_label().map(str::to_string),
        }
    }
}

fn winner_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Difficulty;

    #[derive(Default)]
    struct CountingRecorder {
        results: Vec<(String, bool)>,
    }

    impl ResultRecorder for CountingRecorder {
        fn record_result(&mut self, username: &str, won: bool) {
            self.results.push((username.to_string(), won));
        }
    }

    fn new_match(mode: MatchMode) -> Match {
        Match::new(mode, Config::new(), "alice", None, GameRng::new(11))
    }

    /// Drive the ball out past the given edge until `scorer` gets the point
    fn score_point(game: &mut Match, scorer: Side, recorder: &mut dyn ResultRecorder) {
        let before = game.score().get(scorer);
        let width = game.map().width;
        for _ in 0..100 {
            for (_e, ball) in game.world_mut().query_mut::<&mut Ball>() {
                let (x, vx) = match scorer {
                    Side::Left => (width + 20.0, 5.0),
                    Side::Right => (-20.0, -5.0),
                };
                ball.pos = Vec2::new(x, 270.0);
                ball.vel = Vec2::new(vx, 0.0);
            }
            game.tick(TickInput::default(), recorder);
            if game.score().get(scorer) > before {
                return;
            }
        }
        panic!("{:?} never scored", scorer);
    }

    #[test]
    fn test_labels() {
        let game = new_match(MatchMode::PlayerVsComputer(Difficulty::Expert));
        assert_eq!(game.players()[1], "Knight of Hell AI");
        let game = new_match(MatchMode::Deception);
        assert_eq!(game.players()[1], "DECEPTION AI");
        let game = new_match(MatchMode::PlayerVsPlayer);
        assert_eq!(game.players()[1], "Player 2");
    }

    #[test]
    fn test_zero_win_score_from_settings_does_not_end_match() {
        let config = Config {
            win_scores: crate::config::WinScores {
                novice: 0,
                ..Default::default()
            },
            ..Config::default()
        }
        .sanitized();
        let mode = MatchMode::PlayerVsComputer(Difficulty::Novice);
        let mut game = Match::new(mode, config, "alice", None, GameRng::new(11));
        let mut recorder = CountingRecorder::default();

        game.tick(TickInput::default(), &mut recorder);
        assert!(!game.is_game_over());
        assert!(recorder.results.is_empty(), "Nothing recorded at 0-0");
    }

    #[test]
    fn test_ai_point_in_expert_surfaces_quote_and_pauses() {
        let mut game = new_match(MatchMode::PlayerVsComputer(Difficulty::Expert));
        let mut recorder = NoopRecorder;

        for _ in 0..5 {
            score_point(&mut game, Side::Right, &mut recorder);
        }

        match game.phase() {
            MatchPhase::AwaitingQuote(quote) => assert_eq!(quote.threshold, 5),
            other => panic!("Expected a quote, got {:?}", other),
        }

        let ticks = game.ticks();
        game.tick(TickInput::default(), &mut recorder);
        assert_eq!(game.ticks(), ticks, "Paused match must not advance");

        assert!(game.dismiss_quote());
        assert_eq!(game.phase(), &MatchPhase::Playing);
        assert!(!game.dismiss_quote(), "Nothing left to dismiss");
    }

    #[test]
    fn test_no_quotes_below_expert() {
        let mut game = new_match(MatchMode::PlayerVsComputer(Difficulty::Standard));
        let mut recorder = NoopRecorder;
        for _ in 0..6 {
            score_point(&mut game, Side::Right, &mut recorder);
            assert!(game.phase() == &MatchPhase::Playing, "No quote expected");
        }
        assert_eq!(game.streak().streak(), 0);
    }

    #[test]
    fn test_human_point_resets_streak() {
        let mut game = new_match(MatchMode::PlayerVsComputer(Difficulty::Expert));
        let mut recorder = NoopRecorder;
        for _ in 0..3 {
            score_point(&mut game, Side::Right, &mut recorder);
        }
        assert_eq!(game.streak().streak(), 3);

        score_point(&mut game, Side::Left, &mut recorder);
        assert_eq!(game.streak().streak(), 0);
    }

    #[test]
    fn test_pvp_game_over_records_once() {
        let mut game = new_match(MatchMode::PlayerVsPlayer);
        let mut recorder = CountingRecorder::default();

        for _ in 0..5 {
            score_point(&mut game, Side::Right, &mut recorder);
        }
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Side::Right));
        assert_eq!(game.winner_label(), Some("Player 2"));

        // Further ticks are ignored
        for _ in 0..10 {
            game.tick(TickInput::default(), &mut recorder);
        }
        assert_eq!(recorder.results, vec![("alice".to_string(), false)]);
    }

    #[test]
    fn test_reset_restores_kickoff() {
        let mut game = new_match(MatchMode::Deception);
        let mut recorder = NoopRecorder;
        score_point(&mut game, Side::Left, &mut recorder);
        assert_eq!(game.score().left, 1);

        game.reset();

        assert_eq!(game.score(), Score::new());
        assert_eq!(game.ticks(), 0);
        assert!(game.deception().is_some());
        let snapshot = game.snapshot();
        assert_eq!(snapshot.paddles.len(), 2);
        assert!(snapshot.effect.is_some());
        assert_eq!(snapshot.ball.map(|b| b.pos), Some(game.map().ball_spawn()));
    }

    #[test]
    fn test_snapshot_hides_effects_after_game_over() {
        let mut game = new_match(MatchMode::Deception);
        let mut recorder = NoopRecorder;
        for _ in 0..5 {
            score_point(&mut game, Side::Left, &mut recorder);
        }
        let snapshot = game.snapshot();
        assert!(snapshot.game_over);
        assert!(snapshot.effect.is_none());
        assert!(snapshot.decoys.is_empty());
        assert_eq!(snapshot.winner_label.as_deref(), Some("alice"));
    }
}
