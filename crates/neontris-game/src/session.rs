use std::time::Duration;

use neontris_advisor::{Advice, Advisor, HeuristicEvaluator};
use neontris_difficulty::{DifficultyController, DifficultyPhase, PerformanceSample};
use neontris_engine::{
    Board, GameField, GameStats, LockResult, Piece, PieceGenerator, PieceKind, PieceSeed,
    RotationDirection, StepOutcome,
};
use rand::Rng as _;

use crate::{EventSubscriber, GameConfig, GameEvent, Intent, SessionConfig, SessionConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Gravity interval used when dynamic difficulty is off.
#[must_use]
pub fn level_drop_interval(level: usize) -> Duration {
    let millis = 1000_u64.saturating_sub(50 * level as u64).max(100);
    Duration::from_millis(millis)
}

/// One game from first spawn to game over, plus everything around it: gravity,
/// the advisor, adaptive difficulty and the toggles the player can flip.
///
/// The session owns its clock. Callers advance it with [`Self::tick`] and translate
/// player input into [`Intent`]s; everything else is derived from those two inputs.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    field: GameField,
    stats: GameStats,
    state: SessionState,
    advisor: Advisor,
    advice: Option<Advice>,
    advisor_enabled: bool,
    ghost_enabled: bool,
    theme_index: usize,
    difficulty: DifficultyController,
    drop_interval: Duration,
    clock: Duration,
    gravity_elapsed: Duration,
    events: Vec<GameEvent>,
    quit_requested: bool,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Result<Self, SessionConfigError> {
        let advisor = Advisor::new(Box::new(HeuristicEvaluator::new(config.weights)?));
        let difficulty = DifficultyController::new(config.difficulty)?;
        let game = config.game;
        let seed = game.seed.unwrap_or_else(|| rand::rng().random());
        let field = GameField::new(PieceGenerator::with_seed(seed, game.randomizer));

        let mut session = Self {
            advisor_enabled: game.advisor,
            ghost_enabled: game.ghost,
            config: game,
            field,
            stats: GameStats::new(),
            state: SessionState::Playing,
            advisor,
            advice: None,
            theme_index: 0,
            difficulty,
            drop_interval: Duration::ZERO,
            clock: Duration::ZERO,
            gravity_elapsed: Duration::ZERO,
            events: Vec::new(),
            quit_requested: false,
        };
        session.drop_interval = session.base_drop_interval();
        session.refresh_advice();
        tracing::info!(%seed, randomizer = ?session.config.randomizer, "session started");
        Ok(session)
    }

    fn base_drop_interval(&self) -> Duration {
        if self.config.dynamic_difficulty {
            self.difficulty.current_drop_interval()
        } else {
            level_drop_interval(self.stats.level())
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.field.falling_piece()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.field.next_pieces()
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.field.generator().seed()
    }

    /// Landing position of the falling piece, when the ghost is shown.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        (self.ghost_enabled && !self.state.is_game_over()).then(|| self.field.ghost_piece())
    }

    /// Recommendation for the falling piece, when the advisor is on.
    #[must_use]
    pub fn advice(&self) -> Option<Advice> {
        self.advice
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    #[must_use]
    pub fn difficulty_phase(&self) -> DifficultyPhase {
        self.difficulty.phase()
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Time spent playing, excluding pauses.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    #[must_use]
    pub fn is_advisor_enabled(&self) -> bool {
        self.advisor_enabled
    }

    #[must_use]
    pub fn is_ghost_enabled(&self) -> bool {
        self.ghost_enabled
    }

    #[must_use]
    pub fn is_dynamic_difficulty(&self) -> bool {
        self.config.dynamic_difficulty
    }

    /// Number of theme switches requested so far. The renderer maps it onto its palette list.
    #[must_use]
    pub fn theme_index(&self) -> usize {
        self.theme_index
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Advances the session clock by `dt` and applies any gravity steps that became due.
    ///
    /// Does nothing unless the game is being played.
    pub fn tick(&mut self, dt: Duration) {
        if !self.state.is_playing() {
            return;
        }
        self.clock += dt;
        if let Some(interval) = self.difficulty.tick(self.clock)
            && self.config.dynamic_difficulty
        {
            self.drop_interval = interval;
        }

        self.gravity_elapsed += dt;
        while self.state.is_playing() && self.gravity_elapsed >= self.drop_interval {
            self.gravity_elapsed -= self.drop_interval;
            let piece = self.field.falling_piece();
            if let StepOutcome::Locked(lock) = self.field.step(self.stats.level()) {
                self.complete_lock(piece, lock);
            }
        }
    }

    /// Applies a player intent. Returns whether it changed anything.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::MoveLeft => self.move_left(),
            Intent::MoveRight => self.move_right(),
            Intent::RotateCw => self.rotate(RotationDirection::Clockwise),
            Intent::RotateCcw => self.rotate(RotationDirection::CounterClockwise),
            Intent::SoftDrop => self.soft_drop(),
            Intent::HardDrop => self.hard_drop(),
            Intent::ToggleAdvisor => self.toggle_advisor(),
            Intent::ToggleGhost => self.toggle_ghost(),
            Intent::Pause => self.toggle_pause(),
            Intent::Restart => self.restart(),
            Intent::Quit => self.quit(),
            Intent::ChangeTheme => self.change_theme(),
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dx: i32) -> bool {
        if !self.state.is_playing() || self.field.try_move(dx, 0).is_err() {
            return false;
        }
        self.events.push(GameEvent::PieceMoved);
        true
    }

    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if !self.state.is_playing() || self.field.try_rotate(direction).is_err() {
            return false;
        }
        self.events.push(GameEvent::PieceRotated);
        true
    }

    /// Moves the falling piece one row down. Never locks it; gravity does that.
    pub fn soft_drop(&mut self) -> bool {
        if !self.state.is_playing() || self.field.try_move(0, 1).is_err() {
            return false;
        }
        self.events.push(GameEvent::PieceMoved);
        true
    }

    pub fn hard_drop(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let drop = self.field.hard_drop(self.stats.level());
        self.events.push(GameEvent::PieceDropped);
        self.gravity_elapsed = Duration::ZERO;
        self.complete_lock(drop.piece, drop.lock);
        true
    }

    /// Turns and shifts the falling piece to the advised rotation and column on its
    /// current row, then hard-drops it.
    ///
    /// Returns `false` when there is no advice to follow, or when gravity has already
    /// carried the piece below the advised landing row.
    pub fn follow_advice(&mut self) -> bool {
        let Some(advice) = self.advice.filter(|_| self.state.is_playing()) else {
            return false;
        };
        let row = self.field.falling_piece().row();
        if row > advice.landing_row() {
            return false;
        }
        let start = Piece::new(advice.piece.kind(), advice.rotation(), advice.column(), row);
        if self.field.set_falling_piece(start).is_err() {
            return false;
        }
        self.hard_drop()
    }

    pub fn toggle_advisor(&mut self) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        self.advisor_enabled = !self.advisor_enabled;
        self.refresh_advice();
        tracing::debug!(enabled = self.advisor_enabled, "advisor toggled");
        true
    }

    pub fn toggle_ghost(&mut self) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        self.ghost_enabled = !self.ghost_enabled;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => return false,
        };
        true
    }

    /// Starts a new game, keeping the toggles.
    ///
    /// A configured seed replays the same sequence; otherwise a fresh one is drawn.
    pub fn restart(&mut self) -> bool {
        if self.config.seed.is_some() {
            self.field.restart();
        } else {
            self.field.restart_with_seed(rand::rng().random());
        }
        self.stats = GameStats::new();
        self.difficulty.reset();
        self.state = SessionState::Playing;
        self.clock = Duration::ZERO;
        self.gravity_elapsed = Duration::ZERO;
        self.drop_interval = self.base_drop_interval();
        self.refresh_advice();
        tracing::info!(seed = %self.seed(), "session restarted");
        true
    }

    pub fn quit(&mut self) -> bool {
        self.quit_requested = true;
        true
    }

    pub fn change_theme(&mut self) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        self.theme_index = self.theme_index.wrapping_add(1);
        true
    }

    /// Takes the events buffered since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Hands every buffered event to `subscriber`, in the order they happened.
    pub fn dispatch_events(&mut self, subscriber: &mut dyn EventSubscriber) {
        for event in self.events.drain(..) {
            subscriber.on_event(event);
        }
    }

    fn complete_lock(&mut self, placed: Piece, lock: LockResult) {
        self.stats.record_lock(&lock);
        let lines = lock.lines_cleared();
        self.difficulty.record_sample(PerformanceSample {
            timestamp: self.clock,
            score_delta: lock.score_delta,
            lines_delta: lines,
            matched_advice: self.advice.map(|advice| advice.is_followed_by(placed)),
        });

        if lines > 0 {
            self.events.push(GameEvent::LinesCleared(lines));
            if !self.config.dynamic_difficulty {
                self.drop_interval = level_drop_interval(self.stats.level());
            }
        }

        if lock.topped_out {
            self.state = SessionState::GameOver;
            self.advice = None;
            self.events.push(GameEvent::GameOver);
            tracing::info!(
                score = self.stats.score(),
                lines = self.stats.total_cleared_lines(),
                pieces = self.stats.completed_pieces(),
                "game over"
            );
            return;
        }
        self.refresh_advice();
    }

    fn refresh_advice(&mut self) {
        self.advice = if self.advisor_enabled && !self.state.is_game_over() {
            self.advisor
                .advise(self.field.falling_piece().kind(), &self.field.board().snapshot())
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use neontris_engine::SPAWN_ROW;

    use super::*;

    fn session_with(game: GameConfig) -> GameSession {
        GameSession::new(SessionConfig {
            game: GameConfig {
                seed: Some(PieceSeed::from_bytes([3; 16])),
                ..game
            },
            ..SessionConfig::default()
        })
        .unwrap()
    }

    fn session() -> GameSession {
        session_with(GameConfig::default())
    }

    fn play_until_game_over(session: &mut GameSession) {
        for _ in 0..200 {
            if session.state().is_game_over() {
                return;
            }
            session.hard_drop();
        }
        panic!("stacking in the spawn column should top out");
    }

    #[test]
    fn test_level_drop_interval() {
        assert_eq!(level_drop_interval(1), Duration::from_millis(950));
        assert_eq!(level_drop_interval(10), Duration::from_millis(500));
        assert_eq!(level_drop_interval(18), Duration::from_millis(100));
        assert_eq!(level_drop_interval(40), Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SessionConfig::default();
        config.weights.holes = -1.0;
        assert!(matches!(
            GameSession::new(config),
            Err(SessionConfigError::Weights(_))
        ));
    }

    #[test]
    fn test_initial_state() {
        let session = session();
        assert!(session.state().is_playing());
        assert!(session.board().is_empty());
        assert_eq!(session.falling_piece().row(), SPAWN_ROW);
        assert!(session.advice().is_none());
        assert!(session.ghost_piece().is_some());
        assert_eq!(session.drop_interval(), Duration::from_millis(1000));
        assert!(session.difficulty_phase().is_warming_up());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = session();
        let b = session();
        assert_eq!(a.falling_piece(), b.falling_piece());
        assert!(a.next_pieces().eq(b.next_pieces()));
    }

    #[test]
    fn test_gravity() {
        let mut session = session_with(GameConfig {
            dynamic_difficulty: false,
            ..GameConfig::default()
        });
        assert_eq!(session.drop_interval(), Duration::from_millis(950));

        let row = session.falling_piece().row();
        session.tick(Duration::from_millis(900));
        assert_eq!(session.falling_piece().row(), row);
        session.tick(Duration::from_millis(100));
        assert_eq!(session.falling_piece().row(), row + 1);
        session.tick(Duration::from_millis(1900));
        assert_eq!(session.falling_piece().row(), row + 3);
        assert_eq!(session.clock(), Duration::from_millis(2900));
    }

    #[test]
    fn test_gravity_locks_at_the_bottom() {
        let mut session = session();
        for _ in 0..30 {
            session.tick(Duration::from_secs(1));
        }
        assert_eq!(session.stats().completed_pieces(), 1);
        assert!(!session.board().is_empty());
    }

    #[test]
    fn test_pause_blocks_play() {
        let mut session = session();
        assert!(session.apply(Intent::Pause));
        assert!(session.state().is_paused());

        let piece = session.falling_piece();
        assert!(!session.apply(Intent::MoveLeft));
        assert!(!session.apply(Intent::RotateCw));
        assert!(!session.apply(Intent::HardDrop));
        session.tick(Duration::from_secs(10));
        assert_eq!(session.falling_piece(), piece);
        assert_eq!(session.clock(), Duration::ZERO);

        assert!(session.apply(Intent::Pause));
        assert!(session.apply(Intent::MoveLeft));
    }

    #[test]
    fn test_soft_drop_never_locks() {
        let mut session = session();
        while session.apply(Intent::SoftDrop) {}
        assert_eq!(session.falling_piece(), session.field().ghost_piece());
        assert_eq!(session.stats().completed_pieces(), 0);
        assert!(session.board().is_empty());
    }

    #[test]
    fn test_events_are_emitted_in_order() {
        let mut session = session();
        session.apply(Intent::MoveLeft);
        session.apply(Intent::RotateCw);
        session.apply(Intent::HardDrop);

        let mut received = Vec::new();
        session.dispatch_events(&mut received);
        assert_eq!(
            received,
            [
                GameEvent::PieceMoved,
                GameEvent::PieceRotated,
                GameEvent::PieceDropped
            ]
        );
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn test_top_out_ends_the_game() {
        let mut session = session();
        play_until_game_over(&mut session);

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
        assert!(session.ghost_piece().is_none());

        let clock = session.clock();
        let board = session.board().clone();
        session.tick(Duration::from_secs(5));
        assert_eq!(session.clock(), clock);
        assert_eq!(session.board(), &board);

        assert!(!session.apply(Intent::MoveLeft));
        assert!(!session.apply(Intent::Pause));
        assert!(!session.apply(Intent::ToggleAdvisor));
        assert!(!session.apply(Intent::ChangeTheme));
        assert!(session.state().is_game_over());
    }

    #[test]
    fn test_restart() {
        let mut session = session();
        let first = session.falling_piece();
        play_until_game_over(&mut session);
        assert!(session.stats().completed_pieces() > 0);

        assert!(session.apply(Intent::Restart));
        assert!(session.state().is_playing());
        assert!(session.board().is_empty());
        assert_eq!(session.stats(), &GameStats::new());
        assert_eq!(session.clock(), Duration::ZERO);
        assert!(session.difficulty_phase().is_warming_up());
        // A configured seed replays the same sequence.
        assert_eq!(session.falling_piece(), first);
    }

    #[test]
    fn test_toggles() {
        let mut session = session();
        assert!(session.apply(Intent::ToggleGhost));
        assert!(session.ghost_piece().is_none());

        assert!(session.apply(Intent::ToggleAdvisor));
        assert!(session.is_advisor_enabled());
        assert!(session.advice().is_some());
        assert!(session.apply(Intent::ToggleAdvisor));
        assert!(session.advice().is_none());

        assert!(session.apply(Intent::ChangeTheme));
        assert!(session.apply(Intent::ChangeTheme));
        assert_eq!(session.theme_index(), 2);

        assert!(!session.quit_requested());
        assert!(session.apply(Intent::Quit));
        assert!(session.quit_requested());
    }

    #[test]
    fn test_following_advice_clears_lines() {
        let mut session = session_with(GameConfig {
            advisor: true,
            ..GameConfig::default()
        });
        for _ in 0..100 {
            assert!(session.follow_advice());
            session.tick(Duration::from_millis(500));
        }
        assert!(session.state().is_playing());
        assert_eq!(session.stats().completed_pieces(), 100);
        assert!(session.stats().total_cleared_lines() > 0);
        assert!(session.stats().score() > 0);
        assert!(
            session
                .drain_events()
                .any(|event| matches!(event, GameEvent::LinesCleared(_)))
        );
        assert_eq!(session.difficulty().metrics(session.clock()).adherence, 1.0);
    }

    #[test]
    fn test_following_advice_keeps_the_fallen_row() {
        let mut session = session_with(GameConfig {
            advisor: true,
            dynamic_difficulty: false,
            ..GameConfig::default()
        });
        session.tick(Duration::from_millis(950 * 2));
        assert_eq!(session.falling_piece().row(), SPAWN_ROW + 2);

        let advice = session.advice().unwrap();
        let start = Piece::new(advice.piece.kind(), advice.rotation(), advice.column(), 2);
        assert_eq!(session.board().drop_position(start), advice.piece);
        assert!(session.follow_advice());
        for (column, row) in advice.piece.cells() {
            assert!(session.board().cell(column, row).unwrap().is_filled());
        }
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_samples_without_advice_are_neutral() {
        let mut session = session();
        assert!(!session.follow_advice());
        for _ in 0..3 {
            session.tick(Duration::from_secs(3));
            session.hard_drop();
        }
        assert_eq!(session.difficulty().metrics(session.clock()).adherence, 0.5);
    }
}
