use std::time::Duration;

use crossterm::event::Event;
use neontris_game::{GameSession, Intent, SessionState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    audio::AudioPlayer,
    config::UiSection,
    input::{self, GAME_OVER_BINDINGS, PAUSED_BINDINGS, PLAYING_BINDINGS},
    theme::{Theme, ThemeName},
    tui::{App, RenderMode, Tui},
    ui::widgets::{KeyBindingDisplay, SessionDisplay},
};

/// Time between two advisor moves in auto-play.
const AUTO_MOVE_INTERVAL: Duration = Duration::from_millis(250);
const RENDER_INTERVAL: Duration = Duration::from_millis(1000 / 30);

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    audio: AudioPlayer,
    initial_theme: ThemeName,
    tick_rate: f64,
    preview: usize,
    auto_play: bool,
    auto_elapsed: Duration,
}

impl PlayApp {
    pub fn new(session: GameSession, audio: AudioPlayer, ui: &UiSection, auto_play: bool) -> Self {
        Self {
            session,
            audio,
            initial_theme: ui.theme,
            tick_rate: ui.tick_rate,
            preview: ui.preview,
            auto_play,
            auto_elapsed: Duration::ZERO,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn theme(&self) -> &'static Theme {
        Theme::cycled(self.initial_theme, self.session.theme_index())
    }

    fn apply(&mut self, intent: Intent) {
        let theme = self.session.theme_index();
        if self.session.apply(intent) {
            tracing::trace!(?intent, "intent applied");
        }
        if self.session.theme_index() != theme {
            tracing::info!(theme = %self.theme().name, "theme changed");
        }
        self.session.dispatch_events(&mut self.audio);
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(self.tick_rate);
        tui.set_render_mode(RenderMode::Interval(RENDER_INTERVAL));
    }

    fn should_exit(&self) -> bool {
        self.session.quit_requested()
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Some(intent) = event.as_key_event().and_then(input::intent_for_key) {
            self.apply(intent);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let theme = self.theme();
        let session_display = SessionDisplay::new(&self.session, theme)
            .auto_play(self.auto_play)
            .next_pieces(self.preview);
        let bindings = match self.session.state() {
            SessionState::Playing => PLAYING_BINDINGS,
            SessionState::Paused => PAUSED_BINDINGS,
            SessionState::GameOver => GAME_OVER_BINDINGS,
        };
        let help = KeyBindingDisplay::new(bindings).key_color(theme.border);

        let [main_area, help_area] =
            Layout::vertical([Constraint::Min(22), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.session.tick(elapsed);
        if self.auto_play && self.session.state().is_playing() {
            self.auto_elapsed += elapsed;
            if self.auto_elapsed >= AUTO_MOVE_INTERVAL {
                self.auto_elapsed = Duration::ZERO;
                self.session.follow_advice();
            }
        }
        self.session.dispatch_events(&mut self.audio);
    }
}
