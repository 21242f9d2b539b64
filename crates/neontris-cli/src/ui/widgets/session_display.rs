use neontris_game::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::{
    theme::Theme,
    ui::widgets::{BoardDisplay, PieceStackDisplay, SessionStatsDisplay},
};

/// The whole play screen: stats, board and piece preview side by side.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    theme: &'a Theme,
    auto_play: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
    next_pieces: usize,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, theme: &'a Theme) -> Self {
        Self {
            session,
            theme,
            auto_play: false,
            horizontal_padding: 1,
            vertical_padding: 0,
            next_pieces: 3,
        }
    }

    pub fn auto_play(self, auto_play: bool) -> Self {
        Self { auto_play, ..self }
    }

    pub fn next_pieces(self, next_pieces: usize) -> Self {
        Self {
            next_pieces,
            ..self
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let theme = self.theme;
        let style = Style::new().fg(theme.text).bg(theme.background);
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.state() {
            SessionState::Playing if self.auto_play => Color::Magenta,
            SessionState::Playing => theme.border,
            SessionState::Paused => Color::Yellow,
            SessionState::GameOver => Color::Red,
        };

        let game_board = BoardDisplay::new(self.session.board(), theme)
            .advice(self.session.advice().map(|advice| advice.piece))
            .ghost(self.session.ghost_piece())
            .falling_piece(self.session.falling_piece())
            .block(
                Block::bordered()
                    .title(Line::from(format!(" {} ", theme.name)).centered())
                    .border_style(border_style)
                    .style(style),
            );
        let piece_stack =
            PieceStackDisplay::new(self.session.next_pieces().take(self.next_pieces), theme)
                .block(
                    Block::bordered()
                        .title(Line::from("NEXT").centered())
                        .padding(block_padding)
                        .border_style(border_style)
                        .style(style),
                );
        let session_stats = SessionStatsDisplay::new(self.session, style).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [piece_stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        piece_stack.render(piece_stack_area, buf);

        let popup = match self.session.state() {
            SessionState::Playing => None,
            SessionState::Paused => Some(("PAUSED", Style::new().fg(Color::Black).bg(Color::Yellow))),
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(Color::White).bg(Color::Red)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
