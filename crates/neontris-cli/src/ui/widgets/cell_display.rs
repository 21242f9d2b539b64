use neontris_engine::PieceKind;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// What occupies one board square, in drawing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    /// Where the advisor recommends dropping the piece.
    Advice(PieceKind),
    /// Where the falling piece would land.
    Ghost(PieceKind),
    Filled(PieceKind),
}

/// A single two-column square.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_kind(kind: CellKind, theme: &Theme, show_dots: bool) -> Self {
        let background = Style::new().bg(theme.background);
        match kind {
            CellKind::Empty if show_dots => Self::new(background.fg(theme.grid), " ."),
            CellKind::Empty => Self::new(background, ""),
            CellKind::Advice(piece) => Self::new(background.fg(theme.piece_color(piece)), "<>"),
            CellKind::Ghost(piece) => Self::new(background.fg(theme.piece_color(piece)), "[]"),
            CellKind::Filled(piece) => {
                let color = theme.piece_color(piece);
                Self::new(Style::new().fg(color).bg(color), "")
            }
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
