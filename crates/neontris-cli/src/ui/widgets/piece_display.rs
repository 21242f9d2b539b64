use neontris_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::Widget,
};

use crate::{
    theme::Theme,
    ui::widgets::{CellDisplay, CellKind},
};

/// One piece in its spawn orientation, centered in a 4×2 area.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    theme: &'a Theme,
}

/// Bounding box of the spawn orientation: `(min_dx, min_dy, width, height)`.
fn spawn_bounds(kind: PieceKind) -> (i8, i8, u16, u16) {
    let offsets = kind.offsets(0);
    let min_x = offsets.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
    let max_x = offsets.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
    let min_y = offsets.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    let max_y = offsets.iter().map(|&(_, dy)| dy).max().unwrap_or(0);
    let width = u16::try_from(max_x - min_x + 1).unwrap_or(0);
    let height = u16::try_from(max_y - min_y + 1).unwrap_or(0);
    (min_x, min_y, width, height)
}

impl<'a> PieceDisplay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            piece: None,
            theme,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let empty = CellDisplay::from_kind(CellKind::Empty, self.theme, false);
        Widget::render(&empty, area, buf);

        let Some(piece) = self.piece else {
            return;
        };
        let (min_x, min_y, width, height) = spawn_bounds(piece);
        let piece_area = area.centered(
            Constraint::Length(width * CellDisplay::width()),
            Constraint::Length(height * CellDisplay::height()),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal))
            .collect::<Vec<_>>();

        let filled = CellDisplay::from_kind(CellKind::Filled(piece), self.theme, false);
        for &(dx, dy) in piece.offsets(0) {
            let (Ok(x), Ok(y)) = (usize::try_from(dx - min_x), usize::try_from(dy - min_y)) else {
                continue;
            };
            if let Some(cell) = grid.get(y).and_then(|row| row.get(x)) {
                Widget::render(&filled, *cell, buf);
            }
        }
    }
}
