use std::iter;

use neontris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Piece, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::{
    theme::Theme,
    ui::widgets::{CellDisplay, CellKind},
};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    theme: &'a Theme,
    advice: Option<Piece>,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board, theme: &'a Theme) -> Self {
        Self {
            board,
            theme,
            advice: None,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn advice(self, piece: Option<Piece>) -> Self {
        Self {
            advice: piece,
            ..self
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Board contents with the overlays applied. Overlays never cover locked blocks.
    fn cells(&self) -> [[CellKind; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut cells = [[CellKind::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        for (cell_row, row) in iter::zip(&mut cells, self.board.rows()) {
            for (cell, block) in iter::zip(cell_row, row) {
                if let Some(kind) = block.kind() {
                    *cell = CellKind::Filled(kind);
                }
            }
        }

        let overlays: [(Option<Piece>, fn(PieceKind) -> CellKind); 3] = [
            (self.advice, CellKind::Advice),
            (self.ghost, CellKind::Ghost),
            (self.falling_piece, CellKind::Filled),
        ];
        for (piece, make) in overlays {
            let Some(piece) = piece else { continue };
            for (column, row) in piece.cells() {
                let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row)) else {
                    continue;
                };
                if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(column))
                    && !matches!(cell, CellKind::Filled(_))
                {
                    *cell = make(piece.kind());
                }
            }
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cells()) {
            for (grid_cell, kind) in iter::zip(grid_row, row) {
                CellDisplay::from_kind(kind, self.theme, true).render(grid_cell, buf);
            }
        }
    }
}
