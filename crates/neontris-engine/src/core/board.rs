use arrayvec::ArrayVec;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH, SPAWN_ROW,
    piece::{Piece, PieceKind},
};

/// Points for clearing 0, 1, 2, 3 or 4 lines with one piece, before the level multiplier.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Pre-clear indices of the rows removed by one line clear, ascending.
pub type ClearedRows = ArrayVec<usize, BOARD_HEIGHT>;

/// Points awarded for clearing `lines` rows at once on `level`.
fn line_clear_score(lines: usize, level: usize) -> usize {
    SCORE_TABLE[lines.min(SCORE_TABLE.len() - 1)] * level
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked block, tagged with the kind of the piece it came from.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// The 10×20 grid of locked cells.
///
/// Row 0 is the top of the board. The falling piece is not part of the board; it is
/// merged in only when it locks.
///
/// # Example
///
/// ```
/// use neontris_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::new();
/// let piece = board.drop_position(Piece::spawn(PieceKind::I));
/// let result = board.lock_piece(piece, 1);
///
/// assert!(result.rows_cleared.is_empty());
/// assert_eq!(board.column_heights()[3], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the cell at `(column, row)`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, column: i32, row: i32) -> Option<Cell> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        self.rows.get(row)?.get(column).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows[row].iter().all(|cell| cell.is_filled())
    }

    /// Indices of the rows that are completely filled, top to bottom.
    pub fn full_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..BOARD_HEIGHT).filter(|&row| self.is_row_full(row))
    }

    /// Height of every column: 20 minus the index of its topmost filled cell, 0 if empty.
    #[must_use]
    pub fn column_heights(&self) -> [usize; BOARD_WIDTH] {
        let mut heights = [0; BOARD_WIDTH];
        for (column, height) in heights.iter_mut().enumerate() {
            *height = (0..BOARD_HEIGHT)
                .find(|&row| self.rows[row][column].is_filled())
                .map_or(0, |row| BOARD_HEIGHT - row);
        }
        heights
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }

    /// Whether every occupied cell of `piece` is inside the board and empty.
    #[must_use]
    pub fn can_place(&self, piece: Piece) -> bool {
        piece
            .cells()
            .all(|(column, row)| self.cell(column, row).is_some_and(|cell| cell.is_empty()))
    }

    /// Writes the piece into the grid without clearing lines.
    ///
    /// Cells outside the board are ignored; callers check [`Self::can_place`] first.
    pub fn fill_piece(&mut self, piece: Piece) {
        for (column, row) in piece.cells() {
            if let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row))
                && let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column))
            {
                *cell = Cell::Filled(piece.kind());
            }
        }
    }

    /// Removes every full row and shifts the rows above it down.
    ///
    /// Rows are processed bottom to top and empty rows enter from the top. Returns the
    /// indices the removed rows had before the clear, in ascending order.
    pub fn clear_lines(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        for row in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(row) {
                cleared.push(row);
                continue;
            }
            if !cleared.is_empty() {
                self.rows[row + cleared.len()] = self.rows[row];
            }
        }
        self.rows[..cleared.len()].fill(EMPTY_ROW);
        cleared.reverse();
        cleared
    }

    /// Locks `piece` into the board, clears lines and scores the clear on `level`.
    pub fn lock_piece(&mut self, piece: Piece, level: usize) -> LockResult {
        let topped_out = piece.cells().any(|(_, row)| row <= SPAWN_ROW);
        self.fill_piece(piece);
        let rows_cleared = self.clear_lines();
        let score_delta = line_clear_score(rows_cleared.len(), level);
        tracing::debug!(
            %piece,
            lines = rows_cleared.len(),
            score_delta,
            topped_out,
            "piece locked"
        );
        LockResult {
            rows_cleared,
            score_delta,
            topped_out,
        }
    }

    /// Lowest position `piece` reaches by falling straight down.
    ///
    /// The same drop backs the ghost piece and the placement search.
    #[must_use]
    pub fn drop_position(&self, piece: Piece) -> Piece {
        let mut dropped = piece;
        loop {
            let next = dropped.shifted(0, 1);
            if !self.can_place(next) {
                return dropped;
            }
            dropped = next;
        }
    }

    /// One gravity step: moves `piece` down a row, or locks it where it is.
    pub fn step(&mut self, piece: Piece, level: usize) -> StepOutcome {
        let next = piece.shifted(0, 1);
        if self.can_place(next) {
            StepOutcome::Moved(next)
        } else {
            StepOutcome::Locked(self.lock_piece(piece, level))
        }
    }

    /// Returns an immutable copy of the board.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot(self.clone())
    }

    /// Builds a board from ASCII art, for tests and fixtures.
    ///
    /// `#` marks a filled cell and `.` an empty one; a piece letter (`I`, `O`, ...) fills
    /// the cell with that kind, `#` uses `I`. Blank lines and whitespace are ignored.
    /// Fewer than 20 rows are aligned to the bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly 10 cells or there are more than 20 rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<Cell>> = art
            .lines()
            .map(|line| {
                line.chars()
                    .filter_map(|c| match c {
                        '.' => Some(Cell::Empty),
                        '#' => Some(Cell::Filled(PieceKind::I)),
                        c => PieceKind::from_char(c).map(Cell::Filled),
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "at most {BOARD_HEIGHT} rows, got {}",
            lines.len()
        );

        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - lines.len();
        for (y, cells) in lines.into_iter().enumerate() {
            assert_eq!(
                cells.len(),
                BOARD_WIDTH,
                "each row must have exactly {BOARD_WIDTH} cells, got {} at row {y}",
                cells.len()
            );
            board.rows[top + y].copy_from_slice(&cells);
        }
        board
    }
}

/// Outcome of locking a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockResult {
    /// Pre-clear indices of the cleared rows, ascending.
    pub rows_cleared: ClearedRows,
    /// Points earned by the clear, already multiplied by the level.
    pub score_delta: usize,
    /// A locked cell ended up in the spawn row or above it, or the next piece could
    /// not spawn.
    pub topped_out: bool,
}

impl LockResult {
    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.rows_cleared.len()
    }
}

/// Result of one gravity step.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The piece fell one row; this is its new position.
    Moved(Piece),
    /// The piece could not fall and was locked.
    Locked(LockResult),
}

/// Read-only copy of a [`Board`], handed to the advisor so that search never touches
/// the live grid.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Deref)]
pub struct BoardSnapshot(Board);

impl BoardSnapshot {
    /// A new snapshot with `piece` filled in. Full rows are kept, not cleared.
    #[must_use]
    pub fn with_piece(&self, piece: Piece) -> Self {
        let mut board = self.0.clone();
        board.fill_piece(piece);
        Self(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.column_heights(), [0; BOARD_WIDTH]);
        assert_eq!(board.cell(0, 0), Some(Cell::Empty));
        assert_eq!(board.cell(-1, 0), None);
        assert_eq!(board.cell(0, 20), None);
        assert_eq!(board.cell(10, 0), None);
    }

    #[test]
    fn test_from_ascii_is_bottom_aligned() {
        let board = Board::from_ascii(
            "
            #.........
            ##.......T
            ",
        );
        assert_eq!(board.cell(0, 18), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.cell(1, 19), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.cell(9, 19), Some(Cell::Filled(PieceKind::T)));
        assert_eq!(board.cell(1, 18), Some(Cell::Empty));
        assert_eq!(board.column_heights()[..3], [2, 1, 0]);
    }

    #[test]
    fn test_can_place_checks_bounds_and_cells() {
        let board = Board::from_ascii("####......");
        assert!(board.can_place(Piece::spawn(PieceKind::T)));
        // Origin outside the board is fine while the cells are inside.
        assert!(board.can_place(Piece::new(PieceKind::I, 1, -2, 0)));
        assert!(!board.can_place(Piece::new(PieceKind::I, 1, -3, 0)));
        assert!(!board.can_place(Piece::new(PieceKind::T, 0, 0, 18)));
        assert!(!board.can_place(Piece::new(PieceKind::I, 0, 3, 19)));
    }

    #[test]
    fn test_can_place_matches_cell_lookup_everywhere() {
        let board = Board::from_ascii(
            "
            .....#....
            ..........
            #.......S.
            ###....ZZ#
            ",
        );
        let mut checked = 0;
        for kind in PieceKind::ALL {
            for rotation in 0..kind.rotation_count() {
                for column in -4..12 {
                    for row in -4..22 {
                        let piece = Piece::new(kind, rotation, column, row);
                        let expected = piece.cells().all(|(x, y)| {
                            (0..10).contains(&x)
                                && (0..20).contains(&y)
                                && board.cell(x, y) == Some(Cell::Empty)
                        });
                        assert_eq!(board.can_place(piece), expected, "{piece}");
                        checked += 1;
                    }
                }
            }
        }
        assert_eq!(checked, (6 * 4 + 1) * 16 * 26);
    }

    #[test]
    fn test_drop_position() {
        let board = Board::from_ascii(
            "
            ...#......
            ...#......
            ",
        );
        // T spawn cells: (4,0) (3,1) (4,1) (5,1); column 3 is blocked from row 18.
        let dropped = board.drop_position(Piece::spawn(PieceKind::T));
        assert_eq!(dropped.row(), 16);
        assert_eq!(dropped.column(), 3);
        // Already resting piece stays put.
        assert_eq!(board.drop_position(dropped), dropped);
    }

    #[test]
    fn test_clear_lines_returns_ascending_pre_clear_rows() {
        let mut board = Board::from_ascii(
            "
            #.........
            ##########
            ...#......
            ##########
            ",
        );
        let cleared = board.clear_lines();
        assert_eq!(cleared.as_slice(), &[17, 19]);
        // Remaining rows keep their relative order.
        assert_eq!(board.cell(0, 18), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.cell(3, 19), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.full_rows().count(), 0);
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 2);
    }

    #[test]
    fn test_clear_lines_shifts_rows_above() {
        let mut board = Board::from_ascii(
            "
            .#........
            ..#.......
            ##########
            ##########
            ...#......
            ",
        );
        let cleared = board.clear_lines();
        assert_eq!(cleared.as_slice(), &[17, 18]);
        assert_eq!(board.cell(1, 17), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.cell(2, 18), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.cell(3, 19), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.cell(1, 15), Some(Cell::Empty));
    }

    #[test]
    fn test_vertical_i_clears_single_line() {
        let mut board = Board::from_ascii("#########.");
        let piece = Piece::new(PieceKind::I, 1, 7, 0);
        let dropped = board.drop_position(piece);
        assert_eq!(dropped.row(), 16);

        let result = board.lock_piece(dropped, 1);
        assert_eq!(result.rows_cleared.as_slice(), &[19]);
        assert_eq!(result.score_delta, 100);
        assert!(!result.topped_out);

        // The three remaining I cells shifted down by one.
        for row in 17..20 {
            assert_eq!(board.cell(9, row), Some(Cell::Filled(PieceKind::I)));
        }
        assert_eq!(board.cell(9, 16), Some(Cell::Empty));
        assert_eq!(board.column_heights()[9], 3);
        assert_eq!(board.column_heights()[0], 0);
    }

    #[test]
    fn test_lock_scores_tetris_with_level() {
        let mut board = Board::from_ascii(
            "
            #########.
            #########.
            #########.
            #########.
            ",
        );
        let piece = board.drop_position(Piece::new(PieceKind::I, 1, 7, 0));
        let result = board.lock_piece(piece, 2);
        assert_eq!(result.lines_cleared(), 4);
        assert_eq!(result.score_delta, 1600);
        assert!(board.is_empty());
    }

    #[test]
    fn test_lock_in_spawn_row_tops_out() {
        let mut board = Board::new();
        let result = board.lock_piece(Piece::spawn(PieceKind::O), 1);
        assert!(result.topped_out);

        let mut board = Board::new();
        let result = board.lock_piece(Piece::spawn(PieceKind::O).shifted(0, 1), 1);
        assert!(!result.topped_out);
    }

    #[test]
    fn test_step_moves_then_locks() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::O, 0, 3, 17);
        let StepOutcome::Moved(moved) = board.step(piece, 1) else {
            panic!("piece should fall");
        };
        assert_eq!(moved.row(), 18);
        let outcome = board.step(moved, 1);
        assert!(outcome.is_locked());
        assert_eq!(board.column_heights()[4], 2);
    }

    #[test]
    fn test_snapshot_with_piece_does_not_clear() {
        let board = Board::from_ascii("#########.");
        let snapshot = board.snapshot();
        let piece = board.drop_position(Piece::new(PieceKind::I, 1, 7, 0));
        let filled = snapshot.with_piece(piece);
        assert!(filled.is_row_full(19));
        assert!(!snapshot.is_row_full(19));
        assert!(!board.is_row_full(19));
    }

    #[test]
    fn test_line_clear_score() {
        assert_eq!(line_clear_score(0, 5), 0);
        assert_eq!(line_clear_score(1, 1), 100);
        assert_eq!(line_clear_score(2, 1), 300);
        assert_eq!(line_clear_score(3, 1), 500);
        assert_eq!(line_clear_score(4, 1), 800);
        assert_eq!(line_clear_score(2, 3), 900);
    }
}
