use std::cell::OnceCell;

use neontris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board};

/// The four board features the heuristic scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardFeatures {
    /// Sum of all column heights.
    pub aggregate_height: usize,
    /// Rows that are completely filled.
    pub complete_lines: usize,
    /// Empty cells with at least one filled cell above them in the same column.
    pub holes: usize,
    /// Sum of absolute height differences between neighboring columns.
    pub bumpiness: usize,
}

/// Lazily computed features of one board.
///
/// Each feature is computed on first access and cached, so evaluators that only look at
/// a few of them pay for nothing else.
#[derive(Debug)]
pub struct BoardAnalysis<'a> {
    board: &'a Board,
    column_heights: OnceCell<[usize; BOARD_WIDTH]>,
    aggregate_height: OnceCell<usize>,
    complete_lines: OnceCell<usize>,
    holes: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
}

impl<'a> BoardAnalysis<'a> {
    #[must_use]
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            complete_lines: OnceCell::new(),
            holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize; BOARD_WIDTH] {
        self.column_heights.get_or_init(|| self.board.column_heights())
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    #[must_use]
    pub fn complete_lines(&self) -> usize {
        *self
            .complete_lines
            .get_or_init(|| self.board.full_rows().count())
    }

    #[must_use]
    pub fn holes(&self) -> usize {
        *self.holes.get_or_init(|| {
            let heights = self.column_heights();
            (0..BOARD_WIDTH)
                .map(|column| {
                    let top = BOARD_HEIGHT - heights[column];
                    self.board
                        .rows()
                        .skip(top)
                        .filter(|row| row[column].is_empty())
                        .count()
                })
                .sum()
        })
    }

    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }

    #[must_use]
    pub fn features(&self) -> BoardFeatures {
        BoardFeatures {
            aggregate_height: self.aggregate_height(),
            complete_lines: self.complete_lines(),
            holes: self.holes(),
            bumpiness: self.bumpiness(),
        }
    }
}
