//! Core data structures: the cell grid and the pieces moving on it.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board. Row 0 is the top row.
pub const BOARD_HEIGHT: usize = 20;

/// Origin column of a freshly spawned piece.
pub const SPAWN_COLUMN: i32 = 3;
/// Origin row of a freshly spawned piece.
pub const SPAWN_ROW: i32 = 0;
