//! Move advisor: recommends where to drop the current piece.
//!
//! The advisor works in three steps:
//!
//! 1. [`enumerate_placements`] lists every rotation × column the piece can be dropped
//!    from, straight down from the spawn row.
//! 2. Each resulting board is wrapped in a [`BoardAnalysis`], which computes aggregate
//!    height, complete lines, holes and bumpiness on demand.
//! 3. A [`PlacementEvaluator`] (by default the [`HeuristicEvaluator`]) scores every
//!    board and [`Advisor::best_move`] keeps the best one.
//!
//! Everything here works on [`BoardSnapshot`](neontris_engine::BoardSnapshot)s and
//! never mutates the live board.
//!
//! # Example
//!
//! ```
//! use neontris_advisor::Advisor;
//! use neontris_engine::{Board, PieceKind};
//!
//! let board = Board::from_ascii("#########.");
//! let advice = Advisor::default().advise(PieceKind::I, &board.snapshot()).unwrap();
//! assert_eq!(advice.rotation() % 2, 1);
//! ```

pub use self::{advisor::*, board_analysis::*, heuristic::*, placement::*};

mod advisor;
mod board_analysis;
mod heuristic;
mod placement;
