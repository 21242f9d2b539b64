//! Gameplay on top of the core data structures.
//!
//! - [`GameField`] - the board, the falling piece and the upcoming sequence
//! - [`GameStats`] - score, level and line counters
//! - [`PieceGenerator`] - seeded 7-bag or uniform piece sequence
//! - [`PieceSeed`] - 128-bit seed for reproducible sequences
//!
//! # Example
//!
//! ```
//! use neontris_engine::{GameField, GameStats, PieceGenerator, Randomizer};
//!
//! let mut field = GameField::new(PieceGenerator::new(Randomizer::SevenBag));
//! let mut stats = GameStats::new();
//!
//! field.try_move(-1, 0).ok();
//! let drop = field.hard_drop(stats.level());
//! stats.record_lock(&drop.lock);
//!
//! assert_eq!(stats.completed_pieces(), 1);
//! ```

pub use self::{game_field::*, game_stats::*, piece_generator::*};

mod game_field;
mod game_stats;
mod piece_generator;
