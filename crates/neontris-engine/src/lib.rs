//! Board simulation for neontris.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - plain data: the cell grid ([`Board`]), immutable pieces ([`Piece`]) and
//!   their precomputed rotation tables.
//! - [`engine`] - gameplay built on top of the data: the seeded piece sequence
//!   ([`PieceGenerator`]), the playing field with its falling piece ([`GameField`]) and
//!   score bookkeeping ([`GameStats`]).
//!
//! Nothing in this crate knows about time, input or rendering; callers drive it.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A move or rotation that would put the piece out of bounds or onto a filled cell.
///
/// The piece that was asked to move is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece cannot move there")]
pub struct InvalidMove;
