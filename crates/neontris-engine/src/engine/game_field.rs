use crate::{
    InvalidMove,
    core::{
        board::{Board, LockResult, StepOutcome},
        piece::{Piece, PieceKind, RotationDirection},
    },
};

use super::piece_generator::{PieceGenerator, PieceSeed};

/// Outcome of a hard drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardDrop {
    /// The piece at the position where it locked.
    pub piece: Piece,
    pub lock: LockResult,
}

/// The board together with the falling piece and the upcoming sequence.
///
/// Every mutation either succeeds or leaves the field untouched. Locking a piece spawns
/// the next one; when that spawn is blocked the lock result reports a top-out.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Piece,
    generator: PieceGenerator,
}

impl GameField {
    #[must_use]
    pub fn new(mut generator: PieceGenerator) -> Self {
        let falling_piece = Piece::spawn(generator.pop_next());
        Self {
            board: Board::new(),
            falling_piece,
            generator,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn generator(&self) -> &PieceGenerator {
        &self.generator
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.generator.next_pieces()
    }

    /// Where the falling piece would land if dropped now.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.board.drop_position(self.falling_piece)
    }

    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), InvalidMove> {
        if !self.board.can_place(piece) {
            return Err(InvalidMove);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<Piece, InvalidMove> {
        let piece = self.falling_piece.moved(dx, dy, &self.board)?;
        self.falling_piece = piece;
        Ok(piece)
    }

    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<Piece, InvalidMove> {
        let piece = self.falling_piece.rotated(direction, &self.board)?;
        self.falling_piece = piece;
        Ok(piece)
    }

    /// Applies one gravity step to the falling piece.
    pub fn step(&mut self, level: usize) -> StepOutcome {
        match self.board.step(self.falling_piece, level) {
            StepOutcome::Moved(piece) => {
                self.falling_piece = piece;
                StepOutcome::Moved(piece)
            }
            StepOutcome::Locked(lock) => StepOutcome::Locked(self.spawn_next(lock)),
        }
    }

    /// Drops the falling piece straight down and locks it.
    pub fn hard_drop(&mut self, level: usize) -> HardDrop {
        let piece = self.ghost_piece();
        let lock = self.board.lock_piece(piece, level);
        HardDrop {
            piece,
            lock: self.spawn_next(lock),
        }
    }

    fn spawn_next(&mut self, mut lock: LockResult) -> LockResult {
        self.falling_piece = Piece::spawn(self.generator.pop_next());
        if !self.board.can_place(self.falling_piece) {
            tracing::debug!(piece = %self.falling_piece, "spawn blocked");
            lock.topped_out = true;
        }
        lock
    }

    /// Clears the board and replays the piece sequence from its seed.
    pub fn restart(&mut self) {
        self.generator.restart();
        *self = Self::new(self.generator.clone());
    }

    /// Clears the board and starts a new piece sequence from `seed`.
    pub fn restart_with_seed(&mut self, seed: PieceSeed) {
        *self = Self::new(PieceGenerator::with_seed(seed, self.generator.randomizer()));
    }
}

#[cfg(test)]
mod tests {
    use crate::Randomizer;

    use super::*;

    fn field() -> GameField {
        GameField::new(PieceGenerator::with_seed(
            PieceSeed::from_bytes([7; 16]),
            Randomizer::SevenBag,
        ))
    }

    #[test]
    fn test_spawn_and_preview() {
        let field = field();
        assert_eq!(field.falling_piece().row(), 0);
        assert_eq!(field.falling_piece().column(), 3);
        assert!(field.next_pieces().count() >= 7);
    }

    #[test]
    fn test_rejected_move_leaves_piece() {
        let mut field = field();
        let before = field.falling_piece();
        while field.try_move(-1, 0).is_ok() {}
        let at_wall = field.falling_piece();
        assert_ne!(at_wall, before);
        assert_eq!(field.try_move(-1, 0), Err(InvalidMove));
        assert_eq!(field.falling_piece(), at_wall);
    }

    #[test]
    fn test_hard_drop_locks_and_spawns() {
        let mut field = field();
        let next = field.next_pieces().next().unwrap();
        let ghost = field.ghost_piece();
        let drop = field.hard_drop(1);
        assert_eq!(drop.piece, ghost);
        assert!(!drop.lock.topped_out);
        assert!(!field.board().is_empty());
        assert_eq!(field.falling_piece(), Piece::spawn(next));
    }

    #[test]
    fn test_gravity_eventually_locks() {
        let mut field = field();
        let mut steps = 0;
        while field.step(1).is_moved() {
            steps += 1;
        }
        assert!(steps >= 17);
        assert!(!field.board().is_empty());
    }

    #[test]
    fn test_stacking_tops_out() {
        let mut field = field();
        let topped_out = (0..100).any(|_| field.hard_drop(1).lock.topped_out);
        assert!(topped_out);
    }

    #[test]
    fn test_restart_replays_sequence() {
        let mut field = field();
        let first = field.falling_piece();
        let preview: Vec<_> = field.next_pieces().take(7).collect();
        field.hard_drop(1);
        field.hard_drop(1);
        field.restart();
        assert!(field.board().is_empty());
        assert_eq!(field.falling_piece(), first);
        assert_eq!(field.next_pieces().take(7).collect::<Vec<_>>(), preview);
    }
}
