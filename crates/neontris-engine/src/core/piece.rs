use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::InvalidMove;

use super::{SPAWN_COLUMN, SPAWN_ROW, board::Board};

/// A falling piece: its kind, rotation state and the origin of its bounding box.
///
/// Pieces are immutable values. Movement and rotation return a new `Piece`, so a
/// rejected move never disturbs the piece the caller already holds.
///
/// # Coordinate System
///
/// - `column`/`row` locate the top-left corner of the 3×3 (or 4×4) bounding box
/// - the origin may lie outside the board as long as every occupied cell is inside
/// - rows grow downward, row 0 is the top of the board
///
/// # Example
///
/// ```
/// use neontris_engine::{Board, Piece, PieceKind, RotationDirection};
///
/// let board = Board::new();
/// let piece = Piece::spawn(PieceKind::T);
/// let moved = piece.moved(1, 0, &board).unwrap();
/// let rotated = moved.rotated(RotationDirection::Clockwise, &board).unwrap();
/// assert_eq!(rotated.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: u8,
    column: i32,
    row: i32,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation,
            self.column,
            self.row
        )
    }
}

/// Horizontal offsets tried, in order, when a rotation collides.
const WALL_KICKS: [i32; 5] = [0, 1, -1, 2, -2];

impl Piece {
    /// Creates a piece of `kind` at the spawn origin in its spawn orientation.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            column: SPAWN_COLUMN,
            row: SPAWN_ROW,
        }
    }

    /// Creates a piece at an arbitrary origin. `rotation` wraps around the kind's
    /// number of rotation states.
    #[must_use]
    pub const fn new(kind: PieceKind, rotation: u8, column: i32, row: i32) -> Self {
        Self {
            kind,
            rotation: rotation % kind.rotation_count(),
            column,
            row,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Board coordinates `(column, row)` of the four occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .offsets(self.rotation)
            .iter()
            .map(move |&(dx, dy)| (self.column + i32::from(dx), self.row + i32::from(dy)))
    }

    /// Returns the piece translated by `(dx, dy)` without checking the board.
    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            column: self.column + dx,
            row: self.row + dy,
            ..self
        }
    }

    /// Translates the piece by `(dx, dy)` if the target position is free.
    pub fn moved(self, dx: i32, dy: i32, board: &Board) -> Result<Self, InvalidMove> {
        let piece = self.shifted(dx, dy);
        if board.can_place(piece) {
            Ok(piece)
        } else {
            Err(InvalidMove)
        }
    }

    /// Rotates the piece one step in `direction`.
    ///
    /// When the plain rotation collides, the rotated piece is nudged sideways by
    /// +1, -1, +2 and -2 columns and the first free position wins. The O piece has a
    /// single orientation, so rotating it always succeeds and returns it unchanged.
    pub fn rotated(self, direction: RotationDirection, board: &Board) -> Result<Self, InvalidMove> {
        let count = self.kind.rotation_count();
        if count == 1 {
            return Ok(self);
        }
        let rotation = match direction {
            RotationDirection::Clockwise => (self.rotation + 1) % count,
            RotationDirection::CounterClockwise => (self.rotation + count - 1) % count,
        };
        let rotated = Self { rotation, ..self };
        WALL_KICKS
            .iter()
            .map(|&dx| rotated.shifted(dx, 0))
            .find(|piece| board.can_place(*piece))
            .ok_or(InvalidMove)
    }
}

/// Direction of a single rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// The seven piece kinds.
///
/// Besides identifying the shape, the kind is the color tag stored in filled board
/// cells; the theme layer maps it to an actual color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// Every kind, in declaration order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// Number of distinct rotation states. The O piece has one, every other kind four.
    #[must_use]
    pub const fn rotation_count(self) -> u8 {
        match self {
            PieceKind::O => 1,
            _ => 4,
        }
    }

    /// Occupied `(dx, dy)` offsets of the given rotation state, relative to the origin.
    #[must_use]
    pub const fn offsets(self, rotation: u8) -> &'static CellOffsets {
        &ROTATION_STATES[self as usize][(rotation % self.rotation_count()) as usize]
    }

    /// Smallest and largest `dx` among the occupied cells of a rotation state.
    #[must_use]
    pub fn column_extent(self, rotation: u8) -> (i32, i32) {
        let offsets = self.offsets(rotation);
        let min = offsets.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
        let max = offsets.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
        (i32::from(min), i32::from(max))
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use neontris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// The four occupied cells of one rotation state, as `(dx, dy)` from the origin.
pub type CellOffsets = [(i8, i8); 4];

type ShapeGrid = [[bool; 4]; 4];

/// Generates the four rotation states of a shape by rotating it 90° clockwise inside
/// its `size`×`size` bounding box, then lists the occupied cells row by row.
#[expect(clippy::cast_possible_truncation)]
const fn rotation_states(size: usize, shape: ShapeGrid) -> [CellOffsets; 4] {
    let mut grids = [shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut grid = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                grid[y][x] = grids[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        grids[i] = grid;
        i += 1;
    }

    let mut states = [[(0, 0); 4]; 4];
    let mut r = 0;
    while r < 4 {
        let mut n = 0;
        let mut y = 0;
        while y < 4 {
            let mut x = 0;
            while x < 4 {
                if grids[r][y][x] {
                    states[r][n] = (x as i8, y as i8);
                    n += 1;
                }
                x += 1;
            }
            y += 1;
        }
        assert!(n == 4, "every piece occupies four cells");
        r += 1;
    }
    states
}

const ROTATION_STATES: [[CellOffsets; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        rotation_states(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece, centred in a 4-wide box; only state 0 is used
        rotation_states(4, [[E, C, C, E], [E, C, C, E], EEEE, EEEE]),
        // T-piece
        rotation_states(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // S-piece
        rotation_states(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        rotation_states(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        rotation_states(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        rotation_states(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_cells(piece: Piece) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = piece.cells().collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_spawn_cells() {
        assert_eq!(
            sorted_cells(Piece::spawn(PieceKind::I)),
            vec![(3, 1), (4, 1), (5, 1), (6, 1)]
        );
        assert_eq!(
            sorted_cells(Piece::spawn(PieceKind::O)),
            vec![(4, 0), (4, 1), (5, 0), (5, 1)]
        );
        assert_eq!(
            sorted_cells(Piece::spawn(PieceKind::T)),
            vec![(3, 1), (4, 0), (4, 1), (5, 1)]
        );
    }

    #[test]
    fn test_rotation_tables() {
        // Vertical I occupies the third column of its box.
        assert_eq!(
            PieceKind::I.offsets(1),
            &[(2, 0), (2, 1), (2, 2), (2, 3)]
        );
        // T pointing right.
        assert_eq!(PieceKind::T.offsets(1), &[(1, 0), (1, 1), (2, 1), (1, 2)]);
        // Half a turn of S inside its 3×3 box is the spawn state one row lower.
        let spawn = PieceKind::S.offsets(0);
        let flipped = PieceKind::S.offsets(2);
        for (&(x0, y0), &(x2, y2)) in spawn.iter().zip(flipped) {
            assert_eq!((x0, y0 + 1), (x2, y2));
        }
        assert_eq!(PieceKind::O.rotation_count(), 1);
        assert_eq!(PieceKind::O.offsets(3), PieceKind::O.offsets(0));
    }

    #[test]
    fn test_column_extent() {
        assert_eq!(PieceKind::I.column_extent(0), (0, 3));
        assert_eq!(PieceKind::I.column_extent(1), (2, 2));
        assert_eq!(PieceKind::O.column_extent(0), (1, 2));
        assert_eq!(PieceKind::J.column_extent(3), (0, 1));
    }

    #[test]
    fn test_moved_rejects_walls() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::T, 0, 0, 5);
        assert_eq!(piece.moved(-1, 0, &board), Err(InvalidMove));
        assert_eq!(piece.moved(1, 0, &board), Ok(piece.shifted(1, 0)));
        let bottom = Piece::new(PieceKind::T, 0, 3, 18);
        assert_eq!(bottom.moved(0, 1, &board), Err(InvalidMove));
    }

    #[test]
    fn test_rotation_is_pure() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::S).shifted(0, 5);
        let rotated = piece.rotated(RotationDirection::Clockwise, &board).unwrap();
        assert_eq!(piece.rotation(), 0);
        assert_eq!(rotated.rotation(), 1);
        let back = rotated
            .rotated(RotationDirection::CounterClockwise, &board)
            .unwrap();
        assert_eq!(back, piece);
    }

    #[test]
    fn test_rotation_kicks_off_the_wall() {
        let board = Board::new();
        // Vertical I hugging the left wall: origin column -2 puts its cells in column 0.
        let piece = Piece::new(PieceKind::I, 1, -2, 5);
        assert!(board.can_place(piece));
        let rotated = piece.rotated(RotationDirection::Clockwise, &board).unwrap();
        assert_eq!(rotated.rotation(), 2);
        // +1 and -1 still leave a cell off the board, +2 fits.
        assert_eq!(rotated.column(), 0);
        assert!(board.can_place(rotated));
    }

    #[test]
    fn test_rotation_rejected_when_every_kick_collides() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ####.#####
            ####.#####
            ####.#####
            ####.#####
            ",
        );
        // Vertical I standing in the one-wide well.
        let piece = Piece::new(PieceKind::I, 1, 2, 16);
        assert!(board.can_place(piece));
        assert_eq!(
            piece.rotated(RotationDirection::Clockwise, &board),
            Err(InvalidMove)
        );
        assert_eq!(
            piece.rotated(RotationDirection::CounterClockwise, &board),
            Err(InvalidMove)
        );
    }

    #[test]
    fn test_o_rotation_is_identity() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::O);
        assert_eq!(
            piece.rotated(RotationDirection::Clockwise, &board),
            Ok(piece)
        );
    }

    #[test]
    fn test_piece_display() {
        let piece = Piece::new(PieceKind::S, 1, 4, 18);
        assert_eq!(piece.to_string(), "S#1@4,18");
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('t'), None);
    }
}
