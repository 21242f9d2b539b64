use std::ops::RangeInclusive;

use neontris_engine::{BOARD_WIDTH, BoardSnapshot, Piece, PieceKind, SPAWN_ROW};

/// One straight-drop landing of a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The piece at its landing position.
    pub piece: Piece,
    /// The board after the piece is filled in. Full rows are still present.
    pub board: BoardSnapshot,
}

impl Placement {
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.piece.rotation()
    }

    #[must_use]
    pub fn column(&self) -> i32 {
        self.piece.column()
    }

    #[must_use]
    pub fn landing_row(&self) -> i32 {
        self.piece.row()
    }
}

/// Origin columns at which every cell of `kind` in `rotation` is inside the board.
#[must_use]
pub fn origin_columns(kind: PieceKind, rotation: u8) -> RangeInclusive<i32> {
    let (min_dx, max_dx) = kind.column_extent(rotation);
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let width = BOARD_WIDTH as i32;
    -min_dx..=width - 1 - max_dx
}

/// Lists every placement reachable by rotating at the spawn row, shifting sideways and
/// dropping straight down.
///
/// Rotations are visited in table order and, within a rotation, origin columns from
/// left to right. Start positions that collide at the spawn row are skipped.
/// Symmetric orientations may produce identical placements; they are all kept, so the
/// result order is stable for tie-breaking.
///
/// # Example
///
/// ```
/// use neontris_advisor::enumerate_placements;
/// use neontris_engine::{Board, PieceKind};
///
/// let placements = enumerate_placements(PieceKind::O, &Board::new().snapshot());
/// assert_eq!(placements.len(), 9);
/// assert!(placements.iter().all(|p| p.landing_row() == 18));
/// ```
#[must_use]
pub fn enumerate_placements(kind: PieceKind, board: &BoardSnapshot) -> Vec<Placement> {
    (0..kind.rotation_count())
        .flat_map(|rotation| {
            origin_columns(kind, rotation).map(move |column| Piece::new(kind, rotation, column, SPAWN_ROW))
        })
        .filter(|start| board.can_place(*start))
        .map(|start| {
            let piece = board.drop_position(start);
            Placement {
                piece,
                board: board.with_piece(piece),
            }
        })
        .collect()
}
