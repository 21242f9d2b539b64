use neontris_engine::{BoardSnapshot, Piece, PieceKind};

use crate::{
    BoardAnalysis, BoardFeatures, HeuristicEvaluator, PlacementEvaluator, enumerate_placements,
    placement::Placement,
};

/// A placement together with the features and score of its resulting board.
#[derive(Debug, Clone)]
pub struct MoveCandidate {
    pub placement: Placement,
    pub features: BoardFeatures,
    pub score: f32,
}

/// The move the advisor recommends for the current piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advice {
    /// The piece at its recommended landing position.
    pub piece: Piece,
    pub score: f32,
}

impl Advice {
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

    /// Whether `piece` was placed with the recommended rotation and column.
    #[must_use]
    pub fn is_followed_by(&self, piece: Piece) -> bool {
        piece.kind() == self.piece.kind()
            && piece.rotation() == self.rotation()
            && piece.column() == self.column()
    }
}

/// Ranks every straight-drop placement of a piece with a [`PlacementEvaluator`].
#[derive(Debug)]
pub struct Advisor {
    evaluator: Box<dyn PlacementEvaluator>,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(Box::new(HeuristicEvaluator::default()))
    }
}

impl Advisor {
    #[must_use]
    pub fn new(evaluator: Box<dyn PlacementEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Every placement of `kind` on `board`, scored, in enumeration order.
    #[must_use]
    pub fn candidates(&self, kind: PieceKind, board: &BoardSnapshot) -> Vec<MoveCandidate> {
        enumerate_placements(kind, board)
            .into_iter()
            .map(|placement| {
                let analysis = BoardAnalysis::new(&placement.board);
                let score = self.evaluator.evaluate_placement(&analysis);
                let features = analysis.features();
                MoveCandidate {
                    placement,
                    features,
                    score,
                }
            })
            .collect()
    }

    /// The highest-scoring candidate. Ties go to the one enumerated first.
    ///
    /// Returns `None` when the piece has nowhere to go.
    #[must_use]
    pub fn best_move(&self, kind: PieceKind, board: &BoardSnapshot) -> Option<MoveCandidate> {
        let mut best: Option<MoveCandidate> = None;
        for candidate in self.candidates(kind, board) {
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Recommendation for `kind`, logged at debug level.
    #[must_use]
    pub fn advise(&self, kind: PieceKind, board: &BoardSnapshot) -> Option<Advice> {
        let best = self.best_move(kind, board)?;
        tracing::debug!(
            piece = %best.placement.piece,
            score = best.score,
            features = ?best.features,
            "advice"
        );
        Some(Advice {
            piece: best.placement.piece,
            score: best.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use neontris_engine::Board;

    use super::*;

    #[derive(Debug)]
    struct Constant;

    impl PlacementEvaluator for Constant {
        fn evaluate_placement(&self, _analysis: &BoardAnalysis<'_>) -> f32 {
            1.0
        }
    }

    #[test]
    fn test_fills_the_well() {
        let board = Board::from_ascii(
            "
            #########.
            #########.
            #########.
            #########.
            ",
        )
        .snapshot();
        let best = Advisor::default().best_move(PieceKind::I, &board).unwrap();
        assert_eq!(best.features.complete_lines, 4);
        let cells: Vec<_> = best.placement.piece.cells().collect();
        assert!(cells.iter().all(|&(column, _)| column == 9));
    }

    #[test]
    fn test_single_line_clear_is_found() {
        let board = Board::from_ascii("#########.").snapshot();
        let advice = Advisor::default().advise(PieceKind::I, &board).unwrap();
        let mut filled = (*board).clone();
        let result = filled.lock_piece(advice.piece, 1);
        assert_eq!(result.lines_cleared(), 1);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let board = Board::new().snapshot();
        let advisor = Advisor::new(Box::new(Constant));
        let first = enumerate_placements(PieceKind::T, &board).remove(0);
        let best = advisor.best_move(PieceKind::T, &board).unwrap();
        assert_eq!(best.placement, first);
    }

    #[test]
    fn test_no_candidates_on_full_spawn() {
        let board = Board::from_ascii(&"##########\n".repeat(20)).snapshot();
        assert!(Advisor::default().best_move(PieceKind::O, &board).is_none());
    }

    #[test]
    fn test_evaluation_is_pure() {
        let board = Board::from_ascii(
            "
            ..##......
            #.##.#..##
            ",
        )
        .snapshot();
        let advisor = Advisor::default();
        let a: Vec<_> = advisor
            .candidates(PieceKind::S, &board)
            .iter()
            .map(|c| c.score)
            .collect();
        let b: Vec<_> = advisor
            .candidates(PieceKind::S, &board)
            .iter()
            .map(|c| c.score)
            .collect();
        assert_eq!(a, b);
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 8);
    }

    #[test]
    fn test_advice_match() {
        let advice = Advice {
            piece: Piece::new(PieceKind::T, 2, 4, 17),
            score: 0.0,
        };
        assert!(advice.is_followed_by(Piece::new(PieceKind::T, 2, 4, 3)));
        assert!(!advice.is_followed_by(Piece::new(PieceKind::T, 1, 4, 17)));
        assert!(!advice.is_followed_by(Piece::new(PieceKind::T, 2, 5, 17)));
    }
}
