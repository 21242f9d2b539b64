use crate::LockResult;

/// Score, level and line bookkeeping for one game.
///
/// The level starts at 1 and goes up every ten cleared lines. Score deltas come from
/// the board's reward table, which already applies the level multiplier.
///
/// # Example
///
/// ```
/// use neontris_engine::{Board, GameStats, Piece, PieceKind};
///
/// let mut board = Board::from_ascii("#########.");
/// let mut stats = GameStats::new();
/// let piece = board.drop_position(Piece::new(PieceKind::I, 1, 7, 0));
/// stats.record_lock(&board.lock_piece(piece, stats.level()));
///
/// assert_eq!(stats.score(), 100);
/// assert_eq!(stats.total_cleared_lines(), 1);
/// assert_eq!(stats.line_cleared_counter()[1], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level: `1 + lines / 10`.
    #[must_use]
    pub const fn level(&self) -> usize {
        1 + self.total_cleared_lines / 10
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Number of locks that cleared 0, 1, 2, 3 and 4 lines.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Folds one lock into the totals.
    pub fn record_lock(&mut self, result: &LockResult) {
        let lines = result.lines_cleared();
        self.completed_pieces += 1;
        self.total_cleared_lines += lines;
        self.score += result.score_delta;
        if let Some(count) = self.line_cleared_counter.get_mut(lines) {
            *count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ClearedRows;

    use super::*;

    fn lock(lines: usize, score_delta: usize) -> LockResult {
        LockResult {
            rows_cleared: (20 - lines..20).collect::<ClearedRows>(),
            score_delta,
            topped_out: false,
        }
    }

    #[test]
    fn test_level_rises_every_ten_lines() {
        let mut stats = GameStats::new();
        assert_eq!(stats.level(), 1);
        for _ in 0..2 {
            stats.record_lock(&lock(4, 800));
        }
        assert_eq!(stats.level(), 1);
        stats.record_lock(&lock(2, 300));
        assert_eq!(stats.total_cleared_lines(), 10);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_counters() {
        let mut stats = GameStats::new();
        stats.record_lock(&lock(0, 0));
        stats.record_lock(&lock(1, 100));
        stats.record_lock(&lock(3, 500));
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.score(), 600);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 0, 1, 0]);
    }
}
