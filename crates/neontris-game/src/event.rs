/// Something a collaborator (audio, effects) may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    /// A hard drop locked the piece.
    PieceDropped,
    /// A lock cleared this many lines.
    LinesCleared(usize),
    GameOver,
}

/// Receives the events a session buffered since the last dispatch.
pub trait EventSubscriber {
    fn on_event(&mut self, event: GameEvent);
}

impl EventSubscriber for Vec<GameEvent> {
    fn on_event(&mut self, event: GameEvent) {
        self.push(event);
    }
}
