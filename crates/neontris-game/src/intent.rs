/// A player request, decoupled from the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    HardDrop,
    ToggleAdvisor,
    ToggleGhost,
    Pause,
    Restart,
    Quit,
    ChangeTheme,
}
