use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use neontris_game::Intent;

pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

pub const PLAYING_BINDINGS: &[KeyBinding<'static>] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["Space"], "Hard Drop"),
    (&["↑", "X"], "Rotate"),
    (&["Z"], "Rotate Back"),
    (&["A"], "Advisor"),
    (&["G"], "Ghost"),
    (&["T"], "Theme"),
    (&["P", "Esc"], "Pause"),
    (&["Q"], "Quit"),
];

pub const PAUSED_BINDINGS: &[KeyBinding<'static>] = &[
    (&["P", "Esc"], "Resume"),
    (&["A"], "Advisor"),
    (&["G"], "Ghost"),
    (&["T"], "Theme"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];

pub const GAME_OVER_BINDINGS: &[KeyBinding<'static>] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

/// Maps a key press to the intent it stands for. Releases and repeats of
/// non-movement keys are ignored.
pub fn intent_for_key(key: KeyEvent) -> Option<Intent> {
    let intent = match key.code {
        KeyCode::Left => Intent::MoveLeft,
        KeyCode::Right => Intent::MoveRight,
        KeyCode::Down => Intent::SoftDrop,
        KeyCode::Char(' ') => Intent::HardDrop,
        KeyCode::Up => Intent::RotateCw,
        KeyCode::Esc => Intent::Pause,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'x' => Intent::RotateCw,
            'z' => Intent::RotateCcw,
            'a' => Intent::ToggleAdvisor,
            'g' => Intent::ToggleGhost,
            'p' => Intent::Pause,
            'r' => Intent::Restart,
            't' => Intent::ChangeTheme,
            'q' => Intent::Quit,
            _ => return None,
        },
        _ => return None,
    };
    let accepted = match key.kind {
        KeyEventKind::Press => true,
        KeyEventKind::Repeat => is_repeatable(intent),
        KeyEventKind::Release => false,
    };
    accepted.then_some(intent)
}

fn is_repeatable(intent: Intent) -> bool {
    matches!(
        intent,
        Intent::MoveLeft | Intent::MoveRight | Intent::SoftDrop
    )
}
