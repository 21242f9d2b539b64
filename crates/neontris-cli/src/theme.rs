use neontris_engine::PieceKind;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeName {
    #[default]
    #[display("Neon")]
    Neon,
    #[display("Dark")]
    Dark,
    #[display("Retro")]
    Retro,
}

/// Colors used to draw one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    pub background: Color,
    pub grid: Color,
    pub border: Color,
    pub text: Color,
    /// Indexed by `PieceKind as usize`.
    pieces: [Color; PieceKind::LEN],
}

const fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Piece colors in `PieceKind::ALL` order: I, O, T, S, Z, J, L.
const fn pieces(colors: [(u8, u8, u8); PieceKind::LEN]) -> [Color; PieceKind::LEN] {
    let mut out = [Color::Reset; PieceKind::LEN];
    let mut i = 0;
    while i < PieceKind::LEN {
        out[i] = rgb(colors[i]);
        i += 1;
    }
    out
}

pub const THEMES: [Theme; 3] = [
    Theme {
        name: ThemeName::Neon,
        background: rgb((0, 0, 30)),
        grid: rgb((20, 20, 60)),
        border: rgb((0, 200, 255)),
        text: rgb((0, 255, 255)),
        pieces: pieces([
            (0, 255, 255),
            (255, 255, 0),
            (200, 50, 255),
            (50, 255, 50),
            (255, 50, 50),
            (50, 150, 255),
            (255, 165, 0),
        ]),
    },
    Theme {
        name: ThemeName::Dark,
        background: rgb((20, 20, 20)),
        grid: rgb((40, 40, 40)),
        border: rgb((100, 100, 100)),
        text: rgb((200, 200, 200)),
        pieces: pieces([
            (0, 180, 180),
            (180, 180, 0),
            (100, 0, 100),
            (0, 180, 0),
            (180, 0, 0),
            (0, 0, 180),
            (180, 100, 0),
        ]),
    },
    Theme {
        name: ThemeName::Retro,
        background: rgb((0, 0, 0)),
        grid: rgb((30, 30, 30)),
        border: rgb((255, 255, 255)),
        text: rgb((255, 255, 255)),
        pieces: pieces([
            (170, 170, 170),
            (255, 255, 100),
            (255, 100, 255),
            (100, 255, 100),
            (255, 170, 100),
            (100, 100, 255),
            (255, 100, 100),
        ]),
    },
];

impl Theme {
    /// Theme reached after `switches` theme changes starting from `initial`.
    pub fn cycled(initial: ThemeName, switches: usize) -> &'static Theme {
        &THEMES[(initial as usize + switches % THEMES.len()) % THEMES.len()]
    }

    pub fn piece_color(&self, kind: PieceKind) -> Color {
        self.pieces[kind as usize]
    }
}
