//! Terminal rendering configuration

use checkers_core::{Board, Color, Piece, Tile, BOARD_SIZE};

/// Rendering settings: board glyphs and decoration
#[derive(Clone, Debug)]
pub struct Settings {
    pub red_man: char,
    pub red_king: char,
    pub black_man: char,
    pub black_king: char,
    pub dark_square: char,
    pub light_square: char,
    pub show_coordinates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            red_man: 'r',
            red_king: 'R',
            black_man: 'b',
            black_king: 'B',
            dark_square: '.',
            light_square: ' ',
            show_coordinates: true,
        }
    }
}

/// Render the board with the given settings
pub fn render(board: &Board, settings: &Settings) -> String {
    let mut out = String::new();
    if settings.show_coordinates {
        out.push_str("   0 1 2 3 4 5 6 7\n");
    }
    for row in 0..BOARD_SIZE {
        if settings.show_coordinates {
            out.push_str(&format!("{row}  "));
        }
        for col in 0..BOARD_SIZE {
            let tile = Tile::new(row, col);
            let glyph = match board.piece_at(tile) {
                Some(Piece { color: Color::Red, king: false }) => settings.red_man,
                Some(Piece { color: Color::Red, king: true }) => settings.red_king,
                Some(Piece { color: Color::Black, king: false }) => settings.black_man,
                Some(Piece { color: Color::Black, king: true }) => settings.black_king,
                None if tile.is_playable() => settings.dark_square,
                None => settings.light_square,
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}
