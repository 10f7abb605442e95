//! Position evaluation

use crate::board::{Board, Color};
use crate::tile::{Tile, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Evaluation constants: a midgame pair and an endgame pair.
///
/// Each piece is worth `advance_weight^rows_advanced`, times the king factor
/// for kings, signed by color. The endgame pair kicks in once either side
/// runs low on pieces and rewards kings over territory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Weights {
    /// Per-row multiplier for progress toward the promotion row
    pub advance_weight: f32,
    /// Multiplier for kings
    pub king_factor: f32,
    /// Pair used once either side drops below `endgame_threshold`
    pub endgame_advance_weight: f32,
    pub endgame_king_factor: f32,
    pub endgame_threshold: u8,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            advance_weight: 1.1,
            king_factor: 1.5,
            endgame_advance_weight: 1.05,
            endgame_king_factor: 3.0,
            endgame_threshold: 3,
        }
    }
}

impl Weights {
    /// Load weights from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Signed board score: positive favors red, negative favors black.
/// Zero on an empty board by construction.
pub fn evaluate(board: &Board, weights: &Weights) -> f32 {
    let endgame = board.red_count() < weights.endgame_threshold
        || board.black_count() < weights.endgame_threshold;
    let (advance, king_factor) = if endgame {
        (weights.endgame_advance_weight, weights.endgame_king_factor)
    } else {
        (weights.advance_weight, weights.king_factor)
    };

    let mut score = 0.0;
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let tile = Tile::new(row, col);
            if !tile.is_playable() {
                continue;
            }
            let Some(piece) = board.piece_at(tile) else {
                continue;
            };
            let rows_advanced = match piece.color {
                Color::Red => row,
                Color::Black => BOARD_SIZE - 1 - row,
            };
            let factor = if piece.king { king_factor } else { 1.0 };
            score += piece.color.sign() * advance.powi(rows_advanced as i32) * factor;
        }
    }
    score
}
