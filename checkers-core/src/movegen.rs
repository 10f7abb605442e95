//! Move representation and legal-move enumeration
//!
//! The generator scans the board row-major and asks [`Board::classify_move`]
//! about every candidate step; it never re-decides mandatory capture itself.
//! Jump chains are discovered recursively through speculative
//! [`Board::trial_step`] relocations.

use crate::board::{Board, MoveKind};
use crate::tile::{ParseTileError, Tile, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// MOVE
// ============================================================================

/// One full turn: a single step, or a jump chain start -> jump -> jump -> ...
///
/// Equality is sequence equality; `inverse` walks the same squares backwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    path: Vec<Tile>,
}

impl Move {
    /// Panics when given fewer than two tiles
    pub fn new(path: Vec<Tile>) -> Self {
        if path.len() < 2 {
            panic!("a move needs at least two tiles");
        }
        Self { path }
    }

    pub fn path(&self) -> &[Tile] {
        &self.path
    }

    pub fn start(&self) -> Tile {
        self.path[0]
    }

    pub fn end(&self) -> Tile {
        self.path[self.path.len() - 1]
    }

    pub fn is_jump(&self) -> bool {
        self.path[0].distance_from(self.path[1]) == 2
    }

    /// The same squares walked backwards
    pub fn inverse(&self) -> Move {
        let mut path = self.path.clone();
        path.reverse();
        Move { path }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tile) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "->")?;
            }
            write!(f, "{},{}", tile.row, tile.col)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error(transparent)]
    Tile(#[from] ParseTileError),
    #[error("a move needs at least two tiles")]
    TooShort,
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Parses the arrow notation printed by `Display`, e.g. `2,1->3,0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s
            .split("->")
            .map(|part| part.parse::<Tile>())
            .collect::<Result<Vec<_>, _>>()?;
        if path.len() < 2 {
            return Err(ParseMoveError::TooShort);
        }
        Ok(Move { path })
    }
}

// ============================================================================
// MOVE GENERATION
// ============================================================================

/// All legal moves for the side to move, in row-major scan order.
///
/// Jumps come before normal steps for each piece; when `must_jump` holds the
/// board rejects normals anyway, so only complete jump chains come back.
pub fn legal_moves(board: &mut Board) -> Vec<Move> {
    let mut moves = Vec::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let tile = Tile::new(row, col);
            if !tile.is_playable() {
                continue;
            }
            if board.piece_at(tile).is_some_and(|p| p.color == board.turn()) {
                moves.extend(moves_from(board, tile, false, &[]));
            }
        }
    }
    moves
}

/// Moves available from `start`, recursing into jump continuations.
///
/// `chain` holds the steps already taken in the current jump chain; a
/// candidate equal to one of them, or to one of their reversals, is skipped
/// so a king cannot bounce between two squares or retrace the chain (the
/// jumped-over pieces are still on the board during discovery).
fn moves_from(board: &mut Board, start: Tile, only_jumps: bool, chain: &[(Tile, Tile)]) -> Vec<Move> {
    let mut found = Vec::new();
    let mut candidates: Vec<Tile> = start.diagonal_neighbors(2).collect();
    if !only_jumps {
        candidates.extend(start.diagonal_neighbors(1));
    }

    for end in candidates {
        if chain
            .iter()
            .any(|&(s, e)| (s, e) == (start, end) || (s, e) == (end, start))
        {
            continue;
        }
        match board.classify_move(start, end) {
            MoveKind::Invalid => {}
            MoveKind::Normal => found.push(Move::new(vec![start, end])),
            MoveKind::Jump => {
                let mut deeper = chain.to_vec();
                deeper.push((start, end));
                let continuations =
                    board.trial_step(start, end, |b| moves_from(b, end, true, &deeper));
                if continuations.is_empty() {
                    found.push(Move::new(vec![start, end]));
                } else {
                    for tail in continuations {
                        let mut path = vec![start];
                        path.extend_from_slice(tail.path());
                        found.push(Move::new(path));
                    }
                }
            }
        }
    }
    found
}

// ============================================================================
// TESTS
// ============================================================================
