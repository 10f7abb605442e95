//! Exhaustive minimax search over reversible board mutations
//!
//! No pruning: the tree is walked in full to the configured depth. Each ply
//! is applied to the live board, recursed into, then strictly undone through
//! the board's undo log. With the `parallel` feature the root ply fans out
//! over rayon, one deep board copy per root move; everything below the root
//! stays sequential because the do/undo discipline cannot be shared across
//! workers.

use crate::board::{Board, Color};
use crate::eval::{evaluate, Weights};
use crate::movegen::{legal_moves, Move};
use tracing::debug;

/// Default search depth in plies
pub const DEFAULT_DEPTH: u32 = 4;

/// Minimax player for one side
pub struct MinimaxAi {
    color: Color,
    depth: u32,
    weights: Weights,
    /// Last move this instance actually played, for the oscillation guard
    last_move: Option<Move>,
}

impl MinimaxAi {
    pub fn new(color: Color, depth: u32) -> Self {
        Self::with_weights(color, depth, Weights::default())
    }

    pub fn with_weights(color: Color, depth: u32, weights: Weights) -> Self {
        Self {
            color,
            depth,
            weights,
            last_move: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    /// Pick the best move, apply it to the board and remember it.
    /// Returns `None` when the side to move has no legal moves.
    pub fn next_move(&mut self, board: &mut Board) -> Option<Move> {
        let mv = self.best_move(board)?;
        board.apply_move(&mv);
        self.last_move = Some(mv.clone());
        Some(mv)
    }

    /// Best move for the side to move, without applying it.
    ///
    /// Red maximizes the evaluation, black minimizes it; ties keep the first
    /// candidate in row-major generation order.
    pub fn best_move(&self, board: &mut Board) -> Option<Move> {
        let moves = legal_moves(board);
        if moves.is_empty() {
            return None;
        }
        let scored = self.score_root(board, &moves);
        let (value, mv) = pick(board.turn(), scored)?;
        debug!(%mv, value, depth = self.depth, "search complete");
        Some(mv)
    }

    #[cfg(not(feature = "parallel"))]
    fn score_root(&self, board: &mut Board, moves: &[Move]) -> Vec<(f32, Move)> {
        moves
            .iter()
            .filter_map(|mv| {
                self.score_move(board, mv, 1, moves.len())
                    .map(|value| (value, mv.clone()))
            })
            .collect()
    }

    /// Root-ply fan-out: each immediate child gets an independent deep copy
    /// of the board, so no board is ever mutated by two workers. Results are
    /// collected in generation order before selection.
    #[cfg(feature = "parallel")]
    fn score_root(&self, board: &mut Board, moves: &[Move]) -> Vec<(f32, Move)> {
        use rayon::prelude::*;

        let board = &*board;
        moves
            .par_iter()
            .filter_map(|mv| {
                let mut copy = board.clone();
                self.score_move(&mut copy, mv, 1, moves.len())
                    .map(|value| (value, mv.clone()))
            })
            .collect()
    }

    /// Score one candidate by do / recurse / undo. `None` means the
    /// repetition guard skipped it.
    fn score_move(&self, board: &mut Board, mv: &Move, depth: u32, siblings: usize) -> Option<f32> {
        if let Some(last) = &self.last_move {
            if *mv == last.inverse() {
                // Oscillation damper: alone, the take-back move scores
                // neutral without a search; otherwise it drops out entirely.
                if siblings == 1 {
                    return Some(0.0);
                }
                return None;
            }
        }
        let record = board.apply_move(mv);
        let value = self.evaluate_tree(board, depth + 1);
        board.undo_move(record);
        Some(value)
    }

    /// Depth-first minimax walk. Leaf when the depth budget runs out or the
    /// side to move has nothing to play.
    fn evaluate_tree(&self, board: &mut Board, depth: u32) -> f32 {
        if depth > self.depth {
            return evaluate(board, &self.weights);
        }
        let moves = legal_moves(board);
        if moves.is_empty() {
            return evaluate(board, &self.weights);
        }

        let turn = board.turn();
        let mut best: Option<f32> = None;
        for mv in &moves {
            let Some(value) = self.score_move(board, mv, depth, moves.len()) else {
                continue;
            };
            best = Some(match best {
                None => value,
                Some(b) => {
                    let better = match turn {
                        Color::Red => value > b,
                        Color::Black => value < b,
                    };
                    if better {
                        value
                    } else {
                        b
                    }
                }
            });
        }
        best.unwrap_or_else(|| evaluate(board, &self.weights))
    }
}

/// First strictly-better candidate wins; order is generation order
fn pick(turn: Color, scored: Vec<(f32, Move)>) -> Option<(f32, Move)> {
    let mut best: Option<(f32, Move)> = None;
    for (value, mv) in scored {
        let better = match &best {
            None => true,
            Some((best_value, _)) => match turn {
                Color::Red => value > *best_value,
                Color::Black => value < *best_value,
            },
        };
        if better {
            best = Some((value, mv));
        }
    }
    best
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;
    use crate::tile::Tile;

    #[test]
    fn test_equal_moves_take_leftmost() {
        // Only a certainty at depth 1
        let mut b = Board::new();
        b.move_piece(Tile::new(5, 0), Tile::new(4, 1));
        let mut ai = MinimaxAi::new(Color::Red, 1);
        ai.next_move(&mut b).expect("red has moves");
        assert_eq!(None, b.piece_at(Tile::new(2, 1)));
        assert!(b.piece_at(Tile::new(3, 0)).is_some());
    }

    #[test]
    fn test_ai_plays_forced_chain() {
        let mut b = Board::empty();
        b.set_piece(Tile::new(0, 0), Some(Piece::king(Color::Red)));
        b.set_piece(Tile::new(1, 1), Some(Piece::new(Color::Black)));
        b.set_piece(Tile::new(3, 3), Some(Piece::new(Color::Black)));
        b.set_piece(Tile::new(5, 5), Some(Piece::new(Color::Black)));
        b.set_turn(Color::Red);
        let mut ai = MinimaxAi::new(Color::Red, 2);
        let mv = ai.next_move(&mut b).expect("the chain is forced");
        assert_eq!(
            Move::new(vec![
                Tile::new(0, 0),
                Tile::new(2, 2),
                Tile::new(4, 4),
                Tile::new(6, 6),
            ]),
            mv
        );
        assert_eq!(0, b.black_count());
        assert_eq!(Some(Color::Red), b.winner());
        assert_eq!(Color::Black, b.turn());
    }

    #[test]
    fn test_board_restored_after_search() {
        let mut b = Board::new();
        b.move_piece(Tile::new(5, 0), Tile::new(4, 1));
        let before_grid = format!("{b}");
        let before_turn = b.turn();
        let before_must_jump = b.must_jump();
        let before_counts = (b.red_count(), b.black_count());
        let before_moves = b.move_count();

        let ai = MinimaxAi::new(Color::Red, 4);
        ai.best_move(&mut b).expect("red has moves");

        assert_eq!(before_grid, format!("{b}"));
        assert_eq!(before_turn, b.turn());
        assert_eq!(before_must_jump, b.must_jump());
        assert_eq!(before_counts, (b.red_count(), b.black_count()));
        assert_eq!(before_moves, b.move_count());
    }

    #[test]
    fn test_repetition_guard_skips_take_back() {
        // A lone red king shuffling between two squares: after playing
        // 4,3 -> 3,4 the exact take-back must not be chosen while another
        // candidate exists.
        let mut b = Board::empty();
        b.set_piece(Tile::new(4, 3), Some(Piece::king(Color::Red)));
        b.set_piece(Tile::new(7, 0), Some(Piece::new(Color::Black)));
        b.set_turn(Color::Red);
        let mut ai = MinimaxAi::new(Color::Red, 2);
        let first = ai.next_move(&mut b).expect("king can move");
        let back = first.inverse();

        b.set_turn(Color::Red); // hand the move straight back
        let second = ai.next_move(&mut b).expect("king can still move");
        assert_ne!(back, second);
    }

    #[test]
    fn test_ai_prefers_capture_at_depth_one() {
        let mut b = Board::new();
        b.move_piece(Tile::new(5, 0), Tile::new(4, 1));
        b.move_piece(Tile::new(2, 1), Tile::new(3, 0));
        b.move_piece(Tile::new(5, 2), Tile::new(4, 3));
        // Red is forced into the jump; the AI must produce it
        let mut ai = MinimaxAi::new(Color::Red, 1);
        let mv = ai.next_move(&mut b).expect("forced jump");
        assert_eq!(
            Move::new(vec![Tile::new(3, 0), Tile::new(5, 2)]),
            mv
        );
        assert_eq!(11, b.black_count());
    }

    #[test]
    fn test_no_moves_returns_none() {
        let mut b = Board::empty();
        b.set_piece(Tile::new(0, 1), Some(Piece::new(Color::Red)));
        b.set_turn(Color::Black);
        let mut ai = MinimaxAi::new(Color::Black, 3);
        assert_eq!(None, ai.next_move(&mut b));
    }
}
