//! Checkers core - rule engine and AI
//!
//! This crate provides the full checkers (draughts) game logic:
//! - Tile geometry (8x8 grid, diagonal arithmetic)
//! - Board rule state machine (mandatory capture, jump chains, promotion,
//!   win detection) with a strict apply/undo log
//! - Legal move generation including recursive jump-chain discovery
//! - Position evaluation and exhaustive minimax search

pub mod ai;
pub mod board;
pub mod eval;
pub mod movegen;
pub mod tile;

// Re-exports for convenient access
pub use ai::{MinimaxAi, DEFAULT_DEPTH};
pub use board::{Board, Color, MoveKind, MoveRecord, Piece};
pub use eval::{evaluate, Weights};
pub use movegen::{legal_moves, Move, ParseMoveError};
pub use tile::{ParseTileError, Tile, BOARD_SIZE};
