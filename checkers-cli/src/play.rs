//! Interactive play against the AI
//!
//! The human enters single steps as `row,col row,col`; multi-jump chains are
//! entered one step at a time, exactly like clicking tile by tile. The board
//! keeps the turn until the chain is finished.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use checkers_core::{Board, Color, MinimaxAi, MoveKind, Tile, Weights, DEFAULT_DEPTH};

use crate::settings::{render, Settings};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Red,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Color {
        match side {
            Side::Red => Color::Red,
            Side::Black => Color::Black,
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// AI search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// Side played by the AI
    #[arg(long, value_enum, default_value_t = Side::Red)]
    pub ai_side: Side,

    /// Evaluation weights JSON file
    #[arg(long, value_name = "FILE")]
    pub weights: Option<PathBuf>,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let weights = load_weights(args.weights.as_deref())?;
    let ai_color: Color = args.ai_side.into();
    let mut ai = MinimaxAi::with_weights(ai_color, args.depth, weights);
    let mut board = Board::new();
    let settings = Settings::default();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", render(&board, &settings));
        println!("{}'s turn, {} moves played", board.turn(), board.move_count());

        if let Some(winner) = board.winner() {
            println!("{winner} wins!");
            return Ok(());
        }

        if board.turn() == ai_color {
            match ai.next_move(&mut board) {
                Some(mv) => info!(%mv, "AI played"),
                None => {
                    println!("AI has no moves; {} wins!", ai_color.opponent());
                    return Ok(());
                }
            }
            continue;
        }

        if let Some(target) = board.target_tile() {
            println!("jump chain in progress: continue from {target}");
        }
        print!("move (start end, e.g. `2,1 3,2`, or `quit`): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("reading move input")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            return Ok(());
        }

        match parse_step(input) {
            Ok((start, end)) => {
                let (kind, captured) = board.move_piece(start, end);
                match kind {
                    MoveKind::Invalid => println!("illegal move: {start} -> {end}"),
                    MoveKind::Normal => {}
                    MoveKind::Jump => {
                        if captured.is_some() {
                            println!("captured the piece on {}", start.midpoint(end));
                        }
                        if board.target_tile().is_some() {
                            println!("your jump continues from {end}");
                        }
                    }
                }
            }
            Err(message) => println!("{message}"),
        }
    }
}

/// Parse `start end` where both tiles use `row,col` notation
fn parse_step(input: &str) -> Result<(Tile, Tile), String> {
    let mut parts = input.split_whitespace();
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected two tiles, got `{input}`"));
    };
    let start: Tile = start.parse().map_err(|e| format!("{e}"))?;
    let end: Tile = end.parse().map_err(|e| format!("{e}"))?;
    Ok((start, end))
}

pub(crate) fn load_weights(path: Option<&std::path::Path>) -> Result<Weights> {
    match path {
        Some(path) => {
            Weights::load(path).with_context(|| format!("loading weights from {}", path.display()))
        }
        None => Ok(Weights::default()),
    }
}
