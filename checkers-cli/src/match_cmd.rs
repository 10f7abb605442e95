//! Match command - AI vs AI self-play

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use checkers_core::{Board, Color, MinimaxAi, DEFAULT_DEPTH};

use crate::play::load_weights;
use crate::settings::{render, Settings};

#[derive(Args)]
pub struct MatchArgs {
    /// Search depth for the red AI
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub red_depth: u32,

    /// Search depth for the black AI
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub black_depth: u32,

    /// Stop after this many completed moves
    #[arg(long, default_value = "200")]
    pub max_moves: u32,

    /// Print the board after every move
    #[arg(long)]
    pub verbose: bool,

    /// Output the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Evaluation weights JSON file, shared by both sides
    #[arg(long, value_name = "FILE")]
    pub weights: Option<PathBuf>,
}

/// Final report of a self-play game
#[derive(Debug, Serialize)]
struct MatchReport {
    winner: Option<String>,
    moves: u32,
    red_left: u8,
    black_left: u8,
}

pub fn run(args: MatchArgs) -> Result<()> {
    let weights = load_weights(args.weights.as_deref())?;
    let mut board = Board::new();
    let mut red = MinimaxAi::with_weights(Color::Red, args.red_depth, weights.clone());
    let mut black = MinimaxAi::with_weights(Color::Black, args.black_depth, weights);
    let settings = Settings::default();

    while board.winner().is_none() && board.move_count() < args.max_moves {
        let ai = match board.turn() {
            Color::Red => &mut red,
            Color::Black => &mut black,
        };
        let Some(mv) = ai.next_move(&mut board) else {
            // No legal moves: the side to move is stuck and loses
            info!(side = %board.turn(), "no legal moves");
            break;
        };
        info!(%mv, side = %ai.color(), move_count = board.move_count(), "played");
        if args.verbose {
            println!("{}", render(&board, &settings));
        }
    }

    let report = MatchReport {
        winner: board.winner().map(|c| c.to_string()),
        moves: board.move_count(),
        red_left: board.red_count(),
        black_left: board.black_count(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render(&board, &settings));
        match &report.winner {
            Some(winner) => println!("{winner} wins after {} moves", report.moves),
            None => println!(
                "no winner after {} moves (red {} - black {})",
                report.moves, report.red_left, report.black_left
            ),
        }
    }
    Ok(())
}
