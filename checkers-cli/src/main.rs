//! Checkers CLI
//!
//! Commands:
//! - play: interactive game against the AI
//! - match: AI vs AI self-play

mod match_cmd;
mod play;
mod settings;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "checkers")]
#[command(about = "Checkers rule engine with an exhaustive minimax AI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the AI
    Play(play::PlayArgs),
    /// AI vs AI self-play
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Match(args) => match_cmd::run(args),
    }
}
