//! Development tasks for the conquest workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{ExportContent, NewGame, ReadState, Replay, ValidateContent};

/// Development tasks for the conquest workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for conquest", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load and check a content directory (or the embedded scenario)
    ValidateContent(ValidateContent),

    /// Write the embedded scenario to a directory for editing
    ExportContent(ExportContent),

    /// Create an opening game state and write it as JSON
    NewGame(NewGame),

    /// Apply a JSON command script to a saved state
    Replay(Replay),

    /// Read and inspect a saved state
    ReadState(ReadState),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for CONQUEST_CONTENT_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(utils::log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::ValidateContent(cmd) => cmd.execute(),
        Command::ExportContent(cmd) => cmd.execute(),
        Command::NewGame(cmd) => cmd.execute(),
        Command::Replay(cmd) => cmd.execute(),
        Command::ReadState(cmd) => cmd.execute(),
    }
}
