//! Create an opening game state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use conquest_core::GameState;
use console::style;

use crate::utils;

/// Create an opening game state and write it as JSON
#[derive(Parser)]
pub struct NewGame {
    /// Content directory (defaults to CONQUEST_CONTENT_DIR, then the embedded scenario)
    #[arg(short, long, value_name = "DIR")]
    content_dir: Option<PathBuf>,

    /// Dice seed, overriding the configured one
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

impl NewGame {
    pub fn execute(self) -> Result<()> {
        let mut content = utils::load_content(self.content_dir)?.clone();
        if let Some(seed) = self.seed {
            content.config.config.game_seed = seed;
        }

        let state =
            GameState::new_game(&content.pcg_env()).context("Failed to create new game")?;
        utils::write_state(&state, self.out.as_deref())?;

        if let Some(out) = &self.out {
            eprintln!(
                "{} {} ({} units, hash {})",
                style("New game written to").bold().green(),
                out.display(),
                state.unit_count(),
                utils::state_hash(&state)?
            );
        }
        Ok(())
    }
}
