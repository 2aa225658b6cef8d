//! Read and inspect saved game states.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use conquest_core::{Faction, GameState};
use console::style;

use crate::utils;

/// Read and inspect a saved state
#[derive(Parser)]
pub struct ReadState {
    /// State file (JSON)
    #[arg(value_name = "STATE")]
    state: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Summary view (turn, treasuries, holdings, battles)
    Summary,
    /// Full JSON output
    Json,
    /// Pretty-printed debug format
    Debug,
}

impl ReadState {
    pub fn execute(self) -> Result<()> {
        let state = utils::read_state(&self.state)?;

        println!(
            "{} {}",
            style("State File:").bold().cyan(),
            self.state.display()
        );
        println!("{} {}", style("Hash:").bold().cyan(), utils::state_hash(&state)?);
        println!();

        match self.format {
            OutputFormat::Summary => print_summary(&state),
            OutputFormat::Json => utils::write_state(&state, None)?,
            OutputFormat::Debug => println!("{:#?}", state),
        }

        Ok(())
    }
}

fn print_summary(state: &GameState) {
    println!("{}", style("=== Game State Summary ===").bold().green());
    println!();

    println!("{}", style("Turn Information:").bold().yellow());
    println!("  Turn: {}", state.turn.turn);
    println!("  Phase: {:?}", state.turn.phase);
    println!(
        "  Current Faction: {}",
        state
            .current_faction()
            .map(|faction| faction.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!("  Nonce: {}", state.turn.nonce);
    println!();

    println!("{}", style("Factions:").bold().yellow());
    for faction in Faction::ALL {
        let Some(player) = state.player(faction) else {
            continue;
        };
        let held = state
            .territories
            .values()
            .filter(|territory| territory.controller == Some(faction))
            .count();
        let units: usize = state
            .territories
            .values()
            .flat_map(|territory| territory.units.iter())
            .filter(|unit| unit.faction == faction)
            .map(|unit| 1 + unit.cargo.len())
            .sum();
        println!(
            "  {:<16} {:>4} IPCs  {:>3} territories  {:>3} units  {} pending",
            faction.as_ref(),
            player.ipcs,
            held,
            units,
            player.pending.len()
        );
    }
    println!();

    if !state.battles.is_empty() {
        println!("{}", style("Battles:").bold().yellow());
        for battle in &state.battles {
            println!(
                "  {:?} battle in {} by {} from {}: {:?}",
                battle.tag(),
                battle.territory,
                battle.attacker,
                battle.attack_from,
                battle.outcome()
            );
        }
        println!();
    }
}
