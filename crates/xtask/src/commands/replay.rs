//! Apply a command script to a saved state.
//!
//! A script is a JSON array of steps, each naming the issuing faction and the
//! command fields:
//!
//! ```json
//! [
//!   { "faction": "soviet_union", "command": "purchase_unit", "item": { "unit": "infantry" } },
//!   { "faction": "soviet_union", "command": "end_phase" }
//! ]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use conquest_core::{Command, Faction, GameEngine, GameError};
use console::style;
use serde::Deserialize;

use crate::utils;

/// One scripted command.
#[derive(Debug, Deserialize)]
struct Step {
    faction: Faction,
    #[serde(flatten)]
    command: Command,
}

/// Apply a JSON command script to a saved state
#[derive(Parser)]
pub struct Replay {
    /// State file produced by `new-game` or a previous replay
    #[arg(value_name = "STATE")]
    state: PathBuf,

    /// Command script
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Content directory (defaults to CONQUEST_CONTENT_DIR, then the embedded scenario)
    #[arg(short, long, value_name = "DIR")]
    content_dir: Option<PathBuf>,

    /// Write the final state here
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Stop at the first rejected command
    #[arg(long)]
    strict: bool,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let content = utils::load_content(self.content_dir)?;
        let mut state = utils::read_state(&self.state)?;

        let script = std::fs::read_to_string(&self.script)
            .with_context(|| format!("Failed to read script: {}", self.script.display()))?;
        let steps: Vec<Step> = serde_json::from_str(&script)
            .with_context(|| format!("Failed to parse script: {}", self.script.display()))?;

        let mut rejected = 0;
        for (index, step) in steps.iter().enumerate() {
            let env = content.pcg_env().into_game_env();
            let result = GameEngine::new(&mut state).execute(env, step.faction, &step.command);
            match result {
                Ok(outcome) => {
                    println!(
                        "{} #{:<3} {:<16} {:?}",
                        style("ok ").green(),
                        index,
                        step.faction.as_ref(),
                        outcome
                    );
                }
                Err(error) => {
                    rejected += 1;
                    println!(
                        "{} #{:<3} {:<16} [{}] {}",
                        style("err").red(),
                        index,
                        step.faction.as_ref(),
                        error.error_code(),
                        error
                    );
                    if self.strict {
                        anyhow::bail!("Step {} rejected: {}", index, error);
                    }
                }
            }
        }

        println!();
        println!(
            "{} {} applied, {} rejected, nonce {}, hash {}",
            style("Replay finished:").bold().cyan(),
            steps.len() - rejected,
            rejected,
            state.turn.nonce,
            utils::state_hash(&state)?
        );

        if let Some(out) = &self.out {
            utils::write_state(&state, Some(out))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use conquest_core::{CommandKind, ProductionItem, UnitKind};

    use super::*;

    #[test]
    fn steps_flatten_the_command_fields() {
        let steps: Vec<Step> = serde_json::from_str(
            r#"[
                {"faction": "soviet_union", "command": "purchase_unit", "item": {"unit": "infantry"}},
                {"faction": "soviet_union", "command": "end_phase"}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps[0].faction, Faction::SovietUnion);
        match &steps[0].command {
            Command::PurchaseUnit(purchase) => {
                assert_eq!(purchase.item, ProductionItem::Unit(UnitKind::Infantry));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(steps[1].command.kind(), CommandKind::EndPhase);
    }
}
