//! Content directory commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use conquest_content::ContentFactory;
use conquest_core::{Faction, TerritoryOracle};
use console::style;

use crate::utils;

/// Load and check a content directory
#[derive(Parser)]
pub struct ValidateContent {
    /// Content directory (defaults to CONQUEST_CONTENT_DIR, then the embedded scenario)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl ValidateContent {
    pub fn execute(self) -> Result<()> {
        let dir = utils::content_dir(self.dir);
        let source = dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "embedded scenario".to_string());

        println!("{} {}", style("Content:").bold().cyan(), source);
        let snapshot = utils::load_snapshot(dir.as_deref())?;

        let map = &snapshot.territories;
        let oceans = map.iter().filter(|info| info.is_ocean).count();
        println!("  Territories: {} ({} land, {} sea)", map.len(), map.len() - oceans, oceans);
        for faction in Faction::ALL {
            let capital = map
                .capital_of(faction)
                .map(|name| name.to_string())
                .unwrap_or_default();
            println!(
                "  {:<16} capital {:<16} starts with {} IPCs",
                faction.as_ref(),
                capital,
                snapshot.config.config.starting_ipcs_for(faction)
            );
        }
        println!("{}", style("Content is valid").bold().green());
        Ok(())
    }
}

/// Write the embedded scenario to a directory
#[derive(Parser)]
pub struct ExportContent {
    /// Target directory (created if missing)
    #[arg(value_name = "DIR")]
    dir: PathBuf,
}

impl ExportContent {
    pub fn execute(self) -> Result<()> {
        ContentFactory::new(&self.dir).export_embedded()?;
        println!(
            "{} {}",
            style("Exported embedded content to").bold().green(),
            self.dir.display()
        );
        Ok(())
    }
}
