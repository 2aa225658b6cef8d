//! Unit table loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use conquest_core::{SnapshotUnitOracle, UnitKind, UnitStats};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// `units.toml` layout: one `[units.<kind>]` table per unit type.
#[derive(Debug, Deserialize)]
struct UnitTableToml {
    industrial_complex_cost: u32,
    units: BTreeMap<String, UnitStats>,
}

/// Loader for the unit table from TOML files.
pub struct UnitLoader;

impl UnitLoader {
    pub fn load(path: &Path) -> LoadResult<SnapshotUnitOracle> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SnapshotUnitOracle> {
        let raw: UnitTableToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse units TOML: {}", e))?;

        let stats = raw
            .units
            .into_iter()
            .map(|(name, stats)| {
                UnitKind::from_str(&name)
                    .map(|kind| (kind, stats))
                    .map_err(|_| anyhow::anyhow!("Unknown unit type '{}'", name))
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(SnapshotUnitOracle::new(stats, raw.industrial_complex_cost))
    }
}
