//! Territory table loader.
//!
//! `territories.ron` is a list of [`TerritoryInfo`] records. Fields with a
//! sensible zero value (`controller`, `is_capital`, `is_ocean`, `power`,
//! `has_factory`, `garrison`) may be omitted.

use std::collections::BTreeSet;
use std::path::Path;

use conquest_core::{SnapshotTerritoryOracle, TerritoryInfo};

use crate::loaders::{LoadResult, read_file};

/// Loader for the territory table from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<SnapshotTerritoryOracle> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SnapshotTerritoryOracle> {
        let territories: Vec<TerritoryInfo> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse territories RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for info in &territories {
            if !seen.insert(info.name.clone()) {
                anyhow::bail!("Territory '{}' is defined twice", info.name);
            }
        }

        Ok(SnapshotTerritoryOracle::new(territories))
    }
}
