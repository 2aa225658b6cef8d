//! Content factory for building oracle snapshots from data files.

use std::path::{Path, PathBuf};

use conquest_core::{
    GameConfig, OracleSnapshot, SnapshotConfigOracle, SnapshotTerritoryOracle,
    SnapshotUnitOracle,
};

use crate::loaders::{ConfigLoader, LoadResult, MapLoader, UnitLoader};

const EMBEDDED_TERRITORIES: &str = include_str!("../../data/territories.ron");
const EMBEDDED_UNITS: &str = include_str!("../../data/units.toml");
const EMBEDDED_CONFIG: &str = include_str!("../../data/config.toml");

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── units.toml
/// └── territories.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the unit table from `units.toml`.
    pub fn load_units(&self) -> LoadResult<SnapshotUnitOracle> {
        UnitLoader::load(&self.data_dir.join("units.toml"))
    }

    /// Load the territory table from `territories.ron`.
    pub fn load_territories(&self) -> LoadResult<SnapshotTerritoryOracle> {
        MapLoader::load(&self.data_dir.join("territories.ron"))
    }

    /// Load and validate every table in the directory.
    pub fn load_snapshot(&self) -> LoadResult<OracleSnapshot> {
        let snapshot = OracleSnapshot::new(
            self.load_territories()?,
            self.load_units()?,
            SnapshotConfigOracle::new(self.load_config()?),
        );
        crate::validate(&snapshot)
            .map_err(|e| anyhow::anyhow!("Invalid content in {}: {}", self.data_dir.display(), e))?;

        tracing::info!(
            dir = %self.data_dir.display(),
            territories = snapshot.territories.len(),
            "content loaded"
        );
        Ok(snapshot)
    }

    /// Parse and validate the scenario compiled into this crate.
    pub fn load_embedded() -> LoadResult<OracleSnapshot> {
        let snapshot = OracleSnapshot::new(
            MapLoader::parse(EMBEDDED_TERRITORIES)?,
            UnitLoader::parse(EMBEDDED_UNITS)?,
            SnapshotConfigOracle::new(ConfigLoader::parse(EMBEDDED_CONFIG)?),
        );
        crate::validate(&snapshot)?;

        tracing::debug!(
            territories = snapshot.territories.len(),
            "embedded content loaded"
        );
        Ok(snapshot)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Writes the embedded scenario into `data_dir` as a starting point for
    /// custom content.
    pub fn export_embedded(&self) -> LoadResult<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            anyhow::anyhow!("Failed to create {}: {}", self.data_dir.display(), e)
        })?;
        for (file, content) in [
            ("territories.ron", EMBEDDED_TERRITORIES),
            ("units.toml", EMBEDDED_UNITS),
            ("config.toml", EMBEDDED_CONFIG),
        ] {
            let path = self.data_dir.join(file);
            std::fs::write(&path, content)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use conquest_core::{Faction, TerritoryOracle, UnitKind, UnitOracle};

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn embedded_scenario_is_complete() {
        let snapshot = ContentFactory::load_embedded().unwrap();
        assert!(snapshot.units.missing_kinds().is_empty());
        assert_eq!(snapshot.units.stats(UnitKind::Infantry).map(|s| s.cost), Some(3));
        for faction in Faction::ALL {
            assert!(snapshot.territories.capital_of(faction).is_some());
            assert!(snapshot.config.config.starting_ipcs_for(faction) > 0);
        }
    }

    #[test]
    fn exported_scenario_loads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        factory.export_embedded().unwrap();

        let loaded = factory.load_snapshot().unwrap();
        assert_eq!(loaded, ContentFactory::load_embedded().unwrap());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_snapshot().unwrap_err();
        assert!(err.to_string().contains("territories.ron"));
    }

    #[test]
    fn invalid_content_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        factory.export_embedded().unwrap();
        std::fs::write(
            dir.path().join("territories.ron"),
            r#"[
                (name: "berlin", controller: Some(germany), is_capital: true, neighbors: ["warsaw"]),
                (name: "warsaw", controller: Some(germany), neighbors: []),
            ]"#,
        )
        .unwrap();

        let err = factory.load_snapshot().unwrap_err().to_string();
        assert!(err.contains("berlin borders warsaw"), "{err}");
        assert!(err.contains("soviet_union has 0 capitals"), "{err}");
    }
}
