//! Game configuration loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use conquest_core::{Faction, GameConfig};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// `config.toml` layout. Omitted keys keep the [`GameConfig`] defaults.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    dice_sides: Option<u32>,
    income_interval: Option<u32>,
    game_seed: Option<u64>,
    #[serde(default)]
    starting_ipcs: BTreeMap<String, u32>,
}

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let raw: ConfigToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let mut config = GameConfig::new();
        if let Some(sides) = raw.dice_sides {
            config.dice_sides = sides;
        }
        if let Some(interval) = raw.income_interval {
            config.income_interval = interval;
        }
        if let Some(seed) = raw.game_seed {
            config.game_seed = seed;
        }
        for (name, ipcs) in raw.starting_ipcs {
            let faction = Faction::from_str(&name)
                .map_err(|_| anyhow::anyhow!("Unknown faction '{}' in starting_ipcs", name))?;
            config.starting_ipcs.insert(faction, ipcs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_keys_keep_defaults() {
        let config = ConfigLoader::parse("game_seed = 7\n").unwrap();
        assert_eq!(config.game_seed, 7);
        assert_eq!(config.dice_sides, GameConfig::DEFAULT_DICE_SIDES);
        assert_eq!(config.income_interval, GameConfig::DEFAULT_INCOME_INTERVAL);
        assert!(config.starting_ipcs.is_empty());
    }

    #[test]
    fn starting_balances_are_keyed_by_faction_name() {
        let config = ConfigLoader::parse("[starting_ipcs]\ngermany = 40\nunited_states = 42\n")
            .unwrap();
        assert_eq!(config.starting_ipcs_for(Faction::Germany), 40);
        assert_eq!(config.starting_ipcs_for(Faction::UnitedStates), 42);
        assert_eq!(config.starting_ipcs_for(Faction::Japan), 0);
    }

    #[test]
    fn unknown_faction_is_rejected() {
        let err = ConfigLoader::parse("[starting_ipcs]\nitaly = 10\n").unwrap_err();
        assert!(err.to_string().contains("italy"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigLoader::parse("dice = 6\n").is_err());
    }
}
