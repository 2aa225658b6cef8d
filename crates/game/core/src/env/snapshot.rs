//! In-memory oracle implementations.
//!
//! Snapshots own their tables and never change after construction. The
//! content crate builds them from data files; tests build them by hand.

use std::collections::BTreeMap;

use super::{
    ConfigOracle, Env, PcgRng, RngOracle, TerritoryInfo, TerritoryOracle, UnitOracle, UnitStats,
};
use crate::config::GameConfig;
use crate::state::{Faction, TerritoryId, UnitKind};

/// Territory table keyed by name.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotTerritoryOracle {
    territories: BTreeMap<TerritoryId, TerritoryInfo>,
}

impl SnapshotTerritoryOracle {
    pub fn new(territories: impl IntoIterator<Item = TerritoryInfo>) -> Self {
        Self {
            territories: territories
                .into_iter()
                .map(|info| (info.name.clone(), info))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerritoryInfo> + '_ {
        self.territories.values()
    }
}

impl TerritoryOracle for SnapshotTerritoryOracle {
    fn territory(&self, name: &str) -> Option<&TerritoryInfo> {
        self.territories.get(name)
    }

    fn names(&self) -> Vec<TerritoryId> {
        self.territories.keys().cloned().collect()
    }
}

/// Unit stats table.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotUnitOracle {
    stats: BTreeMap<UnitKind, UnitStats>,
    industrial_complex_cost: u32,
}

impl SnapshotUnitOracle {
    pub fn new(
        stats: impl IntoIterator<Item = (UnitKind, UnitStats)>,
        industrial_complex_cost: u32,
    ) -> Self {
        Self {
            stats: stats.into_iter().collect(),
            industrial_complex_cost,
        }
    }

    /// Unit types without stats.
    pub fn missing_kinds(&self) -> Vec<UnitKind> {
        UnitKind::ALL
            .into_iter()
            .filter(|kind| !self.stats.contains_key(kind))
            .collect()
    }
}

impl UnitOracle for SnapshotUnitOracle {
    fn stats(&self, kind: UnitKind) -> Option<UnitStats> {
        self.stats.get(&kind).copied()
    }

    fn industrial_complex_cost(&self) -> u32 {
        self.industrial_complex_cost
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotConfigOracle {
    pub config: GameConfig,
}

impl SnapshotConfigOracle {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }
}

impl ConfigOracle for SnapshotConfigOracle {
    fn dice_sides(&self) -> u32 {
        self.config.dice_sides
    }

    fn income_interval(&self) -> u32 {
        self.config.income_interval
    }

    fn starting_ipcs(&self, faction: Faction) -> u32 {
        self.config.starting_ipcs_for(faction)
    }

    fn game_seed(&self) -> u64 {
        self.config.game_seed
    }

    fn is_income_turn(&self, turn: u32) -> bool {
        self.config.is_income_turn(turn)
    }
}

/// All reference data needed to run a game.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OracleSnapshot {
    pub territories: SnapshotTerritoryOracle,
    pub units: SnapshotUnitOracle,
    pub config: SnapshotConfigOracle,
}

impl OracleSnapshot {
    pub fn new(
        territories: SnapshotTerritoryOracle,
        units: SnapshotUnitOracle,
        config: SnapshotConfigOracle,
    ) -> Self {
        Self {
            territories,
            units,
            config,
        }
    }

    /// Environment backed by this snapshot and the given dice source.
    pub fn env<'a, R>(
        &'a self,
        rng: &'a R,
    ) -> Env<'a, SnapshotTerritoryOracle, SnapshotUnitOracle, SnapshotConfigOracle, R>
    where
        R: RngOracle,
    {
        Env::with_all(&self.territories, &self.units, &self.config, rng)
    }

    /// Environment backed by this snapshot and the default [`PcgRng`].
    pub fn pcg_env(
        &self,
    ) -> Env<'_, SnapshotTerritoryOracle, SnapshotUnitOracle, SnapshotConfigOracle, PcgRng> {
        static RNG: PcgRng = PcgRng;
        Env::with_all(&self.territories, &self.units, &self.config, &RNG)
    }
}
