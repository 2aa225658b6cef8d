//! Traits describing read-only reference data.
//!
//! Oracles expose the territory graph, unit statistics, tunables and the dice
//! source. The [`Env`] aggregate bundles them so the engine can access
//! everything it needs without hard coupling to concrete implementations.
mod config;
mod error;
mod map;
mod rng;
mod snapshot;
mod units;

pub use config::ConfigOracle;
pub use error::OracleError;
pub use map::{StartingUnits, TerritoryInfo, TerritoryOracle};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use snapshot::{
    OracleSnapshot, SnapshotConfigOracle, SnapshotTerritoryOracle, SnapshotUnitOracle,
};
pub use units::{UnitOracle, UnitStats};

use crate::state::{ProductionItem, UnitKind};

/// Aggregates the read-only oracles required by the command pipeline.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, T, U, C, R>
where
    T: TerritoryOracle + ?Sized,
    U: UnitOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    territories: Option<&'a T>,
    units: Option<&'a U>,
    config: Option<&'a C>,
    rng: Option<&'a R>,
}

pub type GameEnv<'a> = Env<
    'a,
    dyn TerritoryOracle + 'a,
    dyn UnitOracle + 'a,
    dyn ConfigOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, T, U, C, R> Env<'a, T, U, C, R>
where
    T: TerritoryOracle + ?Sized,
    U: UnitOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        territories: Option<&'a T>,
        units: Option<&'a U>,
        config: Option<&'a C>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            territories,
            units,
            config,
            rng,
        }
    }

    pub fn with_all(territories: &'a T, units: &'a U, config: &'a C, rng: &'a R) -> Self {
        Self::new(Some(territories), Some(units), Some(config), Some(rng))
    }

    pub fn empty() -> Self {
        Self::new(None, None, None, None)
    }

    /// # Errors
    ///
    /// Returns `OracleError::TerritoriesNotAvailable` if no territory oracle was provided.
    pub fn territories(&self) -> Result<&'a T, OracleError> {
        self.territories.ok_or(OracleError::TerritoriesNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::UnitsNotAvailable` if no unit oracle was provided.
    pub fn units(&self) -> Result<&'a U, OracleError> {
        self.units.ok_or(OracleError::UnitsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ConfigNotAvailable` if no config oracle was provided.
    pub fn config(&self) -> Result<&'a C, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Looks up a territory, treating an unknown name as malformed input.
    pub fn territory(&self, name: &str) -> Result<&'a TerritoryInfo, OracleError> {
        self.territories()?
            .territory(name)
            .ok_or_else(|| OracleError::UnknownTerritory(name.to_owned()))
    }

    pub fn unit_stats(&self, kind: UnitKind) -> Result<UnitStats, OracleError> {
        self.units()?
            .stats(kind)
            .ok_or(OracleError::MissingUnitStats(kind))
    }

    /// Purchase price of `item`.
    pub fn item_cost(&self, item: ProductionItem) -> Result<u32, OracleError> {
        self.units()?.cost(item).ok_or(match item {
            ProductionItem::Unit(kind) => OracleError::MissingUnitStats(kind),
            ProductionItem::IndustrialComplex => OracleError::UnitsNotAvailable,
        })
    }

    /// Base movement allowance of `kind`.
    pub fn base_movement(&self, kind: UnitKind) -> Result<u32, OracleError> {
        Ok(self.unit_stats(kind)?.movement)
    }
}

impl<'a, T, U, C, R> Env<'a, T, U, C, R>
where
    T: TerritoryOracle + 'a,
    U: UnitOracle + 'a,
    C: ConfigOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv` (consumes self).
    pub fn into_game_env(self) -> GameEnv<'a> {
        self.as_game_env()
    }

    /// Converts this environment into a trait-object based `GameEnv` (borrows self).
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let territories: Option<&'a dyn TerritoryOracle> = self.territories.map(|t| t as _);
        let units: Option<&'a dyn UnitOracle> = self.units.map(|u| u as _);
        let config: Option<&'a dyn ConfigOracle> = self.config.map(|c| c as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|r| r as _);
        Env::new(territories, units, config, rng)
    }
}
