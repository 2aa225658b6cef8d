//! Loading land units onto transports and unloading them ashore.

use arrayvec::ArrayVec;

use super::error::MoveError;
use super::movement::{
    Arrival, check_anti_aircraft, check_entry, check_selection, drop_stale_battles, owned_unit,
    settle_arrival,
};
use super::transition::{CommandTransition, acting_faction};
use crate::config::GameConfig;
use crate::env::{GameEnv, TerritoryInfo};
use crate::state::{Faction, GameState, StateError, TerritoryId, Unit, UnitId, UnitKind, UnitTraits};

/// Embarks land units from `from` onto `transport` waiting in the adjacent
/// ocean `sea`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadTransport {
    pub from: TerritoryId,
    pub sea: TerritoryId,
    pub transport: UnitId,
    pub units: Vec<UnitId>,
}

impl LoadTransport {
    pub fn new(
        from: impl Into<TerritoryId>,
        sea: impl Into<TerritoryId>,
        transport: UnitId,
        units: Vec<UnitId>,
    ) -> Self {
        Self {
            from: from.into(),
            sea: sea.into(),
            transport,
            units,
        }
    }
}

/// Lands cargo of `transport` from `sea` into the adjacent land territory
/// `to`. Hostile shores are attacked or captured exactly as by a direct move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnloadTransport {
    pub sea: TerritoryId,
    pub transport: UnitId,
    pub to: TerritoryId,
    pub units: Vec<UnitId>,
}

impl UnloadTransport {
    pub fn new(
        sea: impl Into<TerritoryId>,
        transport: UnitId,
        to: impl Into<TerritoryId>,
        units: Vec<UnitId>,
    ) -> Self {
        Self {
            sea: sea.into(),
            transport,
            to: to.into(),
            units,
        }
    }
}

/// Checks that `land` and `sea` are a land territory and an ocean that touch.
fn check_shore<'a>(
    env: &GameEnv<'a>,
    land: &TerritoryId,
    sea: &TerritoryId,
) -> Result<(&'a TerritoryInfo, &'a TerritoryInfo), MoveError> {
    let land_info = env.territory(land.as_str())?;
    let sea_info = env.territory(sea.as_str())?;
    if !land_info.is_land() {
        return Err(MoveError::NotLand(land.clone()));
    }
    if !sea_info.is_ocean {
        return Err(MoveError::NotOcean(sea.clone()));
    }
    if !env.territories()?.is_adjacent(land.as_str(), sea.as_str()) {
        return Err(MoveError::NotAdjacent {
            from: land.clone(),
            to: sea.clone(),
        });
    }
    Ok((land_info, sea_info))
}

fn owned_transport<'s>(
    state: &'s GameState,
    faction: Faction,
    sea: &TerritoryId,
    id: UnitId,
) -> Result<&'s Unit, MoveError> {
    let transport = owned_unit(state, faction, sea, id)?;
    if !transport.kind.traits().contains(UnitTraits::CARRIES_LAND) {
        return Err(MoveError::NotATransport { unit: id });
    }
    Ok(transport)
}

impl CommandTransition for LoadTransport {
    type Error = MoveError;
    type Output = ();

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        check_selection(&self.units)?;
        check_shore(env, &self.from, &self.sea)?;
        let transport = owned_transport(state, faction, &self.sea, self.transport)?;

        let mut kinds: ArrayVec<UnitKind, { GameConfig::MAX_CARGO }> = transport.cargo_kinds().collect();
        for id in &self.units {
            let unit = owned_unit(state, faction, &self.from, *id)?;
            if !unit.kind.is_land() {
                return Err(MoveError::NotLoadable { unit: *id });
            }
            if unit.movement == 0 {
                return Err(MoveError::NoMovementLeft { unit: *id });
            }
            check_anti_aircraft(state, unit)?;
            if kinds.try_push(unit.kind).is_err() {
                return Err(MoveError::CargoCapacity {
                    transport: self.transport,
                });
            }
        }
        if !transport.kind.accepts_cargo(&kinds) {
            return Err(MoveError::CargoCapacity {
                transport: self.transport,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        let faction = acting_faction(state)?;

        let origin = state
            .territory_mut(self.from.as_str())
            .ok_or_else(|| StateError::MissingTerritory(self.from.clone()))?;
        let mut boarding = Vec::with_capacity(self.units.len());
        for id in &self.units {
            let mut unit = origin.take_unit(*id).ok_or(MoveError::UnknownUnit(*id))?;
            unit.movement = unit.movement.saturating_sub(1);
            boarding.push(unit.as_passenger());
        }

        let transport = state
            .territory_mut(self.sea.as_str())
            .and_then(|sea| sea.unit_mut(self.transport))
            .ok_or(MoveError::UnknownUnit(self.transport))?;
        for passenger in boarding {
            transport
                .cargo
                .try_push(passenger)
                .map_err(|_| MoveError::CargoCapacity {
                    transport: self.transport,
                })?;
        }

        drop_stale_battles(state, faction, &self.from);
        tracing::debug!(
            faction = %faction,
            from = %self.from,
            sea = %self.sea,
            transport = %self.transport,
            units = self.units.len(),
            "transport loaded"
        );
        Ok(())
    }
}

impl CommandTransition for UnloadTransport {
    type Error = MoveError;
    type Output = Arrival;

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        check_selection(&self.units)?;
        let (shore, _) = check_shore(env, &self.to, &self.sea)?;
        let transport = owned_transport(state, faction, &self.sea, self.transport)?;

        for id in &self.units {
            let passenger = transport
                .cargo
                .iter()
                .find(|passenger| passenger.id == *id)
                .ok_or(MoveError::NotAboard {
                    unit: *id,
                    transport: self.transport,
                })?;
            if passenger.faction != faction {
                return Err(MoveError::NotOwned { unit: *id, faction });
            }
            if passenger.movement == 0 {
                return Err(MoveError::NoMovementLeft { unit: *id });
            }
            check_entry(state, faction, &passenger.into_unit(), shore)?;
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        let faction = acting_faction(state)?;
        let shore = env.territory(self.to.as_str())?;

        let transport = state
            .territory_mut(self.sea.as_str())
            .and_then(|sea| sea.unit_mut(self.transport))
            .ok_or(MoveError::UnknownUnit(self.transport))?;
        let mut landing = Vec::with_capacity(self.units.len());
        for id in &self.units {
            let index = transport
                .cargo
                .iter()
                .position(|passenger| passenger.id == *id)
                .ok_or(MoveError::NotAboard {
                    unit: *id,
                    transport: self.transport,
                })?;
            let mut unit = transport.cargo.remove(index).into_unit();
            unit.movement = unit.movement.saturating_sub(1);
            landing.push(unit);
        }

        state
            .territory_mut(self.to.as_str())
            .ok_or_else(|| StateError::MissingTerritory(self.to.clone()))?
            .units
            .extend(landing);

        let arrival = settle_arrival(
            state,
            faction,
            &self.sea,
            shore,
            &self.units,
            Some(self.transport),
        )?;
        tracing::debug!(
            faction = %faction,
            sea = %self.sea,
            transport = %self.transport,
            to = %self.to,
            units = self.units.len(),
            ?arrival,
            "transport unloaded"
        );
        Ok(arrival)
    }
}
