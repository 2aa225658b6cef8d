//! Unit movement between adjacent territories, plus the entry rules shared
//! with transport unloading.

use std::collections::BTreeSet;

use super::error::MoveError;
use super::transition::{CommandTransition, acting_faction};
use crate::combat::capture_territory;
use crate::env::{GameEnv, TerritoryInfo};
use crate::state::{
    AaStatus, Battle, BattleKey, BattleKind, BattleTag, Faction, GameState, Phase, StateError,
    TerritoryId, Unit, UnitId, UnitTraits,
};

/// Moves a group of units one step from `from` to an adjacent `to`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveUnits {
    pub from: TerritoryId,
    pub to: TerritoryId,
    pub units: Vec<UnitId>,
}

/// What happened when units arrived in a territory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Arrival {
    /// Friendly or empty territory.
    Peaceful,
    /// Contested territory; the battle is declared (or joined).
    Battle(BattleKey),
    /// Uncontested hostile land changed hands on entry.
    Captured,
    /// Air units passing over hostile territory outside combat.
    Overflight,
}

impl MoveUnits {
    pub fn new(from: impl Into<TerritoryId>, to: impl Into<TerritoryId>, units: Vec<UnitId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            units,
        }
    }
}

impl CommandTransition for MoveUnits {
    type Error = MoveError;
    type Output = Arrival;

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        check_selection(&self.units)?;
        env.territory(self.from.as_str())?;
        let target = env.territory(self.to.as_str())?;

        if !env.territories()?.is_adjacent(self.from.as_str(), self.to.as_str()) {
            return Err(MoveError::NotAdjacent {
                from: self.from.clone(),
                to: self.to.clone(),
            });
        }

        let mut selected = Vec::with_capacity(self.units.len());
        for id in &self.units {
            selected.push(owned_unit(state, faction, &self.from, *id)?);
        }

        for unit in &selected {
            if unit.movement == 0 {
                return Err(MoveError::NoMovementLeft { unit: unit.id });
            }
        }

        for unit in &selected {
            check_entry(state, faction, unit, target)?;
        }

        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        let faction = acting_faction(state)?;
        let target = env.territory(self.to.as_str())?;

        let origin = state
            .territory_mut(self.from.as_str())
            .ok_or_else(|| StateError::MissingTerritory(self.from.clone()))?;
        let mut moving = Vec::with_capacity(self.units.len());
        for id in &self.units {
            let mut unit = origin.take_unit(*id).ok_or(MoveError::UnknownUnit(*id))?;
            unit.movement = unit.movement.saturating_sub(1);
            moving.push(unit);
        }

        state
            .territory_mut(self.to.as_str())
            .ok_or_else(|| StateError::MissingTerritory(self.to.clone()))?
            .units
            .extend(moving);

        drop_stale_battles(state, faction, &self.from);
        let arrival = settle_arrival(state, faction, &self.from, target, &self.units, None)?;

        tracing::debug!(
            faction = %faction,
            from = %self.from,
            to = %self.to,
            units = self.units.len(),
            ?arrival,
            "units moved"
        );
        Ok(arrival)
    }
}

/// Looks up a unit standing in `territory` that belongs to `faction`.
pub(crate) fn owned_unit<'s>(
    state: &'s GameState,
    faction: Faction,
    territory: &TerritoryId,
    id: UnitId,
) -> Result<&'s Unit, MoveError> {
    let origin = state
        .territory(territory.as_str())
        .ok_or_else(|| StateError::MissingTerritory(territory.clone()))?;
    let unit = match origin.unit(id) {
        Some(unit) => unit,
        None if state.unit_exists(id) => {
            return Err(MoveError::UnitNotInTerritory {
                unit: id,
                territory: territory.clone(),
            });
        }
        None => return Err(MoveError::UnknownUnit(id)),
    };
    if unit.faction != faction {
        return Err(MoveError::NotOwned { unit: id, faction });
    }
    Ok(unit)
}

/// Rejects empty or repeated selections.
pub(crate) fn check_selection(units: &[UnitId]) -> Result<(), MoveError> {
    if units.is_empty() {
        return Err(MoveError::EmptySelection);
    }
    let mut seen = BTreeSet::new();
    for id in units {
        if !seen.insert(*id) {
            return Err(MoveError::DuplicateUnit(*id));
        }
    }
    Ok(())
}

/// Territory the acting faction would have to fight for (or may not pass).
///
/// Land counts as hostile when an enemy controls it. Oceans carry no
/// meaningful ownership while empty, so they count as hostile only while
/// enemy units are present.
pub(crate) fn is_hostile_territory(state: &GameState, faction: Faction, target: &TerritoryInfo) -> bool {
    let Some(territory) = state.territory(target.name.as_str()) else {
        return false;
    };
    if target.is_ocean {
        territory.is_contested_for(faction)
    } else {
        territory.is_hostile_controlled(faction)
    }
}

/// Anti-aircraft guns stay put during combat movement and after firing.
pub(crate) fn check_anti_aircraft(state: &GameState, unit: &Unit) -> Result<(), MoveError> {
    if !unit.kind.is_anti_aircraft() {
        return Ok(());
    }
    if state.phase() != Phase::NonCombatMove {
        return Err(MoveError::AntiAircraftInCombatMove { unit: unit.id });
    }
    if state.fired_anti_aircraft.contains(&unit.id) {
        return Err(MoveError::AntiAircraftAlreadyFired { unit: unit.id });
    }
    Ok(())
}

/// Per-unit entry legality: terrain, neutrality, anti-aircraft restrictions
/// and the non-combat hostile-entry rule.
pub(crate) fn check_entry(
    state: &GameState,
    faction: Faction,
    unit: &Unit,
    target: &TerritoryInfo,
) -> Result<(), MoveError> {
    let traits = unit.kind.traits();
    if traits.contains(UnitTraits::LAND) && target.is_ocean {
        return Err(MoveError::LandUnitAtSea {
            unit: unit.id,
            territory: target.name.clone(),
        });
    }
    if traits.contains(UnitTraits::SEA) && target.is_land() {
        return Err(MoveError::SeaUnitOnLand {
            unit: unit.id,
            territory: target.name.clone(),
        });
    }

    let territory = state
        .territory(target.name.as_str())
        .ok_or_else(|| StateError::MissingTerritory(target.name.clone()))?;
    if target.is_land() && territory.controller.is_none() {
        return Err(MoveError::NeutralTerritory(target.name.clone()));
    }

    check_anti_aircraft(state, unit)?;

    if state.phase() == Phase::NonCombatMove && is_hostile_territory(state, faction, target) {
        let contested = territory.is_contested_for(faction);
        if traits.contains(UnitTraits::AIR) {
            return Ok(());
        }
        if traits.contains(UnitTraits::BLITZ) {
            if contested {
                return Err(MoveError::ContestedEntryForbidden {
                    unit: unit.id,
                    territory: target.name.clone(),
                });
            }
            return Ok(());
        }
        return Err(MoveError::HostileEntryForbidden {
            unit: unit.id,
            territory: target.name.clone(),
        });
    }

    Ok(())
}

/// Resolves the consequences of `arrived` units entering `target`: battle
/// declaration, immediate capture, and movement forfeiture.
pub(crate) fn settle_arrival(
    state: &mut GameState,
    faction: Faction,
    from: &TerritoryId,
    target: &TerritoryInfo,
    arrived: &[UnitId],
    landed_by: Option<UnitId>,
) -> Result<Arrival, MoveError> {
    let name = &target.name;
    let territory = state
        .territory(name.as_str())
        .ok_or_else(|| StateError::MissingTerritory(name.clone()))?;

    let contested = territory.is_contested_for(faction);
    let anti_aircraft = territory.has_hostile_anti_aircraft(faction);
    let hostile_land = target.is_land() && territory.is_hostile_controlled(faction);
    let arrivals: Vec<&Unit> = territory
        .units
        .iter()
        .filter(|unit| arrived.contains(&unit.id))
        .collect();
    let air_units: Vec<Unit> = arrivals
        .iter()
        .filter(|unit| unit.kind.is_air())
        .map(|unit| (*unit).clone())
        .collect();
    let brings_land_unit = arrivals.iter().any(|unit| unit.kind.is_land());

    let arrival = if state.phase() == Phase::CombatMove && contested {
        let tag = if target.is_ocean {
            BattleTag::Naval
        } else {
            BattleTag::Land
        };
        declare_battle(state, faction, from, name, tag);
        if let Some(transport) = landed_by {
            if let Some(battle) = state
                .battle_mut(name.as_str(), tag)
                .and_then(Battle::ordinary_mut)
            {
                battle.record_landing(transport, arrived);
            }
        }
        if anti_aircraft && !air_units.is_empty() {
            declare_anti_aircraft_fire(state, faction, from, name, air_units);
        }
        Arrival::Battle(BattleKey::new(name.clone(), tag))
    } else if hostile_land && !contested && brings_land_unit {
        capture_territory(state, name, faction)?;
        Arrival::Captured
    } else if hostile_land || contested {
        Arrival::Overflight
    } else {
        Arrival::Peaceful
    };

    if matches!(arrival, Arrival::Battle(_) | Arrival::Captured) {
        let territory = state
            .territory_mut(name.as_str())
            .ok_or_else(|| StateError::MissingTerritory(name.clone()))?;
        for unit in territory
            .units
            .iter_mut()
            .filter(|unit| arrived.contains(&unit.id))
        {
            let blitzing = matches!(arrival, Arrival::Captured)
                && unit.kind.traits().contains(UnitTraits::BLITZ);
            if !blitzing {
                unit.movement = 0;
            }
        }
    }

    Ok(arrival)
}

fn declare_battle(
    state: &mut GameState,
    faction: Faction,
    from: &TerritoryId,
    territory: &TerritoryId,
    tag: BattleTag,
) {
    if state.battle(territory.as_str(), tag).is_some() {
        return;
    }
    let battle = match tag {
        BattleTag::Naval => Battle::naval(territory.clone(), faction, from.clone()),
        _ => Battle::land(territory.clone(), faction, from.clone()),
    };
    tracing::debug!(key = %battle.key(), attacker = %faction, "battle declared");
    state.battles.push(battle);
}

fn declare_anti_aircraft_fire(
    state: &mut GameState,
    faction: Faction,
    from: &TerritoryId,
    territory: &TerritoryId,
    air_units: Vec<Unit>,
) {
    match state.battle_mut(territory.as_str(), BattleTag::AntiAircraft) {
        Some(Battle {
            kind: BattleKind::AntiAircraft(fire),
            ..
        }) => {
            if fire.status == AaStatus::Pending {
                fire.air_units.extend(air_units);
            }
        }
        Some(_) => {}
        None => {
            let battle =
                Battle::anti_aircraft(territory.clone(), faction, from.clone(), air_units);
            tracing::debug!(key = %battle.key(), attacker = %faction, "anti-aircraft fire declared");
            state.battles.push(battle);
        }
    }
}

/// Drops battles that can no longer be fought because the attacker left
/// the territory they were declared in.
pub(crate) fn drop_stale_battles(state: &mut GameState, faction: Faction, vacated: &TerritoryId) {
    let Some(territory) = state.territory(vacated.as_str()) else {
        return;
    };
    let abandoned =
        territory.units_of(faction).next().is_none() && territory.hostile_units(faction).next().is_some();
    if !abandoned {
        return;
    }
    state.battles.retain(|battle| {
        let stale = battle.territory == *vacated
            && battle.attacker == faction
            && !battle.is_resolved()
            && !battle.is_in_resolution();
        if stale {
            tracing::debug!(key = %battle.key(), "stale battle dropped");
        }
        !stale
    });
}
