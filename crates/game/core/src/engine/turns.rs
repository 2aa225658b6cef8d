//! Phase advancement and end-of-turn upkeep.

use std::collections::BTreeMap;

use crate::action::PhaseError;
use crate::combat::destroy_units;
use crate::env::{ConfigOracle, GameEnv};
use crate::state::{Faction, GameState, Phase, StateError, TerritoryId, UnitId, UnitKind};

use super::GameEngine;

/// Everything end of turn changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSummary {
    /// Turn number that just started.
    pub turn: u32,
    /// Air units that found a carrier at sea.
    pub landed_on_carriers: Vec<UnitId>,
    /// Air units with nowhere to land.
    pub lost_air: Vec<UnitId>,
    /// Income paid out, empty on turns without collection.
    pub income: BTreeMap<Faction, u32>,
}

/// Moves to the next phase. Leaving combat requires every battle to be
/// resolved; entering a movement phase stores a checkpoint for undo.
pub(crate) fn advance_phase(state: &mut GameState) -> Result<Phase, PhaseError> {
    let phase = state.phase();
    if phase == Phase::Combat {
        let unresolved = state.battles.iter().filter(|battle| !battle.is_resolved()).count();
        if unresolved > 0 {
            return Err(PhaseError::UnresolvedBattles(unresolved));
        }
    }

    let next = phase.next();
    state.turn.phase = next;
    if next.is_movement() {
        state.phase_checkpoint = Some(Box::new(state.checkpoint()));
    }
    tracing::debug!(from = %phase, to = %next, turn = state.turn.turn, "phase advanced");
    Ok(next)
}

/// Restores the world as it was when the current movement phase began.
/// The nonce keeps counting so replayed dice differ.
pub(crate) fn undo_phase(state: &mut GameState) -> Result<(), PhaseError> {
    let checkpoint = state.phase_checkpoint.take().ok_or(PhaseError::NoCheckpoint)?;
    let nonce = state.turn.nonce;
    let mut restored = (*checkpoint).clone();
    restored.turn.nonce = nonce;
    restored.phase_checkpoint = Some(checkpoint);
    *state = restored;
    tracing::debug!(phase = %state.phase(), turn = state.turn.turn, "phase undone");
    Ok(())
}

/// Closes the current faction's turn.
///
/// Air units of the ending faction that sit over an ocean board a friendly
/// carrier with room or are lost; those over land their faction does not
/// control are lost. Every unit then gets its full movement back. Income is
/// paid on collection turns. Battles, fired guns and the checkpoint are
/// cleared, and play passes to the next faction in the purchase phase.
pub(crate) fn end_turn(state: &mut GameState, env: &GameEnv<'_>) -> Result<TurnSummary, PhaseError> {
    let mut summary = TurnSummary::default();
    if let Some(faction) = state.current_faction() {
        ground_air_units(state, env, faction, &mut summary)?;
    }

    for territory in state.territories.values_mut() {
        for unit in territory.units.iter_mut() {
            unit.movement = env.base_movement(unit.kind)?;
            for passenger in unit.cargo.iter_mut() {
                passenger.movement = env.base_movement(passenger.kind)?;
            }
        }
    }

    let turn = state.turn.turn;
    if env.config()?.is_income_turn(turn) {
        let territories = env.territories()?;
        for faction in state.turn.factions.clone() {
            let income = state.income_for(faction, territories);
            if let Some(player) = state.player_mut(faction) {
                player.ipcs += income;
                summary.income.insert(faction, income);
            }
        }
        tracing::info!(turn, income = ?summary.income, "income collected");
    }

    state.battles.clear();
    state.fired_anti_aircraft.clear();
    state.phase_checkpoint = None;
    state.turn.turn = turn + 1;
    state.turn.phase = Phase::Purchase;
    summary.turn = state.turn.turn;

    tracing::info!(
        turn = summary.turn,
        faction = ?state.current_faction(),
        lost_air = summary.lost_air.len(),
        "turn started"
    );
    Ok(summary)
}

fn ground_air_units(
    state: &mut GameState,
    env: &GameEnv<'_>,
    faction: Faction,
    summary: &mut TurnSummary,
) -> Result<(), PhaseError> {
    let mut at_sea: Vec<(TerritoryId, UnitId, UnitKind)> = Vec::new();
    for (name, territory) in &state.territories {
        let info = env.territory(name.as_str())?;
        for unit in territory.units_of(faction).filter(|unit| unit.kind.is_air()) {
            if info.is_ocean {
                at_sea.push((name.clone(), unit.id, unit.kind));
            } else if !territory.is_controlled_by(faction) {
                summary.lost_air.push(unit.id);
            }
        }
    }

    for (name, id, kind) in at_sea {
        let territory = state
            .territory_mut(name.as_str())
            .ok_or_else(|| StateError::MissingTerritory(name.clone()))?;
        let has_carrier = territory
            .units
            .iter()
            .any(|unit| unit.faction.is_friendly_to(faction) && unit.can_embark(kind));
        if !has_carrier {
            summary.lost_air.push(id);
            continue;
        }
        let Some(aircraft) = territory.take_unit(id) else {
            continue;
        };
        let passenger = aircraft.as_passenger();
        let carrier = territory
            .units
            .iter_mut()
            .find(|unit| unit.faction.is_friendly_to(faction) && unit.can_embark(kind));
        if let Some(carrier) = carrier {
            if carrier.cargo.try_push(passenger).is_ok() {
                summary.landed_on_carriers.push(id);
            }
        }
    }

    destroy_units(state, &summary.lost_air);
    if !summary.lost_air.is_empty() {
        tracing::info!(faction = %faction, lost = ?summary.lost_air, "stranded air units lost");
    }
    Ok(())
}

/// Read-only views of the turn clock.
impl<'a> GameEngine<'a> {
    pub fn turn(&self) -> u32 {
        self.state.turn.turn
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn current_faction(&self) -> Option<Faction> {
        self.state.current_faction()
    }

    /// True when income will be collected at the end of the current turn.
    pub fn is_income_turn(&self, env: &GameEnv<'_>) -> bool {
        env.config()
            .is_ok_and(|config| config.is_income_turn(self.state.turn.turn))
    }
}
