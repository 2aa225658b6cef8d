//! Battle outcome and territory capture.

use crate::state::{
    Battle, BattleOutcome, BattleTag, CombatStatus, Faction, GameState, StateError, TerritoryId,
};

/// Hands `territory` to `captor`. Enemy anti-aircraft guns left behind
/// change sides with it.
pub fn capture_territory(
    state: &mut GameState,
    territory: &TerritoryId,
    captor: Faction,
) -> Result<(), StateError> {
    let target = state
        .territory_mut(territory.as_str())
        .ok_or_else(|| StateError::MissingTerritory(territory.clone()))?;
    let previous = target.controller.replace(captor);

    let mut converted = 0;
    for unit in target.units.iter_mut() {
        if unit.kind.is_anti_aircraft() && unit.faction.is_hostile_to(captor) {
            unit.faction = captor;
            unit.movement = 0;
            converted += 1;
        }
    }

    tracing::info!(
        territory = %territory,
        captor = %captor,
        previous = ?previous,
        converted_anti_aircraft = converted,
        "territory captured"
    );
    Ok(())
}

/// Decides the battle if either side has run out of units.
///
/// No attackers left (including mutual destruction) is a defender win. No
/// defenders left with at least one attacker is an attacker win, which
/// captures land territory unless only air units survived.
pub fn settle(state: &mut GameState, index: usize) -> Result<Option<BattleOutcome>, StateError> {
    let Some(battle) = state.battles.get(index) else {
        return Ok(None);
    };
    let territory = battle.territory.clone();
    let attacker = battle.attacker;
    let key = battle.key();
    let land = battle.tag() == BattleTag::Land;
    let (attackers, defenders) = super::combatants(state, territory.as_str(), attacker)?;

    let outcome = if attackers.is_empty() {
        BattleOutcome::DefenderWins
    } else if defenders.is_empty() {
        BattleOutcome::AttackerWins
    } else {
        return Ok(None);
    };

    if let Some(battle) = state.battles.get_mut(index).and_then(Battle::ordinary_mut) {
        battle.status = CombatStatus::Resolved(outcome);
    }
    tracing::info!(key = %key, %outcome, "battle resolved");

    let occupies = attackers.iter().any(|unit| !unit.kind.is_air());
    if land && outcome == BattleOutcome::AttackerWins && occupies {
        capture_territory(state, &territory, attacker)?;
    }
    Ok(Some(outcome))
}
