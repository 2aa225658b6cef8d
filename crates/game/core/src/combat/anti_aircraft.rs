//! Anti-aircraft fire against air units entering a defended territory.

use std::collections::BTreeSet;

use super::{
    CombatReport, Combatant, Dice, Volley, combatants, destroy_units, resolve_selection, settle,
};
use crate::action::CombatError;
use crate::env::GameEnv;
use crate::state::{
    AaStatus, BattleKind, BattleTag, CombatStatus, GameState, TerritoryId, UnitId, UnitKind,
};

struct Target {
    air_units: Vec<Combatant>,
    status: AaStatus,
    gunners: Vec<UnitId>,
}

/// Air units still present in the territory and the hostile guns facing them.
fn target(state: &GameState, index: usize, report: &CombatReport) -> Result<Target, CombatError> {
    let unknown = || CombatError::UnknownBattle(report.key.clone());
    let battle = state.battles.get(index).ok_or_else(unknown)?;
    let BattleKind::AntiAircraft(fire) = &battle.kind else {
        return Err(unknown());
    };
    let territory = state.territory(battle.territory.as_str()).ok_or_else(unknown)?;

    let air_units = fire
        .air_units
        .iter()
        .filter(|unit| territory.contains(unit.id))
        .map(|unit| Combatant {
            id: unit.id,
            kind: unit.kind,
        })
        .collect();
    let gunners = territory
        .hostile_units(battle.attacker)
        .filter(|unit| unit.kind.is_anti_aircraft())
        .map(|unit| unit.id)
        .collect();
    Ok(Target {
        air_units,
        status: fire.status,
        gunners,
    })
}

fn set_status(state: &mut GameState, index: usize, status: AaStatus, rolls: Option<Vec<u32>>) {
    if let Some(battle) = state.battles.get_mut(index) {
        if let BattleKind::AntiAircraft(fire) = &mut battle.kind {
            fire.status = status;
            if let Some(rolls) = rolls {
                fire.rolls = rolls;
            }
        }
    }
}

/// One die per attacking air unit. The guns that fired are recorded and may
/// not move for the rest of the turn.
pub(super) fn fire(
    state: &mut GameState,
    env: &GameEnv<'_>,
    index: usize,
    dice: &mut Dice<'_>,
    report: &mut CombatReport,
) -> Result<(), CombatError> {
    let target = target(state, index, report)?;
    match target.status {
        AaStatus::Pending => {}
        AaStatus::AwaitingCasualties { .. } => {
            return Err(CombatError::AwaitingCasualties(report.key.clone()));
        }
        AaStatus::Resolved => return Err(CombatError::AlreadyResolved(report.key.clone())),
    }

    let threshold = env.unit_stats(UnitKind::AntiAircraft)?.defense;
    let shots = if target.gunners.is_empty() {
        0
    } else {
        target.air_units.len()
    };
    let (rolls, hits) = dice.volley(&vec![threshold; shots]);
    state.fired_anti_aircraft.extend(target.gunners.iter().copied());

    let mut removed = Vec::new();
    let status = if hits == 0 {
        AaStatus::Resolved
    } else if hits as usize >= target.air_units.len() {
        removed.extend(target.air_units.iter().map(|unit| unit.id));
        AaStatus::Resolved
    } else {
        AaStatus::AwaitingCasualties { hits }
    };
    set_status(state, index, status, Some(rolls.clone()));
    destroy_units(state, &removed);
    if status == AaStatus::Resolved {
        settle_undefended(state, &report.key.territory)?;
    }

    tracing::debug!(key = %report.key, shots, hits, removed = removed.len(), "anti-aircraft fire");
    report.main = Some(Volley {
        attacker_rolls: Vec::new(),
        defender_rolls: rolls,
        attacker_hits: 0,
        defender_hits: hits,
    });
    report.removed = removed;
    if let AaStatus::AwaitingCasualties { hits } = status {
        report.casualties_owed = Some(hits);
    }
    Ok(())
}

/// The attacker names which air units were shot down.
pub(super) fn select(
    state: &mut GameState,
    index: usize,
    selection: &[UnitId],
    report: &mut CombatReport,
) -> Result<(), CombatError> {
    let target = target(state, index, report)?;
    let AaStatus::AwaitingCasualties { hits } = target.status else {
        return Err(CombatError::NotAwaitingCasualties(report.key.clone()));
    };

    let removed = resolve_selection(selection, hits, &target.air_units, &mut BTreeSet::new())?;
    destroy_units(state, &removed);
    set_status(state, index, AaStatus::Resolved, None);
    settle_undefended(state, &report.key.territory)?;

    tracing::debug!(key = %report.key, removed = ?removed, "anti-aircraft casualties selected");
    report.removed = removed;
    Ok(())
}

/// Once the guns have fired, a pending land battle in the same territory
/// with nothing left to fight is decided without dice. An attacker win
/// there captures the territory and turns the guns.
fn settle_undefended(state: &mut GameState, territory: &TerritoryId) -> Result<(), CombatError> {
    let Some(index) = state.battles.iter().position(|battle| {
        battle.matches(territory.as_str(), BattleTag::Land)
            && battle
                .ordinary()
                .is_some_and(|land| land.status == CombatStatus::Pending)
    }) else {
        return Ok(());
    };
    let battle = &state.battles[index];
    let naval_pending = state
        .battle(battle.attack_from.as_str(), BattleTag::Naval)
        .is_some_and(|naval| !naval.is_resolved());
    let (_, defenders) = combatants(state, territory.as_str(), battle.attacker)?;
    if defenders.is_empty() && !naval_pending {
        settle(state, index)?;
    }
    Ok(())
}
