//! Attacker retreat.

use std::cmp::Reverse;

use super::battle_index;
use crate::action::CombatError;
use crate::env::GameEnv;
use crate::state::{
    BattleKey, BattleOutcome, BattleTag, CombatStatus, GameState, StateError, UnitId, UnitKind,
    UnitTraits,
};

/// Where the retreating units ended up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetreatReport {
    pub returned: Vec<UnitId>,
    /// Land units that found no transport on the way back.
    pub lost: Vec<UnitId>,
}

/// Withdraws the attacker from the battle at `key` and hands the defender
/// the win.
///
/// Retreat is allowed once at least one main round has completed and no
/// casualty selection is pending. Units go back to the territory the attack
/// came from. Land units that attacked from the sea must re-embark: one unit
/// per transport waiting there, infantry first, then the cheapest. Units
/// whose landing transport has been sunk, and units that find no free
/// transport, are lost.
pub fn retreat(
    state: &mut GameState,
    env: &GameEnv<'_>,
    key: &BattleKey,
) -> Result<RetreatReport, CombatError> {
    if key.tag == BattleTag::AntiAircraft {
        return Err(CombatError::RetreatFromAntiAircraft);
    }
    let index = battle_index(state, key)?;
    let battle = &state.battles[index];
    let ordinary = battle
        .ordinary()
        .ok_or(CombatError::RetreatFromAntiAircraft)?;
    match ordinary.status {
        CombatStatus::InProgress { round } if round > 0 => {}
        CombatStatus::AwaitingCasualties { .. } => {
            return Err(CombatError::AwaitingCasualties(key.clone()));
        }
        CombatStatus::Resolved(_) => return Err(CombatError::AlreadyResolved(key.clone())),
        _ => return Err(CombatError::RetreatBeforeFirstRound),
    }

    let attacker = battle.attacker;
    let origin = battle.attack_from.clone();
    let landings = ordinary.clone();
    let by_sea = key.tag == BattleTag::Land && env.territory(origin.as_str())?.is_ocean;

    let contested = state
        .territory_mut(key.territory.as_str())
        .ok_or_else(|| StateError::MissingTerritory(key.territory.clone()))?;
    let retreating: Vec<UnitId> = contested
        .units_of(attacker)
        .filter(|unit| !unit.kind.is_anti_aircraft())
        .map(|unit| unit.id)
        .collect();
    let mut withdrawn = Vec::with_capacity(retreating.len());
    for id in &retreating {
        if let Some(unit) = contested.take_unit(*id) {
            withdrawn.push(unit);
        }
    }

    let mut report = RetreatReport::default();
    let mut boarding = Vec::new();
    let mut arriving = Vec::new();
    for mut unit in withdrawn {
        if by_sea && unit.kind.is_land() {
            let stranded = landings
                .landing_of(unit.id)
                .is_some_and(|landing| landing.sunk);
            if stranded {
                report.lost.push(unit.id);
            } else {
                boarding.push(unit);
            }
            continue;
        }
        if !unit.kind.is_air() {
            unit.movement = 0;
        }
        report.returned.push(unit.id);
        arriving.push(unit);
    }

    let mut ranked = Vec::with_capacity(boarding.len());
    for unit in boarding {
        let cost = env.unit_stats(unit.kind)?.cost;
        ranked.push((Reverse(unit.kind == UnitKind::Infantry), cost, unit.id, unit));
    }
    ranked.sort_by_key(|(infantry, cost, id, _)| (*infantry, *cost, *id));

    let sea = state
        .territory_mut(origin.as_str())
        .ok_or_else(|| StateError::MissingTerritory(origin.clone()))?;
    sea.units.extend(arriving);
    let mut transports: Vec<UnitId> = sea
        .units_of(attacker)
        .filter(|unit| unit.kind.traits().contains(UnitTraits::CARRIES_LAND))
        .map(|unit| unit.id)
        .collect();
    transports.sort();
    let mut transports = transports.into_iter();

    for (_, _, _, mut unit) in ranked {
        unit.movement = 0;
        let seat = transports.by_ref().find(|id| {
            sea.unit(*id)
                .is_some_and(|transport| transport.can_embark(unit.kind))
        });
        let carrier = seat.and_then(|id| sea.unit_mut(id));
        match carrier {
            Some(transport) => {
                transport.cargo.push(unit.as_passenger());
                report.returned.push(unit.id);
            }
            None => report.lost.push(unit.id),
        }
    }

    if let Some(battle) = state
        .battles
        .get_mut(index)
        .and_then(|battle| battle.ordinary_mut())
    {
        battle.status = CombatStatus::Resolved(BattleOutcome::DefenderWins);
        battle.hit_battleships.clear();
    }

    tracing::info!(
        key = %key,
        attacker = %attacker,
        to = %origin,
        returned = report.returned.len(),
        lost = report.lost.len(),
        "attacker retreated"
    );
    Ok(report)
}
