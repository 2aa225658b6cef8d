//! Opening fire and main rounds of land and naval battles.

use std::collections::BTreeSet;

use super::{
    CombatReport, Combatant, Dice, Volley, auto_select, capacity, combatants, destroy_units,
    resolve_selection, settle,
};
use crate::action::CombatError;
use crate::env::{GameEnv, OracleError, UnitStats};
use crate::state::{
    Battle, BattleTag, CombatStatus, Faction, FireStage, GameState, RoundRolls, TerritoryId,
    UnitId, UnitTraits,
};

/// Owned copy of the fields a volley needs, so the state can be mutated
/// while they are in use.
struct Front {
    territory: TerritoryId,
    attacker: Faction,
    attack_from: TerritoryId,
    tag: BattleTag,
    status: CombatStatus,
    amphibious: bool,
    hit_battleships: BTreeSet<UnitId>,
}

fn front(state: &GameState, index: usize, report: &CombatReport) -> Result<Front, CombatError> {
    let battle = state
        .battles
        .get(index)
        .ok_or_else(|| CombatError::UnknownBattle(report.key.clone()))?;
    let ordinary = battle
        .ordinary()
        .ok_or_else(|| CombatError::UnknownBattle(report.key.clone()))?;
    Ok(Front {
        territory: battle.territory.clone(),
        attacker: battle.attacker,
        attack_from: battle.attack_from.clone(),
        tag: battle.tag(),
        status: ordinary.status,
        amphibious: ordinary.is_amphibious(),
        hit_battleships: ordinary.hit_battleships.clone(),
    })
}

fn store(
    state: &mut GameState,
    index: usize,
    status: Option<CombatStatus>,
    hit_battleships: BTreeSet<UnitId>,
    rolls: Option<RoundRolls>,
) {
    if let Some(battle) = state.battles.get_mut(index).and_then(Battle::ordinary_mut) {
        if let Some(status) = status {
            battle.status = status;
        }
        battle.hit_battleships = hit_battleships;
        if let Some(rolls) = rolls {
            battle.last_rolls = rolls;
        }
    }
}

fn combat_values(
    units: &[Combatant],
    env: &GameEnv<'_>,
    value: fn(&UnitStats) -> u32,
) -> Result<Vec<u32>, OracleError> {
    units
        .iter()
        .map(|unit| env.unit_stats(unit.kind).map(|stats| value(&stats)))
        .collect()
}

fn any_with(units: &[Combatant], flag: UnitTraits) -> bool {
    units.iter().any(|unit| unit.kind.traits().contains(flag))
}

fn with_trait(units: &[Combatant], flag: UnitTraits) -> Vec<Combatant> {
    units
        .iter()
        .filter(|unit| unit.kind.traits().contains(flag))
        .copied()
        .collect()
}

fn sea_units(units: &[Combatant]) -> Vec<Combatant> {
    units.iter().filter(|unit| unit.kind.is_sea()).copied().collect()
}

pub(super) fn fire(
    state: &mut GameState,
    env: &GameEnv<'_>,
    index: usize,
    dice: &mut Dice<'_>,
    report: &mut CombatReport,
) -> Result<(), CombatError> {
    let status = front(state, index, report)?.status;
    match status {
        CombatStatus::Pending => {
            if opening_fire(state, env, index, dice, report)? {
                return Ok(());
            }
            report.outcome = settle(state, index)?;
            if report.outcome.is_some() {
                return Ok(());
            }
            main_round(state, env, index, 0, dice, report)
        }
        CombatStatus::InProgress { round } => main_round(state, env, index, round, dice, report),
        CombatStatus::AwaitingCasualties { .. } => {
            Err(CombatError::AwaitingCasualties(report.key.clone()))
        }
        CombatStatus::Resolved(_) => Err(CombatError::AlreadyResolved(report.key.clone())),
    }
}

/// Bombardment and submarine surprise strikes. Neither side answers the
/// other's opening shots. Returns true when the attacker now owes casualties.
fn opening_fire(
    state: &mut GameState,
    env: &GameEnv<'_>,
    index: usize,
    dice: &mut Dice<'_>,
    report: &mut CombatReport,
) -> Result<bool, CombatError> {
    let front = front(state, index, report)?;
    let (attackers, defenders) = combatants(state, front.territory.as_str(), front.attacker)?;

    let mut bombardment = Vec::new();
    let unopposed_landing = front.tag == BattleTag::Land
        && front.amphibious
        && state
            .battle(front.attack_from.as_str(), BattleTag::Naval)
            .is_none();
    if unopposed_landing {
        if let Some(origin) = state.territory(front.attack_from.as_str()) {
            bombardment = origin
                .units_of(front.attacker)
                .filter(|unit| unit.kind.traits().contains(UnitTraits::BOMBARD))
                .map(|unit| Combatant {
                    id: unit.id,
                    kind: unit.kind,
                })
                .collect();
            bombardment.sort_by_key(|unit| unit.id);
        }
    }

    let attacker_subs = if any_with(&defenders, UnitTraits::SUPPRESSES_SUBS) {
        Vec::new()
    } else {
        with_trait(&attackers, UnitTraits::SUBMERSIBLE)
    };
    let defender_subs = if any_with(&attackers, UnitTraits::SUPPRESSES_SUBS) {
        Vec::new()
    } else {
        with_trait(&defenders, UnitTraits::SUBMERSIBLE)
    };

    if bombardment.is_empty() && attacker_subs.is_empty() && defender_subs.is_empty() {
        return Ok(false);
    }

    let (mut attacker_rolls, bombard_hits) =
        dice.volley(&combat_values(&bombardment, env, |stats| stats.attack)?);
    let (sub_rolls, sub_hits) = dice.volley(&combat_values(&attacker_subs, env, |stats| stats.attack)?);
    let (defender_rolls, reply_hits) =
        dice.volley(&combat_values(&defender_subs, env, |stats| stats.defense)?);
    attacker_rolls.extend(sub_rolls);

    let mut hit_battleships = front.hit_battleships;
    let mut removed = auto_select(&defenders, bombard_hits, &mut hit_battleships, env)?;
    let exposed: Vec<Combatant> = sea_units(&defenders)
        .into_iter()
        .filter(|unit| !removed.contains(&unit.id))
        .collect();
    removed.extend(auto_select(&exposed, sub_hits, &mut hit_battleships, env)?);

    let attacker_ships = sea_units(&attackers);
    let mut owed = None;
    if reply_hits > 0 {
        if reply_hits >= capacity(&attacker_ships, &hit_battleships) {
            removed.extend(attacker_ships.iter().map(|unit| unit.id));
        } else {
            owed = Some(reply_hits);
        }
    }

    let status = owed.map(|hits| CombatStatus::AwaitingCasualties {
        round: 0,
        stage: FireStage::Opening,
        hits,
    });
    store(state, index, status, hit_battleships, None);
    destroy_units(state, &removed);

    tracing::debug!(
        key = %report.key,
        bombard_hits,
        sub_hits,
        reply_hits,
        removed = removed.len(),
        "opening fire"
    );
    report.opening = Some(Volley {
        attacker_rolls,
        defender_rolls,
        attacker_hits: bombard_hits + sub_hits,
        defender_hits: reply_hits,
    });
    report.removed.extend(removed);
    report.casualties_owed = owed;
    Ok(owed.is_some())
}

fn main_round(
    state: &mut GameState,
    env: &GameEnv<'_>,
    index: usize,
    round: u32,
    dice: &mut Dice<'_>,
    report: &mut CombatReport,
) -> Result<(), CombatError> {
    let front = front(state, index, report)?;
    let (attackers, defenders) = combatants(state, front.territory.as_str(), front.attacker)?;

    let (attacker_rolls, attacker_hits) =
        dice.volley(&combat_values(&attackers, env, |stats| stats.attack)?);
    let (defender_rolls, defender_hits) =
        dice.volley(&combat_values(&defenders, env, |stats| stats.defense)?);

    let mut hit_battleships = front.hit_battleships;
    let mut removed = auto_select(&defenders, attacker_hits, &mut hit_battleships, env)?;

    let status = if defender_hits == 0 {
        CombatStatus::InProgress { round: round + 1 }
    } else if defender_hits >= capacity(&attackers, &hit_battleships) {
        removed.extend(attackers.iter().map(|unit| unit.id));
        CombatStatus::InProgress { round: round + 1 }
    } else {
        CombatStatus::AwaitingCasualties {
            round,
            stage: FireStage::Main,
            hits: defender_hits,
        }
    };

    let rolls = RoundRolls {
        attacker: attacker_rolls.clone(),
        defender: defender_rolls.clone(),
    };
    store(state, index, Some(status), hit_battleships, Some(rolls));
    destroy_units(state, &removed);

    tracing::debug!(
        key = %report.key,
        round = round + 1,
        attacker_hits,
        defender_hits,
        removed = removed.len(),
        "combat round fired"
    );
    report.main = Some(Volley {
        attacker_rolls,
        defender_rolls,
        attacker_hits,
        defender_hits,
    });
    report.removed.extend(removed);

    match status {
        CombatStatus::AwaitingCasualties { hits, .. } => report.casualties_owed = Some(hits),
        _ => report.outcome = settle(state, index)?,
    }
    Ok(())
}

pub(super) fn select(
    state: &mut GameState,
    index: usize,
    selection: &[UnitId],
    report: &mut CombatReport,
) -> Result<(), CombatError> {
    let front = front(state, index, report)?;
    let CombatStatus::AwaitingCasualties { round, stage, hits } = front.status else {
        return Err(CombatError::NotAwaitingCasualties(report.key.clone()));
    };

    let (attackers, _) = combatants(state, front.territory.as_str(), front.attacker)?;
    let eligible = match stage {
        FireStage::Opening => sea_units(&attackers),
        FireStage::Main => attackers,
    };

    let mut hit_battleships = front.hit_battleships;
    let removed = resolve_selection(selection, hits, &eligible, &mut hit_battleships)?;
    let next = match stage {
        FireStage::Opening => CombatStatus::InProgress { round },
        FireStage::Main => CombatStatus::InProgress { round: round + 1 },
    };
    store(state, index, Some(next), hit_battleships, None);
    destroy_units(state, &removed);

    tracing::debug!(key = %report.key, %stage, removed = ?removed, "casualties selected");
    report.removed = removed;
    report.outcome = settle(state, index)?;
    Ok(())
}
