//! Casualty selection.
//!
//! Defenders lose their cheapest units first. Attackers pick their own
//! casualties. Either way a battleship only goes down on its second hit.

use std::collections::{BTreeMap, BTreeSet};

use crate::action::CombatError;
use crate::env::{GameEnv, OracleError};
use crate::state::{UnitId, UnitKind, UnitTraits};

/// A unit taking part in a volley.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Combatant {
    pub id: UnitId,
    pub kind: UnitKind,
}

impl Combatant {
    fn is_two_hit(&self) -> bool {
        self.kind.traits().contains(UnitTraits::TWO_HIT)
    }
}

/// Number of hits `units` can take before all of them are gone.
pub fn capacity(units: &[Combatant], hit_battleships: &BTreeSet<UnitId>) -> u32 {
    units
        .iter()
        .map(|unit| {
            if unit.is_two_hit() && !hit_battleships.contains(&unit.id) {
                2
            } else {
                1
            }
        })
        .sum()
}

/// Picks defender casualties for `hits`, cheapest first.
///
/// Submarines and transports go last among units of equal cost. A battleship
/// reached by a hit for the first time is marked in `hit_battleships` and
/// stays; a later hit removes it. Returns the removed units.
pub fn auto_select(
    units: &[Combatant],
    hits: u32,
    hit_battleships: &mut BTreeSet<UnitId>,
    env: &GameEnv<'_>,
) -> Result<Vec<UnitId>, OracleError> {
    let mut ordered = Vec::with_capacity(units.len());
    for unit in units {
        let cost = env.unit_stats(unit.kind)?.cost;
        let tie_rank = u8::from(matches!(unit.kind, UnitKind::Submarine | UnitKind::Transport));
        ordered.push((cost, tie_rank, unit.id, *unit));
    }
    ordered.sort_by_key(|(cost, tie_rank, id, _)| (*cost, *tie_rank, *id));

    let mut removed = Vec::new();
    for _ in 0..hits {
        let Some((_, _, _, first)) = ordered.first().copied() else {
            break;
        };
        if first.is_two_hit() && hit_battleships.insert(first.id) {
            continue;
        }
        ordered.remove(0);
        hit_battleships.remove(&first.id);
        removed.push(first.id);
    }
    Ok(removed)
}

/// Validates an attacker's casualty pick and applies the battleship rule.
///
/// `selection` must contain exactly `hits` entries drawn from `eligible`. A
/// battleship may be listed twice when it has not been hit yet (first entry
/// marks it, second sinks it); every other unit at most once.
pub fn resolve_selection(
    selection: &[UnitId],
    hits: u32,
    eligible: &[Combatant],
    hit_battleships: &mut BTreeSet<UnitId>,
) -> Result<Vec<UnitId>, CombatError> {
    if selection.len() as u32 != hits {
        return Err(CombatError::WrongCasualtyCount {
            expected: hits,
            selected: selection.len() as u32,
        });
    }

    let mut counts: BTreeMap<UnitId, u32> = BTreeMap::new();
    for id in selection {
        let unit = eligible
            .iter()
            .find(|unit| unit.id == *id)
            .ok_or(CombatError::InvalidCasualty(*id))?;
        let count = counts.entry(*id).or_insert(0);
        *count += 1;
        let limit = if unit.is_two_hit() && !hit_battleships.contains(id) {
            2
        } else {
            1
        };
        if *count > limit {
            return Err(CombatError::InvalidCasualty(*id));
        }
    }

    let mut removed = Vec::new();
    for id in selection {
        let two_hit = eligible
            .iter()
            .any(|unit| unit.id == *id && unit.is_two_hit());
        if two_hit && hit_battleships.insert(*id) {
            continue;
        }
        hit_battleships.remove(id);
        removed.push(*id);
    }
    Ok(removed)
}
