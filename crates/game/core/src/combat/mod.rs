//! Battle resolution.
//!
//! A battle moves through `Pending → opening fire → main rounds →
//! casualty selection → … → Resolved`. The command layer validates who may
//! act and when; the functions here perform the dice work and bookkeeping on
//! an already-validated battle.
//!
//! # Core Functions
//!
//! - [`fire`]: opening fire and one main round, or an anti-aircraft volley
//! - [`select_casualties`]: applies the attacker's casualty pick
//! - [`retreat`]: pulls the attacker back to where it came from
//! - [`capture_territory`]: ownership change plus anti-aircraft conversion

mod anti_aircraft;
pub mod casualty;
pub mod hit;
mod resolution;
mod retreat;
mod round;

pub use casualty::{Combatant, auto_select, capacity, resolve_selection};
pub use hit::{Dice, check_hit};
pub use resolution::{capture_territory, settle};
pub use retreat::{RetreatReport, retreat};

use crate::action::CombatError;
use crate::env::GameEnv;
use crate::state::{
    Battle, BattleKey, BattleKind, BattleOutcome, BattleTag, Faction, GameState, StateError,
    TerritoryId, UnitId, UnitTraits,
};

/// What a fire command produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatReport {
    pub key: BattleKey,
    /// Opening fire dice, when any were thrown.
    pub opening: Option<Volley>,
    /// Main round (or anti-aircraft) dice, when a round was fought.
    pub main: Option<Volley>,
    /// Units removed by this command.
    pub removed: Vec<UnitId>,
    /// Hits the attacker must now assign through casualty selection.
    pub casualties_owed: Option<u32>,
    pub outcome: Option<BattleOutcome>,
}

impl CombatReport {
    fn new(key: BattleKey) -> Self {
        Self {
            key,
            opening: None,
            main: None,
            removed: Vec::new(),
            casualties_owed: None,
            outcome: None,
        }
    }
}

/// Dice and hits of both sides in one volley.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Volley {
    pub attacker_rolls: Vec<u32>,
    pub defender_rolls: Vec<u32>,
    pub attacker_hits: u32,
    pub defender_hits: u32,
}

/// Units fighting for `territory`: the attacker's own units and every unit
/// hostile to it, anti-aircraft guns excluded on both sides. Both lists are
/// ordered by id so dice are assigned deterministically.
pub fn combatants(
    state: &GameState,
    territory: &str,
    attacker: Faction,
) -> Result<(Vec<Combatant>, Vec<Combatant>), StateError> {
    let contested = state
        .territory(territory)
        .ok_or_else(|| StateError::MissingTerritory(TerritoryId::from(territory)))?;

    let mut attackers = Vec::new();
    let mut defenders = Vec::new();
    for unit in contested.units.iter().filter(|unit| !unit.kind.is_anti_aircraft()) {
        let combatant = Combatant {
            id: unit.id,
            kind: unit.kind,
        };
        if unit.faction == attacker {
            attackers.push(combatant);
        } else if unit.faction.is_hostile_to(attacker) {
            defenders.push(combatant);
        }
    }
    attackers.sort_by_key(|unit| unit.id);
    defenders.sort_by_key(|unit| unit.id);
    Ok((attackers, defenders))
}

/// Removes units from the game. Carriers take their cargo down with them.
/// Every battle forgets the removed ids, and a sunk transport strands
/// whatever it already put ashore.
pub fn destroy_units(state: &mut GameState, ids: &[UnitId]) {
    for id in ids {
        let location = state.find_unit(*id).map(|(territory, _)| territory.clone());
        let Some(unit) = state.remove_unit(*id) else {
            continue;
        };
        tracing::debug!(unit = %unit.id, kind = %unit.kind, faction = %unit.faction, cargo = unit.cargo.len(), "unit destroyed");
        let Some(sea) = location.filter(|_| unit.kind.traits().contains(UnitTraits::CARRIES_LAND))
        else {
            continue;
        };
        if let Some(battle) = state
            .find_amphibious_assault(sea.as_str(), unit.id)
            .and_then(Battle::ordinary_mut)
        {
            battle.strand(unit.id);
            tracing::debug!(transport = %unit.id, sea = %sea, "landing stranded");
        }
    }
    for battle in state.battles.iter_mut() {
        match &mut battle.kind {
            BattleKind::Land(ordinary) | BattleKind::Naval(ordinary) => {
                for id in ids {
                    ordinary.hit_battleships.remove(id);
                }
            }
            BattleKind::AntiAircraft(fire) => {
                fire.air_units.retain(|unit| !ids.contains(&unit.id));
            }
        }
    }
}

pub(crate) fn battle_index(state: &GameState, key: &BattleKey) -> Result<usize, CombatError> {
    state
        .battles
        .iter()
        .position(|battle| battle.matches(key.territory.as_str(), key.tag))
        .ok_or_else(|| CombatError::UnknownBattle(key.clone()))
}

/// Fires the next volley of the battle at `key`.
pub fn fire(
    state: &mut GameState,
    env: &GameEnv<'_>,
    key: &BattleKey,
) -> Result<CombatReport, CombatError> {
    let index = battle_index(state, key)?;
    let attacker = state.battles[index].attacker;
    let mut dice = Dice::new(state, env, attacker)?;
    let mut report = CombatReport::new(key.clone());
    match key.tag {
        BattleTag::AntiAircraft => anti_aircraft::fire(state, env, index, &mut dice, &mut report)?,
        BattleTag::Land | BattleTag::Naval => {
            round::fire(state, env, index, &mut dice, &mut report)?
        }
    }
    Ok(report)
}

/// Applies the attacker's casualty pick for the battle at `key`.
pub fn select_casualties(
    state: &mut GameState,
    key: &BattleKey,
    selection: &[UnitId],
) -> Result<CombatReport, CombatError> {
    let index = battle_index(state, key)?;
    let mut report = CombatReport::new(key.clone());
    match key.tag {
        BattleTag::AntiAircraft => anti_aircraft::select(state, index, selection, &mut report)?,
        BattleTag::Land | BattleTag::Naval => round::select(state, index, selection, &mut report)?,
    }
    Ok(report)
}
