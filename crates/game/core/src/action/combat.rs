//! Combat-phase commands.

use super::error::CombatError;
use super::transition::{CommandTransition, acting_faction};
use crate::combat::{self, CombatReport, RetreatReport};
use crate::env::GameEnv;
use crate::state::{Battle, BattleKey, BattleTag, Faction, GameState, TerritoryId, UnitId};

/// Fires the next volley of a declared battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireCombatRound {
    pub territory: TerritoryId,
    pub kind: BattleTag,
}

impl FireCombatRound {
    pub fn new(territory: impl Into<TerritoryId>, kind: BattleTag) -> Self {
        Self {
            territory: territory.into(),
            kind,
        }
    }

    pub fn key(&self) -> BattleKey {
        BattleKey::new(self.territory.clone(), self.kind)
    }
}

/// Names the attacker's casualties for the hits it owes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectCasualties {
    pub territory: TerritoryId,
    pub kind: BattleTag,
    /// A battleship that has not been hit yet may appear twice.
    pub units: Vec<UnitId>,
}

impl SelectCasualties {
    pub fn new(territory: impl Into<TerritoryId>, kind: BattleTag, units: Vec<UnitId>) -> Self {
        Self {
            territory: territory.into(),
            kind,
            units,
        }
    }

    pub fn key(&self) -> BattleKey {
        BattleKey::new(self.territory.clone(), self.kind)
    }
}

/// Withdraws from the land or naval battle in `territory`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Retreat {
    pub territory: TerritoryId,
}

impl Retreat {
    pub fn new(territory: impl Into<TerritoryId>) -> Self {
        Self {
            territory: territory.into(),
        }
    }

    fn key(&self, env: &GameEnv<'_>) -> Result<BattleKey, CombatError> {
        let tag = if env.territory(self.territory.as_str())?.is_ocean {
            BattleTag::Naval
        } else {
            BattleTag::Land
        };
        Ok(BattleKey::new(self.territory.clone(), tag))
    }
}

/// The battle at `key`, provided `faction` declared it.
fn own_battle<'s>(
    state: &'s GameState,
    faction: Faction,
    key: &BattleKey,
) -> Result<&'s Battle, CombatError> {
    let battle = state
        .battle(key.territory.as_str(), key.tag)
        .ok_or_else(|| CombatError::UnknownBattle(key.clone()))?;
    if battle.attacker != faction {
        return Err(CombatError::NotAttacker {
            key: key.clone(),
            attacker: battle.attacker,
        });
    }
    Ok(battle)
}

/// Ordering rules between battles: casualty selection is global and
/// blocking, each faction resolves one battle at a time, and a landing
/// waits for the anti-aircraft fire over it and the sea battle it sails from.
fn check_turn_order(
    state: &GameState,
    faction: Faction,
    battle: &Battle,
) -> Result<(), CombatError> {
    let key = battle.key();
    for other in state.battles.iter().filter(|other| other.key() != key) {
        if other.is_awaiting_casualties() {
            return Err(CombatError::OtherBattleAwaitingCasualties(other.key()));
        }
        if other.attacker == faction && other.is_in_resolution() {
            return Err(CombatError::OtherBattleInProgress(other.key()));
        }
    }

    if key.tag == BattleTag::Land {
        let blockers = [
            (battle.territory.as_str(), BattleTag::AntiAircraft),
            (battle.attack_from.as_str(), BattleTag::Naval),
        ];
        for (territory, tag) in blockers {
            if let Some(blocker) = state.battle(territory, tag) {
                if !blocker.is_resolved() {
                    return Err(CombatError::BlockedBy(blocker.key()));
                }
            }
        }
    }
    Ok(())
}

impl CommandTransition for FireCombatRound {
    type Error = CombatError;
    type Output = CombatReport;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        let key = self.key();
        let battle = own_battle(state, faction, &key)?;
        if battle.is_resolved() {
            return Err(CombatError::AlreadyResolved(key));
        }
        if battle.is_awaiting_casualties() {
            return Err(CombatError::AwaitingCasualties(key));
        }
        check_turn_order(state, faction, battle)
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        let report = combat::fire(state, env, &self.key())?;
        if let Some(outcome) = report.outcome {
            tracing::info!(key = %report.key, %outcome, "battle decided");
        }
        Ok(report)
    }
}

impl CommandTransition for SelectCasualties {
    type Error = CombatError;
    type Output = CombatReport;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        let key = self.key();
        let battle = own_battle(state, faction, &key)?;
        if !battle.is_awaiting_casualties() {
            return Err(CombatError::NotAwaitingCasualties(key));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        combat::select_casualties(state, &self.key(), &self.units)
    }
}

impl CommandTransition for Retreat {
    type Error = CombatError;
    type Output = RetreatReport;

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        let key = self.key(env)?;
        own_battle(state, faction, &key)?;
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        combat::retreat(state, env, &self.key(env)?)
    }
}
