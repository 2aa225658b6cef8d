//! Authoritative world state.
//!
//! This module owns the data structures describing territories, units,
//! battles, the per-faction economy and the turn clock. Callers clone or
//! query this state but mutate it exclusively through the engine.
mod error;
mod invariants;
pub mod types;

use std::collections::{BTreeMap, BTreeSet};

pub use error::StateError;
pub use types::{
    AaFireBattle, AaStatus, Alliance, Battle, BattleKey, BattleKind, BattleOutcome, BattleTag,
    Cargo, CombatStatus, Faction, FireStage, Landing, OrdinaryBattle, Passenger, Phase,
    PlayerState, ProductionItem, RoundRolls, TerritoryId, TerritoryState, TurnState, Unit, UnitId,
    UnitKind, UnitTraits,
};

use crate::env::{ConfigOracle, Env, RngOracle, TerritoryOracle, UnitOracle};

/// Where a unit currently is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitLocation {
    /// On the map, directly in a territory.
    Territory(TerritoryId),
    /// Riding inside `carrier` in `territory`.
    Cargo {
        territory: TerritoryId,
        carrier: UnitId,
    },
}

impl UnitLocation {
    pub fn territory(&self) -> &TerritoryId {
        match self {
            UnitLocation::Territory(territory) | UnitLocation::Cargo { territory, .. } => territory,
        }
    }
}

/// Canonical snapshot of the world.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Base dice seed, set once at game creation.
    pub game_seed: u64,

    /// Sequential unit id allocator. Ids are never reused.
    next_unit_id: u32,

    pub turn: TurnState,

    pub territories: BTreeMap<TerritoryId, TerritoryState>,

    /// Battles declared this turn. Resolved ones stay until the turn ends.
    pub battles: Vec<Battle>,

    pub players: BTreeMap<Faction, PlayerState>,

    /// Anti-aircraft guns that fired this turn.
    pub fired_anti_aircraft: BTreeSet<UnitId>,

    /// World as it was when the current movement phase began.
    #[cfg_attr(feature = "serde", serde(default))]
    pub phase_checkpoint: Option<Box<GameState>>,
}

impl GameState {
    pub fn new(
        game_seed: u64,
        turn: TurnState,
        territories: BTreeMap<TerritoryId, TerritoryState>,
        players: BTreeMap<Faction, PlayerState>,
    ) -> Self {
        let next_unit_id = territories
            .values()
            .flat_map(|territory| territory.units.iter())
            .flat_map(|unit| std::iter::once(unit.id).chain(unit.cargo.iter().map(|p| p.id)))
            .map(|id| id.0 + 1)
            .max()
            .unwrap_or(1);

        Self {
            game_seed,
            next_unit_id,
            turn,
            territories,
            battles: Vec::new(),
            players,
            fired_anti_aircraft: BTreeSet::new(),
            phase_checkpoint: None,
        }
    }

    /// Empty world with every faction active and no territories.
    pub fn empty() -> Self {
        let players = Faction::ALL
            .into_iter()
            .map(|faction| (faction, PlayerState::new(faction, 0)))
            .collect();
        Self::new(0, TurnState::default(), BTreeMap::new(), players)
    }

    /// Materializes the opening position described by the reference data.
    ///
    /// Every territory gets its starting controller, factory flag and garrison;
    /// units receive fresh ids and full movement.
    pub fn new_game<T, U, C, R>(env: &Env<'_, T, U, C, R>) -> Result<Self, StateError>
    where
        T: TerritoryOracle + ?Sized,
        U: UnitOracle + ?Sized,
        C: ConfigOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let oracle = env.territories()?;
        let config = env.config()?;

        let mut state = Self::empty();
        state.game_seed = config.game_seed();
        for faction in Faction::ALL {
            if let Some(player) = state.players.get_mut(&faction) {
                player.ipcs = config.starting_ipcs(faction);
            }
        }

        for name in oracle.names() {
            let info = env.territory(name.as_str())?;
            state.territories.insert(
                name.clone(),
                TerritoryState::new(info.controller, info.has_factory),
            );
            for group in &info.garrison {
                let movement = env.base_movement(group.kind)?;
                for _ in 0..group.count {
                    state.spawn_unit(&name, group.faction, group.kind, movement)?;
                }
            }
        }

        tracing::info!(
            territories = state.territories.len(),
            units = state.unit_count(),
            "new game created"
        );
        Ok(state)
    }

    /// Allocates a new unit id.
    pub fn allocate_unit_id(&mut self) -> Result<UnitId, StateError> {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id = self
            .next_unit_id
            .checked_add(1)
            .ok_or(StateError::UnitIdOverflow)?;
        Ok(id)
    }

    /// Creates a unit in `territory` and returns its id.
    pub fn spawn_unit(
        &mut self,
        territory: &TerritoryId,
        faction: Faction,
        kind: UnitKind,
        movement: u32,
    ) -> Result<UnitId, StateError> {
        let id = self.allocate_unit_id()?;
        let target = self
            .territories
            .get_mut(territory)
            .ok_or_else(|| StateError::MissingTerritory(territory.clone()))?;
        target.units.push(Unit::new(id, faction, kind, movement));
        Ok(id)
    }

    pub fn current_faction(&self) -> Option<Faction> {
        self.turn.current_faction()
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    pub fn territory(&self, name: &str) -> Option<&TerritoryState> {
        self.territories.get(name)
    }

    pub fn territory_mut(&mut self, name: &str) -> Option<&mut TerritoryState> {
        self.territories.get_mut(name)
    }

    pub fn player(&self, faction: Faction) -> Option<&PlayerState> {
        self.players.get(&faction)
    }

    pub fn player_mut(&mut self, faction: Faction) -> Option<&mut PlayerState> {
        self.players.get_mut(&faction)
    }

    /// Finds a unit standing directly in a territory (cargo excluded).
    pub fn find_unit(&self, id: UnitId) -> Option<(&TerritoryId, &Unit)> {
        self.territories.iter().find_map(|(name, territory)| {
            territory.unit(id).map(|unit| (name, unit))
        })
    }

    /// Locates a unit anywhere, including inside carriers.
    pub fn locate_unit(&self, id: UnitId) -> Option<UnitLocation> {
        for (name, territory) in &self.territories {
            for unit in &territory.units {
                if unit.id == id {
                    return Some(UnitLocation::Territory(name.clone()));
                }
                if unit.cargo.iter().any(|passenger| passenger.id == id) {
                    return Some(UnitLocation::Cargo {
                        territory: name.clone(),
                        carrier: unit.id,
                    });
                }
            }
        }
        None
    }

    pub fn unit_exists(&self, id: UnitId) -> bool {
        self.locate_unit(id).is_some()
    }

    /// Removes a unit from wherever it is. Cargo of a removed carrier goes with it.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        for territory in self.territories.values_mut() {
            if let Some(unit) = territory.take_unit(id) {
                return Some(unit);
            }
            for carrier in territory.units.iter_mut() {
                if let Some(index) = carrier.cargo.iter().position(|p| p.id == id) {
                    return Some(carrier.cargo.remove(index).into_unit());
                }
            }
        }
        None
    }

    /// Total units on the map, cargo included.
    pub fn unit_count(&self) -> usize {
        self.territories.values().map(TerritoryState::unit_count).sum()
    }

    pub fn controlled_territories(&self, faction: Faction) -> Vec<&TerritoryId> {
        self.territories
            .iter()
            .filter(|(_, territory)| territory.is_controlled_by(faction))
            .map(|(name, _)| name)
            .collect()
    }

    pub fn factory_count(&self, faction: Faction) -> usize {
        self.territories
            .values()
            .filter(|territory| territory.is_controlled_by(faction) && territory.has_factory)
            .count()
    }

    /// Sum of the income values of every territory `faction` controls.
    pub fn income_for<T>(&self, faction: Faction, oracle: &T) -> u32
    where
        T: TerritoryOracle + ?Sized,
    {
        self.territories
            .iter()
            .filter(|(_, territory)| territory.is_controlled_by(faction))
            .filter_map(|(name, _)| oracle.territory(name.as_str()))
            .map(|info| info.power)
            .sum()
    }

    pub fn controls_capital<T>(&self, faction: Faction, oracle: &T) -> bool
    where
        T: TerritoryOracle + ?Sized,
    {
        oracle
            .capital_of(faction)
            .and_then(|capital| self.territory(capital.as_str()))
            .is_some_and(|territory| territory.is_controlled_by(faction))
    }

    pub fn battle(&self, territory: &str, tag: BattleTag) -> Option<&Battle> {
        self.battles
            .iter()
            .find(|battle| battle.matches(territory, tag))
    }

    pub fn battle_mut(&mut self, territory: &str, tag: BattleTag) -> Option<&mut Battle> {
        self.battles
            .iter_mut()
            .find(|battle| battle.matches(territory, tag))
    }

    /// Unresolved land battle that `transport` unloaded into from the sea
    /// zone `sea`.
    pub fn find_amphibious_assault(&mut self, sea: &str, transport: UnitId) -> Option<&mut Battle> {
        self.battles.iter_mut().find(|battle| {
            battle.tag() == BattleTag::Land
                && battle.attack_from.as_str() == sea
                && !battle.is_resolved()
                && battle.ordinary().is_some_and(|land| {
                    land.landings
                        .iter()
                        .any(|landing| landing.transport == transport)
                })
        })
    }

    /// Copy of this state without its own checkpoint, suitable for storing
    /// as a checkpoint.
    pub fn checkpoint(&self) -> GameState {
        let mut copy = self.clone();
        copy.phase_checkpoint = None;
        copy
    }

    /// SHA-256 over the bincode encoding of this state.
    ///
    /// The persistence collaborator compares hashes for optimistic
    /// compare-and-swap between load and store.
    #[cfg(feature = "serde")]
    pub fn state_hash(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hasher.finalize().into())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> GameState {
        let mut state = GameState::empty();
        state
            .territories
            .insert(TerritoryId::new("sea"), TerritoryState::new(None, false));
        state
    }

    #[test]
    fn unit_ids_continue_after_the_highest_existing_id() {
        let mut sea = TerritoryState::new(None, false);
        let mut carrier = Unit::new(UnitId(4), Faction::UnitedStates, UnitKind::AircraftCarrier, 2);
        carrier.cargo.push(Passenger {
            id: UnitId(9),
            faction: Faction::UnitedStates,
            kind: UnitKind::Fighter,
            movement: 4,
        });
        sea.units.push(carrier);
        let territories = BTreeMap::from([(TerritoryId::new("sea"), sea)]);

        let mut state = GameState::new(0, TurnState::default(), territories, BTreeMap::new());
        assert_eq!(state.allocate_unit_id(), Ok(UnitId(10)));
    }

    #[test]
    fn cargo_is_located_and_removed_through_its_carrier() {
        let mut state = world();
        let sea = TerritoryId::new("sea");
        let carrier = state
            .spawn_unit(&sea, Faction::UnitedStates, UnitKind::AircraftCarrier, 2)
            .expect("spawn");
        let fighter = state.allocate_unit_id().expect("id");
        state
            .territory_mut("sea")
            .and_then(|territory| territory.unit_mut(carrier))
            .expect("carrier")
            .cargo
            .push(Passenger {
                id: fighter,
                faction: Faction::UnitedStates,
                kind: UnitKind::Fighter,
                movement: 4,
            });

        assert_eq!(
            state.locate_unit(fighter),
            Some(UnitLocation::Cargo {
                territory: sea.clone(),
                carrier,
            })
        );
        assert!(state.find_unit(fighter).is_none());
        assert_eq!(state.unit_count(), 2);

        let removed = state.remove_unit(fighter).expect("removed");
        assert_eq!(removed.kind, UnitKind::Fighter);
        assert!(!state.unit_exists(fighter));
        assert_eq!(state.unit_count(), 1);
    }

    #[test]
    fn checkpoints_do_not_nest() {
        let mut state = world();
        state.phase_checkpoint = Some(Box::new(state.checkpoint()));
        let checkpoint = state.checkpoint();
        assert!(checkpoint.phase_checkpoint.is_none());
    }
}
