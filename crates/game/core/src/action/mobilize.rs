//! Placing purchased items on the map.

use std::collections::BTreeMap;

use super::error::ProductionError;
use super::transition::{CommandTransition, acting_faction};
use crate::config::GameConfig;
use crate::env::{GameEnv, TerritoryInfo};
use crate::state::{
    Faction, GameState, ProductionItem, StateError, TerritoryId, TerritoryState, UnitId,
    UnitKind, UnitTraits,
};

/// Places queued items into one territory.
///
/// Land units need a controlled factory in the territory itself. Sea units
/// go into an ocean bordering a controlled factory. Air units may use
/// either a factory territory or free carrier space in an ocean, counting
/// carriers placed in the same batch. An industrial complex is built on
/// controlled land that has none.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobilizeUnits {
    pub territory: TerritoryId,
    pub items: Vec<ProductionItem>,
}

impl MobilizeUnits {
    pub fn new(territory: impl Into<TerritoryId>, items: Vec<ProductionItem>) -> Self {
        Self {
            territory: territory.into(),
            items,
        }
    }
}

fn borders_factory(state: &GameState, faction: Faction, info: &TerritoryInfo) -> bool {
    info.neighbors.iter().any(|neighbor| {
        state
            .territory(neighbor.as_str())
            .is_some_and(|territory| territory.is_controlled_by(faction) && territory.has_factory)
    })
}

fn carrier_slots(territory: &TerritoryState, faction: Faction) -> usize {
    territory
        .units_of(faction)
        .filter(|unit| unit.kind.traits().contains(UnitTraits::CARRIES_AIR))
        .map(|unit| unit.free_cargo_slots())
        .sum()
}

impl MobilizeUnits {
    fn wrong_terrain(&self, item: ProductionItem) -> ProductionError {
        ProductionError::WrongTerrain {
            item,
            territory: self.territory.clone(),
        }
    }

    fn check_factory_site(
        &self,
        territory: &TerritoryState,
        faction: Faction,
    ) -> Result<(), ProductionError> {
        if !territory.is_controlled_by(faction) {
            return Err(ProductionError::NotControlled(self.territory.clone()));
        }
        if !territory.has_factory {
            return Err(ProductionError::NoFactory(self.territory.clone()));
        }
        Ok(())
    }
}

impl CommandTransition for MobilizeUnits {
    type Error = ProductionError;
    type Output = Vec<UnitId>;

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        if self.items.is_empty() {
            return Err(ProductionError::EmptySelection);
        }
        let player = state
            .player(faction)
            .ok_or(ProductionError::UnknownPlayer { faction })?;

        let mut wanted: BTreeMap<ProductionItem, usize> = BTreeMap::new();
        for item in &self.items {
            *wanted.entry(*item).or_insert(0) += 1;
        }
        for (item, count) in &wanted {
            if player.pending_count(*item) < *count {
                return Err(ProductionError::NotPurchased(*item));
            }
        }

        let info = env.territory(self.territory.as_str())?;
        let territory = state
            .territory(self.territory.as_str())
            .ok_or_else(|| StateError::MissingTerritory(self.territory.clone()))?;

        let mut carrier_space = if info.is_ocean {
            carrier_slots(territory, faction)
        } else {
            0
        };
        let mut air_at_sea = 0;

        for item in &self.items {
            let kind = match item {
                ProductionItem::IndustrialComplex => {
                    if !info.is_land() {
                        return Err(self.wrong_terrain(*item));
                    }
                    if !territory.is_controlled_by(faction) {
                        return Err(ProductionError::NotControlled(self.territory.clone()));
                    }
                    if territory.has_factory || wanted.get(item).is_some_and(|count| *count > 1) {
                        return Err(ProductionError::FactoryAlreadyPresent(
                            self.territory.clone(),
                        ));
                    }
                    continue;
                }
                ProductionItem::Unit(kind) => *kind,
            };

            if kind.is_land() {
                if info.is_ocean {
                    return Err(self.wrong_terrain(*item));
                }
                self.check_factory_site(territory, faction)?;
            } else if kind.is_sea() {
                if !info.is_ocean {
                    return Err(self.wrong_terrain(*item));
                }
                if !borders_factory(state, faction, info) {
                    return Err(ProductionError::NoAdjacentFactory(self.territory.clone()));
                }
                if kind.traits().contains(UnitTraits::CARRIES_AIR) {
                    carrier_space += GameConfig::MAX_CARGO;
                }
            } else if info.is_ocean {
                air_at_sea += 1;
            } else {
                self.check_factory_site(territory, faction)?;
            }
        }

        if air_at_sea > carrier_space {
            return Err(ProductionError::NoCarrierCapacity(self.territory.clone()));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        let faction = acting_faction(state)?;
        let player = state
            .player_mut(faction)
            .ok_or(ProductionError::UnknownPlayer { faction })?;
        for item in &self.items {
            if !player.take_pending(*item) {
                return Err(ProductionError::NotPurchased(*item));
            }
        }

        // Ships first so air units placed at sea find their carriers.
        let mut ordered: Vec<ProductionItem> = self.items.clone();
        ordered.sort_by_key(|item| match item {
            ProductionItem::Unit(kind) if kind.is_sea() => 0,
            ProductionItem::Unit(kind) if kind.is_air() => 2,
            _ => 1,
        });

        let at_sea = env.territory(self.territory.as_str())?.is_ocean;
        let mut placed = Vec::new();
        for item in ordered {
            let ProductionItem::Unit(kind) = item else {
                state
                    .territory_mut(self.territory.as_str())
                    .ok_or_else(|| StateError::MissingTerritory(self.territory.clone()))?
                    .has_factory = true;
                continue;
            };
            let movement = env.base_movement(kind)?;
            let id = if at_sea && kind.is_air() {
                embark_on_carrier(state, &self.territory, faction, kind, movement)?
            } else {
                state.spawn_unit(&self.territory, faction, kind, movement)?
            };
            placed.push(id);
        }

        tracing::debug!(
            faction = %faction,
            territory = %self.territory,
            items = self.items.len(),
            units = placed.len(),
            "units mobilized"
        );
        Ok(placed)
    }
}

/// Creates an air unit directly aboard a carrier with a free slot.
fn embark_on_carrier(
    state: &mut GameState,
    territory: &TerritoryId,
    faction: Faction,
    kind: UnitKind,
    movement: u32,
) -> Result<UnitId, ProductionError> {
    let id = state.allocate_unit_id()?;
    let carrier = state
        .territory_mut(territory.as_str())
        .ok_or_else(|| StateError::MissingTerritory(territory.clone()))?
        .units
        .iter_mut()
        .find(|unit| unit.faction == faction && unit.can_embark(kind))
        .ok_or_else(|| ProductionError::NoCarrierCapacity(territory.clone()))?;
    carrier
        .cargo
        .try_push(crate::state::Passenger {
            id,
            faction,
            kind,
            movement,
        })
        .map_err(|_| ProductionError::NoCarrierCapacity(territory.clone()))?;
    Ok(id)
}
