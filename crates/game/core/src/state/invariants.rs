use std::collections::BTreeSet;

use super::{GameState, StateError, UnitKind};
use crate::env::UnitOracle;

impl GameState {
    /// Verifies the structural invariants every accepted command must keep.
    ///
    /// - unit ids are unique across the map and all cargo
    /// - carriers hold a legal cargo load
    /// - remaining movement never exceeds the type's allowance
    /// - at most one battle game-wide awaits casualty selection
    pub fn verify_invariants<U>(&self, units: &U) -> Result<(), StateError>
    where
        U: UnitOracle + ?Sized,
    {
        let mut seen = BTreeSet::new();
        let allowance = |kind: UnitKind| {
            units
                .stats(kind)
                .map(|stats| stats.movement)
                .ok_or(crate::env::OracleError::MissingUnitStats(kind))
        };

        for territory in self.territories.values() {
            for unit in &territory.units {
                if !seen.insert(unit.id) {
                    return Err(StateError::DuplicateUnit { unit: unit.id });
                }
                let limit = allowance(unit.kind)?;
                if unit.movement > limit {
                    return Err(StateError::MovementAboveAllowance {
                        unit: unit.id,
                        movement: unit.movement,
                        allowance: limit,
                    });
                }

                let kinds: Vec<UnitKind> = unit.cargo_kinds().collect();
                if !unit.kind.accepts_cargo(&kinds) {
                    return Err(StateError::IllegalCargo {
                        carrier: unit.id,
                        kind: unit.kind,
                    });
                }
                for passenger in &unit.cargo {
                    if !seen.insert(passenger.id) {
                        return Err(StateError::DuplicateUnit { unit: passenger.id });
                    }
                }
            }
        }

        let awaiting = self
            .battles
            .iter()
            .filter(|battle| battle.is_awaiting_casualties())
            .count();
        if awaiting > 1 {
            return Err(StateError::ConcurrentCasualtySelection);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::env::{SnapshotUnitOracle, UnitStats};
    use crate::state::{Faction, Passenger, TerritoryId, TerritoryState, TurnState, Unit, UnitId};

    fn units() -> SnapshotUnitOracle {
        SnapshotUnitOracle::new(
            [
                (UnitKind::Infantry, UnitStats::new(3, 1, 2, 1)),
                (UnitKind::Tank, UnitStats::new(5, 3, 3, 2)),
                (UnitKind::Transport, UnitStats::new(7, 0, 1, 2)),
            ],
            15,
        )
    }

    fn world(units: Vec<Unit>) -> GameState {
        let mut sea = TerritoryState::new(None, false);
        sea.units = units;
        let territories = BTreeMap::from([(TerritoryId::new("sea"), sea)]);
        GameState::new(0, TurnState::default(), territories, BTreeMap::new())
    }

    fn passenger(id: u32, kind: UnitKind) -> Passenger {
        Passenger {
            id: UnitId(id),
            faction: Faction::Japan,
            kind,
            movement: 0,
        }
    }

    #[test]
    fn two_tanks_on_one_transport_are_rejected() {
        let mut transport = Unit::new(UnitId(1), Faction::Japan, UnitKind::Transport, 2);
        transport.cargo.push(passenger(2, UnitKind::Tank));
        transport.cargo.push(passenger(3, UnitKind::Tank));

        assert_eq!(
            world(vec![transport]).verify_invariants(&units()),
            Err(StateError::IllegalCargo {
                carrier: UnitId(1),
                kind: UnitKind::Transport,
            })
        );
    }

    #[test]
    fn cargo_ids_count_towards_uniqueness() {
        let mut transport = Unit::new(UnitId(1), Faction::Japan, UnitKind::Transport, 2);
        transport.cargo.push(passenger(2, UnitKind::Infantry));
        let twin = Unit::new(UnitId(2), Faction::Japan, UnitKind::Infantry, 1);

        assert_eq!(
            world(vec![twin, transport]).verify_invariants(&units()),
            Err(StateError::DuplicateUnit { unit: UnitId(2) })
        );
    }

    #[test]
    fn movement_may_not_exceed_the_allowance() {
        let infantry = Unit::new(UnitId(1), Faction::Japan, UnitKind::Infantry, 2);
        assert!(matches!(
            world(vec![infantry]).verify_invariants(&units()),
            Err(StateError::MovementAboveAllowance { allowance: 1, .. })
        ));

        let infantry = Unit::new(UnitId(1), Faction::Japan, UnitKind::Infantry, 1);
        assert_eq!(world(vec![infantry]).verify_invariants(&units()), Ok(()));
    }
}
