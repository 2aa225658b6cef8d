use super::{Faction, Unit, UnitId};

/// Mutable per-territory record. Static data (adjacency, ocean flag, income)
/// lives in the territory oracle.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerritoryState {
    /// Controlling faction, `None` for neutral territory.
    pub controller: Option<Faction>,
    /// Industrial complex present.
    pub has_factory: bool,
    /// Units physically present. Cargo is stored inside its carrier.
    pub units: Vec<Unit>,
}

impl TerritoryState {
    pub fn new(controller: Option<Faction>, has_factory: bool) -> Self {
        Self {
            controller,
            has_factory,
            units: Vec::new(),
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.unit(id).is_some()
    }

    /// Removes and returns the unit with `id`, if present at top level.
    pub fn take_unit(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.units.iter().position(|unit| unit.id == id)?;
        Some(self.units.remove(index))
    }

    pub fn is_controlled_by(&self, faction: Faction) -> bool {
        self.controller == Some(faction)
    }

    /// Controlled by a faction hostile to `faction`.
    pub fn is_hostile_controlled(&self, faction: Faction) -> bool {
        self.controller
            .is_some_and(|controller| controller.is_hostile_to(faction))
    }

    pub fn units_of(&self, faction: Faction) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(move |unit| unit.faction == faction)
    }

    pub fn hostile_units(&self, faction: Faction) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .filter(move |unit| unit.faction.is_hostile_to(faction))
    }

    /// Any unit hostile to `faction` is present. A lone anti-aircraft gun
    /// contests the territory as much as an army does.
    pub fn is_contested_for(&self, faction: Faction) -> bool {
        self.hostile_units(faction).next().is_some()
    }

    pub fn has_hostile_anti_aircraft(&self, faction: Faction) -> bool {
        self.hostile_units(faction)
            .any(|unit| unit.kind.is_anti_aircraft())
    }

    /// Number of units including cargo.
    pub fn unit_count(&self) -> usize {
        self.units.iter().map(|unit| 1 + unit.cargo.len()).sum()
    }
}
