use crate::state::{ProductionItem, UnitKind};

/// Combat and economy values of a unit type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    pub cost: u32,
    pub attack: u32,
    pub defense: u32,
    pub movement: u32,
}

impl UnitStats {
    pub const fn new(cost: u32, attack: u32, defense: u32, movement: u32) -> Self {
        Self {
            cost,
            attack,
            defense,
            movement,
        }
    }
}

/// Read-only unit table.
pub trait UnitOracle: Send + Sync {
    fn stats(&self, kind: UnitKind) -> Option<UnitStats>;

    fn industrial_complex_cost(&self) -> u32;

    fn cost(&self, item: ProductionItem) -> Option<u32> {
        match item {
            ProductionItem::Unit(kind) => self.stats(kind).map(|stats| stats.cost),
            ProductionItem::IndustrialComplex => Some(self.industrial_complex_cost()),
        }
    }
}
