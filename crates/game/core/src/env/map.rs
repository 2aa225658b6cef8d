use crate::state::{Faction, TerritoryId, UnitKind};

/// Units placed in a territory when a new game starts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartingUnits {
    pub faction: Faction,
    pub kind: UnitKind,
    pub count: u32,
}

/// Static description of a territory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerritoryInfo {
    pub name: TerritoryId,
    /// Controller at game start, `None` for neutral.
    #[cfg_attr(feature = "serde", serde(default))]
    pub controller: Option<Faction>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_capital: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_ocean: bool,
    /// Income value collected by the controller.
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: u32,
    pub neighbors: Vec<TerritoryId>,
    /// Industrial complex at game start.
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_factory: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub garrison: Vec<StartingUnits>,
}

impl TerritoryInfo {
    pub fn is_land(&self) -> bool {
        !self.is_ocean
    }

    pub fn borders(&self, other: &str) -> bool {
        self.neighbors.iter().any(|neighbor| neighbor.as_str() == other)
    }
}

/// Read-only territory table: adjacency, ocean and capital flags, income.
pub trait TerritoryOracle: Send + Sync {
    fn territory(&self, name: &str) -> Option<&TerritoryInfo>;

    /// All territory names in a stable order.
    fn names(&self) -> Vec<TerritoryId>;

    fn is_adjacent(&self, from: &str, to: &str) -> bool {
        self.territory(from).is_some_and(|info| info.borders(to))
    }

    fn capital_of(&self, faction: Faction) -> Option<TerritoryId> {
        self.names().into_iter().find(|name| {
            self.territory(name.as_str())
                .is_some_and(|info| info.is_capital && info.controller == Some(faction))
        })
    }
}
