use std::borrow::Borrow;
use std::fmt;

/// Unique identifier assigned to every unit when it enters the world.
///
/// Identity is by id only: two infantry of the same faction with the same
/// remaining movement are still distinct units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Territory name used as a foreign key into the world state and the
/// territory oracle.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TerritoryId(String);

impl TerritoryId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TerritoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TerritoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for TerritoryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One of the five playable powers.
///
/// Declaration order is turn order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    SovietUnion,
    Germany,
    UnitedKingdom,
    Japan,
    UnitedStates,
}

impl Faction {
    /// All factions in turn order.
    pub const ALL: [Faction; 5] = [
        Faction::SovietUnion,
        Faction::Germany,
        Faction::UnitedKingdom,
        Faction::Japan,
        Faction::UnitedStates,
    ];

    /// Fixed turn-order position, also used as dice seed input.
    pub const fn turn_position(self) -> u32 {
        self as u32
    }

    pub const fn alliance(self) -> Alliance {
        match self {
            Faction::Germany | Faction::Japan => Alliance::Axis,
            Faction::SovietUnion | Faction::UnitedKingdom | Faction::UnitedStates => {
                Alliance::Allies
            }
        }
    }

    pub fn is_hostile_to(self, other: Faction) -> bool {
        self.alliance() != other.alliance()
    }

    pub fn is_friendly_to(self, other: Faction) -> bool {
        !self.is_hostile_to(other)
    }
}

/// The two opposing coalitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Alliance {
    Axis,
    Allies,
}
