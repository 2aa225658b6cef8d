use arrayvec::ArrayVec;
use bitflags::bitflags;

use super::{Faction, UnitId};
use crate::config::GameConfig;

bitflags! {
    /// Static capabilities of a unit type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct UnitTraits: u16 {
        const LAND            = 1 << 0;
        const SEA             = 1 << 1;
        const AIR             = 1 << 2;
        /// Carries land units as cargo.
        const CARRIES_LAND    = 1 << 3;
        /// Carries air units as cargo.
        const CARRIES_AIR     = 1 << 4;
        /// Survives the first hit.
        const TWO_HIT         = 1 << 5;
        /// Gets an unanswered opening roll against sea units.
        const SUBMERSIBLE     = 1 << 6;
        /// Cancels the opposing side's submarine opening roll.
        const SUPPRESSES_SUBS = 1 << 7;
        /// Fires only in the dedicated anti-aircraft sub-battle.
        const ANTI_AIRCRAFT   = 1 << 8;
        /// Bombards land defenders during an amphibious assault.
        const BOMBARD         = 1 << 9;
        /// May blitz through uncontested hostile land.
        const BLITZ           = 1 << 10;
    }
}

/// Unit type. Industrial complexes are not units; see [`ProductionItem`].
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
pub enum UnitKind {
    Infantry,
    Artillery,
    Tank,
    AntiAircraft,
    Fighter,
    Bomber,
    Transport,
    Destroyer,
    Submarine,
    Battleship,
    AircraftCarrier,
}

impl UnitKind {
    pub const ALL: [UnitKind; 11] = [
        UnitKind::Infantry,
        UnitKind::Artillery,
        UnitKind::Tank,
        UnitKind::AntiAircraft,
        UnitKind::Fighter,
        UnitKind::Bomber,
        UnitKind::Transport,
        UnitKind::Destroyer,
        UnitKind::Submarine,
        UnitKind::Battleship,
        UnitKind::AircraftCarrier,
    ];

    pub const fn traits(self) -> UnitTraits {
        match self {
            UnitKind::Infantry | UnitKind::Artillery => UnitTraits::LAND,
            UnitKind::Tank => UnitTraits::LAND.union(UnitTraits::BLITZ),
            UnitKind::AntiAircraft => UnitTraits::LAND.union(UnitTraits::ANTI_AIRCRAFT),
            UnitKind::Fighter | UnitKind::Bomber => UnitTraits::AIR,
            UnitKind::Transport => UnitTraits::SEA.union(UnitTraits::CARRIES_LAND),
            UnitKind::Destroyer => UnitTraits::SEA.union(UnitTraits::SUPPRESSES_SUBS),
            UnitKind::Submarine => UnitTraits::SEA.union(UnitTraits::SUBMERSIBLE),
            UnitKind::Battleship => UnitTraits::SEA
                .union(UnitTraits::TWO_HIT)
                .union(UnitTraits::BOMBARD),
            UnitKind::AircraftCarrier => UnitTraits::SEA.union(UnitTraits::CARRIES_AIR),
        }
    }

    pub const fn is_land(self) -> bool {
        self.traits().contains(UnitTraits::LAND)
    }

    pub const fn is_sea(self) -> bool {
        self.traits().contains(UnitTraits::SEA)
    }

    pub const fn is_air(self) -> bool {
        self.traits().contains(UnitTraits::AIR)
    }

    pub const fn is_anti_aircraft(self) -> bool {
        self.traits().contains(UnitTraits::ANTI_AIRCRAFT)
    }

    pub const fn carries_cargo(self) -> bool {
        self.traits()
            .intersects(UnitTraits::CARRIES_LAND.union(UnitTraits::CARRIES_AIR))
    }

    /// Returns true if `cargo` is a legal load for a unit of this kind.
    ///
    /// Transports hold land units and, when full, at least one infantry.
    /// Carriers hold air units only.
    pub fn accepts_cargo(self, cargo: &[UnitKind]) -> bool {
        if cargo.len() > GameConfig::MAX_CARGO {
            return false;
        }
        let traits = self.traits();
        if traits.contains(UnitTraits::CARRIES_LAND) {
            cargo.iter().all(|kind| kind.is_land())
                && (cargo.len() < GameConfig::MAX_CARGO
                    || cargo.contains(&UnitKind::Infantry))
        } else if traits.contains(UnitTraits::CARRIES_AIR) {
            cargo.iter().all(|kind| kind.is_air())
        } else {
            cargo.is_empty()
        }
    }
}

/// Something a faction can buy during the purchase phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProductionItem {
    Unit(UnitKind),
    IndustrialComplex,
}

impl core::fmt::Display for ProductionItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProductionItem::Unit(kind) => write!(f, "{kind}"),
            ProductionItem::IndustrialComplex => f.write_str("industrial_complex"),
        }
    }
}

/// A unit riding inside a transport or carrier.
///
/// Passengers never carry cargo themselves, so nesting stops at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passenger {
    pub id: UnitId,
    pub faction: Faction,
    pub kind: UnitKind,
    pub movement: u32,
}

impl Passenger {
    pub fn into_unit(self) -> Unit {
        Unit {
            id: self.id,
            faction: self.faction,
            kind: self.kind,
            movement: self.movement,
            cargo: Cargo::new(),
        }
    }
}

pub type Cargo = ArrayVec<Passenger, { GameConfig::MAX_CARGO }>;

/// A unit on the map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub faction: Faction,
    pub kind: UnitKind,
    /// Remaining movement points this turn.
    pub movement: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cargo: Cargo,
}

impl Unit {
    pub fn new(id: UnitId, faction: Faction, kind: UnitKind, movement: u32) -> Self {
        Self {
            id,
            faction,
            kind,
            movement,
            cargo: Cargo::new(),
        }
    }

    /// Converts this unit into a passenger. Any cargo it holds is dropped.
    pub fn as_passenger(&self) -> Passenger {
        Passenger {
            id: self.id,
            faction: self.faction,
            kind: self.kind,
            movement: self.movement,
        }
    }

    pub fn free_cargo_slots(&self) -> usize {
        if self.kind.carries_cargo() {
            GameConfig::MAX_CARGO - self.cargo.len()
        } else {
            0
        }
    }

    /// Returns true if `kind` could be added to the current cargo.
    pub fn can_embark(&self, kind: UnitKind) -> bool {
        if self.cargo.is_full() {
            return false;
        }
        let mut kinds: ArrayVec<UnitKind, { GameConfig::MAX_CARGO }> =
            self.cargo.iter().map(|p| p.kind).collect();
        kinds.push(kind);
        self.kind.accepts_cargo(&kinds)
    }

    pub fn cargo_kinds(&self) -> impl Iterator<Item = UnitKind> + '_ {
        self.cargo.iter().map(|p| p.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_transport_needs_an_infantry() {
        let transport = UnitKind::Transport;
        assert!(transport.accepts_cargo(&[UnitKind::Infantry, UnitKind::Tank]));
        assert!(transport.accepts_cargo(&[UnitKind::Tank]));
        assert!(!transport.accepts_cargo(&[UnitKind::Tank, UnitKind::Artillery]));
        assert!(!transport.accepts_cargo(&[UnitKind::Fighter]));
    }

    #[test]
    fn carriers_only_take_air_units() {
        let carrier = UnitKind::AircraftCarrier;
        assert!(carrier.accepts_cargo(&[UnitKind::Fighter, UnitKind::Fighter]));
        assert!(!carrier.accepts_cargo(&[UnitKind::Infantry]));
        assert!(!UnitKind::Destroyer.accepts_cargo(&[UnitKind::Fighter]));
    }

    #[test]
    fn embarking_respects_the_infantry_rule() {
        let mut transport = Unit::new(UnitId(1), Faction::Germany, UnitKind::Transport, 2);
        let tank = Unit::new(UnitId(2), Faction::Germany, UnitKind::Tank, 2);
        transport.cargo.push(tank.as_passenger());

        assert!(transport.can_embark(UnitKind::Infantry));
        assert!(!transport.can_embark(UnitKind::Artillery));
        assert_eq!(transport.free_cargo_slots(), 1);
    }

    #[test]
    fn unit_traits_classify_domains() {
        assert!(UnitKind::Tank.is_land());
        assert!(UnitKind::Bomber.is_air());
        assert!(UnitKind::Submarine.is_sea());
        assert!(UnitKind::AntiAircraft.is_anti_aircraft());
        assert!(UnitKind::Battleship.traits().contains(UnitTraits::TWO_HIT));
    }
}
