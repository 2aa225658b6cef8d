use std::collections::BTreeSet;
use std::fmt;

use super::{Faction, TerritoryId, Unit, UnitId};

/// Distinguishes the battles that may coexist in one territory.
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
pub enum BattleTag {
    Land,
    Naval,
    AntiAircraft,
}

/// At most one battle exists per key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleKey {
    pub territory: TerritoryId,
    pub tag: BattleTag,
}

impl BattleKey {
    pub fn new(territory: impl Into<TerritoryId>, tag: BattleTag) -> Self {
        Self {
            territory: territory.into(),
            tag,
        }
    }
}

impl fmt::Display for BattleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} battle in {}", self.tag, self.territory)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    AttackerWins,
    /// Also covers mutual destruction and retreat.
    DefenderWins,
}

/// Which volley produced the hits awaiting casualty selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum FireStage {
    Opening,
    Main,
}

/// Progress of an ordinary (land or naval) battle.
///
/// `round` counts completed main rounds. Opening fire happens at round 0 and
/// never advances the counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatStatus {
    /// Declared by movement, nothing fired yet.
    Pending,
    /// The attacker owes `hits` casualties before the round can complete.
    AwaitingCasualties {
        round: u32,
        stage: FireStage,
        hits: u32,
    },
    /// Between rounds.
    InProgress { round: u32 },
    Resolved(BattleOutcome),
}

impl CombatStatus {
    pub const fn round(&self) -> u32 {
        match self {
            CombatStatus::Pending | CombatStatus::Resolved(_) => 0,
            CombatStatus::AwaitingCasualties { round, .. } | CombatStatus::InProgress { round } => {
                *round
            }
        }
    }
}

/// Cargo unloaded from one transport into a land battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Landing {
    pub transport: UnitId,
    pub units: Vec<UnitId>,
    /// The transport went down at sea after unloading.
    pub sunk: bool,
}

/// Dice thrown in the most recent volley, kept for reporting.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundRolls {
    pub attacker: Vec<u32>,
    pub defender: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrdinaryBattle {
    pub status: CombatStatus,
    /// Battleships that already absorbed their first hit.
    pub hit_battleships: BTreeSet<UnitId>,
    /// Amphibious bookkeeping: which transport delivered which units.
    pub landings: Vec<Landing>,
    pub last_rolls: RoundRolls,
}

impl OrdinaryBattle {
    pub fn new() -> Self {
        Self {
            status: CombatStatus::Pending,
            hit_battleships: BTreeSet::new(),
            landings: Vec::new(),
            last_rolls: RoundRolls::default(),
        }
    }

    pub fn is_amphibious(&self) -> bool {
        !self.landings.is_empty()
    }

    /// Records `units` as landed by `transport`, merging with earlier landings.
    pub fn record_landing(&mut self, transport: UnitId, units: &[UnitId]) {
        match self
            .landings
            .iter_mut()
            .find(|landing| landing.transport == transport)
        {
            Some(landing) => landing.units.extend_from_slice(units),
            None => self.landings.push(Landing {
                transport,
                units: units.to_vec(),
                sunk: false,
            }),
        }
    }

    /// The landing that brought `unit` ashore, if it arrived by sea.
    pub fn landing_of(&self, unit: UnitId) -> Option<&Landing> {
        self.landings
            .iter()
            .find(|landing| landing.units.contains(&unit))
    }

    /// Marks the cargo `transport` unloaded as cut off from the sea.
    /// Returns false when `transport` landed nothing here.
    pub fn strand(&mut self, transport: UnitId) -> bool {
        match self
            .landings
            .iter_mut()
            .find(|landing| landing.transport == transport)
        {
            Some(landing) => {
                landing.sunk = true;
                true
            }
            None => false,
        }
    }
}

impl Default for OrdinaryBattle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AaStatus {
    Pending,
    AwaitingCasualties { hits: u32 },
    Resolved,
}

/// Anti-aircraft volley against air units flying into a defended territory.
///
/// Single-shot by construction: there is no round counter and no retreat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AaFireBattle {
    /// Copies of the air units that flew in.
    pub air_units: Vec<Unit>,
    pub status: AaStatus,
    pub rolls: Vec<u32>,
}

impl AaFireBattle {
    pub fn new(air_units: Vec<Unit>) -> Self {
        Self {
            air_units,
            status: AaStatus::Pending,
            rolls: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattleKind {
    Land(OrdinaryBattle),
    Naval(OrdinaryBattle),
    AntiAircraft(AaFireBattle),
}

/// A battle in flight. Territories are referenced by name, never owned.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    pub territory: TerritoryId,
    pub attacker: Faction,
    pub attack_from: TerritoryId,
    pub kind: BattleKind,
}

impl Battle {
    pub fn land(territory: TerritoryId, attacker: Faction, attack_from: TerritoryId) -> Self {
        Self {
            territory,
            attacker,
            attack_from,
            kind: BattleKind::Land(OrdinaryBattle::new()),
        }
    }

    pub fn naval(territory: TerritoryId, attacker: Faction, attack_from: TerritoryId) -> Self {
        Self {
            territory,
            attacker,
            attack_from,
            kind: BattleKind::Naval(OrdinaryBattle::new()),
        }
    }

    pub fn anti_aircraft(
        territory: TerritoryId,
        attacker: Faction,
        attack_from: TerritoryId,
        air_units: Vec<Unit>,
    ) -> Self {
        Self {
            territory,
            attacker,
            attack_from,
            kind: BattleKind::AntiAircraft(AaFireBattle::new(air_units)),
        }
    }

    pub fn tag(&self) -> BattleTag {
        match self.kind {
            BattleKind::Land(_) => BattleTag::Land,
            BattleKind::Naval(_) => BattleTag::Naval,
            BattleKind::AntiAircraft(_) => BattleTag::AntiAircraft,
        }
    }

    pub fn key(&self) -> BattleKey {
        BattleKey::new(self.territory.clone(), self.tag())
    }

    pub fn matches(&self, territory: &str, tag: BattleTag) -> bool {
        self.territory.as_str() == territory && self.tag() == tag
    }

    pub fn ordinary(&self) -> Option<&OrdinaryBattle> {
        match &self.kind {
            BattleKind::Land(battle) | BattleKind::Naval(battle) => Some(battle),
            BattleKind::AntiAircraft(_) => None,
        }
    }

    pub fn ordinary_mut(&mut self) -> Option<&mut OrdinaryBattle> {
        match &mut self.kind {
            BattleKind::Land(battle) | BattleKind::Naval(battle) => Some(battle),
            BattleKind::AntiAircraft(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        match &self.kind {
            BattleKind::Land(battle) | BattleKind::Naval(battle) => {
                matches!(battle.status, CombatStatus::Resolved(_))
            }
            BattleKind::AntiAircraft(fire) => fire.status == AaStatus::Resolved,
        }
    }

    pub fn is_awaiting_casualties(&self) -> bool {
        match &self.kind {
            BattleKind::Land(battle) | BattleKind::Naval(battle) => {
                matches!(battle.status, CombatStatus::AwaitingCasualties { .. })
            }
            BattleKind::AntiAircraft(fire) => {
                matches!(fire.status, AaStatus::AwaitingCasualties { .. })
            }
        }
    }

    /// Started but not yet resolved.
    pub fn is_in_resolution(&self) -> bool {
        match &self.kind {
            BattleKind::Land(battle) | BattleKind::Naval(battle) => matches!(
                battle.status,
                CombatStatus::AwaitingCasualties { .. } | CombatStatus::InProgress { .. }
            ),
            BattleKind::AntiAircraft(fire) => {
                matches!(fire.status, AaStatus::AwaitingCasualties { .. })
            }
        }
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.ordinary()?.status {
            CombatStatus::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landings_merge_per_transport() {
        let mut battle = OrdinaryBattle::new();
        battle.record_landing(UnitId(10), &[UnitId(1)]);
        battle.record_landing(UnitId(10), &[UnitId(2)]);
        battle.record_landing(UnitId(11), &[UnitId(3)]);

        assert_eq!(battle.landings.len(), 2);
        let transport = |unit| battle.landing_of(unit).map(|landing| landing.transport);
        assert_eq!(transport(UnitId(2)), Some(UnitId(10)));
        assert_eq!(transport(UnitId(3)), Some(UnitId(11)));
        assert_eq!(transport(UnitId(4)), None);
    }

    #[test]
    fn stranding_flags_only_the_sunk_transport() {
        let mut battle = OrdinaryBattle::new();
        battle.record_landing(UnitId(10), &[UnitId(1), UnitId(2)]);
        battle.record_landing(UnitId(11), &[UnitId(3)]);

        assert!(battle.strand(UnitId(10)));
        assert!(!battle.strand(UnitId(12)));
        let sunk = |unit| battle.landing_of(unit).is_some_and(|landing| landing.sunk);
        assert!(sunk(UnitId(1)));
        assert!(sunk(UnitId(2)));
        assert!(!sunk(UnitId(3)));
    }

    #[test]
    fn battle_key_follows_kind() {
        let battle = Battle::naval("Baltic Sea".into(), Faction::Germany, "North Sea".into());
        assert_eq!(battle.key(), BattleKey::new("Baltic Sea", BattleTag::Naval));
        assert!(battle.matches("Baltic Sea", BattleTag::Naval));
        assert!(!battle.is_in_resolution());
    }
}
