//! Shared fixtures: a small eastern-front map, the classic unit table and a
//! scripted dice source.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use conquest_core::state::Passenger;
use conquest_core::{
    Command, CommandOutcome, ExecuteError, Faction, GameConfig, GameEngine, GameState,
    OracleSnapshot, Phase, RngOracle, SnapshotConfigOracle, SnapshotTerritoryOracle,
    SnapshotUnitOracle, TerritoryId, TerritoryInfo, UnitId, UnitKind, UnitStats,
};

/// Dice that ignore their seed and replay a fixed script. Once the script
/// runs out every die shows a six, which misses for every unit type.
pub struct FixedRolls {
    rolls: Vec<u32>,
    cursor: AtomicUsize,
}

impl FixedRolls {
    pub fn new(rolls: &[u32]) -> Self {
        Self {
            rolls: rolls.to_vec(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of dice rolled so far.
    pub fn used(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RngOracle for FixedRolls {
    fn next_u32(&self, seed: u64) -> u32 {
        self.roll_die(seed, 6) - 1
    }

    fn roll_die(&self, _seed: u64, _sides: u32) -> u32 {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.rolls.get(index).copied().unwrap_or(6)
    }
}

fn territory(
    name: &str,
    controller: Option<Faction>,
    power: u32,
    neighbors: &[&str],
) -> TerritoryInfo {
    TerritoryInfo {
        name: TerritoryId::new(name),
        controller,
        is_capital: false,
        is_ocean: false,
        power,
        neighbors: neighbors.iter().map(|n| TerritoryId::new(*n)).collect(),
        has_factory: false,
        garrison: Vec::new(),
    }
}

fn capital(name: &str, controller: Faction, power: u32, neighbors: &[&str]) -> TerritoryInfo {
    TerritoryInfo {
        is_capital: true,
        has_factory: true,
        ..territory(name, Some(controller), power, neighbors)
    }
}

fn ocean(name: &str, neighbors: &[&str]) -> TerritoryInfo {
    TerritoryInfo {
        is_ocean: true,
        ..territory(name, None, 0, neighbors)
    }
}

/// Eight territories: German and Soviet heartlands split by Poland and
/// Ukraine, two sea zones, and neutral Switzerland.
pub fn eastern_front() -> SnapshotTerritoryOracle {
    use Faction::{Germany, SovietUnion};

    SnapshotTerritoryOracle::new([
        capital("berlin", Germany, 10, &["poland", "baltic_sea", "switzerland"]),
        territory("poland", Some(Germany), 2, &["berlin", "ukraine", "baltic_sea"]),
        territory("ukraine", Some(SovietUnion), 3, &["poland", "karelia", "moscow"]),
        territory("karelia", Some(SovietUnion), 2, &["ukraine", "moscow", "baltic_sea"]),
        capital("moscow", SovietUnion, 8, &["ukraine", "karelia"]),
        ocean("baltic_sea", &["berlin", "poland", "karelia", "north_sea"]),
        ocean("north_sea", &["baltic_sea"]),
        territory("switzerland", None, 0, &["berlin"]),
    ])
}

pub fn unit_table() -> SnapshotUnitOracle {
    SnapshotUnitOracle::new(
        [
            (UnitKind::Infantry, UnitStats::new(3, 1, 2, 1)),
            (UnitKind::Artillery, UnitStats::new(4, 2, 2, 1)),
            (UnitKind::Tank, UnitStats::new(5, 3, 3, 2)),
            (UnitKind::AntiAircraft, UnitStats::new(5, 0, 1, 1)),
            (UnitKind::Fighter, UnitStats::new(10, 3, 4, 4)),
            (UnitKind::Bomber, UnitStats::new(15, 4, 1, 6)),
            (UnitKind::Transport, UnitStats::new(7, 0, 1, 2)),
            (UnitKind::Destroyer, UnitStats::new(8, 2, 2, 2)),
            (UnitKind::Submarine, UnitStats::new(8, 2, 1, 2)),
            (UnitKind::Battleship, UnitStats::new(20, 4, 4, 2)),
            (UnitKind::AircraftCarrier, UnitStats::new(14, 1, 3, 2)),
        ],
        15,
    )
}

pub fn config() -> GameConfig {
    let mut config = GameConfig::with_seed(42);
    config.starting_ipcs.insert(Faction::Germany, 40);
    config.starting_ipcs.insert(Faction::SovietUnion, 24);
    config
}

pub fn oracles() -> OracleSnapshot {
    OracleSnapshot::new(
        eastern_front(),
        unit_table(),
        SnapshotConfigOracle::new(config()),
    )
}

/// A game on [`eastern_front`] with empty garrisons.
pub struct Game {
    pub oracles: OracleSnapshot,
    pub rng: FixedRolls,
    pub state: GameState,
}

impl Game {
    pub fn new() -> Self {
        Self::with_rolls(&[])
    }

    pub fn with_rolls(rolls: &[u32]) -> Self {
        let oracles = oracles();
        let state = GameState::new_game(&oracles.pcg_env()).expect("new game");
        Self {
            oracles,
            rng: FixedRolls::new(rolls),
            state,
        }
    }

    /// Jumps the clock to `faction`'s turn in `phase`.
    pub fn at(mut self, faction: Faction, phase: Phase) -> Self {
        self.state.turn.turn = faction.turn_position();
        self.state.turn.phase = phase;
        self
    }

    pub fn spawn(&mut self, territory: &str, faction: Faction, kind: UnitKind) -> UnitId {
        let movement = self.base_movement(kind);
        self.state
            .spawn_unit(&TerritoryId::new(territory), faction, kind, movement)
            .expect("spawn unit")
    }

    /// Creates a unit directly inside `carrier`'s cargo.
    pub fn embark(&mut self, sea: &str, carrier: UnitId, kind: UnitKind) -> UnitId {
        let movement = self.base_movement(kind);
        let id = self.state.allocate_unit_id().expect("unit id");
        let carrier = self
            .state
            .territory_mut(sea)
            .and_then(|territory| territory.unit_mut(carrier))
            .expect("carrier");
        carrier.cargo.push(Passenger {
            id,
            faction: carrier.faction,
            kind,
            movement,
        });
        id
    }

    pub fn base_movement(&self, kind: UnitKind) -> u32 {
        self.oracles.pcg_env().base_movement(kind).expect("unit stats")
    }

    pub fn exec(&mut self, faction: Faction, command: Command) -> Result<CommandOutcome, ExecuteError> {
        let env = self.oracles.env(&self.rng);
        GameEngine::new(&mut self.state).execute(env.into_game_env(), faction, &command)
    }

    pub fn units_in(&self, territory: &str) -> Vec<UnitId> {
        self.state
            .territory(territory)
            .map(|t| t.units.iter().map(|unit| unit.id).collect())
            .unwrap_or_default()
    }

    pub fn controller(&self, territory: &str) -> Option<Faction> {
        self.state.territory(territory).and_then(|t| t.controller)
    }

    pub fn ipcs(&self, faction: Faction) -> u32 {
        self.state.player(faction).map(|p| p.ipcs).unwrap_or(0)
    }
}
