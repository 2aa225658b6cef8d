//! Turn lifecycle, production and command gating.

mod common;

use common::Game;
use conquest_core::action::{MoveError, PhaseError, ProductionError};
use conquest_core::{
    Arrival, Battle, BattleTag, Command, CommandOutcome, ExecuteError, Faction, GameError,
    MobilizeUnits, MoveUnits, Phase, PhaseChange, ProductionItem, PurchaseUnit, UnitKind,
};

use Faction::{Germany, SovietUnion};

fn buy(kind: UnitKind) -> Command {
    Command::PurchaseUnit(PurchaseUnit::new(ProductionItem::Unit(kind)))
}

fn end_turn(game: &mut Game) -> conquest_core::TurnSummary {
    let faction = game.state.current_faction().expect("active faction");
    game.state.turn.phase = Phase::Mobilize;
    match game.exec(faction, Command::EndTurn).expect("end turn") {
        CommandOutcome::TurnEnded(summary) => summary,
        other => panic!("expected a turn summary, got {other:?}"),
    }
}

#[test]
fn commands_outside_their_phase_leave_the_state_untouched() {
    let mut game = Game::new().at(Germany, Phase::Purchase);
    let infantry = game.spawn("poland", Germany, UnitKind::Infantry);
    let before = game.state.clone();

    let error = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "ukraine", vec![infantry])))
        .unwrap_err();
    assert!(matches!(error, ExecuteError::CommandNotAllowedInPhase { phase: Phase::Purchase, .. }));
    assert_eq!(error.error_code(), "ENGINE_COMMAND_NOT_ALLOWED_IN_PHASE");
    assert_eq!(game.state, before);

    let error = game.exec(SovietUnion, buy(UnitKind::Infantry)).unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::FactionNotCurrent { faction: SovietUnion, current: Some(Germany), .. }
    ));
    assert_eq!(game.state, before);
}

#[test]
fn accepted_commands_advance_the_nonce() {
    let mut game = Game::new().at(Germany, Phase::Purchase);
    let nonce = game.state.turn.nonce;

    game.exec(Germany, buy(UnitKind::Infantry)).expect("purchase");
    assert_eq!(game.state.turn.nonce, nonce + 1);

    game.exec(Germany, buy(UnitKind::Battleship)).expect("purchase");
    let error = game.exec(Germany, buy(UnitKind::Battleship)).unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Purchase(ref e) if matches!(e.error, ProductionError::InsufficientIpcs { cost: 20, available: 17, .. })
    ));
    assert_eq!(game.state.turn.nonce, nonce + 2);
    assert_eq!(game.ipcs(Germany), 17);
}

#[test]
fn purchases_are_queued_and_placed_at_factories() {
    let mut game = Game::new().at(Germany, Phase::Purchase);
    game.exec(Germany, buy(UnitKind::Tank)).expect("tank");
    game.exec(Germany, buy(UnitKind::Destroyer)).expect("destroyer");
    let pending = &game.state.player(Germany).expect("player").pending;
    assert_eq!(pending.len(), 2);
    assert_eq!(game.ipcs(Germany), 40 - 5 - 8);

    game.state.turn.phase = Phase::Mobilize;
    let tank = ProductionItem::Unit(UnitKind::Tank);
    let destroyer = ProductionItem::Unit(UnitKind::Destroyer);

    let error = game
        .exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("poland", vec![tank])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Mobilize(ref e) if e.error == ProductionError::NoFactory("poland".into())
    ));

    let error = game
        .exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("north_sea", vec![destroyer])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Mobilize(ref e) if e.error == ProductionError::NoAdjacentFactory("north_sea".into())
    ));

    let placed = game
        .exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("berlin", vec![tank])))
        .expect("mobilize tank");
    let CommandOutcome::Mobilized(ids) = placed else {
        panic!("expected placed units");
    };
    assert_eq!(game.units_in("berlin"), ids);

    game.exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("baltic_sea", vec![destroyer])))
        .expect("mobilize destroyer");
    assert!(game.state.player(Germany).expect("player").pending.is_empty());

    let error = game
        .exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("berlin", vec![tank])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Mobilize(ref e) if e.error == ProductionError::NotPurchased(tank)
    ));
}

#[test]
fn fighters_mobilize_at_sea_only_with_carrier_room() {
    let mut game = Game::new().at(Germany, Phase::Mobilize);
    let fighter = ProductionItem::Unit(UnitKind::Fighter);
    let carrier = ProductionItem::Unit(UnitKind::AircraftCarrier);
    game.state
        .player_mut(Germany)
        .expect("player")
        .pending
        .extend([fighter, fighter, fighter, carrier]);

    let error = game
        .exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("baltic_sea", vec![fighter])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Mobilize(ref e) if e.error == ProductionError::NoCarrierCapacity("baltic_sea".into())
    ));

    let error = game
        .exec(
            Germany,
            Command::MobilizeUnits(MobilizeUnits::new("baltic_sea", vec![fighter, fighter, fighter, carrier])),
        )
        .unwrap_err();
    assert!(matches!(error, ExecuteError::Mobilize(_)));

    game.exec(
        Germany,
        Command::MobilizeUnits(MobilizeUnits::new("baltic_sea", vec![fighter, carrier, fighter])),
    )
    .expect("carrier with two fighters");
    let sea = game.state.territory("baltic_sea").expect("sea zone");
    assert_eq!(sea.units.len(), 1);
    assert_eq!(sea.units[0].cargo.len(), 2);
}

#[test]
fn industrial_complexes_need_a_bare_controlled_territory() {
    let mut game = Game::new().at(Germany, Phase::Purchase);
    let complex = ProductionItem::IndustrialComplex;
    game.exec(Germany, Command::PurchaseUnit(PurchaseUnit::new(complex)))
        .expect("first complex");
    // Berlin already has one and Poland has one queued.
    let error = game
        .exec(Germany, Command::PurchaseUnit(PurchaseUnit::new(complex)))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Purchase(ref e) if matches!(e.error, ProductionError::IndustrialComplexLimit { .. })
    ));

    game.state.turn.phase = Phase::Mobilize;
    let error = game
        .exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("berlin", vec![complex])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Mobilize(ref e) if e.error == ProductionError::FactoryAlreadyPresent("berlin".into())
    ));
    game.exec(Germany, Command::MobilizeUnits(MobilizeUnits::new("poland", vec![complex])))
        .expect("build in poland");
    assert!(game.state.territory("poland").expect("poland").has_factory);
}

#[test]
fn end_phase_walks_the_cycle_and_ends_the_turn() {
    let mut game = Game::new().at(Germany, Phase::Purchase);
    for expected in [Phase::CombatMove, Phase::Combat, Phase::NonCombatMove, Phase::Mobilize] {
        let outcome = game.exec(Germany, Command::EndPhase).expect("end phase");
        assert_eq!(outcome, CommandOutcome::PhaseChanged(PhaseChange::Entered(expected)));
    }
    let outcome = game.exec(Germany, Command::EndPhase).expect("end turn");
    assert!(matches!(outcome, CommandOutcome::PhaseChanged(PhaseChange::TurnEnded(_))));
    assert_eq!(game.state.turn.turn, 2);
    assert_eq!(game.state.phase(), Phase::Purchase);
    assert_eq!(game.state.current_faction(), Some(Faction::UnitedKingdom));
}

#[test]
fn undo_restores_the_start_of_the_movement_phase() {
    let mut game = Game::new().at(Germany, Phase::Purchase);
    let infantry = game.spawn("poland", Germany, UnitKind::Infantry);
    game.exec(Germany, Command::EndPhase).expect("enter combat move");
    let checkpoint_units = game.units_in("poland");

    let outcome = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "ukraine", vec![infantry])))
        .expect("move");
    assert_eq!(outcome, CommandOutcome::Moved(Arrival::Captured));
    let nonce = game.state.turn.nonce;

    game.exec(Germany, Command::UndoPhase).expect("undo");
    assert_eq!(game.units_in("poland"), checkpoint_units);
    assert_eq!(game.controller("ukraine"), Some(SovietUnion));
    assert_eq!(game.state.turn.nonce, nonce + 1);

    // The checkpoint survives, so the phase can be undone again.
    game.exec(Germany, Command::UndoPhase).expect("undo again");
    assert_eq!(game.state.phase(), Phase::CombatMove);
}

#[test]
fn undo_outside_a_movement_phase_is_refused() {
    let mut game = Game::new().at(Germany, Phase::CombatMove);
    let error = game.exec(Germany, Command::UndoPhase).unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Phase(ref e) if e.error == PhaseError::NoCheckpoint
    ));

    let mut game = Game::new().at(Germany, Phase::Combat);
    let error = game.exec(Germany, Command::UndoPhase).unwrap_err();
    assert!(matches!(error, ExecuteError::CommandNotAllowedInPhase { .. }));
}

#[test]
fn income_is_paid_once_per_rotation() {
    let mut game = Game::new();
    let start_germany = game.ipcs(Germany);
    let start_soviet = game.ipcs(SovietUnion);

    for turn in 0..4 {
        let summary = end_turn(&mut game);
        assert!(summary.income.is_empty(), "no income after turn {turn}");
    }
    assert_eq!(game.ipcs(Germany), start_germany);

    let summary = end_turn(&mut game);
    assert_eq!(summary.turn, 5);
    assert_eq!(summary.income.get(&Germany), Some(&12));
    assert_eq!(summary.income.get(&SovietUnion), Some(&13));
    assert_eq!(game.ipcs(Germany), start_germany + 12);
    assert_eq!(game.ipcs(SovietUnion), start_soviet + 13);
}

#[test]
fn end_of_turn_restores_movement_and_grounds_stranded_aircraft() {
    let mut game = Game::new().at(Germany, Phase::NonCombatMove);
    let tank = game.spawn("berlin", Germany, UnitKind::Tank);
    let carrier = game.spawn("baltic_sea", Germany, UnitKind::AircraftCarrier);
    let docked = game.spawn("baltic_sea", Germany, UnitKind::Fighter);
    let adrift = game.spawn("north_sea", Germany, UnitKind::Fighter);
    let behind_lines = game.spawn("ukraine", Germany, UnitKind::Bomber);
    let soviet_fighter = game.spawn("north_sea", SovietUnion, UnitKind::Fighter);

    game.exec(Germany, Command::MoveUnits(MoveUnits::new("berlin", "poland", vec![tank])))
        .expect("move tank");
    assert_eq!(game.state.find_unit(tank).map(|(_, unit)| unit.movement), Some(1));

    let summary = end_turn(&mut game);
    assert_eq!(summary.landed_on_carriers, vec![docked]);
    assert_eq!(summary.lost_air, vec![behind_lines, adrift]);
    assert!(!game.state.unit_exists(adrift));
    assert!(!game.state.unit_exists(behind_lines));
    // Other factions' aircraft wait for their own turn.
    assert!(game.state.unit_exists(soviet_fighter));

    let cargo: Vec<_> = game
        .state
        .territory("baltic_sea")
        .and_then(|sea| sea.unit(carrier))
        .map(|unit| unit.cargo.iter().map(|p| p.id).collect())
        .unwrap_or_default();
    assert_eq!(cargo, vec![docked]);
    assert_eq!(game.state.find_unit(tank).map(|(_, unit)| unit.movement), Some(2));
}

#[test]
fn non_combat_movement_may_not_enter_hostile_land() {
    let mut game = Game::new().at(Germany, Phase::NonCombatMove);
    let infantry = game.spawn("poland", Germany, UnitKind::Infantry);
    let error = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "ukraine", vec![infantry])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Move(ref e) if matches!(e.error, MoveError::HostileEntryForbidden { .. })
    ));

    let error = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "moscow", vec![infantry])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Move(ref e) if matches!(e.error, MoveError::NotAdjacent { .. })
    ));
}

#[test]
fn neutral_territory_is_closed() {
    let mut game = Game::new().at(Germany, Phase::CombatMove);
    let tank = game.spawn("berlin", Germany, UnitKind::Tank);
    let error = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("berlin", "switzerland", vec![tank])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Move(ref e) if e.error == MoveError::NeutralTerritory("switzerland".into())
    ));
}

#[test]
fn tanks_may_not_enter_a_territory_held_only_by_a_gun_outside_combat() {
    let mut game = Game::new().at(Germany, Phase::NonCombatMove);
    let tank = game.spawn("poland", Germany, UnitKind::Tank);
    game.spawn("ukraine", SovietUnion, UnitKind::AntiAircraft);

    let error = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "ukraine", vec![tank])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Move(ref e)
            if e.error == MoveError::ContestedEntryForbidden { unit: tank, territory: "ukraine".into() }
    ));
    assert_eq!(game.controller("ukraine"), Some(SovietUnion));
    assert_eq!(game.units_in("poland"), vec![tank]);
}

#[test]
fn anti_aircraft_guns_hold_still_in_combat_and_after_firing() {
    let mut game = Game::new().at(Germany, Phase::CombatMove);
    let gun = game.spawn("poland", Germany, UnitKind::AntiAircraft);
    let error = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "berlin", vec![gun])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Move(ref e) if e.error == MoveError::AntiAircraftInCombatMove { unit: gun }
    ));

    let mut game = Game::new().at(Germany, Phase::NonCombatMove);
    let fired = game.spawn("poland", Germany, UnitKind::AntiAircraft);
    let idle = game.spawn("poland", Germany, UnitKind::AntiAircraft);
    // As if the first gun had already shot at aircraft this turn.
    game.state.fired_anti_aircraft.insert(fired);

    let error = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "berlin", vec![fired])))
        .unwrap_err();
    assert!(matches!(
        error,
        ExecuteError::Move(ref e) if e.error == MoveError::AntiAircraftAlreadyFired { unit: fired }
    ));

    let outcome = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("poland", "berlin", vec![idle])))
        .expect("idle gun moves");
    assert_eq!(outcome, CommandOutcome::Moved(Arrival::Peaceful));
}

#[test]
fn abandoning_a_battle_territory_drops_its_battle() {
    let mut game = Game::new().at(Germany, Phase::CombatMove);
    let first = game.spawn("ukraine", Germany, UnitKind::Fighter);
    let second = game.spawn("ukraine", Germany, UnitKind::Fighter);
    game.spawn("ukraine", SovietUnion, UnitKind::Infantry);
    game.state
        .battles
        .push(Battle::land("ukraine".into(), Germany, "poland".into()));

    game.exec(Germany, Command::MoveUnits(MoveUnits::new("ukraine", "poland", vec![first])))
        .expect("first fighter leaves");
    assert!(game.state.battle("ukraine", BattleTag::Land).is_some());

    game.exec(Germany, Command::MoveUnits(MoveUnits::new("ukraine", "poland", vec![second])))
        .expect("second fighter leaves");
    assert!(game.state.battle("ukraine", BattleTag::Land).is_none());
}

#[test]
fn taking_moscow_costs_the_soviets_their_capital() {
    let mut game = Game::new().at(Germany, Phase::CombatMove);
    let infantry = game.spawn("ukraine", Germany, UnitKind::Infantry);
    let map = &game.oracles.territories;
    assert!(game.state.controls_capital(SovietUnion, map));
    assert!(game.state.controls_capital(Germany, map));

    let outcome = game
        .exec(Germany, Command::MoveUnits(MoveUnits::new("ukraine", "moscow", vec![infantry])))
        .expect("move");
    assert_eq!(outcome, CommandOutcome::Moved(Arrival::Captured));
    let map = &game.oracles.territories;
    assert!(!game.state.controls_capital(SovietUnion, map));
    assert!(game.state.controls_capital(Germany, map));
}
