//! State hashes handed to the persistence collaborator.
#![cfg(feature = "serde")]

mod common;

use common::Game;
use conquest_core::{Command, Faction, Phase, UnitKind};

#[test]
fn equal_states_hash_equal() {
    let game = Game::new();
    let copy = game.state.clone();

    let hash = game.state.state_hash().expect("hash");
    assert_eq!(hash, copy.state_hash().expect("hash"));
    assert_eq!(hex::encode(hash).len(), 64);
}

#[test]
fn accepted_commands_change_the_hash_and_rejections_do_not() {
    let mut game = Game::new().at(Faction::Germany, Phase::Purchase);
    game.spawn("berlin", Faction::Germany, UnitKind::Infantry);
    let before = hex::encode(game.state.state_hash().expect("hash"));

    assert!(game.exec(Faction::SovietUnion, Command::EndPhase).is_err());
    assert_eq!(hex::encode(game.state.state_hash().expect("hash")), before);

    game.exec(Faction::Germany, Command::EndPhase).expect("end phase");
    assert_ne!(hex::encode(game.state.state_hash().expect("hash")), before);
}
