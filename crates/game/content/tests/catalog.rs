use conquest_content::{catalog, init_catalog};
use conquest_core::{Faction, GameState, TerritoryOracle, UnitKind};

#[test]
fn default_catalog_starts_a_full_game() {
    let content = catalog().expect("embedded content");
    let state = GameState::new_game(&content.pcg_env()).expect("new game");

    assert_eq!(state.territories.len(), content.territories.len());
    for faction in Faction::ALL {
        let capital = content.territories.capital_of(faction).expect("capital");
        let territory = state.territory(capital.as_str()).expect("capital state");
        assert_eq!(territory.controller, Some(faction));
        assert!(territory.has_factory);
        assert_eq!(
            state.player(faction).map(|p| p.ipcs),
            Some(content.config.config.starting_ipcs_for(faction))
        );
    }

    let russia = state.territory("russia").expect("russia");
    let infantry = russia
        .units
        .iter()
        .filter(|unit| unit.kind == UnitKind::Infantry)
        .count();
    assert_eq!(infantry, 3);
}

#[test]
fn catalog_is_built_once() {
    let first = catalog().expect("embedded content");
    let second = catalog().expect("embedded content");
    assert!(std::ptr::eq(first, second));

    let dir = tempfile::tempdir().expect("tempdir");
    conquest_content::ContentFactory::new(dir.path())
        .export_embedded()
        .expect("export");
    assert!(init_catalog(dir.path()).is_err());
}
