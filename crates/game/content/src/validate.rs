//! Consistency checks over a loaded snapshot.
//!
//! The engine trusts its reference data; anything that would let a command
//! reach an impossible state is rejected here, at load time.

use std::collections::BTreeMap;

use conquest_core::{Faction, OracleSnapshot, TerritoryId, TerritoryOracle, UnitKind};

/// One problem found in a content snapshot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentIssue {
    #[error("{0} lists itself as a neighbor")]
    SelfBorder(TerritoryId),

    #[error("{from} lists unknown neighbor {to}")]
    UnknownNeighbor { from: TerritoryId, to: TerritoryId },

    #[error("{from} borders {to} but {to} does not border {from}")]
    OneWayBorder { from: TerritoryId, to: TerritoryId },

    #[error("{faction} has {count} capitals")]
    CapitalCount { faction: Faction, count: usize },

    #[error("capital {0} has no controller")]
    NeutralCapital(TerritoryId),

    #[error("ocean {0} cannot be controlled, be a capital or produce income")]
    OwnedOcean(TerritoryId),

    #[error("ocean {0} cannot hold an industrial complex")]
    OceanFactory(TerritoryId),

    #[error("{territory} garrisons {kind}, which cannot stand there")]
    MisplacedGarrison {
        territory: TerritoryId,
        kind: UnitKind,
    },

    #[error("no stats for unit type {0}")]
    MissingUnitStats(UnitKind),

    #[error("dice must have at least one side")]
    NoDiceSides,

    #[error("income interval must be at least one turn")]
    NoIncomeInterval,
}

/// Every problem in `content`, in a stable order.
pub fn issues(content: &OracleSnapshot) -> Vec<ContentIssue> {
    let mut found = Vec::new();
    let map = &content.territories;
    let mut capitals: BTreeMap<Faction, usize> = Faction::ALL.iter().map(|f| (*f, 0)).collect();

    for info in map.iter() {
        for neighbor in &info.neighbors {
            if *neighbor == info.name {
                found.push(ContentIssue::SelfBorder(info.name.clone()));
            } else if map.territory(neighbor.as_str()).is_none() {
                found.push(ContentIssue::UnknownNeighbor {
                    from: info.name.clone(),
                    to: neighbor.clone(),
                });
            } else if !map.is_adjacent(neighbor.as_str(), info.name.as_str()) {
                found.push(ContentIssue::OneWayBorder {
                    from: info.name.clone(),
                    to: neighbor.clone(),
                });
            }
        }

        if info.is_ocean {
            if info.controller.is_some() || info.is_capital || info.power > 0 {
                found.push(ContentIssue::OwnedOcean(info.name.clone()));
            }
            if info.has_factory {
                found.push(ContentIssue::OceanFactory(info.name.clone()));
            }
        } else if info.is_capital {
            match info.controller {
                Some(faction) => *capitals.entry(faction).or_default() += 1,
                None => found.push(ContentIssue::NeutralCapital(info.name.clone())),
            }
        }

        for group in &info.garrison {
            let fits = if info.is_ocean {
                group.kind.is_sea()
            } else {
                !group.kind.is_sea()
            };
            if !fits {
                found.push(ContentIssue::MisplacedGarrison {
                    territory: info.name.clone(),
                    kind: group.kind,
                });
            }
        }
    }

    found.extend(
        capitals
            .into_iter()
            .filter(|(_, count)| *count != 1)
            .map(|(faction, count)| ContentIssue::CapitalCount { faction, count }),
    );
    found.extend(
        content
            .units
            .missing_kinds()
            .into_iter()
            .map(ContentIssue::MissingUnitStats),
    );

    let config = &content.config.config;
    if config.dice_sides == 0 {
        found.push(ContentIssue::NoDiceSides);
    }
    if config.income_interval == 0 {
        found.push(ContentIssue::NoIncomeInterval);
    }

    found
}

/// Fails with every issue in `content` if there is at least one.
pub fn validate(content: &OracleSnapshot) -> anyhow::Result<()> {
    let found = issues(content);
    if found.is_empty() {
        return Ok(());
    }
    for issue in &found {
        tracing::warn!(%issue, "content issue");
    }
    let listed: Vec<String> = found.iter().map(ToString::to_string).collect();
    anyhow::bail!("{} content issue(s): {}", found.len(), listed.join("; "))
}

#[cfg(test)]
mod tests {
    use conquest_core::{
        GameConfig, SnapshotConfigOracle, SnapshotTerritoryOracle, SnapshotUnitOracle,
        StartingUnits, TerritoryInfo, UnitStats,
    };

    use super::*;

    fn land(name: &str, controller: Option<Faction>, neighbors: &[&str]) -> TerritoryInfo {
        TerritoryInfo {
            name: TerritoryId::new(name),
            controller,
            is_capital: false,
            is_ocean: false,
            power: 1,
            neighbors: neighbors.iter().map(|n| TerritoryId::new(*n)).collect(),
            has_factory: false,
            garrison: Vec::new(),
        }
    }

    fn capitals() -> Vec<TerritoryInfo> {
        Faction::ALL
            .into_iter()
            .map(|faction| TerritoryInfo {
                is_capital: true,
                ..land(faction.as_ref(), Some(faction), &[])
            })
            .collect()
    }

    fn snapshot(extra: Vec<TerritoryInfo>) -> OracleSnapshot {
        let mut map = capitals();
        map.extend(extra);
        OracleSnapshot::new(
            SnapshotTerritoryOracle::new(map),
            SnapshotUnitOracle::new(
                UnitKind::ALL.map(|kind| (kind, UnitStats::new(1, 1, 1, 1))),
                15,
            ),
            SnapshotConfigOracle::new(GameConfig::new()),
        )
    }

    #[test]
    fn one_capital_each_and_nothing_else_is_clean() {
        assert!(issues(&snapshot(Vec::new())).is_empty());
        assert!(validate(&snapshot(Vec::new())).is_ok());
    }

    #[test]
    fn borders_must_be_mutual_and_known() {
        let found = issues(&snapshot(vec![
            land("a", None, &["b", "nowhere", "a"]),
            land("b", None, &[]),
        ]));
        assert_eq!(
            found,
            vec![
                ContentIssue::OneWayBorder {
                    from: TerritoryId::new("a"),
                    to: TerritoryId::new("b"),
                },
                ContentIssue::UnknownNeighbor {
                    from: TerritoryId::new("a"),
                    to: TerritoryId::new("nowhere"),
                },
                ContentIssue::SelfBorder(TerritoryId::new("a")),
            ]
        );
    }

    #[test]
    fn second_capital_is_reported_per_faction() {
        let found = issues(&snapshot(vec![TerritoryInfo {
            is_capital: true,
            ..land("rome", Some(Faction::Germany), &[])
        }]));
        assert_eq!(
            found,
            vec![ContentIssue::CapitalCount {
                faction: Faction::Germany,
                count: 2,
            }]
        );
    }

    #[test]
    fn oceans_hold_ships_only() {
        let ocean = TerritoryInfo {
            is_ocean: true,
            power: 0,
            has_factory: true,
            garrison: vec![
                StartingUnits {
                    faction: Faction::Japan,
                    kind: UnitKind::Transport,
                    count: 1,
                },
                StartingUnits {
                    faction: Faction::Japan,
                    kind: UnitKind::Fighter,
                    count: 1,
                },
            ],
            ..land("pacific", None, &[])
        };
        let found = issues(&snapshot(vec![ocean]));
        assert_eq!(
            found,
            vec![
                ContentIssue::OceanFactory(TerritoryId::new("pacific")),
                ContentIssue::MisplacedGarrison {
                    territory: TerritoryId::new("pacific"),
                    kind: UnitKind::Fighter,
                },
            ]
        );
    }

    #[test]
    fn ships_cannot_start_ashore() {
        let mut port = land("port", Some(Faction::UnitedKingdom), &[]);
        port.garrison.push(StartingUnits {
            faction: Faction::UnitedKingdom,
            kind: UnitKind::Destroyer,
            count: 1,
        });
        assert_eq!(
            issues(&snapshot(vec![port])),
            vec![ContentIssue::MisplacedGarrison {
                territory: TerritoryId::new("port"),
                kind: UnitKind::Destroyer,
            }]
        );
    }

    #[test]
    fn tunables_must_be_positive() {
        let mut content = snapshot(Vec::new());
        content.config.config.dice_sides = 0;
        content.config.config.income_interval = 0;
        let err = validate(&content).unwrap_err().to_string();
        assert!(err.starts_with("2 content issue(s)"), "{err}");
    }
}
