use super::error::ProductionError;
use super::transition::{CommandTransition, acting_faction};
use crate::env::GameEnv;
use crate::state::{GameState, ProductionItem};

/// Buys one item and queues it for mobilization.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PurchaseUnit {
    pub item: ProductionItem,
}

impl PurchaseUnit {
    pub fn new(item: ProductionItem) -> Self {
        Self { item }
    }
}

/// Balance left after a purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Purchased {
    pub item: ProductionItem,
    pub cost: u32,
    pub remaining_ipcs: u32,
}

impl CommandTransition for PurchaseUnit {
    type Error = ProductionError;
    type Output = Purchased;

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let faction = acting_faction(state)?;
        let player = state
            .player(faction)
            .ok_or(ProductionError::UnknownPlayer { faction })?;

        let cost = env.item_cost(self.item)?;
        if cost > player.ipcs {
            return Err(ProductionError::InsufficientIpcs {
                item: self.item,
                cost,
                available: player.ipcs,
            });
        }

        // One complex per controlled territory, counting those still in the queue.
        if self.item == ProductionItem::IndustrialComplex {
            let controlled = state.controlled_territories(faction).len();
            let owned = state.factory_count(faction);
            let queued = player.pending_count(ProductionItem::IndustrialComplex);
            if controlled <= owned + queued {
                return Err(ProductionError::IndustrialComplexLimit {
                    controlled,
                    owned,
                    queued,
                });
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        let faction = acting_faction(state)?;
        let cost = env.item_cost(self.item)?;
        let player = state
            .player_mut(faction)
            .ok_or(ProductionError::UnknownPlayer { faction })?;
        player.ipcs = player.ipcs.saturating_sub(cost);
        player.pending.push(self.item);

        tracing::debug!(faction = %faction, item = %self.item, cost, remaining = player.ipcs, "item purchased");
        Ok(Purchased {
            item: self.item,
            cost,
            remaining_ipcs: player.ipcs,
        })
    }
}
