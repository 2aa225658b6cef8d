use super::{Faction, ProductionItem};

/// Per-faction economy: IPC balance and the mobilization queue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub faction: Faction,
    pub ipcs: u32,
    /// Purchased but not yet placed.
    pub pending: Vec<ProductionItem>,
}

impl PlayerState {
    pub fn new(faction: Faction, ipcs: u32) -> Self {
        Self {
            faction,
            ipcs,
            pending: Vec::new(),
        }
    }

    pub fn pending_count(&self, item: ProductionItem) -> usize {
        self.pending.iter().filter(|queued| **queued == item).count()
    }

    /// Removes one queued `item`. Returns false if none is queued.
    pub fn take_pending(&mut self, item: ProductionItem) -> bool {
        match self.pending.iter().position(|queued| *queued == item) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UnitKind;

    #[test]
    fn take_pending_removes_a_single_entry() {
        let infantry = ProductionItem::Unit(UnitKind::Infantry);
        let mut player = PlayerState::new(Faction::Japan, 0);
        player.pending = vec![infantry, ProductionItem::IndustrialComplex, infantry];

        assert!(player.take_pending(infantry));
        assert_eq!(player.pending_count(infantry), 1);
        assert!(!player.take_pending(ProductionItem::Unit(UnitKind::Tank)));
        assert_eq!(player.pending.len(), 2);
    }
}
