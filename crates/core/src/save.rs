use crate::{ActiveCard, Catalog, Collection, OwnedCard, Rank, Suit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCard {
    pub id: u32,
    pub level: u8,
    pub owned: bool,
    pub card_value: Rank,
    pub card_suit: Suit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedActive {
    pub id: u32,
    pub uses_remaining: u32,
}

/// The part of a collection that survives a reload. Bonus values are not
/// stored; they are rebuilt from the catalog and the level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub cards: Vec<SavedCard>,
    pub active: Vec<SavedActive>,
    pub max_slots: usize,
}

impl Collection {
    pub fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            cards: self
                .cards
                .iter()
                .map(|card| SavedCard {
                    id: card.id(),
                    level: card.level,
                    owned: card.owned,
                    card_value: card.card_value,
                    card_suit: card.card_suit,
                })
                .collect(),
            active: self
                .active
                .iter()
                .map(|active| SavedActive {
                    id: active.card.id(),
                    uses_remaining: active.uses_remaining,
                })
                .collect(),
            max_slots: self.max_slots,
        }
    }

    /// Replaces the collection contents with a snapshot. Ids missing from the
    /// catalog are skipped, levels are clamped, every equipped card comes back
    /// available and the cached combination is dropped.
    pub fn restore(&mut self, catalog: &Catalog, snapshot: &CollectionSnapshot) {
        let max_level = self.max_level;
        let scaling = self.level_scaling;
        self.max_slots = snapshot.max_slots;
        self.cards = snapshot
            .cards
            .iter()
            .filter_map(|saved| {
                let Some(def) = catalog.get(saved.id) else {
                    log::warn!("saved card {} no longer in catalog", saved.id);
                    return None;
                };
                let mut card = OwnedCard {
                    def: def.clone(),
                    owned: saved.owned,
                    level: saved.level.clamp(crate::MIN_LEVEL, max_level),
                    card_value: saved.card_value,
                    card_suit: saved.card_suit,
                };
                if card.level > crate::MIN_LEVEL {
                    if let Some(bonus) = card.def.bonus.as_mut() {
                        let original = *bonus.original_value.get_or_insert(bonus.value);
                        bonus.value = crate::upgraded_value(original, card.level, scaling);
                    }
                }
                Some(card)
            })
            .collect();

        let mut active = Vec::new();
        for saved in &snapshot.active {
            if active.len() >= self.max_slots {
                break;
            }
            let Some(card) = self.cards.iter().find(|c| c.id() == saved.id && c.owned) else {
                continue;
            };
            if active.iter().any(|a: &ActiveCard| a.card.id() == saved.id) {
                continue;
            }
            let mut entry = ActiveCard::equip(card);
            entry.uses_remaining = saved.uses_remaining;
            entry.available = true;
            active.push(entry);
        }
        self.active = active;
        self.invalidate_combination();
    }
}
