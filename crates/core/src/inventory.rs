use crate::{
    combination_key, evaluate_combination, Bonus, BonusCardDef, Card, Catalog, CombinationKey,
    CombinationRules, DeckCombination, EffectKind, Rank, RngState, Suit,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_LEVEL: u8 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedCard {
    #[serde(flatten)]
    pub def: BonusCardDef,
    pub owned: bool,
    pub level: u8,
    /// Playing-card face fixed at acquisition.
    pub card_value: Rank,
    pub card_suit: Suit,
}

impl OwnedCard {
    pub fn new(def: &BonusCardDef, face: Card) -> Self {
        Self {
            def: def.clone(),
            owned: true,
            level: MIN_LEVEL,
            card_value: face.rank,
            card_suit: face.suit,
        }
    }

    pub fn id(&self) -> u32 {
        self.def.id
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn is_active_type(&self) -> bool {
        self.def.effect == EffectKind::Active
    }

    pub fn uses(&self) -> u32 {
        self.def.uses.unwrap_or(0)
    }

    pub fn bonus(&self) -> Option<&Bonus> {
        self.def.bonus.as_ref()
    }

    pub fn face(&self) -> Card {
        Card::new(self.card_suit, self.card_value)
    }
}

/// An equipped card: a copy of the owned card plus per-combat use tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCard {
    #[serde(flatten)]
    pub card: OwnedCard,
    pub uses_remaining: u32,
    pub available: bool,
}

impl ActiveCard {
    pub fn equip(card: &OwnedCard) -> Self {
        Self {
            card: card.clone(),
            uses_remaining: card.uses(),
            available: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("unknown card {0}")]
    UnknownCard(u32),
    #[error("card {0} is already owned")]
    AlreadyOwned(u32),
    #[error("card {0} is not owned")]
    NotOwned(u32),
    #[error("card {0} is already equipped")]
    AlreadyEquipped(u32),
    #[error("card {0} is not equipped")]
    NotEquipped(u32),
    #[error("no free bonus card slot")]
    NoSlots,
    #[error("card {0} is at max level")]
    MaxLevel(u32),
    #[error("invalid active card index {0}")]
    InvalidIndex(usize),
    #[error("active card {0} has a passive effect")]
    PassiveCard(usize),
    #[error("active card {0} has no uses remaining")]
    NoUsesRemaining(usize),
}

impl CollectionError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnknownCard(_) => "card_not_found",
            Self::AlreadyOwned(_) => "already_owned",
            Self::NotOwned(_) => "not_owned",
            Self::AlreadyEquipped(_) => "already_equipped",
            Self::NotEquipped(_) => "not_equipped",
            Self::NoSlots => "no_slots",
            Self::MaxLevel(_) => "max_level",
            Self::InvalidIndex(_) => "invalid_index",
            Self::PassiveCard(_) => "passive_card",
            Self::NoUsesRemaining(_) => "no_uses_remaining",
        }
    }
}

/// `floor(original * (1 + scaling * (level - 1)))`.
pub fn upgraded_value(original: f64, level: u8, scaling: f64) -> f64 {
    let steps = level.saturating_sub(MIN_LEVEL) as f64;
    // Guards exact products such as 5 * 1.4 against landing just below the integer.
    (original * (1.0 + scaling * steps) + 1e-9).floor()
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub(crate) cards: Vec<OwnedCard>,
    pub(crate) active: Vec<ActiveCard>,
    pub(crate) max_slots: usize,
    pub(crate) max_level: u8,
    pub(crate) level_scaling: f64,
    pub(crate) combination: Option<(CombinationKey, DeckCombination)>,
}

impl Collection {
    pub fn new(max_slots: usize) -> Self {
        Self::with_rules(max_slots, 3, 0.2)
    }

    pub fn with_rules(max_slots: usize, max_level: u8, level_scaling: f64) -> Self {
        Self {
            cards: Vec::new(),
            active: Vec::new(),
            max_slots,
            max_level,
            level_scaling,
            combination: None,
        }
    }

    pub fn cards(&self) -> &[OwnedCard] {
        &self.cards
    }

    pub fn active(&self) -> &[ActiveCard] {
        &self.active
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn card(&self, id: u32) -> Option<&OwnedCard> {
        self.cards.iter().find(|card| card.id() == id)
    }

    pub fn owns(&self, id: u32) -> bool {
        self.card(id).map(|card| card.owned).unwrap_or(false)
    }

    pub fn is_equipped(&self, id: u32) -> bool {
        self.active.iter().any(|card| card.card.id() == id)
    }

    /// Replaces the collection with fresh level-1 cards and equips as many as fit.
    pub fn init(&mut self, starting_ids: &[u32], catalog: &Catalog, rng: &mut RngState) {
        self.cards.clear();
        self.active.clear();
        for &id in starting_ids {
            let Some(def) = catalog.get(id) else {
                log::warn!("starting card {id} missing from catalog");
                continue;
            };
            if self.card(id).is_some() {
                continue;
            }
            self.cards.push(OwnedCard::new(def, rng.playing_card()));
        }
        self.active = self
            .cards
            .iter()
            .take(self.max_slots)
            .map(ActiveCard::equip)
            .collect();
        self.invalidate_combination();
    }

    pub fn add_card(
        &mut self,
        id: u32,
        catalog: &Catalog,
        rng: &mut RngState,
    ) -> Result<(), CollectionError> {
        if let Some(card) = self.cards.iter_mut().find(|card| card.id() == id) {
            if card.owned {
                return Err(CollectionError::AlreadyOwned(id));
            }
            card.owned = true;
            return Ok(());
        }
        let def = catalog.get(id).ok_or(CollectionError::UnknownCard(id))?;
        self.cards.push(OwnedCard::new(def, rng.playing_card()));
        Ok(())
    }

    pub fn equip_card(&mut self, id: u32) -> Result<(), CollectionError> {
        if self.is_equipped(id) {
            return Err(CollectionError::AlreadyEquipped(id));
        }
        if self.active.len() >= self.max_slots {
            return Err(CollectionError::NoSlots);
        }
        let card = self
            .cards
            .iter()
            .find(|card| card.id() == id && card.owned)
            .ok_or(CollectionError::NotOwned(id))?;
        self.active.push(ActiveCard::equip(card));
        self.invalidate_combination();
        Ok(())
    }

    pub fn unequip_card(&mut self, id: u32) -> Result<(), CollectionError> {
        let before = self.active.len();
        self.active.retain(|card| card.card.id() != id);
        if self.active.len() == before {
            return Err(CollectionError::NotEquipped(id));
        }
        self.invalidate_combination();
        Ok(())
    }

    /// Raises a card one level and returns the new level.
    pub fn upgrade_card(&mut self, id: u32) -> Result<u8, CollectionError> {
        let max_level = self.max_level;
        let scaling = self.level_scaling;
        let card = self
            .cards
            .iter_mut()
            .find(|card| card.id() == id)
            .ok_or(CollectionError::UnknownCard(id))?;
        if card.level >= max_level {
            return Err(CollectionError::MaxLevel(id));
        }
        card.level += 1;
        if let Some(bonus) = card.def.bonus.as_mut() {
            let original = *bonus.original_value.get_or_insert(bonus.value);
            bonus.value = upgraded_value(original, card.level, scaling);
        }
        let updated = card.clone();
        let level = updated.level;
        if let Some(active) = self.active.iter_mut().find(|active| active.card.id() == id) {
            active.card = updated;
        }
        self.invalidate_combination();
        Ok(level)
    }

    pub fn reset_card_uses(&mut self) {
        for active in &mut self.active {
            if active.card.is_active_type() {
                active.uses_remaining = active.card.uses();
                active.available = true;
            }
        }
    }

    /// Consumes one use of the active card at `index`; returns the uses left.
    pub fn use_card(&mut self, index: usize) -> Result<u32, CollectionError> {
        let active = self
            .active
            .get_mut(index)
            .ok_or(CollectionError::InvalidIndex(index))?;
        if !active.card.is_active_type() {
            return Err(CollectionError::PassiveCard(index));
        }
        if active.uses_remaining == 0 {
            return Err(CollectionError::NoUsesRemaining(index));
        }
        active.uses_remaining -= 1;
        if active.uses_remaining == 0 {
            active.available = false;
        }
        Ok(active.uses_remaining)
    }

    pub fn increase_max_slots(&mut self, amount: usize) {
        self.max_slots = self.max_slots.saturating_add(amount);
    }

    pub fn invalidate_combination(&mut self) {
        self.combination = None;
    }

    /// The last evaluated combination, if it still matches the equipped set.
    pub fn cached_combination(&self) -> Option<&DeckCombination> {
        match &self.combination {
            Some((key, combination)) if *key == combination_key(&self.active) => {
                Some(combination)
            }
            _ => None,
        }
    }

    pub fn combination(&mut self, rules: &CombinationRules) -> &DeckCombination {
        if self.cached_combination().is_none() {
            self.combination = None;
        }
        let active = &self.active;
        let (_, combination) = self.combination.get_or_insert_with(|| {
            (combination_key(active), evaluate_combination(active, rules))
        });
        combination
    }
}
