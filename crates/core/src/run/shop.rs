use super::*;
use crate::*;

impl RunState {
    pub fn shop_items(&self) -> &[ShopItem] {
        self.shop.as_ref().map(|shop| shop.items.as_slice()).unwrap_or(&[])
    }

    pub fn purchase_shop_item(
        &mut self,
        index: usize,
        events: &mut EventBus,
    ) -> Result<ShopItem, RunError> {
        self.require_phase(GamePhase::Shop)?;
        let item = self
            .shop
            .as_ref()
            .and_then(|shop| shop.items.get(index))
            .cloned()
            .ok_or(RunError::InvalidShopItem(index))?;
        if self.player.gold < item.price {
            return Err(RunError::NotEnoughGold {
                needed: item.price,
                available: self.player.gold,
            });
        }
        if let ShopEffect::BonusCard { id } = item.effect {
            if !self.content.catalog.contains(id) {
                return Err(RunError::InvalidCard(id));
            }
            if self.collection.owns(id) {
                return Err(CollectionError::AlreadyOwned(id).into());
            }
        }

        self.player.spend_gold(item.price);
        match item.effect {
            ShopEffect::Heal { value } => {
                self.player.heal(value);
            }
            ShopEffect::Shield { value } => self.player.add_shield(value),
            ShopEffect::MaxHealth { value } => self.player.raise_max_health(value),
            ShopEffect::BonusCard { id } => self.acquire_bonus_card(id, events)?,
            ShopEffect::Slot { value } => self.collection.increase_max_slots(value),
        }
        if let Some(shop) = self.shop.as_mut() {
            shop.items.remove(index);
        }
        *self.shop_purchases.entry(item.id.clone()).or_insert(0) += 1;
        self.stats.items_purchased += 1;
        events.push(Event::ShopBought {
            item: item.id.clone(),
            price: item.price,
            gold: self.player.gold,
        });
        events.feedback(format!("{} acheté", item.name), FeedbackKind::Success);
        Ok(item)
    }

    pub fn purchases_of(&self, item_id: &str) -> u32 {
        self.shop_purchases.get(item_id).copied().unwrap_or(0)
    }

    pub fn leave_shop(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(GamePhase::Shop)?;
        self.change_phase(GamePhase::Exploration, PhaseOptions::default(), events)
    }
}
