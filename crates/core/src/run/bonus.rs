use super::*;
use crate::*;

impl RunState {
    pub fn acquire_bonus_card(&mut self, id: u32, events: &mut EventBus) -> Result<(), RunError> {
        let Some(def) = self.content.catalog.get(id) else {
            log::warn!("acquire: card {id} not in catalog");
            return Err(RunError::InvalidCard(id));
        };
        let name = def.name.clone();
        self.collection
            .add_card(id, &self.content.catalog, &mut self.rng)?;
        self.stats.bonus_cards_collected += 1;
        events.push(Event::BonusCardAcquired { id });
        events.feedback(
            format!("Nouvelle carte bonus : {name}"),
            FeedbackKind::Success,
        );
        Ok(())
    }

    /// Spends `gold_cost` and raises the card one level. All checks run
    /// before any gold moves.
    pub fn upgrade_bonus_card(
        &mut self,
        id: u32,
        gold_cost: i64,
        events: &mut EventBus,
    ) -> Result<u8, RunError> {
        let card = self
            .collection
            .card(id)
            .ok_or(CollectionError::UnknownCard(id))?;
        if card.level >= self.collection.max_level() {
            return Err(CollectionError::MaxLevel(id).into());
        }
        if self.player.gold < gold_cost {
            return Err(RunError::NotEnoughGold {
                needed: gold_cost,
                available: self.player.gold,
            });
        }
        let name = card.name().to_string();
        self.player.spend_gold(gold_cost);
        let level = self.collection.upgrade_card(id)?;
        events.push(Event::BonusCardUpgraded { id, level });
        events.feedback(
            format!("{name} améliorée au niveau {level}"),
            FeedbackKind::Success,
        );
        Ok(level)
    }

    /// Upgrade at the configured default price.
    pub fn upgrade_bonus_card_default(
        &mut self,
        id: u32,
        events: &mut EventBus,
    ) -> Result<u8, RunError> {
        let cost = self.config.collection.upgrade_gold_cost;
        self.upgrade_bonus_card(id, cost, events)
    }

    pub fn equip_bonus_card(&mut self, id: u32, events: &mut EventBus) -> Result<(), RunError> {
        if let Err(err) = self.collection.equip_card(id) {
            events.feedback(format!("Impossible d'équiper : {err}"), FeedbackKind::Warning);
            return Err(err.into());
        }
        events.feedback("Carte équipée", FeedbackKind::Info);
        Ok(())
    }

    pub fn unequip_bonus_card(&mut self, id: u32, events: &mut EventBus) -> Result<(), RunError> {
        self.collection.unequip_card(id)?;
        events.feedback("Carte retirée", FeedbackKind::Info);
        Ok(())
    }
}
