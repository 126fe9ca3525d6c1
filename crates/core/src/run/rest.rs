use super::*;
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestOption {
    Heal,
    Shield,
    Upgrade(u32),
}

impl RunState {
    pub fn rest_cost(&self, option: RestOption) -> i64 {
        let rule = &self.config.rest;
        match option {
            RestOption::Heal => rule.heal_cost,
            RestOption::Shield => rule.shield_cost,
            RestOption::Upgrade(_) => rule.upgrade_cost,
        }
    }

    /// One rest action per visit.
    pub fn take_rest(&mut self, option: RestOption, events: &mut EventBus) -> Result<String, RunError> {
        self.require_phase(GamePhase::Rest)?;
        if self.rest_taken {
            return Err(RunError::RestTaken);
        }
        let cost = self.rest_cost(option);
        if self.player.gold < cost {
            return Err(RunError::NotEnoughGold {
                needed: cost,
                available: self.player.gold,
            });
        }
        if let RestOption::Upgrade(id) = option {
            let card = self
                .collection
                .card(id)
                .ok_or(CollectionError::UnknownCard(id))?;
            if card.level >= self.collection.max_level() {
                return Err(CollectionError::MaxLevel(id).into());
            }
        }

        self.player.spend_gold(cost);
        let message = match option {
            RestOption::Heal => {
                let amount =
                    (self.player.max_health as f64 * self.config.rest.heal_ratio).floor() as i64;
                let healed = self.player.heal(amount);
                format!("Vous récupérez {healed} PV")
            }
            RestOption::Shield => {
                let amount = self.config.rest.shield_amount;
                self.player.add_shield(amount);
                format!("Vous gagnez {amount} points de bouclier")
            }
            RestOption::Upgrade(id) => {
                let level = self.collection.upgrade_card(id)?;
                events.push(Event::BonusCardUpgraded { id, level });
                format!("Carte améliorée au niveau {level}")
            }
        };
        self.rest_taken = true;
        events.feedback(message.clone(), FeedbackKind::Success);
        Ok(message)
    }

    pub fn complete_rest(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(GamePhase::Rest)?;
        self.change_phase(GamePhase::Exploration, PhaseOptions::default(), events)
    }
}
