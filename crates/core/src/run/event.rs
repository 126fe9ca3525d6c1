use super::*;
use crate::*;

impl RunState {
    /// Resolves a choice of the current event. The gold cost is paid up
    /// front, then the chance roll picks the success or failure outcome.
    pub fn make_event_choice(
        &mut self,
        index: usize,
        events: &mut EventBus,
    ) -> Result<EventResult, RunError> {
        self.require_phase(GamePhase::Event)?;
        let state = self.event.as_ref().ok_or(RunError::NoEvent)?;
        if state.result.is_some() {
            return Err(RunError::EventResolved);
        }
        let choice = state
            .def
            .choices
            .get(index)
            .cloned()
            .ok_or(RunError::InvalidChoice(index))?;
        if self.player.gold < choice.gold_cost {
            return Err(RunError::NotEnoughGold {
                needed: choice.gold_cost,
                available: self.player.gold,
            });
        }

        self.player.spend_gold(choice.gold_cost);
        let success = self.rng.chance(choice.chance);
        let (message, applied) = if success {
            let applied = self.apply_event_outcome(&choice.outcome, events);
            (choice.result_text.clone(), applied)
        } else {
            let applied = self.apply_event_outcome(&choice.failure_outcome, events);
            let text = choice
                .failure_text
                .clone()
                .unwrap_or_else(|| "Rien ne se passe.".to_string());
            (text, applied)
        };

        let result = EventResult {
            choice: index,
            success,
            message,
            applied,
        };
        if let Some(state) = self.event.as_mut() {
            state.result = Some(result.clone());
        }
        events.push(Event::EventResolved {
            choice: index,
            success,
        });
        let kind = if success {
            FeedbackKind::Success
        } else {
            FeedbackKind::Warning
        };
        events.feedback(result.message.clone(), kind);
        Ok(result)
    }

    fn apply_event_outcome(&mut self, outcome: &EventOutcome, events: &mut EventBus) -> EventOutcome {
        let mut applied = EventOutcome::default();
        if outcome.gold > 0 {
            self.player.add_gold(outcome.gold);
            self.stats.gold_earned += outcome.gold;
            applied.gold = outcome.gold;
        }
        if outcome.healing > 0 {
            applied.healing = self.player.heal(outcome.healing);
        }
        if outcome.health_cost > 0 {
            // An event never kills outright.
            let before = self.player.health;
            self.player.health = (self.player.health - outcome.health_cost).max(1);
            applied.health_cost = before - self.player.health;
        }
        if outcome.shield > 0 {
            self.player.add_shield(outcome.shield);
            applied.shield = outcome.shield;
        }

        let mut card = outcome.card;
        if card.is_none() && outcome.random_card {
            let owned = self.owned_ids();
            let candidates: Vec<u32> = self
                .content
                .catalog
                .ids()
                .filter(|id| !owned.contains(id))
                .collect();
            card = self.rng.pick(&candidates).copied();
        }
        if let Some(id) = card {
            match self.acquire_bonus_card(id, events) {
                Ok(()) => applied.card = Some(id),
                Err(err) => log::warn!("event card {id} not granted: {}", err.reason()),
            }
        }
        applied
    }

    pub fn complete_event(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(GamePhase::Event)?;
        self.change_phase(GamePhase::Exploration, PhaseOptions::default(), events)
    }
}
