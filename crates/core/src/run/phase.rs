use super::*;
use crate::*;

#[derive(Debug, Clone, Default)]
pub struct PhaseOptions {
    pub enemy: Option<Enemy>,
    pub is_elite: bool,
    pub is_boss: bool,
    pub generate_event: bool,
}

impl PhaseOptions {
    pub fn combat(tier: EnemyTier) -> Self {
        Self {
            is_elite: tier == EnemyTier::Elite,
            is_boss: tier == EnemyTier::Boss,
            ..Self::default()
        }
    }

    pub fn with_enemy(enemy: Enemy) -> Self {
        Self {
            enemy: Some(enemy),
            ..Self::default()
        }
    }

    pub fn event() -> Self {
        Self {
            generate_event: true,
            ..Self::default()
        }
    }
}

impl RunState {
    /// Switches the game phase. Entry failures are reported but the new
    /// phase is kept.
    pub fn change_phase(
        &mut self,
        to: GamePhase,
        options: PhaseOptions,
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        let from = self.phase;
        self.record_transition(from, to);
        log::info!("phase {from:?} -> {to:?}");

        self.exit_phase(from);
        self.phase = to;
        events.push(Event::PhaseChanged { from, to });

        if let Err(err) = self.enter_phase(to, options, events) {
            log::warn!("entering {to:?} failed: {err}");
            events.feedback(
                "Une erreur est survenue lors du changement de phase",
                FeedbackKind::Error,
            );
            return Err(RunError::PhaseEntry {
                phase: to,
                message: err.to_string(),
            });
        }
        Ok(())
    }

    pub fn set_turn_phase(
        &mut self,
        phase: TurnPhase,
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        if self.phase != GamePhase::Combat {
            log::warn!("turn phase {phase:?} requested outside combat");
            return Err(RunError::NotInCombat);
        }
        log::debug!("turn phase {:?} -> {phase:?}", self.combat.turn_phase);
        self.combat.turn_phase = phase;
        match phase {
            TurnPhase::Draw => self.combat.clear_selection(),
            TurnPhase::Select => {}
            TurnPhase::Result => {
                if self.combat.enemy_defeated() && !self.reward_pending() {
                    let delay = self.config.combat.reward_delay_ms;
                    let id = self
                        .scheduler
                        .schedule(delay, ScheduledAction::EnterPhase(GamePhase::Reward));
                    self.reward_task = Some(id);
                }
            }
        }
        events.push(Event::TurnPhaseChanged { phase });
        Ok(())
    }

    /// Advances the logical clock and applies every transition that came due.
    /// Returns how many fired. A failing task does not stop the ones after
    /// it; the first failure is returned once all have run.
    pub fn advance_time(&mut self, ms: u64, events: &mut EventBus) -> Result<usize, RunError> {
        let due = self.scheduler.advance(ms);
        let fired = due.len();
        let mut first_err = None;
        for (id, action) in due {
            if self.reward_task == Some(id) {
                self.reward_task = None;
            }
            let result = match action {
                ScheduledAction::EnterPhase(phase) => {
                    self.change_phase(phase, PhaseOptions::default(), events)
                }
            };
            if let Err(err) = result {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(fired),
        }
    }

    fn record_transition(&mut self, from: GamePhase, to: GamePhase) {
        self.history.push_back(PhaseTransition {
            from,
            to,
            timestamp: self.scheduler.now(),
        });
        while self.history.len() > self.config.phase_history_limit {
            self.history.pop_front();
        }
    }

    fn exit_phase(&mut self, phase: GamePhase) {
        match phase {
            GamePhase::Combat => {
                self.combat.discard_mode = false;
                self.combat.discard_used = false;
                self.combat.deck_bonus = None;
                if let Some(id) = self.reward_task.take() {
                    self.scheduler.cancel(id);
                }
            }
            GamePhase::Shop => self.shop = None,
            GamePhase::Event => self.event = None,
            GamePhase::Exploration
            | GamePhase::Rest
            | GamePhase::Reward
            | GamePhase::GameOver => {}
        }
    }

    fn enter_phase(
        &mut self,
        phase: GamePhase,
        options: PhaseOptions,
        events: &mut EventBus,
    ) -> Result<(), HookError> {
        match phase {
            GamePhase::Exploration => {
                if self.map.is_empty() {
                    log::warn!("exploration without a map, generating stage {}", self.stage);
                    let owned = self.owned_ids();
                    let mut ctx = HookContext {
                        content: &self.content,
                        config: &self.config,
                        stage: self.stage,
                        owned: &owned,
                        rng: &mut self.rng,
                    };
                    self.map = self.hooks.generate_map(&mut ctx)?;
                }
            }
            GamePhase::Combat => self.enter_combat(options, events)?,
            GamePhase::Shop => {
                let empty = self.shop.as_ref().map(|s| s.items.is_empty()).unwrap_or(true);
                if empty {
                    let owned = self.owned_ids();
                    let mut ctx = HookContext {
                        content: &self.content,
                        config: &self.config,
                        stage: self.stage,
                        owned: &owned,
                        rng: &mut self.rng,
                    };
                    let items = self.hooks.init_shop(&mut ctx, &self.shop_purchases)?;
                    self.shop = Some(ShopState { items });
                }
            }
            GamePhase::Rest => self.rest_taken = false,
            GamePhase::Event => {
                if options.generate_event && self.event.is_none() {
                    let owned = self.owned_ids();
                    let mut ctx = HookContext {
                        content: &self.content,
                        config: &self.config,
                        stage: self.stage,
                        owned: &owned,
                        rng: &mut self.rng,
                    };
                    let def = self.hooks.generate_event(&mut ctx)?;
                    self.event = Some(EventState { def, result: None });
                }
            }
            GamePhase::Reward => self.process_reward(events)?,
            GamePhase::GameOver => {
                events.push(Event::Feedback {
                    message: "Game Over! Vous avez été vaincu.".to_string(),
                    kind: FeedbackKind::Error,
                    duration_ms: Some(5000),
                });
            }
        }
        Ok(())
    }

    fn enter_combat(
        &mut self,
        options: PhaseOptions,
        events: &mut EventBus,
    ) -> Result<(), HookError> {
        let enemy = match options.enemy {
            Some(enemy) => enemy,
            None => {
                let tier = EnemyTier::from_flags(options.is_elite, options.is_boss);
                let owned = self.owned_ids();
                let mut ctx = HookContext {
                    content: &self.content,
                    config: &self.config,
                    stage: self.stage,
                    owned: &owned,
                    rng: &mut self.rng,
                };
                self.hooks.generate_enemy(&mut ctx, tier)?
            }
        };

        let mut deck = std::mem::take(&mut self.combat.deck);
        if deck.remaining() + deck.discard.len() < self.config.combat.hand_size {
            deck = Deck::standard52();
        }
        deck.reshuffle_discard(&mut self.rng);
        deck.shuffle(&mut self.rng);

        self.combat = CombatContext::new(self.config.combat.discard_limit);
        self.combat.deck = deck;
        let opening = format!(
            "Combat contre {} ({} PV, {} ATK)",
            enemy.name, enemy.health, enemy.attack
        );
        events.push(Event::CombatStarted {
            enemy: enemy.name.clone(),
            health: enemy.health,
        });
        self.combat.enemy = Some(enemy);
        self.collection.reset_card_uses();
        self.combat.log.push(opening.clone());
        events.push(Event::CombatLog(opening));
        self.evaluate_bonus_deck(events);
        Ok(())
    }

    fn process_reward(&mut self, events: &mut EventBus) -> Result<(), HookError> {
        let owned = self.owned_ids();
        let mut ctx = HookContext {
            content: &self.content,
            config: &self.config,
            stage: self.stage,
            owned: &owned,
            rng: &mut self.rng,
        };
        let reward = self
            .hooks
            .roll_reward(&mut ctx, self.combat.enemy.as_ref())?;

        self.player.add_gold(reward.gold);
        self.stats.gold_earned += reward.gold;
        self.stats.enemies_defeated += 1;
        let mut card = None;
        if let Some(id) = reward.card {
            match self
                .collection
                .add_card(id, &self.content.catalog, &mut self.rng)
            {
                Ok(()) => {
                    self.stats.bonus_cards_collected += 1;
                    events.push(Event::BonusCardAcquired { id });
                    card = Some(id);
                }
                Err(err) => log::warn!("reward card {id} not granted: {err}"),
            }
        }
        let summary = RewardSummary {
            gold: reward.gold,
            card,
        };
        events.push(Event::RewardGranted {
            gold: summary.gold,
            card: summary.card,
        });
        events.feedback(
            format!("Victoire ! +{} or", summary.gold),
            FeedbackKind::Success,
        );
        self.reward = Some(summary);
        Ok(())
    }

    /// Leaves the reward screen. Beating a boss moves to the next stage
    /// with a fresh map.
    pub fn complete_reward(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(GamePhase::Reward)?;
        let boss_beaten = self
            .combat
            .enemy
            .as_ref()
            .map(|enemy| enemy.tier == EnemyTier::Boss)
            .unwrap_or(false);
        if boss_beaten {
            self.stage += 1;
            self.map = MapGraph::default();
            log::info!("stage {} reached", self.stage);
        }
        self.reward = None;
        self.change_phase(GamePhase::Exploration, PhaseOptions::default(), events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_task_does_not_drop_later_ones() {
        let mut run = RunState::new(GameConfig::default(), Content::default(), 1);
        let mut events = EventBus::default();
        // No enemy templates, so the combat entry fails.
        run.scheduler
            .schedule(10, ScheduledAction::EnterPhase(GamePhase::Combat));
        run.scheduler
            .schedule(20, ScheduledAction::EnterPhase(GamePhase::Shop));

        let err = run.advance_time(50, &mut events).expect_err("combat entry");
        assert!(matches!(
            err,
            RunError::PhaseEntry {
                phase: GamePhase::Combat,
                ..
            }
        ));
        assert_eq!(run.phase, GamePhase::Shop);
        assert_eq!(run.scheduler.pending(), 0);
        let last = run.history().last().expect("transition");
        assert_eq!((last.from, last.to), (GamePhase::Combat, GamePhase::Shop));
    }
}
