use super::*;
use crate::*;

impl RunState {
    fn require_combat(&self) -> Result<(), RunError> {
        if self.phase != GamePhase::Combat {
            return Err(RunError::NotInCombat);
        }
        Ok(())
    }

    fn require_turn(&self, phase: TurnPhase) -> Result<(), RunError> {
        self.require_combat()?;
        if self.combat.turn_phase != phase {
            return Err(RunError::InvalidTurnPhase {
                expected: phase,
                actual: self.combat.turn_phase,
            });
        }
        Ok(())
    }

    fn log_combat(&mut self, line: String, events: &mut EventBus) {
        log::debug!("{line}");
        self.combat.log.push(line.clone());
        events.push(Event::CombatLog(line));
    }

    fn refill_deck(&mut self, needed: usize) {
        if self.combat.deck.remaining() >= needed {
            return;
        }
        self.combat.deck.reshuffle_discard(&mut self.rng);
        if self.combat.deck.remaining() < needed {
            let mut fresh = Deck::standard52();
            let held: Vec<Card> = self.combat.hand.iter().map(|c| c.card).collect();
            fresh.draw.retain(|card| !held.contains(card));
            fresh.shuffle(&mut self.rng);
            self.combat.deck = fresh;
        }
    }

    /// Starts a player turn: the previous hand is discarded and a new one dealt.
    pub fn deal_hand(&mut self, events: &mut EventBus) -> Result<usize, RunError> {
        self.require_turn(TurnPhase::Draw)?;
        let old: Vec<Card> = self.combat.hand.drain(..).map(|c| c.card).collect();
        self.combat.deck.discard(old);
        let size = self.config.combat.hand_size;
        self.refill_deck(size);
        self.combat.hand = self
            .combat
            .deck
            .draw_cards(size)
            .into_iter()
            .map(HandCard::from)
            .collect();
        self.combat.turn += 1;
        self.combat.discard_used = false;
        let count = self.combat.hand.len();
        events.push(Event::HandDealt { count });
        self.set_turn_phase(TurnPhase::Select, events)?;
        Ok(count)
    }

    /// Returns the new selection state of the card.
    pub fn toggle_card_selection(&mut self, index: usize) -> Result<bool, RunError> {
        self.require_turn(TurnPhase::Select)?;
        let selected = self.combat.selected_indices().len();
        let max = self.config.combat.max_selected;
        let card = self
            .combat
            .hand
            .get_mut(index)
            .ok_or(RunError::InvalidSelection)?;
        if !card.is_selected && selected >= max {
            return Err(RunError::InvalidSelection);
        }
        card.is_selected = !card.is_selected;
        Ok(card.is_selected)
    }

    /// Discards the selected cards and draws replacements. One discard per
    /// turn unless a discard card re-opened it. Cards past the limit stay.
    pub fn discard_selected(&mut self, events: &mut EventBus) -> Result<usize, RunError> {
        self.require_turn(TurnPhase::Select)?;
        if self.combat.discard_used && !self.combat.discard_mode {
            return Err(RunError::DiscardUnavailable);
        }
        let mut indices = self.combat.selected_indices();
        if indices.is_empty() || self.combat.discard_limit == 0 {
            return Err(RunError::InvalidSelection);
        }
        indices.truncate(self.combat.discard_limit);

        let mut discarded = Vec::with_capacity(indices.len());
        for &idx in indices.iter().rev() {
            discarded.push(self.combat.hand.remove(idx).card);
        }
        let count = discarded.len();
        self.combat.deck.discard(discarded);
        self.refill_deck(count);
        let drawn = self.combat.deck.draw_cards(count);
        self.combat.hand.extend(drawn.into_iter().map(HandCard::from));
        self.combat.clear_selection();
        self.combat.discard_used = true;
        self.combat.discard_mode = false;
        self.log_combat(format!("{count} carte(s) défaussée(s)"), events);
        Ok(count)
    }

    /// Evaluates the selected cards and attacks with them.
    pub fn play_selected(&mut self, events: &mut EventBus) -> Result<PassiveOutcome, RunError> {
        self.require_turn(TurnPhase::Select)?;
        let indices = self.combat.selected_indices();
        if indices.is_empty() || indices.len() > self.config.combat.max_selected {
            return Err(RunError::InvalidSelection);
        }
        if self.combat.enemy.is_none() {
            return Err(RunError::NoEnemy);
        }
        let mut played = Vec::with_capacity(indices.len());
        for &idx in indices.iter().rev() {
            played.push(self.combat.hand.remove(idx).card);
        }
        played.reverse();
        let result = HandResult::evaluate(&played);
        self.combat.deck.discard(played);
        self.resolve_attack(result, events)
    }

    /// Applies a hand to the enemy: passive resolution, pending modifiers,
    /// passive heal and shield, then the result turn phase.
    pub fn resolve_attack(
        &mut self,
        hand: HandResult,
        events: &mut EventBus,
    ) -> Result<PassiveOutcome, RunError> {
        self.require_combat()?;
        if self.combat.enemy.is_none() {
            return Err(RunError::NoEnemy);
        }
        let outcome = resolve_passive(&PassiveContext {
            hand: hand.hand,
            base_damage: hand.base_damage,
            pending_bonus: self.combat.pending_damage_bonus,
            pending_multiplier: self.combat.pending_damage_multiplier,
            player_damaged_last_turn: self.combat.player_damaged_last_turn,
            health: self.player.health,
            max_health: self.player.max_health,
            low_health_ratio: self.config.combat.low_health_ratio,
            active: self.collection.active(),
        });

        self.combat.pending_damage_bonus = 0;
        if outcome.multiplier_consumed {
            self.combat.pending_damage_multiplier = 1.0;
        }
        let damage = outcome.damage.max(0);
        let enemy_health = match self.combat.enemy.as_mut() {
            Some(enemy) => {
                enemy.take_damage(damage);
                enemy.health
            }
            None => 0,
        };
        if outcome.heal > 0 {
            self.player.heal(outcome.heal);
        }
        if outcome.shield > 0 {
            self.player.add_shield(outcome.shield);
        }
        self.combat.pending_damage_reduction += outcome.damage_reduction;
        self.combat.last_hand = Some(hand);

        self.stats.hands_played += 1;
        self.stats.total_damage += damage;
        self.stats.highest_damage = self.stats.highest_damage.max(damage);

        self.log_combat(
            format!("{}: {} dégâts infligés", hand.hand.display_name(), damage),
            events,
        );
        for line in &outcome.descriptions {
            self.log_combat(line.clone(), events);
        }
        events.push(Event::HandPlayed {
            hand: hand.hand,
            base_damage: hand.base_damage,
            damage,
        });
        if enemy_health <= 0 {
            self.log_combat("Ennemi vaincu !".to_string(), events);
        }
        self.set_turn_phase(TurnPhase::Result, events)?;
        Ok(outcome)
    }

    /// The enemy's turn. Returns the damage the attack carried after
    /// reductions, zero when it was blocked.
    pub fn enemy_attack(&mut self, events: &mut EventBus) -> Result<i64, RunError> {
        self.require_combat()?;
        let (name, attack) = match self.combat.enemy.as_ref() {
            Some(enemy) if enemy.is_defeated() => return Err(RunError::EnemyDefeated),
            Some(enemy) => (enemy.name.clone(), enemy.attack),
            None => return Err(RunError::NoEnemy),
        };

        let damage = if self.combat.invulnerable_next_turn {
            self.combat.invulnerable_next_turn = false;
            self.combat.player_damaged_last_turn = false;
            self.log_combat(format!("L'attaque de {name} est bloquée"), events);
            0
        } else {
            let damage = (attack - self.combat.pending_damage_reduction).max(0);
            self.combat.pending_damage_reduction = 0;
            self.player.take_damage(damage);
            self.combat.player_damaged_last_turn = damage > 0;
            self.log_combat(format!("{name} inflige {damage} dégâts"), events);
            damage
        };
        events.push(Event::EnemyAttacked {
            damage,
            health: self.player.health,
        });

        if self.player.is_dead() {
            self.change_phase(GamePhase::GameOver, PhaseOptions::default(), events)?;
            return Ok(damage);
        }
        self.set_turn_phase(TurnPhase::Draw, events)?;
        Ok(damage)
    }

    /// Activates the equipped card at `index`. The card and its payload are
    /// validated before the combat check, and before a use is spent.
    pub fn use_bonus_card(&mut self, index: usize, events: &mut EventBus) -> Result<String, RunError> {
        let active = self
            .collection
            .active()
            .get(index)
            .ok_or(CollectionError::InvalidIndex(index))?;
        if !active.card.is_active_type() {
            return Err(CollectionError::PassiveCard(index).into());
        }
        if active.uses_remaining == 0 {
            return Err(CollectionError::NoUsesRemaining(index).into());
        }
        let effect = activation_effect(&active.card)?;
        let id = active.card.id();
        let name = active.card.name().to_string();
        self.require_combat()?;

        match effect {
            ActiveEffect::Damage(value) => self.combat.pending_damage_bonus += value,
            ActiveEffect::DamageMultiplier(value) => {
                self.combat.pending_damage_multiplier = value;
            }
            ActiveEffect::Heal(value) => {
                self.player.heal(value);
            }
            ActiveEffect::Shield(value) => self.player.add_shield(value),
            ActiveEffect::Discard(value) => {
                self.combat.discard_limit = value;
                self.combat.discard_mode = true;
            }
            ActiveEffect::Invulnerable => self.combat.invulnerable_next_turn = true,
        }
        let uses_remaining = self.collection.use_card(index)?;
        self.stats.bonus_cards_used += 1;

        let message = format!("{name} : {}", effect.describe());
        self.log_combat(message.clone(), events);
        events.push(Event::BonusCardUsed { id, uses_remaining });
        events.feedback(message.clone(), FeedbackKind::Success);
        Ok(message)
    }

    /// Evaluates the equipped set's synergy and attaches it to the combat.
    pub fn evaluate_bonus_deck(&mut self, events: &mut EventBus) -> DeckCombination {
        let combination = self
            .collection
            .combination(&self.content.combinations)
            .clone();
        if combination.is_active {
            let line = format!("Combinaison du deck : {}", combination.description);
            self.log_combat(line.clone(), events);
            events.feedback(line, FeedbackKind::Info);
        }
        if let Some(effect) = combination.effect.as_ref() {
            self.apply_deck_effect(effect);
        }
        self.combat.deck_bonus = Some(combination.clone());
        combination
    }

    /// Only the invulnerability and ultimate synergies touch combat state;
    /// the other table effects are informational.
    fn apply_deck_effect(&mut self, effect: &CombinationEffect) {
        match effect {
            CombinationEffect::Invulnerable { .. } => self.combat.invulnerable_next_turn = true,
            CombinationEffect::Ultimate {
                damage_multiplier,
                invulnerable,
                ..
            } => {
                if damage_multiplier.is_finite() {
                    self.combat.pending_damage_multiplier =
                        self.combat.pending_damage_multiplier.max(*damage_multiplier);
                }
                if *invulnerable {
                    self.combat.invulnerable_next_turn = true;
                }
            }
            _ => {}
        }
    }
}
