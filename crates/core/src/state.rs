use crate::{
    DeckCombination, Deck, Enemy, EventDef, EventResult, HandCard, HandResult, ShopItem,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Exploration,
    Combat,
    Shop,
    Rest,
    Event,
    Reward,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    Draw,
    Select,
    Result,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: GamePhase,
    pub to: GamePhase,
    /// Logical clock reading at the time of the change.
    pub timestamp: u64,
}

/// Per-combat scratch state. Rebuilt on every combat entry.
#[derive(Debug, Clone)]
pub struct CombatContext {
    pub turn_phase: TurnPhase,
    pub enemy: Option<Enemy>,
    pub turn: u32,
    pub pending_damage_bonus: i64,
    pub pending_damage_multiplier: f64,
    pub invulnerable_next_turn: bool,
    pub player_damaged_last_turn: bool,
    pub pending_damage_reduction: i64,
    pub discard_limit: usize,
    pub discard_mode: bool,
    pub discard_used: bool,
    pub deck: Deck,
    pub hand: Vec<HandCard>,
    pub last_hand: Option<HandResult>,
    pub deck_bonus: Option<DeckCombination>,
    pub log: Vec<String>,
}

impl CombatContext {
    pub fn new(discard_limit: usize) -> Self {
        Self {
            turn_phase: TurnPhase::Draw,
            enemy: None,
            turn: 0,
            pending_damage_bonus: 0,
            pending_damage_multiplier: 1.0,
            invulnerable_next_turn: false,
            player_damaged_last_turn: false,
            pending_damage_reduction: 0,
            discard_limit,
            discard_mode: false,
            discard_used: false,
            deck: Deck::default(),
            hand: Vec::new(),
            last_hand: None,
            deck_bonus: None,
            log: Vec::new(),
        }
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.hand
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_selected)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn clear_selection(&mut self) {
        for card in &mut self.hand {
            card.is_selected = false;
        }
    }

    pub fn enemy_defeated(&self) -> bool {
        self.enemy
            .as_ref()
            .map(|enemy| enemy.is_defeated())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunStats {
    pub enemies_defeated: u32,
    pub total_damage: i64,
    pub highest_damage: i64,
    pub hands_played: u32,
    pub bonus_cards_collected: u32,
    pub bonus_cards_used: u32,
    pub gold_earned: i64,
    pub items_purchased: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ShopState {
    pub items: Vec<ShopItem>,
}

#[derive(Debug, Clone)]
pub struct EventState {
    pub def: EventDef,
    pub result: Option<EventResult>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardSummary {
    pub gold: i64,
    pub card: Option<u32>,
}
