//! Synergy of the equipped set: the equipped cards' playing-card faces are
//! read as a poker hand and looked up in an externally supplied rule table.

use crate::{evaluate_hand, ActiveCard, Card, HandKind};
use serde::{Deserialize, Serialize};

/// Number of equipped cards that form a full combination.
pub const COMBINATION_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CombinationEffect {
    None,
    Partial { value: f64 },
    CriticalChance { value: f64 },
    Defense { value: f64 },
    NextSkillDamage { value: f64 },
    ActionSpeed { value: f64 },
    GlobalDamage { value: f64 },
    MultiStat { damage: f64, defense: f64 },
    Invulnerable { details: String },
    #[serde(rename_all = "camelCase")]
    Ultimate {
        details: String,
        damage_multiplier: f64,
        #[serde(default)]
        invulnerable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRule {
    pub hand: HandKind,
    pub name: String,
    pub description: String,
    pub effect: CombinationEffect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinationRules {
    pub rules: Vec<CombinationRule>,
}

impl CombinationRules {
    pub fn new(rules: Vec<CombinationRule>) -> Self {
        Self { rules }
    }

    pub fn rule_for(&self, hand: HandKind) -> Option<&CombinationRule> {
        self.rules.iter().find(|rule| rule.hand == hand)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationId {
    pub name: String,
    /// `None` while fewer than five cards are equipped.
    pub hand: Option<HandKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCombination {
    pub combination: Option<CombinationId>,
    pub effect: Option<CombinationEffect>,
    pub description: String,
    pub is_active: bool,
}

impl DeckCombination {
    pub fn inactive(description: impl Into<String>) -> Self {
        Self {
            combination: None,
            effect: None,
            description: description.into(),
            is_active: false,
        }
    }
}

/// Identity of an equipped set for memoization: ids and levels in slot order.
pub type CombinationKey = Vec<(u32, u8)>;

pub fn combination_key(active: &[ActiveCard]) -> CombinationKey {
    active
        .iter()
        .map(|card| (card.card.id(), card.card.level))
        .collect()
}

pub fn evaluate_combination(active: &[ActiveCard], rules: &CombinationRules) -> DeckCombination {
    if active.is_empty() {
        return DeckCombination::inactive("No bonus card equipped");
    }
    let count = active.len();
    if count < COMBINATION_SIZE {
        return DeckCombination {
            combination: Some(CombinationId {
                name: format!("{count} cards"),
                hand: None,
            }),
            effect: Some(CombinationEffect::Partial {
                value: (count * 2).min(5) as f64,
            }),
            description: format!("Incomplete deck ({count}/{COMBINATION_SIZE} cards)"),
            is_active: true,
        };
    }

    let faces: Vec<Card> = active
        .iter()
        .take(COMBINATION_SIZE)
        .map(|card| card.card.face())
        .collect();
    let hand = evaluate_hand(&faces);
    let rule = rules
        .rule_for(hand)
        .or_else(|| rules.rule_for(HandKind::HighCard));
    match rule {
        Some(rule) => DeckCombination {
            combination: Some(CombinationId {
                name: rule.name.clone(),
                hand: Some(hand),
            }),
            effect: Some(rule.effect.clone()),
            description: rule.description.clone(),
            is_active: !matches!(rule.effect, CombinationEffect::None),
        },
        None => DeckCombination {
            combination: Some(CombinationId {
                name: hand.display_name().to_string(),
                hand: Some(hand),
            }),
            effect: None,
            description: "No synergy configured".to_string(),
            is_active: false,
        },
    }
}
