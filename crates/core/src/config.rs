use crate::MapRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRule {
    pub health: i64,
    pub max_health: i64,
    pub gold: i64,
    #[serde(default)]
    pub shield: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionRule {
    pub max_slots: usize,
    pub max_level: u8,
    /// Bonus growth per level above 1, as a fraction of the original value.
    pub level_scaling: f64,
    pub starting_card_ids: Vec<u32>,
    pub upgrade_gold_cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombatRule {
    pub hand_size: usize,
    pub max_selected: usize,
    pub discard_limit: usize,
    pub low_health_ratio: f64,
    pub reward_delay_ms: u64,
    /// Per-stage stat scaling for normal, elite and boss enemies.
    pub stage_scaling: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardRule {
    pub gold_base: i64,
    pub gold_per_stage: i64,
    pub card_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestRule {
    pub heal_ratio: f64,
    pub shield_amount: i64,
    #[serde(default)]
    pub heal_cost: i64,
    #[serde(default)]
    pub shield_cost: i64,
    #[serde(default)]
    pub upgrade_cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopRule {
    pub offers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub player: PlayerRule,
    pub collection: CollectionRule,
    pub combat: CombatRule,
    pub reward: RewardRule,
    pub rest: RestRule,
    pub shop: ShopRule,
    #[serde(default)]
    pub map: MapRule,
    pub phase_history_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerRule {
                health: 50,
                max_health: 50,
                gold: 100,
                shield: 0,
            },
            collection: CollectionRule {
                max_slots: 5,
                max_level: 3,
                level_scaling: 0.2,
                starting_card_ids: vec![1, 2, 10, 14, 18],
                upgrade_gold_cost: 50,
            },
            combat: CombatRule {
                hand_size: 7,
                max_selected: 5,
                discard_limit: 2,
                low_health_ratio: 0.25,
                reward_delay_ms: 1000,
                stage_scaling: [0.1, 0.2, 0.3],
            },
            reward: RewardRule {
                gold_base: 10,
                gold_per_stage: 5,
                card_chance: 0.3,
            },
            rest: RestRule {
                heal_ratio: 0.3,
                shield_amount: 10,
                heal_cost: 0,
                shield_cost: 0,
                upgrade_cost: 0,
            },
            shop: ShopRule { offers: 4 },
            map: MapRule::default(),
            phase_history_limit: 10,
        }
    }
}
