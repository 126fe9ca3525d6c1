use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EnemyTier {
    Normal,
    Elite,
    Boss,
}

impl EnemyTier {
    pub fn from_flags(is_elite: bool, is_boss: bool) -> Self {
        if is_boss {
            EnemyTier::Boss
        } else if is_elite {
            EnemyTier::Elite
        } else {
            EnemyTier::Normal
        }
    }

    fn scaling_index(self) -> usize {
        match self {
            EnemyTier::Normal => 0,
            EnemyTier::Elite => 1,
            EnemyTier::Boss => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnemyDef {
    pub name: String,
    pub tier: EnemyTier,
    pub health: i64,
    pub attack: i64,
    /// Multiplier applied to the base gold reward.
    #[serde(default = "default_gold_mult")]
    pub gold_mult: f64,
}

fn default_gold_mult() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enemy {
    pub name: String,
    pub tier: EnemyTier,
    pub health: i64,
    pub max_health: i64,
    pub attack: i64,
    pub gold_mult: f64,
}

impl Enemy {
    /// Scales a template to the current stage.
    pub fn from_def(def: &EnemyDef, stage: u32, stage_scaling: &[f64; 3]) -> Self {
        let per_stage = stage_scaling[def.tier.scaling_index()];
        let mult = 1.0 + stage as f64 * per_stage;
        let health = (def.health as f64 * mult).floor() as i64;
        Self {
            name: def.name.clone(),
            tier: def.tier,
            health,
            max_health: health,
            attack: (def.attack as f64 * mult).floor() as i64,
            gold_mult: def.gold_mult,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    pub fn take_damage(&mut self, amount: i64) {
        self.health = (self.health - amount.max(0)).max(0);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShopEffect {
    Heal { value: i64 },
    Shield { value: i64 },
    MaxHealth { value: i64 },
    BonusCard { id: u32 },
    Slot { value: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub effect: ShopEffect,
    #[serde(default)]
    pub max_purchases: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventOutcome {
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub healing: i64,
    #[serde(default)]
    pub health_cost: i64,
    #[serde(default)]
    pub shield: i64,
    #[serde(default)]
    pub card: Option<u32>,
    /// Grants a random card the player does not own yet.
    #[serde(default)]
    pub random_card: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventChoice {
    pub text: String,
    #[serde(default)]
    pub gold_cost: i64,
    pub result_text: String,
    #[serde(default)]
    pub failure_text: Option<String>,
    #[serde(default)]
    pub outcome: EventOutcome,
    /// Applied instead of `outcome` when the chance roll fails.
    #[serde(default)]
    pub failure_outcome: EventOutcome,
    #[serde(default = "default_chance")]
    pub chance: f64,
}

fn default_chance() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub choices: Vec<EventChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventResult {
    pub choice: usize,
    pub success: bool,
    pub message: String,
    pub applied: EventOutcome,
}
