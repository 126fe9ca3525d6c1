use crate::{CombinationRules, EnemyDef, EnemyTier, EventDef, HandKind, ShopItem};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Passive,
    Active,
}

/// When a passive card fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    Always,
    DamageTaken,
    LowHealth,
    Hand(HandKind),
}

impl Condition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "always" => Some(Self::Always),
            "damageTaken" => Some(Self::DamageTaken),
            "lowHealth" => Some(Self::LowHealth),
            other => HandKind::from_name(other).map(Self::Hand),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::DamageTaken => "damageTaken",
            Self::LowHealth => "lowHealth",
            Self::Hand(kind) => kind.display_name(),
        }
    }
}

impl TryFrom<String> for Condition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown condition: {value}"))
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.tag().to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Payload kind of a bonus. Unrecognised catalog strings are kept verbatim
/// so activation can report them instead of failing the whole catalog load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BonusType {
    Damage,
    DamageMultiplier,
    Heal,
    Shield,
    Invulnerable,
    Discard,
    DamageReduction,
    Unknown(String),
}

impl BonusType {
    pub fn tag(&self) -> &str {
        match self {
            Self::Damage => "damage",
            Self::DamageMultiplier => "damageMultiplier",
            Self::Heal => "heal",
            Self::Shield => "shield",
            Self::Invulnerable => "invulnerable",
            Self::Discard => "discard",
            Self::DamageReduction => "damageReduction",
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<String> for BonusType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "damage" => Self::Damage,
            "damageMultiplier" => Self::DamageMultiplier,
            "heal" => Self::Heal,
            "shield" => Self::Shield,
            "invulnerable" => Self::Invulnerable,
            "discard" => Self::Discard,
            "damageReduction" => Self::DamageReduction,
            _ => Self::Unknown(value),
        }
    }
}

impl From<BonusType> for String {
    fn from(value: BonusType) -> Self {
        value.tag().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bonus {
    #[serde(rename = "type")]
    pub kind: BonusType,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub original_value: Option<f64>,
}

impl Bonus {
    pub fn new(kind: BonusType, value: f64) -> Self {
        Self {
            kind,
            value,
            original_value: Some(value),
        }
    }

    /// Integer view of the value, truncated toward negative infinity.
    pub fn amount(&self) -> i64 {
        self.value.floor() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusCardDef {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rarity: Rarity,
    pub effect: EffectKind,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub bonus: Option<Bonus>,
    #[serde(default)]
    pub uses: Option<u32>,
}

/// Read-only card table, kept in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<BonusCardDef>,
}

impl Catalog {
    pub fn new(cards: Vec<BonusCardDef>) -> Self {
        Self { cards }
    }

    pub fn get(&self, id: u32) -> Option<&BonusCardDef> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn cards(&self) -> &[BonusCardDef] {
        &self.cards
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.cards.iter().map(|card| card.id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Every externally supplied table a run draws from.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub catalog: Catalog,
    pub combinations: CombinationRules,
    pub enemies: Vec<EnemyDef>,
    pub shop_items: Vec<ShopItem>,
    pub events: Vec<EventDef>,
}

impl Content {
    pub fn enemies_of(&self, tier: EnemyTier) -> Vec<&EnemyDef> {
        self.enemies.iter().filter(|def| def.tier == tier).collect()
    }

    pub fn event(&self, id: &str) -> Option<&EventDef> {
        self.events.iter().find(|event| event.id == id)
    }
}
