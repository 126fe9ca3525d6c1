use serde::{Deserialize, Serialize};

pub use brelan_core::{
    BonusCardDef, Catalog, CombinationRules, Content, EnemyDef, EventDef, GameConfig, ShopItem,
};

/// File names inside an assets directory.
pub const BONUS_CARDS_FILE: &str = "bonus_cards.json";
pub const CONFIG_FILE: &str = "config.json";
pub const COMBINATIONS_FILE: &str = "combinations.json";
pub const ENEMIES_FILE: &str = "enemies.json";
pub const SHOP_FILE: &str = "shop.json";
pub const EVENTS_FILE: &str = "events.json";

/// Counts reported after a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub bonus_cards: usize,
    pub combinations: usize,
    pub enemies: usize,
    pub shop_items: usize,
    pub events: usize,
}

impl ContentSummary {
    pub fn of(content: &Content) -> Self {
        Self {
            bonus_cards: content.catalog.len(),
            combinations: content.combinations.rules.len(),
            enemies: content.enemies.len(),
            shop_items: content.shop_items.len(),
            events: content.events.len(),
        }
    }
}
