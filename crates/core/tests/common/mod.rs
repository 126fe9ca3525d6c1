#![allow(dead_code)]

use brelan_core::{
    Bonus, BonusCardDef, BonusType, Catalog, CombinationRules, Condition, Content, EffectKind,
    Enemy, EnemyDef, EnemyTier, EventBus, EventDef, GameConfig, GamePhase, PhaseOptions, Rarity,
    RunState, ShopItem,
};

const CATALOG_JSON: &str = include_str!("../../../../assets/bonus_cards.json");
const COMBINATIONS_JSON: &str = include_str!("../../../../assets/combinations.json");
const ENEMIES_JSON: &str = include_str!("../../../../assets/enemies.json");
const SHOP_JSON: &str = include_str!("../../../../assets/shop.json");
const EVENTS_JSON: &str = include_str!("../../../../assets/events.json");

pub fn catalog() -> Catalog {
    let cards: Vec<BonusCardDef> = serde_json::from_str(CATALOG_JSON).expect("parse catalog");
    Catalog::new(cards)
}

pub fn content() -> Content {
    let combinations: CombinationRules =
        serde_json::from_str(COMBINATIONS_JSON).expect("parse combinations");
    let enemies: Vec<EnemyDef> = serde_json::from_str(ENEMIES_JSON).expect("parse enemies");
    let shop_items: Vec<ShopItem> = serde_json::from_str(SHOP_JSON).expect("parse shop");
    let events: Vec<EventDef> = serde_json::from_str(EVENTS_JSON).expect("parse events");
    Content {
        catalog: catalog(),
        combinations,
        enemies,
        shop_items,
        events,
    }
}

pub fn passive(id: u32, condition: Condition, kind: BonusType, value: f64) -> BonusCardDef {
    BonusCardDef {
        id,
        name: format!("passive {id}"),
        description: String::new(),
        rarity: Rarity::Common,
        effect: EffectKind::Passive,
        condition: Some(condition),
        bonus: Some(Bonus::new(kind, value)),
        uses: None,
    }
}

pub fn active(id: u32, kind: BonusType, value: f64, uses: u32) -> BonusCardDef {
    BonusCardDef {
        id,
        name: format!("active {id}"),
        description: String::new(),
        rarity: Rarity::Rare,
        effect: EffectKind::Active,
        condition: None,
        bonus: Some(Bonus::new(kind, value)),
        uses: Some(uses),
    }
}

pub fn enemy(health: i64, attack: i64) -> Enemy {
    Enemy {
        name: "Mannequin".to_string(),
        tier: EnemyTier::Normal,
        health,
        max_health: health,
        attack,
        gold_mult: 1.0,
    }
}

/// A run whose collection holds exactly `ids`, all equipped.
pub fn run_with(ids: &[u32], seed: u64) -> RunState {
    let config = GameConfig {
        collection: brelan_core::CollectionRule {
            starting_card_ids: ids.to_vec(),
            ..GameConfig::default().collection
        },
        ..GameConfig::default()
    };
    let mut run = RunState::new(config, content(), seed);
    let mut events = EventBus::default();
    run.start_run(&mut events).expect("start run");
    run
}

/// Puts the run straight into combat against a fixed enemy.
pub fn in_combat(run: &mut RunState, health: i64, attack: i64) -> EventBus {
    let mut events = EventBus::default();
    run.change_phase(
        GamePhase::Combat,
        PhaseOptions::with_enemy(enemy(health, attack)),
        &mut events,
    )
    .expect("enter combat");
    events
}
