use crate::schema::{
    BonusCardDef, Catalog, CombinationRules, Content, EnemyDef, EventDef, GameConfig, ShopItem,
    BONUS_CARDS_FILE, COMBINATIONS_FILE, CONFIG_FILE, ENEMIES_FILE, EVENTS_FILE, SHOP_FILE,
};
use anyhow::{bail, Context};
use brelan_core::{EffectKind, HandKind, ShopEffect};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let cards: Vec<BonusCardDef> = load_json(path)?;
    let mut seen = HashSet::new();
    for card in &cards {
        if !seen.insert(card.id) {
            bail!("duplicate bonus card {} in {}", card.id, path.display());
        }
        if card.effect == EffectKind::Passive && card.condition.is_none() {
            bail!(
                "passive bonus card {} has no condition in {}",
                card.id,
                path.display()
            );
        }
        if card.bonus.is_none() {
            bail!("bonus card {} has no bonus in {}", card.id, path.display());
        }
    }
    Ok(Catalog::new(cards))
}

/// Missing file means the built-in defaults.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GameConfig::default());
    }
    let config: GameConfig = load_json(&path)?;
    if config.collection.max_level < 1 {
        bail!("max_level must be at least 1 in {}", path.display());
    }
    if !(0.0..=1.0).contains(&config.combat.low_health_ratio) {
        bail!("low_health_ratio out of range in {}", path.display());
    }
    Ok(config)
}

pub fn load_combination_rules(path: &Path) -> anyhow::Result<CombinationRules> {
    let rules: CombinationRules = load_json(path)?;
    let mut seen = HashSet::new();
    for rule in &rules.rules {
        if !seen.insert(rule.hand) {
            bail!("duplicate combination {:?} in {}", rule.hand, path.display());
        }
    }
    if rules.rule_for(HandKind::HighCard).is_none() {
        bail!("missing HighCard combination in {}", path.display());
    }
    Ok(rules)
}

pub fn load_enemies(path: &Path) -> anyhow::Result<Vec<EnemyDef>> {
    let enemies: Vec<EnemyDef> = load_json(path)?;
    if enemies.is_empty() {
        bail!("no enemies in {}", path.display());
    }
    for enemy in &enemies {
        if enemy.health <= 0 {
            bail!("enemy {} has no health in {}", enemy.name, path.display());
        }
    }
    Ok(enemies)
}

pub fn load_shop_items(path: &Path) -> anyhow::Result<Vec<ShopItem>> {
    let items: Vec<ShopItem> = load_json(path)?;
    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id.as_str()) {
            bail!("duplicate shop item {} in {}", item.id, path.display());
        }
        if item.price < 0 {
            bail!("shop item {} has a negative price", item.id);
        }
    }
    Ok(items)
}

pub fn load_events(path: &Path) -> anyhow::Result<Vec<EventDef>> {
    let events: Vec<EventDef> = load_json(path)?;
    for event in &events {
        if event.choices.is_empty() {
            bail!("event {} has no choices in {}", event.id, path.display());
        }
        for choice in &event.choices {
            if !(0.0..=1.0).contains(&choice.chance) {
                bail!("event {} has a choice chance out of range", event.id);
            }
        }
    }
    Ok(events)
}

/// Loads every table from an assets directory and checks cross references.
pub fn load_content(dir: &Path) -> anyhow::Result<Content> {
    let content = Content {
        catalog: load_catalog(&dir.join(BONUS_CARDS_FILE))?,
        combinations: load_combination_rules(&dir.join(COMBINATIONS_FILE))?,
        enemies: load_enemies(&dir.join(ENEMIES_FILE))?,
        shop_items: load_shop_items(&dir.join(SHOP_FILE))?,
        events: load_events(&dir.join(EVENTS_FILE))?,
    };
    for item in &content.shop_items {
        if let ShopEffect::BonusCard { id } = item.effect {
            if !content.catalog.contains(id) {
                bail!("shop item {} sells unknown bonus card {}", item.id, id);
            }
        }
    }
    for event in &content.events {
        for choice in &event.choices {
            for card in [choice.outcome.card, choice.failure_outcome.card].into_iter().flatten() {
                if !content.catalog.contains(card) {
                    bail!("event {} grants unknown bonus card {}", event.id, card);
                }
            }
        }
    }
    Ok(content)
}

/// Config and content together, with the starting collection checked
/// against the catalog.
pub fn load_game(dir: &Path) -> anyhow::Result<(GameConfig, Content)> {
    let config = load_game_config(dir)?;
    let content = load_content(dir).with_context(|| format!("load content {}", dir.display()))?;
    for id in &config.collection.starting_card_ids {
        if !content.catalog.contains(*id) {
            bail!("starting bonus card {} is not in the catalog", id);
        }
    }
    Ok((config, content))
}
