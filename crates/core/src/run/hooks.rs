use crate::*;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Read access to run data for collaborators, plus the run RNG.
pub struct HookContext<'a> {
    pub content: &'a Content,
    pub config: &'a GameConfig,
    pub stage: u32,
    pub owned: &'a [u32],
    pub rng: &'a mut RngState,
}

/// Collaborators consulted on phase entry. A returned error is reported as a
/// failed phase entry; the phase change itself is kept.
pub trait RunHooks: fmt::Debug {
    fn generate_enemy(
        &mut self,
        ctx: &mut HookContext<'_>,
        tier: EnemyTier,
    ) -> Result<Enemy, HookError>;

    fn init_shop(
        &mut self,
        ctx: &mut HookContext<'_>,
        purchases: &HashMap<String, u32>,
    ) -> Result<Vec<ShopItem>, HookError>;

    fn generate_event(&mut self, ctx: &mut HookContext<'_>) -> Result<EventDef, HookError>;

    fn roll_reward(
        &mut self,
        ctx: &mut HookContext<'_>,
        enemy: Option<&Enemy>,
    ) -> Result<RewardSummary, HookError>;

    fn generate_map(&mut self, ctx: &mut HookContext<'_>) -> Result<MapGraph, HookError>;
}

/// Draws everything from the loaded content tables with the run RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl RunHooks for DefaultHooks {
    fn generate_enemy(
        &mut self,
        ctx: &mut HookContext<'_>,
        tier: EnemyTier,
    ) -> Result<Enemy, HookError> {
        let mut pool = ctx.content.enemies_of(tier);
        if pool.is_empty() {
            log::warn!("no {tier:?} enemy template, falling back to any enemy");
            pool = ctx.content.enemies.iter().collect();
        }
        let def = ctx
            .rng
            .pick(&pool)
            .copied()
            .ok_or_else(|| HookError::new("no enemy templates loaded"))?;
        Ok(Enemy::from_def(
            def,
            ctx.stage,
            &ctx.config.combat.stage_scaling,
        ))
    }

    fn init_shop(
        &mut self,
        ctx: &mut HookContext<'_>,
        purchases: &HashMap<String, u32>,
    ) -> Result<Vec<ShopItem>, HookError> {
        let mut pool: Vec<ShopItem> = ctx
            .content
            .shop_items
            .iter()
            .filter(|item| match item.max_purchases {
                Some(max) => purchases.get(&item.id).copied().unwrap_or(0) < max,
                None => true,
            })
            .filter(|item| match item.effect {
                ShopEffect::BonusCard { id } => {
                    ctx.content.catalog.contains(id) && !ctx.owned.contains(&id)
                }
                _ => true,
            })
            .cloned()
            .collect();
        ctx.rng.shuffle(&mut pool);
        pool.truncate(ctx.config.shop.offers);
        Ok(pool)
    }

    fn generate_event(&mut self, ctx: &mut HookContext<'_>) -> Result<EventDef, HookError> {
        ctx.rng
            .pick(&ctx.content.events)
            .cloned()
            .ok_or_else(|| HookError::new("no event templates loaded"))
    }

    fn roll_reward(
        &mut self,
        ctx: &mut HookContext<'_>,
        enemy: Option<&Enemy>,
    ) -> Result<RewardSummary, HookError> {
        let rule = &ctx.config.reward;
        let base = rule.gold_base + rule.gold_per_stage * ctx.stage as i64;
        let mult = enemy.map(|enemy| enemy.gold_mult).unwrap_or(1.0);
        let gold = (base as f64 * mult).floor() as i64;

        let mut card = None;
        if ctx.rng.chance(rule.card_chance) {
            let candidates: Vec<u32> = ctx
                .content
                .catalog
                .ids()
                .filter(|id| !ctx.owned.contains(id))
                .collect();
            card = ctx.rng.pick(&candidates).copied();
        }
        Ok(RewardSummary { gold, card })
    }

    fn generate_map(&mut self, ctx: &mut HookContext<'_>) -> Result<MapGraph, HookError> {
        Ok(MapGraph::generate(&ctx.config.map, ctx.rng))
    }
}
