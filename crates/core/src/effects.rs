//! Bonus-card effect resolution.
//!
//! Passive cards are folded over a hand's base damage once per player
//! attack. Active cards are turned into an [`ActiveEffect`] which the run
//! applies to combat state.

use crate::{ActiveCard, BonusType, Condition, EffectKind, HandKind, OwnedCard, RunError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct PassiveContext<'a> {
    pub hand: HandKind,
    pub base_damage: i64,
    pub pending_bonus: i64,
    pub pending_multiplier: f64,
    pub player_damaged_last_turn: bool,
    pub health: i64,
    pub max_health: i64,
    pub low_health_ratio: f64,
    pub active: &'a [ActiveCard],
}

impl PassiveContext<'_> {
    pub fn is_low_health(&self) -> bool {
        self.health as f64 <= self.max_health as f64 * self.low_health_ratio
    }

    pub fn condition_met(&self, condition: Condition) -> bool {
        match condition {
            Condition::Always => true,
            Condition::DamageTaken => self.player_damaged_last_turn,
            Condition::LowHealth => self.is_low_health(),
            Condition::Hand(kind) => kind == self.hand,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassiveOutcome {
    pub damage: i64,
    pub heal: i64,
    pub shield: i64,
    pub damage_reduction: i64,
    /// The pending multiplier was applied and must be reset by the caller.
    pub multiplier_consumed: bool,
    pub descriptions: Vec<String>,
}

pub fn resolve_passive(ctx: &PassiveContext<'_>) -> PassiveOutcome {
    let mut out = PassiveOutcome {
        damage: ctx.base_damage + ctx.pending_bonus,
        ..PassiveOutcome::default()
    };
    if ctx.pending_bonus != 0 {
        out.descriptions
            .push(format!("Bonus en attente: +{} dégâts", ctx.pending_bonus));
    }
    if ctx.pending_multiplier > 1.0 {
        out.damage = multiply(out.damage, ctx.pending_multiplier);
        out.multiplier_consumed = true;
        out.descriptions
            .push(format!("Multiplicateur en attente: x{}", ctx.pending_multiplier));
    }

    for active in ctx.active {
        let card = &active.card;
        if card.def.effect != EffectKind::Passive {
            continue;
        }
        let (Some(condition), Some(bonus)) = (card.def.condition, card.bonus()) else {
            continue;
        };
        if !ctx.condition_met(condition) {
            continue;
        }
        let amount = bonus.amount();
        match &bonus.kind {
            BonusType::Damage => {
                out.damage += amount;
                out.descriptions
                    .push(format!("{}: +{} dégâts", card.name(), amount));
            }
            BonusType::DamageMultiplier => {
                out.damage = multiply(out.damage, bonus.value);
                out.descriptions
                    .push(format!("{}: dégâts x{}", card.name(), bonus.value));
            }
            BonusType::Heal => {
                out.heal += amount;
                out.descriptions.push(format!("{}: +{} PV", card.name(), amount));
            }
            BonusType::Shield => {
                out.shield += amount;
                out.descriptions
                    .push(format!("{}: +{} bouclier", card.name(), amount));
            }
            BonusType::DamageReduction => {
                out.damage_reduction += amount;
                out.descriptions
                    .push(format!("{}: -{} dégâts subis", card.name(), amount));
            }
            other => {
                log::debug!("passive card {} ignores bonus {}", card.id(), other.tag());
            }
        }
    }
    log::debug!(
        "passive resolution for {}: {} -> {}",
        ctx.hand.display_name(),
        ctx.base_damage,
        out.damage
    );
    out
}

fn multiply(damage: i64, factor: f64) -> i64 {
    (damage as f64 * factor).floor() as i64
}

/// What an activated card does to the current combat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActiveEffect {
    Damage(i64),
    DamageMultiplier(f64),
    Heal(i64),
    Shield(i64),
    Discard(usize),
    Invulnerable,
}

/// Validates an activation payload. Use counting is the caller's job.
pub fn activation_effect(card: &OwnedCard) -> Result<ActiveEffect, RunError> {
    let bonus = card.bonus().ok_or(RunError::InvalidBonus(card.id()))?;
    if !bonus.value.is_finite() {
        return Err(RunError::InvalidBonus(card.id()));
    }
    let effect = match &bonus.kind {
        BonusType::Damage => ActiveEffect::Damage(bonus.amount()),
        BonusType::DamageMultiplier => ActiveEffect::DamageMultiplier(bonus.value),
        BonusType::Heal => ActiveEffect::Heal(bonus.amount()),
        BonusType::Shield => ActiveEffect::Shield(bonus.amount()),
        BonusType::Discard => ActiveEffect::Discard(bonus.amount().max(0) as usize),
        BonusType::Invulnerable => ActiveEffect::Invulnerable,
        // Reduction only exists as a passive bonus.
        BonusType::DamageReduction | BonusType::Unknown(_) => {
            return Err(RunError::UnknownEffect(bonus.kind.tag().to_string()))
        }
    };
    Ok(effect)
}

impl ActiveEffect {
    pub fn describe(&self) -> String {
        match self {
            ActiveEffect::Damage(value) => format!("+{value} dégâts à la prochaine attaque"),
            ActiveEffect::DamageMultiplier(value) => {
                format!("dégâts x{value} à la prochaine attaque")
            }
            ActiveEffect::Heal(value) => format!("{value} PV restaurés"),
            ActiveEffect::Shield(value) => format!("+{value} bouclier"),
            ActiveEffect::Discard(value) => format!("défausse de {value} cartes possible"),
            ActiveEffect::Invulnerable => "invulnérable au prochain tour".to_string(),
        }
    }
}
