use crate::PlayerRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub health: i64,
    pub max_health: i64,
    pub gold: i64,
    pub shield: i64,
}

impl Player {
    pub fn from_rule(rule: &PlayerRule) -> Self {
        Self {
            health: rule.health.min(rule.max_health),
            max_health: rule.max_health,
            gold: rule.gold,
            shield: rule.shield,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Heals up to max health; returns the amount actually restored.
    pub fn heal(&mut self, amount: i64) -> i64 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.health - before
    }

    /// Shield absorbs first. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: i64) -> i64 {
        let mut remaining = amount.max(0);
        let absorbed = remaining.min(self.shield);
        self.shield -= absorbed;
        remaining -= absorbed;
        let before = self.health;
        self.health = (self.health - remaining).max(0);
        before - self.health
    }

    pub fn add_shield(&mut self, amount: i64) {
        self.shield += amount.max(0);
    }

    pub fn add_gold(&mut self, amount: i64) {
        self.gold += amount.max(0);
    }

    pub fn spend_gold(&mut self, amount: i64) -> bool {
        if amount > self.gold {
            return false;
        }
        self.gold -= amount.max(0);
        true
    }

    pub fn raise_max_health(&mut self, amount: i64) {
        self.max_health += amount.max(0);
        self.health += amount.max(0);
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player {
            health: 40,
            max_health: 50,
            gold: 30,
            shield: 5,
        }
    }

    #[test]
    fn shield_absorbs_before_health() {
        let mut p = player();
        assert_eq!(p.take_damage(8), 3);
        assert_eq!(p.shield, 0);
        assert_eq!(p.health, 37);
    }

    #[test]
    fn heal_is_clamped() {
        let mut p = player();
        assert_eq!(p.heal(25), 10);
        assert_eq!(p.health, 50);
    }

    #[test]
    fn spending_more_than_owned_is_refused() {
        let mut p = player();
        assert!(!p.spend_gold(31));
        assert_eq!(p.gold, 30);
        assert!(p.spend_gold(30));
        assert_eq!(p.gold, 0);
    }
}
