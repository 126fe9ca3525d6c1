use crate::{GamePhase, HandKind, TurnPhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    Feedback {
        message: String,
        kind: FeedbackKind,
        duration_ms: Option<u64>,
    },
    CombatLog(String),
    PhaseChanged { from: GamePhase, to: GamePhase },
    TurnPhaseChanged { phase: TurnPhase },
    CombatStarted { enemy: String, health: i64 },
    HandDealt { count: usize },
    HandPlayed {
        hand: HandKind,
        base_damage: i64,
        damage: i64,
    },
    EnemyAttacked { damage: i64, health: i64 },
    BonusCardUsed { id: u32, uses_remaining: u32 },
    BonusCardAcquired { id: u32 },
    BonusCardUpgraded { id: u32, level: u8 },
    ShopBought { item: String, price: i64, gold: i64 },
    RewardGranted { gold: i64, card: Option<u32> },
    EventResolved { choice: usize, success: bool },
}

impl Event {
    pub fn feedback(message: impl Into<String>, kind: FeedbackKind) -> Self {
        Event::Feedback {
            message: message.into(),
            kind,
            duration_ms: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn feedback(&mut self, message: impl Into<String>, kind: FeedbackKind) {
        self.push(Event::feedback(message, kind));
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.queue.iter()
    }
}
