use crate::{
    Collection, CollectionError, CombatContext, Content, EventState, GameConfig, GamePhase,
    MapGraph, PhaseTransition, Player, RewardSummary, RngState, RunStats, Scheduler, ShopState,
    TaskId, TurnPhase,
};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

mod bonus;
mod combat;
mod event;
mod hooks;
mod navigation;
mod phase;
mod rest;
mod shop;

pub use hooks::{DefaultHooks, HookContext, HookError, RunHooks};
pub use phase::PhaseOptions;
pub use rest::RestOption;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),
    #[error("card {0} has no usable bonus")]
    InvalidBonus(u32),
    #[error("unknown effect type {0}")]
    UnknownEffect(String),
    #[error("card {0} is not in the catalog")]
    InvalidCard(u32),
    #[error("not enough gold: need {needed}, have {available}")]
    NotEnoughGold { needed: i64, available: i64 },
    #[error("not in combat")]
    NotInCombat,
    #[error("invalid phase: expected {expected:?}, found {actual:?}")]
    InvalidPhase { expected: GamePhase, actual: GamePhase },
    #[error("unknown map node {0}")]
    UnknownNode(u32),
    #[error("map node {0} is not reachable")]
    NodeInaccessible(u32),
    #[error("entering {phase:?} failed: {message}")]
    PhaseEntry { phase: GamePhase, message: String },
    #[error("invalid turn phase: expected {expected:?}, found {actual:?}")]
    InvalidTurnPhase { expected: TurnPhase, actual: TurnPhase },
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("no discard available")]
    DiscardUnavailable,
    #[error("no enemy to fight")]
    NoEnemy,
    #[error("enemy already defeated")]
    EnemyDefeated,
    #[error("invalid shop item index {0}")]
    InvalidShopItem(usize),
    #[error("invalid event choice {0}")]
    InvalidChoice(usize),
    #[error("no event in progress")]
    NoEvent,
    #[error("event already resolved")]
    EventResolved,
    #[error("rest already taken")]
    RestTaken,
}

impl RunError {
    pub fn reason(&self) -> &'static str {
        match self {
            RunError::Collection(err) => err.reason(),
            RunError::InvalidBonus(_) => "invalid_bonus",
            RunError::UnknownEffect(_) => "unknown_effect",
            RunError::InvalidCard(_) => "invalid_card",
            RunError::NotEnoughGold { .. } => "not_enough_gold",
            RunError::NotInCombat => "not_in_combat",
            RunError::InvalidPhase { .. } => "invalid_phase",
            RunError::UnknownNode(_) => "unknown_node",
            RunError::NodeInaccessible(_) => "node_inaccessible",
            RunError::PhaseEntry { .. } => "phase_entry_failed",
            RunError::InvalidTurnPhase { .. } => "invalid_turn_phase",
            RunError::InvalidSelection => "invalid_selection",
            RunError::DiscardUnavailable => "discard_unavailable",
            RunError::NoEnemy => "no_enemy",
            RunError::EnemyDefeated => "enemy_defeated",
            RunError::InvalidShopItem(_) => "invalid_shop_item",
            RunError::InvalidChoice(_) => "invalid_choice",
            RunError::NoEvent => "no_event",
            RunError::EventResolved => "event_resolved",
            RunError::RestTaken => "rest_taken",
        }
    }
}

#[derive(Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub content: Content,
    pub collection: Collection,
    pub player: Player,
    pub rng: RngState,
    pub phase: GamePhase,
    pub combat: CombatContext,
    pub map: MapGraph,
    pub shop: Option<ShopState>,
    pub event: Option<EventState>,
    pub reward: Option<RewardSummary>,
    pub stats: RunStats,
    pub stage: u32,
    shop_purchases: HashMap<String, u32>,
    rest_taken: bool,
    history: VecDeque<PhaseTransition>,
    scheduler: Scheduler,
    reward_task: Option<TaskId>,
    hooks: Box<dyn RunHooks>,
}

impl RunState {
    pub fn new(config: GameConfig, content: Content, seed: u64) -> Self {
        Self::with_hooks(config, content, seed, Box::new(DefaultHooks))
    }

    pub fn with_hooks(
        config: GameConfig,
        content: Content,
        seed: u64,
        hooks: Box<dyn RunHooks>,
    ) -> Self {
        let collection = Collection::with_rules(
            config.collection.max_slots,
            config.collection.max_level,
            config.collection.level_scaling,
        );
        let player = Player::from_rule(&config.player);
        let combat = CombatContext::new(config.combat.discard_limit);
        Self {
            config,
            content,
            collection,
            player,
            rng: RngState::from_seed(seed),
            phase: GamePhase::Exploration,
            combat,
            map: MapGraph::default(),
            shop: None,
            event: None,
            reward: None,
            stats: RunStats::default(),
            stage: 1,
            shop_purchases: HashMap::new(),
            rest_taken: false,
            history: VecDeque::new(),
            scheduler: Scheduler::new(),
            reward_task: None,
            hooks,
        }
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn RunHooks>) {
        self.hooks = hooks;
    }

    /// Fresh run: starting collection, starting stats, then exploration on a
    /// newly generated map.
    pub fn start_run(&mut self, events: &mut crate::EventBus) -> Result<(), RunError> {
        let ids = self.config.collection.starting_card_ids.clone();
        self.collection.init(&ids, &self.content.catalog, &mut self.rng);
        self.player = Player::from_rule(&self.config.player);
        self.stats = RunStats::default();
        self.stage = 1;
        self.map = MapGraph::default();
        self.shop_purchases.clear();
        self.change_phase(GamePhase::Exploration, PhaseOptions::default(), events)
    }

    pub fn history(&self) -> impl Iterator<Item = &PhaseTransition> + '_ {
        self.history.iter()
    }

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn reward_pending(&self) -> bool {
        self.reward_task
            .map(|id| self.scheduler.is_pending(id))
            .unwrap_or(false)
    }

    pub(crate) fn require_phase(&self, expected: GamePhase) -> Result<(), RunError> {
        if self.phase != expected {
            return Err(RunError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    pub(crate) fn owned_ids(&self) -> Vec<u32> {
        self.collection
            .cards()
            .iter()
            .filter(|card| card.owned)
            .map(|card| card.id())
            .collect()
    }
}
