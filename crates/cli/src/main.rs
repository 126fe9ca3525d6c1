use anyhow::{bail, Context};
use brelan_core::{
    CollectionSnapshot, Event, EventBus, FeedbackKind, GamePhase, MapGraph, NodeKind, Player,
    RestOption, RunError, RunState, RunStats, TurnPhase,
};
use brelan_data::{load_game, ContentSummary};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const SAVE_SCHEMA_VERSION: u32 = 1;
const DEFAULT_RUN_SEED: u64 = 0xB3E1A4;
const DEFAULT_SAVE_PATH: &str = "brelan-save.json";
const AUTO_STEP_LIMIT: usize = 2_000;

#[derive(Debug, Clone)]
struct CliOptions {
    auto: bool,
    seed: u64,
    assets: PathBuf,
    stages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedRunState {
    version: u32,
    seed: u64,
    stage: u32,
    player: Player,
    collection: CollectionSnapshot,
    #[serde(default)]
    stats: RunStats,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        auto: false,
        seed: DEFAULT_RUN_SEED,
        assets: PathBuf::from("assets"),
        stages: 1,
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--auto" => options.auto = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    match value.parse::<u64>() {
                        Ok(seed) => options.seed = seed,
                        Err(_) => log::warn!("ignoring invalid seed {value}"),
                    }
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--stages" => {
                if let Some(value) = args.get(idx + 1) {
                    options.stages = value.parse::<u32>().unwrap_or(1).max(1);
                    idx += 1;
                }
            }
            other => log::warn!("unknown argument {other}"),
        }
        idx += 1;
    }
    options
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    let mut run = build_run(&options.assets, options.seed)?;
    let mut events = EventBus::default();
    run.start_run(&mut events)?;
    if options.auto {
        return run_auto(&mut run, &mut events, options.stages);
    }
    run_repl(&mut run, &mut events, &options)
}

fn build_run(assets: &Path, seed: u64) -> anyhow::Result<RunState> {
    let (config, content) =
        load_game(assets).with_context(|| format!("load assets from {}", assets.display()))?;
    let summary = ContentSummary::of(&content);
    log::info!(
        "loaded {} bonus cards, {} enemies, {} shop items, {} events",
        summary.bonus_cards,
        summary.enemies,
        summary.shop_items,
        summary.events
    );
    Ok(RunState::new(config, content, seed))
}

/// Plays the run without input: always takes the first reachable node, the
/// first five cards and the first event choice.
fn run_auto(run: &mut RunState, events: &mut EventBus, stages: u32) -> anyhow::Result<()> {
    let mut steps = 0usize;
    while run.stage <= stages && run.phase != GamePhase::GameOver {
        steps += 1;
        if steps > AUTO_STEP_LIMIT {
            bail!("auto play stalled in {:?}", run.phase);
        }
        match run.phase {
            GamePhase::Exploration => {
                let Some(&next) = run.map.accessible_ids().first() else {
                    bail!("no reachable node from {:?}", run.map.current);
                };
                run.select_node(next, events)?;
            }
            GamePhase::Combat => auto_combat_step(run, events)?,
            GamePhase::Reward => run.complete_reward(events)?,
            GamePhase::Shop => {
                let affordable = run
                    .shop_items()
                    .iter()
                    .position(|item| item.price <= run.player.gold);
                if let Some(index) = affordable {
                    report(run.purchase_shop_item(index, events).map(|_| ()));
                }
                run.leave_shop(events)?;
            }
            GamePhase::Rest => {
                let option = if run.player.health_ratio() < 0.7 {
                    RestOption::Heal
                } else {
                    RestOption::Shield
                };
                report(run.take_rest(option, events).map(|_| ()));
                run.complete_rest(events)?;
            }
            GamePhase::Event => {
                report(run.make_event_choice(0, events).map(|_| ()));
                run.complete_event(events)?;
            }
            GamePhase::GameOver => break,
        }
        flush_events(events);
    }
    flush_events(events);
    print_summary(run);
    Ok(())
}

fn auto_combat_step(run: &mut RunState, events: &mut EventBus) -> anyhow::Result<()> {
    match run.combat.turn_phase {
        TurnPhase::Draw => {
            run.deal_hand(events)?;
        }
        TurnPhase::Select => {
            for (index, active) in run.collection.active().to_vec().iter().enumerate() {
                if active.card.is_active_type() && active.available {
                    report(run.use_bonus_card(index, events).map(|_| ()));
                }
            }
            let count = run.combat.hand.len().min(run.config.combat.max_selected);
            for index in 0..count {
                run.toggle_card_selection(index)?;
            }
            run.play_selected(events)?;
        }
        TurnPhase::Result => {
            if run.combat.enemy_defeated() {
                run.advance_time(run.config.combat.reward_delay_ms, events)?;
            } else {
                run.enemy_attack(events)?;
            }
        }
    }
    Ok(())
}

fn report(result: Result<(), RunError>) {
    if let Err(err) = result {
        println!("! {} ({})", err, err.reason());
    }
}

fn flush_events(events: &mut EventBus) {
    for event in events.drain() {
        match event {
            Event::Feedback { message, kind, .. } => {
                let tag = match kind {
                    FeedbackKind::Info => "info",
                    FeedbackKind::Success => "ok",
                    FeedbackKind::Warning => "warn",
                    FeedbackKind::Error => "error",
                };
                println!("[{tag}] {message}");
            }
            Event::CombatLog(line) => println!("  {line}"),
            Event::PhaseChanged { from, to } => println!("-- {from:?} -> {to:?}"),
            other => log::debug!("event: {other:?}"),
        }
    }
}

fn run_repl(run: &mut RunState, events: &mut EventBus, options: &CliOptions) -> anyhow::Result<()> {
    print_help();
    flush_events(events);
    print_state(run);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("brelan> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        match cmd {
            "help" | "h" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            "state" | "s" => print_state(run),
            "map" | "m" => print_map(&run.map),
            "cards" | "inv" => print_cards(run),
            "hand" => print_hand(run),
            "summary" => print_summary(run),
            "save" => {
                let path = save_path(&args);
                match save_state_file(run, options.seed, &path) {
                    Ok(()) => println!("saved to {}", path.display()),
                    Err(err) => println!("! save failed: {err:#}"),
                }
            }
            "load" => {
                let path = save_path(&args);
                match load_state_file(&path) {
                    Ok(saved) => {
                        apply_saved_state(run, &saved, events);
                        println!("loaded {}", path.display());
                    }
                    Err(err) => println!("! load failed: {err:#}"),
                }
            }
            _ => match execute_command(run, events, cmd, &args) {
                Ok(true) => {}
                Ok(false) => println!("unknown command {cmd}, try help"),
                Err(err) => println!("! {} ({})", err, err.reason()),
            },
        }
        flush_events(events);
        if run.phase == GamePhase::GameOver {
            print_summary(run);
            break;
        }
    }
    Ok(())
}

fn save_path(args: &[&str]) -> PathBuf {
    args.first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH))
}

fn parse_index(args: &[&str], pos: usize) -> Option<usize> {
    args.get(pos).and_then(|value| value.parse::<usize>().ok())
}

fn parse_id(args: &[&str], pos: usize) -> Option<u32> {
    args.get(pos).and_then(|value| value.parse::<u32>().ok())
}

/// Returns false for commands it does not know or cannot parse.
fn execute_command(
    run: &mut RunState,
    events: &mut EventBus,
    cmd: &str,
    args: &[&str],
) -> Result<bool, RunError> {
    match cmd {
        "go" | "g" => {
            let Some(id) = parse_id(args, 0) else {
                return Ok(false);
            };
            let kind = run.select_node(id, events)?;
            println!("node {id}: {kind:?}");
        }
        "deal" | "d" => {
            run.deal_hand(events)?;
            print_hand(run);
        }
        "sel" | "select" => {
            for value in args {
                let Ok(index) = value.parse::<usize>() else {
                    return Ok(false);
                };
                run.toggle_card_selection(index)?;
            }
            print_hand(run);
        }
        "play" | "p" => {
            let outcome = run.play_selected(events)?;
            println!("damage: {}", outcome.damage);
        }
        "discard" | "x" => {
            let count = run.discard_selected(events)?;
            println!("discarded {count}");
            print_hand(run);
        }
        "use" | "u" => {
            let Some(index) = parse_index(args, 0) else {
                return Ok(false);
            };
            run.use_bonus_card(index, events)?;
        }
        "end" | "e" => {
            let damage = run.enemy_attack(events)?;
            println!("enemy hits for {damage}");
        }
        "wait" | "w" => {
            let ms = args
                .first()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(run.config.combat.reward_delay_ms);
            let fired = run.advance_time(ms, events)?;
            log::debug!("{fired} scheduled action(s) fired");
        }
        "buy" | "b" => {
            let Some(index) = parse_index(args, 0) else {
                return Ok(false);
            };
            let item = run.purchase_shop_item(index, events)?;
            println!("bought {} for {}", item.name, item.price);
        }
        "rest" | "r" => {
            let option = match (args.first().copied(), parse_id(args, 1)) {
                (Some("heal"), _) => RestOption::Heal,
                (Some("shield"), _) => RestOption::Shield,
                (Some("upgrade"), Some(id)) => RestOption::Upgrade(id),
                _ => return Ok(false),
            };
            run.take_rest(option, events)?;
        }
        "choose" | "c" => {
            let Some(index) = parse_index(args, 0) else {
                return Ok(false);
            };
            let result = run.make_event_choice(index, events)?;
            println!("{}", result.message);
        }
        "next" | "n" => match run.phase {
            GamePhase::Reward => run.complete_reward(events)?,
            GamePhase::Shop => run.leave_shop(events)?,
            GamePhase::Rest => run.complete_rest(events)?,
            GamePhase::Event => run.complete_event(events)?,
            actual => {
                return Err(RunError::InvalidPhase {
                    expected: GamePhase::Exploration,
                    actual,
                })
            }
        },
        "equip" => {
            let Some(id) = parse_id(args, 0) else {
                return Ok(false);
            };
            run.equip_bonus_card(id, events)?;
        }
        "unequip" => {
            let Some(id) = parse_id(args, 0) else {
                return Ok(false);
            };
            run.unequip_bonus_card(id, events)?;
        }
        "upgrade" => {
            let Some(id) = parse_id(args, 0) else {
                return Ok(false);
            };
            let level = run.upgrade_bonus_card_default(id, events)?;
            println!("card {id} is now level {level}");
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn save_state_file(run: &RunState, seed: u64, path: &Path) -> anyhow::Result<()> {
    let payload = SavedRunState {
        version: SAVE_SCHEMA_VERSION,
        seed,
        stage: run.stage,
        player: run.player.clone(),
        collection: run.collection.snapshot(),
        stats: run.stats.clone(),
    };
    let body = serde_json::to_string_pretty(&payload)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}

fn load_state_file(path: &Path) -> anyhow::Result<SavedRunState> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let payload: SavedRunState =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if payload.version != SAVE_SCHEMA_VERSION {
        bail!(
            "unsupported save version {} (expected {})",
            payload.version,
            SAVE_SCHEMA_VERSION
        );
    }
    Ok(payload)
}

/// A loaded run resumes on a fresh map of the saved stage.
fn apply_saved_state(run: &mut RunState, saved: &SavedRunState, events: &mut EventBus) {
    run.collection.restore(&run.content.catalog, &saved.collection);
    run.player = saved.player.clone();
    run.stats = saved.stats.clone();
    run.stage = saved.stage.max(1);
    run.map = MapGraph::default();
    if let Err(err) = run.change_phase(GamePhase::Exploration, Default::default(), events) {
        println!("! {} ({})", err, err.reason());
    }
}

fn print_help() {
    println!("Commands:");
    println!("  help|h|?                 show help");
    println!("  state|s                  run state");
    println!("  map|m                    map nodes");
    println!("  cards|inv                owned and equipped bonus cards");
    println!("  hand                     current hand");
    println!("  summary                  run statistics");
    println!("  save [path] | load [path]");
    println!("  quit|exit");
    println!();
    println!("Exploration:");
    println!("  go|g <node>              move to a reachable node");
    println!();
    println!("Combat:");
    println!("  deal|d                   draw a hand");
    println!("  sel <idx..>              toggle card selection");
    println!("  play|p                   play the selection");
    println!("  discard|x                discard the selection");
    println!("  use|u <slot>             activate an equipped bonus card");
    println!("  end|e                    enemy turn");
    println!("  wait|w [ms]              let time pass");
    println!();
    println!("Shop / Rest / Event / Reward:");
    println!("  buy|b <idx>              buy an offer");
    println!("  rest|r heal|shield|upgrade <id>");
    println!("  choose|c <idx>           pick an event choice");
    println!("  next|n                   leave the current screen");
    println!("  equip <id> | unequip <id> | upgrade <id>");
}

fn print_state(run: &RunState) {
    let player = &run.player;
    println!(
        "stage {} | {:?} | PV {}/{} | bouclier {} | or {}",
        run.stage, run.phase, player.health, player.max_health, player.shield, player.gold
    );
    match run.phase {
        GamePhase::Exploration => {
            println!("reachable: {:?}", run.map.accessible_ids());
        }
        GamePhase::Combat => {
            if let Some(enemy) = run.combat.enemy.as_ref() {
                println!(
                    "{} ({:?}) PV {}/{} ATK {}",
                    enemy.name, enemy.tier, enemy.health, enemy.max_health, enemy.attack
                );
            }
            println!(
                "turn {} | {:?} | discard {}",
                run.combat.turn,
                run.combat.turn_phase,
                if run.combat.discard_used && !run.combat.discard_mode {
                    "used"
                } else {
                    "ready"
                }
            );
            if let Some(combination) = run.combat.deck_bonus.as_ref() {
                println!("deck: {}", combination.description);
            }
        }
        GamePhase::Shop => {
            for (index, item) in run.shop_items().iter().enumerate() {
                println!("  [{index}] {} - {} or ({})", item.name, item.price, item.description);
            }
        }
        GamePhase::Event => {
            if let Some(state) = run.event.as_ref() {
                println!("{}: {}", state.def.title, state.def.description);
                for (index, choice) in state.def.choices.iter().enumerate() {
                    println!("  [{index}] {}", choice.text);
                }
            }
        }
        GamePhase::Reward => {
            if let Some(reward) = run.reward {
                println!("reward: {} or, card {:?}", reward.gold, reward.card);
            }
        }
        GamePhase::Rest | GamePhase::GameOver => {}
    }
}

fn print_map(map: &MapGraph) {
    let depth = map.nodes.iter().map(|node| node.level).max().unwrap_or(0);
    for level in 0..=depth {
        let row: Vec<String> = map
            .nodes
            .iter()
            .filter(|node| node.level == level)
            .map(|node| {
                let marker = if map.current == Some(node.id) {
                    "*"
                } else if node.visited {
                    "."
                } else {
                    ""
                };
                format!("{}{}:{}->{:?}", marker, node.id, node_label(node.kind), node.child_ids)
            })
            .collect();
        println!("  {level}: {}", row.join("  "));
    }
}

fn node_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Start => "start",
        NodeKind::Combat => "combat",
        NodeKind::Elite => "elite",
        NodeKind::Boss => "boss",
        NodeKind::Event => "event",
        NodeKind::Shop => "shop",
        NodeKind::Rest => "rest",
    }
}

fn print_cards(run: &RunState) {
    println!(
        "equipped {}/{}:",
        run.collection.active().len(),
        run.collection.max_slots()
    );
    for (slot, active) in run.collection.active().iter().enumerate() {
        let card = &active.card;
        let uses = if card.is_active_type() {
            format!(" uses {}/{}", active.uses_remaining, card.uses())
        } else {
            String::new()
        };
        println!(
            "  [{slot}] #{} {} lv{} {}{}",
            card.id(),
            card.name(),
            card.level,
            card.face().label(),
            uses
        );
    }
    if let Some(combination) = run.collection.cached_combination() {
        println!("synergy: {}", combination.description);
    }
    println!("owned:");
    for card in run.collection.cards() {
        let value = card.bonus().map(|bonus| bonus.value).unwrap_or(0.0);
        println!(
            "  #{} {} lv{} ({:?}, {})",
            card.id(),
            card.name(),
            card.level,
            card.def.effect,
            value
        );
    }
}

fn print_hand(run: &RunState) {
    let cards: Vec<String> = run
        .combat
        .hand
        .iter()
        .enumerate()
        .map(|(index, held)| {
            let mark = if held.is_selected { "*" } else { "" };
            format!("{index}:{}{mark}", held.card.label())
        })
        .collect();
    println!("hand: {}", cards.join(" "));
}

fn print_summary(run: &RunState) {
    let stats = &run.stats;
    println!(
        "stage {} | enemies {} | hands {} | damage {} (best {}) | cards {} used {} | gold {} | items {}",
        run.stage,
        stats.enemies_defeated,
        stats.hands_played,
        stats.total_damage,
        stats.highest_damage,
        stats.bonus_cards_collected,
        stats.bonus_cards_used,
        stats.gold_earned,
        stats.items_purchased
    );
}
