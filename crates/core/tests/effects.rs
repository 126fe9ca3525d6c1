mod common;

use brelan_core::{
    activation_effect, resolve_passive, ActiveCard, ActiveEffect, Bonus, BonusCardDef, BonusType,
    Card, Catalog, CollectionRule, Condition, Event, EventBus, FeedbackKind, GameConfig, HandKind,
    HandResult, OwnedCard, PassiveContext, Rank, RunError, RunState, Suit, TurnPhase,
};
use common::{active, passive};

fn equipped(defs: &[BonusCardDef]) -> Vec<ActiveCard> {
    defs.iter()
        .map(|def| ActiveCard::equip(&OwnedCard::new(def, Card::new(Suit::Spades, Rank::Ace))))
        .collect()
}

fn context<'a>(hand: HandKind, base: i64, active: &'a [ActiveCard]) -> PassiveContext<'a> {
    PassiveContext {
        hand,
        base_damage: base,
        pending_bonus: 0,
        pending_multiplier: 1.0,
        player_damaged_last_turn: false,
        health: 50,
        max_health: 50,
        low_health_ratio: 0.25,
        active,
    }
}

#[test]
fn passive_resolution_depends_on_slot_order() {
    let plus = passive(100, Condition::Always, BonusType::Damage, 3.0);
    let double = passive(101, Condition::Always, BonusType::DamageMultiplier, 2.0);

    let add_then_double = equipped(&[plus.clone(), double.clone()]);
    let out = resolve_passive(&context(HandKind::HighCard, 10, &add_then_double));
    assert_eq!(out.damage, 26);

    let double_then_add = equipped(&[double, plus]);
    let out = resolve_passive(&context(HandKind::HighCard, 10, &double_then_add));
    assert_eq!(out.damage, 23);
}

#[test]
fn low_health_multiplier_applies_at_one_fifth_health() {
    let adrenaline = passive(102, Condition::LowHealth, BonusType::DamageMultiplier, 2.0);
    let active = equipped(&[adrenaline]);
    let mut ctx = context(HandKind::Pair, 10, &active);
    ctx.health = 10;
    ctx.max_health = 50;
    assert_eq!(resolve_passive(&ctx).damage, 20);

    ctx.health = 13;
    assert_eq!(resolve_passive(&ctx).damage, 10);
}

#[test]
fn hand_and_damage_taken_conditions_gate_cards() {
    let pair = passive(1, Condition::Hand(HandKind::Pair), BonusType::Damage, 2.0);
    let riposte = passive(3, Condition::DamageTaken, BonusType::Damage, 2.0);
    let active = equipped(&[pair, riposte]);

    let mut ctx = context(HandKind::TwoPair, 4, &active);
    assert_eq!(resolve_passive(&ctx).damage, 4);
    ctx.hand = HandKind::Pair;
    assert_eq!(resolve_passive(&ctx).damage, 6);
    ctx.player_damaged_last_turn = true;
    let out = resolve_passive(&ctx);
    assert_eq!(out.damage, 8);
    assert_eq!(out.descriptions.len(), 2);
}

#[test]
fn pending_values_apply_before_passives() {
    let plus = passive(100, Condition::Always, BonusType::Damage, 3.0);
    let active = equipped(&[plus]);
    let mut ctx = context(HandKind::HighCard, 10, &active);
    ctx.pending_bonus = 7;
    ctx.pending_multiplier = 2.0;
    let out = resolve_passive(&ctx);
    assert_eq!(out.damage, (10 + 7) * 2 + 3);
    assert!(out.multiplier_consumed);

    ctx.pending_multiplier = 1.0;
    assert!(!resolve_passive(&ctx).multiplier_consumed);
}

#[test]
fn support_passives_accumulate_separately() {
    let cards = equipped(&[
        passive(19, Condition::Always, BonusType::Heal, 3.0),
        passive(12, Condition::Hand(HandKind::Flush), BonusType::Shield, 5.0),
        passive(5, Condition::Always, BonusType::DamageReduction, 2.0),
        active(13, BonusType::Damage, 7.0, 1),
    ]);
    let out = resolve_passive(&context(HandKind::Flush, 32, &cards));
    assert_eq!(out.damage, 32);
    assert_eq!(out.heal, 3);
    assert_eq!(out.shield, 5);
    assert_eq!(out.damage_reduction, 2);
}

#[test]
fn activation_payloads_are_validated() {
    let card = |def: BonusCardDef| OwnedCard::new(&def, Card::new(Suit::Hearts, Rank::Two));
    assert_eq!(
        activation_effect(&card(active(13, BonusType::Damage, 7.0, 1))).expect("damage"),
        ActiveEffect::Damage(7)
    );
    assert_eq!(
        activation_effect(&card(active(18, BonusType::Discard, 3.0, 1))).expect("discard"),
        ActiveEffect::Discard(3)
    );

    let unknown = card(active(40, BonusType::Unknown("teleport".into()), 1.0, 1));
    let err = activation_effect(&unknown).expect_err("unknown type");
    assert_eq!(err.reason(), "unknown_effect");

    let mut missing = active(41, BonusType::Damage, 1.0, 1);
    missing.bonus = None;
    let err = activation_effect(&card(missing)).expect_err("no bonus");
    assert!(matches!(err, RunError::InvalidBonus(41)));
}

#[test]
fn active_cards_stage_modifiers_for_the_next_attack() {
    // 13: +7 damage, 30: x2 damage, both single use.
    let mut run = common::run_with(&[13, 30], 5);
    let mut events = common::in_combat(&mut run, 100, 5);

    run.use_bonus_card(0, &mut events).expect("use 13");
    run.use_bonus_card(1, &mut events).expect("use 30");
    assert_eq!(run.combat.pending_damage_bonus, 7);
    assert_eq!(run.combat.pending_damage_multiplier, 2.0);

    let out = run
        .resolve_attack(HandResult::new(HandKind::Pair, 2), &mut events)
        .expect("attack");
    assert_eq!(out.damage, 18);
    assert_eq!(run.combat.pending_damage_bonus, 0);
    assert_eq!(run.combat.pending_damage_multiplier, 1.0);
    assert_eq!(run.combat.enemy.as_ref().map(|e| e.health), Some(82));
    assert_eq!(run.combat.turn_phase, TurnPhase::Result);
}

#[test]
fn exhausted_card_cannot_be_used_again() {
    let mut run = common::run_with(&[13], 5);
    let mut events = common::in_combat(&mut run, 100, 5);

    run.use_bonus_card(0, &mut events).expect("first use");
    let active = &run.collection.active()[0];
    assert_eq!(active.uses_remaining, 0);
    assert!(!active.available);

    let err = run.use_bonus_card(0, &mut events).expect_err("second use");
    assert_eq!(err.reason(), "no_uses_remaining");
    assert_eq!(run.combat.pending_damage_bonus, 7);
}

#[test]
fn activation_preconditions_report_reasons() {
    let mut run = common::run_with(&[1, 13], 5);
    let mut events = EventBus::default();
    let err = run.use_bonus_card(1, &mut events).expect_err("not in combat");
    assert_eq!(err.reason(), "not_in_combat");
    assert_eq!(
        run.use_bonus_card(9, &mut events).expect_err("index first").reason(),
        "invalid_index"
    );
    assert_eq!(run.collection.active()[1].uses_remaining, 1);

    let mut events = common::in_combat(&mut run, 100, 5);
    assert_eq!(
        run.use_bonus_card(7, &mut events).expect_err("index").reason(),
        "invalid_index"
    );
    assert_eq!(
        run.use_bonus_card(0, &mut events).expect_err("passive").reason(),
        "passive_card"
    );
}

/// A combat run whose only equipped card is 13 with its bonus replaced.
fn run_with_active_bonus(bonus: Bonus) -> (RunState, EventBus) {
    let mut content = common::content();
    let mut cards = content.catalog.cards().to_vec();
    for card in cards.iter_mut().filter(|card| card.id == 13) {
        card.bonus = Some(bonus.clone());
    }
    content.catalog = Catalog::new(cards);
    let config = GameConfig {
        collection: CollectionRule {
            starting_card_ids: vec![13],
            ..GameConfig::default().collection
        },
        ..GameConfig::default()
    };
    let mut run = RunState::new(config, content, 5);
    run.start_run(&mut EventBus::default()).expect("start");
    let events = common::in_combat(&mut run, 100, 5);
    (run, events)
}

#[test]
fn unknown_effect_keeps_the_charge() {
    let (mut run, mut events) =
        run_with_active_bonus(Bonus::new(BonusType::Unknown("warp".into()), 1.0));

    let err = run.use_bonus_card(0, &mut events).expect_err("unknown");
    assert_eq!(err.reason(), "unknown_effect");
    assert_eq!(run.collection.active()[0].uses_remaining, 1);
    assert!(run.collection.active()[0].available);
    assert_eq!(run.stats.bonus_cards_used, 0);
}

#[test]
fn damage_reduction_is_not_an_activation() {
    let (mut run, mut events) =
        run_with_active_bonus(Bonus::new(BonusType::DamageReduction, 4.0));

    let err = run.use_bonus_card(0, &mut events).expect_err("passive-only bonus");
    assert_eq!(err, RunError::UnknownEffect("damageReduction".to_string()));
    assert_eq!(run.combat.pending_damage_reduction, 0);
    assert_eq!(run.collection.active()[0].uses_remaining, 1);
    assert_eq!(run.stats.bonus_cards_used, 0);
}

#[test]
fn invulnerability_absorbs_one_attack() {
    let mut run = common::run_with(&[21], 5);
    let mut events = common::in_combat(&mut run, 100, 12);
    run.use_bonus_card(0, &mut events).expect("barrier");
    run.resolve_attack(HandResult::new(HandKind::HighCard, 1), &mut events)
        .expect("attack");

    assert_eq!(run.enemy_attack(&mut events).expect("blocked"), 0);
    assert_eq!(run.player.health, 50);
    assert!(!run.combat.player_damaged_last_turn);
    assert_eq!(run.combat.turn_phase, TurnPhase::Draw);

    run.deal_hand(&mut events).expect("deal");
    run.resolve_attack(HandResult::new(HandKind::HighCard, 1), &mut events)
        .expect("attack");
    assert_eq!(run.enemy_attack(&mut events).expect("hit"), 12);
    assert_eq!(run.player.health, 38);
    assert!(run.combat.player_damaged_last_turn);
}

#[test]
fn heal_card_is_clamped_and_reported() {
    let mut run = common::run_with(&[27], 5);
    let mut events = common::in_combat(&mut run, 100, 5);
    run.player.health = 45;
    let message = run.use_bonus_card(0, &mut events).expect("heal");
    assert!(!message.is_empty());
    assert_eq!(run.player.health, 50);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Feedback { kind: FeedbackKind::Success, .. }
    )));
}
