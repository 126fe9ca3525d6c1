mod common;

use brelan_core::{
    EventBus, EventChoice, EventDef, EventOutcome, EventState, GamePhase, PhaseOptions, RestOption,
    RunState, ShopEffect, ShopItem, ShopState,
};

fn item(id: &str, price: i64, effect: ShopEffect) -> ShopItem {
    ShopItem {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        price,
        effect,
        max_purchases: None,
    }
}

fn open_shop(run: &mut RunState, items: Vec<ShopItem>) -> EventBus {
    let mut events = EventBus::default();
    run.shop = Some(ShopState { items });
    run.change_phase(GamePhase::Shop, PhaseOptions::default(), &mut events)
        .expect("shop");
    events
}

fn choice(chance: f64, gold_cost: i64, outcome: EventOutcome, failure: EventOutcome) -> EventChoice {
    EventChoice {
        text: "Essayer".to_string(),
        gold_cost,
        result_text: "Réussi".to_string(),
        failure_text: Some("Raté".to_string()),
        outcome,
        failure_outcome: failure,
        chance,
    }
}

fn open_event(run: &mut RunState, choices: Vec<EventChoice>) -> EventBus {
    let mut events = EventBus::default();
    run.event = Some(EventState {
        def: EventDef {
            id: "test".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            choices,
        },
        result: None,
    });
    run.change_phase(GamePhase::Event, PhaseOptions::default(), &mut events)
        .expect("event");
    events
}

#[test]
fn shop_entry_rolls_offers_from_content() {
    let mut run = common::run_with(&[3], 8);
    let mut events = EventBus::default();
    run.change_phase(GamePhase::Shop, PhaseOptions::default(), &mut events)
        .expect("shop");
    let offers = run.shop_items();
    assert_eq!(offers.len(), run.config.shop.offers);
    assert!(offers
        .iter()
        .all(|item| item.effect != ShopEffect::BonusCard { id: 3 }));

    run.leave_shop(&mut events).expect("leave");
    assert!(run.shop.is_none());
}

#[test]
fn purchases_apply_and_leave_the_shelf() {
    let mut run = common::run_with(&[1], 8);
    let mut events = open_shop(
        &mut run,
        vec![
            item("potion", 20, ShopEffect::Heal { value: 15 }),
            item("slot", 30, ShopEffect::Slot { value: 1 }),
            item("card", 40, ShopEffect::BonusCard { id: 13 }),
        ],
    );
    run.player.health = 30;

    let bought = run.purchase_shop_item(0, &mut events).expect("potion");
    assert_eq!(bought.id, "potion");
    assert_eq!(run.player.health, 45);
    assert_eq!(run.player.gold, 80);
    assert_eq!(run.shop_items().len(), 2);

    run.purchase_shop_item(0, &mut events).expect("slot");
    assert_eq!(run.collection.max_slots(), 6);
    run.purchase_shop_item(0, &mut events).expect("card");
    assert!(run.collection.owns(13));
    assert_eq!(run.player.gold, 10);
    assert_eq!(run.stats.items_purchased, 3);
    assert_eq!(run.purchases_of("slot"), 1);
}

#[test]
fn refused_purchases_cost_nothing() {
    let mut run = common::run_with(&[1], 8);
    let mut events = open_shop(
        &mut run,
        vec![
            item("big", 500, ShopEffect::MaxHealth { value: 10 }),
            item("dup", 10, ShopEffect::BonusCard { id: 1 }),
        ],
    );
    assert_eq!(
        run.purchase_shop_item(0, &mut events).expect_err("price").reason(),
        "not_enough_gold"
    );
    assert_eq!(
        run.purchase_shop_item(1, &mut events).expect_err("owned").reason(),
        "already_owned"
    );
    assert_eq!(
        run.purchase_shop_item(5, &mut events).expect_err("index").reason(),
        "invalid_shop_item"
    );
    assert_eq!(run.player.gold, 100);
    assert_eq!(run.shop_items().len(), 2);
}

#[test]
fn rest_allows_a_single_action() {
    let mut run = common::run_with(&[14], 8);
    let mut events = EventBus::default();
    run.change_phase(GamePhase::Rest, PhaseOptions::default(), &mut events)
        .expect("rest");
    run.player.health = 20;

    run.take_rest(RestOption::Heal, &mut events).expect("heal");
    assert_eq!(run.player.health, 35);
    assert_eq!(
        run.take_rest(RestOption::Shield, &mut events).expect_err("second").reason(),
        "rest_taken"
    );
    assert_eq!(run.player.shield, 0);

    run.complete_rest(&mut events).expect("leave");
    run.change_phase(GamePhase::Rest, PhaseOptions::default(), &mut events)
        .expect("rest again");
    assert_eq!(run.take_rest(RestOption::Upgrade(14), &mut events).map(|_| ()), Ok(()));
    assert_eq!(run.collection.card(14).map(|c| c.level), Some(2));
}

#[test]
fn rest_costs_are_checked_first() {
    let mut run = common::run_with(&[14], 8);
    run.config.rest.shield_cost = 150;
    let mut events = EventBus::default();
    run.change_phase(GamePhase::Rest, PhaseOptions::default(), &mut events)
        .expect("rest");
    assert_eq!(
        run.take_rest(RestOption::Shield, &mut events).expect_err("cost").reason(),
        "not_enough_gold"
    );
    assert_eq!(
        run.take_rest(RestOption::Upgrade(99), &mut events).expect_err("unknown").reason(),
        "card_not_found"
    );
    run.take_rest(RestOption::Heal, &mut events).expect("free heal");
}

#[test]
fn event_success_pays_out() {
    let mut run = common::run_with(&[1], 8);
    let mut events = open_event(
        &mut run,
        vec![choice(
            1.0,
            30,
            EventOutcome {
                gold: 50,
                card: Some(13),
                ..EventOutcome::default()
            },
            EventOutcome::default(),
        )],
    );
    let result = run.make_event_choice(0, &mut events).expect("choice");
    assert!(result.success);
    assert_eq!(result.message, "Réussi");
    assert_eq!(result.applied.card, Some(13));
    assert_eq!(run.player.gold, 120);
    assert!(run.collection.owns(13));

    assert_eq!(
        run.make_event_choice(0, &mut events).expect_err("twice").reason(),
        "event_resolved"
    );
    run.complete_event(&mut events).expect("leave");
    assert!(run.event.is_none());
}

#[test]
fn event_failure_hurts_but_never_kills() {
    let mut run = common::run_with(&[1], 8);
    run.player.health = 6;
    let mut events = open_event(
        &mut run,
        vec![choice(
            0.0,
            0,
            EventOutcome {
                gold: 70,
                ..EventOutcome::default()
            },
            EventOutcome {
                health_cost: 10,
                ..EventOutcome::default()
            },
        )],
    );
    let result = run.make_event_choice(0, &mut events).expect("choice");
    assert!(!result.success);
    assert_eq!(result.message, "Raté");
    assert_eq!(run.player.health, 1);
    assert_eq!(result.applied.health_cost, 5);
    assert_eq!(run.player.gold, 100);
}

#[test]
fn event_choice_checks() {
    let mut run = common::run_with(&[1], 8);
    let mut events = open_event(
        &mut run,
        vec![choice(1.0, 300, EventOutcome::default(), EventOutcome::default())],
    );
    assert_eq!(
        run.make_event_choice(0, &mut events).expect_err("poor").reason(),
        "not_enough_gold"
    );
    assert_eq!(
        run.make_event_choice(3, &mut events).expect_err("index").reason(),
        "invalid_choice"
    );

    run.event = None;
    assert_eq!(
        run.make_event_choice(0, &mut events).expect_err("none").reason(),
        "no_event"
    );
}

#[test]
fn event_node_draws_from_content() {
    let mut run = common::run_with(&[1], 8);
    let mut events = EventBus::default();
    run.change_phase(GamePhase::Event, PhaseOptions::event(), &mut events)
        .expect("event");
    let state = run.event.as_ref().expect("generated event");
    assert!(run.content.event(&state.def.id).is_some());
}
