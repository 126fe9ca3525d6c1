mod common;

use brelan_core::{
    CollectionRule, EventBus, GameConfig, GamePhase, HandKind, HandResult, NodeKind, RunState,
    TurnPhase,
};

#[test]
fn collection_walkthrough() {
    let mut run = common::run_with(&[1, 2, 10], 21);
    let mut events = EventBus::default();
    let ids = |run: &RunState| -> Vec<u32> {
        run.collection.active().iter().map(|a| a.card.id()).collect()
    };
    assert_eq!(ids(&run), vec![1, 2, 10]);

    let err = run.equip_bonus_card(1, &mut events).expect_err("already equipped");
    assert_eq!(err.reason(), "already_equipped");
    assert_eq!(run.collection.active().len(), 3);

    run.player.gold = 500;
    assert_eq!(run.upgrade_bonus_card_default(1, &mut events), Ok(2));
    assert_eq!(run.upgrade_bonus_card_default(1, &mut events), Ok(3));
    let gold = run.player.gold;
    let err = run
        .upgrade_bonus_card_default(1, &mut events)
        .expect_err("capped");
    assert_eq!(err.reason(), "max_level");
    assert_eq!(run.player.gold, gold);
    assert_eq!(run.collection.card(1).map(|c| c.level), Some(3));
    // 2 * 1.4 floored
    assert_eq!(
        run.collection.card(1).and_then(|c| c.bonus()).map(|b| b.value),
        Some(2.0)
    );

    run.unequip_bonus_card(2, &mut events).expect("unequip");
    assert_eq!(ids(&run), vec![1, 10]);
    run.equip_bonus_card(2, &mut events).expect("equip");
    assert_eq!(ids(&run), vec![1, 10, 2]);
    let readded = &run.collection.active()[2];
    assert_eq!(readded.uses_remaining, readded.card.uses());
    assert!(readded.available);
}

#[test]
fn upgrade_needs_gold() {
    let mut run = common::run_with(&[14], 21);
    let mut events = EventBus::default();
    run.player.gold = 10;
    let err = run
        .upgrade_bonus_card(14, 50, &mut events)
        .expect_err("too poor");
    assert_eq!(
        err,
        brelan_core::RunError::NotEnoughGold {
            needed: 50,
            available: 10
        }
    );
    assert_eq!(run.collection.card(14).map(|c| c.level), Some(1));
}

/// Walks the map from the start node, fighting every combat node with the
/// strongest hand in the catalog until the boss falls or the run ends.
#[test]
fn seeded_run_reaches_the_second_stage() {
    let config = GameConfig {
        collection: CollectionRule {
            starting_card_ids: vec![1, 2, 10, 26],
            ..GameConfig::default().collection
        },
        ..GameConfig::default()
    };
    let mut run = RunState::new(config, common::content(), 1234);
    let mut events = EventBus::default();
    run.start_run(&mut events).expect("start");

    let mut steps = 0;
    while run.stage == 1 && run.phase != GamePhase::GameOver {
        steps += 1;
        assert!(steps < 100, "run did not progress");
        match run.phase {
            GamePhase::Exploration => {
                let next = run.map.accessible_ids()[0];
                run.select_node(next, &mut events).expect("move");
            }
            GamePhase::Combat => {
                if run.combat.turn_phase == TurnPhase::Draw {
                    run.deal_hand(&mut events).expect("deal");
                }
                run.resolve_attack(HandResult::new(HandKind::RoyalFlush, 512), &mut events)
                    .expect("attack");
                if run.combat.enemy_defeated() {
                    run.advance_time(run.config.combat.reward_delay_ms, &mut events)
                        .expect("reward");
                } else {
                    run.enemy_attack(&mut events).expect("enemy turn");
                }
            }
            GamePhase::Reward => run.complete_reward(&mut events).expect("complete reward"),
            GamePhase::Shop => run.leave_shop(&mut events).expect("leave shop"),
            GamePhase::Rest => run.complete_rest(&mut events).expect("leave rest"),
            GamePhase::Event => {
                run.make_event_choice(0, &mut events).ok();
                run.complete_event(&mut events).expect("leave event");
            }
            GamePhase::GameOver => unreachable!(),
        }
    }

    assert_eq!(run.stage, 2);
    assert_eq!(run.phase, GamePhase::Exploration);
    assert!(run.stats.enemies_defeated >= 1);
    assert!(run.stats.highest_damage >= 512);
    assert_eq!(run.map.current, None);
    assert!(run.map.nodes.iter().any(|node| node.kind == NodeKind::Boss));
    assert!(run.history().count() <= run.config.phase_history_limit);
}
