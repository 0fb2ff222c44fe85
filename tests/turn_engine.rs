//! Turn guards, movement, pass-go credit, tax, jail, and the forced-move
//! landings, driven through the real store.

mod common;

use boardwalk::game::errors::GameError;
use boardwalk::game::types::{
    ActionKind, ForcedAction, PlayerStatus, TileKind, JAIL_POSITION, PASS_GO_BONUS,
};
use common::*;

#[test]
fn roll_out_of_turn_is_rejected_without_mutation() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let bob = &table.players[1];

    let err = try_roll(&table, bob.id, (3, 4)).unwrap_err();
    assert!(matches!(err, GameError::NotYourTurn));

    let unchanged = table
        .service
        .store()
        .get_player(table.game_id, bob.id)
        .unwrap();
    assert_eq!(unchanged.position, 0);
    assert_eq!(unchanged.money, 1500);
}

#[test]
fn turn_gate_follows_the_pointer() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];

    grant_turn(&table, bob.id);
    let err = try_roll(&table, alice.id, (3, 4)).unwrap_err();
    assert!(matches!(err, GameError::NotYourTurn));
    let outcome = roll(&table, bob.id, (3, 4));
    assert_eq!(outcome.new_position, 7);
}

#[test]
fn second_roll_in_one_turn_is_rejected() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];

    roll(&table, alice.id, (1, 2));
    let err = try_roll(&table, alice.id, (1, 2)).unwrap_err();
    assert!(matches!(err, GameError::AlreadyRolled));
}

#[test]
fn movement_wraps_and_credits_pass_go_exactly_once() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 38);

    // 38 + 10 = 48 >= 40, so the bonus lands before landing resolution.
    let outcome = roll(&table, alice.id, (5, 5));
    assert!(outcome.is_doubles);
    assert!(outcome.passed_go);
    assert_eq!(outcome.new_position, 8);

    let after = table
        .service
        .store()
        .get_player(table.game_id, alice.id)
        .unwrap();
    assert_eq!(after.position, 8);
    assert_eq!(after.money, 1500 + PASS_GO_BONUS);
    assert!(!after.can_roll);
}

#[test]
fn short_roll_does_not_pass_go() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 20);

    let outcome = roll(&table, alice.id, (3, 4));
    assert!(!outcome.passed_go);
    assert_eq!(outcome.new_position, 27);
    let after = table
        .service
        .store()
        .get_player(table.game_id, alice.id)
        .unwrap();
    // Position 27 is an unowned street: no money moves.
    assert_eq!(after.money, 1500);
}

#[test]
fn income_tax_debits_two_hundred() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 1);

    // 1 + 3 = 4, the Income Tax tile.
    let outcome = roll(&table, alice.id, (1, 2));
    assert_eq!(outcome.tile_kind, Some(TileKind::Tax));
    assert_eq!(outcome.tax_paid, Some(200));
    let after = table
        .service
        .store()
        .get_player(table.game_id, alice.id)
        .unwrap();
    assert_eq!(after.money, 1300);
}

#[test]
fn luxury_tax_debits_one_hundred() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 33);

    // 33 + 5 = 38, the Luxury Tax tile.
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.tax_paid, Some(100));
}

#[test]
fn unpayable_tax_empties_the_wallet_and_bankrupts() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 1);
    set_money(&table, alice.id, 120);

    let outcome = roll(&table, alice.id, (1, 2));
    assert_eq!(outcome.tax_paid, Some(120));
    assert!(outcome.went_bankrupt);

    let after = table
        .service
        .store()
        .get_player(table.game_id, alice.id)
        .unwrap();
    assert_eq!(after.money, 0);
    assert_eq!(after.status, PlayerStatus::Bankrupt);
}

#[test]
fn tax_feeds_the_pool_only_under_vacation_cash() {
    let mut rules = boardwalk::game::types::GameRules::default();
    rules.vacation_cash = true;
    let table = started_with_rules(&["alice", "bob"], rules, vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 1);

    roll(&table, alice.id, (1, 2));
    let game = table.service.store().get_game(table.game_id).unwrap();
    assert_eq!(game.bank_pool, 200);
}

#[test]
fn free_parking_pays_out_the_pool_under_vacation_cash() {
    let mut rules = boardwalk::game::types::GameRules::default();
    rules.vacation_cash = true;
    let table = started_with_rules(&["alice", "bob"], rules, vec![1, 2]);
    let alice = &table.players[0];

    let store = table.service.store();
    let mut game = store.get_game(table.game_id).unwrap();
    game.bank_pool = 350;
    store.put_game(game).unwrap();
    place_at(&table, alice.id, 15);

    // 15 + 5 = 20, Free Parking.
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.bonus_collected, Some(350));
    let after = store.get_player(table.game_id, alice.id).unwrap();
    assert_eq!(after.money, 1850);
    assert_eq!(store.get_game(table.game_id).unwrap().bank_pool, 0);
}

#[test]
fn free_parking_is_a_no_op_without_the_rule() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let store = table.service.store();
    let mut game = store.get_game(table.game_id).unwrap();
    game.bank_pool = 350;
    store.put_game(game).unwrap();
    place_at(&table, alice.id, 15);

    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.bonus_collected, None);
    assert_eq!(store.get_game(table.game_id).unwrap().bank_pool, 350);
}

#[test]
fn go_to_jail_forces_the_move_without_second_go_credit() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 25);

    // 25 + 5 = 30, the Go To Jail corner.
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.forced_action, Some(ForcedAction::GoToJail));
    assert_eq!(outcome.new_position, JAIL_POSITION);
    assert!(!outcome.passed_go);

    let after = table
        .service
        .store()
        .get_player(table.game_id, alice.id)
        .unwrap();
    assert_eq!(after.position, JAIL_POSITION);
    assert!(after.is_in_jail);
    assert_eq!(after.jail_turns, 0);
    // No pass-go money: the forced relocation is not a crossing.
    assert_eq!(after.money, 1500);
}

#[test]
fn landing_past_go_then_sent_to_jail_keeps_the_single_bonus() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    place_at(&table, alice.id, 34);

    // 34 + 6 = 40 -> crosses Go to position 0, bonus credited once.
    let outcome = roll(&table, alice.id, (2, 4));
    assert!(outcome.passed_go);
    assert_eq!(outcome.new_position, 0);
    let after = table
        .service
        .store()
        .get_player(table.game_id, alice.id)
        .unwrap();
    assert_eq!(after.money, 1500 + PASS_GO_BONUS);
}

#[test]
fn jail_wait_consumes_the_roll_in_place() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let store = table.service.store();
    let mut player = store.get_player(table.game_id, alice.id).unwrap();
    player.position = JAIL_POSITION;
    player.is_in_jail = true;
    store.put_player(player).unwrap();

    let outcome = roll(&table, alice.id, (2, 5));
    assert_eq!(outcome.forced_action, Some(ForcedAction::JailWait));
    assert_eq!(outcome.new_position, JAIL_POSITION);

    let after = store.get_player(table.game_id, alice.id).unwrap();
    assert!(after.is_in_jail);
    assert_eq!(after.jail_turns, 1);
    assert_eq!(after.position, JAIL_POSITION);
    assert!(!after.can_roll);
}

#[test]
fn doubles_spring_the_player_from_jail() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let store = table.service.store();
    let mut player = store.get_player(table.game_id, alice.id).unwrap();
    player.position = JAIL_POSITION;
    player.is_in_jail = true;
    player.jail_turns = 1;
    store.put_player(player).unwrap();

    let outcome = roll(&table, alice.id, (4, 4));
    assert_eq!(outcome.forced_action, None);
    assert_eq!(outcome.new_position, 18);

    let after = store.get_player(table.game_id, alice.id).unwrap();
    assert!(!after.is_in_jail);
    assert_eq!(after.jail_turns, 0);
}

#[test]
fn third_failed_jail_turn_walks_out_with_the_roll() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let store = table.service.store();
    let mut player = store.get_player(table.game_id, alice.id).unwrap();
    player.position = JAIL_POSITION;
    player.is_in_jail = true;
    player.jail_turns = 2;
    store.put_player(player).unwrap();

    let outcome = roll(&table, alice.id, (2, 4));
    assert_eq!(outcome.forced_action, None);
    assert_eq!(outcome.new_position, 16);
    let after = store.get_player(table.game_id, alice.id).unwrap();
    assert!(!after.is_in_jail);
}

#[test]
fn every_roll_is_logged() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    roll(&table, alice.id, (3, 4));

    let log = table.service.store().read_log(table.game_id).unwrap();
    assert!(log.iter().any(|e| e.action == ActionKind::DiceRolled));
    assert!(log.iter().any(|e| e.action == ActionKind::GameStarted));
}
