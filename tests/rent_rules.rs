//! Rent computation and collection against the real store: the tier
//! ladder, group bonuses, skips, and the conservation of money between
//! payer and owner.

mod common;

use boardwalk::game::types::{GameRules, PlayerStatus};
use common::*;

#[test]
fn rent_moves_exactly_from_roller_to_owner() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 19, bob.id); // New York Avenue, base rent 16

    let before = total_money(&table);
    place_at(&table, alice.id, 14);
    let outcome = roll(&table, alice.id, (2, 3)); // lands on 19
    assert_eq!(outcome.rent_paid, Some(16));

    let store = table.service.store();
    assert_eq!(store.get_player(table.game_id, alice.id).unwrap().money, 1484);
    assert_eq!(store.get_player(table.game_id, bob.id).unwrap().money, 1516);
    // Rent alone never changes the total money at the table.
    assert_eq!(total_money(&table), before);
}

#[test]
fn no_rent_on_your_own_property() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    give_tile(&table, 19, alice.id);

    place_at(&table, alice.id, 14);
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.rent_paid, None);
}

#[test]
fn mortgaged_property_collects_nothing() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 19, bob.id);
    let store = table.service.store();
    let mut tile = store.get_tile(table.game_id, 19).unwrap();
    tile.is_mortgaged = true;
    store.put_tile(tile).unwrap();

    place_at(&table, alice.id, 14);
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.rent_paid, None);
    assert_eq!(store.get_player(table.game_id, alice.id).unwrap().money, 1500);
}

#[test]
fn jailed_owner_collects_nothing_when_the_rule_is_on() {
    let mut rules = GameRules::default();
    rules.no_rent_in_prison = true;
    let table = started_with_rules(&["alice", "bob"], rules, vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 19, bob.id);
    let store = table.service.store();
    let mut jailed = store.get_player(table.game_id, bob.id).unwrap();
    jailed.is_in_jail = true;
    store.put_player(jailed).unwrap();

    place_at(&table, alice.id, 14);
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.rent_paid, None);
}

#[test]
fn jailed_owner_still_collects_without_the_rule() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 19, bob.id);
    let store = table.service.store();
    let mut jailed = store.get_player(table.game_id, bob.id).unwrap();
    jailed.is_in_jail = true;
    store.put_player(jailed).unwrap();

    place_at(&table, alice.id, 14);
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.rent_paid, Some(16));
}

#[test]
fn full_railroad_set_charges_one_hundred() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    for pos in [5, 15, 25, 35] {
        give_tile(&table, pos, bob.id);
    }

    place_at(&table, alice.id, 0);
    let outcome = roll(&table, alice.id, (2, 3)); // lands on Reading Railroad
    assert_eq!(outcome.rent_paid, Some(100));
}

#[test]
fn single_railroad_charges_twenty_five() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 5, bob.id);

    place_at(&table, alice.id, 0);
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.rent_paid, Some(25));
}

#[test]
fn utility_rent_uses_the_triggering_total() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 12, bob.id);

    // One utility: 4 x the dice total that caused the landing.
    place_at(&table, alice.id, 3);
    let outcome = roll(&table, alice.id, (4, 5)); // total 9, lands on 12
    assert_eq!(outcome.rent_paid, Some(36));
}

#[test]
fn both_utilities_multiply_by_ten() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 12, bob.id);
    give_tile(&table, 28, bob.id);

    place_at(&table, alice.id, 3);
    let outcome = roll(&table, alice.id, (4, 5));
    assert_eq!(outcome.rent_paid, Some(90));
}

#[test]
fn full_color_set_doubles_base_rent() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    // Brown group is positions 1 and 3.
    give_tile(&table, 1, bob.id);
    give_tile(&table, 3, bob.id);

    place_at(&table, alice.id, 36);
    let outcome = roll(&table, alice.id, (2, 3)); // 36 + 5 wraps to 1
    assert_eq!(outcome.rent_paid, Some(4)); // base rent 2, doubled
}

#[test]
fn all_but_one_of_the_set_pays_base_rent() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 1, bob.id);
    // Baltic (position 3) stays unowned: not a full set.

    place_at(&table, alice.id, 36);
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.rent_paid, Some(2));
}

#[test]
fn house_tier_rent_with_short_funds_clamps_and_bankrupts() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 19, bob.id);
    let store = table.service.store();
    let mut tile = store.get_tile(table.game_id, 19).unwrap();
    tile.houses = 2;
    tile.rent_with_houses[1] = 90;
    store.put_tile(tile).unwrap();
    set_money(&table, alice.id, 50);

    place_at(&table, alice.id, 14);
    let outcome = roll(&table, alice.id, (2, 3));
    // The owner collects what was actually paid, not the 90 due.
    assert_eq!(outcome.rent_paid, Some(50));
    assert!(outcome.went_bankrupt);

    let payer = store.get_player(table.game_id, alice.id).unwrap();
    assert_eq!(payer.money, 0);
    assert_eq!(payer.status, PlayerStatus::Bankrupt);
    let owner = store.get_player(table.game_id, bob.id).unwrap();
    assert_eq!(owner.money, 1550);
}

#[test]
fn hotel_rent_outranks_the_set_bonus() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];
    give_tile(&table, 1, bob.id);
    give_tile(&table, 3, bob.id);
    let store = table.service.store();
    let mut tile = store.get_tile(table.game_id, 1).unwrap();
    tile.hotels = 1;
    store.put_tile(tile).unwrap();

    place_at(&table, alice.id, 36);
    let outcome = roll(&table, alice.id, (2, 3));
    assert_eq!(outcome.rent_paid, Some(250)); // Mediterranean hotel rent
}
