//! Narrator event application: clamped deltas, atomicity, and the scripted
//! source seam.

mod common;

use boardwalk::game::errors::GameError;
use boardwalk::game::events::{EventPayload, ScriptedEvents};
use boardwalk::game::types::{ActionKind, PlayerStatus};
use common::*;
use uuid::Uuid;

#[test]
fn credits_and_debits_apply_through_the_clamp() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let bob = &table.players[1];

    let payload = EventPayload {
        narration: "A storm floods the east side".to_string(),
        capital_deltas: vec![(alice.id, 300), (bob.id, -2000)],
        ..Default::default()
    };
    let applied = table.service.apply_event(table.game_id, &payload).unwrap();

    // Bob only had 1500: the debit clamps and bankrupts.
    assert_eq!(applied.capital_applied, vec![(alice.id, 300), (bob.id, -1500)]);
    assert_eq!(applied.bankruptcies, vec![bob.id]);

    let store = table.service.store();
    assert_eq!(store.get_player(table.game_id, alice.id).unwrap().money, 1800);
    let bob_after = store.get_player(table.game_id, bob.id).unwrap();
    assert_eq!(bob_after.money, 0);
    assert_eq!(bob_after.status, PlayerStatus::Bankrupt);
}

#[test]
fn reputation_and_valuation_floor_at_zero() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];

    let payload = EventPayload {
        narration: "Scandal".to_string(),
        reputation_deltas: vec![(alice.id, -50)],
        valuation_deltas: vec![(39, -10_000)],
        ..Default::default()
    };
    table.service.apply_event(table.game_id, &payload).unwrap();

    let store = table.service.store();
    assert_eq!(store.get_player(table.game_id, alice.id).unwrap().reputation, 0);
    assert_eq!(store.get_tile(table.game_id, 39).unwrap().price, 0);
}

#[test]
fn unknown_player_aborts_the_whole_event() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];

    let payload = EventPayload {
        narration: "Ghost payout".to_string(),
        capital_deltas: vec![(alice.id, 500), (Uuid::new_v4(), 500)],
        ..Default::default()
    };
    let err = table.service.apply_event(table.game_id, &payload).unwrap_err();
    assert!(matches!(err, GameError::PlayerNotFound(_)));

    // The valid half of the payload must not have stuck.
    let store = table.service.store();
    assert_eq!(store.get_player(table.game_id, alice.id).unwrap().money, 1500);
}

#[test]
fn events_are_logged_once() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let payload = EventPayload {
        narration: "Quiet day".to_string(),
        ..Default::default()
    };
    table.service.apply_event(table.game_id, &payload).unwrap();

    let log = table.service.store().read_log(table.game_id).unwrap();
    let events: Vec<_> = log
        .iter()
        .filter(|e| e.action == ActionKind::EventApplied)
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].details["narration"], "Quiet day");
}

#[test]
fn run_event_snapshots_proposes_and_applies() {
    let table = started_table(&["alice", "bob"], vec![1, 2]);
    let alice = &table.players[0];
    let source = ScriptedEvents::new(vec![EventPayload {
        narration: "Found a wallet".to_string(),
        capital_deltas: vec![(alice.id, 75)],
        ..Default::default()
    }]);

    let applied = table.service.run_event(&source, table.game_id).unwrap();
    assert_eq!(applied.narration, "Found a wallet");
    let store = table.service.store();
    assert_eq!(store.get_player(table.game_id, alice.id).unwrap().money, 1575);

    // The script is exhausted now.
    let err = table.service.run_event(&source, table.game_id).unwrap_err();
    assert!(matches!(err, GameError::Internal(_)));
}
