//! Turn rotation. Seats are stable for a game's lifetime; the sequencer
//! hands the dice to the next living seat in cyclic `order_in_game` order.
//!
//! Seat numbers are gap-preserving: a bankrupt player's seat is skipped,
//! never renumbered, so the game's turn pointer always names a real seat.

use serde_json::json;
use sled::transaction::{abort, ConflictableTransactionResult};
use uuid::Uuid;

use crate::game::errors::GameError;
use crate::game::types::{ActionKind, ActionLogEntry, GameStatus, PlayerRecord, TurnAdvance};
use crate::store::StateTxn;

/// Pick the next seat from an active roster, cyclically after `current`.
///
/// `active` must be sorted by `order_in_game`. Returns the chosen roster
/// index and whether the rotation wrapped past the highest seat (which is
/// when the round counter ticks).
pub fn next_seat(active: &[&PlayerRecord], current: Option<u32>) -> Option<(usize, bool)> {
    if active.is_empty() {
        return None;
    }
    let current = current.unwrap_or(0);
    match active.iter().position(|p| p.order_in_game > current) {
        Some(idx) => Some((idx, false)),
        // Nobody after the pointer: wrap to the lowest active seat.
        None => Some((0, true)),
    }
}

/// Hand the dice to the next active seat and bump the round on wrap-around.
pub fn advance_turn(
    txn: &StateTxn,
    game_id: Uuid,
) -> ConflictableTransactionResult<TurnAdvance, GameError> {
    let mut game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }

    let players = txn.players(&game)?;
    let active: Vec<&PlayerRecord> = players.iter().filter(|p| p.is_active()).collect();
    let Some((idx, wrapped)) = next_seat(&active, game.current_player_turn) else {
        return abort(GameError::NoActivePlayers);
    };

    let mut next = active[idx].clone();
    next.can_roll = true;
    game.current_player_turn = Some(next.order_in_game);
    if wrapped {
        game.round += 1;
    }

    txn.append_log(&ActionLogEntry::new(
        game.id,
        Some(next.id),
        ActionKind::TurnAdvanced,
        json!({ "seat": next.order_in_game, "round": game.round }),
        game.round,
    ))?;
    txn.put_player(&next)?;
    txn.put_game(&game)?;

    Ok(TurnAdvance {
        player_id: next.id,
        seat: next.order_in_game,
        round: game.round,
    })
}
