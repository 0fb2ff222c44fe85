//! External narrator seam.
//!
//! A game master (typically an LLM behind a network client) looks at a
//! read-only snapshot and proposes a structured event. The engine applies
//! the payload's deltas through the same clamped debit/credit primitives
//! rent uses, so a malformed or hostile payload can never drive a balance
//! negative or pay out twice.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sled::transaction::ConflictableTransactionResult;
use uuid::Uuid;

use crate::game::engine::{credit, debit_clamped};
use crate::game::errors::GameError;
use crate::game::types::{ActionKind, ActionLogEntry, GameSnapshot};
use crate::store::StateTxn;

/// Structured event proposed by a narrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventPayload {
    /// Free-form story text, broadcast verbatim.
    pub narration: String,
    /// Money changes per player; negatives go through the clamped debit and
    /// can bankrupt.
    #[serde(default)]
    pub capital_deltas: Vec<(Uuid, i64)>,
    /// Reputation changes per player, floored at zero.
    #[serde(default)]
    pub reputation_deltas: Vec<(Uuid, i64)>,
    /// List-price changes per board position, floored at zero.
    #[serde(default)]
    pub valuation_deltas: Vec<(u8, i64)>,
}

/// Source of narrated events. Implementations call out to whatever service
/// produces the story; the engine only sees the structured payload.
pub trait EventSource: Send + Sync {
    fn propose(&self, snapshot: &GameSnapshot) -> Result<EventPayload, GameError>;
}

/// What actually changed after clamping, echoed to callers and the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedEvent {
    pub narration: String,
    /// Per-player signed money movement as applied (a clamped debit reports
    /// only what was actually taken).
    pub capital_applied: Vec<(Uuid, i64)>,
    pub bankruptcies: Vec<Uuid>,
}

/// Apply a narrator payload inside one transaction.
///
/// Deltas naming players or positions outside the game abort the whole
/// event; partial application is never observable.
pub fn apply_event(
    txn: &StateTxn,
    game_id: Uuid,
    payload: &EventPayload,
) -> ConflictableTransactionResult<AppliedEvent, GameError> {
    let game = txn.game(game_id)?;
    let mut capital_applied = Vec::with_capacity(payload.capital_deltas.len());
    let mut bankruptcies = Vec::new();

    for &(player_id, delta) in &payload.capital_deltas {
        let mut player = txn.player(game_id, player_id)?;
        let applied = if delta >= 0 {
            credit(&mut player, delta);
            delta
        } else {
            let debit = debit_clamped(&mut player, -delta);
            if debit.went_bankrupt {
                bankruptcies.push(player_id);
            }
            -debit.paid
        };
        capital_applied.push((player_id, applied));
        txn.put_player(&player)?;
    }

    for &(player_id, delta) in &payload.reputation_deltas {
        let mut player = txn.player(game_id, player_id)?;
        player.reputation = (player.reputation + delta).max(0);
        txn.put_player(&player)?;
    }

    for &(position, delta) in &payload.valuation_deltas {
        let mut tile = txn.tile(game_id, position)?;
        tile.price = (tile.price + delta).max(0);
        txn.put_tile(&tile)?;
    }

    txn.append_log(&ActionLogEntry::new(
        game_id,
        None,
        ActionKind::EventApplied,
        json!({
            "narration": payload.narration,
            "capital": capital_applied,
            "bankruptcies": bankruptcies,
        }),
        game.round,
    ))?;

    Ok(AppliedEvent {
        narration: payload.narration.clone(),
        capital_applied,
        bankruptcies,
    })
}

/// Fixed payload source for tests and offline simulation.
pub struct ScriptedEvents {
    payloads: std::sync::Mutex<Vec<EventPayload>>,
}

impl ScriptedEvents {
    pub fn new(mut payloads: Vec<EventPayload>) -> Self {
        payloads.reverse();
        Self {
            payloads: std::sync::Mutex::new(payloads),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn propose(&self, _snapshot: &GameSnapshot) -> Result<EventPayload, GameError> {
        let mut payloads = self
            .payloads
            .lock()
            .map_err(|_| GameError::Internal("event script poisoned".to_string()))?;
        payloads
            .pop()
            .ok_or_else(|| GameError::Internal("event script exhausted".to_string()))
    }
}
