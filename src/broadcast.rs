//! One-way "game state changed" notifications.
//!
//! The engine's correctness never depends on delivery: publish is
//! fire-and-forget, at-most-once. The in-process implementation fans out
//! over a tokio broadcast channel per game so lobby and replay consumers
//! can subscribe independently; transports out of scope here attach by
//! wrapping this trait.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

/// One published notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    pub game_id: Uuid,
    pub event: String,
    pub payload: Value,
}

/// One-way notification channel.
pub trait Broadcaster: Send + Sync {
    /// Tell every viewer of `game_id` that something happened. Must not fail
    /// the caller: delivery problems are swallowed.
    fn publish(&self, game_id: Uuid, event: &str, payload: Value);
}

/// Discards everything. Used by the CLI tools and most tests.
pub struct NoopBroadcaster;

impl Broadcaster for NoopBroadcaster {
    fn publish(&self, _game_id: Uuid, _event: &str, _payload: Value) {}
}

const CHANNEL_CAPACITY: usize = 256;

/// In-process fan-out over tokio broadcast channels, one per game.
pub struct ChannelBroadcaster {
    channels: Mutex<HashMap<Uuid, broadcast::Sender<GameEvent>>>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to a game's event stream. Slow receivers lag and drop old
    /// events rather than blocking publishers.
    pub fn subscribe(&self, game_id: Uuid) -> broadcast::Receiver<GameEvent> {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        channels
            .entry(game_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn publish(&self, game_id: Uuid, event: &str, payload: Value) {
        let channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(sender) = channels.get(&game_id) {
            // A send error just means nobody is listening right now.
            let _ = sender.send(GameEvent {
                game_id,
                event: event.to_string(),
                payload,
            });
        }
    }
}
