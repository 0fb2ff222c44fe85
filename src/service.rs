//! Client-facing operation surface.
//!
//! `GameService` owns the store, the dice, and the broadcaster. Every
//! mutating call opens one store transaction, runs the matching engine
//! flow, and broadcasts a notification once the transaction has committed.
//! Failures come back as [`GameError`]; transports convert them to the
//! stable kind + message payload via [`GameError::to_failure`].

use std::sync::{Arc, Mutex};

use log::{debug, info};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::broadcast::{Broadcaster, NoopBroadcaster};
use crate::game::auction;
use crate::game::board;
use crate::game::dice::{DiceRoller, FairDice};
use crate::game::engine;
use crate::game::errors::GameError;
use crate::game::events::{self, AppliedEvent, EventPayload, EventSource};
use crate::game::sequencer;
use crate::game::settings::SettingChange;
use crate::game::types::{
    ActionKind, ActionLogEntry, AuctionRecord, AuctionSettlement, GameRecord, GameRules,
    GameSnapshot, GameStatus, PlayerRecord, RollOutcome, TileRecord, TurnAdvance,
};
use crate::store::GameStore;

use sled::transaction::abort;

pub struct GameService {
    store: GameStore,
    dice: Mutex<Box<dyn DiceRoller>>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl GameService {
    pub fn new(
        store: GameStore,
        dice: Box<dyn DiceRoller>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            store,
            dice: Mutex::new(dice),
            broadcaster,
        }
    }

    /// Entropy dice, no broadcast. What the CLI tools use.
    pub fn with_defaults(store: GameStore) -> Self {
        Self::new(store, Box::new(FairDice::new()), Arc::new(NoopBroadcaster))
    }

    /// Direct store access for status tooling and tests.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    fn publish<T: serde::Serialize>(&self, game_id: Uuid, event: &str, payload: &T) {
        let value = serde_json::to_value(payload).unwrap_or(Value::Null);
        self.broadcaster.publish(game_id, event, value);
    }

    /// Create a new game in the Waiting lobby phase.
    pub fn create_game(&self, name: &str, rules: GameRules) -> Result<GameRecord, GameError> {
        let game_id = Uuid::new_v4();
        let game = self.store.transact(|txn| {
            let game = GameRecord::new(game_id, name, rules.clone());
            txn.put_game(&game)?;
            txn.append_log(&ActionLogEntry::new(
                game.id,
                None,
                ActionKind::GameCreated,
                json!({ "name": game.name }),
                0,
            ))?;
            Ok(game)
        })?;
        info!("created game {} ({})", game.name, game.id);
        self.publish(game.id, "game_created", &game);
        Ok(game)
    }

    /// Seat a new player. Seats are append-only join order, never reused.
    pub fn join_game(
        &self,
        game_id: Uuid,
        display_name: &str,
    ) -> Result<PlayerRecord, GameError> {
        let player_id = Uuid::new_v4();
        let player = self.store.transact(|txn| {
            let mut game = txn.game(game_id)?;
            if game.status != GameStatus::Waiting {
                return abort(GameError::WrongPhase { expected: "waiting" });
            }
            if game.seats.len() as u32 >= game.rules.max_players {
                return abort(GameError::GameFull {
                    max_players: game.rules.max_players,
                });
            }
            let seat = game.seats.len() as u32 + 1;
            let player = PlayerRecord::new(
                player_id,
                game_id,
                display_name,
                seat,
                game.rules.starting_cash,
            );
            game.seats.push(player.id);
            txn.put_player(&player)?;
            txn.put_game(&game)?;
            txn.append_log(&ActionLogEntry::new(
                game_id,
                Some(player.id),
                ActionKind::PlayerJoined,
                json!({ "name": player.display_name, "seat": seat }),
                game.round,
            ))?;
            Ok(player)
        })?;
        info!(
            "{} joined game {} at seat {}",
            player.display_name, game_id, player.order_in_game
        );
        self.publish(game_id, "player_joined", &player);
        Ok(player)
    }

    /// Stamp the 40 catalog tiles into this game. Waiting phase only; a
    /// re-stamp resets ownership and buildings, which is harmless before
    /// start.
    pub fn initialize_board(&self, game_id: Uuid) -> Result<usize, GameError> {
        let count = self.store.transact(|txn| {
            let mut game = txn.game(game_id)?;
            if game.status != GameStatus::Waiting {
                return abort(GameError::WrongPhase { expected: "waiting" });
            }
            let tiles = board::stamp(game_id);
            for tile in &tiles {
                txn.put_tile(tile)?;
            }
            game.board_ready = true;
            txn.put_game(&game)?;
            txn.append_log(&ActionLogEntry::new(
                game_id,
                None,
                ActionKind::BoardInitialized,
                json!({ "tiles": tiles.len() }),
                game.round,
            ))?;
            Ok(tiles.len())
        })?;
        debug!("board initialized for game {game_id} ({count} tiles)");
        self.publish(game_id, "board_initialized", &json!({ "tiles": count }));
        Ok(count)
    }

    /// Waiting → Active: seat 1 gets the dice, round 1 begins.
    pub fn start_game(&self, game_id: Uuid) -> Result<GameRecord, GameError> {
        let game = self.store.transact(|txn| {
            let mut game = txn.game(game_id)?;
            if game.status != GameStatus::Waiting {
                return abort(GameError::WrongPhase { expected: "waiting" });
            }
            if !game.board_ready {
                return abort(GameError::InvalidMove(
                    "board has not been initialized".to_string(),
                ));
            }
            if game.seats.len() < 2 {
                return abort(GameError::InvalidMove(
                    "at least two players are required".to_string(),
                ));
            }
            let players = txn.players(&game)?;
            let Some(first) = players.iter().find(|p| p.is_active()) else {
                return abort(GameError::NoActivePlayers);
            };
            let mut first = first.clone();
            first.can_roll = true;
            game.status = GameStatus::Active;
            game.round = 1;
            game.current_player_turn = Some(first.order_in_game);
            txn.put_player(&first)?;
            txn.put_game(&game)?;
            txn.append_log(&ActionLogEntry::new(
                game_id,
                Some(first.id),
                ActionKind::GameStarted,
                json!({ "players": players.len(), "first_seat": first.order_in_game }),
                game.round,
            ))?;
            Ok(game)
        })?;
        info!("game {} started with {} seats", game_id, game.seats.len());
        self.publish(game_id, "game_started", &game);
        Ok(game)
    }

    /// Roll for the player whose turn it is and resolve the landing.
    ///
    /// Dice are drawn once, before the transaction, so a conflict retry
    /// replays the same roll instead of drawing a fresh one.
    pub fn roll_dice(&self, game_id: Uuid, player_id: Uuid) -> Result<RollOutcome, GameError> {
        let dice = {
            let mut roller = self
                .dice
                .lock()
                .map_err(|_| GameError::Internal("dice source poisoned".to_string()))?;
            roller.roll_pair()
        };
        let outcome = self
            .store
            .transact(|txn| engine::roll_dice(txn, game_id, player_id, dice))?;
        info!(
            "game {game_id}: seat rolled {}+{} -> position {}",
            outcome.dice.0, outcome.dice.1, outcome.new_position
        );
        self.publish(game_id, "dice_rolled", &outcome);
        Ok(outcome)
    }

    /// Pass the dice to the next active seat.
    pub fn advance_turn(&self, game_id: Uuid) -> Result<TurnAdvance, GameError> {
        let advance = self
            .store
            .transact(|txn| sequencer::advance_turn(txn, game_id))?;
        debug!(
            "game {game_id}: turn advanced to seat {} (round {})",
            advance.seat, advance.round
        );
        self.publish(game_id, "turn_advanced", &advance);
        Ok(advance)
    }

    /// Change one allow-listed rule. `starting_cash` is Waiting-phase only
    /// and resets every already-joined player's money to the new value.
    pub fn update_setting(
        &self,
        game_id: Uuid,
        name: &str,
        value: &Value,
    ) -> Result<(), GameError> {
        let change = SettingChange::parse(name, value)?;
        self.store.transact(|txn| {
            let mut game = txn.game(game_id)?;
            if game.status == GameStatus::Finished {
                return abort(GameError::WrongPhase {
                    expected: "waiting or active",
                });
            }
            if matches!(change, SettingChange::StartingCash(_))
                && game.status != GameStatus::Waiting
            {
                return abort(GameError::WrongPhase { expected: "waiting" });
            }
            change.apply(&mut game.rules);
            if let SettingChange::StartingCash(cash) = change {
                for mut player in txn.players(&game)? {
                    if player.is_active() {
                        player.money = cash;
                        txn.put_player(&player)?;
                    }
                }
            }
            txn.put_game(&game)?;
            txn.append_log(&ActionLogEntry::new(
                game_id,
                None,
                ActionKind::SettingChanged,
                json!({ "setting": change.name(), "value": change.value() }),
                game.round,
            ))?;
            Ok(())
        })?;
        info!("game {game_id}: setting {} updated", change.name());
        self.publish(
            game_id,
            "setting_changed",
            &json!({ "setting": change.name(), "value": change.value() }),
        );
        Ok(())
    }

    /// Buy the unowned property the player is standing on.
    pub fn buy_property(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        position: u8,
    ) -> Result<TileRecord, GameError> {
        let tile = self
            .store
            .transact(|txn| engine::buy_property(txn, game_id, player_id, position))?;
        info!("game {game_id}: {} purchased", tile.name);
        self.publish(game_id, "property_purchased", &tile);
        Ok(tile)
    }

    /// Mortgage an owned tile for half its price.
    pub fn mortgage_property(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        position: u8,
    ) -> Result<i64, GameError> {
        let value = self
            .store
            .transact(|txn| engine::mortgage_property(txn, game_id, player_id, position))?;
        self.publish(
            game_id,
            "property_mortgaged",
            &json!({ "position": position, "value": value }),
        );
        Ok(value)
    }

    /// Lift a mortgage: principal plus 10% interest.
    pub fn unmortgage_property(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        position: u8,
    ) -> Result<i64, GameError> {
        let cost = self
            .store
            .transact(|txn| engine::unmortgage_property(txn, game_id, player_id, position))?;
        self.publish(
            game_id,
            "property_unmortgaged",
            &json!({ "position": position, "cost": cost }),
        );
        Ok(cost)
    }

    /// Build one house (the fifth converts to a hotel).
    pub fn build_house(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        position: u8,
    ) -> Result<TileRecord, GameError> {
        let tile = self
            .store
            .transact(|txn| engine::build_house(txn, game_id, player_id, position))?;
        self.publish(game_id, "house_built", &tile);
        Ok(tile)
    }

    /// Sell one house back for half its cost.
    pub fn sell_house(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        position: u8,
    ) -> Result<TileRecord, GameError> {
        let tile = self
            .store
            .transact(|txn| engine::sell_house(txn, game_id, player_id, position))?;
        self.publish(game_id, "house_sold", &tile);
        Ok(tile)
    }

    /// Open an auction for an unowned property.
    pub fn create_auction(
        &self,
        game_id: Uuid,
        position: u8,
        starting_bid: i64,
    ) -> Result<AuctionRecord, GameError> {
        let auction_id = Uuid::new_v4();
        let auction = self.store.transact(|txn| {
            auction::create_auction(txn, game_id, position, starting_bid, auction_id)
        })?;
        info!(
            "game {game_id}: auction opened for position {} at {}",
            position, auction.current_bid
        );
        self.publish(game_id, "auction_created", &auction);
        Ok(auction)
    }

    /// Raise the bid on a running auction.
    pub fn place_bid(
        &self,
        auction_id: Uuid,
        player_id: Uuid,
        bid: i64,
    ) -> Result<AuctionRecord, GameError> {
        let auction = self
            .store
            .transact(|txn| auction::place_bid(txn, auction_id, player_id, bid))?;
        self.publish(auction.game_id, "bid_placed", &auction);
        Ok(auction)
    }

    /// Settle an auction (the caller's countdown reached zero).
    pub fn end_auction(&self, auction_id: Uuid) -> Result<AuctionSettlement, GameError> {
        let (settlement, game_id) = self.store.transact(|txn| {
            let auction = txn.auction(auction_id)?;
            let settlement = auction::end_auction(txn, auction_id)?;
            Ok((settlement, auction.game_id))
        })?;
        info!(
            "game {game_id}: auction {} ended as {:?}",
            auction_id, settlement.status
        );
        self.publish(game_id, "auction_ended", &settlement);
        Ok(settlement)
    }

    /// Apply an already-produced narrator payload.
    pub fn apply_event(
        &self,
        game_id: Uuid,
        payload: &EventPayload,
    ) -> Result<AppliedEvent, GameError> {
        let applied = self
            .store
            .transact(|txn| events::apply_event(txn, game_id, payload))?;
        self.publish(game_id, "event_applied", &applied);
        Ok(applied)
    }

    /// Snapshot the game, ask the narrator for an event, and apply it.
    pub fn run_event(
        &self,
        source: &dyn EventSource,
        game_id: Uuid,
    ) -> Result<AppliedEvent, GameError> {
        let snapshot = self.game_view(game_id)?;
        let payload = source.propose(&snapshot)?;
        self.apply_event(game_id, &payload)
    }

    /// Read-only view of a whole game.
    pub fn game_view(&self, game_id: Uuid) -> Result<GameSnapshot, GameError> {
        let game = self.store.get_game(game_id)?;
        let players = self.store.list_players(game_id)?;
        let tiles = self.store.list_tiles(game_id)?;
        Ok(GameSnapshot {
            game,
            players,
            tiles,
        })
    }
}
