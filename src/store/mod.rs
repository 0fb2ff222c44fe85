//! Sled-backed persistence for games, players, tiles, auctions, and the
//! action log.
//!
//! All mutable records for a game live in a single `state` tree under
//! prefixed keys, so every engine operation can run as one serializable
//! transaction; log entries go to a second tree joined into the same
//! transaction. Records are bincode-encoded with a schema version byte
//! checked on every decode; log entries are JSON so their free-form details
//! survive the trip.
//!
//! Key layout in the state tree:
//!   game:{game_id}
//!   player:{game_id}:{player_id}
//!   tile:{game_id}:{position:02}
//!   auction:{auction_id}
//!   auction_slot:{game_id}:{position:02}   -> live auction id for that tile
//!
//! Log tree keys are `log:{game_id}:{seq:020}` with a monotonic sequence, so
//! a prefix scan replays a game's history in order.

use std::path::{Path, PathBuf};

use sled::transaction::{
    abort, ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
    TransactionalTree,
};
use sled::{IVec, Transactional};
use uuid::Uuid;

use crate::game::errors::GameError;
use crate::game::types::{
    ActionLogEntry, AuctionRecord, GameRecord, PlayerRecord, TileRecord, AUCTION_SCHEMA_VERSION,
    BOARD_SIZE, GAME_SCHEMA_VERSION, PLAYER_SCHEMA_VERSION, TILE_SCHEMA_VERSION,
};

const TREE_STATE: &str = "boardwalk_state";
const TREE_LOGS: &str = "boardwalk_logs";

fn game_key(game_id: Uuid) -> Vec<u8> {
    format!("game:{game_id}").into_bytes()
}

fn player_key(game_id: Uuid, player_id: Uuid) -> Vec<u8> {
    format!("player:{game_id}:{player_id}").into_bytes()
}

fn tile_key(game_id: Uuid, position: u8) -> Vec<u8> {
    format!("tile:{game_id}:{position:02}").into_bytes()
}

fn auction_key(auction_id: Uuid) -> Vec<u8> {
    format!("auction:{auction_id}").into_bytes()
}

fn auction_slot_key(game_id: Uuid, position: u8) -> Vec<u8> {
    format!("auction_slot:{game_id}:{position:02}").into_bytes()
}

fn log_key(game_id: Uuid, seq: u64) -> Vec<u8> {
    format!("log:{game_id}:{seq:020}").into_bytes()
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
    Ok(bincode::serialize(value)?)
}

fn decode_game(bytes: &IVec) -> Result<GameRecord, GameError> {
    let record: GameRecord = bincode::deserialize(bytes)?;
    if record.schema_version != GAME_SCHEMA_VERSION {
        return Err(GameError::SchemaMismatch {
            entity: "game",
            expected: GAME_SCHEMA_VERSION,
            found: record.schema_version,
        });
    }
    Ok(record)
}

fn decode_player(bytes: &IVec) -> Result<PlayerRecord, GameError> {
    let record: PlayerRecord = bincode::deserialize(bytes)?;
    if record.schema_version != PLAYER_SCHEMA_VERSION {
        return Err(GameError::SchemaMismatch {
            entity: "player",
            expected: PLAYER_SCHEMA_VERSION,
            found: record.schema_version,
        });
    }
    Ok(record)
}

fn decode_tile(bytes: &IVec) -> Result<TileRecord, GameError> {
    let record: TileRecord = bincode::deserialize(bytes)?;
    if record.schema_version != TILE_SCHEMA_VERSION {
        return Err(GameError::SchemaMismatch {
            entity: "tile",
            expected: TILE_SCHEMA_VERSION,
            found: record.schema_version,
        });
    }
    Ok(record)
}

fn decode_auction(bytes: &IVec) -> Result<AuctionRecord, GameError> {
    let record: AuctionRecord = bincode::deserialize(bytes)?;
    if record.schema_version != AUCTION_SCHEMA_VERSION {
        return Err(GameError::SchemaMismatch {
            entity: "auction",
            expected: AUCTION_SCHEMA_VERSION,
            found: record.schema_version,
        });
    }
    Ok(record)
}

fn lift<T>(result: Result<T, GameError>) -> ConflictableTransactionResult<T, GameError> {
    result.map_err(ConflictableTransactionError::Abort)
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GameStoreBuilder {
    path: PathBuf,
}

impl GameStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<GameStore, GameError> {
        GameStore::open(self.path)
    }
}

/// Sled-backed store for board-game state.
pub struct GameStore {
    _db: sled::Db,
    state: sled::Tree,
    logs: sled::Tree,
}

impl GameStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let state = db.open_tree(TREE_STATE)?;
        let logs = db.open_tree(TREE_LOGS)?;
        Ok(Self {
            _db: db,
            state,
            logs,
        })
    }

    /// Insert or update a game record.
    pub fn put_game(&self, mut game: GameRecord) -> Result<(), GameError> {
        game.schema_version = GAME_SCHEMA_VERSION;
        game.touch();
        let bytes = serialize(&game)?;
        self.state.insert(game_key(game.id), bytes)?;
        self.state.flush()?;
        Ok(())
    }

    pub fn get_game(&self, game_id: Uuid) -> Result<GameRecord, GameError> {
        let Some(bytes) = self.state.get(game_key(game_id))? else {
            return Err(GameError::GameNotFound(game_id));
        };
        decode_game(&bytes)
    }

    /// List every stored game, most recently created last.
    pub fn list_games(&self) -> Result<Vec<GameRecord>, GameError> {
        let mut games = Vec::new();
        for entry in self.state.scan_prefix(b"game:") {
            let (_, value) = entry?;
            games.push(decode_game(&value)?);
        }
        games.sort_by_key(|g| g.created_at);
        Ok(games)
    }

    /// Insert or update a player record.
    pub fn put_player(&self, mut player: PlayerRecord) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        let bytes = serialize(&player)?;
        self.state.insert(player_key(player.game_id, player.id), bytes)?;
        self.state.flush()?;
        Ok(())
    }

    pub fn get_player(&self, game_id: Uuid, player_id: Uuid) -> Result<PlayerRecord, GameError> {
        let Some(bytes) = self.state.get(player_key(game_id, player_id))? else {
            return Err(GameError::PlayerNotFound(player_id));
        };
        decode_player(&bytes)
    }

    /// All players in a game, seat order.
    pub fn list_players(&self, game_id: Uuid) -> Result<Vec<PlayerRecord>, GameError> {
        let prefix = format!("player:{game_id}:");
        let mut players = Vec::new();
        for entry in self.state.scan_prefix(prefix.as_bytes()) {
            let (_, value) = entry?;
            players.push(decode_player(&value)?);
        }
        players.sort_by_key(|p| p.order_in_game);
        Ok(players)
    }

    /// Insert or update a tile record.
    pub fn put_tile(&self, mut tile: TileRecord) -> Result<(), GameError> {
        tile.schema_version = TILE_SCHEMA_VERSION;
        let bytes = serialize(&tile)?;
        self.state.insert(tile_key(tile.game_id, tile.position), bytes)?;
        self.state.flush()?;
        Ok(())
    }

    pub fn get_tile(&self, game_id: Uuid, position: u8) -> Result<TileRecord, GameError> {
        let Some(bytes) = self.state.get(tile_key(game_id, position))? else {
            return Err(GameError::TileNotFound(position));
        };
        decode_tile(&bytes)
    }

    /// All tiles in a game, board order. Empty before board initialization.
    pub fn list_tiles(&self, game_id: Uuid) -> Result<Vec<TileRecord>, GameError> {
        let prefix = format!("tile:{game_id}:");
        let mut tiles = Vec::new();
        for entry in self.state.scan_prefix(prefix.as_bytes()) {
            let (_, value) = entry?;
            tiles.push(decode_tile(&value)?);
        }
        tiles.sort_by_key(|t| t.position);
        Ok(tiles)
    }

    /// Insert or update an auction record.
    pub fn put_auction(&self, mut auction: AuctionRecord) -> Result<(), GameError> {
        auction.schema_version = AUCTION_SCHEMA_VERSION;
        auction.touch();
        let bytes = serialize(&auction)?;
        self.state.insert(auction_key(auction.id), bytes)?;
        self.state.flush()?;
        Ok(())
    }

    pub fn get_auction(&self, auction_id: Uuid) -> Result<AuctionRecord, GameError> {
        let Some(bytes) = self.state.get(auction_key(auction_id))? else {
            return Err(GameError::AuctionNotFound(auction_id));
        };
        decode_auction(&bytes)
    }

    /// A game's action log in append order.
    pub fn read_log(&self, game_id: Uuid) -> Result<Vec<ActionLogEntry>, GameError> {
        let prefix = format!("log:{game_id}:");
        let mut entries = Vec::new();
        for item in self.logs.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            entries.push(serde_json::from_slice::<ActionLogEntry>(&value)?);
        }
        Ok(entries)
    }

    /// Run `f` as a single atomic transaction over the state and log trees.
    ///
    /// Sled may call the closure more than once on conflict, so it must stay
    /// pure over the trees: pre-draw dice and pre-generate ids outside, and
    /// only read/write through the [`StateTxn`] view inside. A domain error
    /// aborts the transaction and surfaces unchanged; storage failures map to
    /// [`GameError::Sled`].
    pub fn transact<T, F>(&self, f: F) -> Result<T, GameError>
    where
        F: Fn(&StateTxn) -> ConflictableTransactionResult<T, GameError>,
    {
        let result = (&self.state, &self.logs).transaction(|(state, logs)| {
            let txn = StateTxn { state, logs };
            f(&txn)
        });
        match result {
            Ok(value) => {
                self.state.flush()?;
                self.logs.flush()?;
                Ok(value)
            }
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(GameError::Sled(err)),
        }
    }
}

/// Typed view over one open transaction. Missing records abort with the
/// matching `NotFound` error so engine code can use `?` and keep its
/// guard-then-mutate flow linear.
pub struct StateTxn<'a> {
    state: &'a TransactionalTree,
    logs: &'a TransactionalTree,
}

impl StateTxn<'_> {
    pub fn game(&self, game_id: Uuid) -> ConflictableTransactionResult<GameRecord, GameError> {
        let Some(bytes) = self.state.get(game_key(game_id))? else {
            return abort(GameError::GameNotFound(game_id));
        };
        lift(decode_game(&bytes))
    }

    pub fn put_game(&self, game: &GameRecord) -> ConflictableTransactionResult<(), GameError> {
        let mut record = game.clone();
        record.schema_version = GAME_SCHEMA_VERSION;
        record.touch();
        let bytes = lift(serialize(&record))?;
        self.state.insert(game_key(record.id), bytes)?;
        Ok(())
    }

    pub fn player(
        &self,
        game_id: Uuid,
        player_id: Uuid,
    ) -> ConflictableTransactionResult<PlayerRecord, GameError> {
        let Some(bytes) = self.state.get(player_key(game_id, player_id))? else {
            return abort(GameError::PlayerNotFound(player_id));
        };
        lift(decode_player(&bytes))
    }

    pub fn put_player(&self, player: &PlayerRecord) -> ConflictableTransactionResult<(), GameError> {
        let mut record = player.clone();
        record.schema_version = PLAYER_SCHEMA_VERSION;
        record.touch();
        let bytes = lift(serialize(&record))?;
        self.state.insert(player_key(record.game_id, record.id), bytes)?;
        Ok(())
    }

    /// Every seated player, in seat order via the game's roster.
    pub fn players(
        &self,
        game: &GameRecord,
    ) -> ConflictableTransactionResult<Vec<PlayerRecord>, GameError> {
        let mut players = Vec::with_capacity(game.seats.len());
        for &player_id in &game.seats {
            players.push(self.player(game.id, player_id)?);
        }
        Ok(players)
    }

    pub fn tile(
        &self,
        game_id: Uuid,
        position: u8,
    ) -> ConflictableTransactionResult<TileRecord, GameError> {
        let Some(bytes) = self.state.get(tile_key(game_id, position))? else {
            return abort(GameError::TileNotFound(position));
        };
        lift(decode_tile(&bytes))
    }

    /// Like [`StateTxn::tile`] but a missing record is `None`, not an abort.
    pub fn try_tile(
        &self,
        game_id: Uuid,
        position: u8,
    ) -> ConflictableTransactionResult<Option<TileRecord>, GameError> {
        match self.state.get(tile_key(game_id, position))? {
            Some(bytes) => Ok(Some(lift(decode_tile(&bytes))?)),
            None => Ok(None),
        }
    }

    pub fn put_tile(&self, tile: &TileRecord) -> ConflictableTransactionResult<(), GameError> {
        let mut record = tile.clone();
        record.schema_version = TILE_SCHEMA_VERSION;
        let bytes = lift(serialize(&record))?;
        self.state.insert(tile_key(record.game_id, record.position), bytes)?;
        Ok(())
    }

    /// The full board for a game. Empty before board initialization.
    pub fn tiles(
        &self,
        game_id: Uuid,
    ) -> ConflictableTransactionResult<Vec<TileRecord>, GameError> {
        let mut tiles = Vec::with_capacity(BOARD_SIZE as usize);
        for position in 0..BOARD_SIZE {
            if let Some(tile) = self.try_tile(game_id, position)? {
                tiles.push(tile);
            }
        }
        Ok(tiles)
    }

    pub fn auction(
        &self,
        auction_id: Uuid,
    ) -> ConflictableTransactionResult<AuctionRecord, GameError> {
        let Some(bytes) = self.state.get(auction_key(auction_id))? else {
            return abort(GameError::AuctionNotFound(auction_id));
        };
        lift(decode_auction(&bytes))
    }

    pub fn put_auction(
        &self,
        auction: &AuctionRecord,
    ) -> ConflictableTransactionResult<(), GameError> {
        let mut record = auction.clone();
        record.schema_version = AUCTION_SCHEMA_VERSION;
        record.touch();
        let bytes = lift(serialize(&record))?;
        self.state.insert(auction_key(record.id), bytes)?;
        Ok(())
    }

    /// Auction id currently occupying a property's slot, if any.
    pub fn auction_slot(
        &self,
        game_id: Uuid,
        position: u8,
    ) -> ConflictableTransactionResult<Option<Uuid>, GameError> {
        match self.state.get(auction_slot_key(game_id, position))? {
            Some(bytes) => {
                let id = lift(Uuid::from_slice(&bytes).map_err(|_| {
                    GameError::Internal("corrupt auction slot index".to_string())
                }))?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    pub fn set_auction_slot(
        &self,
        game_id: Uuid,
        position: u8,
        auction_id: Uuid,
    ) -> ConflictableTransactionResult<(), GameError> {
        self.state.insert(
            auction_slot_key(game_id, position),
            auction_id.as_bytes().to_vec(),
        )?;
        Ok(())
    }

    pub fn clear_auction_slot(
        &self,
        game_id: Uuid,
        position: u8,
    ) -> ConflictableTransactionResult<(), GameError> {
        self.state.remove(auction_slot_key(game_id, position))?;
        Ok(())
    }

    /// Append one log entry; the sequence number keeps scan order stable.
    pub fn append_log(
        &self,
        entry: &ActionLogEntry,
    ) -> ConflictableTransactionResult<(), GameError> {
        let seq = self.logs.generate_id()?;
        let bytes = lift(serde_json::to_vec(entry).map_err(GameError::from))?;
        self.logs.insert(log_key(entry.game_id, seq), bytes)?;
        Ok(())
    }
}
