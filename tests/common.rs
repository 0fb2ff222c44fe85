//! Shared fixtures for the integration suites: tempdir-backed stores,
//! started games, and direct-dice rolls for deterministic landings.

use std::sync::Arc;

use boardwalk::broadcast::NoopBroadcaster;
use boardwalk::game::dice::ScriptedDice;
use boardwalk::game::engine;
use boardwalk::game::errors::GameError;
use boardwalk::game::types::{GameRules, PlayerRecord, RollOutcome};
use boardwalk::service::GameService;
use boardwalk::store::GameStoreBuilder;
use tempfile::TempDir;
use uuid::Uuid;

/// A running game over a throwaway store. The tempdir rides along so the
/// database outlives the test body.
pub struct Table {
    pub _dir: TempDir,
    pub service: GameService,
    pub game_id: Uuid,
    pub players: Vec<PlayerRecord>,
}

#[allow(dead_code)]
pub fn new_service(script: Vec<u8>) -> (TempDir, GameService) {
    let dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(dir.path()).open().expect("store");
    let service = GameService::new(
        store,
        Box::new(ScriptedDice::new(script)),
        Arc::new(NoopBroadcaster),
    );
    (dir, service)
}

/// Create, fill, and start a game with the given seat names.
#[allow(dead_code)]
pub fn started_table(names: &[&str], script: Vec<u8>) -> Table {
    started_with_rules(names, GameRules::default(), script)
}

#[allow(dead_code)]
pub fn started_with_rules(names: &[&str], rules: GameRules, script: Vec<u8>) -> Table {
    let (dir, service) = new_service(script);
    let game = service.create_game("test table", rules).expect("create");
    let players: Vec<PlayerRecord> = names
        .iter()
        .map(|name| service.join_game(game.id, name).expect("join"))
        .collect();
    service.initialize_board(game.id).expect("board");
    service.start_game(game.id).expect("start");
    Table {
        _dir: dir,
        service,
        game_id: game.id,
        players,
    }
}

/// Point the turn at `player` and let them roll, bypassing rotation.
#[allow(dead_code)]
pub fn grant_turn(table: &Table, player_id: Uuid) {
    let store = table.service.store();
    let player = store.get_player(table.game_id, player_id).expect("player");
    let mut game = store.get_game(table.game_id).expect("game");
    game.current_player_turn = Some(player.order_in_game);
    store.put_game(game).expect("put game");
    let mut player = player;
    player.can_roll = true;
    store.put_player(player).expect("put player");
}

#[allow(dead_code)]
pub fn place_at(table: &Table, player_id: Uuid, position: u8) {
    let store = table.service.store();
    let mut player = store.get_player(table.game_id, player_id).expect("player");
    player.position = position;
    store.put_player(player).expect("put player");
}

#[allow(dead_code)]
pub fn set_money(table: &Table, player_id: Uuid, money: i64) {
    let store = table.service.store();
    let mut player = store.get_player(table.game_id, player_id).expect("player");
    player.money = money;
    store.put_player(player).expect("put player");
}

#[allow(dead_code)]
pub fn give_tile(table: &Table, position: u8, owner_id: Uuid) {
    let store = table.service.store();
    let mut tile = store.get_tile(table.game_id, position).expect("tile");
    tile.owner_id = Some(owner_id);
    store.put_tile(tile).expect("put tile");
}

/// Roll with explicit dice, straight through the engine transaction.
#[allow(dead_code)]
pub fn try_roll(table: &Table, player_id: Uuid, dice: (u8, u8)) -> Result<RollOutcome, GameError> {
    table
        .service
        .store()
        .transact(|txn| engine::roll_dice(txn, table.game_id, player_id, dice))
}

#[allow(dead_code)]
pub fn roll(table: &Table, player_id: Uuid, dice: (u8, u8)) -> RollOutcome {
    try_roll(table, player_id, dice).expect("roll")
}

/// Total money held by every player at the table.
#[allow(dead_code)]
pub fn total_money(table: &Table) -> i64 {
    table
        .service
        .store()
        .list_players(table.game_id)
        .expect("players")
        .iter()
        .map(|p| p.money)
        .sum()
}
