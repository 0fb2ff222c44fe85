//! Turn resolution and the money primitives every flow shares.
//!
//! `roll_dice` is the heart of the engine: guard the turn, move the piece,
//! credit pass-go, then resolve whatever the player landed on. Dice values
//! are drawn by the caller and passed in, so the whole function can run
//! inside a retryable storage transaction. Purchases, mortgages, and
//! building work the same way: load, guard, mutate, log, all through the
//! same [`StateTxn`] view.

use serde_json::json;
use sled::transaction::{abort, ConflictableTransactionResult};
use uuid::Uuid;

use crate::game::errors::GameError;
use crate::game::types::{
    ActionKind, ActionLogEntry, AuctionStatus, ForcedAction, GameRecord, GameRules, GameStatus,
    PlayerRecord, PlayerStatus, RollOutcome, TileKind, TileRecord, BOARD_SIZE, JAIL_POSITION,
    MAX_JAIL_TURNS, PASS_GO_BONUS,
};
use crate::store::StateTxn;

const INCOME_TAX: i64 = 200;
const LUXURY_TAX: i64 = 100;
const DEFAULT_TAX: i64 = 150;
const RAILROAD_RENT_STEP: i64 = 25;
const UTILITY_SINGLE_MULTIPLIER: i64 = 4;
const UTILITY_PAIR_MULTIPLIER: i64 = 10;
const MAX_HOUSES: u8 = 4;

/// Result of taking money from a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debit {
    /// What the player actually handed over, never more than they had.
    pub paid: i64,
    pub went_bankrupt: bool,
}

/// Take up to `amount` from the player. A shortfall empties the wallet and
/// marks the player bankrupt instead of failing the operation; balances
/// never go negative.
pub fn debit_clamped(player: &mut PlayerRecord, amount: i64) -> Debit {
    let amount = amount.max(0);
    if player.money >= amount {
        player.money -= amount;
        Debit {
            paid: amount,
            went_bankrupt: false,
        }
    } else {
        let paid = player.money.max(0);
        player.money = 0;
        player.status = PlayerStatus::Bankrupt;
        player.can_roll = false;
        Debit {
            paid,
            went_bankrupt: true,
        }
    }
}

/// Add money to a player. Negative amounts are ignored, callers that need
/// to take money go through [`debit_clamped`].
pub fn credit(player: &mut PlayerRecord, amount: i64) {
    player.money += amount.max(0);
}

/// Tax owed on a tax tile, keyed by the tile's name.
pub fn tax_amount(name: &str) -> i64 {
    let lowered = name.to_ascii_lowercase();
    if lowered.contains("income") {
        INCOME_TAX
    } else if lowered.contains("luxury") {
        LUXURY_TAX
    } else {
        DEFAULT_TAX
    }
}

/// Whether the tile's owner holds every tile in its color group.
pub fn owns_full_group(tile: &TileRecord, board: &[TileRecord]) -> bool {
    let Some(group) = tile.color_group else {
        return false;
    };
    let Some(owner) = tile.owner_id else {
        return false;
    };
    board
        .iter()
        .filter(|t| t.color_group == Some(group))
        .all(|t| t.owner_id == Some(owner))
}

/// Rent owed by a player landing on an owned, unmortgaged tile.
///
/// Priority: hotel rent, then house tiers (falling back to base rent when a
/// tier is unset), then railroad count, then utility multiplier against the
/// triggering dice total, then base rent doubled on a full set when the
/// rule allows. Never negative.
pub fn rent_due(rules: &GameRules, tile: &TileRecord, board: &[TileRecord], dice_total: u8) -> i64 {
    let rent = if tile.hotels > 0 {
        tile.rent_with_hotel
    } else if (1..=MAX_HOUSES).contains(&tile.houses) {
        let tier = tile.rent_with_houses[tile.houses as usize - 1];
        if tier > 0 {
            tier
        } else {
            tile.rent
        }
    } else {
        match tile.kind {
            TileKind::Railroad => {
                let owned = board
                    .iter()
                    .filter(|t| t.kind == TileKind::Railroad && t.owner_id == tile.owner_id)
                    .count() as i64;
                RAILROAD_RENT_STEP * owned
            }
            TileKind::Utility => {
                let owned = board
                    .iter()
                    .filter(|t| t.kind == TileKind::Utility && t.owner_id == tile.owner_id)
                    .count();
                let multiplier = if owned >= 2 {
                    UTILITY_PAIR_MULTIPLIER
                } else {
                    UTILITY_SINGLE_MULTIPLIER
                };
                multiplier * i64::from(dice_total)
            }
            _ => {
                if rules.double_rent_on_full_set && owns_full_group(tile, board) {
                    if tile.rent_with_set > 0 {
                        tile.rent_with_set
                    } else {
                        tile.rent
                    }
                } else {
                    tile.rent
                }
            }
        }
    };
    rent.max(0)
}

/// Resolve one dice roll for the player whose turn it is.
///
/// Guards fail without mutating anything; after the guards, the player is
/// moved (with pass-go credit first), the tile at the landing spot is
/// resolved, and every involved record plus the action log is written in
/// the surrounding transaction.
pub fn roll_dice(
    txn: &StateTxn,
    game_id: Uuid,
    player_id: Uuid,
    dice: (u8, u8),
) -> ConflictableTransactionResult<RollOutcome, GameError> {
    let (d1, d2) = dice;
    let mut game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }
    let mut player = txn.player(game_id, player_id)?;
    if game.current_player_turn != Some(player.order_in_game) {
        return abort(GameError::NotYourTurn);
    }
    if !player.can_roll {
        return abort(GameError::AlreadyRolled);
    }
    if !player.is_active() {
        return abort(GameError::PlayerIsBankrupt);
    }

    let total = d1 + d2;
    let is_doubles = d1 == d2;

    if player.is_in_jail {
        if is_doubles || player.jail_turns + 1 >= MAX_JAIL_TURNS {
            // Doubles spring the player immediately; otherwise the third
            // attempt walks out free and moves by this roll.
            player.is_in_jail = false;
            player.jail_turns = 0;
        } else {
            player.jail_turns += 1;
            player.can_roll = false;
            let tile = txn.try_tile(game.id, player.position)?;
            txn.append_log(&ActionLogEntry::new(
                game.id,
                Some(player.id),
                ActionKind::DiceRolled,
                json!({
                    "d1": d1,
                    "d2": d2,
                    "total": total,
                    "doubles": is_doubles,
                    "from": player.position,
                    "to": player.position,
                    "passed_go": false,
                }),
                game.round,
            ))?;
            txn.append_log(&ActionLogEntry::new(
                game.id,
                Some(player.id),
                ActionKind::JailWait,
                json!({ "turns_waited": player.jail_turns }),
                game.round,
            ))?;
            txn.put_player(&player)?;
            txn.put_game(&game)?;
            return Ok(RollOutcome {
                dice,
                total,
                is_doubles,
                passed_go: false,
                new_position: player.position,
                tile_name: tile.as_ref().map(|t| t.name.clone()),
                tile_kind: tile.as_ref().map(|t| t.kind),
                rent_paid: None,
                tax_paid: None,
                bonus_collected: None,
                forced_action: Some(ForcedAction::JailWait),
                went_bankrupt: false,
            });
        }
    }

    let from = player.position;
    let advanced = u16::from(from) + u16::from(total);
    let passed_go = advanced >= u16::from(BOARD_SIZE);
    let new_position = (advanced % u16::from(BOARD_SIZE)) as u8;
    if passed_go {
        credit(&mut player, PASS_GO_BONUS);
    }
    player.position = new_position;
    player.can_roll = false;

    txn.append_log(&ActionLogEntry::new(
        game.id,
        Some(player.id),
        ActionKind::DiceRolled,
        json!({
            "d1": d1,
            "d2": d2,
            "total": total,
            "doubles": is_doubles,
            "from": from,
            "to": new_position,
            "passed_go": passed_go,
        }),
        game.round,
    ))?;

    let tile = txn.try_tile(game.id, new_position)?;
    let mut outcome = RollOutcome {
        dice,
        total,
        is_doubles,
        passed_go,
        new_position,
        tile_name: tile.as_ref().map(|t| t.name.clone()),
        tile_kind: tile.as_ref().map(|t| t.kind),
        rent_paid: None,
        tax_paid: None,
        bonus_collected: None,
        forced_action: None,
        went_bankrupt: false,
    };

    if let Some(tile) = tile {
        resolve_landing(txn, &mut game, &mut player, &tile, total, &mut outcome)?;
    }

    if outcome.went_bankrupt {
        txn.append_log(&ActionLogEntry::new(
            game.id,
            Some(player.id),
            ActionKind::PlayerBankrupt,
            json!({ "seat": player.order_in_game }),
            game.round,
        ))?;
    }

    txn.put_player(&player)?;
    txn.put_game(&game)?;
    Ok(outcome)
}

/// Apply the landed tile's effect. Pass-go credit already happened and is
/// never re-triggered here, even when the landing moves the player again.
fn resolve_landing(
    txn: &StateTxn,
    game: &mut GameRecord,
    player: &mut PlayerRecord,
    tile: &TileRecord,
    dice_total: u8,
    outcome: &mut RollOutcome,
) -> ConflictableTransactionResult<(), GameError> {
    match tile.kind {
        TileKind::Tax => {
            let amount = tax_amount(&tile.name);
            let debit = debit_clamped(player, amount);
            if game.rules.vacation_cash && debit.paid > 0 {
                game.bank_pool += debit.paid;
            }
            outcome.tax_paid = Some(debit.paid);
            outcome.went_bankrupt = debit.went_bankrupt;
            txn.append_log(&ActionLogEntry::new(
                game.id,
                Some(player.id),
                ActionKind::TaxPaid,
                json!({
                    "position": tile.position,
                    "tile": tile.name,
                    "amount": debit.paid,
                }),
                game.round,
            ))?;
        }
        TileKind::FreeParking => {
            if game.rules.vacation_cash && game.bank_pool > 0 {
                let pool = game.bank_pool;
                credit(player, pool);
                game.bank_pool = 0;
                outcome.bonus_collected = Some(pool);
                txn.append_log(&ActionLogEntry::new(
                    game.id,
                    Some(player.id),
                    ActionKind::BonusCollected,
                    json!({ "amount": pool }),
                    game.round,
                ))?;
            }
        }
        TileKind::GoToJail => {
            player.position = JAIL_POSITION;
            player.is_in_jail = true;
            player.jail_turns = 0;
            outcome.new_position = JAIL_POSITION;
            outcome.forced_action = Some(ForcedAction::GoToJail);
            txn.append_log(&ActionLogEntry::new(
                game.id,
                Some(player.id),
                ActionKind::SentToJail,
                json!({ "from": tile.position }),
                game.round,
            ))?;
        }
        TileKind::Property | TileKind::Railroad | TileKind::Utility => {
            let Some(owner_id) = tile.owner_id else {
                return Ok(());
            };
            if owner_id == player.id || tile.is_mortgaged {
                return Ok(());
            }
            let mut owner = txn.player(game.id, owner_id)?;
            if game.rules.no_rent_in_prison && owner.is_in_jail {
                return Ok(());
            }
            let board = txn.tiles(game.id)?;
            let due = rent_due(&game.rules, tile, &board, dice_total);
            if due == 0 {
                return Ok(());
            }
            let debit = debit_clamped(player, due);
            // The owner collects exactly what was paid, never the full due.
            credit(&mut owner, debit.paid);
            txn.put_player(&owner)?;
            outcome.rent_paid = Some(debit.paid);
            outcome.went_bankrupt = debit.went_bankrupt;
            if debit.paid > 0 {
                txn.append_log(&ActionLogEntry::new(
                    game.id,
                    Some(player.id),
                    ActionKind::RentPaid,
                    json!({
                        "position": tile.position,
                        "tile": tile.name,
                        "amount": debit.paid,
                        "owner": owner_id,
                    }),
                    game.round,
                ))?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Voluntary purchase of the tile the player is standing on.
pub fn buy_property(
    txn: &StateTxn,
    game_id: Uuid,
    player_id: Uuid,
    position: u8,
) -> ConflictableTransactionResult<TileRecord, GameError> {
    let game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }
    let mut player = txn.player(game_id, player_id)?;
    if !player.is_active() {
        return abort(GameError::PlayerIsBankrupt);
    }
    let mut tile = txn.tile(game_id, position)?;
    if !tile.is_ownable() {
        return abort(GameError::InvalidMove("tile cannot be owned".to_string()));
    }
    if tile.owner_id.is_some() {
        return abort(GameError::InvalidMove("property is already owned".to_string()));
    }
    // A running auction has first claim on the deed.
    if let Some(auction_id) = txn.auction_slot(game_id, position)? {
        if txn.auction(auction_id)?.status == AuctionStatus::Active {
            return abort(GameError::AuctionInProgress);
        }
    }
    if player.position != position {
        return abort(GameError::InvalidMove(
            "player is not standing on that tile".to_string(),
        ));
    }
    if player.money < tile.price {
        return abort(GameError::InsufficientFunds {
            needed: tile.price,
            available: player.money,
        });
    }
    player.money -= tile.price;
    tile.owner_id = Some(player.id);
    txn.put_player(&player)?;
    txn.put_tile(&tile)?;
    txn.append_log(&ActionLogEntry::new(
        game.id,
        Some(player.id),
        ActionKind::PropertyPurchased,
        json!({
            "position": position,
            "tile": tile.name,
            "price": tile.price,
        }),
        game.round,
    ))?;
    Ok(tile)
}

/// Mortgage an owned tile for half its price. The whole color group must be
/// free of buildings first.
pub fn mortgage_property(
    txn: &StateTxn,
    game_id: Uuid,
    player_id: Uuid,
    position: u8,
) -> ConflictableTransactionResult<i64, GameError> {
    let game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }
    if !game.rules.mortgage_enabled {
        return abort(GameError::RuleDisabled {
            rule: "mortgage_enabled",
        });
    }
    let mut player = txn.player(game_id, player_id)?;
    if !player.is_active() {
        return abort(GameError::PlayerIsBankrupt);
    }
    let mut tile = txn.tile(game_id, position)?;
    if tile.owner_id != Some(player.id) {
        return abort(GameError::InvalidMove(
            "player does not own that tile".to_string(),
        ));
    }
    if tile.is_mortgaged {
        return abort(GameError::InvalidMove("tile is already mortgaged".to_string()));
    }
    if let Some(group) = tile.color_group {
        let board = txn.tiles(game_id)?;
        if board
            .iter()
            .any(|t| t.color_group == Some(group) && t.has_buildings())
        {
            return abort(GameError::InvalidMove(
                "color group still has buildings".to_string(),
            ));
        }
    }
    let value = tile.mortgage_value();
    tile.is_mortgaged = true;
    credit(&mut player, value);
    txn.put_player(&player)?;
    txn.put_tile(&tile)?;
    txn.append_log(&ActionLogEntry::new(
        game.id,
        Some(player.id),
        ActionKind::PropertyMortgaged,
        json!({
            "position": position,
            "tile": tile.name,
            "value": value,
        }),
        game.round,
    ))?;
    Ok(value)
}

/// Pay off a mortgage: principal plus 10% interest. With `vacation_cash`
/// enabled the interest lands in the bank pool.
pub fn unmortgage_property(
    txn: &StateTxn,
    game_id: Uuid,
    player_id: Uuid,
    position: u8,
) -> ConflictableTransactionResult<i64, GameError> {
    let mut game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }
    if !game.rules.mortgage_enabled {
        return abort(GameError::RuleDisabled {
            rule: "mortgage_enabled",
        });
    }
    let mut player = txn.player(game_id, player_id)?;
    if !player.is_active() {
        return abort(GameError::PlayerIsBankrupt);
    }
    let mut tile = txn.tile(game_id, position)?;
    if tile.owner_id != Some(player.id) {
        return abort(GameError::InvalidMove(
            "player does not own that tile".to_string(),
        ));
    }
    if !tile.is_mortgaged {
        return abort(GameError::InvalidMove("tile is not mortgaged".to_string()));
    }
    let cost = tile.unmortgage_cost();
    if player.money < cost {
        return abort(GameError::InsufficientFunds {
            needed: cost,
            available: player.money,
        });
    }
    player.money -= cost;
    tile.is_mortgaged = false;
    let interest = cost - tile.mortgage_value();
    if game.rules.vacation_cash && interest > 0 {
        game.bank_pool += interest;
    }
    txn.put_player(&player)?;
    txn.put_tile(&tile)?;
    txn.put_game(&game)?;
    txn.append_log(&ActionLogEntry::new(
        game.id,
        Some(player.id),
        ActionKind::PropertyUnmortgaged,
        json!({
            "position": position,
            "tile": tile.name,
            "cost": cost,
            "interest": interest,
        }),
        game.round,
    ))?;
    Ok(cost)
}

fn building_level(tile: &TileRecord) -> u8 {
    if tile.hotels > 0 {
        MAX_HOUSES + 1
    } else {
        tile.houses
    }
}

/// Build one house on a street (the fifth build converts to a hotel).
pub fn build_house(
    txn: &StateTxn,
    game_id: Uuid,
    player_id: Uuid,
    position: u8,
) -> ConflictableTransactionResult<TileRecord, GameError> {
    let game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }
    let mut player = txn.player(game_id, player_id)?;
    if !player.is_active() {
        return abort(GameError::PlayerIsBankrupt);
    }
    let mut tile = txn.tile(game_id, position)?;
    if tile.kind != TileKind::Property {
        return abort(GameError::InvalidMove(
            "only streets take houses".to_string(),
        ));
    }
    if tile.owner_id != Some(player.id) {
        return abort(GameError::InvalidMove(
            "player does not own that tile".to_string(),
        ));
    }
    if tile.hotels > 0 {
        return abort(GameError::InvalidMove("hotel already built".to_string()));
    }
    let board = txn.tiles(game_id)?;
    if !owns_full_group(&tile, &board) {
        return abort(GameError::InvalidMove(
            "full color group required to build".to_string(),
        ));
    }
    if board
        .iter()
        .any(|t| t.color_group == tile.color_group && t.is_mortgaged)
    {
        return abort(GameError::InvalidMove(
            "color group has a mortgaged tile".to_string(),
        ));
    }
    if game.rules.even_build {
        let min_level = board
            .iter()
            .filter(|t| t.color_group == tile.color_group && t.position != tile.position)
            .map(building_level)
            .min();
        if let Some(min) = min_level {
            if building_level(&tile) > min {
                return abort(GameError::InvalidMove(
                    "houses must be built evenly across the group".to_string(),
                ));
            }
        }
    }
    if player.money < tile.house_cost {
        return abort(GameError::InsufficientFunds {
            needed: tile.house_cost,
            available: player.money,
        });
    }
    player.money -= tile.house_cost;
    if tile.houses == MAX_HOUSES {
        tile.houses = 0;
        tile.hotels = 1;
    } else {
        tile.houses += 1;
    }
    txn.put_player(&player)?;
    txn.put_tile(&tile)?;
    txn.append_log(&ActionLogEntry::new(
        game.id,
        Some(player.id),
        ActionKind::HouseBuilt,
        json!({
            "position": position,
            "tile": tile.name,
            "houses": tile.houses,
            "hotels": tile.hotels,
        }),
        game.round,
    ))?;
    Ok(tile)
}

/// Sell one house back for half its cost (a hotel reverts to four houses).
pub fn sell_house(
    txn: &StateTxn,
    game_id: Uuid,
    player_id: Uuid,
    position: u8,
) -> ConflictableTransactionResult<TileRecord, GameError> {
    let game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }
    let mut player = txn.player(game_id, player_id)?;
    if !player.is_active() {
        return abort(GameError::PlayerIsBankrupt);
    }
    let mut tile = txn.tile(game_id, position)?;
    if tile.owner_id != Some(player.id) {
        return abort(GameError::InvalidMove(
            "player does not own that tile".to_string(),
        ));
    }
    if !tile.has_buildings() {
        return abort(GameError::InvalidMove("nothing to sell".to_string()));
    }
    if game.rules.even_build {
        let board = txn.tiles(game_id)?;
        let max_level = board
            .iter()
            .filter(|t| t.color_group == tile.color_group && t.position != tile.position)
            .map(building_level)
            .max();
        if let Some(max) = max_level {
            if max > building_level(&tile) {
                return abort(GameError::InvalidMove(
                    "houses must be sold evenly across the group".to_string(),
                ));
            }
        }
    }
    if tile.hotels > 0 {
        tile.hotels = 0;
        tile.houses = MAX_HOUSES;
    } else {
        tile.houses -= 1;
    }
    let refund = tile.house_cost / 2;
    credit(&mut player, refund);
    txn.put_player(&player)?;
    txn.put_tile(&tile)?;
    txn.append_log(&ActionLogEntry::new(
        game.id,
        Some(player.id),
        ActionKind::HouseSold,
        json!({
            "position": position,
            "tile": tile.name,
            "refund": refund,
            "houses": tile.houses,
            "hotels": tile.hotels,
        }),
        game.round,
    ))?;
    Ok(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board;

    fn player_with(money: i64) -> PlayerRecord {
        PlayerRecord::new(Uuid::new_v4(), Uuid::new_v4(), "tester", 1, money)
    }

    #[test]
    fn tax_amount_keys_off_name() {
        assert_eq!(tax_amount("Income Tax"), 200);
        assert_eq!(tax_amount("LUXURY TAX"), 100);
        assert_eq!(tax_amount("Window Tax"), 150);
    }

    #[test]
    fn debit_exact_balance_stays_active() {
        let mut player = player_with(100);
        let debit = debit_clamped(&mut player, 100);
        assert_eq!(debit.paid, 100);
        assert!(!debit.went_bankrupt);
        assert_eq!(player.money, 0);
        assert_eq!(player.status, PlayerStatus::Active);
    }

    #[test]
    fn debit_shortfall_clamps_and_bankrupts() {
        let mut player = player_with(90);
        let debit = debit_clamped(&mut player, 150);
        assert_eq!(debit.paid, 90);
        assert!(debit.went_bankrupt);
        assert_eq!(player.money, 0);
        assert_eq!(player.status, PlayerStatus::Bankrupt);
        assert!(!player.can_roll);
    }

    #[test]
    fn credit_ignores_negative_amounts() {
        let mut player = player_with(500);
        credit(&mut player, -40);
        assert_eq!(player.money, 500);
    }

    fn owned_board(owner: Uuid, positions: &[u8]) -> Vec<TileRecord> {
        let mut tiles = board::stamp(Uuid::new_v4());
        for &pos in positions {
            tiles[pos as usize].owner_id = Some(owner);
        }
        tiles
    }

    #[test]
    fn hotel_rent_beats_every_other_tier() {
        let owner = Uuid::new_v4();
        let mut tiles = owned_board(owner, &[39]);
        tiles[39].hotels = 1;
        tiles[39].houses = 0;
        let rules = GameRules::default();
        assert_eq!(rent_due(&rules, &tiles[39], &tiles, 7), tiles[39].rent_with_hotel);
    }

    #[test]
    fn house_tier_rent_with_zero_tier_falls_back_to_base() {
        let owner = Uuid::new_v4();
        let mut tiles = owned_board(owner, &[6]);
        tiles[6].houses = 2;
        let rules = GameRules::default();
        assert_eq!(rent_due(&rules, &tiles[6], &tiles, 7), tiles[6].rent_with_houses[1]);

        tiles[6].rent_with_houses[1] = 0;
        assert_eq!(rent_due(&rules, &tiles[6], &tiles, 7), tiles[6].rent);
    }

    #[test]
    fn railroad_rent_scales_with_holdings() {
        let owner = Uuid::new_v4();
        let rules = GameRules::default();
        let tiles = owned_board(owner, &[5]);
        assert_eq!(rent_due(&rules, &tiles[5], &tiles, 7), 25);
        let tiles = owned_board(owner, &[5, 15, 25, 35]);
        assert_eq!(rent_due(&rules, &tiles[5], &tiles, 7), 100);
    }

    #[test]
    fn utility_rent_multiplies_the_triggering_roll() {
        let owner = Uuid::new_v4();
        let rules = GameRules::default();
        let tiles = owned_board(owner, &[12]);
        assert_eq!(rent_due(&rules, &tiles[12], &tiles, 9), 36);
        let tiles = owned_board(owner, &[12, 28]);
        assert_eq!(rent_due(&rules, &tiles[12], &tiles, 9), 90);
    }

    #[test]
    fn full_set_doubles_base_rent_only_when_rule_enabled() {
        let owner = Uuid::new_v4();
        // Brown group is positions 1 and 3.
        let tiles = owned_board(owner, &[1, 3]);
        let mut rules = GameRules::default();
        assert_eq!(rent_due(&rules, &tiles[1], &tiles, 7), tiles[1].rent_with_set);
        rules.double_rent_on_full_set = false;
        assert_eq!(rent_due(&rules, &tiles[1], &tiles, 7), tiles[1].rent);
    }

    #[test]
    fn partial_set_pays_base_rent() {
        let owner = Uuid::new_v4();
        let tiles = owned_board(owner, &[1]);
        let rules = GameRules::default();
        assert_eq!(rent_due(&rules, &tiles[1], &tiles, 7), tiles[1].rent);
    }

    #[test]
    fn full_set_with_zero_set_rent_falls_back_to_base() {
        let owner = Uuid::new_v4();
        let mut tiles = owned_board(owner, &[1, 3]);
        tiles[1].rent_with_set = 0;
        let rules = GameRules::default();
        assert_eq!(rent_due(&rules, &tiles[1], &tiles, 7), tiles[1].rent);
    }

    #[test]
    fn owns_full_group_requires_every_tile() {
        let owner = Uuid::new_v4();
        let mut tiles = owned_board(owner, &[1, 3]);
        assert!(owns_full_group(&tiles[1], &tiles));
        tiles[3].owner_id = Some(Uuid::new_v4());
        assert!(!owns_full_group(&tiles[1], &tiles));
        // Railroads have no color group.
        assert!(!owns_full_group(&tiles[5], &tiles));
    }
}
