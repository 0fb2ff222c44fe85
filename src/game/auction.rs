//! Time-boxed bidding for a property the roller declined to buy.
//!
//! The countdown is a client-visible timer owned by callers; the engine
//! holds no clock and reacts only to explicit bid and end calls. One
//! non-terminal auction may exist per (game, position), tracked through a
//! slot index key so a create can be refused without scanning.

use serde_json::json;
use sled::transaction::{abort, ConflictableTransactionResult};
use uuid::Uuid;

use crate::game::engine::debit_clamped;
use crate::game::errors::GameError;
use crate::game::types::{
    ActionKind, ActionLogEntry, AuctionRecord, AuctionSettlement, AuctionStatus, GameStatus,
    AUCTION_WINDOW_SECS,
};
use crate::store::StateTxn;

/// Open an auction for the unowned property at `position`.
pub fn create_auction(
    txn: &StateTxn,
    game_id: Uuid,
    position: u8,
    starting_bid: i64,
    auction_id: Uuid,
) -> ConflictableTransactionResult<AuctionRecord, GameError> {
    let game = txn.game(game_id)?;
    if game.status != GameStatus::Active {
        return abort(GameError::WrongPhase { expected: "active" });
    }
    if !game.rules.auction_enabled {
        return abort(GameError::RuleDisabled {
            rule: "auction_enabled",
        });
    }
    let tile = txn.tile(game_id, position)?;
    if !tile.is_ownable() {
        return abort(GameError::InvalidMove(
            "tile cannot be auctioned".to_string(),
        ));
    }
    if tile.owner_id.is_some() {
        return abort(GameError::InvalidMove(
            "property is already owned".to_string(),
        ));
    }
    if let Some(existing) = txn.auction_slot(game_id, position)? {
        let running = txn.auction(existing)?;
        if running.status == AuctionStatus::Active {
            return abort(GameError::AuctionAlreadyExists);
        }
    }

    let auction = AuctionRecord::new(auction_id, game_id, position, starting_bid.max(0));
    txn.put_auction(&auction)?;
    txn.set_auction_slot(game_id, position, auction.id)?;
    txn.append_log(&ActionLogEntry::new(
        game_id,
        None,
        ActionKind::AuctionCreated,
        json!({
            "auction": auction.id,
            "position": position,
            "tile": tile.name,
            "starting_bid": auction.current_bid,
        }),
        game.round,
    ))?;
    Ok(auction)
}

/// Raise the current bid. Nothing is debited until settlement; the window
/// resets on every accepted bid.
pub fn place_bid(
    txn: &StateTxn,
    auction_id: Uuid,
    player_id: Uuid,
    bid: i64,
) -> ConflictableTransactionResult<AuctionRecord, GameError> {
    let mut auction = txn.auction(auction_id)?;
    if auction.status != AuctionStatus::Active {
        return abort(GameError::AuctionNotActive);
    }
    if bid <= auction.current_bid {
        return abort(GameError::BidTooLow {
            bid,
            current: auction.current_bid,
        });
    }
    let player = txn.player(auction.game_id, player_id)?;
    if !player.is_active() {
        return abort(GameError::PlayerIsBankrupt);
    }
    if player.money < bid {
        return abort(GameError::InsufficientFunds {
            needed: bid,
            available: player.money,
        });
    }

    auction.current_bid = bid;
    auction.highest_bidder = Some(player.id);
    auction.time_remaining = AUCTION_WINDOW_SECS;
    txn.put_auction(&auction)?;

    let game = txn.game(auction.game_id)?;
    txn.append_log(&ActionLogEntry::new(
        auction.game_id,
        Some(player.id),
        ActionKind::BidPlaced,
        json!({
            "auction": auction.id,
            "position": auction.position,
            "bid": bid,
        }),
        game.round,
    ))?;
    Ok(auction)
}

/// Settle an auction: with a highest bidder the property transfers and the
/// bid is collected, otherwise the auction cancels with no state change.
///
/// Ending a terminal auction is refused with `AuctionAlreadyEnded` so a
/// doubled end signal can never transfer twice. The winning bid is collected
/// through the clamped debit: funds can have dropped since the bid was
/// placed, in which case the winner is emptied and goes bankrupt but still
/// takes the deed. A deed that has already changed hands cancels the auction
/// instead: the standing owner keeps it and the bidder is never charged.
pub fn end_auction(
    txn: &StateTxn,
    auction_id: Uuid,
) -> ConflictableTransactionResult<AuctionSettlement, GameError> {
    let mut auction = txn.auction(auction_id)?;
    if auction.status != AuctionStatus::Active {
        return abort(GameError::AuctionAlreadyEnded);
    }
    let game = txn.game(auction.game_id)?;
    let mut tile = txn.tile(auction.game_id, auction.position)?;

    let settlement = match auction.highest_bidder {
        Some(winner_id) if tile.owner_id.is_none() => {
            let mut winner = txn.player(auction.game_id, winner_id)?;
            let debit = debit_clamped(&mut winner, auction.current_bid);
            tile.owner_id = Some(winner_id);
            auction.status = AuctionStatus::Completed;
            txn.put_player(&winner)?;
            txn.put_tile(&tile)?;
            txn.append_log(&ActionLogEntry::new(
                auction.game_id,
                Some(winner_id),
                ActionKind::AuctionCompleted,
                json!({
                    "auction": auction.id,
                    "position": auction.position,
                    "tile": tile.name,
                    "price": debit.paid,
                    "bankrupted_winner": debit.went_bankrupt,
                }),
                game.round,
            ))?;
            AuctionSettlement {
                auction_id: auction.id,
                position: auction.position,
                status: AuctionStatus::Completed,
                winner: Some(winner_id),
                price_paid: debit.paid,
            }
        }
        _ => {
            auction.status = AuctionStatus::Cancelled;
            txn.append_log(&ActionLogEntry::new(
                auction.game_id,
                None,
                ActionKind::AuctionCancelled,
                json!({ "auction": auction.id, "position": auction.position }),
                game.round,
            ))?;
            AuctionSettlement {
                auction_id: auction.id,
                position: auction.position,
                status: AuctionStatus::Cancelled,
                winner: None,
                price_paid: 0,
            }
        }
    };

    auction.time_remaining = 0;
    txn.put_auction(&auction)?;
    txn.clear_auction_slot(auction.game_id, auction.position)?;
    Ok(settlement)
}
