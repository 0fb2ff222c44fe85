//! # Boardwalk - a multiplayer board-game engine with durable state
//!
//! Boardwalk is the server core for a Monopoly-variant board game: a lobby
//! lifecycle, a turn and board-resolution engine, an auction sub-flow, and a
//! narrow seam for an external narrator whose structured events mutate the
//! game through the same primitives as rent.
//!
//! ## Features
//!
//! - **Transactional state**: every multi-step mutation (roll, rent, turn
//!   advance, auction settlement) runs as one sled transaction, so two
//!   concurrent rolls for the same seat can never both pass the turn gate
//!   and no partial mutation is ever observable.
//! - **Deterministic dice**: the dice source is a one-method trait;
//!   production uses a seedable RNG, tests and simulations feed a script.
//! - **Rule toggles**: an allow-listed settings gate (double rent on full
//!   sets, vacation cash pooling, rent immunity in jail, mortgage and
//!   building rules) consulted during landing resolution.
//! - **Append-only audit log**: every roll, payment, and transfer is
//!   recorded and replayable in order.
//! - **Broadcast seam**: a fire-and-forget publish contract with an
//!   in-process tokio fan-out; transports attach outside this crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boardwalk::game::types::GameRules;
//! use boardwalk::service::GameService;
//! use boardwalk::store::GameStore;
//!
//! fn main() -> Result<(), boardwalk::game::errors::GameError> {
//!     let store = GameStore::open("./data/boardwalk")?;
//!     let service = GameService::with_defaults(store);
//!
//!     let game = service.create_game("Friday Night", GameRules::default())?;
//!     let alice = service.join_game(game.id, "Alice")?;
//!     let _bob = service.join_game(game.id, "Bob")?;
//!     service.initialize_board(game.id)?;
//!     service.start_game(game.id)?;
//!
//!     let outcome = service.roll_dice(game.id, alice.id)?;
//!     println!("Alice rolled {:?} and landed on {:?}", outcome.dice, outcome.tile_name);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - The core: board catalog, record types, turn engine,
//!   sequencer, auction, settings gate, and the narrator event seam
//! - [`store`] - Sled-backed persistence and the transactional view
//! - [`service`] - The client-facing operation surface
//! - [`broadcast`] - One-way state-change notifications
//! - [`config`] - TOML configuration and validation

pub mod broadcast;
pub mod config;
pub mod game;
pub mod service;
pub mod store;
