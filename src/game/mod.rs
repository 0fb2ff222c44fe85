//! The board-game core: static catalog, durable record types, and the
//! transactional flows that mutate them (turn engine, sequencer, auction,
//! settings, external events).

pub mod auction;
pub mod board;
pub mod dice;
pub mod engine;
pub mod errors;
pub mod events;
pub mod sequencer;
pub mod settings;
pub mod types;
