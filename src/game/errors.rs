use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable failure categories carried alongside the human-readable message in
/// every client-facing failure payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    InvalidSetting,
    Conflict,
    Internal,
}

/// Structured failure handed to clients: a stable kind plus a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Errors that can arise while driving a game or its storage layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around JSON payload errors (log details, setting values).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("game not found: {0}")]
    GameNotFound(Uuid),

    #[error("player not found: {0}")]
    PlayerNotFound(Uuid),

    #[error("no tile at position {0}")]
    TileNotFound(u8),

    #[error("auction not found: {0}")]
    AuctionNotFound(Uuid),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    #[error("not your turn")]
    NotYourTurn,

    #[error("already rolled this turn")]
    AlreadyRolled,

    #[error("game is not {expected}")]
    WrongPhase { expected: &'static str },

    #[error("no active players remain")]
    NoActivePlayers,

    #[error("game is full ({max_players} players)")]
    GameFull { max_players: u32 },

    #[error("player is bankrupt")]
    PlayerIsBankrupt,

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("the {rule} rule is disabled for this game")]
    RuleDisabled { rule: &'static str },

    #[error("auction is not active")]
    AuctionNotActive,

    #[error("auction already ended")]
    AuctionAlreadyEnded,

    #[error("an auction is already running for this property")]
    AuctionAlreadyExists,

    #[error("property is under auction")]
    AuctionInProgress,

    #[error("bid {bid} does not beat the current bid of {current}")]
    BidTooLow { bid: i64, current: i64 },

    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("invalid value for setting {name}: {reason}")]
    InvalidSettingValue { name: String, reason: String },

    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// Internal error (unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Stable category for the client-facing failure contract.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::GameNotFound(_)
            | GameError::PlayerNotFound(_)
            | GameError::TileNotFound(_)
            | GameError::AuctionNotFound(_) => ErrorKind::NotFound,
            GameError::NotYourTurn
            | GameError::AlreadyRolled
            | GameError::WrongPhase { .. }
            | GameError::NoActivePlayers
            | GameError::GameFull { .. }
            | GameError::PlayerIsBankrupt
            | GameError::InsufficientFunds { .. }
            | GameError::RuleDisabled { .. }
            | GameError::AuctionNotActive
            | GameError::AuctionAlreadyEnded
            | GameError::BidTooLow { .. }
            | GameError::InvalidMove(_) => ErrorKind::InvalidState,
            GameError::UnknownSetting(_) | GameError::InvalidSettingValue { .. } => {
                ErrorKind::InvalidSetting
            }
            GameError::AuctionAlreadyExists | GameError::AuctionInProgress => ErrorKind::Conflict,
            GameError::Sled(_)
            | GameError::Bincode(_)
            | GameError::Json(_)
            | GameError::Io(_)
            | GameError::SchemaMismatch { .. }
            | GameError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Package the error for a client response.
    pub fn to_failure(&self) -> Failure {
        Failure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}
