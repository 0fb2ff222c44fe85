//! Allow-listed rule settings that hosts may change before or during a game.
//!
//! Every mutable setting is parsed into a typed [`SettingChange`] before any
//! state is touched, so an unknown name or a wrongly-typed value rejects the
//! request without opening a transaction.

use serde_json::Value;

use crate::game::errors::GameError;
use crate::game::types::GameRules;

/// One validated change to a game's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    DoubleRentOnFullSet(bool),
    VacationCash(bool),
    AuctionEnabled(bool),
    NoRentInPrison(bool),
    MortgageEnabled(bool),
    EvenBuild(bool),
    StartingCash(i64),
    MaxPlayers(u32),
}

fn expect_bool(name: &str, value: &Value) -> Result<bool, GameError> {
    value.as_bool().ok_or_else(|| GameError::InvalidSettingValue {
        name: name.to_string(),
        reason: "expected a boolean".to_string(),
    })
}

fn expect_positive(name: &str, value: &Value) -> Result<i64, GameError> {
    match value.as_i64() {
        Some(n) if n > 0 => Ok(n),
        _ => Err(GameError::InvalidSettingValue {
            name: name.to_string(),
            reason: "expected a positive integer".to_string(),
        }),
    }
}

impl SettingChange {
    /// Parse a raw `(name, value)` pair against the allow-list.
    pub fn parse(name: &str, value: &Value) -> Result<Self, GameError> {
        match name {
            "double_rent_on_full_set" => Ok(Self::DoubleRentOnFullSet(expect_bool(name, value)?)),
            "vacation_cash" => Ok(Self::VacationCash(expect_bool(name, value)?)),
            "auction_enabled" => Ok(Self::AuctionEnabled(expect_bool(name, value)?)),
            "no_rent_in_prison" => Ok(Self::NoRentInPrison(expect_bool(name, value)?)),
            "mortgage_enabled" => Ok(Self::MortgageEnabled(expect_bool(name, value)?)),
            "even_build" => Ok(Self::EvenBuild(expect_bool(name, value)?)),
            "starting_cash" => Ok(Self::StartingCash(expect_positive(name, value)?)),
            "max_players" => {
                let n = expect_positive(name, value)?;
                u32::try_from(n).map(Self::MaxPlayers).map_err(|_| {
                    GameError::InvalidSettingValue {
                        name: name.to_string(),
                        reason: "value out of range".to_string(),
                    }
                })
            }
            other => Err(GameError::UnknownSetting(other.to_string())),
        }
    }

    /// The allow-list name this change targets.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DoubleRentOnFullSet(_) => "double_rent_on_full_set",
            Self::VacationCash(_) => "vacation_cash",
            Self::AuctionEnabled(_) => "auction_enabled",
            Self::NoRentInPrison(_) => "no_rent_in_prison",
            Self::MortgageEnabled(_) => "mortgage_enabled",
            Self::EvenBuild(_) => "even_build",
            Self::StartingCash(_) => "starting_cash",
            Self::MaxPlayers(_) => "max_players",
        }
    }

    /// The new value, for log details.
    pub fn value(&self) -> Value {
        match *self {
            Self::DoubleRentOnFullSet(v)
            | Self::VacationCash(v)
            | Self::AuctionEnabled(v)
            | Self::NoRentInPrison(v)
            | Self::MortgageEnabled(v)
            | Self::EvenBuild(v) => Value::Bool(v),
            Self::StartingCash(v) => Value::from(v),
            Self::MaxPlayers(v) => Value::from(v),
        }
    }

    pub fn apply(&self, rules: &mut GameRules) {
        match *self {
            Self::DoubleRentOnFullSet(v) => rules.double_rent_on_full_set = v,
            Self::VacationCash(v) => rules.vacation_cash = v,
            Self::AuctionEnabled(v) => rules.auction_enabled = v,
            Self::NoRentInPrison(v) => rules.no_rent_in_prison = v,
            Self::MortgageEnabled(v) => rules.mortgage_enabled = v,
            Self::EvenBuild(v) => rules.even_build = v,
            Self::StartingCash(v) => rules.starting_cash = v,
            Self::MaxPlayers(v) => rules.max_players = v,
        }
    }
}
