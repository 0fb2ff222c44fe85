use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const GAME_SCHEMA_VERSION: u8 = 1;
pub const PLAYER_SCHEMA_VERSION: u8 = 1;
pub const TILE_SCHEMA_VERSION: u8 = 1;
pub const AUCTION_SCHEMA_VERSION: u8 = 1;
pub const LOG_SCHEMA_VERSION: u8 = 1;

/// Positions run 0..39; movement wraps at this modulus.
pub const BOARD_SIZE: u8 = 40;
/// Credited each time a player crosses the start tile, before landing resolution.
pub const PASS_GO_BONUS: i64 = 200;
/// Where a go-to-jail landing sends the player.
pub const JAIL_POSITION: u8 = 10;
/// Failed turns a jailed player waits before the roll releases them anyway.
pub const MAX_JAIL_TURNS: u8 = 3;
/// Seconds an auction countdown resets to after every valid bid.
pub const AUCTION_WINDOW_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Bankrupt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Property,
    Railroad,
    Utility,
    Tax,
    Jail,
    GoToJail,
    FreeParking,
    CommunityChest,
    Chance,
    Go,
    Special,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

/// Named rule toggles a game starts from. The settings gate is the only
/// mutation path once a game exists; the turn engine reads them during
/// landing resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRules {
    #[serde(default = "default_true")]
    pub double_rent_on_full_set: bool,
    /// Taxes and mortgage interest accumulate in the bank pool, paid out to
    /// whoever lands on free parking.
    #[serde(default)]
    pub vacation_cash: bool,
    #[serde(default = "default_true")]
    pub auction_enabled: bool,
    /// Owners sitting in jail collect no rent while this is on.
    #[serde(default)]
    pub no_rent_in_prison: bool,
    #[serde(default = "default_true")]
    pub mortgage_enabled: bool,
    /// Houses must be spread evenly across a color group.
    #[serde(default = "default_true")]
    pub even_build: bool,
    #[serde(default = "default_starting_cash")]
    pub starting_cash: i64,
    #[serde(default = "default_max_players")]
    pub max_players: u32,
}

fn default_true() -> bool {
    true
}

fn default_starting_cash() -> i64 {
    1500
}

fn default_max_players() -> u32 {
    8
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            double_rent_on_full_set: true,
            vacation_cash: false,
            auction_enabled: true,
            no_rent_in_prison: false,
            mortgage_enabled: true,
            even_build: true,
            starting_cash: 1500,
            max_players: 8,
        }
    }
}

/// Durable record for one game: lobby status, turn pointer, bank pool, rules,
/// and the seat roster in join order (seat N is `seats[N-1]`, never reused).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    pub id: Uuid,
    pub name: String,
    pub status: GameStatus,
    /// 1-based seat whose turn it is; None before the game starts.
    pub current_player_turn: Option<u32>,
    pub round: u32,
    /// Optional round ceiling consumed by external narrators, not the core loop.
    pub max_rounds: Option<u32>,
    /// Accumulated tax/interest money, paid out on a free-parking landing
    /// under the vacation_cash rule.
    pub bank_pool: i64,
    pub rules: GameRules,
    pub seats: Vec<Uuid>,
    pub board_ready: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl GameRecord {
    pub fn new(id: Uuid, name: &str, rules: GameRules) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.to_string(),
            status: GameStatus::Waiting,
            current_player_turn: None,
            round: 0,
            max_rounds: None,
            bank_pool: 0,
            rules,
            seats: Vec::new(),
            board_ready: false,
            created_at: now,
            updated_at: now,
            schema_version: GAME_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Per-player ledger row. Created on join, never deleted; bankruptcy is a
/// terminal status, not removal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub id: Uuid,
    pub game_id: Uuid,
    pub display_name: String,
    /// Stable 1-based seat assigned at join time.
    pub order_in_game: u32,
    pub position: u8,
    pub money: i64,
    /// Mutated only by external narration events.
    #[serde(default)]
    pub reputation: i64,
    pub status: PlayerStatus,
    /// True only for the seat whose turn it is, until that seat has rolled.
    pub can_roll: bool,
    pub is_in_jail: bool,
    pub jail_turns: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl PlayerRecord {
    pub fn new(
        id: Uuid,
        game_id: Uuid,
        display_name: &str,
        order_in_game: u32,
        starting_cash: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            game_id,
            display_name: display_name.to_string(),
            order_in_game,
            position: 0,
            money: starting_cash,
            reputation: 0,
            status: PlayerStatus::Active,
            can_roll: false,
            is_in_jail: false,
            jail_turns: 0,
            created_at: now,
            updated_at: now,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }
}

/// One board position inside a game, stamped from the static catalog at
/// board initialization and mutated as ownership and buildings change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileRecord {
    pub game_id: Uuid,
    pub position: u8,
    pub name: String,
    pub kind: TileKind,
    pub color_group: Option<ColorGroup>,
    pub price: i64,
    pub rent: i64,
    pub rent_with_set: i64,
    pub rent_with_houses: [i64; 4],
    pub rent_with_hotel: i64,
    pub house_cost: i64,
    pub houses: u8,
    pub hotels: u8,
    pub owner_id: Option<Uuid>,
    pub is_mortgaged: bool,
    pub schema_version: u8,
}

impl TileRecord {
    /// Only properties, railroads, and utilities can carry an owner.
    pub fn is_ownable(&self) -> bool {
        matches!(
            self.kind,
            TileKind::Property | TileKind::Railroad | TileKind::Utility
        )
    }

    /// Cash received for mortgaging: half the list price.
    pub fn mortgage_value(&self) -> i64 {
        self.price / 2
    }

    /// Cost to lift a mortgage: the mortgage value plus 10% interest,
    /// rounded up.
    pub fn unmortgage_cost(&self) -> i64 {
        let principal = self.mortgage_value();
        principal + (principal + 9) / 10
    }

    pub fn has_buildings(&self) -> bool {
        self.houses > 0 || self.hotels > 0
    }
}

/// Time-boxed bidding for an unowned property a player declined to buy.
/// The countdown belongs to callers; the engine only reacts to bid/end calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuctionRecord {
    pub id: Uuid,
    pub game_id: Uuid,
    pub position: u8,
    pub current_bid: i64,
    pub highest_bidder: Option<Uuid>,
    /// Seconds left on the caller-owned countdown, reset on every valid bid.
    pub time_remaining: u32,
    pub status: AuctionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl AuctionRecord {
    pub fn new(id: Uuid, game_id: Uuid, position: u8, starting_bid: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            game_id,
            position,
            current_bid: starting_bid,
            highest_bidder: None,
            time_remaining: AUCTION_WINDOW_SECS,
            status: AuctionStatus::Active,
            created_at: now,
            updated_at: now,
            schema_version: AUCTION_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// What happened, for the append-only audit trail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    GameCreated,
    PlayerJoined,
    BoardInitialized,
    GameStarted,
    DiceRolled,
    RentPaid,
    TaxPaid,
    BonusCollected,
    SentToJail,
    JailWait,
    TurnAdvanced,
    SettingChanged,
    PropertyPurchased,
    PropertyMortgaged,
    PropertyUnmortgaged,
    HouseBuilt,
    HouseSold,
    AuctionCreated,
    BidPlaced,
    AuctionCompleted,
    AuctionCancelled,
    PlayerBankrupt,
    EventApplied,
}

/// Append-only log entry. Never mutated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionLogEntry {
    pub game_id: Uuid,
    pub player_id: Option<Uuid>,
    pub action: ActionKind,
    pub details: Value,
    pub round: u32,
    pub timestamp: DateTime<Utc>,
    pub schema_version: u8,
}

impl ActionLogEntry {
    pub fn new(
        game_id: Uuid,
        player_id: Option<Uuid>,
        action: ActionKind,
        details: Value,
        round: u32,
    ) -> Self {
        Self {
            game_id,
            player_id,
            action,
            details,
            round,
            timestamp: Utc::now(),
            schema_version: LOG_SCHEMA_VERSION,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ForcedAction {
    GoToJail,
    JailWait,
}

/// Result of one resolved roll, handed back to the caller and broadcast.
/// Monetary fields are present only when that effect actually fired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollOutcome {
    pub dice: (u8, u8),
    pub total: u8,
    pub is_doubles: bool,
    pub passed_go: bool,
    pub new_position: u8,
    pub tile_name: Option<String>,
    pub tile_kind: Option<TileKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_paid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_paid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_collected: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_action: Option<ForcedAction>,
    pub went_bankrupt: bool,
}

/// Result of a turn advance: who holds the dice now.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnAdvance {
    pub player_id: Uuid,
    pub seat: u32,
    pub round: u32,
}

/// Result of ending an auction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuctionSettlement {
    pub auction_id: Uuid,
    pub position: u8,
    pub status: AuctionStatus,
    pub winner: Option<Uuid>,
    /// What the winner actually paid; clamped at their balance.
    pub price_paid: i64,
}

/// Read-only view of a whole game, for clients and external narrators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub game: GameRecord,
    pub players: Vec<PlayerRecord>,
    pub tiles: Vec<TileRecord>,
}
