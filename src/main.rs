//! Binary entrypoint for the boardwalk CLI.
//!
//! Commands:
//! - `start` - open the store and hold it for attached transports
//! - `init` - create a starter `config.toml`
//! - `status` - print the stored games and their standings
//! - `simulate [-p <players>] [-r <rounds>] [--seed <n>]` - play a scripted
//!   local game against the real store, exercising every engine path
//!
//! See the library crate docs for module-level details: `boardwalk::`.

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use boardwalk::config::Config;
use boardwalk::game::dice::FairDice;
use boardwalk::game::types::{GameStatus, PlayerStatus, TileKind};
use boardwalk::service::GameService;
use boardwalk::store::GameStore;

#[derive(Parser)]
#[command(name = "boardwalk")]
#[command(about = "A multiplayer board-game engine with durable, transactional state")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the game store and keep it available until interrupted
    Start,
    /// Create a starter configuration file
    Init,
    /// Show stored games and their standings
    Status,
    /// Play an automated local game end to end
    Simulate {
        /// Number of seats to fill
        #[arg(short, long, default_value_t = 4)]
        players: u32,
        /// Rounds to play before stopping
        #[arg(short, long, default_value_t = 20)]
        rounds: u32,
        /// Dice seed for reproducible games
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    if !matches!(cli.command, Commands::Init) {
        init_logging(&config, cli.verbose);
    }
    let config = config.unwrap_or_default();

    match cli.command {
        Commands::Start => start(&config).await,
        Commands::Init => init(&cli.config).await,
        Commands::Status => status(&config),
        Commands::Simulate {
            players,
            rounds,
            seed,
        } => simulate(&config, players, rounds, seed),
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    builder.format(|fmt, record| {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
    });
    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            builder.target(env_logger::Target::Pipe(Box::new(f)));
        }
    }
    let _ = builder.try_init();
}

async fn start(config: &Config) -> Result<()> {
    info!("starting boardwalk v{}", env!("CARGO_PKG_VERSION"));
    let store = GameStore::open(&config.storage.data_dir)?;
    let games = store.list_games()?;
    info!(
        "{}: store open at {} with {} game(s); waiting for transports (ctrl-c to stop)",
        config.server.name,
        config.storage.data_dir,
        games.len()
    );
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    Ok(())
}

async fn init(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("Config file {path} already exists, leaving it untouched.");
        return Ok(());
    }
    Config::create_default(path).await?;
    println!("Created {path}. Edit it and run `boardwalk start`.");
    Ok(())
}

fn status(config: &Config) -> Result<()> {
    let store = GameStore::open(&config.storage.data_dir)?;
    let games = store.list_games()?;
    if games.is_empty() {
        println!("No games stored in {}.", config.storage.data_dir);
        return Ok(());
    }
    for game in games {
        println!(
            "{} [{}] round {} pool {} seats {}",
            game.name,
            match game.status {
                GameStatus::Waiting => "waiting",
                GameStatus::Active => "active",
                GameStatus::Finished => "finished",
            },
            game.round,
            game.bank_pool,
            game.seats.len()
        );
        for player in store.list_players(game.id)? {
            println!(
                "  seat {} {:12} ${:<6} pos {:2}{}{}",
                player.order_in_game,
                player.display_name,
                player.money,
                player.position,
                if player.status == PlayerStatus::Bankrupt {
                    " BANKRUPT"
                } else {
                    ""
                },
                if player.is_in_jail { " (jail)" } else { "" },
            );
        }
    }
    Ok(())
}

/// Drive a full game loop against the real store: join, start, roll, buy
/// when affordable, advance, until the round limit or a single survivor.
fn simulate(config: &Config, players: u32, rounds: u32, seed: u64) -> Result<()> {
    let players = players.clamp(2, config.rules.max_players);
    let store = GameStore::open(&config.storage.data_dir)?;
    let service = GameService::new(
        store,
        Box::new(FairDice::seeded(seed)),
        std::sync::Arc::new(boardwalk::broadcast::NoopBroadcaster),
    );

    let game = service.create_game("Simulation", config.rules.clone())?;
    let mut seats = Vec::new();
    for seat in 1..=players {
        seats.push(service.join_game(game.id, &format!("Bot {seat}"))?);
    }
    service.initialize_board(game.id)?;
    service.start_game(game.id)?;

    loop {
        let snapshot = service.game_view(game.id)?;
        let active: Vec<_> = snapshot
            .players
            .iter()
            .filter(|p| p.status == PlayerStatus::Active)
            .collect();
        if active.len() <= 1 || snapshot.game.round > rounds {
            break;
        }
        let Some(current) = snapshot
            .game
            .current_player_turn
            .and_then(|seat| snapshot.players.iter().find(|p| p.order_in_game == seat))
        else {
            break;
        };

        let outcome = service.roll_dice(game.id, current.id)?;
        if let Some(TileKind::Property | TileKind::Railroad | TileKind::Utility) =
            outcome.tile_kind
        {
            let tile = service.store().get_tile(game.id, outcome.new_position)?;
            let roller = service.store().get_player(game.id, current.id)?;
            // Keep a cash cushion so rent never instantly bankrupts a bot.
            if tile.owner_id.is_none() && roller.money >= tile.price + 200 {
                service.buy_property(game.id, current.id, outcome.new_position)?;
            }
        }
        service.advance_turn(game.id)?;
    }

    println!("Simulation finished:");
    status_line(&service, game.id)?;
    Ok(())
}

fn status_line(service: &GameService, game_id: uuid::Uuid) -> Result<()> {
    let snapshot = service.game_view(game_id)?;
    for player in &snapshot.players {
        let holdings = snapshot
            .tiles
            .iter()
            .filter(|t| t.owner_id == Some(player.id))
            .count();
        println!(
            "  seat {} {:10} ${:<6} {} deed(s){}",
            player.order_in_game,
            player.display_name,
            player.money,
            holdings,
            if player.status == PlayerStatus::Bankrupt {
                " BANKRUPT"
            } else {
                ""
            },
        );
    }
    Ok(())
}
