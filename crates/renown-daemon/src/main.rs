// crates/renown-daemon/src/main.rs
//
// Binary entrypoint for the Renown daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, opens
// the state store and ledger mirror, and runs the snapshot keeper.

mod config;
mod events;
mod keeper;
mod shared;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::DaemonConfig;
use keeper::SnapshotKeeper;
use shared::DaemonSharedState;

use renown_core::{AccountId, SystemClock};
use renown_store::{FileLedger, RocksStateStore};

/// Renown daemon: keeps the daily leaderboard snapshot current.
#[derive(Parser, Debug)]
#[command(name = "renown-daemon", version = "0.1.0", about = "Renown reputation keeper daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.renown/config.toml")]
    config: String,

    /// Account that triggers snapshot sweeps (overrides the config file).
    #[arg(long)]
    keeper_account: Option<String>,

    /// Run a single keeper pass and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config_path = expand_tilde(&args.config);
    let loaded = DaemonConfig::load(&config_path);

    // The configured log level applies unless RUST_LOG is set.
    let log_level = match &loaded {
        Ok(cfg) => cfg.log_level.clone(),
        Err(_) => "info".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut daemon_config = match loaded {
        Ok(cfg) => {
            tracing::info!("Loaded configuration from {}", config_path);
            cfg
        }
        Err(e) => {
            tracing::warn!(
                "Could not load config from {}: {}. Using defaults.",
                config_path,
                e
            );
            DaemonConfig::default()
        }
    };

    // CLI --keeper-account overrides the config file value.
    if args.keeper_account.is_some() {
        daemon_config.keeper_account = args.keeper_account.clone();
    }

    tracing::info!("Renown Daemon v0.1.0");
    tracing::info!("Data directory: {}", daemon_config.data_dir);
    tracing::info!("Ledger: {}", daemon_config.ledger_path);
    tracing::info!(
        "Leaderboard: {} entries, {} candidates per window",
        daemon_config.snapshot.max_leaderboard_size,
        daemon_config.snapshot.max_candidates_per_update
    );

    let data_dir = expand_tilde(&daemon_config.data_dir);
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| format!("Failed to create data directory {}: {}", data_dir, e))?;
    let state_path = format!("{}/state_rocksdb", data_dir);
    let store = Arc::new(RocksStateStore::open(&state_path)?);
    tracing::info!("State store opened at {}", state_path);

    let ledger_path = expand_tilde(&daemon_config.ledger_path);
    let ledger = Arc::new(
        FileLedger::load(&ledger_path)
            .map_err(|e| format!("Failed to load ledger from {}: {}", ledger_path, e))?,
    );

    let shared = DaemonSharedState::new(&daemon_config, ledger, store, Arc::new(SystemClock));

    tokio::spawn(events::log_snapshot_events(shared.scheduler.subscribe()));

    let keeper = SnapshotKeeper::new(
        shared.scheduler.clone(),
        shared.ledger.clone(),
        daemon_config.keeper_account.as_deref().map(AccountId::from),
        Duration::from_secs(daemon_config.keeper_interval_secs),
    );

    if args.once {
        let tick = keeper.tick().await?;
        tracing::info!("Keeper pass finished: {:?}", tick);
    } else {
        keeper.run().await;
    }

    tracing::info!(
        "Renown daemon shut down gracefully (uptime {}s)",
        shared.start_time.elapsed().as_secs()
    );
    Ok(())
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{}", home.display(), &path[1..]);
        }
    }
    path.to_string()
}
