// crates/renown-cli/src/main.rs
//
// CLI entrypoint for the Renown operator tools.
//
// Provides subcommands for daily check-ins, score lookups, candidate
// enrollment, driving the daily snapshot, and viewing the leaderboard.

mod commands;
mod config;
mod engine;
mod output;

use clap::{Parser, Subcommand};
use commands::board::LeaderboardCmd;
use commands::score::ScoreCmd;
use commands::snapshot::SnapshotCmd;
use commands::AccountArg;
use config::CliConfig;
use engine::Engine;
use output::OutputFormat;

/// Renown CLI: check-ins, reputation scores and the daily leaderboard.
#[derive(Parser, Debug)]
#[command(
    name = "renown",
    version = "0.1.0",
    about = "Renown CLI: daily check-ins, reputation scores and the leaderboard"
)]
struct Cli {
    /// Path to the TOML configuration file shared with renown-daemon.
    #[arg(long, global = true, default_value = "~/.renown/config.toml")]
    config: String,

    /// State directory (overrides `data_dir` from the config file).
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Ledger JSON file (overrides `ledger_path` from the config file).
    #[arg(long, global = true)]
    ledger: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Record today's check-in for an account.
    Gm(AccountArg),

    /// Show an account's check-in stats.
    Stats(AccountArg),

    /// Compute an account's live reputation score.
    Score(ScoreCmd),

    /// Enroll an account with a qualifying profile as a leaderboard candidate.
    Enroll(AccountArg),

    /// Advance today's leaderboard sweep.
    Snapshot(SnapshotCmd),

    /// Report whether a snapshot update is due.
    CanUpdate,

    /// Live ranking recomputed from current ledger reads.
    Leaderboard(LeaderboardCmd),

    /// The stored leaderboard as of the last snapshot windows.
    Board,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut config = CliConfig::load_or_default(&config::expand_tilde(&cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(path) = &cli.ledger {
        config.ledger_path = path.clone();
    }
    let engine = Engine::open(config)?;
    let format = cli.output;

    match &cli.command {
        Commands::Gm(cmd) => commands::checkin::gm(&engine, cmd, format).await?,
        Commands::Stats(cmd) => commands::checkin::stats(&engine, cmd, format).await?,
        Commands::Score(cmd) => commands::score::run(&engine, cmd, format).await?,
        Commands::Enroll(cmd) => commands::snapshot::enroll(&engine, cmd, format).await?,
        Commands::Snapshot(cmd) => commands::snapshot::run(&engine, cmd, format).await?,
        Commands::CanUpdate => commands::snapshot::can_update(&engine, format).await?,
        Commands::Leaderboard(cmd) => commands::board::leaderboard(&engine, cmd, format).await?,
        Commands::Board => commands::board::board(&engine, format).await?,
    }

    Ok(())
}
