// crates/renown-cli/src/commands/board.rs
//
// `renown leaderboard` (live ranking) and `renown board` (stored snapshot).

use clap::Args;
use tabled::Tabled;

use renown_core::AccountId;
use renown_leaderboard::{Leaderboard, RankedView};

use crate::engine::Engine;
use crate::output::{emit, or_dash, OutputFormat};

/// Live leaderboard command.
#[derive(Debug, Args)]
pub struct LeaderboardCmd {
    /// Number of rows to show (default: `reads.display_size`).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Also rank these accounts, even if they are not on the stored board.
    #[arg(long = "include")]
    pub include: Vec<String>,
}

/// A row in the live leaderboard table.
#[derive(Debug, Tabled)]
struct RankRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Score")]
    score: u64,
    #[tabled(rename = "Snapshot")]
    snapshot: String,
    #[tabled(rename = "Source")]
    source: &'static str,
}

/// A row in the stored board table.
#[derive(Debug, Tabled)]
struct BoardRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Score")]
    score: u64,
    #[tabled(rename = "Updated")]
    updated: String,
}

fn rank_rows(view: &RankedView) -> Vec<RankRow> {
    view.rows
        .iter()
        .map(|r| RankRow {
            rank: r.rank,
            account: r.account.to_string(),
            score: r.score,
            snapshot: or_dash(r.snapshot_score),
            source: if r.fresh { "live" } else { "stored" },
        })
        .collect()
}

/// Run the leaderboard command.
pub async fn leaderboard(
    engine: &Engine,
    cmd: &LeaderboardCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let extra: Vec<AccountId> = cmd.include.iter().map(|a| AccountId::from(a.as_str())).collect();
    let limit = cmd.limit.unwrap_or(engine.config.reads.display_size);
    let view = engine.presenter.present_with(&extra, limit).await?;

    emit(format, &view, &rank_rows(&view));
    if format == OutputFormat::Table {
        for (account, reason) in &view.unavailable {
            eprintln!("{}: {} (showing stored score)", account, reason);
        }
    }
    Ok(())
}

/// Run the board command.
pub async fn board(engine: &Engine, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let entries = engine.store.leaderboard().await?;
    let ranked = Leaderboard::from_entries(entries, engine.config.snapshot.max_leaderboard_size).ranked();

    let rows: Vec<BoardRow> = ranked
        .iter()
        .enumerate()
        .map(|(i, e)| BoardRow {
            rank: i + 1,
            account: e.account.to_string(),
            score: e.score,
            updated: e.last_updated.to_string(),
        })
        .collect();
    emit(format, &ranked, &rows);
    Ok(())
}
