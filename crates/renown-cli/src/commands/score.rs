// crates/renown-cli/src/commands/score.rs
//
// `renown score <account>`: live reputation score, optionally itemized.

use clap::Args;
use serde::Serialize;

use renown_core::AccountId;
use renown_scoring::ScoreBreakdown;

use crate::engine::Engine;
use crate::output::{emit, field, Field, OutputFormat};

/// Score lookup command.
#[derive(Debug, Args)]
pub struct ScoreCmd {
    /// Account address.
    #[arg()]
    pub account: String,

    /// Show the contribution of each term.
    #[arg(long)]
    pub breakdown: bool,
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    account: &'a AccountId,
    score: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<ScoreBreakdown>,
}

/// Run the score command.
pub async fn run(
    engine: &Engine,
    cmd: &ScoreCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let account = AccountId::from(cmd.account.as_str());
    let breakdown = engine.calculator.breakdown(&account).await?;
    let score = breakdown.total();

    let mut rows = vec![field("Account", &account), field("Score", score)];
    if cmd.breakdown {
        rows.extend(breakdown_rows(&breakdown));
    }

    let report = ScoreReport {
        account: &account,
        score,
        breakdown: cmd.breakdown.then_some(breakdown),
    };
    emit(format, &report, &rows);
    Ok(())
}

fn breakdown_rows(b: &ScoreBreakdown) -> Vec<Field> {
    vec![
        field("  base", b.base),
        field("  articles", b.articles),
        field("  proposals", b.proposals),
        field("  funded proposals", b.funded_proposals),
        field("  tips", b.tips),
        field("  gm", b.gm),
        field("  streak bonus", b.streak_bonus),
        field("  snapshot reward", b.snapshot_reward),
    ]
}
