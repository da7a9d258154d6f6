// crates/renown-cli/src/commands/snapshot.rs
//
// `renown enroll`, `renown snapshot` and `renown can-update`: the write
// path of the daily leaderboard.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use renown_core::AccountId;
use renown_leaderboard::{SnapshotOutcome, SnapshotPhase};

use super::AccountArg;
use crate::engine::Engine;
use crate::output::{emit, field, OutputFormat};

/// Snapshot update command.
#[derive(Debug, Args)]
pub struct SnapshotCmd {
    /// Account triggering the update; must hold a qualifying credential.
    #[arg(long)]
    pub trigger: String,

    /// Keep processing windows until the sweep completes.
    #[arg(long)]
    pub until_complete: bool,
}

#[derive(Debug, Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Processed")]
    processed: u64,
    #[tabled(rename = "Skipped")]
    skipped: usize,
    #[tabled(rename = "Cursor")]
    cursor: String,
    #[tabled(rename = "Completed")]
    completed: bool,
    #[tabled(rename = "Reward")]
    reward: u64,
    #[tabled(rename = "Board")]
    board: usize,
}

impl From<&SnapshotOutcome> for OutcomeRow {
    fn from(o: &SnapshotOutcome) -> Self {
        Self {
            day: o.day.to_string(),
            processed: o.processed,
            skipped: o.skipped.len(),
            cursor: format!("{}/{}", o.cursor, o.candidate_count),
            completed: o.completed,
            reward: o.reward_points,
            board: o.leaderboard_size,
        }
    }
}

#[derive(Debug, Serialize)]
struct GateReport {
    can_update: bool,
    phase: SnapshotPhase,
}

/// Run the enroll command.
pub async fn enroll(
    engine: &Engine,
    cmd: &AccountArg,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let account = AccountId::from(cmd.account.as_str());
    let added = engine.scheduler.enroll(&account).await?;
    let rows = vec![
        field("Account", &account),
        field("Enrolled", if added { "yes" } else { "already enrolled" }),
    ];
    emit(format, &serde_json::json!({ "account": account, "added": added }), &rows);
    Ok(())
}

/// Run the snapshot command.
pub async fn run(
    engine: &Engine,
    cmd: &SnapshotCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let trigger = AccountId::from(cmd.trigger.as_str());

    let mut outcomes = Vec::new();
    loop {
        let outcome = engine.scheduler.update_snapshot(&trigger).await?;
        let completed = outcome.completed;
        outcomes.push(outcome);
        if completed || !cmd.until_complete {
            break;
        }
    }

    let rows: Vec<OutcomeRow> = outcomes.iter().map(OutcomeRow::from).collect();
    emit(format, &outcomes, &rows);
    for o in &outcomes {
        for account in &o.skipped {
            eprintln!("skipped {}: ledger read unavailable", account);
        }
    }
    Ok(())
}

/// Run the can-update command.
pub async fn can_update(
    engine: &Engine,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = GateReport {
        can_update: engine.scheduler.can_update().await?,
        phase: engine.scheduler.phase().await?,
    };
    let rows = vec![
        field("Can update", if report.can_update { "yes" } else { "no" }),
        field("Phase", phase_label(&report.phase)),
    ];
    emit(format, &report, &rows);
    Ok(())
}

fn phase_label(phase: &SnapshotPhase) -> String {
    match phase {
        SnapshotPhase::Idle {
            last_update_day: Some(day),
        } => format!("idle (last sweep on {})", day),
        SnapshotPhase::Idle {
            last_update_day: None,
        } => "idle (never swept)".to_string(),
        SnapshotPhase::Updating { started, cursor } => {
            format!("updating (started on {}, cursor {})", started, cursor)
        }
    }
}
