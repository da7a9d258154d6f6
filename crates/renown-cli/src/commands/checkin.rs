// crates/renown-cli/src/commands/checkin.rs
//
// `renown gm <account>` and `renown stats <account>`: daily check-ins.

use renown_core::AccountId;

use super::AccountArg;
use crate::engine::Engine;
use crate::output::{emit, field, or_dash, OutputFormat};

/// Run the gm command.
pub async fn gm(
    engine: &Engine,
    cmd: &AccountArg,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let account = AccountId::from(cmd.account.as_str());
    let stats = engine.tracker.say_gm(&account).await?;

    let rows = vec![
        field("Account", &account),
        field("Day", or_dash(stats.last_checkin_day)),
        field("Streak", stats.streak),
        field("Best streak", stats.best_streak),
        field("Total", stats.total),
    ];
    emit(format, &stats, &rows);
    Ok(())
}

/// Run the stats command.
pub async fn stats(
    engine: &Engine,
    cmd: &AccountArg,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let account = AccountId::from(cmd.account.as_str());
    let stats = engine.tracker.user_stats(&account).await?;

    let rows = vec![
        field("Account", &account),
        field("Total", stats.total),
        field("Streak", stats.streak),
        field("Best streak", stats.best_streak),
        field("Said GM today", if stats.said_today { "yes" } else { "no" }),
        field("Last check-in", or_dash(stats.last_checkin_day)),
    ];
    emit(format, &stats, &rows);
    Ok(())
}
