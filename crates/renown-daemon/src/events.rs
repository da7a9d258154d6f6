// crates/renown-daemon/src/events.rs
//
// Snapshot event listener.
//
// The SnapshotScheduler publishes events on a tokio broadcast channel; the
// daemon subscribes once and records reward payouts and window progress.

use tokio::sync::broadcast::{self, error::RecvError};

use renown_leaderboard::SnapshotEvent;

/// Consume snapshot events until the channel closes.
pub async fn log_snapshot_events(mut rx: broadcast::Receiver<SnapshotEvent>) {
    loop {
        match rx.recv().await {
            Ok(SnapshotEvent::WindowProcessed {
                day,
                trigger,
                processed,
                cursor,
            }) => {
                tracing::debug!(
                    "[{}] window of {} processed by {}, cursor now {}",
                    day,
                    processed,
                    trigger,
                    cursor
                );
            }
            Ok(SnapshotEvent::SweepCompleted {
                day,
                trigger,
                reward_points,
                leaderboard_size,
            }) => {
                tracing::info!(
                    "[{}] updater reward: {} earned {} points ({} leaderboard entries)",
                    day,
                    trigger,
                    reward_points,
                    leaderboard_size
                );
            }
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!("Snapshot event listener lagged, {} events dropped", missed);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
